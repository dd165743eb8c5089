use thiserror::Error;

/// Anything that kept the source page from arriving: DNS, refused
/// connection, non-2xx status, unreadable or blank body. Callers get one
/// opaque failure and decide on a fallback themselves.
#[derive(Debug, Error)]
#[error("FETCH_FAILED: {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// The HTTP client itself could not be built (TLS backend, bad settings).
/// Raised before any page is requested, so it carries no URL.
#[derive(Debug, Error)]
#[error("CLIENT_SETUP_FAILED: {0}")]
pub struct ClientSetupError(#[from] reqwest::Error);

/// Refresh failures that reach the caller. Fetch and extraction problems are
/// absorbed by the default lists, so only the store can fail a refresh.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("PERSISTENCE_FAILED: {0}")]
    Persistence(#[from] rusqlite::Error),
}

pub type RefreshResult<T> = Result<T, RefreshError>;
