// LucidQuant - Settings
// Environment first (optionally seeded from a .env file), then defaults

use std::path::PathBuf;

use crate::catalog::DEFAULT_SOURCE_URL;

pub const ENV_DATABASE: &str = "LUCIDQUANT_DB";
pub const ENV_BIND_ADDR: &str = "LUCIDQUANT_ADDR";
pub const ENV_SOURCE_URL: &str = "LUCIDQUANT_SOURCE_URL";

pub const DEFAULT_DATABASE: &str = "lucidquant.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_path: PathBuf,
    pub bind_addr: String,
    pub source_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Read `.env` if present, then the process environment
    pub fn load() -> Self {
        // A missing .env file is normal
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Settings::default();

        Self {
            database_path: get(ENV_DATABASE)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            bind_addr: get(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
            source_url: get(ENV_SOURCE_URL).unwrap_or(defaults.source_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(|_| None);

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.source_url, "https://tradingeconomics.com/indicators");
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_DATABASE, "/tmp/lq.db"),
            (ENV_BIND_ADDR, "127.0.0.1:8080"),
            (ENV_SOURCE_URL, "   "),
        ]
        .into_iter()
        .collect();

        let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.database_path, PathBuf::from("/tmp/lq.db"));
        assert_eq!(settings.bind_addr, "127.0.0.1:8080");
        // Blank value falls back to the default
        assert_eq!(settings.source_url, DEFAULT_SOURCE_URL);
    }
}
