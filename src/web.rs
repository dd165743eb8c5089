// LucidQuant - HTTP surface
// JSON API over the store, signup form, admin-triggered refresh

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Form, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::catalog::{self, ShowcaseIndicator, ShowcaseMetric, SHOWCASE_INDICATORS, SHOWCASE_METRICS};
use crate::db;
use crate::fetcher::PageFetcher;
use crate::models::{Indicator, IndicatorData, Metric, MetricData, Trend};
use crate::refresh::{RefreshSummary, Refresher};
use crate::signup::{self, SignupOutcome};

pub type SharedRefresher = Arc<Refresher<Arc<dyn PageFetcher>>>;

/// Shared application state. Each request opens its own connection from
/// `database_path`; refreshes additionally take `refresh_lock` so two admin
/// calls never interleave their delete/insert sequences.
#[derive(Clone)]
pub struct AppState {
    database_path: PathBuf,
    refresher: SharedRefresher,
    refresh_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(database_path: impl Into<PathBuf>, refresher: SharedRefresher) -> Self {
        Self {
            database_path: database_path.into(),
            refresher,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }
}

// ============================================================================
// Response types
// ============================================================================

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Where a response's rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum DataOrigin {
    Database,
    Static,
}

#[derive(Serialize)]
struct Listing<T> {
    source: DataOrigin,
    items: Vec<T>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Serialize)]
struct IndicatorResponse {
    id: i64,
    name: String,
    description: String,
    category: String,
    current_value: f64,
    trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,
}

#[derive(Serialize)]
struct MetricResponse {
    id: i64,
    name: String,
    description: String,
    current_value: f64,
    change_percentage: f64,
    trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct HistoryPoint {
    date: NaiveDate,
    value: f64,
}

#[derive(Serialize)]
struct Detail<T> {
    source: DataOrigin,
    #[serde(flatten)]
    item: T,
    history: Vec<HistoryPoint>,
}

#[derive(Serialize)]
struct AdminResponse {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<RefreshSummary>,
}

#[derive(Deserialize)]
struct SignupForm {
    email: Option<String>,
}

impl From<Indicator> for IndicatorResponse {
    fn from(indicator: Indicator) -> Self {
        Self {
            id: indicator.id,
            name: indicator.name,
            description: indicator.description,
            category: indicator.category.to_string(),
            current_value: indicator.current_value,
            trend: indicator.trend,
            last_updated: Some(indicator.last_updated),
            source_url: Some(indicator.source_url),
        }
    }
}

impl IndicatorResponse {
    /// Showcase entries use their 1-based position as id
    fn from_showcase(position: usize, showcase: &ShowcaseIndicator, detailed: bool) -> Self {
        Self {
            id: position as i64,
            name: showcase.name.to_string(),
            description: (if detailed { showcase.detail } else { showcase.summary }).to_string(),
            category: crate::models::Category::from(showcase.category).to_string(),
            current_value: showcase.current_value,
            trend: showcase.trend,
            last_updated: None,
            source_url: None,
        }
    }
}

impl From<Metric> for MetricResponse {
    fn from(metric: Metric) -> Self {
        Self {
            id: metric.id,
            name: metric.name,
            description: metric.description,
            current_value: metric.current_value,
            change_percentage: metric.change_percentage,
            trend: metric.trend,
            last_updated: Some(metric.last_updated),
        }
    }
}

impl MetricResponse {
    fn from_showcase(position: usize, showcase: &ShowcaseMetric, detailed: bool) -> Self {
        Self {
            id: position as i64,
            name: showcase.name.to_string(),
            description: (if detailed { showcase.detail } else { showcase.summary }).to_string(),
            current_value: showcase.current_value,
            change_percentage: showcase.change_percentage,
            trend: showcase.trend,
            last_updated: None,
        }
    }
}

impl From<IndicatorData> for HistoryPoint {
    fn from(point: IndicatorData) -> Self {
        Self {
            date: point.date,
            value: point.value,
        }
    }
}

impl From<MetricData> for HistoryPoint {
    fn from(point: MetricData) -> Self {
        Self {
            date: point.date,
            value: point.value,
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// Ids that are not numbers resolve like unknown ones: no stored row, first
/// showcase entry. Stored ids start at 1, so 0 never matches.
fn id_or_unknown(id: Result<Path<i64>, PathRejection>) -> i64 {
    match id {
        Ok(Path(id)) => id,
        Err(rejection) => {
            debug!(error = %rejection, "non-numeric id");
            0
        }
    }
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        message: "LucidQuant is running!",
    })
}

/// GET /api/indicators - Stored indicators, static showcase when there are none
async fn list_indicators(State(state): State<AppState>) -> impl IntoResponse {
    let stored = db::connect(&state.database_path).and_then(|conn| db::get_all_indicators(&conn));

    let listing = match stored {
        Ok(rows) if !rows.is_empty() => Listing {
            source: DataOrigin::Database,
            items: rows.into_iter().map(IndicatorResponse::from).collect(),
        },
        other => {
            if let Err(e) = other {
                warn!(error = %e, "indicator store unreadable, serving static list");
            }
            Listing {
                source: DataOrigin::Static,
                items: SHOWCASE_INDICATORS
                    .iter()
                    .enumerate()
                    .map(|(i, s)| IndicatorResponse::from_showcase(i + 1, s, false))
                    .collect(),
            }
        }
    };

    Json(ApiResponse::ok(listing))
}

/// GET /api/indicators/:id - One indicator with its history
async fn indicator_detail(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> impl IntoResponse {
    let id = id_or_unknown(id);
    let stored = db::connect(&state.database_path).and_then(|conn| {
        let indicator = db::get_indicator(&conn, id)?;
        match indicator {
            Some(indicator) => {
                let history = db::get_indicator_history(&conn, indicator.id)?;
                Ok(Some((indicator, history)))
            }
            None => Ok(None),
        }
    });

    let detail = match stored {
        Ok(Some((indicator, history))) => Detail {
            source: DataOrigin::Database,
            item: IndicatorResponse::from(indicator),
            history: history.into_iter().map(HistoryPoint::from).collect(),
        },
        other => {
            if let Err(e) = other {
                warn!(error = %e, id, "indicator store unreadable, serving static entry");
            }
            let (position, showcase) = catalog::showcase_indicator(id);
            Detail {
                source: DataOrigin::Static,
                item: IndicatorResponse::from_showcase(position, showcase, true),
                history: Vec::new(),
            }
        }
    };

    Json(ApiResponse::ok(detail))
}

/// GET /api/metrics - Stored metrics, static showcase when there are none
async fn list_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let stored = db::connect(&state.database_path).and_then(|conn| db::get_all_metrics(&conn));

    let listing = match stored {
        Ok(rows) if !rows.is_empty() => Listing {
            source: DataOrigin::Database,
            items: rows.into_iter().map(MetricResponse::from).collect(),
        },
        other => {
            if let Err(e) = other {
                warn!(error = %e, "metric store unreadable, serving static list");
            }
            Listing {
                source: DataOrigin::Static,
                items: SHOWCASE_METRICS
                    .iter()
                    .enumerate()
                    .map(|(i, s)| MetricResponse::from_showcase(i + 1, s, false))
                    .collect(),
            }
        }
    };

    Json(ApiResponse::ok(listing))
}

/// GET /api/metrics/:id - One metric with its history
async fn metric_detail(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> impl IntoResponse {
    let id = id_or_unknown(id);
    let stored = db::connect(&state.database_path).and_then(|conn| {
        let metric = db::get_metric(&conn, id)?;
        match metric {
            Some(metric) => {
                let history = db::get_metric_history(&conn, metric.id)?;
                Ok(Some((metric, history)))
            }
            None => Ok(None),
        }
    });

    let detail = match stored {
        Ok(Some((metric, history))) => Detail {
            source: DataOrigin::Database,
            item: MetricResponse::from(metric),
            history: history.into_iter().map(HistoryPoint::from).collect(),
        },
        other => {
            if let Err(e) = other {
                warn!(error = %e, id, "metric store unreadable, serving static entry");
            }
            let (position, showcase) = catalog::showcase_metric(id);
            Detail {
                source: DataOrigin::Static,
                item: MetricResponse::from_showcase(position, showcase, true),
                history: Vec::new(),
            }
        }
    };

    Json(ApiResponse::ok(detail))
}

/// POST /signup - Interest form
async fn signup(Form(form): Form<SignupForm>) -> impl IntoResponse {
    let outcome = signup::validate_email(form.email.as_deref());

    let status = match outcome {
        SignupOutcome::Success(_) => StatusCode::OK,
        SignupOutcome::Error(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    (status, Json(outcome))
}

/// GET|POST /admin/populate-data - Replace all indicators and metrics
async fn populate_data(State(state): State<AppState>) -> impl IntoResponse {
    let _guard = state.refresh_lock.lock().await;

    let result = match db::connect(&state.database_path) {
        Ok(mut conn) => state
            .refresher
            .refresh(&mut conn)
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => (
            StatusCode::OK,
            Json(AdminResponse {
                success: true,
                message: "Database populated successfully!",
                summary: Some(summary),
            }),
        ),
        Err(e) => {
            error!(error = %e, "Error populating database");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AdminResponse {
                    success: false,
                    message: "Error populating database.",
                    summary: None,
                }),
            )
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/indicators", get(list_indicators))
        .route("/indicators/:id", get(indicator_detail))
        .route("/metrics", get(list_metrics))
        .route("/metrics/:id", get(metric_detail));

    Router::new()
        .nest("/api", api_routes)
        .route("/signup", post(signup))
        .route("/admin/populate-data", get(populate_data).post(populate_data))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
