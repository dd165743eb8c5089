// LucidQuant - Core Library
// Exposes the refresh pipeline and store for the CLI, API server and tests

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod generator;
pub mod models;
pub mod refresh;
pub mod signup;
pub mod telemetry;

#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use catalog::{DEFAULT_SOURCE_URL, TRACKED_INDICATORS};
pub use config::Settings;
pub use db::{
    connect, count_indicators, count_metrics, get_all_indicators, get_all_metrics,
    get_indicator, get_indicator_history, get_metric, get_metric_history,
    insert_indicator_data, insert_metric_data, open_database, setup_database,
};
pub use error::{ClientSetupError, FetchError, RefreshError, RefreshResult};
pub use extractor::Extraction;
pub use fetcher::{HttpFetcher, PageFetcher, DEFAULT_TIMEOUT};
pub use models::{
    Category, Indicator, IndicatorData, Metric, MetricData, NewIndicator, NewMetric, Trend,
};
pub use refresh::{apply_plan, IndicatorSource, RefreshPlan, RefreshSummary, Refresher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
