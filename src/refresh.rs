// LucidQuant - Refresh Orchestrator
//
// fetch -> extract -> (defaults if nothing) -> predefined metrics
//       -> one transaction: clear everything, insert the new set, commit
//
// All-or-nothing: when the transaction fails it is dropped, SQLite rolls it
// back, and the store keeps its pre-refresh rows.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog;
use crate::db;
use crate::error::{FetchError, RefreshResult};
use crate::extractor::{self, Extraction};
use crate::fetcher::PageFetcher;
use crate::models::{NewIndicator, NewMetric};

/// Where a plan's indicators came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSource {
    /// The page had readable text; tracked indicators were generated
    Extracted,
    /// Fetch failed or the page was empty; the fixed defaults were used
    Defaults,
}

/// Everything one refresh will write
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshPlan {
    pub indicators: Vec<NewIndicator>,
    pub metrics: Vec<NewMetric>,
    pub source: IndicatorSource,
}

/// What a committed refresh wrote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub indicators: usize,
    pub metrics: usize,
    pub source: IndicatorSource,
    pub refreshed_at: DateTime<Utc>,
}

/// Turn a fetch outcome into a plan. Fetch failure and empty extraction both
/// land on the default indicator list.
pub fn plan_from_fetch<R: Rng + ?Sized>(
    fetched: Result<String, FetchError>,
    source_url: &str,
    rng: &mut R,
) -> RefreshPlan {
    let extraction = match fetched {
        Ok(document) => extractor::extract(&document, source_url, rng),
        Err(e) => {
            warn!(error = %e, "source fetch failed, using default indicators");
            Extraction::Empty
        }
    };

    let (indicators, source) = match extraction {
        Extraction::Extracted(indicators) if !indicators.is_empty() => {
            (indicators, IndicatorSource::Extracted)
        }
        _ => {
            info!("no indicators extracted, using default indicators");
            (catalog::default_indicators(source_url), IndicatorSource::Defaults)
        }
    };

    RefreshPlan {
        indicators,
        metrics: catalog::predefined_metrics(),
        source,
    }
}

/// Replace every indicator, metric and data point with the plan's rows in a
/// single transaction. The transaction is scoped to this call: committed on
/// success, rolled back on drop otherwise.
pub fn apply_plan(conn: &mut Connection, plan: &RefreshPlan) -> RefreshResult<RefreshSummary> {
    let refreshed_at = Utc::now();
    let tx = conn.transaction()?;

    db::clear_all(&tx)?;

    for indicator in &plan.indicators {
        db::insert_indicator(&tx, indicator, refreshed_at)?;
    }

    for metric in &plan.metrics {
        db::insert_metric(&tx, metric, refreshed_at)?;
    }

    tx.commit()?;

    let summary = RefreshSummary {
        indicators: plan.indicators.len(),
        metrics: plan.metrics.len(),
        source: plan.source,
        refreshed_at,
    };

    info!(
        indicators = summary.indicators,
        metrics = summary.metrics,
        source = ?summary.source,
        "database populated successfully"
    );

    Ok(summary)
}

/// Runs refreshes against one source page
pub struct Refresher<F: PageFetcher> {
    fetcher: F,
    source_url: String,
}

impl<F: PageFetcher> Refresher<F> {
    pub fn new(fetcher: F, source_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            source_url: source_url.into(),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Steps 1-4: fetch, extract, fall back, add metrics. Never fails.
    pub async fn collect(&self) -> RefreshPlan {
        let fetched = self.fetcher.fetch(&self.source_url).await;
        plan_from_fetch(fetched, &self.source_url, &mut rand::thread_rng())
    }

    /// Full refresh. Only the store can make this fail.
    pub async fn refresh(&self, conn: &mut Connection) -> RefreshResult<RefreshSummary> {
        let plan = self.collect().await;
        apply_plan(conn, &plan).map_err(|e| {
            warn!(error = %e, "refresh rolled back");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DEFAULT_SOURCE_URL, TRACKED_INDICATORS};
    use crate::generator::range_for;
    use crate::error::RefreshError;
    use crate::models::Trend;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// Canned page, canned failure
    enum StubFetcher {
        Page(&'static str),
        Down,
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            match self {
                StubFetcher::Page(body) => Ok(body.to_string()),
                StubFetcher::Down => Err(FetchError::new(url, "connection refused")),
            }
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();
        conn
    }

    fn indicator_names(conn: &Connection) -> Vec<String> {
        db::get_all_indicators(conn)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect()
    }

    #[tokio::test]
    async fn test_readable_page_stores_tracked_indicators_and_metrics() {
        let mut conn = memory_db();
        let refresher = Refresher::new(
            StubFetcher::Page("<html><body><p>Indicators</p></body></html>"),
            DEFAULT_SOURCE_URL,
        );

        let summary = refresher.refresh(&mut conn).await.unwrap();
        assert_eq!(summary.source, IndicatorSource::Extracted);
        assert_eq!(summary.indicators, 8);
        assert_eq!(summary.metrics, 5);

        let indicators = db::get_all_indicators(&conn).unwrap();
        assert_eq!(indicators.len(), 8);
        for (stored, descriptor) in indicators.iter().zip(TRACKED_INDICATORS.iter()) {
            assert_eq!(stored.name, descriptor.name);
            assert!(
                range_for(&stored.name).contains(stored.current_value),
                "{} = {} out of range",
                stored.name,
                stored.current_value
            );
        }

        let metrics = db::get_all_metrics(&conn).unwrap();
        assert_eq!(metrics.len(), 5);
        assert_eq!(metrics[0].name, "Promoter Holding Change");
        assert_eq!(metrics[0].current_value, 65.4);
        assert_eq!(metrics[3].change_percentage, 3.4);
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_defaults() {
        let mut conn = memory_db();
        let refresher = Refresher::new(StubFetcher::Down, DEFAULT_SOURCE_URL);

        let summary = refresher.refresh(&mut conn).await.unwrap();
        assert_eq!(summary.source, IndicatorSource::Defaults);

        let indicators = db::get_all_indicators(&conn).unwrap();
        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0].name, "VIX Fear Index");
        assert_eq!(indicators[0].current_value, 22.5);
        assert_eq!(indicators[1].name, "Baltic Dry Index");
        assert_eq!(indicators[1].current_value, 1245.0);
        assert_eq!(indicators[1].trend, Trend::Up);
        assert_eq!(db::count_metrics(&conn).unwrap(), 5);
    }

    #[tokio::test]
    async fn test_empty_page_falls_back_to_defaults() {
        let mut conn = memory_db();
        let refresher = Refresher::new(
            StubFetcher::Page("<html><head><script>1</script></head><body></body></html>"),
            DEFAULT_SOURCE_URL,
        );

        let summary = refresher.refresh(&mut conn).await.unwrap();

        assert_eq!(summary.source, IndicatorSource::Defaults);
        assert_eq!(db::count_indicators(&conn).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_refresh_leaves_no_stale_rows() {
        let mut conn = memory_db();

        // First run stores 8 tracked indicators with some history
        Refresher::new(StubFetcher::Page("<p>up</p>"), DEFAULT_SOURCE_URL)
            .refresh(&mut conn)
            .await
            .unwrap();
        let first = db::get_all_indicators(&conn).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        db::insert_indicator_data(&conn, first[0].id, 21.0, day).unwrap();
        let metric_id = db::get_all_metrics(&conn).unwrap()[0].id;
        db::insert_metric_data(&conn, metric_id, 64.0, day).unwrap();

        // Second run only has the defaults
        Refresher::new(StubFetcher::Down, DEFAULT_SOURCE_URL)
            .refresh(&mut conn)
            .await
            .unwrap();

        assert_eq!(indicator_names(&conn), vec!["VIX Fear Index", "Baltic Dry Index"]);
        let fresh = db::get_all_indicators(&conn).unwrap();
        assert!(fresh.iter().all(|i| first.iter().all(|old| old.id != i.id)));
        assert!(db::get_indicator_history(&conn, first[0].id).unwrap().is_empty());
        assert!(db::get_metric_history(&conn, metric_id).unwrap().is_empty());
        assert_eq!(db::count_metrics(&conn).unwrap(), 5);
    }

    #[tokio::test]
    async fn test_persistence_failure_rolls_back() {
        let mut conn = memory_db();
        Refresher::new(StubFetcher::Page("<p>text</p>"), DEFAULT_SOURCE_URL)
            .refresh(&mut conn)
            .await
            .unwrap();
        let before_indicators = db::get_all_indicators(&conn).unwrap();
        let before_metrics = db::get_all_metrics(&conn).unwrap();

        // Duplicate names trip the UNIQUE constraint after the deletes ran
        let mut plan = plan_from_fetch(
            Err(FetchError::new(DEFAULT_SOURCE_URL, "down")),
            DEFAULT_SOURCE_URL,
            &mut rand::thread_rng(),
        );
        let duplicate = plan.indicators[0].clone();
        plan.indicators.push(duplicate);

        let result = apply_plan(&mut conn, &plan);
        assert!(matches!(result, Err(RefreshError::Persistence(_))));

        assert_eq!(db::get_all_indicators(&conn).unwrap(), before_indicators);
        assert_eq!(db::get_all_metrics(&conn).unwrap(), before_metrics);
    }

    #[test]
    fn test_plan_from_fetch_marks_its_source() {
        let mut rng = rand::thread_rng();

        let extracted = plan_from_fetch(Ok("<p>words</p>".to_string()), "https://example.test", &mut rng);
        assert_eq!(extracted.source, IndicatorSource::Extracted);
        assert_eq!(extracted.indicators.len(), 8);
        assert!(extracted.indicators.iter().all(|i| i.source_url == "https://example.test"));

        let fallback = plan_from_fetch(Ok(String::new()), "https://example.test", &mut rng);
        assert_eq!(fallback.source, IndicatorSource::Defaults);
        assert_eq!(fallback.indicators.len(), 2);
        assert_eq!(fallback.metrics.len(), 5);
    }
}
