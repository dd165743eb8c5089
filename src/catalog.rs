// LucidQuant - Catalog
// Every fixed list the site works from: tracked indicators, refresh
// defaults, predefined metrics and the static showcase shown when the
// store has nothing to offer.

use crate::models::{Category, NewIndicator, NewMetric, Trend};

/// Page the refresh pipeline scrapes
pub const DEFAULT_SOURCE_URL: &str = "https://tradingeconomics.com/indicators";

// ============================================================================
// TRACKED INDICATORS
// ============================================================================

/// Name, description and category of an indicator the site tracks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub category: KnownCategory,
}

/// `Category` holds a `String` for unknown labels, so the const table uses
/// this copyable mirror of the three known ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownCategory {
    Economic,
    Sentiment,
    Behavioral,
}

impl From<KnownCategory> for Category {
    fn from(category: KnownCategory) -> Self {
        match category {
            KnownCategory::Economic => Category::Economic,
            KnownCategory::Sentiment => Category::Sentiment,
            KnownCategory::Behavioral => Category::Behavioral,
        }
    }
}

pub const TRACKED_INDICATORS: [IndicatorDescriptor; 8] = [
    IndicatorDescriptor {
        name: "VIX Fear Index",
        description: "Market volatility and fear sentiment analysis",
        category: KnownCategory::Sentiment,
    },
    IndicatorDescriptor {
        name: "Baltic Dry Index",
        description: "Global shipping rates as economic indicator",
        category: KnownCategory::Economic,
    },
    IndicatorDescriptor {
        name: "Insider Trading Patterns",
        description: "Corporate insider buying and selling activity",
        category: KnownCategory::Sentiment,
    },
    IndicatorDescriptor {
        name: "Google Search Trends",
        description: "Public interest and search volume for financial terms",
        category: KnownCategory::Behavioral,
    },
    IndicatorDescriptor {
        name: "Consumer Confidence",
        description: "Consumer confidence index and sentiment",
        category: KnownCategory::Economic,
    },
    IndicatorDescriptor {
        name: "Manufacturing PMI",
        description: "Manufacturing purchasing managers index",
        category: KnownCategory::Economic,
    },
    IndicatorDescriptor {
        name: "Unemployment Rate",
        description: "National unemployment rate trends",
        category: KnownCategory::Economic,
    },
    IndicatorDescriptor {
        name: "Inflation Rate",
        description: "Consumer price index and inflation trends",
        category: KnownCategory::Economic,
    },
];

/// Indicators stored when the source page yields nothing
pub fn default_indicators(source_url: &str) -> Vec<NewIndicator> {
    vec![
        NewIndicator {
            name: "VIX Fear Index".to_string(),
            description: "Market volatility and fear sentiment analysis".to_string(),
            category: Category::Sentiment,
            current_value: 22.5,
            trend: Trend::Stable,
            source_url: source_url.to_string(),
        },
        NewIndicator {
            name: "Baltic Dry Index".to_string(),
            description: "Global shipping rates as economic indicator".to_string(),
            category: Category::Economic,
            current_value: 1245.0,
            trend: Trend::Up,
            source_url: source_url.to_string(),
        },
    ]
}

// ============================================================================
// PREDEFINED METRICS
// ============================================================================

pub fn predefined_metrics() -> Vec<NewMetric> {
    let metric = |name: &str, description: &str, value: f64, change: f64, trend: Trend| NewMetric {
        name: name.to_string(),
        description: description.to_string(),
        current_value: value,
        change_percentage: change,
        trend,
    };

    vec![
        metric(
            "Promoter Holding Change",
            "Changes in promoter shareholding patterns",
            65.4,
            2.1,
            Trend::Up,
        ),
        metric(
            "Bulk Dealings",
            "Large block transactions and institutional activity",
            1247.0,
            -1.8,
            Trend::Down,
        ),
        metric(
            "Insider Activity",
            "Corporate insider trading patterns and activity",
            89.2,
            5.6,
            Trend::Up,
        ),
        metric(
            "Stock Trading Volume 50 Day Average",
            "50-day average trading volume indicator",
            1542.8,
            3.4,
            Trend::Up,
        ),
        metric(
            "Stock Trading Volume 200 Day Average",
            "200-day average trading volume indicator",
            1423.6,
            1.2,
            Trend::Stable,
        ),
    ]
}

// ============================================================================
// STATIC SHOWCASE (presentation fallback)
// ============================================================================

/// Indicator shown when the store is empty or unreachable.
/// `summary` feeds list views, `detail` the single-indicator view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowcaseIndicator {
    pub name: &'static str,
    pub summary: &'static str,
    pub detail: &'static str,
    pub category: KnownCategory,
    pub current_value: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowcaseMetric {
    pub name: &'static str,
    pub summary: &'static str,
    pub detail: &'static str,
    pub current_value: f64,
    pub change_percentage: f64,
    pub trend: Trend,
}

pub static SHOWCASE_INDICATORS: [ShowcaseIndicator; 6] = [
    ShowcaseIndicator {
        name: "VIX Fear Index",
        summary: "Market volatility and fear sentiment analysis",
        detail: "The VIX, or Volatility Index, measures the market's expectation of 30-day volatility. Often called the \"fear gauge,\" it spikes during market uncertainty and drops during calm periods.",
        category: KnownCategory::Sentiment,
        current_value: 22.5,
        trend: Trend::Stable,
    },
    ShowcaseIndicator {
        name: "Baltic Dry Index",
        summary: "Global shipping rates as economic indicator",
        detail: "The Baltic Dry Index tracks the cost of shipping raw materials like coal, iron ore, and grain across major shipping routes, serving as a leading economic indicator.",
        category: KnownCategory::Economic,
        current_value: 1245.0,
        trend: Trend::Up,
    },
    ShowcaseIndicator {
        name: "Insider Trading Patterns",
        summary: "Corporate insider buying and selling activity",
        detail: "Tracks corporate insider buying and selling activity, providing insights into management confidence and potential future performance.",
        category: KnownCategory::Sentiment,
        current_value: 89.2,
        trend: Trend::Up,
    },
    ShowcaseIndicator {
        name: "Consumer Confidence",
        summary: "Consumer confidence index and sentiment",
        detail: "Measures consumer attitudes regarding economic conditions and their willingness to spend money.",
        category: KnownCategory::Economic,
        current_value: 105.3,
        trend: Trend::Stable,
    },
    ShowcaseIndicator {
        name: "Manufacturing PMI",
        summary: "Manufacturing purchasing managers index",
        detail: "The Manufacturing Purchasing Managers Index indicates the economic health of the manufacturing sector.",
        category: KnownCategory::Economic,
        current_value: 52.1,
        trend: Trend::Up,
    },
    ShowcaseIndicator {
        name: "Google Search Trends",
        summary: "Public interest and search volume for financial terms",
        detail: "Analyzes search volume for financial terms to gauge public interest and sentiment.",
        category: KnownCategory::Behavioral,
        current_value: 78.3,
        trend: Trend::Stable,
    },
];

pub static SHOWCASE_METRICS: [ShowcaseMetric; 5] = [
    ShowcaseMetric {
        name: "Promoter Holding Change",
        summary: "Changes in promoter shareholding patterns indicating management confidence and strategic decisions",
        detail: "Changes in promoter shareholding patterns indicating management confidence and strategic decisions. Higher promoter holdings typically suggest confidence in the company's future prospects.",
        current_value: 65.4,
        change_percentage: 2.1,
        trend: Trend::Up,
    },
    ShowcaseMetric {
        name: "Bulk Dealings",
        summary: "Large block transactions and institutional activity indicating major investor sentiment shifts",
        detail: "Large block transactions and institutional activity indicating major investor sentiment shifts. High bulk dealing activity can signal significant institutional interest or divestment.",
        current_value: 1247.0,
        change_percentage: -1.8,
        trend: Trend::Down,
    },
    ShowcaseMetric {
        name: "Insider Activity",
        summary: "Corporate insider trading patterns and activity levels showing internal company perspectives",
        detail: "Corporate insider trading patterns and activity levels showing internal company perspectives. Insider buying often indicates positive internal outlook while selling may suggest profit-taking or personal liquidity needs.",
        current_value: 89.2,
        change_percentage: 5.6,
        trend: Trend::Up,
    },
    ShowcaseMetric {
        name: "Stock Trading Volume 50 Day Average",
        summary: "50-day average trading volume indicator showing short-term liquidity and market interest",
        detail: "50-day average trading volume indicator showing short-term liquidity and market interest. Higher volumes typically indicate increased market interest and better price discovery.",
        current_value: 1542.8,
        change_percentage: 3.4,
        trend: Trend::Up,
    },
    ShowcaseMetric {
        name: "Stock Trading Volume 200 Day Average",
        summary: "200-day average trading volume indicator showing long-term liquidity trends and market participation",
        detail: "200-day average trading volume indicator showing long-term liquidity trends and market participation. This metric helps identify sustained changes in investor interest over longer periods.",
        current_value: 1423.6,
        change_percentage: 1.2,
        trend: Trend::Stable,
    },
];

/// Showcase entry at a 1-based position, paired with the position actually
/// used; anything out of range gets the first entry.
pub fn showcase_indicator(position: i64) -> (usize, &'static ShowcaseIndicator) {
    showcase_at(&SHOWCASE_INDICATORS, position)
}

pub fn showcase_metric(position: i64) -> (usize, &'static ShowcaseMetric) {
    showcase_at(&SHOWCASE_METRICS, position)
}

fn showcase_at<T>(items: &'static [T], position: i64) -> (usize, &'static T) {
    let index = usize::try_from(position)
        .ok()
        .and_then(|p| p.checked_sub(1))
        .filter(|&i| i < items.len())
        .unwrap_or(0);
    (index + 1, &items[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_indicator_names_are_unique() {
        let mut names: Vec<&str> = TRACKED_INDICATORS.iter().map(|d| d.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_default_indicators_carry_literal_values() {
        let defaults = default_indicators(DEFAULT_SOURCE_URL);

        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults[0].name, "VIX Fear Index");
        assert_eq!(defaults[0].current_value, 22.5);
        assert_eq!(defaults[0].trend, Trend::Stable);
        assert_eq!(defaults[1].name, "Baltic Dry Index");
        assert_eq!(defaults[1].current_value, 1245.0);
        assert_eq!(defaults[1].trend, Trend::Up);
        assert!(defaults.iter().all(|d| d.source_url == DEFAULT_SOURCE_URL));
    }

    #[test]
    fn test_predefined_metrics() {
        let metrics = predefined_metrics();

        assert_eq!(metrics.len(), 5);
        assert_eq!(metrics[1].name, "Bulk Dealings");
        assert_eq!(metrics[1].change_percentage, -1.8);
        assert_eq!(metrics[4].trend, Trend::Stable);
    }

    #[test]
    fn test_showcase_position_lookup() {
        assert_eq!(showcase_indicator(1).1.name, "VIX Fear Index");
        assert_eq!(showcase_indicator(6), (6, &SHOWCASE_INDICATORS[5]));
        // Out of range falls back to the first entry
        assert_eq!(showcase_indicator(7).0, 1);
        assert_eq!(showcase_indicator(0).1.name, "VIX Fear Index");
        assert_eq!(showcase_metric(-3), (1, &SHOWCASE_METRICS[0]));
        assert_eq!(showcase_metric(2).1.name, "Bulk Dealings");
    }
}
