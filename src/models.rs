// LucidQuant - Data Model
// Indicators, metrics and their per-date history points

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CATEGORY
// ============================================================================

/// Indicator category. The set is open: anything the store holds that is not
/// one of the known labels is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Category {
    Economic,
    Sentiment,
    Behavioral,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Economic => "Economic",
            Category::Sentiment => "Sentiment",
            Category::Behavioral => "Behavioral",
            Category::Other(label) => label,
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        match label {
            "Economic" => Category::Economic,
            "Sentiment" => Category::Sentiment,
            "Behavioral" => Category::Behavioral,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from(label.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// TREND
// ============================================================================

/// Qualitative direction label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Up, Trend::Down, Trend::Stable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }

    pub fn parse(label: &str) -> Option<Trend> {
        match label {
            "up" => Some(Trend::Up),
            "down" => Some(Trend::Down),
            "stable" => Some(Trend::Stable),
            _ => None,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// STORED ROWS
// ============================================================================

/// Indicator row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub current_value: f64,
    pub trend: Trend,
    pub last_updated: DateTime<Utc>,
    pub source_url: String,
}

/// Metric row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub current_value: f64,
    pub change_percentage: f64,
    pub trend: Trend,
    pub last_updated: DateTime<Utc>,
}

/// Historical point for an indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorData {
    pub id: i64,
    pub indicator_id: i64,
    pub value: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Historical point for a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub id: i64,
    pub metric_id: i64,
    pub value: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// DRAFTS (rows about to be inserted - no id, no timestamp yet)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIndicator {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub current_value: f64,
    pub trend: Trend,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMetric {
    pub name: String,
    pub description: String,
    pub current_value: f64,
    pub change_percentage: f64,
    pub trend: Trend,
}
