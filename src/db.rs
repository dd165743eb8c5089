use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;

use crate::models::{
    Category, Indicator, IndicatorData, Metric, MetricData, NewIndicator, NewMetric, Trend,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {:?}", db_path))?;
    setup_database(&conn)?;
    Ok(conn)
}

/// Open an existing database for one unit of work (no schema setup).
/// A missing file is an error, never silently recreated empty.
pub fn connect(db_path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(db_path, flags)
        .with_context(|| format!("Failed to open database at {:?}", db_path))?;
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Data points must always point at a live parent
    conn.pragma_update(None, "foreign_keys", true)?;

    // ==========================================================================
    // Parent tables
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS indicators (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            current_value REAL NOT NULL,
            trend TEXT NOT NULL,
            last_updated TEXT NOT NULL,
            source_url TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS metrics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            description TEXT NOT NULL,
            current_value REAL NOT NULL,
            change_percentage REAL NOT NULL,
            trend TEXT NOT NULL,
            last_updated TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // History tables (many-to-one, parent required)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS indicator_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            indicator_id INTEGER NOT NULL REFERENCES indicators(id),
            value REAL NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS metric_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            metric_id INTEGER NOT NULL REFERENCES metrics(id),
            value REAL NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_indicator_data_parent ON indicator_data(indicator_id, date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_metric_data_parent ON metric_data(metric_id, date)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// Writes used by the refresh transaction
// (plain rusqlite::Result so the caller can map them to RefreshError)
// ============================================================================

/// Delete every row, children before parents
pub fn clear_all(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM indicator_data", [])?;
    conn.execute("DELETE FROM metric_data", [])?;
    conn.execute("DELETE FROM indicators", [])?;
    conn.execute("DELETE FROM metrics", [])?;
    Ok(())
}

pub fn insert_indicator(
    conn: &Connection,
    indicator: &NewIndicator,
    last_updated: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO indicators (
            name, description, category, current_value, trend, last_updated, source_url
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            indicator.name,
            indicator.description,
            indicator.category.as_str(),
            indicator.current_value,
            indicator.trend.as_str(),
            last_updated.to_rfc3339(),
            indicator.source_url,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn insert_metric(
    conn: &Connection,
    metric: &NewMetric,
    last_updated: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO metrics (
            name, description, current_value, change_percentage, trend, last_updated
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            metric.name,
            metric.description,
            metric.current_value,
            metric.change_percentage,
            metric.trend.as_str(),
            last_updated.to_rfc3339(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

// ============================================================================
// History points
// ============================================================================

pub fn insert_indicator_data(
    conn: &Connection,
    indicator_id: i64,
    value: f64,
    date: NaiveDate,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO indicator_data (indicator_id, value, date, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            indicator_id,
            value,
            date.format(DATE_FORMAT).to_string(),
            Utc::now().to_rfc3339(),
        ],
    )
    .with_context(|| format!("Failed to record data point for indicator {}", indicator_id))?;

    Ok(conn.last_insert_rowid())
}

pub fn insert_metric_data(
    conn: &Connection,
    metric_id: i64,
    value: f64,
    date: NaiveDate,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO metric_data (metric_id, value, date, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            metric_id,
            value,
            date.format(DATE_FORMAT).to_string(),
            Utc::now().to_rfc3339(),
        ],
    )
    .with_context(|| format!("Failed to record data point for metric {}", metric_id))?;

    Ok(conn.last_insert_rowid())
}

/// Data points for one indicator, oldest first
pub fn get_indicator_history(conn: &Connection, indicator_id: i64) -> Result<Vec<IndicatorData>> {
    let mut stmt = conn.prepare(
        "SELECT id, indicator_id, value, date, created_at
         FROM indicator_data
         WHERE indicator_id = ?1
         ORDER BY date ASC, id ASC",
    )?;

    let points = stmt
        .query_map([indicator_id], |row| {
            Ok(IndicatorData {
                id: row.get(0)?,
                indicator_id: row.get(1)?,
                value: row.get(2)?,
                date: date_column(row, 3)?,
                created_at: timestamp_column(row, 4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(points)
}

/// Data points for one metric, oldest first
pub fn get_metric_history(conn: &Connection, metric_id: i64) -> Result<Vec<MetricData>> {
    let mut stmt = conn.prepare(
        "SELECT id, metric_id, value, date, created_at
         FROM metric_data
         WHERE metric_id = ?1
         ORDER BY date ASC, id ASC",
    )?;

    let points = stmt
        .query_map([metric_id], |row| {
            Ok(MetricData {
                id: row.get(0)?,
                metric_id: row.get(1)?,
                value: row.get(2)?,
                date: date_column(row, 3)?,
                created_at: timestamp_column(row, 4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(points)
}

// ============================================================================
// Reads (empty tables give empty results, never errors)
// ============================================================================

const INDICATOR_COLUMNS: &str =
    "id, name, description, category, current_value, trend, last_updated, source_url";

const METRIC_COLUMNS: &str =
    "id, name, description, current_value, change_percentage, trend, last_updated";

fn indicator_from_row(row: &Row<'_>) -> rusqlite::Result<Indicator> {
    let category: String = row.get(3)?;

    Ok(Indicator {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: Category::from(category),
        current_value: row.get(4)?,
        trend: trend_column(row, 5)?,
        last_updated: timestamp_column(row, 6)?,
        source_url: row.get(7)?,
    })
}

fn metric_from_row(row: &Row<'_>) -> rusqlite::Result<Metric> {
    Ok(Metric {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        current_value: row.get(3)?,
        change_percentage: row.get(4)?,
        trend: trend_column(row, 5)?,
        last_updated: timestamp_column(row, 6)?,
    })
}

pub fn get_all_indicators(conn: &Connection) -> Result<Vec<Indicator>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM indicators ORDER BY id ASC",
        INDICATOR_COLUMNS
    ))?;

    let indicators = stmt
        .query_map([], indicator_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(indicators)
}

pub fn get_indicator(conn: &Connection, id: i64) -> Result<Option<Indicator>> {
    let indicator = conn
        .query_row(
            &format!("SELECT {} FROM indicators WHERE id = ?1", INDICATOR_COLUMNS),
            [id],
            indicator_from_row,
        )
        .optional()?;

    Ok(indicator)
}

pub fn get_all_metrics(conn: &Connection) -> Result<Vec<Metric>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM metrics ORDER BY id ASC",
        METRIC_COLUMNS
    ))?;

    let metrics = stmt
        .query_map([], metric_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(metrics)
}

pub fn get_metric(conn: &Connection, id: i64) -> Result<Option<Metric>> {
    let metric = conn
        .query_row(
            &format!("SELECT {} FROM metrics WHERE id = ?1", METRIC_COLUMNS),
            [id],
            metric_from_row,
        )
        .optional()?;

    Ok(metric)
}

pub fn count_indicators(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM indicators", [], |row| row.get(0))?;

    Ok(count)
}

pub fn count_metrics(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM metrics", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// Column decoding
// ============================================================================

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn trend_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Trend> {
    let raw: String = row.get(idx)?;
    Trend::parse(&raw).ok_or_else(|| {
        conversion_error(
            idx,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unknown trend {:?}", raw),
            ),
        )
    })
}
