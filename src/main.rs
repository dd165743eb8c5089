use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lucidquant::{
    get_all_indicators, get_all_metrics, open_database, telemetry, HttpFetcher, IndicatorSource,
    Refresher, Settings,
};

#[derive(Parser)]
#[command(name = "lucidquant")]
#[command(about = "LucidQuant indicator store maintenance", version)]
struct Cli {
    /// SQLite database file (overrides LUCIDQUANT_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema if it does not exist yet
    Init,
    /// Replace all indicators and metrics with a fresh set
    Refresh,
    /// Print stored indicators
    Indicators,
    /// Print stored metrics
    Metrics,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let cli = Cli::parse();
    let mut settings = Settings::load();
    if let Some(db) = cli.db {
        settings.database_path = db;
    }

    match cli.command {
        Commands::Init => run_init(&settings),
        Commands::Refresh => run_refresh(&settings).await,
        Commands::Indicators => run_list_indicators(&settings),
        Commands::Metrics => run_list_metrics(&settings),
    }
}

fn run_init(settings: &Settings) -> Result<()> {
    open_database(&settings.database_path)?;
    println!("✓ Database ready: {:?}", settings.database_path);
    Ok(())
}

async fn run_refresh(settings: &Settings) -> Result<()> {
    println!("🔄 LucidQuant - Data Refresh");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Source: {}", settings.source_url);

    let mut conn = open_database(&settings.database_path)?;
    let refresher = Refresher::new(HttpFetcher::new()?, settings.source_url.clone());

    let summary = refresher.refresh(&mut conn).await?;

    if summary.source == IndicatorSource::Defaults {
        println!("⚠️  Source page unavailable, stored default indicators");
    }
    println!("✓ Indicators: {}", summary.indicators);
    println!("✓ Metrics: {}", summary.metrics);
    println!("🎉 Database populated successfully!");

    Ok(())
}

fn run_list_indicators(settings: &Settings) -> Result<()> {
    let conn = open_database(&settings.database_path)?;
    let indicators = get_all_indicators(&conn)?;

    if indicators.is_empty() {
        println!("No indicators stored yet. Run: lucidquant refresh");
        return Ok(());
    }

    for indicator in indicators {
        println!(
            "{:>3}  {:<28} {:<11} {:>10.2}  {:<6} {}",
            indicator.id,
            indicator.name,
            indicator.category,
            indicator.current_value,
            indicator.trend,
            indicator.last_updated.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}

fn run_list_metrics(settings: &Settings) -> Result<()> {
    let conn = open_database(&settings.database_path)?;
    let metrics = get_all_metrics(&conn)?;

    if metrics.is_empty() {
        println!("No metrics stored yet. Run: lucidquant refresh");
        return Ok(());
    }

    for metric in metrics {
        println!(
            "{:>3}  {:<38} {:>10.2}  {:>+6.1}%  {}",
            metric.id, metric.name, metric.current_value, metric.change_percentage, metric.trend,
        );
    }

    Ok(())
}
