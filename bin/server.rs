// LucidQuant - Web Server
// JSON API + admin refresh with Axum

use anyhow::Result;
use std::sync::Arc;

use lucidquant::web::{self, AppState};
use lucidquant::{open_database, telemetry, HttpFetcher, PageFetcher, Refresher, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let settings = Settings::load();

    // Make sure the schema exists before the first request
    open_database(&settings.database_path)?;
    tracing::info!(path = ?settings.database_path, "database ready");

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new()?);
    let refresher = Arc::new(Refresher::new(fetcher, settings.source_url.clone()));
    let app = web::router(AppState::new(settings.database_path.clone(), refresher));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "LucidQuant listening");
    println!("\n🚀 Server running on http://{}", settings.bind_addr);
    println!("   API:   /api/indicators, /api/metrics");
    println!("   Admin: /admin/populate-data");

    axum::serve(listener, app).await?;

    Ok(())
}
