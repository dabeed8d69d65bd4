use chrono::Utc;
use dotenvy::dotenv;
use tourops::{
    config::{self, database},
    core::{DataStore, report},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load application settings
    let app_config = config::load_or_default(CONFIG_PATH)
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Open the store and load every collection
    let database_url = database::get_database_url(app_config.database_url.as_deref());
    let dashboard_settings = app_config.dashboard;
    let store = DataStore::open(&database_url, app_config)
        .await
        .inspect(|_| info!("Store opened at {}", database_url))
        .inspect_err(|e| error!("Failed to open store: {}", e))?;

    // 5. Report where things stand
    let snapshot = store.snapshot().await;
    let summary = report::dashboard_summary(&snapshot, Utc::now(), &dashboard_settings);
    info!("\n{}", report::format_dashboard_summary(&summary));

    Ok(())
}
