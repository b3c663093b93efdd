use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use spectrum_core::{seed, CoreConfig, Db};

/// Main entry point for the Spectrum complaint registration service.
///
/// Opens (and migrates) the SQLite database, seeds the category taxonomy,
/// optionally seeds demo patients and cases, and serves the REST API.
///
/// # Environment Variables
/// - `SPECTRUM_DB_PATH`: SQLite database file (default: "spectrum.db")
/// - `SPECTRUM_SEED_DEMO_DATA`: seed demo patients and cases when "1" or "true"
/// - `SPECTRUM_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spectrum_core=info".parse()?)
                .add_directive("spectrum_run=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_path: PathBuf = std::env::var("SPECTRUM_DB_PATH")
        .unwrap_or_else(|_| "spectrum.db".into())
        .into();
    let seed_demo = std::env::var("SPECTRUM_SEED_DEMO_DATA")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let rest_addr = std::env::var("SPECTRUM_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = CoreConfig::new(db_path, seed_demo);
    let db = Arc::new(Db::open(config.db_path())?);

    let categories = seed::seed_categories(&db)?;
    if categories > 0 {
        tracing::info!("++ Seeded {} complaint categories", categories);
    }
    if config.seed_demo_data() {
        seed::seed_demo_data(&db)?;
        tracing::info!("++ Seeded demo patients and cases");
    }

    tracing::info!(
        "++ Starting Spectrum REST on {} (db: {})",
        rest_addr,
        config.db_path().display()
    );

    let app = api_rest::router(AppState::new(db));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
