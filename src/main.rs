use anyhow::Context;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use todo_rest::{SharedData, app_env, build_router, db, logging, persistence, ui};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let dotenv_loaded = dotenv().is_ok();

    let env_filter = logging::init_env_filter()?;
    let otel_exporters = logging::OtelEndpoints::from_env()
        .map(|endpoints| logging::init_exporters(&endpoints))
        .transpose()?;
    let exporting = otel_exporters.is_some();
    logging::setup_logging_and_tracing(env_filter, otel_exporters);

    if !dotenv_loaded {
        warn!("No .env file found, reading configuration from the environment only");
    }
    if !exporting {
        info!("OpenTelemetry export URLs not set, traces and metrics stay local");
    }

    info!("Connecting to database...");
    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("{} must be set", app_env::DB_URL))?;
    let sqlx_db_connection = db::connect_sqlx(&db_url)
        .await
        .context("connecting to the database")?;
    db::ensure_schema(&sqlx_db_connection)
        .await
        .context("creating the todo table")?;

    let templates = ui::PageTemplates::load().context("loading page templates")?;
    let shared_data = Arc::new(SharedData::new(
        persistence::ExternalConnectivity::new(sqlx_db_connection),
        templates,
    ));
    let router = build_router(shared_data);

    let bind_address = env::var(app_env::BIND_ADDRESS)
        .unwrap_or_else(|_| app_env::DEFAULT_BIND_ADDRESS.to_owned());
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding to {bind_address}"))?;

    info!("Starting server on {bind_address}.");
    axum::serve(listener, router)
        .await
        .context("running the HTTP server")?;

    Ok(())
}
