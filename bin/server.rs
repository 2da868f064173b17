// Process Pension - Web Server

use anyhow::{Context, Result};
use process_pension::{
    api, logging::init_logging, setup_database, AppConfig, HttpAuthorizationClient,
    HttpPensionerDetailClient, ProcessPensionService, SqlitePensionerRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config);

    // Open database
    let conn = Connection::open(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path))?;
    setup_database(&conn)?;
    info!("Database opened: {}", config.database_path);

    // Wire collaborators
    let authorization = HttpAuthorizationClient::new(&config.auth_service_url, config.upstream_timeout())?;
    let pensioner_details = HttpPensionerDetailClient::new(
        &config.pensioner_detail_service_url,
        config.upstream_timeout(),
    )?;
    let repository = SqlitePensionerRepository::new(Arc::new(Mutex::new(conn)));

    let service = ProcessPensionService::new(
        Arc::new(authorization),
        Arc::new(pensioner_details),
        Arc::new(repository),
    );

    let app = api::router(service);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Authorization service: {}", config.auth_service_url);
    info!("Pensioner detail service: {}", config.pensioner_detail_service_url);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
