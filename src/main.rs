use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shop_admin::{create_api_router, store, AdminService, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().inspect_err(|err| error!(error = %err, "Invalid configuration"))?;
    let source = store::connect(&config)
        .await
        .inspect_err(|err| error!(error = %err, "Failed to prepare data source"))?;

    let service = Arc::new(AdminService::new(source, config.order_status_policy));
    let app = create_api_router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, source = ?config.data_source, "Running");
    axum::serve(listener, app).await?;
    Ok(())
}
