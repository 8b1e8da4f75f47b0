use cyclefit::api::{routes::create_routes, AppState};
use cyclefit::config::{default_catalog, load_catalog, AppConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let catalog = match load_catalog(config.catalog_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("{:#}, falling back to the built-in catalog", e);
            default_catalog()
        }
    };
    info!("Serving {} catalog entries", catalog.len());

    let address = config.server_address();
    let app = create_routes(AppState::new(config, catalog));

    let listener = TcpListener::bind(&address).await?;
    info!("Cyclefit server starting on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
