use anyhow::{Context, Result};
use pseudo_localizer::{catalog::Catalog, config::Config, server, service::StringService};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pseudo_localizer=info".parse()?),
        )
        .init();

    let config_path = Config::path_from_env();
    let config = Config::load(&config_path)?;

    let catalog = Catalog::load(config.layout(), config.length_multipliers.clone())
        .with_context(|| format!("Failed to load properties files from {}", config.props_dir.display()))?;

    let languages: Vec<String> = catalog.languages().iter().map(ToString::to_string).collect();
    info!("Loaded languages: {:?}", languages);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let service = Arc::new(StringService::new(catalog, config).with_config_path(config_path));
    let app = server::create_router(service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server starting on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
