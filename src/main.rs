use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use medlit_search::{
    config::Config,
    create_router,
    enrichment::EnrichmentClient,
    search::ParallelSearchClient,
    utils::init_logger,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Clients are built once and shared through the router state
    let search = ParallelSearchClient::from_config(&config.search)
        .map_err(|e| anyhow::anyhow!("Failed to create search client: {}", e))?;
    let enricher = EnrichmentClient::from_config(&config.llm);

    let state = AppState::new(config.clone(), Arc::new(search), Arc::new(enricher));
    let app = create_router(state);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid HOST {}: {}", config.server.host, e))?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
