#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use timeline_board::{
        BoardConfig, BoardManager, JsonFileStore, KeyedBoardStore, MemoryStore, http_api,
    };
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let addr: SocketAddr = std::env::var("TIMELINE_BOARD_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = BoardConfig::from_env()?;
    let board = match &config.storage.path {
        Some(path) => BoardManager::load(JsonFileStore::new(path)),
        None => BoardManager::load(KeyedBoardStore::new(MemoryStore::new(), &config.storage.key)),
    };

    tracing::info!("timeline-board HTTP API listening on http://{addr}");
    let state = http_api::AppState::new(board).with_layout(config.layout.clone());
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
