use keyshelf::{default_storage, inspector, StorageAdapter};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("keyshelf inspector starting...");

    // Storage comes from KEYSHELF_CONFIG / KEYSHELF_PATH
    let storage = match default_storage() {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to open storage: {}", e);
            std::process::exit(1);
        }
    };
    info!("Storage holds {} keys", storage.len());

    let addr = std::env::var("KEYSHELF_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    if let Err(e) = inspector::run_web_server(&addr, storage).await {
        error!("Web inspector error: {:#}", e);
        std::process::exit(1);
    }
}
