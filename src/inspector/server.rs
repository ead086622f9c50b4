//! HTTP server implementation

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tracing::info;

use super::handlers::{
    get_item, get_ttl_item, list_items, list_keys, put_item, remove_item, remove_items, stats,
    AppState,
};

/// Build the inspector router
pub fn router(storage: AppState) -> Router {
    Router::new()
        .route("/keys", get(list_keys))
        .route("/items", get(list_items).delete(remove_items))
        .route("/items/:key", get(get_item).put(put_item).delete(remove_item))
        .route("/ttl/:key", get(get_ttl_item))
        .route("/stats", get(stats))
        .layer(CorsLayer::permissive())
        .with_state(storage)
}

/// Run the web server
pub async fn run_web_server(addr: &str, storage: AppState) -> anyhow::Result<()> {
    let app = router(storage);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Web inspector available at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
