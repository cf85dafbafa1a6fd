//! Marketscope Web Server
//!
//! Axum-based HTTP surface: the interactive home page, analysis requests,
//! report listing and download, backend status. Unknown paths answer a JSON
//! 404.

pub mod error;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;
pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/analyze", post(routes::analyze::analyze))
        .route("/reports", get(routes::reports::list_reports))
        .route("/download/{filename}", get(routes::reports::download))
        .route("/backend", get(routes::backend::status))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::home::index))
        .route("/health", get(routes::health::health))
        .nest("/api", api_routes)
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
