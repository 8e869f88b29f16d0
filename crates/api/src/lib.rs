pub mod routes;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use common::MarketDataProvider;
use strategy::StrategyRegistry;

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<StrategyRegistry>,
    pub provider: Arc<dyn MarketDataProvider>,
    /// Symbols evaluated concurrently within one scan request.
    pub scan_concurrency: usize,
}

/// All routes with the shared middleware stack applied.
pub fn router(state: AppState) -> Router {
    with_layers(
        Router::new()
            .merge(routes::api_router())
            .merge(routes::health_router())
            .with_state(state),
    )
}

fn with_layers(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_headers(AnyOrigin)
        .allow_methods(AnyOrigin);

    app.layer(CatchPanicLayer::custom(internal_error))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Panics never leak detail to the client.
fn internal_error(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Build and run the Axum API server.
pub async fn serve(state: AppState, port: u16) -> common::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, strategies = state.registry.len(), "Scanner API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
