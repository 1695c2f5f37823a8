//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let paths = Router::new()
        .route("/", get(handlers::get_paths))
        .route("/keywords/{name}", get(handlers::get_path_kwargs))
        .route(
            "/{name}",
            get(handlers::get_path_name).post(handlers::post_path_name),
        );

    let query = Router::new()
        .route("/main", get(handlers::main_search))
        .route("/cone", get(handlers::cone_search))
        .route("/sdssid", get(handlers::sdss_id_search))
        .route("/catalogid", get(handlers::catalog_id_search));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/paths", paths)
        .nest("/query", query)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::LocalPathRegistry;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(
            Arc::new(LocalPathRegistry::default()),
            Arc::new(LocalRepository::new()),
        );
        let _router = create_router(state);
    }
}
