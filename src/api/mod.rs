//! REST facade over [`StatXploreClient`].

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::client::StatXploreClient;

pub use error::{AppError, ErrorResponse};

#[derive(Clone)]
pub struct AppState {
    pub client: StatXploreClient,
}

/// Build the axum router with all routes and middleware.
pub fn build_router(client: StatXploreClient) -> Router {
    let state = AppState { client };

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/databases", get(routes::list_databases))
        .route("/schema", get(routes::get_root_schema))
        .route("/schema/*schema_id", get(routes::get_schema))
        .route("/database/*database_id", get(routes::get_database))
        .route("/table", post(routes::query_table))
        .route("/table/simple", post(routes::query_table_simple))
        .route("/rate_limit", get(routes::get_rate_limit))
        .route("/info", get(routes::get_info))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
