use axum::routing::{get, post};
use axum::Router;
use tl_remote::{endpoints, BASE_PATH};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the router: the ledger API under `/fluree` plus `/health`.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(endpoints::CREATE, post(handler::create_handler))
        .route(endpoints::TRANSACT, post(handler::transact_handler))
        .route(endpoints::QUERY, post(handler::query_handler));

    Router::new()
        .nest(BASE_PATH, api)
        .route("/health", get(handler::health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
