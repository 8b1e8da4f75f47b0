use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::catalog::catalog_routes;
use super::cycle::cycle_routes;
use super::health::health_check;
use super::plans::plan_routes;
use super::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let api_v1 = Router::new()
        .nest("/catalog", catalog_routes(state.clone()))
        .nest("/cycle", cycle_routes(state.clone()))
        .nest("/plans", plan_routes(state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
