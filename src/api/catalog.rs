use axum::{extract::State, response::Json, routing::get, Router};

use super::state::AppState;
use crate::models::WorkoutCatalogEntry;

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_catalog))
        .with_state(state)
}

/// Catalog used when a plan request does not bring its own.
pub async fn list_catalog(State(state): State<AppState>) -> Json<Vec<WorkoutCatalogEntry>> {
    Json(state.catalog.as_ref().clone())
}
