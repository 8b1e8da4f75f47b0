use axum::{extract::State, response::Json, routing::post, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ApiError;
use super::state::{run_with_budget, today, AppState};
use crate::models::{
    CycleProfile, PlanBreakdown, PlanEntry, RacePlan, RacePlanRequest, UserFitnessPreferences,
    WorkoutCatalogEntry,
};
use crate::services::FitnessPlanScheduler;

#[derive(Debug, Deserialize)]
pub struct FitnessPlanRequest {
    pub profile: CycleProfile,
    #[serde(default)]
    pub preferences: UserFitnessPreferences,
    /// Overrides the today/tomorrow resolution when present.
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_tomorrow: bool,
    /// Replaces the server catalog for this request.
    pub catalog: Option<Vec<WorkoutCatalogEntry>>,
}

#[derive(Debug, Serialize)]
pub struct FitnessPlanResponse {
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub entries: Vec<PlanEntry>,
    pub breakdown: PlanBreakdown,
}

pub fn plan_routes(state: AppState) -> Router {
    Router::new()
        .route("/fitness", post(generate_fitness_plan))
        .route("/race", post(generate_race_plan))
        .with_state(state)
}

/// Generate a 14-day fitness plan
pub async fn generate_fitness_plan(
    State(state): State<AppState>,
    Json(request): Json<FitnessPlanRequest>,
) -> Result<Json<FitnessPlanResponse>, ApiError> {
    request.preferences.validate()?;

    let start_date = request
        .start_date
        .unwrap_or_else(|| FitnessPlanScheduler::start_date_for(today(), request.start_tomorrow));
    let catalog = match request.catalog {
        Some(catalog) => catalog,
        None => state.catalog.as_ref().clone(),
    };
    let scheduler = state.scheduler.clone();
    let profile = request.profile;
    let preferences = request.preferences;

    let entries = run_with_budget(state.plan_budget(), move || {
        scheduler.generate(&profile, &preferences, start_date, &catalog)
    })
    .await?;

    let plan_id = Uuid::new_v4();
    tracing::info!("Generated fitness plan {} starting {}", plan_id, start_date);

    Ok(Json(FitnessPlanResponse {
        plan_id,
        start_date,
        breakdown: PlanBreakdown::from_entries(&entries),
        entries,
    }))
}

/// Generate a race training plan
pub async fn generate_race_plan(
    State(state): State<AppState>,
    Json(request): Json<RacePlanRequest>,
) -> Result<Json<RacePlan>, ApiError> {
    request.validate()?;

    let planner = state.race_planner.clone();
    let plan = run_with_budget(state.plan_budget(), move || planner.generate(&request)).await?;

    Ok(Json(plan))
}
