use axum::{extract::State, response::Json, routing::post, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::{run_with_budget, today, AppState};
use crate::models::{CyclePrediction, CycleProfile, CycleStats, CycleSummary, LoggedCycle, PhaseDetail, ProfileWarning};
use crate::services::cycle_predictor::{DEFAULT_CYCLES_AHEAD, MAX_CYCLES_AHEAD};
use crate::services::CycleHistory;

#[derive(Debug, Deserialize)]
pub struct PhaseRequest {
    pub profile: CycleProfile,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PhaseResponse {
    #[serde(flatten)]
    pub detail: PhaseDetail,
    pub display_name: &'static str,
    pub energy: &'static str,
    pub warnings: Vec<ProfileWarning>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub profile: CycleProfile,
    pub today: Option<NaiveDate>,
    pub cycles_ahead: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub profile: CycleProfile,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    pub cycles: Vec<LoggedCycle>,
    /// Stored profile the suggestion starts from.
    #[serde(default)]
    pub profile: CycleProfile,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CycleStats,
    pub suggested_profile: CycleProfile,
}

pub fn cycle_routes(state: AppState) -> Router {
    Router::new()
        .route("/phase", post(phase_for_date))
        .route("/predict", post(predict_cycles))
        .route("/summary", post(cycle_summary))
        .route("/stats", post(cycle_stats))
        .with_state(state)
}

/// Phase of a single date
pub async fn phase_for_date(
    State(state): State<AppState>,
    Json(request): Json<PhaseRequest>,
) -> Json<PhaseResponse> {
    let date = request.date.unwrap_or_else(today);
    let detail = state.calculator.phase_detail(date, &request.profile);
    let traits = detail.phase.traits();

    Json(PhaseResponse {
        detail,
        display_name: traits.display_name,
        energy: traits.energy,
        warnings: request.profile.validate(),
    })
}

/// Upcoming cycle starts and the daily phase table
pub async fn predict_cycles(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<CyclePrediction>, ApiError> {
    let cycles_ahead = request.cycles_ahead.unwrap_or(DEFAULT_CYCLES_AHEAD);
    if cycles_ahead == 0 || cycles_ahead > MAX_CYCLES_AHEAD {
        return Err(ApiError::Validation(format!(
            "cycles_ahead must be between 1 and {}, got {}",
            MAX_CYCLES_AHEAD, cycles_ahead
        )));
    }

    let today = request.today.unwrap_or_else(today);
    let predictor = state.predictor.clone();
    let profile = request.profile;

    let prediction = run_with_budget(state.plan_budget(), move || {
        predictor.predict_cycles(&profile, today, cycles_ahead)
    })
    .await?;

    Ok(Json(prediction))
}

pub async fn cycle_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Json<CycleSummary> {
    let today = request.today.unwrap_or_else(today);
    Json(state.predictor.summary(&request.profile, today))
}

/// History statistics and the profile they suggest
pub async fn cycle_stats(Json(request): Json<StatsRequest>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: CycleHistory::stats(&request.cycles),
        suggested_profile: CycleHistory::profile_from(&request.cycles, &request.profile),
    })
}
