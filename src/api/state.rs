use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use super::error::ApiError;
use crate::config::AppConfig;
use crate::models::WorkoutCatalogEntry;
use crate::services::{CyclePredictor, FitnessPlanScheduler, PhaseCalculator, RaceTrainingPlanner};

/// Shared handler state. Services are stateless apart from the predictor cache.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Vec<WorkoutCatalogEntry>>,
    pub calculator: PhaseCalculator,
    pub predictor: Arc<CyclePredictor>,
    pub scheduler: FitnessPlanScheduler,
    pub race_planner: RaceTrainingPlanner,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Vec<WorkoutCatalogEntry>) -> Self {
        let calculator = PhaseCalculator::new();

        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            predictor: Arc::new(CyclePredictor::new(calculator.clone())),
            scheduler: FitnessPlanScheduler::new(calculator.clone()),
            race_planner: RaceTrainingPlanner::new(calculator.clone()),
            calculator,
        }
    }

    pub fn plan_budget(&self) -> Duration {
        self.config.plan_timeout()
    }
}

/// Date the shells treat as "today".
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Run CPU-bound generation off the async runtime within `budget`.
pub async fn run_with_budget<T, F>(budget: Duration, job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::time::timeout(budget, tokio::task::spawn_blocking(job)).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(join_error)) => Err(ApiError::Internal(join_error.to_string())),
        Err(_) => Err(ApiError::Timeout(budget.as_millis() as u64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_budget_allows_fast_jobs() {
        let result = run_with_budget(Duration::from_secs(1), || 2 + 2).await;
        assert_matches!(result, Ok(4));
    }

    #[tokio::test]
    async fn test_slow_job_times_out() {
        let result = run_with_budget(Duration::from_millis(10), || {
            std::thread::sleep(Duration::from_millis(200));
        })
        .await;
        assert_matches!(result, Err(ApiError::Timeout(10)));
    }
}
