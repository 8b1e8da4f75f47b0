use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Args;
use cyclefit::models::{RaceGoal, RacePlanRequest, RaceType, RunnerLevel};
use cyclefit::services::{PhaseCalculator, RaceTrainingPlanner};
use serde::de::DeserializeOwned;

use super::ProfileArgs;
use crate::config::Config;
use crate::output;

/// Default plan length when no start date is given.
const DEFAULT_TRAINING_WEEKS: i64 = 12;

/// Parse a CLI value using the model's serde names (e.g. `half_marathon`).
fn parse_serde<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    let normalized = value.trim().to_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("unrecognized value '{}'", value))
}

#[derive(Args)]
pub struct RaceCommand {
    /// Race distance: 5k, 10k, half_marathon, marathon
    #[arg(short = 't', long = "type", value_parser = parse_serde::<RaceType>)]
    race_type: RaceType,

    /// Race day (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,

    /// First training day (defaults to twelve weeks before race day)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Runner level: beginner, intermediate, advanced
    #[arg(short, long, default_value = "beginner", value_parser = parse_serde::<RunnerLevel>)]
    level: RunnerLevel,

    /// Goal: finish or personal_best
    #[arg(short, long, default_value = "finish", value_parser = parse_serde::<RaceGoal>)]
    goal: RaceGoal,

    /// Running days per week
    #[arg(long, default_value = "3")]
    run_days: u8,

    /// Cross-training days per week
    #[arg(long, default_value = "2")]
    cross_train_days: u8,

    /// Rest days per week
    #[arg(long, default_value = "2")]
    rest_days: u8,

    /// Annotate days with cycle-phase advice
    #[arg(long)]
    cycle_aware: bool,

    #[command(flatten)]
    profile: ProfileArgs,

    /// Print JSON instead of a weekly listing
    #[arg(long)]
    json: bool,
}

impl RaceCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let training_start = self
            .start
            .unwrap_or_else(|| self.date - Duration::weeks(DEFAULT_TRAINING_WEEKS));

        let request = RacePlanRequest {
            race_type: self.race_type,
            race_date: self.date,
            training_start,
            runner_level: self.level,
            run_days: self.run_days,
            cross_train_days: self.cross_train_days,
            rest_days: self.rest_days,
            goal: self.goal,
            cycle_profile: self.cycle_aware.then(|| self.profile.apply(&config.cycle)),
        };
        request.validate().context("Invalid race plan request")?;

        tracing::debug!(race = %request.race_type, start = %training_start, "Generating race plan");
        let plan = RaceTrainingPlanner::new(PhaseCalculator::new()).generate(&request);

        if self.json {
            return output::print_json(&plan);
        }

        output::print_race_plan(&plan, &config.ui.date_format);
        Ok(())
    }
}
