use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use cyclefit::config::load_catalog;
use cyclefit::models::PlanBreakdown;
use cyclefit::services::FitnessPlanScheduler;
use serde_json::json;

use super::{today, ProfileArgs};
use crate::config::Config;
use crate::output;

#[derive(Args)]
pub struct PlanCommand {
    /// First plan day (YYYY-MM-DD); overrides --tomorrow
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Start the plan tomorrow instead of today
    #[arg(long)]
    tomorrow: bool,

    /// Start the plan today even if the config says tomorrow
    #[arg(long, conflicts_with = "tomorrow")]
    today: bool,

    /// Workouts per week (1-6)
    #[arg(short, long)]
    frequency: Option<u8>,

    #[command(flatten)]
    profile: ProfileArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl PlanCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let profile = self.profile.apply(&config.cycle);

        let mut preferences = config.fitness.clone();
        if let Some(frequency) = self.frequency {
            preferences.workouts_per_week = frequency;
        }
        preferences.validate()?;

        let start_tomorrow = if self.today {
            false
        } else {
            self.tomorrow || config.ui.start_tomorrow
        };
        let start_date = self
            .start
            .unwrap_or_else(|| FitnessPlanScheduler::start_date_for(today(), start_tomorrow));

        let catalog = load_catalog(config.catalog.path.as_deref())?;
        let entries = FitnessPlanScheduler::default().generate(&profile, &preferences, start_date, &catalog);

        if self.json {
            return output::print_json(&json!({
                "start_date": start_date,
                "entries": entries,
                "breakdown": PlanBreakdown::from_entries(&entries),
            }));
        }

        output::print_warnings(&profile.validate());
        output::print_plan(&entries, &config.ui.date_format);
        Ok(())
    }
}
