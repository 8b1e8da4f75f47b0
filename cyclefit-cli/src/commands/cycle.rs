use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Args;
use cyclefit::services::cycle_predictor::MAX_CYCLES_AHEAD;
use cyclefit::services::{CyclePredictor, PhaseCalculator};
use serde_json::json;

use super::{today, ProfileArgs};
use crate::config::Config;
use crate::output;

#[derive(Args)]
pub struct PhaseCommand {
    /// Date to classify (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    #[command(flatten)]
    profile: ProfileArgs,

    /// Print JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl PhaseCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let profile = self.profile.apply(&config.cycle);
        let date = self.date.unwrap_or_else(today);

        let predictor = CyclePredictor::new(PhaseCalculator::new());
        let detail = predictor.calculator().phase_detail(date, &profile);
        let summary = predictor.summary(&profile, date);
        let warnings = profile.validate();

        if self.json {
            return output::print_json(&json!({
                "detail": detail,
                "summary": summary,
                "warnings": warnings,
            }));
        }

        output::print_warnings(&warnings);
        output::print_phase(&detail, &summary, &config.ui.date_format);
        Ok(())
    }
}

#[derive(Args)]
pub struct PredictCommand {
    /// Reference date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Number of cycles to predict
    #[arg(short, long, default_value = "3")]
    cycles: usize,

    #[command(flatten)]
    profile: ProfileArgs,

    /// Print JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl PredictCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        if self.cycles == 0 || self.cycles > MAX_CYCLES_AHEAD {
            bail!("--cycles must be between 1 and {}, got {}", MAX_CYCLES_AHEAD, self.cycles);
        }

        let profile = self.profile.apply(&config.cycle);
        let today = self.today.unwrap_or_else(today);
        let prediction = CyclePredictor::new(PhaseCalculator::new()).predict_cycles(&profile, today, self.cycles);

        if self.json {
            return output::print_json(&prediction);
        }

        output::print_warnings(&profile.validate());
        output::print_prediction(&prediction, &config.ui.date_format);
        Ok(())
    }
}
