mod catalog;
mod config_cmd;
mod cycle;
mod plan;
mod race;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use cyclefit::models::{CycleMode, CycleProfile};
use std::path::PathBuf;

use crate::config::Config;

pub use catalog::CatalogCommand;
pub use cycle::{PhaseCommand, PredictCommand};
pub use plan::PlanCommand;
pub use race::RaceCommand;

#[derive(Parser)]
#[command(name = "cyclefit")]
#[command(about = "Cycle-aware fitness and race training planner", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "CYCLEFIT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cycle phase for a date
    Phase(PhaseCommand),

    /// Predict upcoming cycles and daily phases
    Predict(PredictCommand),

    /// Generate a 14-day fitness plan
    Plan(PlanCommand),

    /// Generate a race training plan
    Race(RaceCommand),

    /// List the workout catalog
    Catalog(CatalogCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Cycle profile overrides shared by the cycle-aware commands.
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// Cycle length in days
    #[arg(long)]
    cycle_length: Option<i32>,

    /// Period length in days
    #[arg(long)]
    period_length: Option<i32>,

    /// First day of the last cycle (YYYY-MM-DD)
    #[arg(long)]
    last_start: Option<NaiveDate>,

    /// Follow the moon instead of a tracked cycle
    #[arg(long)]
    lunar: bool,

    /// Treat cycles as irregular
    #[arg(long)]
    irregular: bool,
}

impl ProfileArgs {
    /// Stored profile with command-line overrides applied.
    pub fn apply(&self, base: &CycleProfile) -> CycleProfile {
        let mut profile = base.clone();
        if let Some(length) = self.cycle_length {
            profile.cycle_length = length;
        }
        if let Some(length) = self.period_length {
            profile.period_length = length;
        }
        if self.last_start.is_some() {
            profile.last_cycle_start = self.last_start;
        }
        if self.lunar {
            profile.mode = CycleMode::Lunar;
        }
        if self.irregular {
            profile.irregular = true;
        }
        profile
    }
}

/// Date the CLI treats as "today".
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        let config_path = self.config.as_deref();

        match self.command {
            Commands::Phase(cmd) => cmd.execute(&load(config_path)?),
            Commands::Predict(cmd) => cmd.execute(&load(config_path)?),
            Commands::Plan(cmd) => cmd.execute(&load(config_path)?),
            Commands::Race(cmd) => cmd.execute(&load(config_path)?),
            Commands::Catalog(cmd) => cmd.execute(&load(config_path)?),
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path),
                ConfigSubcommands::Edit => config_cmd::edit_config(config_path),
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, force),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn load(path: Option<&std::path::Path>) -> Result<Config> {
    let config = Config::load(path)?;
    if !config.ui.color {
        colored::control::set_override(false);
    }
    Ok(config)
}

fn generate_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "cyclefit", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_profile_overrides() {
        let args = ProfileArgs {
            cycle_length: Some(32),
            last_start: NaiveDate::from_ymd_opt(2026, 2, 1),
            irregular: true,
            ..ProfileArgs::default()
        };
        let profile = args.apply(&CycleProfile::default());

        assert_eq!(profile.cycle_length, 32);
        assert_eq!(profile.period_length, 5);
        assert_eq!(profile.last_cycle_start, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert!(profile.irregular);
        assert_eq!(profile.mode, CycleMode::Regular);
    }
}
