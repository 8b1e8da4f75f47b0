use anyhow::Result;
use clap::Args;
use cyclefit::config::load_catalog;
use cyclefit::models::Phase;

use crate::config::Config;
use crate::output;

#[derive(Args)]
pub struct CatalogCommand {
    /// Only show entries for a phase (e.g. follicular, luteal-moon)
    #[arg(short, long)]
    phase: Option<Phase>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl CatalogCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let mut catalog = load_catalog(config.catalog.path.as_deref())?;
        if let Some(phase) = self.phase {
            catalog.retain(|entry| entry.applies_to(phase));
        }

        if self.json {
            return output::print_json(&catalog);
        }

        output::print_catalog(&catalog);
        Ok(())
    }
}
