use anyhow::Result;
use std::path::Path;
use std::process::Command;

use crate::config::Config;

pub fn show_config(path: Option<&Path>) -> Result<()> {
    let config = Config::load(path)?;
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration");
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub fn edit_config(path: Option<&Path>) -> Result<()> {
    let config_file = Config::resolve_path(path)?;

    if !config_file.exists() {
        Config::default().save(Some(&config_file))?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    Command::new(editor).arg(&config_file).status()?;

    // Surface parse errors right away instead of on the next command
    Config::load(Some(&config_file))?;
    println!("✓ Configuration saved!");

    Ok(())
}

pub fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let config_file = Config::resolve_path(path)?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save(Some(&config_file))?;

    println!("✓ Configuration initialized at: {}", config_file.display());
    println!();
    println!("You can edit it with: cyclefit config edit");

    Ok(())
}
