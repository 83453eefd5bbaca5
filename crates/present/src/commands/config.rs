use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    print_entry("defaults.theme", config.theme());
    print_entry("defaults.windowed", &config.windowed().to_string());
    print_entry("defaults.show_help", &config.show_help().to_string());
    Ok(())
}

fn print_entry(key: &str, value: &str) {
    println!("  {:<20} {}", key.cyan(), value);
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!("{} {} = {}", "Saved".green(), key.cyan(), value);
    tracing::debug!(path = %path.display(), "config written");
    Ok(())
}
