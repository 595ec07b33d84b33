use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::config::KEYS;
use crate::core::Config;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("path", _)) => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
        Some(("set", sub_matches)) => {
            let key = sub_matches
                .get_one::<String>("key")
                .context("Missing key")?;
            let value = sub_matches
                .get_one::<String>("value")
                .context("Missing value")?;
            set(key, value)
        }
        Some(("reset", _)) => {
            Config::default()
                .save()
                .context("Failed to save configuration")?;
            println!("{}", "Configuration reset to defaults".green());
            Ok(())
        }
        _ => {
            println!("Use 'sysmon config --help' for more information.");
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let value = serde_json::to_value(&config)?;
    for key in KEYS {
        let shown = match &value[key] {
            serde_json::Value::Null => "none".to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        println!("{:<22} {}", key.white().bold(), shown);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    config.set(key, value)?;
    config.save().context("Failed to save configuration")?;
    println!("{} {} = {}", "Updated".green(), key, value);
    Ok(())
}
