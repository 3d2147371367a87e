//! Configuration commands for CLI.

use clap::Subcommand;
use pomotrack_core::Config;

use crate::common::{print_json, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Dotted key, e.g. "timer.tick_interval_ms" or "notifications.sound"
        key: String,
    },
    /// Change one value and save
    Set { key: String, value: String },
    /// Print every key
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    if let ConfigAction::Reset = action {
        Config::default().save()?;
        println!("config reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;
    match action {
        ConfigAction::Get { key } => {
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List { json } if json => print_json(&config)?,
        ConfigAction::List { .. } => {
            for (key, value) in config.entries() {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Reset => {}
    }
    Ok(())
}
