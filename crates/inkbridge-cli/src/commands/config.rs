//! Configuration commands

use clap::Subcommand;
use std::path::Path;

use crate::{config::Config, output::Output, CliError};

/// Configuration subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Change one setting, e.g. `set weight.ref_time 5000000000`
    Set {
        /// Dotted setting name
        key: String,
        /// New value
        value: String,
    },
    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self, config: &Config, path: Option<&Path>, json: bool) -> Result<(), CliError> {
        match self {
            ConfigCommand::Show => show(config, json),
            ConfigCommand::Set { key, value } => {
                // overrides from flags are not persisted
                let mut stored = Config::load(path)?;
                stored.set(&key, &value)?;
                let saved = stored.save(path)?;
                Output::new(json)
                    .field("status", "saved")
                    .field("key", &key)
                    .field("value", &value)
                    .field("path", &saved.display().to_string())
                    .line(format!("Set {} = {} in {}", key, value, saved.display()))
                    .print();
                Ok(())
            }
            ConfigCommand::Init { force } => {
                let target = path
                    .map(Path::to_path_buf)
                    .or_else(Config::config_path)
                    .ok_or_else(|| CliError::Config("cannot determine config path".to_string()))?;
                if target.exists() && !force {
                    return Err(CliError::Config(format!(
                        "{} already exists; use --force to overwrite",
                        target.display()
                    )));
                }
                let saved = Config::default().save(Some(&target))?;
                Output::new(json)
                    .field("status", "created")
                    .field("path", &saved.display().to_string())
                    .line(format!("Wrote default configuration to {}", saved.display()))
                    .print();
                Ok(())
            }
        }
    }
}

fn show(config: &Config, json: bool) -> Result<(), CliError> {
    let client = &config.client;
    let mut output = Output::new(json)
        .field_value("config", serde_json::to_value(config)?)
        .line(format!("RPC URL:      {}", client.rpc_url))
        .line(format!("Metadata:     {}", client.metadata))
        .line(format!("App name:     {}", client.app_name))
        .line(format!(
            "Weight:       ref_time {} / proof_size {}",
            client.weight.ref_time, client.weight.proof_size
        ))
        .line(format!("SS58 prefix:  {}", client.ss58_prefix))
        .line(format!(
            "Contracts:    pallet {} / call {}",
            client.contracts.pallet_index, client.contracts.call_index
        ))
        .line(format!("Log level:    {}", config.log_level));
    if let Some(origin) = &client.query_origin {
        output = output.line(format!("Query origin: {}", origin));
    }
    output.print();
    Ok(())
}
