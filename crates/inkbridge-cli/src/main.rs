//! # inkbridge
//!
//! Command-line interface for ink! contracts on Substrate chains.
//!
//! ## Usage
//!
//! ```bash
//! # Contract queries
//! inkbridge query 5CR7...ZJY psp22::totalSupply
//! inkbridge query 5CR7...ZJY psp22::balanceOf 5Grw...utQY
//! inkbridge token supply 5CR7...ZJY
//!
//! # Metadata and limits
//! inkbridge messages --metadata ./y_psp22_token.json
//! inkbridge weight
//!
//! # Configuration
//! inkbridge config init
//! inkbridge config set rpc_url wss://rpc.example.com
//! inkbridge config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// inkbridge CLI
#[derive(Parser, Debug)]
#[command(name = "inkbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Node RPC endpoint URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Contract metadata URL or file path
    #[arg(long, global = true)]
    metadata: Option<String>,

    /// Configuration file (default: ~/.inkbridge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Dry-run a contract message
    Query(commands::query::QueryCommand),
    /// PSP22 token queries
    #[command(subcommand)]
    Token(commands::token::TokenCommand),
    /// List the messages in the contract metadata
    Messages,
    /// Show the weight limit attached to calls
    Weight,
    /// Show or edit configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli).await {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "kind": e.kind(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    let mut config = Config::load(config_path)?;

    // Initialize tracing; logs go to stderr so JSON output stays parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(cli.log_level.as_deref().unwrap_or(&config.log_level))
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Some(rpc_url) = cli.rpc_url {
        config.client.rpc_url = rpc_url;
    }
    if let Some(metadata) = cli.metadata {
        config.client.metadata = metadata;
    }
    tracing::debug!(
        rpc_url = %config.client.rpc_url,
        metadata = %config.client.metadata,
        "configuration loaded"
    );

    match cli.command {
        Commands::Query(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Token(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Messages => commands::messages::execute(&config, cli.json).await,
        Commands::Weight => commands::weight::execute(&config, cli.json),
        Commands::Config(cmd) => cmd.execute(&config, config_path, cli.json),
    }
}
