//! CLI error types

use inkbridge_sdk::SdkError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid command input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown configuration key
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// SDK error
    #[error("{0}")]
    Sdk(#[from] SdkError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    /// Machine-readable error category
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Sdk(e) => match e.kind() {
                inkbridge_sdk::ErrorKind::ResourceUnavailable => "resource_unavailable",
                inkbridge_sdk::ErrorKind::SignerUnavailable => "signer_unavailable",
                inkbridge_sdk::ErrorKind::Contract => "contract",
                inkbridge_sdk::ErrorKind::Transport => "transport",
                inkbridge_sdk::ErrorKind::InvalidInput => "invalid_input",
            },
            CliError::InvalidInput(_) | CliError::UnknownKey(_) => "invalid_input",
            CliError::Io(_) | CliError::Json(_) | CliError::Config(_) => "config",
        }
    }
}
