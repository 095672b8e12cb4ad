//! CLI commands

pub mod config;
pub mod messages;
pub mod query;
pub mod token;
pub mod weight;

use inkbridge_sdk::AppContext;

use crate::config::Config;

/// Read-only context; CLI commands never sign
pub(crate) fn context(config: &Config) -> AppContext {
    AppContext::new(config.client.clone())
}
