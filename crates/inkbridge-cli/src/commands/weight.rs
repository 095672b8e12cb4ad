//! Weight limit command

use inkbridge_sdk::estimate_weight;

use crate::{config::Config, output::Output, CliError};

pub fn execute(config: &Config, json: bool) -> Result<(), CliError> {
    let weight = estimate_weight(&config.client.weight);

    Output::new(json)
        .field_u64("ref_time", weight.ref_time)
        .field_u64("proof_size", weight.proof_size)
        .line(format!("Weight limit: {}", weight))
        .print();

    Ok(())
}
