//! PSP22 token commands

use clap::Subcommand;

use crate::{config::Config, output::Output, CliError};

/// PSP22 token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Query the total supply
    Supply {
        /// Token contract address
        contract: String,
    },
    /// Query an account balance
    Balance {
        /// Token contract address
        contract: String,
        /// Account to look up
        owner: String,
    },
}

impl TokenCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let ctx = super::context(config);
        match self {
            TokenCommand::Supply { contract } => {
                let supply = ctx.total_supply(&contract).await?;
                Output::new(json)
                    .field("contract", &contract)
                    .field("total_supply", &supply.to_string())
                    .line(format!("Total supply: {}", supply))
                    .print();
            }
            TokenCommand::Balance { contract, owner } => {
                let balance = ctx.balance_of(&contract, &owner).await?;
                Output::new(json)
                    .field("contract", &contract)
                    .field("owner", &owner)
                    .field("balance", &balance.to_string())
                    .line(format!("Balance: {}", balance))
                    .print();
            }
        }
        Ok(())
    }
}
