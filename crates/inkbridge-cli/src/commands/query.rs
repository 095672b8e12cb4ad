//! Contract query command

use clap::Args;
use serde_json::Value;

use crate::output::{display_value, Output};
use crate::{config::Config, CliError};

/// Dry-run a contract message
#[derive(Debug, Args)]
pub struct QueryCommand {
    /// Contract address (SS58 or 0x hex)
    pub contract: String,
    /// Message label or identifier, e.g. `psp22::balanceOf`
    pub function: String,
    /// Message arguments; JSON literals are parsed, anything else is a string
    pub args: Vec<String>,
}

impl QueryCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let args: Vec<Value> = self.args.iter().map(String::as_str).map(parse_arg).collect();
        tracing::debug!(contract = %self.contract, function = %self.function, ?args, "query");

        let ctx = super::context(config);
        let value = ctx
            .query_contract(&self.contract, &self.function, args)
            .await?;

        Output::new(json)
            .field("contract", &self.contract)
            .field("function", &self.function)
            .field_value("result", value.clone())
            .field_value("success", Value::Bool(true))
            .line(display_value(&value))
            .print();

        Ok(())
    }
}

/// Interpret a command-line argument as a JSON value
pub fn parse_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_arg() {
        assert_eq!(parse_arg("500"), json!(500));
        assert_eq!(parse_arg("true"), json!(true));
        assert_eq!(parse_arg("0x"), json!("0x"));
        assert_eq!(
            parse_arg("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
            json!("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY")
        );
        assert_eq!(parse_arg(r#"{"Some": 1}"#), json!({"Some": 1}));
    }
}
