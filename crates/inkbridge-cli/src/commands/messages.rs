//! Contract message listing

use inkbridge_sdk::metadata::TypeRegistry;
use inkbridge_sdk::MessageSpec;
use serde_json::{json, Value};

use crate::{config::Config, output::Output, CliError};

pub async fn execute(config: &Config, json: bool) -> Result<(), CliError> {
    let ctx = super::context(config);
    let metadata = ctx.metadata().await?;
    let registry = metadata.registry();

    let mut output = Output::new(json)
        .field("contract", metadata.name().unwrap_or("unknown"))
        .field_value(
            "messages",
            Value::Array(
                metadata
                    .messages()
                    .iter()
                    .map(|m| describe(m, registry))
                    .collect(),
            ),
        )
        .line(format!(
            "{} ({} messages)",
            metadata.name().unwrap_or("unknown"),
            metadata.messages().len()
        ));

    for message in metadata.messages() {
        output = output.line(signature(message, registry));
    }
    output.print();

    Ok(())
}

fn describe(message: &MessageSpec, registry: &TypeRegistry) -> Value {
    json!({
        "label": message.label,
        "identifier": message.identifier,
        "selector": message.selector_hex(),
        "mutates": message.mutates,
        "payable": message.payable,
        "args": message
            .args
            .iter()
            .map(|a| json!({"label": a.label, "type": registry.type_name(a.type_id)}))
            .collect::<Vec<_>>(),
        "returns": message.return_type.map(|t| registry.type_name(t)),
    })
}

/// One-line rendering, e.g. `psp22::balanceOf(owner: AccountId) -> Result<u128, LangError> [0x6568382f]`
fn signature(message: &MessageSpec, registry: &TypeRegistry) -> String {
    let args: Vec<String> = message
        .args
        .iter()
        .map(|a| format!("{}: {}", a.label, registry.type_name(a.type_id)))
        .collect();

    let mut line = format!("  {}({})", message.identifier, args.join(", "));
    if let Some(ret) = message.return_type {
        line.push_str(&format!(" -> {}", registry.type_name(ret)));
    }
    line.push_str(&format!(" [{}]", message.selector_hex()));
    if message.mutates {
        line.push_str(" mut");
    }
    line
}
