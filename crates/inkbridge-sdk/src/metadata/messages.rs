//! Contract message descriptors

use serde::{Deserialize, Serialize};

use crate::SdkError;

/// A callable contract message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSpec {
    /// Label as declared, e.g. `PSP22::total_supply`
    pub label: String,
    /// camelCase identifier, e.g. `psp22::totalSupply`
    pub identifier: String,
    /// Four-byte selector
    #[serde(serialize_with = "serialize_selector")]
    pub selector: [u8; 4],
    /// Whether the message may change contract state
    pub mutates: bool,
    /// Whether the message accepts value transfers
    pub payable: bool,
    /// Arguments in call order
    pub args: Vec<ArgSpec>,
    /// Return type id
    pub return_type: Option<u32>,
    /// Doc lines
    pub docs: Vec<String>,
}

impl MessageSpec {
    /// Selector as `0x`-prefixed hex
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// A message argument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgSpec {
    /// Argument name
    pub label: String,
    /// Type id
    pub type_id: u32,
    /// Display name path, e.g. `["AccountId"]`
    pub display_name: Vec<String>,
}

fn serialize_selector<S: serde::Serializer>(selector: &[u8; 4], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{}", hex::encode(selector)))
}

// Raw shapes as they appear in the metadata JSON

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMessage {
    pub label: String,
    pub selector: String,
    #[serde(default)]
    pub mutates: bool,
    #[serde(default)]
    pub payable: bool,
    #[serde(default)]
    pub args: Vec<RawArg>,
    #[serde(default)]
    pub return_type: Option<RawTypeSpec>,
    #[serde(default)]
    pub docs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArg {
    pub label: String,
    #[serde(rename = "type")]
    pub ty: RawTypeSpec,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTypeSpec {
    #[serde(rename = "type")]
    pub ty: u32,
    #[serde(default)]
    pub display_name: Vec<String>,
}

impl RawMessage {
    pub(crate) fn into_spec(self) -> Result<MessageSpec, SdkError> {
        let selector = parse_selector(&self.selector)?;
        Ok(MessageSpec {
            identifier: to_identifier(&self.label),
            label: self.label,
            selector,
            mutates: self.mutates,
            payable: self.payable,
            args: self
                .args
                .into_iter()
                .map(|arg| ArgSpec {
                    label: arg.label,
                    type_id: arg.ty.ty,
                    display_name: arg.ty.display_name,
                })
                .collect(),
            return_type: self.return_type.map(|r| r.ty),
            docs: self.docs,
        })
    }
}

fn parse_selector(s: &str) -> Result<[u8; 4], SdkError> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw).map_err(|e| SdkError::Metadata(format!("selector {}: {}", s, e)))?;
    bytes
        .try_into()
        .map_err(|_| SdkError::Metadata(format!("selector {} is not 4 bytes", s)))
}

/// camelCase identifier for a message label.
///
/// Path segments are converted independently; an all-caps segment such as a
/// trait name is lowercased: `PSP22::total_supply` becomes `psp22::totalSupply`.
pub fn to_identifier(label: &str) -> String {
    label
        .split("::")
        .map(segment_identifier)
        .collect::<Vec<_>>()
        .join("::")
}

fn segment_identifier(segment: &str) -> String {
    if !segment.chars().any(|c| c.is_ascii_lowercase()) {
        return segment.to_ascii_lowercase();
    }

    // lowercase a leading acronym, keeping the capital that starts the next word
    let chars: Vec<char> = segment.chars().collect();
    let run = chars
        .iter()
        .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .count();
    let lower = if run > 1 && chars[run].is_ascii_lowercase() && chars[run - 1].is_ascii_uppercase() {
        run - 1
    } else {
        run
    };

    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for (i, c) in chars.into_iter().enumerate() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else if i < lower {
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
