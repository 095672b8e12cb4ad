//! ink! contract metadata
//!
//! Parses the JSON metadata emitted by `cargo contract` (v4 and v5 layouts)
//! into message descriptors plus the portable type registry, and converts
//! call arguments and return values against that registry.

mod loader;
mod messages;
mod registry;
mod value;

pub use loader::{
    loader_for, FileMetadataLoader, MetadataLoader, MetadataProvider, StaticMetadataLoader,
};
#[cfg(feature = "http")]
pub use loader::HttpMetadataLoader;
pub use messages::{to_identifier, ArgSpec, MessageSpec};
pub use registry::{
    ArrayDef, CompactDef, CompositeDef, Field, PortableType, Primitive, SequenceDef, TypeDef,
    TypeInfo, TypeParam, TypeRegistry, Variant, VariantDef,
};
pub use value::{ValueCodec, MAX_DEPTH};

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use messages::{RawMessage, RawTypeSpec};
use crate::SdkError;

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    contract: Option<RawContractInfo>,
    spec: RawContractSpec,
    types: Vec<PortableType>,
}

#[derive(Debug, Deserialize)]
struct RawContractInfo {
    name: String,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawContractSpec {
    #[serde(default)]
    constructors: Vec<RawMessage>,
    #[serde(default)]
    messages: Vec<RawMessage>,
    #[serde(default)]
    lang_error: Option<RawTypeSpec>,
}

/// Parsed contract metadata
#[derive(Debug, Clone)]
pub struct ContractMetadata {
    name: Option<String>,
    contract_version: Option<String>,
    metadata_version: Option<String>,
    constructors: Vec<MessageSpec>,
    messages: Vec<MessageSpec>,
    index: HashMap<String, usize>,
    registry: TypeRegistry,
    lang_error: Option<u32>,
}

impl ContractMetadata {
    /// Parse metadata from its JSON text
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| SdkError::Metadata(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse metadata from a JSON value
    pub fn from_value(value: Value) -> Result<Self, SdkError> {
        let raw: RawMetadata =
            serde_json::from_value(value).map_err(|e| SdkError::Metadata(e.to_string()))?;

        let metadata_version = raw.version.map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        });

        let constructors = raw
            .spec
            .constructors
            .into_iter()
            .map(RawMessage::into_spec)
            .collect::<Result<Vec<_>, _>>()?;
        let messages = raw
            .spec
            .messages
            .into_iter()
            .map(RawMessage::into_spec)
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = HashMap::new();
        for (i, message) in messages.iter().enumerate() {
            index.entry(message.label.clone()).or_insert(i);
            index.entry(message.identifier.clone()).or_insert(i);
        }

        let registry = TypeRegistry::new(raw.types);
        registry.validate()?;
        for message in &messages {
            for arg in &message.args {
                registry.resolve(arg.type_id)?;
            }
            if let Some(ret) = message.return_type {
                registry.resolve(ret)?;
            }
        }

        Ok(Self {
            name: raw.contract.as_ref().map(|c| c.name.clone()),
            contract_version: raw.contract.and_then(|c| c.version),
            metadata_version,
            constructors,
            messages,
            index,
            registry,
            lang_error: raw.spec.lang_error.map(|l| l.ty),
        })
    }

    /// Contract name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Contract crate version
    pub fn contract_version(&self) -> Option<&str> {
        self.contract_version.as_deref()
    }

    /// Metadata format version
    pub fn metadata_version(&self) -> Option<&str> {
        self.metadata_version.as_deref()
    }

    /// All messages in declaration order
    pub fn messages(&self) -> &[MessageSpec] {
        &self.messages
    }

    /// All constructors in declaration order
    pub fn constructors(&self) -> &[MessageSpec] {
        &self.constructors
    }

    /// Type registry
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Look up a message by label (`PSP22::total_supply`) or identifier
    /// (`psp22::totalSupply`)
    pub fn message(&self, name: &str) -> Result<&MessageSpec, SdkError> {
        self.index
            .get(name)
            .map(|i| &self.messages[*i])
            .ok_or_else(|| SdkError::UnknownFunction(name.to_string()))
    }

    /// Selector followed by the SCALE-encoded arguments
    pub fn encode_call(&self, message: &MessageSpec, args: &[Value]) -> Result<Vec<u8>, SdkError> {
        if args.len() != message.args.len() {
            return Err(SdkError::Encode(format!(
                "{} expects {} arguments, got {}",
                message.label,
                message.args.len(),
                args.len()
            )));
        }

        // the prefix only matters when rendering accounts
        let codec = ValueCodec::new(&self.registry, inkbridge_primitives::SUBSTRATE_SS58_PREFIX);
        let mut data = message.selector.to_vec();
        for (spec, value) in message.args.iter().zip(args) {
            codec.encode(spec.type_id, value, &mut data).map_err(|e| match e {
                SdkError::Encode(msg) => SdkError::Encode(format!("argument '{}': {}", spec.label, msg)),
                other => other,
            })?;
        }
        Ok(data)
    }

    /// Decode `data` as a value of type `type_id`, requiring it to be fully consumed
    pub fn decode_value(&self, type_id: u32, data: &[u8], ss58_prefix: u16) -> Result<Value, SdkError> {
        let mut input = data;
        let value = ValueCodec::new(&self.registry, ss58_prefix).decode(type_id, &mut input)?;
        if !input.is_empty() {
            return Err(SdkError::Decode(format!(
                "{} trailing bytes after {}",
                input.len(),
                self.registry.type_name(type_id)
            )));
        }
        Ok(value)
    }

    /// If `type_id` is ink!'s `MessageResult<T>`, the ids of `T` and `LangError`
    pub fn message_result_types(&self, type_id: u32) -> Option<(u32, u32)> {
        let (ok, err) = self.registry.result_types(type_id)?;
        let is_lang_error = match self.lang_error {
            Some(lang_error) => lang_error == err,
            None => self
                .registry
                .resolve(err)
                .map(|info| info.name() == Some("LangError"))
                .unwrap_or(false),
        };
        is_lang_error.then_some((ok, err))
    }
}
