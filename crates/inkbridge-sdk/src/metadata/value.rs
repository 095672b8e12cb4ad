//! JSON <-> SCALE conversion driven by the type registry

use inkbridge_primitives::AccountId32;
use inkbridge_scale::utils::{decode_compact, encode_compact, read_bytes, read_length};
use inkbridge_scale::{Decode, Encode};
use serde_json::{Map, Value};

use super::registry::{Field, Primitive, TypeDef, TypeInfo, TypeRegistry, Variant};
use crate::SdkError;

/// Deepest type nesting the codec follows before giving up
pub const MAX_DEPTH: usize = 128;

/// Encodes arguments and decodes results for one contract's type registry.
///
/// Decoded values are human readable: integers become decimal strings, byte
/// sequences become `0x` hex, account ids become SS58 addresses, enums become
/// either the variant name or `{"Variant": payload}`.
#[derive(Debug, Clone, Copy)]
pub struct ValueCodec<'a> {
    registry: &'a TypeRegistry,
    ss58_prefix: u16,
}

impl<'a> ValueCodec<'a> {
    /// Codec over `registry`, rendering accounts with `ss58_prefix`
    pub fn new(registry: &'a TypeRegistry, ss58_prefix: u16) -> Self {
        Self {
            registry,
            ss58_prefix,
        }
    }

    /// Encode `value` as type `type_id`, appending to `out`
    pub fn encode(&self, type_id: u32, value: &Value, out: &mut Vec<u8>) -> Result<(), SdkError> {
        self.encode_at(type_id, value, out, 0)
    }

    /// Decode one value of type `type_id` from the front of `input`
    pub fn decode(&self, type_id: u32, input: &mut &[u8]) -> Result<Value, SdkError> {
        self.decode_at(type_id, input, 0)
    }

    fn encode_at(
        &self,
        type_id: u32,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), SdkError> {
        if depth > MAX_DEPTH {
            return Err(SdkError::Encode(format!(
                "{} nests deeper than {} levels",
                self.registry.type_name(type_id),
                MAX_DEPTH
            )));
        }
        let info = self.registry.resolve(type_id)?;
        let depth = depth + 1;

        if is_account_id(info) {
            let account = parse_account(value)?;
            account.encode_to(out);
            return Ok(());
        }

        match &info.def {
            TypeDef::Primitive(p) => encode_primitive(*p, value, out),
            TypeDef::Composite(def) => self.encode_fields(&def.fields, value, out, depth),
            TypeDef::Variant(def) => {
                if info.name() == Some("Option") {
                    return self.encode_option(&def.variants, value, out, depth);
                }
                let (variant, payload) = select_variant(&def.variants, value)?;
                out.push(variant.index);
                self.encode_fields(&variant.fields, payload.unwrap_or(&Value::Null), out, depth)
            }
            TypeDef::Sequence(seq) => {
                if self.is_u8(seq.ty) {
                    if let Value::String(s) = value {
                        let bytes = parse_bytes(s)?;
                        bytes.encode_to(out);
                        return Ok(());
                    }
                }
                let items = expect_array(value)?;
                encode_compact(items.len() as u128, out);
                for item in items {
                    self.encode_at(seq.ty, item, out, depth)?;
                }
                Ok(())
            }
            TypeDef::Array(arr) => {
                if self.is_u8(arr.ty) {
                    if let Value::String(s) = value {
                        let bytes = parse_bytes(s)?;
                        if bytes.len() != arr.len as usize {
                            return Err(SdkError::Encode(format!(
                                "expected {} bytes, got {}",
                                arr.len,
                                bytes.len()
                            )));
                        }
                        out.extend_from_slice(&bytes);
                        return Ok(());
                    }
                }
                let items = expect_array(value)?;
                if items.len() != arr.len as usize {
                    return Err(SdkError::Encode(format!(
                        "expected {} elements, got {}",
                        arr.len,
                        items.len()
                    )));
                }
                for item in items {
                    self.encode_at(arr.ty, item, out, depth)?;
                }
                Ok(())
            }
            TypeDef::Tuple(ids) => {
                if ids.is_empty() {
                    return Ok(());
                }
                let items = expect_array(value)?;
                if items.len() != ids.len() {
                    return Err(SdkError::Encode(format!(
                        "expected tuple of {}, got {} elements",
                        ids.len(),
                        items.len()
                    )));
                }
                for (id, item) in ids.iter().zip(items) {
                    self.encode_at(*id, item, out, depth)?;
                }
                Ok(())
            }
            TypeDef::Compact(compact) => {
                let inner = self.registry.resolve(compact.ty)?;
                match &inner.def {
                    TypeDef::Primitive(p) if is_unsigned(*p) => {
                        let n = parse_unsigned(value)?;
                        encode_compact(n, out);
                        Ok(())
                    }
                    _ => Err(SdkError::Encode(format!(
                        "compact encoding of {} is not supported",
                        self.registry.type_name(compact.ty)
                    ))),
                }
            }
            TypeDef::BitSequence(_) => Err(SdkError::Encode(
                "bit sequences are not supported".to_string(),
            )),
        }
    }

    fn decode_at(&self, type_id: u32, input: &mut &[u8], depth: usize) -> Result<Value, SdkError> {
        if depth > MAX_DEPTH {
            return Err(SdkError::Decode(format!(
                "{} nests deeper than {} levels",
                self.registry.type_name(type_id),
                MAX_DEPTH
            )));
        }
        let info = self.registry.resolve(type_id)?;
        let depth = depth + 1;

        if is_account_id(info) {
            let account = AccountId32::decode(input)?;
            return Ok(Value::String(
                account.to_ss58check_with_version(self.ss58_prefix),
            ));
        }

        match &info.def {
            TypeDef::Primitive(p) => decode_primitive(*p, input),
            TypeDef::Composite(def) => self.decode_fields(&def.fields, input, depth),
            TypeDef::Variant(def) => {
                let index = u8::decode(input)?;
                let variant = def.by_index(index).ok_or_else(|| {
                    SdkError::Decode(format!(
                        "invalid variant index {} for {}",
                        index,
                        self.registry.type_name(type_id)
                    ))
                })?;

                if info.name() == Some("Option") {
                    return match variant.name.as_str() {
                        "None" => Ok(Value::Null),
                        _ => self.decode_fields(&variant.fields, input, depth),
                    };
                }

                if variant.fields.is_empty() {
                    return Ok(Value::String(variant.name.clone()));
                }
                let payload = self.decode_fields(&variant.fields, input, depth)?;
                let mut map = Map::new();
                map.insert(variant.name.clone(), payload);
                Ok(Value::Object(map))
            }
            TypeDef::Sequence(seq) => {
                let len = read_length(input)?;
                if self.is_u8(seq.ty) {
                    let bytes = read_bytes(input, len)?;
                    return Ok(Value::String(format!("0x{}", hex::encode(bytes))));
                }
                self.decode_items(seq.ty, len, input, depth)
            }
            TypeDef::Array(arr) => {
                let len = arr.len as usize;
                if self.is_u8(arr.ty) {
                    let bytes = read_bytes(input, len)?;
                    return Ok(Value::String(format!("0x{}", hex::encode(bytes))));
                }
                self.decode_items(arr.ty, len, input, depth)
            }
            TypeDef::Tuple(ids) => {
                if ids.is_empty() {
                    return Ok(Value::Null);
                }
                let mut items = Vec::with_capacity(ids.len());
                for id in ids {
                    items.push(self.decode_at(*id, input, depth)?);
                }
                Ok(Value::Array(items))
            }
            TypeDef::Compact(compact) => {
                let n = decode_compact(input)?;
                match &self.registry.resolve(compact.ty)?.def {
                    TypeDef::Primitive(_) => Ok(Value::String(n.to_string())),
                    _ => Err(SdkError::Decode(format!(
                        "compact decoding of {} is not supported",
                        self.registry.type_name(compact.ty)
                    ))),
                }
            }
            TypeDef::BitSequence(_) => Err(SdkError::Decode(
                "bit sequences are not supported".to_string(),
            )),
        }
    }

    /// Decode `len` elements. Allocation follows the input actually present,
    /// and elements that consume no input may not outnumber the bytes left.
    fn decode_items(
        &self,
        ty: u32,
        len: usize,
        input: &mut &[u8],
        depth: usize,
    ) -> Result<Value, SdkError> {
        let mut items = Vec::with_capacity(len.min(input.len()));
        for _ in 0..len {
            let before = input.len();
            items.push(self.decode_at(ty, input, depth)?);
            if input.len() == before && len > before {
                return Err(SdkError::Decode(format!(
                    "{} zero-sized {} elements exceed the input",
                    len,
                    self.registry.type_name(ty)
                )));
            }
        }
        Ok(Value::Array(items))
    }

    fn encode_fields(
        &self,
        fields: &[Field],
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), SdkError> {
        match fields {
            [] => Ok(()),
            // newtype: accept the inner value directly
            [field] if !value.is_object() || field.name.is_none() => {
                self.encode_at(field.ty, value, out, depth)
            }
            _ => match value {
                Value::Object(map) => {
                    for field in fields {
                        let name = field.name.as_deref().ok_or_else(|| {
                            SdkError::Encode("tuple-like fields need an array value".to_string())
                        })?;
                        let item = map
                            .get(name)
                            .ok_or_else(|| SdkError::Encode(format!("missing field '{}'", name)))?;
                        self.encode_at(field.ty, item, out, depth)?;
                    }
                    Ok(())
                }
                Value::Array(items) if items.len() == fields.len() => {
                    for (field, item) in fields.iter().zip(items) {
                        self.encode_at(field.ty, item, out, depth)?;
                    }
                    Ok(())
                }
                other => Err(SdkError::Encode(format!(
                    "expected {} fields, got {}",
                    fields.len(),
                    other
                ))),
            },
        }
    }

    fn decode_fields(
        &self,
        fields: &[Field],
        input: &mut &[u8],
        depth: usize,
    ) -> Result<Value, SdkError> {
        match fields {
            [] => Ok(Value::Null),
            [field] if field.name.is_none() => self.decode_at(field.ty, input, depth),
            _ if fields.iter().all(|f| f.name.is_some()) => {
                let mut map = Map::new();
                for field in fields {
                    let name = field.name.clone().unwrap_or_default();
                    map.insert(name, self.decode_at(field.ty, input, depth)?);
                }
                Ok(Value::Object(map))
            }
            _ => {
                let mut items = Vec::with_capacity(fields.len());
                for field in fields {
                    items.push(self.decode_at(field.ty, input, depth)?);
                }
                Ok(Value::Array(items))
            }
        }
    }

    fn encode_option(
        &self,
        variants: &[Variant],
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), SdkError> {
        let some = variants
            .iter()
            .find(|v| v.name == "Some")
            .ok_or_else(|| SdkError::Metadata("Option without Some variant".to_string()))?;
        match value {
            Value::Null => {
                out.push(0);
                Ok(())
            }
            Value::String(s) if s == "None" => {
                out.push(0);
                Ok(())
            }
            Value::Object(map) if map.len() == 1 && map.contains_key("Some") => {
                out.push(some.index);
                self.encode_fields(&some.fields, &map["Some"], out, depth)
            }
            other => {
                out.push(some.index);
                self.encode_fields(&some.fields, other, out, depth)
            }
        }
    }

    fn is_u8(&self, type_id: u32) -> bool {
        matches!(
            self.registry.resolve(type_id).map(|t| &t.def),
            Ok(TypeDef::Primitive(Primitive::U8))
        )
    }
}

fn is_account_id(info: &TypeInfo) -> bool {
    matches!(info.name(), Some("AccountId") | Some("AccountId32"))
        && matches!(&info.def, TypeDef::Composite(_))
}

fn parse_account(value: &Value) -> Result<AccountId32, SdkError> {
    let s = value
        .as_str()
        .ok_or_else(|| SdkError::Encode(format!("expected account address, got {}", value)))?;
    s.parse::<AccountId32>()
        .map_err(|e| SdkError::Encode(format!("invalid account '{}': {}", s, e)))
}

fn select_variant<'v>(
    variants: &'v [Variant],
    value: &'v Value,
) -> Result<(&'v Variant, Option<&'v Value>), SdkError> {
    let (name, payload) = match value {
        Value::String(name) => (name.as_str(), None),
        Value::Object(map) if map.len() == 1 => {
            let (name, payload) = map
                .iter()
                .next()
                .ok_or_else(|| SdkError::Encode("empty enum value".to_string()))?;
            (name.as_str(), Some(payload))
        }
        other => {
            return Err(SdkError::Encode(format!(
                "expected variant name or {{\"Variant\": value}}, got {}",
                other
            )))
        }
    };

    let variant = variants
        .iter()
        .find(|v| v.name == name)
        .ok_or_else(|| SdkError::Encode(format!("unknown variant '{}'", name)))?;
    if payload.is_none() && !variant.fields.is_empty() {
        return Err(SdkError::Encode(format!("variant '{}' needs a value", name)));
    }
    Ok((variant, payload))
}

fn expect_array(value: &Value) -> Result<&Vec<Value>, SdkError> {
    value
        .as_array()
        .ok_or_else(|| SdkError::Encode(format!("expected array, got {}", value)))
}

fn parse_bytes(s: &str) -> Result<Vec<u8>, SdkError> {
    match s.strip_prefix("0x") {
        Some(hex_str) => hex::decode(hex_str).map_err(|e| SdkError::Encode(e.to_string())),
        None => Ok(s.as_bytes().to_vec()),
    }
}

fn is_unsigned(p: Primitive) -> bool {
    matches!(
        p,
        Primitive::U8 | Primitive::U16 | Primitive::U32 | Primitive::U64 | Primitive::U128
    )
}

/// Strip the digit grouping produced by human-readable renderings
fn normalize_number(s: &str) -> String {
    s.trim().chars().filter(|c| *c != ',' && *c != '_').collect()
}

fn parse_unsigned(value: &Value) -> Result<u128, SdkError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| SdkError::Encode(format!("expected unsigned integer, got {}", n))),
        Value::String(s) => {
            let s = normalize_number(s);
            let parsed = match s.strip_prefix("0x") {
                Some(hex_str) => u128::from_str_radix(hex_str, 16),
                None => s.parse::<u128>(),
            };
            parsed.map_err(|e| SdkError::Encode(format!("invalid integer '{}': {}", s, e)))
        }
        other => Err(SdkError::Encode(format!("expected integer, got {}", other))),
    }
}

fn parse_signed(value: &Value) -> Result<i128, SdkError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .ok_or_else(|| SdkError::Encode(format!("expected integer, got {}", n))),
        Value::String(s) => {
            let s = normalize_number(s);
            s.parse::<i128>()
                .map_err(|e| SdkError::Encode(format!("invalid integer '{}': {}", s, e)))
        }
        other => Err(SdkError::Encode(format!("expected integer, got {}", other))),
    }
}

macro_rules! narrow {
    ($value:expr, $t:ty) => {{
        let value = $value;
        <$t>::try_from(value)
            .map_err(|_| SdkError::Encode(format!("{} out of range for {}", value, stringify!($t))))?
    }};
}

fn encode_primitive(p: Primitive, value: &Value, out: &mut Vec<u8>) -> Result<(), SdkError> {
    match p {
        Primitive::Bool => {
            let b = match value {
                Value::Bool(b) => *b,
                Value::String(s) if s == "true" => true,
                Value::String(s) if s == "false" => false,
                other => return Err(SdkError::Encode(format!("expected bool, got {}", other))),
            };
            b.encode_to(out);
        }
        Primitive::Str => {
            let s = value
                .as_str()
                .ok_or_else(|| SdkError::Encode(format!("expected string, got {}", value)))?;
            s.encode_to(out);
        }
        Primitive::Char => {
            let c = value
                .as_str()
                .and_then(|s| {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c),
                        _ => None,
                    }
                })
                .ok_or_else(|| SdkError::Encode(format!("expected single character, got {}", value)))?;
            (c as u32).encode_to(out);
        }
        Primitive::U8 => narrow!(parse_unsigned(value)?, u8).encode_to(out),
        Primitive::U16 => narrow!(parse_unsigned(value)?, u16).encode_to(out),
        Primitive::U32 => narrow!(parse_unsigned(value)?, u32).encode_to(out),
        Primitive::U64 => narrow!(parse_unsigned(value)?, u64).encode_to(out),
        Primitive::U128 => parse_unsigned(value)?.encode_to(out),
        Primitive::I8 => narrow!(parse_signed(value)?, i8).encode_to(out),
        Primitive::I16 => narrow!(parse_signed(value)?, i16).encode_to(out),
        Primitive::I32 => narrow!(parse_signed(value)?, i32).encode_to(out),
        Primitive::I64 => narrow!(parse_signed(value)?, i64).encode_to(out),
        Primitive::I128 => parse_signed(value)?.encode_to(out),
        Primitive::U256 | Primitive::I256 => {
            return Err(SdkError::Encode("256-bit integers are not supported".to_string()))
        }
    }
    Ok(())
}

fn decode_primitive(p: Primitive, input: &mut &[u8]) -> Result<Value, SdkError> {
    let value = match p {
        Primitive::Bool => Value::Bool(bool::decode(input)?),
        Primitive::Str => Value::String(String::decode(input)?),
        Primitive::Char => {
            let code = u32::decode(input)?;
            let c = char::from_u32(code)
                .ok_or_else(|| SdkError::Decode(format!("invalid char {:#x}", code)))?;
            Value::String(c.to_string())
        }
        Primitive::U8 => Value::String(u8::decode(input)?.to_string()),
        Primitive::U16 => Value::String(u16::decode(input)?.to_string()),
        Primitive::U32 => Value::String(u32::decode(input)?.to_string()),
        Primitive::U64 => Value::String(u64::decode(input)?.to_string()),
        Primitive::U128 => Value::String(u128::decode(input)?.to_string()),
        Primitive::I8 => Value::String(i8::decode(input)?.to_string()),
        Primitive::I16 => Value::String(i16::decode(input)?.to_string()),
        Primitive::I32 => Value::String(i32::decode(input)?.to_string()),
        Primitive::I64 => Value::String(i64::decode(input)?.to_string()),
        Primitive::I128 => Value::String(i128::decode(input)?.to_string()),
        Primitive::U256 | Primitive::I256 => {
            let bytes = read_bytes(input, 32)?;
            Value::String(format!("0x{}", hex::encode(bytes)))
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::registry::PortableType;
    use serde_json::json;

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const ALICE_HEX: &str = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

    fn registry() -> TypeRegistry {
        let types: Vec<PortableType> = serde_json::from_value(json!([
            {"id": 0, "type": {"path": ["ink_primitives", "types", "AccountId"],
                "def": {"composite": {"fields": [{"type": 1, "typeName": "[u8; 32]"}]}}}},
            {"id": 1, "type": {"def": {"array": {"len": 32, "type": 2}}}},
            {"id": 2, "type": {"def": {"primitive": "u8"}}},
            {"id": 3, "type": {"def": {"primitive": "u128"}}},
            {"id": 4, "type": {"path": ["Option"], "params": [{"name": "T", "type": 3}],
                "def": {"variant": {"variants": [
                    {"name": "None", "index": 0},
                    {"name": "Some", "fields": [{"type": 3}], "index": 1}
                ]}}}},
            {"id": 5, "type": {"path": ["psp22", "PSP22Error"],
                "def": {"variant": {"variants": [
                    {"name": "Custom", "fields": [{"type": 6, "typeName": "String"}], "index": 0},
                    {"name": "InsufficientBalance", "index": 1}
                ]}}}},
            {"id": 6, "type": {"def": {"primitive": "str"}}},
            {"id": 7, "type": {"def": {"sequence": {"type": 2}}}},
            {"id": 8, "type": {"path": ["token", "Info"],
                "def": {"composite": {"fields": [
                    {"name": "owner", "type": 0},
                    {"name": "cap", "type": 3},
                    {"name": "active", "type": 9}
                ]}}}},
            {"id": 9, "type": {"def": {"primitive": "bool"}}},
            {"id": 10, "type": {"def": {"tuple": []}}},
            {"id": 11, "type": {"def": {"compact": {"type": 3}}}},
            {"id": 12, "type": {"def": {"primitive": "u8"}}},
            {"id": 13, "type": {"def": {"tuple": [3, 9]}}},
            {"id": 14, "type": {"def": {"array": {"len": 4294967295u32, "type": 3}}}},
            {"id": 16, "type": {"def": {"array": {"len": 4294967295u32, "type": 10}}}},
            {"id": 15, "type": {"path": ["tree", "Tree"],
                "def": {"variant": {"variants": [
                    {"name": "Leaf", "index": 0},
                    {"name": "Node", "fields": [{"type": 15}], "index": 1}
                ]}}}}
        ]))
        .unwrap();
        TypeRegistry::new(types)
    }

    fn encode(id: u32, value: Value) -> Result<Vec<u8>, SdkError> {
        let registry = registry();
        let mut out = Vec::new();
        ValueCodec::new(&registry, 42).encode(id, &value, &mut out)?;
        Ok(out)
    }

    fn try_decode(id: u32, mut bytes: &[u8]) -> Result<Value, SdkError> {
        let registry = registry();
        let value = ValueCodec::new(&registry, 42).decode(id, &mut bytes)?;
        assert!(bytes.is_empty(), "unconsumed input");
        Ok(value)
    }

    fn decode(id: u32, bytes: &[u8]) -> Value {
        try_decode(id, bytes).unwrap()
    }

    #[test]
    fn test_u128_accepts_numbers_and_grouped_strings() {
        let expected = 1_000_000u128.to_le_bytes().to_vec();
        assert_eq!(encode(3, json!(1_000_000)).unwrap(), expected);
        assert_eq!(encode(3, json!("1,000,000")).unwrap(), expected);
        assert_eq!(encode(3, json!("0xf4240")).unwrap(), expected);
        assert_eq!(decode(3, &expected), json!("1000000"));
    }

    #[test]
    fn test_narrow_integer_out_of_range() {
        assert!(matches!(encode(12, json!(256)), Err(SdkError::Encode(_))));
        assert!(matches!(encode(3, json!(-1)), Err(SdkError::Encode(_))));
    }

    #[test]
    fn test_account_id_ss58_and_hex() {
        let from_ss58 = encode(0, json!(ALICE)).unwrap();
        let from_hex = encode(0, json!(format!("0x{}", ALICE_HEX))).unwrap();
        assert_eq!(from_ss58, hex::decode(ALICE_HEX).unwrap());
        assert_eq!(from_ss58, from_hex);
        assert_eq!(decode(0, &from_ss58), json!(ALICE));
    }

    #[test]
    fn test_invalid_account_is_encode_error() {
        assert!(matches!(encode(0, json!("not-an-address")), Err(SdkError::Encode(_))));
        assert!(matches!(encode(0, json!(5)), Err(SdkError::Encode(_))));
    }

    #[test]
    fn test_option() {
        assert_eq!(encode(4, Value::Null).unwrap(), vec![0]);
        let some = encode(4, json!("5")).unwrap();
        assert_eq!(some[0], 1);
        assert_eq!(decode(4, &some), json!("5"));
        assert_eq!(decode(4, &[0]), Value::Null);
    }

    #[test]
    fn test_enum_unit_and_payload() {
        assert_eq!(encode(5, json!("InsufficientBalance")).unwrap(), vec![1]);
        assert_eq!(decode(5, &[1]), json!("InsufficientBalance"));

        let custom = encode(5, json!({"Custom": "boom"})).unwrap();
        assert_eq!(custom, vec![0, 0x10, b'b', b'o', b'o', b'm']);
        assert_eq!(decode(5, &custom), json!({"Custom": "boom"}));

        assert!(matches!(encode(5, json!("Custom")), Err(SdkError::Encode(_))));
        assert!(matches!(encode(5, json!("Nope")), Err(SdkError::Encode(_))));
    }

    #[test]
    fn test_invalid_variant_index() {
        assert!(matches!(try_decode(5, &[9]), Err(SdkError::Decode(_))));
    }

    #[test]
    fn test_bytes_as_hex() {
        let encoded = encode(7, json!("0xdead")).unwrap();
        assert_eq!(encoded, vec![0x08, 0xde, 0xad]);
        assert_eq!(decode(7, &encoded), json!("0xdead"));
        assert_eq!(encode(7, json!([1, 2])).unwrap(), vec![0x08, 1, 2]);
    }

    #[test]
    fn test_named_struct() {
        let value = json!({"owner": ALICE, "cap": "10", "active": true});
        let encoded = encode(8, value.clone()).unwrap();
        assert_eq!(encoded.len(), 32 + 16 + 1);
        assert_eq!(decode(8, &encoded), value);

        let missing = encode(8, json!({"owner": ALICE}));
        assert!(matches!(missing, Err(SdkError::Encode(_))));
    }

    #[test]
    fn test_unit_tuple_and_compact() {
        assert_eq!(encode(10, Value::Null).unwrap(), Vec::<u8>::new());
        assert_eq!(decode(10, &[]), Value::Null);
        assert_eq!(encode(11, json!(64)).unwrap(), vec![0x01, 0x01]);
        assert_eq!(decode(11, &[0x01, 0x01]), json!("64"));
    }

    #[test]
    fn test_tuple() {
        let encoded = encode(13, json!(["7", false])).unwrap();
        assert_eq!(encoded.len(), 17);
        assert_eq!(decode(13, &encoded), json!(["7", false]));
        assert!(matches!(encode(13, json!(["7"])), Err(SdkError::Encode(_))));
    }

    #[test]
    fn test_oversized_array_fails_on_input() {
        // the declared length alone must not drive the allocation
        let bytes = [0u8; 16];
        assert!(matches!(try_decode(14, &bytes), Err(SdkError::Decode(_))));
        // unit elements take no input at all
        assert!(matches!(try_decode(16, &[]), Err(SdkError::Decode(_))));
    }

    #[test]
    fn test_recursive_enum() {
        assert_eq!(decode(15, &[1, 1, 0]), json!({"Node": {"Node": "Leaf"}}));
        let encoded = encode(15, json!({"Node": {"Node": "Leaf"}})).unwrap();
        assert_eq!(encoded, vec![1, 1, 0]);
    }

    #[test]
    fn test_nesting_beyond_limit() {
        let deep = vec![1u8; MAX_DEPTH * 4];
        let err = try_decode(15, &deep).unwrap_err();
        assert!(matches!(&err, SdkError::Decode(msg) if msg.contains("nests deeper")));

        let mut value = json!("Leaf");
        for _ in 0..MAX_DEPTH * 2 {
            value = json!({ "Node": value });
        }
        assert!(matches!(encode(15, value), Err(SdkError::Encode(_))));
    }
}
