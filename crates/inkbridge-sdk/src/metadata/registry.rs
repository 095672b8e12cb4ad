//! Portable type registry of an ink! contract

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::SdkError;

/// One entry of the `types` array
#[derive(Debug, Clone, Deserialize)]
pub struct PortableType {
    /// Type id referenced elsewhere in the metadata
    pub id: u32,
    /// Type description
    #[serde(rename = "type")]
    pub ty: TypeInfo,
}

/// Shape and provenance of a type
#[derive(Debug, Clone, Deserialize)]
pub struct TypeInfo {
    /// Rust path segments, empty for primitives and tuples
    #[serde(default)]
    pub path: Vec<String>,
    /// Generic parameters
    #[serde(default)]
    pub params: Vec<TypeParam>,
    /// Structural definition
    pub def: TypeDef,
    /// Doc lines
    #[serde(default)]
    pub docs: Vec<String>,
}

impl TypeInfo {
    /// Last path segment (`Option`, `Result`, `AccountId`, ...)
    pub fn name(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Path joined with `::`
    pub fn display_path(&self) -> String {
        self.path.join("::")
    }
}

/// Generic parameter of a type
#[derive(Debug, Clone, Deserialize)]
pub struct TypeParam {
    /// Parameter name
    pub name: String,
    /// Concrete type, absent when not instantiated
    #[serde(rename = "type", default)]
    pub ty: Option<u32>,
}

/// Structural definition of a type
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeDef {
    /// Struct
    Composite(CompositeDef),
    /// Enum
    Variant(VariantDef),
    /// Variable length sequence
    Sequence(SequenceDef),
    /// Fixed length array
    Array(ArrayDef),
    /// Tuple of type ids
    Tuple(Vec<u32>),
    /// Built-in primitive
    Primitive(Primitive),
    /// Compact-encoded wrapper
    Compact(CompactDef),
    /// Bit vector
    BitSequence(Value),
}

/// Struct definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompositeDef {
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl CompositeDef {
    /// Returns `true` when every field carries a name
    pub fn is_named(&self) -> bool {
        !self.fields.is_empty() && self.fields.iter().all(|f| f.name.is_some())
    }
}

/// Field of a struct or enum variant
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name, absent for tuple-like fields
    #[serde(default)]
    pub name: Option<String>,
    /// Field type
    #[serde(rename = "type")]
    pub ty: u32,
    /// Type name as written in source
    #[serde(default)]
    pub type_name: Option<String>,
}

/// Enum definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantDef {
    /// Variants
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl VariantDef {
    /// Variant by name
    pub fn by_name(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Variant by encoded index
    pub fn by_index(&self, index: u8) -> Option<&Variant> {
        self.variants.iter().find(|v| v.index == index)
    }
}

/// Enum variant
#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    /// Variant name
    pub name: String,
    /// Payload fields
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Encoded discriminant
    pub index: u8,
}

/// Sequence element type
#[derive(Debug, Clone, Deserialize)]
pub struct SequenceDef {
    /// Element type
    #[serde(rename = "type")]
    pub ty: u32,
}

/// Array length and element type
#[derive(Debug, Clone, Deserialize)]
pub struct ArrayDef {
    /// Element count
    pub len: u32,
    /// Element type
    #[serde(rename = "type")]
    pub ty: u32,
}

/// Compact inner type
#[derive(Debug, Clone, Deserialize)]
pub struct CompactDef {
    /// Wrapped type
    #[serde(rename = "type")]
    pub ty: u32,
}

/// Primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Primitive {
    Bool,
    Char,
    Str,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    I8,
    I16,
    I32,
    I64,
    I128,
    I256,
}

const MAX_NAME_DEPTH: usize = 8;

#[derive(Clone, Copy)]
enum Visit {
    Open,
    Closed,
}

/// Lookup table from type id to type
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<u32, TypeInfo>,
}

impl TypeRegistry {
    /// Build from the metadata `types` array
    pub fn new(types: Vec<PortableType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.id, t.ty)).collect(),
        }
    }

    /// Look up a type
    pub fn resolve(&self, id: u32) -> Result<&TypeInfo, SdkError> {
        self.types
            .get(&id)
            .ok_or_else(|| SdkError::Metadata(format!("type {} not found in registry", id)))
    }

    /// Check that every type reference resolves and that no type contains
    /// itself without an enum or a sequence in between.
    ///
    /// Such a type has no finite encoding, so no input could decode as it.
    pub fn validate(&self) -> Result<(), SdkError> {
        for (id, info) in &self.types {
            for child in referenced(&info.def) {
                if !self.types.contains_key(&child) {
                    return Err(SdkError::Metadata(format!(
                        "type {} refers to missing type {}",
                        id, child
                    )));
                }
            }
        }

        let mut visits: HashMap<u32, Visit> = HashMap::with_capacity(self.types.len());
        let mut roots: Vec<u32> = self.types.keys().copied().collect();
        roots.sort_unstable();
        for root in roots {
            if visits.contains_key(&root) {
                continue;
            }
            visits.insert(root, Visit::Open);
            let mut stack = vec![(root, self.inline_children(root))];
            while let Some(frame) = stack.last_mut() {
                let id = frame.0;
                match frame.1.pop() {
                    Some(child) => match visits.get(&child) {
                        Some(Visit::Open) => {
                            return Err(SdkError::Metadata(format!(
                                "type {} ({}) contains itself",
                                child,
                                self.type_name(child)
                            )))
                        }
                        Some(Visit::Closed) => {}
                        None => {
                            visits.insert(child, Visit::Open);
                            stack.push((child, self.inline_children(child)));
                        }
                    },
                    None => {
                        visits.insert(id, Visit::Closed);
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    /// Types stored inline in every value of `id`
    fn inline_children(&self, id: u32) -> Vec<u32> {
        match self.types.get(&id).map(|info| &info.def) {
            Some(TypeDef::Composite(def)) => def.fields.iter().map(|f| f.ty).collect(),
            Some(TypeDef::Tuple(ids)) => ids.clone(),
            Some(TypeDef::Array(arr)) if arr.len > 0 => vec![arr.ty],
            Some(TypeDef::Compact(compact)) => vec![compact.ty],
            _ => Vec::new(),
        }
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// If `id` is `Result<T, E>`, the ids of `T` and `E`
    pub fn result_types(&self, id: u32) -> Option<(u32, u32)> {
        let info = self.types.get(&id)?;
        if info.name() != Some("Result") {
            return None;
        }
        let TypeDef::Variant(def) = &info.def else {
            return None;
        };
        let ok = def.by_name("Ok")?.fields.first()?.ty;
        let err = def.by_name("Err")?.fields.first()?.ty;
        Some((ok, err))
    }

    /// Human-readable type name, e.g. `Result<u128, LangError>`
    pub fn type_name(&self, id: u32) -> String {
        self.name_at(id, 0)
    }

    fn name_at(&self, id: u32, depth: usize) -> String {
        let Some(info) = self.types.get(&id) else {
            return format!("#{}", id);
        };
        if depth >= MAX_NAME_DEPTH {
            return "..".to_string();
        }
        let depth = depth + 1;
        match &info.def {
            TypeDef::Primitive(p) => format!("{:?}", p).to_lowercase(),
            TypeDef::Sequence(s) => format!("Vec<{}>", self.name_at(s.ty, depth)),
            TypeDef::Array(a) => format!("[{}; {}]", self.name_at(a.ty, depth), a.len),
            TypeDef::Compact(c) => format!("Compact<{}>", self.name_at(c.ty, depth)),
            TypeDef::Tuple(ids) => {
                let names: Vec<_> = ids.iter().map(|id| self.name_at(*id, depth)).collect();
                format!("({})", names.join(", "))
            }
            TypeDef::BitSequence(_) => "BitVec".to_string(),
            TypeDef::Composite(_) | TypeDef::Variant(_) => {
                let name = info.name().unwrap_or("?").to_string();
                let params: Vec<_> = info
                    .params
                    .iter()
                    .filter_map(|p| p.ty)
                    .map(|id| self.name_at(id, depth))
                    .collect();
                if params.is_empty() {
                    name
                } else {
                    format!("{}<{}>", name, params.join(", "))
                }
            }
        }
    }
}

fn referenced(def: &TypeDef) -> Vec<u32> {
    match def {
        TypeDef::Composite(def) => def.fields.iter().map(|f| f.ty).collect(),
        TypeDef::Variant(def) => def
            .variants
            .iter()
            .flat_map(|v| v.fields.iter().map(|f| f.ty))
            .collect(),
        TypeDef::Sequence(seq) => vec![seq.ty],
        TypeDef::Array(arr) => vec![arr.ty],
        TypeDef::Tuple(ids) => ids.clone(),
        TypeDef::Compact(compact) => vec![compact.ty],
        TypeDef::Primitive(_) | TypeDef::BitSequence(_) => Vec::new(),
    }
}
