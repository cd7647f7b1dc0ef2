// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry of message types keyed by full type name.
//!
//! Holds unresolved [`MessageSchema`] records (name, ordered field/type
//! strings, constants) and resolves them on demand into shared
//! `Arc<MessageDescriptor>` values. Resolution walks embedded types
//! depth-first and rejects any type that embeds itself.

use super::{
    ArraySpec, BaseType, ConstantValue, FieldType, MessageDescriptor,
    MessageDescriptorBuilder, PrimitiveKind, TypeSpec,
};
use crate::error::SchemaError;
use crate::hash::{HashCache, TypeHash};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

// ---------------------------------------------------------------------------
// Schema records
// ---------------------------------------------------------------------------

/// One declared field: name plus type in schema notation (`float64[]`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "loaders", derive(serde::Deserialize))]
pub struct FieldSchema {
    pub name: String,
    #[cfg_attr(feature = "loaders", serde(rename = "type"))]
    pub type_name: String,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Literal as written in a schema document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "loaders", serde(untagged))]
pub enum RawConstant {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl From<RawConstant> for ConstantValue {
    fn from(raw: RawConstant) -> Self {
        match raw {
            RawConstant::Bool(b) => ConstantValue::Bool(b),
            RawConstant::Int(v) => ConstantValue::Int(v.into()),
            RawConstant::UInt(v) => ConstantValue::Int(v.into()),
            RawConstant::Float(v) => ConstantValue::Float(v),
            RawConstant::Text(s) => ConstantValue::String(s),
        }
    }
}

/// One declared constant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "loaders", derive(serde::Deserialize))]
pub struct ConstantSchema {
    pub name: String,
    #[cfg_attr(feature = "loaders", serde(rename = "type"))]
    pub type_name: String,
    pub value: RawConstant,
}

/// Unresolved message type as produced by a schema compiler.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "loaders", derive(serde::Deserialize))]
pub struct MessageSchema {
    pub name: String,
    #[cfg_attr(feature = "loaders", serde(default))]
    pub fields: Vec<FieldSchema>,
    #[cfg_attr(feature = "loaders", serde(default))]
    pub constants: Vec<ConstantSchema>,
}

impl MessageSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Append a field (`"int32"`, `"pkg/Name[]"`...).
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fields.push(FieldSchema::new(name, type_name));
        self
    }

    #[must_use]
    pub fn constant(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: RawConstant,
    ) -> Self {
        self.constants.push(ConstantSchema {
            name: name.into(),
            type_name: type_name.into(),
            value,
        });
        self
    }
}

// ---------------------------------------------------------------------------
// SchemaRegistry
// ---------------------------------------------------------------------------

/// Concurrent store of message types.
///
/// Entries are append-only: a name can be registered again only with an
/// identical definition, and a resolved descriptor is published once.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: DashMap<String, Arc<MessageSchema>>,
    resolved: DashMap<String, Arc<MessageDescriptor>>,
    hashes: HashCache,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, pre-populated with the `std_msgs` types.
    pub fn global() -> &'static SchemaRegistry {
        static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let registry = SchemaRegistry::new();
            if let Err(e) = crate::std_types::register(&registry) {
                log::warn!("[hdds-msg] failed to register std_msgs types: {}", e);
            }
            registry
        })
    }

    /// Register an unresolved schema.
    pub fn register(&self, schema: MessageSchema) -> Result<(), SchemaError> {
        if self.resolved.contains_key(&schema.name) && !self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::Redefined { name: schema.name });
        }
        match self.schemas.entry(schema.name.clone()) {
            Entry::Occupied(existing) => {
                if **existing.get() == schema {
                    Ok(())
                } else {
                    Err(SchemaError::Redefined { name: schema.name })
                }
            }
            Entry::Vacant(slot) => {
                log::debug!(
                    "[hdds-msg] registered schema {} ({} fields)",
                    schema.name,
                    schema.fields.len()
                );
                slot.insert(Arc::new(schema));
                Ok(())
            }
        }
    }

    /// Register an already-built descriptor under its own name.
    pub fn register_descriptor(&self, descriptor: Arc<MessageDescriptor>) -> Result<(), SchemaError> {
        let name = descriptor.name().to_string();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::Redefined { name });
        }
        match self.resolved.entry(name.clone()) {
            Entry::Occupied(existing) => {
                if **existing.get() == *descriptor {
                    Ok(())
                } else {
                    Err(SchemaError::Redefined { name })
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
                Ok(())
            }
        }
    }

    /// Whether a type of this full name is known.
    pub fn contains(&self, name: &str) -> bool {
        self.resolved.contains_key(name) || self.schemas.contains_key(name)
    }

    /// All known type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .iter()
            .map(|e| e.key().clone())
            .chain(self.resolved.iter().map(|e| e.key().clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Resolve a type and everything it embeds.
    ///
    /// Fails with [`SchemaError::CyclicType`] if the type embeds itself
    /// directly or transitively, and [`SchemaError::UnknownType`] if any
    /// referenced name is not registered.
    pub fn resolve(&self, name: &str) -> Result<Arc<MessageDescriptor>, SchemaError> {
        let mut in_progress = Vec::new();
        self.resolve_inner(name, &mut in_progress)
    }

    /// Type-identity hash of a registered type, computed once per name.
    pub fn type_hash(&self, name: &str) -> Result<TypeHash, SchemaError> {
        self.hashes
            .get_or_compute(name, || self.resolve(name).map(|d| d.type_hash()))
    }

    fn resolve_inner(
        &self,
        name: &str,
        in_progress: &mut Vec<String>,
    ) -> Result<Arc<MessageDescriptor>, SchemaError> {
        if let Some(hit) = self.resolved.get(name) {
            return Ok(Arc::clone(hit.value()));
        }

        if let Some(start) = in_progress.iter().position(|n| n == name) {
            let mut path = in_progress[start..].to_vec();
            path.push(name.to_string());
            log::debug!("[hdds-msg] rejected cyclic type graph: {}", path.join(" -> "));
            return Err(SchemaError::CyclicType { path });
        }

        let schema = self
            .schemas
            .get(name)
            .map(|s| Arc::clone(s.value()))
            .ok_or_else(|| SchemaError::UnknownType {
                name: name.to_string(),
                referenced_by: in_progress.last().cloned(),
            })?;

        in_progress.push(name.to_string());
        let built = self.build_descriptor(&schema, in_progress);
        in_progress.pop();
        let built = Arc::new(built?);

        // A concurrent resolver may have published first; keep its Arc.
        let published = Arc::clone(self.resolved.entry(name.to_string()).or_insert(built).value());
        log::debug!(
            "[hdds-msg] resolved {} ({} fields, {} constants)",
            name,
            published.fields().len(),
            published.constants().len()
        );
        Ok(published)
    }

    fn build_descriptor(
        &self,
        schema: &MessageSchema,
        in_progress: &mut Vec<String>,
    ) -> Result<MessageDescriptor, SchemaError> {
        let package = schema.name.split_once('/').map(|(p, _)| p);
        let mut builder = MessageDescriptorBuilder::new(&schema.name);

        for field in &schema.fields {
            let spec = TypeSpec::parse(&field.type_name)?;
            let element = match spec.base {
                BaseType::Primitive { kind, bound } => FieldType::Primitive { kind, bound },
                BaseType::Named(short) => {
                    let full = self.qualify(&short, package);
                    FieldType::Message(self.resolve_inner(&full, in_progress)?)
                }
            };
            let field_type = match spec.array {
                None => element,
                Some(ArraySpec::Fixed(n)) => FieldType::fixed_array(element, n),
                Some(ArraySpec::Variable { bound: None }) => FieldType::sequence(element),
                Some(ArraySpec::Variable { bound: Some(max) }) => {
                    FieldType::bounded_sequence(element, max)
                }
            };
            builder = builder.field_with_type(&field.name, field_type);
        }

        for constant in &schema.constants {
            let kind = PrimitiveKind::from_type_name(&constant.type_name).ok_or_else(|| {
                SchemaError::InvalidConstant {
                    name: constant.name.clone(),
                    reason: format!("type '{}'", constant.type_name),
                }
            })?;
            let value: ConstantValue = constant.value.clone().into();
            builder = builder.constant(&constant.name, kind, value);
        }

        builder.build()
    }

    /// Map a possibly package-relative name to the full name to resolve.
    ///
    /// A bare `Name` inside package `pkg` means `pkg/Name` when that type is
    /// known, otherwise the bare name itself.
    fn qualify(&self, name: &str, package: Option<&str>) -> String {
        if name.contains('/') {
            return name.to_string();
        }
        if let Some(package) = package {
            let full = format!("{}/{}", package, name);
            if self.contains(&full) || !self.contains(name) {
                return full;
            }
        }
        name.to_string()
    }
}
