// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message type descriptors.

use super::{FieldType, PrimitiveKind};
use crate::error::SchemaError;
use crate::hash::{self, TypeHash};
use std::fmt;
use std::sync::OnceLock;

/// Field descriptor within a message type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Literal value of a declared constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Bool(bool),
    Int(i128),
    Float(f64),
    String(String),
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConstantValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ConstantValue {
    fn from(v: i64) -> Self {
        Self::Int(v.into())
    }
}

impl From<u64> for ConstantValue {
    fn from(v: u64) -> Self {
        Self::Int(v.into())
    }
}

impl From<i32> for ConstantValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for ConstantValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ConstantValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ConstantValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Named constant declared by a message type. Never encoded, never hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub kind: PrimitiveKind,
    pub value: ConstantValue,
}

impl Constant {
    /// Create a constant, checking the value against the declared kind.
    pub fn new(
        name: impl Into<String>,
        kind: PrimitiveKind,
        value: impl Into<ConstantValue>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let value = coerce_constant(&name, kind, value.into())?;
        Ok(Self { name, kind, value })
    }
}

fn coerce_constant(
    name: &str,
    kind: PrimitiveKind,
    value: ConstantValue,
) -> Result<ConstantValue, SchemaError> {
    let invalid = |reason: String| SchemaError::InvalidConstant {
        name: name.to_string(),
        reason,
    };

    match (kind, value) {
        (PrimitiveKind::Bytes, _) => Err(invalid("a bytes value".into())),
        (PrimitiveKind::Bool, ConstantValue::Bool(b)) => Ok(ConstantValue::Bool(b)),
        (PrimitiveKind::Bool, ConstantValue::Int(v @ (0 | 1))) => Ok(ConstantValue::Bool(v == 1)),
        (PrimitiveKind::String, ConstantValue::String(s)) => Ok(ConstantValue::String(s)),
        (PrimitiveKind::String, other) => Ok(ConstantValue::String(other.to_string())),
        (k, ConstantValue::Float(v)) if k.is_float() => Ok(ConstantValue::Float(v)),
        (k, ConstantValue::Int(v)) if k.is_float() => Ok(ConstantValue::Float(v as f64)),
        (k, ConstantValue::Int(v)) => match k.int_range() {
            Some((min, max)) if (min..=max).contains(&v) => Ok(ConstantValue::Int(v)),
            Some(_) => Err(invalid(format!("{} as {}", v, k))),
            None => Err(invalid(format!("an integer as {}", k))),
        },
        (k, other) => Err(invalid(format!("'{}' as {}", other, k))),
    }
}

/// Immutable description of one message type: ordered fields (wire order)
/// and constants.
///
/// Shared as `Arc<MessageDescriptor>`; embedded types hold their own `Arc`,
/// so a resolved descriptor graph is always acyclic.
#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
    constants: Vec<Constant>,
    type_hash: OnceLock<TypeHash>,
}

impl MessageDescriptor {
    /// Create a descriptor, rejecting duplicate names and nested arrays.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        constants: Vec<Constant>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();

        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    type_name: name,
                    field: field.name.clone(),
                });
            }
            if let FieldType::Array { element, .. } = &field.field_type {
                if element.is_array() {
                    return Err(SchemaError::NestedArray {
                        field: field.name.clone(),
                    });
                }
            }
        }

        for (i, constant) in constants.iter().enumerate() {
            if constants[..i].iter().any(|c| c.name == constant.name) {
                return Err(SchemaError::DuplicateConstant {
                    type_name: name,
                    constant: constant.name.clone(),
                });
            }
        }

        Ok(Self {
            name,
            fields,
            constants,
            type_hash: OnceLock::new(),
        })
    }

    /// Full type name, e.g. `std_msgs/MultiArrayLayout`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package part of the name, if any.
    pub fn package(&self) -> Option<&str> {
        self.name.split_once('/').map(|(package, _)| package)
    }

    /// Name without the package prefix.
    pub fn short_name(&self) -> &str {
        self.name
            .split_once('/')
            .map_or(self.name.as_str(), |(_, short)| short)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn constant(&self, name: &str) -> Option<&ConstantValue> {
        self.constants
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.value)
    }

    /// True for zero-field types (encode to zero bytes).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Smallest possible encoding of a value of this type.
    pub fn min_wire_size(&self) -> usize {
        self.fields
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(f.field_type.min_wire_size()))
    }

    /// Type-identity hash, computed on first use.
    pub fn type_hash(&self) -> TypeHash {
        *self.type_hash.get_or_init(|| hash::type_hash(self))
    }
}

impl PartialEq for MessageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields && self.constants == other.constants
    }
}
