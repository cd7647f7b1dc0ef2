// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field types: primitive kinds, embedded messages and arrays.

use super::MessageDescriptor;
use crate::config::LENGTH_PREFIX_SIZE;
use crate::error::SchemaError;
use std::fmt;
use std::sync::Arc;

/// Primitive field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// UTF-8 text, length-prefixed on the wire.
    String,
    /// Raw octets, length-prefixed on the wire (same encoding as `uint8[]`).
    Bytes,
}

impl PrimitiveKind {
    /// Every kind, in table order.
    pub const ALL: [PrimitiveKind; 13] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::String,
        Self::Bytes,
    ];

    /// Encoded size in bytes (None for length-prefixed kinds).
    pub fn wire_size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 => Some(8),
            Self::String | Self::Bytes => None,
        }
    }

    /// Bit width for integer kinds.
    pub fn bit_width(self) -> Option<u32> {
        match self {
            Self::I8 | Self::U8 => Some(8),
            Self::I16 | Self::U16 => Some(16),
            Self::I32 | Self::U32 => Some(32),
            Self::I64 | Self::U64 => Some(64),
            _ => None,
        }
    }

    pub fn is_integer(self) -> bool {
        self.bit_width().is_some()
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Inclusive range accepted by an integer kind.
    ///
    /// Signed: `[-2^(w-1), 2^(w-1) - 1]`, unsigned: `[0, 2^w - 1]`.
    pub fn int_range(self) -> Option<(i128, i128)> {
        let width = self.bit_width()?;
        if self.is_signed() {
            Some((-(1i128 << (width - 1)), (1i128 << (width - 1)) - 1))
        } else {
            Some((0, (1i128 << width) - 1))
        }
    }

    /// Canonical schema name.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Look up a kind by schema name. Accepts the legacy `byte` (int8) and
    /// `char` (uint8) aliases.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => Self::Bool,
            "int8" | "byte" => Self::I8,
            "int16" => Self::I16,
            "int32" => Self::I32,
            "int64" => Self::I64,
            "uint8" | "char" => Self::U8,
            "uint16" => Self::U16,
            "uint32" => Self::U32,
            "uint64" => Self::U64,
            "float32" => Self::F32,
            "float64" => Self::F64,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Declared type of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Primitive; `bound` is the declared maximum length of string/bytes.
    Primitive {
        kind: PrimitiveKind,
        bound: Option<usize>,
    },
    /// Embedded message type, already resolved.
    Message(Arc<MessageDescriptor>),
    /// Array of a non-array element type. `length` is `Some(n)` for fixed
    /// arrays, `None` for variable ones (optionally capped by `bound`).
    Array {
        element: Box<FieldType>,
        length: Option<usize>,
        bound: Option<usize>,
    },
}

impl FieldType {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive { kind, bound: None }
    }

    /// String or bytes with a declared maximum length.
    pub fn bounded(kind: PrimitiveKind, max: usize) -> Self {
        Self::Primitive {
            kind,
            bound: Some(max),
        }
    }

    pub fn message(descriptor: Arc<MessageDescriptor>) -> Self {
        Self::Message(descriptor)
    }

    pub fn fixed_array(element: FieldType, length: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            length: Some(length),
            bound: None,
        }
    }

    pub fn sequence(element: FieldType) -> Self {
        Self::Array {
            element: Box::new(element),
            length: None,
            bound: None,
        }
    }

    pub fn bounded_sequence(element: FieldType, max: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            length: None,
            bound: Some(max),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Primitive kind, if this is a primitive field.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Embedded message type, looking through one array level.
    pub fn message_descriptor(&self) -> Option<&Arc<MessageDescriptor>> {
        match self {
            Self::Message(descriptor) => Some(descriptor),
            Self::Array { element, .. } => element.message_descriptor(),
            Self::Primitive { .. } => None,
        }
    }

    /// Smallest possible encoding of a value of this type.
    pub fn min_wire_size(&self) -> usize {
        match self {
            Self::Primitive { kind, .. } => kind.wire_size().unwrap_or(LENGTH_PREFIX_SIZE),
            Self::Message(descriptor) => descriptor.min_wire_size(),
            Self::Array {
                element,
                length: Some(n),
                ..
            } => element.min_wire_size().saturating_mul(*n),
            Self::Array { length: None, .. } => LENGTH_PREFIX_SIZE,
        }
    }

    /// Schema notation: `int32`, `string<=10`, `pkg/Name[]`, `uint8[3]`.
    pub fn type_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { kind, bound: None } => write!(f, "{}", kind),
            Self::Primitive {
                kind,
                bound: Some(max),
            } => write!(f, "{}<={}", kind, max),
            Self::Message(descriptor) => f.write_str(descriptor.name()),
            Self::Array {
                element,
                length,
                bound,
            } => match (length, bound) {
                (Some(n), _) => write!(f, "{}[{}]", element, n),
                (None, Some(max)) => write!(f, "{}[<={}]", element, max),
                (None, None) => write!(f, "{}[]", element),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Type-string notation
// ---------------------------------------------------------------------------

/// Element part of a parsed type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    Primitive {
        kind: PrimitiveKind,
        bound: Option<usize>,
    },
    /// Message type name, possibly package-relative.
    Named(String),
}

/// Array part of a parsed type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySpec {
    Fixed(usize),
    Variable { bound: Option<usize> },
}

/// A single field type written in schema notation, before message names
/// are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub base: BaseType,
    pub array: Option<ArraySpec>,
}

impl TypeSpec {
    /// Parse `int32`, `float64[]`, `uint8[3]`, `int16[<=8]`, `string<=10`,
    /// `pkg/Name` or `Name[]`.
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        let text = input.trim();
        let invalid = || SchemaError::InvalidFieldType(input.to_string());

        let (base_text, array) = match text.strip_suffix(']') {
            Some(head) => {
                let open = head.rfind('[').ok_or_else(invalid)?;
                let inner = &head[open + 1..];
                let array = if inner.is_empty() {
                    ArraySpec::Variable { bound: None }
                } else if let Some(max) = inner.strip_prefix("<=") {
                    ArraySpec::Variable {
                        bound: Some(max.parse().map_err(|_| invalid())?),
                    }
                } else {
                    ArraySpec::Fixed(inner.parse().map_err(|_| invalid())?)
                };
                (&head[..open], Some(array))
            }
            None => (text, None),
        };

        if base_text.contains('[') || base_text.contains(']') {
            return Err(SchemaError::NestedArray {
                field: input.to_string(),
            });
        }

        let base = match base_text.split_once("<=") {
            Some((name, max)) => {
                let kind = PrimitiveKind::from_type_name(name)
                    .filter(|k| matches!(k, PrimitiveKind::String | PrimitiveKind::Bytes))
                    .ok_or_else(invalid)?;
                BaseType::Primitive {
                    kind,
                    bound: Some(max.parse().map_err(|_| invalid())?),
                }
            }
            None => match PrimitiveKind::from_type_name(base_text) {
                Some(kind) => BaseType::Primitive { kind, bound: None },
                None if is_type_name(base_text) => BaseType::Named(base_text.to_string()),
                None => return Err(invalid()),
            },
        };

        Ok(Self { base, array })
    }
}

fn is_type_name(name: &str) -> bool {
    let mut parts = name.split('/');
    let valid_part = |p: &str| {
        p.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    match (parts.next(), parts.next(), parts.next()) {
        (Some(short), None, None) => valid_part(short),
        (Some(package), Some(short), None) => valid_part(package) && valid_part(short),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_ranges() {
        assert_eq!(PrimitiveKind::I8.int_range(), Some((-128, 127)));
        assert_eq!(PrimitiveKind::U8.int_range(), Some((0, 255)));
        assert_eq!(
            PrimitiveKind::I64.int_range(),
            Some((i64::MIN as i128, i64::MAX as i128))
        );
        assert_eq!(PrimitiveKind::U64.int_range(), Some((0, u64::MAX as i128)));
        assert_eq!(PrimitiveKind::F32.int_range(), None);
        assert_eq!(PrimitiveKind::String.int_range(), None);
    }

    #[test]
    fn test_type_names_and_aliases() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_type_name("byte"), Some(PrimitiveKind::I8));
        assert_eq!(PrimitiveKind::from_type_name("char"), Some(PrimitiveKind::U8));
        assert_eq!(PrimitiveKind::from_type_name("time"), None);
    }

    #[test]
    fn test_parse_primitives_and_arrays() {
        let spec = TypeSpec::parse("int32").unwrap();
        assert_eq!(
            spec.base,
            BaseType::Primitive {
                kind: PrimitiveKind::I32,
                bound: None
            }
        );
        assert_eq!(spec.array, None);

        let spec = TypeSpec::parse("float64[]").unwrap();
        assert_eq!(spec.array, Some(ArraySpec::Variable { bound: None }));

        let spec = TypeSpec::parse("uint8[3]").unwrap();
        assert_eq!(spec.array, Some(ArraySpec::Fixed(3)));

        let spec = TypeSpec::parse("int16[<=8]").unwrap();
        assert_eq!(spec.array, Some(ArraySpec::Variable { bound: Some(8) }));

        let spec = TypeSpec::parse("string<=10").unwrap();
        assert_eq!(
            spec.base,
            BaseType::Primitive {
                kind: PrimitiveKind::String,
                bound: Some(10)
            }
        );
    }

    #[test]
    fn test_parse_named() {
        let spec = TypeSpec::parse("std_msgs/MultiArrayDimension[]").unwrap();
        assert_eq!(
            spec.base,
            BaseType::Named("std_msgs/MultiArrayDimension".into())
        );
        let spec = TypeSpec::parse("Point").unwrap();
        assert_eq!(spec.base, BaseType::Named("Point".into()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            TypeSpec::parse("int32[3][]"),
            Err(SchemaError::NestedArray { .. })
        ));
        assert!(TypeSpec::parse("int32[x]").is_err());
        assert!(TypeSpec::parse("int32<=4").is_err());
        assert!(TypeSpec::parse("a/b/c").is_err());
        assert!(TypeSpec::parse("").is_err());
        assert!(TypeSpec::parse("9lives").is_err());
    }

    #[test]
    fn test_display_notation() {
        let ft = FieldType::fixed_array(FieldType::primitive(PrimitiveKind::F32), 3);
        assert_eq!(ft.type_name(), "float32[3]");
        let ft = FieldType::bounded_sequence(FieldType::primitive(PrimitiveKind::I16), 8);
        assert_eq!(ft.type_name(), "int16[<=8]");
        let ft = FieldType::bounded(PrimitiveKind::String, 10);
        assert_eq!(ft.type_name(), "string<=10");
    }

    #[test]
    fn test_min_wire_size() {
        assert_eq!(FieldType::primitive(PrimitiveKind::U16).min_wire_size(), 2);
        assert_eq!(FieldType::primitive(PrimitiveKind::String).min_wire_size(), 4);
        let fixed = FieldType::fixed_array(FieldType::primitive(PrimitiveKind::F64), 3);
        assert_eq!(fixed.min_wire_size(), 24);
        let seq = FieldType::sequence(FieldType::primitive(PrimitiveKind::F64));
        assert_eq!(seq.min_wire_size(), 4);
    }
}
