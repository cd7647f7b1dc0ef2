// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic field values.

use crate::schema::{FieldType, MessageDescriptor, PrimitiveKind};
use std::collections::HashMap;

/// Field name to value map of one message instance.
pub type Fields = HashMap<String, Value>;

/// A dynamic value for any field type.
///
/// Integers of every width share [`Value::Int`]; the validator checks the
/// value against the declared width, so out-of-range candidates such as
/// `2^64` for a `uint64` field are representable and rejected rather than
/// silently wrapped.
///
/// Floats compare by bit pattern, so a NaN equals an identical NaN and
/// `0.0` differs from `-0.0`.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i128),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Fixed or variable array, element type given by the field.
    Array(Vec<Value>),
    /// Embedded message.
    Message(Fields),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Message(a), Self::Message(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Default value of a field type: false, 0, 0.0, empty string/bytes,
    /// empty variable array, `n` defaults for a fixed array, and a fully
    /// defaulted embedded message.
    pub fn default_for(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Primitive { kind, .. } => Self::default_primitive(*kind),
            FieldType::Message(descriptor) => Self::Message(Self::default_fields(descriptor)),
            FieldType::Array {
                element,
                length: Some(n),
                ..
            } => Self::Array((0..*n).map(|_| Self::default_for(element)).collect()),
            FieldType::Array { length: None, .. } => Self::Array(Vec::new()),
        }
    }

    /// Defaults for every declared field of a message type.
    pub fn default_fields(descriptor: &MessageDescriptor) -> Fields {
        descriptor
            .fields()
            .iter()
            .map(|f| (f.name.clone(), Self::default_for(&f.field_type)))
            .collect()
    }

    fn default_primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Bool => Self::Bool(false),
            PrimitiveKind::F32 => Self::F32(0.0),
            PrimitiveKind::F64 => Self::F64(0.0),
            PrimitiveKind::String => Self::String(String::new()),
            PrimitiveKind::Bytes => Self::Bytes(Vec::new()),
            _ => Self::Int(0),
        }
    }

    /// Raw octets.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// Short name of the held kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::F32(_) => "float32",
            Self::F64(_) => "float64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Message(_) => "message",
        }
    }

    /// Adapt a value to a declared field type: float widths follow the
    /// field, integers become floats for float fields, an array of octets
    /// becomes bytes for a bytes field and bytes become an octet array for
    /// a `uint8` array field. Anything else is returned unchanged for the
    /// validator to judge.
    pub fn coerce_to(self, field_type: &FieldType) -> Self {
        match (field_type, self) {
            (FieldType::Primitive { kind, .. }, value) => match (*kind, value) {
                (PrimitiveKind::F32, Self::F64(v)) => Self::F32(v as f32),
                (PrimitiveKind::F32, Self::Int(v)) => Self::F32(v as f32),
                (PrimitiveKind::F64, Self::F32(v)) => Self::F64(f64::from(v)),
                (PrimitiveKind::F64, Self::Int(v)) => Self::F64(v as f64),
                (PrimitiveKind::Bytes, Self::Array(items)) => match to_octets(&items) {
                    Some(octets) => Self::Bytes(octets),
                    None => Self::Array(items),
                },
                (_, value) => value,
            },
            (FieldType::Array { element, .. }, Self::Array(items)) => {
                Self::Array(items.into_iter().map(|v| v.coerce_to(element)).collect())
            }
            (FieldType::Array { element, .. }, Self::Bytes(octets))
                if element.primitive_kind() == Some(PrimitiveKind::U8) =>
            {
                Self::Array(octets.into_iter().map(|b| Self::Int(i128::from(b))).collect())
            }
            (FieldType::Message(descriptor), Self::Message(mut fields)) => {
                for field in descriptor.fields() {
                    if let Some(v) = fields.remove(&field.name) {
                        fields.insert(field.name.clone(), v.coerce_to(&field.field_type));
                    }
                }
                Self::Message(fields)
            }
            (_, value) => value,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the integer as held.
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(|v| i64::try_from(v).ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_int().and_then(|v| u64::try_from(v).ok())
    }

    /// Try to get as f64 (float32 values are widened).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            Self::F32(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&Fields> {
        match self {
            Self::Message(fields) => Some(fields),
            _ => None,
        }
    }

    /// Field of an embedded message value.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.as_fields()?.get(name)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Self::Message(fields) => fields.get_mut(name),
            _ => None,
        }
    }
}

fn to_octets(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|v| v.as_int().and_then(|i| u8::try_from(i).ok()))
        .collect()
}

// ---------------------------------------------------------------------------
// Conversions into Value
// ---------------------------------------------------------------------------

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(i128::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Value::Message(fields)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Conversions out of Value
// ---------------------------------------------------------------------------

/// Types readable from a [`Value`].
pub trait FromValue: Sized {
    /// Name used in type-mismatch errors.
    const NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const NAME: &'static str = stringify!($ty);

                fn from_value(value: &Value) -> Option<Self> {
                    value.as_int().and_then(|v| <$ty>::try_from(v).ok())
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl FromValue for bool {
    const NAME: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for f32 {
    const NAME: &'static str = "f32";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f32()
    }
}

impl FromValue for f64 {
    const NAME: &'static str = "f64";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for String {
    const NAME: &'static str = "String";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Value {
    const NAME: &'static str = "Value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const NAME: &'static str = "Vec";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(octets) => octets
                .iter()
                .map(|b| T::from_value(&Value::Int(i128::from(*b))))
                .collect(),
            _ => value.as_array()?.iter().map(T::from_value).collect(),
        }
    }
}
