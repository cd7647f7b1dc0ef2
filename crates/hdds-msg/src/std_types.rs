// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Standard `std_msgs` types and multi-array layout helpers.
//!
//! Descriptors are built once on first use and shared. The multi-array
//! family pairs a [`MultiArrayLayout`] with a flat `data` array; the layout
//! is carried as plain data and never used to reshape anything.

use crate::error::{SchemaError, ValidationError, ValidationReason};
use crate::schema::{MessageDescriptor, MessageDescriptorBuilder, PrimitiveKind, SchemaRegistry};
use crate::value::{Fields, Value};
use std::sync::{Arc, OnceLock};

/// Package of every type defined here.
pub const PACKAGE: &str = "std_msgs";

/// Element kinds with a `*MultiArray` type.
pub const MULTI_ARRAY_KINDS: [PrimitiveKind; 10] = [
    PrimitiveKind::I8,
    PrimitiveKind::I16,
    PrimitiveKind::I32,
    PrimitiveKind::I64,
    PrimitiveKind::U8,
    PrimitiveKind::U16,
    PrimitiveKind::U32,
    PrimitiveKind::U64,
    PrimitiveKind::F32,
    PrimitiveKind::F64,
];

/// Kinds with a single-`data`-field wrapper type.
pub const WRAPPER_KINDS: [PrimitiveKind; 12] = [
    PrimitiveKind::Bool,
    PrimitiveKind::I8,
    PrimitiveKind::I16,
    PrimitiveKind::I32,
    PrimitiveKind::I64,
    PrimitiveKind::U8,
    PrimitiveKind::U16,
    PrimitiveKind::U32,
    PrimitiveKind::U64,
    PrimitiveKind::F32,
    PrimitiveKind::F64,
    PrimitiveKind::String,
];

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

fn base_name(kind: PrimitiveKind) -> Option<&'static str> {
    let name = match kind {
        PrimitiveKind::Bool => "Bool",
        PrimitiveKind::I8 => "Int8",
        PrimitiveKind::I16 => "Int16",
        PrimitiveKind::I32 => "Int32",
        PrimitiveKind::I64 => "Int64",
        PrimitiveKind::U8 => "UInt8",
        PrimitiveKind::U16 => "UInt16",
        PrimitiveKind::U32 => "UInt32",
        PrimitiveKind::U64 => "UInt64",
        PrimitiveKind::F32 => "Float32",
        PrimitiveKind::F64 => "Float64",
        PrimitiveKind::String => "String",
        PrimitiveKind::Bytes => return None,
    };
    Some(name)
}

#[allow(clippy::expect_used)] // fixed definitions, covered by tests
fn build(builder: MessageDescriptorBuilder) -> Arc<MessageDescriptor> {
    Arc::new(builder.build().expect("std_msgs definition is well-formed"))
}

/// `std_msgs/MultiArrayDimension`: `string label`, `uint32 size`, `uint32 stride`.
pub fn multi_array_dimension() -> &'static Arc<MessageDescriptor> {
    static DESC: OnceLock<Arc<MessageDescriptor>> = OnceLock::new();
    DESC.get_or_init(|| {
        build(
            MessageDescriptorBuilder::new("std_msgs/MultiArrayDimension")
                .string_field("label")
                .field("size", PrimitiveKind::U32)
                .field("stride", PrimitiveKind::U32),
        )
    })
}

/// `std_msgs/MultiArrayLayout`: `MultiArrayDimension[] dim`, `uint32 data_offset`.
pub fn multi_array_layout() -> &'static Arc<MessageDescriptor> {
    static DESC: OnceLock<Arc<MessageDescriptor>> = OnceLock::new();
    DESC.get_or_init(|| {
        build(
            MessageDescriptorBuilder::new("std_msgs/MultiArrayLayout")
                .message_sequence_field("dim", Arc::clone(multi_array_dimension()))
                .field("data_offset", PrimitiveKind::U32),
        )
    })
}

/// `std_msgs/<Kind>MultiArray` for a numeric element kind.
pub fn multi_array(kind: PrimitiveKind) -> Option<&'static Arc<MessageDescriptor>> {
    static DESCS: OnceLock<Vec<Arc<MessageDescriptor>>> = OnceLock::new();
    let index = MULTI_ARRAY_KINDS.iter().position(|k| *k == kind)?;
    let descs = DESCS.get_or_init(|| {
        MULTI_ARRAY_KINDS
            .iter()
            .filter_map(|k| {
                let base = base_name(*k)?;
                Some(build(
                    MessageDescriptorBuilder::new(format!("{}/{}MultiArray", PACKAGE, base))
                        .message_field("layout", Arc::clone(multi_array_layout()))
                        .sequence_field("data", *k),
                ))
            })
            .collect()
    });
    descs.get(index)
}

/// `std_msgs/<Kind>` wrapper with a single `data` field.
pub fn wrapper(kind: PrimitiveKind) -> Option<&'static Arc<MessageDescriptor>> {
    static DESCS: OnceLock<Vec<Arc<MessageDescriptor>>> = OnceLock::new();
    let index = WRAPPER_KINDS.iter().position(|k| *k == kind)?;
    let descs = DESCS.get_or_init(|| {
        WRAPPER_KINDS
            .iter()
            .filter_map(|k| {
                let base = base_name(*k)?;
                Some(build(
                    MessageDescriptorBuilder::new(format!("{}/{}", PACKAGE, base)).field("data", *k),
                ))
            })
            .collect()
    });
    descs.get(index)
}

/// `std_msgs/Empty`.
pub fn empty() -> &'static Arc<MessageDescriptor> {
    static DESC: OnceLock<Arc<MessageDescriptor>> = OnceLock::new();
    DESC.get_or_init(|| build(MessageDescriptorBuilder::new("std_msgs/Empty")))
}

/// Every descriptor defined here, dependencies first.
pub fn all() -> Vec<Arc<MessageDescriptor>> {
    let mut out = vec![
        Arc::clone(empty()),
        Arc::clone(multi_array_dimension()),
        Arc::clone(multi_array_layout()),
    ];
    out.extend(MULTI_ARRAY_KINDS.iter().filter_map(|k| multi_array(*k)).cloned());
    out.extend(WRAPPER_KINDS.iter().filter_map(|k| wrapper(*k)).cloned());
    out
}

/// Register every `std_msgs` type into `registry`.
pub fn register(registry: &SchemaRegistry) -> Result<(), SchemaError> {
    let descriptors = all();
    let count = descriptors.len();
    for descriptor in descriptors {
        registry.register_descriptor(descriptor)?;
    }
    log::debug!("[hdds-msg] registered {} std_msgs types", count);
    Ok(())
}

// ---------------------------------------------------------------------------
// Typed layout helpers
// ---------------------------------------------------------------------------

/// One dimension of a multi-array layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiArrayDimension {
    pub label: String,
    pub size: u32,
    pub stride: u32,
}

impl MultiArrayDimension {
    pub fn new(label: impl Into<String>, size: u32, stride: u32) -> Self {
        Self {
            label: label.into(),
            size,
            stride,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut fields = Fields::with_capacity(3);
        fields.insert("label".to_string(), Value::String(self.label.clone()));
        fields.insert("size".to_string(), Value::from(self.size));
        fields.insert("stride".to_string(), Value::from(self.stride));
        Value::Message(fields)
    }

    /// Read back a `MultiArrayDimension` value. `None` if a field is
    /// missing or does not fit.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            label: value.get_field("label")?.as_str()?.to_string(),
            size: u32::try_from(value.get_field("size")?.as_int()?).ok()?,
            stride: u32::try_from(value.get_field("stride")?.as_int()?).ok()?,
        })
    }
}

/// Layout metadata of a multi-array: dimensions outermost first, plus the
/// offset of the first element in `data`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiArrayLayout {
    pub dim: Vec<MultiArrayDimension>,
    pub data_offset: u32,
}

impl MultiArrayLayout {
    pub fn new(dim: Vec<MultiArrayDimension>, data_offset: u32) -> Self {
        Self { dim, data_offset }
    }

    pub fn to_value(&self) -> Value {
        let mut fields = Fields::with_capacity(2);
        fields.insert(
            "dim".to_string(),
            Value::Array(self.dim.iter().map(MultiArrayDimension::to_value).collect()),
        );
        fields.insert("data_offset".to_string(), Value::from(self.data_offset));
        Value::Message(fields)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let dim = value
            .get_field("dim")?
            .as_array()?
            .iter()
            .map(MultiArrayDimension::from_value)
            .collect::<Option<Vec<_>>>()?;
        let data_offset = u32::try_from(value.get_field("data_offset")?.as_int()?).ok()?;
        Some(Self { dim, data_offset })
    }
}

/// Build a fixed-length array value for `field`, rejecting any other
/// element count. The error path names `field`.
pub fn fixed_array<T, I>(field: &str, values: I, length: usize) -> Result<Value, ValidationError>
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    let items: Vec<Value> = values.into_iter().map(Into::into).collect();
    if items.len() != length {
        return Err(ValidationError::new(
            field,
            ValidationReason::LengthMismatch {
                expected: length,
                actual: items.len(),
            },
        ));
    }
    Ok(Value::Array(items))
}
