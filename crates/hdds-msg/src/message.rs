// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message container for runtime data manipulation.

use crate::codec;
use crate::error::{ConstructionError, DeserializationError, ValidationError};
use crate::hash::TypeHash;
use crate::schema::{ConstantValue, FieldDescriptor, FieldType, MessageDescriptor};
use crate::value::{Fields, FromValue, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// One instance of a message type: a value for every declared field.
///
/// Values are not range-checked on assignment; the validator runs before
/// every encode. Equality compares the type name and every field value
/// (floats exactly).
#[derive(Debug, Clone)]
pub struct Message {
    descriptor: Arc<MessageDescriptor>,
    fields: Fields,
}

impl Message {
    /// Create a message with every field at its default value.
    pub fn new(descriptor: &Arc<MessageDescriptor>) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            fields: Value::default_fields(descriptor),
        }
    }

    /// Start a positional/named construction.
    pub fn builder(descriptor: &Arc<MessageDescriptor>) -> MessageBuilder {
        MessageBuilder::new(descriptor)
    }

    /// Wrap an existing field map without checking it.
    pub fn from_fields(descriptor: &Arc<MessageDescriptor>, fields: Fields) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            fields,
        }
    }

    pub fn descriptor(&self) -> &Arc<MessageDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn type_hash(&self) -> TypeHash {
        self.descriptor.type_hash()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Raw field map. Nothing is checked until the next validation.
    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// The message as an embeddable value.
    pub fn to_value(&self) -> Value {
        Value::Message(self.fields.clone())
    }

    /// Declared fields with their values, in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> + '_ {
        self.descriptor
            .fields()
            .iter()
            .map(move |f| (f.name.as_str(), self.fields.get(&f.name)))
    }

    /// Value of a declared constant.
    pub fn constant(&self, name: &str) -> Option<&ConstantValue> {
        self.descriptor.constant(name)
    }

    /// Read a field as a Rust type.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, ConstructionError> {
        let value = self.get_field(name)?;
        T::from_value(value).ok_or_else(|| ConstructionError::TypeMismatch {
            field: name.to_string(),
            expected: T::NAME,
            found: value.kind_name(),
        })
    }

    pub fn get_field(&self, name: &str) -> Result<&Value, ConstructionError> {
        self.fields.get(name).ok_or_else(|| self.unknown(name))
    }

    pub fn get_field_mut(&mut self, name: &str) -> Result<&mut Value, ConstructionError> {
        let Some(field) = self.descriptor.field(name) else {
            return Err(self.unknown(name));
        };
        Ok(self
            .fields
            .entry(field.name.clone())
            .or_insert_with(|| Value::default_for(&field.field_type)))
    }

    /// Assign a declared field. Float widths and integer-to-float
    /// conversions follow the declared type; a fixed-length array field
    /// only accepts exactly its declared element count.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ConstructionError> {
        let field = self.descriptor.field(name).ok_or_else(|| self.unknown(name))?;
        let value = prepare(field, value.into())?;
        self.fields.insert(field.name.clone(), value);
        Ok(())
    }

    /// Validate and encode.
    pub fn serialize(&self) -> Result<Vec<u8>, ValidationError> {
        codec::serialize(self)
    }

    /// Decode `bytes` into this message, replacing every declared field.
    ///
    /// On failure the message is left unchanged.
    pub fn deserialize_into(&mut self, bytes: &[u8]) -> Result<(), DeserializationError> {
        let decoded = codec::deserialize(bytes, &self.descriptor)?;
        self.fields = decoded.fields;
        Ok(())
    }

    fn unknown(&self, name: &str) -> ConstructionError {
        ConstructionError::UnknownField {
            type_name: self.descriptor.name().to_string(),
            field: name.to_string(),
        }
    }
}

/// Coerce a value to its field's type and reject a fixed-length array of
/// the wrong size.
fn prepare(field: &FieldDescriptor, value: Value) -> Result<Value, ConstructionError> {
    let value = value.coerce_to(&field.field_type);
    if let (
        FieldType::Array {
            length: Some(expected),
            ..
        },
        Value::Array(items),
    ) = (&field.field_type, &value)
    {
        if items.len() != *expected {
            return Err(ConstructionError::LengthMismatch {
                field: field.name.clone(),
                expected: *expected,
                actual: items.len(),
            });
        }
    }
    Ok(value)
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name() == other.descriptor.name() && self.fields == other.fields
    }
}

// ---------------------------------------------------------------------------
// MessageBuilder
// ---------------------------------------------------------------------------

/// Positional and named construction.
///
/// Positional values fill fields in declaration order; named values set the
/// field of that name; everything else keeps its default.
///
/// ```
/// use hdds_msg::schema::{MessageDescriptorBuilder, PrimitiveKind};
/// use hdds_msg::Message;
/// use std::sync::Arc;
///
/// let desc = Arc::new(
///     MessageDescriptorBuilder::new("std_msgs/MultiArrayDimension")
///         .string_field("label")
///         .field("size", PrimitiveKind::U32)
///         .field("stride", PrimitiveKind::U32)
///         .build()
///         .unwrap(),
/// );
/// let positional = Message::builder(&desc).arg("foo").arg(1u32).arg(2u32).build().unwrap();
/// let named = Message::builder(&desc)
///     .named("stride", 2u32)
///     .named("label", "foo")
///     .named("size", 1u32)
///     .build()
///     .unwrap();
/// assert_eq!(positional, named);
/// ```
#[derive(Debug)]
pub struct MessageBuilder {
    descriptor: Arc<MessageDescriptor>,
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl MessageBuilder {
    pub fn new(descriptor: &Arc<MessageDescriptor>) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Next positional value.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Several positional values at once.
    pub fn positional<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.positional.extend(values.into_iter().map(Into::into));
        self
    }

    /// Value for the field called `name`.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Build the message, failing on the first unknown name, surplus
    /// positional value, or field supplied twice.
    pub fn build(self) -> Result<Message, ConstructionError> {
        let declared = self.descriptor.fields();
        if self.positional.len() > declared.len() {
            return Err(ConstructionError::TooManyPositional {
                type_name: self.descriptor.name().to_string(),
                declared: declared.len(),
                supplied: self.positional.len(),
            });
        }

        let mut message = Message::new(&self.descriptor);
        let positional_count = self.positional.len();
        for (field, value) in declared.iter().zip(self.positional) {
            message.fields.insert(field.name.clone(), prepare(field, value)?);
        }

        let mut seen = HashSet::new();
        for (name, value) in self.named {
            let index = self
                .descriptor
                .field_index(&name)
                .ok_or_else(|| message.unknown(&name))?;
            if index < positional_count {
                return Err(ConstructionError::Conflict { field: name });
            }
            if !seen.insert(index) {
                return Err(ConstructionError::Duplicate { field: name });
            }
            let field = &declared[index];
            message.fields.insert(field.name.clone(), prepare(field, value)?);
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MessageDescriptorBuilder, PrimitiveKind};

    fn dimension() -> Arc<MessageDescriptor> {
        Arc::new(
            MessageDescriptorBuilder::new("std_msgs/MultiArrayDimension")
                .string_field("label")
                .field("size", PrimitiveKind::U32)
                .field("stride", PrimitiveKind::U32)
                .constant("MAX_RANK", PrimitiveKind::U8, 8)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_new_defaults() {
        let msg = Message::new(&dimension());
        assert_eq!(msg.get::<String>("label").unwrap(), "");
        assert_eq!(msg.get::<u32>("size").unwrap(), 0);
        assert_eq!(msg.type_name(), "std_msgs/MultiArrayDimension");
        assert_eq!(msg.constant("MAX_RANK"), Some(&ConstantValue::Int(8)));
    }

    #[test]
    fn test_positional_named_and_mixed_agree() {
        let desc = dimension();
        let positional = Message::builder(&desc)
            .positional(vec![Value::from("foo"), Value::from(1u32), Value::from(2u32)])
            .build()
            .unwrap();
        let named = Message::builder(&desc)
            .named("size", 1u32)
            .named("stride", 2u32)
            .named("label", "foo")
            .build()
            .unwrap();
        let mixed = Message::builder(&desc)
            .arg("foo")
            .named("stride", 2u32)
            .named("size", 1u32)
            .build()
            .unwrap();
        assert_eq!(positional, named);
        assert_eq!(positional, mixed);

        let partial = Message::builder(&desc).arg("foo").build().unwrap();
        assert_eq!(partial.get::<u32>("stride").unwrap(), 0);
        assert_ne!(partial, positional);
    }

    #[test]
    fn test_construction_errors() {
        let desc = dimension();

        let err = Message::builder(&desc).named("nope", 1).build().unwrap_err();
        assert_eq!(
            err,
            ConstructionError::UnknownField {
                type_name: "std_msgs/MultiArrayDimension".into(),
                field: "nope".into()
            }
        );

        let err = Message::builder(&desc)
            .positional([1, 2, 3, 4])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConstructionError::TooManyPositional { supplied: 4, .. }));

        let err = Message::builder(&desc)
            .arg("foo")
            .named("label", "bar")
            .build()
            .unwrap_err();
        assert_eq!(err, ConstructionError::Conflict { field: "label".into() });

        let err = Message::builder(&desc)
            .named("size", 1u32)
            .named("size", 2u32)
            .build()
            .unwrap_err();
        assert_eq!(err, ConstructionError::Duplicate { field: "size".into() });
    }

    #[test]
    fn test_fixed_array_length_checked_on_construction() {
        let desc = Arc::new(
            MessageDescriptorBuilder::new("pkg/Triple")
                .array_field("v", PrimitiveKind::I32, 3)
                .build()
                .unwrap(),
        );

        for wrong in [vec![1i32, 2], vec![1, 2, 3, 4]] {
            let len = wrong.len();
            let err = Message::builder(&desc).arg(wrong.clone()).build().unwrap_err();
            assert_eq!(
                err,
                ConstructionError::LengthMismatch {
                    field: "v".into(),
                    expected: 3,
                    actual: len
                }
            );
            assert!(matches!(
                Message::builder(&desc).named("v", wrong.clone()).build(),
                Err(ConstructionError::LengthMismatch { actual, .. }) if actual == len
            ));

            let mut msg = Message::new(&desc);
            assert!(matches!(
                msg.set("v", wrong),
                Err(ConstructionError::LengthMismatch { expected: 3, .. })
            ));
            assert_eq!(msg, Message::new(&desc));
        }

        let msg = Message::builder(&desc).arg(vec![1i32, 2, 3]).build().unwrap();
        assert_eq!(msg.get::<Vec<i32>>("v").unwrap(), vec![1, 2, 3]);
        let mut other = Message::new(&desc);
        other.set("v", vec![1i32, 2, 3]).unwrap();
        assert_eq!(other, msg);
        let named = Message::builder(&desc).named("v", vec![1i32, 2, 3]).build().unwrap();
        assert_eq!(named, msg);
    }

    #[test]
    fn test_get_set() {
        let mut msg = Message::new(&dimension());
        msg.set("size", 42u32).unwrap();
        assert_eq!(msg.get::<u32>("size").unwrap(), 42);
        assert_eq!(msg.get::<i64>("size").unwrap(), 42);

        assert!(matches!(
            msg.set("missing", 1),
            Err(ConstructionError::UnknownField { .. })
        ));
        assert!(matches!(
            msg.get::<String>("size"),
            Err(ConstructionError::TypeMismatch { expected: "String", found: "integer", .. })
        ));

        let order: Vec<&str> = msg.iter().map(|(name, _)| name).collect();
        assert_eq!(order, ["label", "size", "stride"]);
    }

    #[test]
    fn test_float32_narrowed_on_set() {
        let desc = Arc::new(
            MessageDescriptorBuilder::new("std_msgs/Float32")
                .field("data", PrimitiveKind::F32)
                .build()
                .unwrap(),
        );
        let mut msg = Message::new(&desc);
        msg.set("data", 0.1f64).unwrap();
        assert_eq!(msg.get_field("data").unwrap(), &Value::F32(0.1));
    }

    #[test]
    fn test_equality_needs_same_type_name() {
        let a = Arc::new(
            MessageDescriptorBuilder::new("pkg/A")
                .field("data", PrimitiveKind::I32)
                .build()
                .unwrap(),
        );
        let b = Arc::new(
            MessageDescriptorBuilder::new("pkg/B")
                .field("data", PrimitiveKind::I32)
                .build()
                .unwrap(),
        );
        assert_ne!(Message::new(&a), Message::new(&b));
        assert_eq!(Message::new(&a), Message::new(&a));
    }
}
