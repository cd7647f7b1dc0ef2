// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for MessageDescriptor.

use super::{Constant, ConstantValue, FieldDescriptor, FieldType, MessageDescriptor, PrimitiveKind};
use crate::error::SchemaError;
use std::sync::Arc;

/// Builder for creating MessageDescriptor instances.
#[derive(Debug)]
pub struct MessageDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    constants: Vec<Constant>,
    error: Option<SchemaError>,
}

impl MessageDescriptorBuilder {
    /// Create a new builder for a message type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constants: Vec::new(),
            error: None,
        }
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, FieldType::primitive(kind))
    }

    /// Add a field with an explicit type.
    pub fn field_with_type(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDescriptor::new(name, field_type));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    pub fn bounded_string_field(self, name: impl Into<String>, max_length: usize) -> Self {
        self.field_with_type(name, FieldType::bounded(PrimitiveKind::String, max_length))
    }

    pub fn bytes_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::Bytes)
    }

    /// Add a fixed-length array field.
    pub fn array_field(self, name: impl Into<String>, element: PrimitiveKind, length: usize) -> Self {
        self.field_with_type(
            name,
            FieldType::fixed_array(FieldType::primitive(element), length),
        )
    }

    /// Add a variable-length array field.
    pub fn sequence_field(self, name: impl Into<String>, element: PrimitiveKind) -> Self {
        self.field_with_type(name, FieldType::sequence(FieldType::primitive(element)))
    }

    pub fn bounded_sequence_field(
        self,
        name: impl Into<String>,
        element: PrimitiveKind,
        max_length: usize,
    ) -> Self {
        self.field_with_type(
            name,
            FieldType::bounded_sequence(FieldType::primitive(element), max_length),
        )
    }

    /// Add an embedded message field.
    pub fn message_field(self, name: impl Into<String>, message: Arc<MessageDescriptor>) -> Self {
        self.field_with_type(name, FieldType::Message(message))
    }

    /// Add a fixed-length array of embedded messages.
    pub fn message_array_field(
        self,
        name: impl Into<String>,
        message: Arc<MessageDescriptor>,
        length: usize,
    ) -> Self {
        self.field_with_type(name, FieldType::fixed_array(FieldType::Message(message), length))
    }

    /// Add a variable-length array of embedded messages.
    pub fn message_sequence_field(
        self,
        name: impl Into<String>,
        message: Arc<MessageDescriptor>,
    ) -> Self {
        self.field_with_type(name, FieldType::sequence(FieldType::Message(message)))
    }

    /// Declare a constant. An invalid value is reported by [`build`](Self::build).
    pub fn constant(
        mut self,
        name: impl Into<String>,
        kind: PrimitiveKind,
        value: impl Into<ConstantValue>,
    ) -> Self {
        match Constant::new(name, kind, value) {
            Ok(constant) => self.constants.push(constant),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Build the MessageDescriptor.
    pub fn build(self) -> Result<MessageDescriptor, SchemaError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        MessageDescriptor::new(self.name, self.fields, self.constants)
    }
}
