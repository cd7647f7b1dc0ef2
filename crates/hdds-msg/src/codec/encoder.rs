// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire encoder.

use crate::config::LENGTH_PREFIX_SIZE;
use crate::error::{ValidationError, ValidationReason};
use crate::path::FieldPath;
use crate::schema::{FieldType, MessageDescriptor, PrimitiveKind};
use crate::value::{Fields, Value};

/// Appends the encoding of validated values to a caller-owned buffer.
///
/// The validator has already accepted the input; the checks here only keep
/// the encoder total (no panics, no silent truncation) if it is ever handed
/// something else.
pub(crate) struct Encoder<'a, 'b> {
    buffer: &'b mut Vec<u8>,
    path: FieldPath<'a>,
}

macro_rules! put_int {
    ($self:ident, $value:expr, $ty:ty, $kind:expr) => {{
        let n = <$ty>::try_from($value).map_err(|_| $self.out_of_range($value, $kind))?;
        $self.buffer.extend_from_slice(&n.to_le_bytes());
        Ok(())
    }};
}

impl<'a, 'b> Encoder<'a, 'b> {
    pub(crate) fn new(buffer: &'b mut Vec<u8>) -> Self {
        Self {
            buffer,
            path: FieldPath::new(),
        }
    }

    /// Encode every declared field in order. Embedded messages are inlined;
    /// nothing separates fields.
    pub(crate) fn encode_message(
        &mut self,
        fields: &'a Fields,
        descriptor: &'a MessageDescriptor,
    ) -> Result<(), ValidationError> {
        for field in descriptor.fields() {
            self.path.push_field(&field.name);
            let Some(value) = fields.get(&field.name) else {
                return Err(self.fail(ValidationReason::MissingField));
            };
            self.encode_value(value, &field.field_type)?;
            self.path.pop();
        }
        Ok(())
    }

    fn encode_value(
        &mut self,
        value: &'a Value,
        field_type: &'a FieldType,
    ) -> Result<(), ValidationError> {
        match (field_type, value) {
            (FieldType::Primitive { kind, .. }, value) => self.encode_primitive(value, *kind),
            (FieldType::Message(descriptor), Value::Message(fields)) => {
                self.encode_message(fields, descriptor)
            }
            (
                FieldType::Array {
                    element, length, ..
                },
                Value::Array(items),
            ) => {
                match length {
                    // Fixed arrays carry no count on the wire.
                    Some(expected) if items.len() != *expected => {
                        return Err(self.fail(ValidationReason::LengthMismatch {
                            expected: *expected,
                            actual: items.len(),
                        }));
                    }
                    Some(_) => {}
                    None => self.write_len(items.len())?,
                }
                for (i, item) in items.iter().enumerate() {
                    self.path.push_index(i);
                    self.encode_value(item, element)?;
                    self.path.pop();
                }
                Ok(())
            }
            (expected, found) => Err(self.mismatch(expected, found)),
        }
    }

    fn encode_primitive(&mut self, value: &Value, kind: PrimitiveKind) -> Result<(), ValidationError> {
        match (kind, value) {
            (PrimitiveKind::Bool, Value::Bool(b)) => {
                self.buffer.push(u8::from(*b));
                Ok(())
            }
            (PrimitiveKind::I8, Value::Int(v)) => put_int!(self, *v, i8, kind),
            (PrimitiveKind::I16, Value::Int(v)) => put_int!(self, *v, i16, kind),
            (PrimitiveKind::I32, Value::Int(v)) => put_int!(self, *v, i32, kind),
            (PrimitiveKind::I64, Value::Int(v)) => put_int!(self, *v, i64, kind),
            (PrimitiveKind::U8, Value::Int(v)) => put_int!(self, *v, u8, kind),
            (PrimitiveKind::U16, Value::Int(v)) => put_int!(self, *v, u16, kind),
            (PrimitiveKind::U32, Value::Int(v)) => put_int!(self, *v, u32, kind),
            (PrimitiveKind::U64, Value::Int(v)) => put_int!(self, *v, u64, kind),
            (PrimitiveKind::F32, Value::F32(v)) => {
                self.buffer.extend_from_slice(&v.to_le_bytes());
                Ok(())
            }
            (PrimitiveKind::F32, Value::F64(v)) => {
                self.buffer.extend_from_slice(&(*v as f32).to_le_bytes());
                Ok(())
            }
            (PrimitiveKind::F64, Value::F64(v)) => {
                self.buffer.extend_from_slice(&v.to_le_bytes());
                Ok(())
            }
            (PrimitiveKind::F64, Value::F32(v)) => {
                self.buffer.extend_from_slice(&f64::from(*v).to_le_bytes());
                Ok(())
            }
            (PrimitiveKind::String, Value::String(s)) => self.write_prefixed(s.as_bytes()),
            (PrimitiveKind::Bytes, Value::Bytes(b)) => self.write_prefixed(b),
            (k, found) => Err(self.mismatch(&FieldType::primitive(k), found)),
        }
    }

    fn write_prefixed(&mut self, data: &[u8]) -> Result<(), ValidationError> {
        self.write_len(data.len())?;
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<(), ValidationError> {
        let prefix = u32::try_from(len).map_err(|_| {
            self.fail(ValidationReason::BoundExceeded {
                bound: u32::MAX as usize,
                actual: len,
            })
        })?;
        self.buffer.extend_from_slice(&prefix.to_le_bytes());
        Ok(())
    }

    fn out_of_range(&self, value: i128, kind: PrimitiveKind) -> ValidationError {
        let kind_name = kind.type_name();
        if value < 0 && !kind.is_signed() {
            self.fail(ValidationReason::NegativeUnsigned {
                value,
                kind: kind_name,
            })
        } else {
            self.fail(ValidationReason::OutOfRange {
                value,
                kind: kind_name,
            })
        }
    }

    fn mismatch(&self, expected: &FieldType, found: &Value) -> ValidationError {
        self.fail(ValidationReason::TypeMismatch {
            expected: expected.type_name(),
            found: found.kind_name(),
        })
    }

    fn fail(&self, reason: ValidationReason) -> ValidationError {
        ValidationError::new(self.path.render(), reason)
    }
}

/// Exact encoded length of a value already accepted by the validator.
pub(crate) fn encoded_len(value: &Value, field_type: &FieldType) -> usize {
    match (field_type, value) {
        (FieldType::Primitive { kind, .. }, value) => match kind.wire_size() {
            Some(size) => size,
            None => {
                let payload = match value {
                    Value::String(s) => s.len(),
                    Value::Bytes(b) => b.len(),
                    _ => 0,
                };
                LENGTH_PREFIX_SIZE + payload
            }
        },
        (FieldType::Message(descriptor), Value::Message(fields)) => {
            encoded_message_len(fields, descriptor)
        }
        (
            FieldType::Array {
                element, length, ..
            },
            Value::Array(items),
        ) => {
            let prefix = if length.is_some() { 0 } else { LENGTH_PREFIX_SIZE };
            items
                .iter()
                .fold(prefix, |acc, item| acc + encoded_len(item, element))
        }
        _ => 0,
    }
}

pub(crate) fn encoded_message_len(fields: &Fields, descriptor: &MessageDescriptor) -> usize {
    descriptor
        .fields()
        .iter()
        .filter_map(|f| fields.get(&f.name).map(|v| encoded_len(v, &f.field_type)))
        .sum()
}
