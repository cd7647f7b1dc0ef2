// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire decoder.

use crate::config::{CodecConfig, LENGTH_PREFIX_SIZE};
use crate::error::DeserializationError;
use crate::path::FieldPath;
use crate::schema::{FieldType, MessageDescriptor, PrimitiveKind};
use crate::value::{Fields, Value};

/// Reads values from a byte slice, bounds-checking every read.
pub(crate) struct Decoder<'a> {
    buffer: &'a [u8],
    offset: usize,
    max_collection_len: usize,
    /// Zero-size elements still allowed in this decode.
    zero_size_budget: usize,
    path: FieldPath<'a>,
}

macro_rules! get_int {
    ($self:ident, $ty:ty) => {{
        let raw = $self.read_array::<{ std::mem::size_of::<$ty>() }>()?;
        Value::Int(i128::from(<$ty>::from_le_bytes(raw)))
    }};
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(buffer: &'a [u8], config: &CodecConfig) -> Self {
        Self {
            buffer,
            offset: 0,
            max_collection_len: config.max_collection_len,
            zero_size_budget: config.max_zero_size_elements,
            path: FieldPath::new(),
        }
    }

    /// Bytes read so far.
    pub(crate) fn position(&self) -> usize {
        self.offset
    }

    fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    pub(crate) fn decode_message(
        &mut self,
        descriptor: &'a MessageDescriptor,
    ) -> Result<Fields, DeserializationError> {
        let mut fields = Fields::with_capacity(descriptor.fields().len());
        for field in descriptor.fields() {
            self.path.push_field(&field.name);
            let value = self.decode_value(&field.field_type)?;
            self.path.pop();
            fields.insert(field.name.clone(), value);
        }
        Ok(fields)
    }

    fn decode_value(&mut self, field_type: &'a FieldType) -> Result<Value, DeserializationError> {
        match field_type {
            FieldType::Primitive { kind, bound } => self.decode_primitive(*kind, *bound),
            FieldType::Message(descriptor) => Ok(Value::Message(self.decode_message(descriptor)?)),
            FieldType::Array {
                element,
                length,
                bound,
            } => {
                let count = match length {
                    Some(n) => *n,
                    None => {
                        let count = self.read_count(element.min_wire_size())?;
                        self.check_bound(count, *bound)?;
                        count
                    }
                };
                if let FieldType::Primitive {
                    kind: PrimitiveKind::U8,
                    ..
                } = element.as_ref()
                {
                    let raw = self.read_bytes(count)?;
                    return Ok(Value::Array(raw.iter().map(|b| Value::Int(i128::from(*b))).collect()));
                }

                let mut items = Vec::with_capacity(count.min(self.remaining().max(1)));
                for i in 0..count {
                    self.path.push_index(i);
                    items.push(self.decode_value(element)?);
                    self.path.pop();
                }
                Ok(Value::Array(items))
            }
        }
    }

    fn decode_primitive(
        &mut self,
        kind: PrimitiveKind,
        bound: Option<usize>,
    ) -> Result<Value, DeserializationError> {
        let value = match kind {
            PrimitiveKind::Bool => match self.read_array::<1>()?[0] {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                byte => {
                    return Err(DeserializationError::InvalidBool {
                        path: self.path.render(),
                        byte,
                    })
                }
            },
            PrimitiveKind::I8 => get_int!(self, i8),
            PrimitiveKind::I16 => get_int!(self, i16),
            PrimitiveKind::I32 => get_int!(self, i32),
            PrimitiveKind::I64 => get_int!(self, i64),
            PrimitiveKind::U8 => get_int!(self, u8),
            PrimitiveKind::U16 => get_int!(self, u16),
            PrimitiveKind::U32 => get_int!(self, u32),
            PrimitiveKind::U64 => get_int!(self, u64),
            PrimitiveKind::F32 => Value::F32(f32::from_le_bytes(self.read_array()?)),
            PrimitiveKind::F64 => Value::F64(f64::from_le_bytes(self.read_array()?)),
            PrimitiveKind::String => {
                let raw = self.read_prefixed(bound)?;
                let text = std::str::from_utf8(raw).map_err(|_| DeserializationError::InvalidUtf8 {
                    path: self.path.render(),
                })?;
                Value::String(text.to_owned())
            }
            PrimitiveKind::Bytes => Value::Bytes(self.read_prefixed(bound)?.to_vec()),
        };
        Ok(value)
    }

    fn read_prefixed(&mut self, bound: Option<usize>) -> Result<&'a [u8], DeserializationError> {
        let len = self.read_count(1)?;
        self.check_bound(len, bound)?;
        self.read_bytes(len)
    }

    /// Read a 4-byte count and reject it before anything is allocated if it
    /// exceeds the configured limit or cannot fit in the remaining input.
    ///
    /// Elements that encode to zero bytes are not bounded by the input, so
    /// their counts draw from a per-decode budget instead.
    fn read_count(&mut self, min_element_size: usize) -> Result<usize, DeserializationError> {
        let count = u32::from_le_bytes(self.read_array::<LENGTH_PREFIX_SIZE>()?) as usize;
        if count > self.max_collection_len {
            return Err(DeserializationError::CollectionTooLong {
                path: self.path.render(),
                count,
                max: self.max_collection_len,
            });
        }
        if min_element_size == 0 {
            if count > self.zero_size_budget {
                return Err(DeserializationError::CollectionTooLong {
                    path: self.path.render(),
                    count,
                    max: self.zero_size_budget,
                });
            }
            self.zero_size_budget -= count;
            return Ok(count);
        }
        let need = count.saturating_mul(min_element_size);
        if need > self.remaining() {
            return Err(DeserializationError::CountExceedsBuffer {
                path: self.path.render(),
                count,
                need,
                remaining: self.remaining(),
            });
        }
        Ok(count)
    }

    fn check_bound(&self, len: usize, bound: Option<usize>) -> Result<(), DeserializationError> {
        match bound {
            Some(max) if len > max => Err(DeserializationError::BoundExceeded {
                path: self.path.render(),
                bound: max,
                actual: len,
            }),
            _ => Ok(()),
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DeserializationError> {
        let buffer = self.buffer;
        let slice = self
            .offset
            .checked_add(count)
            .and_then(|end| buffer.get(self.offset..end))
            .ok_or_else(|| DeserializationError::Truncated {
                path: self.path.render(),
                need: count,
                have: self.remaining(),
            })?;
        self.offset += count;
        Ok(slice)
    }
}
