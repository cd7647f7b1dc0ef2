// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary codec.
//!
//! Wire format, little-endian throughout:
//!
//! - fields in declaration order, no padding, no separators
//! - fixed-width primitives as their raw LE bytes (`bool` as one byte, 0 or 1)
//! - `string` and `bytes` as a `u32` byte count followed by the payload
//! - variable arrays as a `u32` element count followed by the elements
//! - fixed arrays as their elements only
//! - embedded messages inlined, with no prefix of their own
//!
//! Encoding always validates first. Decoding never panics and never
//! allocates more than the input can back: every count is checked against
//! the remaining bytes before anything is reserved. Arrays of elements
//! that encode to zero bytes draw from
//! [`CodecConfig::max_zero_size_elements`] instead.

mod decoder;
mod encoder;

use crate::config::{self, CodecConfig};
use crate::error::{DeserializationError, ValidationError};
use crate::message::Message;
use crate::schema::MessageDescriptor;
use crate::validate::validate;
use decoder::Decoder;
use encoder::{encoded_message_len, Encoder};
use std::sync::Arc;

/// Codec bound to one configuration.
///
/// The free functions in this module use the process-wide configuration
/// from [`config::current`]; build a `Codec` to pin limits per call site.
#[derive(Debug, Clone)]
pub struct Codec {
    config: Arc<CodecConfig>,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    /// Codec using the current process-wide configuration.
    pub fn new() -> Self {
        Self {
            config: config::current(),
        }
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Validate and encode into a fresh buffer.
    pub fn serialize(&self, message: &Message) -> Result<Vec<u8>, ValidationError> {
        validate(message)?;
        let mut buffer = Vec::with_capacity(encoded_message_len(message.fields(), message.descriptor()));
        Encoder::new(&mut buffer).encode_message(message.fields(), message.descriptor())?;
        log::trace!(
            "[hdds-msg] encoded {} ({} bytes)",
            message.type_name(),
            buffer.len()
        );
        Ok(buffer)
    }

    /// Validate and append the encoding to `buffer`. Returns the number of
    /// bytes written. On error `buffer` keeps its original contents.
    pub fn serialize_into(
        &self,
        message: &Message,
        buffer: &mut Vec<u8>,
    ) -> Result<usize, ValidationError> {
        validate(message)?;
        let start = buffer.len();
        buffer.reserve(encoded_message_len(message.fields(), message.descriptor()));
        let encoded = Encoder::new(buffer).encode_message(message.fields(), message.descriptor());
        if let Err(e) = encoded {
            buffer.truncate(start);
            return Err(e);
        }
        Ok(buffer.len() - start)
    }

    /// Decode a complete message. Unread input after the last field is an
    /// error unless the configuration allows trailing bytes.
    pub fn deserialize(
        &self,
        bytes: &[u8],
        descriptor: &Arc<MessageDescriptor>,
    ) -> Result<Message, DeserializationError> {
        let (message, consumed) = self.deserialize_prefix(bytes, descriptor)?;
        if consumed != bytes.len() {
            if self.config.allow_trailing_bytes {
                log::debug!(
                    "[hdds-msg] ignoring {} trailing bytes after {}",
                    bytes.len() - consumed,
                    descriptor.name()
                );
            } else {
                log::debug!(
                    "[hdds-msg] rejecting {}: {} of {} bytes consumed",
                    descriptor.name(),
                    consumed,
                    bytes.len()
                );
                return Err(DeserializationError::TrailingBytes {
                    consumed,
                    total: bytes.len(),
                });
            }
        }
        Ok(message)
    }

    /// Decode one message from the front of `bytes`, returning it with the
    /// number of bytes consumed.
    pub fn deserialize_prefix(
        &self,
        bytes: &[u8],
        descriptor: &Arc<MessageDescriptor>,
    ) -> Result<(Message, usize), DeserializationError> {
        let mut decoder = Decoder::new(bytes, &self.config);
        let fields = decoder.decode_message(descriptor).map_err(|e| {
            log::debug!("[hdds-msg] decode of {} failed: {}", descriptor.name(), e);
            e
        })?;
        let consumed = decoder.position();
        log::trace!(
            "[hdds-msg] decoded {} ({} of {} bytes)",
            descriptor.name(),
            consumed,
            bytes.len()
        );
        Ok((Message::from_fields(descriptor, fields), consumed))
    }

    /// Exact number of bytes `serialize` would produce.
    pub fn encoded_size(&self, message: &Message) -> Result<usize, ValidationError> {
        validate(message)?;
        Ok(encoded_message_len(message.fields(), message.descriptor()))
    }
}

/// Validate and encode with the process-wide configuration.
pub fn serialize(message: &Message) -> Result<Vec<u8>, ValidationError> {
    Codec::new().serialize(message)
}

/// Validate and append to `buffer`; see [`Codec::serialize_into`].
pub fn serialize_into(message: &Message, buffer: &mut Vec<u8>) -> Result<usize, ValidationError> {
    Codec::new().serialize_into(message, buffer)
}

/// Decode a complete message with the process-wide configuration.
pub fn deserialize(
    bytes: &[u8],
    descriptor: &Arc<MessageDescriptor>,
) -> Result<Message, DeserializationError> {
    Codec::new().deserialize(bytes, descriptor)
}

/// Decode one message from the front of `bytes`.
pub fn deserialize_prefix(
    bytes: &[u8],
    descriptor: &Arc<MessageDescriptor>,
) -> Result<(Message, usize), DeserializationError> {
    Codec::new().deserialize_prefix(bytes, descriptor)
}

pub fn encoded_size(message: &Message) -> Result<usize, ValidationError> {
    Codec::new().encoded_size(message)
}
