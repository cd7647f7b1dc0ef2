// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-identity hash.
//!
//! Two endpoints agree on a message type when their 128-bit MD5 hashes
//! match. The hash covers the *shape* of the type only: the flattened,
//! ordered list of field types, with embedded messages inlined. Field
//! names, type names and constants never participate, so renaming a field
//! keeps the hash while reordering, resizing or reshaping fields changes it.
//!
//! # Canonical signature
//!
//! One entry per line, in declaration order:
//!
//! ```text
//! int32              primitive (bytes renders as uint8[])
//! float64[]          variable array of primitive
//! uint8[3]           fixed array of primitive
//! <entries...>       embedded message, inlined
//! {uint32;uint32}[]  array of message, element entries joined by ';'
//! ```

mod cache;

pub use cache::{HashCache, LookupStats};

use crate::error::SchemaError;
use crate::schema::{FieldType, MessageDescriptor, PrimitiveKind};
use md5::{Digest, Md5};
use std::fmt;
use std::str::FromStr;

/// 128-bit type-identity hash (MD5 digest of the canonical signature).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHash([u8; 16]);

impl TypeHash {
    /// Create from raw 16-byte array
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Get the raw 16-byte array
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// MD5 of arbitrary signature text.
    pub fn of_signature(signature: &str) -> Self {
        let digest = Md5::digest(signature.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Lowercase hex rendering (32 characters).
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({})", self)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for TypeHash {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidHash(s.to_string());
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[2 * i..2 * i + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl From<[u8; 16]> for TypeHash {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for TypeHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Build the canonical signature of a message type.
pub fn canonical_signature(descriptor: &MessageDescriptor) -> String {
    let mut entries = Vec::new();
    flatten_message(descriptor, &mut entries);
    entries.join("\n")
}

/// Compute the type-identity hash of a message type.
///
/// Prefer [`MessageDescriptor::type_hash`], which caches the result.
pub fn type_hash(descriptor: &MessageDescriptor) -> TypeHash {
    let signature = canonical_signature(descriptor);
    log::trace!("[hdds-msg] signature of {}:\n{}", descriptor.name(), signature);
    let hash = TypeHash::of_signature(&signature);
    log::debug!("[hdds-msg] computed type hash {} for {}", hash, descriptor.name());
    hash
}

fn flatten_message(descriptor: &MessageDescriptor, out: &mut Vec<String>) {
    for field in descriptor.fields() {
        flatten_field(&field.field_type, out);
    }
}

fn flatten_field(field_type: &FieldType, out: &mut Vec<String>) {
    match field_type {
        FieldType::Primitive { kind, .. } => out.push(primitive_entry(*kind).to_string()),
        FieldType::Message(embedded) => flatten_message(embedded, out),
        FieldType::Array {
            element, length, ..
        } => {
            let suffix = match length {
                Some(n) => format!("[{}]", n),
                None => "[]".to_string(),
            };
            let entry = match element.as_ref() {
                FieldType::Message(embedded) => {
                    let mut inner = Vec::new();
                    flatten_message(embedded, &mut inner);
                    format!("{{{}}}{}", inner.join(";"), suffix)
                }
                other => {
                    let mut inner = Vec::new();
                    flatten_field(other, &mut inner);
                    format!("{}{}", inner.join(";"), suffix)
                }
            };
            out.push(entry);
        }
    }
}

fn primitive_entry(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Bytes => "uint8[]",
        other => other.type_name(),
    }
}
