// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message serialization and type-descriptor runtime.
//!
//! Typed records described at runtime by a [`MessageDescriptor`], encoded
//! to a compact little-endian wire format and identified by a 128-bit
//! structural hash.
//!
//! # Features
//!
//! - **Field-type table**: primitive kinds, fixed and variable arrays,
//!   embedded message types, constants
//! - **Value container**: [`Message`] with defaults, positional/named
//!   construction and typed accessors
//! - **Type identity**: MD5 over the flattened field layout, stable under
//!   renames, cached per type
//! - **Validation**: integer widths, unsigned sign, fixed-array lengths and
//!   declared maxima, checked before every encode
//! - **Codec**: length-prefixed strings/arrays, inlined embedded types,
//!   bounds-checked decoding
//! - **std_msgs**: multi-array layout types and primitive wrappers
//!
//! # Architecture
//!
//! ```text
//!   MessageSchema (loader / registry)
//!          |  resolve (cycle check)
//!          v
//!   Arc<MessageDescriptor> ----> TypeHash (cached)
//!          |
//!          v
//!      Message --validate--> encode --> bytes
//!          ^                              |
//!          +------------ decode <---------+
//! ```
//!
//! # Example
//!
//! ```
//! use hdds_msg::{Message, MessageDescriptorBuilder, PrimitiveKind};
//! use std::sync::Arc;
//!
//! let desc = Arc::new(
//!     MessageDescriptorBuilder::new("demo_msgs/Sample")
//!         .field("x", PrimitiveKind::I32)
//!         .string_field("name")
//!         .sequence_field("samples", PrimitiveKind::F64)
//!         .build()?,
//! );
//!
//! let msg = Message::builder(&desc)
//!     .arg(-17)
//!     .named("name", "probe")
//!     .named("samples", vec![1.5, -2.25])
//!     .build()?;
//!
//! let bytes = msg.serialize()?;
//! assert_eq!(bytes.len(), 33);
//!
//! let decoded = hdds_msg::codec::deserialize(&bytes, &desc)?;
//! assert_eq!(decoded, msg);
//! # Ok::<(), hdds_msg::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod message;
pub mod schema;
pub mod std_types;
pub mod validate;
pub mod value;

mod path;

pub use codec::{deserialize, serialize, Codec};
pub use config::CodecConfig;
pub use error::{
    ConstructionError, DeserializationError, Error, Result, SchemaError, ValidationError,
    ValidationReason,
};
pub use hash::{canonical_signature, type_hash, HashCache, TypeHash};
pub use message::{Message, MessageBuilder};
pub use schema::{
    Constant, ConstantValue, FieldDescriptor, FieldType, MessageDescriptor,
    MessageDescriptorBuilder, MessageSchema, PrimitiveKind, SchemaRegistry,
};
pub use validate::{validate, validate_value};
pub use value::{Fields, FromValue, Value};

#[cfg(feature = "loaders")]
pub use schema::SchemaLoader;
