// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field-type table and message type descriptors.
//!
//! A [`MessageDescriptor`] is the resolved, immutable form of one message
//! type: its ordered fields (which is also wire order) and its constants.
//! Descriptors are built directly with [`MessageDescriptorBuilder`] or
//! resolved by name from a [`SchemaRegistry`].

mod builder;
mod descriptor;
mod field_type;
#[cfg(feature = "loaders")]
mod loader;
mod registry;
mod text;

pub use builder::MessageDescriptorBuilder;
pub use descriptor::{Constant, ConstantValue, FieldDescriptor, MessageDescriptor};
pub use field_type::{ArraySpec, BaseType, FieldType, PrimitiveKind, TypeSpec};
#[cfg(feature = "loaders")]
pub use loader::{SchemaDocument, SchemaLoader};
pub use registry::{ConstantSchema, FieldSchema, MessageSchema, RawConstant, SchemaRegistry};
