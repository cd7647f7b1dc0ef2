// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error kinds for schema resolution, validation, construction and decoding.
//!
//! Every failure surfaces as a typed error; nothing is silently replaced by a
//! default value.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Umbrella error for callers that do not care which stage failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Errors raised while building or resolving message types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A type embeds itself, directly or through other types.
    #[error("cyclic type graph: {}", .path.join(" -> "))]
    CyclicType { path: Vec<String> },

    #[error(
        "unknown type '{name}'{}",
        .referenced_by.as_deref().map(|r| format!(" referenced by '{}'", r)).unwrap_or_default()
    )]
    UnknownType {
        name: String,
        referenced_by: Option<String>,
    },

    #[error("type '{type_name}' declares field '{field}' twice")]
    DuplicateField { type_name: String, field: String },

    #[error("type '{type_name}' declares constant '{constant}' twice")]
    DuplicateConstant { type_name: String, constant: String },

    #[error("field '{field}': arrays of arrays are not supported")]
    NestedArray { field: String },

    #[error("constant '{name}' cannot hold {reason}")]
    InvalidConstant { name: String, reason: String },

    #[error("invalid field type '{0}'")]
    InvalidFieldType(String),

    /// A type name was registered again with a different definition.
    #[error("type '{name}' is already registered with a different definition")]
    Redefined { name: String },

    #[error("invalid type hash '{0}'")]
    InvalidHash(String),

    #[error("failed to load schema document: {0}")]
    Load(String),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A value that cannot be represented by its declared field type.
///
/// `path` names the offending field with dotted names and `[i]` indices,
/// e.g. `layout.dim[1].size`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{path}': {reason}")]
pub struct ValidationError {
    pub path: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("value {value} out of range for {kind}")]
    OutOfRange { value: i128, kind: &'static str },

    #[error("negative value {value} for unsigned {kind}")]
    NegativeUnsigned { value: i128, kind: &'static str },

    /// Fixed-length array holding the wrong number of elements.
    #[error("expected exactly {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Declared maximum length (or the 4-byte wire prefix) exceeded.
    #[error("length {actual} exceeds maximum {bound}")]
    BoundExceeded { bound: usize, actual: usize },

    #[error("missing field")]
    MissingField,

    #[error("field is not declared by the type")]
    UnknownField,
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

/// Malformed or incompatible input bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    #[error("input truncated at '{path}': need {need} bytes, have {have}")]
    Truncated {
        path: String,
        need: usize,
        have: usize,
    },

    /// A length/count prefix promising more data than the input holds.
    #[error("count {count} at '{path}' needs at least {need} bytes, only {remaining} remain")]
    CountExceedsBuffer {
        path: String,
        count: usize,
        need: usize,
        remaining: usize,
    },

    #[error("invalid UTF-8 in string at '{path}'")]
    InvalidUtf8 { path: String },

    #[error("invalid boolean byte 0x{byte:02x} at '{path}'")]
    InvalidBool { path: String, byte: u8 },

    /// Count above the configured collection limit.
    #[error("collection at '{path}' holds {count} elements, limit is {max}")]
    CollectionTooLong {
        path: String,
        count: usize,
        max: usize,
    },

    /// Decoded length above the declared maximum of a bounded field.
    #[error("length {actual} at '{path}' exceeds declared maximum {bound}")]
    BoundExceeded {
        path: String,
        bound: usize,
        actual: usize,
    },

    #[error("{} trailing bytes after message ({consumed} of {total} consumed)", .total - .consumed)]
    TrailingBytes { consumed: usize, total: usize },
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Errors from building a message or reading/writing its fields by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("type '{type_name}' has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    #[error("type '{type_name}' declares {declared} fields, got {supplied} positional values")]
    TooManyPositional {
        type_name: String,
        declared: usize,
        supplied: usize,
    },

    /// Same field supplied both positionally and by name.
    #[error("field '{field}' supplied both positionally and by name")]
    Conflict { field: String },

    #[error("field '{field}' supplied more than once")]
    Duplicate { field: String },

    /// Fixed-length array field given the wrong number of elements.
    #[error("field '{field}' is a fixed array of {expected} elements, got {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("field '{field}' holds {found}, cannot read it as {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}
