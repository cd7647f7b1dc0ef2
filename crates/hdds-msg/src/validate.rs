// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value validation against declared field types.
//!
//! Runs before every encode. Checks, depth-first in declaration order, and
//! reports the first failure:
//!
//! - every declared field is present and no undeclared one is
//! - integers fit the declared width (`[-2^(w-1), 2^(w-1)-1]` signed,
//!   `[0, 2^w-1]` unsigned; negatives in unsigned fields are reported as
//!   such)
//! - fixed arrays hold exactly the declared count
//! - strings, bytes and variable arrays stay within their declared maximum
//!   and within what a 4-byte length prefix can express
//!
//! Floats are not range-checked: any value, NaN and infinities included,
//! is accepted.

use crate::error::{ValidationError, ValidationReason};
use crate::message::Message;
use crate::path::FieldPath;
use crate::schema::{FieldType, MessageDescriptor, PrimitiveKind};
use crate::value::{Fields, Value};

/// Largest length a 4-byte prefix can carry.
const WIRE_MAX_LEN: usize = u32::MAX as usize;

/// Validate a whole message.
pub fn validate(message: &Message) -> Result<(), ValidationError> {
    let mut path = FieldPath::new();
    check_fields(message.fields(), message.descriptor(), &mut path)
}

/// Validate one value against a field type. `path` prefixes reported paths.
pub fn validate_value(
    value: &Value,
    field_type: &FieldType,
    path: &str,
) -> Result<(), ValidationError> {
    let mut inner = FieldPath::new();
    if !path.is_empty() {
        inner.push_field(path);
    }
    check_value(value, field_type, &mut inner)
}

fn fail(path: &FieldPath<'_>, reason: ValidationReason) -> ValidationError {
    ValidationError::new(path.render(), reason)
}

fn check_fields<'a>(
    fields: &'a Fields,
    descriptor: &'a MessageDescriptor,
    path: &mut FieldPath<'a>,
) -> Result<(), ValidationError> {
    for field in descriptor.fields() {
        path.push_field(&field.name);
        let Some(value) = fields.get(&field.name) else {
            return Err(fail(path, ValidationReason::MissingField));
        };
        check_value(value, &field.field_type, path)?;
        path.pop();
    }

    if fields.len() != descriptor.fields().len() {
        let unknown = fields
            .keys()
            .filter(|key| descriptor.field(key).is_none())
            .min();
        if let Some(key) = unknown {
            path.push_field(key);
            return Err(fail(path, ValidationReason::UnknownField));
        }
    }
    Ok(())
}

fn check_value<'a>(
    value: &'a Value,
    field_type: &'a FieldType,
    path: &mut FieldPath<'a>,
) -> Result<(), ValidationError> {
    match (field_type, value) {
        (FieldType::Primitive { kind, bound }, value) => check_primitive(value, *kind, *bound, path),
        (FieldType::Message(descriptor), Value::Message(fields)) => {
            check_fields(fields, descriptor, path)
        }
        (
            FieldType::Array {
                element,
                length,
                bound,
            },
            Value::Array(items),
        ) => {
            match length {
                Some(expected) if items.len() != *expected => {
                    return Err(fail(
                        path,
                        ValidationReason::LengthMismatch {
                            expected: *expected,
                            actual: items.len(),
                        },
                    ));
                }
                Some(_) => {}
                None => check_len(items.len(), *bound, path)?,
            }
            for (i, item) in items.iter().enumerate() {
                path.push_index(i);
                check_value(item, element, path)?;
                path.pop();
            }
            Ok(())
        }
        (expected, found) => Err(mismatch(expected, found, path)),
    }
}

fn check_primitive(
    value: &Value,
    kind: PrimitiveKind,
    bound: Option<usize>,
    path: &FieldPath<'_>,
) -> Result<(), ValidationError> {
    match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(_)) => Ok(()),
        (PrimitiveKind::F32 | PrimitiveKind::F64, Value::F32(_) | Value::F64(_)) => Ok(()),
        (PrimitiveKind::String, Value::String(s)) => check_len(s.len(), bound, path),
        (PrimitiveKind::Bytes, Value::Bytes(b)) => check_len(b.len(), bound, path),
        (k, Value::Int(v)) if k.is_integer() => check_int(*v, k, path),
        (k, found) => Err(mismatch(&FieldType::primitive(k), found, path)),
    }
}

fn check_int(value: i128, kind: PrimitiveKind, path: &FieldPath<'_>) -> Result<(), ValidationError> {
    let Some((min, max)) = kind.int_range() else {
        return Err(mismatch(&FieldType::primitive(kind), &Value::Int(value), path));
    };
    if value < 0 && !kind.is_signed() {
        return Err(fail(
            path,
            ValidationReason::NegativeUnsigned {
                value,
                kind: kind.type_name(),
            },
        ));
    }
    if value < min || value > max {
        return Err(fail(
            path,
            ValidationReason::OutOfRange {
                value,
                kind: kind.type_name(),
            },
        ));
    }
    Ok(())
}

fn check_len(len: usize, bound: Option<usize>, path: &FieldPath<'_>) -> Result<(), ValidationError> {
    let limit = bound.map_or(WIRE_MAX_LEN, |b| b.min(WIRE_MAX_LEN));
    if len > limit {
        return Err(fail(
            path,
            ValidationReason::BoundExceeded {
                bound: limit,
                actual: len,
            },
        ));
    }
    Ok(())
}

fn mismatch(expected: &FieldType, found: &Value, path: &FieldPath<'_>) -> ValidationError {
    fail(
        path,
        ValidationReason::TypeMismatch {
            expected: expected.type_name(),
            found: found.kind_name(),
        },
    )
}
