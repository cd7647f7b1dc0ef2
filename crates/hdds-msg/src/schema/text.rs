// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Human-readable definition text.

use super::MessageDescriptor;
use std::fmt::Write;

const INDENT: &str = "  ";

impl MessageDescriptor {
    /// Render the type definition, one declaration per line.
    ///
    /// Constants come first as `type NAME=value`, then fields as
    /// `type name`. Unless `raw` is set, each embedded message type is
    /// expanded beneath its field, indented two spaces per level.
    pub fn definition_text(&self, raw: bool) -> String {
        let mut out = String::new();
        write_definition(&mut out, self, 0, !raw);
        out
    }
}

fn write_definition(out: &mut String, descriptor: &MessageDescriptor, depth: usize, expand: bool) {
    let indent = INDENT.repeat(depth);

    for constant in descriptor.constants() {
        let _ = writeln!(out, "{}{} {}={}", indent, constant.kind, constant.name, constant.value);
    }

    for field in descriptor.fields() {
        let _ = writeln!(out, "{}{} {}", indent, field.field_type, field.name);
        if expand {
            if let Some(embedded) = field.field_type.message_descriptor() {
                write_definition(out, embedded, depth + 1, expand);
            }
        }
    }
}
