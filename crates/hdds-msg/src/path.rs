// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field paths for error reporting (`layout.dim[1].size`).
//!
//! Segments borrow field names from the descriptor; the string is only
//! rendered when an error is actually reported.

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Field(&'a str),
    Index(usize),
}

#[derive(Debug, Default)]
pub(crate) struct FieldPath<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> FieldPath<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_field(&mut self, name: &'a str) {
        self.segments.push(Segment::Field(name));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                Segment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}
