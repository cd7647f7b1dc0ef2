// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML/JSON schema document loader.
//!
//! Reads the schema compiler's output (type names, ordered fields in type
//! notation, constants) and registers it into a [`SchemaRegistry`].
//!
//! # Example YAML
//!
//! ```yaml
//! types:
//!   - name: geometry/Point
//!     fields:
//!       - { name: x, type: float64 }
//!       - { name: y, type: float64 }
//!   - name: geometry/Polygon
//!     constants:
//!       - { name: MAX_POINTS, type: uint32, value: 64 }
//!     fields:
//!       - { name: points, type: "Point[<=64]" }
//!       - { name: label, type: string }
//! ```

use super::{MessageSchema, SchemaRegistry};
use crate::error::SchemaError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Schema document loader.
pub struct SchemaLoader;

/// Root document structure.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaDocument {
    /// Message types, in any order.
    #[serde(default)]
    pub types: Vec<MessageSchema>,
}

impl SchemaDocument {
    /// Register every type of the document. Stops at the first rejected type.
    pub fn register_into(self, registry: &SchemaRegistry) -> Result<usize, SchemaError> {
        let count = self.types.len();
        for schema in self.types {
            registry.register(schema)?;
        }
        Ok(count)
    }
}

impl SchemaLoader {
    /// Load a document from disk; `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<SchemaDocument, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::Load(format!("failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Parse a YAML document.
    pub fn parse_yaml(content: &str) -> Result<SchemaDocument, SchemaError> {
        serde_yaml::from_str(content)
            .map_err(|e| SchemaError::Load(format!("failed to parse YAML: {}", e)))
    }

    /// Parse a JSON document.
    pub fn parse_json(content: &str) -> Result<SchemaDocument, SchemaError> {
        serde_json::from_str(content)
            .map_err(|e| SchemaError::Load(format!("failed to parse JSON: {}", e)))
    }
}
