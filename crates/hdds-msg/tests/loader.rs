// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Schema documents on disk: load, register, resolve, use.

#![cfg(feature = "loaders")]
#![allow(clippy::missing_panics_doc)]

use hdds_msg::schema::ConstantValue;
use hdds_msg::{Message, SchemaError, SchemaLoader, SchemaRegistry};
use std::io::Write;
use tempfile::NamedTempFile;

const NAV_YAML: &str = r#"
types:
  - name: nav/Pose
    fields:
      - { name: position, type: Point }
      - { name: heading, type: float32 }
  - name: nav/Point
    fields:
      - { name: x, type: float64 }
      - { name: y, type: float64 }
  - name: nav/Path
    constants:
      - { name: MAX_WAYPOINTS, type: uint16, value: 512 }
      - { name: FRAME, type: string, value: map }
    fields:
      - { name: frame_id, type: string }
      - { name: waypoints, type: "Pose[<=512]" }
      - { name: layout, type: std_msgs/MultiArrayLayout }
"#;

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn registry_with_std() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    hdds_msg::std_types::register(&registry).unwrap();
    registry
}

#[test]
fn yaml_file_resolves_and_encodes() {
    let file = write_temp(".yaml", NAV_YAML);
    let doc = SchemaLoader::load_from_file(file.path()).unwrap();

    let registry = registry_with_std();
    assert_eq!(doc.register_into(&registry).unwrap(), 3);

    let path = registry.resolve("nav/Path").unwrap();
    assert_eq!(path.constant("MAX_WAYPOINTS"), Some(&ConstantValue::Int(512)));
    assert_eq!(
        path.field("waypoints").unwrap().field_type.to_string(),
        "nav/Pose[<=512]"
    );

    let msg = Message::builder(&path)
        .named("frame_id", "map")
        .build()
        .unwrap();
    // frame_id, waypoint count, layout.dim count, layout.data_offset
    assert_eq!(
        msg.serialize().unwrap(),
        vec![3, 0, 0, 0, b'm', b'a', b'p', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn json_file_by_extension() {
    let file = write_temp(
        ".json",
        r#"{"types": [{"name": "tele/Sample",
                       "fields": [{"name": "stamp", "type": "uint64"},
                                  {"name": "values", "type": "float32[4]"}]}]}"#,
    );
    let registry = SchemaRegistry::new();
    SchemaLoader::load_from_file(file.path())
        .unwrap()
        .register_into(&registry)
        .unwrap();

    let sample = registry.resolve("tele/Sample").unwrap();
    assert_eq!(Message::new(&sample).serialize().unwrap().len(), 8 + 16);
    assert_eq!(sample.definition_text(true), "uint64 stamp\nfloat32[4] values\n");
}

#[test]
fn missing_file_and_bad_content() {
    assert!(matches!(
        SchemaLoader::load_from_file("/nonexistent/schemas.yaml"),
        Err(SchemaError::Load(_))
    ));

    let file = write_temp(".yaml", "types:\n  - name: [unterminated");
    assert!(matches!(
        SchemaLoader::load_from_file(file.path()),
        Err(SchemaError::Load(_))
    ));
}

#[test]
fn unknown_reference_is_reported_on_resolve() {
    let file = write_temp(
        ".yml",
        "types:\n  - name: bad/Holder\n    fields:\n      - { name: inner, type: Missing }\n",
    );
    let registry = SchemaRegistry::new();
    SchemaLoader::load_from_file(file.path())
        .unwrap()
        .register_into(&registry)
        .unwrap();

    match registry.resolve("bad/Holder").unwrap_err() {
        SchemaError::UnknownType {
            name,
            referenced_by,
        } => {
            assert_eq!(name, "bad/Missing");
            assert_eq!(referenced_by.as_deref(), Some("bad/Holder"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn cyclic_document_is_rejected() {
    let file = write_temp(
        ".yaml",
        r#"
types:
  - name: tree/Node
    fields:
      - { name: value, type: int32 }
      - { name: children, type: "Node[]" }
"#,
    );
    let registry = SchemaRegistry::new();
    SchemaLoader::load_from_file(file.path())
        .unwrap()
        .register_into(&registry)
        .unwrap();

    assert!(matches!(
        registry.resolve("tree/Node"),
        Err(SchemaError::CyclicType { ref path }) if path == &["tree/Node", "tree/Node"]
    ));
    assert!(registry.type_hash("tree/Node").is_err());
}

#[test]
fn definition_text_expands_embedded_types() {
    let file = write_temp(".yaml", NAV_YAML);
    let registry = registry_with_std();
    SchemaLoader::load_from_file(file.path())
        .unwrap()
        .register_into(&registry)
        .unwrap();

    let pose = registry.resolve("nav/Pose").unwrap();
    assert_eq!(
        pose.definition_text(false),
        "nav/Point position\n  float64 x\n  float64 y\nfloat32 heading\n"
    );
    assert_eq!(pose.definition_text(true), "nav/Point position\nfloat32 heading\n");
}
