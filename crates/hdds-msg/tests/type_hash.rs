// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Type-identity hash: what changes it and what does not.

#![allow(clippy::missing_panics_doc)]

use hdds_msg::schema::MessageSchema;
use hdds_msg::{
    canonical_signature, MessageDescriptor, MessageDescriptorBuilder, PrimitiveKind, SchemaError,
    SchemaRegistry, TypeHash,
};
use std::sync::Arc;

fn point(name: &str, x: &str, y: &str) -> Arc<MessageDescriptor> {
    Arc::new(
        MessageDescriptorBuilder::new(name)
            .field(x, PrimitiveKind::F64)
            .field(y, PrimitiveKind::F64)
            .build()
            .unwrap(),
    )
}

#[test]
fn known_digests() {
    let int32 = MessageDescriptorBuilder::new("h/Int32")
        .field("data", PrimitiveKind::I32)
        .build()
        .unwrap();
    assert_eq!(int32.type_hash().to_hex(), "0241adbbd83925f051b694d40f02747f");

    let flag = MessageDescriptorBuilder::new("h/Flag")
        .field("data", PrimitiveKind::Bool)
        .build()
        .unwrap();
    assert_eq!(flag.type_hash().to_hex(), "c506ff134babdd6e68ab3e6350e95305");

    let text = MessageDescriptorBuilder::new("h/Text")
        .string_field("data")
        .build()
        .unwrap();
    assert_eq!(text.type_hash().to_hex(), "b45cffe084dd3d20d928bee85e7b0f21");
}

#[test]
fn stable_under_rename() {
    let a = point("geo/Point", "x", "y");
    let b = point("other/Vec2", "u", "v");
    assert_eq!(a.type_hash(), b.type_hash());
}

#[test]
fn sensitive_to_order_and_width() {
    let ab = MessageDescriptorBuilder::new("h/AB")
        .field("a", PrimitiveKind::I32)
        .string_field("b")
        .build()
        .unwrap();
    let ba = MessageDescriptorBuilder::new("h/AB")
        .string_field("b")
        .field("a", PrimitiveKind::I32)
        .build()
        .unwrap();
    assert_ne!(ab.type_hash(), ba.type_hash());

    let widths: Vec<TypeHash> = PrimitiveKind::ALL
        .iter()
        .filter(|k| k.is_integer())
        .map(|k| {
            MessageDescriptorBuilder::new("h/W")
                .field("v", *k)
                .build()
                .unwrap()
                .type_hash()
        })
        .collect();
    for (i, a) in widths.iter().enumerate() {
        for b in &widths[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn sensitive_to_array_shape() {
    let fixed = MessageDescriptorBuilder::new("h/S")
        .array_field("v", PrimitiveKind::U16, 3)
        .build()
        .unwrap();
    let fixed4 = MessageDescriptorBuilder::new("h/S")
        .array_field("v", PrimitiveKind::U16, 4)
        .build()
        .unwrap();
    let variable = MessageDescriptorBuilder::new("h/S")
        .sequence_field("v", PrimitiveKind::U16)
        .build()
        .unwrap();
    assert_ne!(fixed.type_hash(), fixed4.type_hash());
    assert_ne!(fixed.type_hash(), variable.type_hash());
}

#[test]
fn sensitive_to_embedded_shape() {
    let p2 = point("geo/Point", "x", "y");
    let p3 = Arc::new(
        MessageDescriptorBuilder::new("geo/Point")
            .field("x", PrimitiveKind::F64)
            .field("y", PrimitiveKind::F64)
            .field("z", PrimitiveKind::F64)
            .build()
            .unwrap(),
    );
    let wrap = |p: &Arc<MessageDescriptor>| {
        MessageDescriptorBuilder::new("geo/Pose")
            .message_field("position", Arc::clone(p))
            .build()
            .unwrap()
    };
    assert_ne!(wrap(&p2).type_hash(), wrap(&p3).type_hash());

    // An embedded single message hashes like its fields declared inline
    let inline = MessageDescriptorBuilder::new("geo/Flat")
        .field("px", PrimitiveKind::F64)
        .field("py", PrimitiveKind::F64)
        .build()
        .unwrap();
    assert_eq!(wrap(&p2).type_hash(), inline.type_hash());

    // but an array of messages does not hash like an array of its fields
    let seq = MessageDescriptorBuilder::new("geo/Path")
        .message_sequence_field("points", Arc::clone(&p2))
        .build()
        .unwrap();
    assert_eq!(canonical_signature(&seq), "{float64;float64}[]");
    let seq_f = MessageDescriptorBuilder::new("geo/Path")
        .sequence_field("points", PrimitiveKind::F64)
        .build()
        .unwrap();
    assert_ne!(seq.type_hash(), seq_f.type_hash());
}

#[test]
fn constants_do_not_participate() {
    let plain = MessageDescriptorBuilder::new("h/C")
        .field("mode", PrimitiveKind::U8)
        .build()
        .unwrap();
    let with_constants = MessageDescriptorBuilder::new("h/C")
        .constant("IDLE", PrimitiveKind::U8, 0)
        .constant("RUNNING", PrimitiveKind::U8, 1)
        .field("mode", PrimitiveKind::U8)
        .build()
        .unwrap();
    assert_eq!(plain.type_hash(), with_constants.type_hash());
}

#[test]
fn bytes_hashes_like_uint8_sequence() {
    let bytes = MessageDescriptorBuilder::new("h/B")
        .bytes_field("data")
        .build()
        .unwrap();
    let octets = MessageDescriptorBuilder::new("h/B")
        .sequence_field("data", PrimitiveKind::U8)
        .build()
        .unwrap();
    assert_eq!(bytes.type_hash(), octets.type_hash());
}

#[test]
fn bounds_do_not_participate() {
    let unbounded = MessageDescriptorBuilder::new("h/T")
        .string_field("s")
        .build()
        .unwrap();
    let bounded = MessageDescriptorBuilder::new("h/T")
        .bounded_string_field("s", 8)
        .build()
        .unwrap();
    assert_eq!(unbounded.type_hash(), bounded.type_hash());
}

#[test]
fn hex_parse_roundtrip() {
    let hash: TypeHash = "2483b7ee500e146dc8445b49c0ac3c30".parse().unwrap();
    assert_eq!(hash.to_string(), "2483b7ee500e146dc8445b49c0ac3c30");
    assert!("2483b7ee".parse::<TypeHash>().is_err());
    assert!("zz83b7ee500e146dc8445b49c0ac3c30".parse::<TypeHash>().is_err());
}

#[test]
fn registry_hash_rejects_cycles() {
    let registry = SchemaRegistry::new();
    registry
        .register(MessageSchema::new("loop/A").field("b", "B"))
        .unwrap();
    registry
        .register(MessageSchema::new("loop/B").field("a", "A[]"))
        .unwrap();
    let err = registry.type_hash("loop/A").unwrap_err();
    match err {
        SchemaError::CyclicType { path } => {
            assert_eq!(path, vec!["loop/A", "loop/B", "loop/A"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn registry_hash_is_cached_per_name() {
    let registry = SchemaRegistry::new();
    registry
        .register(
            MessageSchema::new("geo/Point")
                .field("x", "float64")
                .field("y", "float64"),
        )
        .unwrap();
    let first = registry.type_hash("geo/Point").unwrap();
    let second = registry.type_hash("geo/Point").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, point("any/Name", "a", "b").type_hash());
}
