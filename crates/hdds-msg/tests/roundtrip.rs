// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Encode/decode round-trips over random in-range values of every field kind.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::float_cmp)]
#![allow(clippy::missing_panics_doc)]

use hdds_msg::schema::FieldType;
use hdds_msg::{
    Codec, CodecConfig, Message, MessageDescriptor, MessageDescriptorBuilder, PrimitiveKind, Value,
};
use std::sync::Arc;

const ITERATIONS: usize = 200;

fn random_primitive(rng: &mut fastrand::Rng, kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Bool => Value::Bool(rng.bool()),
        PrimitiveKind::F32 => Value::F32(rng.f32() * 2000.0 - 1000.0),
        PrimitiveKind::F64 => Value::F64(rng.f64() * 2e9 - 1e9),
        PrimitiveKind::String => {
            let len = rng.usize(..24);
            Value::String((0..len).map(|_| rng.alphanumeric()).collect())
        }
        PrimitiveKind::Bytes => {
            let len = rng.usize(..32);
            Value::Bytes((0..len).map(|_| rng.u8(..)).collect())
        }
        int => {
            let (min, max) = int.int_range().unwrap();
            Value::Int(rng.i128(min..=max))
        }
    }
}

fn random_value(rng: &mut fastrand::Rng, field_type: &FieldType) -> Value {
    match field_type {
        FieldType::Primitive { kind, .. } => random_primitive(rng, *kind),
        FieldType::Message(desc) => Value::Message(
            desc.fields()
                .iter()
                .map(|f| (f.name.clone(), random_value(rng, &f.field_type)))
                .collect(),
        ),
        FieldType::Array {
            element, length, ..
        } => {
            let count = length.unwrap_or_else(|| rng.usize(..6));
            Value::Array((0..count).map(|_| random_value(rng, element)).collect())
        }
    }
}

fn random_message(rng: &mut fastrand::Rng, desc: &Arc<MessageDescriptor>) -> Message {
    let mut msg = Message::new(desc);
    for field in desc.fields() {
        msg.set(&field.name, random_value(rng, &field.field_type))
            .unwrap();
    }
    msg
}

fn everything() -> Arc<MessageDescriptor> {
    let inner = Arc::new(
        MessageDescriptorBuilder::new("rt/Inner")
            .string_field("label")
            .field("size", PrimitiveKind::U32)
            .array_field("pad", PrimitiveKind::U8, 3)
            .build()
            .unwrap(),
    );
    let mut builder = MessageDescriptorBuilder::new("rt/Everything");
    for kind in PrimitiveKind::ALL {
        let name = kind.type_name();
        builder = builder.field(name, kind);
        if kind != PrimitiveKind::Bytes {
            builder = builder
                .array_field(format!("{}_fixed", name), kind, 2)
                .sequence_field(format!("{}_seq", name), kind);
        }
    }
    Arc::new(
        builder
            .message_field("inner", Arc::clone(&inner))
            .message_array_field("inner_fixed", Arc::clone(&inner), 2)
            .message_sequence_field("inner_seq", inner)
            .build()
            .unwrap(),
    )
}

#[test]
fn roundtrip_every_kind() {
    let codec = Codec::with_config(CodecConfig::default());
    let desc = everything();
    let mut rng = fastrand::Rng::with_seed(0x5eed);

    for _ in 0..ITERATIONS {
        let original = random_message(&mut rng, &desc);
        let bytes = codec.serialize(&original).unwrap();
        assert_eq!(codec.encoded_size(&original).unwrap(), bytes.len());

        let decoded = codec.deserialize(&bytes, &desc).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(codec.serialize(&decoded).unwrap(), bytes);
    }
}

#[test]
fn roundtrip_width_extremes() {
    let codec = Codec::with_config(CodecConfig::default());
    for kind in PrimitiveKind::ALL.iter().copied().filter(|k| k.is_integer()) {
        let desc = Arc::new(
            MessageDescriptorBuilder::new("rt/Edge")
                .field("v", kind)
                .build()
                .unwrap(),
        );
        let (min, max) = kind.int_range().unwrap();
        for v in [min, min + 1, 0, max - 1, max] {
            let mut msg = Message::new(&desc);
            msg.set("v", Value::Int(v)).unwrap();
            let bytes = codec.serialize(&msg).unwrap();
            assert_eq!(bytes.len(), kind.wire_size().unwrap());
            let decoded = codec.deserialize(&bytes, &desc).unwrap();
            assert_eq!(decoded.get_field("v").unwrap().as_int(), Some(v), "{} {}", kind, v);
        }
    }
}

#[test]
fn roundtrip_special_floats() {
    let codec = Codec::with_config(CodecConfig::default());
    let desc = Arc::new(
        MessageDescriptorBuilder::new("rt/Floats")
            .field("a", PrimitiveKind::F32)
            .field("b", PrimitiveKind::F64)
            .build()
            .unwrap(),
    );
    for (a, b) in [
        (f32::INFINITY, f64::NEG_INFINITY),
        (f32::MIN_POSITIVE, f64::MAX),
        (-0.0, f64::EPSILON),
    ] {
        let msg = Message::builder(&desc).arg(a).arg(b).build().unwrap();
        let decoded = codec
            .deserialize(&codec.serialize(&msg).unwrap(), &desc)
            .unwrap();
        assert_eq!(decoded, msg);
    }

    // NaN passes validation and survives bit-for-bit
    let msg = Message::builder(&desc)
        .arg(f32::NAN)
        .arg(f64::NAN)
        .build()
        .unwrap();
    let bytes = codec.serialize(&msg).unwrap();
    let decoded = codec.deserialize(&bytes, &desc).unwrap();
    assert_eq!(decoded, msg);
    assert!(decoded.get::<f32>("a").unwrap().is_nan());
    assert!(decoded.get::<f64>("b").unwrap().is_nan());
    assert_eq!(codec.serialize(&decoded).unwrap(), bytes);
}

#[test]
fn roundtrip_bytes_into_uint8_arrays() {
    let codec = Codec::with_config(CodecConfig::default());
    let desc = Arc::new(
        MessageDescriptorBuilder::new("rt/Octets")
            .array_field("u8_3", PrimitiveKind::U8, 3)
            .sequence_field("u8_seq", PrimitiveKind::U8)
            .build()
            .unwrap(),
    );
    let msg = Message::builder(&desc)
        .named("u8_3", Value::bytes(*b"xyz"))
        .named("u8_seq", Value::bytes(*b"ab"))
        .build()
        .unwrap();

    let bytes = codec.serialize(&msg).unwrap();
    assert_eq!(bytes, [b'x', b'y', b'z', 2, 0, 0, 0, b'a', b'b']);

    let decoded = codec.deserialize(&bytes, &desc).unwrap();
    assert_eq!(decoded, msg);
    assert_eq!(decoded.get::<Vec<u8>>("u8_3").unwrap(), b"xyz".to_vec());
    assert_eq!(decoded.get::<Vec<u8>>("u8_seq").unwrap(), b"ab".to_vec());

    let mut by_set = Message::new(&desc);
    by_set.set("u8_3", Value::bytes(*b"xyz")).unwrap();
    by_set.set("u8_seq", Value::bytes(*b"ab")).unwrap();
    assert_eq!(by_set, msg);

    // Bytes of the wrong length hit the fixed-length check after coercion
    assert!(Message::builder(&desc)
        .named("u8_3", Value::bytes(*b"xy"))
        .build()
        .is_err());
}
