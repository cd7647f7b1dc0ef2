// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hdds_msg::schema::PrimitiveKind;
use hdds_msg::std_types;
use hdds_msg::{Codec, CodecConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = Codec::with_config(CodecConfig::default().with_trailing_bytes(true));

    // Embedded message sequence plus a flat array
    for kind in std_types::MULTI_ARRAY_KINDS {
        if let Some(desc) = std_types::multi_array(kind) {
            if let Ok(msg) = codec.deserialize(data, desc) {
                // Anything that decodes must re-encode to the bytes it came from
                let (_, consumed) = codec.deserialize_prefix(data, desc).unwrap();
                let bytes = codec.serialize(&msg).unwrap();
                assert_eq!(bytes, &data[..consumed]);
            }
        }
    }

    // Strings and bools
    for kind in [PrimitiveKind::String, PrimitiveKind::Bool] {
        if let Some(desc) = std_types::wrapper(kind) {
            let _ = codec.deserialize(data, desc);
        }
    }
});
