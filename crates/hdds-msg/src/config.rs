// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec runtime configuration.
//!
//! # Architecture
//!
//! - **Static**: wire constants (prefix width, default limits)
//! - **Dynamic**: [`CodecConfig`] held behind an `ArcSwap`, read lock-free by
//!   every decode and swapped atomically by [`set`] / [`reset`]
//!
//! ## Environment
//! - `HDDS_MSG_MAX_COLLECTION_LEN`: largest accepted string/bytes/array count
//!   when decoding (default: `u32::MAX`)
//! - `HDDS_MSG_MAX_ZERO_SIZE_ELEMENTS`: total element count accepted per
//!   decode for arrays whose elements occupy no wire bytes (default: 65536)
//! - `HDDS_MSG_ALLOW_TRAILING_BYTES`: accept input with bytes left over after
//!   the last field ("1" or "true", default: off)
//!
//! # Example
//!
//! ```
//! use hdds_msg::config::{self, CodecConfig};
//!
//! config::set(CodecConfig::default().with_max_collection_len(1 << 20));
//! assert_eq!(config::current().max_collection_len, 1 << 20);
//! config::reset();
//! ```

use arc_swap::ArcSwap;
use std::env;
use std::sync::{Arc, OnceLock};

/// Width in bytes of every length/count prefix on the wire.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default decode limit: anything a 4-byte prefix can express.
pub const DEFAULT_MAX_COLLECTION_LEN: usize = u32::MAX as usize;

/// Default count limit for arrays of zero-size elements, such as a
/// sequence of a type with no fields. The remaining input cannot bound
/// those counts.
pub const DEFAULT_MAX_ZERO_SIZE_ELEMENTS: usize = 65_536;

/// Environment variable names
pub const ENV_MAX_COLLECTION_LEN: &str = "HDDS_MSG_MAX_COLLECTION_LEN";
pub const ENV_MAX_ZERO_SIZE_ELEMENTS: &str = "HDDS_MSG_MAX_ZERO_SIZE_ELEMENTS";
pub const ENV_ALLOW_TRAILING_BYTES: &str = "HDDS_MSG_ALLOW_TRAILING_BYTES";

/// Decoder limits and strictness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest element/byte count accepted from a length prefix.
    pub max_collection_len: usize,
    /// Total element count accepted, per decode, across arrays whose
    /// elements encode to zero bytes.
    pub max_zero_size_elements: usize,
    /// Whether `deserialize` tolerates unread bytes after the last field.
    pub allow_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_collection_len: DEFAULT_MAX_COLLECTION_LEN,
            max_zero_size_elements: DEFAULT_MAX_ZERO_SIZE_ELEMENTS,
            allow_trailing_bytes: false,
        }
    }
}

impl CodecConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(max) = env::var(ENV_MAX_COLLECTION_LEN)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
        {
            config.max_collection_len = max;
        }

        if let Some(max) = env::var(ENV_MAX_ZERO_SIZE_ELEMENTS)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
        {
            config.max_zero_size_elements = max;
        }

        if let Ok(s) = env::var(ENV_ALLOW_TRAILING_BYTES) {
            config.allow_trailing_bytes = parse_flag(&s);
        }

        log::debug!(
            "[hdds-msg] codec config: max_collection_len={} max_zero_size_elements={} allow_trailing_bytes={}",
            config.max_collection_len,
            config.max_zero_size_elements,
            config.allow_trailing_bytes
        );
        config
    }

    #[must_use]
    pub fn with_max_collection_len(mut self, max: usize) -> Self {
        self.max_collection_len = max;
        self
    }

    #[must_use]
    pub fn with_max_zero_size_elements(mut self, max: usize) -> Self {
        self.max_zero_size_elements = max;
        self
    }

    #[must_use]
    pub fn with_trailing_bytes(mut self, allow: bool) -> Self {
        self.allow_trailing_bytes = allow;
        self
    }
}

fn parse_flag(s: &str) -> bool {
    let s = s.trim();
    s == "1" || s.eq_ignore_ascii_case("true")
}

fn slot() -> &'static ArcSwap<CodecConfig> {
    static CURRENT: OnceLock<ArcSwap<CodecConfig>> = OnceLock::new();
    CURRENT.get_or_init(|| ArcSwap::from_pointee(CodecConfig::from_env()))
}

/// Process-wide configuration used by the free codec functions.
pub fn current() -> Arc<CodecConfig> {
    slot().load_full()
}

/// Replace the process-wide configuration.
pub fn set(config: CodecConfig) {
    slot().store(Arc::new(config));
}

/// Re-read the process-wide configuration from the environment.
pub fn reset() {
    slot().store(Arc::new(CodecConfig::from_env()));
}
