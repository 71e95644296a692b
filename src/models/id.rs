// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User identifiers.
//!
//! Identifiers are 12 bytes rendered as 24 lowercase hex digits:
//! a 4-byte big-endian creation timestamp (seconds), a 5-byte value
//! chosen once per process, and a 3-byte counter. Identifiers created
//! later sort after earlier ones.

use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

const ID_BYTES: usize = 12;
const ID_HEX_LEN: usize = ID_BYTES * 2;
const COUNTER_MASK: u32 = 0x00ff_ffff;

/// Store-assigned user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh identifier for the given creation time.
    pub fn generate(created_at: chrono::DateTime<chrono::Utc>) -> Self {
        let seed = process_seed();
        let count = counter().fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        // Timestamps past 2106 wrap, which only affects ordering.
        let secs = created_at.timestamp() as u32;

        let mut bytes = [0u8; ID_BYTES];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&seed[..5]);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        UserId(hex::encode(bytes))
    }

    /// Parse an identifier supplied by a client.
    ///
    /// Accepts exactly 24 hex digits in either case.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == ID_HEX_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(UserId(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-process random seed. Bytes 0..5 are the process value, 5..8 seed the counter.
fn process_seed() -> &'static [u8; 8] {
    static SEED: OnceLock<[u8; 8]> = OnceLock::new();
    SEED.get_or_init(|| {
        let mut seed = [0u8; 8];
        if SystemRandom::new().fill(&mut seed).is_err() {
            tracing::warn!("System RNG unavailable, deriving id seed from clock");
            let nanos = chrono::Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_default() as u64;
            seed = (nanos ^ u64::from(std::process::id())).to_be_bytes();
        }
        seed
    })
}

fn counter() -> &'static AtomicU32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER.get_or_init(|| {
        let seed = process_seed();
        AtomicU32::new(u32::from_be_bytes([0, seed[5], seed[6], seed[7]]))
    })
}
