// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared literals and helpers for the end-to-end scenario tests.

/// The 263-byte literal used across several scenarios: 16 copies each of
/// `'0'..'9'` and `'a'..'f'`, followed by `"fffffff"`.
pub fn literal_263() -> Vec<u8> {
    let mut out = Vec::new();
    for range in [b'0'..=b'9', b'a'..=b'f'] {
        for _ in 0..16 {
            out.extend(range.clone());
        }
    }
    out.extend_from_slice(b"fffffff");
    assert_eq!(out.len(), 263);
    out
}

/// The 264-byte literal: [`literal_263`] plus a trailing null byte.
pub fn literal_264() -> Vec<u8> {
    let mut out = literal_263();
    out.push(0);
    out
}

/// A small deterministic pseudo-random byte generator (xorshift64), used in
/// place of a `rand` dependency for a scenario that just needs
/// non-repeating filler bytes.
pub fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        out.extend_from_slice(&state.to_le_bytes());
    }
    out.truncate(len);
    out
}
