// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Textual field codec for keys, ciphertexts and signatures.
//!
//! All wire formats in this crate are ASCII strings of `name=value` fields
//! with `0x`-prefixed lowercase-hex integers, e.g. `r=0x1f,t=0xabc`.
//! Readers work on a `&mut &str` cursor so fields can be consumed in
//! sequence, mirroring how the serializers append them.

use std::fmt::Write;

use num_bigint_dig::BigUint;

use crate::error::{Error, Result};

/// Append `0x`-prefixed lowercase hex.
pub(crate) fn push_uint(out: &mut String, x: &BigUint) {
    // writing to a String cannot fail
    let _ = write!(out, "0x{x:x}");
}

/// Consume an exact literal prefix.
pub(crate) fn skip_prefix(src: &mut &str, prefix: &str) -> Result<()> {
    match src.strip_prefix(prefix) {
        Some(rest) => {
            *src = rest;
            Ok(())
        }
        None => Err(Error::MalformedInput),
    }
}

/// Consume a `0x`-prefixed hex integer.
pub(crate) fn read_uint(src: &mut &str) -> Result<BigUint> {
    let rest = src.strip_prefix("0x").ok_or(Error::MalformedInput)?;
    let end = rest
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(rest.len());
    if end == 0 {
        return Err(Error::MalformedInput);
    }
    let value = BigUint::parse_bytes(rest[..end].as_bytes(), 16).ok_or(Error::MalformedInput)?;
    *src = &rest[end..];
    Ok(value)
}
