// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message padding for encryption and signing.
//!
//! Both transforms turn data into an integer of a caller-chosen bit width
//! using only the random oracle, the PRNG and the raw-magnitude codec.
//! Byte buffers map to integers little-endian: the byte at offset 0 is the
//! least significant.
//!
//! # Encryption padding
//!
//! An all-or-nothing OAEP-style transform. The integer image is, from
//! least to most significant,
//!
//! ```text
//! [ message ^ G(r) | zero-tail ^ G(r) ][ r ^ H(masked zone) ]
//! ```
//!
//! where `r` is fresh randomness and `G`, `H` are oracle domains 1 and 2.
//! The zone between the end of the message and the final 16 bytes decodes
//! to zero bytes; decoding rejects the integer unless that tail is intact,
//! which is what turns bit-flips in the ciphertext into decode failures.
//!
//! Because the message is recovered as the prefix up to the first zero
//! byte, a message may not contain a zero byte followed by nonzero data:
//! such an image is indistinguishable from corruption and fails decoding.
//!
//! # Signature padding
//!
//! A salted full-domain-hash: the message digest is bound to a 16-byte
//! salt, the salt is hidden under oracle domain 3 keyed by that digest,
//! and verification recomputes the mask, recovers the salt and re-checks
//! the digest. The caller passes the streaming digest context; it is
//! consumed exactly once on every path, including failures.

use num_bigint_dig::BigUint;
use sha1::{Digest, Sha1};
use zeroize::{Zeroize, Zeroizing};

use crate::codec;
use crate::error::{Error, Result};
use crate::hash::DIGEST_LEN;
use crate::oracle::Oracle;
use crate::prng::Prng;

/// Random pad bytes appended above the message zone.
const ENC_PAD: usize = 16;
/// Zero bytes that must check out at the top of the message zone.
const ENC_MIN_ZERO: usize = 16;
const ENC_G_INDEX: u64 = 1;
const ENC_H_INDEX: u64 = 2;

/// Salt length for signature padding.
const SIG_SALT_LEN: usize = 16;
/// Minimum mask bytes above the salt.
const SIG_MIN_PAD: usize = 16;
const SIG_G_INDEX: u64 = 3;

/// Mask selecting the bits of the most significant byte that belong to an
/// `nbits`-wide value.
fn msb_mask(nbits: usize) -> u8 {
    0xffu8 >> ((8 - nbits % 8) % 8)
}

/// Pad `msg` into an integer of `nbits` bits suitable for encryption.
///
/// Fails with [`Error::MessageTooLong`] when the message plus the 16
/// mandatory zero bytes and 16 pad bytes exceed `nbits / 8` bytes.
pub fn encode_for_encryption(prng: &mut Prng, msg: &[u8], nbits: usize) -> Result<BigUint> {
    if msg.len() + ENC_MIN_ZERO + ENC_PAD > nbits / 8 {
        return Err(Error::MessageTooLong);
    }

    let mask = msb_mask(nbits);
    let pad_len = ENC_PAD + usize::from(nbits % 8 != 0);
    let zone_len = nbits / 8 - ENC_PAD;

    let mut image = Zeroizing::new(vec![0u8; zone_len + pad_len]);
    let (zone, pad) = image.split_at_mut(zone_len);

    prng.fill_bytes(pad);
    pad[pad_len - 1] &= mask;

    let g = Oracle::lookup(ENC_G_INDEX, zone_len, pad);
    zone.copy_from_slice(&g);
    for (z, m) in zone.iter_mut().zip(msg) {
        *z ^= m;
    }

    let h = Oracle::lookup(ENC_H_INDEX, pad_len, zone);
    for (p, hb) in pad.iter_mut().zip(h.iter()) {
        *p ^= hb;
    }
    pad[pad_len - 1] &= mask;

    Ok(codec::from_bytes_le(&image))
}

/// Invert [`encode_for_encryption`], verifying the zero tail.
///
/// Any nonzero byte between the end of the recovered message and the
/// mandatory-zero boundary means the ciphertext was corrupted; the call
/// fails with [`Error::IntegrityFailure`] rather than returning garbage.
pub fn decode_after_decryption(m: &BigUint, nbits: usize) -> Result<Zeroizing<Vec<u8>>> {
    if nbits / 8 <= ENC_PAD + ENC_MIN_ZERO {
        return Err(Error::IntegrityFailure);
    }

    let mask = msb_mask(nbits);
    let pad_len = ENC_PAD + usize::from(nbits % 8 != 0);
    let zone_len = nbits / 8 - ENC_PAD;

    let mut image = Zeroizing::new(codec::to_bytes_le(m, zone_len + pad_len));
    let (zone, pad) = image.split_at_mut(zone_len);

    let h = Oracle::lookup(ENC_H_INDEX, pad_len, zone);
    for (p, hb) in pad.iter_mut().zip(h.iter()) {
        *p ^= hb;
    }
    pad[pad_len - 1] &= mask;

    let g = Oracle::lookup(ENC_G_INDEX, zone_len, pad);
    for (z, gb) in zone.iter_mut().zip(g.iter()) {
        *z ^= gb;
    }

    let mut i = 0;
    while i < zone_len - ENC_MIN_ZERO && zone[i] != 0 {
        i += 1;
    }
    let msg_len = i;
    while i < zone_len {
        if zone[i] != 0 {
            return Err(Error::IntegrityFailure);
        }
        i += 1;
    }

    Ok(Zeroizing::new(zone[..msg_len].to_vec()))
}

/// Turn a running message digest into a salted signature integer of
/// `nbits` bits.
///
/// The digest context is finalized here (over the message fed so far plus
/// a fresh salt); it is consumed even when the width check fails.
pub fn encode_for_signature(prng: &mut Prng, digest: Sha1, nbits: usize) -> Result<BigUint> {
    let mlen = nbits.div_ceil(8);
    if nbits / 8 < SIG_MIN_PAD + SIG_SALT_LEN + DIGEST_LEN {
        let _ = digest.finalize();
        return Err(Error::MessageTooLong);
    }
    let pad_len = mlen - DIGEST_LEN;

    let mut salt = Zeroizing::new([0u8; SIG_SALT_LEN]);
    prng.fill_bytes(&mut salt[..]);

    let mut digest = digest;
    digest.update(&salt[..]);
    let mut m1: [u8; DIGEST_LEN] = digest.finalize().into();

    let mut image = Zeroizing::new(vec![0u8; mlen]);
    image[..DIGEST_LEN].copy_from_slice(&m1);
    m1.zeroize();

    let g = Oracle::lookup(SIG_G_INDEX, pad_len, &image[..DIGEST_LEN]);
    let (_, pad) = image.split_at_mut(DIGEST_LEN);
    pad.copy_from_slice(&g);
    pad[pad_len - 1] &= msb_mask(nbits);
    for (p, s) in pad.iter_mut().zip(salt.iter()) {
        *p ^= s;
    }

    Ok(codec::from_bytes_le(&image))
}

/// Check a signature integer against a running message digest.
///
/// The digest context is consumed exactly once on every path.
pub fn verify_signature(digest: Sha1, s: &BigUint, nbits: usize) -> Result<()> {
    let mlen = nbits.div_ceil(8);
    if nbits / 8 < SIG_MIN_PAD + SIG_SALT_LEN + DIGEST_LEN {
        let _ = digest.finalize();
        return Err(Error::VerificationFailure);
    }
    let pad_len = mlen - DIGEST_LEN;

    let mut image = Zeroizing::new(codec::to_bytes_le(s, mlen));
    let (m1, pad) = image.split_at_mut(DIGEST_LEN);

    let mut g = Oracle::lookup(SIG_G_INDEX, pad_len, m1);
    g[pad_len - 1] &= msb_mask(nbits);

    // everything above the salt must match the mask exactly
    if pad[SIG_SALT_LEN..] != g[SIG_SALT_LEN..] {
        let _ = digest.finalize();
        return Err(Error::VerificationFailure);
    }

    for (p, gb) in pad[..SIG_SALT_LEN].iter_mut().zip(g.iter()) {
        *p ^= gb;
    }

    let mut digest = digest;
    digest.update(&pad[..SIG_SALT_LEN]);
    let mut check: [u8; DIGEST_LEN] = digest.finalize().into();
    let ok = check == m1[..];
    check.zeroize();

    if ok {
        Ok(())
    } else {
        Err(Error::VerificationFailure)
    }
}
