// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rabin-Williams factoring-based cryptosystem.
//!
//! Williams' variant of Rabin's squaring scheme (IEEE Trans. IT-26, 1980).
//! The primes satisfy `p = 3 (mod 8)` and `q = 7 (mod 8)`, which makes the
//! Jacobi symbol `(2 / n) = -1` and lets the tweak operations `E1`/`D1`
//! flag every message so that exactly one of the four square roots
//! recovers it:
//!
//! ```text
//! encrypt = E2(E1(m))    decrypt = D1(D2(c))
//! sign    = D2(E1(m))    verify  = D1(E2(s))
//! ```
//!
//! `E2` squares mod `n`; `D2` takes a square root via CRT and is the only
//! private operation. Five bits of the modulus are reserved for `E1`'s
//! expansion, so messages are padded to `bits(n) - 5` bits. Ciphertexts
//! and signatures serialize as a single hex integer.

use num_bigint_dig::BigInt;
use num_bigint_dig::BigUint;
use num_traits::{CheckedSub, ToPrimitive, Zero};
use sha1::{Digest, Sha1};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::codec;
use crate::error::{Error, Result};
use crate::key::{Key, SchemeEntry, SchemeKey};
use crate::pad;
use crate::primes;
use crate::prng::Prng;
use crate::text;

pub const SCHEME_NAME: &str = "Rabin-1";

/// Bits of the modulus reserved for `E1`'s multiply-by-8 headroom.
const RESERVED_BITS: usize = 5;

#[derive(Zeroize, ZeroizeOnDrop)]
struct RabinSecret {
    /// Smaller prime factor.
    p: BigUint,
    /// Larger prime factor.
    q: BigUint,
    /// q^(-1) mod p.
    u: BigUint,
    /// k mod (p-1), where k = ((p-1)(q-1) + 4) / 8.
    kp: BigUint,
    /// k mod (q-1).
    kq: BigUint,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RabinKey {
    #[zeroize(skip)]
    n: BigUint,
    #[zeroize(skip)]
    nbits: usize,
    secret: Option<RabinSecret>,
}

/// Flag a message with its Jacobi class: `t = 2m + 1`, then `4t` when
/// `(t / n) = 1`, `2t` when it is `-1`. A symbol of zero means `t` shares
/// a factor with `n` — the modulus is factored.
fn e1(m: &BigUint, n: &BigUint) -> Result<BigUint> {
    let t = (m << 1) + 1u32;
    let out = match primes::jacobi(&t, n) {
        1 => t << 2,
        -1 => t << 1,
        _ => return Err(Error::ModulusFactored),
    };
    if &out >= n {
        return Err(Error::MessageTooLong);
    }
    Ok(out)
}

fn e2(m: &BigUint, n: &BigUint) -> BigUint {
    (m * m) % n
}

/// Square root via CRT. `rsel` picks one of the four roots: bit 0 negates
/// the mod-p component, bit 1 the mod-q component.
fn d2(m: &BigUint, sk: &RabinSecret, rsel: u32) -> BigUint {
    let mut op = m.modpow(&sk.kp, &sk.p);
    let mut oq = m.modpow(&sk.kq, &sk.q);

    if rsel & 1 != 0 {
        op = &sk.p - op;
    }
    if rsel & 2 != 0 {
        oq = &sk.q - oq;
    }

    // out = (((op - oq) * u) mod p) * q + oq
    let d = (BigInt::from(op) - BigInt::from(oq.clone())) * BigInt::from(sk.u.clone());
    primes::mod_positive(&d, &sk.p) * &sk.q + oq
}

/// Undo `E1` from a canonical root, branching on `m mod 4`.
fn d1(m: &BigUint, n: &BigUint) -> Result<BigUint> {
    let low = (m % 4u32).to_u32().unwrap_or(0);
    let sub = |a: &BigUint, b: u32| {
        a.checked_sub(&BigUint::from(b))
            .ok_or(Error::IntegrityFailure)
    };
    Ok(match low {
        0 => sub(m, 4)? >> 3,
        1 => sub(&(n - m), 4)? >> 3,
        2 => sub(m, 2)? >> 2,
        _ => sub(&(n - m), 2)? >> 2,
    })
}

impl SchemeKey for RabinKey {
    fn scheme_name(&self) -> &'static str {
        SCHEME_NAME
    }

    fn is_private(&self) -> bool {
        self.secret.is_some()
    }

    fn encrypt(&self, prng: &mut Prng, msg: &[u8]) -> Result<String> {
        let m = pad::encode_for_encryption(prng, msg, self.nbits)?;
        let c = e2(&e1(&m, &self.n)?, &self.n);
        let mut out = String::new();
        text::push_uint(&mut out, &c);
        Ok(out)
    }

    fn decrypt(&self, ctext: &str) -> Result<Zeroizing<Vec<u8>>> {
        let sk = self.secret.as_ref().ok_or(Error::PrivateKeyRequired)?;
        let mut cur = ctext;
        let c = text::read_uint(&mut cur)?;

        let m = d1(&d2(&c, sk, 0), &self.n)?;
        pad::decode_after_decryption(&m, self.nbits)
    }

    fn sign(&self, prng: &mut Prng, msg: &[u8]) -> Result<String> {
        let sk = self.secret.as_ref().ok_or(Error::PrivateKeyRequired)?;

        let mut digest = Sha1::new();
        digest.update(msg);
        let m = pad::encode_for_signature(prng, digest, self.nbits)?;

        // a random word selects the square root; only its low 2 bits matter
        let s = d2(&e1(&m, &self.n)?, sk, prng.next_u32());
        let mut out = String::new();
        text::push_uint(&mut out, &s);
        Ok(out)
    }

    fn verify(&self, msg: &[u8], sig: &str) -> Result<()> {
        let mut cur = sig;
        let s = text::read_uint(&mut cur).map_err(|_| Error::VerificationFailure)?;

        let m = d1(&e2(&s, &self.n), &self.n).map_err(|_| Error::VerificationFailure)?;

        let mut digest = Sha1::new();
        digest.update(msg);
        pad::verify_signature(digest, &m, self.nbits)
    }

    fn export_public(&self) -> String {
        let mut out = format!("{SCHEME_NAME}:Pub,n=");
        text::push_uint(&mut out, &self.n);
        out
    }

    fn export_private(&self) -> Result<String> {
        let sk = self.secret.as_ref().ok_or(Error::PrivateKeyRequired)?;
        let mut out = format!("{SCHEME_NAME}:Priv,p=");
        text::push_uint(&mut out, &sk.p);
        out.push_str(",q=");
        text::push_uint(&mut out, &sk.q);
        Ok(out)
    }
}

/// Build the full private key from its prime factors, recomputing every
/// derived field. Orders the factors so `p < q`, which keeps the CRT
/// coefficient `u` small.
fn precompute(mut p: BigUint, mut q: BigUint) -> Result<RabinKey> {
    if p <= BigUint::from(1u32) || q <= BigUint::from(1u32) {
        return Err(Error::MalformedInput);
    }
    if p > q {
        core::mem::swap(&mut p, &mut q);
    }

    let n = &p * &q;
    let nbits = codec::bit_length(&n);
    if nbits <= RESERVED_BITS {
        return Err(Error::MalformedInput);
    }
    let nbits = nbits - RESERVED_BITS;

    let p1 = &p - 1u32;
    let q1 = &q - 1u32;

    // k = ((p-1)(q-1) + 4) / 8
    let k = (&p1 * &q1 + 4u32) >> 3;
    let kp = &k % &p1;
    let kq = &k % &q1;
    let u = primes::mod_inverse(&q, &p).ok_or(Error::MalformedInput)?;

    Ok(RabinKey {
        n,
        nbits,
        secret: Some(RabinSecret { p, q, u, kp, kq }),
    })
}

fn keygen(prng: &mut Prng, bits: usize, _extra: Option<&str>) -> Result<Key> {
    // p = 3 (mod 4) at minimum; the low three bits of q are then chosen
    // so that n = 5 (mod 8), i.e. (2 / n) = -1
    let p = loop {
        let c = primes::random_bits(prng, (bits + 1) / 2) | BigUint::from(3u32);
        if primes::is_prime(&c) {
            break c;
        }
    };

    let p_bit2_clear = (&p & BigUint::from(4u32)).is_zero();
    let q = loop {
        let mut c = primes::random_bits(prng, bits / 2) | BigUint::from(3u32);
        if p_bit2_clear {
            c |= BigUint::from(4u32);
        } else {
            c = &c - (&c & BigUint::from(4u32));
        }
        if primes::is_prime(&c) {
            break c;
        }
    };

    let key = precompute(p, q)?;
    Ok(Key::new(Box::new(key)))
}

fn import_public(asc: &str) -> Result<Key> {
    let mut cur = asc;
    text::skip_prefix(&mut cur, SCHEME_NAME)?;
    text::skip_prefix(&mut cur, ":Pub,n=")?;
    let n = text::read_uint(&mut cur)?;

    let nbits = codec::bit_length(&n);
    if nbits <= RESERVED_BITS {
        return Err(Error::MalformedInput);
    }
    Ok(Key::new(Box::new(RabinKey {
        n,
        nbits: nbits - RESERVED_BITS,
        secret: None,
    })))
}

fn import_private(asc: &str) -> Result<Key> {
    let mut cur = asc;
    text::skip_prefix(&mut cur, SCHEME_NAME)?;
    text::skip_prefix(&mut cur, ":Priv,p=")?;
    let p = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",q=")?;
    let q = text::read_uint(&mut cur)?;

    if p.is_zero() || q.is_zero() {
        return Err(Error::MalformedInput);
    }
    Ok(Key::new(Box::new(precompute(p, q)?)))
}

pub(crate) fn entry() -> SchemeEntry {
    SchemeEntry {
        name: SCHEME_NAME,
        keygen,
        import_public,
        import_private,
    }
}
