// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prime search and number-theory helpers shared by the cryptosystems.

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::{BigInt, BigUint, ModInverse};
use num_traits::{One, ToPrimitive, Zero};
use zeroize::Zeroizing;

use crate::prng::Prng;

/// Small primes, used both to pre-sieve candidates before Miller-Rabin and
/// as the generator candidates in discrete-log parameter generation.
pub(crate) const SMALL_PRIMES: &[u32] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293,
    307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521, 523, 541,
];

/// Miller-Rabin round counts sized to the candidate, FIPS 186-4 style:
/// larger candidates need fewer rounds for the same error bound.
const fn miller_rabin_rounds(bits: usize) -> usize {
    match bits {
        0..=256 => 40,
        257..=512 => 15,
        513..=1024 => 10,
        1025..=2048 => 6,
        _ => 4,
    }
}

/// Probabilistic primality test with a small-prime pre-sieve.
pub(crate) fn is_prime(n: &BigUint) -> bool {
    for &p in SMALL_PRIMES {
        if (n % p).is_zero() {
            return *n == BigUint::from(p);
        }
    }
    probably_prime(n, miller_rabin_rounds(n.bits()))
}

/// Safe-prime test: returns `q = (p - 1) / 2` when both `p` and `q` are
/// prime.
pub(crate) fn safe_prime_check(p: &BigUint) -> Option<BigUint> {
    if !is_prime(p) {
        return None;
    }
    let q = (p - 1u32) >> 1;
    if is_prime(&q) {
        Some(q)
    } else {
        None
    }
}

/// Random integer of exactly `bits` bits (top bit forced set).
pub(crate) fn random_bits(prng: &mut Prng, bits: usize) -> BigUint {
    debug_assert!(bits > 0);
    let len = bits.div_ceil(8);
    let mut buf = Zeroizing::new(vec![0u8; len]);
    prng.fill_bytes(&mut buf);
    buf[0] &= 0xffu8 >> ((8 - bits % 8) % 8);
    buf[0] |= 1 << ((bits - 1) % 8);
    BigUint::from_bytes_be(&buf)
}

/// Modular inverse of `a` mod `m`, normalized into `[0, m)`.
pub(crate) fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let v = a.clone().mod_inverse(m)?;
    Some(mod_positive(&v, m))
}

/// Least non-negative residue of a signed value.
pub(crate) fn mod_positive(x: &BigInt, m: &BigUint) -> BigUint {
    let m = BigInt::from(m.clone());
    let r = ((x % &m) + &m) % m;
    r.to_biguint().unwrap_or_default()
}

/// Jacobi symbol `(a / n)` for odd positive `n`.
///
/// `num-bigint-dig` computes this internally for its primality tests but
/// does not export it, so the classical binary algorithm lives here.
pub(crate) fn jacobi(a: &BigUint, n: &BigUint) -> i32 {
    debug_assert!((n % 2u32).to_u32() == Some(1), "n must be odd");

    let mut a = a % n;
    let mut n = n.clone();
    let mut t = 1i32;

    while !a.is_zero() {
        while (&a % 2u32).is_zero() {
            a >>= 1;
            let r = (&n % 8u32).to_u32().unwrap_or(0);
            if r == 3 || r == 5 {
                t = -t;
            }
        }
        core::mem::swap(&mut a, &mut n);
        if (&a % 4u32).to_u32() == Some(3) && (&n % 4u32).to_u32() == Some(3) {
            t = -t;
        }
        a %= &n;
    }

    if n.is_one() {
        t
    } else {
        0
    }
}
