// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reseedable pseudorandom generator.
//!
//! [`Prng`] keeps a 16-word (64-byte) state and steps it with a hash
//! feedback transform: the state is compressed as a single block, and the
//! 5-word output is both emitted and added back into the leading words of
//! the state. Reseeding never discards the current state; it folds 64
//! bytes of current output together with the caller's entropy through the
//! random oracle (domain index 0) and installs the result as the new
//! state.
//!
//! A fresh generator starts from the all-zero state and must be seeded
//! before use. The context is deliberately caller-owned: there is no
//! process-global instance, and a generator shared across threads needs an
//! external lock. Reseeding must not be interleaved with an in-flight
//! [`Prng::fill_bytes`], which `&mut self` already enforces.

use num_bigint_dig::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::hash::{compress_block, INITIAL_STATE};
use crate::oracle::Oracle;

const STATE_WORDS: usize = 16;
const STATE_BYTES: usize = 4 * STATE_WORDS;
const OUT_BYTES: usize = 20;

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Prng {
    state: [u32; STATE_WORDS],
}

impl Prng {
    /// A generator in its initial (all-zero, unseeded) state.
    pub fn new() -> Self {
        Self {
            state: [0u32; STATE_WORDS],
        }
    }

    /// A generator seeded with 32 bytes of operating-system entropy.
    pub fn from_os_entropy() -> Self {
        let mut prng = Self::new();
        let mut entropy = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut entropy[..]);
        prng.seed(&entropy[..]);
        prng
    }

    /// One feedback step: compress the state, fold the output back in,
    /// return the 5 output words.
    fn transform(&mut self) -> [u32; 5] {
        let mut block = [0u8; STATE_BYTES];
        for (chunk, word) in block.chunks_exact_mut(4).zip(&self.state) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        let mut out = INITIAL_STATE;
        compress_block(&mut out, &block);
        block.zeroize();

        // word-wise add with carry, confined to the first 5 words
        let mut carry = 0u64;
        for (word, o) in self.state.iter_mut().zip(&out) {
            let sum = u64::from(*word) + u64::from(*o) + carry;
            *word = sum as u32;
            carry = sum >> 32;
        }
        out
    }

    /// Fill `buf` with pseudorandom bytes.
    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(OUT_BYTES) {
            let mut out = self.transform();
            let mut bytes = [0u8; OUT_BYTES];
            for (b, word) in bytes.chunks_exact_mut(4).zip(&out) {
                b.copy_from_slice(&word.to_le_bytes());
            }
            chunk.copy_from_slice(&bytes[..chunk.len()]);
            bytes.zeroize();
            out.zeroize();
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        let v = u32::from_le_bytes(buf);
        buf.zeroize();
        v
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        let v = u64::from_le_bytes(buf);
        buf.zeroize();
        v
    }

    /// Uniform value in `[0, n)` by rejection sampling.
    ///
    /// Draws `ceil(bits(n) / 8)` bytes, masks the excess high bits, and
    /// retries until the big-endian value falls below `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn uniform_below(&mut self, n: &BigUint) -> BigUint {
        assert!(!n.is_zero(), "empty sampling range");
        let bits = n.bits();
        let len = bits.div_ceil(8);
        let mask = 0xffu8 >> ((8 - bits % 8) % 8);

        let mut buf = Zeroizing::new(vec![0u8; len]);
        loop {
            self.fill_bytes(&mut buf);
            buf[0] &= mask;
            let r = BigUint::from_bytes_be(&buf);
            if &r < n {
                return r;
            }
        }
    }

    /// Mix `entropy` into the generator.
    ///
    /// The replacement state is `Oracle(index 0)` over 64 bytes of output
    /// drawn from the current state followed by the entropy, so seeding
    /// compounds with whatever unpredictability the state already had.
    pub fn seed(&mut self, entropy: &[u8]) {
        let mut old = Zeroizing::new([0u8; STATE_BYTES]);
        self.fill_bytes(&mut old[..]);

        let mut oracle = Oracle::new(STATE_BYTES, 0);
        oracle.update(&old[..]);
        oracle.update(entropy);
        let fresh = oracle.finish();

        for (word, chunk) in self.state.iter_mut().zip(fresh.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
    }
}

impl Default for Prng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(entropy: &[u8]) -> Prng {
        let mut prng = Prng::new();
        prng.seed(entropy);
        prng
    }

    #[test]
    fn deterministic_from_seed() {
        let mut a = seeded(b"fixed entropy");
        let mut b = seeded(b"fixed entropy");

        let mut out_a = [0u8; 100];
        let mut out_b = [0u8; 100];
        a.fill_bytes(&mut out_a);
        b.fill_bytes(&mut out_b);
        assert_eq!(out_a, out_b);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = seeded(b"entropy one");
        let mut b = seeded(b"entropy two");
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn output_advances_the_state() {
        let mut prng = seeded(b"advancing");
        assert_ne!(prng.next_u32(), prng.next_u32());
    }

    #[test]
    fn partial_block_discards_surplus() {
        // asking for 4 bytes and for 20 bytes must agree on the prefix
        let mut a = seeded(b"surplus");
        let mut b = seeded(b"surplus");
        let mut four = [0u8; 4];
        let mut twenty = [0u8; 20];
        a.fill_bytes(&mut four);
        b.fill_bytes(&mut twenty);
        assert_eq!(four, twenty[..4]);
    }

    #[test]
    fn reseeding_folds_previous_state() {
        let mut once = seeded(b"common");
        let mut twice = seeded(b"common");
        twice.seed(b"more");
        assert_ne!(once.next_u64(), twice.next_u64());

        // same seed sequence, same stream
        let mut other = seeded(b"common");
        other.seed(b"more");
        assert_eq!(twice.next_u64(), other.next_u64());
    }

    #[test]
    fn uniform_below_stays_in_range() {
        let mut prng = seeded(b"ranges");
        for bound in [1u32, 2, 7, 255, 256, 1000] {
            let n = BigUint::from(bound);
            for _ in 0..50 {
                assert!(prng.uniform_below(&n) < n);
            }
        }
        // a bound that is not a power of two, wider than one word
        let n = BigUint::from(u64::MAX - 12345);
        for _ in 0..20 {
            assert!(prng.uniform_below(&n) < n);
        }
    }

    #[test]
    fn os_entropy_generators_differ() {
        let mut a = Prng::from_os_entropy();
        let mut b = Prng::from_os_entropy();
        assert_ne!(a.next_u64(), b.next_u64());
    }
}
