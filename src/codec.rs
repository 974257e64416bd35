// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-width raw-magnitude serialization for big integers.
//!
//! Every cryptosystem in this crate treats integers as byte strings of a
//! caller-chosen width: padding images are little-endian, rejection-sampled
//! random values are big-endian. These helpers pin down that mapping,
//! including the edge cases (zero, buffers shorter than the magnitude,
//! buffers longer than the magnitude).

use num_bigint_dig::{BigInt, BigUint, Sign};
use num_traits::Zero;

/// Number of significant bits in the magnitude of `x`; 0 for zero.
pub fn bit_length(x: &BigUint) -> usize {
    if x.is_zero() {
        0
    } else {
        x.bits()
    }
}

/// Bit `i` of `x` in two's-complement representation.
///
/// Non-negative values behave as expected, with an infinite run of zero
/// bits above the magnitude. Negative values are sign-extended: the result
/// accounts for the borrow that two's complement propagates through the
/// low-order bytes.
pub fn bit(x: &BigInt, i: usize) -> u8 {
    let (sign, mag) = x.to_bytes_le();
    let byte = i / 8;
    let shift = i % 8;

    if sign == Sign::Minus {
        if byte >= mag.len() {
            return 1;
        }
        // -x == !x + 1; the +1 carries through while all lower bytes are zero
        let carry = u8::from(mag[..byte].iter().all(|&b| b == 0));
        ((!mag[byte]).wrapping_add(carry) >> shift) & 1
    } else if byte >= mag.len() {
        0
    } else {
        (mag[byte] >> shift) & 1
    }
}

/// Magnitude of `x` as exactly `size` little-endian bytes.
///
/// High-order bytes are zero-padded. If the magnitude needs more than
/// `size` bytes the excess is silently dropped; callers are expected to
/// size buffers from [`bit_length`].
pub fn to_bytes_le(x: &BigUint, size: usize) -> Vec<u8> {
    let mut out = x.to_bytes_le();
    out.resize(size, 0);
    out
}

/// Magnitude of `x` as exactly `size` big-endian bytes.
pub fn to_bytes_be(x: &BigUint, size: usize) -> Vec<u8> {
    let mut out = to_bytes_le(x, size);
    out.reverse();
    out
}

/// Reconstruct a non-negative integer from little-endian magnitude bytes.
pub fn from_bytes_le(buf: &[u8]) -> BigUint {
    BigUint::from_bytes_le(buf)
}

/// Reconstruct a non-negative integer from big-endian magnitude bytes.
pub fn from_bytes_be(buf: &[u8]) -> BigUint {
    BigUint::from_bytes_be(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn bit_length_of_zero() {
        assert_eq!(bit_length(&BigUint::zero()), 0);
    }

    #[test]
    fn bit_length_small_values() {
        assert_eq!(bit_length(&BigUint::one()), 1);
        assert_eq!(bit_length(&BigUint::from(0x80u32)), 8);
        assert_eq!(bit_length(&BigUint::from(0x100u32)), 9);
    }

    #[test]
    fn roundtrip_both_orders() {
        // sizes: zero, single byte, one machine word, one word plus a byte
        for &size in &[0usize, 1, 8, 9] {
            let max = if size == 0 {
                BigUint::zero()
            } else {
                (BigUint::one() << (8 * size)) - 1u32
            };
            for x in [
                BigUint::zero(),
                BigUint::one(),
                BigUint::from(0xa5u32),
                max.clone(),
            ] {
                if x > max {
                    continue;
                }
                assert_eq!(from_bytes_le(&to_bytes_le(&x, size)), x);
                assert_eq!(from_bytes_be(&to_bytes_be(&x, size)), x);
            }
        }
    }

    #[test]
    fn zero_pads_high_bytes() {
        let x = BigUint::from(0x0102u32);
        assert_eq!(to_bytes_le(&x, 4), vec![0x02, 0x01, 0x00, 0x00]);
        assert_eq!(to_bytes_be(&x, 4), vec![0x00, 0x00, 0x01, 0x02]);
    }

    #[test]
    fn truncates_oversized_magnitude() {
        let x = BigUint::from(0x0102_0304u32);
        // only the low-order bytes survive
        assert_eq!(to_bytes_le(&x, 2), vec![0x04, 0x03]);
        assert_eq!(to_bytes_be(&x, 2), vec![0x03, 0x04]);
    }

    #[test]
    fn from_bytes_normalizes_leading_zeros() {
        let x = from_bytes_be(&[0, 0, 0, 1]);
        assert_eq!(x, BigUint::one());
        assert_eq!(bit_length(&x), 1);
    }

    #[test]
    fn bit_of_nonnegative() {
        let x = BigInt::from(0b1010u32);
        assert_eq!(bit(&x, 0), 0);
        assert_eq!(bit(&x, 1), 1);
        assert_eq!(bit(&x, 3), 1);
        assert_eq!(bit(&x, 200), 0);
    }

    #[test]
    fn bit_of_negative_matches_twos_complement() {
        // -256 = ...1111_0000_0000
        let x = BigInt::from(-256i32);
        for i in 0..8 {
            assert_eq!(bit(&x, i), 0, "bit {i}");
        }
        for i in 8..20 {
            assert_eq!(bit(&x, i), 1, "bit {i}");
        }

        // -1 = ...1111
        let minus_one = BigInt::from(-1i32);
        for i in 0..70 {
            assert_eq!(bit(&minus_one, i), 1);
        }

        // -5 = ...1111_1011
        let x = BigInt::from(-5i32);
        assert_eq!(bit(&x, 0), 1);
        assert_eq!(bit(&x, 1), 1);
        assert_eq!(bit(&x, 2), 0);
        assert_eq!(bit(&x, 3), 1);
    }
}
