// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Public-key encryption and signing with pluggable cryptosystems
//!
//! Two complete asymmetric cryptosystems — ElGamal-style discrete-log
//! ([`elgamal`]) and Rabin-Williams factoring ([`rabin`]) — behind a
//! name-keyed [`Registry`]. Messages pass through a random-oracle padding
//! layer ([`pad`]) that makes ciphertext tampering detectable and binds
//! signatures to a salted full-domain hash. Keys, ciphertexts and
//! signatures all serialize as plain ASCII.
//!
//! ## Security
//!
//! Private key material and every transient buffer that touches secret
//! bytes are zeroed on drop via the `zeroize` crate. The [`Prng`] is a
//! caller-owned context: seed it from real entropy (or use
//! [`Prng::from_os_entropy`]) before generating keys, and guard it with a
//! lock if it must be shared across threads.
//!
//! ## Example
//!
//! ```rust,no_run
//! use asymcrypt::{Prng, Registry};
//!
//! let registry = Registry::with_default_schemes();
//! let mut prng = Prng::from_os_entropy();
//!
//! let key = registry.keygen("Rabin-1", &mut prng, 1024, None).expect("key generation failed");
//! let ctext = key.encrypt(&mut prng, b"attack at dawn").expect("encryption failed");
//! let msg = key.decrypt(&ctext).expect("decryption failed");
//! assert_eq!(&msg[..], b"attack at dawn");
//!
//! let sig = key.sign(&mut prng, b"attack at dawn").expect("signing failed");
//! key.verify(b"attack at dawn", &sig).expect("signature check failed");
//! ```

pub mod codec;
pub mod elgamal;
mod error;
mod hash;
mod key;
pub mod oracle;
pub mod pad;
mod primes;
mod prng;
pub mod rabin;
mod text;

pub use error::{Error, Result};
pub use key::{equivalent, Key, Registry, SchemeEntry, SchemeKey};
pub use oracle::Oracle;
pub use prng::Prng;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn test_registry() -> (Registry, Prng) {
        let mut prng = Prng::new();
        prng.seed(b"end to end tests");
        (Registry::with_default_schemes(), prng)
    }

    #[test]
    fn factoring_scheme_end_to_end() {
        let (registry, mut prng) = test_registry();
        let key = registry.keygen("Rabin-1", &mut prng, 1024, None).unwrap();

        // exchange through the public half only
        let public = registry.import_public(&key.export_public()).unwrap();
        let ctext = public.encrypt(&mut prng, b"attack at dawn").unwrap();
        assert_eq!(&key.decrypt(&ctext).unwrap()[..], b"attack at dawn");

        let sig = key.sign(&mut prng, b"attack at dawn").unwrap();
        public.verify(b"attack at dawn", &sig).unwrap();
        assert!(matches!(
            public.verify(b"attack at dawm", &sig),
            Err(Error::VerificationFailure)
        ));
    }

    #[test]
    fn discrete_log_scheme_end_to_end() {
        let (registry, mut prng) = test_registry();
        let key = registry.keygen("Elgamal-1", &mut prng, 512, None).unwrap();

        let ctext = key.encrypt(&mut prng, b"0123456789").unwrap();
        assert_eq!(&key.decrypt(&ctext).unwrap()[..], b"0123456789");

        let sig = key.sign(&mut prng, b"attack at dawn").unwrap();
        key.verify(b"attack at dawn", &sig).unwrap();
    }

    #[test]
    fn private_export_round_trips_byte_identical() {
        let (registry, mut prng) = test_registry();
        for scheme in ["Rabin-1", "Elgamal-1"] {
            let key = registry.keygen(scheme, &mut prng, 512, None).unwrap();
            let first = key.export().unwrap();
            let second = registry.import(&first).unwrap().export().unwrap();
            assert_eq!(first, second, "{scheme}");
        }
    }

    #[test]
    fn keys_survive_duplication() {
        let (registry, mut prng) = test_registry();
        let key = registry.keygen("Rabin-1", &mut prng, 512, None).unwrap();
        let copy = registry.duplicate(&key).unwrap();

        let ctext = copy.encrypt(&mut prng, b"hello").unwrap();
        assert_eq!(&key.decrypt(&ctext).unwrap()[..], b"hello");
        assert!(equivalent(Some(&key), Some(&copy)));
    }
}
