// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ElGamal-style discrete-log cryptosystem.
//!
//! Works in the subgroup of order `q` generated by `g` modulo a prime `p`.
//! Encryption pads the message to `bits(p) - 1` bits and produces the pair
//! `(g^r, y^r * m)`; signatures are of the classic ElGamal shape over a
//! full-width oracle digest of the message.
//!
//! Domain parameters travel as text (`p=0x..,q=0x..,g=0x..`). Key
//! generation accepts caller-supplied parameters, falls back to a built-in
//! set for common sizes, and two generators are provided for fresh
//! parameters: a safe-prime search and a seeded digest-chain derivation
//! whose outputs are reproducible from the seed.

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use sha1::{Digest, Sha1};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::codec;
use crate::error::{Error, Result};
use crate::key::{Key, SchemeEntry, SchemeKey};
use crate::oracle::Oracle;
use crate::pad;
use crate::primes;
use crate::prng::Prng;
use crate::text;

pub const SCHEME_NAME: &str = "Elgamal-1";

/// Oracle domain for hashing a message to a signature-sized integer.
const MSG_DIGEST_INDEX: u64 = 5;

/// Primality rounds for freshly derived parameters.
const PARAM_PRIME_ROUNDS: usize = 25;

/// Words of PRNG seed material feeding the digest-chain generator.
const SEED_WORDS: usize = 4;

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ElgamalKey {
    #[zeroize(skip)]
    p: BigUint,
    #[zeroize(skip)]
    q: BigUint,
    #[zeroize(skip)]
    g: BigUint,
    #[zeroize(skip)]
    y: BigUint,
    #[zeroize(skip)]
    nbits: usize,
    /// Secret exponent; absent for a public key.
    x: Option<BigUint>,
}

impl ElgamalKey {
    fn assemble(p: BigUint, q: BigUint, g: BigUint, y: BigUint, x: Option<BigUint>) -> Result<Self> {
        if p.is_zero() || q.is_zero() || g.is_zero() {
            return Err(Error::MalformedInput);
        }
        let nbits = codec::bit_length(&p) - 1;
        Ok(Self { p, q, g, y, nbits, x })
    }
}

/// Message digest as an integer of at most `nbits` bits.
fn message_digest_int(msg: &[u8], nbits: usize) -> BigUint {
    let buf = Oracle::lookup(MSG_DIGEST_INDEX, nbits.div_ceil(8), msg);
    codec::from_bytes_le(&buf) & ((BigUint::one() << nbits) - 1u32)
}

impl SchemeKey for ElgamalKey {
    fn scheme_name(&self) -> &'static str {
        SCHEME_NAME
    }

    fn is_private(&self) -> bool {
        self.x.is_some()
    }

    fn encrypt(&self, prng: &mut Prng, msg: &[u8]) -> Result<String> {
        let m = pad::encode_for_encryption(prng, msg, self.nbits)?;
        let r = prng.uniform_below(&self.q);

        // (g^r, y^r * m)
        let t = (self.y.modpow(&r, &self.p) * &m) % &self.p;
        let rr = self.g.modpow(&r, &self.p);

        let mut out = String::from("r=");
        text::push_uint(&mut out, &rr);
        out.push_str(",t=");
        text::push_uint(&mut out, &t);
        Ok(out)
    }

    fn decrypt(&self, ctext: &str) -> Result<Zeroizing<Vec<u8>>> {
        let x = self.x.as_ref().ok_or(Error::PrivateKeyRequired)?;

        let mut cur = ctext;
        text::skip_prefix(&mut cur, "r=")?;
        let r = text::read_uint(&mut cur)?;
        text::skip_prefix(&mut cur, ",t=")?;
        let t = text::read_uint(&mut cur)?;

        let shared = r.modpow(x, &self.p);
        let inv = primes::mod_inverse(&shared, &self.p).ok_or(Error::IntegrityFailure)?;
        let m = (t * inv) % &self.p;
        pad::decode_after_decryption(&m, self.nbits)
    }

    fn sign(&self, prng: &mut Prng, msg: &[u8]) -> Result<String> {
        let x = self.x.as_ref().ok_or(Error::PrivateKeyRequired)?;
        let m = message_digest_int(msg, self.nbits);

        // nonce must be invertible mod q
        let (k, ki) = loop {
            let k = prng.uniform_below(&self.q);
            if let Some(ki) = primes::mod_inverse(&k, &self.q) {
                break (k, ki);
            }
        };

        let rr = self.g.modpow(&k, &self.p);

        // s = (m - x * r) / k  mod q
        let xr = (x * &rr) % &self.q;
        let s = ((&m % &self.q) + &self.q - xr) % &self.q;
        let s = (s * ki) % &self.q;

        let mut out = String::from("r=");
        text::push_uint(&mut out, &rr);
        out.push_str(",s=");
        text::push_uint(&mut out, &s);
        Ok(out)
    }

    fn verify(&self, msg: &[u8], sig: &str) -> Result<()> {
        let m = message_digest_int(msg, self.nbits);

        let mut cur = sig;
        text::skip_prefix(&mut cur, "r=")?;
        let r = text::read_uint(&mut cur)?;
        text::skip_prefix(&mut cur, ",s=")?;
        let s = text::read_uint(&mut cur)?;

        // g^m == y^r * r^s  (mod p)
        let lhs = self.g.modpow(&m, &self.p);
        let rhs = (self.y.modpow(&r, &self.p) * r.modpow(&s, &self.p)) % &self.p;
        if lhs == rhs {
            Ok(())
        } else {
            Err(Error::VerificationFailure)
        }
    }

    fn export_public(&self) -> String {
        let mut out = format!("{SCHEME_NAME}:Pub,p=");
        text::push_uint(&mut out, &self.p);
        out.push_str(",q=");
        text::push_uint(&mut out, &self.q);
        out.push_str(",g=");
        text::push_uint(&mut out, &self.g);
        out.push_str(",y=");
        text::push_uint(&mut out, &self.y);
        out
    }

    fn export_private(&self) -> Result<String> {
        let x = self.x.as_ref().ok_or(Error::PrivateKeyRequired)?;
        let mut out = format!("{SCHEME_NAME}:Priv,p=");
        text::push_uint(&mut out, &self.p);
        out.push_str(",q=");
        text::push_uint(&mut out, &self.q);
        out.push_str(",g=");
        text::push_uint(&mut out, &self.g);
        out.push_str(",x=");
        text::push_uint(&mut out, x);
        Ok(out)
    }
}

fn keygen(prng: &mut Prng, bits: usize, extra: Option<&str>) -> Result<Key> {
    let params = match extra {
        Some(text) => text.to_owned(),
        None => default_parameters(bits)
            .ok_or_else(|| {
                Error::KeyGenerationFailed(format!("no built-in parameters for {bits} bits"))
            })?
            .to_owned(),
    };

    let mut cur = params.as_str();
    text::skip_prefix(&mut cur, "p=")?;
    let p = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",q=")?;
    let q = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",g=")?;
    let g = text::read_uint(&mut cur)?;

    if q.is_zero() {
        return Err(Error::MalformedInput);
    }
    let x = prng.uniform_below(&q);
    let y = g.modpow(&x, &p);
    let key = ElgamalKey::assemble(p, q, g, y, Some(x))?;
    Ok(Key::new(Box::new(key)))
}

fn import_public(asc: &str) -> Result<Key> {
    let mut cur = asc;
    text::skip_prefix(&mut cur, SCHEME_NAME)?;
    text::skip_prefix(&mut cur, ":Pub,p=")?;
    let p = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",q=")?;
    let q = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",g=")?;
    let g = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",y=")?;
    let y = text::read_uint(&mut cur)?;

    let key = ElgamalKey::assemble(p, q, g, y, None)?;
    Ok(Key::new(Box::new(key)))
}

fn import_private(asc: &str) -> Result<Key> {
    let mut cur = asc;
    text::skip_prefix(&mut cur, SCHEME_NAME)?;
    text::skip_prefix(&mut cur, ":Priv,p=")?;
    let p = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",q=")?;
    let q = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",g=")?;
    let g = text::read_uint(&mut cur)?;
    text::skip_prefix(&mut cur, ",x=")?;
    let x = text::read_uint(&mut cur)?;

    // y is derived, not stored
    let y = g.modpow(&x, &p);
    let key = ElgamalKey::assemble(p, q, g, y, Some(x))?;
    Ok(Key::new(Box::new(key)))
}

pub(crate) fn entry() -> SchemeEntry {
    SchemeEntry {
        name: SCHEME_NAME,
        keygen,
        import_public,
        import_private,
    }
}

/// Built-in domain parameters for common sizes.
pub fn default_parameters(nbits: usize) -> Option<&'static str> {
    if nbits <= 512 {
        Some("p=0xb245175135ea14dbd127d62d75ec4e7f65389f32030dc0555c894ced21f30b8f11b289c03f3e6dac015ad600cfaebcb0e7a61c8a015262092b108a090669e967,q=0xb245175135ea14dbd127d62d75ec4e7f65389f32030dc0555c894ced21f30b8f11b289c03f3e6dac015ad600cfaebcb0e7a61c8a015262092b108a090669e966,g=0x7")
    } else if nbits <= 1024 {
        Some("p=0xf79f1bc68ff0853731fcdf48c726fcd0fd7d67787865d1022d3e6ae51b26db9486307c77040f44229c772b392c9f98a9028bfbc3cc71966511d89a947ae0d87ea8fccfcc3d67a426d8179e5dacac5648c208324e29166a153736e2dd0a619781609a8b94e52fcf0ba5f4c4cb8f4471cdaa7530737521b06f1251d466144c2d03,q=0xf79f1bc68ff0853731fcdf48c726fcd0fd7d67787865d1022d3e6ae51b26db9486307c77040f44229c772b392c9f98a9028bfbc3cc71966511d89a947ae0d87ea8fccfcc3d67a426d8179e5dacac5648c208324e29166a153736e2dd0a619781609a8b94e52fcf0ba5f4c4cb8f4471cdaa7530737521b06f1251d466144c2d02,g=0xb")
    } else if nbits <= 1536 {
        Some("p=0xa7b27159e51587b4dbce4e9e12e8bc256adb08570277e153919dcea1afa6fc293fc07f1a0d552fc34c782b4ec11320f706559281a44b83ebbf92af4b51a1f8c782e9e2cccf7fbe81b42db09ef1028fe3d270b5a89c85618ef97cc6d6a7324f9d77d35d311230d3b542ddcad16be81eac369d5466c163d5c9e919635362cf5291d2c0d0d313ae5630f137bad3094d977f2d729ac7aa7bfd2c338d773d084d0b651c312778fb08a77e40eb8cdf1022e7f83de3f6ce5fbe6868de10a22713b39887,q=0xa7b27159e51587b4dbce4e9e12e8bc256adb08570277e153919dcea1afa6fc293fc07f1a0d552fc34c782b4ec11320f706559281a44b83ebbf92af4b51a1f8c782e9e2cccf7fbe81b42db09ef1028fe3d270b5a89c85618ef97cc6d6a7324f9d77d35d311230d3b542ddcad16be81eac369d5466c163d5c9e919635362cf5291d2c0d0d313ae5630f137bad3094d977f2d729ac7aa7bfd2c338d773d084d0b651c312778fb08a77e40eb8cdf1022e7f83de3f6ce5fbe6868de10a22713b39886,g=0x11")
    } else if nbits <= 2048 {
        Some("p=0xb4d69648db452dd3e524a00000fa7dedc8f791decc0799335a482a296d49c21be4c63fb8c63e3025a10d3941ab64cd48b6aeceeef60d3a2dd7fb88a12364f04ef12617aac6ddac210733cff641fd595d569b1e8c62cde8d09277202e026a4aeda1d4b7b5c0ac99a1276b87b9864855ebc242015a99e79016c8bee4d65c3b30e0272e1cb8ebd12aa0ce533bbd72aafbb2fe9cd750e732e3b07d399e1f5b62a106c08bd6cf4aa99ebb4e33be9f34fd3da57d936fd31916478f5e73adc113519684ef15721b510ac0165f4d0f5e72b923223d0c39f6004780dca0c74e80cbf00ed7915e777f9a7a38bab9201b8f3318f5ab1a7c3a2993f96beb3f091670d7c20927,q=0xb4d69648db452dd3e524a00000fa7dedc8f791decc0799335a482a296d49c21be4c63fb8c63e3025a10d3941ab64cd48b6aeceeef60d3a2dd7fb88a12364f04ef12617aac6ddac210733cff641fd595d569b1e8c62cde8d09277202e026a4aeda1d4b7b5c0ac99a1276b87b9864855ebc242015a99e79016c8bee4d65c3b30e0272e1cb8ebd12aa0ce533bbd72aafbb2fe9cd750e732e3b07d399e1f5b62a106c08bd6cf4aa99ebb4e33be9f34fd3da57d936fd31916478f5e73adc113519684ef15721b510ac0165f4d0f5e72b923223d0c39f6004780dca0c74e80cbf00ed7915e777f9a7a38bab9201b8f3318f5ab1a7c3a2993f96beb3f091670d7c20926,g=0x5")
    } else if nbits <= 4096 {
        Some("p=0xd6d3bb04176bddf6c602f7501041273b2d4c9f79eb956c8f6326d37766983d06bf64b004e77b65165a34faf25bdf22f0cfaa946013c1b65b61a037b8683603ebd265d4694696f3676b966a6231374f16aa00343d2f1450b9e18c4753c8d3397cc98852e24a723f421068e1d1010ba70abf740c7e6b232778113220e06b3db5589bae66a5393acba971bbda0eefbe7708c5107eb8ae4ec4f00fb34c36db17f395c6617d20cce60558a0609f514fb9a261ddf44574321ed4364639cf0ad2e3d287a640f9ece71ddb708619ded719f950687bc6734cd5b4ac4f4942047319820b533b06b03f2ce7b62c17141354c86d873c01e5c3fd261050706bd3386bc8db96c5695713a1fa8f6676628bc31691a3b00966eaa16cb508855df9ee0f2d52c083f10c8bc3fc8eec2970ed06bfdeb9ef86371996966d556507b4823eeaee17c1f2d668e21715ee18c79ec80650f9011378c062321fb93724381fef05d61d4f118864a89c26e1217173ac9f0439b2fb9b30bc0a5294dc2f42a9daf7283e5f20039ce17c85ab127ba28bba93c6d39a8e5c57e17ff4ebf54b15370df182c035c12411e0f95c573d3ffdfde8295b5f59d4f667655d56b9d490711df779e0defd18e5ac7a230cf28beda40aef8e82f3aa2da8a4740ad98e3cd631188f921d3e5bf3d60b16cdd119052740326ab563e2743a5b43c796da779d27ea18cb3dcc160f637faa0b,q=0xd6d3bb04176bddf6c602f7501041273b2d4c9f79eb956c8f6326d37766983d06bf64b004e77b65165a34faf25bdf22f0cfaa946013c1b65b61a037b8683603ebd265d4694696f3676b966a6231374f16aa00343d2f1450b9e18c4753c8d3397cc98852e24a723f421068e1d1010ba70abf740c7e6b232778113220e06b3db5589bae66a5393acba971bbda0eefbe7708c5107eb8ae4ec4f00fb34c36db17f395c6617d20cce60558a0609f514fb9a261ddf44574321ed4364639cf0ad2e3d287a640f9ece71ddb708619ded719f950687bc6734cd5b4ac4f4942047319820b533b06b03f2ce7b62c17141354c86d873c01e5c3fd261050706bd3386bc8db96c5695713a1fa8f6676628bc31691a3b00966eaa16cb508855df9ee0f2d52c083f10c8bc3fc8eec2970ed06bfdeb9ef86371996966d556507b4823eeaee17c1f2d668e21715ee18c79ec80650f9011378c062321fb93724381fef05d61d4f118864a89c26e1217173ac9f0439b2fb9b30bc0a5294dc2f42a9daf7283e5f20039ce17c85ab127ba28bba93c6d39a8e5c57e17ff4ebf54b15370df182c035c12411e0f95c573d3ffdfde8295b5f59d4f667655d56b9d490711df779e0defd18e5ac7a230cf28beda40aef8e82f3aa2da8a4740ad98e3cd631188f921d3e5bf3d60b16cdd119052740326ab563e2743a5b43c796da779d27ea18cb3dcc160f637faa0a,g=0x2")
    } else {
        None
    }
}

/// Search for fresh domain parameters built on a safe prime.
///
/// Draws random odd candidates of `nbits` bits until one is a safe prime
/// `p = 2q + 1`, then picks the smallest small prime `g` with
/// `g^q != 1 (mod p)`. Unbounded retry loop: callers needing a timeout
/// must bound it externally.
pub fn generate_parameters(prng: &mut Prng, nbits: usize) -> String {
    loop {
        let (p, q) = loop {
            let p = primes::random_bits(prng, nbits) | BigUint::one();
            if let Some(q) = primes::safe_prime_check(&p) {
                break (p, q);
            }
        };

        for &g in primes::SMALL_PRIMES {
            let t = BigUint::from(g).modpow(&q, &p);
            if !t.is_one() {
                let mut out = String::from("p=");
                text::push_uint(&mut out, &p);
                out.push_str(",q=");
                text::push_uint(&mut out, &q);
                out.push_str(",g=");
                text::push_uint(&mut out, &BigUint::from(g));
                return out;
            }
        }
        // every small prime generated the trivial subgroup; very unlikely
    }
}

fn seed_bytes(seed: &[u64; SEED_WORDS]) -> [u8; 8 * SEED_WORDS] {
    let mut out = [0u8; 8 * SEED_WORDS];
    for (chunk, word) in out.chunks_exact_mut(8).zip(seed) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

/// Derive a 160-bit prime order from the evolving seed.
fn gen_q(seed: &mut [u64; SEED_WORDS]) -> BigUint {
    loop {
        let d1: [u8; 20] = Sha1::digest(seed_bytes(seed)).into();
        seed[3] = seed[3].wrapping_add(1);
        let d2: [u8; 20] = Sha1::digest(seed_bytes(seed)).into();

        // big and odd: force the top and bottom bits
        let q = (codec::from_bytes_le(&d1) ^ codec::from_bytes_le(&d2))
            | (BigUint::one() << 159)
            | BigUint::one();
        if probably_prime(&q, 5) {
            return q;
        }
    }
}

/// Derive a prime `p` of `nbits` bits with `p = 1 (mod q^2)` from the
/// evolving seed.
fn gen_p(q: &BigUint, nbits: usize, seed: &mut [u64; SEED_WORDS]) -> BigUint {
    let pbytes = nbits / 8;
    let qq = q * q;
    let mut raw = Zeroizing::new(vec![0u8; pbytes.div_ceil(20) * 20]);

    loop {
        for chunk in raw.chunks_exact_mut(20) {
            seed[0] = seed[0].wrapping_add(1);
            let d: [u8; 20] = Sha1::digest(seed_bytes(seed)).into();
            chunk.copy_from_slice(&d);
        }
        let x = codec::from_bytes_le(&raw[..pbytes]) | (BigUint::one() << (nbits - 1));
        let c = &x % &qq;
        let x1 = x + 1u32;
        if x1 <= c {
            continue;
        }
        let p = x1 - c;
        if probably_prime(&p, PARAM_PRIME_ROUNDS) {
            return p;
        }
    }
}

/// Find a generator of the order-`q` subgroup.
fn gen_g(prng: &mut Prng, p: &BigUint, q: &BigUint) -> BigUint {
    let e = (p - 1u32) / q;
    let p3 = p - 3u32;
    loop {
        let h = prng.uniform_below(&p3) + 1u32;
        let g = h.modpow(&e, p);
        if !g.is_one() {
            return g;
        }
    }
}

/// Derive domain parameters from a digest chain over a PRNG-drawn seed.
///
/// Unlike [`generate_parameters`], the primes are reproducible from the
/// seed words, so the derivation can be audited. The order `q` is 160 bits
/// (tied to the digest width) and `p = 1 (mod q^2)`.
pub fn generate_parameters_provable(prng: &mut Prng, nbits: usize) -> Result<String> {
    if nbits < 512 {
        return Err(Error::InvalidKeySize {
            min: 512,
            actual: nbits,
        });
    }
    if nbits % 8 != 0 {
        return Err(Error::KeyGenerationFailed(
            "size must be a multiple of 8 bits".into(),
        ));
    }

    let mut seed = [0u64; SEED_WORDS];
    for word in &mut seed {
        *word = prng.next_u64();
    }

    let (p, q) = loop {
        let q = gen_q(&mut seed);
        let p = gen_p(&q, nbits, &mut seed);
        if probably_prime(&p, PARAM_PRIME_ROUNDS) && probably_prime(&q, PARAM_PRIME_ROUNDS) {
            break (p, q);
        }
    };
    let g = gen_g(prng, &p, &q);

    let mut out = String::from("p=");
    text::push_uint(&mut out, &p);
    out.push_str(",q=");
    text::push_uint(&mut out, &q);
    out.push_str(",g=");
    text::push_uint(&mut out, &g);
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn test_prng() -> Prng {
        let mut prng = Prng::new();
        prng.seed(b"elgamal tests");
        prng
    }

    fn keygen_512(prng: &mut Prng) -> Key {
        keygen(prng, 512, None).unwrap()
    }

    #[test]
    fn builtin_parameters_are_consistent() {
        for bits in [512usize, 1024, 1536, 4096] {
            let mut cur = default_parameters(bits).unwrap();
            text::skip_prefix(&mut cur, "p=").unwrap();
            let p = text::read_uint(&mut cur).unwrap();
            text::skip_prefix(&mut cur, ",q=").unwrap();
            let q = text::read_uint(&mut cur).unwrap();
            text::skip_prefix(&mut cur, ",g=").unwrap();
            let g = text::read_uint(&mut cur).unwrap();

            assert!(codec::bit_length(&p) >= bits);
            assert!(q < p);
            assert!(g < p);
            // the subgroup invariant: g^q == 1 (mod p)
            assert!(g.modpow(&q, &p).is_one(), "{bits} bits");
        }
    }

    #[test]
    fn keygen_recovers_public_value() {
        let mut prng = test_prng();
        let key = keygen_512(&mut prng);

        // y must be g^x mod p for the stored secret
        let exported = key.export_private().unwrap();
        let reimported = import_private(&exported).unwrap();
        assert_eq!(key.export_public(), reimported.export_public());
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut prng = test_prng();
        let key = keygen_512(&mut prng);

        let msg = b"0123456789"; // 10 bytes
        let ctext = key.encrypt(&mut prng, msg).unwrap();
        assert!(ctext.starts_with("r=0x"));
        let back = key.decrypt(&ctext).unwrap();
        assert_eq!(&back[..], msg);
    }

    #[test]
    fn encryption_is_probabilistic() {
        let mut prng = test_prng();
        let key = keygen_512(&mut prng);
        let a = key.encrypt(&mut prng, b"same").unwrap();
        let b = key.encrypt(&mut prng, b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn sign_verify_roundtrip() {
        let mut prng = test_prng();
        let key = keygen_512(&mut prng);

        let sig = key.sign(&mut prng, b"attack at dawn").unwrap();
        assert!(sig.starts_with("r=0x"));
        key.verify(b"attack at dawn", &sig).unwrap();

        assert!(matches!(
            key.verify(b"attack at dusk", &sig),
            Err(Error::VerificationFailure)
        ));
    }

    #[test]
    fn verify_rejects_tampered_signature() {
        let mut prng = test_prng();
        let key = keygen_512(&mut prng);
        let sig = key.sign(&mut prng, b"message").unwrap();

        // flip one hex digit of the s component
        let mut tampered = sig.clone().into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(key.verify(b"message", &tampered).is_err());
    }

    #[test]
    fn export_import_export_is_stable() {
        let mut prng = test_prng();
        let key = keygen_512(&mut prng);

        let first = key.export_private().unwrap();
        let reimported = import_private(&first).unwrap();
        let second = reimported.export_private().unwrap();
        assert_eq!(first, second);

        let pub_first = key.export_public();
        let pub_second = import_public(&pub_first).unwrap().export_public();
        assert_eq!(pub_first, pub_second);
    }

    #[test]
    fn public_import_cannot_sign() {
        let mut prng = test_prng();
        let key = keygen_512(&mut prng);
        let public = import_public(&key.export_public()).unwrap();

        assert!(matches!(
            public.sign(&mut prng, b"m"),
            Err(Error::PrivateKeyRequired)
        ));
        // but it verifies what the private key signed
        let sig = key.sign(&mut prng, b"m").unwrap();
        public.verify(b"m", &sig).unwrap();
    }

    #[test]
    fn import_rejects_wrong_prefix() {
        assert!(matches!(
            import_public("Rabin-1:Pub,n=0x5"),
            Err(Error::MalformedInput)
        ));
        assert!(matches!(
            import_private("Elgamal-1:Pub,p=0x5"),
            Err(Error::MalformedInput)
        ));
    }

    #[test]
    fn safe_prime_parameters_verify() {
        let mut prng = test_prng();
        let params = generate_parameters(&mut prng, 64);

        let mut cur = params.as_str();
        text::skip_prefix(&mut cur, "p=").unwrap();
        let p = text::read_uint(&mut cur).unwrap();
        text::skip_prefix(&mut cur, ",q=").unwrap();
        let q = text::read_uint(&mut cur).unwrap();
        text::skip_prefix(&mut cur, ",g=").unwrap();
        let g = text::read_uint(&mut cur).unwrap();

        assert_eq!(codec::bit_length(&p), 64);
        assert_eq!(&q << 1, &p - 1u32, "p = 2q + 1");
        assert!(primes::safe_prime_check(&p).is_some());
        assert!(!g.modpow(&q, &p).is_one());
    }

    #[test]
    #[ignore] // minutes-scale prime derivation; run manually
    fn provable_parameters_verify() {
        let mut prng = test_prng();
        let params = generate_parameters_provable(&mut prng, 512).unwrap();

        let mut cur = params.as_str();
        text::skip_prefix(&mut cur, "p=").unwrap();
        let p = text::read_uint(&mut cur).unwrap();
        text::skip_prefix(&mut cur, ",q=").unwrap();
        let q = text::read_uint(&mut cur).unwrap();
        text::skip_prefix(&mut cur, ",g=").unwrap();
        let g = text::read_uint(&mut cur).unwrap();

        assert_eq!(codec::bit_length(&p), 512);
        assert_eq!(codec::bit_length(&q), 160);
        assert!((&p - 1u32) % (&q * &q) == BigUint::zero(), "p = 1 mod q^2");
        assert!(g.modpow(&q, &p).is_one());

        // keys generated from these parameters must round-trip
        let key = keygen(&mut prng, 512, Some(&params)).unwrap();
        let ct = key.encrypt(&mut prng, b"provable").unwrap();
        assert_eq!(&key.decrypt(&ct).unwrap()[..], b"provable");
    }

    #[test]
    fn provable_parameters_reject_bad_sizes() {
        let mut prng = test_prng();
        assert!(matches!(
            generate_parameters_provable(&mut prng, 256),
            Err(Error::InvalidKeySize { .. })
        ));
        assert!(matches!(
            generate_parameters_provable(&mut prng, 1020),
            Err(Error::KeyGenerationFailed(_))
        ));
    }
}
