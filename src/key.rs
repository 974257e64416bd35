// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keys and the scheme registry.
//!
//! A [`Key`] is a public or private key of some registered cryptosystem,
//! handled uniformly through the [`SchemeKey`] trait. The [`Registry`]
//! maps scheme names to their key generation and import entry points;
//! adding a cryptosystem means implementing [`SchemeKey`] for its key type
//! and registering a [`SchemeEntry`] — nothing else changes.
//!
//! Operations that need secret material ([`Key::decrypt`], [`Key::sign`],
//! [`Key::export_private`]) fail with [`Error::PrivateKeyRequired`] on a
//! public key. Encrypt, verify and public export work with either tag.

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::prng::Prng;
use crate::{elgamal, rabin};

/// Uniform operation set every scheme's key implements.
pub trait SchemeKey {
    fn scheme_name(&self) -> &'static str;
    fn is_private(&self) -> bool;

    fn encrypt(&self, prng: &mut Prng, msg: &[u8]) -> Result<String>;
    fn verify(&self, msg: &[u8], sig: &str) -> Result<()>;
    fn export_public(&self) -> String;

    fn decrypt(&self, ctext: &str) -> Result<Zeroizing<Vec<u8>>>;
    fn sign(&self, prng: &mut Prng, msg: &[u8]) -> Result<String>;
    fn export_private(&self) -> Result<String>;
}

/// A key of any registered scheme, public or private.
pub struct Key {
    inner: Box<dyn SchemeKey>,
}

impl Key {
    pub(crate) fn new(inner: Box<dyn SchemeKey>) -> Self {
        Self { inner }
    }

    pub fn scheme_name(&self) -> &'static str {
        self.inner.scheme_name()
    }

    pub fn is_private(&self) -> bool {
        self.inner.is_private()
    }

    /// Encrypt a message under the public half of this key.
    pub fn encrypt(&self, prng: &mut Prng, msg: &[u8]) -> Result<String> {
        self.inner.encrypt(prng, msg)
    }

    /// Check a signature over `msg`.
    pub fn verify(&self, msg: &[u8], sig: &str) -> Result<()> {
        self.inner.verify(msg, sig)
    }

    /// Decrypt a ciphertext. Requires a private key.
    pub fn decrypt(&self, ctext: &str) -> Result<Zeroizing<Vec<u8>>> {
        self.inner.decrypt(ctext)
    }

    /// Sign a message. Requires a private key.
    pub fn sign(&self, prng: &mut Prng, msg: &[u8]) -> Result<String> {
        self.inner.sign(prng, msg)
    }

    /// Serialize the key: the private form for a private key, the public
    /// form otherwise.
    pub fn export(&self) -> Result<String> {
        if self.is_private() {
            self.inner.export_private()
        } else {
            Ok(self.inner.export_public())
        }
    }

    /// Serialize the public half, available for either tag.
    pub fn export_public(&self) -> String {
        self.inner.export_public()
    }

    /// Serialize the secret form. Requires a private key.
    pub fn export_private(&self) -> Result<String> {
        self.inner.export_private()
    }
}

/// Entry points a cryptosystem registers under its name.
pub struct SchemeEntry {
    pub name: &'static str,
    pub keygen: fn(&mut Prng, usize, Option<&str>) -> Result<Key>,
    pub import_public: fn(&str) -> Result<Key>,
    pub import_private: fn(&str) -> Result<Key>,
}

/// Name-keyed lookup of registered cryptosystems.
pub struct Registry {
    entries: Vec<SchemeEntry>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A registry with the built-in schemes.
    pub fn with_default_schemes() -> Self {
        let mut registry = Self::new();
        registry.register(elgamal::entry());
        registry.register(rabin::entry());
        registry
    }

    pub fn register(&mut self, entry: SchemeEntry) {
        self.entries.push(entry);
    }

    fn lookup(&self, name: &str) -> Result<&SchemeEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| Error::UnknownScheme(name.into()))
    }

    /// Generate a private key for the named scheme.
    ///
    /// `extra` carries scheme-specific parameters (e.g. discrete-log
    /// domain parameters in their textual form); `None` uses the scheme's
    /// defaults.
    pub fn keygen(
        &self,
        name: &str,
        prng: &mut Prng,
        bits: usize,
        extra: Option<&str>,
    ) -> Result<Key> {
        let entry = self.lookup(name)?;
        (entry.keygen)(prng, bits, extra)
    }

    fn entry_for(&self, text: &str) -> Result<&SchemeEntry> {
        let name = text.split(':').next().unwrap_or("");
        self.lookup(name)
    }

    /// Parse a serialized key, trying the private form first.
    pub fn import(&self, text: &str) -> Result<Key> {
        let entry = self.entry_for(text)?;
        (entry.import_private)(text).or_else(|_| (entry.import_public)(text))
    }

    /// Parse a serialized public key.
    pub fn import_public(&self, text: &str) -> Result<Key> {
        let entry = self.entry_for(text)?;
        (entry.import_public)(text)
    }

    /// Parse a serialized private key.
    pub fn import_private(&self, text: &str) -> Result<Key> {
        let entry = self.entry_for(text)?;
        (entry.import_private)(text)
    }

    /// Copy a key by round-tripping it through its textual form.
    pub fn duplicate(&self, key: &Key) -> Result<Key> {
        self.import(&key.export()?)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_default_schemes()
    }
}

/// Whether two keys share a public identity. Two absent keys are
/// equivalent; an absent and a present key are not.
pub fn equivalent(a: Option<&Key>, b: Option<&Key>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.export_public() == b.export_public(),
        _ => false,
    }
}
