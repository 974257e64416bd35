// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors that can occur during cryptographic operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown scheme `{0}`")]
    UnknownScheme(String),

    #[error("Malformed textual input")]
    MalformedInput,

    #[error("Message leaves no room for the required padding")]
    MessageTooLong,

    #[error("Padding integrity check failed")]
    IntegrityFailure,

    #[error("Signature verification failed")]
    VerificationFailure,

    #[error("Operation requires a private key")]
    PrivateKeyRequired,

    #[error("Modulus factor exposed; the key must be considered compromised")]
    ModulusFactored,

    #[error("Invalid key size: must be at least {min} bits, got {actual}")]
    InvalidKeySize { min: usize, actual: usize },

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
