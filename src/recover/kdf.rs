//! Passphrase-to-key derivation via PBKDF2-HMAC.

use pbkdf2::pbkdf2_hmac;
use sha2::{Sha256, Sha512};
use std::fmt;

/// Hash function driving the PBKDF2 HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Parse a CLI-style name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Some(HashAlgorithm::Sha256),
            "sha512" | "sha-512" => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => f.write_str("SHA-256"),
            HashAlgorithm::Sha512 => f.write_str("SHA-512"),
        }
    }
}

/// Errors constructing [`KeyDerivationParams`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// Salt must be 8..=16 raw bytes.
    BadSaltLength(usize),
    /// Iteration count must be positive.
    ZeroIterations,
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::BadSaltLength(n) => {
                write!(f, "salt must be 8-16 bytes, got {}", n)
            }
            ParamsError::ZeroIterations => f.write_str("iteration count must be positive"),
        }
    }
}

impl std::error::Error for ParamsError {}

/// Parameters turning a passphrase into a symmetric key.
///
/// Usually extracted from the wallet's master-key record (Bitcoin Core stores
/// salt and iteration count alongside the encrypted key), or supplied by the
/// caller for brute-force trials.
#[derive(Debug, Clone)]
pub struct KeyDerivationParams {
    salt: Vec<u8>,
    iterations: u32,
    hash: HashAlgorithm,
    key_length: usize,
}

impl KeyDerivationParams {
    /// AES-256 key size; the only cipher family the engine targets.
    pub const AES256_KEY_LEN: usize = 32;

    /// Build params for an AES-256 key, validating the salt and iteration
    /// count up front so the search loop never has to.
    pub fn new(salt: &[u8], iterations: u32, hash: HashAlgorithm) -> Result<Self, ParamsError> {
        if !(8..=16).contains(&salt.len()) {
            return Err(ParamsError::BadSaltLength(salt.len()));
        }
        if iterations == 0 {
            return Err(ParamsError::ZeroIterations);
        }

        Ok(Self {
            salt: salt.to_vec(),
            iterations,
            hash,
            key_length: Self::AES256_KEY_LEN,
        })
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }
}

/// Stretch a passphrase into a symmetric key with PBKDF2-HMAC.
///
/// Deterministic: identical passphrase and params always produce identical
/// output. This is the dominant cost of a brute-force search at realistic
/// iteration counts.
pub fn derive_key(passphrase: &str, params: &KeyDerivationParams) -> Vec<u8> {
    let mut key = vec![0u8; params.key_length];
    match params.hash {
        HashAlgorithm::Sha256 => pbkdf2_hmac::<Sha256>(
            passphrase.as_bytes(),
            &params.salt,
            params.iterations,
            &mut key,
        ),
        HashAlgorithm::Sha512 => pbkdf2_hmac::<Sha512>(
            passphrase.as_bytes(),
            &params.salt,
            params.iterations,
            &mut key,
        ),
    }
    key
}
