//! Encrypted key material and cipher-mode applicability.

use std::fmt;

/// AES block size; CBC ciphertexts must be a multiple of this.
pub const BLOCK_SIZE: usize = 16;

/// GCM authentication tag length, carved off the ciphertext tail.
pub const GCM_TAG_LEN: usize = 16;

/// Length of a raw secp256k1 private key.
pub const KEY_LEN: usize = 32;

/// Cipher modes the engine knows how to attempt, in trial order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Cbc,
    Ctr,
    Gcm,
}

impl CipherMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherMode::Cbc => "AES-256-CBC",
            CipherMode::Ctr => "AES-256-CTR",
            CipherMode::Gcm => "AES-256-GCM",
        }
    }

    /// Default trial order.
    pub fn all() -> [CipherMode; 3] {
        [CipherMode::Cbc, CipherMode::Ctr, CipherMode::Gcm]
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural contract violation: the material cannot be decrypted under any
/// of its declared modes regardless of the key. Unlike a failed passphrase
/// guess, this is a caller/data error and is surfaced as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialError {
    /// Empty ciphertext.
    EmptyCiphertext,
    /// No declared mode fits the ciphertext length.
    NoApplicableMode { len: usize },
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialError::EmptyCiphertext => f.write_str("ciphertext is empty"),
            MaterialError::NoApplicableMode { len } => write!(
                f,
                "no declared cipher mode fits a {}-byte ciphertext",
                len
            ),
        }
    }
}

impl std::error::Error for MaterialError {}

/// Ciphertext blob believed to contain an encrypted private key, plus the IV
/// it was encrypted under and the modes worth attempting.
#[derive(Debug, Clone)]
pub struct EncryptedKeyMaterial {
    ciphertext: Vec<u8>,
    iv: [u8; BLOCK_SIZE],
    modes: Vec<CipherMode>,
}

impl EncryptedKeyMaterial {
    /// Material with the default CBC -> CTR -> GCM trial order.
    pub fn new(ciphertext: Vec<u8>, iv: [u8; BLOCK_SIZE]) -> Result<Self, MaterialError> {
        Self::with_modes(ciphertext, iv, CipherMode::all().to_vec())
    }

    /// Material restricted to an explicit ordered mode set.
    pub fn with_modes(
        ciphertext: Vec<u8>,
        iv: [u8; BLOCK_SIZE],
        modes: Vec<CipherMode>,
    ) -> Result<Self, MaterialError> {
        if ciphertext.is_empty() {
            return Err(MaterialError::EmptyCiphertext);
        }

        let material = Self { ciphertext, iv, modes };
        if !material.modes.iter().any(|&m| material.mode_applies(m)) {
            return Err(MaterialError::NoApplicableMode {
                len: material.ciphertext.len(),
            });
        }
        Ok(material)
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn iv(&self) -> &[u8; BLOCK_SIZE] {
        &self.iv
    }

    /// Declared trial order, applicable or not; inapplicable modes are
    /// skipped explicitly at attempt time so the skip stays observable.
    pub fn modes(&self) -> &[CipherMode] {
        &self.modes
    }

    /// Whether a mode can structurally apply to this ciphertext length.
    ///
    /// CBC needs a non-empty multiple of the block size. CTR is a stream
    /// mode, so the plaintext length equals the ciphertext length and must be
    /// exactly 32. GCM needs room for a 16-byte tag in front of a 32-byte
    /// plaintext.
    pub fn mode_applies(&self, mode: CipherMode) -> bool {
        let len = self.ciphertext.len();
        match mode {
            CipherMode::Cbc => len % BLOCK_SIZE == 0,
            CipherMode::Ctr => len == KEY_LEN,
            CipherMode::Gcm => len == KEY_LEN + GCM_TAG_LEN,
        }
    }
}
