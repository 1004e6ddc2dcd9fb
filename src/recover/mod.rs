//! Key recovery engine - cascading passphrase search over encrypted key
//! material.
//!
//! For each candidate passphrase the engine derives a symmetric key
//! (PBKDF2), attempts decryption under the material's cipher modes, and
//! validates the plaintext as a secp256k1 private key. The search
//! short-circuits on the first validated recovery; exhausting the candidate
//! set is an expected miss, not an error. Walking the loop:
//! READY -> TRYING(candidate) -> SUCCESS | TRYING(next) | EXHAUSTED.

mod decrypt;
mod kdf;
mod material;
mod validate;

pub use decrypt::{attempt_decrypt, attempt_mode, FailureReason, ModeOutcome};
pub use kdf::{derive_key, HashAlgorithm, KeyDerivationParams, ParamsError};
pub use material::{
    CipherMode, EncryptedKeyMaterial, MaterialError, BLOCK_SIZE, GCM_TAG_LEN, KEY_LEN,
};
pub use validate::{validate_secp256k1, Validation, ValidationLevel};

use rayon::prelude::*;

use crate::wif;

/// A validated recovery: the plaintext key, how it was obtained, and how
/// thoroughly it was checked.
///
/// The passphrase is retained in memory for the caller, who owns retention
/// policy; the engine itself never logs or persists it.
#[derive(Debug, Clone)]
pub struct RecoveredKey {
    /// 32-byte plaintext private key.
    pub raw: [u8; 32],
    /// Validation verdict and its confidence level.
    pub validation: Validation,
    /// WIF encoding (mainnet, compressed); only present for valid keys.
    pub wif: Option<String>,
    /// Cipher mode that produced the plaintext.
    pub cipher_mode: CipherMode,
    /// Passphrase that derived the winning key.
    pub passphrase: String,
}

/// Derive, decrypt and validate a single passphrase candidate.
///
/// Returns `None` when the candidate did not work - a non-event during a
/// search, never escalated.
fn try_candidate(
    material: &EncryptedKeyMaterial,
    params: &KeyDerivationParams,
    passphrase: &str,
) -> Option<RecoveredKey> {
    let key = derive_key(passphrase, params);
    let (plaintext, cipher_mode) = attempt_decrypt(material, &key)?;

    let validation = validate_secp256k1(&plaintext);
    if !validation.valid {
        return None;
    }

    let mut raw = [0u8; 32];
    raw.copy_from_slice(&plaintext);

    Some(RecoveredKey {
        raw,
        validation,
        wif: Some(wif::encode_wif(&raw, true, true)),
        cipher_mode,
        passphrase: passphrase.to_string(),
    })
}

/// Brute-force loop over passphrase candidates in caller-supplied order.
///
/// Stops at the first validated recovery. `None` means the candidate set was
/// exhausted without success - an expected outcome, not an error. Structural
/// problems (modes that can never fit the ciphertext) are rejected earlier,
/// at [`EncryptedKeyMaterial`] construction.
pub fn search<I>(
    material: &EncryptedKeyMaterial,
    params: &KeyDerivationParams,
    candidates: I,
) -> Option<RecoveredKey>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for candidate in candidates {
        if let Some(recovered) = try_candidate(material, params, candidate.as_ref()) {
            return Some(recovered);
        }
    }
    None
}

/// Parallel variant of [`search`] over an in-memory candidate list.
///
/// PBKDF2 dominates the cost, so candidates parallelize cleanly;
/// `find_map_first` preserves the first-in-order success guarantee. The
/// optional callback runs once per attempted candidate (progress reporting).
pub fn search_parallel<F>(
    material: &EncryptedKeyMaterial,
    params: &KeyDerivationParams,
    candidates: &[String],
    on_attempt: F,
) -> Option<RecoveredKey>
where
    F: Fn() + Sync,
{
    candidates.par_iter().find_map_first(|candidate| {
        let result = try_candidate(material, params, candidate);
        on_attempt();
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::block_padding::Pkcs7;
    use aes::cipher::{BlockEncryptMut, KeyIvInit};
    use aes::Aes256;

    type Aes256CbcEnc = cbc::Encryptor<Aes256>;

    const IV: [u8; 16] = [0x33; 16];
    // "correct horse battery staple" SHA256 - a known-valid secp256k1 key.
    const PRIVATE_KEY: [u8; 32] = [
        0xc4, 0xbb, 0xcb, 0x1f, 0xbe, 0xc9, 0x9d, 0x65, 0xbf, 0x59, 0xd8, 0x5c, 0x8c, 0xb6,
        0x2e, 0xe2, 0xdb, 0x96, 0x3f, 0x0f, 0xe1, 0x06, 0xf4, 0x83, 0xd9, 0xaf, 0xa7, 0x3b,
        0xd4, 0xe3, 0x9a, 0x8a,
    ];

    fn params() -> KeyDerivationParams {
        KeyDerivationParams::new(b"pepper12", 1000, HashAlgorithm::Sha256).unwrap()
    }

    /// Encrypt the known private key under AES-256-CBC with the key derived
    /// from `passphrase`, exactly as a wallet's master-key record would be.
    fn material_for(passphrase: &str) -> EncryptedKeyMaterial {
        let key = derive_key(passphrase, &params());
        let ct = Aes256CbcEnc::new_from_slices(&key, &IV)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(&PRIVATE_KEY);
        EncryptedKeyMaterial::new(ct, IV).unwrap()
    }

    fn candidates_with(correct: Option<&str>) -> Vec<String> {
        let mut list: Vec<String> = (0..50).map(|i| format!("wrong-password-{}", i)).collect();
        if let Some(c) = correct {
            list[37] = c.to_string();
        }
        list
    }

    #[test]
    fn test_search_finds_correct_passphrase_among_50() {
        let material = material_for("hunter2");
        let recovered = search(&material, &params(), candidates_with(Some("hunter2"))).unwrap();

        assert_eq!(recovered.raw, PRIVATE_KEY);
        assert_eq!(recovered.passphrase, "hunter2");
        assert_eq!(recovered.cipher_mode, CipherMode::Cbc);
        assert!(recovered.validation.valid);

        let wif = recovered.wif.as_deref().unwrap();
        let first = wif.chars().next().unwrap();
        assert!(matches!(first, '5' | 'K' | 'L'));
    }

    #[test]
    fn test_search_miss_returns_none() {
        let material = material_for("the-real-passphrase");
        assert!(search(&material, &params(), candidates_with(None)).is_none());
    }

    #[test]
    fn test_search_parallel_matches_sequential() {
        let material = material_for("hunter2");
        let list = candidates_with(Some("hunter2"));

        let sequential = search(&material, &params(), &list).unwrap();
        let parallel = search_parallel(&material, &params(), &list, || {}).unwrap();

        assert_eq!(sequential.raw, parallel.raw);
        assert_eq!(sequential.passphrase, parallel.passphrase);
    }

    #[test]
    fn test_search_short_circuits_on_first_success() {
        let material = material_for("hunter2");
        let list = candidates_with(Some("hunter2")); // correct entry at index 37

        let consumed = std::cell::Cell::new(0usize);
        let recovered = search(
            &material,
            &params(),
            list.iter().inspect(|_| consumed.set(consumed.get() + 1)),
        )
        .unwrap();

        assert_eq!(recovered.passphrase, "hunter2");
        assert_eq!(consumed.get(), 38); // stopped at the winning candidate
    }
}
