//! Multi-mode decryption trials.
//!
//! Each candidate mode is tried in the material's declared order. Modes that
//! cannot structurally apply are recorded as skipped, failed trials (bad
//! padding, failed tag verification, wrong plaintext length) are recorded
//! with their reason, and the first mode producing a well-formed 32-byte
//! plaintext wins. Nothing is swallowed silently.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, KeyInit, KeyIvInit, StreamCipher};
use aes::Aes256;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Nonce};

use super::material::{CipherMode, EncryptedKeyMaterial, KEY_LEN};

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Outcome of attempting one cipher mode with one derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeOutcome {
    /// Mode produced a well-formed 32-byte plaintext.
    Recovered(Vec<u8>),
    /// Mode cannot structurally apply to this ciphertext length.
    Skipped,
    /// Mode ran and failed; the reason stays observable.
    Failed(FailureReason),
}

/// Why a cipher-mode trial was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// CBC decryption succeeded but the PKCS#7 padding was invalid.
    BadPadding,
    /// GCM authentication tag did not verify.
    TagMismatch,
    /// Decryption succeeded but the plaintext is not 32 bytes.
    WrongPlaintextLength(usize),
    /// Derived key is not 32 bytes; the cipher cannot be keyed with it.
    BadKeyLength(usize),
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::BadPadding => "invalid PKCS#7 padding",
            FailureReason::TagMismatch => "authentication tag mismatch",
            FailureReason::WrongPlaintextLength(_) => "plaintext is not 32 bytes",
            FailureReason::BadKeyLength(_) => "key is not 32 bytes",
        }
    }
}

/// Attempt a single mode against the material with an already-derived key.
pub fn attempt_mode(material: &EncryptedKeyMaterial, key: &[u8], mode: CipherMode) -> ModeOutcome {
    if !material.mode_applies(mode) {
        return ModeOutcome::Skipped;
    }

    match mode {
        CipherMode::Cbc => attempt_cbc(material, key),
        CipherMode::Ctr => attempt_ctr(material, key),
        CipherMode::Gcm => attempt_gcm(material, key),
    }
}

/// Try every declared mode in order; first well-formed 32-byte plaintext
/// wins. Returns the plaintext and the mode that produced it, or `None` when
/// all modes were skipped or failed.
pub fn attempt_decrypt(
    material: &EncryptedKeyMaterial,
    key: &[u8],
) -> Option<(Vec<u8>, CipherMode)> {
    for &mode in material.modes() {
        if let ModeOutcome::Recovered(plaintext) = attempt_mode(material, key, mode) {
            return Some((plaintext, mode));
        }
    }
    None
}

fn attempt_cbc(material: &EncryptedKeyMaterial, key: &[u8]) -> ModeOutcome {
    let decryptor = match Aes256CbcDec::new_from_slices(key, material.iv()) {
        Ok(d) => d,
        Err(_) => return ModeOutcome::Failed(FailureReason::BadKeyLength(key.len())),
    };
    match decryptor.decrypt_padded_vec_mut::<Pkcs7>(material.ciphertext()) {
        Ok(plaintext) if plaintext.len() == KEY_LEN => ModeOutcome::Recovered(plaintext),
        Ok(plaintext) => ModeOutcome::Failed(FailureReason::WrongPlaintextLength(plaintext.len())),
        Err(_) => ModeOutcome::Failed(FailureReason::BadPadding),
    }
}

fn attempt_ctr(material: &EncryptedKeyMaterial, key: &[u8]) -> ModeOutcome {
    let mut cipher = match Aes256Ctr::new_from_slices(key, material.iv()) {
        Ok(c) => c,
        Err(_) => return ModeOutcome::Failed(FailureReason::BadKeyLength(key.len())),
    };
    let mut plaintext = material.ciphertext().to_vec();
    cipher.apply_keystream(&mut plaintext);

    if plaintext.len() == KEY_LEN {
        ModeOutcome::Recovered(plaintext)
    } else {
        ModeOutcome::Failed(FailureReason::WrongPlaintextLength(plaintext.len()))
    }
}

fn attempt_gcm(material: &EncryptedKeyMaterial, key: &[u8]) -> ModeOutcome {
    // The AEAD nonce is 96-bit; the material carries a 16-byte IV, of which
    // the first 12 bytes are used. The aes-gcm API consumes ciphertext||tag
    // as one buffer, which matches the carved layout.
    let cipher = match Aes256Gcm::new_from_slice(key) {
        Ok(c) => c,
        Err(_) => return ModeOutcome::Failed(FailureReason::BadKeyLength(key.len())),
    };
    let nonce = Nonce::from_slice(&material.iv()[..12]);

    match cipher.decrypt(nonce, material.ciphertext()) {
        Ok(plaintext) if plaintext.len() == KEY_LEN => ModeOutcome::Recovered(plaintext),
        Ok(plaintext) => ModeOutcome::Failed(FailureReason::WrongPlaintextLength(plaintext.len())),
        Err(_) => ModeOutcome::Failed(FailureReason::TagMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::BlockEncryptMut;

    type Aes256CbcEnc = cbc::Encryptor<Aes256>;

    const KEY: [u8; 32] = [0x11; 32];
    const IV: [u8; 16] = [0x22; 16];
    const PLAINTEXT: [u8; 32] = [0x5A; 32];

    fn cbc_material() -> EncryptedKeyMaterial {
        let ct = Aes256CbcEnc::new(&KEY.into(), &IV.into())
            .encrypt_padded_vec_mut::<Pkcs7>(&PLAINTEXT);
        assert_eq!(ct.len(), 48);
        EncryptedKeyMaterial::new(ct, IV).unwrap()
    }

    #[test]
    fn test_cbc_round_trip() {
        let material = cbc_material();
        let (plaintext, mode) = attempt_decrypt(&material, &KEY).unwrap();
        assert_eq!(plaintext, PLAINTEXT);
        assert_eq!(mode, CipherMode::Cbc);
    }

    #[test]
    fn test_cbc_wrong_key_rejected_not_garbage() {
        let material = cbc_material();
        let wrong = [0x12u8; 32];
        // A wrong key almost always breaks the padding; if padding happens to
        // survive, the plaintext length check still rejects it. Either way
        // the attempt must not report success.
        match attempt_mode(&material, &wrong, CipherMode::Cbc) {
            ModeOutcome::Recovered(pt) => assert_ne!(pt, PLAINTEXT),
            ModeOutcome::Failed(_) => {}
            ModeOutcome::Skipped => panic!("48-byte ciphertext must not skip CBC"),
        }
    }

    #[test]
    fn test_ctr_round_trip() {
        let mut ct = PLAINTEXT.to_vec();
        let mut cipher = Aes256Ctr::new(&KEY.into(), &IV.into());
        cipher.apply_keystream(&mut ct);

        let material =
            EncryptedKeyMaterial::with_modes(ct, IV, vec![CipherMode::Ctr]).unwrap();
        let (plaintext, mode) = attempt_decrypt(&material, &KEY).unwrap();
        assert_eq!(plaintext, PLAINTEXT);
        assert_eq!(mode, CipherMode::Ctr);
    }

    #[test]
    fn test_gcm_round_trip_and_tag_rejection() {
        let cipher = Aes256Gcm::new_from_slice(&KEY).unwrap();
        let nonce = Nonce::from_slice(&IV[..12]);
        let ct = cipher.encrypt(nonce, PLAINTEXT.as_slice()).unwrap();
        assert_eq!(ct.len(), 48); // 32 plaintext + 16 tag

        let material =
            EncryptedKeyMaterial::with_modes(ct.clone(), IV, vec![CipherMode::Gcm]).unwrap();
        let (plaintext, mode) = attempt_decrypt(&material, &KEY).unwrap();
        assert_eq!(plaintext, PLAINTEXT);
        assert_eq!(mode, CipherMode::Gcm);

        // Flip a tag byte: verification must fail, not yield garbage.
        let mut tampered = ct;
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        let material = EncryptedKeyMaterial::with_modes(tampered, IV, vec![CipherMode::Gcm]).unwrap();
        assert_eq!(
            attempt_mode(&material, &KEY, CipherMode::Gcm),
            ModeOutcome::Failed(FailureReason::TagMismatch)
        );
    }

    #[test]
    fn test_skip_is_explicit() {
        // 32 bytes: GCM cannot carve a tag, so it reports Skipped.
        let material = EncryptedKeyMaterial::new(vec![0u8; 32], IV).unwrap();
        assert_eq!(attempt_mode(&material, &KEY, CipherMode::Gcm), ModeOutcome::Skipped);
    }

    #[test]
    fn test_bad_key_length_is_reported() {
        let material = cbc_material();
        assert_eq!(
            attempt_mode(&material, &[0u8; 16], CipherMode::Cbc),
            ModeOutcome::Failed(FailureReason::BadKeyLength(16))
        );
    }
}
