//! Wallet Import Format (WIF) encoding - Base58Check over a versioned key.
//!
//! The construction is an external protocol and must be bit-exact for
//! interoperability with real wallet software: version byte (0x80 mainnet,
//! 0xEF testnet), the 32-byte key, an optional 0x01 compression flag, then
//! the first 4 bytes of the double-SHA256 checksum, all Base58-encoded.

use sha2::{Digest, Sha256};
use std::fmt;

/// Mainnet WIF version byte.
const VERSION_MAINNET: u8 = 0x80;
/// Testnet WIF version byte.
const VERSION_TESTNET: u8 = 0xEF;
/// Marker byte appended when the key maps to a compressed public key.
const COMPRESSION_FLAG: u8 = 0x01;

/// Errors decoding a WIF string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WifError {
    /// Not valid Base58.
    InvalidBase58,
    /// Decoded payload has an impossible length.
    BadLength(usize),
    /// Checksum over the payload does not match the trailing 4 bytes.
    BadChecksum,
    /// Version byte is neither mainnet nor testnet.
    UnknownVersion(u8),
}

impl fmt::Display for WifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WifError::InvalidBase58 => f.write_str("not valid Base58"),
            WifError::BadLength(n) => write!(f, "decoded WIF payload has length {}", n),
            WifError::BadChecksum => f.write_str("WIF checksum mismatch"),
            WifError::UnknownVersion(v) => write!(f, "unknown WIF version byte 0x{:02x}", v),
        }
    }
}

impl std::error::Error for WifError {}

/// A decoded WIF payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedWif {
    pub key: [u8; 32],
    pub compressed: bool,
    pub mainnet: bool,
}

fn double_sha256(payload: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(payload)).into()
}

/// Encode a raw private key as a WIF string.
pub fn encode_wif(key: &[u8; 32], compressed: bool, mainnet: bool) -> String {
    let mut payload = Vec::with_capacity(38);
    payload.push(if mainnet { VERSION_MAINNET } else { VERSION_TESTNET });
    payload.extend_from_slice(key);
    if compressed {
        payload.push(COMPRESSION_FLAG);
    }

    let checksum = double_sha256(&payload);
    payload.extend_from_slice(&checksum[..4]);

    bs58::encode(payload).into_string()
}

/// Decode and checksum-verify a WIF string back to the raw key.
pub fn decode_wif(wif: &str) -> Result<DecodedWif, WifError> {
    let payload = bs58::decode(wif)
        .into_vec()
        .map_err(|_| WifError::InvalidBase58)?;

    // version + key + checksum, plus one optional compression flag byte.
    let compressed = match payload.len() {
        37 => false,
        38 => true,
        n => return Err(WifError::BadLength(n)),
    };

    let (body, checksum) = payload.split_at(payload.len() - 4);
    if double_sha256(body)[..4] != *checksum {
        return Err(WifError::BadChecksum);
    }

    if compressed && body[33] != COMPRESSION_FLAG {
        return Err(WifError::BadLength(payload.len()));
    }

    let mainnet = match body[0] {
        VERSION_MAINNET => true,
        VERSION_TESTNET => false,
        v => return Err(WifError::UnknownVersion(v)),
    };

    let mut key = [0u8; 32];
    key.copy_from_slice(&body[1..33]);

    Ok(DecodedWif {
        key,
        compressed,
        mainnet,
    })
}
