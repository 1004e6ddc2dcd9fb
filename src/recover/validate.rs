//! Validation of recovered plaintext as a secp256k1 private key.
//!
//! A valid private key is a non-zero 256-bit integer strictly below the curve
//! order. With the `secp` feature (default) the check goes through the
//! `secp256k1` library; without it only length and non-zero are checked, and
//! that reduced confidence is carried in the result rather than hidden.

use super::material::KEY_LEN;

/// How thorough the validation was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    /// Full elliptic-curve range check (non-zero, below the curve order).
    Full,
    /// Length and non-zero only; the secp256k1 library was unavailable.
    Degraded,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Full => "full secp256k1 range check",
            ValidationLevel::Degraded => "degraded (length and non-zero only)",
        }
    }
}

/// Validation verdict plus the level of scrutiny that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub level: ValidationLevel,
}

/// Validate a candidate plaintext as a secp256k1 private key.
///
/// Cheap, purely arithmetic; this is what separates a plausible key from
/// random decryption noise. Wrong-length or all-zero input is invalid at
/// either level.
pub fn validate_secp256k1(candidate: &[u8]) -> Validation {
    if candidate.len() != KEY_LEN || candidate.iter().all(|&b| b == 0) {
        return Validation {
            valid: false,
            level: level(),
        };
    }

    #[cfg(feature = "secp")]
    {
        Validation {
            valid: secp256k1::SecretKey::from_slice(candidate).is_ok(),
            level: ValidationLevel::Full,
        }
    }

    #[cfg(not(feature = "secp"))]
    {
        Validation {
            valid: true,
            level: ValidationLevel::Degraded,
        }
    }
}

fn level() -> ValidationLevel {
    #[cfg(feature = "secp")]
    {
        ValidationLevel::Full
    }
    #[cfg(not(feature = "secp"))]
    {
        ValidationLevel::Degraded
    }
}
