//! Bitxtract - Forensic analysis and key recovery toolkit for encrypted wallet files.
//!
//! Two components form the core: a statistical file classifier that judges
//! whether a candidate wallet file is encrypted (entropy, chi-square
//! uniformity, byte distribution, magic-byte sniffing), and a key recovery
//! engine that derives symmetric keys from passphrase candidates, attempts
//! decryption under multiple cipher modes, and validates recovered bytes as
//! secp256k1 private keys.

pub mod classify;
pub mod recover;
pub mod wif;
pub mod wordlist;

/// Default progress bar style for CLI operations.
pub fn default_progress_style() -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
        .unwrap()
        .progress_chars("#>-")
}
