//! bitxtract - Forensic analysis and key recovery toolkit for encrypted
//! wallet files.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use std::path::PathBuf;

use bitxtract::classify::{classify, print_report, JsonReport};
use bitxtract::recover::{
    search, search_parallel, EncryptedKeyMaterial, HashAlgorithm, KeyDerivationParams,
    RecoveredKey, ValidationLevel,
};
use bitxtract::wif::encode_wif;
use bitxtract::wordlist::PassphraseList;

fn parse_hash(s: &str) -> Result<HashAlgorithm, String> {
    HashAlgorithm::from_str(s).ok_or_else(|| format!("unknown hash: {} (use sha256 or sha512)", s))
}

#[derive(Parser)]
#[command(name = "bitxtract")]
#[command(about = "Forensic analysis and key recovery for encrypted wallet files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Statistically classify a file's format and encryption likelihood
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Brute-force a passphrase against an encrypted key blob
    Recover {
        /// Encrypted key material (hex)
        #[arg(long)]
        ciphertext: String,

        /// 16-byte initialization vector (hex)
        #[arg(long)]
        iv: String,

        /// PBKDF2 salt, 8-16 bytes (hex)
        #[arg(long)]
        salt: String,

        /// PBKDF2 iteration count
        #[arg(long)]
        iterations: u32,

        /// PBKDF2 hash algorithm (sha256, sha512)
        #[arg(long, value_parser = parse_hash, default_value = "sha512")]
        hash: HashAlgorithm,

        /// Passphrase candidates file (one per line)
        #[arg(long, conflicts_with = "stdin")]
        wordlist: Option<PathBuf>,

        /// Read passphrase candidates from stdin
        #[arg(long)]
        stdin: bool,

        /// Try candidates one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// Encode a raw private key (hex) as WIF
    Wif {
        /// 32-byte private key (hex)
        key: String,

        /// Encode for an uncompressed public key (prefix 5)
        #[arg(long)]
        uncompressed: bool,

        /// Use the testnet version byte
        #[arg(long)]
        testnet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { file, json } => run_analyze(&file, json),
        Command::Recover {
            ciphertext,
            iv,
            salt,
            iterations,
            hash,
            wordlist,
            stdin,
            sequential,
        } => run_recover(
            &ciphertext,
            &iv,
            &salt,
            iterations,
            hash,
            wordlist,
            stdin,
            sequential,
        ),
        Command::Wif {
            key,
            uncompressed,
            testnet,
        } => run_wif(&key, uncompressed, testnet),
    }
}

fn run_analyze(path: &PathBuf, json: bool) -> Result<()> {
    let data = std::fs::read(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let report = classify(&data);
    let path_str = path.display().to_string();

    if json {
        let json_report = JsonReport::from_report(&path_str, &report);
        println!("{}", serde_json::to_string_pretty(&json_report)?);
    } else {
        print!("{}", print_report(&path_str, &report));
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_recover(
    ciphertext_hex: &str,
    iv_hex: &str,
    salt_hex: &str,
    iterations: u32,
    hash: HashAlgorithm,
    wordlist: Option<PathBuf>,
    stdin: bool,
    sequential: bool,
) -> Result<()> {
    let ciphertext = hex::decode(ciphertext_hex).context("ciphertext is not valid hex")?;
    let iv_bytes = hex::decode(iv_hex).context("iv is not valid hex")?;
    let iv: [u8; 16] = iv_bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("iv must be exactly 16 bytes, got {}", iv_bytes.len()))?;
    let salt = hex::decode(salt_hex).context("salt is not valid hex")?;

    let material = EncryptedKeyMaterial::new(ciphertext, iv)?;
    let params = KeyDerivationParams::new(&salt, iterations, hash)?;

    let candidates = match (wordlist, stdin) {
        (Some(path), false) => PassphraseList::from_file(&path)?,
        (None, true) => PassphraseList::from_stdin(),
        _ => bail!("supply either --wordlist FILE or --stdin"),
    };
    if candidates.is_empty() {
        bail!("candidate list is empty");
    }

    eprintln!(
        "Trying {} candidates ({} PBKDF2-{} iterations each)...",
        candidates.len(),
        iterations,
        hash
    );

    let pb = ProgressBar::new(candidates.len() as u64);
    pb.set_style(bitxtract::default_progress_style());

    let result = if sequential {
        search(
            &material,
            &params,
            candidates.entries().iter().inspect(|_| pb.inc(1)),
        )
    } else {
        search_parallel(&material, &params, candidates.entries(), || pb.inc(1))
    };
    pb.finish_and_clear();

    match result {
        Some(recovered) => print_recovered(&recovered),
        None => {
            eprintln!("No candidate matched. The passphrase is not in this list.");
        }
    }

    Ok(())
}

fn print_recovered(recovered: &RecoveredKey) {
    println!("Recovered private key");
    println!("---");
    println!("Passphrase:  \"{}\"", recovered.passphrase);
    println!("Cipher mode: {}", recovered.cipher_mode);
    println!("Key (hex):   {}", hex::encode(recovered.raw));
    if let Some(wif) = &recovered.wif {
        println!("WIF:         {}", wif);
    }
    println!("Validation:  {}", recovered.validation.level.as_str());
    if recovered.validation.level == ValidationLevel::Degraded {
        eprintln!("Warning: built without secp256k1; key range was not fully checked.");
    }
}

fn run_wif(key_hex: &str, uncompressed: bool, testnet: bool) -> Result<()> {
    let bytes = hex::decode(key_hex.trim().trim_start_matches("0x"))
        .context("private key is not valid hex")?;
    let key: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("private key must be exactly 32 bytes, got {}", bytes.len()))?;

    println!("{}", encode_wif(&key, !uncompressed, !testnet));
    Ok(())
}
