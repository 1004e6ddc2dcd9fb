//! Report rendering - compatibility JSON shape and itemized console output.
//!
//! The JSON layout is a frozen external contract consumed by downstream
//! tooling; field names and nesting must not drift.

use serde::Serialize;

use super::AnalysisReport;

/// Flat JSON report, shaped exactly as report consumers expect.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub file_path: String,
    pub file_size: usize,
    pub file_format: String,
    pub entropy: EntropySection,
    pub byte_distribution: DistributionSection,
    pub randomness_test: RandomnessSection,
    pub encryption_analysis: EncryptionSection,
    pub likely_encrypted: String,
}

#[derive(Debug, Serialize)]
pub struct EntropySection {
    pub value: f64,
    pub max_possible: f64,
    pub interpretation: String,
}

#[derive(Debug, Serialize)]
pub struct DistributionSection {
    pub zero_bytes: String,
    pub printable_ascii: String,
    pub high_bytes: String,
    pub unique_byte_values: usize,
}

#[derive(Debug, Serialize)]
pub struct RandomnessSection {
    pub chi_square_value: Option<f64>,
    pub interpretation: String,
}

#[derive(Debug, Serialize)]
pub struct EncryptionSection {
    pub has_encryption_metadata: bool,
    pub possible_cipher: Option<String>,
    pub evidence: Vec<String>,
}

impl JsonReport {
    /// Build the serialized report from an analysis result. The path is
    /// caller-owned context; the classifier itself only ever saw bytes.
    pub fn from_report(path: &str, report: &AnalysisReport) -> Self {
        Self {
            file_path: path.to_string(),
            file_size: report.size_bytes,
            file_format: report.format_guess.as_str().to_string(),
            entropy: EntropySection {
                value: report.entropy_bits,
                max_possible: 8.0,
                interpretation: interpret_entropy(report.entropy_bits).to_string(),
            },
            byte_distribution: DistributionSection {
                zero_bytes: percent(report.byte_distribution.zero_ratio),
                printable_ascii: percent(report.byte_distribution.printable_ratio),
                high_bytes: percent(report.byte_distribution.high_ratio),
                unique_byte_values: report.byte_distribution.unique_bytes,
            },
            randomness_test: RandomnessSection {
                chi_square_value: report.chi_square_value,
                interpretation: interpret_chi_square(report.chi_square_value).to_string(),
            },
            encryption_analysis: EncryptionSection {
                has_encryption_metadata: report.has_encryption_metadata,
                possible_cipher: report.possible_cipher().map(str::to_string),
                evidence: report.evidence.clone(),
            },
            likely_encrypted: report.encryption_verdict.as_str().to_string(),
        }
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

fn interpret_entropy(bits: f64) -> &'static str {
    if bits >= 7.5 {
        "very high - consistent with encryption or compression"
    } else if bits >= 6.5 {
        "high - possibly compressed or partially encrypted"
    } else if bits >= 4.0 {
        "moderate - mixed binary/text content"
    } else {
        "low - structured or repetitive data"
    }
}

fn interpret_chi_square(chi: Option<f64>) -> &'static str {
    match chi {
        None => "insufficient data (fewer than 256 bytes)",
        Some(c) if c < 300.0 => "uniform - indistinguishable from random",
        Some(c) if c < 500.0 => "near-uniform - random-looking with slight bias",
        Some(_) => "non-uniform - structured data",
    }
}

/// Render the itemized human-readable report, one finding per line.
pub fn print_report(path: &str, report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("File:    {}\n", path));
    out.push_str(&format!("Size:    {} bytes\n", report.size_bytes));
    out.push_str(&format!("Format:  {}\n", report.format_guess));
    out.push_str("---\n");
    out.push_str(&format!(
        "Entropy:      {:.4} / 8.0 ({})\n",
        report.entropy_bits,
        interpret_entropy(report.entropy_bits)
    ));
    match report.chi_square_value {
        Some(chi) => out.push_str(&format!(
            "Chi-square:   {:.1} ({})\n",
            chi,
            interpret_chi_square(report.chi_square_value)
        )),
        None => out.push_str(&format!(
            "Chi-square:   {}\n",
            interpret_chi_square(None)
        )),
    }
    out.push_str(&format!(
        "Bytes:        zero {} | printable {} | high {} | {} unique values\n",
        percent(report.byte_distribution.zero_ratio),
        percent(report.byte_distribution.printable_ratio),
        percent(report.byte_distribution.high_ratio),
        report.byte_distribution.unique_bytes
    ));
    if let Some(pad) = report.padding_evidence {
        out.push_str(&format!("Padding:      PKCS#7 trailer, {} bytes\n", pad));
    }
    out.push_str("---\n");

    if report.evidence.is_empty() {
        out.push_str("Evidence:     none\n");
    } else {
        out.push_str("Evidence:\n");
        for item in &report.evidence {
            out.push_str(&format!("  - {}\n", item));
        }
    }

    out.push_str(&format!("Verdict:      {}\n", report.encryption_verdict));
    if let Some(cipher) = report.possible_cipher() {
        out.push_str(&format!("Cipher:       probably {}\n", cipher));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    #[test]
    fn test_json_shape_is_stable() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
        let report = classify(&data);
        let json = JsonReport::from_report("/tmp/wallet.dat", &report);

        let value: serde_json::Value = serde_json::to_value(&json).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "file_path",
            "file_size",
            "file_format",
            "entropy",
            "byte_distribution",
            "randomness_test",
            "encryption_analysis",
            "likely_encrypted",
        ] {
            assert!(obj.contains_key(key), "missing key: {}", key);
        }

        assert_eq!(value["file_size"], 1024);
        assert_eq!(value["entropy"]["max_possible"], 8.0);
        assert!(value["byte_distribution"]["printable_ascii"]
            .as_str()
            .unwrap()
            .ends_with('%'));
        assert!(value["encryption_analysis"]["evidence"].is_array());
    }

    #[test]
    fn test_json_chi_square_null_when_short() {
        let report = classify(b"short");
        let json = JsonReport::from_report("x", &report);
        let value = serde_json::to_value(&json).unwrap();
        assert!(value["randomness_test"]["chi_square_value"].is_null());
        assert!(value["randomness_test"]["interpretation"]
            .as_str()
            .unwrap()
            .contains("insufficient"));
    }

    #[test]
    fn test_text_report_itemized() {
        let buf: Vec<u8> = b"abc ".repeat(1000);
        let text = print_report("wallet.dat", &classify(&buf));
        assert!(text.contains("File:    wallet.dat"));
        assert!(text.contains("Verdict:      UNLIKELY"));
        assert!(text.contains("Entropy:"));
    }
}
