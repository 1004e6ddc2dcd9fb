//! Byte-level statistics for encryption detection.
//!
//! All functions operate on already-read byte slices and perform no I/O.
//! Entropy and chi-square are each computed from a single-pass 256-entry
//! frequency table; the per-byte nested-loop approach is the documented
//! anti-pattern these replace.

/// Minimum input length for the chi-square statistic to be meaningful.
/// Below this, expected per-bucket counts are under 1 and the statistic
/// is noise, so [`chi_square_uniformity`] returns `None` instead.
pub const CHI_SQUARE_MIN_LEN: usize = 256;

/// Printable ASCII range (space through tilde).
const PRINTABLE: std::ops::RangeInclusive<u8> = 32..=126;

/// Byte-value histogram over the 256 possible values.
fn histogram(data: &[u8]) -> [u64; 256] {
    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }
    counts
}

/// Shannon entropy of the byte-value distribution, in bits per byte.
///
/// Ranges from 0.0 (constant input) to 8.0 (perfectly uniform). Returns 0.0
/// for empty input. Encrypted and compressed data sit close to 8.0.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let len = data.len() as f64;
    histogram(data)
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Pearson chi-square statistic of the byte histogram against the uniform
/// expectation (`len/256` per value).
///
/// Lower values mean a more uniform (random-looking) distribution; ideally
/// random data scores near 255 (the degrees of freedom). Returns `None` for
/// inputs shorter than [`CHI_SQUARE_MIN_LEN`], where the statistic would be
/// misleading.
pub fn chi_square_uniformity(data: &[u8]) -> Option<f64> {
    if data.len() < CHI_SQUARE_MIN_LEN {
        return None;
    }

    let expected = data.len() as f64 / 256.0;
    let chi = histogram(data)
        .iter()
        .map(|&observed| {
            let delta = observed as f64 - expected;
            delta * delta / expected
        })
        .sum();
    Some(chi)
}

/// Ratios of notable byte classes, plus the count of distinct values seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByteDistribution {
    /// Fraction of 0x00 bytes.
    pub zero_ratio: f64,
    /// Fraction of printable ASCII (32..=126).
    pub printable_ratio: f64,
    /// Fraction of high bytes (128..=255).
    pub high_ratio: f64,
    /// Distinct byte values observed (0..=256).
    pub unique_bytes: usize,
}

impl ByteDistribution {
    fn zeroed() -> Self {
        Self {
            zero_ratio: 0.0,
            printable_ratio: 0.0,
            high_ratio: 0.0,
            unique_bytes: 0,
        }
    }
}

/// Compute byte-class ratios and distinct-value count in one histogram pass.
pub fn analyze_distribution(data: &[u8]) -> ByteDistribution {
    if data.is_empty() {
        return ByteDistribution::zeroed();
    }

    let counts = histogram(data);
    let len = data.len() as f64;

    let printable: u64 = (*PRINTABLE.start() as usize..=*PRINTABLE.end() as usize)
        .map(|i| counts[i])
        .sum();
    let high: u64 = (128usize..=255).map(|i| counts[i]).sum();

    ByteDistribution {
        zero_ratio: counts[0] as f64 / len,
        printable_ratio: printable as f64 / len,
        high_ratio: high as f64 / len,
        unique_bytes: counts.iter().filter(|&&c| c > 0).count(),
    }
}

/// Check the file tail for a valid PKCS#7 padding trailer.
///
/// The final byte is read as a candidate pad length (1..=16); the padding is
/// only reported when all of the last N bytes equal N. Incidental repetition
/// outside that range (e.g. a 0x11 run) is rejected, guarding against false
/// positives.
pub fn detect_padding_evidence(data: &[u8]) -> Option<usize> {
    let &last = data.last()?;
    let pad_len = last as usize;
    if !(1..=16).contains(&pad_len) || data.len() < pad_len {
        return None;
    }

    let tail = &data[data.len() - pad_len..];
    if tail.iter().all(|&b| b == last) {
        Some(pad_len)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_empty_and_constant() {
        assert_eq!(shannon_entropy(&[]), 0.0);
        assert_eq!(shannon_entropy(&[0u8; 1]), 0.0);
        assert_eq!(shannon_entropy(&[0u8; 4096]), 0.0);
        assert_eq!(shannon_entropy(&[0xFFu8; 128]), 0.0);
    }

    #[test]
    fn test_entropy_bounds() {
        // One of each value is exactly 8 bits.
        let all: Vec<u8> = (0..=255u8).collect();
        let e = shannon_entropy(&all);
        assert!((e - 8.0).abs() < 1e-9);

        // Two equiprobable values is exactly 1 bit.
        let two: Vec<u8> = [0u8, 1u8].repeat(500);
        assert!((shannon_entropy(&two) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_entropy_random_buffer_exceeds_threshold() {
        use rand::RngCore;
        let mut buf = vec![0u8; 4096];
        rand::rngs::OsRng.fill_bytes(&mut buf);
        assert!(shannon_entropy(&buf) > 7.5);
    }

    #[test]
    fn test_chi_square_insufficient_data() {
        assert_eq!(chi_square_uniformity(&[0u8; 255]), None);
        assert!(chi_square_uniformity(&[0u8; 256]).is_some());
    }

    #[test]
    fn test_chi_square_uniform_vs_skewed() {
        // Perfectly flat histogram scores 0.
        let flat: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        assert_eq!(chi_square_uniformity(&flat), Some(0.0));

        // A constant buffer is maximally skewed.
        let skewed = chi_square_uniformity(&[7u8; 4096]).unwrap();
        assert!(skewed > 100_000.0);
    }

    #[test]
    fn test_distribution_text() {
        let d = analyze_distribution(b"abc abc abc ");
        assert_eq!(d.zero_ratio, 0.0);
        assert_eq!(d.printable_ratio, 1.0);
        assert_eq!(d.high_ratio, 0.0);
        assert_eq!(d.unique_bytes, 4);
    }

    #[test]
    fn test_distribution_empty() {
        let d = analyze_distribution(&[]);
        assert_eq!(d.unique_bytes, 0);
        assert_eq!(d.printable_ratio, 0.0);
    }

    #[test]
    fn test_padding_valid() {
        let mut data = vec![0xABu8; 40];
        for b in data.iter_mut().rev().take(8) {
            *b = 0x08;
        }
        assert_eq!(detect_padding_evidence(&data), Some(8));
    }

    #[test]
    fn test_padding_full_block() {
        let mut data = vec![0x55u8; 32];
        for b in data.iter_mut().rev().take(16) {
            *b = 0x10;
        }
        assert_eq!(detect_padding_evidence(&data), Some(16));
    }

    #[test]
    fn test_padding_out_of_range_not_reported() {
        // 0x11 (17) repeated - outside the valid 1..=16 range.
        let data = vec![0x11u8; 32];
        assert_eq!(detect_padding_evidence(&data), None);
    }

    #[test]
    fn test_padding_mismatched_tail() {
        let mut data = vec![0x04u8; 16];
        data[13] = 0x00; // breaks the run of four 0x04 bytes
        assert_eq!(detect_padding_evidence(&data), None);
    }

    #[test]
    fn test_padding_empty_and_short() {
        assert_eq!(detect_padding_evidence(&[]), None);
        assert_eq!(detect_padding_evidence(&[0x05]), None); // shorter than pad
    }
}
