//! Statistical quality metrics for bit sequences.
//!
//! These are sanity checks to compare sources side by side, not proofs
//! of randomness. Passing them is necessary but not sufficient for
//! good key material.

use crate::bits::BitSequence;
use serde::Serialize;
use statrs::function::erf::erfc;

/// Statistical summary of a single bit sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatReport {
    /// Number of bits analyzed.
    pub length: usize,
    /// Fraction of bits equal to 1.
    pub one_frequency: f64,
    /// Binary Shannon entropy of `one_frequency`, in bits.
    pub entropy: f64,
    /// Lag-1 Pearson autocorrelation; `None` for fewer than two bits.
    pub autocorrelation: Option<f64>,
    /// Chi-square uniformity p-value (one degree of freedom).
    pub uniformity_p_value: f64,
}

impl StatReport {
    /// Runs every metric over `bits`.
    ///
    /// An empty sequence reports zero frequency and entropy, no
    /// autocorrelation and a p-value of 1.
    pub fn analyze(bits: &BitSequence) -> Self {
        let data = bits.as_slice();
        let one_frequency = one_frequency(data);

        Self {
            length: data.len(),
            one_frequency,
            entropy: shannon_entropy(one_frequency),
            autocorrelation: lag1_autocorrelation(data),
            uniformity_p_value: uniformity_p_value(data),
        }
    }
}

/// Fraction of ones.
fn one_frequency(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let ones = data.iter().filter(|&&b| b == 1).count();
    ones as f64 / data.len() as f64
}

/// Binary entropy `-p log2 p - (1-p) log2 (1-p)`, zero at the endpoints.
fn shannon_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
}

/// Pearson correlation between `data[..n-1]` and `data[1..]`.
///
/// If either window is constant the correlation is undefined and
/// `Some(0.0)` is returned.
fn lag1_autocorrelation(data: &[u8]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }

    let x = &data[..data.len() - 1];
    let y = &data[1..];
    let n = x.len() as f64;

    let mean_x = x.iter().map(|&b| b as f64).sum::<f64>() / n;
    let mean_y = y.iter().map(|&b| b as f64).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a as f64 - mean_x;
        let dy = b as f64 - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Some(0.0);
    }

    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// Upper-tail p-value of the 0/1 chi-square goodness-of-fit test.
fn uniformity_p_value(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 1.0;
    }

    let expected = data.len() as f64 / 2.0;
    let ones = data.iter().filter(|&&b| b == 1).count() as f64;
    let zeros = data.len() as f64 - ones;

    let chi2 = ((zeros - expected).powi(2) + (ones - expected).powi(2)) / expected;

    // Chi-square with one degree of freedom: P(X > x) = erfc(sqrt(x / 2)).
    erfc((chi2 / 2.0).sqrt()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bits(values: &[u8]) -> BitSequence {
        BitSequence::from_bits(values.to_vec()).unwrap()
    }

    #[test]
    fn test_all_zeros() {
        let report = StatReport::analyze(&bits(&[0; 256]));
        assert_eq!(report.length, 256);
        assert_eq!(report.one_frequency, 0.0);
        assert_eq!(report.entropy, 0.0);
        assert_eq!(report.autocorrelation, Some(0.0));
        assert!(report.uniformity_p_value < 1e-10);
    }

    #[test]
    fn test_all_ones() {
        let report = StatReport::analyze(&bits(&[1; 256]));
        assert_eq!(report.one_frequency, 1.0);
        assert_eq!(report.entropy, 0.0);
        assert!(report.uniformity_p_value < 1e-10);
    }

    #[test]
    fn test_balanced_sequence() {
        let data: Vec<u8> = (0..1000).map(|i| ((i / 3) % 2) as u8).collect();
        let report = StatReport::analyze(&bits(&data));

        assert!((report.entropy - 1.0).abs() < 1e-3);
        assert!(report.uniformity_p_value > 0.9);
    }

    #[test]
    fn test_alternating_is_anticorrelated() {
        let data: Vec<u8> = (0..100).map(|i| (i % 2) as u8).collect();
        let report = StatReport::analyze(&bits(&data));

        let autocorr = report.autocorrelation.unwrap();
        assert!((autocorr + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_runs_are_positively_correlated() {
        let data: Vec<u8> = (0..400).map(|i| ((i / 20) % 2) as u8).collect();
        let report = StatReport::analyze(&bits(&data));
        assert!(report.autocorrelation.unwrap() > 0.8);
    }

    #[test]
    fn test_short_sequences() {
        let single = StatReport::analyze(&bits(&[1]));
        assert_eq!(single.autocorrelation, None);

        let empty = StatReport::analyze(&BitSequence::default());
        assert_eq!(empty.length, 0);
        assert_eq!(empty.entropy, 0.0);
        assert_eq!(empty.uniformity_p_value, 1.0);
    }

    #[test]
    fn test_known_p_value() {
        // 60 ones and 40 zeros: chi2 = 4, p = 0.0455.
        let mut data = vec![1u8; 60];
        data.extend(vec![0u8; 40]);
        let report = StatReport::analyze(&bits(&data));
        assert!((report.uniformity_p_value - 0.04550).abs() < 1e-4);
    }

    #[test]
    fn test_skew_lowers_p_value() {
        let mut slight = vec![1u8; 130];
        slight.extend(vec![0u8; 126]);
        let mut heavy = vec![1u8; 200];
        heavy.extend(vec![0u8; 56]);

        let slight = StatReport::analyze(&bits(&slight));
        let heavy = StatReport::analyze(&bits(&heavy));
        assert!(heavy.uniformity_p_value < slight.uniformity_p_value);
    }

    proptest! {
        #[test]
        fn prop_mixed_sequences_have_positive_entropy(
            mut data in proptest::collection::vec(0u8..=1, 2..512)
        ) {
            data[0] = 0;
            data[1] = 1;
            let report = StatReport::analyze(&bits(&data));
            prop_assert!(report.entropy > 0.0 && report.entropy <= 1.0);
            prop_assert!((0.0..=1.0).contains(&report.uniformity_p_value));
            let autocorr = report.autocorrelation.unwrap();
            prop_assert!((-1.0..=1.0).contains(&autocorr));
        }
    }
}
