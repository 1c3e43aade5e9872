//! Statistical evaluation of bit sequences.
//!
//! Computes the bit count, frequency of ones, Shannon entropy, lag-1
//! autocorrelation and a chi-square uniformity p-value. These are
//! comparisons between sources, not cryptographic proofs.

mod statistics;

pub use statistics::StatReport;
