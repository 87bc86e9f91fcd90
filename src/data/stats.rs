//! # Alignment-Intrinsic Statistics
//!
//! Column and site-pattern statistics computed directly from the alignment
//! matrix, independent of any external tool. Conventions:
//!
//! - Column entropy is Shannon entropy (log2) over the column's non-gap
//!   residue distribution; an all-gap column contributes zero.
//! - The Bollback multinomial statistic is `Σ N_p·ln N_p − n·ln n` over the
//!   distinct site patterns, where `N_p` is a pattern's multiplicity and
//!   `n` is the site count.
//! - Pattern entropy is the raw `Σ N_p·ln N_p` term.

use std::collections::HashMap;

/// Characters treated as gaps/missing in every alphabet.
pub const GAP_CHARS: &[u8] = b"-?.*";

pub fn is_gap(residue: u8) -> bool {
    GAP_CHARS.contains(&residue)
}

/// Shannon entropy (log2) of one column's non-gap residue distribution.
pub fn column_entropy(column: &[u8]) -> f64 {
    let mut counts: HashMap<u8, usize> = HashMap::new();
    let mut total = 0usize;
    for &residue in column {
        if !is_gap(residue) {
            *counts.entry(residue.to_ascii_uppercase()).or_insert(0) += 1;
            total += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    let mut entropy = 0.0;
    for &count in counts.values() {
        let prob = count as f64 / total as f64;
        entropy -= prob * prob.log2();
    }
    entropy
}

/// Mean column entropy over all sites of a row-major alignment matrix.
pub fn mean_entropy(rows: &[Vec<u8>]) -> f64 {
    let n_sites = rows.first().map_or(0, Vec::len);
    if n_sites == 0 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut column = Vec::with_capacity(rows.len());
    for site in 0..n_sites {
        column.clear();
        column.extend(rows.iter().map(|row| row[site]));
        sum += column_entropy(&column);
    }
    sum / n_sites as f64
}

/// Multiplicity of each distinct site pattern (column), in arbitrary order.
fn pattern_counts(rows: &[Vec<u8>]) -> Vec<usize> {
    let n_sites = rows.first().map_or(0, Vec::len);
    let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
    for site in 0..n_sites {
        let pattern: Vec<u8> = rows
            .iter()
            .map(|row| row[site].to_ascii_uppercase())
            .collect();
        *counts.entry(pattern).or_insert(0) += 1;
    }
    counts.into_values().collect()
}

/// Bollback multinomial test statistic over distinct site patterns.
pub fn bollback_multinomial(rows: &[Vec<u8>]) -> f64 {
    let n_sites = rows.first().map_or(0, Vec::len);
    if n_sites == 0 {
        return 0.0;
    }
    pattern_entropy(rows) - n_sites as f64 * (n_sites as f64).ln()
}

/// `Σ N_p·ln N_p` over distinct site patterns.
pub fn pattern_entropy(rows: &[Vec<u8>]) -> f64 {
    pattern_counts(rows)
        .into_iter()
        .map(|count| count as f64 * (count as f64).ln())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(seqs: &[&str]) -> Vec<Vec<u8>> {
        seqs.iter().map(|s| s.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_uniform_column_has_zero_entropy() {
        assert_eq!(column_entropy(b"AAAA"), 0.0);
    }

    #[test]
    fn test_two_state_column_entropy_is_one_bit() {
        assert!((column_entropy(b"AACC") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_gaps_are_excluded_from_entropy() {
        // distribution over the non-gap residues only
        assert!((column_entropy(b"AC--") - 1.0).abs() < 1e-12);
        assert_eq!(column_entropy(b"----"), 0.0);
    }

    #[test]
    fn test_case_is_folded() {
        assert_eq!(column_entropy(b"AaAa"), 0.0);
    }

    #[test]
    fn test_mean_entropy_averages_columns() {
        // col 0: AAAA (0 bits), col 1: ACAC (1 bit)
        let m = rows(&["AA", "AC", "AA", "AC"]);
        assert!((mean_entropy(&m) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bollback_all_identical_columns() {
        // one pattern with multiplicity 3: 3·ln3 − 3·ln3 = 0
        let m = rows(&["AAA", "CCC"]);
        assert!(bollback_multinomial(&m).abs() < 1e-12);
    }

    #[test]
    fn test_bollback_all_distinct_columns() {
        // three singleton patterns: 0 − 3·ln3
        let m = rows(&["ACG", "ACG"]);
        let expected = -3.0 * 3f64.ln();
        assert!((bollback_multinomial(&m) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_pattern_entropy_counts_multiplicities() {
        // patterns: [A,A] x2, [C,C] x1 → 2·ln2
        let m = rows(&["AAC", "AAC"]);
        assert!((pattern_entropy(&m) - 2.0 * 2f64.ln()).abs() < 1e-12);
    }
}
