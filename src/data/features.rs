//! # Feature Vector Schema
//!
//! The fixed, versioned record the downstream difficulty predictor was
//! trained against. Field order here is the schema order; the serialized
//! keys (including the slash-separated ratio names) must match the
//! predictor's training columns exactly, so they are pinned with serde
//! renames and mirrored in [`FeatureVector::as_map`].

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;

/// Difficulty features for one alignment. Built once per pipeline run,
/// immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureVector {
    pub num_taxa: f64,
    pub num_sites: f64,
    pub num_patterns: f64,
    #[serde(rename = "num_patterns/num_taxa")]
    pub patterns_per_taxon: f64,
    #[serde(rename = "num_sites/num_taxa")]
    pub sites_per_taxon: f64,
    #[serde(rename = "num_patterns/num_sites")]
    pub patterns_per_site: f64,
    pub proportion_gaps: f64,
    pub proportion_invariant: f64,
    pub entropy: f64,
    pub bollback: f64,
    pub pattern_entropy: f64,
    pub avg_rfdist_parsimony: f64,
    pub proportion_unique_topos_parsimony: f64,
}

impl FeatureVector {
    /// Schema keys in schema order.
    pub const KEYS: [&'static str; 13] = [
        "num_taxa",
        "num_sites",
        "num_patterns",
        "num_patterns/num_taxa",
        "num_sites/num_taxa",
        "num_patterns/num_sites",
        "proportion_gaps",
        "proportion_invariant",
        "entropy",
        "bollback",
        "pattern_entropy",
        "avg_rfdist_parsimony",
        "proportion_unique_topos_parsimony",
    ];

    /// Ordered key → value view for the predictor boundary.
    pub fn as_map(&self) -> IndexMap<&'static str, f64> {
        IndexMap::from([
            ("num_taxa", self.num_taxa),
            ("num_sites", self.num_sites),
            ("num_patterns", self.num_patterns),
            ("num_patterns/num_taxa", self.patterns_per_taxon),
            ("num_sites/num_taxa", self.sites_per_taxon),
            ("num_patterns/num_sites", self.patterns_per_site),
            ("proportion_gaps", self.proportion_gaps),
            ("proportion_invariant", self.proportion_invariant),
            ("entropy", self.entropy),
            ("bollback", self.bollback),
            ("pattern_entropy", self.pattern_entropy),
            ("avg_rfdist_parsimony", self.avg_rfdist_parsimony),
            (
                "proportion_unique_topos_parsimony",
                self.proportion_unique_topos_parsimony,
            ),
        ])
    }

    /// True when every value is finite (no NaN or infinity leaked in).
    pub fn is_finite(&self) -> bool {
        self.as_map().values().all(|v| v.is_finite())
    }
}

/// Boundary to the separately-trained difficulty model. Loading the model
/// and running inference live outside this crate.
pub trait DifficultyPredictor {
    /// Map a feature vector to a single difficulty score in [0, 1].
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureVector {
        FeatureVector {
            num_taxa: 10.0,
            num_sites: 500.0,
            num_patterns: 120.0,
            patterns_per_taxon: 12.0,
            sites_per_taxon: 50.0,
            patterns_per_site: 0.24,
            proportion_gaps: 0.1,
            proportion_invariant: 0.05,
            entropy: 1.3,
            bollback: -85.0,
            pattern_entropy: 520.0,
            avg_rfdist_parsimony: 0.31,
            proportion_unique_topos_parsimony: 0.42,
        }
    }

    #[test]
    fn test_map_keys_match_schema_order() {
        let map = sample().as_map();
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, FeatureVector::KEYS);
    }

    #[test]
    fn test_serialized_keys_match_schema() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        for key in FeatureVector::KEYS {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), FeatureVector::KEYS.len());
    }

    #[test]
    fn test_finiteness_check() {
        let mut v = sample();
        assert!(v.is_finite());
        v.bollback = f64::NAN;
        assert!(!v.is_finite());
    }
}
