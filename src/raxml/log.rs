//! # Log Parsing
//!
//! Line-oriented extraction of labeled metrics from RAxML-NG log files.
//! The parser is tolerant of everything it does not recognize and strict
//! about everything it does: after the scan, every required metric must
//! have been seen, or parsing fails naming the missing label and the file.
//! When a label repeats, the last occurrence wins.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{PythiaError, Result};

/// One metric to pull out of a log file.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    /// Name used for the extracted value and in error messages
    pub key: &'static str,
    /// Substring identifying the line that carries the value
    pub label: &'static str,
    /// Whether the value is printed as `NN.NN %` and must be scaled by 1/100
    pub percent: bool,
}

/// Metrics required from a parse-mode (`--parse`) log.
pub const PARSE_METRICS: [MetricSpec; 3] = [
    MetricSpec {
        key: "patterns",
        label: "Alignment sites / patterns:",
        percent: false,
    },
    MetricSpec {
        key: "gaps",
        label: "Gaps:",
        percent: true,
    },
    MetricSpec {
        key: "invariant",
        label: "Invariant sites:",
        percent: true,
    },
];

/// Metrics required from a distance-mode (`--rfdist`) log.
pub const RFDIST_METRICS: [MetricSpec; 3] = [
    MetricSpec {
        key: "num_topos",
        label: "Number of unique topologies in this tree set:",
        percent: false,
    },
    MetricSpec {
        key: "rel_rfdist",
        label: "Average relative RF distance in this tree set:",
        percent: false,
    },
    MetricSpec {
        key: "abs_rfdist",
        label: "Average absolute RF distance in this tree set:",
        percent: false,
    },
];

/// Scan `log_file` for every metric in `required`, failing closed on any
/// missing label or unparsable value. Returned map is keyed by
/// [`MetricSpec::key`] in the order of `required`.
pub fn parse_log(log_file: &Path, required: &[MetricSpec]) -> Result<IndexMap<&'static str, f64>> {
    let text = fs::read_to_string(log_file).map_err(|e| {
        PythiaError::parse(log_file, format!("cannot read log file: {e}"))
    })?;

    let mut found: IndexMap<&'static str, f64> = IndexMap::new();
    for line in text.lines() {
        let line = line.trim();
        for metric in required {
            if line.contains(metric.label) {
                let value = extract_value(line, metric)
                    .map_err(|msg| PythiaError::parse(log_file, msg))?;
                found.insert(metric.key, value);
            }
        }
    }

    for metric in required {
        if !found.contains_key(metric.key) {
            return Err(PythiaError::parse(
                log_file,
                format!("required label '{}' not found", metric.label),
            ));
        }
    }

    // Report in the caller's declared order regardless of log order.
    let mut ordered = IndexMap::with_capacity(required.len());
    for metric in required {
        ordered.insert(metric.key, found[metric.key]);
    }
    Ok(ordered)
}

/// Split a matched line into label portion and trailing numeric token.
/// Percent metrics are printed as `... 12.34 %`, so the `%` token is
/// skipped and the value scaled down.
fn extract_value(line: &str, metric: &MetricSpec) -> std::result::Result<f64, String> {
    let mut tokens = line.split_whitespace().rev();
    let mut token = tokens
        .next()
        .ok_or_else(|| format!("no value after label '{}'", metric.label))?;
    if metric.percent && token == "%" {
        token = tokens
            .next()
            .ok_or_else(|| format!("no value before '%' after label '{}'", metric.label))?;
    }
    let token = token.trim_end_matches('%');

    let value: f64 = token.parse().map_err(|_| {
        format!(
            "value '{}' after label '{}' is not numeric",
            token, metric.label
        )
    })?;
    Ok(if metric.percent { value / 100.0 } else { value })
}
