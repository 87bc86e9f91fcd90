//! # Progress Reporting Context
//!
//! Stage tracking and elapsed-time formatting for pipeline runs. The timer
//! is an explicit value created by the caller and passed into the pipeline,
//! never process-global state, so two concurrent runs report independently.

use std::time::{Duration, Instant};

use tracing::info;

/// Pipeline stage for high-level progress tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    PatternStats,
    TreeInference,
    DistanceComputation,
    Assemble,
    Complete,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "Initializing",
            Stage::PatternStats => "Retrieving pattern statistics",
            Stage::TreeInference => "Inferring parsimony trees",
            Stage::DistanceComputation => "Computing topological distances",
            Stage::Assemble => "Assembling feature vector",
            Stage::Complete => "Complete",
        }
    }
}

/// Wall-clock context for one run; owns the start instant that progress
/// messages are stamped with.
#[derive(Debug, Clone, Copy)]
pub struct RunTimer {
    start: Instant,
}

impl RunTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time as `HH:MM:SS` for progress stamps.
    pub fn stamp(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    /// Log a stage transition stamped with this run's elapsed time.
    pub fn stage(&self, stage: Stage) {
        info!(elapsed = %self.stamp(), "{}", stage.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_format() {
        let timer = RunTimer::start();
        let stamp = timer.stamp();
        assert_eq!(stamp.len(), 8);
        assert!(stamp.starts_with("00:00:0"));
    }

    #[test]
    fn test_stage_names_are_distinct() {
        let stages = [
            Stage::Init,
            Stage::PatternStats,
            Stage::TreeInference,
            Stage::DistanceComputation,
            Stage::Assemble,
            Stage::Complete,
        ];
        for (i, a) in stages.iter().enumerate() {
            for b in &stages[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
