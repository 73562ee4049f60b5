use serde::{Deserialize, Serialize};

use super::run::WorkflowRun;

/// The three reliability figures reported for a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub average_build_success_rate: f64,
    pub average_build_duration: f64,
    pub average_build_mttr: i64,
    #[serde(skip)]
    pub total: usize,
}

/// Running totals for a set of runs plus the recovery samples paired from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStats {
    pub total: usize,
    pub successful: usize,
    pub duration_sum_seconds: f64,
    pub recovery_samples: Vec<i64>,
}

impl BuildStats {
    pub fn with_run(mut self, run: &WorkflowRun, recovery: Option<i64>) -> Self {
        self.total += 1;
        if run.is_success() {
            self.successful += 1;
        }
        self.duration_sum_seconds += run.duration_seconds();
        self.recovery_samples.extend(recovery);
        self
    }

    pub fn merge(mut self, other: BuildStats) -> Self {
        self.total += other.total;
        self.successful += other.successful;
        self.duration_sum_seconds += other.duration_sum_seconds;
        self.recovery_samples.extend(other.recovery_samples);
        self
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn summary(&self) -> BuildSummary {
        let (average_build_success_rate, average_build_duration) = if self.total > 0 {
            (
                self.successful as f64 / self.total as f64,
                self.duration_sum_seconds / self.total as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let average_build_mttr = if self.recovery_samples.is_empty() {
            0
        } else {
            self.recovery_samples.iter().sum::<i64>() / self.recovery_samples.len() as i64
        };

        BuildSummary {
            average_build_success_rate,
            average_build_duration,
            average_build_mttr,
            total: self.total,
        }
    }
}
