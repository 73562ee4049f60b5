use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::run::{RunId, WorkflowId, WorkflowRun};

#[derive(Debug, Clone, Copy)]
struct OpenFailure {
    run_id: RunId,
    completed_at: DateTime<Utc>,
}

/// Pairs each failing run with the next successful run of the same workflow.
///
/// Every workflow is either healthy or broken since the completion of its
/// first unresolved failure. Later failures never move that point.
#[derive(Debug, Default)]
pub struct RecoveryPairer {
    broken_since: HashMap<WorkflowId, OpenFailure>,
}

impl RecoveryPairer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one run in fetch order and returns the recovery time in whole
    /// seconds when this run resolves an open failure.
    pub fn observe(&mut self, run: &WorkflowRun) -> Option<i64> {
        if run.is_failure() {
            self.broken_since
                .entry(run.workflow_id)
                .or_insert_with(|| OpenFailure {
                    run_id: run.run_id,
                    completed_at: run.completed_at(),
                });
            return None;
        }

        if !run.is_success() {
            return None;
        }

        let failure = self.broken_since.remove(&run.workflow_id)?;
        Some((run.completed_at() - failure.completed_at).num_seconds())
    }

    /// Failing runs still waiting for a success, in no particular order.
    pub fn unresolved_runs(&self) -> Vec<RunId> {
        self.broken_since.values().map(|f| f.run_id).collect()
    }
}
