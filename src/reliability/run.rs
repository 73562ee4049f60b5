use chrono::{DateTime, Duration, Utc};

pub type WorkflowId = u64;
pub type RunId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    Success,
    Failure,
    Other,
}

impl Conclusion {
    /// Runs that have not concluded yet carry no value and land in `Other`.
    pub fn from_api(value: Option<&str>) -> Self {
        match value {
            Some("success") => Self::Success,
            Some("failure") => Self::Failure,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRun {
    pub workflow_id: WorkflowId,
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub conclusion: Conclusion,
}

impl WorkflowRun {
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        let duration = Duration::milliseconds(i64::try_from(self.duration_ms).unwrap_or(i64::MAX));
        self.started_at
            .checked_add_signed(duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_success(&self) -> bool {
        self.conclusion == Conclusion::Success
    }

    pub fn is_failure(&self) -> bool {
        self.conclusion == Conclusion::Failure
    }
}
