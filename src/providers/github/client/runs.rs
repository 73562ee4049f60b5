use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::core::GitHubClient;
use crate::error::Result;
use crate::reliability::{RunId, WorkflowId};

#[derive(Debug, Deserialize)]
pub struct WorkflowRunsPageDto {
    #[serde(default)]
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRunDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRunDto {
    pub id: RunId,
    pub workflow_id: WorkflowId,
    pub conclusion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub run_started_at: Option<DateTime<Utc>>,
}

impl WorkflowRunDto {
    pub fn started_at(&self) -> DateTime<Utc> {
        self.run_started_at.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Deserialize)]
struct RunTimingDto {
    run_duration_ms: Option<u64>,
}

impl GitHubClient {
    /// Fetch a page of workflow runs created on or after `since`
    pub async fn fetch_workflow_runs_page(
        &self,
        repository: &str,
        since: NaiveDate,
        page: u32,
        per_page: u32,
    ) -> Result<WorkflowRunsPageDto> {
        let url = self.endpoint(&format!("repos/{repository}/actions/runs"))?;

        self.get(
                url,
                &[
                    ("created", format!(">={}", since.format("%Y-%m-%d"))),
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                ],
            )
            .await
    }

    /// Fetch the measured duration of a single run in milliseconds
    pub async fn fetch_run_timing(&self, repository: &str, run_id: RunId) -> Result<Option<u64>> {
        let url = self.endpoint(&format!("repos/{repository}/actions/runs/{run_id}/timing"))?;

        let timing: Option<RunTimingDto> = self.get_optional(url, &[]).await?;

        Ok(timing.and_then(|t| t.run_duration_ms))
    }
}
