use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};

use super::core::GitHubProvider;
use crate::error::Result;
use crate::insights::CIInsights;
use crate::reliability::{collect_build_reliability, RepositorySource, RunFetcher, WorkflowRun};

#[async_trait]
impl RepositorySource for GitHubProvider {
    async fn list_repositories(&self) -> Result<Vec<String>> {
        self.fetch_repositories().await
    }
}

#[async_trait]
impl RunFetcher for GitHubProvider {
    async fn fetch_runs(&self, repository: &str, since: NaiveDate) -> Result<Vec<WorkflowRun>> {
        self.fetch_workflow_runs(repository, since).await
    }
}

impl GitHubProvider {
    pub async fn collect_insights(&self, since: DateTime<Utc>) -> Result<CIInsights> {
        info!("Starting build reliability collection for: {}", self.owner);

        let pass = collect_build_reliability(self, self, since).await?;
        let insights = CIInsights::from_pass("GitHub", &self.owner, &pass);

        if insights.total_runs == 0 {
            warn!("No workflow runs found for {} since {}", self.owner, pass.since);
        }

        Ok(insights)
    }
}
