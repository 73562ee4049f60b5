use std::collections::HashSet;

use chrono::NaiveDate;
use futures::{stream, StreamExt};
use log::{debug, info, warn};

use crate::auth::Token;
use crate::error::Result;
use crate::providers::github::client::{
    GitHubClient, RepositoryDto, WorkflowRunDto, WorkflowRunsPageDto,
};
use crate::reliability::{Conclusion, RunId, WorkflowRun};

const CONCURRENCY: usize = 10;
const PAGE_SIZE: u32 = 100;

pub struct GitHubProvider {
    pub client: GitHubClient,
    pub owner: String,
    pub allow_list: Vec<String>,
    pub page_size: u32,
}

impl GitHubProvider {
    pub fn new(
        base_url: &str,
        owner: String,
        allow_list: Vec<String>,
        token: Option<Token>,
    ) -> Result<Self> {
        let client = GitHubClient::new(base_url, token)?;

        Ok(Self {
            client,
            owner,
            allow_list,
            page_size: PAGE_SIZE,
        })
    }

    pub async fn fetch_repositories(&self) -> Result<Vec<String>> {
        let mut all_repositories = Vec::new();
        let mut page = 1;

        info!("Listing repositories for {}...", self.owner);

        loop {
            let repositories = self
                .client
                .fetch_repositories_page(&self.owner, page, self.page_size)
                .await?;

            let fetched_count = repositories.len();
            all_repositories.extend(repositories);

            if fetched_count < self.page_size as usize {
                break;
            }

            page += 1;
        }

        let selected = select_repositories(all_repositories, &self.allow_list);
        info!("Selected {} repositories", selected.len());

        Ok(selected)
    }

    /// Returns the runs oldest first with their durations resolved.
    pub async fn fetch_workflow_runs(
        &self,
        repository: &str,
        since: NaiveDate,
    ) -> Result<Vec<WorkflowRun>> {
        let mut listed: Vec<WorkflowRunDto> = Vec::new();
        let mut seen: HashSet<RunId> = HashSet::new();
        let mut reported_total = 0;
        let mut page = 1;

        loop {
            let WorkflowRunsPageDto {
                total_count,
                workflow_runs,
            } = self
                .client
                .fetch_workflow_runs_page(repository, since, page, self.page_size)
                .await?;

            // Runs created mid-listing shift later pages onto already seen runs
            let fetched_count = workflow_runs.len();
            reported_total = reported_total.max(total_count);
            listed.extend(workflow_runs.into_iter().filter(|run| seen.insert(run.id)));

            info!(
                "{repository} page {page}: fetched {fetched_count} runs (total: {})",
                listed.len()
            );

            if fetched_count < self.page_size as usize {
                break;
            }

            page += 1;
        }

        if reported_total > listed.len() as u64 {
            warn!(
                "{repository}: GitHub reported {reported_total} runs but listed only {}",
                listed.len()
            );
        }

        // GitHub lists newest first
        listed.reverse();

        // `buffered` keeps the listing order, which pairing depends on
        let runs = stream::iter(listed)
            .map(|dto| async move {
                let duration_ms = self.run_duration_ms(repository, dto.id).await;
                WorkflowRun {
                    workflow_id: dto.workflow_id,
                    run_id: dto.id,
                    started_at: dto.started_at(),
                    duration_ms,
                    conclusion: Conclusion::from_api(dto.conclusion.as_deref()),
                }
            })
            .buffered(CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        Ok(runs)
    }

    async fn run_duration_ms(&self, repository: &str, run_id: RunId) -> u64 {
        match self.client.fetch_run_timing(repository, run_id).await {
            Ok(Some(duration_ms)) => duration_ms,
            Ok(None) => {
                debug!("{repository}: no timing for run {run_id}");
                0
            }
            Err(e) => {
                warn!("{repository}: timing lookup for run {run_id} failed: {e}");
                0
            }
        }
    }
}

fn select_repositories(repositories: Vec<RepositoryDto>, allow_list: &[String]) -> Vec<String> {
    let allowed = |repo: &RepositoryDto| {
        allow_list.is_empty()
            || allow_list
                .iter()
                .any(|entry| *entry == repo.name || *entry == repo.full_name)
    };

    let selected: Vec<RepositoryDto> = repositories
        .into_iter()
        .filter(|repo| {
            if repo.archived {
                debug!("Skipping archived repository {}", repo.full_name);
            }
            !repo.archived
        })
        .filter(|repo| allowed(repo))
        .collect();

    for entry in allow_list {
        let found = selected
            .iter()
            .any(|repo| *entry == repo.name || *entry == repo.full_name);
        if !found {
            warn!("Allow-listed repository '{entry}' was not found or is archived");
        }
    }

    selected.into_iter().map(|repo| repo.full_name).collect()
}
