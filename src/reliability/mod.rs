//! Build reliability across repositories: success rate, average duration and
//! mean time to recovery after a failing run.

mod pairer;
mod run;
mod stats;

pub use pairer::RecoveryPairer;
pub use run::{Conclusion, RunId, WorkflowId, WorkflowRun};
pub use stats::{BuildStats, BuildSummary};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use log::{debug, info};

use crate::error::Result;

/// Supplies the repositories a pass scans.
#[async_trait]
pub trait RepositorySource {
    async fn list_repositories(&self) -> Result<Vec<String>>;
}

/// Supplies the workflow runs of one repository created on or after `since`.
#[async_trait]
pub trait RunFetcher {
    async fn fetch_runs(&self, repository: &str, since: NaiveDate) -> Result<Vec<WorkflowRun>>;
}

#[derive(Debug)]
pub struct ReliabilityPass {
    pub since: NaiveDate,
    pub repositories: IndexMap<String, BuildStats>,
}

impl ReliabilityPass {
    pub fn overall(&self) -> BuildStats {
        self.repositories
            .values()
            .cloned()
            .fold(BuildStats::default(), BuildStats::merge)
    }
}

/// Runs are filtered by calendar day, so the time of day is dropped.
pub fn day_floor(since: DateTime<Utc>) -> NaiveDate {
    since.date_naive()
}

/// Folds one repository's runs in fetch order.
pub fn analyze_runs(runs: &[WorkflowRun]) -> BuildStats {
    let (stats, pairer) = runs.iter().fold(
        (BuildStats::default(), RecoveryPairer::new()),
        |(stats, mut pairer), run| {
            let recovery = pairer.observe(run);
            (stats.with_run(run, recovery), pairer)
        },
    );

    let unresolved = pairer.unresolved_runs();
    if !unresolved.is_empty() {
        debug!("Dropping unresolved failing runs at end of window: {unresolved:?}");
    }

    stats
}

pub async fn collect_build_reliability<S, F>(
    source: &S,
    fetcher: &F,
    since: DateTime<Utc>,
) -> Result<ReliabilityPass>
where
    S: RepositorySource + Sync + ?Sized,
    F: RunFetcher + Sync + ?Sized,
{
    let since = day_floor(since);
    let repositories = source.list_repositories().await?;

    info!(
        "Scanning {} repositories for runs since {since}",
        repositories.len()
    );

    let mut per_repository = IndexMap::with_capacity(repositories.len());
    for repository in repositories {
        let runs = fetcher.fetch_runs(&repository, since).await?;
        let stats = analyze_runs(&runs);

        info!(
            "{repository}: {} runs, {} recoveries",
            stats.total,
            stats.recovery_samples.len()
        );

        per_repository.insert(repository, stats);
    }

    Ok(ReliabilityPass {
        since,
        repositories: per_repository,
    })
}
