use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::reliability::{BuildStats, BuildSummary, ReliabilityPass};

#[derive(Debug, Serialize, Deserialize)]
pub struct CIInsights {
    pub provider: String,
    pub owner: String,
    pub collected_at: DateTime<Utc>,
    pub since: NaiveDate,
    pub total_repositories: usize,
    pub total_runs: usize,
    pub summary: BuildSummary,
    pub repositories: IndexMap<String, RepositoryInsights>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInsights {
    pub total_runs: usize,
    pub successful_runs: usize,
    pub recovered_incidents: usize,
    pub summary: BuildSummary,
}

impl From<&BuildStats> for RepositoryInsights {
    fn from(stats: &BuildStats) -> Self {
        Self {
            total_runs: stats.total,
            successful_runs: stats.successful,
            recovered_incidents: stats.recovery_samples.len(),
            summary: stats.summary(),
        }
    }
}

impl CIInsights {
    pub fn from_pass(provider: &str, owner: &str, pass: &ReliabilityPass) -> Self {
        let summary = pass.overall().summary();

        let repositories = pass
            .repositories
            .iter()
            .map(|(name, stats)| (name.clone(), RepositoryInsights::from(stats)))
            .collect();

        Self {
            provider: provider.to_string(),
            owner: owner.to_string(),
            collected_at: Utc::now(),
            since: pass.since,
            total_repositories: pass.repositories.len(),
            total_runs: summary.total,
            summary,
            repositories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pass_keeps_repository_order() {
        let pass = ReliabilityPass {
            since: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            repositories: IndexMap::from([
                (
                    "acme/zeta".to_string(),
                    BuildStats {
                        total: 2,
                        successful: 1,
                        duration_sum_seconds: 30.0,
                        recovery_samples: vec![40],
                    },
                ),
                ("acme/alpha".to_string(), BuildStats::default()),
            ]),
        };

        let insights = CIInsights::from_pass("GitHub", "acme", &pass);

        assert_eq!(insights.total_repositories, 2);
        assert_eq!(insights.total_runs, 2);
        assert_eq!(
            insights.repositories.keys().collect::<Vec<_>>(),
            vec!["acme/zeta", "acme/alpha"]
        );
        assert_eq!(insights.repositories["acme/zeta"].recovered_incidents, 1);
        assert_eq!(insights.summary.average_build_mttr, 40);
    }

    #[test]
    fn test_report_serializes_summary_as_three_keys() {
        let pass = ReliabilityPass {
            since: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            repositories: IndexMap::new(),
        };

        let value = serde_json::to_value(CIInsights::from_pass("GitHub", "acme", &pass)).unwrap();

        assert_eq!(value["since"], "2024-01-01");
        assert_eq!(
            value["summary"],
            serde_json::json!({
                "average_build_success_rate": 0.0,
                "average_build_duration": 0.0,
                "average_build_mttr": 0
            })
        );
    }
}
