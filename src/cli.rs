use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::auth::Token;
use crate::error::CiQosError;
use crate::providers::github::GitHubProvider;

#[derive(Parser)]
#[command(name = "ciqos")]
#[command(author, version, about = "CI build reliability metrics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure build reliability of GitHub Actions workflows
    Github {
        /// GitHub API token (optional, required for private repositories)
        #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// GitHub API URL
        #[arg(short, long, default_value = "https://api.github.com")]
        url: String,

        /// Organization whose repositories are scanned
        #[arg(short = 'O', long)]
        owner: String,

        /// Only scan these repositories (name or owner/name, repeatable)
        #[arg(short, long = "repo")]
        repos: Vec<String>,

        /// Include runs created on or after this day (YYYY-MM-DD or RFC 3339)
        #[arg(short, long, value_parser = parse_since, conflicts_with = "days")]
        since: Option<DateTime<Utc>>,

        /// Include runs from the last N days
        #[arg(short, long, default_value_t = 30)]
        days: u32,
    },
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Github {
                token,
                url,
                owner,
                repos,
                since,
                days,
            } => {
                info!("Collecting GitHub build reliability for: {owner}");

                let since = window_start(*since, *days, Utc::now())?;
                let token = Token::from_optional(token.as_deref());

                let provider = GitHubProvider::new(url, owner.clone(), repos.clone(), token)?;
                let insights = provider.collect_insights(since).await?;

                let json_output = if self.pretty {
                    serde_json::to_string_pretty(&insights)?
                } else {
                    serde_json::to_string(&insights)?
                };

                if let Some(output_path) = &self.output {
                    std::fs::write(output_path, json_output)?;
                    info!("Insights written to: {}", output_path.display());
                } else {
                    println!("{json_output}");
                }

                Ok(())
            }
        }
    }
}

fn window_start(
    since: Option<DateTime<Utc>>,
    days: u32,
    now: DateTime<Utc>,
) -> std::result::Result<DateTime<Utc>, CiQosError> {
    if let Some(since) = since {
        return Ok(since);
    }

    now.checked_sub_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| {
            CiQosError::Config(format!("--days {days} reaches before the earliest date"))
        })
}

fn parse_since(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("'{value}' is neither YYYY-MM-DD nor an RFC 3339 timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_since_accepts_day() {
        assert_eq!(
            parse_since("2024-05-10").unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_since_accepts_rfc3339_with_offset() {
        assert_eq!(
            parse_since("2024-05-10T02:30:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 10, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_since_rejects_garbage() {
        assert!(parse_since("last week").is_err());
        assert!(parse_since("2024-13-01").is_err());
    }

    #[test]
    fn test_window_start_counts_days_back() {
        let now = Utc.with_ymd_and_hms(2024, 5, 31, 9, 0, 0).unwrap();

        assert_eq!(
            window_start(None, 30, now).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_window_start_prefers_explicit_since() {
        let now = Utc.with_ymd_and_hms(2024, 5, 31, 9, 0, 0).unwrap();
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(window_start(Some(since), 30, now).unwrap(), since);
    }

    #[test]
    fn test_window_start_rejects_oversized_days() {
        let result = window_start(None, u32::MAX, Utc::now());

        assert!(matches!(result, Err(CiQosError::Config(_))));
    }

    #[tokio::test]
    async fn test_execute_with_oversized_days_is_config_error() {
        let cli = Cli::try_parse_from([
            "ciqos", "github", "--owner", "acme", "--url", "http://127.0.0.1:1", "--days",
            "4000000000",
        ])
        .unwrap();

        let error = cli.execute().await.unwrap_err();

        assert!(matches!(
            error.downcast_ref::<CiQosError>(),
            Some(CiQosError::Config(_))
        ));
    }

    #[test]
    fn test_cli_parses_github_command() {
        let cli = Cli::try_parse_from([
            "ciqos", "--pretty", "github", "--owner", "acme", "--repo", "api", "--repo",
            "acme/web", "--since", "2024-05-10",
        ])
        .unwrap();

        assert!(cli.pretty);
        let Commands::Github {
            owner, repos, since, ..
        } = cli.command;
        assert_eq!(owner, "acme");
        assert_eq!(repos, vec!["api", "acme/web"]);
        assert_eq!(since, Some(Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_cli_rejects_since_with_days() {
        let result = Cli::try_parse_from([
            "ciqos", "github", "--owner", "acme", "--since", "2024-05-10", "--days", "7",
        ]);

        assert!(result.is_err());
    }
}
