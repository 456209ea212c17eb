use super::Host;
use super::common::{LogLevel, init_logging, load_config};
use crate::Result;
use crate::facts::github::{GITHUB_API_URL, Provider};
use crate::facts::observer::{CurrencyPolicy, Observation};
use camino::Utf8PathBuf;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use ohno::{app_err, bail};
use std::io::Write;

const LOG_TARGET: &str = "   observe";

#[derive(Parser, Debug)]
pub struct ObserveArgs {
    /// Path to configuration file [default: one of charts.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// GitHub organization to observe [default: from configuration]
    #[arg(long, value_name = "ORG")]
    pub org: Option<String>,

    /// Repositories created after this day are always checked
    #[arg(long, value_name = "YYYY-MM-DD", default_value_t = CurrencyPolicy::DEFAULT_CREATED_AFTER)]
    pub created_after: NaiveDate,

    /// Older repositories are checked when pushed within this many days
    #[arg(long, value_name = "DAYS", default_value_t = CurrencyPolicy::DEFAULT_PUSHED_WITHIN_DAYS)]
    pub pushed_within_days: u32,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL", default_value = GITHUB_API_URL)]
    pub github_api_url: String,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Check that every current repository of an organization carries a README, printing a
/// pass or fail line per repository.
pub async fn observe_org<H: Host>(host: &mut H, args: &ObserveArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = load_config(host, args.config.as_ref())?;
    let org = args
        .org
        .as_ref()
        .or(config.organization.as_ref())
        .ok_or_else(|| app_err!("no organization to observe; set `organization` in the configuration or pass --org"))?;

    let provider = Provider::with_api_base(args.github_token.as_deref(), &args.github_api_url)?;
    let policy = CurrencyPolicy::new(args.created_after, args.pushed_within_days);
    let now = Utc::now();

    let repos = provider.list_org_repos(org).await?;
    let total = repos.len();
    let current: Vec<String> = repos
        .into_iter()
        .filter(|repo| policy.is_current(repo, now))
        .map(|repo| repo.full_name)
        .collect();

    log::info!(target: LOG_TARGET, "Checking {} of {total} repositories in '{org}'", current.len());

    let results = provider.get_readme_shas(&current).await;

    let mut passed = 0;
    let mut failed = 0;
    let mut errors = 0;
    for (repo, result) in current.iter().zip(results) {
        match result {
            Ok(sha) => {
                let observation = Observation::from_readme(repo.as_str(), sha);
                if observation.passed() {
                    passed += 1;
                } else {
                    failed += 1;
                }
                let _ = writeln!(host.output(), "{observation}");
            }
            Err(e) => {
                let _ = writeln!(host.error(), "  Could not check '{repo}': {e:#}");
                errors += 1;
            }
        }
    }

    let _ = writeln!(
        host.output(),
        "{passed} passed, {failed} failed, {} not current",
        total - current.len()
    );

    if errors > 0 {
        bail!("could not check {errors} repositories");
    }

    Ok(())
}
