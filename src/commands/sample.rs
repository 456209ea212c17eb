use super::Host;
use super::common::{LogLevel, init_logging, load_config, sample_store, select_repos};
use crate::Result;
use crate::facts::{RepoSpec, SampleStore};
use crate::facts::github::{GITHUB_API_URL, Provider, RepoCounts};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;
use std::io::Write;

const LOG_TARGET: &str = "    sample";

#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// Path to configuration file [default: one of charts.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory of the sample store [default: from configuration, else the platform data directory]
    #[arg(long, value_name = "DIR")]
    pub samples: Option<Utf8PathBuf>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL", default_value = GITHUB_API_URL)]
    pub github_api_url: String,

    /// Repository to sample, as `owner/name`; may be repeated [default: from configuration]
    #[arg(long = "repo", value_name = "ID")]
    pub repos: Vec<String>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Record the current contributor, watcher and star counts of each repository.
pub async fn sample_repos<H: Host>(host: &mut H, args: &SampleArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = load_config(host, args.config.as_ref())?;
    let repos = select_repos(&args.repos, &config);
    if repos.is_empty() {
        let _ = writeln!(
            host.error(),
            "No repositories to sample; list them in the configuration or pass --repo"
        );
        return Ok(());
    }

    let mut failures = 0;
    let mut targets = Vec::with_capacity(repos.len());
    for repo in repos {
        match RepoSpec::parse(&repo) {
            Ok(spec) => targets.push((repo, spec)),
            Err(e) => {
                let _ = writeln!(host.error(), "  Skipping '{repo}': {e}");
                failures += 1;
            }
        }
    }

    let store = sample_store(&config, args.samples.as_ref())?;
    let provider = Provider::with_api_base(args.github_token.as_deref(), &args.github_api_url)?;

    let specs: Vec<_> = targets.iter().map(|(_, spec)| spec.clone()).collect();
    log::info!(target: LOG_TARGET, "Sampling {} repositories into '{}'", specs.len(), store.dir());

    let results = provider.get_counts(&specs).await;
    failures += record_counts(host, &store, &targets, results);

    if failures > 0 {
        bail!("could not sample {failures} repositories");
    }

    Ok(())
}

/// Store each successful fetch, reporting fetch and store failures per repository. Returns the failure count.
fn record_counts<H: Host>(
    host: &mut H,
    store: &SampleStore,
    targets: &[(String, RepoSpec)],
    results: Vec<Result<RepoCounts>>,
) -> usize {
    let mut failures = 0;

    for ((repo, _), result) in targets.iter().zip(results) {
        let recorded = result.and_then(|counts| store.record(repo, counts.values()).map(|_| counts));

        match recorded {
            Ok(counts) => {
                let _ = writeln!(
                    host.output(),
                    "{repo}: {} contributors, {} watchers, {} stars",
                    counts.contributors,
                    counts.watchers,
                    counts.stars
                );
            }
            Err(e) => {
                let _ = writeln!(host.error(), "  Could not sample '{repo}': {e:#}");
                failures += 1;
            }
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use ohno::app_err;

    fn targets(repos: &[&str]) -> Vec<(String, RepoSpec)> {
        repos.iter().map(|r| ((*r).to_string(), RepoSpec::parse(r).unwrap())).collect()
    }

    fn counts(stars: u64) -> RepoCounts {
        RepoCounts {
            contributors: 1,
            watchers: 2,
            stars,
        }
    }

    #[test]
    fn test_records_successes_and_reports_fetch_failures() {
        let dir = tempfile::tempdir().unwrap();
        let store = SampleStore::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap());
        let mut host = TestHost::default();

        let failures = record_counts(
            &mut host,
            &store,
            &targets(&["octo/one", "octo/two"]),
            vec![Ok(counts(7)), Err(app_err!("rate limited"))],
        );

        assert_eq!(failures, 1);
        assert!(host.output_str().contains("octo/one: 1 contributors, 2 watchers, 7 stars"));
        assert!(host.error_str().contains("Could not sample 'octo/two': rate limited"));
        assert!(!store.load("octo/one").unwrap().is_empty());
        assert!(store.load("octo/two").unwrap().is_empty());
    }

    #[test]
    fn test_store_failure_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = SampleStore::new(Utf8PathBuf::from_path_buf(blocker).unwrap());
        let mut host = TestHost::default();

        let failures = record_counts(
            &mut host,
            &store,
            &targets(&["octo/one", "octo/two"]),
            vec![Ok(counts(1)), Ok(counts(2))],
        );

        assert_eq!(failures, 2);
        let errors = host.error_str();
        assert!(errors.contains("Could not sample 'octo/one'"));
        assert!(errors.contains("Could not sample 'octo/two'"));
        assert!(host.output_buf.is_empty());
    }
}
