use crate::Result;
use crate::facts::repo_spec::RepoSpec;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use octocrab::Octocrab;
use ohno::{EnrichableExt, IntoAppError};
use reqwest::header::LINK;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::LazyLock;
use url::Url;

const LOG_TARGET: &str = "    github";

/// Base URL of the public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com/";

/// Repositories requested per page when listing an organization.
const ORG_REPOS_PER_PAGE: usize = 100;

const GITHUB_RATE_LIMIT_UNAUTHENTICATED: usize = 60;
const GITHUB_RATE_LIMIT_AUTHENTICATED: usize = 5000;

/// GitHub API requests issued per repository: repo info plus the contributors page.
const REQUESTS_PER_REPO: usize = 2;

/// Pattern to extract page number from GitHub API Link header
static PAGE_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"page=(\d+)>; rel=.last.").expect("invalid regex"));

/// Current counts for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepoCounts {
    pub contributors: u64,
    pub watchers: u64,
    pub stars: u64,
}

impl RepoCounts {
    /// The counts as sample values, ordered like [`crate::metrics::Series::ALL`].
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
    pub fn values(&self) -> [f64; 3] {
        [self.contributors as f64, self.watchers as f64, self.stars as f64]
    }
}

/// A repository as listed for an organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgRepo {
    pub full_name: String,
    pub created_at: DateTime<Utc>,

    /// Absent for repositories nothing was ever pushed to.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct Readme {
    sha: String,
}

/// Queries GitHub for the counts the dashboard charts.
#[derive(Debug, Clone)]
pub struct Provider {
    octocrab: Octocrab,
    client: Client,
    api_base: Url,
    /// Number of repositories queried concurrently.
    batch_size: usize,
}

impl Provider {
    /// A provider talking to the public GitHub API.
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_api_base(token, GITHUB_API_URL)
    }

    /// A provider talking to the GitHub API rooted at `api_base`, such as a GitHub Enterprise server.
    pub fn with_api_base(token: Option<&str>, api_base: &str) -> Result<Self> {
        let mut api_base = Url::parse(api_base).into_app_err_with(|| format!("invalid GitHub API URL '{api_base}'"))?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let mut builder = Octocrab::builder().base_uri(api_base.as_str())?;
        let mut client_builder = Client::builder().user_agent("repo-charts");

        if let Some(t) = token {
            let mut auth_val = reqwest::header::HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);

            let mut headers = reqwest::header::HeaderMap::new();
            let _ = headers.insert(reqwest::header::AUTHORIZATION, auth_val);

            client_builder = client_builder.default_headers(headers);
            builder = builder.personal_token(t);
        }

        let rate_limit = if token.is_some() {
            GITHUB_RATE_LIMIT_AUTHENTICATED
        } else {
            GITHUB_RATE_LIMIT_UNAUTHENTICATED
        };

        Ok(Self {
            octocrab: builder.build()?,
            client: client_builder.build()?,
            api_base,
            batch_size: batch_size_for(rate_limit),
        })
    }

    /// Number of repositories queried concurrently, sized to the hourly rate limit.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Root every API request is resolved against. Always ends with a slash.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        self.api_base
            .join(path)
            .into_app_err_with(|| format!("could not form a GitHub API URL for '{path}'"))
    }

    /// Query every repository, `batch_size` at a time. Results come back in input order.
    pub async fn get_counts(&self, repos: &[RepoSpec]) -> Vec<Result<RepoCounts>> {
        let mut results = Vec::with_capacity(repos.len());

        for batch in repos.chunks(self.batch_size) {
            log::debug!(target: LOG_TARGET, "Querying a batch of {} repositories", batch.len());
            results.extend(join_all(batch.iter().map(|spec| self.fetch_counts(spec))).await);
        }

        results
    }

    async fn fetch_counts(&self, repo_spec: &RepoSpec) -> Result<RepoCounts> {
        let owner = repo_spec.owner();
        let repo = repo_spec.repo();

        log::info!(target: LOG_TARGET, "Querying GitHub for counts on repository '{repo_spec}'");

        let (repo_res, contributors_res) = tokio::join!(self.get_repo_info(owner, repo), self.get_contributors_count(owner, repo));

        let repo_data = repo_res.map_err(|e| e.enrich_with(|| format!("could not fetch repo info for repository '{repo_spec}'")))?;
        let contributors =
            contributors_res.map_err(|e| e.enrich_with(|| format!("could not fetch contributor count for repository '{repo_spec}'")))?;

        log::debug!(target: LOG_TARGET, "Completed GitHub API requests for repository '{repo_spec}'");

        Ok(RepoCounts {
            contributors,
            watchers: repo_data
                .subscribers_count
                .filter(|&count| count >= 0)
                .map_or(0, i64::cast_unsigned),
            stars: u64::from(repo_data.stargazers_count.unwrap_or(0)),
        })
    }

    async fn get_repo_info(&self, owner: &str, repo: &str) -> Result<octocrab::models::Repository> {
        Ok(self.octocrab.repos(owner, repo).get().await?)
    }

    async fn get_contributors_count(&self, owner: &str, repo: &str) -> Result<u64> {
        let url = self.api_url(&format!("repos/{owner}/{repo}/contributors?per_page=1&anon=true"))?;
        self.get_count_via_link_header(url).await
    }

    async fn get_count_via_link_header(&self, url: Url) -> Result<u64> {
        log::debug!(target: LOG_TARGET, "Fetching count via Link header from '{url}'");

        let resp = self.client.get(url.clone()).send().await?.error_for_status()?;

        if let Some(link_header) = resp.headers().get(LINK)
            && let Some(count) = last_page(link_header.to_str()?)
        {
            return Ok(count);
        }

        // Single page: count what came back
        let bytes = resp
            .bytes()
            .await
            .into_app_err_with(|| format!("could not read response body from '{url}'"))?;

        count_json_array_elements(&bytes).into_app_err_with(|| format!("could not count items in JSON response from '{url}'"))
    }

    /// Every repository of `org`, following pages until a short one comes back.
    pub async fn list_org_repos(&self, org: &str) -> Result<Vec<OrgRepo>> {
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let url = self.api_url(&format!("orgs/{org}/repos?per_page={ORG_REPOS_PER_PAGE}&page={page}"))?;
            log::debug!(target: LOG_TARGET, "Listing page {page} of the repositories of '{org}'");

            let batch: Vec<OrgRepo> = self
                .client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()
                .into_app_err_with(|| format!("could not list the repositories of '{org}'"))?
                .json()
                .await
                .into_app_err_with(|| format!("malformed repository list from '{url}'"))?;

            let last = batch.len() < ORG_REPOS_PER_PAGE;
            repos.extend(batch);
            if last {
                break;
            }
            page += 1;
        }

        log::info!(target: LOG_TARGET, "Found {} repositories in '{org}'", repos.len());
        Ok(repos)
    }

    /// Blob sha of the README of `full_name`, or `None` when the repository has none.
    pub async fn get_readme_sha(&self, full_name: &str) -> Result<Option<String>> {
        let url = self.api_url(&format!("repos/{full_name}/readme"))?;
        log::debug!(target: LOG_TARGET, "Looking up the README of '{full_name}'");

        let resp = self.client.get(url.clone()).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let readme: Readme = resp
            .error_for_status()?
            .json()
            .await
            .into_app_err_with(|| format!("malformed README description from '{url}'"))?;
        Ok(Some(readme.sha))
    }

    /// Look up the README of every repository, `batch_size` at a time. Results come back in input order.
    pub async fn get_readme_shas(&self, full_names: &[String]) -> Vec<Result<Option<String>>> {
        let mut results = Vec::with_capacity(full_names.len());

        for batch in full_names.chunks(self.batch_size) {
            results.extend(join_all(batch.iter().map(|name| self.get_readme_sha(name))).await);
        }

        results
    }
}

fn batch_size_for(rate_limit: usize) -> usize {
    ((rate_limit + 1) / REQUESTS_PER_REPO).max(1)
}

fn last_page(link: &str) -> Option<u64> {
    PAGE_REGEX
        .captures(link)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Count elements in a JSON array without keeping their contents.
fn count_json_array_elements(json: &[u8]) -> Result<u64> {
    use serde::de::IgnoredAny;

    let array: Vec<IgnoredAny> = serde_json::from_slice(json).into_app_err("malformed JSON while counting array elements")?;

    Ok(array.len() as u64)
}
