use crate::Result;
use crate::facts::MetricsSource;
use crate::metrics::RepoMetrics;
use ohno::{IntoAppError, app_err, bail};
use reqwest::Client;
use reqwest::header::ACCEPT;
use url::Url;

const LOG_TARGET: &str = "chart_data";

/// Path of the metrics endpoint, relative to the configured endpoint base.
pub const CHART_DATA_PATH: &str = "chartData";

/// HTTP client for `GET /chartData?repo=<id>`.
///
/// Requests are sent as-is: no retry, no timeout, no caching.
#[derive(Debug, Clone)]
pub struct ChartDataClient {
    client: Client,
    endpoint: Url,
}

impl ChartDataClient {
    /// Create a client for the server rooted at `endpoint`.
    pub fn new(endpoint: Url) -> Result<Self> {
        if endpoint.cannot_be_a_base() {
            bail!("chart data endpoint '{endpoint}' is not a base URL");
        }

        let client = Client::builder()
            .user_agent("repo-charts")
            .build()
            .into_app_err("could not create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// Base URL `/chartData` is resolved against.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The full request URL for `repo`, with the identifier percent-encoded into the query.
    pub fn chart_data_url(&self, repo: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        url.set_fragment(None);

        let _ = url
            .path_segments_mut()
            .map_err(|()| app_err!("chart data endpoint '{}' is not a base URL", self.endpoint))?
            .pop_if_empty()
            .push(CHART_DATA_PATH);

        let _ = url.query_pairs_mut().append_pair("repo", repo);
        Ok(url)
    }
}

impl MetricsSource for ChartDataClient {
    async fn fetch(&self, repo: &str) -> Result<RepoMetrics> {
        let url = self.chart_data_url(repo)?;

        log::debug!(target: LOG_TARGET, "Requesting chart data from '{url}'");

        let resp = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .into_app_err_with(|| format!("could not request chart data for '{repo}'"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("unexpected HTTP status {status} from {url}");
        }

        let body = resp
            .bytes()
            .await
            .into_app_err_with(|| format!("could not read chart data response from '{url}'"))?;

        log::debug!(target: LOG_TARGET, "Received {} bytes of chart data for '{repo}'", body.len());

        RepoMetrics::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> ChartDataClient {
        ChartDataClient::new(Url::parse(endpoint).unwrap()).unwrap()
    }

    #[test]
    fn test_url_for_root_endpoint() {
        let url = client("http://localhost:5000").chart_data_url("octo/repo").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/chartData?repo=octo%2Frepo");
    }

    #[test]
    fn test_url_keeps_mount_prefix() {
        let url = client("https://example.com/observer/").chart_data_url("a").unwrap();
        assert_eq!(url.as_str(), "https://example.com/observer/chartData?repo=a");
    }

    #[test]
    fn test_url_drops_existing_query() {
        let url = client("http://localhost/?x=1#frag").chart_data_url("b c").unwrap();
        assert_eq!(url.as_str(), "http://localhost/chartData?repo=b+c");
    }

    #[test]
    fn test_empty_repo_still_sends_parameter() {
        let url = client("http://localhost/").chart_data_url("").unwrap();
        assert_eq!(url.as_str(), "http://localhost/chartData?repo=");
    }

    #[test]
    fn test_rejects_non_base_endpoint() {
        let _ = ChartDataClient::new(Url::parse("mailto:someone@example.com").unwrap()).unwrap_err();
    }
}
