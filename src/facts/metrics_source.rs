use crate::Result;
use crate::metrics::RepoMetrics;

/// Anything that can answer a `/chartData` request for a repository.
pub trait MetricsSource: Send + Sync {
    /// Fetch the metrics for `repo`.
    ///
    /// The returned metrics name the element their chart gets mounted under, which is usually,
    /// but not necessarily, `repo` itself.
    fn fetch(&self, repo: &str) -> impl Future<Output = Result<RepoMetrics>> + Send;
}
