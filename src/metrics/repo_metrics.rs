use crate::Result;
use crate::metrics::Series;
use ohno::{IntoAppError, bail};
use serde::{Deserialize, Serialize};

/// A `/chartData` payload exactly as received, before any shape checks.
///
/// Every field is optional so that a missing field surfaces as a malformed payload
/// naming that field rather than as an opaque deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRepoMetrics {
    #[serde(default)]
    pub rname: Option<String>,

    #[serde(default)]
    pub labels: Option<Vec<String>>,

    #[serde(default)]
    pub cont: Option<Vec<f64>>,

    #[serde(default)]
    pub watch: Option<Vec<f64>>,

    #[serde(default)]
    pub star: Option<Vec<f64>>,
}

/// Metrics for one repository: shared labels plus the three aligned series.
///
/// Construction guarantees that `cont`, `watch` and `star` have the same length as `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoMetrics {
    /// Identifier of the element the chart gets mounted under.
    pub rname: String,
    pub labels: Vec<String>,
    pub cont: Vec<f64>,
    pub watch: Vec<f64>,
    pub star: Vec<f64>,
}

impl RepoMetrics {
    /// Build a validated metrics value.
    ///
    /// # Errors
    ///
    /// Returns a malformed payload error if any series length differs from the label count.
    pub fn new(rname: impl Into<String>, labels: Vec<String>, cont: Vec<f64>, watch: Vec<f64>, star: Vec<f64>) -> Result<Self> {
        let metrics = Self {
            rname: rname.into(),
            labels,
            cont,
            watch,
            star,
        };

        for series in Series::ALL {
            let len = metrics.series(series).len();
            if len != metrics.labels.len() {
                bail!(
                    "malformed chart data payload for '{}': field '{}' has {len} values but there are {} labels",
                    metrics.rname,
                    series.wire_field(),
                    metrics.labels.len()
                );
            }
        }

        Ok(metrics)
    }

    /// Parse and validate a `/chartData` response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON of the expected shape.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let raw: RawRepoMetrics = serde_json::from_slice(body).into_app_err("malformed chart data payload: invalid JSON")?;
        Self::try_from(raw)
    }

    /// The values of one series.
    #[must_use]
    pub fn series(&self, series: Series) -> &[f64] {
        match series {
            Series::Contributors => &self.cont,
            Series::Watchers => &self.watch,
            Series::Stars => &self.star,
        }
    }

    /// Number of labeled points in each series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl TryFrom<RawRepoMetrics> for RepoMetrics {
    type Error = ohno::AppError;

    fn try_from(raw: RawRepoMetrics) -> Result<Self> {
        let Some(rname) = raw.rname else {
            bail!("malformed chart data payload: missing field 'rname'");
        };

        let Some(labels) = raw.labels else {
            bail!("malformed chart data payload for '{rname}': missing field 'labels'");
        };

        let Some(cont) = raw.cont else {
            bail!("malformed chart data payload for '{rname}': missing field 'cont'");
        };

        let Some(watch) = raw.watch else {
            bail!("malformed chart data payload for '{rname}': missing field 'watch'");
        };

        let Some(star) = raw.star else {
            bail!("malformed chart data payload for '{rname}': missing field 'star'");
        };

        Self::new(rname, labels, cont, watch, star)
    }
}
