//! A local directory of recorded samples that answers `/chartData` requests offline.

use crate::Result;
use crate::facts::MetricsSource;
use crate::metrics::{AlignOptions, DEFAULT_LABEL_FORMAT, RepoMetrics, Sample, Series, align, window_start};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeDelta, Utc};
use ohno::{IntoAppError, bail};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use tempfile::NamedTempFile;

const LOG_TARGET: &str = "   samples";

/// The recorded samples of one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoSamples {
    pub repo: String,

    #[serde(default)]
    pub contributors: Vec<Sample>,

    #[serde(default)]
    pub watchers: Vec<Sample>,

    #[serde(default)]
    pub stars: Vec<Sample>,
}

impl RepoSamples {
    /// No samples yet for `repo`.
    #[must_use]
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            ..Self::default()
        }
    }

    /// The samples of one series, oldest first.
    #[must_use]
    pub fn series(&self, series: Series) -> &[Sample] {
        match series {
            Series::Contributors => &self.contributors,
            Series::Watchers => &self.watchers,
            Series::Stars => &self.stars,
        }
    }

    const fn series_mut(&mut self, series: Series) -> &mut Vec<Sample> {
        match series {
            Series::Contributors => &mut self.contributors,
            Series::Watchers => &mut self.watchers,
            Series::Stars => &mut self.stars,
        }
    }

    /// Append one sample per series, taken at `at`. `values` is ordered like [`Series::ALL`].
    pub fn push(&mut self, values: [f64; 3], at: DateTime<Utc>) {
        for (series, value) in Series::ALL.into_iter().zip(values) {
            self.series_mut(series).push(Sample::new(at, value));
        }
    }

    /// Drop every sample older than `cutoff`.
    pub fn prune(&mut self, cutoff: DateTime<Utc>) {
        for series in Series::ALL {
            self.series_mut(series).retain(|s| s.timestamp >= cutoff);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Series::ALL.into_iter().all(|s| self.series(s).is_empty())
    }
}

/// One JSON document per repository under a directory.
///
/// Documents are named after the percent-encoded repository identifier, so distinct
/// identifiers never share a file.
#[derive(Debug, Clone)]
pub struct SampleStore {
    dir: Utf8PathBuf,
    lookback: TimeDelta,
    bucket: TimeDelta,
    label_format: String,
    retention: TimeDelta,
    now: Option<DateTime<Utc>>,
}

impl SampleStore {
    /// A store under `dir` with the default lookback, bucket, label format and retention.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lookback: TimeDelta::days(14),
            bucket: TimeDelta::hours(1),
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
            retention: TimeDelta::days(30),
            now: None,
        }
    }

    /// How far back `chart_data` reaches.
    #[must_use]
    pub const fn with_lookback(mut self, lookback: TimeDelta) -> Self {
        self.lookback = lookback;
        self
    }

    /// Width of the buckets samples are averaged into.
    #[must_use]
    pub const fn with_bucket(mut self, bucket: TimeDelta) -> Self {
        self.bucket = bucket;
        self
    }

    /// chrono format string for bucket labels.
    #[must_use]
    pub fn with_label_format(mut self, label_format: impl Into<String>) -> Self {
        self.label_format = label_format.into();
        self
    }

    /// How long recorded samples are kept.
    #[must_use]
    pub const fn with_retention(mut self, retention: TimeDelta) -> Self {
        self.retention = retention;
        self
    }

    /// Pin the clock used for alignment and pruning.
    #[must_use]
    pub const fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Directory holding one JSON document per repository.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Path of the document holding `repo`'s samples.
    #[must_use]
    pub fn path_for(&self, repo: &str) -> Utf8PathBuf {
        self.dir.join(format!("{}.json", file_stem(repo)))
    }

    /// Load `repo`'s samples. A repository with no document yet has no samples.
    ///
    /// A document recorded for a different repository is rejected rather than returned.
    pub fn load(&self, repo: &str) -> Result<RepoSamples> {
        let path = self.path_for(repo);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(target: LOG_TARGET, "No samples recorded yet for '{repo}'");
                return Ok(RepoSamples::new(repo));
            }
            Err(e) => return Err(e).into_app_err_with(|| format!("unable to open file '{path}'")),
        };

        let samples: RepoSamples =
            serde_json::from_reader(BufReader::new(file)).into_app_err_with(|| format!("unable to parse file '{path}'"))?;

        if samples.repo != repo {
            bail!("sample file '{path}' holds samples for '{}', not '{repo}'", samples.repo);
        }

        log::debug!(target: LOG_TARGET, "Loaded samples for '{repo}' from '{path}'");
        Ok(samples)
    }

    /// Write `samples` back to its document, creating the directory as needed.
    ///
    /// The document is written to a temporary file next to it and then renamed into place, so a
    /// failed write leaves the previous document intact.
    pub fn save(&self, samples: &RepoSamples) -> Result<()> {
        let path = self.path_for(&samples.repo);

        fs::create_dir_all(&self.dir).into_app_err_with(|| format!("unable to create directory '{}'", self.dir))?;

        let temp = NamedTempFile::new_in(&self.dir).into_app_err_with(|| format!("unable to create a temporary file in '{}'", self.dir))?;
        let mut writer = BufWriter::new(temp);

        serde_json::to_writer_pretty(&mut writer, samples).into_app_err_with(|| format!("unable to write sample file '{path}'"))?;
        writer.flush().into_app_err_with(|| format!("unable to flush sample file '{path}'"))?;

        let temp = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .into_app_err_with(|| format!("unable to flush sample file '{path}'"))?;
        let _ = temp
            .persist(&path)
            .map_err(|e| e.error)
            .into_app_err_with(|| format!("unable to replace sample file '{path}'"))?;
        Ok(())
    }

    /// Append a sample per series for `repo` and drop whatever has aged out of the retention window.
    pub fn record(&self, repo: &str, values: [f64; 3]) -> Result<RepoSamples> {
        let now = self.now();
        let mut samples = self.load(repo)?;

        samples.push(values, now);
        samples.prune(window_start(now, self.retention));
        self.save(&samples)?;

        log::info!(
            target: LOG_TARGET,
            "Recorded {} contributors, {} watchers, {} stars for '{repo}'",
            values[0],
            values[1],
            values[2]
        );

        Ok(samples)
    }

    /// The `/chartData` payload for `repo`, computed from its recorded samples.
    pub fn chart_data(&self, repo: &str) -> Result<RepoMetrics> {
        let samples = self.load(repo)?;

        let options = AlignOptions {
            now: self.now(),
            lookback: self.lookback,
            bucket: self.bucket,
            label_format: self.label_format.clone(),
        };

        let aligned = align(Series::ALL.map(|s| samples.series(s)), &options)?;
        let [cont, watch, star] = aligned.values;

        RepoMetrics::new(repo, aligned.labels, cont, watch, star)
    }
}

impl MetricsSource for SampleStore {
    async fn fetch(&self, repo: &str) -> Result<RepoMetrics> {
        self.chart_data(repo)
    }
}

/// File-system safe stem for a repository identifier.
///
/// Everything but ASCII letters and digits is percent-encoded. The empty identifier maps to a lone
/// `%`, which no encoding produces.
fn file_stem(repo: &str) -> String {
    if repo.is_empty() {
        return "%".to_string();
    }

    utf8_percent_encode(repo, NON_ALPHANUMERIC).to_string()
}
