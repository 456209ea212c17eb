//! Turns raw samples into the aligned label/value layout of a `/chartData` payload.

use crate::Result;
use crate::metrics::{Sample, Series};
use chrono::{DateTime, TimeDelta, Utc};
use core::fmt::Write;
use ohno::IntoAppError;
use std::collections::{BTreeMap, BTreeSet};

/// Label format used when none is configured: `03/14 09AM`.
pub const DEFAULT_LABEL_FORMAT: &str = "%m/%d %I%p";

/// Controls which samples are considered and how they are grouped.
#[derive(Debug, Clone)]
pub struct AlignOptions {
    /// End of the window; samples after this instant are ignored.
    pub now: DateTime<Utc>,

    /// Length of the window ending at `now`. A window reaching past the earliest representable
    /// instant covers all samples.
    pub lookback: TimeDelta,

    /// Width of the buckets samples are averaged into.
    pub bucket: TimeDelta,

    /// `chrono` format string applied to each bucket's start.
    pub label_format: String,
}

impl AlignOptions {
    #[must_use]
    pub fn new(now: DateTime<Utc>, lookback: TimeDelta, bucket: TimeDelta) -> Self {
        Self {
            now,
            lookback,
            bucket,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }
}

/// Shared labels plus one value list per series, all of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Aligned {
    pub labels: Vec<String>,
    pub values: [Vec<f64>; 3],
}

impl Aligned {
    #[must_use]
    pub fn series(&self, series: Series) -> &[f64] {
        &self.values[series.index()]
    }
}

/// Align the three series of a repository onto a common set of bucket labels.
///
/// Each series is averaged per bucket and rounded to the nearest integer. Labels are the union of
/// the buckets seen in any series, in chronological order; a series with no sample in a bucket
/// reports `0` there.
///
/// # Errors
///
/// Returns an error if `label_format` cannot be applied to a bucket start.
pub fn align(series: [&[Sample]; 3], options: &AlignOptions) -> Result<Aligned> {
    let bucket_secs = options.bucket.num_seconds().max(1);
    let start = window_start(options.now, options.lookback);

    let bucketed = series.map(|samples| bucket_averages(samples, start, options.now, bucket_secs));

    let buckets: BTreeSet<i64> = bucketed.iter().flat_map(BTreeMap::keys).copied().collect();

    let labels = buckets
        .iter()
        .map(|&secs| format_label(secs, &options.label_format))
        .collect::<Result<Vec<_>>>()?;

    let values = bucketed.map(|averages| buckets.iter().map(|secs| averages.get(secs).copied().unwrap_or(0.0)).collect());

    Ok(Aligned { labels, values })
}

/// The instant `span` before `end`, saturating at the earliest representable instant.
#[must_use]
pub fn window_start(end: DateTime<Utc>, span: TimeDelta) -> DateTime<Utc> {
    end.checked_sub_signed(span).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn format_label(secs: i64, label_format: &str) -> Result<String> {
    let Some(dt) = DateTime::from_timestamp(secs, 0) else {
        return Ok(String::new());
    };

    let mut label = String::new();
    write!(label, "{}", dt.format(label_format))
        .into_app_err_with(|| format!("label format '{label_format}' is not a valid chrono format string"))?;
    Ok(label)
}

fn bucket_averages(samples: &[Sample], start: DateTime<Utc>, end: DateTime<Utc>, bucket_secs: i64) -> BTreeMap<i64, f64> {
    let mut sums: BTreeMap<i64, (f64, u32)> = BTreeMap::new();

    for sample in samples.iter().filter(|s| s.timestamp >= start && s.timestamp <= end && s.value.is_finite()) {
        let secs = sample.timestamp.timestamp();
        let bucket = secs - secs.rem_euclid(bucket_secs);
        let entry = sums.entry(bucket).or_insert((0.0, 0));
        entry.0 += sample.value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(bucket, (sum, count))| (bucket, (sum / f64::from(count)).round()))
        .collect()
}
