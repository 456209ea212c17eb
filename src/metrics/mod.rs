//! The metrics payload exchanged over `/chartData` and the alignment that produces it.

pub mod align;
mod repo_metrics;
mod sample;
mod series;

pub use align::{AlignOptions, Aligned, DEFAULT_LABEL_FORMAT, align, window_start};
pub use repo_metrics::{RawRepoMetrics, RepoMetrics};
pub use sample::Sample;
pub use series::Series;
