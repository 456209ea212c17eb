//! Where repository metrics come from.
//!
//! A [`MetricsSource`] answers the `/chartData` contract for one repository at a time. Two
//! sources exist:
//!
//! - [`ChartDataClient`] asks a remote metrics server over HTTP.
//! - [`SampleStore`] computes the same payload locally from samples recorded by the GitHub
//!   sampler ([`github::Provider`]), bucketing and aligning them the way the server does.
//!
//! The [`observer`] separately checks which repositories of an organization are current and
//! whether they carry a README.

mod chart_data_client;
pub mod github;
mod metrics_source;
pub mod observer;
mod repo_spec;
mod sample_store;

pub use chart_data_client::{CHART_DATA_PATH, ChartDataClient};
pub use metrics_source::MetricsSource;
pub use repo_spec::RepoSpec;
pub use sample_store::{RepoSamples, SampleStore};
