//! Command-line interface and orchestration for repo-charts
//!
//! - **render**: build the dashboard page for the configured repositories, fetch each chart's
//!   metrics from a `/chartData` server or the local sample store, and write the page as HTML
//! - **sample**: query GitHub for current counts and append them to the sample store
//! - **observe**: check that every current repository of a GitHub organization has a README
//! - **init**: write the default configuration file
//! - **validate**: check a configuration file and report warnings

mod common;
mod host;
mod init;
mod observe;
mod render;
mod run;
mod sample;
mod validate;

pub use common::LogLevel;
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use observe::{ObserveArgs, observe_org};
pub use render::{RenderArgs, render_charts};
pub use run::run;
pub use sample::{SampleArgs, sample_repos};
pub use validate::{ValidateArgs, validate_config};
