//! repo-charts crate
//!
//! Fetches contributor, watcher and star counts for a set of repositories and renders each
//! repository's history as a line chart in a self-contained HTML dashboard.
//!
//! # Module Organization
//!
//! - [`page`]: In-memory page document and its HTML serialization
//! - [`charts`]: Chart configuration, canvas, and the line chart painter
//! - [`renderer`]: Finds chart placeholders, requests metrics, and mounts charts
//! - [`facts`]: Metrics sources (the `/chartData` client, the local sample store, the GitHub sampler)
//!   and the organization README observer
//! - [`metrics`]: The metrics payload and series alignment
//! - [`config`]: Configuration loading and validation
//! - [`commands`]: Command-line interface and orchestration

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[doc(hidden)]
pub mod charts;

#[doc(hidden)]
pub mod commands;

#[doc(hidden)]
pub mod config;

#[doc(hidden)]
pub mod facts;

#[doc(hidden)]
pub mod metrics;

#[doc(hidden)]
pub mod page;

#[doc(hidden)]
pub mod renderer;

pub use crate::commands::{Host, run};
