//! Configuration for repo-charts: which repositories to chart, where their metrics come from, and
//! how samples are bucketed.

#[expect(clippy::module_inception, reason = "mirrors the type it holds")]
mod config;

pub use config::{CONFIG_CANDIDATES, Config, DEFAULT_CONFIG_TOML};
