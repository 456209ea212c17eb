//! Plumbing shared between the render and sample commands.

use super::Host;
use crate::Result;
use crate::config::Config;
use crate::facts::SampleStore;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::TimeDelta;
use clap::ValueEnum;
use directories::BaseDirs;
use ohno::{IntoAppError, app_err};
use std::io::Write;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Initialize logger based on log level
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when commands run more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Load the configuration from `config_path`, or from the current directory, reporting warnings on the error stream.
pub fn load_config<H: Host>(host: &mut H, config_path: Option<&Utf8PathBuf>) -> Result<Config> {
    let (config, warnings) = Config::load(Utf8Path::new("."), config_path)?;
    write_warnings(host, &warnings);
    Ok(config)
}

pub fn write_warnings<H: Host>(host: &mut H, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }

    let _ = writeln!(host.error(), "\nConfiguration validation warnings:");
    for warning in warnings {
        let _ = writeln!(host.error(), "   {warning}");
    }
    let _ = writeln!(host.error());
}

/// Repositories named on the command line, or the configured ones when none are.
#[must_use]
pub fn select_repos(from_args: &[String], config: &Config) -> Vec<String> {
    if from_args.is_empty() {
        config.repos.clone()
    } else {
        from_args.to_vec()
    }
}

/// Open the sample store at `dir`, the configured directory, or the platform data directory, in that order.
pub fn sample_store(config: &Config, dir: Option<&Utf8PathBuf>) -> Result<SampleStore> {
    let dir = if let Some(dir) = dir.or(config.samples_dir.as_ref()) {
        dir.clone()
    } else {
        default_samples_dir()?
    };

    Ok(SampleStore::new(dir)
        .with_lookback(TimeDelta::days(i64::from(config.lookback_days)))
        .with_bucket(TimeDelta::minutes(i64::from(config.bucket_minutes.max(1))))
        .with_label_format(config.label_format.clone())
        .with_retention(TimeDelta::days(i64::from(config.retention_days))))
}

fn default_samples_dir() -> Result<Utf8PathBuf> {
    let data_dir = BaseDirs::new().into_app_err("could not determine data directory")?.data_dir().join("repo-charts");
    Utf8PathBuf::from_path_buf(data_dir)
        .map_err(|path| app_err!("data directory '{}' is not valid UTF-8", path.display()))
}
