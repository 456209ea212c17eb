use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::format::{Item, StrftimeItems};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Configuration file names searched for, in order, when no path is given
pub const CONFIG_CANDIDATES: [&str; 4] = ["charts.toml", "charts.yml", "charts.yaml", "charts.json"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Heading and title of the dashboard page
    #[serde(default = "default_title")]
    pub title: String,

    /// Base URL of the metrics server; charts come from the sample store when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Repositories to chart, as `owner/name`
    #[serde(default)]
    pub repos: Vec<String>,

    /// Number of days charts reach back
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Width of the sample buckets, in minutes
    #[serde(default = "default_bucket_minutes")]
    pub bucket_minutes: u32,

    /// chrono format string for bucket labels
    #[serde(default = "default_label_format")]
    pub label_format: String,

    /// Number of days recorded samples are kept
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Directory holding recorded samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples_dir: Option<Utf8PathBuf>,

    /// GitHub organization whose repositories `observe` checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

fn default_title() -> String {
    "Repository Metrics".to_string()
}

const fn default_lookback_days() -> u32 {
    14
}

const fn default_bucket_minutes() -> u32 {
    60
}

fn default_label_format() -> String {
    "%m/%d %I%p".to_string()
}

const fn default_retention_days() -> u32 {
    30
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, the first of [`CONFIG_CANDIDATES`] present in `base_dir` is used.
    /// Returns the configuration along with any validation warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<(Self, Vec<String>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading repo-charts configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let mut found = None;
            for path in CONFIG_CANDIDATES.iter().map(|name| base_dir.join(name)) {
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        found = Some((path, text));
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_app_err_with(|| format!("reading repo-charts configuration from {path}")),
                }
            }

            let Some(result) = found else {
                return Ok((Self::default(), Vec::new()));
            };
            result
        };

        let config = Self::parse(&final_path, &text)?;

        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        Ok((config, warnings))
    }

    fn parse(path: &Utf8Path, text: &str) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        let config = match extension {
            "toml" => toml::from_str(text).into_app_err_with(|| format!("parsing TOML configuration from {path}"))?,
            "yml" | "yaml" => serde_yaml::from_str(text).into_app_err_with(|| format!("parsing YAML configuration from {path}"))?,
            "json" => serde_json::from_str(text).into_app_err_with(|| format!("parsing JSON configuration from {path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Save the default configuration, keeping the comments of `default_config.toml` for TOML output
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        if output_path.extension() == Some("toml") {
            fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
            Ok(())
        } else {
            Self::default().save(output_path)
        }
    }

    /// Validate the configuration, collecting anything suspicious as warnings
    fn validate(&self, warnings: &mut Vec<String>) {
        if self.title.trim().is_empty() {
            warnings.push("title is empty".to_string());
        }

        if let Some(endpoint) = &self.endpoint {
            match Url::parse(endpoint) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => warnings.push(format!("endpoint '{endpoint}' uses unsupported scheme '{}'", url.scheme())),
                Err(e) => warnings.push(format!("endpoint '{endpoint}' is not a valid URL: {e}")),
            }
        }

        let mut seen = HashSet::new();
        for repo in &self.repos {
            if !is_well_formed_repo_id(repo) {
                warnings.push(format!("repository '{repo}' is not of the form 'owner/name'"));
            }
            if !seen.insert(repo.as_str()) {
                warnings.push(format!("repository '{repo}' is listed more than once"));
            }
        }

        if self.lookback_days == 0 {
            warnings.push("lookback_days is 0, charts will be empty".to_string());
        }

        if self.bucket_minutes == 0 {
            warnings.push("bucket_minutes must be greater than 0".to_string());
        }

        if self.label_format.is_empty() {
            warnings.push("label_format is empty, every label would be blank".to_string());
        } else if StrftimeItems::new(&self.label_format).any(|item| matches!(item, Item::Error)) {
            warnings.push(format!("label_format '{}' is not a valid chrono format string", self.label_format));
        }

        if let Some(org) = &self.organization
            && !is_well_formed_name(org)
        {
            warnings.push(format!("organization '{org}' is not a valid GitHub organization name"));
        }

        if self.retention_days < self.lookback_days {
            warnings.push(format!(
                "retention_days ({}) is shorter than lookback_days ({}), older chart buckets will always be empty",
                self.retention_days, self.lookback_days
            ));
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

fn is_well_formed_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn is_well_formed_repo_id(repo: &str) -> bool {
    let mut parts = repo.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if is_well_formed_name(owner) && is_well_formed_name(name)
    )
}
