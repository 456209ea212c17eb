use super::Host;
use super::common::write_warnings;
use crate::Result;
use crate::config::Config;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file [default: one of charts.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let config_path = args.config.as_ref();

    match Config::load(Utf8Path::new("."), config_path) {
        Ok((_, warnings)) => {
            let _ = writeln!(host.output(), "Configuration validation successful");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file given)");
            }

            write_warnings(host, &warnings);
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};
    use std::fs;

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(dir.path().to_string_lossy().to_string()).join(name)
    }

    #[test]
    fn test_default_config_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = temp_path(&dir, "charts.toml");

        let mut init_host = TestHost::default();
        init_config(&mut init_host, &InitArgs { output: config_path.clone() }).unwrap();
        assert!(init_host.output_str().contains("Generated default configuration file"));

        let mut host = TestHost::default();
        validate_config(&mut host, &ValidateArgs { config: Some(config_path) }).unwrap();

        assert!(host.output_str().contains("Configuration validation successful"));
        assert!(host.error_buf.is_empty());
        assert_eq!(host.exit_code, None);
    }

    #[test]
    fn test_default_config_matches_embedded() {
        let parsed: Config = toml::from_str(crate::config::DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(Config::default(), parsed);
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = temp_path(&dir, "broken.toml");
        fs::write(&config_path, "repos = [\"a/b\"\n").unwrap();

        let mut host = TestHost::default();
        let _ = validate_config(&mut host, &ValidateArgs { config: Some(config_path) }).unwrap_err();

        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_str().contains("Configuration validation failed"));
    }

    #[test]
    fn test_warnings_are_reported_but_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = temp_path(&dir, "charts.json");
        fs::write(&config_path, r#"{"repos": ["a/b", "a/b"]}"#).unwrap();

        let mut host = TestHost::default();
        validate_config(&mut host, &ValidateArgs { config: Some(config_path) }).unwrap();

        assert!(host.error_str().contains("listed more than once"));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();

        let mut host = TestHost::default();
        let _ = validate_config(
            &mut host,
            &ValidateArgs {
                config: Some(temp_path(&dir, "nope.toml")),
            },
        )
        .unwrap_err();

        assert_eq!(host.exit_code, Some(1));
    }
}
