//! Command dispatch logic for repo-charts

use super::{
    InitArgs, ObserveArgs, RenderArgs, SampleArgs, ValidateArgs, init_config, observe_org, render_charts, sample_repos, validate_config,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "repo-charts", author, version, long_about = None)]
#[command(about = "Chart contributor, watcher and star counts of GitHub repositories")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the chart dashboard to an HTML page
    Render(Box<RenderArgs>),
    /// Record current repository counts into the sample store
    Sample(Box<SampleArgs>),
    /// Check that the current repositories of an organization have a README
    Observe(Box<ObserveArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Render(render_args) => render_charts(host, render_args).await,
        Command::Sample(sample_args) => sample_repos(host, sample_args).await,
        Command::Observe(observe_args) => observe_org(host, observe_args).await,
        Command::Init(init_args) => init_config(host, init_args),
        Command::Validate(validate_args) => validate_config(host, validate_args),
    }
}
