use super::Host;
use super::common::{LogLevel, init_logging, load_config, sample_store, select_repos};
use crate::Result;
use crate::facts::{ChartDataClient, MetricsSource};
use crate::page::{Document, html};
use crate::renderer::{MetricsRenderer, RenderReport};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;
use url::Url;

const LOG_TARGET: &str = "    render";

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Path to configuration file [default: one of charts.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Base URL of the metrics server answering `/chartData` [default: from configuration]
    #[arg(long, value_name = "URL", conflicts_with = "samples")]
    pub endpoint: Option<String>,

    /// Compute chart data from the sample store in this directory instead of asking a server
    #[arg(long, value_name = "DIR")]
    pub samples: Option<Utf8PathBuf>,

    /// Where to write the dashboard page
    #[arg(long, short = 'o', value_name = "PATH", default_value = "charts.html")]
    pub output: Utf8PathBuf,

    /// Repository to chart, as `owner/name`; may be repeated [default: from configuration]
    #[arg(long = "repo", value_name = "ID")]
    pub repos: Vec<String>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Build the dashboard page, render a chart into every placeholder, and write the page out.
pub async fn render_charts<H: Host>(host: &mut H, args: &RenderArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = load_config(host, args.config.as_ref())?;
    let repos = select_repos(&args.repos, &config);
    let mut document = Document::for_repos(&config.title, &repos);

    let endpoint = if args.samples.is_some() {
        None
    } else {
        args.endpoint.as_ref().or(config.endpoint.as_ref())
    };

    let report = if let Some(endpoint) = endpoint {
        let url = Url::parse(endpoint).into_app_err_with(|| format!("invalid metrics endpoint '{endpoint}'"))?;
        log::info!(target: LOG_TARGET, "Rendering {} chart(s) from '{url}'", repos.len());
        render_with(ChartDataClient::new(url)?, &mut document).await
    } else {
        let store = sample_store(&config, args.samples.as_ref())?;
        log::info!(target: LOG_TARGET, "Rendering {} chart(s) from samples in '{}'", repos.len(), store.dir());
        render_with(store, &mut document).await
    };

    let mut page = String::new();
    html::generate(&document, &mut page)?;
    fs::write(&args.output, page).into_app_err_with(|| format!("writing dashboard to {}", args.output))?;

    write_summary(host, &report, repos.len(), &args.output);
    Ok(())
}

async fn render_with<S: MetricsSource>(source: S, document: &mut Document) -> RenderReport {
    MetricsRenderer::new(source).initialize(document).await
}

fn write_summary<H: Host>(host: &mut H, report: &RenderReport, placeholders: usize, output: &Utf8PathBuf) {
    let _ = writeln!(
        host.output(),
        "Rendered {} of {placeholders} chart(s) to {output}",
        report.rendered.len()
    );

    if report.is_clean() {
        return;
    }

    for (repo, e) in &report.failed {
        let _ = writeln!(host.error(), "  Could not render chart for '{repo}': {e:#}");
    }

    for rname in &report.unmounted {
        let _ = writeln!(host.error(), "  No element with id '{rname}' to mount its chart under");
    }
}
