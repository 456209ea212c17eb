//! Finds chart placeholders in a page, requests their metrics, and mounts a chart for each response.
//!
//! Every placeholder gets its request issued up front, so all requests are in flight together.
//! Responses are then handled one at a time, in whatever order they complete, on the task driving
//! [`MetricsRenderer::initialize`]. Only that task ever touches the document.

use crate::Result;
use crate::charts::{CHART_CANVAS_SIZE, Canvas, ChartConfig, LineChart};
use crate::facts::MetricsSource;
use crate::metrics::RepoMetrics;
use crate::page::{CHART_PLACEHOLDER_CLASSES, Document, Node};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use ohno::{AppError, EnrichableExt};

const LOG_TARGET: &str = "  renderer";

/// What happened to each placeholder during [`MetricsRenderer::initialize`].
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Mount points that received a chart, in completion order.
    pub rendered: Vec<String>,

    /// Requested repositories whose request, payload, or painting failed.
    pub failed: Vec<(String, AppError)>,

    /// `rname` values of charts that were drawn but had no element to mount under.
    pub unmounted: Vec<String>,
}

impl RenderReport {
    /// Number of responses handled.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failed.len() + self.unmounted.len()
    }

    /// Whether every handled response ended up as a mounted chart.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.unmounted.is_empty()
    }
}

/// A chart produced by [`build_chart`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltChart {
    /// The configuration the chart was painted with.
    pub config: ChartConfig,

    /// Whether an element with id `rname` existed to receive the canvas.
    pub mounted: bool,
}

/// Drives chart rendering for a page against a [`MetricsSource`].
#[derive(Debug, Clone)]
pub struct MetricsRenderer<S> {
    source: S,
}

impl<S: MetricsSource> MetricsRenderer<S> {
    /// A renderer requesting metrics from `source`.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// The source metrics are requested from.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Request metrics for every chart placeholder in `document` and mount a chart per response.
    ///
    /// Failures are logged and listed in the returned report; none of them stop the other charts.
    pub async fn initialize(&self, document: &mut Document) -> RenderReport {
        let repos: Vec<String> = document
            .elements_with_classes(&CHART_PLACEHOLDER_CLASSES)
            .into_iter()
            .map(|element| element.id().unwrap_or_default().to_string())
            .collect();

        log::info!(target: LOG_TARGET, "Requesting metrics for {} chart placeholder(s)", repos.len());

        let mut pending: FuturesUnordered<_> = repos
            .into_iter()
            .map(|repo| async move {
                let result = self.source.fetch(&repo).await;
                (repo, result)
            })
            .collect();

        let mut report = RenderReport::default();
        while let Some((repo, result)) = pending.next().await {
            match result.and_then(|metrics| on_metrics_received(document, &metrics).map(|chart| (metrics.rname, chart))) {
                Ok((rname, chart)) => {
                    if chart.mounted {
                        report.rendered.push(rname);
                    } else {
                        report.unmounted.push(rname);
                    }
                }
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Could not render chart for '{repo}': {e:#}");
                    report.failed.push((repo, e));
                }
            }
        }

        log::info!(
            target: LOG_TARGET,
            "Rendered {} chart(s), {} failed, {} without a mount point",
            report.rendered.len(),
            report.failed.len(),
            report.unmounted.len()
        );

        report
    }
}

/// Handle one successful metrics response.
pub fn on_metrics_received(document: &mut Document, metrics: &RepoMetrics) -> Result<BuiltChart> {
    build_chart(document, metrics, None)
}

/// Paint `metrics` as a line chart on a new canvas and append it to the element whose id is
/// `metrics.rname`.
///
/// `_parent_container` is accepted for call compatibility and never consulted; the mount point is
/// always found through `rname`. Without a matching element the canvas is painted and dropped.
pub fn build_chart(document: &mut Document, metrics: &RepoMetrics, _parent_container: Option<&str>) -> Result<BuiltChart> {
    let config = ChartConfig::for_metrics(metrics);

    let mut canvas = Canvas::new(CHART_CANVAS_SIZE, CHART_CANVAS_SIZE);
    LineChart::draw(&canvas.context_2d(), &config).map_err(|e| e.enrich_with(|| format!("could not paint the chart for '{}'", metrics.rname)))?;

    let mounted = if let Some(mount) = document.element_by_id_mut(&metrics.rname) {
        mount.append_child(Node::Canvas(canvas));
        log::debug!(target: LOG_TARGET, "Mounted chart for '{}' with {} label(s)", metrics.rname, config.labels.len());
        true
    } else {
        log::warn!(target: LOG_TARGET, "No element with id '{}' to mount its chart under", metrics.rname);
        false
    };

    Ok(BuiltChart { config, mounted })
}
