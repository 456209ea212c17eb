use crate::charts::{Color, SeriesStyle};
use crate::metrics::{RepoMetrics, Series};

/// One line of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub series: Series,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub point_color: Color,
    pub point_stroke_color: Color,
    pub data: Vec<f64>,
}

impl Dataset {
    #[must_use]
    pub fn new(series: Series, data: Vec<f64>) -> Self {
        let style = SeriesStyle::for_series(series);
        Self {
            series,
            fill_color: style.fill,
            stroke_color: style.stroke,
            point_color: style.point,
            point_stroke_color: style.point_stroke,
            data,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.series.label()
    }
}

/// Shared category labels plus the datasets plotted against them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartConfig {
    /// Contributors, watchers and stars, always in that order.
    #[must_use]
    pub fn for_metrics(metrics: &RepoMetrics) -> Self {
        Self {
            labels: metrics.labels.clone(),
            datasets: Series::ALL
                .iter()
                .map(|&series| Dataset::new(series, metrics.series(series).to_vec()))
                .collect(),
        }
    }

    /// Largest finite value across all datasets, if any.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}
