use crate::Result;
use crate::charts::{ChartConfig, Color, Context2d, Dataset};
use ohno::IntoAppError;
use palette::Srgb;
use plotters::chart::ChartBuilder;
use plotters::element::Circle;
use plotters::series::{AreaSeries, LineSeries};
use plotters::style::{Color as _, FontTransform, IntoFont, RGBAColor, RGBColor, TRANSPARENT, WHITE};

const MARGIN: u32 = 10;
const X_LABEL_AREA_SIZE: u32 = 70;
const Y_LABEL_AREA_SIZE: u32 = 45;

const TARGET_Y_STEPS: f64 = 5.0;
const MAX_X_LABELS: usize = 12;

const POINT_RADIUS: i32 = 4;
const POINT_STROKE_WIDTH: u32 = 1;
const DATASET_STROKE_WIDTH: u32 = 2;

const SCALE_FONT: &str = "sans-serif";
const SCALE_FONT_SIZE: u32 = 12;
const GRID_COLOR: RGBAColor = RGBAColor(0, 0, 0, 0.05);
const SCALE_LINE_COLOR: RGBAColor = RGBAColor(0, 0, 0, 0.1);
const SCALE_FONT_COLOR: RGBColor = RGBColor(102, 102, 102);

/// Vertical scale of a chart: `steps` intervals of `step` starting at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub step: f64,
    pub steps: u32,
}

impl Scale {
    /// A zero-based scale covering `max` with a round step of 1, 2 or 5 times a power of ten.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "step counts are small")]
    #[expect(clippy::cast_sign_loss, reason = "step counts are positive")]
    pub fn for_max(max: Option<f64>) -> Self {
        let max = match max {
            Some(m) if m.is_finite() && m > 0.0 => m,
            _ => return Self { step: 1.0, steps: 1 },
        };

        let raw_step = max / TARGET_Y_STEPS;
        let magnitude = 10f64.powf(raw_step.log10().floor());
        let normalized = raw_step / magnitude;

        let step = if normalized <= 1.0 {
            magnitude
        } else if normalized <= 2.0 {
            2.0 * magnitude
        } else if normalized <= 5.0 {
            5.0 * magnitude
        } else {
            10.0 * magnitude
        };

        let steps = (max / step).ceil().max(1.0) as u32;
        Self { step, steps }
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.step * f64::from(self.steps)
    }

    /// Number of decimals needed to print tick values without float noise.
    #[expect(clippy::cast_possible_truncation, reason = "precision is a small count")]
    #[expect(clippy::cast_sign_loss, reason = "clamped to be non-negative")]
    fn precision(&self) -> usize {
        (-self.step.log10().floor()).max(0.0) as usize
    }
}

/// Paints a configuration as a line chart.
#[derive(Debug)]
pub struct LineChart;

impl LineChart {
    /// Draw `config` onto `ctx`, filling the whole surface.
    ///
    /// Labels sit at evenly spaced x positions; a single label is centered. Datasets shorter than
    /// the label list cover the leading labels only.
    pub fn draw(ctx: &Context2d<'_>, config: &ChartConfig) -> Result<()> {
        ctx.fill(&WHITE).into_app_err("could not clear the chart canvas")?;

        let count = config.labels.len();
        let scale = Scale::for_max(config.max_value());
        let precision = scale.precision();

        let mut chart = ChartBuilder::on(ctx)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA_SIZE)
            .y_label_area_size(Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(x_range(count), 0.0..scale.top())
            .into_app_err("could not lay out the chart")?;

        let x_label_formatter = |x: &f64| label_at(&config.labels, *x).unwrap_or_default().to_string();
        let y_label_formatter = |y: &f64| format!("{y:.precision$}");

        chart
            .configure_mesh()
            .x_labels(count.clamp(1, MAX_X_LABELS))
            .y_labels(scale.steps as usize + 1)
            .light_line_style(TRANSPARENT.stroke_width(0))
            .bold_line_style(GRID_COLOR.stroke_width(1))
            .axis_style(SCALE_LINE_COLOR.stroke_width(1))
            .x_label_style(
                (SCALE_FONT, SCALE_FONT_SIZE)
                    .into_font()
                    .transform(FontTransform::Rotate270)
                    .color(&SCALE_FONT_COLOR),
            )
            .y_label_style((SCALE_FONT, SCALE_FONT_SIZE).into_font().color(&SCALE_FONT_COLOR))
            .x_label_formatter(&x_label_formatter)
            .y_label_formatter(&y_label_formatter)
            .draw()
            .into_app_err("could not draw the chart scale")?;

        for dataset in &config.datasets {
            let points = dataset_points(dataset, count);
            if points.is_empty() {
                continue;
            }

            let _ = chart
                .draw_series(AreaSeries::new(points.iter().copied(), 0.0, plot_color(dataset.fill_color).filled()))
                .into_app_err_with(|| format!("could not fill the {} area", dataset.label()))?;

            let _ = chart
                .draw_series(LineSeries::new(
                    points.iter().copied(),
                    plot_color(dataset.stroke_color).stroke_width(DATASET_STROKE_WIDTH),
                ))
                .into_app_err_with(|| format!("could not draw the {} line", dataset.label()))?;

            let _ = chart
                .draw_series(
                    points
                        .iter()
                        .map(|&point| Circle::new(point, POINT_RADIUS, plot_color(dataset.point_color).filled())),
                )
                .into_app_err_with(|| format!("could not draw the {} points", dataset.label()))?;

            let _ = chart
                .draw_series(points.iter().map(|&point| {
                    Circle::new(
                        point,
                        POINT_RADIUS,
                        plot_color(dataset.point_stroke_color).stroke_width(POINT_STROKE_WIDTH),
                    )
                }))
                .into_app_err_with(|| format!("could not outline the {} points", dataset.label()))?;
        }

        ctx.present().into_app_err("could not finish painting the chart")?;
        Ok(())
    }
}

/// X coordinates run from the first label at 0 to the last at `count - 1`.
#[expect(clippy::cast_precision_loss, reason = "label counts are small")]
fn x_range(count: usize) -> core::ops::Range<f64> {
    if count <= 1 { -1.0..1.0 } else { 0.0..(count - 1) as f64 }
}

/// The label drawn at x position `x`, if `x` falls on one.
#[expect(clippy::cast_possible_truncation, reason = "rounded and range checked")]
#[expect(clippy::cast_sign_loss, reason = "negative positions are rejected first")]
fn label_at(labels: &[String], x: f64) -> Option<&str> {
    let index = x.round();
    if index < 0.0 || (x - index).abs() > 1e-6 {
        return None;
    }
    labels.get(index as usize).map(String::as_str)
}

#[expect(clippy::cast_precision_loss, reason = "label counts are small")]
fn dataset_points(dataset: &Dataset, count: usize) -> Vec<(f64, f64)> {
    dataset
        .data
        .iter()
        .take(count)
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

fn plot_color(color: Color) -> RGBAColor {
    let Srgb { red, green, blue, .. } = color.0.color;
    RGBAColor(red, green, blue, f64::from(color.alpha()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{CHART_CANVAS_SIZE, Canvas};
    use crate::metrics::RepoMetrics;

    fn draw(metrics: &RepoMetrics) -> Canvas {
        let mut canvas = Canvas::new(CHART_CANVAS_SIZE, CHART_CANVAS_SIZE);
        let config = ChartConfig::for_metrics(metrics);
        LineChart::draw(&canvas.context_2d(), &config).unwrap();
        canvas
    }

    #[test]
    fn test_scale_steps() {
        assert_eq!(Scale::for_max(Some(6.0)), Scale { step: 2.0, steps: 3 });
        assert_eq!(Scale::for_max(Some(5.0)), Scale { step: 1.0, steps: 5 });
        assert_eq!(Scale::for_max(Some(1234.0)), Scale { step: 500.0, steps: 3 });
        assert_eq!(Scale::for_max(Some(0.0)), Scale { step: 1.0, steps: 1 });
        assert_eq!(Scale::for_max(None), Scale { step: 1.0, steps: 1 });
        assert_eq!(Scale::for_max(Some(f64::NAN)), Scale { step: 1.0, steps: 1 });
    }

    #[test]
    fn test_scale_precision() {
        assert_eq!(Scale { step: 0.2, steps: 5 }.precision(), 1);
        assert_eq!(Scale { step: 50.0, steps: 5 }.precision(), 0);
    }

    #[test]
    fn test_label_positions() {
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(label_at(&labels, 0.0), Some("a"));
        assert_eq!(label_at(&labels, 2.0), Some("c"));
        assert_eq!(label_at(&labels, 0.5), None);
        assert_eq!(label_at(&labels, -1.0), None);
        assert_eq!(label_at(&labels, 3.0), None);

        assert_eq!(x_range(0), -1.0..1.0);
        assert_eq!(x_range(1), -1.0..1.0);
        assert_eq!(x_range(4), 0.0..3.0);
    }

    #[test]
    fn test_dataset_points_cover_leading_labels() {
        let dataset = Dataset::new(crate::metrics::Series::Stars, vec![1.0, f64::NAN, 3.0, 4.0]);
        assert_eq!(dataset_points(&dataset, 3), vec![(0.0, 1.0), (2.0, 3.0)]);
        assert!(dataset_points(&dataset, 0).is_empty());
    }

    #[test]
    fn test_plot_color_keeps_alpha() {
        assert_eq!(plot_color(Color::rgba(80, 100, 200, 0.5)), RGBAColor(80, 100, 200, 0.5));
    }

    #[test]
    fn test_draws_two_circles_per_value_per_series() {
        let metrics = RepoMetrics::new("r", vec!["Jan".into(), "Feb".into()], vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]).unwrap();
        let canvas = draw(&metrics);

        // A filled point plus its white outline, for 2 values in 3 series
        assert_eq!(canvas.svg().matches("<circle").count(), 12);
        assert!(canvas.svg().contains("width=\"500\" height=\"500\""));
        assert!(canvas.svg().contains("Jan"));
        assert!(canvas.svg().contains("Feb"));
    }

    #[test]
    fn test_empty_chart_draws_only_scale() {
        let metrics = RepoMetrics::new("r", Vec::new(), Vec::new(), Vec::new(), Vec::new()).unwrap();
        let canvas = draw(&metrics);

        assert!(canvas.is_painted());
        assert!(!canvas.svg().contains("<circle"));
    }

    #[test]
    fn test_crowded_labels_are_thinned() {
        let len = 14 * 24;
        let labels: Vec<String> = (0..len).map(|i| format!("L{i:03}")).collect();
        let zeros = vec![0.0; len];
        let metrics = RepoMetrics::new("r", labels.clone(), zeros.clone(), zeros.clone(), zeros).unwrap();
        let canvas = draw(&metrics);

        let shown = labels.iter().filter(|l| canvas.svg().contains(l.as_str())).count();
        assert!(shown > 0);
        assert!(shown <= MAX_X_LABELS + 1);
    }
}
