//! Chart configuration and drawing.
//!
//! A [`ChartConfig`] holds the shared labels and the three datasets of a repository chart.
//! [`LineChart::draw`] paints a configuration through the [`Context2d`] of a [`Canvas`], whose
//! SVG content is later embedded in the page.

mod canvas;
mod chart_config;
mod colors;
mod line_chart;

pub use canvas::{CHART_CANVAS_SIZE, Canvas, Context2d};
pub use chart_config::{ChartConfig, Dataset};
pub use colors::{Color, SeriesStyle, WHITE};
pub use line_chart::{LineChart, Scale};
