use crate::metrics::Series;
use core::fmt::{Display, Formatter};
use palette::{Alpha, Srgb};

/// An sRGB color with a straight alpha channel, rendered as CSS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Alpha<Srgb<u8>, f32>);

impl Color {
    #[must_use]
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self(Alpha {
            color: Srgb::new(red, green, blue),
            alpha,
        })
    }

    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Opacity from 0 (transparent) to 1 (opaque).
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.0.alpha
    }

    /// Whether painting with this color leaves no visible trace.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.0.alpha <= 0.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let Srgb { red, green, blue, .. } = self.0.color;
        if self.0.alpha >= 1.0 {
            write!(f, "#{red:02x}{green:02x}{blue:02x}")
        } else {
            write!(f, "rgba({red},{green},{blue},{})", self.0.alpha)
        }
    }
}

pub const WHITE: Color = Color::rgb(255, 255, 255);

/// Paint colors of one dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub fill: Color,
    pub stroke: Color,
    pub point: Color,
    pub point_stroke: Color,
}

impl SeriesStyle {
    /// Translucent stroke and points over a fully transparent fill, with white point borders.
    const fn translucent(red: u8, green: u8, blue: u8) -> Self {
        Self {
            fill: Color::rgba(red, green, blue, 0.0),
            stroke: Color::rgba(red, green, blue, 0.5),
            point: Color::rgba(red, green, blue, 0.5),
            point_stroke: WHITE,
        }
    }

    /// The fixed style of a series; independent of the data drawn with it.
    #[must_use]
    pub const fn for_series(series: Series) -> Self {
        match series {
            Series::Contributors => Self::translucent(80, 100, 200),
            Series::Watchers => Self::translucent(100, 200, 80),
            Series::Stars => Self::translucent(200, 60, 60),
        }
    }
}
