//! A fixed-size drawing surface that holds its painted content as SVG markup.

use core::fmt::Write;
use plotters::coord::Shift;
use plotters::prelude::{DrawingArea, IntoDrawingArea, SVGBackend};

/// Width and height of every chart canvas, in pixels.
pub const CHART_CANVAS_SIZE: u32 = 500;

/// The 2D drawing context of a [`Canvas`]: a drawing area spanning the whole surface.
///
/// Painting is written back to the canvas once the context and everything derived from it are
/// dropped, or when it is explicitly presented.
pub type Context2d<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// A fixed-size drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    svg: String,
}

impl Canvas {
    /// A blank canvas of `width` by `height` pixels.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            svg: String::new(),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether anything has been painted yet.
    #[must_use]
    pub const fn is_painted(&self) -> bool {
        !self.svg.is_empty()
    }

    /// The painted SVG document, empty until the canvas is painted.
    #[must_use]
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Obtain the 2D drawing context for this canvas. Painting replaces earlier content.
    pub fn context_2d(&mut self) -> Context2d<'_> {
        let size = (self.width, self.height);
        self.svg.clear();
        SVGBackend::with_string(&mut self.svg, size).into_drawing_area()
    }

    /// Serialize the canvas as an inline SVG element.
    pub fn write_svg<W: Write>(&self, writer: &mut W) -> core::fmt::Result {
        if self.is_painted() {
            return writeln!(writer, "{}", self.svg.trim_end());
        }

        writeln!(
            writer,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\"></svg>",
            w = self.width,
            h = self.height
        )
    }
}
