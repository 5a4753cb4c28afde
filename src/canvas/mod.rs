//! A minimal raster drawing surface.
//!
//! [Canvas] has three mandatory primitives (`set_pixel`, `width`, `height`). Every other
//! operation has a default implementation in [algorithms] built on those primitives, which a
//! backend may override when it can do better.
//!
//! Contracts shared by every implementation:
//! * `set_pixel` accepts any coordinates and silently ignores those outside
//!   `[0, width) x [0, height)`.
//! * Drawing operations never fail on out-of-canvas geometry; the visible part is drawn and
//!   the rest is clipped.
//! * Colors are opaque `u32` values handed through to `set_pixel`.
//! * A pen `width` of 0 is drawn like a width of 1.

pub mod algorithms;
pub mod raster;

pub use raster::RasterCanvas;

use nalgebra as na;

use crate::config::EllipseStyle;
use crate::math::covariance::{CovarianceError, CovarianceFactor};

const X: bool = true;
const O: bool = false;

/// Periodic on/off pattern applied along a rasterized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenStyle {
    #[default]
    Solid,
    /// `------   ------`
    Dash,
    /// `. . . . .`
    Dot,
    /// `------  .  ------`
    DashDot,
    /// `------  . .  ------`
    DashDotDot,
}

impl PenStyle {
    fn pattern(self) -> &'static [bool] {
        match self {
            PenStyle::Solid => &[X],
            PenStyle::Dash => &[X, X, X, X, X, X, O, O, O],
            PenStyle::Dot => &[X, O],
            PenStyle::DashDot => &[X, X, X, X, X, X, O, O, X, O, O],
            PenStyle::DashDotDot => &[X, X, X, X, X, X, O, O, X, O, X, O, O],
        }
    }

    /// Whether the `step`-th pixel of a line, counted from its start point, is drawn.
    pub fn is_on(self, step: u64) -> bool {
        let pattern = self.pattern();
        pattern[(step % pattern.len() as u64) as usize]
    }
}

/// Anything accepting 2D drawing primitives.
pub trait Canvas {
    /// Sets pixel `(x, y)`, origin at the top-left corner. Coordinates outside the canvas must
    /// be ignored without panicking.
    fn set_pixel(&mut self, x: i32, y: i32, color: u32);

    /// Width in pixels
    fn width(&self) -> usize;

    /// Height in pixels
    fn height(&self) -> usize;

    /// Draws a line between two (inclusive) end points.
    #[allow(clippy::too_many_arguments)]
    fn line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: u32,
        width: u32,
        pen: PenStyle,
    ) {
        algorithms::draw_line(self, x0, y0, x1, y1, color, width, pen);
    }

    /// Draws the outline of the rectangle spanned by two opposite corners; `width` grows it
    /// inwards.
    fn rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32, width: u32) {
        algorithms::draw_rectangle(self, x0, y0, x1, y1, color, width);
    }

    /// Fills the rectangle spanned by two opposite corners, both inclusive.
    fn filled_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        algorithms::fill_rectangle(self, x0, y0, x1, y1, color);
    }

    fn circle(&mut self, x: i32, y: i32, radius: i32, color: u32, width: u32) {
        algorithms::draw_circle(self, x, y, radius, color, width);
    }

    /// Draws the confidence ellipse of a 2D Gaussian with the given covariance and mean.
    ///
    /// Nothing is drawn if the covariance cannot be factored.
    fn ellipse_gaussian<F, C>(
        &mut self,
        covariance: &C,
        mean: &na::Point2<F>,
        style: &EllipseStyle<F>,
    ) -> Result<(), CovarianceError>
    where
        Self: Sized,
        F: na::RealField + Copy,
        C: CovarianceFactor<F, 2>,
    {
        algorithms::draw_ellipse_gaussian(self, covariance, mean, style)
    }
}
