use nalgebra as na;
use thiserror::Error;

use crate::canvas::PenStyle;

/// Scalar type selected through the `f64` (default) and `f32` crate features.
#[cfg(all(feature = "f32", not(feature = "f64")))]
pub type Real = f32;
/// Scalar type selected through the `f64` (default) and `f32` crate features.
#[cfg(not(all(feature = "f32", not(feature = "f64"))))]
pub type Real = f64;

/// Default number of standard deviations, roughly a 95% region in 2D.
pub const DEFAULT_CONFIDENCE_STDS: f64 = 2.0;
/// Default number of boundary samples of a 2D ellipse.
pub const DEFAULT_NUM_SEGMENTS: usize = 20;
pub const DEFAULT_SLICES: usize = 10;
pub const DEFAULT_STACKS: usize = 10;
/// Smallest slice or stack count a 3D tessellation accepts.
pub const MIN_SLICES_STACKS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum ResolutionError {
    #[error("Number of segments must be positive, got {0}")]
    TooFewSegments(usize),

    #[error("Number of slices must be at least 3, got {0}")]
    TooFewSlices(usize),

    #[error("Number of stacks must be at least 3, got {0}")]
    TooFewStacks(usize),
}

/// Sampling density of an ellipse (`num_segments`) or ellipsoid (`slices`, `stacks`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Boundary samples of a 2D ellipse
    pub num_segments: usize,
    /// Latitude bands over [0, pi], poles included
    pub slices: usize,
    /// Longitude divisions over [0, 2pi)
    pub stacks: usize,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            num_segments: DEFAULT_NUM_SEGMENTS,
            slices: DEFAULT_SLICES,
            stacks: DEFAULT_STACKS,
        }
    }
}

impl Resolution {
    pub fn planar(num_segments: usize) -> Result<Self, ResolutionError> {
        let resolution = Self {
            num_segments,
            ..Self::default()
        };
        resolution.validate_planar()?;
        Ok(resolution)
    }

    pub fn spatial(slices: usize, stacks: usize) -> Result<Self, ResolutionError> {
        let resolution = Self {
            slices,
            stacks,
            ..Self::default()
        };
        resolution.validate_spatial()?;
        Ok(resolution)
    }

    pub fn validate_planar(&self) -> Result<(), ResolutionError> {
        if self.num_segments == 0 {
            return Err(ResolutionError::TooFewSegments(self.num_segments));
        }
        Ok(())
    }

    pub fn validate_spatial(&self) -> Result<(), ResolutionError> {
        if self.slices < MIN_SLICES_STACKS {
            return Err(ResolutionError::TooFewSlices(self.slices));
        }
        if self.stacks < MIN_SLICES_STACKS {
            return Err(ResolutionError::TooFewStacks(self.stacks));
        }
        Ok(())
    }
}

/// How [crate::Canvas::ellipse_gaussian] draws a confidence ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseStyle<F: na::RealField + Copy> {
    /// How many "sigmas" the ellipse spans (2 -> ~95%, 3 -> ~99.7% per axis)
    pub confidence_stds: F,
    /// Opaque color value handed to the canvas
    pub color: u32,
    /// Pen width in pixels
    pub width: u32,
    pub pen: PenStyle,
    /// Number of boundary points
    pub num_points: usize,
    /// Draw the segment from the last point back to the first
    pub closed: bool,
}

impl<F: na::RealField + Copy> Default for EllipseStyle<F> {
    fn default() -> Self {
        Self {
            confidence_stds: na::convert(DEFAULT_CONFIDENCE_STDS),
            color: 0x00FF_FFFF,
            width: 1,
            pen: PenStyle::Solid,
            num_points: DEFAULT_NUM_SEGMENTS,
            closed: false,
        }
    }
}
