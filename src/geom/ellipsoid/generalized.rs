use nalgebra as na;

use super::points::{ellipse_points, ellipsoid_points};
use super::wireframe::Wireframe;
use crate::config::{Resolution, ResolutionError};
use crate::math::covariance::{CovarianceError, CovarianceFactor};

/// A rendering backend accepting line segments, e.g. a thin wrapper around a GPU line list.
///
/// The backend owns its context and blending state; it only receives geometry.
pub trait LineRenderer<F: na::RealField + Copy, const D: usize> {
    fn draw_segments(&mut self, segments: &[[na::Point<F, D>; 2]], line_width: F);
}

/// Confidence ellipse (`D = 2`) or ellipsoid (`D = 3`) of a Gaussian distribution.
///
/// Keeps the unit-confidence shape matrix so that changing the number of standard deviations
/// (`quantiles`) is a rescale and does not need another eigen-decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralizedEllipsoid<F: na::RealField + Copy, const D: usize> {
    mean: na::Point<F, D>,
    /// Shape matrix for one standard deviation
    unit_shape: na::SMatrix<F, D, D>,
    quantiles: F,
    line_width: F,
    resolution: Resolution,
}

impl<F: na::RealField + Copy, const D: usize> GeneralizedEllipsoid<F, D> {
    /// Wraps a shape matrix computed elsewhere; it is used as-is, with `quantiles = 1`.
    pub fn from_shape(shape: na::SMatrix<F, D, D>, mean: na::Point<F, D>) -> Self {
        Self {
            mean,
            unit_shape: shape,
            quantiles: F::one(),
            line_width: F::one(),
            resolution: Resolution::default(),
        }
    }

    /// Builds the ellipsoid spanning `quantiles` standard deviations of `covariance`.
    pub fn from_covariance<C: CovarianceFactor<F, D>>(
        covariance: &C,
        mean: na::Point<F, D>,
        quantiles: F,
    ) -> Result<Self, CovarianceError> {
        check_quantiles(quantiles)?;
        let unit_shape = covariance.shape_matrix(F::one())?;
        log::debug!("ellipsoid configured from covariance {:?}", covariance);

        Ok(Self {
            quantiles,
            ..Self::from_shape(unit_shape, mean)
        })
    }

    /// Replaces covariance and mean, keeping the current quantiles. On error the ellipsoid is
    /// left untouched.
    pub fn set_covariance<C: CovarianceFactor<F, D>>(
        &mut self,
        covariance: &C,
        mean: na::Point<F, D>,
    ) -> Result<(), CovarianceError> {
        self.unit_shape = covariance.shape_matrix(F::one())?;
        self.mean = mean;
        log::debug!("ellipsoid covariance updated to {:?}", covariance);
        Ok(())
    }

    pub fn set_quantiles(&mut self, quantiles: F) -> Result<(), CovarianceError> {
        check_quantiles(quantiles)?;
        self.quantiles = quantiles;
        Ok(())
    }

    pub fn set_line_width(&mut self, line_width: F) {
        self.line_width = line_width;
    }

    pub fn mean(&self) -> &na::Point<F, D> {
        &self.mean
    }

    pub fn quantiles(&self) -> F {
        self.quantiles
    }

    pub fn line_width(&self) -> F {
        self.line_width
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Shape matrix at the configured quantiles.
    pub fn shape(&self) -> na::SMatrix<F, D, D> {
        self.unit_shape * self.quantiles
    }

    /// Covariance implied by the unit shape matrix, `U * U^T`.
    pub fn covariance(&self) -> na::SMatrix<F, D, D> {
        self.unit_shape * self.unit_shape.transpose()
    }

    /// Lengths of the principal semi-axes at the configured quantiles, one per shape column.
    pub fn semi_axes(&self) -> na::SVector<F, D> {
        let shape = self.shape();
        na::SVector::<F, D>::from_fn(|i, _| shape.column(i).norm())
    }

    fn render_wireframe<R: LineRenderer<F, D>>(&self, wireframe: &Wireframe<F, D>, renderer: &mut R) {
        let segments = wireframe
            .segments()
            .map(|(a, b)| [*a, *b])
            .collect::<Vec<_>>();
        renderer.draw_segments(&segments, self.line_width);
    }
}

impl<F: na::RealField + Copy> GeneralizedEllipsoid<F, 2> {
    /// Only `num_segments` is used in 2D.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), ResolutionError> {
        resolution.validate_planar()?;
        self.resolution = resolution;
        Ok(())
    }

    pub fn points(&self) -> Vec<na::Point2<F>> {
        ellipse_points(&self.shape(), &self.mean, self.resolution.num_segments)
    }

    /// Closed outline of the ellipse.
    pub fn wireframe(&self) -> Wireframe<F, 2> {
        Wireframe::line_loop(self.points())
    }

    pub fn render<R: LineRenderer<F, 2>>(&self, renderer: &mut R) {
        self.render_wireframe(&self.wireframe(), renderer);
    }
}

impl<F: na::RealField + Copy> GeneralizedEllipsoid<F, 3> {
    /// Only `slices` and `stacks` are used in 3D.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), ResolutionError> {
        resolution.validate_spatial()?;
        self.resolution = resolution;
        Ok(())
    }

    pub fn points(&self) -> Vec<na::Point3<F>> {
        ellipsoid_points(
            &self.shape(),
            &self.mean,
            self.resolution.slices,
            self.resolution.stacks,
        )
    }

    pub fn wireframe(&self) -> Wireframe<F, 3> {
        Wireframe::spatial(
            self.points(),
            self.resolution.slices,
            self.resolution.stacks,
        )
    }

    pub fn render<R: LineRenderer<F, 3>>(&self, renderer: &mut R) {
        self.render_wireframe(&self.wireframe(), renderer);
    }
}

fn check_quantiles<F: na::RealField + Copy>(quantiles: F) -> Result<(), CovarianceError> {
    if !quantiles.is_finite() || quantiles <= F::zero() {
        return Err(CovarianceError::InvalidConfidence(
            quantiles.to_subset_unchecked(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ellipsoid::wireframe::expected_edge_count;
    use anyhow::Result;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct RecordingRenderer<const D: usize> {
        calls: Vec<(Vec<[na::Point<f64, D>; 2]>, f64)>,
    }

    impl<const D: usize> LineRenderer<f64, D> for RecordingRenderer<D> {
        fn draw_segments(&mut self, segments: &[[na::Point<f64, D>; 2]], line_width: f64) {
            self.calls.push((segments.to_vec(), line_width));
        }
    }

    #[test]
    fn test_from_covariance_2d() -> Result<()> {
        let cov = na::Matrix2::new(4.0, 1.0, 1.0, 2.0);
        let ellipse = GeneralizedEllipsoid::from_covariance(&cov, na::Point2::new(1.0, -1.0), 3.0)?;

        assert_relative_eq!(ellipse.covariance(), cov, epsilon = 1e-9);
        let shape = ellipse.shape();
        assert_relative_eq!(shape * shape.transpose(), cov * 9.0, epsilon = 1e-9);
        assert_eq!(ellipse.quantiles(), 3.0);
        assert_eq!(ellipse.mean(), &na::Point2::new(1.0, -1.0));
        Ok(())
    }

    #[test]
    fn test_semi_axes() -> Result<()> {
        let cov = na::Matrix3::new(9.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 4.0);
        let ellipsoid = GeneralizedEllipsoid::from_covariance(&cov, na::Point3::origin(), 2.0)?;

        assert_relative_eq!(
            ellipsoid.semi_axes(),
            na::Vector3::new(2.0, 4.0, 6.0),
            epsilon = 1e-9
        );
        Ok(())
    }

    #[test]
    fn test_set_quantiles_rescales() -> Result<()> {
        let cov = na::Matrix2::new(2.0, 0.3, 0.3, 1.0);
        let mut ellipse = GeneralizedEllipsoid::from_covariance(&cov, na::Point2::origin(), 1.0)?;
        let before = ellipse.points();

        ellipse.set_quantiles(2.5)?;
        for (a, b) in before.iter().zip(ellipse.points()) {
            assert_relative_eq!(b.coords, a.coords * 2.5, epsilon = 1e-9);
        }

        assert!(matches!(
            ellipse.set_quantiles(-1.0),
            Err(CovarianceError::InvalidConfidence(_))
        ));
        assert_eq!(ellipse.quantiles(), 2.5);
        Ok(())
    }

    #[test]
    fn test_rejected_covariance_keeps_state() -> Result<()> {
        let mut ellipse = GeneralizedEllipsoid::from_covariance(
            &na::Matrix2::<f64>::identity(),
            na::Point2::new(5.0, 5.0),
            2.0,
        )?;
        let snapshot = ellipse.clone();

        let result = ellipse.set_covariance(&na::Matrix2::new(1.0, 0.0, 0.0, -2.0), na::Point2::origin());
        assert!(matches!(
            result,
            Err(CovarianceError::NotPositiveSemiDefinite { .. })
        ));
        assert_eq!(ellipse, snapshot);
        Ok(())
    }

    #[test]
    fn test_from_covariance_rejects_bad_quantiles() {
        let result = GeneralizedEllipsoid::from_covariance(
            &na::Matrix3::<f64>::identity(),
            na::Point3::origin(),
            f64::NAN,
        );
        assert!(matches!(result, Err(CovarianceError::InvalidConfidence(_))));
    }

    #[test]
    fn test_resolution_per_dimension() {
        let mut ellipse = GeneralizedEllipsoid::from_shape(na::Matrix2::<f64>::identity(), na::Point2::origin());
        assert_eq!(
            ellipse.set_resolution(Resolution { num_segments: 0, ..Resolution::default() }),
            Err(ResolutionError::TooFewSegments(0))
        );
        // Slices are irrelevant for an ellipse
        assert!(ellipse
            .set_resolution(Resolution { num_segments: 8, slices: 0, stacks: 0 })
            .is_ok());
        assert_eq!(ellipse.points().len(), 8);

        let mut ellipsoid = GeneralizedEllipsoid::from_shape(na::Matrix3::<f64>::identity(), na::Point3::origin());
        assert_eq!(
            ellipsoid.set_resolution(Resolution { slices: 2, ..Resolution::default() }),
            Err(ResolutionError::TooFewSlices(2))
        );
        assert_eq!(ellipsoid.resolution(), Resolution::default());
    }

    #[test]
    fn test_render_planar_closes_loop() -> Result<()> {
        let mut ellipse = GeneralizedEllipsoid::from_shape(na::Matrix2::<f64>::identity(), na::Point2::origin());
        ellipse.set_resolution(Resolution::planar(4)?)?;
        ellipse.set_line_width(2.0);

        let mut renderer = RecordingRenderer::<2>::default();
        ellipse.render(&mut renderer);

        assert_eq!(renderer.calls.len(), 1);
        let (segments, width) = &renderer.calls[0];
        assert_eq!(*width, 2.0);
        assert_eq!(segments.len(), 4);
        assert_relative_eq!(segments[3][0], na::Point2::new(0.0, -1.0), epsilon = 1e-9);
        assert_relative_eq!(segments[3][1], na::Point2::new(1.0, 0.0), epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_render_spatial() -> Result<()> {
        let cov = na::Matrix3::new(2.0, 0.1, 0.0, 0.1, 1.0, 0.2, 0.0, 0.2, 0.5);
        let mut ellipsoid = GeneralizedEllipsoid::from_covariance(&cov, na::Point3::new(1.0, 2.0, 3.0), 2.0)?;
        ellipsoid.set_resolution(Resolution::spatial(6, 9)?)?;

        let mut renderer = RecordingRenderer::<3>::default();
        ellipsoid.render(&mut renderer);

        let (segments, width) = &renderer.calls[0];
        assert_eq!(*width, 1.0);
        assert_eq!(segments.len(), expected_edge_count(6, 9));
        assert_eq!(ellipsoid.wireframe().vertices.len(), 9 * 4 + 2);
        Ok(())
    }
}
