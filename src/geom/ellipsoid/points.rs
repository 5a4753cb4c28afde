use nalgebra as na;

use crate::utils::AngleTable;

/// Number of samples produced by [ellipsoid_points]: one point per pole plus `stacks`
/// points for each of the `slices - 2` interior rings.
pub fn ellipsoid_point_count(slices: usize, stacks: usize) -> usize {
    stacks * slices.saturating_sub(2) + 2
}

/// Maps a sample of the unit circle/sphere onto the ellipse/ellipsoid surface.
#[inline]
fn map_to_surface<F: na::RealField + Copy, const D: usize>(
    shape: &na::SMatrix<F, D, D>,
    mean: &na::Point<F, D>,
    local: na::SVector<F, D>,
) -> na::Point<F, D> {
    mean + shape * local
}

/// Samples the boundary of a 2D ellipse.
///
/// Returns `num_segments` points at angles `k * 2pi / num_segments`, each
/// `mean + shape * (cos, sin)`. The interval is half-open: the last point does not repeat the
/// first, so a renderer has to close the loop itself.
///
/// # Panics
/// If `num_segments` is zero.
pub fn ellipse_points<F: na::RealField + Copy>(
    shape: &na::Matrix2<F>,
    mean: &na::Point2<F>,
    num_segments: usize,
) -> Vec<na::Point2<F>> {
    assert!(num_segments > 0, "an ellipse needs at least one segment");

    let points = AngleTable::<F>::full_turn(num_segments)
        .iter()
        .map(|(c, s)| map_to_surface(shape, mean, na::Vector2::new(c, s)))
        .collect::<Vec<_>>();

    log::trace!("sampled {} ellipse points", points.len());
    points
}

/// Samples the surface of a 3D ellipsoid on a slice/stack grid.
///
/// The layout is:
/// * index 0: the pole `mean + shape * (1, 0, 0)`,
/// * `slices - 2` rings of `stacks` points each, slice-major, where slice `i` sits at latitude
///   `pi * i / (slices - 1)` and stack `j` at longitude `2pi * j / stacks`,
/// * last index: the opposite pole `mean + shape * (-1, 0, 0)`.
///
/// # Panics
/// If `slices < 3` or `stacks < 3`.
pub fn ellipsoid_points<F: na::RealField + Copy>(
    shape: &na::Matrix3<F>,
    mean: &na::Point3<F>,
    slices: usize,
    stacks: usize,
) -> Vec<na::Point3<F>> {
    assert!(slices >= 3, "slices must be >= 3, got {}", slices);
    assert!(stacks >= 3, "stacks must be >= 3, got {}", stacks);

    let slice_angles = AngleTable::<F>::half_turn_inclusive(slices);
    let stack_angles = AngleTable::<F>::full_turn(stacks);

    let mut points = Vec::with_capacity(ellipsoid_point_count(slices, stacks));

    points.push(map_to_surface(
        shape,
        mean,
        na::Vector3::new(F::one(), F::zero(), F::zero()),
    ));

    for i in 1..slices - 1 {
        let x = slice_angles.cos(i);
        let radius = slice_angles.sin(i);
        points.extend(stack_angles.iter().map(|(c, s)| {
            map_to_surface(shape, mean, na::Vector3::new(x, radius * c, radius * s))
        }));
    }

    points.push(map_to_surface(
        shape,
        mean,
        na::Vector3::new(-F::one(), F::zero(), F::zero()),
    ));

    debug_assert_eq!(points.len(), ellipsoid_point_count(slices, stacks));
    log::trace!(
        "sampled {} ellipsoid points ({} slices, {} stacks)",
        points.len(),
        slices,
        stacks
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn sample_shape_2d() -> na::Matrix2<f64> {
        na::Matrix2::new(2.0, -0.5, 0.7, 1.2)
    }

    fn sample_shape_3d() -> na::Matrix3<f64> {
        na::Matrix3::new(1.5, 0.2, -0.3, 0.1, 2.0, 0.4, -0.2, 0.3, 0.8)
    }

    #[test]
    fn test_unit_circle_four_segments() {
        let points = ellipse_points(&na::Matrix2::<f64>::identity(), &na::Point2::origin(), 4);
        let expected = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];

        assert_eq!(points.len(), 4);
        for (p, (x, y)) in points.iter().zip(expected) {
            assert_relative_eq!(p.x, x, epsilon = 1e-6);
            assert_relative_eq!(p.y, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ellipse_count_and_uniform_spacing() {
        let shape = sample_shape_2d();
        let mean = na::Point2::new(3.0, -1.0);
        let inverse = shape.try_inverse().unwrap();

        for n in [1, 2, 3, 7, 20, 64] {
            let points = ellipse_points(&shape, &mean, n);
            assert_eq!(points.len(), n);

            for (k, p) in points.iter().enumerate() {
                // Back to the unit circle
                let local = inverse * (p - mean);
                assert_relative_eq!(local.norm(), 1.0, epsilon = 1e-9);

                let expected = 2.0 * PI * k as f64 / n as f64;
                let angle = local.y.atan2(local.x).rem_euclid(2.0 * PI);
                let diff = (angle - expected).rem_euclid(2.0 * PI);
                assert!(diff < 1e-9 || 2.0 * PI - diff < 1e-9, "k={} n={}", k, n);
            }
        }
    }

    #[test]
    fn test_last_point_does_not_close_loop() {
        let points = ellipse_points(&na::Matrix2::<f64>::identity(), &na::Point2::origin(), 20);
        let first = points.first().unwrap();
        let last = points.last().unwrap();
        assert!((first - last).norm() > 0.1);
    }

    #[test]
    #[should_panic]
    fn test_zero_segments_panics() {
        ellipse_points(&na::Matrix2::<f64>::identity(), &na::Point2::origin(), 0);
    }

    #[test]
    fn test_ellipsoid_count_and_poles() {
        let shape = sample_shape_3d();
        let mean = na::Point3::new(1.0, 2.0, 3.0);

        for slices in 3..8 {
            for stacks in 3..8 {
                let points = ellipsoid_points(&shape, &mean, slices, stacks);
                assert_eq!(points.len(), stacks * (slices - 2) + 2);
                assert_eq!(points.len(), ellipsoid_point_count(slices, stacks));

                let north = mean + shape * na::Vector3::new(1.0, 0.0, 0.0);
                let south = mean + shape * na::Vector3::new(-1.0, 0.0, 0.0);
                assert_relative_eq!(points[0], north, epsilon = 1e-12);
                assert_relative_eq!(points[points.len() - 1], south, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_unit_sphere_three_slices() {
        let points = ellipsoid_points(&na::Matrix3::<f64>::identity(), &na::Point3::origin(), 3, 4);
        assert_eq!(points.len(), 6);

        assert_relative_eq!(points[0], na::Point3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        let equator = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];
        for (p, (y, z)) in points[1..5].iter().zip(equator) {
            assert_relative_eq!(*p, na::Point3::new(0.0, y, z), epsilon = 1e-6);
        }
        assert_relative_eq!(points[5], na::Point3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_ellipsoid_slice_major_layout() {
        let (slices, stacks) = (6, 5);
        let points = ellipsoid_points(
            &na::Matrix3::<f64>::identity(),
            &na::Point3::origin(),
            slices,
            stacks,
        );

        for i in 1..slices - 1 {
            let latitude = PI * i as f64 / (slices - 1) as f64;
            for j in 0..stacks {
                let longitude = 2.0 * PI * j as f64 / stacks as f64;
                let p = points[1 + (i - 1) * stacks + j];
                assert_relative_eq!(p.x, latitude.cos(), epsilon = 1e-12);
                assert_relative_eq!(p.y, latitude.sin() * longitude.cos(), epsilon = 1e-12);
                assert_relative_eq!(p.z, latitude.sin() * longitude.sin(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_all_samples_lie_on_ellipsoid() {
        let shape = sample_shape_3d();
        let mean = na::Point3::new(-1.0, 0.5, 4.0);
        let inverse = shape.try_inverse().unwrap();

        for p in ellipsoid_points(&shape, &mean, 9, 12) {
            assert_relative_eq!((inverse * (p - mean)).norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    #[should_panic]
    fn test_too_few_slices_panics() {
        ellipsoid_points(&na::Matrix3::<f64>::identity(), &na::Point3::origin(), 2, 10);
    }

    #[test]
    #[should_panic]
    fn test_too_few_stacks_panics() {
        ellipsoid_points(&na::Matrix3::<f64>::identity(), &na::Point3::origin(), 10, 2);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let shape = sample_shape_3d();
        let mean = na::Point3::new(0.3, 0.2, 0.1);
        assert_eq!(
            ellipsoid_points(&shape, &mean, 7, 9),
            ellipsoid_points(&shape, &mean, 7, 9)
        );

        let shape = sample_shape_2d();
        let mean = na::Point2::new(0.3, 0.2);
        assert_eq!(
            ellipse_points(&shape, &mean, 33),
            ellipse_points(&shape, &mean, 33)
        );
    }

    #[test]
    fn test_translating_mean_translates_points() {
        let shape = sample_shape_3d();
        let mean = na::Point3::new(0.5, -0.5, 2.0);
        let delta = na::Vector3::new(10.0, -3.0, 0.25);

        let base = ellipsoid_points(&shape, &mean, 5, 6);
        let moved = ellipsoid_points(&shape, &(mean + delta), 5, 6);
        for (a, b) in base.iter().zip(&moved) {
            assert_relative_eq!(b - a, delta, epsilon = 1e-9);
        }

        let shape = sample_shape_2d();
        let mean = na::Point2::new(1.0, 1.0);
        let delta = na::Vector2::new(-7.0, 2.5);
        let base = ellipse_points(&shape, &mean, 16);
        let moved = ellipse_points(&shape, &(mean + delta), 16);
        for (a, b) in base.iter().zip(&moved) {
            assert_relative_eq!(b - a, delta, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_scaling_shape_scales_offsets() {
        let shape = sample_shape_3d();
        let mean = na::Point3::new(1.0, -2.0, 0.5);
        let s = 3.5;

        let base = ellipsoid_points(&shape, &mean, 6, 8);
        let scaled = ellipsoid_points(&(shape * s), &mean, 6, 8);
        for (a, b) in base.iter().zip(&scaled) {
            assert_relative_eq!(b - mean, (a - mean) * s, epsilon = 1e-9);
        }

        let shape = sample_shape_2d();
        let mean = na::Point2::new(4.0, 4.0);
        let base = ellipse_points(&shape, &mean, 12);
        let scaled = ellipse_points(&(shape * s), &mean, 12);
        for (a, b) in base.iter().zip(&scaled) {
            assert_relative_eq!(b - mean, (a - mean) * s, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_f32_points() {
        let points = ellipse_points(
            &na::Matrix2::<f32>::new(2.0, 0.0, 0.0, 1.0),
            &na::Point2::new(1.0, 1.0),
            4,
        );
        assert_relative_eq!(points[0], na::Point2::new(3.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(points[1], na::Point2::new(1.0, 2.0), epsilon = 1e-6);
    }
}
