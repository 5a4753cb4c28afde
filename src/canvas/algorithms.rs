//! Default drawing algorithms of [Canvas], expressed through `set_pixel` and `line` only.

use itertools::Itertools;
use nalgebra as na;

use super::{Canvas, PenStyle};
use crate::config::EllipseStyle;
use crate::geom::ellipsoid::points::ellipse_points;
use crate::math::covariance::{CovarianceError, CovarianceFactor};

/// Fewest and most segments used to approximate a circle.
const MIN_CIRCLE_SEGMENTS: usize = 8;
const MAX_CIRCLE_SEGMENTS: usize = 1024;

/// Visible pixel range of a canvas, in wide integers so that any `i32` arithmetic fits.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    width: i64,
    height: i64,
}

impl Bounds {
    fn of<C: Canvas + ?Sized>(canvas: &C) -> Self {
        Self {
            width: i64::try_from(canvas.width()).unwrap_or(i64::MAX),
            height: i64::try_from(canvas.height()).unwrap_or(i64::MAX),
        }
    }

    fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }
}

/// Square pen footprint of side `width`, extending `before` pixels towards negative
/// coordinates and `after` towards positive ones.
#[derive(Debug, Clone, Copy)]
struct Brush {
    before: i64,
    after: i64,
}

impl Brush {
    fn new(width: u32) -> Self {
        let width = i64::from(width.max(1));
        Self {
            before: (width - 1) / 2,
            after: width / 2,
        }
    }

    /// Paints the footprint centered on `(x, y)`, skipping pixels outside `bounds`.
    fn stamp<C: Canvas + ?Sized>(&self, canvas: &mut C, bounds: &Bounds, x: i64, y: i64, color: u32) {
        let xs = (x - self.before).max(0)..=(x + self.after).min(bounds.width - 1);
        let ys = (y - self.before).max(0)..=(y + self.after).min(bounds.height - 1);

        for py in ys {
            for px in xs.clone() {
                debug_assert!(bounds.contains(px, py));
                // In bounds, hence within i32
                canvas.set_pixel(px as i32, py as i32, color);
            }
        }
    }
}

/// `num / den` rounded half away from zero, `den > 0`.
fn div_round(num: i128, den: i128) -> i128 {
    if num >= 0 {
        (num + den / 2) / den
    } else {
        -((-num + den / 2) / den)
    }
}

/// Steps `k in [0, steps]` whose major coordinate `start + direction * k` lies in
/// `[low, high]`, or `None` if there are none.
fn visible_steps(start: i64, direction: i64, steps: i64, low: i64, high: i64) -> Option<(i64, i64)> {
    let (first, last) = match direction {
        0 if (low..=high).contains(&start) => (0, 0),
        0 => return None,
        1 => (low - start, high - start),
        _ => (start - high, start - low),
    };

    let (first, last) = (first.max(0), last.min(steps));
    (first <= last).then_some((first, last))
}

/// Rasterizes a line one pixel per step along its major axis, rounding the minor coordinate.
///
/// Only the steps whose pixels can reach the canvas are visited, so lines with end points
/// anywhere in the `i32` range cost at most one pass over the canvas. The pen pattern is
/// indexed by the step counted from `(x0, y0)` and is therefore unaffected by clipping.
#[allow(clippy::too_many_arguments)]
pub fn draw_line<C: Canvas + ?Sized>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: u32,
    width: u32,
    pen: PenStyle,
) {
    let bounds = Bounds::of(canvas);
    if bounds.is_empty() {
        return;
    }
    let brush = Brush::new(width);

    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let (dx, dy) = (x1 - x0, y1 - y0);
    let steps = dx.abs().max(dy.abs());

    let x_major = dx.abs() >= dy.abs();
    let (major_start, major_direction, major_extent) = if x_major {
        (x0, dx.signum(), bounds.width)
    } else {
        (y0, dy.signum(), bounds.height)
    };
    let (minor_start, minor_delta) = if x_major { (y0, dy) } else { (x0, dx) };

    let Some((first, last)) = visible_steps(
        major_start,
        major_direction,
        steps,
        -brush.after,
        major_extent - 1 + brush.before,
    ) else {
        return;
    };

    for k in first..=last {
        if !pen.is_on(k as u64) {
            continue;
        }

        let major = major_start + major_direction * k;
        let minor = minor_start
            + div_round(
                i128::from(k) * i128::from(minor_delta),
                i128::from(steps.max(1)),
            ) as i64;
        let (x, y) = if x_major { (major, minor) } else { (minor, major) };

        brush.stamp(canvas, &bounds, x, y, color);
    }
}

fn ordered(a: i32, b: i32) -> (i64, i64) {
    let (a, b) = (i64::from(a), i64::from(b));
    (a.min(b), a.max(b))
}

/// Outline drawn as nested rectangles of width 1, shrinking inwards, each made of four
/// [Canvas::line] calls.
///
/// Only the insets whose outline can cross the canvas are drawn: outer ones that enclose the
/// whole canvas are skipped, as are inner ones that no longer overlap it.
pub fn draw_rectangle<C: Canvas + ?Sized>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: u32,
    width: u32,
) {
    let bounds = Bounds::of(canvas);
    if bounds.is_empty() {
        return;
    }

    let (left, right) = ordered(x0, x1);
    let (top, bottom) = ordered(y0, y1);

    let first = [
        -left,
        right - (bounds.width - 1),
        -top,
        bottom - (bounds.height - 1),
    ]
    .into_iter()
    .min()
    .map_or(0, |inset| inset.max(0));
    let last = [
        i64::from(width.max(1)) - 1,
        (right - left) / 2,
        (bottom - top) / 2,
        bounds.width - 1 - left,
        right,
        bounds.height - 1 - top,
        bottom,
    ]
    .into_iter()
    .min()
    .unwrap_or(-1);

    for inset in first..=last {
        // Insets stay between the original corners, hence within i32
        let (l, r) = ((left + inset) as i32, (right - inset) as i32);
        let (t, b) = ((top + inset) as i32, (bottom - inset) as i32);
        canvas.line(l, t, r, t, color, 1, PenStyle::Solid);
        canvas.line(r, t, r, b, color, 1, PenStyle::Solid);
        canvas.line(r, b, l, b, color, 1, PenStyle::Solid);
        canvas.line(l, b, l, t, color, 1, PenStyle::Solid);
    }
}

pub fn fill_rectangle<C: Canvas + ?Sized>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: u32,
) {
    let bounds = Bounds::of(canvas);
    if bounds.is_empty() {
        return;
    }

    let (left, right) = ordered(x0, x1);
    let (top, bottom) = ordered(y0, y1);

    for y in top.max(0)..=bottom.min(bounds.height - 1) {
        for x in left.max(0)..=right.min(bounds.width - 1) {
            canvas.set_pixel(x as i32, y as i32, color);
        }
    }
}

/// Rounds a canvas coordinate to the nearest pixel, saturating at the `i32` range.
fn to_pixel<F: na::RealField + Copy>(value: F) -> i32 {
    let value: f64 = value.to_subset_unchecked();
    value.round() as i32
}

/// Joins consecutive points with [Canvas::line], plus the closing segment if `closed`.
fn draw_polyline<C: Canvas + ?Sized>(
    canvas: &mut C,
    pixels: &[(i32, i32)],
    closed: bool,
    color: u32,
    width: u32,
    pen: PenStyle,
) {
    for (&(x0, y0), &(x1, y1)) in pixels.iter().tuple_windows() {
        canvas.line(x0, y0, x1, y1, color, width, pen);
    }

    if closed && pixels.len() > 2 {
        if let (Some(&(x0, y0)), Some(&(x1, y1))) = (pixels.last(), pixels.first()) {
            canvas.line(x0, y0, x1, y1, color, width, pen);
        }
    }
}

/// Circle approximated by a closed polygon with about one vertex per pixel of circumference.
pub fn draw_circle<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: i32,
    y: i32,
    radius: i32,
    color: u32,
    width: u32,
) {
    let radius = f64::from(radius.unsigned_abs());
    if radius == 0.0 {
        canvas.line(x, y, x, y, color, width, PenStyle::Solid);
        return;
    }

    let segments = ((std::f64::consts::TAU * radius).ceil() as usize)
        .clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS);
    let shape = na::Matrix2::identity() * radius;
    let center = na::Point2::new(f64::from(x), f64::from(y));

    let pixels = ellipse_points(&shape, &center, segments)
        .into_iter()
        .map(|p| (to_pixel(p.x), to_pixel(p.y)))
        .collect_vec();

    draw_polyline(canvas, &pixels, true, color, width, PenStyle::Solid);
}

/// Confidence ellipse of a 2D Gaussian.
///
/// The covariance is factored into a shape matrix spanning `style.confidence_stds` standard
/// deviations, `style.num_points` boundary points are generated and consecutive points are
/// joined, giving `num_points - 1` lines. The segment from the last point back to the first is
/// only drawn when `style.closed` is set.
///
/// # Errors
/// Returns the factorization error before anything is drawn.
///
/// # Panics
/// If `style.num_points` is zero.
pub fn draw_ellipse_gaussian<Cv, F, C>(
    canvas: &mut Cv,
    covariance: &C,
    mean: &na::Point2<F>,
    style: &EllipseStyle<F>,
) -> Result<(), CovarianceError>
where
    Cv: Canvas + ?Sized,
    F: na::RealField + Copy,
    C: CovarianceFactor<F, 2>,
{
    let shape = covariance.shape_matrix(style.confidence_stds)?;

    let pixels = ellipse_points(&shape, mean, style.num_points)
        .into_iter()
        .map(|p| (to_pixel(p.x), to_pixel(p.y)))
        .collect_vec();

    draw_polyline(
        canvas,
        &pixels,
        style.closed,
        style.color,
        style.width,
        style.pen,
    );
    Ok(())
}
