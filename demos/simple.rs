use confidence_ellipsoids::{Canvas, EllipseStyle, GeneralizedEllipsoid, PenStyle, RasterCanvas};
use nalgebra as na;

fn main() -> Result<(), confidence_ellipsoids::Error> {
    let covariance = na::Matrix2::new(36.0, 12.0, 12.0, 16.0);
    let mean = na::Point2::new(30.0, 12.0);

    // 2-sigma ellipse drawn as a closed dashed loop
    let mut canvas = RasterCanvas::new(60, 24);
    canvas.rectangle(0, 0, 59, 23, 1, 1);
    canvas.ellipse_gaussian(
        &covariance,
        &mean,
        &EllipseStyle {
            pen: PenStyle::Dash,
            num_points: 40,
            closed: true,
            color: 2,
            ..Default::default()
        },
    )?;

    for row in canvas.pixels().chunks(canvas.width()) {
        let line: String = row
            .iter()
            .map(|&p| match p {
                1 => '#',
                2 => '*',
                _ => ' ',
            })
            .collect();
        println!("{}", line);
    }

    let ellipse = GeneralizedEllipsoid::from_covariance(&covariance, mean, 2.0)?;
    println!("semi-axes: {:?}", ellipse.semi_axes());
    println!("points: {}", ellipse.points().len());

    Ok(())
}
