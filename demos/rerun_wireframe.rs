use anyhow::Result;
use confidence_ellipsoids::{GeneralizedEllipsoid, LineRenderer, Resolution};
use nalgebra as na;
use rerun as rr;

/// Logs each batch of segments as line strips under one entity path.
struct RerunLines<'a> {
    rec: &'a rr::RecordingStream,
    path: String,
    color: rr::Color,
}

impl LineRenderer<f32, 3> for RerunLines<'_> {
    fn draw_segments(&mut self, segments: &[[na::Point3<f32>; 2]], line_width: f32) {
        let strips = segments
            .iter()
            .map(|[a, b]| [[a.x, a.y, a.z], [b.x, b.y, b.z]]);

        if let Err(err) = self.rec.log(
            self.path.as_str(),
            &rr::LineStrips3D::new(strips)
                .with_colors([self.color])
                .with_radii([line_width * 0.005]),
        ) {
            log::warn!("failed to log {}: {}", self.path, err);
        }
    }
}

fn main() -> Result<()> {
    let rec = rr::RecordingStreamBuilder::new("confidence_ellipsoids").spawn()?;

    let covariance = na::Matrix3::new(
        4.0f32, 1.0, 0.5, //
        1.0, 2.0, 0.3, //
        0.5, 0.3, 1.0,
    );
    let mean = na::Point3::new(0.0, 0.0, 0.0);

    for (quantiles, color) in [
        (1.0, rr::Color::from_rgb(0, 255, 0)),
        (2.0, rr::Color::from_rgb(255, 200, 0)),
        (3.0, rr::Color::from_rgb(255, 0, 0)),
    ] {
        let mut ellipsoid = GeneralizedEllipsoid::from_covariance(&covariance, mean, quantiles)?;
        ellipsoid.set_resolution(Resolution::spatial(12, 16)?)?;

        rec.log(
            format!("ellipsoid/{}sigma/points", quantiles),
            &rr::Points3D::new(ellipsoid.points().iter().map(|p| [p.x, p.y, p.z]))
                .with_colors([color]),
        )?;

        let mut lines = RerunLines {
            rec: &rec,
            path: format!("ellipsoid/{}sigma/wireframe", quantiles),
            color,
        };
        ellipsoid.render(&mut lines);
    }

    Ok(())
}
