pub mod canvas;
pub mod config;
mod error;
pub mod geom;
pub mod math;
pub mod utils;

pub use canvas::{Canvas, PenStyle, RasterCanvas};
pub use config::{EllipseStyle, Real, Resolution, ResolutionError};
pub use error::Error;
pub use geom::ellipsoid::{
    ellipse_points, ellipsoid_points, wireframe_edges, Edge, GeneralizedEllipsoid, LineRenderer,
    Wireframe,
};
pub use math::covariance::{CovarianceError, CovarianceFactor};
