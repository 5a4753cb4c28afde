pub mod generalized;
pub mod points;
pub mod wireframe;

pub use generalized::{GeneralizedEllipsoid, LineRenderer};
pub use points::{ellipse_points, ellipsoid_point_count, ellipsoid_points};
pub use wireframe::{expected_edge_count, wireframe_edges, Edge, Wireframe};
