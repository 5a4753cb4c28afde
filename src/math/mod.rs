pub mod covariance;

pub use covariance::{CovarianceError, CovarianceFactor};
