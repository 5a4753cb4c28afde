use crate::config::ResolutionError;
use crate::math::covariance::CovarianceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Covariance(#[from] CovarianceError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}
