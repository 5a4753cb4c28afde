use std::cmp::Ordering;
use std::fmt::Debug;

use itertools::Itertools;
use nalgebra as na;
use thiserror::Error;

/// Errors raised while turning a covariance matrix into a shape matrix.
///
/// The offending matrix is carried as text so it can be reported whatever the scalar type.
#[derive(Debug, Error, PartialEq)]
pub enum CovarianceError {
    #[error("Covariance matrix contains NaN or infinite values:{matrix}")]
    NonFinite { matrix: String },

    #[error("Covariance matrix is not symmetric:{matrix}")]
    NotSymmetric { matrix: String },

    #[error("Eigen-decomposition of the covariance matrix did not converge:{matrix}")]
    NotDecomposable { matrix: String },

    #[error(
        "Covariance matrix is not positive semi-definite, smallest eigenvalue is {min_eigenvalue}:{matrix}"
    )]
    NotPositiveSemiDefinite { matrix: String, min_eigenvalue: f64 },

    #[error("Confidence interval must be a positive number of standard deviations, got {0}")]
    InvalidConfidence(f64),
}

/// A symmetric positive semi-definite `D x D` matrix that can be factored into a shape matrix.
///
/// The shape matrix `U` has the covariance eigenvectors as columns, each scaled by
/// `sqrt(eigenvalue) * confidence_stds`, so that `U * U^T = confidence_stds^2 * C` and unit
/// circle/sphere samples map onto the confidence ellipse/ellipsoid.
pub trait CovarianceFactor<F: na::RealField + Copy, const D: usize>: Debug {
    /// The covariance as a plain matrix.
    fn as_matrix(&self) -> na::SMatrix<F, D, D>;

    /// Eigenvalues and column eigenvectors, `None` if the solver did not converge.
    fn eigen_decomposition(&self) -> Option<(na::SVector<F, D>, na::SMatrix<F, D, D>)>;

    /// Factors the covariance into a shape matrix spanning `confidence_stds` standard
    /// deviations. Columns are ordered by ascending eigenvalue.
    fn shape_matrix(&self, confidence_stds: F) -> Result<na::SMatrix<F, D, D>, CovarianceError> {
        let matrix = self.as_matrix();
        check_covariance_conditions(&matrix, confidence_stds)?;

        let (eigenvalues, eigenvectors) =
            self.eigen_decomposition()
                .ok_or_else(|| CovarianceError::NotDecomposable {
                    matrix: format!("{}", matrix),
                })?;

        shape_from_eigen(&eigenvalues, &eigenvectors, confidence_stds).map_err(|e| match e {
            CovarianceError::NotPositiveSemiDefinite { min_eigenvalue, .. } => {
                log::debug!("rejecting covariance with eigenvalue {}", min_eigenvalue);
                CovarianceError::NotPositiveSemiDefinite {
                    matrix: format!("{}", matrix),
                    min_eigenvalue,
                }
            }
            other => other,
        })
    }
}

impl<F: na::RealField + Copy> CovarianceFactor<F, 2> for na::Matrix2<F> {
    fn as_matrix(&self) -> na::Matrix2<F> {
        *self
    }

    fn eigen_decomposition(&self) -> Option<(na::Vector2<F>, na::Matrix2<F>)> {
        (*self)
            .try_symmetric_eigen(F::default_epsilon(), 0)
            .map(|eigen| (eigen.eigenvalues, eigen.eigenvectors))
    }
}

impl<F: na::RealField + Copy> CovarianceFactor<F, 3> for na::Matrix3<F> {
    fn as_matrix(&self) -> na::Matrix3<F> {
        *self
    }

    fn eigen_decomposition(&self) -> Option<(na::Vector3<F>, na::Matrix3<F>)> {
        (*self)
            .try_symmetric_eigen(F::default_epsilon(), 0)
            .map(|eigen| (eigen.eigenvalues, eigen.eigenvectors))
    }
}

/// Builds a shape matrix from an eigen-decomposition computed elsewhere.
///
/// Non-finite eigenvalues or eigenvectors are rejected. Eigenvalues slightly below zero (within
/// numerical tolerance) are clamped to zero, anything more negative is rejected.
pub fn shape_from_eigen<F: na::RealField + Copy, const D: usize>(
    eigenvalues: &na::SVector<F, D>,
    eigenvectors: &na::SMatrix<F, D, D>,
    confidence_stds: F,
) -> Result<na::SMatrix<F, D, D>, CovarianceError> {
    if !confidence_stds.is_finite() || confidence_stds <= F::zero() {
        return Err(CovarianceError::InvalidConfidence(
            confidence_stds.to_subset_unchecked(),
        ));
    }

    if eigenvalues.iter().chain(eigenvectors.iter()).any(|x| !x.is_finite()) {
        return Err(CovarianceError::NonFinite {
            matrix: format!("{}{}", eigenvalues, eigenvectors),
        });
    }

    let tolerance = tolerance(eigenvalues.iter().copied());
    if let Some(min) = eigenvalues
        .iter()
        .copied()
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    {
        if min < -tolerance {
            let matrix =
                eigenvectors * na::SMatrix::from_diagonal(eigenvalues) * eigenvectors.transpose();
            return Err(CovarianceError::NotPositiveSemiDefinite {
                matrix: format!("{}", matrix),
                min_eigenvalue: min.to_subset_unchecked(),
            });
        }
    }

    let order = (0..D)
        .sorted_by(|&a, &b| {
            eigenvalues[a]
                .partial_cmp(&eigenvalues[b])
                .unwrap_or(Ordering::Equal)
        })
        .collect_vec();

    Ok(na::SMatrix::<F, D, D>::from_fn(|row, col| {
        let k = order[col];
        eigenvectors[(row, k)] * eigenvalues[k].max(F::zero()).sqrt() * confidence_stds
    }))
}

pub(crate) fn check_covariance_conditions<F: na::RealField + Copy, const D: usize>(
    matrix: &na::SMatrix<F, D, D>,
    confidence_stds: F,
) -> Result<(), CovarianceError> {
    if !confidence_stds.is_finite() || confidence_stds <= F::zero() {
        return Err(CovarianceError::InvalidConfidence(
            confidence_stds.to_subset_unchecked(),
        ));
    }

    if matrix.iter().any(|x| !x.is_finite()) {
        return Err(CovarianceError::NonFinite {
            matrix: format!("{}", matrix),
        });
    }

    let tolerance = tolerance(matrix.iter().copied());
    let asymmetric = (0..D)
        .tuple_combinations()
        .any(|(i, j)| (matrix[(i, j)] - matrix[(j, i)]).abs() > tolerance);
    if asymmetric {
        return Err(CovarianceError::NotSymmetric {
            matrix: format!("{}", matrix),
        });
    }

    Ok(())
}

/// Absolute tolerance relative to the largest magnitude among `values`, never below
/// `sqrt(eps)`.
fn tolerance<F: na::RealField + Copy>(values: impl Iterator<Item = F>) -> F {
    let scale = values.fold(F::one(), |acc, x| acc.max(x.abs()));
    F::default_epsilon().sqrt() * scale
}
