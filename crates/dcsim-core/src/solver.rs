//! Least-squares solve of the assembled system.

use nalgebra::{DMatrix, DVector, SVD};

use crate::error::{Error, Result};

/// Iteration cap for the SVD. Exceeding it means the factorization
/// genuinely failed to converge, not that the circuit is ill-posed.
const MAX_SVD_ITERATIONS: usize = 1000;

/// Solve `A x = z` as a least-squares problem via SVD.
///
/// Singular or rank-deficient systems (a node connected only through
/// capacitors, a floating sub-network) do not error; they yield the
/// minimum-norm best fit. [`Error::SingularSystem`] is returned only when
/// the factorization itself breaks down.
pub fn solve_least_squares(a: &DMatrix<f64>, z: &DVector<f64>) -> Result<DVector<f64>> {
    let svd = SVD::try_new(a.clone(), true, true, f64::EPSILON, MAX_SVD_ITERATIONS).ok_or_else(
        || Error::SingularSystem {
            reason: "SVD did not converge".to_string(),
        },
    )?;

    // Cutoff rule of LAPACK-style lstsq: singular values below
    // eps * max(dim) * sigma_max count as zero.
    let sigma_max = svd.singular_values.max();
    let cutoff = f64::EPSILON * a.nrows().max(a.ncols()) as f64 * sigma_max;

    let x: DVector<f64> = svd.solve(z, cutoff).map_err(|reason| Error::SingularSystem {
        reason: reason.to_string(),
    })?;

    Ok(x)
}
