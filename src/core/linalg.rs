//! Small dense linear-algebra helpers on top of `nalgebra`.
//!
//! Matrices handed to callers are `f32`. Decompositions run in `f64` and the
//! results are narrowed afterwards.

use nalgebra::{Cholesky, DMatrix, DVector, Schur};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{InitError, Result};

/// Independent Bernoulli(`p`) draws for every entry of a `rows x cols` grid,
/// returned as `(row, col)` pairs in row-major order.
pub fn sparse_pattern<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    p: f32,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let mut idx = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            if rng.gen::<f32>() < p {
                idx.push((i, j));
            }
        }
    }
    idx
}

/// `rows x cols` matrix of independent standard-normal draws.
pub fn standard_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> DMatrix<f32> {
    DMatrix::from_fn(rows, cols, |_, _| StandardNormal.sample(&mut *rng))
}

/// Schur sweeps allowed per matrix row before giving up on convergence.
const SCHUR_MAX_ITER_PER_ROW: usize = 100;

/// Power iterations used when the Schur decomposition does not converge.
const POWER_ITERATIONS: usize = 200;

/// Largest eigenvalue modulus of a square matrix.
///
/// Uses the real Schur form; if that does not converge within
/// `SCHUR_MAX_ITER_PER_ROW * n` sweeps, falls back to a power-iteration
/// estimate.
pub fn spectral_radius(m: &DMatrix<f32>) -> f32 {
    if m.iter().all(|&x| x == 0.0) {
        return 0.0;
    }
    let wide: DMatrix<f64> = m.map(|x| x as f64);
    let max_niter = SCHUR_MAX_ITER_PER_ROW * wide.nrows();
    match Schur::try_new(wide.clone(), f64::EPSILON, max_niter) {
        Some(schur) => schur
            .complex_eigenvalues()
            .iter()
            .map(|z| z.norm())
            .fold(0.0_f64, f64::max) as f32,
        None => {
            tracing::debug!(n = wide.nrows(), "schur did not converge; using power iteration");
            power_iteration_radius(&wide, POWER_ITERATIONS) as f32
        }
    }
}

/// Spectral radius estimate from the geometric mean growth of `||A^k v||`
/// over the second half of the iterations. Handles complex dominant pairs,
/// where the plain Rayleigh quotient oscillates.
pub(crate) fn power_iteration_radius(m: &DMatrix<f64>, iters: usize) -> f64 {
    let n = m.nrows();
    if n == 0 || iters == 0 {
        return 0.0;
    }
    let mut v = DVector::from_element(n, 1.0 / (n as f64).sqrt());
    let mut log_growth = 0.0;
    let mut counted = 0usize;
    for k in 0..iters {
        let w = m * &v;
        let norm = w.norm();
        if norm <= f64::MIN_POSITIVE {
            // Nilpotent along v.
            return 0.0;
        }
        if k >= iters / 2 {
            log_growth += norm.ln();
            counted += 1;
        }
        v = w / norm;
    }
    (log_growth / counted as f64).exp()
}

/// Lower-triangular `L` with `L * L^T = cov`.
///
/// Only the lower triangle of `cov` is read. Fails if `cov` is not square or
/// not positive definite.
pub fn cholesky_lower(cov: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if !cov.is_square() {
        return Err(InitError::CovarianceShape {
            expected: cov.nrows(),
            rows: cov.nrows(),
            cols: cov.ncols(),
        });
    }
    let dim = cov.nrows();
    if cov.iter().any(|x| !x.is_finite()) {
        return Err(InitError::NotPositiveDefinite { dim });
    }
    Cholesky::new(cov.clone())
        .map(|c| c.l())
        .ok_or(InitError::NotPositiveDefinite { dim })
}

/// Build a `k x k` matrix from nested rows, checking the shape.
pub fn square_from_rows(rows: &[Vec<f64>], k: usize) -> Result<DMatrix<f64>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.len() != k || rows.iter().any(|r| r.len() != k) {
        return Err(InitError::CovarianceShape {
            expected: k,
            rows: rows.len(),
            cols: ncols,
        });
    }
    Ok(DMatrix::from_fn(k, k, |i, j| rows[i][j]))
}

/// Row-major nested copy of a matrix (for JSON output and tests).
pub fn to_rows(m: &DMatrix<f32>) -> Vec<Vec<f32>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

/// Sample covariance `X X^T / n` of zero-mean variables stored as rows of `X`
/// (one column per sample).
pub fn sample_covariance(samples: &DMatrix<f32>) -> DMatrix<f64> {
    let x: DMatrix<f64> = samples.map(|v| v as f64);
    let n = x.ncols().max(1) as f64;
    (&x * x.transpose()) / n
}

/// Fraction of entries that are exactly non-zero.
pub fn nonzero_fraction(m: &DMatrix<f32>) -> f32 {
    if m.is_empty() {
        return 0.0;
    }
    m.iter().filter(|&&x| x != 0.0).count() as f32 / m.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::Prng;

    #[test]
    fn spectral_radius_of_rotation_is_one() {
        // 90 degree rotation: eigenvalues +-i.
        let m = DMatrix::from_row_slice(2, 2, &[0.0f32, -1.0, 1.0, 0.0]);
        assert!((spectral_radius(&m) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spectral_radius_of_diagonal_picks_largest_modulus() {
        let m = DMatrix::from_diagonal(&DVector::from_vec(vec![0.5f32, -3.0, 2.0]));
        assert!((spectral_radius(&m) - 3.0).abs() < 1e-5);
        assert_eq!(spectral_radius(&DMatrix::<f32>::zeros(0, 0)), 0.0);
    }

    #[test]
    fn spectral_radius_of_zero_matrix_returns() {
        assert_eq!(spectral_radius(&DMatrix::<f32>::zeros(10, 10)), 0.0);
        assert_eq!(spectral_radius(&DMatrix::<f32>::zeros(1, 1)), 0.0);
    }

    #[test]
    fn spectral_radius_of_single_connection_is_zero() {
        // One off-diagonal weight: nilpotent, every eigenvalue is zero.
        let mut m = DMatrix::<f32>::zeros(10, 10);
        m[(3, 7)] = 0.8;
        assert!(spectral_radius(&m) < 1e-6);
    }

    #[test]
    fn power_iteration_matches_known_radius() {
        let d = DMatrix::from_diagonal(&DVector::from_vec(vec![0.5f64, -3.0, 2.0]));
        assert!((power_iteration_radius(&d, 200) - 3.0).abs() < 1e-6);

        // Scaled rotation: complex pair of modulus 2.
        let r = DMatrix::from_row_slice(2, 2, &[0.0f64, -2.0, 2.0, 0.0]);
        assert!((power_iteration_radius(&r, 200) - 2.0).abs() < 1e-9);

        let nilpotent = DMatrix::from_row_slice(2, 2, &[0.0f64, 1.0, 0.0, 0.0]);
        assert_eq!(power_iteration_radius(&nilpotent, 200), 0.0);
    }

    #[test]
    fn cholesky_reconstructs_input() {
        let cov = DMatrix::from_row_slice(2, 2, &[4.0, 1.2, 1.2, 1.0]);
        let l = cholesky_lower(&cov).unwrap();
        assert_eq!(l[(0, 1)], 0.0);
        let back = &l * l.transpose();
        assert!((back - cov).abs().max() < 1e-12);
    }

    #[test]
    fn cholesky_rejects_indefinite_and_non_square() {
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(matches!(
            cholesky_lower(&cov),
            Err(InitError::NotPositiveDefinite { dim: 2 })
        ));

        let cov = DMatrix::<f64>::zeros(2, 3);
        assert!(matches!(
            cholesky_lower(&cov),
            Err(InitError::CovarianceShape { .. })
        ));
    }

    #[test]
    fn square_from_rows_checks_shape() {
        let ok = square_from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]], 2).unwrap();
        assert_eq!(ok, DMatrix::identity(2, 2));
        assert!(square_from_rows(&[vec![1.0, 0.0]], 2).is_err());
        assert!(square_from_rows(&[vec![1.0], vec![0.0, 1.0]], 2).is_err());
    }

    #[test]
    fn sparse_pattern_edge_probabilities() {
        let mut rng = Prng::new(5);
        assert!(sparse_pattern(10, 10, 0.0, &mut rng).is_empty());
        assert_eq!(sparse_pattern(10, 7, 1.0, &mut rng).len(), 70);
    }

    #[test]
    fn to_rows_is_row_major() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(to_rows(&m), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn sample_covariance_of_white_noise_is_near_identity() {
        let mut rng = Prng::new(11);
        let x = standard_normal(3, 20_000, &mut rng);
        let c = sample_covariance(&x);
        let err = (c - DMatrix::<f64>::identity(3, 3)).abs().max();
        assert!(err < 0.05, "max deviation {err}");
    }
}
