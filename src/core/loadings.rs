use nalgebra::DMatrix;
use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::linalg;
use crate::params::NetworkParams;

/// Correlation injected between each `m_i` / `n_i` rank-factor pair in the
/// default covariance. Keeps input- and output-facing directions coupled so
/// low-rank training does not start with vanishing gradients.
pub const MN_CORRELATION: f64 = 0.6;

/// What [`initialize_loadings`] hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingsOutput {
    /// Correlated loadings `L * Z`, shape `k x n_rec`.
    #[default]
    Loadings,
    /// The lower Cholesky factor `L` itself, shape `k x k`, for callers that
    /// resample many times.
    CholeskyFactor,
}

/// Default loadings covariance: identity with [`MN_CORRELATION`] between
/// index `n_inp + i` and `n_inp + rank + i` for every factor pair `i`.
///
/// Index layout is `[inputs | m factors | n factors | outputs]`.
pub fn default_covariance(params: &NetworkParams) -> DMatrix<f64> {
    let k = params.n_loadings();
    let mut cov = DMatrix::<f64>::identity(k, k);
    for i in 0..params.rank {
        let m = params.n_inp + i;
        let n = params.n_inp + params.rank + i;
        cov[(m, n)] = MN_CORRELATION;
        cov[(n, m)] = MN_CORRELATION;
    }
    cov
}

/// Covariance that will actually be decomposed: `params.cov` if set, the
/// default construction otherwise.
pub fn loadings_covariance(params: &NetworkParams) -> Result<DMatrix<f64>> {
    match &params.cov {
        Some(rows) => linalg::square_from_rows(rows, params.n_loadings()),
        None => Ok(default_covariance(params)),
    }
}

/// Build low-rank loadings with the prescribed correlation structure.
///
/// Fails if the covariance is malformed or not positive definite; those
/// errors are never swallowed.
pub fn initialize_loadings<R: Rng + ?Sized>(
    params: &NetworkParams,
    output: LoadingsOutput,
    rng: &mut R,
) -> Result<DMatrix<f32>> {
    let cov = loadings_covariance(params)?;
    let chol_cov: DMatrix<f32> = linalg::cholesky_lower(&cov)?.map(|x| x as f32);
    debug!(n_loadings = cov.nrows(), ?output, "decomposed loadings covariance");

    match output {
        LoadingsOutput::Loadings => {
            let z = linalg::standard_normal(cov.nrows(), params.n_rec, rng);
            Ok(&chol_cov * z)
        }
        LoadingsOutput::CholeskyFactor => Ok(chol_cov),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InitError;
    use crate::prng::Prng;

    fn low_rank_params(n_rec: usize) -> NetworkParams {
        NetworkParams::with_size(n_rec, 2, 1).with_rank(2)
    }

    #[test]
    fn default_covariance_couples_m_and_n() {
        let params = low_rank_params(10);
        let cov = default_covariance(&params);
        assert_eq!(cov.shape(), (7, 7));
        // inputs 0..2, m 2..4, n 4..6, output 6.
        assert_eq!(cov[(2, 4)], 0.6);
        assert_eq!(cov[(4, 2)], 0.6);
        assert_eq!(cov[(3, 5)], 0.6);
        assert_eq!(cov[(5, 3)], 0.6);
        assert_eq!(cov[(2, 5)], 0.0);
        assert_eq!(cov[(0, 1)], 0.0);
        assert!((0..7).all(|i| cov[(i, i)] == 1.0));
    }

    #[test]
    fn loadings_shape() {
        let params = low_rank_params(30);
        let out = initialize_loadings(&params, LoadingsOutput::Loadings, &mut Prng::new(1)).unwrap();
        assert_eq!(out.shape(), (7, 30));
    }

    #[test]
    fn factor_is_lower_triangular_root_of_covariance() {
        let params = low_rank_params(30);
        let l = initialize_loadings(&params, LoadingsOutput::CholeskyFactor, &mut Prng::new(2))
            .unwrap();
        assert_eq!(l.shape(), (7, 7));
        for i in 0..7 {
            for j in (i + 1)..7 {
                assert_eq!(l[(i, j)], 0.0);
            }
        }
        let back = (&l * l.transpose()).map(|x| x as f64);
        let err = (back - default_covariance(&params)).abs().max();
        assert!(err < 1e-5, "reconstruction error {err}");
    }

    #[test]
    fn both_modes_share_the_same_distribution() {
        let params = low_rank_params(40_000);
        let target = default_covariance(&params);

        let direct = initialize_loadings(&params, LoadingsOutput::Loadings, &mut Prng::new(3))
            .unwrap();
        let factor = initialize_loadings(&params, LoadingsOutput::CholeskyFactor, &mut Prng::new(4))
            .unwrap();
        let manual = &factor * linalg::standard_normal(7, params.n_rec, &mut Prng::new(5));

        for sample in [&direct, &manual] {
            let err = (linalg::sample_covariance(sample) - &target).abs().max();
            assert!(err < 0.05, "sample covariance deviates by {err}");
        }
    }

    #[test]
    fn explicit_covariance_is_used() {
        let params = NetworkParams::with_size(20_000, 0, 0)
            .with_rank(1)
            .with_covariance(vec![vec![2.0, -0.5], vec![-0.5, 1.0]]);
        let out = initialize_loadings(&params, LoadingsOutput::Loadings, &mut Prng::new(6))
            .unwrap();
        let c = linalg::sample_covariance(&out);
        assert!((c[(0, 0)] - 2.0).abs() < 0.1);
        assert!((c[(0, 1)] + 0.5).abs() < 0.05);
        assert!((c[(1, 1)] - 1.0).abs() < 0.05);
    }

    #[test]
    fn indefinite_covariance_fails() {
        let params = NetworkParams::with_size(10, 0, 0)
            .with_rank(1)
            .with_covariance(vec![vec![1.0, 2.0], vec![2.0, 1.0]]);
        for output in [LoadingsOutput::Loadings, LoadingsOutput::CholeskyFactor] {
            let err = initialize_loadings(&params, output, &mut Prng::new(7)).unwrap_err();
            assert!(matches!(err, InitError::NotPositiveDefinite { dim: 2 }));
        }
    }

    #[test]
    fn mis_sized_covariance_fails() {
        let params = low_rank_params(10).with_covariance(vec![vec![1.0]]);
        let err = initialize_loadings(&params, LoadingsOutput::Loadings, &mut Prng::new(8))
            .unwrap_err();
        assert!(matches!(
            err,
            InitError::CovarianceShape {
                expected: 7,
                rows: 1,
                cols: 1
            }
        ));
    }
}
