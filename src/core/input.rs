use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use crate::linalg;
use crate::params::NetworkParams;

/// Build the input weight matrix.
///
/// Connections are sampled on an `n_rec x n_inp` grid with probability
/// `p_inp` and filled with `N(0, 1) * sqrt(1 / p_inp)`. The result is
/// returned transposed, shape `n_inp x n_rec`.
pub fn initialize_w_inp<R: Rng + ?Sized>(params: &NetworkParams, rng: &mut R) -> DMatrix<f32> {
    let mut w_task = DMatrix::<f32>::zeros(params.n_rec, params.n_inp);
    let idx = linalg::sparse_pattern(params.n_rec, params.n_inp, params.p_inp, rng);
    debug!(
        n_rec = params.n_rec,
        n_inp = params.n_inp,
        connections = idx.len(),
        "sampled input pattern"
    );

    let scale = (1.0 / params.p_inp).sqrt();
    for &(i, j) in &idx {
        let z: f32 = StandardNormal.sample(rng);
        w_task[(i, j)] = z * scale;
    }

    w_task.transpose()
}
