use nalgebra::DMatrix;

use crate::error::Result;
use crate::input::initialize_w_inp;
use crate::loadings::{initialize_loadings, LoadingsOutput};
use crate::params::NetworkParams;
use crate::prng::Prng;
use crate::recurrent::{initialize_w_rec, RecurrentWeights};

/// Matrix initializer bound to one parameter set.
///
/// Owns its generator so repeated calls draw fresh matrices; two initializers
/// built from the same seeded params produce identical sequences.
#[derive(Debug, Clone)]
pub struct MatrixInitializer {
    params: NetworkParams,
    rng: Prng,
}

impl MatrixInitializer {
    pub fn new(params: NetworkParams) -> Self {
        let rng = match params.seed {
            Some(seed) => Prng::new(seed),
            None => Prng::from_entropy_seed(),
        };
        Self { params, rng }
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Recurrent weights and Dale mask. See [`initialize_w_rec`].
    pub fn recurrent(&mut self) -> RecurrentWeights {
        initialize_w_rec(&self.params, &mut self.rng)
    }

    /// Input weights, shape `n_inp x n_rec`. See [`initialize_w_inp`].
    pub fn input(&mut self) -> DMatrix<f32> {
        initialize_w_inp(&self.params, &mut self.rng)
    }

    /// Low-rank loadings or their Cholesky factor. See [`initialize_loadings`].
    pub fn loadings(&mut self, output: LoadingsOutput) -> Result<DMatrix<f32>> {
        initialize_loadings(&self.params, output, &mut self.rng)
    }
}
