use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, Exp1, StandardNormal};
use tracing::{debug, info, warn};

use crate::error::InitWarning;
use crate::linalg;
use crate::params::{NetworkParams, WeightDist};

/// Output of [`initialize_w_rec`].
#[derive(Debug, Clone)]
pub struct RecurrentWeights {
    /// `n_rec x n_rec` weights. Non-negative whenever Dale's law was applied;
    /// the sign then lives in `dale_mask`.
    pub w_rec: DMatrix<f32>,

    /// Diagonal `+1` (excitatory) / `-1` (inhibitory) matrix. Identity when
    /// Dale's law is off.
    pub dale_mask: DMatrix<f32>,

    /// Spectral radius of `dale_mask * w_rec` after all rescaling.
    pub spectral_radius: f32,

    /// Params actually used, including the Gamma self-corrections.
    pub params: NetworkParams,

    pub warnings: Vec<InitWarning>,
}

impl RecurrentWeights {
    /// Effective recurrent matrix `dale_mask * w_rec`.
    pub fn signed(&self) -> DMatrix<f32> {
        &self.dale_mask * &self.w_rec
    }

    /// Indices of neurons marked inhibitory in the mask.
    pub fn inhibitory(&self) -> Vec<usize> {
        (0..self.dale_mask.nrows())
            .filter(|&i| self.dale_mask[(i, i)] < 0.0)
            .collect()
    }
}

/// One draw from Gamma(shape 2, scale 0.5): half the sum of two unit
/// exponentials.
fn sample_gamma_2_half<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let a: f32 = Exp1.sample(rng);
    let b: f32 = Exp1.sample(rng);
    0.5 * (a + b)
}

fn push_warning(warnings: &mut Vec<InitWarning>, w: InitWarning) {
    warn!("{}", w);
    warnings.push(w);
}

/// Build the recurrent weight matrix and its Dale mask.
///
/// Never fails: configuration inconsistencies are substituted with a default
/// behavior and reported in [`RecurrentWeights::warnings`].
pub fn initialize_w_rec<R: Rng + ?Sized>(params: &NetworkParams, rng: &mut R) -> RecurrentWeights {
    let mut params = params.clone();
    let mut warnings = Vec::new();
    let n = params.n_rec;

    let mut w_rec = DMatrix::<f32>::zeros(n, n);
    let mut dale_mask = DMatrix::<f32>::identity(n, n);
    let rec_idx = linalg::sparse_pattern(n, n, params.p_rec, rng);
    debug!(n_rec = n, connections = rec_idx.len(), "sampled recurrent pattern");

    let dist = match params.weight_dist() {
        Some(d) => d,
        None => {
            push_warning(
                &mut warnings,
                InitWarning::UnknownDistribution(params.w_rec_dist.clone()),
            );
            WeightDist::Gauss
        }
    };

    match dist {
        WeightDist::Gauss => {
            let scale = params.spectr_rad / (params.p_rec * n as f32).sqrt();
            for &(i, j) in &rec_idx {
                let z: f32 = StandardNormal.sample(rng);
                w_rec[(i, j)] = z * scale;
            }
        }
        WeightDist::Gamma => {
            for &(i, j) in &rec_idx {
                w_rec[(i, j)] = sample_gamma_2_half(rng);
            }
            if !params.spectr_norm {
                push_warning(&mut warnings, InitWarning::GammaForcedSpectralNorm);
                params.spectr_norm = true;
            }
            if !params.apply_dale {
                push_warning(&mut warnings, InitWarning::GammaForcedDale);
                params.apply_dale = true;
            }
        }
    }

    if params.apply_dale {
        apply_dale(&params, &mut w_rec, &mut dale_mask, &mut warnings);
    }

    if params.spectr_norm {
        let rho = linalg::spectral_radius(&(&dale_mask * &w_rec));
        if rho > 0.0 {
            w_rec *= params.spectr_rad / rho;
        } else {
            push_warning(&mut warnings, InitWarning::ZeroSpectralRadius);
        }
    }

    let spectral_radius = linalg::spectral_radius(&(&dale_mask * &w_rec));
    info!(spectral_radius, "initialized recurrent weights");

    RecurrentWeights {
        w_rec,
        dale_mask,
        spectral_radius,
        params,
        warnings,
    }
}

/// Sign-constrain `w_rec`: the last `n_inh` neurons become inhibitory in the
/// mask and all raw weights become non-negative. Optionally balance the
/// inhibitory columns, per population or per row.
fn apply_dale(
    params: &NetworkParams,
    w_rec: &mut DMatrix<f32>,
    dale_mask: &mut DMatrix<f32>,
    warnings: &mut Vec<InitWarning>,
) {
    let n = params.n_rec;
    let n_inh = params.n_inhibitory();
    let n_exc = n - n_inh;

    for i in n_exc..n {
        dale_mask[(i, i)] = -1.0;
    }
    w_rec.apply(|x| *x = x.abs());

    if !params.balance_dale {
        return;
    }
    if n_inh == 0 {
        push_warning(warnings, InitWarning::NoInhibitoryNeurons);
        return;
    }
    if n_exc == 0 {
        push_warning(warnings, InitWarning::NoExcitatoryNeurons);
        return;
    }

    // Expected input per neuron is zero when inhibitory columns weigh
    // (1 - p_inh) / p_inh times the excitatory ones.
    let ei_ratio = (1.0 - params.p_inh) / params.p_inh;
    for j in n_exc..n {
        for i in 0..n {
            w_rec[(i, j)] *= ei_ratio;
        }
    }

    if params.row_balance_dale {
        for i in 0..n {
            let ex_u: f32 = (0..n_exc).map(|j| w_rec[(i, j)]).sum();
            let in_u: f32 = (n_exc..n).map(|j| w_rec[(i, j)]).sum();
            if ex_u == 0.0 || in_u == 0.0 {
                continue;
            }
            let ratio = ex_u / in_u;
            for j in 0..n_exc {
                w_rec[(i, j)] /= ratio;
            }
        }
    }

    let b = ((1.0 / (1.0 - (2.0 * params.p_rec) / std::f32::consts::PI)) / ei_ratio).sqrt();
    *w_rec *= b;
}
