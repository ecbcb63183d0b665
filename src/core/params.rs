#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{InitError, Result};

/// Distribution used to fill the sampled recurrent connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightDist {
    /// Standard normal, scaled by `spectr_rad / sqrt(p_rec * n_rec)`.
    Gauss,
    /// Gamma(shape 2, scale 0.5). All positive; requires Dale's law and
    /// spectral normalization.
    Gamma,
}

impl WeightDist {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gauss" => Some(WeightDist::Gauss),
            "gamma" => Some(WeightDist::Gamma),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeightDist::Gauss => "gauss",
            WeightDist::Gamma => "gamma",
        }
    }
}

/// Network parameters shared by all three initializers.
///
/// The routines only read this record. Self-corrections (Gamma weights force
/// Dale's law and spectral normalization) are reported through the effective
/// copy returned alongside the recurrent matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkParams {
    pub n_rec: usize,
    pub n_inp: usize,
    pub n_out: usize,

    // Number of low-rank factor pairs (m, n).
    pub rank: usize,

    // Connection probabilities.
    pub p_rec: f32,
    pub p_inp: f32,

    // Fraction of inhibitory neurons under Dale's law.
    pub p_inh: f32,

    /// Recurrent weight distribution name: `"gauss"` or `"gamma"`.
    /// Unknown names fall back to `"gauss"` with a warning.
    #[cfg_attr(feature = "serde", serde(alias = "w_dist"))]
    pub w_rec_dist: String,

    pub spectr_rad: f32,
    pub spectr_norm: bool,

    pub apply_dale: bool,
    pub balance_dale: bool,
    pub row_balance_dale: bool,

    /// Optional covariance for the loadings, `k x k` with
    /// `k = 2 * rank + n_inp + n_out`. Rows are outer.
    pub cov: Option<Vec<Vec<f64>>>,

    // If set, makes initialization reproducible.
    pub seed: Option<u64>,
}

impl Default for NetworkParams {
    /// A dense 100-unit Gaussian network with unit spectral scale and no
    /// biological constraints.
    fn default() -> Self {
        Self {
            n_rec: 100,
            n_inp: 2,
            n_out: 1,
            rank: 1,
            p_rec: 1.0,
            p_inp: 1.0,
            p_inh: 0.2,
            w_rec_dist: WeightDist::Gauss.name().to_string(),
            spectr_rad: 1.0,
            spectr_norm: false,
            apply_dale: false,
            balance_dale: false,
            row_balance_dale: false,
            cov: None,
            seed: None,
        }
    }
}

impl NetworkParams {
    pub fn with_size(n_rec: usize, n_inp: usize, n_out: usize) -> Self {
        Self {
            n_rec,
            n_inp,
            n_out,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the recurrent and input connection probabilities.
    pub fn with_sparsity(mut self, p_rec: f32, p_inp: f32) -> Self {
        self.p_rec = p_rec;
        self.p_inp = p_inp;
        self
    }

    pub fn with_distribution(mut self, dist: WeightDist) -> Self {
        self.w_rec_dist = dist.name().to_string();
        self
    }

    /// Set the target spectral radius and whether to enforce it by
    /// eigenvalue rescaling.
    pub fn with_spectral_radius(mut self, spectr_rad: f32, spectr_norm: bool) -> Self {
        self.spectr_rad = spectr_rad;
        self.spectr_norm = spectr_norm;
        self
    }

    /// Enable Dale's law with the given inhibitory fraction and balancing mode.
    pub fn with_dale(mut self, p_inh: f32, balance: bool, row_balance: bool) -> Self {
        self.apply_dale = true;
        self.p_inh = p_inh;
        self.balance_dale = balance;
        self.row_balance_dale = row_balance;
        self
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_covariance(mut self, cov: Vec<Vec<f64>>) -> Self {
        self.cov = Some(cov);
        self
    }

    /// Parsed distribution selector; `None` for unknown names.
    pub fn weight_dist(&self) -> Option<WeightDist> {
        WeightDist::from_name(&self.w_rec_dist)
    }

    /// Number of loading vectors: `2 * rank + n_inp + n_out`.
    pub fn n_loadings(&self) -> usize {
        2 * self.rank + self.n_inp + self.n_out
    }

    /// Number of inhibitory neurons under Dale's law.
    pub fn n_inhibitory(&self) -> usize {
        let n = (self.n_rec as f64 * self.p_inh as f64).round();
        (n.max(0.0) as usize).min(self.n_rec)
    }

    /// Validate configuration values.
    ///
    /// The initializers never call this; they degrade to warnings. Front ends
    /// use it to reject obviously broken configs up front.
    pub fn validate(&self) -> Result<()> {
        if self.n_rec == 0 {
            return Err(InitError::InvalidParams("n_rec must be > 0"));
        }
        if !(self.p_rec > 0.0 && self.p_rec <= 1.0) {
            return Err(InitError::InvalidParams("p_rec must be in (0, 1]"));
        }
        if !(self.p_inp > 0.0 && self.p_inp <= 1.0) {
            return Err(InitError::InvalidParams("p_inp must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.p_inh) {
            return Err(InitError::InvalidParams("p_inh must be in [0, 1]"));
        }
        if !self.spectr_rad.is_finite() || self.spectr_rad <= 0.0 {
            return Err(InitError::InvalidParams("spectr_rad must be finite and > 0"));
        }
        if self.apply_dale && self.balance_dale && !(self.p_inh > 0.0 && self.p_inh < 1.0) {
            return Err(InitError::InvalidParams(
                "balanced Dale's law requires p_inh in (0, 1)",
            ));
        }
        if let Some(cov) = &self.cov {
            let k = self.n_loadings();
            if cov.len() != k || cov.iter().any(|row| row.len() != k) {
                return Err(InitError::InvalidParams(
                    "cov must be square with side 2 * rank + n_inp + n_out",
                ));
            }
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    #[cfg(feature = "serde")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
