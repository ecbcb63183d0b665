use std::fmt;
use std::io;

use thiserror::Error;

/// Fatal initialization failures. These always propagate to the caller.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("covariance matrix ({dim}x{dim}) is not positive definite")]
    NotPositiveDefinite { dim: usize },

    #[error("covariance matrix must be {expected}x{expected}, got {rows}x{cols}")]
    CovarianceShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid parameters: {0}")]
    InvalidParams(&'static str),

    #[error("failed to parse parameters: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = InitError> = std::result::Result<T, E>;

/// Non-fatal configuration inconsistencies.
///
/// Each one is paired with a substituted behavior; the routine still returns
/// matrices. They are logged through `tracing` and also handed back to the
/// caller so the substitution is visible without a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitWarning {
    /// Distribution name not recognized; Gaussian weights were drawn instead.
    UnknownDistribution(String),
    /// Gamma weights have no analytic scaling, so spectral normalization was enabled.
    GammaForcedSpectralNorm,
    /// Gamma weights are all positive, so Dale's law was enabled.
    GammaForcedDale,
    /// Dale's law requested but `round(n_rec * p_inh)` is zero; balancing skipped.
    NoInhibitoryNeurons,
    /// Dale's law requested but every neuron is inhibitory; balancing skipped.
    NoExcitatoryNeurons,
    /// Spectral radius of the sampled matrix is zero; normalization skipped.
    ZeroSpectralRadius,
}

impl fmt::Display for InitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitWarning::UnknownDistribution(name) => write!(
                f,
                "initialization '{name}' not implemented, use gauss or gamma; continuing with gauss"
            ),
            InitWarning::GammaForcedSpectralNorm => f.write_str(
                "analytic normalisation not implemented for gamma, setting spectral normalisation to true",
            ),
            InitWarning::GammaForcedDale => f.write_str(
                "gamma distribution is all positive, use only with Dale's law, setting Dale's law to true",
            ),
            InitWarning::NoInhibitoryNeurons => {
                f.write_str("Dale's law requested but no neuron is inhibitory; skipping balance")
            }
            InitWarning::NoExcitatoryNeurons => {
                f.write_str("Dale's law requested but no neuron is excitatory; skipping balance")
            }
            InitWarning::ZeroSpectralRadius => {
                f.write_str("spectral radius is zero; skipping spectral normalisation")
            }
        }
    }
}
