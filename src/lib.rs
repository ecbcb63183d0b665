//! # rnninit
//!
//! Randomized weight initialization for recurrent neural network models.
//!
//! Three independent routines read one [`NetworkParams`](params::NetworkParams)
//! record:
//!
//! - [`initialize_w_rec`](recurrent::initialize_w_rec): sparse recurrent
//!   weights with optional Dale's law, balancing and spectral-radius
//!   normalization.
//! - [`initialize_w_inp`](input::initialize_w_inp): sparse input projection.
//! - [`initialize_loadings`](loadings::initialize_loadings): correlated
//!   low-rank factor matrices drawn through a Cholesky factor.
//!
//! ## Quick Start
//!
//! ```
//! use rnninit::prelude::*;
//!
//! let params = NetworkParams::with_size(100, 2, 1)
//!     .with_sparsity(0.5, 1.0)
//!     .with_spectral_radius(1.2, true)
//!     .with_seed(42);
//! let mut init = MatrixInitializer::new(params);
//!
//! let rec = init.recurrent();
//! assert!((rec.spectral_radius - 1.2).abs() < 1e-3);
//!
//! let w_inp = init.input();
//! assert_eq!(w_inp.shape(), (2, 100));
//!
//! let loadings = init.loadings(LoadingsOutput::Loadings).unwrap();
//! assert_eq!(loadings.shape(), (2 * 1 + 2 + 1, 100));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serde derives on the params and JSON config loading
//!
//! ## Modules
//!
//! - [`params`]: configuration record and validation
//! - [`recurrent`], [`input`], [`loadings`]: the three initializers
//! - [`initializer`]: seeded front end owning params and generator
//! - [`linalg`]: spectral radius, Cholesky and sampling helpers
//! - [`prng`]: seedable generator

pub use nalgebra;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/params.rs"]
pub mod params;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/linalg.rs"]
pub mod linalg;

#[path = "core/recurrent.rs"]
pub mod recurrent;

#[path = "core/input.rs"]
pub mod input;

#[path = "core/loadings.rs"]
pub mod loadings;

#[path = "core/initializer.rs"]
pub mod initializer;

/// Prelude module for convenient imports.
///
/// ```
/// use rnninit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{InitError, InitWarning};
    pub use crate::initializer::MatrixInitializer;
    pub use crate::input::initialize_w_inp;
    pub use crate::loadings::{default_covariance, initialize_loadings, LoadingsOutput};
    pub use crate::params::{NetworkParams, WeightDist};
    pub use crate::prng::Prng;
    pub use crate::recurrent::{initialize_w_rec, RecurrentWeights};
}
