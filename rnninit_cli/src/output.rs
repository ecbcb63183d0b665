//! JSON documents written by `rnninit`.

use rnninit::error::InitWarning;
use rnninit::linalg;
use rnninit::params::NetworkParams;
use rnninit::recurrent::RecurrentWeights;
use rnninit::nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Row-major dense matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixDoc {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f32>>,
}

impl From<&DMatrix<f32>> for MatrixDoc {
    fn from(m: &DMatrix<f32>) -> Self {
        Self {
            rows: m.nrows(),
            cols: m.ncols(),
            data: linalg::to_rows(m),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrentDoc {
    pub w_rec: MatrixDoc,
    pub dale_mask: MatrixDoc,
    pub spectral_radius: f32,
    pub params: NetworkParams,
    pub warnings: Vec<InitWarning>,
}

impl From<&RecurrentWeights> for RecurrentDoc {
    fn from(r: &RecurrentWeights) -> Self {
        Self {
            w_rec: MatrixDoc::from(&r.w_rec),
            dale_mask: MatrixDoc::from(&r.dale_mask),
            spectral_radius: r.spectral_radius,
            params: r.params.clone(),
            warnings: r.warnings.clone(),
        }
    }
}
