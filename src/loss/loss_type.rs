use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::hinge::HingeLoss;
use crate::loss::output::LossOutput;
use crate::loss::softmax::SoftmaxLoss;
use crate::math::matrix::Matrix;

/// Selects which linear-classifier loss to evaluate.
///
/// - `Hinge`   — multiclass SVM loss with margin Δ = 1.
/// - `Softmax` — cross-entropy over softmax probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Hinge,
    Softmax,
}

/// Selects between the per-example loop and the whole-matrix kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Naive,
    Vectorized,
}

impl LossType {
    pub fn compute(
        self,
        method: Method,
        weights: &Matrix,
        inputs: &Matrix,
        labels: &[usize],
        reg: f64,
    ) -> Result<LossOutput> {
        match (self, method) {
            (LossType::Hinge, Method::Naive)        => HingeLoss::naive(weights, inputs, labels, reg),
            (LossType::Hinge, Method::Vectorized)   => HingeLoss::vectorized(weights, inputs, labels, reg),
            (LossType::Softmax, Method::Naive)      => SoftmaxLoss::naive(weights, inputs, labels, reg),
            (LossType::Softmax, Method::Vectorized) => SoftmaxLoss::vectorized(weights, inputs, labels, reg),
        }
    }

    /// Data loss when every score is zero (e.g. W = 0 or X = 0):
    /// C − 1 for hinge, ln C for softmax.
    pub fn data_loss_at_zero(self, num_classes: usize) -> f64 {
        match self {
            LossType::Hinge   => (num_classes as f64 - 1.0) * HingeLoss::DELTA,
            LossType::Softmax => (num_classes as f64).ln(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LossType::Hinge   => "hinge",
            LossType::Softmax => "softmax",
        }
    }
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Naive, Method::Vectorized];

    pub fn name(self) -> &'static str {
        match self {
            Method::Naive      => "naive",
            Method::Vectorized => "vectorized",
        }
    }
}
