use crate::math::matrix::Matrix;

/// Result of one loss evaluation: the scalar loss and ∂L/∂W.
#[derive(Debug, Clone, PartialEq)]
pub struct LossOutput {
    pub loss: f64,
    /// Same shape as the weight matrix, (D, C).
    pub grad: Matrix,
}
