use crate::error::{LossError, Result};
use crate::math::matrix::Matrix;

/// A validated (W, X, y) triple.
///
/// Construction checks every shape and label up front so the loss kernels
/// can index freely without re-checking.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// Weights, shape (D, C).
    pub weights: &'a Matrix,
    /// Examples, shape (N, D).
    pub inputs: &'a Matrix,
    /// Labels, length N, each in [0, C).
    pub labels: &'a [usize],
}

impl<'a> Batch<'a> {
    pub fn new(weights: &'a Matrix, inputs: &'a Matrix, labels: &'a [usize]) -> Result<Batch<'a>> {
        if weights.rows != inputs.cols {
            return Err(LossError::ShapeMismatch {
                context: "weight rows vs feature columns",
                expected: inputs.cols,
                found: weights.rows,
            });
        }
        if labels.len() != inputs.rows {
            return Err(LossError::ShapeMismatch {
                context: "label count vs example rows",
                expected: inputs.rows,
                found: labels.len(),
            });
        }
        if inputs.rows == 0 {
            return Err(LossError::EmptyBatch);
        }
        if let Some((index, &label)) = labels.iter().enumerate().find(|&(_, &l)| l >= weights.cols) {
            return Err(LossError::LabelOutOfRange { index, label, classes: weights.cols });
        }

        Ok(Batch { weights, inputs, labels })
    }

    pub fn num_train(&self) -> usize {
        self.inputs.rows
    }

    pub fn num_classes(&self) -> usize {
        self.weights.cols
    }

    /// Class scores `X[i] · W` for a single example.
    pub fn example_scores(&self, i: usize) -> Vec<f64> {
        let xi = self.inputs.row(i);
        (0..self.weights.cols)
            .map(|j| {
                let mut sum = 0.0;
                for (k, a) in xi.iter().enumerate() {
                    sum += a * self.weights.data[k][j];
                }
                sum
            })
            .collect()
    }

    /// Full (N, C) score matrix `X · W`.
    pub fn score_matrix(&self) -> Result<Matrix> {
        self.inputs.matmul(self.weights)
    }

    /// `Xᵀ · coefficients / N`, the data-term gradient shared by both
    /// vectorized kernels.
    pub fn backprop_mean(&self, coefficients: &Matrix) -> Result<Matrix> {
        let inv_n = 1.0 / self.num_train() as f64;
        Ok(self.inputs.transpose().matmul(coefficients)?.scale(inv_n))
    }
}

/// Rejects negative, NaN and infinite regularization strengths.
pub fn check_regularization(reg: f64) -> Result<()> {
    if reg.is_finite() && reg >= 0.0 {
        Ok(())
    } else {
        Err(LossError::InvalidRegularization(reg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity2() -> Matrix {
        Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn accepts_consistent_shapes() {
        let w = Matrix::zeros(2, 3);
        let x = identity2();
        let batch = Batch::new(&w, &x, &[0, 2]).unwrap();
        assert_eq!(batch.num_train(), 2);
        assert_eq!(batch.num_classes(), 3);
    }

    #[test]
    fn rejects_weight_feature_mismatch() {
        let w = Matrix::zeros(3, 3);
        let x = identity2();
        let err = Batch::new(&w, &x, &[0, 1]).unwrap_err();
        assert!(matches!(err, LossError::ShapeMismatch { expected: 2, found: 3, .. }));
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let w = Matrix::zeros(2, 3);
        let x = identity2();
        let err = Batch::new(&w, &x, &[0]).unwrap_err();
        assert!(matches!(err, LossError::ShapeMismatch { expected: 2, found: 1, .. }));
    }

    #[test]
    fn rejects_empty_batch() {
        let w = Matrix::zeros(2, 3);
        let x = Matrix::zeros(0, 2);
        assert!(matches!(Batch::new(&w, &x, &[]), Err(LossError::EmptyBatch)));
    }

    #[test]
    fn rejects_out_of_range_label() {
        let w = Matrix::zeros(2, 3);
        let x = identity2();
        let err = Batch::new(&w, &x, &[1, 3]).unwrap_err();
        assert!(matches!(err, LossError::LabelOutOfRange { index: 1, label: 3, classes: 3 }));
    }

    #[test]
    fn regularization_bounds() {
        assert!(check_regularization(0.0).is_ok());
        assert!(check_regularization(2.5).is_ok());
        assert!(check_regularization(-1e-3).is_err());
        assert!(check_regularization(f64::NAN).is_err());
        assert!(check_regularization(f64::INFINITY).is_err());
    }

    #[test]
    fn example_scores_match_score_matrix_rows() {
        let w = Matrix::from_data(vec![vec![0.5, -1.0, 2.0], vec![1.5, 0.25, -0.75]]).unwrap();
        let x = Matrix::from_data(vec![vec![1.0, 2.0], vec![-3.0, 0.5]]).unwrap();
        let batch = Batch::new(&w, &x, &[0, 1]).unwrap();
        let scores = batch.score_matrix().unwrap();
        for i in 0..2 {
            assert_eq!(batch.example_scores(i), scores.data[i]);
        }
    }
}
