use tracing::debug;

use crate::error::Result;
use crate::loss::batch::{check_regularization, Batch};
use crate::loss::output::LossOutput;
use crate::loss::regularization::apply_l2;
use crate::math::matrix::Matrix;

/// Multiclass SVM (structured hinge) loss for a linear classifier.
///
///   L = 1/N · Σᵢ Σ_{j≠yᵢ} max(0, sⱼ − s_{yᵢ} + Δ) + 0.5 · reg · Σ W²
///
/// with scores s = Xᵢ · W and a fixed margin Δ = 1.
pub struct HingeLoss;

impl HingeLoss {
    /// Fixed margin Δ.
    pub const DELTA: f64 = 1.0;

    /// Per-example loop. Returns the mean loss and ∂L/∂W.
    pub fn naive(weights: &Matrix, inputs: &Matrix, labels: &[usize], reg: f64) -> Result<LossOutput> {
        let batch = Batch::new(weights, inputs, labels)?;
        check_regularization(reg)?;

        let num_train = batch.num_train();
        let num_classes = batch.num_classes();
        let mut grad = Matrix::zeros(weights.rows, weights.cols);
        let mut loss = 0.0;

        for (i, &label) in labels.iter().enumerate() {
            let xi = inputs.row(i);
            let scores = batch.example_scores(i);
            let correct_class_score = scores[label];
            let mut violations = 0usize;

            for j in 0..num_classes {
                if j == label {
                    continue;
                }
                let margin = scores[j] - correct_class_score + Self::DELTA;
                if margin > 0.0 {
                    loss += margin;
                    violations += 1;
                    grad.add_to_column(j, xi, 1.0);
                }
            }
            // One −Xᵢ per violating class, folded together.
            grad.add_to_column(label, xi, -(violations as f64));
        }

        let inv_n = 1.0 / num_train as f64;
        let mut out = LossOutput { loss: loss * inv_n, grad: grad.scale(inv_n) };
        apply_l2(&mut out, weights, reg);

        debug!(num_train, num_classes, loss = out.loss, "hinge loss (naive)");
        Ok(out)
    }

    /// Whole-matrix formulation; same result as [`HingeLoss::naive`].
    pub fn vectorized(weights: &Matrix, inputs: &Matrix, labels: &[usize], reg: f64) -> Result<LossOutput> {
        let batch = Batch::new(weights, inputs, labels)?;
        check_regularization(reg)?;

        let num_train = batch.num_train();
        let num_classes = batch.num_classes();

        let scores = batch.score_matrix()?;
        let correct = scores.gather(labels);
        let mut margins = scores.sub_per_row(&correct).map(|m| m + Self::DELTA);
        margins.set_at_labels(labels, &vec![0.0; num_train]);
        let margins = margins.map(|m| m.max(0.0));

        let loss = margins.sum() / num_train as f64;

        // dL/ds: 1 on every violating class, minus the violation count on the
        // correct class.
        let mut coefficients = margins.map(|m| if m > 0.0 { 1.0 } else { 0.0 });
        let counts: Vec<f64> = coefficients.row_sums().into_iter().map(|c| -c).collect();
        coefficients.set_at_labels(labels, &counts);

        let mut out = LossOutput { loss, grad: batch.backprop_mean(&coefficients)? };
        apply_l2(&mut out, weights, reg);

        debug!(num_train, num_classes, loss = out.loss, "hinge loss (vectorized)");
        Ok(out)
    }
}
