use tracing::debug;

use crate::error::Result;
use crate::loss::batch::{check_regularization, Batch};
use crate::loss::output::LossOutput;
use crate::loss::regularization::apply_l2;
use crate::math::matrix::Matrix;

/// Softmax cross-entropy loss for a linear classifier.
///
///   L = 1/N · Σᵢ ( −f_{yᵢ} + log Σⱼ exp fⱼ ) + 0.5 · reg · Σ W²
///
/// Scores are shifted by their row maximum before exponentiating. The shift
/// cancels in the softmax and keeps `exp` from overflowing.
pub struct SoftmaxLoss;

impl SoftmaxLoss {
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
            let mut f = batch.example_scores(i);
            let max = f.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for v in f.iter_mut() {
                *v -= max;
            }
            let denom: f64 = f.iter().map(|v| v.exp()).sum();

            loss += -f[label] + denom.ln();

            for (j, &fj) in f.iter().enumerate() {
                let p = fj.exp() / denom;
                let indicator = if j == label { 1.0 } else { 0.0 };
                grad.add_to_column(j, xi, p - indicator);
            }
        }

        let inv_n = 1.0 / num_train as f64;
        let mut out = LossOutput { loss: loss * inv_n, grad: grad.scale(inv_n) };
        apply_l2(&mut out, weights, reg);

        debug!(num_train, num_classes, loss = out.loss, "softmax loss (naive)");
        Ok(out)
    }

    /// Whole-matrix formulation; same result as [`SoftmaxLoss::naive`].
    pub fn vectorized(weights: &Matrix, inputs: &Matrix, labels: &[usize], reg: f64) -> Result<LossOutput> {
        let batch = Batch::new(weights, inputs, labels)?;
        check_regularization(reg)?;

        let num_train = batch.num_train();
        let num_classes = batch.num_classes();

        let scores = batch.score_matrix()?;
        let shifted = scores.sub_per_row(&scores.row_max());
        let exp = shifted.map(f64::exp);
        let sums = exp.row_sums();

        let log_sum: f64 = sums.iter().map(|s| s.ln()).sum();
        let correct: f64 = shifted.gather(labels).iter().sum();
        let loss = (log_sum - correct) / num_train as f64;

        let mut probs = exp.div_per_row(&sums);
        probs.add_at_labels(labels, -1.0);

        let mut out = LossOutput { loss, grad: batch.backprop_mean(&probs)? };
        apply_l2(&mut out, weights, reg);

        debug!(num_train, num_classes, loss = out.loss, "softmax loss (vectorized)");
        Ok(out)
    }

    /// Row-wise softmax probabilities of `X · W`, shape (N, C).
    pub fn probabilities(weights: &Matrix, inputs: &Matrix) -> Result<Matrix> {
        let scores = inputs.matmul(weights)?;
        let exp = scores.sub_per_row(&scores.row_max()).map(f64::exp);
        Ok(exp.div_per_row(&exp.row_sums()))
    }
}
