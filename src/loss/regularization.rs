use crate::loss::output::LossOutput;
use crate::math::matrix::Matrix;

/// L2 penalty: 0.5 · reg · Σ W²
pub fn l2_penalty(weights: &Matrix, reg: f64) -> f64 {
    0.5 * reg * weights.sum_squares()
}

/// Gradient of the L2 penalty: reg · W
pub fn l2_gradient(weights: &Matrix, reg: f64) -> Matrix {
    weights.scale(reg)
}

/// Adds the L2 penalty and its gradient to an already averaged data term.
///
/// `output.grad` must have the shape of `weights`.
pub fn apply_l2(output: &mut LossOutput, weights: &Matrix, reg: f64) {
    output.loss += l2_penalty(weights, reg);
    for (g_row, w_row) in output.grad.data.iter_mut().zip(weights.data.iter()) {
        for (g, w) in g_row.iter_mut().zip(w_row.iter()) {
            *g += w * reg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_is_half_reg_times_squared_norm() {
        let w = Matrix::from_data(vec![vec![1.0, -2.0], vec![3.0, 0.0]]).unwrap();
        assert_eq!(l2_penalty(&w, 0.1), 0.5 * 0.1 * 14.0);
        assert_eq!(l2_gradient(&w, 2.0).data, vec![vec![2.0, -4.0], vec![6.0, 0.0]]);
    }

    #[test]
    fn zero_reg_leaves_output_untouched() {
        let w = Matrix::from_data(vec![vec![1.0, -2.0]]).unwrap();
        let mut out = LossOutput {
            loss: 1.25,
            grad: Matrix::from_data(vec![vec![0.5, 0.75]]).unwrap(),
        };
        let before = out.clone();
        apply_l2(&mut out, &w, 0.0);
        assert_eq!(out, before);
    }
}
