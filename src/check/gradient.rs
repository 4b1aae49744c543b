use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{LossError, Result};
use crate::math::matrix::Matrix;

/// One sampled entry of a sparse gradient check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradCheck {
    pub row: usize,
    pub col: usize,
    /// Central-difference estimate.
    pub numerical: f64,
    /// Value taken from the analytic gradient.
    pub analytic: f64,
    pub rel_error: f64,
}

/// |a − b| / max(1e-8, |a| + |b|)
pub fn rel_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / (a.abs() + b.abs()).max(1e-8)
}

/// Central difference (f(W + h·eᵣc) − f(W − h·eᵣc)) / 2h for one entry.
///
/// `weights` is perturbed in place and restored before returning, also when
/// `f` fails.
pub fn numerical_gradient_at<F>(
    f: &mut F,
    weights: &mut Matrix,
    row: usize,
    col: usize,
    h: f64,
) -> Result<f64>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let old = weights.get(row, col);

    weights.set(row, col, old + h);
    let plus = f(&*weights);
    weights.set(row, col, old - h);
    let minus = f(&*weights);
    weights.set(row, col, old);

    Ok((plus? - minus?) / (2.0 * h))
}

/// Dense numerical gradient over every entry of `weights`.
pub fn numerical_gradient<F>(f: &mut F, weights: &Matrix, h: f64) -> Result<Matrix>
where
    F: FnMut(&Matrix) -> Result<f64>,
{
    let mut probe = weights.clone();
    let mut grad = Matrix::zeros(weights.rows, weights.cols);
    for i in 0..weights.rows {
        for j in 0..weights.cols {
            let g = numerical_gradient_at(f, &mut probe, i, j, h)?;
            grad.set(i, j, g);
        }
    }
    Ok(grad)
}

/// Compares `analytic` against central differences at `num_checks` randomly
/// sampled entries of `weights`.
pub fn grad_check_sparse<F, R>(
    f: &mut F,
    weights: &Matrix,
    analytic: &Matrix,
    num_checks: usize,
    h: f64,
    rng: &mut R,
) -> Result<Vec<GradCheck>>
where
    F: FnMut(&Matrix) -> Result<f64>,
    R: Rng + ?Sized,
{
    if analytic.rows != weights.rows {
        return Err(LossError::ShapeMismatch {
            context: "analytic gradient rows",
            expected: weights.rows,
            found: analytic.rows,
        });
    }
    if analytic.cols != weights.cols {
        return Err(LossError::ShapeMismatch {
            context: "analytic gradient columns",
            expected: weights.cols,
            found: analytic.cols,
        });
    }
    if weights.rows == 0 || weights.cols == 0 {
        return Ok(Vec::new());
    }

    let mut probe = weights.clone();
    let mut checks = Vec::with_capacity(num_checks);

    for _ in 0..num_checks {
        let row = rng.gen_range(0..weights.rows);
        let col = rng.gen_range(0..weights.cols);

        let numerical = numerical_gradient_at(f, &mut probe, row, col, h)?;
        let analytic = analytic.get(row, col);
        let check = GradCheck {
            row,
            col,
            numerical,
            analytic,
            rel_error: rel_error(numerical, analytic),
        };
        debug!(
            row, col,
            numerical = check.numerical,
            analytic = check.analytic,
            rel_error = check.rel_error,
            "gradient check"
        );
        checks.push(check);
    }

    Ok(checks)
}
