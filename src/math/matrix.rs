use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{LossError, Result};

/// Dense row-major matrix of `f64`.
///
/// Row `i` is `data[i]`; every row holds exactly `cols` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from row vectors. An empty `data` yields a 0×0 matrix.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, Vec::len);
        if let Some((row, r)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(LossError::RaggedMatrix { row, expected: cols, found: r.len() });
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Both uniforms in (0, 1] so ln() never sees zero.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Fills a (rows, cols) matrix with independent N(0, 1) samples.
    pub fn randn<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for v in row.iter_mut() {
                *v = Matrix::sample_standard_normal(rng);
            }
        }
        res
    }

    /// N(0, 1) samples multiplied by `scale`, the usual small-weight init for
    /// a linear classifier (e.g. `scale = 1e-4`).
    pub fn random_scaled<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        Matrix::randn(rows, cols, rng).scale(scale)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        self.data.iter().map(|r| r[col]).collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    ///
    /// The inner loop runs over `k` in ascending order, the same order a
    /// row-by-row dot product uses, so a per-row and a batched computation
    /// of the same scores agree bit for bit.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(LossError::ShapeMismatch {
                context: "matmul inner dimension",
                expected: self.cols,
                found: rhs.rows,
            });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            let lhs_row = &self.data[i];
            for j in 0..res.cols {
                let mut sum = 0.0;

                for (k, a) in lhs_row.iter().enumerate() {
                    sum += a * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Row-wise maximum, one entry per row.
    pub fn row_max(&self) -> Vec<f64> {
        self.data.iter()
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect()
    }

    /// Picks `self[i][labels[i]]` for every row.
    ///
    /// # Panics
    /// Panics if `labels` is shorter than `rows` or a label is out of range.
    pub fn gather(&self, labels: &[usize]) -> Vec<f64> {
        self.data.iter().zip(labels.iter())
            .map(|(row, &label)| row[label])
            .collect()
    }

    /// Subtracts `per_row[i]` from every entry of row `i`.
    pub fn sub_per_row(&self, per_row: &[f64]) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(per_row.iter())
                .map(|(row, &s)| row.iter().map(|x| x - s).collect())
                .collect()
        }
    }

    /// Divides every entry of row `i` by `per_row[i]`.
    pub fn div_per_row(&self, per_row: &[f64]) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(per_row.iter())
                .map(|(row, &s)| row.iter().map(|x| x / s).collect())
                .collect()
        }
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.iter().sum()).collect()
    }

    /// Overwrites `self[i][labels[i]]` with `values[i]` for every row.
    pub fn set_at_labels(&mut self, labels: &[usize], values: &[f64]) {
        for ((row, &label), &v) in self.data.iter_mut().zip(labels.iter()).zip(values.iter()) {
            row[label] = v;
        }
    }

    /// Adds `delta` to `self[i][labels[i]]` for every row.
    pub fn add_at_labels(&mut self, labels: &[usize], delta: f64) {
        for (row, &label) in self.data.iter_mut().zip(labels.iter()) {
            row[label] += delta;
        }
    }

    /// `self[:, col] += alpha * values`, with `values.len() == rows`.
    pub fn add_to_column(&mut self, col: usize, values: &[f64], alpha: f64) {
        for (row, v) in self.data.iter_mut().zip(values.iter()) {
            row[col] += alpha * v;
        }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().map(|row| row.iter().sum::<f64>()).sum()
    }

    pub fn sum_squares(&self) -> f64 {
        self.data.iter()
            .map(|row| row.iter().map(|x| x * x).sum::<f64>())
            .sum()
    }

    /// Largest absolute element-wise difference; infinite when shapes differ.
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        if self.shape() != other.shape() {
            return f64::INFINITY;
        }
        self.data.iter().zip(other.data.iter())
            .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn from_data_rejects_ragged_rows() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, LossError::RaggedMatrix { row: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn from_data_empty_is_zero_by_zero() {
        let m = Matrix::from_data(vec![]).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn matmul_matches_hand_computation() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_data(vec![vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.data, vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    fn matmul_rejects_inner_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(
            a.matmul(&b),
            Err(LossError::ShapeMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn row_max_and_gather() {
        let m = Matrix::from_data(vec![vec![1.0, -4.0, 3.0], vec![-2.0, -1.0, -5.0]]).unwrap();
        assert_eq!(m.row_max(), vec![3.0, -1.0]);
        assert_eq!(m.gather(&[1, 2]), vec![-4.0, -5.0]);
    }

    #[test]
    fn transpose_swaps_shape() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 1));
        assert_eq!(t.column(0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn randn_is_reproducible_with_seed() {
        let a = Matrix::randn(4, 5, &mut StdRng::seed_from_u64(7));
        let b = Matrix::randn(4, 5, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.data.iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn max_abs_diff_of_different_shapes_is_infinite() {
        assert!(Matrix::zeros(1, 2).max_abs_diff(&Matrix::zeros(2, 1)).is_infinite());
    }

    #[test]
    fn per_row_and_label_updates() {
        let m = Matrix::from_data(vec![vec![2.0, 4.0], vec![3.0, 9.0]]).unwrap();
        assert_eq!(m.sub_per_row(&[1.0, 3.0]).data, vec![vec![1.0, 3.0], vec![0.0, 6.0]]);
        assert_eq!(m.div_per_row(&[2.0, 3.0]).data, vec![vec![1.0, 2.0], vec![1.0, 3.0]]);
        assert_eq!(m.row_sums(), vec![6.0, 12.0]);

        let mut n = m.clone();
        n.set_at_labels(&[1, 0], &[0.0, -1.0]);
        n.add_at_labels(&[0, 0], 0.5);
        assert_eq!(n.data, vec![vec![2.5, 0.0], vec![-0.5, 9.0]]);

        let mut g = Matrix::zeros(2, 2);
        g.add_to_column(1, &[1.0, -2.0], 3.0);
        assert_eq!(g.data, vec![vec![0.0, 3.0], vec![0.0, -6.0]]);
    }
}
