// Shared fixtures for the integration tests.
#![allow(dead_code)]

use ferrite_linear::{LossOutput, Matrix};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Random (W, X, y) with W ~ N(0, weight_scale²) and X ~ N(0, 1).
pub fn random_problem(
    seed: u64,
    num_train: usize,
    num_features: usize,
    num_classes: usize,
    weight_scale: f64,
) -> (Matrix, Matrix, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let weights = Matrix::random_scaled(num_features, num_classes, weight_scale, &mut rng);
    let inputs = Matrix::randn(num_train, num_features, &mut rng);
    let labels = (0..num_train).map(|_| rng.gen_range(0..num_classes)).collect();
    (weights, inputs, labels)
}

/// Asserts two loss outputs agree within 1e-7 relative tolerance.
pub fn assert_outputs_close(a: &LossOutput, b: &LossOutput) {
    approx::assert_relative_eq!(a.loss, b.loss, epsilon = 1e-12, max_relative = 1e-7);
    assert_eq!(a.grad.shape(), b.grad.shape());
    for (ra, rb) in a.grad.data.iter().zip(b.grad.data.iter()) {
        for (x, y) in ra.iter().zip(rb.iter()) {
            approx::assert_relative_eq!(*x, *y, epsilon = 1e-12, max_relative = 1e-7);
        }
    }
}
