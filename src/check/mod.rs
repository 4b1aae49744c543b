pub mod gradient;

pub use gradient::{grad_check_sparse, numerical_gradient, numerical_gradient_at, rel_error, GradCheck};
