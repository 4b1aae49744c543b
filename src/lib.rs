pub mod math;
pub mod error;
pub mod loss;
pub mod check;
pub mod config;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use error::{LossError, Result};
pub use loss::hinge::HingeLoss;
pub use loss::softmax::SoftmaxLoss;
pub use loss::loss_type::{LossType, Method};
pub use loss::output::LossOutput;
pub use config::run_config::RunConfig;
