pub mod batch;
pub mod hinge;
pub mod loss_type;
pub mod output;
pub mod regularization;
pub mod softmax;

pub use batch::Batch;
pub use hinge::HingeLoss;
pub use loss_type::{LossType, Method};
pub use output::LossOutput;
pub use softmax::SoftmaxLoss;
