use thiserror::Error;

#[derive(Error, Debug)]
pub enum LossError {
    #[error("shape mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("label {label} at index {index} is outside [0, {classes})")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        classes: usize,
    },
    #[error("batch contains no examples")]
    EmptyBatch,
    #[error("regularization strength must be finite and non-negative, got {0}")]
    InvalidRegularization(f64),
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LossError>;
