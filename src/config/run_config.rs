use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::loss::loss_type::LossType;

/// Configuration for one naive-vs-vectorized comparison run.
///
/// # Fields
/// - `loss`         — which loss to evaluate (`hinge` or `softmax`)
/// - `reg`          — L2 regularization strength
/// - `num_train`    — examples in the random batch (N)
/// - `num_features` — feature dimension (D)
/// - `num_classes`  — number of classes (C)
/// - `weight_scale` — standard deviation of the random weights
/// - `seed`         — seed for the data, weight and gradient-check RNG
/// - `grad_checks`  — sampled entries for the sparse gradient check; 0 skips it
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub loss: LossType,
    pub reg: f64,
    pub num_train: usize,
    pub num_features: usize,
    pub num_classes: usize,
    pub weight_scale: f64,
    pub seed: u64,
    pub grad_checks: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            loss: LossType::Softmax,
            reg: 5e-4,
            num_train: 500,
            num_features: 3073,
            num_classes: 10,
            weight_scale: 1e-4,
            seed: 0,
            grad_checks: 10,
        }
    }
}

impl RunConfig {
    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
