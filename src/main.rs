// Compares the naive and vectorized kernels of one loss on a random batch.
// Usage:
//   ferrite-linear [config.json]
// Log verbosity follows RUST_LOG (default: info).
use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ferrite_linear::check::grad_check_sparse;
use ferrite_linear::{LossOutput, Matrix, Method, Result, RunConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::load_json(&path)?,
        None => RunConfig::default(),
    };
    info!(?config, "starting comparison");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let inputs = Matrix::randn(config.num_train, config.num_features, &mut rng);
    let labels: Vec<usize> = (0..config.num_train)
        .map(|_| rng.gen_range(0..config.num_classes.max(1)))
        .collect();
    let weights = Matrix::random_scaled(config.num_features, config.num_classes, config.weight_scale, &mut rng);

    let mut outputs: Vec<LossOutput> = Vec::with_capacity(Method::ALL.len());
    for method in Method::ALL {
        let t_start = Instant::now();
        let out = config.loss.compute(method, &weights, &inputs, &labels, config.reg)?;
        info!(
            loss = config.loss.name(),
            method = method.name(),
            value = out.loss,
            elapsed_ms = t_start.elapsed().as_secs_f64() * 1e3,
            "computed"
        );
        outputs.push(out);
    }

    let (naive, vectorized) = (&outputs[0], &outputs[1]);
    info!(
        loss_difference = (naive.loss - vectorized.loss).abs(),
        grad_max_abs_difference = naive.grad.max_abs_diff(&vectorized.grad),
        "naive vs vectorized"
    );

    if config.grad_checks > 0 {
        let mut loss_at = |w: &Matrix| -> Result<f64> {
            Ok(config.loss.compute(Method::Vectorized, w, &inputs, &labels, config.reg)?.loss)
        };
        let checks = grad_check_sparse(&mut loss_at, &weights, &vectorized.grad, config.grad_checks, 1e-5, &mut rng)?;
        let worst = checks.iter().map(|c| c.rel_error).fold(0.0, f64::max);
        if worst > 1e-5 {
            warn!(worst_rel_error = worst, "gradient check exceeds 1e-5");
        } else {
            info!(worst_rel_error = worst, checks = checks.len(), "gradient check passed");
        }
    }

    Ok(())
}
