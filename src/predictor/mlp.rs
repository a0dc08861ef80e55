//! Feedforward defect regressor: manual backprop + Adam optimizer.
//!
//! Each regressor maps one standardized 9-feature vector to a scalar defect
//! percentage through two ReLU hidden layers (64 then 32) and a linear
//! output. Training is mini-batch gradient descent with Adam, a held-out
//! validation split, and early stopping once validation error stops
//! improving — bounded by a hard epoch cap. The best-validation weights are
//! restored at the end, so a run that hits the cap still yields the best
//! model seen (non-fatal, partially converged).

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::TrainingConfig;
use crate::types::NUM_FEATURES;

/// First hidden layer width.
pub const HIDDEN_1: usize = 64;

/// Second hidden layer width.
pub const HIDDEN_2: usize = 32;

/// Max gradient norm for global gradient clipping.
const MAX_GRAD_NORM: f64 = 5.0;

/// Fitted regressor weights. Read-only after training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpRegressor {
    /// Layer 1 weights, row-major [HIDDEN_1 x NUM_FEATURES]
    w1: Vec<f64>,
    b1: Vec<f64>,
    /// Layer 2 weights, row-major [HIDDEN_2 x HIDDEN_1]
    w2: Vec<f64>,
    b2: Vec<f64>,
    /// Output weights [HIDDEN_2]
    w3: Vec<f64>,
    b3: f64,
}

/// Forward-pass intermediates kept for backprop.
struct ForwardCache {
    z1: [f64; HIDDEN_1],
    a1: [f64; HIDDEN_1],
    z2: [f64; HIDDEN_2],
    a2: [f64; HIDDEN_2],
    output: f64,
}

/// Training outcome diagnostics for one regressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    /// Epochs actually run (≤ max_epochs)
    pub epochs_run: usize,
    /// Best validation MSE observed (weights restored to this point)
    pub best_val_mse: f64,
    /// Whether early stopping fired before the epoch cap
    pub stopped_early: bool,
}

impl MlpRegressor {
    /// Glorot-uniform initialization from a seeded RNG.
    fn init(rng: &mut StdRng) -> Self {
        let glorot = |fan_in: usize, fan_out: usize, rng: &mut StdRng| -> Vec<f64> {
            let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
            (0..fan_in * fan_out)
                .map(|_| rng.gen_range(-limit..limit))
                .collect()
        };

        Self {
            w1: glorot(NUM_FEATURES, HIDDEN_1, rng),
            b1: vec![0.0; HIDDEN_1],
            w2: glorot(HIDDEN_1, HIDDEN_2, rng),
            b2: vec![0.0; HIDDEN_2],
            w3: glorot(HIDDEN_2, 1, rng),
            b3: 0.0,
        }
    }

    /// Number of trainable parameters.
    #[must_use]
    pub fn num_params(&self) -> usize {
        self.w1.len() + self.b1.len() + self.w2.len() + self.b2.len() + self.w3.len() + 1
    }

    /// Forward pass returning the raw (unclamped) regression output.
    #[must_use]
    pub fn predict(&self, x: &[f64; NUM_FEATURES]) -> f64 {
        self.forward(x).output
    }

    fn forward(&self, x: &[f64; NUM_FEATURES]) -> ForwardCache {
        let mut z1 = [0.0_f64; HIDDEN_1];
        let mut a1 = [0.0_f64; HIDDEN_1];
        for j in 0..HIDDEN_1 {
            let mut sum = self.b1[j];
            let row = &self.w1[j * NUM_FEATURES..(j + 1) * NUM_FEATURES];
            for (w, xi) in row.iter().zip(x.iter()) {
                sum += w * xi;
            }
            z1[j] = sum;
            a1[j] = sum.max(0.0);
        }

        let mut z2 = [0.0_f64; HIDDEN_2];
        let mut a2 = [0.0_f64; HIDDEN_2];
        for j in 0..HIDDEN_2 {
            let mut sum = self.b2[j];
            let row = &self.w2[j * HIDDEN_1..(j + 1) * HIDDEN_1];
            for (w, ai) in row.iter().zip(a1.iter()) {
                sum += w * ai;
            }
            z2[j] = sum;
            a2[j] = sum.max(0.0);
        }

        let mut output = self.b3;
        for (w, ai) in self.w3.iter().zip(a2.iter()) {
            output += w * ai;
        }

        ForwardCache {
            z1,
            a1,
            z2,
            a2,
            output,
        }
    }

    /// Mean squared error over a set of rows.
    fn mse(&self, rows: &[[f64; NUM_FEATURES]], targets: &[f64], indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let sum: f64 = indices
            .iter()
            .map(|&i| {
                let err = self.predict(&rows[i]) - targets[i];
                err * err
            })
            .sum();
        sum / indices.len() as f64
    }
}

/// Accumulated gradients matching the `MlpRegressor` layout.
struct GradAccum {
    d_w1: Vec<f64>,
    d_b1: Vec<f64>,
    d_w2: Vec<f64>,
    d_b2: Vec<f64>,
    d_w3: Vec<f64>,
    d_b3: f64,
}

impl GradAccum {
    fn zeroed() -> Self {
        Self {
            d_w1: vec![0.0; HIDDEN_1 * NUM_FEATURES],
            d_b1: vec![0.0; HIDDEN_1],
            d_w2: vec![0.0; HIDDEN_2 * HIDDEN_1],
            d_b2: vec![0.0; HIDDEN_2],
            d_w3: vec![0.0; HIDDEN_2],
            d_b3: 0.0,
        }
    }

    /// L2 norm over all accumulated gradients.
    fn grad_norm(&self) -> f64 {
        let mut sum = self.d_b3 * self.d_b3;
        for v in self
            .d_w1
            .iter()
            .chain(self.d_b1.iter())
            .chain(self.d_w2.iter())
            .chain(self.d_b2.iter())
            .chain(self.d_w3.iter())
        {
            sum += v * v;
        }
        sum.sqrt()
    }

    fn scale(&mut self, factor: f64) {
        for v in self
            .d_w1
            .iter_mut()
            .chain(self.d_b1.iter_mut())
            .chain(self.d_w2.iter_mut())
            .chain(self.d_b2.iter_mut())
            .chain(self.d_w3.iter_mut())
        {
            *v *= factor;
        }
        self.d_b3 *= factor;
    }
}

/// Adam optimizer over the flattened parameter vector.
#[derive(Debug, Clone)]
struct AdamOptimizer {
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    steps: u64,
    m: Vec<f64>,
    v: Vec<f64>,
}

impl AdamOptimizer {
    fn new(num_params: usize, lr: f64) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            steps: 0,
            m: vec![0.0; num_params],
            v: vec![0.0; num_params],
        }
    }

    /// Apply one Adam update to flattened weights given flattened gradients.
    fn apply(&mut self, weights_flat: &mut [f64], grads_flat: &[f64]) {
        self.steps += 1;
        let t = self.steps as f64;

        // Bias-corrected LR
        let lr_t = self.lr * (1.0 - self.beta2.powf(t)).sqrt() / (1.0 - self.beta1.powf(t));

        for i in 0..weights_flat.len() {
            let g = grads_flat[i];
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * g * g;
            weights_flat[i] -= lr_t * self.m[i] / (self.v[i].sqrt() + self.eps);
        }
    }
}

fn flatten_weights(m: &MlpRegressor) -> Vec<f64> {
    let mut flat = Vec::with_capacity(m.num_params());
    flat.extend_from_slice(&m.w1);
    flat.extend_from_slice(&m.b1);
    flat.extend_from_slice(&m.w2);
    flat.extend_from_slice(&m.b2);
    flat.extend_from_slice(&m.w3);
    flat.push(m.b3);
    flat
}

fn flatten_grads(g: &GradAccum) -> Vec<f64> {
    let mut flat = Vec::with_capacity(
        g.d_w1.len() + g.d_b1.len() + g.d_w2.len() + g.d_b2.len() + g.d_w3.len() + 1,
    );
    flat.extend_from_slice(&g.d_w1);
    flat.extend_from_slice(&g.d_b1);
    flat.extend_from_slice(&g.d_w2);
    flat.extend_from_slice(&g.d_b2);
    flat.extend_from_slice(&g.d_w3);
    flat.push(g.d_b3);
    flat
}

fn unflatten_weights(flat: &[f64], m: &mut MlpRegressor) {
    let mut offset = 0;
    let n = m.w1.len();
    m.w1.copy_from_slice(&flat[offset..offset + n]);
    offset += n;
    let n = m.b1.len();
    m.b1.copy_from_slice(&flat[offset..offset + n]);
    offset += n;
    let n = m.w2.len();
    m.w2.copy_from_slice(&flat[offset..offset + n]);
    offset += n;
    let n = m.b2.len();
    m.b2.copy_from_slice(&flat[offset..offset + n]);
    offset += n;
    let n = m.w3.len();
    m.w3.copy_from_slice(&flat[offset..offset + n]);
    offset += n;
    m.b3 = flat[offset];
}

/// Backprop one sample into the gradient accumulator.
///
/// `d_output` is dL/dy for this sample (already divided by batch size).
fn backprop_sample(
    grads: &mut GradAccum,
    model: &MlpRegressor,
    x: &[f64; NUM_FEATURES],
    cache: &ForwardCache,
    d_output: f64,
) {
    // Output layer: y = w3 · a2 + b3
    grads.d_b3 += d_output;
    let mut d_a2 = [0.0_f64; HIDDEN_2];
    for j in 0..HIDDEN_2 {
        grads.d_w3[j] += d_output * cache.a2[j];
        d_a2[j] = d_output * model.w3[j];
    }

    // Hidden 2: a2 = relu(z2), z2 = W2 a1 + b2
    let mut d_a1 = [0.0_f64; HIDDEN_1];
    for j in 0..HIDDEN_2 {
        if cache.z2[j] <= 0.0 {
            continue;
        }
        let d_z2 = d_a2[j];
        grads.d_b2[j] += d_z2;
        let row = j * HIDDEN_1;
        for k in 0..HIDDEN_1 {
            grads.d_w2[row + k] += d_z2 * cache.a1[k];
            d_a1[k] += d_z2 * model.w2[row + k];
        }
    }

    // Hidden 1: a1 = relu(z1), z1 = W1 x + b1
    for k in 0..HIDDEN_1 {
        if cache.z1[k] <= 0.0 {
            continue;
        }
        let d_z1 = d_a1[k];
        grads.d_b1[k] += d_z1;
        let row = k * NUM_FEATURES;
        for (i, xi) in x.iter().enumerate() {
            grads.d_w1[row + i] += d_z1 * xi;
        }
    }
}

/// Fit one regressor on standardized features.
///
/// Deterministic given (features, targets, config, seed). The shuffled
/// tail `validation_fraction` of the samples is held out; training stops
/// when validation MSE fails to improve by `tol` for `patience` epochs, or
/// at `max_epochs`. The returned model carries the best-validation weights.
pub fn fit(
    features: &[[f64; NUM_FEATURES]],
    targets: &[f64],
    config: &TrainingConfig,
    seed: u64,
) -> (MlpRegressor, FitSummary) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = MlpRegressor::init(&mut rng);
    let mut optimizer = AdamOptimizer::new(model.num_params(), config.learning_rate);

    // Shuffled split: tail fraction held out for validation
    let n = features.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    let n_val = ((n as f64 * config.validation_fraction).round() as usize).max(1);
    let split = n - n_val;
    let val_indices: Vec<usize> = indices[split..].to_vec();
    let mut train_indices: Vec<usize> = indices[..split].to_vec();

    let mut best_val_mse = model.mse(features, targets, &val_indices);
    let mut best_weights = model.clone();
    let mut stall = 0_usize;
    let mut stopped_early = false;
    let mut epochs_run = 0_usize;

    for _epoch in 0..config.max_epochs {
        epochs_run += 1;
        train_indices.shuffle(&mut rng);

        for batch in train_indices.chunks(config.batch_size) {
            let mut grads = GradAccum::zeroed();
            let scale = 1.0 / batch.len() as f64;

            for &i in batch {
                let cache = model.forward(&features[i]);
                let d_output = 2.0 * (cache.output - targets[i]) * scale;
                backprop_sample(&mut grads, &model, &features[i], &cache, d_output);
            }

            let norm = grads.grad_norm();
            if norm > MAX_GRAD_NORM {
                grads.scale(MAX_GRAD_NORM / norm);
            }

            let mut flat_w = flatten_weights(&model);
            let flat_g = flatten_grads(&grads);
            optimizer.apply(&mut flat_w, &flat_g);
            unflatten_weights(&flat_w, &mut model);
        }

        let val_mse = model.mse(features, targets, &val_indices);
        if val_mse < best_val_mse - config.tol {
            best_val_mse = val_mse;
            best_weights = model.clone();
            stall = 0;
        } else {
            stall += 1;
            if stall >= config.patience {
                stopped_early = true;
                break;
            }
        }
    }

    (
        best_weights,
        FitSummary {
            epochs_run,
            best_val_mse,
            stopped_early,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Linear toy target: easy for the network, fast to fit.
    fn toy_data(n: usize) -> (Vec<[f64; NUM_FEATURES]>, Vec<f64>) {
        let mut rng = StdRng::seed_from_u64(7);
        let mut rows = Vec::with_capacity(n);
        let mut targets = Vec::with_capacity(n);
        for _ in 0..n {
            let mut row = [0.0_f64; NUM_FEATURES];
            for v in &mut row {
                *v = rng.gen_range(-1.0..1.0);
            }
            targets.push(0.8 * row[0] - 0.3 * row[4] + 0.1);
            rows.push(row);
        }
        (rows, targets)
    }

    fn small_config(max_epochs: usize) -> TrainingConfig {
        TrainingConfig {
            samples: 120,
            max_epochs,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (rows, targets) = toy_data(120);
        let config = small_config(20);

        let (model_a, summary_a) = fit(&rows, &targets, &config, 42);
        let (model_b, summary_b) = fit(&rows, &targets, &config, 42);

        assert_eq!(summary_a, summary_b);
        let probe = [0.5; NUM_FEATURES];
        assert!((model_a.predict(&probe) - model_b.predict(&probe)).abs() < 1e-12);
    }

    #[test]
    fn test_training_improves_validation_error() {
        let (rows, targets) = toy_data(120);

        let (_, short) = fit(&rows, &targets, &small_config(1), 42);
        let (_, long) = fit(&rows, &targets, &small_config(80), 42);

        assert!(
            long.best_val_mse < short.best_val_mse,
            "80 epochs should beat 1 epoch: {} vs {}",
            long.best_val_mse,
            short.best_val_mse
        );
    }

    #[test]
    fn test_epoch_cap_respected() {
        let (rows, targets) = toy_data(60);
        let (_, summary) = fit(&rows, &targets, &small_config(5), 42);
        assert!(summary.epochs_run <= 5);
    }

    #[test]
    fn test_early_stop_on_flat_target() {
        // Constant target converges almost immediately, so patience should
        // fire well before the cap.
        let (rows, _) = toy_data(100);
        let targets = vec![1.0; rows.len()];
        let config = small_config(500);
        let (_, summary) = fit(&rows, &targets, &config, 42);
        assert!(summary.stopped_early);
        assert!(summary.epochs_run < config.max_epochs);
    }

    #[test]
    fn test_predictions_finite() {
        let (rows, targets) = toy_data(100);
        let (model, _) = fit(&rows, &targets, &small_config(10), 42);
        for row in &rows {
            assert!(model.predict(row).is_finite());
        }
    }
}
