//! Model training maintenance tool.
//!
//! Trains the warpage/sinkage regressors on the synthetic dataset and saves
//! a versioned checkpoint into the model store. Runs off the serving path:
//! a serving process only loads the result (or trains once at cold start if
//! no checkpoint exists).
//!
//! # Usage
//! ```bash
//! train-model --model-dir data/models --seed 42 --samples 500
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use moldiq::config::TrainingConfig;
use moldiq::model_store::{ModelCheckpoint, ModelStore, SledModelStore};
use moldiq::predictor::TrainedModelState;

/// Default store key for the molding defect model.
const DEFAULT_MODEL_KEY: &str = "molding/default";

#[derive(Parser, Debug)]
#[command(name = "train-model")]
#[command(about = "Train and persist the MoldIQ defect prediction model")]
#[command(version = "1.0")]
struct Args {
    /// Model store directory
    #[arg(long, default_value = "data/models")]
    model_dir: PathBuf,

    /// Store key to save the checkpoint under
    #[arg(long, default_value = DEFAULT_MODEL_KEY)]
    key: String,

    /// Optional TOML config file (CLI flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducible training
    #[arg(long)]
    seed: Option<u64>,

    /// Synthetic training set size
    #[arg(long)]
    samples: Option<usize>,

    /// Maximum training epochs per regressor
    #[arg(long)]
    max_epochs: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TrainingConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    if let Some(max_epochs) = args.max_epochs {
        config.max_epochs = max_epochs;
    }
    config.validate().context("invalid training config")?;

    let store = SledModelStore::open(&args.model_dir)
        .with_context(|| format!("opening model store at {}", args.model_dir.display()))?;

    let state = TrainedModelState::train(&config);
    let summary = state.summary.clone();

    let checkpoint = ModelCheckpoint::from_state(state);
    store
        .save(&args.key, &checkpoint)
        .context("saving model checkpoint")?;
    store.flush().context("flushing model store")?;

    info!(
        key = %args.key,
        seed = summary.seed,
        samples = summary.samples,
        warpage_epochs = summary.warpage.epochs_run,
        warpage_val_mse = summary.warpage.best_val_mse,
        sinkage_epochs = summary.sinkage.epochs_run,
        sinkage_val_mse = summary.sinkage.best_val_mse,
        "model trained and saved"
    );

    Ok(())
}
