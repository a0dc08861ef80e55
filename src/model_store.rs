//! Model checkpoint persistence behind a storage-medium-agnostic trait.
//!
//! The core never touches file paths directly: it talks to a [`ModelStore`]
//! that can load and save versioned [`ModelCheckpoint`]s by key. A missing
//! model is an explicit `NotFound` value, not an exception — the caller
//! branches on it to fall back to training. The default implementation is a
//! sled embedded database with JSON payloads.

use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::predictor::TrainedModelState;

/// Checkpoint format version. Bumped whenever the serialized model layout
/// changes; a mismatch on load is treated as a load failure (retrain).
pub const CHECKPOINT_VERSION: u32 = 1;

/// Model store error types.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    /// No checkpoint stored under the requested key
    #[error("no model checkpoint found for key `{0}`")]
    NotFound(String),
    /// Stored checkpoint has an incompatible format version
    #[error("checkpoint version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    /// Sled database error
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Provenance metadata attached to a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Unix timestamp (seconds) when the checkpoint was created
    pub trained_at: u64,
    /// Seed the training run was driven by
    pub seed: u64,
    /// Synthetic training set size
    pub samples: usize,
}

/// Versioned, serializable snapshot of a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCheckpoint {
    /// Format version for forward compatibility
    pub version: u32,
    /// Provenance metadata
    pub metadata: CheckpointMetadata,
    /// The trained model itself
    pub state: TrainedModelState,
}

impl ModelCheckpoint {
    /// Wrap a trained state in a current-version checkpoint envelope.
    #[must_use]
    pub fn from_state(state: TrainedModelState) -> Self {
        let trained_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            version: CHECKPOINT_VERSION,
            metadata: CheckpointMetadata {
                trained_at,
                seed: state.summary.seed,
                samples: state.summary.samples,
            },
            state,
        }
    }
}

/// Storage abstraction for trained model checkpoints.
///
/// Implementations must reject checkpoints whose `version` does not match
/// [`CHECKPOINT_VERSION`] (return [`ModelStoreError::VersionMismatch`]), so
/// callers can treat any `Err` uniformly as "retrain".
pub trait ModelStore {
    /// Load the checkpoint stored under `key`.
    fn load(&self, key: &str) -> Result<ModelCheckpoint, ModelStoreError>;

    /// Store a checkpoint under `key`, replacing any previous one.
    fn save(&self, key: &str, checkpoint: &ModelCheckpoint) -> Result<(), ModelStoreError>;
}

/// Sled-backed model store with JSON-encoded checkpoint values.
pub struct SledModelStore {
    db: Db,
}

impl SledModelStore {
    /// Open or create the model database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ModelStoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Open a temporary in-memory database (for testing).
    pub fn open_temp() -> Result<Self, ModelStoreError> {
        let config = sled::Config::new().temporary(true);
        let db = config.open()?;
        Ok(Self { db })
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), ModelStoreError> {
        self.db.flush()?;
        Ok(())
    }
}

impl ModelStore for SledModelStore {
    fn load(&self, key: &str) -> Result<ModelCheckpoint, ModelStoreError> {
        let value = self
            .db
            .get(key.as_bytes())?
            .ok_or_else(|| ModelStoreError::NotFound(key.to_string()))?;

        let checkpoint: ModelCheckpoint = serde_json::from_slice(&value)?;
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(ModelStoreError::VersionMismatch {
                found: checkpoint.version,
                expected: CHECKPOINT_VERSION,
            });
        }

        debug!(key, trained_at = checkpoint.metadata.trained_at, "loaded model checkpoint");
        Ok(checkpoint)
    }

    fn save(&self, key: &str, checkpoint: &ModelCheckpoint) -> Result<(), ModelStoreError> {
        let value = serde_json::to_vec(checkpoint)?;
        self.db.insert(key.as_bytes(), value)?;

        debug!(key, entries = self.db.len(), "stored model checkpoint");
        Ok(())
    }
}
