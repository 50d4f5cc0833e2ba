//! Persisted quantizer state

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::QuantizerConfig;
use super::event_map::{EventQuantizer, Prototype};
use crate::error::QuantizerError;

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Full quantizer state with parallel per-prototype lists.
///
/// `prototypes[i]`, `usage_counts[i]` and `last_active[i]` describe the same
/// prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizerSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub dimension: usize,
    pub learning_rate: f64,
    pub min_vigilance: f64,
    pub vigilance_step: f64,
    pub vigilance: f64,
    pub prototypes: Vec<Vec<f64>>,
    pub usage_counts: Vec<u64>,
    pub last_active: Vec<u64>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl EventQuantizer {
    /// Capture the complete state.
    pub fn snapshot(&self) -> QuantizerSnapshot {
        QuantizerSnapshot {
            version: SNAPSHOT_VERSION,
            dimension: self.dimension,
            learning_rate: self.learning_rate,
            min_vigilance: self.min_vigilance,
            vigilance_step: self.vigilance_step,
            vigilance: self.vigilance,
            prototypes: self.prototypes.iter().map(|p| p.vector.clone()).collect(),
            usage_counts: self.prototypes.iter().map(|p| p.usage).collect(),
            last_active: self.prototypes.iter().map(|p| p.last_active).collect(),
        }
    }

    /// Rebuild a quantizer, validating that the lists line up.
    pub fn from_snapshot(snapshot: QuantizerSnapshot) -> Result<Self, QuantizerError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(QuantizerError::CorruptSnapshot(format!(
                "unsupported version {}",
                snapshot.version
            )));
        }
        let count = snapshot.prototypes.len();
        if snapshot.usage_counts.len() != count || snapshot.last_active.len() != count {
            return Err(QuantizerError::CorruptSnapshot(format!(
                "{count} prototypes but {} usage counts and {} timestamps",
                snapshot.usage_counts.len(),
                snapshot.last_active.len()
            )));
        }
        let tuning = QuantizerConfig {
            dimension: snapshot.dimension,
            vigilance: snapshot.vigilance,
            learning_rate: snapshot.learning_rate,
            min_vigilance: snapshot.min_vigilance,
            vigilance_step: snapshot.vigilance_step,
        };
        tuning
            .validate()
            .map_err(|e| QuantizerError::CorruptSnapshot(e.to_string()))?;
        if snapshot.vigilance < snapshot.min_vigilance {
            return Err(QuantizerError::CorruptSnapshot(format!(
                "vigilance {} below floor {}",
                snapshot.vigilance, snapshot.min_vigilance
            )));
        }

        let mut quantizer = Self {
            dimension: snapshot.dimension,
            learning_rate: snapshot.learning_rate,
            min_vigilance: snapshot.min_vigilance,
            vigilance_step: snapshot.vigilance_step,
            vigilance: snapshot.vigilance,
            prototypes: Vec::with_capacity(count),
        };

        let rows = snapshot
            .prototypes
            .into_iter()
            .zip(snapshot.usage_counts)
            .zip(snapshot.last_active);
        for (index, ((vector, usage), last_active)) in rows.enumerate() {
            quantizer.validate(&vector).map_err(|e| {
                QuantizerError::CorruptSnapshot(format!("prototype {index}: {e}"))
            })?;
            quantizer.prototypes.push(Prototype {
                vector,
                usage,
                last_active,
            });
        }

        Ok(quantizer)
    }

    /// Serialize to an opaque blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, QuantizerError> {
        Ok(serde_json::to_vec(&self.snapshot())?)
    }

    /// Restore from a blob produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, QuantizerError> {
        let snapshot: QuantizerSnapshot = serde_json::from_slice(bytes)?;
        Self::from_snapshot(snapshot)
    }

    /// Write the state to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), QuantizerError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_bytes()?)?;
        info!(path = %path.display(), prototypes = self.len(), "Saved quantizer state");
        Ok(())
    }

    /// Read state previously written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuantizerError> {
        let path = path.as_ref();
        let quantizer = Self::from_bytes(&std::fs::read(path)?)?;
        info!(path = %path.display(), prototypes = quantizer.len(), "Loaded quantizer state");
        Ok(quantizer)
    }
}
