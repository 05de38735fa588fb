//! Artifact Module - persisted classifier bundle
//!
//! # Architecture
//! - `types.rs`: `TrainedArtifact`, `ArtifactSummary`, on-disk envelope
//! - `storage.rs`: checksummed JSON save/load
//!
//! # Failure Strategy
//! A missing artifact loads as `None`. A corrupt one is an `ArtifactError`;
//! callers degrade to a fresh training run rather than failing startup.

pub mod storage;
pub mod types;
#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

pub use storage::{ArtifactError, ARTIFACT_FORMAT_VERSION};
pub use types::{ArtifactSummary, TrainedArtifact};

/// Where the current artifact is kept
pub trait ArtifactStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<TrainedArtifact>, ArtifactError>;

    fn save(&self, artifact: &TrainedArtifact) -> Result<(), ArtifactError>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}

/// Single JSON file on local disk
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    path: PathBuf,
}

impl FileArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactStore for FileArtifactStore {
    fn load(&self) -> Result<Option<TrainedArtifact>, ArtifactError> {
        storage::load(&self.path)
    }

    fn save(&self, artifact: &TrainedArtifact) -> Result<(), ArtifactError> {
        storage::save(&self.path, artifact)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
