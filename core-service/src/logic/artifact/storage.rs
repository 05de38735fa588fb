use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use super::types::{ArtifactEnvelope, TrainedArtifact};

/// Envelope format written by `save`
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },

    #[error("unsupported artifact format v{0}")]
    UnsupportedFormat(u32),
}

fn checksum(value: &serde_json::Value) -> Result<String, ArtifactError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save an artifact: write a temp file next to `path`, then rename into place
pub fn save(path: &Path, artifact: &TrainedArtifact) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let value = serde_json::to_value(artifact)?;
    let envelope = ArtifactEnvelope {
        format_version: ARTIFACT_FORMAT_VERSION,
        checksum: checksum(&value)?,
        artifact: value,
    };

    let tmp = temp_path(path);
    let written = (|| -> Result<(), ArtifactError> {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, &envelope)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    })();

    if let Err(e) = written.and_then(|_| fs::rename(&tmp, path).map_err(ArtifactError::from)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    log::info!("Saved artifact {} to {}", artifact.id, path.display());
    Ok(())
}

/// Load an artifact. A missing file is `Ok(None)`; anything unreadable is an error.
pub fn load(path: &Path) -> Result<Option<TrainedArtifact>, ArtifactError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let envelope: ArtifactEnvelope = serde_json::from_slice(&data)?;

    if envelope.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedFormat(envelope.format_version));
    }

    let actual = checksum(&envelope.artifact)?;
    if actual != envelope.checksum {
        return Err(ArtifactError::Checksum {
            expected: envelope.checksum,
            actual,
        });
    }

    let artifact: TrainedArtifact = serde_json::from_value(envelope.artifact)?;
    Ok(Some(artifact))
}
