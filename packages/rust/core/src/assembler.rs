//! Artifact writer.
//!
//! Each artifact is rendered completely in memory before it reaches disk,
//! written in one call to a hidden sibling temp file, then renamed over the
//! target so readers never observe a half-written file.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use storyboard_shared::{Result, StoryboardError};

/// Metadata for a single written artifact.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ArtifactMeta {
    /// Final artifact location.
    pub path: PathBuf,
    /// Hex SHA-256 of the written bytes.
    pub sha256: String,
    /// Size of the written content.
    pub size_bytes: usize,
}

/// Write `content` to `target` atomically (write to temp, then rename).
#[instrument(skip_all, fields(path = %target.display(), size = content.len()))]
pub fn write_artifact(target: &Path, content: &str) -> Result<ArtifactMeta> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| StoryboardError::io(&dir, e))?;

    let filename = target
        .file_name()
        .ok_or_else(|| {
            StoryboardError::validation(format!(
                "artifact path {} has no file name",
                target.display()
            ))
        })?
        .to_string_lossy();
    let temp = dir.join(format!(".{filename}.tmp"));

    // Write to temp file first
    std::fs::write(&temp, content).map_err(|e| StoryboardError::io(&temp, e))?;

    // Atomic rename
    if let Err(e) = std::fs::rename(&temp, target) {
        if let Err(cleanup) = std::fs::remove_file(&temp) {
            warn!(temp = %temp.display(), error = %cleanup, "failed to remove temp file");
        }
        return Err(StoryboardError::io(target, e));
    }

    let sha256 = checksum(content);
    debug!(sha256 = %sha256, "wrote artifact");
    info!(path = %target.display(), size = content.len(), "artifact written");

    Ok(ArtifactMeta {
        path: target.to_path_buf(),
        sha256,
        size_bytes: content.len(),
    })
}

/// Hex SHA-256 of `content`.
pub fn checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
