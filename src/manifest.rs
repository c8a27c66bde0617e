//! The component manifest (`21st-registry.json`).

use std::path::{Path, PathBuf};

use crate::error::{Recovered, Warning};
use crate::models::ManifestEntry;

/// Reads and writes the manifest file at a fixed path.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load entries. A missing file is empty; a malformed one is empty with a warning.
    pub fn load(&self) -> Recovered<Vec<ManifestEntry>> {
        match self.load_strict() {
            Ok(entries) => Recovered::clean(entries),
            Err(ManifestError::Missing(_)) => Recovered::clean(Vec::new()),
            Err(e) => Recovered::with_warning(
                Vec::new(),
                Warning::ManifestUnreadable {
                    path: self.path.clone(),
                    reason: e.to_string(),
                },
            ),
        }
    }

    /// Load entries, failing when the file is missing or not a JSON array of entries.
    pub fn load_strict(&self) -> Result<Vec<ManifestEntry>, ManifestError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::Missing(self.path.clone()));
            }
            Err(e) => return Err(ManifestError::ReadFailed(e)),
        };
        serde_json::from_str(&content).map_err(ManifestError::Corrupt)
    }

    /// Append unless an entry with the same name and source type exists.
    /// Returns whether the entry was written.
    pub fn append(&self, entry: ManifestEntry) -> Result<bool, ManifestError> {
        let mut entries = self.load().value;
        if entries.iter().any(|e| e.same_identity(&entry)) {
            tracing::info!(
                "{} ({}) already tracked, skipping",
                entry.name,
                entry.source_type.as_str()
            );
            return Ok(false);
        }
        entries.push(entry);
        self.save(&entries)?;
        Ok(true)
    }

    /// Remove the first entry named `name` and rewrite the file.
    pub fn remove(&self, name: &str) -> Result<ManifestEntry, ManifestError> {
        let mut entries = self.load_strict()?;
        let removed = remove_first_named(&mut entries, name)?;
        self.save(&entries)?;
        Ok(removed)
    }

    pub fn save(&self, entries: &[ManifestEntry]) -> Result<(), ManifestError> {
        let mut output = serde_json::to_string_pretty(entries).map_err(ManifestError::Serialize)?;
        output.push('\n');
        std::fs::write(&self.path, output).map_err(|e| ManifestError::WriteFailed(e, self.path.clone()))?;
        Ok(())
    }
}

/// Take the first entry named `name` out of `entries`.
fn remove_first_named(entries: &mut Vec<ManifestEntry>, name: &str) -> Result<ManifestEntry, ManifestError> {
    let index = entries
        .iter()
        .position(|e| e.name == name)
        .ok_or_else(|| ManifestError::NotFound(name.to_string()))?;
    Ok(entries.remove(index))
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Manifest not found at {}", .0.display())]
    Missing(PathBuf),
    #[error("Component \"{0}\" not found in manifest")]
    NotFound(String),
    #[error("Failed to read manifest: {0}")]
    ReadFailed(#[source] std::io::Error),
    #[error("Manifest is not a valid array of entries: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to write manifest {}: {}", .1.display(), .0)]
    WriteFailed(#[source] std::io::Error, PathBuf),
}
