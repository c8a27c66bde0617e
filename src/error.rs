//! Non-fatal warnings collected while a command keeps going.

use std::fmt;
use std::path::PathBuf;

/// Something went wrong but the command recovered from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A registry descriptor could not be fetched; the node contributes nothing.
    FetchFailed { url: String, reason: String },
    /// The manifest could not be parsed and was treated as empty.
    ManifestUnreadable { path: PathBuf, reason: String },
    /// A file scheduled for deletion could not be removed.
    DeleteFailed { path: PathBuf, reason: String },
    /// A descriptor path points outside the project and was left alone.
    UnsafePath { path: String },
    /// The mirror registry was not rebuilt.
    MirrorSkipped { reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::FetchFailed { url, reason } => {
                write!(f, "Failed to fetch {}: {}", url, reason)
            }
            Warning::ManifestUnreadable { path, reason } => write!(
                f,
                "Ignoring unreadable manifest {}: {}",
                path.display(),
                reason
            ),
            Warning::DeleteFailed { path, reason } => {
                write!(f, "Failed to delete {}: {}", path.display(), reason)
            }
            Warning::UnsafePath { path } => {
                write!(f, "Refusing to delete {}: outside the project", path)
            }
            Warning::MirrorSkipped { reason } => {
                write!(f, "Skipped registry rebuild: {}", reason)
            }
        }
    }
}

/// Log a warning and keep it for the final report.
pub(crate) fn record(sink: &mut Vec<Warning>, warning: Warning) {
    tracing::warn!("{}", warning);
    sink.push(warning);
}

/// A value together with the warnings recorded while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Recovered<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(value: T, warning: Warning) -> Self {
        tracing::warn!("{}", warning);
        Self {
            value,
            warnings: vec![warning],
        }
    }

    /// Move the warnings into `sink` and return the value.
    pub fn drain_into(self, sink: &mut Vec<Warning>) -> T {
        sink.extend(self.warnings);
        self.value
    }
}
