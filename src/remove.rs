//! Remove a tracked component and prune the files nothing else uses.

use std::path::PathBuf;

use crate::error::{record, Warning};
use crate::fetch::Fetcher;
use crate::graph::resolve_manifest;
use crate::manifest::{ManifestError, ManifestStore};
use crate::mirror;
use crate::models::ManifestEntry;
use crate::paths::Project;
use crate::prune::{plan_removal, RemovalPlan};

/// Options for a `remove` run.
#[derive(Debug, Clone)]
pub struct RemoveOptions {
    /// Directory prefix component files are installed under.
    pub working_dir: String,
    pub dry_run: bool,
}

impl Default for RemoveOptions {
    fn default() -> Self {
        Self {
            working_dir: ".".to_string(),
            dry_run: false,
        }
    }
}

/// What `remove` did (or would do, for a dry run).
#[derive(Debug, Clone)]
pub struct RemoveReport {
    pub entry: ManifestEntry,
    pub plan: RemovalPlan,
    pub deleted: Vec<PathBuf>,
    pub dry_run: bool,
    pub warnings: Vec<Warning>,
}

pub fn remove(
    project: &Project,
    name: &str,
    options: &RemoveOptions,
    fetcher: &dyn Fetcher,
) -> Result<RemoveReport, RemoveError> {
    let store = ManifestStore::new(project.manifest_path());
    let entries = store.load_strict()?;

    let target = entries
        .iter()
        .position(|e| e.name == name)
        .ok_or_else(|| ManifestError::NotFound(name.to_string()))?;

    let mut warnings = Vec::new();
    let resolved = resolve_manifest(&entries, fetcher, &options.working_dir).drain_into(&mut warnings);
    let mut plan = plan_removal(&entries, target, &resolved);

    let mut targets = Vec::new();
    plan.to_delete.retain(|file| match project.contained(file) {
        Some(path) => {
            targets.push(path);
            true
        }
        None => {
            record(&mut warnings, Warning::UnsafePath { path: file.clone() });
            false
        }
    });

    tracing::info!(
        "Removing {}: {} file(s) to delete, {} orphaned",
        name,
        plan.to_delete.len(),
        plan.orphaned.len()
    );

    if options.dry_run {
        let entry = entries[target].clone();
        return Ok(RemoveReport {
            entry,
            plan,
            deleted: Vec::new(),
            dry_run: true,
            warnings,
        });
    }

    let mut deleted = Vec::new();
    for path in targets {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Deleted {}", path.display());
                deleted.push(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Already gone: {}", path.display());
            }
            Err(e) => record(
                &mut warnings,
                Warning::DeleteFailed {
                    path,
                    reason: e.to_string(),
                },
            ),
        }
    }

    let entry = store.remove(name)?;
    mirror::rebuild(project).drain_into(&mut warnings);

    Ok(RemoveReport {
        entry,
        plan,
        deleted,
        dry_run: false,
        warnings,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
