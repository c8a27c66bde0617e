//! Add a component through the external component CLI and track it.

use std::process::Command;

use crate::error::{Recovered, Warning};
use crate::fetch::Fetcher;
use crate::manifest::{ManifestError, ManifestStore};
use crate::mirror;
use crate::models::{ManifestEntry, SourceType};
use crate::paths::{expand_tilde, Project};

const DEFAULT_ADD_COMMAND: &str = "npx shadcn@latest add";

/// The external command that actually adds a component to the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommand {
    program: String,
    args: Vec<String>,
}

impl AddCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `MCPREG_ADD_COMMAND` when set, otherwise the shadcn CLI.
    pub fn from_env() -> Self {
        let raw = std::env::var("MCPREG_ADD_COMMAND")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADD_COMMAND.to_string());
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Self {
        let mut parts = raw.split_whitespace().map(String::from);
        let program = parts.next().unwrap_or_default();
        let program = expand_tilde(&program).to_string_lossy().into_owned();
        Self {
            program,
            args: parts.collect(),
        }
    }

    /// Run with inherited stdio in `project`'s root.
    pub fn run(&self, project: &Project, identifier: &str, no_install: bool) -> Result<(), AddError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(identifier).current_dir(project.root());
        if no_install {
            cmd.arg("--no-install");
        }
        tracing::debug!("Running {:?}", cmd);

        let status = cmd.status().map_err(|e| AddError::Spawn {
            program: self.program.clone(),
            cause: e,
        })?;
        if !status.success() {
            return Err(AddError::ExternalCommand {
                code: status.code().unwrap_or(1),
            });
        }
        Ok(())
    }
}

/// Manifest row for `identifier`. URLs are fetched; anything else is a plain name.
pub fn build_entry(identifier: &str, fetcher: &dyn Fetcher) -> Recovered<ManifestEntry> {
    if !is_url(identifier) {
        return Recovered::clean(ManifestEntry {
            name: identifier.to_string(),
            source_url: None,
            source_type: SourceType::DirectName,
            registry_item: None,
            fetch_error: None,
        });
    }

    let fallback_name = name_from_url(identifier);
    match fetcher.fetch(identifier) {
        Ok(item) => {
            let name = if item.name.trim().is_empty() {
                fallback_name
            } else {
                item.name.clone()
            };
            Recovered::clean(ManifestEntry {
                name,
                source_url: Some(identifier.to_string()),
                source_type: SourceType::UrlSuccess,
                registry_item: Some(item),
                fetch_error: None,
            })
        }
        Err(e) => {
            let reason = e.to_string();
            Recovered::with_warning(
                ManifestEntry {
                    name: fallback_name,
                    source_url: Some(identifier.to_string()),
                    source_type: SourceType::UrlFetchFailed,
                    registry_item: None,
                    fetch_error: Some(reason.clone()),
                },
                Warning::FetchFailed {
                    url: identifier.to_string(),
                    reason,
                },
            )
        }
    }
}

/// What `add` did.
#[derive(Debug, Clone)]
pub struct AddReport {
    pub entry: ManifestEntry,
    /// False when an identical entry was already tracked.
    pub appended: bool,
    pub warnings: Vec<Warning>,
}

/// Compute the entry, run the external command, and record the entry once it succeeded.
pub fn add(
    project: &Project,
    identifier: &str,
    no_install: bool,
    fetcher: &dyn Fetcher,
    command: &AddCommand,
) -> Result<AddReport, AddError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AddError::EmptyIdentifier);
    }

    let mut warnings = Vec::new();
    let entry = build_entry(identifier, fetcher).drain_into(&mut warnings);

    command.run(project, identifier, no_install)?;

    let store = ManifestStore::new(project.manifest_path());
    let appended = store.append(entry.clone())?;
    if appended {
        mirror::rebuild(project).drain_into(&mut warnings);
    }

    Ok(AddReport {
        entry,
        appended,
        warnings,
    })
}

fn is_url(identifier: &str) -> bool {
    identifier.starts_with("http://") || identifier.starts_with("https://")
}

/// Last path segment without query, fragment or `.json`.
fn name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_query);
    segment.strip_suffix(".json").unwrap_or(segment).to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum AddError {
    #[error("Component identifier must not be empty")]
    EmptyIdentifier,
    #[error("Failed to run {program}: {cause}")]
    Spawn {
        program: String,
        #[source]
        cause: std::io::Error,
    },
    #[error("Add command exited with status {code}")]
    ExternalCommand { code: i32 },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl AddError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AddError::ExternalCommand { code } if *code != 0 => *code,
            _ => 1,
        }
    }
}
