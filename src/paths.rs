//! Path resolution for client configs and the project directory.
//!
//! Uses env vars when set, otherwise platform defaults from `dirs`.

use std::path::{Component, Path, PathBuf};

/// Resolved base directories.
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub config_base: PathBuf,
}

impl Paths {
    /// Resolve paths from environment, falling back to platform defaults.
    pub fn resolve() -> Self {
        let home = resolve_path("MCPREG_HOME", dirs::home_dir(), "~");
        // %APPDATA% on Windows, ~/Library/Application Support on macOS, XDG elsewhere.
        let config_base = resolve_path(
            "MCPREG_CONFIG_DIR",
            dirs::config_dir(),
            "~/.config",
        );

        Self { home, config_base }
    }

    /// Build paths rooted at explicit directories (used by tests and embedding callers).
    pub fn with_roots(home: impl Into<PathBuf>, config_base: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            config_base: config_base.into(),
        }
    }

    /// User home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Platform application config base.
    pub fn config_base(&self) -> &Path {
        &self.config_base
    }
}

/// The project directory a component command operates on.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

pub const MANIFEST_FILE: &str = "21st-registry.json";
pub const HIDDEN_MANIFEST_FILE: &str = ".21st-registry.json";
pub const MIRROR_REGISTRY_FILE: &str = "registry.json";

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Current working directory, or `--project` when given.
    pub fn resolve(explicit: Option<&str>) -> std::io::Result<Self> {
        match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(dir) => Ok(Self::new(expand_tilde(dir))),
            None => Ok(Self::new(std::env::current_dir()?)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Manifest path. Prefers the visible name unless only the hidden one exists.
    pub fn manifest_path(&self) -> PathBuf {
        let visible = self.root.join(MANIFEST_FILE);
        let hidden = self.root.join(HIDDEN_MANIFEST_FILE);
        if !visible.exists() && hidden.exists() {
            hidden
        } else {
            visible
        }
    }

    pub fn mirror_registry_path(&self) -> PathBuf {
        self.root.join(MIRROR_REGISTRY_FILE)
    }

    /// Join a project-relative file path onto the root.
    /// `None` when the path is absolute or climbs out with `..`.
    pub fn contained(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside || relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

fn resolve_path(env_var: &str, platform_default: Option<PathBuf>, fallback: &str) -> PathBuf {
    if let Ok(val) = std::env::var(env_var) {
        let trimmed = val.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    platform_default.unwrap_or_else(|| expand_tilde(fallback))
}

pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}
