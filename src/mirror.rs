//! Regenerates `registry.json` from the manifest.

use serde_json::Value;

use crate::error::{Recovered, Warning};
use crate::manifest::ManifestStore;
use crate::paths::Project;

/// Replace the mirror registry's `items` with the manifest's descriptors.
/// Returns the number of items written, or `None` when skipped.
pub fn rebuild(project: &Project) -> Recovered<Option<usize>> {
    let manifest = ManifestStore::new(project.manifest_path());
    let registry_path = project.mirror_registry_path();

    let skip = |reason: String| Recovered::with_warning(None, Warning::MirrorSkipped { reason });

    if !manifest.exists() {
        return skip(format!("{} does not exist", manifest.path().display()));
    }
    if !registry_path.exists() {
        return skip(format!("{} does not exist", registry_path.display()));
    }

    let entries = match manifest.load_strict() {
        Ok(e) => e,
        Err(e) => return skip(e.to_string()),
    };

    let mut registry: Value = match std::fs::read_to_string(&registry_path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(v) => v,
        Err(e) => return skip(format!("cannot read {}: {}", registry_path.display(), e)),
    };
    let Some(root) = registry.as_object_mut() else {
        return skip(format!("{} is not a JSON object", registry_path.display()));
    };

    let items: Vec<Value> = entries
        .iter()
        .filter_map(|e| e.registry_item.as_ref())
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect();
    let count = items.len();
    root.insert("items".to_string(), Value::Array(items));

    let output = match serde_json::to_string_pretty(&registry) {
        Ok(mut s) => {
            s.push('\n');
            s
        }
        Err(e) => return skip(e.to_string()),
    };
    if let Err(e) = std::fs::write(&registry_path, output) {
        return skip(format!("cannot write {}: {}", registry_path.display(), e));
    }

    tracing::debug!("Rebuilt {} with {} item(s)", registry_path.display(), count);
    Recovered::clean(Some(count))
}
