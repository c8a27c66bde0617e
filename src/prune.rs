//! Reference counting of component files and removal planning.

use std::collections::{BTreeMap, HashSet};

use crate::graph::ResolvedManifest;
use crate::models::ManifestEntry;

/// How many manifest entries claim each file.
pub type UsageCounts = BTreeMap<String, usize>;

/// Count, for each file, the entries whose transitive file list contains it.
/// Lists are expected deduplicated, as `graph::resolve_manifest` returns them.
pub fn count_usage(entry_files: &[Vec<String>]) -> UsageCounts {
    let mut usage = UsageCounts::new();
    for files in entry_files {
        for file in files {
            *usage.entry(file.clone()).or_insert(0) += 1;
        }
    }
    usage
}

/// Outcome of removing one component, computed before anything is touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    /// Usage counts after the target's claims are released.
    pub usage: UsageCounts,
    /// Files in the target's closure nobody references anymore.
    pub orphaned: Vec<String>,
    /// Orphaned files the target declares itself; the only ones to delete.
    pub to_delete: Vec<String>,
}

/// Plan the removal of `entries[target]` against a snapshot of the whole manifest.
pub fn plan_removal(entries: &[ManifestEntry], target: usize, resolved: &ResolvedManifest) -> RemovalPlan {
    let mut usage = count_usage(&resolved.entry_files);

    let Some(entry) = entries.get(target) else {
        return RemovalPlan {
            usage,
            ..Default::default()
        };
    };
    if entry.registry_item.is_none() {
        tracing::debug!("{} has no registry item; no files to prune", entry.name);
        return RemovalPlan {
            usage,
            ..Default::default()
        };
    }

    let graph = &resolved.graph;
    // The target was counted once for each file of its own transitive list;
    // release exactly those claims, once per distinct file in the closure.
    let claimed: HashSet<&String> = resolved.entry_files[target].iter().collect();
    let mut released: Vec<&String> = Vec::new();
    for id in graph.closure(entry.node_id()) {
        let Some(node) = graph.node(id) else { continue };
        for file in &node.files {
            if claimed.contains(file) && !released.contains(&file) {
                released.push(file);
            }
        }
    }

    let mut orphaned = Vec::new();
    for file in released {
        if let Some(count) = usage.get_mut(file) {
            *count -= 1;
            if *count == 0 {
                orphaned.push(file.clone());
            }
        }
    }

    let own = graph.node(entry.node_id()).map(|n| n.files.as_slice()).unwrap_or(&[]);
    let to_delete = orphaned.iter().filter(|f| own.contains(f)).cloned().collect();

    RemovalPlan {
        usage,
        orphaned,
        to_delete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::resolve_manifest;
    use crate::models::{RegistryFile, RegistryItem, SourceType};
    use std::collections::HashMap;

    fn item(name: &str, files: &[&str], deps: &[&str]) -> RegistryItem {
        RegistryItem {
            name: name.into(),
            files: files.iter().map(|p| RegistryFile::new(*p)).collect(),
            registry_dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    fn tracked(name: &str, registry_item: RegistryItem) -> ManifestEntry {
        ManifestEntry {
            name: name.into(),
            source_url: Some(format!("https://r/{name}.json")),
            source_type: SourceType::UrlSuccess,
            registry_item: Some(registry_item),
            fetch_error: None,
        }
    }

    fn registry() -> HashMap<String, RegistryItem> {
        HashMap::from([(
            "https://r/b.json".to_string(),
            item("b", &["/ui/b.tsx", "/lib/utils.ts"], &[]),
        )])
    }

    #[test]
    fn counts_each_entry_claim() {
        let usage = count_usage(&[vec!["x".into(), "y".into()], vec!["x".into()]]);
        assert_eq!(usage["x"], 2);
        assert_eq!(usage["y"], 1);
    }

    #[test]
    fn diamond_dependency_is_kept_while_shared() {
        let entries = vec![
            tracked("a", item("a", &["/ui/a.tsx"], &["https://r/b.json"])),
            tracked("c", item("c", &["/ui/c.tsx"], &["https://r/b.json"])),
        ];
        let resolved = resolve_manifest(&entries, &registry(), ".").value;
        assert_eq!(count_usage(&resolved.entry_files)["ui/b.tsx"], 2);

        let plan = plan_removal(&entries, 0, &resolved);
        assert_eq!(plan.usage["ui/b.tsx"], 1);
        assert_eq!(plan.usage["lib/utils.ts"], 1);
        assert_eq!(plan.to_delete, vec!["ui/a.tsx"]);
        assert_eq!(plan.orphaned, vec!["ui/a.tsx"]);

        // After `a` is gone, removing `c` releases the last claim on `b`'s files.
        let remaining = vec![entries[1].clone()];
        let resolved = resolve_manifest(&remaining, &registry(), ".").value;
        let plan = plan_removal(&remaining, 0, &resolved);
        assert_eq!(plan.usage["ui/b.tsx"], 0);
        assert!(plan.orphaned.contains(&"ui/b.tsx".to_string()));
        assert_eq!(plan.to_delete, vec!["ui/c.tsx"]);
    }

    #[test]
    fn dependency_files_are_never_deleted_by_the_dependent() {
        let entries = vec![tracked("a", item("a", &["/ui/a.tsx"], &["https://r/b.json"]))];
        let resolved = resolve_manifest(&entries, &registry(), ".").value;
        let plan = plan_removal(&entries, 0, &resolved);

        assert_eq!(plan.usage["ui/b.tsx"], 0);
        assert_eq!(plan.to_delete, vec!["ui/a.tsx"]);
    }

    #[test]
    fn own_file_shared_with_another_entry_survives() {
        let entries = vec![
            tracked("a", item("a", &["/ui/a.tsx", "/lib/utils.ts"], &[])),
            tracked("d", item("d", &["/ui/d.tsx", "/lib/utils.ts"], &[])),
        ];
        let resolved = resolve_manifest(&entries, &registry(), ".").value;
        let plan = plan_removal(&entries, 0, &resolved);
        assert_eq!(plan.to_delete, vec!["ui/a.tsx"]);
        assert_eq!(plan.usage["lib/utils.ts"], 1);
    }

    #[test]
    fn file_declared_by_target_and_dependency_is_released_once() {
        let registry = HashMap::from([(
            "https://r/b.json".to_string(),
            item("b", &["/lib/utils.ts"], &[]),
        )]);
        let entries = vec![
            tracked("a", item("a", &["/ui/a.tsx", "/lib/utils.ts"], &["https://r/b.json"])),
            tracked("c", item("c", &["/ui/c.tsx", "/lib/utils.ts"], &[])),
        ];
        let resolved = resolve_manifest(&entries, &registry, ".").value;
        assert_eq!(count_usage(&resolved.entry_files)["lib/utils.ts"], 2);

        let plan = plan_removal(&entries, 0, &resolved);
        assert_eq!(plan.usage["lib/utils.ts"], 1);
        assert_eq!(plan.orphaned, vec!["ui/a.tsx"]);
        assert_eq!(plan.to_delete, vec!["ui/a.tsx"]);
    }

    #[test]
    fn entry_without_descriptor_plans_nothing() {
        let entries = vec![
            ManifestEntry {
                name: "ghost".into(),
                source_url: None,
                source_type: SourceType::DirectName,
                registry_item: None,
                fetch_error: None,
            },
            tracked("a", item("a", &["/ui/a.tsx"], &[])),
        ];
        let resolved = resolve_manifest(&entries, &registry(), ".").value;
        let plan = plan_removal(&entries, 0, &resolved);
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.usage["ui/a.tsx"], 1);
    }
}
