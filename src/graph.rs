//! Dependency graph over registry descriptors.
//!
//! Each manifest entry that carries a descriptor is resolved into the list of
//! files it owns transitively: its own files followed by the files of every
//! registry dependency, fetched on demand. Resolution is memoized per node so a
//! dependency shared by several components is fetched and walked once.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{record, Recovered, Warning};
use crate::fetch::Fetcher;
use crate::models::{ManifestEntry, RegistryItem};

/// A resolved descriptor: the files it declares itself and the nodes it depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub files: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Per-invocation cache of resolved nodes and their transitive file lists.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<String, Node>,
    resolved: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn is_resolved(&self, id: &str) -> bool {
        self.resolved.contains_key(id)
    }

    /// Transitive, deduplicated files of a resolved node.
    pub fn files_of(&self, id: &str) -> &[String] {
        self.resolved.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `id` and every node reachable from it, each listed once, breadth first.
    pub fn closure<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(id);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            if let Some(node) = self.nodes.get(current) {
                queue.extend(node.dependencies.iter().map(String::as_str));
            }
        }
        order
    }
}

/// Resolves descriptors into a [`DependencyGraph`], fetching dependencies through `fetcher`.
pub struct Resolver<'a> {
    fetcher: &'a dyn Fetcher,
    working_dir: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, working_dir: &'a str) -> Self {
        Self { fetcher, working_dir }
    }

    /// Files owned by `id` (described by `item`) and its dependencies, in first-seen order.
    pub fn resolve(
        &self,
        graph: &mut DependencyGraph,
        id: &str,
        item: &RegistryItem,
        warnings: &mut Vec<Warning>,
    ) -> Vec<String> {
        if let Some(files) = graph.resolved.get(id) {
            return files.clone();
        }
        // Placeholder so a dependency cycle back to `id` terminates.
        graph.resolved.insert(id.to_string(), Vec::new());

        let own: Vec<String> = item
            .files
            .iter()
            .map(|f| normalize_path(self.working_dir, &f.path))
            .collect();
        graph.nodes.insert(
            id.to_string(),
            Node {
                files: own.clone(),
                dependencies: item.registry_dependencies.clone(),
            },
        );

        let mut files = own;
        for url in &item.registry_dependencies {
            if !graph.is_resolved(url) {
                match self.fetcher.fetch(url) {
                    Ok(dep) => {
                        self.resolve(graph, url, &dep, warnings);
                    }
                    Err(e) => {
                        record(
                            warnings,
                            Warning::FetchFailed {
                                url: url.clone(),
                                reason: e.to_string(),
                            },
                        );
                        graph.nodes.insert(url.clone(), Node::default());
                        graph.resolved.insert(url.clone(), Vec::new());
                    }
                }
            }
            files.extend(graph.files_of(url).iter().cloned());
        }

        let files = dedup_preserving_order(files);
        graph.resolved.insert(id.to_string(), files.clone());
        tracing::debug!("Resolved {} -> {} file(s)", id, files.len());
        files
    }
}

/// Per-entry transitive file lists, aligned with the manifest order.
/// Entries without a descriptor own nothing.
#[derive(Debug, Default)]
pub struct ResolvedManifest {
    pub graph: DependencyGraph,
    pub entry_files: Vec<Vec<String>>,
}

/// Resolve every entry of the manifest through one shared cache.
pub fn resolve_manifest(
    entries: &[ManifestEntry],
    fetcher: &dyn Fetcher,
    working_dir: &str,
) -> Recovered<ResolvedManifest> {
    let resolver = Resolver::new(fetcher, working_dir);
    let mut graph = DependencyGraph::new();
    let mut warnings = Vec::new();

    let entry_files = entries
        .iter()
        .map(|entry| match &entry.registry_item {
            Some(item) => resolver.resolve(&mut graph, entry.node_id(), item, &mut warnings),
            None => Vec::new(),
        })
        .collect();

    Recovered {
        value: ResolvedManifest { graph, entry_files },
        warnings,
    }
}

/// Strip a leading `/` and put the path under `working_dir` unless it already is.
pub fn normalize_path(working_dir: &str, file_path: &str) -> String {
    let path = file_path.strip_prefix('/').unwrap_or(file_path);
    let prefix = working_dir.trim_start_matches("./").trim_end_matches('/');
    if prefix.is_empty() || prefix == "." || path == prefix || path.starts_with(&format!("{prefix}/")) {
        return path.to_string();
    }
    format!("{}/{}", prefix, path)
}

fn dedup_preserving_order(files: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    files.into_iter().filter(|f| seen.insert(f.clone())).collect()
}
