//! mcpreg - MCP installer and component registry tracker
//!
//! Installs an MCP server entry into AI client configs, and tracks components
//! added through the component CLI so they can be removed without breaking
//! the components that share their files.

pub mod add;
pub mod clients;
pub mod config;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod install;
pub mod manifest;
pub mod mirror;
pub mod models;
pub mod paths;
pub mod prune;
pub mod remove;

pub use add::{add, AddCommand, AddError, AddReport};
pub use clients::{resolve_config_path, Client, ClientError};
pub use config::{read_config, write_config, ClientConfig};
pub use error::{Recovered, Warning};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use graph::{normalize_path, resolve_manifest, DependencyGraph};
pub use install::{install, InstallError, Installed};
pub use manifest::{ManifestError, ManifestStore};
pub use models::{ManifestEntry, RegistryFile, RegistryItem, SourceType};
pub use paths::{Paths, Project};
pub use prune::{count_usage, plan_removal, RemovalPlan};
pub use remove::{remove, RemoveError, RemoveOptions, RemoveReport};
