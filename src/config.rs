//! Client configuration files (read / merge-write).

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::clients::{Client, ServersKey};
use crate::paths::Paths;

/// Contents of a client config file. The server map key is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    key: ServersKey,
    servers: Map<String, Value>,
    rest: Map<String, Value>,
}

impl ClientConfig {
    /// Empty config with an empty server map.
    pub fn empty(key: ServersKey) -> Self {
        Self {
            key,
            servers: Map::new(),
            rest: Map::new(),
        }
    }

    /// Wrap parsed JSON, coercing anything unusable to an empty config.
    fn from_value(key: ServersKey, value: Value) -> Self {
        let mut rest = match value {
            Value::Object(m) => m,
            _ => return Self::empty(key),
        };
        let servers = match rest.remove(key.as_str()) {
            Some(Value::Object(m)) => m,
            _ => Map::new(),
        };
        Self { key, servers, rest }
    }

    /// Partial config holding a single server entry.
    pub fn with_server(key: ServersKey, name: &str, definition: Value) -> Self {
        let mut config = Self::empty(key);
        config.servers.insert(name.to_string(), definition);
        config
    }

    pub fn servers(&self) -> &Map<String, Value> {
        &self.servers
    }

    /// Any top-level field other than the server map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.rest.get(key)
    }

    /// Shallow-merge `other`'s servers into this config. Incoming entries win.
    pub fn merge_servers(&mut self, other: &ClientConfig) {
        for (name, def) in &other.servers {
            self.servers.insert(name.clone(), def.clone());
        }
    }

    pub fn to_value(&self) -> Value {
        let mut root = self.rest.clone();
        root.insert(self.key.as_str().to_string(), Value::Object(self.servers.clone()));
        Value::Object(root)
    }
}

/// Read a client's config. Missing or unparsable files read as empty.
pub fn read_config(paths: &Paths, client: Client) -> ClientConfig {
    read_config_at(&client.config_path(paths), client.servers_key())
}

fn read_config_at(path: &Path, key: ServersKey) -> ClientConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("No readable config at {}: {}", path.display(), e);
            return ClientConfig::empty(key);
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(v) => ClientConfig::from_value(key, v),
        Err(e) => {
            tracing::debug!("Config parse error at {}: {}", path.display(), e);
            ClientConfig::empty(key)
        }
    }
}

/// Merge `partial`'s servers into the client's config file and write it back.
/// Returns the path written.
pub fn write_config(paths: &Paths, client: Client, partial: &ClientConfig) -> Result<PathBuf, ConfigError> {
    let path = client.config_path(paths);
    write_config_at(&path, client.servers_key(), partial)?;
    Ok(path)
}

fn write_config_at(path: &Path, key: ServersKey, partial: &ClientConfig) -> Result<(), ConfigError> {
    if partial.key != key {
        return Err(ConfigError::InvalidServers(key.as_str()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut merged = read_config_at(path, key);
    merged.merge_servers(partial);

    let mut output = serde_json::to_string_pretty(&merged.to_value()).map_err(ConfigError::Serialize)?;
    output.push('\n');
    std::fs::write(path, output).map_err(|source| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Wrote {} server(s) to {}", partial.servers().len(), path.display());
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server map: expected \"{0}\" to be an object")]
    InvalidServers(&'static str),
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: std::io::Error },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = read_config_at(&dir.path().join("none.json"), ServersKey::McpServers);
        assert!(cfg.servers().is_empty());
        assert_eq!(cfg.to_value(), json!({"mcpServers": {}}));
    }

    #[test]
    fn corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let cfg = read_config_at(&path, ServersKey::Servers);
        assert_eq!(cfg.to_value(), json!({"servers": {}}));
    }

    #[test]
    fn non_object_server_map_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.json");
        std::fs::write(&path, r#"{"mcpServers": [1, 2], "theme": "dark"}"#).unwrap();
        let cfg = read_config_at(&path, ServersKey::McpServers);
        assert!(cfg.servers().is_empty());
        assert_eq!(cfg.get("theme"), Some(&json!("dark")));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("config.json");
        let partial = ClientConfig::with_server(ServersKey::McpServers, "x", json!({"command": "x"}));
        write_config_at(&path, ServersKey::McpServers, &partial).unwrap();
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"mcpServers": {"x": {"command": "x"}}}));
    }

    #[test]
    fn merge_keeps_unrelated_keys_and_new_entry_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"customSetting": {"a": 1}, "mcpServers": {"old": {"command": "o"}, "x": {"command": "stale"}}}"#,
        )
        .unwrap();

        let partial = ClientConfig::with_server(ServersKey::McpServers, "x", json!({"command": "fresh"}));
        write_config_at(&path, ServersKey::McpServers, &partial).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["customSetting"], json!({"a": 1}));
        assert_eq!(written["mcpServers"]["old"], json!({"command": "o"}));
        assert_eq!(written["mcpServers"]["x"], json!({"command": "fresh"}));
    }

    #[test]
    fn mismatched_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let partial = ClientConfig::with_server(ServersKey::Servers, "x", json!({}));
        let err = write_config_at(&path, ServersKey::McpServers, &partial).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidServers("mcpServers")));
        assert!(!path.exists());
    }
}
