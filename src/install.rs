//! Install the FlyonUI MCP server entry into a client config.

use std::path::PathBuf;

use serde_json::json;

use crate::clients::{Client, ServersKey};
use crate::config::{write_config, ClientConfig, ConfigError};
use crate::paths::Paths;

pub const SERVER_NAME: &str = "flyonui";
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

/// What `install` did.
#[derive(Debug, Clone)]
pub struct Installed {
    pub client: Client,
    pub config_path: PathBuf,
    pub used_placeholder_key: bool,
}

/// Server block registered for `client`. VS Code entries need an explicit transport type.
pub fn default_config(client: Client, api_key: Option<&str>) -> ClientConfig {
    let key = client.servers_key();
    let api_key = api_key.unwrap_or(API_KEY_PLACEHOLDER);

    let mut server = json!({
        "command": "npx",
        "args": ["-y", "flyonui-mcp"],
        "env": { "API_KEY": api_key }
    });
    if key == ServersKey::Servers {
        server["type"] = json!("stdio");
    }

    ClientConfig::with_server(key, SERVER_NAME, server)
}

/// Merge the server entry into the client's config file.
pub fn install(paths: &Paths, client: Client, api_key: Option<&str>) -> Result<Installed, InstallError> {
    let api_key = api_key.map(str::trim).filter(|k| !k.is_empty());
    let config = default_config(client, api_key);
    let config_path = write_config(paths, client, &config)?;

    tracing::info!("Installed {} into {}", SERVER_NAME, config_path.display());

    Ok(Installed {
        client,
        config_path,
        used_placeholder_key: api_key.is_none(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sandbox() -> (tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::with_roots(dir.path().join("home"), dir.path().join("config"));
        (dir, paths)
    }

    #[test]
    fn install_is_idempotent() {
        let (_dir, paths) = sandbox();
        let first = install(&paths, Client::Claude, Some("k-123")).unwrap();
        let after_first = std::fs::read(&first.config_path).unwrap();

        let second = install(&paths, Client::Claude, Some("k-123")).unwrap();
        let after_second = std::fs::read(&second.config_path).unwrap();

        assert_eq!(after_first, after_second);
        assert!(!first.used_placeholder_key);

        let config = crate::config::read_config(&paths, Client::Claude);
        assert_eq!(config.servers().len(), 1);
        assert!(config.servers().contains_key(SERVER_NAME));
    }

    #[test]
    fn missing_key_uses_placeholder() {
        let (_dir, paths) = sandbox();
        let installed = install(&paths, Client::Cursor, None).unwrap();
        assert!(installed.used_placeholder_key);

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&installed.config_path).unwrap()).unwrap();
        assert_eq!(written["mcpServers"][SERVER_NAME]["env"]["API_KEY"], API_KEY_PLACEHOLDER);
    }

    #[test]
    fn vscode_entry_goes_under_servers() {
        let (_dir, paths) = sandbox();
        let installed = install(&paths, Client::VsCode, Some("k")).unwrap();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&installed.config_path).unwrap()).unwrap();
        assert_eq!(written["servers"][SERVER_NAME]["type"], "stdio");
        assert!(written.get("mcpServers").is_none());
    }

    #[test]
    fn preserves_existing_settings() {
        let (_dir, paths) = sandbox();
        let path = Client::Windsurf.config_path(&paths);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"telemetry": false, "mcpServers": {"other": {"command": "x"}}}"#).unwrap();

        install(&paths, Client::Windsurf, Some("k")).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["telemetry"], false);
        assert_eq!(written["mcpServers"]["other"]["command"], "x");
        assert_eq!(written["mcpServers"][SERVER_NAME]["command"], "npx");
    }
}
