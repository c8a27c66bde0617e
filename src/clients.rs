//! Supported AI clients and where they keep their MCP configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::paths::Paths;

/// A client this tool knows how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Client {
    Claude,
    Cline,
    RooCline,
    Windsurf,
    Cursor,
    VsCode,
    VsCodeInsiders,
}

/// Top-level key holding the server map in a client config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServersKey {
    McpServers,
    Servers,
}

impl ServersKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ServersKey::McpServers => "mcpServers",
            ServersKey::Servers => "servers",
        }
    }
}

impl Client {
    pub const ALL: [Client; 7] = [
        Client::Claude,
        Client::Cline,
        Client::RooCline,
        Client::Windsurf,
        Client::Cursor,
        Client::VsCode,
        Client::VsCodeInsiders,
    ];

    /// Identifier accepted on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Client::Claude => "claude",
            Client::Cline => "cline",
            Client::RooCline => "roo-cline",
            Client::Windsurf => "windsurf",
            Client::Cursor => "cursor",
            Client::VsCode => "vscode",
            Client::VsCodeInsiders => "vscode-insiders",
        }
    }

    /// Human-readable name for console output.
    pub fn display_name(self) -> &'static str {
        match self {
            Client::Claude => "Claude",
            Client::Cline => "Cline",
            Client::RooCline => "Roo Cline",
            Client::Windsurf => "Windsurf",
            Client::Cursor => "Cursor",
            Client::VsCode => "VS Code",
            Client::VsCodeInsiders => "VS Code Insiders",
        }
    }

    pub fn servers_key(self) -> ServersKey {
        match self {
            Client::VsCode | Client::VsCodeInsiders => ServersKey::Servers,
            _ => ServersKey::McpServers,
        }
    }

    /// Config file location for this client.
    pub fn config_path(self, paths: &Paths) -> PathBuf {
        let config = paths.config_base();
        let home = paths.home();
        let vscode_storage = |edition: &str| config.join(edition).join("User").join("globalStorage");

        match self {
            Client::Claude => config.join("Claude").join("claude_desktop_config.json"),
            Client::Cline => vscode_storage("Code")
                .join("saoudrizwan.claude-dev")
                .join("settings")
                .join("cline_mcp_settings.json"),
            Client::RooCline => vscode_storage("Code")
                .join("rooveterinaryinc.roo-cline")
                .join("settings")
                .join("mcp_settings.json"),
            Client::Windsurf => home.join(".codeium").join("windsurf").join("mcp_config.json"),
            Client::Cursor => home.join(".cursor").join("mcp.json"),
            Client::VsCode => config.join("Code").join("User").join("mcp.json"),
            Client::VsCodeInsiders => config.join("Code - Insiders").join("User").join("mcp.json"),
        }
    }

    pub fn valid_ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.id()).collect()
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Client {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| ClientError::Unknown(wanted.to_string()))
    }
}

/// Resolve the config path for a client identifier, validating it first.
pub fn resolve_config_path(client: &str, paths: &Paths) -> Result<PathBuf, ClientError> {
    let client: Client = client.parse()?;
    Ok(client.config_path(paths))
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid client \"{0}\". Available clients: {valid}", valid = Client::valid_ids().join(", "))]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> Paths {
        Paths::with_roots("/home/dev", "/home/dev/.config")
    }

    #[test]
    fn parses_every_known_id() {
        for client in Client::ALL {
            assert_eq!(client.id().parse::<Client>().unwrap(), client);
        }
    }

    #[test]
    fn unknown_client_lists_valid_ones() {
        let err = "notepad".parse::<Client>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("notepad"));
        assert!(msg.contains("claude"));
        assert!(msg.contains("vscode-insiders"));
    }

    #[test]
    fn resolves_paths_under_roots() {
        let p = paths();
        assert_eq!(
            resolve_config_path("claude", &p).unwrap(),
            PathBuf::from("/home/dev/.config/Claude/claude_desktop_config.json")
        );
        assert_eq!(
            resolve_config_path("cursor", &p).unwrap(),
            PathBuf::from("/home/dev/.cursor/mcp.json")
        );
        assert!(resolve_config_path("emacs", &p).is_err());
    }

    #[test]
    fn vscode_family_uses_servers_key() {
        assert_eq!(Client::VsCode.servers_key().as_str(), "servers");
        assert_eq!(Client::VsCodeInsiders.servers_key().as_str(), "servers");
        assert_eq!(Client::Claude.servers_key().as_str(), "mcpServers");
    }
}
