use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the workspace config at the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = "scope42.yml";

/// Per-workspace settings stored in `scope42.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Template for turning a ticket reference into a link; `{}` is replaced
    /// by the ticket value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url_template: Option<String>,
    #[serde(default)]
    pub search: SearchConfig,
}

impl WorkspaceConfig {
    /// Resolve a ticket value against the configured template.
    #[must_use]
    pub fn ticket_url(&self, ticket: &str) -> String {
        match &self.ticket_url_template {
            Some(template) if !ticket.starts_with("http") => template.replace("{}", ticket),
            _ => ticket.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

/// Per-user settings from `~/.config/scope42/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
    /// Default author for comments.
    #[serde(default)]
    pub author: Option<String>,
}

pub fn load_workspace_config(root: &Path) -> Result<WorkspaceConfig> {
    let path = root.join(WORKSPACE_CONFIG_FILE);
    if !path.exists() {
        return Ok(WorkspaceConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    // An empty file is a valid, all-defaults config.
    if content.trim().is_empty() {
        return Ok(WorkspaceConfig::default());
    }

    serde_yaml::from_str::<WorkspaceConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("scope42/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_workspace_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let cfg = load_workspace_config(root.path()).expect("load should succeed");
        assert_eq!(cfg, WorkspaceConfig::default());
        assert!(cfg.search.enabled);
    }

    #[test]
    fn empty_workspace_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::write(root.path().join(WORKSPACE_CONFIG_FILE), "").expect("write");
        let cfg = load_workspace_config(root.path()).expect("load should succeed");
        assert!(cfg.ticket_url_template.is_none());
    }

    #[test]
    fn workspace_config_parses_yaml() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            root.path().join(WORKSPACE_CONFIG_FILE),
            "ticket_url_template: https://jira.example.com/browse/{}\nsearch:\n  enabled: false\n",
        )
        .expect("write");
        let cfg = load_workspace_config(root.path()).expect("load should succeed");
        assert!(!cfg.search.enabled);
        assert_eq!(
            cfg.ticket_url("ARCH-12"),
            "https://jira.example.com/browse/ARCH-12"
        );
        assert_eq!(
            cfg.ticket_url("https://example.com/1"),
            "https://example.com/1"
        );
    }

    #[test]
    fn broken_workspace_config_is_an_error() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::write(root.path().join(WORKSPACE_CONFIG_FILE), "search: [oops").expect("write");
        assert!(load_workspace_config(root.path()).is_err());
    }

    #[test]
    fn user_config_parses_toml() {
        let cfg: UserConfig =
            toml::from_str("output = \"json\"\nauthor = \"Alice\"\n").expect("parse");
        assert_eq!(cfg.output.as_deref(), Some("json"));
        assert_eq!(cfg.author.as_deref(), Some("Alice"));
    }
}
