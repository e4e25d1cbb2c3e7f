//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default bind address for the web service
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default listen port for the web service
pub const DEFAULT_PORT: u16 = 8917;

/// Service configuration loaded from `mixboard.toml` in the root folder,
/// with environment variable overrides for the catalog credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// HTTP server bind settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Credentials for the external music catalog (Spotify Web API,
/// client-credentials grant).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `mixboard.toml` in the root folder.
    ///
    /// A missing file is not an error: all settings have defaults, and the
    /// catalog credentials can come from the environment. A present but
    /// malformed file IS an error so typos don't silently fall back.
    pub fn load(root_folder: &Path) -> Result<Self> {
        let config_path = root_folder.join("mixboard.toml");

        let mut config: ServiceConfig = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", config_path.display(), e)))?
        } else {
            ServiceConfig::default()
        };

        // Environment overrides (take priority over the config file)
        if let Ok(id) = std::env::var("MIXBOARD_CATALOG_CLIENT_ID") {
            config.catalog.client_id = Some(id);
        }
        if let Ok(secret) = std::env::var("MIXBOARD_CATALOG_CLIENT_SECRET") {
            config.catalog.client_secret = Some(secret);
        }

        Ok(config)
    }

    /// True when both catalog credentials are present and non-empty
    pub fn catalog_configured(&self) -> bool {
        matches!(
            (&self.catalog.client_id, &self.catalog.client_secret),
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty()
        )
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: OS-dependent compiled default
    default_root_folder()
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/mixboard
        dirs::data_local_dir()
            .map(|d| d.join("mixboard"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/mixboard"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/mixboard
        dirs::data_dir()
            .map(|d| d.join("mixboard"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/mixboard"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\mixboard
        dirs::data_local_dir()
            .map(|d| d.join("mixboard"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\mixboard"))
    } else {
        PathBuf::from("./mixboard_data")
    }
}

/// Ensure the root folder exists, creating it if necessary
pub fn ensure_root_folder(root_folder: &Path) -> Result<()> {
    std::fs::create_dir_all(root_folder)?;
    Ok(())
}

/// Path of the SQLite database inside the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("mixboard.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_takes_priority() {
        let root = resolve_root_folder(Some("/tmp/from-cli"), "MIXBOARD_TEST_UNSET_VAR");
        assert_eq!(root, PathBuf::from("/tmp/from-cli"));
    }

    #[test]
    fn test_default_when_nothing_set() {
        let root = resolve_root_folder(None, "MIXBOARD_TEST_UNSET_VAR");
        assert!(root.to_string_lossy().contains("mixboard"));
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load(dir.path()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_malformed_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mixboard.toml"), "server = \"nope").unwrap();
        assert!(ServiceConfig::load(dir.path()).is_err());
    }

    #[test]
    fn test_config_file_values_parsed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("mixboard.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 9000

[catalog]
client_id = "abc"
client_secret = "def"
"#,
        )
        .unwrap();

        let config = ServiceConfig::load(dir.path()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(config.catalog_configured());
    }
}
