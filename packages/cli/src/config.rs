use serde::{Deserialize, Serialize};
use siteforge_editor::DEFAULT_MAX_LEVELS;
use siteforge_workspace::{HostingSettings, ServerConfig, DEFAULT_HOSTING_API_URL};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "siteforge.config.json";

/// Environment variable holding the hosting provider access token
pub const HOSTING_TOKEN_ENV: &str = "SITEFORGE_HOSTING_TOKEN";

/// Siteforge configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Root directory of the site document store
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds between autosaves of open sessions, 0 disables
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_secs: u64,

    /// Undo depth per editing session
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Bearer token → user id
    #[serde(default)]
    pub auth_tokens: BTreeMap<String, String>,

    #[serde(default)]
    pub hosting: HostingConfig,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_autosave_interval() -> u64 {
    30
}

fn default_history_limit() -> usize {
    DEFAULT_MAX_LEVELS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_HOSTING_API_URL.to_string()
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            project_id: None,
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the data directory
    pub fn get_data_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.data_dir)
    }

    pub fn autosave_interval(&self) -> Option<Duration> {
        (self.autosave_interval_secs > 0).then(|| Duration::from_secs(self.autosave_interval_secs))
    }

    /// Resolve into server settings; the hosting token comes from the environment
    pub fn server_config(&self, cwd: &str, hosting_token: Option<String>) -> ServerConfig {
        ServerConfig {
            data_dir: self.get_data_dir(cwd),
            host: self.host.clone(),
            port: self.port,
            autosave_interval: self.autosave_interval(),
            history_limit: self.history_limit,
            auth_tokens: self
                .auth_tokens
                .iter()
                .map(|(token, user)| (token.clone(), user.clone()))
                .collect(),
            hosting: HostingSettings {
                api_url: self.hosting.api_url.clone(),
                project_id: self.hosting.project_id.clone(),
                token: hosting_token,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
            autosave_interval_secs: default_autosave_interval(),
            history_limit: default_history_limit(),
            auth_tokens: BTreeMap::new(),
            hosting: HostingConfig::default(),
        }
    }
}
