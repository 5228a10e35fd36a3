use std::path::Path;

use serde::Deserialize;

use crate::error::ClientError;

/// Connection settings for [`crate::WasmifyClient`].
///
/// Loadable from a TOML file or assembled in code; `WASMIFY_API_URL` and
/// `WASMIFY_API_KEY` are honored by [`ClientConfig::from_env`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Transport-level timeout applied by reqwest to every request. The
    /// per-execution cap in [`crate::ExecutionConfig`] is enforced by the
    /// server, not here.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:3000/api".into()
}
fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Build a config from `WASMIFY_API_URL` / `WASMIFY_API_KEY`, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("WASMIFY_API_URL") {
            config.api_url = url;
        }
        config.api_key = std::env::var("WASMIFY_API_KEY").ok();
        config
    }

    pub fn from_file(path: &Path) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse {}: {e}", path.display())))
    }
}
