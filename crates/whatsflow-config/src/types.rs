//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [server]       # bind address
//! [planner]      # AI drafting backend
//! [graph_api]    # Meta Graph API credentials
//! [store]        # playground database location
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Maps to the full TOML config file. All sections are optional so that
/// partial configs (e.g., project-local overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsflowConfig {
    /// Server configuration.
    pub server: Option<ServerSection>,

    /// Planner backend configuration.
    pub planner: Option<PlannerSection>,

    /// Graph API configuration.
    pub graph_api: Option<GraphApiSection>,

    /// Playground store configuration.
    pub store: Option<StoreSection>,
}

impl WhatsflowConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: WhatsflowConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }

        if other.planner.is_some() {
            self.planner = other.planner;
        }

        if other.graph_api.is_some() {
            self.graph_api = other.graph_api;
        }

        if other.store.is_some() {
            self.store = other.store;
        }
    }

    /// The server section, defaults filled in.
    pub fn server(&self) -> ServerSection {
        self.server.clone().unwrap_or_default()
    }

    /// The planner section, defaults filled in.
    pub fn planner(&self) -> PlannerSection {
        self.planner.clone().unwrap_or_default()
    }

    /// The Graph API section, defaults filled in.
    pub fn graph_api(&self) -> GraphApiSection {
        self.graph_api.clone().unwrap_or_default()
    }

    /// The playground database path, configured or platform default.
    pub fn store_path(&self) -> PathBuf {
        self.store
            .as_ref()
            .and_then(|section| section.path.clone())
            .unwrap_or_else(crate::paths::default_store_path)
    }

    /// Apply environment variable overrides. Applied last, after all file
    /// layers, so the environment always wins.
    pub fn apply_env(&mut self) {
        if let Some(value) = env_value("PYTHON_API_BASE_URL") {
            self.planner.get_or_insert_with(Default::default).base_url = value;
        }
        if let Some(value) = env_value("FB_API_BASE_URL") {
            self.graph_api.get_or_insert_with(Default::default).base_url = value;
        }
        if let Some(value) = env_value("WABA_ID") {
            self.graph_api.get_or_insert_with(Default::default).waba_id = Some(value);
        }
        if let Some(value) = env_value("FB_ACCESS_TOKEN") {
            self.graph_api.get_or_insert_with(Default::default).access_token = Some(value);
        }
        if let Some(value) = env_value("WHATSFLOW_BIND_ADDR") {
            self.server.get_or_insert_with(Default::default).bind_address = value;
        }
    }

    /// Check field shapes. Graph API credentials are allowed to be absent
    /// here; the publisher client rejects missing credentials when built.
    pub fn validate(&self) -> Result<()> {
        let server = self.server();
        server
            .bind_address
            .parse::<SocketAddr>()
            .map_err(|error| ConfigError::Invalid {
                field: "server.bind_address".to_string(),
                reason: format!("'{}' is not a socket address: {}", server.bind_address, error),
            })?;

        if self.planner().base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "planner.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.graph_api().base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "graph_api.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address the API server listens on.
    pub bind_address: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8686".to_string(),
        }
    }
}

impl ServerSection {
    /// The bind address parsed, falling back to the default on bad input.
    pub fn socket_addr(&self) -> SocketAddr {
        self.bind_address
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8686)))
    }
}

/// The AI drafting backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSection {
    /// Base URL of the planner service.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            base_url: "http://0.0.0.0:5000".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Meta Graph API settings.
///
/// `waba_id` and `access_token` have no defaults; they come from the config
/// file or the `WABA_ID` / `FB_ACCESS_TOKEN` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphApiSection {
    /// Base URL of the Graph API, versioned.
    pub base_url: String,
    /// The WhatsApp Business Account id that owns created flows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waba_id: Option<String>,
    /// Bearer token for every Graph API call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GraphApiSection {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com/v18.0".to_string(),
            waba_id: None,
            access_token: None,
            timeout_secs: 30,
        }
    }
}

/// Playground store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Database path. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}
