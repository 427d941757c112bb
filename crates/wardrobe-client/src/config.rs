//! # Client Configuration
//!
//! Where the inventory backend lives and how the report is shaped.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WARDROBE_BACKEND_URL=http://10.0.0.5:5000                          │
//! │     WARDROBE_TIMEOUT_SECS=10                                           │
//! │     WARDROBE_CONFIG=/etc/wardrobe.toml   (file location)               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/wardrobe/wardrobe.toml (Linux)                           │
//! │     ~/Library/Application Support/com.wardrobe.dashboard/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://127.0.0.1:5000, no request timeout                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [backend]
//! base_url = "http://127.0.0.1:5000"
//! items_path = "/api/clothing"
//! sell_path = "/api/sell/{id}"
//! monthly_sales_path = "/api/sales/monthly"
//! timeout_secs = 10
//!
//! [report]
//! top_sellers = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use wardrobe_core::{ItemId, DEFAULT_TOP_SELLERS};

use crate::error::{ClientError, ClientResult};

/// Placeholder replaced by the item id in [`BackendSettings::sell_path`].
pub const ID_PLACEHOLDER: &str = "{id}";

pub const ENV_BACKEND_URL: &str = "WARDROBE_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "WARDROBE_TIMEOUT_SECS";
pub const ENV_CONFIG_PATH: &str = "WARDROBE_CONFIG";

// =============================================================================
// Backend Settings
// =============================================================================

/// Location of the inventory backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_items_path")]
    pub items_path: String,

    /// Must contain `{id}`.
    #[serde(default = "default_sell_path")]
    pub sell_path: String,

    #[serde(default = "default_monthly_sales_path")]
    pub monthly_sales_path: String,

    /// Per-request timeout. `None` waits as long as the backend takes.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_items_path() -> String {
    "/api/clothing".to_string()
}

fn default_sell_path() -> String {
    "/api/sell/{id}".to_string()
}

fn default_monthly_sales_path() -> String {
    "/api/sales/monthly".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            base_url: default_base_url(),
            items_path: default_items_path(),
            sell_path: default_sell_path(),
            monthly_sales_path: default_monthly_sales_path(),
            timeout_secs: None,
        }
    }
}

impl BackendSettings {
    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn items_url(&self) -> String {
        self.join(&self.items_path)
    }

    pub fn sell_url(&self, id: ItemId) -> String {
        self.join(&self.sell_path.replace(ID_PLACEHOLDER, &id.to_string()))
    }

    pub fn monthly_sales_url(&self) -> String {
        self.join(&self.monthly_sales_path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// =============================================================================
// Report Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Length of the top sellers list.
    #[serde(default = "default_top_sellers")]
    pub top_sellers: usize,
}

fn default_top_sellers() -> usize {
    DEFAULT_TOP_SELLERS
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_sellers: default_top_sellers(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardrobeConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub report: ReportSettings,
}

impl WardrobeConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `WARDROBE_CONFIG`, else the
    ///    platform config directory); a missing file is not an error
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let path = config_path
            .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading wardrobe config from file");
                let contents = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> ClientResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies overrides from a key lookup (the process environment in
    /// [`WardrobeConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ClientResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.base_url = url;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let parsed = secs.trim().parse::<u64>().map_err(|_| {
                ClientError::InvalidConfig(format!(
                    "{} must be a whole number of seconds, got: '{}'",
                    ENV_TIMEOUT_SECS, secs
                ))
            })?;
            self.backend.timeout_secs = Some(parsed);
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = &self.backend.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "Backend URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if !self.backend.sell_path.contains(ID_PLACEHOLDER) {
            return Err(ClientError::InvalidConfig(format!(
                "sell_path must contain {}, got: {}",
                ID_PLACEHOLDER, self.backend.sell_path
            )));
        }

        if self.backend.timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.report.top_sellers == 0 {
            return Err(ClientError::InvalidConfig(
                "top_sellers must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "wardrobe", "dashboard")
            .map(|dirs| dirs.config_dir().join("wardrobe.toml"))
    }
}
