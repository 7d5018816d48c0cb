//! Engine configuration.
//!
//! Every section is `#[serde(default)]`, so a TOML file only needs the keys
//! it overrides:
//!
//! ```toml
//! [routes]
//! edit_path = "/builder/{page_id}"
//!
//! [chain]
//! max_callback_depth = 4
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Placeholder substituted with the page id in route templates.
pub const PAGE_ID_PLACEHOLDER: &str = "{page_id}";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub routes: RouteConfig,
    pub navigation: NavigationConfig,
    pub chain: ChainConfig,
}

/// In-app path templates per application mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Authoring-surface path. Must contain `{page_id}`.
    pub edit_path: String,
    /// Published runtime path. Must contain `{page_id}`.
    pub view_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            edit_path: "/app/pages/{page_id}/edit".to_string(),
            view_path: "/app/pages/{page_id}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Prefixed to URLs that carry no accepted scheme.
    pub default_scheme: String,
    /// Analytics event name for navigations.
    pub analytics_event: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_scheme: "https://".to_string(),
            analytics_event: "NAVIGATE".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// How deep success/error callbacks may nest.
    pub max_callback_depth: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_callback_depth: 8,
        }
    }
}

impl EngineConfig {
    /// Parse, sanitize and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed = toml::from_str::<Self>(raw)?.sanitized();
        parsed.validate()?;
        Ok(parsed)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Check invariants that sanitizing cannot repair.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, template) in [
            ("routes.edit_path", &self.routes.edit_path),
            ("routes.view_path", &self.routes.view_path),
        ] {
            if !template.contains(PAGE_ID_PLACEHOLDER) {
                return Err(ConfigError::Invalid {
                    message: format!("{name} must contain {PAGE_ID_PLACEHOLDER}: {template:?}"),
                });
            }
        }
        if self.routes.edit_path == self.routes.view_path {
            return Err(ConfigError::Invalid {
                message: "routes.edit_path and routes.view_path must differ".into(),
            });
        }
        if self.navigation.default_scheme.is_empty() {
            return Err(ConfigError::Invalid {
                message: "navigation.default_scheme must not be empty".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn sanitized(mut self) -> Self {
        self.chain.max_callback_depth = self.chain.max_callback_depth.max(1);
        if self.navigation.analytics_event.trim().is_empty() {
            self.navigation.analytics_event = NavigationConfig::default().analytics_event;
        }
        self
    }
}
