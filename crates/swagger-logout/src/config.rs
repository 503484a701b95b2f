use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogoutError;

pub const DEFAULT_LOGOUT_PATH: &str = "/api/auth/logout/keycloak";
pub const DEFAULT_BUTTON_ID: &str = "swagger-keycloak-logout";
pub const DEFAULT_LABEL: &str = "Logout Keycloak";
pub const DEFAULT_TITLE: &str =
    "Clear Swagger auth and logout from Keycloak (uses id_token if available)";
pub const DEFAULT_STYLE: &str = "position:fixed;right:12px;top:12px;z-index:9999;padding:8px 12px;\
background:#d9534f;color:#fff;border:none;border-radius:4px;cursor:pointer;font-weight:600;\
box-shadow:0 1px 2px rgba(0,0,0,0.2)";

/// Id of the optional `<script type="application/json">` element holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "swagger-keycloak-logout-config";

/// Key names searched inside structured storage values.
pub const STORAGE_TOKEN_KEYS: [&str; 4] = ["id_token", "idToken", "idTokenHint", "id_token_hint"];
/// Key names searched inside the Swagger UI authorization state.
pub const AUTH_STATE_TOKEN_KEYS: [&str; 3] = ["id_token", "idToken", "id_token_hint"];

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Logout helper settings. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoutConfig {
    /// Backend endpoint that ends the Keycloak session.
    pub logout_path: String,

    /// DOM id of the injected button; also the idempotence marker.
    pub button_id: String,

    pub label: String,

    /// Tooltip shown on hover.
    pub title: String,

    /// Inline CSS applied to the button.
    pub style: String,

    pub storage_keys: Vec<String>,

    pub auth_state_keys: Vec<String>,

    /// Nesting limit for the recursive token search.
    pub max_depth: usize,

    /// "trace", "debug", "info", "warn" or "error".
    pub log_level: String,
}

impl Default for LogoutConfig {
    fn default() -> Self {
        Self {
            logout_path: DEFAULT_LOGOUT_PATH.to_string(),
            button_id: DEFAULT_BUTTON_ID.to_string(),
            label: DEFAULT_LABEL.to_string(),
            title: DEFAULT_TITLE.to_string(),
            style: DEFAULT_STYLE.to_string(),
            storage_keys: STORAGE_TOKEN_KEYS.iter().map(|k| k.to_string()).collect(),
            auth_state_keys: AUTH_STATE_TOKEN_KEYS.iter().map(|k| k.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            log_level: "info".to_string(),
        }
    }
}

impl LogoutConfig {
    pub fn from_json(data: &str) -> Result<Self, LogoutError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Unknown level names fall back to INFO.
    pub fn level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.trim()).unwrap_or(tracing::Level::INFO)
    }
}
