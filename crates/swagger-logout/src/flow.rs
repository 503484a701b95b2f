use std::fmt;

use tracing::{debug, info};

use crate::auth_ui::{AuthUi, clear_auth};
use crate::config::LogoutConfig;
use crate::locator::{TokenLocator, TokenSource};
use crate::redirect::{PageLocation, build_logout_url};
use crate::store::KeyValueStore;

/// Steps of one click. `Redirecting` is terminal: the page goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutPhase {
    Idle,
    Locating,
    Clearing,
    Redirecting,
}

impl fmt::Display for LogoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Locating => "locating",
            Self::Clearing => "clearing",
            Self::Redirecting => "redirecting",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Where the browser must navigate.
    pub url: String,
    pub token_source: Option<TokenSource>,
}

/// Locate, clear, build: everything a click does before navigating.
pub struct LogoutFlow<'a> {
    config: &'a LogoutConfig,
    session: Option<&'a dyn KeyValueStore>,
    local: Option<&'a dyn KeyValueStore>,
    auth_ui: Option<&'a dyn AuthUi>,
}

impl<'a> LogoutFlow<'a> {
    pub fn new(config: &'a LogoutConfig) -> Self {
        Self {
            config,
            session: None,
            local: None,
            auth_ui: None,
        }
    }

    pub fn session_store(mut self, store: Option<&'a dyn KeyValueStore>) -> Self {
        self.session = store;
        self
    }

    pub fn local_store(mut self, store: Option<&'a dyn KeyValueStore>) -> Self {
        self.local = store;
        self
    }

    pub fn auth_ui(mut self, ui: Option<&'a dyn AuthUi>) -> Self {
        self.auth_ui = ui;
        self
    }

    /// Token lookup happens before clearing, since clearing may drop the
    /// UI-held copy.
    pub fn run(&self, location: &PageLocation) -> LogoutOutcome {
        debug!(phase = %LogoutPhase::Locating);
        let located =
            TokenLocator::new(self.config, self.session, self.local, self.auth_ui).locate();

        debug!(phase = %LogoutPhase::Clearing);
        clear_auth(self.auth_ui);

        debug!(phase = %LogoutPhase::Redirecting);
        let url = build_logout_url(
            &self.config.logout_path,
            location,
            located.as_ref().map(|l| l.token.as_str()),
        );

        match &located {
            Some(l) => info!(source = %l.source, "logging out with id token hint"),
            None => info!("no id token found, logging out without hint"),
        }

        LogoutOutcome {
            url,
            token_source: located.map(|l| l.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::auth_ui::testing::FakeAuthUi;
    use crate::store::MemoryStore;

    fn location() -> PageLocation {
        PageLocation::new("http://localhost:8080", "/swagger-ui/index.html")
    }

    #[test]
    fn test_nothing_anywhere() {
        let config = LogoutConfig::default();
        let session = MemoryStore::new();
        let local = MemoryStore::new();
        let outcome = LogoutFlow::new(&config)
            .session_store(Some(&session))
            .local_store(Some(&local))
            .run(&location());
        assert_eq!(
            outcome.url,
            "/api/auth/logout/keycloak?redirectUri=http%3A%2F%2Flocalhost%3A8080%2Fswagger-ui%2Findex.html"
        );
        assert_eq!(outcome.token_source, None);
    }

    #[test]
    fn test_session_token_in_url() {
        let config = LogoutConfig::default();
        let session =
            MemoryStore::with_entries([("k", r#"{"auth": {"id_token": "abc.def.ghi"}}"#)]);
        let outcome = LogoutFlow::new(&config)
            .session_store(Some(&session))
            .run(&location());
        assert!(outcome.url.ends_with("&idTokenHint=abc.def.ghi"));
        assert_eq!(
            outcome.token_source,
            Some(TokenSource::SessionStorage { key: "k".into() })
        );
    }

    #[test]
    fn test_failing_logout_still_redirects() {
        let config = LogoutConfig::default();
        let ui = FakeAuthUi {
            state: Some(json!({"oauth2": {"token": {"id_token": "ui.tok.en"}}})),
            has_logout: true,
            logout_fails: true,
            ..Default::default()
        };
        let outcome = LogoutFlow::new(&config).auth_ui(Some(&ui)).run(&location());
        assert_eq!(ui.logout_calls.get(), 1);
        assert!(outcome.url.starts_with("/api/auth/logout/keycloak?redirectUri="));
        assert!(outcome.url.ends_with("&idTokenHint=ui.tok.en"));
    }

    #[test]
    fn test_custom_logout_path() {
        let config = LogoutConfig {
            logout_path: "/auth/logout".into(),
            ..Default::default()
        };
        let outcome = LogoutFlow::new(&config).run(&location());
        assert!(outcome.url.starts_with("/auth/logout?redirectUri="));
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(LogoutPhase::Idle.to_string(), "idle");
        assert_eq!(LogoutPhase::Redirecting.to_string(), "redirecting");
    }
}
