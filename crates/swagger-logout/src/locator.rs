use std::fmt;

use tracing::debug;

use crate::auth_ui::AuthUi;
use crate::config::LogoutConfig;
use crate::error::LogoutError;
use crate::search::{deep_find, token_text};
use crate::store::{KeyValueStore, StoreHit, scan_store};

/// Where a token was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    SessionStorage { key: String },
    LocalStorage { key: String },
    AuthState,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionStorage { key } => write!(f, "sessionStorage[{}]", key),
            Self::LocalStorage { key } => write!(f, "localStorage[{}]", key),
            Self::AuthState => write!(f, "swagger auth state"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedToken {
    pub token: String,
    pub source: TokenSource,
}

/// Looks for an ID token in session storage, then local storage, then the
/// Swagger UI authorization state. The first hit wins.
pub struct TokenLocator<'a> {
    config: &'a LogoutConfig,
    session: Option<&'a dyn KeyValueStore>,
    local: Option<&'a dyn KeyValueStore>,
    auth_ui: Option<&'a dyn AuthUi>,
}

impl<'a> TokenLocator<'a> {
    pub fn new(
        config: &'a LogoutConfig,
        session: Option<&'a dyn KeyValueStore>,
        local: Option<&'a dyn KeyValueStore>,
        auth_ui: Option<&'a dyn AuthUi>,
    ) -> Self {
        Self {
            config,
            session,
            local,
            auth_ui,
        }
    }

    pub fn locate(&self) -> Option<LocatedToken> {
        if let Some(hit) = self.session.and_then(|s| recover("sessionStorage", self.scan(s))) {
            return Some(LocatedToken {
                token: hit.token,
                source: TokenSource::SessionStorage { key: hit.key },
            });
        }

        if let Some(hit) = self.local.and_then(|s| recover("localStorage", self.scan(s))) {
            return Some(LocatedToken {
                token: hit.token,
                source: TokenSource::LocalStorage { key: hit.key },
            });
        }

        self.auth_ui
            .and_then(|ui| recover("auth state", self.from_auth_state(ui)))
            .map(|token| LocatedToken {
                token,
                source: TokenSource::AuthState,
            })
    }

    fn scan(&self, store: &dyn KeyValueStore) -> Result<Option<StoreHit>, LogoutError> {
        scan_store(store, &self.config.storage_keys, self.config.max_depth)
    }

    fn from_auth_state(&self, ui: &dyn AuthUi) -> Result<Option<String>, LogoutError> {
        let Some(state) = ui.authorization()? else {
            return Ok(None);
        };
        Ok(deep_find(&state, &self.config.auth_state_keys, self.config.max_depth)
            .and_then(token_text))
    }
}

/// The single "log and continue" point for lookups: an error means the
/// source had nothing to offer.
fn recover<T>(source: &str, result: Result<Option<T>, LogoutError>) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(e) => {
            debug!(source, error = %e, "token lookup failed, treating as not found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::auth_ui::testing::FakeAuthUi;
    use crate::store::MemoryStore;
    use crate::store::testing::FailingStore;

    fn locate(
        session: &MemoryStore,
        local: &MemoryStore,
        ui: Option<&FakeAuthUi>,
    ) -> Option<LocatedToken> {
        let config = LogoutConfig::default();
        TokenLocator::new(
            &config,
            Some(session),
            Some(local),
            ui.map(|u| u as &dyn AuthUi),
        )
        .locate()
    }

    fn ui_with_state(state: serde_json::Value) -> FakeAuthUi {
        FakeAuthUi {
            state: Some(state),
            ..Default::default()
        }
    }

    #[test]
    fn test_session_store_structured() {
        let session =
            MemoryStore::with_entries([("oidc", r#"{"auth": {"id_token": "abc.def.ghi"}}"#)]);
        let found = locate(&session, &MemoryStore::new(), None).unwrap();
        assert_eq!(found.token, "abc.def.ghi");
        assert_eq!(found.source, TokenSource::SessionStorage { key: "oidc".into() });
    }

    #[test]
    fn test_local_store_heuristic() {
        let local = MemoryStore::with_entries([("token", "x.y.z")]);
        let found = locate(&MemoryStore::new(), &local, None).unwrap();
        assert_eq!(found.token, "x.y.z");
        assert_eq!(found.source, TokenSource::LocalStorage { key: "token".into() });
    }

    #[test]
    fn test_session_beats_local_beats_auth_state() {
        let session = MemoryStore::with_entries([("s", r#"{"idToken": "session"}"#)]);
        let local = MemoryStore::with_entries([("l", r#"{"idToken": "local"}"#)]);
        let ui = ui_with_state(json!({"oauth": {"token": {"id_token": "ui"}}}));

        assert_eq!(locate(&session, &local, Some(&ui)).unwrap().token, "session");
        assert_eq!(
            locate(&MemoryStore::new(), &local, Some(&ui)).unwrap().token,
            "local"
        );
        let from_ui = locate(&MemoryStore::new(), &MemoryStore::new(), Some(&ui)).unwrap();
        assert_eq!(from_ui.token, "ui");
        assert_eq!(from_ui.source, TokenSource::AuthState);
    }

    #[test]
    fn test_auth_state_skips_camel_case_hint() {
        // idTokenHint is only searched in storage
        let ui = ui_with_state(json!({"idTokenHint": "nope"}));
        assert_eq!(locate(&MemoryStore::new(), &MemoryStore::new(), Some(&ui)), None);
    }

    #[test]
    fn test_nothing_found() {
        let session = MemoryStore::with_entries([("theme", "dark"), ("n", "42")]);
        let ui = FakeAuthUi::default();
        assert_eq!(locate(&session, &MemoryStore::new(), Some(&ui)), None);
        assert_eq!(locate(&session, &MemoryStore::new(), None), None);
    }

    #[test]
    fn test_auth_state_failure_is_not_found() {
        let ui = FakeAuthUi {
            state: Some(json!({"id_token": "unreachable"})),
            state_fails: true,
            ..Default::default()
        };
        assert_eq!(locate(&MemoryStore::new(), &MemoryStore::new(), Some(&ui)), None);
    }

    #[test]
    fn test_failing_session_store_falls_through_to_local() {
        let session = FailingStore {
            inner: MemoryStore::with_entries([("a", "plain")]),
            ok_reads: 0,
        };
        let local = MemoryStore::with_entries([("token", "x.y.z")]);
        let config = LogoutConfig::default();
        let found = TokenLocator::new(&config, Some(&session), Some(&local), None)
            .locate()
            .unwrap();
        assert_eq!(found.token, "x.y.z");
        assert_eq!(found.source, TokenSource::LocalStorage { key: "token".into() });
    }

    #[test]
    fn test_failing_local_store_falls_through_to_auth_state() {
        let session = MemoryStore::new();
        let local = FailingStore {
            inner: MemoryStore::with_entries([("a", "plain"), ("b", "x.y.z")]),
            ok_reads: 1,
        };
        let ui = ui_with_state(json!({"oauth2": {"token": {"id_token": "ui"}}}));
        let config = LogoutConfig::default();
        let found = TokenLocator::new(&config, Some(&session), Some(&local), Some(&ui))
            .locate()
            .unwrap();
        assert_eq!(found.token, "ui");
        assert_eq!(found.source, TokenSource::AuthState);
    }

    #[test]
    fn test_missing_stores_are_skipped() {
        let config = LogoutConfig::default();
        let ui = ui_with_state(json!({"id_token": "ui"}));
        let found = TokenLocator::new(&config, None, None, Some(&ui)).locate().unwrap();
        assert_eq!(found.token, "ui");
    }

    #[test]
    fn test_source_display() {
        let source = TokenSource::SessionStorage { key: "oidc".into() };
        assert_eq!(source.to_string(), "sessionStorage[oidc]");
    }
}
