//! Keycloak logout for Swagger UI pages.
//!
//! Finds the OpenID Connect ID token the OAuth flow left in browser storage
//! (or in Swagger UI's own auth state), clears Swagger UI's credentials and
//! builds the backend logout URL carrying `redirectUri` and `idTokenHint`.
//! Browser bindings live in `swagger-logout-client`; everything here runs on
//! any target.

pub mod auth_ui;
pub mod config;
pub mod error;
pub mod flow;
pub mod locator;
pub mod mount;
pub mod redirect;
pub mod search;
pub mod store;

pub use auth_ui::{AuthUi, clear_auth};
pub use config::LogoutConfig;
pub use error::LogoutError;
pub use flow::{LogoutFlow, LogoutOutcome, LogoutPhase};
pub use locator::{LocatedToken, TokenLocator, TokenSource};
pub use mount::{ControlHost, MountDecision, ReadyState, mount};
pub use redirect::{PageLocation, build_logout_url};
pub use store::{KeyValueStore, MemoryStore};
