use serde_json::Value;
use tracing::{debug, warn};

use crate::error::LogoutError;

/// The part of the hosted Swagger UI that holds user-entered credentials.
pub trait AuthUi {
    /// Current authorization state, or `None` when the UI exposes no selector.
    fn authorization(&self) -> Result<Option<Value>, LogoutError>;

    /// Run the UI's own logout action. `Ok(false)` means there was none to run.
    fn logout(&self) -> Result<bool, LogoutError>;
}

/// Best-effort purge of the UI's in-memory credentials. Never fails.
pub fn clear_auth(auth_ui: Option<&dyn AuthUi>) {
    let Some(ui) = auth_ui else {
        debug!("no auth UI present, nothing to clear");
        return;
    };
    match ui.logout() {
        Ok(true) => debug!("swagger auth cleared"),
        Ok(false) => debug!("auth UI has no logout action"),
        Err(e) => warn!(error = %e, "clear swagger auth failed"),
    }
}
