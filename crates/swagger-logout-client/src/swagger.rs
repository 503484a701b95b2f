use serde_json::Value;
use swagger_logout::{AuthUi, LogoutError};
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::js::{describe, get, method};

fn ui_error(e: JsValue) -> LogoutError {
    LogoutError::AuthUi(describe(&e))
}

/// The `window.ui` object created by `SwaggerUIBundle(...)`.
pub struct SwaggerUi {
    ui: JsValue,
}

impl SwaggerUi {
    pub fn detect(window: &Window) -> Option<Self> {
        let ui = get(window, "ui").ok()?;
        ui.is_object().then_some(Self { ui })
    }
}

impl AuthUi for SwaggerUi {
    fn authorization(&self) -> Result<Option<Value>, LogoutError> {
        let selectors = get(&self.ui, "authSelectors").map_err(ui_error)?;
        if !selectors.is_object() {
            return Ok(None);
        }
        let Some(get_auth) = method(&selectors, "getAuth").map_err(ui_error)? else {
            return Ok(None);
        };
        let get_system = method(&self.ui, "getSystem")
            .map_err(ui_error)?
            .ok_or_else(|| LogoutError::AuthUi("ui.getSystem is not a function".into()))?;

        let system = get_system.call0(&self.ui).map_err(ui_error)?;
        let auth = get_auth.call1(&selectors, &system).map_err(ui_error)?;
        if auth.is_undefined() || auth.is_null() {
            return Ok(None);
        }

        // stringify unwraps Immutable.js collections through their toJSON
        let json = js_sys::JSON::stringify(&auth).map_err(ui_error)?;
        let Some(text) = json.as_string() else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| LogoutError::AuthUi(e.to_string()))
    }

    fn logout(&self) -> Result<bool, LogoutError> {
        let actions = get(&self.ui, "authActions").map_err(ui_error)?;
        if !actions.is_object() {
            return Ok(false);
        }
        let Some(logout) = method(&actions, "logout").map_err(ui_error)? else {
            return Ok(false);
        };
        logout.call0(&actions).map_err(ui_error)?;
        Ok(true)
    }
}
