mod dom;
mod js;
mod logging;
mod storage;
mod swagger;

use std::cell::RefCell;

use anyhow::{Context, Result, anyhow};
use swagger_logout::config::CONFIG_ELEMENT_ID;
use swagger_logout::{
    AuthUi, KeyValueStore, LogoutConfig, LogoutError, LogoutFlow, LogoutPhase, PageLocation,
    ReadyState,
};
use tracing::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Event, Window};

use crate::dom::PageDom;
use crate::js::describe;
use crate::swagger::SwaggerUi;

thread_local! {
    static DOM_READY_HANDLER: RefCell<Option<Closure<dyn FnMut(Event)>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = web_sys::window()
        .and_then(|w| w.document())
        .map(|d| load_config(&d))
        .unwrap_or_default();
    logging::init(&config);

    if let Err(e) = boot(config) {
        error!(error = %e, "swagger logout helper failed to start");
    }
}

/// Run the logout flow without the button, for pages that bring their own control.
#[wasm_bindgen(js_name = keycloakLogout)]
pub fn keycloak_logout() -> Result<(), JsValue> {
    let config = web_sys::window()
        .and_then(|w| w.document())
        .map(|d| load_config(&d))
        .unwrap_or_default();
    run_logout(&config).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Overrides come from an optional JSON `<script>` element; anything wrong
/// with it falls back to the defaults.
fn load_config(document: &Document) -> LogoutConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return LogoutConfig::default();
    };
    match LogoutConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            // the subscriber is not up yet
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "swagger logout: {e}, using defaults"
            )));
            LogoutConfig::default()
        }
    }
}

fn boot(config: LogoutConfig) -> Result<()> {
    let window = web_sys::window().context("no window")?;
    let document = window.document().context("no document")?;

    let ready_state = js::get(&document, "readyState")
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    if !ReadyState::parse(&ready_state).must_defer() {
        return mount_now(&document, &config);
    }

    debug!("document still loading, waiting for DOMContentLoaded");
    let ready_document = document.clone();
    let handler = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
        if let Err(e) = mount_now(&ready_document, &config) {
            error!(error = %e, "failed to mount logout button");
        }
    });

    let options = AddEventListenerOptions::new();
    options.set_once(true);
    document
        .add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            handler.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| anyhow!("addEventListener failed: {}", describe(&e)))?;

    DOM_READY_HANDLER.with(|slot| *slot.borrow_mut() = Some(handler));
    Ok(())
}

fn mount_now(document: &Document, config: &LogoutConfig) -> Result<()> {
    swagger_logout::mount(&PageDom::new(document.clone()), config)
        .context("mounting logout button")?;
    Ok(())
}

/// Locate, clear, build the URL, navigate.
pub(crate) fn run_logout(config: &LogoutConfig) -> Result<()> {
    debug!(phase = %LogoutPhase::Idle, "logout requested");
    let window = web_sys::window().context("no window")?;
    let location = current_location(&window)?;

    let session = storage::session_store(&window);
    let local = storage::local_store(&window);
    let swagger = SwaggerUi::detect(&window);

    let outcome = LogoutFlow::new(config)
        .session_store(session.as_ref().map(|s| s as &dyn KeyValueStore))
        .local_store(local.as_ref().map(|s| s as &dyn KeyValueStore))
        .auth_ui(swagger.as_ref().map(|ui| ui as &dyn AuthUi))
        .run(&location);

    window
        .location()
        .set_href(&outcome.url)
        .map_err(|e| LogoutError::Navigation(describe(&e)))?;
    Ok(())
}

fn current_location(window: &Window) -> Result<PageLocation> {
    let location = window.location();
    let origin = location
        .origin()
        .map_err(|e| LogoutError::Location(describe(&e)))?;
    let pathname = location
        .pathname()
        .map_err(|e| LogoutError::Location(describe(&e)))?;
    Ok(PageLocation::new(origin, pathname))
}
