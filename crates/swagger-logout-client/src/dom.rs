use std::cell::RefCell;

use swagger_logout::{ControlHost, LogoutConfig, LogoutError};
use tracing::error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlButtonElement, MouseEvent};

use crate::js::describe;

thread_local! {
    static LOGOUT_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(MouseEvent)>>> = const { RefCell::new(None) };
}

fn dom_error(e: JsValue) -> LogoutError {
    LogoutError::Dom(describe(&e))
}

/// The Swagger UI document the button lives in.
pub struct PageDom {
    document: Document,
}

impl PageDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl ControlHost for PageDom {
    fn has_control(&self, id: &str) -> Result<bool, LogoutError> {
        Ok(self.document.get_element_by_id(id).is_some())
    }

    fn insert_control(&self, config: &LogoutConfig) -> Result<(), LogoutError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| LogoutError::Dom("document has no body".into()))?;

        let button = self
            .document
            .create_element("button")
            .map_err(dom_error)?
            .dyn_into::<HtmlButtonElement>()
            .map_err(|_| LogoutError::Dom("created element is not a button".into()))?;
        button.set_id(&config.button_id);
        button.set_type("button");
        button.set_inner_text(&config.label);
        button.set_title(&config.title);
        button.set_attribute("style", &config.style).map_err(dom_error)?;

        let click_config = config.clone();
        let handler = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            event.prevent_default();
            if let Err(e) = crate::run_logout(&click_config) {
                error!(error = %e, "logout redirect failed");
            }
        });
        button
            .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        body.append_child(&button).map_err(dom_error)?;

        LOGOUT_CLICK_HANDLER.with(|slot| *slot.borrow_mut() = Some(handler));
        Ok(())
    }
}
