use wasm_bindgen::{JsCast, JsValue};

/// Readable text for a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

/// Property lookup that reports a throwing getter as an error.
pub fn get(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
}

/// `target[name]` when it is callable.
pub fn method(target: &JsValue, name: &str) -> Result<Option<js_sys::Function>, JsValue> {
    Ok(get(target, name)?.dyn_into::<js_sys::Function>().ok())
}
