//! Small DOM and JS-object helpers shared by the page glue.

use anyhow::{Context, anyhow};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, Window};

pub fn js_err(e: JsValue) -> anyhow::Error {
    match e.as_string() {
        Some(msg) => anyhow!(msg),
        None => anyhow!("{e:?}"),
    }
}

pub fn window() -> anyhow::Result<Window> {
    web_sys::window().context("no `window` in this context")
}

pub fn document() -> anyhow::Result<Document> {
    window()?.document().context("no document")
}

pub fn by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)?.dyn_into::<T>().ok()
}

pub fn select_all(root: &Document, selector: &str) -> anyhow::Result<Vec<Element>> {
    let nodes = root.query_selector_all(selector).map_err(js_err)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect())
}

/// Registers `handler` for `kind` for the lifetime of the page.
pub fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) -> anyhow::Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(js_err)
        .with_context(|| format!("adding `{kind}` listener"))?;
    closure.forget();
    Ok(())
}

/// Like [`listen`] but marks the listener passive.
pub fn listen_passive(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) -> anyhow::Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(js_err)
        .with_context(|| format!("adding passive `{kind}` listener"))?;
    closure.forget();
    Ok(())
}

pub fn set_display(element: &HtmlElement, value: &str) {
    if let Err(e) = element.style().set_property("display", value) {
        log::warn!("could not set display: {}", js_err(e));
    }
}

// ── plain JS object access ─────────────────────────────────────────────────

pub fn get(obj: &JsValue, key: &str) -> anyhow::Result<JsValue> {
    Reflect::get(obj, &JsValue::from_str(key))
        .map_err(js_err)
        .with_context(|| format!("reading `{key}`"))
}

pub fn set(obj: &JsValue, key: &str, value: &JsValue) -> anyhow::Result<()> {
    Reflect::set(obj, &JsValue::from_str(key), value)
        .map_err(js_err)
        .with_context(|| format!("writing `{key}`"))?;
    Ok(())
}

pub fn get_object(obj: &JsValue, key: &str) -> anyhow::Result<JsValue> {
    let value = get(obj, key)?;
    anyhow::ensure!(value.is_object(), "`{key}` is not an object");
    Ok(value)
}

pub fn get_f64(obj: &JsValue, key: &str) -> anyhow::Result<f64> {
    get(obj, key)?.as_f64().with_context(|| format!("`{key}` is not a number"))
}

pub fn get_bool(obj: &JsValue, key: &str) -> anyhow::Result<bool> {
    get(obj, key)?.as_bool().with_context(|| format!("`{key}` is not a boolean"))
}

/// Calls `obj[method](...args)`.
pub fn call(obj: &JsValue, method: &str, args: &[JsValue]) -> anyhow::Result<JsValue> {
    let function: Function = get(obj, method)?
        .dyn_into()
        .map_err(|_| anyhow!("`{method}` is not a function"))?;
    let args: Array = args.iter().collect();
    Reflect::apply(&function, obj, &args)
        .map_err(js_err)
        .with_context(|| format!("calling `{method}`"))
}

pub fn has_method(obj: &JsValue, method: &str) -> bool {
    get(obj, method).is_ok_and(|f| f.is_function())
}
