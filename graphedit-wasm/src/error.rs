use crate::interop::{new_obj, set_kv};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data {
        set_kv(&e, "data", &d);
    }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_str(id));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

/// Envelope for a core error. The offending line or identity, when there is
/// one, goes into `data`. Failures are echoed to the browser console.
pub fn from_core(e: &graphedit::Error) -> JsValue {
    use graphedit::Error as E;
    let d = new_obj();
    match e {
        E::MissingNode { id } => set_kv(&d, "id", &JsValue::from_str(id.as_str())),
        E::MissingEdge { id } => set_kv(&d, "id", &JsValue::from_str(id.as_str())),
        E::Parse { line, .. } => set_kv(&d, "line", &JsValue::from_f64(*line as f64)),
        E::InconsistentDuration { node, .. } => set_kv(&d, "node", &JsValue::from_str(node.as_str())),
        E::NegativeWeight { edge, .. } => set_kv(&d, "edge", &JsValue::from_str(edge.as_str())),
        E::Cycle { nodes } => set_kv(
            &d,
            "nodes",
            &crate::interop::arr_str(nodes.iter().map(|n| n.as_str())).into(),
        ),
        _ => {}
    }
    web_sys::console::warn_1(&JsValue::from_str(&format!("graphedit: {} ({})", e, e.code())));
    err(e.code(), e.to_string(), Some(d.into()))
}

pub fn serialize(e: serde_wasm_bindgen::Error) -> JsValue {
    err("serialize", e.to_string(), None)
}

pub fn json_parse(e: impl std::fmt::Display) -> JsValue {
    err("json_parse", e.to_string(), None)
}
