use graphedit_wasm::Editor;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn error_data(v: &JsValue, key: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str("error"))
        .and_then(|e| Reflect::get(&e, &JsValue::from_str("data")))
        .and_then(|d| Reflect::get(&d, &JsValue::from_str(key)))
        .unwrap_or(JsValue::UNDEFINED)
}

#[wasm_bindgen_test]
fn invalid_input_returns_typed_errors() {
    let mut ed = Editor::new();
    assert!(is_err(&ed.add_node_res(f32::NAN, 0.0, None), "non_finite"));
    assert_eq!(ed.node_count(), 0, "state mutated on error");

    let a = ed.add_node_res(0.0, 0.0, Some("A".into()));
    assert!(!is_err(&a, "duplicate_label"));
    assert!(is_err(&ed.add_node_res(50.0, 0.0, Some("A".into())), "duplicate_label"));
    assert!(!ed.can_redo());

    assert!(is_err(&ed.add_edge_res("A", "nope", 1.0, false), "invalid_id"));
    assert!(is_err(&ed.add_edge_res("A", "A", 1.0, false), "invalid_edge"));
    assert!(is_err(&ed.add_edge_res("A", "A", f64::INFINITY, false), "non_finite"));
    assert_eq!(ed.edge_count(), 0);

    assert!(is_err(&ed.set_tool_res("lasso"), "unknown_tool"));
    assert!(is_err(&ed.layout_res("spiral", None), "unknown_layout"));
    assert!(is_err(&ed.toposort_res(Some("bogus".into())), "invalid_method"));
    assert!(is_err(&ed.bfs_res("ghost"), "missing_node"));
}

#[wasm_bindgen_test]
fn rejected_node_keeps_redo_history() {
    let mut ed = Editor::new();
    ed.add_node_res(0.0, 0.0, Some("A".into()));
    ed.add_node_res(50.0, 0.0, Some("B".into()));
    assert!(ed.undo());
    assert!(ed.can_redo());
    assert!(is_err(&ed.add_node_res(90.0, 0.0, Some("A".into())), "duplicate_label"));
    assert!(is_err(&ed.add_node_res(90.0, 0.0, Some("  ".into())), "invalid_structure"));
    assert!(ed.can_redo());
    assert!(ed.redo());
    assert_eq!(ed.node_count(), 2);
}

#[wasm_bindgen_test]
fn reset_empties_graph_and_selects_default_tool() {
    let mut ed = Editor::new();
    assert!(ed.set_tool("add-nodes"));
    ed.add_node_res(0.0, 0.0, None);
    ed.reset();
    assert_eq!(ed.node_count(), 0);
    assert_eq!(ed.active_tool().as_deref(), Some("select"));
    assert!(ed.can_undo());
}

#[wasm_bindgen_test]
fn parse_errors_carry_line_and_leave_graph_untouched() {
    let mut ed = Editor::new();
    ed.load_edge_list_res("A-B\nB-C");
    assert_eq!(ed.node_count(), 3);

    let r = ed.load_edge_list_res("X-Y\n\nY-{oops}-Z");
    assert!(is_err(&r, "parse"));
    assert_eq!(error_data(&r, "line").as_f64(), Some(3.0));
    assert_eq!(ed.node_count(), 3);

    assert!(is_err(&ed.from_json_res("{ not json"), "json_parse"));
    assert_eq!(ed.edge_count(), 2);
}

#[wasm_bindgen_test]
fn config_rejects_bad_values() {
    assert!(Editor::with_config(r#"{ "node_radius": -5 }"#).is_err());
    let ed = Editor::with_config(r#"{ "grid_size": 10 }"#).ok().unwrap();
    assert_eq!(ed.active_tool().as_deref(), Some("select"));
}

#[wasm_bindgen_test]
fn pert_reports_cycle_nodes() {
    let mut ed = Editor::new();
    ed.load_edge_list_res("A-{2}->B\nB-{2}->A");
    let r = ed.pert_res();
    assert!(is_err(&r, "cycle"));
    let nodes = js_sys::Array::from(&error_data(&r, "nodes"));
    assert_eq!(nodes.length(), 2);
}
