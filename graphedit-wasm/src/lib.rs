use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// Browser handle: one editing session with its tools.
#[wasm_bindgen]
pub struct Editor {
    pub(crate) inner: graphedit::Editor,
}

impl Editor {
    pub fn rs_new(config: graphedit::EditorConfig) -> Editor {
        Editor { inner: graphedit::Editor::new(config) }
    }
}
