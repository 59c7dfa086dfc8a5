use crate::view;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct WasmRenderResult {
    html: String,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl WasmRenderResult {
    #[wasm_bindgen(getter)]
    pub fn html(&self) -> String {
        self.html.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl From<view::Rendered> for WasmRenderResult {
    fn from(out: view::Rendered) -> Self {
        WasmRenderResult {
            html: out.html,
            width: out.width,
            height: out.height,
        }
    }
}

#[wasm_bindgen]
pub fn render_flow(
    snapshot_json: &str,
    config_json: Option<String>,
) -> Result<WasmRenderResult, JsValue> {
    view::render_flow(snapshot_json, config_json.as_deref())
        .map(WasmRenderResult::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn render_tree(
    tree_json: &str,
    config_json: Option<String>,
    expand_level: Option<i32>,
) -> Result<WasmRenderResult, JsValue> {
    view::render_tree(tree_json, config_json.as_deref(), expand_level)
        .map(WasmRenderResult::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
