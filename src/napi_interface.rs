use napi::bindgen_prelude::*;
use napi_derive::napi;

use crate::types::StatusUpdate;
use crate::view::{self, FlowView};

#[napi(object)]
pub struct NapiRenderResult {
    pub html: String,
    pub width: f64,
    pub height: f64,
}

impl From<view::Rendered> for NapiRenderResult {
    fn from(out: view::Rendered) -> Self {
        NapiRenderResult {
            html: out.html,
            width: out.width,
            height: out.height,
        }
    }
}

fn invalid_arg(e: crate::Error) -> Error {
    Error::new(Status::InvalidArg, format!("Invalid input: {}", e))
}

#[napi(js_name = "renderFlow")]
pub fn render_flow(snapshot_json: String, config_json: Option<String>) -> Result<NapiRenderResult> {
    view::render_flow(&snapshot_json, config_json.as_deref())
        .map(NapiRenderResult::from)
        .map_err(invalid_arg)
}

#[napi(js_name = "renderTree")]
pub fn render_tree(
    tree_json: String,
    config_json: Option<String>,
    expand_level: Option<i32>,
) -> Result<NapiRenderResult> {
    view::render_tree(&tree_json, config_json.as_deref(), expand_level)
        .map(NapiRenderResult::from)
        .map_err(invalid_arg)
}

/// Render a flow snapshot after applying a batch of status updates.
#[napi(js_name = "renderFlowWithStatus")]
pub fn render_flow_with_status(
    snapshot_json: String,
    status_json: String,
    config_json: Option<String>,
) -> Result<NapiRenderResult> {
    let updates: Vec<StatusUpdate> = serde_json::from_str(&status_json)
        .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid status JSON: {}", e)))?;
    let config = match config_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid config JSON: {}", e)))?,
        None => Default::default(),
    };

    let mut flow = FlowView::from_json(&snapshot_json, &config).map_err(invalid_arg)?;
    flow.refresh_status(&updates);
    let html = flow.render().to_string();
    let bounds = flow.bounds();
    Ok(NapiRenderResult {
        html,
        width: bounds.width,
        height: bounds.height,
    })
}

#[napi]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
