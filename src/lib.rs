// Layered flow graphs and collapsible trees: layout, connector routing and
// markup output for node-link diagram widgets.

#![deny(clippy::all)]

// Internal modules (implementation details)
mod error;
mod position;
mod rank;
mod utils;

// Public modules (user-facing API)
pub mod edges;
pub mod events;
pub mod graph;
pub mod layout;
pub mod markup;
pub mod render;
pub mod tree;
pub mod types;
pub mod view;

// Bindings, each behind its own feature
#[cfg(feature = "napi")]
pub mod napi_interface;
#[cfg(feature = "wasm")]
pub mod wasm;

// ===== Essential Public API =====
/// Widget-facing views
pub use view::{render_flow, render_tree, FlowView, Rendered, TreeView};

/// Input types and layout options
pub use types::{Connection, FlowSnapshot, LayoutConfig, NodeData, Spacing, StatusUpdate};
pub use tree::{TreeNode, TreeStore};

/// Errors
pub use error::{Error, Result};

// ===== Advanced Public API (driving the passes directly) =====
pub use graph::{FlowGraph, FlowNode};
pub use layout::{layout_flow, layout_tree, FlowPass, TreePass};
pub use position::{position_flow, position_tree, FlowLayout, TreeLayout};
pub use rank::{assign_levels, Layering};

/// Rendering hooks and output
pub use events::{ClickEvent, Emitter, CLICK};
pub use markup::{HtmlSerializer, Markup, Serializer};
pub use render::NodeRenderer;

// ===== Utility functions =====
pub use utils::unique_id;
