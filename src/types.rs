use serde::{Deserialize, Serialize};
use std::sync::Arc;

// Default node box and spacing for the flow view
pub const FLOW_NODE_WIDTH: f64 = 160.0;
pub const FLOW_NODE_HEIGHT: f64 = 50.0;
pub const FLOW_SPAN_X: f64 = 80.0;
pub const FLOW_SPAN_Y: f64 = 30.0;

// Default node box and spacing for the tree view
pub const TREE_NODE_WIDTH: f64 = 120.0;
pub const TREE_NODE_HEIGHT: f64 = 60.0;
pub const TREE_SPAN_X: f64 = 60.0;
pub const TREE_SPAN_Y: f64 = 10.0;

/// Back edges sit `node_height / BACK_EDGE_DIVISOR` below the node middle.
pub const BACK_EDGE_DIVISOR: f64 = 4.0;

/// Same-level edges sit `node_height / SAME_EDGE_DIVISOR` above the node
/// middle, rounded up to a whole unit.
pub const SAME_EDGE_DIVISOR: f64 = 6.0;

// Point in layout space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Size of the vector graphics block that holds the connectors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

// Layout options as supplied by the caller. Missing fields fall back to the
// defaults of the view they are applied to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<f64>,
    /// Distance below the node middle used by back edges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_offset: Option<f64>,
    /// Distance above the node middle used by same-level edges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_offset: Option<f64>,
}

impl LayoutConfig {
    pub fn resolve(&self, defaults: &Spacing) -> Spacing {
        let node_height = self.node_height.unwrap_or(defaults.node_height);
        Spacing {
            node_width: self.node_width.unwrap_or(defaults.node_width),
            node_height,
            span_x: self.span_x.unwrap_or(defaults.span_x),
            span_y: self.span_y.unwrap_or(defaults.span_y),
            offset_x: self.offset_x.unwrap_or(defaults.offset_x),
            offset_y: self.offset_y.unwrap_or(defaults.offset_y),
            back_offset: self.back_offset.unwrap_or(node_height / BACK_EDGE_DIVISOR),
            same_offset: self
                .same_offset
                .unwrap_or((node_height / SAME_EDGE_DIVISOR).ceil()),
        }
    }
}

/// Resolved layout parameters, every value present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub node_width: f64,
    pub node_height: f64,
    pub span_x: f64,
    pub span_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub back_offset: f64,
    pub same_offset: f64,
}

impl Spacing {
    pub fn flow() -> Self {
        Spacing::base(FLOW_NODE_WIDTH, FLOW_NODE_HEIGHT, FLOW_SPAN_X, FLOW_SPAN_Y)
    }

    pub fn tree() -> Self {
        Spacing::base(TREE_NODE_WIDTH, TREE_NODE_HEIGHT, TREE_SPAN_X, TREE_SPAN_Y)
    }

    fn base(node_width: f64, node_height: f64, span_x: f64, span_y: f64) -> Self {
        Spacing {
            node_width,
            node_height,
            span_x,
            span_y,
            offset_x: 0.0,
            offset_y: 0.0,
            back_offset: node_height / BACK_EDGE_DIVISOR,
            same_offset: (node_height / SAME_EDGE_DIVISOR).ceil(),
        }
    }

    #[inline]
    pub fn half_height(&self) -> f64 {
        self.node_height / 2.0
    }
}

// ===== Flow view input =====

/// A node as it appears in a flow snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NodeData {
    pub fn new(id: &str, title: &str, status: &str) -> Self {
        NodeData {
            id: id.to_string(),
            title: title.to_string(),
            status: status.to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A directed relation between two flow nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

impl Connection {
    pub fn new(from: &str, to: &str) -> Self {
        Connection {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Flow view input: node list plus edge list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub connection: Vec<Connection>,
}

impl FlowSnapshot {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Status pair consumed by `FlowView::refresh_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub id: String,
    pub status: String,
}

// ===== Layout results =====

/// Coordinates of a rendered tree node, addressed by its synthetic key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: Arc<str>,
    pub x: f64,
    pub y: f64,
}

/// Relative position of two flow nodes, picks the connector shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    Forward,
    Back,
    Same,
}

impl ConnectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorKind::Forward => "forward",
            ConnectorKind::Back => "back",
            ConnectorKind::Same => "same",
        }
    }

    pub fn classify(from_level: usize, to_level: usize) -> Self {
        match from_level.cmp(&to_level) {
            std::cmp::Ordering::Less => ConnectorKind::Forward,
            std::cmp::Ordering::Greater => ConnectorKind::Back,
            std::cmp::Ordering::Equal => ConnectorKind::Same,
        }
    }
}
