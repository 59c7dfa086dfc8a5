//! Markup emitter: one positioned element per visible node, followed by
//! one vector graphics block holding the connectors.

use crate::edges::{Connector, TreeRoutes};
use crate::graph::{FlowGraph, FlowNode};
use crate::markup::{Element, Markup};
use crate::position::{layout_key, FlowLayout, TreeLayout};
use crate::rank::Layering;
use crate::tree::TreeNode;
use crate::types::Bounds;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Per-node customization points supplied by the embedding widget.
///
/// The engine does not look inside what these return: attributes are
/// copied onto the node element and the content is spliced in as its body.
pub trait NodeRenderer<N>: Send + Sync {
    fn attributes(&self, node: &N) -> Vec<(String, String)>;

    fn content(&self, node: &N) -> Markup;
}

/// `data-status` attribute and a titled `<div>` with the node title.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowNodeRenderer;

impl NodeRenderer<FlowNode> for FlowNodeRenderer {
    fn attributes(&self, node: &FlowNode) -> Vec<(String, String)> {
        vec![("data-status".to_string(), node.status.clone())]
    }

    fn content(&self, node: &FlowNode) -> Markup {
        Element::new("div")
            .attr("title", &node.id)
            .text(&node.title)
            .into()
    }
}

/// `data-type` (branch or leaf) and `data-id` attributes, name in an `<h4>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeNodeRenderer;

impl NodeRenderer<TreeNode> for TreeNodeRenderer {
    fn attributes(&self, node: &TreeNode) -> Vec<(String, String)> {
        let kind = if node.children.is_some() {
            "branch"
        } else {
            "leaf"
        };
        vec![
            ("data-type".to_string(), kind.to_string()),
            ("data-id".to_string(), node.id.clone()),
        ]
    }

    fn content(&self, node: &TreeNode) -> Markup {
        Element::new("h4").text(&node.name).into()
    }
}

fn position_style(x: f64, y: f64) -> String {
    format!("left:{}px;top:{}px", x, y)
}

fn svg(bounds: Bounds) -> Element {
    Element::new("svg")
        .attr("xmlns", SVG_NS)
        .attr("xmlns:xlink", XLINK_NS)
        .attr("version", "1.1")
        .attr("width", bounds.width)
        .attr("height", bounds.height)
}

fn connector_group(connector: &Connector) -> Element {
    Element::new("g")
        .attr("class", "svg-view")
        .attr("data-type", connector.kind.as_str())
        .attr("data-from", &connector.from)
        .attr("data-to", &connector.to)
        .child(Element::new("path").attr("class", "line-view").attr("d", &connector.line))
        .child(Element::new("path").attr("class", "arrow-view").attr("d", &connector.arrow))
}

/// `<flow>` node block followed by the connector `<svg>`.
pub fn flow_surface(
    g: &FlowGraph,
    layering: &Layering,
    layout: &FlowLayout,
    connectors: &[Connector],
    renderer: &dyn NodeRenderer<FlowNode>,
) -> Vec<Markup> {
    let mut flow = Element::new("flow");
    for v in layering.iter() {
        let (Some(node), Some(p)) = (g.node(v), layout.get(v)) else {
            continue;
        };
        flow = flow.child(
            Element::new("flownode")
                .attr("data-id", &node.id)
                .attrs(renderer.attributes(node))
                .attr("style", position_style(p.x, p.y))
                .child(renderer.content(node)),
        );
    }

    let block = connectors
        .iter()
        .fold(svg(layout.bounds), |block, c| block.child(connector_group(c)));

    vec![flow.into(), block.into()]
}

/// `<tree>` node block followed by the connector `<svg>`.
pub fn tree_surface(
    root: &TreeNode,
    layout: &TreeLayout,
    routes: &TreeRoutes,
    renderer: &dyn NodeRenderer<TreeNode>,
) -> Vec<Markup> {
    let mut tree = Element::new("tree");
    push_tree_node(&mut tree, root, layout, renderer);

    let group = Element::new("g")
        .attr("class", "svg-view")
        .child(Element::new("path").attr("class", "line-view").attr("d", &routes.line))
        .child(Element::new("path").attr("class", "arrow-view").attr("d", &routes.arrow));

    vec![tree.into(), svg(layout.bounds).child(group).into()]
}

fn push_tree_node(
    parent: &mut Element,
    node: &TreeNode,
    layout: &TreeLayout,
    renderer: &dyn NodeRenderer<TreeNode>,
) {
    let Some(at) = layout.get(node) else {
        return;
    };

    let mut element = Element::new("treenode").attrs(renderer.attributes(node));
    if node.selected {
        element = element.attr("class", "cur");
    }
    element = element
        .attr("id", layout_key(node))
        .attr("style", position_style(at.x, at.y))
        .child(renderer.content(node));
    parent.children.push(element.into());

    if let Some(children) = node.visible_children() {
        for child in children {
            push_tree_node(parent, child, layout, renderer);
        }
    }
}
