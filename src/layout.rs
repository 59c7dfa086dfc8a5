use crate::edges::{route_flow, route_tree, Connector, TreeRoutes};
use crate::graph::FlowGraph;
use crate::position::{position_flow, position_tree, FlowLayout, TreeLayout};
use crate::rank::{assign_levels, Layering};
use crate::tree::TreeNode;
use crate::types::Spacing;
use std::time::Instant;

/// Everything a flow layout pass derives from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowPass {
    pub layering: Layering,
    pub layout: FlowLayout,
    pub connectors: Vec<Connector>,
}

/// Everything a tree layout pass derives from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreePass {
    pub layout: TreeLayout,
    pub routes: TreeRoutes,
}

/// Full flow pass: levels, coordinates, connectors.
pub fn layout_flow(g: &FlowGraph, spacing: &Spacing) -> FlowPass {
    let total_start = Instant::now();

    let mut step_start = Instant::now();
    let layering = assign_levels(g);
    tracing::trace!(elapsed = ?step_start.elapsed(), "assign_levels");

    step_start = Instant::now();
    let layout = position_flow(&layering, spacing);
    tracing::trace!(elapsed = ?step_start.elapsed(), "position_flow");

    step_start = Instant::now();
    let connectors = route_flow(g, &layering, &layout, spacing);
    tracing::trace!(elapsed = ?step_start.elapsed(), "route_flow");

    tracing::debug!(
        nodes = g.nodes.len(),
        leveled = layering.node_count(),
        levels = layering.levels.len(),
        connectors = connectors.len(),
        width = layout.bounds.width,
        height = layout.bounds.height,
        elapsed = ?total_start.elapsed(),
        "flow layout"
    );

    FlowPass {
        layering,
        layout,
        connectors,
    }
}

/// Full tree pass: coordinates of the visible nodes and their connectors.
pub fn layout_tree(root: &TreeNode, spacing: &Spacing) -> TreePass {
    let total_start = Instant::now();

    let mut step_start = Instant::now();
    let layout = position_tree(root, spacing);
    tracing::trace!(elapsed = ?step_start.elapsed(), "position_tree");

    step_start = Instant::now();
    let routes = route_tree(root, &layout, spacing);
    tracing::trace!(elapsed = ?step_start.elapsed(), "route_tree");

    tracing::debug!(
        visible = layout.len(),
        width = layout.bounds.width,
        height = layout.bounds.height,
        elapsed = ?total_start.elapsed(),
        "tree layout"
    );

    TreePass { layout, routes }
}
