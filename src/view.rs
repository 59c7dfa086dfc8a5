//! Flow and tree views: a node store, its layout options, rendering hooks
//! and an event emitter, composed into one widget-facing object.
//!
//! A view owns its store exclusively. Each `render` runs a full layout pass
//! over the current store and replaces the mounted surface; nothing is
//! patched incrementally.

use crate::events::{ClickEvent, Emitter, CLICK};
use crate::graph::{FlowGraph, FlowNode};
use crate::layout::{layout_flow, layout_tree, FlowPass, TreePass};
use crate::markup::{HtmlSerializer, Markup, Serializer};
use crate::render::{flow_surface, tree_surface, FlowNodeRenderer, NodeRenderer, TreeNodeRenderer};
use crate::tree::{NodeRef, TreeNode, TreeStore};
use crate::types::{Bounds, FlowSnapshot, LayoutConfig, Spacing, StatusUpdate};
use serde::Serialize;
use std::sync::Arc;

type BoxedSerializer = Box<dyn Serializer + Send + Sync>;

pub struct FlowView {
    spacing: Spacing,
    graph: Option<FlowGraph>,
    renderer: Box<dyn NodeRenderer<FlowNode>>,
    serializer: BoxedSerializer,
    events: Emitter<ClickEvent>,
    surface: String,
    bounds: Bounds,
}

impl FlowView {
    pub fn new(snapshot: FlowSnapshot, config: &LayoutConfig) -> Self {
        let graph = FlowGraph::from_snapshot(snapshot);
        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "flow view created"
        );
        FlowView {
            spacing: config.resolve(&Spacing::flow()),
            graph: Some(graph),
            renderer: Box::new(FlowNodeRenderer),
            serializer: Box::new(HtmlSerializer),
            events: Emitter::new(),
            surface: String::new(),
            bounds: Bounds::default(),
        }
    }

    pub fn from_json(json: &str, config: &LayoutConfig) -> crate::Result<Self> {
        Ok(FlowView::new(FlowSnapshot::from_json(json)?, config))
    }

    pub fn with_renderer(mut self, renderer: impl NodeRenderer<FlowNode> + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_serializer(mut self, serializer: impl Serializer + Send + Sync + 'static) -> Self {
        self.serializer = Box::new(serializer);
        self
    }

    pub fn spacing(&self) -> &Spacing {
        &self.spacing
    }

    pub fn graph(&self) -> Option<&FlowGraph> {
        self.graph.as_ref()
    }

    pub fn events(&self) -> &Emitter<ClickEvent> {
        &self.events
    }

    pub fn get_node(&self, id: &str) -> Option<&FlowNode> {
        self.graph.as_ref()?.node(id)
    }

    /// Run a layout pass without rendering.
    pub fn pass(&self) -> Option<FlowPass> {
        self.graph
            .as_ref()
            .map(|g| layout_flow(g, &self.spacing))
    }

    /// The surface as a markup tree, empty when there is no store.
    pub fn markup(&self) -> Vec<Markup> {
        self.build().map(|(markup, _)| markup).unwrap_or_default()
    }

    fn build(&self) -> Option<(Vec<Markup>, Bounds)> {
        let g = self.graph.as_ref()?;
        let pass = layout_flow(g, &self.spacing);
        let markup = flow_surface(
            g,
            &pass.layering,
            &pass.layout,
            &pass.connectors,
            self.renderer.as_ref(),
        );
        Some((markup, pass.layout.bounds))
    }

    /// Lay out, serialize and mount the surface.
    pub fn render(&mut self) -> &str {
        let (markup, bounds) = self.build().unwrap_or_default();
        self.surface = self.serializer.serialize(&markup);
        self.bounds = bounds;
        &self.surface
    }

    /// Last rendered surface.
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Size of the last rendered surface.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Update one node's status. A mounted surface is re-rendered when the
    /// status changed.
    pub fn set_status(&mut self, id: &str, status: &str) -> bool {
        let changed = self
            .graph
            .as_mut()
            .is_some_and(|g| g.set_status(id, status));
        if changed {
            tracing::debug!(id, status, "set_status");
            self.refresh_surface();
        }
        changed
    }

    /// Apply a batch of statuses and return the ids that changed.
    pub fn refresh_status(&mut self, updates: &[StatusUpdate]) -> Vec<Arc<str>> {
        let changed = match self.graph.as_mut() {
            Some(g) => g.refresh_status(updates),
            None => Vec::new(),
        };
        if !changed.is_empty() {
            tracing::debug!(changed = changed.len(), "refresh_status");
            self.refresh_surface();
        }
        changed
    }

    /// Notify listeners that a node was clicked.
    pub fn click(&self, id: &str) -> ClickEvent {
        let mut event = ClickEvent::new(id);
        self.events.fire(CLICK, &mut event);
        event
    }

    /// Drop listeners, surface and store. Later renders produce nothing.
    pub fn dispose(&mut self) {
        self.events.off_all();
        self.surface.clear();
        self.bounds = Bounds::default();
        self.graph = None;
    }

    fn refresh_surface(&mut self) {
        if !self.surface.is_empty() {
            self.render();
        }
    }
}

pub struct TreeView {
    spacing: Spacing,
    store: TreeStore,
    expand_level: Option<i32>,
    renderer: Box<dyn NodeRenderer<TreeNode>>,
    serializer: BoxedSerializer,
    events: Emitter<ClickEvent>,
    surface: String,
    bounds: Bounds,
}

impl TreeView {
    pub fn new(root: Option<TreeNode>, config: &LayoutConfig) -> Self {
        TreeView {
            spacing: config.resolve(&Spacing::tree()),
            store: TreeStore::new(root),
            expand_level: None,
            renderer: Box::new(TreeNodeRenderer),
            serializer: Box::new(HtmlSerializer),
            events: Emitter::new(),
            surface: String::new(),
            bounds: Bounds::default(),
        }
    }

    pub fn from_json(json: &str, config: &LayoutConfig) -> crate::Result<Self> {
        let root: TreeNode = serde_json::from_str(json)?;
        Ok(TreeView::new(Some(root), config))
    }

    /// Expand the tree down to `level` now, and use it as the collapsed
    /// state for `toggle_all`.
    pub fn with_expand_level(mut self, level: i32) -> Self {
        self.expand_level = Some(level);
        self.store.expand_node(level);
        self
    }

    pub fn with_renderer(mut self, renderer: impl NodeRenderer<TreeNode> + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_serializer(mut self, serializer: impl Serializer + Send + Sync + 'static) -> Self {
        self.serializer = Box::new(serializer);
        self
    }

    pub fn spacing(&self) -> &Spacing {
        &self.spacing
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn events(&self) -> &Emitter<ClickEvent> {
        &self.events
    }

    pub fn get_node<'a>(&'a self, r: impl Into<NodeRef<'a>>) -> Option<&'a TreeNode> {
        self.store.get_node(r)
    }

    pub fn add_node(&mut self, parent_id: &str, node: TreeNode) -> &mut Self {
        self.store.add_node(parent_id, node);
        self
    }

    pub fn remove_node(&mut self, id: &str) -> Option<TreeNode> {
        self.store.remove_node(id)
    }

    /// Flip a branch and re-render. Leaves are ignored.
    pub fn toggle_node(&mut self, id: &str) -> &mut Self {
        if self.store.toggle_node(id) {
            self.render();
        }
        self
    }

    pub fn expand_node(&mut self, level: i32) -> &mut Self {
        self.store.expand_node(level);
        self
    }

    pub fn expand_all(&mut self) -> &mut Self {
        self.store.expand_all();
        self
    }

    pub fn shrink_all(&mut self) -> &mut Self {
        self.store.shrink_all();
        self
    }

    /// Expand everything, or fold back to the configured expand level when
    /// everything already is expanded. Re-renders.
    pub fn toggle_all(&mut self) -> &mut Self {
        if self.store.is_empty() {
            return self;
        }
        if self.store.is_fully_expanded() {
            self.store.expand_node(self.expand_level.unwrap_or(-1));
        } else {
            self.store.expand_all();
        }
        self.render();
        self
    }

    /// Notify listeners, then toggle the node unless a listener cleared
    /// `return_value`.
    pub fn click(&mut self, id: &str) -> ClickEvent {
        let mut event = ClickEvent::new(id);
        self.events.fire(CLICK, &mut event);
        if event.return_value {
            self.toggle_node(id);
        }
        event
    }

    pub fn pass(&self) -> Option<TreePass> {
        self.store
            .root()
            .map(|root| layout_tree(root, &self.spacing))
    }

    pub fn markup(&self) -> Vec<Markup> {
        self.build().map(|(markup, _)| markup).unwrap_or_default()
    }

    fn build(&self) -> Option<(Vec<Markup>, Bounds)> {
        let root = self.store.root()?;
        let pass = layout_tree(root, &self.spacing);
        let markup = tree_surface(root, &pass.layout, &pass.routes, self.renderer.as_ref());
        Some((markup, pass.layout.bounds))
    }

    pub fn render(&mut self) -> &str {
        let (markup, bounds) = self.build().unwrap_or_default();
        self.surface = self.serializer.serialize(&markup);
        self.bounds = bounds;
        &self.surface
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn dispose(&mut self) {
        self.events.off_all();
        self.surface.clear();
        self.bounds = Bounds::default();
        self.store.clear();
    }
}

/// One-shot render result handed to the bindings and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub html: String,
    pub width: f64,
    pub height: f64,
}

fn parse_config(config_json: Option<&str>) -> crate::Result<LayoutConfig> {
    match config_json {
        Some(json) => Ok(serde_json::from_str(json)?),
        None => Ok(LayoutConfig::default()),
    }
}

/// Render a flow snapshot given as JSON.
pub fn render_flow(snapshot_json: &str, config_json: Option<&str>) -> crate::Result<Rendered> {
    let config = parse_config(config_json)?;
    let mut view = FlowView::from_json(snapshot_json, &config)?;
    let html = view.render().to_string();
    let Bounds { width, height } = view.bounds();
    Ok(Rendered {
        html,
        width,
        height,
    })
}

/// Render a nested tree given as JSON, optionally expanded to a depth first.
pub fn render_tree(
    tree_json: &str,
    config_json: Option<&str>,
    expand_level: Option<i32>,
) -> crate::Result<Rendered> {
    let config = parse_config(config_json)?;
    let mut view = TreeView::from_json(tree_json, &config)?;
    if let Some(level) = expand_level {
        view = view.with_expand_level(level);
    }
    let html = view.render().to_string();
    let Bounds { width, height } = view.bounds();
    Ok(Rendered {
        html,
        width,
        height,
    })
}
