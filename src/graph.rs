use crate::types::{Connection, FlowSnapshot, NodeData, StatusUpdate};
use crate::utils::arc_str;
use indexmap::IndexMap;
use std::sync::Arc;

/// A flow node with its derived degree counters and child list.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub id: Arc<str>,
    pub title: String,
    pub status: String,
    pub extra: serde_json::Map<String, serde_json::Value>,
    // Non-owning: ids into the graph store, duplicates kept per edge
    pub children: Vec<Arc<str>>,
    pub in_deg: usize,
    pub out_deg: usize,
}

impl FlowNode {
    fn from_data(data: NodeData) -> Self {
        FlowNode {
            id: arc_str(&data.id),
            title: data.title,
            status: data.status,
            extra: data.extra,
            children: Vec::new(),
            in_deg: 0,
            out_deg: 0,
        }
    }
}

/// Id-keyed flow node store. Iteration follows snapshot order.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub nodes: IndexMap<Arc<str>, FlowNode>,
    pub edges: Vec<Connection>,
}

impl FlowGraph {
    pub fn new() -> Self {
        FlowGraph::default()
    }

    pub fn from_snapshot(snapshot: FlowSnapshot) -> Self {
        let mut g = FlowGraph::new();
        for data in snapshot.nodes {
            g.set_node(data);
        }
        g.edges = snapshot.connection;
        g.link();
        g
    }

    /// Insert or replace a node. Links are rebuilt by `link`.
    pub fn set_node(&mut self, data: NodeData) {
        let node = FlowNode::from_data(data);
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn set_edge(&mut self, from: &str, to: &str) {
        self.edges.push(Connection::new(from, to));
    }

    /// Rebuild degree counters and child lists from the edge list.
    ///
    /// Endpoints missing from the store are skipped: the known endpoint still
    /// counts the edge, but no child link is recorded.
    pub fn link(&mut self) {
        for node in self.nodes.values_mut() {
            node.in_deg = 0;
            node.out_deg = 0;
            node.children.clear();
        }

        for edge in &self.edges {
            let to = self.nodes.get_key_value(edge.to.as_str()).map(|(k, _)| k.clone());
            if let Some(to_node) = self.nodes.get_mut(edge.to.as_str()) {
                to_node.in_deg += 1;
            }
            if let Some(from_node) = self.nodes.get_mut(edge.from.as_str()) {
                from_node.out_deg += 1;
                if let Some(to) = to {
                    from_node.children.push(to);
                }
            }
        }
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut FlowNode> {
        self.nodes.get_mut(id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &FlowNode> + '_ {
        self.nodes.values().filter(|node| node.in_deg == 0)
    }

    pub fn children(&self, id: &str) -> &[Arc<str>] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` when the node exists and its status changed.
    pub fn set_status(&mut self, id: &str, status: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) if node.status != status => {
                node.status = status.to_string();
                true
            }
            _ => false,
        }
    }

    /// Apply a batch of status updates, returning the ids that changed.
    pub fn refresh_status(&mut self, updates: &[StatusUpdate]) -> Vec<Arc<str>> {
        let mut changed = Vec::new();
        for update in updates {
            if let Some(node) = self.nodes.get_mut(update.id.as_str()) {
                if node.status != update.status {
                    node.status = update.status.clone();
                    changed.push(node.id.clone());
                }
            }
        }
        changed
    }
}
