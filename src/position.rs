use crate::rank::Layering;
use crate::tree::TreeNode;
use crate::types::{Bounds, NodeLayout, Point, Spacing};
use crate::utils::{arc_str, max_extent};
use ahash::AHashMap as HashMap;
use indexmap::IndexMap;
use std::sync::Arc;

/// Flow view coordinates, in level order, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowLayout {
    pub positions: IndexMap<Arc<str>, Point>,
    pub bounds: Bounds,
}

impl FlowLayout {
    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }
}

/// Place each level in its own column, centering every column against the
/// largest one.
pub fn position_flow(layering: &Layering, spacing: &Spacing) -> FlowLayout {
    let step_x = spacing.node_width + spacing.span_x;
    let step_y = spacing.node_height + spacing.span_y;
    let max_size = layering.max_size() as f64;

    let mut positions = IndexMap::with_capacity(layering.node_count());
    for (level, group) in layering.levels.iter().enumerate() {
        let x = spacing.offset_x + level as f64 * step_x;
        let top = spacing.offset_y + (max_size - group.len() as f64) / 2.0 * step_y;
        for (i, v) in group.iter().enumerate() {
            positions.insert(v.clone(), Point::new(x, top + step_y * i as f64));
        }
    }

    let (max_x, max_y) = max_extent(positions.values().map(|p| (p.x, p.y)));
    FlowLayout {
        positions,
        bounds: Bounds {
            width: max_x + spacing.node_width + spacing.span_x,
            height: max_y + spacing.node_height,
        },
    }
}

/// Tree view coordinates keyed by node key. Nodes hidden under a collapsed
/// ancestor have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    pub nodes: HashMap<Arc<str>, NodeLayout>,
    pub bounds: Bounds,
}

impl TreeLayout {
    pub fn get(&self, node: &TreeNode) -> Option<&NodeLayout> {
        self.nodes.get(&*layout_key(node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// Nodes outside a store carry no key; their id stands in for it.
pub(crate) fn layout_key(node: &TreeNode) -> Arc<str> {
    node.key().cloned().unwrap_or_else(|| arc_str(&node.id))
}

/// Lay the tree out left to right: depth picks the column, leaves stack
/// downwards, and each expanded parent lines up with its first child.
pub fn position_tree(root: &TreeNode, spacing: &Spacing) -> TreeLayout {
    let mut nodes = HashMap::new();
    layout_node(root, spacing.offset_x, spacing.offset_y, spacing, &mut nodes);

    let (max_x, max_y) = max_extent(nodes.values().map(|l| (l.x, l.y)));
    TreeLayout {
        nodes,
        bounds: Bounds {
            width: max_x + spacing.node_width,
            height: max_y + spacing.node_height,
        },
    }
}

// Returns the y cursor for the next sibling.
fn layout_node(
    node: &TreeNode,
    x: f64,
    y: f64,
    spacing: &Spacing,
    out: &mut HashMap<Arc<str>, NodeLayout>,
) -> f64 {
    let key = layout_key(node);

    let (node_y, next_y) = match node.visible_children() {
        Some(children) => {
            let child_x = x + spacing.node_width + spacing.span_x;
            let mut cursor = y;
            for child in children {
                cursor = layout_node(child, child_x, cursor, spacing, out);
            }
            let first_y = out
                .get(&*layout_key(&children[0]))
                .map(|l| l.y)
                .unwrap_or(y);
            (first_y, cursor + 2.0 * spacing.span_y)
        }
        None => (y, y + spacing.node_height + spacing.span_y),
    };

    out.insert(
        key.clone(),
        NodeLayout {
            id: key,
            x,
            y: node_y,
        },
    );
    next_y
}
