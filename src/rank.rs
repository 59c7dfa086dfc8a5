use crate::graph::FlowGraph;
use ahash::AHashMap as HashMap;
use std::sync::Arc;

/// Breadth-first level assignment of a flow graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layering {
    /// One group per level, first-visit order inside each group.
    pub levels: Vec<Vec<Arc<str>>>,
    level_of: HashMap<Arc<str>, usize>,
}

impl Layering {
    pub fn level(&self, id: &str) -> Option<usize> {
        self.level_of.get(id).copied()
    }

    pub fn is_leveled(&self, id: &str) -> bool {
        self.level_of.contains_key(id)
    }

    /// Size of the largest level.
    pub fn max_size(&self) -> usize {
        self.levels.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.level_of.len()
    }

    /// Levelled node ids in level order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> + '_ {
        self.levels.iter().flatten()
    }
}

/// Assign a level to every node reachable from an in-degree-zero root.
///
/// A node is levelled exactly once, on first discovery; the set of levelled
/// ids is the only guard against revisiting, so cycles terminate and a node
/// reached by several paths keeps its first level.
pub fn assign_levels(g: &FlowGraph) -> Layering {
    let mut level_of: HashMap<Arc<str>, usize> = HashMap::with_capacity(g.nodes.len());

    let roots: Vec<Arc<str>> = g.roots().map(|node| node.id.clone()).collect();
    for v in &roots {
        level_of.insert(v.clone(), 0);
    }

    // The root group is kept even when empty
    let mut levels = vec![roots.clone()];
    let mut frontier = roots;
    let mut level = 1;

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for v in &frontier {
            for w in g.children(v) {
                if !level_of.contains_key(w) {
                    level_of.insert(w.clone(), level);
                    next.push(w.clone());
                }
            }
        }
        if !next.is_empty() {
            levels.push(next.clone());
        }
        frontier = next;
        level += 1;
    }

    Layering { levels, level_of }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Connection, FlowSnapshot, NodeData};
    use crate::utils::arc_str;
    use pretty_assertions::assert_eq;

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> FlowGraph {
        FlowGraph::from_snapshot(FlowSnapshot {
            nodes: ids.iter().map(|id| NodeData::new(id, id, "")).collect(),
            connection: edges.iter().map(|(f, t)| Connection::new(f, t)).collect(),
        })
    }

    fn ids(group: &[Arc<str>]) -> Vec<&str> {
        group.iter().map(|v| v.as_ref()).collect()
    }

    #[test]
    fn fan_out() {
        let layering = assign_levels(&graph(&["A", "B", "C"], &[("A", "B"), ("A", "C")]));
        assert_eq!(layering.level("A"), Some(0));
        assert_eq!(layering.level("B"), Some(1));
        assert_eq!(layering.level("C"), Some(1));
        assert_eq!(layering.max_size(), 2);
    }

    #[test]
    fn first_discovery_wins_over_longest_path() {
        // d is reachable at depth 1 from a and at depth 2 via b
        let layering = assign_levels(&graph(
            &["a", "b", "d"],
            &[("a", "b"), ("a", "d"), ("b", "d")],
        ));
        assert_eq!(layering.level("d"), Some(1));
        assert_eq!(ids(&layering.levels[1]), vec!["b", "d"]);
    }

    #[test]
    fn order_within_level_follows_edge_order() {
        let layering = assign_levels(&graph(
            &["r1", "r2", "x", "y", "z"],
            &[("r2", "z"), ("r1", "y"), ("r1", "x")],
        ));
        assert_eq!(ids(&layering.levels[0]), vec!["r1", "r2"]);
        assert_eq!(ids(&layering.levels[1]), vec!["y", "x", "z"]);
    }

    #[test]
    fn cycles_terminate() {
        let layering = assign_levels(&graph(
            &["r", "a", "b", "c"],
            &[("r", "a"), ("a", "b"), ("b", "c"), ("c", "a")],
        ));
        assert_eq!(layering.level("a"), Some(1));
        assert_eq!(layering.level("b"), Some(2));
        assert_eq!(layering.level("c"), Some(3));
        assert_eq!(layering.levels.len(), 4);
        assert_eq!(layering.node_count(), 4);
    }

    #[test]
    fn rootless_cycle_is_not_leveled() {
        let layering = assign_levels(&graph(&["a", "b"], &[("a", "b"), ("b", "a")]));
        assert_eq!(layering.levels, vec![Vec::<Arc<str>>::new()]);
        assert!(!layering.is_leveled("a"));
    }

    #[test]
    fn iter_walks_level_order() {
        let layering = assign_levels(&graph(&["c", "a", "b"], &[("a", "c"), ("c", "b")]));
        let order: Vec<Arc<str>> = layering.iter().cloned().collect();
        assert_eq!(order, vec![arc_str("a"), arc_str("c"), arc_str("b")]);
    }
}
