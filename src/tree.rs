//! Tree view node store and its structural mutations.
//!
//! Every node owns its children. Nodes entering a store receive a synthetic
//! key (`tree-view<N>`) once; the key survives every later mutation and is
//! what the rendered markup uses to address the node.

use crate::utils::tree_key;
use ahash::AHashSet as HashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Depth passed to `expand_node` by `expand_all`, deep enough for any tree.
pub const EXPAND_ALL_DEPTH: i32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// `None` when the node has no children key at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    /// `None` and `Some(true)` both mean expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    #[serde(skip)]
    key: Option<Arc<str>>,
}

impl TreeNode {
    pub fn new(id: &str, name: &str) -> Self {
        TreeNode {
            id: id.to_string(),
            name: name.to_string(),
            children: None,
            expand: None,
            selected: false,
            extra: serde_json::Map::new(),
            key: None,
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn key(&self) -> Option<&Arc<str>> {
        self.key.as_ref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expand != Some(false)
    }

    /// Has a non-empty child list.
    pub fn is_branch(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Children taking part in layout: present, non-empty and not collapsed.
    pub fn visible_children(&self) -> Option<&[TreeNode]> {
        match &self.children {
            Some(children) if !children.is_empty() && self.is_expanded() => {
                Some(children.as_slice())
            }
            _ => None,
        }
    }

    /// Give a fresh key to this node and every descendant that lacks one or
    /// whose key is already in `taken`. Every key handed out lands in `taken`.
    fn assign_keys(&mut self, taken: &mut HashSet<Arc<str>>) {
        let mut stack: Vec<&mut TreeNode> = vec![self];
        while let Some(node) = stack.pop() {
            let fresh = match &node.key {
                Some(key) => !taken.insert(key.clone()),
                None => true,
            };
            if fresh {
                let key = tree_key();
                taken.insert(key.clone());
                node.key = Some(key);
            }
            if let Some(children) = node.children.as_mut() {
                stack.extend(children.iter_mut());
            }
        }
    }
}

/// What `walk_tree` does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Record the node and descend.
    Collect,
    /// Descend without recording.
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
}

/// Pre-order traversal. The visitor sees the node, its parent and its depth
/// (root is 0); nodes for which it answers `Collect` are returned in order.
pub fn walk_tree<'a, F>(root: &'a TreeNode, mut visitor: F) -> Vec<&'a TreeNode>
where
    F: FnMut(&TreeNode, Option<&TreeNode>, usize) -> Visit,
{
    let mut result = Vec::new();
    let mut stack: Vec<(&'a TreeNode, Option<&'a TreeNode>, usize)> = vec![(root, None, 0)];

    while let Some((node, parent, depth)) = stack.pop() {
        match visitor(node, parent, depth) {
            Visit::SkipChildren => continue,
            Visit::Collect => result.push(node),
            Visit::Continue => {}
        }
        if let Some(children) = &node.children {
            for child in children.iter().rev() {
                stack.push((child, Some(node), depth + 1));
            }
        }
    }

    result
}

/// Child-index path of the first pre-order match, empty for the root.
fn find_path(root: &TreeNode, id: &str) -> Option<Vec<usize>> {
    let mut stack: Vec<(&TreeNode, Vec<usize>)> = vec![(root, Vec::new())];
    while let Some((node, path)) = stack.pop() {
        if node.id == id {
            return Some(path);
        }
        if let Some(children) = &node.children {
            for (i, child) in children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child, child_path));
            }
        }
    }
    None
}

fn node_at<'a>(root: &'a TreeNode, path: &[usize]) -> Option<&'a TreeNode> {
    let mut node = root;
    for &i in path {
        node = node.children.as_ref()?.get(i)?;
    }
    Some(node)
}

fn node_at_mut<'a>(root: &'a mut TreeNode, path: &[usize]) -> Option<&'a mut TreeNode> {
    let mut node = root;
    for &i in path {
        node = node.children.as_mut()?.get_mut(i)?;
    }
    Some(node)
}

/// Lookup argument for `TreeStore::get_node`.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Id(&'a str),
    Node(&'a TreeNode),
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(id: &'a str) -> Self {
        NodeRef::Id(id)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(id: &'a String) -> Self {
        NodeRef::Id(id.as_str())
    }
}

impl<'a> From<&'a TreeNode> for NodeRef<'a> {
    fn from(node: &'a TreeNode) -> Self {
        NodeRef::Node(node)
    }
}

/// Single-root tree store. An empty store renders nothing and ignores
/// mutations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeStore {
    root: Option<TreeNode>,
}

impl TreeStore {
    pub fn new(root: Option<TreeNode>) -> Self {
        let mut store = TreeStore { root };
        if let Some(root) = store.root.as_mut() {
            root.assign_keys(&mut HashSet::new());
        }
        store
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let root: TreeNode = serde_json::from_str(json)?;
        Ok(TreeStore::new(Some(root)))
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Resolve a node: references pass through, ids resolve to the first
    /// pre-order match.
    pub fn get_node<'a>(&'a self, r: impl Into<NodeRef<'a>>) -> Option<&'a TreeNode> {
        let root = self.root.as_ref()?;
        match r.into() {
            NodeRef::Node(node) => Some(node),
            NodeRef::Id(id) => node_at(root, &find_path(root, id)?),
        }
    }

    fn keys(&self) -> HashSet<Arc<str>> {
        let Some(root) = self.root.as_ref() else {
            return HashSet::new();
        };
        walk_tree(root, |_, _, _| Visit::Collect)
            .into_iter()
            .filter_map(|node| node.key.clone())
            .collect()
    }

    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        let root = self.root.as_mut()?;
        let path = find_path(root, id)?;
        node_at_mut(root, &path)
    }

    /// Append `node` under `parent_id` and expand the parent.
    ///
    /// Keys the incoming subtree already carries are kept unless another node
    /// in the store holds them (a clone of a stored node gets fresh keys).
    ///
    /// Returns `false` (nothing changed) when the store is empty or the
    /// parent is unknown.
    pub fn add_node(&mut self, parent_id: &str, mut node: TreeNode) -> bool {
        let mut taken = self.keys();
        let Some(parent) = self.get_node_mut(parent_id) else {
            tracing::trace!(parent = parent_id, "add_node: parent not found");
            return false;
        };
        node.assign_keys(&mut taken);
        tracing::debug!(parent = parent_id, id = %node.id, "add_node");
        parent.children.get_or_insert_with(Vec::new).push(node);
        parent.expand = Some(true);
        true
    }

    /// Remove the first pre-order match of `id` and return it.
    ///
    /// Removing the root empties the store. A parent left without children
    /// loses its child list entirely.
    pub fn remove_node(&mut self, id: &str) -> Option<TreeNode> {
        let root = self.root.as_mut()?;
        let Some(mut path) = find_path(root, id) else {
            tracing::trace!(id, "remove_node: not found");
            return None;
        };
        tracing::debug!(id, depth = path.len(), "remove_node");

        let Some(index) = path.pop() else {
            return self.root.take();
        };
        let parent = node_at_mut(root, &path)?;
        let children = parent.children.as_mut()?;
        let removed = children.remove(index);
        if children.is_empty() {
            parent.children = None;
        }
        Some(removed)
    }

    /// Flip a branch between expanded and collapsed. Leaves are left alone.
    ///
    /// Returns `true` when the expand state changed.
    pub fn toggle_node(&mut self, id: &str) -> bool {
        let Some(node) = self.get_node_mut(id) else {
            return false;
        };
        if !node.is_branch() {
            return false;
        }
        node.expand = Some(!node.is_expanded());
        tracing::debug!(id, expand = ?node.expand, "toggle_node");
        true
    }

    /// Expand every node with children at depth `<= level`, collapse the
    /// rest. Negative levels collapse everything, root included.
    pub fn expand_node(&mut self, level: i32) {
        let Some(root) = self.root.as_mut() else {
            return;
        };
        let mut stack: Vec<(&mut TreeNode, i32)> = vec![(root, 0)];
        while let Some((node, depth)) = stack.pop() {
            if let Some(children) = node.children.as_mut() {
                node.expand = Some(depth <= level);
                stack.extend(children.iter_mut().map(|child| (child, depth + 1)));
            }
        }
    }

    pub fn expand_all(&mut self) {
        self.expand_node(EXPAND_ALL_DEPTH);
    }

    pub fn shrink_all(&mut self) {
        self.expand_node(-1);
    }

    /// Every node with a child list carries an explicit `expand == true`.
    pub fn is_fully_expanded(&self) -> bool {
        let Some(root) = self.root.as_ref() else {
            return true;
        };
        let mut collapsed = false;
        walk_tree(root, |node, _, _| {
            if node.children.is_some() && node.expand != Some(true) {
                collapsed = true;
                return Visit::SkipChildren;
            }
            Visit::Continue
        });
        !collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> TreeStore {
        TreeStore::new(Some(TreeNode::new("r", "root").with_children(vec![
            TreeNode::new("a", "A").with_children(vec![
                TreeNode::new("a1", "A1"),
                TreeNode::new("a2", "A2"),
            ]),
            TreeNode::new("b", "B"),
        ])))
    }

    fn expand_states(store: &TreeStore) -> Vec<(String, Option<bool>)> {
        walk_tree(store.root().unwrap(), |_, _, _| Visit::Collect)
            .into_iter()
            .map(|n| (n.id.clone(), n.expand))
            .collect()
    }

    #[test]
    fn every_node_gets_a_distinct_key() {
        let store = sample();
        let nodes = walk_tree(store.root().unwrap(), |_, _, _| Visit::Collect);
        let mut keys: Vec<&Arc<str>> = nodes.iter().map(|n| n.key().unwrap()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn walk_is_pre_order_with_depth() {
        let store = sample();
        let mut seen = Vec::new();
        walk_tree(store.root().unwrap(), |node, parent, depth| {
            seen.push((node.id.clone(), parent.map(|p| p.id.clone()), depth));
            Visit::Continue
        });
        assert_eq!(
            seen,
            vec![
                ("r".to_string(), None, 0),
                ("a".to_string(), Some("r".to_string()), 1),
                ("a1".to_string(), Some("a".to_string()), 2),
                ("a2".to_string(), Some("a".to_string()), 2),
                ("b".to_string(), Some("r".to_string()), 1),
            ]
        );
    }

    #[test]
    fn get_node_first_match_and_pass_through() {
        let mut store = sample();
        store.add_node("b", TreeNode::new("a1", "duplicate"));
        assert_eq!(store.get_node("a1").unwrap().name, "A1");
        assert!(store.get_node("nope").is_none());

        let outside = TreeNode::new("x", "X");
        assert_eq!(store.get_node(&outside).unwrap().id, "x");
        assert!(TreeStore::default().get_node("r").is_none());
    }

    #[test]
    fn add_node_expands_parent() {
        let mut store = sample();
        store.get_node_mut("a").unwrap().expand = Some(false);
        assert!(store.add_node("a", TreeNode::new("a3", "A3")));
        let a = store.get_node("a").unwrap();
        assert_eq!(a.expand, Some(true));
        assert_eq!(a.children.as_ref().unwrap().len(), 3);
        assert!(store.get_node("a3").unwrap().key().is_some());

        assert!(store.add_node("b", TreeNode::new("b1", "B1")));
        assert_eq!(store.get_node("b").unwrap().children.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn add_node_on_unknown_parent_or_empty_store() {
        let mut store = sample();
        let before = store.clone();
        assert!(!store.add_node("ghost", TreeNode::new("x", "X")));
        assert_eq!(store, before);

        let mut empty = TreeStore::default();
        assert!(!empty.add_node("r", TreeNode::new("x", "X")));
        assert!(empty.is_empty());
    }

    #[test]
    fn cloned_node_gets_its_own_key() {
        let mut store = sample();
        let mut copy = store.get_node("a").unwrap().clone();
        copy.id = "a-copy".to_string();
        let original_keys: Vec<_> = walk_tree(store.get_node("a").unwrap(), |_, _, _| {
            Visit::Collect
        })
        .into_iter()
        .map(|n| n.key().cloned())
        .collect();

        assert!(store.add_node("b", copy));

        let nodes = walk_tree(store.root().unwrap(), |_, _, _| Visit::Collect);
        assert_eq!(nodes.len(), 8);
        let mut keys: Vec<&Arc<str>> = nodes.iter().map(|n| n.key().unwrap()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 8);

        let kept: Vec<_> = walk_tree(store.get_node("a").unwrap(), |_, _, _| {
            Visit::Collect
        })
        .into_iter()
        .map(|n| n.key().cloned())
        .collect();
        assert_eq!(kept, original_keys);
    }

    #[test]
    fn moved_node_keeps_its_key() {
        let mut store = sample();
        let key = store.get_node("a1").unwrap().key().cloned();
        let node = store.remove_node("a1").unwrap();
        store.add_node("b", node);
        assert_eq!(store.get_node("a1").unwrap().key().cloned(), key);
    }

    #[test]
    fn add_then_remove_restores_children() {
        let mut store = sample();
        let before = store.get_node("b").unwrap().children.clone();
        assert_eq!(before, None);
        store.add_node("b", TreeNode::new("n", "N"));
        let removed = store.remove_node("n").unwrap();
        assert_eq!(removed.id, "n");
        assert_eq!(store.get_node("b").unwrap().children, before);

        let before = store.get_node("a").unwrap().children.clone();
        store.add_node("a", TreeNode::new("n", "N"));
        store.remove_node("n");
        assert_eq!(store.get_node("a").unwrap().children, before);
    }

    #[test]
    fn removing_root_clears_store() {
        let mut store = sample();
        assert_eq!(store.remove_node("r").unwrap().id, "r");
        assert!(store.is_empty());
        assert!(store.remove_node("a").is_none());
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut store = sample();
        let before = store.clone();
        assert!(store.remove_node("ghost").is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn toggle_flips_branches_only() {
        let mut store = sample();
        assert!(!store.toggle_node("b"));
        assert_eq!(store.get_node("b").unwrap().expand, None);

        assert!(store.toggle_node("a"));
        assert_eq!(store.get_node("a").unwrap().expand, Some(false));
        assert!(store.toggle_node("a"));
        assert_eq!(store.get_node("a").unwrap().expand, Some(true));
        assert!(!store.toggle_node("ghost"));
    }

    #[test]
    fn expand_node_by_depth() {
        let mut store = sample();
        store.expand_node(0);
        assert_eq!(
            expand_states(&store),
            vec![
                ("r".to_string(), Some(true)),
                ("a".to_string(), Some(false)),
                ("a1".to_string(), None),
                ("a2".to_string(), None),
                ("b".to_string(), None),
            ]
        );
    }

    #[test]
    fn shrink_all_collapses_root() {
        let mut store = sample();
        store.shrink_all();
        assert_eq!(store.get_node("r").unwrap().expand, Some(false));
        assert_eq!(store.get_node("a").unwrap().expand, Some(false));
        assert!(!store.is_fully_expanded());

        store.expand_all();
        assert!(store.is_fully_expanded());
    }

    #[test]
    fn unset_expand_is_not_fully_expanded() {
        let store = sample();
        assert!(store.get_node("a").unwrap().is_expanded());
        assert!(!store.is_fully_expanded());
    }

    #[test]
    fn reads_nested_json() {
        let store = TreeStore::from_json(
            r#"{"id":"r","name":"root","children":[{"id":"c","name":"child","expand":false}]}"#,
        )
        .unwrap();
        let c = store.get_node("c").unwrap();
        assert_eq!(c.expand, Some(false));
        assert!(c.key().is_some());
        assert!(TreeStore::from_json("{").is_err());
    }
}
