use flowtree::tree::{walk_tree, Visit};
use flowtree::{LayoutConfig, Spacing, TreeNode, TreeView, CLICK};
use pretty_assertions::assert_eq;

fn leaf(id: &str) -> TreeNode {
    TreeNode::new(id, &id.to_uppercase())
}

fn sample() -> TreeView {
    TreeView::new(
        Some(leaf("r").with_children(vec![
            leaf("p").with_children(vec![leaf("p1"), leaf("p2")]),
            leaf("q").with_children(vec![leaf("q1")]),
            leaf("s"),
        ])),
        &LayoutConfig::default(),
    )
}

#[test]
fn parent_lines_up_with_first_child_and_draws_a_bus() {
    let view = TreeView::new(
        Some(leaf("r").with_children(vec![leaf("p"), leaf("q")])),
        &LayoutConfig::default(),
    );
    let pass = view.pass().unwrap();
    let at = |id: &str| {
        let node = view.get_node(id).unwrap();
        let l = pass.layout.get(node).unwrap();
        (l.x, l.y)
    };
    assert_eq!(at("r"), (0.0, 0.0));
    assert_eq!(at("p"), (180.0, 0.0));
    assert_eq!(at("q"), (180.0, 70.0));

    assert_eq!(
        pass.routes.line.to_string(),
        "M127 30L176 30M127 100L176 100M127 30L127 101"
    );
    assert_eq!(
        pass.routes.arrow.to_string(),
        "M168 26l 10 4 l -10 4 zM168 96l 10 4 l -10 4 z"
    );
}

#[test]
fn single_child_has_no_bus() {
    let view = TreeView::new(
        Some(leaf("r").with_children(vec![leaf("p")])),
        &LayoutConfig::default(),
    );
    let pass = view.pass().unwrap();
    assert_eq!(pass.routes.line.to_string(), "M127 30L176 30");
}

#[test]
fn children_sit_one_column_right_of_their_parent() {
    let view = sample();
    let pass = view.pass().unwrap();
    let spacing = Spacing::tree();
    let root = view.store().root().unwrap();

    let mut pairs = 0;
    walk_tree(root, |node, parent, _| {
        if let (Some(parent), Some(child)) = (parent, pass.layout.get(node)) {
            let p = pass.layout.get(parent).unwrap();
            assert_eq!(child.x - p.x, spacing.node_width + spacing.span_x);
            assert!(p.x < child.x);
            pairs += 1;
        }
        Visit::Continue
    });
    assert_eq!(pairs, 6);
}

#[test]
fn collapsed_subtree_is_hidden_and_restored() {
    let mut view = sample();
    let expanded = view.pass().unwrap();

    view.toggle_node("p");
    let collapsed = view.pass().unwrap();
    assert_eq!(collapsed.layout.len(), expanded.layout.len() - 2);
    let p1 = view.get_node("p1").unwrap();
    assert!(collapsed.layout.get(p1).is_none());

    view.toggle_node("p");
    assert_eq!(view.pass().unwrap(), expanded);
}

#[test]
fn expand_node_minus_one_shows_only_the_root() {
    let mut view = sample();
    view.expand_node(-1);
    let html = view.render().to_string();
    assert_eq!(html.matches("<treenode").count(), 1);
    assert!(html.contains(r#"<treenode data-type="branch" data-id="r""#));

    view.expand_all();
    assert_eq!(view.render().matches("<treenode").count(), 7);
}

#[test]
fn add_then_remove_round_trips() {
    let mut view = sample();
    for parent in ["s", "q"] {
        let before = view.get_node(parent).unwrap().children.clone();
        view.add_node(parent, leaf("n"));
        assert_eq!(view.get_node(parent).unwrap().expand, Some(true));
        let removed = view.remove_node("n").unwrap();
        assert_eq!(removed.id, "n");
        assert_eq!(view.get_node(parent).unwrap().children, before);
    }
}

#[test]
fn keys_stay_put_across_mutations() {
    let mut view = sample();
    let key = view.get_node("q1").unwrap().key().cloned();
    view.add_node("s", leaf("s1"));
    view.remove_node("p");
    view.render();
    assert_eq!(view.get_node("q1").unwrap().key().cloned(), key);
    let key = key.unwrap();
    assert!(view.surface().contains(&format!(r#"id="{}""#, key)));
}

#[test]
fn click_veto_keeps_the_tree_unchanged() {
    let mut view = sample();
    view.render();
    let before = view.surface().to_string();

    view.events().on(CLICK, |event| {
        if event.node == "p" {
            event.return_value = false;
        }
    });
    view.click("p");
    assert_eq!(view.surface(), before);

    view.click("q");
    assert_eq!(view.get_node("q").unwrap().expand, Some(false));
    assert!(!view.surface().contains("<h4>Q1</h4>"));
}

#[test]
fn removing_the_root_empties_the_view() {
    let mut view = sample();
    view.remove_node("r");
    assert_eq!(view.render(), "");
    assert!(view.get_node("p").is_none());
}

#[test]
fn reads_tree_json_with_extra_fields() {
    let json = r#"{
        "id": "r",
        "name": "Root",
        "owner": "ops",
        "children": [
            {"id": "a", "name": "A", "selected": true},
            {"id": "b", "name": "B", "children": [], "expand": false}
        ]
    }"#;
    let mut view = TreeView::from_json(json, &LayoutConfig::default()).unwrap();
    assert_eq!(view.get_node("r").unwrap().extra["owner"], "ops");

    let html = view.render().to_string();
    assert!(html.contains(r#"<treenode data-type="leaf" data-id="a" class="cur""#));
    assert!(html.contains(r#"<treenode data-type="branch" data-id="b""#));
}

#[test]
fn cloned_node_is_laid_out_on_its_own() {
    let mut view = TreeView::new(
        Some(leaf("r").with_children(vec![leaf("a"), leaf("b")])),
        &LayoutConfig::default(),
    );
    let mut copy = view.get_node("a").unwrap().clone();
    copy.id = "a2".to_string();
    view.add_node("b", copy);

    assert_ne!(
        view.get_node("a").unwrap().key(),
        view.get_node("a2").unwrap().key()
    );

    let pass = view.pass().unwrap();
    assert_eq!(pass.layout.len(), 4);
    let at = |id: &str| {
        let l = pass.layout.get(view.get_node(id).unwrap()).unwrap();
        (l.x, l.y)
    };
    assert_eq!(at("r"), (0.0, 0.0));
    assert_eq!(at("a"), (180.0, 0.0));
    assert_eq!(at("b"), (180.0, 70.0));
    assert_eq!(at("a2"), (360.0, 70.0));

    let html = view.render().to_string();
    assert_eq!(html.matches("<treenode").count(), 4);
}
