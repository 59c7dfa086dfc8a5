//! Connector routing.
//!
//! Flow connectors are cubic curves whose shape depends on the relative
//! level of the two endpoints. Tree connectors are right-angle leads off a
//! vertical bus just right of each parent.

use crate::graph::FlowGraph;
use crate::position::{FlowLayout, TreeLayout};
use crate::rank::Layering;
use crate::tree::TreeNode;
use crate::types::{ConnectorKind, Point, Spacing};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Gap between the curve end and the node edge, filled by the arrow head.
const LINE_GAP: f64 = 10.0;

/// Horizontal distance from the parent's right edge to the tree bus.
const BUS_OFFSET: f64 = 7.0;

/// Gap between a tree lead-in and the arrow head.
const LEAD_GAP: f64 = 4.0;

/// Arrow heads are 10 units long and 8 units tall, drawn from a point 2
/// units off the node edge.
const ARROW_LENGTH: f64 = 10.0;
const ARROW_HALF_HEIGHT: f64 = 4.0;
const ARROW_MARGIN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    /// Relative line.
    LineBy(f64, f64),
    Close,
}

/// Vector path data, rendered in SVG `d` syntax.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Path {
    pub commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        self.commands.push(PathCommand::CurveTo(c1, c2, end));
        self
    }

    pub fn line_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.commands.push(PathCommand::LineBy(dx, dy));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Triangle pointing right, tip at `(x + 10, y + 4)`.
    fn arrow_right(&mut self, x: f64, y: f64) -> &mut Self {
        self.move_to(x, y)
            .line_by(ARROW_LENGTH, ARROW_HALF_HEIGHT)
            .line_by(-ARROW_LENGTH, ARROW_HALF_HEIGHT)
            .close()
    }

    /// Triangle pointing left, tip at `(x, y)`.
    fn arrow_left(&mut self, x: f64, y: f64) -> &mut Self {
        self.move_to(x, y)
            .line_by(ARROW_LENGTH, -ARROW_HALF_HEIGHT)
            .line_by(0.0, 2.0 * ARROW_HALF_HEIGHT)
            .close()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut relative = false;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => write!(f, "M{} {}", p.x, p.y)?,
                PathCommand::LineTo(p) => write!(f, "L{} {}", p.x, p.y)?,
                PathCommand::CurveTo(c1, c2, end) => write!(
                    f,
                    "C{} {} {} {} {} {}",
                    c1.x, c1.y, c2.x, c2.y, end.x, end.y
                )?,
                PathCommand::LineBy(dx, dy) => {
                    if relative {
                        f.write_str(" ")?;
                    }
                    write!(f, "l {} {}", dx, dy)?;
                }
                PathCommand::Close => f.write_str(" z")?,
            }
            relative = matches!(command, PathCommand::LineBy(..));
        }
        Ok(())
    }
}

/// A routed flow relation, tagged for later selection by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub kind: ConnectorKind,
    pub from: Arc<str>,
    pub to: Arc<str>,
    pub line: Path,
    pub arrow: Path,
}

/// Route one flow relation from `a` (at `level_a`) to `b` (at `level_b`).
pub fn route_flow_edge(
    a: Point,
    level_a: usize,
    b: Point,
    level_b: usize,
    spacing: &Spacing,
) -> (ConnectorKind, Path, Path) {
    let w = spacing.node_width;
    let h2 = spacing.half_height();
    let kind = ConnectorKind::classify(level_a, level_b);

    let mut line = Path::new();
    let mut arrow = Path::new();

    match kind {
        ConnectorKind::Forward => {
            let (y1, y2) = (a.y + h2, b.y + h2);
            let mid = (a.x + w + b.x) / 2.0;
            line.move_to(a.x + w, y1).curve_to(
                Point::new(mid, y1),
                Point::new(mid, y2),
                Point::new(b.x - LINE_GAP, y2),
            );
            arrow.arrow_right(
                b.x - LINE_GAP - ARROW_MARGIN,
                y2 - ARROW_HALF_HEIGHT,
            );
        }
        ConnectorKind::Back => {
            // Leaves the source's left edge below center, enters the
            // target's right edge.
            let (y1, y2) = (a.y + h2 + spacing.back_offset, b.y + h2 + spacing.back_offset);
            let mid = (a.x + b.x + w) / 2.0;
            line.move_to(a.x, y1).curve_to(
                Point::new(mid, y1),
                Point::new(mid, y2),
                Point::new(b.x + w + LINE_GAP, y2),
            );
            arrow.arrow_left(b.x + w + ARROW_MARGIN, y2);
        }
        ConnectorKind::Same => {
            let (y1, y2) = (a.y + h2 - spacing.same_offset, b.y + h2 - spacing.same_offset);
            let bulge = spacing.span_x / 2.0;
            line.move_to(a.x + w, y1).curve_to(
                Point::new(a.x + w + bulge, y1),
                Point::new(b.x + w + bulge, y2),
                Point::new(b.x + w + LINE_GAP, y2),
            );
            arrow.arrow_left(b.x + w + ARROW_MARGIN, y2);
        }
    }

    (kind, line, arrow)
}

/// One connector per child link of every levelled node, in level order.
/// Duplicate links produce duplicate connectors.
pub fn route_flow(
    g: &FlowGraph,
    layering: &Layering,
    layout: &FlowLayout,
    spacing: &Spacing,
) -> Vec<Connector> {
    let mut connectors = Vec::new();
    for v in layering.iter() {
        let (Some(a), Some(level_a)) = (layout.get(v), layering.level(v)) else {
            continue;
        };
        for w in g.children(v) {
            let (Some(b), Some(level_b)) = (layout.get(w), layering.level(w)) else {
                continue;
            };
            let (kind, line, arrow) = route_flow_edge(a, level_a, b, level_b, spacing);
            connectors.push(Connector {
                kind,
                from: v.clone(),
                to: w.clone(),
                line,
                arrow,
            });
        }
    }
    connectors
}

/// All tree connectors merged into one line path and one arrow path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeRoutes {
    pub line: Path,
    pub arrow: Path,
}

/// Route the visible part of a laid-out tree.
pub fn route_tree(root: &TreeNode, layout: &TreeLayout, spacing: &Spacing) -> TreeRoutes {
    let mut routes = TreeRoutes::default();
    walk_routes(root, true, layout, spacing, &mut routes);
    routes
}

fn walk_routes(
    node: &TreeNode,
    is_root: bool,
    layout: &TreeLayout,
    spacing: &Spacing,
    routes: &mut TreeRoutes,
) {
    let Some(at) = layout.get(node) else {
        return;
    };
    let h2 = spacing.half_height();

    // Every non-root node gets an arrow at its left edge
    if !is_root {
        routes.arrow.arrow_right(
            at.x - LINE_GAP - ARROW_MARGIN,
            at.y + h2 - ARROW_HALF_HEIGHT,
        );
    }

    let Some(children) = node.visible_children() else {
        return;
    };

    let bus_x = at.x + spacing.node_width + BUS_OFFSET;
    let mut last_y = at.y;
    for child in children {
        if let Some(c) = layout.get(child) {
            routes
                .line
                .move_to(bus_x, c.y + h2)
                .line_to(c.x - LEAD_GAP, c.y + h2);
            last_y = c.y;
        }
        walk_routes(child, false, layout, spacing, routes);
    }

    if children.len() > 1 {
        routes
            .line
            .move_to(bus_x, at.y + h2)
            .line_to(bus_x, last_y + h2 + 1.0);
    }
}
