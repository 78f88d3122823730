//! Directional resolution over the focus tree.
//!
//! Starting from the focused leaf, each scope searches the siblings of the
//! current *moving unit*:
//!
//! 1. An explicit neighbor hint on the moving unit wins outright.
//! 2. With geometry on the moving unit and at least one sibling, the closest
//!    sibling whose centre lies beyond the unit's centre in the requested
//!    direction and whose span overlaps the unit's span on the perpendicular
//!    axis is chosen. Ties go to the smaller perpendicular offset, then to
//!    registration order. If none qualifies, siblings without geometry are
//!    tried by order.
//! 3. Without geometry, the previous (left/up) or next (right/down) sibling in
//!    registration order is chosen.
//!
//! When a scope yields nothing, the parent container becomes the moving unit
//! and the search repeats one level up, stopping at the root or at a focus
//! boundary.

use super::node::{NodeId, Rect};
use super::tree::FocusTree;
use super::Direction;
use std::cmp::Ordering;

/// Resolve the leaf that should receive focus when moving from `from`.
///
/// Returns `None` when no candidate exists at any scope.
pub fn resolve(tree: &FocusTree, from: NodeId, direction: Direction) -> Option<NodeId> {
    let mut unit = from;

    loop {
        let parent = tree.parent(unit)?;

        if let Some(leaf) = explicit_target(tree, unit, direction) {
            // A hint leading back to the focused leaf is not a move.
            return (leaf != from).then_some(leaf);
        }

        if let Some(sibling) = sibling_in_direction(tree, parent, unit, direction) {
            return tree.default_leaf(sibling);
        }

        if tree
            .node(parent)
            .is_some_and(|node| node.options().focus_boundary)
        {
            tracing::trace!(boundary = %parent, %direction, "Stopped at focus boundary");
            return None;
        }

        unit = parent;
    }
}

/// Geometry of a node, or for containers without their own geometry, the
/// union of their eligible children's geometry.
pub fn effective_rect(tree: &FocusTree, id: NodeId) -> Option<Rect> {
    let node = tree.node(id)?;
    if let Some(rect) = node.geometry() {
        return Some(rect);
    }

    node.children()
        .iter()
        .filter(|child| tree.is_eligible(**child))
        .filter_map(|child| effective_rect(tree, *child))
        .reduce(|acc, rect| acc.union(&rect))
}

fn explicit_target(tree: &FocusTree, unit: NodeId, direction: Direction) -> Option<NodeId> {
    let target = tree.node(unit)?.neighbor(direction)?;

    let leaf = tree
        .is_eligible(target)
        .then(|| tree.default_leaf(target))
        .flatten();
    if leaf.is_none() {
        tracing::debug!(node = %unit, %target, %direction, "Ignoring stale neighbor hint");
    }
    leaf
}

fn sibling_in_direction(
    tree: &FocusTree,
    parent: NodeId,
    unit: NodeId,
    direction: Direction,
) -> Option<NodeId> {
    let siblings = tree.children(parent);
    let candidates: Vec<(usize, NodeId)> = siblings
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, id)| *id != unit && is_candidate(tree, *id))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    if let Some(unit_rect) = effective_rect(tree, unit) {
        let mut with_geometry: Vec<(usize, NodeId, Rect)> = Vec::new();
        let mut without_geometry: Vec<(usize, NodeId)> = Vec::new();
        for &(order, id) in &candidates {
            match effective_rect(tree, id) {
                Some(rect) => with_geometry.push((order, id, rect)),
                None => without_geometry.push((order, id)),
            }
        }

        if !with_geometry.is_empty() {
            if let Some(target) = closest_in_direction(&unit_rect, &with_geometry, direction) {
                return Some(target);
            }
            // Siblings that have not reported geometry yet are still reachable by order.
            return adjacent_in_order(siblings, unit, direction, &without_geometry);
        }
    }

    adjacent_in_order(siblings, unit, direction, &candidates)
}

fn is_candidate(tree: &FocusTree, id: NodeId) -> bool {
    tree.is_eligible(id) && tree.default_leaf(id).is_some()
}

fn closest_in_direction(
    from: &Rect,
    candidates: &[(usize, NodeId, Rect)],
    direction: Direction,
) -> Option<NodeId> {
    let (fx, fy) = from.center();

    candidates
        .iter()
        .filter_map(|(order, id, rect)| {
            let (cx, cy) = rect.center();
            let (primary, perpendicular) = match direction {
                Direction::Right => (cx - fx, cy - fy),
                Direction::Left => (fx - cx, cy - fy),
                Direction::Down => (cy - fy, cx - fx),
                Direction::Up => (fy - cy, cx - fx),
            };

            if primary <= 0.0 || !in_beam(from, rect, direction) {
                return None;
            }

            // Squared Euclidean distance orders candidates the same way.
            let distance = primary * primary + perpendicular * perpendicular;
            Some((distance, perpendicular.abs(), *order, *id))
        })
        .min_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| a.1.total_cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        })
        .map(|(_, _, _, id)| id)
}

/// Whether `candidate` overlaps `from` on the axis perpendicular to the move.
fn in_beam(from: &Rect, candidate: &Rect, direction: Direction) -> bool {
    if direction.is_horizontal() {
        spans_overlap(from.y, from.bottom(), candidate.y, candidate.bottom())
    } else {
        spans_overlap(from.x, from.right(), candidate.x, candidate.right())
    }
}

fn spans_overlap(a_start: f32, a_end: f32, b_start: f32, b_end: f32) -> bool {
    let lo = a_start.max(b_start);
    let hi = a_end.min(b_end);
    let degenerate = a_end <= a_start || b_end <= b_start;

    // Touching edges do not count, except for zero-width spans.
    match lo.partial_cmp(&hi) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => degenerate,
        _ => false,
    }
}

fn adjacent_in_order(
    siblings: &[NodeId],
    unit: NodeId,
    direction: Direction,
    candidates: &[(usize, NodeId)],
) -> Option<NodeId> {
    let pos = siblings.iter().position(|id| *id == unit)?;

    if direction.is_forward() {
        candidates
            .iter()
            .find(|(order, _)| *order > pos)
            .map(|(_, id)| *id)
    } else {
        candidates
            .iter()
            .rev()
            .find(|(order, _)| *order < pos)
            .map(|(_, id)| *id)
    }
}
