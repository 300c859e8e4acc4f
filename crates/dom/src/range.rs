//! Ranges and a caller-owned selection
//!
//! A [`Range`] is a pair of boundary points, each a node plus an offset
//! (child index for containers, character offset for text). Boundary points
//! are ordered by turning them into index paths from the tree root:
//!
//! ```text
//! (node, offset) → [index of ancestor 1, ..., index of node, offset]
//! ```
//!
//! Lexicographic order on those paths is document order on the points.
//!
//! There is no global selection; callers hold a [`Selection`] and pass it in.

use std::cmp::Ordering;

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::iterate::parent_elements;
use crate::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

fn position_key(arena: &DomArena, point: BoundaryPoint) -> Result<(NodeId, Vec<usize>)> {
    let mut path = vec![point.offset];
    let mut current = point.node;
    while let Some(parent_id) = arena.get(current)?.parent_id {
        let index = arena
            .index_in_parent(current)?
            .ok_or(DomError::NodeNotFound(current))?;
        path.push(index);
        current = parent_id;
    }
    path.reverse();
    Ok((current, path))
}

/// Document order of two boundary points in the same tree
pub fn compare_boundary_points(
    arena: &DomArena,
    a: BoundaryPoint,
    b: BoundaryPoint,
) -> Result<Ordering> {
    let (root_a, key_a) = position_key(arena, a)?;
    let (root_b, key_b) = position_key(arena, b)?;
    if root_a != root_b {
        return Err(DomError::InvalidTree(format!(
            "boundary points in disconnected trees ({root_a} and {root_b})"
        )));
    }
    Ok(key_a.cmp(&key_b))
}

impl Range {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    pub fn collapsed_at(point: BoundaryPoint) -> Self {
        Self::new(point, point)
    }

    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundary points
    pub fn common_ancestor_container(&self, arena: &DomArena) -> Result<NodeId> {
        let mut current = Some(self.end.node);
        while let Some(id) = current {
            if arena.contains(id, self.start.node) {
                return Ok(id);
            }
            current = arena.get(id)?.parent_id;
        }
        Err(DomError::InvalidTree(
            "range boundaries share no ancestor".to_string(),
        ))
    }

    /// Whether any part of `node` lies inside the range
    pub fn intersects_node(&self, arena: &DomArena, node_id: NodeId) -> Result<bool> {
        if arena.root_of(node_id)? != arena.root_of(self.start.node)? {
            return Ok(false);
        }
        let Some(parent_id) = arena.get(node_id)?.parent_id else {
            return Ok(true);
        };
        let offset = arena
            .index_in_parent(node_id)?
            .ok_or(DomError::NodeNotFound(node_id))?;

        let before = BoundaryPoint::new(parent_id, offset);
        let after = BoundaryPoint::new(parent_id, offset + 1);
        Ok(compare_boundary_points(arena, before, self.end)? == Ordering::Less
            && compare_boundary_points(arena, after, self.start)? == Ordering::Greater)
    }
}

/// Text nodes touched by the range, in document order
///
/// The walk covers the common ancestor's descendants; when that ancestor is a
/// text node its parent element is walked instead.
pub fn text_nodes_in_range(arena: &DomArena, range: &Range) -> Result<Vec<NodeId>> {
    let mut container = range.common_ancestor_container(arena)?;
    if arena.get(container)?.is_text() {
        container = arena.parent_element(container)?.unwrap_or(container);
    }

    let mut nodes = Vec::new();
    for id in arena.descendants(container) {
        if arena.get(id)?.is_text() && range.intersects_node(arena, id)? {
            nodes.push(id);
        }
    }
    Ok(nodes)
}

/// Caller-owned selection state
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ranges: Vec<Range>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_range(&mut self, range: Range) {
        self.ranges.push(range);
    }

    pub fn remove_all_ranges(&mut self) {
        self.ranges.clear();
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn range_at(&self, index: usize) -> Option<&Range> {
        self.ranges.get(index)
    }

    /// No range, or the first range is collapsed
    pub fn is_collapsed(&self) -> bool {
        self.ranges.first().map_or(true, Range::collapsed)
    }
}

/// Replace the selection with a single range
///
/// An end point before the start collapses the range at the end point.
pub fn select_range(
    arena: &DomArena,
    selection: &mut Selection,
    start: NodeId,
    start_offset: usize,
    end: NodeId,
    end_offset: usize,
) -> Result<()> {
    let start = BoundaryPoint::new(start, start_offset);
    let end = BoundaryPoint::new(end, end_offset);
    let range = match compare_boundary_points(arena, start, end)? {
        Ordering::Greater => Range::collapsed_at(end),
        _ => Range::new(start, end),
    };
    selection.remove_all_ranges();
    selection.add_range(range);
    Ok(())
}

/// Put a collapsed caret inside `element`, at `offset` of its first child
///
/// Elements without children leave the selection untouched.
pub fn move_caret_to_element(
    arena: &DomArena,
    selection: &mut Selection,
    element: NodeId,
    offset: usize,
) -> Result<()> {
    if let Some(&first) = arena.child_ids(element)?.first() {
        move_caret_to_node(selection, first, offset);
    }
    Ok(())
}

/// Put a collapsed caret at `offset` within `node`
pub fn move_caret_to_node(selection: &mut Selection, node_id: NodeId, offset: usize) {
    selection.remove_all_ranges();
    selection.add_range(Range::collapsed_at(BoundaryPoint::new(node_id, offset)));
}

/// Whether every selected text node sits inside a `tag` element
///
/// Only formatting ancestors below the nearest block count. A missing or
/// collapsed selection is never formatted.
pub fn is_selected_with(arena: &DomArena, selection: &Selection, tag: &str) -> Result<bool> {
    let Some(range) = selection.range_at(0) else {
        return Ok(false);
    };
    if selection.is_collapsed() {
        return Ok(false);
    }

    let mut formatted = false;
    for node_id in text_nodes_in_range(arena, range)? {
        formatted = parent_elements(arena, node_id).any(|parent| {
            arena
                .get(parent)
                .map(|node| node.has_tag(tag))
                .unwrap_or(false)
        });
        if !formatted {
            return Ok(false);
        }
    }
    Ok(formatted)
}

pub fn is_selection_bold(arena: &DomArena, selection: &Selection) -> Result<bool> {
    is_selected_with(arena, selection, "STRONG")
}

pub fn is_selection_italic(arena: &DomArena, selection: &Selection) -> Result<bool> {
    is_selected_with(arena, selection, "EM")
}

pub fn is_selection_underline(arena: &DomArena, selection: &Selection) -> Result<bool> {
    is_selected_with(arena, selection, "U")
}

pub fn is_selection_strike_through(arena: &DomArena, selection: &Selection) -> Result<bool> {
    is_selected_with(arena, selection, "S")
}

pub fn is_selection_code(arena: &DomArena, selection: &Selection) -> Result<bool> {
    is_selected_with(arena, selection, "CODE")
}
