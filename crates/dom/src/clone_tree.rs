//! Tree splitting around a text marker
//!
//! Given a container, a marker text node somewhere below it and a
//! replacement text node, build a detached fragment holding everything
//! before the marker or everything after it, with the ancestor chain of the
//! marker rebuilt as shallow clones.
//!
//! ```text
//! <strong>Hello</strong> World      marker = "Hello"
//!
//!   Before, replacement "Hello"  →  <strong>Hello</strong>
//!   After,  replacement ""       →   World
//! ```
//!
//! The source tree is only read. Untouched siblings are deep-cloned, the
//! ancestors of the marker are shallow-cloned, and the replacement node is
//! moved into the result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType};

/// Deepest container nesting `clone_tree` descends into
pub const MAX_SPLIT_DEPTH: usize = 512;

/// Which side of the marker ends up in the fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    Before,
    After,
}

impl fmt::Display for SplitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitDirection::Before => f.write_str("before"),
            SplitDirection::After => f.write_str("after"),
        }
    }
}

impl FromStr for SplitDirection {
    type Err = DomError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "before" => Ok(SplitDirection::Before),
            "after" => Ok(SplitDirection::After),
            other => Err(DomError::InvalidDirection(other.to_string())),
        }
    }
}

/// Result of [`split_at`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Fragment(NodeId),
    MarkerNotFound,
}

/// Whether a node carries visible structure worth keeping
///
/// Text nodes always count, even empty ones. Anything else counts when one of
/// its direct children is an element or a text node.
pub fn has_meaningful_content(arena: &DomArena, node_id: NodeId) -> Result<bool> {
    let node = arena.get(node_id)?;
    if node.is_text() {
        return Ok(true);
    }
    for &child_id in &node.children_ids {
        let child = arena.get(child_id)?;
        if child.is_element() || child.is_text() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn expect_text(arena: &DomArena, node_id: NodeId) -> Result<()> {
    let node = arena.get(node_id)?;
    if node.is_text() {
        Ok(())
    } else {
        Err(DomError::InvalidNodeType {
            expected: NodeType::Text.label().to_string(),
            actual: node.node_type.label().to_string(),
        })
    }
}

fn is_strictly_below(arena: &DomArena, container: NodeId, node_id: NodeId) -> bool {
    node_id != container && arena.contains(container, node_id)
}

/// Build the part of `container` before or after `marker`
///
/// `Before` is inclusive of the marker position: the fragment ends with the
/// replacement text. `After` starts with it. An empty replacement is left
/// out. A marker that is not below `container` yields an empty fragment;
/// use [`split_at`] to tell that case apart.
pub fn clone_tree(
    arena: &mut DomArena,
    container: NodeId,
    marker: NodeId,
    replacement: NodeId,
    direction: SplitDirection,
) -> Result<NodeId> {
    arena.get(container)?;
    expect_text(arena, marker)?;
    expect_text(arena, replacement)?;

    if !is_strictly_below(arena, container, marker) {
        tracing::debug!(container, marker, "marker is not below container");
        return Ok(arena.create_fragment());
    }

    let fragment = split_level(arena, container, marker, replacement, direction, 0)?;
    tracing::debug!(
        container,
        marker,
        %direction,
        fragment,
        "split tree around marker"
    );
    Ok(fragment)
}

/// Like [`clone_tree`], but reports an unreachable marker explicitly
pub fn split_at(
    arena: &mut DomArena,
    container: NodeId,
    marker: NodeId,
    replacement: NodeId,
    direction: SplitDirection,
) -> Result<Split> {
    arena.get(container)?;
    expect_text(arena, marker)?;
    expect_text(arena, replacement)?;
    if !is_strictly_below(arena, container, marker) {
        return Ok(Split::MarkerNotFound);
    }
    clone_tree(arena, container, marker, replacement, direction).map(Split::Fragment)
}

fn split_level(
    arena: &mut DomArena,
    container: NodeId,
    marker: NodeId,
    replacement: NodeId,
    direction: SplitDirection,
    depth: usize,
) -> Result<NodeId> {
    if depth > MAX_SPLIT_DEPTH {
        return Err(DomError::MaxDepthExceeded {
            current: depth,
            max: MAX_SPLIT_DEPTH,
        });
    }

    let fragment = arena.create_fragment();
    let mut found = false;
    let children = arena.child_ids(container)?.to_vec();

    for child_id in children {
        if child_id == marker {
            if !arena.get(replacement)?.node_value.is_empty() {
                arena.append_child(fragment, replacement)?;
            }
            if direction == SplitDirection::Before {
                return Ok(fragment);
            }
            found = true;
            continue;
        }

        let holds_marker = arena.contains(child_id, marker);

        if holds_marker && !found {
            found = true;
            let nested = split_level(arena, child_id, marker, replacement, direction, depth + 1)?;
            let wrapper = arena.clone_shallow(child_id)?;
            arena.move_children(nested, wrapper)?;
            if has_meaningful_content(arena, wrapper)? {
                arena.append_child(fragment, wrapper)?;
            } else {
                tracing::trace!(wrapper, "dropping empty wrapper clone");
            }
            continue;
        }

        match direction {
            SplitDirection::Before if !found => {
                let copy = arena.clone_deep(child_id)?;
                arena.append_child(fragment, copy)?;
            }
            SplitDirection::After if found && !holds_marker => {
                let copy = arena.clone_deep(child_id)?;
                arena.append_child(fragment, copy)?;
            }
            _ => {}
        }
    }

    Ok(fragment)
}
