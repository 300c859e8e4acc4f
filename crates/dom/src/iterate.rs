//! Tree walking helpers around editable blocks
//!
//! Most walks stop at the nearest block element (see
//! [`check::is_block_element`]): formatting wrappers live between a text node
//! and its block, never above it.

use crate::arena::DomArena;
use crate::check;
use crate::error::{DomError, Result};
use crate::types::NodeId;

/// Iterator over formatting ancestors, see [`parent_elements`]
pub struct ParentElements<'a> {
    arena: &'a DomArena,
    current: Option<NodeId>,
}

impl Iterator for ParentElements<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.current?;
        if check::is_block_element(self.arena, Some(current)) {
            self.current = None;
            return None;
        }
        self.current = self.arena.parent_element(current).ok().flatten();
        Some(current)
    }
}

/// Elements from `node` (or its parent element when `node` is not an
/// element) up to, but excluding, the nearest block element
pub fn parent_elements(arena: &DomArena, node_id: NodeId) -> ParentElements<'_> {
    let current = if check::is_element(arena, Some(node_id)) {
        Some(node_id)
    } else {
        arena.parent_element(node_id).ok().flatten()
    };
    ParentElements { arena, current }
}

/// Ancestor elements of `node` below the nearest block, nearest first
pub fn get_parent_elements(arena: &DomArena, node_id: NodeId) -> Result<Vec<NodeId>> {
    let start = arena.parent_element(node_id)?;
    Ok(ParentElements {
        arena,
        current: start,
    }
    .collect())
}

/// Closest ancestor that is a block element
pub fn get_nearest_block_element(arena: &DomArena, node_id: NodeId) -> Result<Option<NodeId>> {
    let mut current = arena.parent_element(node_id)?;
    while let Some(id) = current {
        if check::is_block_element(arena, Some(id)) {
            return Ok(Some(id));
        }
        current = arena.parent_element(id)?;
    }
    Ok(None)
}

/// First text node in document order, the node itself included
pub fn get_nearest_child_text_node(arena: &DomArena, node_id: NodeId) -> Result<Option<NodeId>> {
    if arena.get(node_id)?.is_text() {
        return Ok(Some(node_id));
    }
    Ok(arena
        .descendants(node_id)
        .find(|&id| check::is_text(arena, Some(id))))
}

/// Siblings after `node`; deep copies when `clone` is set
pub fn get_next_siblings(arena: &mut DomArena, node_id: NodeId, clone: bool) -> Result<Vec<NodeId>> {
    let siblings = arena.following_siblings(node_id)?;
    if !clone {
        return Ok(siblings);
    }
    siblings
        .into_iter()
        .map(|sibling| arena.clone_deep(sibling))
        .collect()
}

/// Descendant elements with the given tag (ASCII case-insensitive)
pub fn elements_with_tag_name<'a>(
    arena: &'a DomArena,
    root: NodeId,
    tag: &'a str,
) -> impl Iterator<Item = NodeId> + 'a {
    arena.descendants(root).filter(move |&id| {
        arena
            .get(id)
            .map(|node| node.has_tag(tag))
            .unwrap_or(false)
    })
}

/// Descendant comments whose data starts with `prefix`
pub fn comments_with_prefix<'a>(
    arena: &'a DomArena,
    root: NodeId,
    prefix: &'a str,
) -> impl Iterator<Item = NodeId> + 'a {
    arena.descendants(root).filter(move |&id| {
        arena
            .get(id)
            .map(|node| node.is_comment() && node.node_value.starts_with(prefix))
            .unwrap_or(false)
    })
}

/// First matching comment, see [`comments_with_prefix`]
pub fn get_comment_node(arena: &DomArena, root: NodeId, prefix: &str) -> Option<NodeId> {
    comments_with_prefix(arena, root, prefix).next()
}

/// Unwrap every element with `tag` inside a fragment
///
/// Children of a matching element take its place, in order; nested matches
/// are unwrapped as well.
pub fn remove_nested_elements_with_tag_name(
    arena: &mut DomArena,
    fragment: NodeId,
    tag: &str,
) -> Result<NodeId> {
    if !check::is_document_fragment(arena, Some(fragment)) {
        let actual = arena.get(fragment)?.node_type.label().to_string();
        return Err(DomError::NotDocumentFragment(actual));
    }

    let matches: Vec<NodeId> = elements_with_tag_name(arena, fragment, tag).collect();
    for element in matches {
        let Some(parent) = arena.get(element)?.parent_id else {
            continue;
        };
        let children = arena.child_ids(element)?.to_vec();
        for child in children {
            arena.insert_before(parent, child, Some(element))?;
        }
        arena.detach(element)?;
    }
    tracing::trace!(fragment, tag, "unwrapped nested elements");

    Ok(fragment)
}
