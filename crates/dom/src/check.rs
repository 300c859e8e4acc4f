//! Node predicates
//!
//! Every check takes an optional id and answers `false` for absent or
//! unknown nodes, so callers can chain `parent_element(..)?` lookups
//! without unwrapping.

use crate::arena::DomArena;
use crate::types::NodeType;
use crate::NodeId;

fn node_type(arena: &DomArena, node: Option<NodeId>) -> Option<NodeType> {
    node.and_then(|id| arena.get(id).ok())
        .map(|node| node.node_type)
}

pub fn is_document_fragment(arena: &DomArena, node: Option<NodeId>) -> bool {
    node_type(arena, node) == Some(NodeType::DocumentFragment)
}

pub fn is_element(arena: &DomArena, node: Option<NodeId>) -> bool {
    node_type(arena, node) == Some(NodeType::Element)
}

pub fn is_comment(arena: &DomArena, node: Option<NodeId>) -> bool {
    node_type(arena, node) == Some(NodeType::Comment)
}

pub fn is_text(arena: &DomArena, node: Option<NodeId>) -> bool {
    node_type(arena, node) == Some(NodeType::Text)
}

/// Element carrying a `contenteditable` attribute, whatever its value
pub fn is_content_editable(arena: &DomArena, node: Option<NodeId>) -> bool {
    node.and_then(|id| arena.get(id).ok())
        .is_some_and(|node| node.is_element() && node.has_attr("contenteditable"))
}

/// Editable element marked with a non-empty `data-block`
pub fn is_block_element(arena: &DomArena, node: Option<NodeId>) -> bool {
    is_content_editable(arena, node)
        && node
            .and_then(|id| arena.get(id).ok())
            .and_then(|node| node.attr("data-block"))
            .is_some_and(|block| !block.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_checks() {
        let mut arena = DomArena::new();
        let div = arena.create_element("div");
        let text = arena.create_text("x");
        let comment = arena.create_comment("c");
        let fragment = arena.create_fragment();

        assert!(is_element(&arena, Some(div)));
        assert!(is_text(&arena, Some(text)));
        assert!(is_comment(&arena, Some(comment)));
        assert!(is_document_fragment(&arena, Some(fragment)));
        assert!(!is_text(&arena, Some(div)));
        assert!(!is_element(&arena, None));
        assert!(!is_element(&arena, Some(77)));
    }

    #[test]
    fn test_block_element() {
        let mut arena = DomArena::new();
        let block = arena.create_block_element();
        assert!(is_content_editable(&arena, Some(block)));
        assert!(is_block_element(&arena, Some(block)));

        let editable = arena.create_element("div");
        arena
            .set_attribute(editable, "contenteditable", "")
            .unwrap();
        assert!(is_content_editable(&arena, Some(editable)));
        assert!(!is_block_element(&arena, Some(editable)));

        arena.set_attribute(editable, "data-block", "").unwrap();
        assert!(!is_block_element(&arena, Some(editable)));

        let plain = arena.create_element("div");
        arena.set_attribute(plain, "data-block", "true").unwrap();
        assert!(!is_block_element(&arena, Some(plain)));
        assert!(!is_block_element(&arena, None));
    }
}
