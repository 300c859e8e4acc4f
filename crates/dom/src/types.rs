//! Core type definitions for the arena document tree
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Node identity is the index, never the content
//! 3. Use SmallVec for small arrays (avoid heap allocation)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any document
pub type NodeId = u32;

/// Node type matching DOM specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    EntityReference = 5,
    Entity = 6,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CdataSection),
            5 => Some(NodeType::EntityReference),
            6 => Some(NodeType::Entity),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            12 => Some(NodeType::Notation),
            _ => None,
        }
    }

    /// Name used in error messages and `node_name` of non-element nodes
    pub fn label(self) -> &'static str {
        match self {
            NodeType::Element => "element",
            NodeType::Attribute => "attribute",
            NodeType::Text => "#text",
            NodeType::CdataSection => "#cdata-section",
            NodeType::EntityReference => "entity-reference",
            NodeType::Entity => "entity",
            NodeType::ProcessingInstruction => "processing-instruction",
            NodeType::Comment => "#comment",
            NodeType::Document => "#document",
            NodeType::DocumentType => "doctype",
            NodeType::DocumentFragment => "#document-fragment",
            NodeType::Notation => "notation",
        }
    }
}

/// Rectangle with coordinates, the layout box of a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DomRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same box moved by `(dx, dy)`, e.g. for a scroll offset
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// The main tree node structure
///
/// Design philosophy:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
/// - Attributes keep insertion order so serialization is deterministic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>, // Most nodes have <4 children

    /// Lowercase tag for elements, `#text`/`#comment`/... otherwise
    pub node_name: String,
    /// Character data for text and comment nodes
    pub node_value: String,
    pub attributes: SmallVec<[(String, String); 4]>,

    /// Layout box (only for rendered elements)
    pub bounds: Option<DomRect>,
}

impl DomNode {
    /// Create a detached node with no children
    pub fn new(node_id: NodeId, node_type: NodeType, node_name: impl Into<String>) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: node_name.into(),
            node_value: String::new(),
            attributes: SmallVec::new(),
            bounds: None,
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Tag comparison ignoring ASCII case (`STRONG` matches `strong`)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    pub fn is_comment(&self) -> bool {
        self.node_type == NodeType::Comment
    }

    /// Nodes that may hold children
    pub fn is_container(&self) -> bool {
        matches!(
            self.node_type,
            NodeType::Element | NodeType::Document | NodeType::DocumentFragment
        )
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let position = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(position).1)
    }
}

/// Elements serialized without an end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_codes() {
        assert_eq!(NodeType::from_u8(1), Some(NodeType::Element));
        assert_eq!(NodeType::from_u8(3), Some(NodeType::Text));
        assert_eq!(NodeType::from_u8(11), Some(NodeType::DocumentFragment));
        assert_eq!(NodeType::from_u8(0), None);
        assert_eq!(NodeType::from_u8(13), None);
    }

    #[test]
    fn test_attributes_keep_order() {
        let mut node = DomNode::new(0, NodeType::Element, "div");
        node.set_attr("id", "a");
        node.set_attr("class", "b");
        node.set_attr("id", "c");

        assert_eq!(node.attr("id"), Some("c"));
        assert_eq!(node.attributes[0].0, "id");
        assert_eq!(node.attributes[1].0, "class");
        assert_eq!(node.remove_attr("id"), Some("c".to_string()));
        assert!(!node.has_attr("id"));
    }

    #[test]
    fn test_has_tag_ignores_case() {
        let node = DomNode::new(0, NodeType::Element, "strong");
        assert!(node.has_tag("STRONG"));
        assert!(!DomNode::new(1, NodeType::Text, "#text").has_tag("#text"));
    }

    #[test]
    fn test_rect_edges() {
        let rect = DomRect::new(0.0, 10.0, 50.0, 20.0);
        assert_eq!(rect.top(), 10.0);
        assert_eq!(rect.bottom(), 30.0);
        assert_eq!(rect.offset(0.0, 5.0).top(), 15.0);
        assert_eq!(rect.offset(3.0, 0.0).x, 3.0);
    }
}
