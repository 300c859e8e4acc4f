//! DOM Service - builds arena trees from JSON node descriptions
//!
//! Input uses the DOM JSON node shape reported by the DevTools protocol:
//!
//! ```json
//! {
//!   "root": {
//!     "nodeType": 1,
//!     "nodeName": "DIV",
//!     "attributes": ["data-block", "true"],
//!     "bounds": { "x": 0, "y": 0, "width": 100, "height": 20 },
//!     "children": [{ "nodeType": 3, "nodeName": "#text", "nodeValue": "hi" }]
//!   }
//! }
//! ```
//!
//! The `root` wrapper is optional. Element names are stored lowercase.

use serde_json::Value;

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::*;

/// Configuration for DOM service
#[derive(Debug, Clone)]
pub struct DomServiceConfig {
    /// Deepest nesting accepted before loading fails
    pub max_depth: usize,
}

impl Default for DomServiceConfig {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

/// Main DOM service
pub struct DomService {
    config: DomServiceConfig,
    arena: DomArena,
}

impl DomService {
    /// Create new DOM service with default config
    pub fn new() -> Self {
        Self::with_config(DomServiceConfig::default())
    }

    pub fn with_config(config: DomServiceConfig) -> Self {
        Self {
            config,
            arena: DomArena::new(),
        }
    }

    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut DomArena {
        &mut self.arena
    }

    /// Take ownership of the loaded arena
    pub fn into_arena(self) -> DomArena {
        self.arena
    }

    /// Parse a JSON tree and make it the arena root
    ///
    /// Any previously loaded tree is discarded.
    pub fn parse_tree(&mut self, json: &Value) -> Result<NodeId> {
        let root = match json.get("root") {
            Some(root) => root,
            None if json.get("nodeType").is_some() => json,
            None => {
                return Err(DomError::InvalidTree(
                    "missing 'root' node".to_string(),
                ))
            }
        };

        self.arena.clear();
        let root_id = self.parse_node(root, 0)?;
        self.arena.set_root(root_id)?;

        tracing::debug!(
            root = root_id,
            nodes = self.arena.len(),
            "loaded tree"
        );
        Ok(root_id)
    }

    /// Recursively parse a node and its children
    fn parse_node(&mut self, json: &Value, depth: usize) -> Result<NodeId> {
        if depth > self.config.max_depth {
            return Err(DomError::MaxDepthExceeded {
                current: depth,
                max: self.config.max_depth,
            });
        }

        let node_type_val = json["nodeType"]
            .as_u64()
            .ok_or_else(|| DomError::InvalidNodeType {
                expected: "numeric nodeType".to_string(),
                actual: json["nodeType"].to_string(),
            })?;
        let node_type = u8::try_from(node_type_val)
            .ok()
            .and_then(NodeType::from_u8)
            .ok_or_else(|| DomError::InvalidNodeType {
                expected: "valid NodeType".to_string(),
                actual: node_type_val.to_string(),
            })?;

        let node_name = json["nodeName"].as_str().unwrap_or("");
        let node_name = if node_type == NodeType::Element {
            node_name.to_ascii_lowercase()
        } else {
            node_name.to_string()
        };

        let mut node = DomNode::new(0, node_type, node_name);
        node.node_value = json["nodeValue"].as_str().unwrap_or("").to_string();

        // Attributes arrive flattened: [name, value, name, value, ...]
        if let Some(attrs) = json["attributes"].as_array() {
            for pair in attrs.chunks_exact(2) {
                if let (Some(name), Some(value)) = (pair[0].as_str(), pair[1].as_str()) {
                    node.set_attr(name, value);
                }
            }
        }

        if let Some(bounds) = json.get("bounds").filter(|value| !value.is_null()) {
            node.bounds = Some(serde_json::from_value(bounds.clone())?);
        }

        let current_node_id = self.arena.add_node(node);

        if let Some(children) = json["children"].as_array() {
            for child in children {
                let child_id = self.parse_node(child, depth + 1)?;
                self.arena.append_child(current_node_id, child_id)?;
            }
        }

        Ok(current_node_id)
    }
}

impl Default for DomService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::DomSerializer;

    #[test]
    fn test_parse_simple_tree() {
        let json = serde_json::json!({
            "root": {
                "nodeType": 1,
                "nodeName": "DIV",
                "attributes": ["data-block", "true", "class"],
                "bounds": { "x": 0.0, "y": 10.0, "width": 100.0, "height": 20.0 },
                "children": [
                    { "nodeType": 3, "nodeName": "#text", "nodeValue": "Hello " },
                    {
                        "nodeType": 1,
                        "nodeName": "STRONG",
                        "children": [{ "nodeType": 3, "nodeName": "#text", "nodeValue": "world" }]
                    },
                    { "nodeType": 8, "nodeName": "#comment", "nodeValue": "c" }
                ]
            }
        });

        let mut service = DomService::new();
        let root_id = service.parse_tree(&json).unwrap();
        let arena = service.arena();

        assert_eq!(arena.root_id(), Some(root_id));
        assert_eq!(arena.len(), 5);

        let root = arena.get(root_id).unwrap();
        assert_eq!(root.attr("data-block"), Some("true"));
        assert!(!root.has_attr("class"));
        assert_eq!(root.bounds.map(|rect| rect.bottom()), Some(30.0));
        assert_eq!(
            DomSerializer::new().outer_html(arena, root_id).unwrap(),
            "<div data-block=\"true\">Hello <strong>world</strong><!--c--></div>"
        );
    }

    #[test]
    fn test_bare_node_without_wrapper() {
        let json = serde_json::json!({ "nodeType": 11, "nodeName": "#document-fragment" });

        let mut service = DomService::new();
        let root_id = service.parse_tree(&json).unwrap();
        assert_eq!(
            service.arena().get(root_id).unwrap().node_type,
            NodeType::DocumentFragment
        );
    }

    #[test]
    fn test_invalid_input() {
        let mut service = DomService::new();

        assert!(matches!(
            service.parse_tree(&serde_json::json!({ "nodes": [] })),
            Err(DomError::InvalidTree(_))
        ));
        assert!(matches!(
            service.parse_tree(&serde_json::json!({ "root": { "nodeName": "DIV" } })),
            Err(DomError::InvalidNodeType { .. })
        ));
        assert!(matches!(
            service.parse_tree(&serde_json::json!({ "root": { "nodeType": 42 } })),
            Err(DomError::InvalidNodeType { .. })
        ));
        assert!(matches!(
            service.parse_tree(&serde_json::json!({
                "root": { "nodeType": 1, "nodeName": "DIV", "bounds": { "x": "left" } }
            })),
            Err(DomError::ParseError(_))
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut json = serde_json::json!({ "nodeType": 3, "nodeName": "#text", "nodeValue": "x" });
        for _ in 0..4 {
            json = serde_json::json!({ "nodeType": 1, "nodeName": "SPAN", "children": [json] });
        }

        let mut service = DomService::with_config(DomServiceConfig { max_depth: 2 });
        assert!(matches!(
            service.parse_tree(&json),
            Err(DomError::MaxDepthExceeded { max: 2, .. })
        ));

        let mut service = DomService::new();
        assert!(service.parse_tree(&json).is_ok());
    }
}
