//! Utility functions for DOM processing

use ahash::AHashSet;

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType};

/// Which attributes [`copy_attributes`] may transfer
///
/// Only names on the allow-list are copied; the deny-list wins over it.
#[derive(Debug, Clone, Default)]
pub struct CopyAttributesOptions {
    pub allowed_attributes: Vec<String>,
    pub forbidden_attributes: Vec<String>,
}

impl CopyAttributesOptions {
    pub fn allow<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_attributes: names.into_iter().map(Into::into).collect(),
            forbidden_attributes: Vec::new(),
        }
    }

    pub fn forbid<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forbidden_attributes
            .extend(names.into_iter().map(Into::into));
        self
    }
}

/// Copy permitted attributes from one element onto another
pub fn copy_attributes(
    arena: &mut DomArena,
    source: NodeId,
    target: NodeId,
    options: &CopyAttributesOptions,
) -> Result<()> {
    let allowed: AHashSet<&str> = options
        .allowed_attributes
        .iter()
        .map(String::as_str)
        .collect();
    let forbidden: AHashSet<&str> = options
        .forbidden_attributes
        .iter()
        .map(String::as_str)
        .collect();

    let copied: Vec<(String, String)> = arena
        .get(source)?
        .attributes
        .iter()
        .filter(|(name, _)| allowed.contains(name.as_str()) && !forbidden.contains(name.as_str()))
        .cloned()
        .collect();

    let target_node = arena.get_mut(target)?;
    if !target_node.is_element() {
        return Err(DomError::InvalidNodeType {
            expected: NodeType::Element.label().to_string(),
            actual: target_node.node_type.label().to_string(),
        });
    }
    for (name, value) in copied {
        target_node.set_attr(name, value);
    }
    Ok(())
}

/// Get all text content from node and its children, in document order
pub fn get_text_content(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let mut text = String::new();

    arena.traverse_df(node_id, |node| {
        if node.node_type == NodeType::Text {
            text.push_str(&node.node_value);
        }
        Ok(())
    })?;

    Ok(text)
}
