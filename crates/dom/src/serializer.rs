//! HTML serializer
//!
//! Produces the same markup a browser reports through `innerHTML` and
//! `outerHTML`: escaped text and attribute values, void elements without end
//! tags, comments verbatim. Output is deterministic because attributes keep
//! their insertion order.

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::*;

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// Emit comment nodes (`<!--data-->`)
    pub include_comments: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            include_comments: true,
        }
    }
}

/// Document tree serializer
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Markup of a node's children
    pub fn inner_html(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::new();
        for &child_id in &arena.get(node_id)?.children_ids {
            self.serialize_node(arena, child_id, &mut output)?;
        }
        Ok(output)
    }

    /// Markup of a node including itself
    pub fn outer_html(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::new();
        self.serialize_node(arena, node_id, &mut output)?;
        Ok(output)
    }

    /// Serialize a node and its subtree (iterative, no recursion)
    ///
    /// Depth is bounded only by memory, so any tree the arena holds can be
    /// written out.
    pub fn serialize_node(
        &self,
        arena: &DomArena,
        node_id: NodeId,
        output: &mut String,
    ) -> Result<()> {
        let mut stack = vec![Frame::Open(node_id)];

        while let Some(frame) = stack.pop() {
            let node_id = match frame {
                Frame::Open(node_id) => node_id,
                Frame::Close(tag) => {
                    output.push_str("</");
                    output.push_str(tag);
                    output.push('>');
                    continue;
                }
            };
            let node = arena.get(node_id)?;

            match node.node_type {
                NodeType::Element => {
                    output.push('<');
                    output.push_str(&node.node_name);
                    for (name, value) in &node.attributes {
                        output.push(' ');
                        output.push_str(name);
                        output.push_str("=\"");
                        escape_into(output, value, true);
                        output.push('"');
                    }
                    output.push('>');

                    if VOID_ELEMENTS.contains(&node.node_name.as_str()) {
                        continue;
                    }

                    stack.push(Frame::Close(&node.node_name));
                    push_children(&mut stack, node);
                }
                NodeType::Text => escape_into(output, &node.node_value, false),
                NodeType::CdataSection => {
                    output.push_str("<![CDATA[");
                    output.push_str(&node.node_value);
                    output.push_str("]]>");
                }
                NodeType::Comment => {
                    if self.config.include_comments {
                        output.push_str("<!--");
                        output.push_str(&node.node_value);
                        output.push_str("-->");
                    }
                }
                NodeType::Document | NodeType::DocumentFragment => {
                    push_children(&mut stack, node);
                }
                _ => {
                    // Nothing renders for the remaining node kinds
                }
            }
        }

        Ok(())
    }
}

/// Pending work for [`DomSerializer::serialize_node`]
enum Frame<'a> {
    Open(NodeId),
    Close(&'a str),
}

/// Children in reverse so they pop in document order
fn push_children<'a>(stack: &mut Vec<Frame<'a>>, node: &'a DomNode) {
    stack.extend(node.children_ids.iter().rev().map(|&child_id| Frame::Open(child_id)));
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// `innerHTML` of a fragment with the default configuration
pub fn fragment_to_string(arena: &DomArena, fragment: NodeId) -> Result<String> {
    DomSerializer::new().inner_html(arena, fragment)
}

fn escape_into(output: &mut String, value: &str, attribute: bool) {
    for ch in value.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' if attribute => output.push_str("&quot;"),
            '<' if !attribute => output.push_str("&lt;"),
            '>' if !attribute => output.push_str("&gt;"),
            _ => output.push(ch),
        }
    }
}
