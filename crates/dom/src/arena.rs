//! Arena-based document tree storage
//!
//! Every node lives in a single `Vec<DomNode>` and is addressed by its
//! `NodeId`. Identity is the index: two text nodes with the same data are
//! still two different nodes.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! Nodes are never freed. Detaching a node only unlinks it from its parent,
//! so ids stay valid for the lifetime of the arena.

use crate::error::{DomError, Result};
use crate::types::{DomNode, DomRect, NodeId, NodeType};

/// Arena allocator for document nodes
#[derive(Debug, Clone)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly)
    nodes: Vec<DomNode>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Add a node to the arena, returns its ID
    ///
    /// The node arrives detached: its id is reassigned and any parent or
    /// child links are dropped. Use `append_child` to place it.
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        node.parent_id = None;
        node.children_ids.clear();
        self.nodes.push(node);
        node_id
    }

    fn push(&mut self, node_type: NodeType, node_name: &str) -> NodeId {
        self.add_node(DomNode::new(0, node_type, node_name))
    }

    /// Create a detached element; tags are stored lowercase
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeType::Element, &tag.to_ascii_lowercase())
    }

    /// Create a detached text node
    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        let id = self.push(NodeType::Text, NodeType::Text.label());
        self.nodes[id as usize].node_value = data.into();
        id
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        let id = self.push(NodeType::Comment, NodeType::Comment.label());
        self.nodes[id as usize].node_value = data.into();
        id
    }

    /// Create an empty, parentless document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(NodeType::DocumentFragment, NodeType::DocumentFragment.label())
    }

    /// Create an editable block container
    ///
    /// `<div contenteditable="true" data-block="true">` holding a single
    /// empty text node, the shape editors use for one block of content.
    pub fn create_block_element(&mut self) -> NodeId {
        let block = self.create_element("div");
        let node = &mut self.nodes[block as usize];
        node.set_attr("contenteditable", "true");
        node.set_attr("data-block", "true");
        let text = self.create_text("");
        self.link(block, text);
        block
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        // Verify node exists
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Total number of nodes, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all nodes
    pub fn iter(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    /// Iterator over all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| i as NodeId)
    }

    /// Child ids of a node, in document order
    pub fn child_ids(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node_id)?.children_ids)
    }

    /// Get children of a node
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Parent id, only when the parent is an element
    pub fn parent_element(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self
            .parent(node_id)?
            .filter(|parent| parent.is_element())
            .map(|parent| parent.node_id))
    }

    /// Element children in document order
    pub fn element_children(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self
            .children(node_id)?
            .into_iter()
            .filter(|child| child.is_element())
            .map(|child| child.node_id)
            .collect())
    }

    pub fn first_element_child(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.element_children(node_id)?.first().copied())
    }

    pub fn last_element_child(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.element_children(node_id)?.last().copied())
    }

    /// Position of a node among its parent's children
    pub fn index_in_parent(&self, node_id: NodeId) -> Result<Option<usize>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(self
                .get(parent_id)?
                .children_ids
                .iter()
                .position(|&id| id == node_id)),
            None => Ok(None),
        }
    }

    /// Siblings following `node_id`, in document order
    pub fn following_siblings(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.get(node_id)?;
        let Some(parent_id) = node.parent_id else {
            return Ok(Vec::new());
        };
        let siblings = &self.get(parent_id)?.children_ids;
        Ok(siblings
            .iter()
            .skip_while(|&&id| id != node_id)
            .skip(1)
            .copied()
            .collect())
    }

    /// Siblings preceding `node_id`, nearest first
    pub fn preceding_siblings(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.get(node_id)?;
        let Some(parent_id) = node.parent_id else {
            return Ok(Vec::new());
        };
        let siblings = &self.get(parent_id)?.children_ids;
        Ok(siblings
            .iter()
            .rev()
            .skip_while(|&&id| id != node_id)
            .skip(1)
            .copied()
            .collect())
    }

    pub fn next_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.following_siblings(node_id)?.first().copied())
    }

    pub fn previous_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.preceding_siblings(node_id)?.first().copied())
    }

    pub fn next_element_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self
            .following_siblings(node_id)?
            .into_iter()
            .find(|&id| self.nodes[id as usize].is_element()))
    }

    pub fn previous_element_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self
            .preceding_siblings(node_id)?
            .into_iter()
            .find(|&id| self.nodes[id as usize].is_element()))
    }

    /// Inclusive descendant check, same contract as DOM `Node.contains`
    ///
    /// Unknown ids are never contained.
    pub fn contains(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id as usize).and_then(|node| node.parent_id);
        }
        false
    }

    /// Topmost ancestor of a node (the node itself when detached)
    pub fn root_of(&self, node_id: NodeId) -> Result<NodeId> {
        let mut current = node_id;
        while let Some(parent_id) = self.get(current)?.parent_id {
            current = parent_id;
        }
        Ok(current)
    }

    /// Unlink a node from its parent; no-op for detached nodes
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let Some(parent_id) = self.get(node_id)?.parent_id else {
            return Ok(());
        };
        self.get_mut(parent_id)?
            .children_ids
            .retain(|id| *id != node_id);
        self.get_mut(node_id)?.parent_id = None;
        Ok(())
    }

    fn link(&mut self, parent_id: NodeId, child_id: NodeId) {
        self.nodes[child_id as usize].parent_id = Some(parent_id);
        self.nodes[parent_id as usize].children_ids.push(child_id);
    }

    fn check_insert(&self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        let parent = self.get(parent_id)?;
        let child = self.get(child_id)?;
        let hierarchy_error = DomError::HierarchyRequest {
            parent: parent_id,
            child: child_id,
        };
        if !parent.is_container() || child.node_type == NodeType::Document {
            return Err(hierarchy_error);
        }
        if self.contains(child_id, parent_id) {
            return Err(hierarchy_error);
        }
        Ok(())
    }

    /// Append a child, moving it out of its previous parent
    ///
    /// Appending a document fragment moves the fragment's children instead,
    /// leaving the fragment empty.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        self.check_insert(parent_id, child_id)?;
        if self.get(child_id)?.node_type == NodeType::DocumentFragment {
            return self.move_children(child_id, parent_id);
        }
        self.detach(child_id)?;
        self.link(parent_id, child_id);
        Ok(())
    }

    /// Insert `child_id` before `reference` (append when `None`)
    pub fn insert_before(
        &mut self,
        parent_id: NodeId,
        child_id: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        let Some(reference) = reference else {
            return self.append_child(parent_id, child_id);
        };
        if reference == child_id {
            return Ok(());
        }
        self.check_insert(parent_id, child_id)?;
        if self.get(reference)?.parent_id != Some(parent_id) {
            return Err(DomError::NodeNotFound(reference));
        }

        let incoming: Vec<NodeId> =
            if self.get(child_id)?.node_type == NodeType::DocumentFragment {
                self.get(child_id)?.children_ids.to_vec()
            } else {
                vec![child_id]
            };

        for id in incoming {
            self.detach(id)?;
            let siblings = &mut self.get_mut(parent_id)?.children_ids;
            let position = siblings
                .iter()
                .position(|&sibling| sibling == reference)
                .ok_or(DomError::NodeNotFound(reference))?;
            siblings.insert(position, id);
            self.get_mut(id)?.parent_id = Some(parent_id);
        }
        Ok(())
    }

    /// Move every child of `from` to the end of `to`, preserving order
    pub fn move_children(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        let children = self.get(from)?.children_ids.to_vec();
        for child_id in children {
            self.append_child(to, child_id)?;
        }
        Ok(())
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if !node.is_element() {
            return Err(DomError::InvalidNodeType {
                expected: NodeType::Element.label().to_string(),
                actual: node.node_type.label().to_string(),
            });
        }
        node.set_attr(name, value);
        Ok(())
    }

    /// Record the layout box of a node
    pub fn set_bounds(&mut self, node_id: NodeId, bounds: DomRect) -> Result<()> {
        self.get_mut(node_id)?.bounds = Some(bounds);
        Ok(())
    }

    /// Copy kind, name, data, attributes and bounds; no children, no parent
    pub fn clone_shallow(&mut self, node_id: NodeId) -> Result<NodeId> {
        let source = self.get(node_id)?;
        let mut copy = DomNode::new(0, source.node_type, source.node_name.clone());
        copy.node_value = source.node_value.clone();
        copy.attributes = source.attributes.clone();
        copy.bounds = source.bounds;
        Ok(self.add_node(copy))
    }

    /// Copy a whole subtree (iterative, no recursion)
    pub fn clone_deep(&mut self, node_id: NodeId) -> Result<NodeId> {
        let root = self.clone_shallow(node_id)?;
        let mut stack = vec![(node_id, root)];

        while let Some((source_id, copy_id)) = stack.pop() {
            let children = self.get(source_id)?.children_ids.to_vec();
            for child_id in children {
                let child_copy = self.clone_shallow(child_id)?;
                self.link(copy_id, child_copy);
                stack.push((child_id, child_copy));
            }
        }

        Ok(root)
    }

    /// Pre-order descendants of `node_id`, the node itself excluded
    pub fn descendants(&self, node_id: NodeId) -> Descendants<'_> {
        let stack: Vec<NodeId> = self
            .nodes
            .get(node_id as usize)
            .map(|node| node.children_ids.iter().rev().copied().collect())
            .unwrap_or_default();
        Descendants { arena: self, stack }
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Find nodes matching predicate, detached nodes included
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes
            .iter()
            .filter(|node| predicate(node))
            .map(|node| node.node_id)
            .collect()
    }

    /// Find first node matching predicate
    pub fn find_one<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.nodes
            .iter()
            .find(|node| predicate(node))
            .map(|node| node.node_id)
    }

    /// Find all elements by tag name
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|node| node.has_tag(tag))
    }

    /// Find element by ID attribute
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_one(|node| node.is_element() && node.attr("id") == Some(id))
    }

    /// Clear arena (reuse allocation)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root_id = None;
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`DomArena::descendants`]
pub struct Descendants<'a> {
    arena: &'a DomArena,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node_id = self.stack.pop()?;
        if let Some(node) = self.arena.nodes.get(node_id as usize) {
            self.stack.extend(node.children_ids.iter().rev().copied());
        }
        Some(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(arena: &mut DomArena) -> (NodeId, NodeId, NodeId) {
        // <p><b>bold</b>tail</p>
        let p = arena.create_element("P");
        let b = arena.create_element("b");
        let bold = arena.create_text("bold");
        let tail = arena.create_text("tail");
        arena.append_child(p, b).unwrap();
        arena.append_child(b, bold).unwrap();
        arena.append_child(p, tail).unwrap();
        (p, b, tail)
    }

    #[test]
    fn test_arena_basic() {
        let mut arena = DomArena::new();
        let id = arena.create_element("DIV");
        assert_eq!(id, 0);

        let retrieved = arena.get(id).unwrap();
        assert_eq!(retrieved.node_name, "div");
        assert!(matches!(arena.get(42), Err(DomError::NodeNotFound(42))));
    }

    #[test]
    fn test_append_moves_node() {
        let mut arena = DomArena::new();
        let (p, b, tail) = paragraph(&mut arena);

        arena.append_child(b, tail).unwrap();

        assert_eq!(arena.child_ids(p).unwrap(), &[b]);
        assert_eq!(arena.child_ids(b).unwrap().len(), 2);
        assert_eq!(arena.get(tail).unwrap().parent_id, Some(b));
    }

    #[test]
    fn test_append_rejects_cycles_and_text_parents() {
        let mut arena = DomArena::new();
        let (p, b, tail) = paragraph(&mut arena);

        assert!(matches!(
            arena.append_child(b, p),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            arena.append_child(p, p),
            Err(DomError::HierarchyRequest { .. })
        ));
        let extra = arena.create_text("x");
        assert!(matches!(
            arena.append_child(tail, extra),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_append_fragment_moves_children() {
        let mut arena = DomArena::new();
        let fragment = arena.create_fragment();
        let a = arena.create_text("a");
        let b = arena.create_text("b");
        arena.append_child(fragment, a).unwrap();
        arena.append_child(fragment, b).unwrap();

        let div = arena.create_element("div");
        arena.append_child(div, fragment).unwrap();

        assert_eq!(arena.child_ids(div).unwrap(), &[a, b]);
        assert!(arena.child_ids(fragment).unwrap().is_empty());
    }

    #[test]
    fn test_insert_before() {
        let mut arena = DomArena::new();
        let (p, b, tail) = paragraph(&mut arena);
        let head = arena.create_text("head");

        arena.insert_before(p, head, Some(b)).unwrap();
        assert_eq!(arena.child_ids(p).unwrap(), &[head, b, tail]);

        arena.insert_before(p, tail, Some(head)).unwrap();
        assert_eq!(arena.child_ids(p).unwrap(), &[tail, head, b]);

        let stranger = arena.create_text("x");
        assert!(arena.insert_before(p, stranger, Some(stranger + 100)).is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let mut arena = DomArena::new();
        let (p, b, tail) = paragraph(&mut arena);

        assert!(arena.contains(p, p));
        assert!(arena.contains(p, tail));
        assert!(!arena.contains(b, tail));
        assert!(!arena.contains(p, 999));
    }

    #[test]
    fn test_clone_shallow_and_deep() {
        let mut arena = DomArena::new();
        let (p, b, _) = paragraph(&mut arena);
        arena.set_attribute(b, "class", "x").unwrap();

        let shallow = arena.clone_shallow(b).unwrap();
        assert_ne!(shallow, b);
        assert_eq!(arena.get(shallow).unwrap().attr("class"), Some("x"));
        assert!(arena.child_ids(shallow).unwrap().is_empty());
        assert_eq!(arena.get(shallow).unwrap().parent_id, None);

        let deep = arena.clone_deep(p).unwrap();
        let names: Vec<_> = arena
            .descendants(deep)
            .map(|id| arena.get(id).unwrap().node_name.clone())
            .collect();
        assert_eq!(names, vec!["b", "#text", "#text"]);
        assert!(arena.descendants(deep).all(|id| !arena.contains(p, id)));
    }

    #[test]
    fn test_sibling_navigation() {
        let mut arena = DomArena::new();
        let (p, b, tail) = paragraph(&mut arena);
        let i = arena.create_element("i");
        arena.append_child(p, i).unwrap();

        assert_eq!(arena.next_sibling(b).unwrap(), Some(tail));
        assert_eq!(arena.next_element_sibling(b).unwrap(), Some(i));
        assert_eq!(arena.previous_element_sibling(i).unwrap(), Some(b));
        assert_eq!(arena.previous_sibling(b).unwrap(), None);
        assert_eq!(arena.index_in_parent(i).unwrap(), Some(2));
        assert_eq!(arena.first_element_child(p).unwrap(), Some(b));
        assert_eq!(arena.last_element_child(p).unwrap(), Some(i));
    }

    #[test]
    fn test_traverse_df() {
        let mut arena = DomArena::new();
        let (p, _, _) = paragraph(&mut arena);

        let mut visited = Vec::new();
        arena
            .traverse_df(p, |node| {
                visited.push(node.node_name.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec!["p", "b", "#text", "#text"]);
    }

    #[test]
    fn test_find_by_tag_and_id() {
        let mut arena = DomArena::new();
        let (_, b, _) = paragraph(&mut arena);
        arena.set_attribute(b, "id", "target").unwrap();

        assert_eq!(arena.find_by_tag("B"), vec![b]);
        assert_eq!(arena.find_by_id("target"), Some(b));
    }

    #[test]
    fn test_block_element_shape() {
        let mut arena = DomArena::new();
        let block = arena.create_block_element();
        let node = arena.get(block).unwrap();

        assert_eq!(node.attr("contenteditable"), Some("true"));
        assert_eq!(node.attr("data-block"), Some("true"));
        assert_eq!(node.children_ids.len(), 1);
    }
}
