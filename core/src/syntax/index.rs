use hashbrown::HashMap;

use super::{Node, NodeId, SyntaxError};

/// Lookup tables from node id to node and to parent node.
///
/// Building the index is also where malformed trees (shared ids) are caught.
#[derive(Debug, Default)]
pub struct NodeIndex<'a> {
    nodes: HashMap<NodeId, &'a Node<'a>>,
    parents: HashMap<NodeId, NodeId>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(root: &'a Node<'a>) -> Result<Self, SyntaxError> {
        let mut index = Self::default();
        index.insert(root, None)?;
        Ok(index)
    }

    fn insert(&mut self, node: &'a Node<'a>, parent: Option<NodeId>) -> Result<(), SyntaxError> {
        if self.nodes.insert(node.id, node).is_some() {
            return Err(SyntaxError::DuplicateNodeId(node.id));
        }
        if let Some(parent) = parent {
            self.parents.insert(node.id, parent);
        }
        for child in node.children() {
            self.insert(child, Some(node.id))?;
        }
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&'a Node<'a>> {
        self.nodes.get(&id).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<&'a Node<'a>> {
        self.parents.get(&id).and_then(|parent| self.get(*parent))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
