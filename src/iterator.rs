use std::collections::VecDeque;
use std::ops::Deref;

use crate::node::Node;
use crate::NodeDepth;

/// A node yielded during traversal, tagged with its depth relative to the
/// node the traversal started from.
pub struct IterNode<V> {
    depth: NodeDepth,
    node: Node<V>,
}

impl<V> IterNode<V> {
    pub fn depth(&self) -> NodeDepth {
        self.depth
    }

    pub fn node(&self) -> &Node<V> {
        &self.node
    }

    pub fn into_node(self) -> Node<V> {
        self.node
    }
}

impl<V> Deref for IterNode<V> {
    type Target = Node<V>;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

/// Depth-first pre-order iterator over a subtree, starting at the node it
/// was created from.
pub struct NodeIter<V> {
    stack: VecDeque<(NodeDepth, Node<V>)>,
}

impl<V> NodeIter<V> {
    pub fn new(node: Node<V>) -> Self {
        Self {
            stack: VecDeque::from([(0, node)]),
        }
    }
}

impl<V> Iterator for NodeIter<V> {
    type Item = IterNode<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop_front()?;

        // Children are pushed in reverse, so the leftmost child surfaces
        // first and pre-order falls out of the front stack.
        for child in node.children().into_iter().rev() {
            self.stack.push_front((depth + 1, child));
        }

        Some(IterNode { depth, node })
    }
}

impl<'a, V> IntoIterator for &'a Node<V> {
    type Item = IterNode<V>;
    type IntoIter = NodeIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        NodeIter::new(self.clone())
    }
}

impl<V> Node<V> {
    /// Pre-order iterator over this node and every descendant.
    pub fn iter(&self) -> NodeIter<V> {
        NodeIter::new(self.clone())
    }

    /// Calls a closure on every node of the subtree in pre-order, with the
    /// depth relative to this node. Stops at the first error.
    pub fn for_each<E, F>(&self, f: F) -> Result<(), E>
    where
        F: Fn(NodeDepth, Node<V>) -> Result<(), E>,
    {
        for item in self.iter() {
            f(item.depth, item.node)?;
        }
        Ok(())
    }
}
