//! Recursive search and subtree flattening.

use tracing::debug;

use crate::error::TreeError;
use crate::name::NodeName;
use crate::node::Node;

/// Search criteria for [`Node::search_for`].
///
/// A node matches if any supplied criterion matches. Per node the criteria
/// are tried in the order name, value, predicate, and the first hit wins.
pub struct Criteria<'a, V> {
    name: Option<String>,
    value: Option<Box<dyn Fn(&V) -> bool + 'a>>,
    predicate: Option<Box<dyn Fn(&Node<V>) -> bool + 'a>>,
}

impl<V> Default for Criteria<'_, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V> Criteria<'a, V> {
    pub fn new() -> Self {
        Self {
            name: None,
            value: None,
            predicate: None,
        }
    }

    /// Matches nodes by exact name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Matches nodes whose payload equals `value`.
    pub fn value(mut self, value: &'a V) -> Self
    where
        V: PartialEq,
    {
        self.value = Some(Box::new(move |candidate| candidate == value));
        self
    }

    /// Matches nodes the closure returns true for.
    pub fn predicate(mut self, predicate: impl Fn(&Node<V>) -> bool + 'a) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.value.is_none() && self.predicate.is_none()
    }

    fn matches(&self, node: &Node<V>) -> bool {
        if let Some(name) = &self.name {
            if node.name() == name.as_str() {
                return true;
            }
        }
        if let Some(check) = &self.value {
            if node.with_value(|value| check(value)) {
                return true;
            }
        }
        if let Some(predicate) = &self.predicate {
            if predicate(node) {
                return true;
            }
        }
        false
    }
}

impl<V> std::fmt::Debug for Criteria<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Criteria")
            .field("name", &self.name)
            .field("value", &self.value.is_some())
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl<V> Node<V> {
    /// Finds the first node in this subtree matching any of the criteria.
    ///
    /// Traversal is depth-first pre-order and starts at this node, so the
    /// node searched from is itself eligible. At least one criterion must be
    /// supplied, and a name criterion must be a valid node name.
    pub fn search_for(&self, criteria: Criteria<'_, V>) -> Result<Option<Node<V>>, TreeError> {
        if criteria.is_empty() {
            return Err(TreeError::NoCriteria);
        }
        if let Some(name) = criteria.name.as_deref() {
            NodeName::validate(name)?;
        }

        for item in self.iter() {
            if criteria.matches(item.node()) {
                debug!("Search matched {}", item.node().name());
                return Ok(Some(item.into_node()));
            }
        }

        Ok(None)
    }

    /// Flattens every strict descendant of this node into a sequence.
    ///
    /// The node itself is not included. Order is the reverse of a
    /// left-to-right post-order walk, a bottom-up flattening that is
    /// deterministic for a given tree shape.
    pub fn collect(&self) -> Vec<Node<V>> {
        let mut stack: Vec<(Node<V>, bool)> = self
            .children()
            .into_iter()
            .rev()
            .map(|child| (child, false))
            .collect();
        let mut flat = Vec::new();

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                flat.push(node);
                continue;
            }
            stack.push((node.clone(), true));
            for child in node.children().into_iter().rev() {
                stack.push((child, false));
            }
        }

        flat.reverse();
        flat
    }
}
