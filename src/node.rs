//! Core node type.
//!
//! A [`Node`] is simultaneously one labeled vertex and the storage unit of the
//! whole tree. There is no separate tree container. Any node can act as a
//! root, children are owned by their parent, and the parent link is a weak
//! back-reference so dropping the last external handle to a root releases the
//! entire subtree.

use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::TreeError;
use crate::name::NodeName;
use crate::{NodeDepth, NodeIndex};

/// Shared handle to a single tree node.
///
/// Cloning a `Node` clones the handle, not the subtree. All structural state
/// lives behind interior mutability, so mutators take `&self` and handles
/// held across an `add` or `remove` observe the change.
pub struct Node<V> {
    inner: Rc<RefCell<NodeInner<V>>>,
}

pub(crate) struct NodeInner<V> {
    name: NodeName,
    value: V,
    capacity: Option<NonZeroUsize>,

    /// Tier the node was attached at. Zero until first attached.
    tier: NodeDepth,

    /// Index within the parent's child list, doubling as the sibling cursor.
    position: NodeIndex,

    parent: Option<Weak<RefCell<NodeInner<V>>>>,
    children: Vec<Node<V>>,

    /// Name to child index map, kept in lockstep with `children`.
    index: HashMap<String, NodeIndex>,
}

impl<V> Clone for Node<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V> Node<V> {
    /// Creates a standalone node on tier 0 with no parent and no children.
    ///
    /// The name must be non-empty, alphanumeric, and must not start with a
    /// digit. A capacity of `Some(0)` is rejected; `None` means unbounded.
    pub fn new(
        name: impl Into<String>,
        value: V,
        capacity: Option<usize>,
    ) -> Result<Self, TreeError> {
        let name = NodeName::new(name)?;
        let capacity = match capacity {
            None => None,
            Some(cap) => Some(NonZeroUsize::new(cap).ok_or(TreeError::InvalidCapacity)?),
        };

        debug!("Created node {}", name);

        Ok(Self::from_parts(name, value, capacity, 0))
    }

    pub(crate) fn from_parts(
        name: NodeName,
        value: V,
        capacity: Option<NonZeroUsize>,
        tier: NodeDepth,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeInner {
                name,
                value,
                capacity,
                tier,
                position: 0,
                parent: None,
                children: Vec::new(),
                index: HashMap::new(),
            })),
        }
    }

    pub fn name(&self) -> NodeName {
        self.inner.borrow().name.clone()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.inner.borrow().capacity.map(NonZeroUsize::get)
    }

    pub fn tier(&self) -> NodeDepth {
        self.inner.borrow().tier
    }

    /// Current index within the parent's child list. Also the sibling cursor
    /// moved by [`Node::left`] and [`Node::right`].
    pub fn position(&self) -> NodeIndex {
        self.inner.borrow().position
    }

    pub(crate) fn set_position(&self, position: NodeIndex) {
        self.inner.borrow_mut().position = position;
    }

    pub fn parent(&self) -> Option<Node<V>> {
        let weak = self.inner.borrow().parent.clone()?;
        weak.upgrade().map(|inner| Node { inner })
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.inner.borrow().children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Snapshot of the child handles in sibling order.
    pub fn children(&self) -> Vec<Node<V>> {
        self.inner.borrow().children.clone()
    }

    /// Looks up a direct child by name.
    pub fn get(&self, name: &str) -> Option<Node<V>> {
        let inner = self.inner.borrow();
        inner.index.get(name).map(|&at| inner.children[at].clone())
    }

    /// The parent's other children, in sibling order. Always derived from the
    /// parent's live child list, never cached.
    pub fn siblings(&self) -> Vec<Node<V>> {
        match self.parent() {
            Some(parent) => parent
                .children()
                .into_iter()
                .filter(|child| !child.ptr_eq(self))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether two handles point at the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Borrows the payload for the duration of a closure.
    pub fn with_value<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Mutably borrows the payload for the duration of a closure.
    pub fn with_value_mut<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.inner.borrow_mut().value)
    }

    pub fn value(&self) -> V
    where
        V: Clone,
    {
        self.inner.borrow().value.clone()
    }

    /// Attaches a batch of children to this node.
    ///
    /// The whole batch is checked against the capacity first; a batch that
    /// does not fit is rejected before anything is attached. Each child is
    /// then validated and attached in order: it must not sit on this node's
    /// root path, its tier must be strictly above this node's unless it has
    /// never been attached, and its name must not collide with a current
    /// child. A child that is still attached elsewhere is detached from its
    /// old parent as part of the move.
    ///
    /// A failure partway through the batch leaves the children attached so
    /// far in place.
    ///
    /// Returns `&self` so calls can be chained.
    pub fn add(&self, children: impl IntoIterator<Item = Node<V>>) -> Result<&Self, TreeError> {
        let batch: Vec<Node<V>> = children.into_iter().collect();

        if let Some(capacity) = self.capacity() {
            let have = self.child_count();
            let total = have + batch.len();
            if total > capacity {
                return Err(TreeError::CapacityExceeded {
                    capacity,
                    remaining: capacity - have,
                    requested: batch.len(),
                    overflow: total - capacity,
                });
            }
        }

        for child in batch {
            self.attach(child)?;
        }

        Ok(self)
    }

    fn attach(&self, child: Node<V>) -> Result<(), TreeError> {
        let name = child.name();

        // A node on this node's root path (including this node itself) can
        // never become a child here without closing a cycle.
        if self.root_path_contains(&child) {
            return Err(TreeError::CircularAttachment {
                name: name.to_string(),
            });
        }

        let parent_tier = self.tier();
        let child_tier = child.tier();

        // Tier 0 marks a node that has never been attached. Anything else
        // must currently sit strictly above the target.
        if child_tier > 0 && child_tier >= parent_tier {
            return Err(TreeError::InvalidAttachment {
                name: name.to_string(),
                child_tier,
                parent_tier,
            });
        }

        if self.inner.borrow().index.contains_key(name.as_str()) {
            return Err(TreeError::DuplicateName {
                name: name.to_string(),
            });
        }

        // Children are exclusively owned, so a move detaches first.
        if let Some(old_parent) = child.parent() {
            old_parent.remove([&child]);
        }

        let position = {
            let mut inner = self.inner.borrow_mut();
            let position = inner.children.len();
            inner.index.insert(name.to_string(), position);
            inner.children.push(child.clone());
            position
        };

        {
            let mut child_inner = child.inner.borrow_mut();
            child_inner.parent = Some(Rc::downgrade(&self.inner));
            child_inner.tier = parent_tier + 1;
            child_inner.position = position;
        }

        debug!(
            "Attached {} to {} at position {}",
            name,
            self.name(),
            position
        );

        Ok(())
    }

    /// Detaches a batch of children from this node.
    ///
    /// Nodes that are not current children are silently skipped. A detached
    /// node keeps its own subtree and tier; its parent link is cleared and
    /// its cursor resets to 0. The remaining children's positions and the
    /// name index are recomputed.
    ///
    /// Returns `&self` so calls can be chained.
    pub fn remove<'a>(&self, children: impl IntoIterator<Item = &'a Node<V>>) -> &Self
    where
        V: 'a,
    {
        for child in children {
            self.detach(child);
        }
        self
    }

    fn detach(&self, child: &Node<V>) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;

        let at = match inner.children.iter().position(|c| c.ptr_eq(child)) {
            Some(at) => at,
            None => return,
        };

        let removed = inner.children.remove(at);
        inner.index.remove(removed.name().as_str());

        // Every child after the removal point shifted down one slot.
        for (position, shifted) in inner.children.iter().enumerate().skip(at) {
            inner.index.insert(shifted.name().to_string(), position);
            shifted.set_position(position);
        }

        drop(guard);

        {
            let mut removed_inner = removed.inner.borrow_mut();
            removed_inner.parent = None;
            removed_inner.position = 0;
        }

        debug!("Detached {} from {}", removed.name(), self.name());
    }

    /// Relinks a restored child below this node, keeping the tier the child
    /// was decoded with.
    pub(crate) fn adopt(&self, child: Node<V>) -> Result<(), TreeError> {
        let name = child.name();

        if self.inner.borrow().index.contains_key(name.as_str()) {
            return Err(TreeError::DuplicateName {
                name: name.to_string(),
            });
        }

        let position = {
            let mut inner = self.inner.borrow_mut();
            let position = inner.children.len();
            inner.index.insert(name.to_string(), position);
            inner.children.push(child.clone());
            position
        };

        let mut child_inner = child.inner.borrow_mut();
        child_inner.parent = Some(Rc::downgrade(&self.inner));
        child_inner.position = position;

        Ok(())
    }

    /// Whether `node` is this node or one of its ancestors.
    fn root_path_contains(&self, node: &Node<V>) -> bool {
        let mut current = self.clone();
        loop {
            if current.ptr_eq(node) {
                return true;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}
