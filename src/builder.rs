//! A module providing builders for constructing trees.
//!
//! The `TreeBuilder` and `NodeBuilder` types grow a tree through nested
//! closures, one closure per node, so the source layout mirrors the tree
//! shape. Closures return `Result<(), E>` for a caller-chosen error type
//! `E: From<TreeError>`, letting both tree errors and caller errors
//! propagate out of the build.

use std::marker::PhantomData;

use tracing::{debug, debug_span};

use crate::error::TreeError;
use crate::node::Node;

/// A builder for attaching children to one node.
///
/// Handed to the closures of [`TreeBuilder::root`] and [`NodeBuilder::child`];
/// not constructed directly.
pub struct NodeBuilder<'a, V, E = TreeError> {
    node: &'a Node<V>,
    _phantom: PhantomData<E>,
}

impl<'a, V, E> NodeBuilder<'a, V, E>
where
    E: From<TreeError>,
{
    fn new(node: &'a Node<V>) -> Self {
        Self {
            node,
            _phantom: PhantomData,
        }
    }

    /// Adds an unbounded child and descends into it.
    pub fn child<F>(&mut self, name: impl Into<String>, value: V, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut NodeBuilder<'_, V, E>) -> Result<(), E>,
    {
        self.grow(name, value, None, f)
    }

    /// Adds a child with a capacity bound and descends into it.
    pub fn child_capped<F>(
        &mut self,
        name: impl Into<String>,
        value: V,
        capacity: usize,
        f: F,
    ) -> Result<(), E>
    where
        F: FnOnce(&mut NodeBuilder<'_, V, E>) -> Result<(), E>,
    {
        self.grow(name, value, Some(capacity), f)
    }

    fn grow<F>(
        &mut self,
        name: impl Into<String>,
        value: V,
        capacity: Option<usize>,
        f: F,
    ) -> Result<(), E>
    where
        F: FnOnce(&mut NodeBuilder<'_, V, E>) -> Result<(), E>,
    {
        let child = Node::new(name, value, capacity).map_err(E::from)?;
        self.node.add([child.clone()]).map_err(E::from)?;

        // Call the supplied closure with a builder for the child's children
        let mut builder = NodeBuilder::new(&child);
        f(&mut builder)?;

        Ok(())
    }

    /// The node this builder attaches children to.
    pub fn node(&self) -> &Node<V> {
        self.node
    }
}

/// A builder for constructing whole trees.
///
/// # Examples
///
/// ```
/// use tilia::TreeBuilder;
///
/// let root = TreeBuilder::<&str>::new()
///     .root("root", "top", |root| {
///         root.child("a", "left", |a| a.child("a1", "leaf", |_| Ok(())))?;
///         root.child("b", "right", |_| Ok(()))
///     })
///     .unwrap()
///     .done()
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(root.child_count(), 2);
/// ```
#[derive(Debug)]
pub struct TreeBuilder<V, E = TreeError> {
    root: Option<Node<V>>,
    debug_span: tracing::Span,
    _phantom: PhantomData<E>,
}

impl<V, E> TreeBuilder<V, E>
where
    E: From<TreeError>,
{
    /// Creates a new `TreeBuilder` instance.
    pub fn new() -> Self {
        let debug_span = debug_span!("TreeBuilder");
        let _debug = debug_span.enter();
        debug!("Created new TreeBuilder");
        drop(_debug);

        Self {
            root: None,
            debug_span,
            _phantom: PhantomData,
        }
    }

    /// Adds an unbounded root node and returns the updated builder.
    ///
    /// Panics if a root was already added.
    pub fn root<F>(self, name: impl Into<String>, value: V, f: F) -> Result<Self, E>
    where
        F: FnOnce(&mut NodeBuilder<'_, V, E>) -> Result<(), E>,
    {
        self.plant(name, value, None, f)
    }

    /// Adds a root node with a capacity bound and returns the updated
    /// builder.
    ///
    /// Panics if a root was already added.
    pub fn root_capped<F>(
        self,
        name: impl Into<String>,
        value: V,
        capacity: usize,
        f: F,
    ) -> Result<Self, E>
    where
        F: FnOnce(&mut NodeBuilder<'_, V, E>) -> Result<(), E>,
    {
        self.plant(name, value, Some(capacity), f)
    }

    fn plant<F>(
        mut self,
        name: impl Into<String>,
        value: V,
        capacity: Option<usize>,
        f: F,
    ) -> Result<Self, E>
    where
        F: FnOnce(&mut NodeBuilder<'_, V, E>) -> Result<(), E>,
    {
        self.debug_span.in_scope(|| -> Result<(), E> {
            if self.root.is_some() {
                panic!("root node already exists");
            }

            let node = Node::new(name, value, capacity).map_err(E::from)?;

            // Call the supplied closure with the NodeBuilder to add this
            // node's children
            let mut builder = NodeBuilder::new(&node);
            f(&mut builder)?;

            debug!("Added root {}", node.name());
            self.root = Some(node);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the constructed root when finished building, or `None` when
    /// no root was added.
    pub fn done(self) -> Result<Option<Node<V>>, E> {
        self.debug_span.in_scope(|| {
            debug!("Finished building tree");
            Ok(self.root)
        })
    }
}
