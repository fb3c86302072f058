//! Lateral navigation across siblings.
//!
//! Every node carries a cursor into its parent's child list, seeded with the
//! node's own index at attach time. [`Node::left`] and [`Node::right`] move
//! that cursor one sibling at a time without touching tree structure.

use tracing::debug;

use crate::error::TreeError;
use crate::node::Node;

impl<V> Node<V> {
    /// Moves the sibling cursor one step left and returns the sibling now
    /// under it.
    ///
    /// Fails with [`TreeError::NoParent`] on a node without a parent and
    /// with [`TreeError::LimitReached`] once the cursor sits on the leftmost
    /// child.
    pub fn left(&self) -> Result<Node<V>, TreeError> {
        let parent = self.parent().ok_or(TreeError::NoParent)?;
        let children = parent.children();

        // Sibling removals can leave the cursor past the end of the list.
        let position = self.position().min(children.len() - 1);

        if position == 0 {
            return Err(TreeError::LimitReached {
                position,
                len: children.len(),
            });
        }

        let position = position - 1;
        self.set_position(position);
        debug!("Cursor of {} moved left to {}", self.name(), position);

        Ok(children[position].clone())
    }

    /// Moves the sibling cursor one step right and returns the sibling now
    /// under it.
    ///
    /// Fails with [`TreeError::NoParent`] on a node without a parent and
    /// with [`TreeError::LimitReached`] once the cursor sits on the rightmost
    /// child.
    pub fn right(&self) -> Result<Node<V>, TreeError> {
        let parent = self.parent().ok_or(TreeError::NoParent)?;
        let children = parent.children();

        let position = self.position().min(children.len() - 1);

        if position + 1 == children.len() {
            return Err(TreeError::LimitReached {
                position,
                len: children.len(),
            });
        }

        let position = position + 1;
        self.set_position(position);
        debug!("Cursor of {} moved right to {}", self.name(), position);

        Ok(children[position].clone())
    }
}
