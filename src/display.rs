//! Path rendering and tree outlines.

use std::fmt::Write as _;

use crate::node::Node;

impl<V> Node<V> {
    /// Root-relative path of this node: `./` followed by the names from the
    /// root down to here joined with `/`.
    ///
    /// Derived from the live parent chain on every call, so it tracks moves
    /// and removals. A node without a parent renders as `./`.
    pub fn path(&self) -> String {
        let mut names = Vec::new();
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            names.push(current.name().to_string());
            current = parent;
        }
        names.reverse();
        format!("./{}", names.join("/"))
    }

    /// Multi-line box-drawing outline of this subtree.
    pub fn outline(&self) -> Outline<V> {
        Outline {
            root: self.clone(),
        }
    }
}

impl<V> std::fmt::Display for Node<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl<V> std::fmt::Debug for Node<V>
where
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Node");
        s.field("path", &self.path());
        self.with_value(|value| {
            s.field("value", value);
        });
        s.field("tier", &self.tier())
            .field("position", &self.position())
            .field("capacity", &self.capacity())
            .field("children", &self.child_count());
        s.finish()
    }
}

/// Renders a subtree one node per row with box-drawing rails.
pub struct Outline<V> {
    root: Node<V>,
}

impl<V> std::fmt::Display for Outline<V>
where
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const COLUMN: usize = 2;

        f.write_char('\n')?;

        let mut iter = self.root.iter().peekable();
        let mut root_has_children = false;

        while let Some(item) = iter.next() {
            // A following node on the same depth means this row continues.
            let has_sibling_row = iter
                .peek()
                .map(|next| next.depth() == item.depth())
                .unwrap_or(false);
            let has_children = !item.is_leaf();

            if item.depth() == 0 {
                root_has_children = has_children;
                f.write_char(if has_children || has_sibling_row {
                    '┏'
                } else {
                    '━'
                })?;
            } else {
                for column in 0..item.depth() * COLUMN {
                    f.write_char(if column % COLUMN == 0 { '┃' } else { ' ' })?;
                }
                f.write_char(if has_children || has_sibling_row {
                    '┣'
                } else {
                    '┗'
                })?;
            }

            item.node()
                .with_value(|value| writeln!(f, " {}: {:?}", item.name(), value))?;
        }

        if root_has_children {
            f.write_char('┗')?;
        }

        Ok(())
    }
}
