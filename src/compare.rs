//! Structural comparison and subtree hashing.

use std::hash::{Hash, Hasher};

use xxhash_rust::xxh64::Xxh64;

use crate::node::Node;

/// Hashes the subtree structure: name, payload, child count, then every
/// child in sibling order.
impl<V> Hash for Node<V>
where
    V: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.with_value(|value| value.hash(state));
        self.child_count().hash(state);
        for child in self.children() {
            child.hash(state);
        }
    }
}

impl<V> Node<V>
where
    V: Hash,
{
    /// xxh64 digest of this node's subtree.
    ///
    /// Two subtrees with the same names, payloads and child order digest to
    /// the same value, so a cached digest makes a cheap dirty check.
    pub fn subtree_hash(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Structural equality: same name, payload, capacity, tier, and recursively
/// equal children in the same order. Cursor state is not compared. Two
/// handles to the same node are equal without descending.
impl<V> PartialEq for Node<V>
where
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.name() != other.name()
            || self.tier() != other.tier()
            || self.capacity() != other.capacity()
        {
            return false;
        }
        if !self.with_value(|mine| other.with_value(|theirs| mine == theirs)) {
            return false;
        }

        let mine = self.children();
        let theirs = other.children();
        mine.len() == theirs.len() && mine.iter().zip(&theirs).all(|(a, b)| a == b)
    }
}

impl<V> Eq for Node<V> where V: Eq {}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use crate::node::Node;
    use crate::test::tree_of_depth_two;

    #[traced_test]
    #[test]
    fn equal_shapes_compare_equal() {
        let one = tree_of_depth_two();
        let two = tree_of_depth_two();

        assert_eq!(one, two);
        assert_eq!(one.subtree_hash(), two.subtree_hash());
    }

    #[test]
    fn payload_differences_show() {
        let one = tree_of_depth_two();
        let two = tree_of_depth_two();
        two.get("b").unwrap().with_value_mut(|v| *v = 99);

        assert_ne!(one, two);
        assert_ne!(one.subtree_hash(), two.subtree_hash());
    }

    #[test]
    fn child_order_matters() {
        let one = Node::new("root", 0u32, None).unwrap();
        one.add([
            Node::new("a", 1, None).unwrap(),
            Node::new("b", 2, None).unwrap(),
        ])
        .unwrap();

        let two = Node::new("root", 0u32, None).unwrap();
        two.add([
            Node::new("b", 2, None).unwrap(),
            Node::new("a", 1, None).unwrap(),
        ])
        .unwrap();

        assert_ne!(one, two);
        assert_ne!(one.subtree_hash(), two.subtree_hash());
    }

    #[test]
    fn capacity_is_part_of_equality() {
        let capped = Node::new("root", 0u32, Some(4)).unwrap();
        let unbounded = Node::new("root", 0u32, None).unwrap();
        assert_ne!(capped, unbounded);
    }

    #[test]
    fn hash_changes_as_the_tree_changes() {
        let root = tree_of_depth_two();
        let before = root.subtree_hash();

        let b = root.get("b").unwrap();
        root.remove([&b]);
        assert_ne!(root.subtree_hash(), before);

        // An equivalent fresh node brings the digest back.
        root.add([Node::new("b", 3u32, None).unwrap()]).unwrap();
        assert_eq!(root.subtree_hash(), before);
    }

    #[test]
    fn same_handle_is_always_equal() {
        let root = tree_of_depth_two();
        let alias = root.clone();
        assert_eq!(root, alias);
    }
}
