//! Whole-subtree serialization.
//!
//! A node and everything it owns round-trips through any `std::io` stream.
//! Names, values, capacities, tiers and child order are preserved exactly;
//! parent links, positions and the name index are rebuilt on load. Decoded
//! input is re-validated against the same rules as live construction, so a
//! stream cannot smuggle in a tree the API could not have built.

use std::io::{Read, Write};
use std::num::NonZeroUsize;

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::TreeError;
use crate::name::NodeName;
use crate::node::Node;
use crate::NodeDepth;

impl<V> Serialize for Node<V>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Field order has to line up with SubtreeRepr.
        let mut state = serializer.serialize_struct("Node", 5)?;
        state.serialize_field("name", self.name().as_str())?;
        self.with_value(|value| state.serialize_field("value", value))?;
        state.serialize_field("capacity", &self.capacity())?;
        state.serialize_field("tier", &self.tier())?;
        state.serialize_field("children", &self.children())?;
        state.end()
    }
}

/// Owned mirror of one encoded node, decoded before the live tree is
/// rebuilt.
#[derive(Deserialize)]
struct SubtreeRepr<V> {
    name: String,
    value: V,
    capacity: Option<usize>,
    tier: NodeDepth,
    children: Vec<SubtreeRepr<V>>,
}

fn restore<V>(repr: SubtreeRepr<V>) -> Result<Node<V>, TreeError> {
    let name = NodeName::new(repr.name).map_err(TreeError::into_restore)?;

    let capacity = match repr.capacity {
        None => None,
        Some(cap) => Some(
            NonZeroUsize::new(cap)
                .ok_or(TreeError::InvalidCapacity)
                .map_err(TreeError::into_restore)?,
        ),
    };
    if let Some(capacity) = capacity {
        let capacity = capacity.get();
        let count = repr.children.len();
        if count > capacity {
            return Err(TreeError::CapacityExceeded {
                capacity,
                remaining: capacity,
                requested: count,
                overflow: count - capacity,
            }
            .into_restore());
        }
    }

    // Tiers are restored verbatim. A tree that was rearranged before saving
    // carries attach-time tiers that are not parent + 1, and the round trip
    // must not flatten that history.
    let node = Node::from_parts(name, repr.value, capacity, repr.tier);

    for child_repr in repr.children {
        let child = restore(child_repr)?;
        node.adopt(child).map_err(TreeError::into_restore)?;
    }

    Ok(node)
}

impl<V> Node<V> {
    /// Serializes this node and its entire subtree to a stream as one
    /// self-contained unit.
    pub fn save<W>(&self, mut writer: W) -> Result<(), TreeError>
    where
        V: Serialize,
        W: Write,
    {
        let written =
            bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        debug!("Saved {} as {} bytes", self.name(), written);
        Ok(())
    }

    /// Restores a subtree previously written by [`Node::save`].
    ///
    /// The returned node is a standalone root, whatever its recorded tier.
    /// Corrupt or truncated input fails with [`TreeError::Decode`]; input
    /// that decodes but violates a structural rule fails with
    /// [`TreeError::Restore`].
    pub fn load<R>(mut reader: R) -> Result<Node<V>, TreeError>
    where
        V: DeserializeOwned,
        R: Read,
    {
        let repr: SubtreeRepr<V> =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        let node = restore(repr)?;
        debug!("Loaded subtree rooted at {}", node.name());
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use crate::error::TreeError;
    use crate::node::Node;
    use crate::test::{sibling_row, tree_of_depth_two};

    /// Same wire shape as the private decode mirror, for crafting streams
    /// the save path would never produce.
    #[derive(serde::Serialize)]
    struct RawRepr {
        name: String,
        value: u32,
        capacity: Option<usize>,
        tier: usize,
        children: Vec<RawRepr>,
    }

    fn raw(name: &str, children: Vec<RawRepr>) -> RawRepr {
        RawRepr {
            name: name.into(),
            value: 0,
            capacity: None,
            tier: 0,
            children,
        }
    }

    fn encode(repr: &RawRepr) -> Vec<u8> {
        let mut bytes = Vec::new();
        bincode::serde::encode_into_std_write(repr, &mut bytes, bincode::config::standard())
            .unwrap();
        bytes
    }

    #[traced_test]
    #[test]
    fn round_trip_reproduces_the_tree() {
        let root = tree_of_depth_two();

        let mut bytes = Vec::new();
        root.save(&mut bytes).unwrap();
        let loaded: Node<u32> = Node::load(bytes.as_slice()).unwrap();

        assert_eq!(loaded, root);
        assert!(loaded.parent().is_none());

        // Parent links and the name index came back.
        let a = loaded.get("a").unwrap();
        assert!(a.parent().unwrap().ptr_eq(&loaded));
        assert_eq!(a.get("a1").unwrap().path(), "./a/a1");
        assert_eq!(a.get("a1").unwrap().tier(), 2);
        assert_eq!(loaded.get("b").unwrap().position(), 1);
    }

    #[test]
    fn round_trip_keeps_capacity_enforcement() {
        let root = Node::new("root", 0u32, Some(2)).unwrap();
        root.add([
            Node::new("a", 1, None).unwrap(),
            Node::new("b", 2, None).unwrap(),
        ])
        .unwrap();

        let mut bytes = Vec::new();
        root.save(&mut bytes).unwrap();
        let loaded: Node<u32> = Node::load(bytes.as_slice()).unwrap();

        assert_eq!(loaded.capacity(), Some(2));
        let err = loaded.add([Node::new("c", 3, None).unwrap()]).unwrap_err();
        assert!(matches!(err, TreeError::CapacityExceeded { .. }));
    }

    #[test]
    fn round_trip_keeps_historical_tiers() {
        let root = tree_of_depth_two();
        // branch gets a subtree while standalone, then moves under a; its
        // child keeps the tier it was attached at.
        let branch = Node::new("branch", 10u32, None).unwrap();
        branch.add([Node::new("leaf", 11, None).unwrap()]).unwrap();
        root.get("a").unwrap().add([branch.clone()]).unwrap();
        assert_eq!(branch.tier(), 2);
        assert_eq!(branch.get("leaf").unwrap().tier(), 1);

        let mut bytes = Vec::new();
        root.save(&mut bytes).unwrap();
        let loaded: Node<u32> = Node::load(bytes.as_slice()).unwrap();

        let branch = loaded.get("a").unwrap().get("branch").unwrap();
        assert_eq!(branch.tier(), 2);
        assert_eq!(branch.get("leaf").unwrap().tier(), 1);
    }

    #[test]
    fn saves_a_mid_tree_subtree() {
        let root = tree_of_depth_two();
        let a = root.get("a").unwrap();

        let mut bytes = Vec::new();
        a.save(&mut bytes).unwrap();
        let loaded: Node<u32> = Node::load(bytes.as_slice()).unwrap();

        // The subtree alone was captured, rooted at a.
        assert_eq!(loaded.name(), *"a");
        assert!(loaded.parent().is_none());
        assert_eq!(loaded.tier(), 1);
        assert_eq!(loaded.child_count(), 1);
        assert!(loaded.get("b").is_none());
    }

    #[test]
    fn sibling_cursors_reset_to_indices() {
        let root = sibling_row();
        let s0 = root.get("s0").unwrap();
        s0.right().unwrap();
        s0.right().unwrap();

        let mut bytes = Vec::new();
        root.save(&mut bytes).unwrap();
        let loaded: Node<u32> = Node::load(bytes.as_slice()).unwrap();

        // Cursor excursions are not part of the persisted structure.
        assert_eq!(loaded.get("s0").unwrap().position(), 0);
        assert_eq!(loaded.get("s2").unwrap().position(), 2);
    }

    #[test]
    fn garbage_input_fails_to_decode() {
        let err = Node::<u32>::load(&b"not a subtree"[..]).unwrap_err();
        assert!(matches!(err, TreeError::Decode(_)));
    }

    #[test]
    fn truncated_input_fails_to_decode() {
        let root = tree_of_depth_two();
        let mut bytes = Vec::new();
        root.save(&mut bytes).unwrap();
        bytes.truncate(bytes.len() / 2);

        let err = Node::<u32>::load(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, TreeError::Decode(_)));
    }

    #[test]
    fn decoded_invalid_name_fails_restore() {
        let bytes = encode(&raw("9bad", Vec::new()));
        let err = Node::<u32>::load(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            TreeError::Restore(inner) if matches!(*inner, TreeError::InvalidName { .. })
        ));
    }

    #[test]
    fn decoded_duplicate_names_fail_restore() {
        let bytes = encode(&raw("root", vec![raw("twin", Vec::new()), raw("twin", Vec::new())]));
        let err = Node::<u32>::load(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            TreeError::Restore(inner) if matches!(*inner, TreeError::DuplicateName { .. })
        ));
    }

    #[test]
    fn decoded_zero_capacity_fails_restore() {
        let mut repr = raw("root", Vec::new());
        repr.capacity = Some(0);
        let err = Node::<u32>::load(encode(&repr).as_slice()).unwrap_err();
        assert!(matches!(
            err,
            TreeError::Restore(inner) if matches!(*inner, TreeError::InvalidCapacity)
        ));
    }

    #[test]
    fn decoded_overfull_node_fails_restore() {
        let mut repr = raw("root", vec![raw("a", Vec::new()), raw("b", Vec::new())]);
        repr.capacity = Some(1);
        let err = Node::<u32>::load(encode(&repr).as_slice()).unwrap_err();
        assert!(matches!(
            err,
            TreeError::Restore(inner) if matches!(*inner, TreeError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn string_payloads_round_trip() {
        let root = Node::new("cfg", "top".to_string(), None).unwrap();
        root.add([Node::new("host", "example".to_string(), None).unwrap()])
            .unwrap();

        let mut bytes = Vec::new();
        root.save(&mut bytes).unwrap();
        let loaded: Node<String> = Node::load(bytes.as_slice()).unwrap();

        assert_eq!(loaded.get("host").unwrap().value(), "example");
    }
}
