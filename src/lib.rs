//! # Tilia
//!
//! A labeled tree data structure library for Rust.
//!
//! ## Overview
//!
//! Tilia models a tree as nothing but nodes. A [`Node`] owns its ordered,
//! uniquely named children and keeps a weak back-reference to its parent, so
//! any node can serve as the root of its own subtree. On top of that sit
//! capacity-bounded attachment, lateral sibling navigation, recursive
//! search, bottom-up flattening, and whole-subtree serialization.
//!
//! ```
//! use tilia::{Criteria, Node, TreeError};
//!
//! # fn main() -> Result<(), TreeError> {
//! let root = Node::new("root", 0, None)?;
//! root.add([Node::new("a", 1, None)?, Node::new("b", 2, None)?])?;
//! root.get("a").unwrap().add([Node::new("a1", 3, None)?])?;
//!
//! let hit = root.search_for(Criteria::new().name("a1"))?.unwrap();
//! assert_eq!(hit.path(), "./a/a1");
//! assert_eq!(root.collect().len(), 3);
//! # Ok(())
//! # }
//! ```

mod builder;
mod compare;
mod cursor;
mod display;
mod error;
mod iterator;
mod name;
mod persist;
mod search;

pub mod node;


pub use builder::*;
pub use display::Outline;
pub use error::TreeError;
pub use iterator::{IterNode, NodeIter};
pub use name::NodeName;
pub use search::Criteria;

pub use node::Node;

pub type NodeDepth = usize;
pub type NodeIndex = usize;
