//! An AVL tree: a binary search tree that keeps the heights of every node's
//! two subtrees within one of each other, rebalancing with rotations on
//! insertion and deletion.
//!
//! Mutations can be observed through [`Callbacks`], e.g. to animate rotations
//! or keep a history of what happened; the tree never depends on them.
//!
//! ```
//! use equilibre::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for key in [10, 20, 30] {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(Some(&20), tree.root().map(|root| root.key()));
//! assert!(tree.search(&30));
//! assert!(tree.delete(&10));
//! assert!(!tree.search(&10));
//! ```
pub mod command;
mod iter;
mod node;
mod tree;
mod validate;

use std::{fmt, marker::PhantomData};

pub use iter::Iter;
pub use node::{balance_factor, height};
pub use validate::InvariantError;

pub type NodePtr<K> = Option<Box<Node<K>>>;

/// A tree node. Each node exclusively owns its children.
pub struct Node<K> {
    key: K,
    left: NodePtr<K>,
    right: NodePtr<K>,
    // 1 for a leaf; an absent node counts as 0.
    height: usize,
}

/// Something that happened while restructuring the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a, K> {
    /// Left-left case, resolved with a right rotation at the given key.
    RotateRight(&'a K),
    /// Right-right case, resolved with a left rotation at the given key.
    RotateLeft(&'a K),
    /// Left-right case: left rotation of the left child, then right rotation.
    RotateLeftRight(&'a K),
    /// Right-left case: right rotation of the right child, then left rotation.
    RotateRightLeft(&'a K),
    /// A deletion targeted a key that isn't in the tree.
    NotFound(&'a K),
}

impl<K: fmt::Display> fmt::Display for Event<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::RotateRight(k) => write!(f, "simple right rotation at node {k}"),
            Event::RotateLeft(k) => write!(f, "simple left rotation at node {k}"),
            Event::RotateLeftRight(k) => write!(f, "double rotation left-right at node {k}"),
            Event::RotateRightLeft(k) => write!(f, "double rotation right-left at node {k}"),
            Event::NotFound(k) => write!(f, "key {k} not found for deletion"),
        }
    }
}

/// Observer hooks, invoked synchronously while the tree mutates.
///
/// Both methods default to no-ops.
pub trait Callbacks {
    type Key;

    /// Fired after every rotation, and once more when an `insert` or `delete`
    /// call completes.
    fn structure_changed(&mut self) {}

    /// Fired when a rotation case is selected, before rotating, and when a
    /// deletion misses.
    fn event(&mut self, _event: Event<'_, Self::Key>) {}
}

/// Callbacks that do nothing.
pub struct Noop<K> {
    _phantom: PhantomData<K>,
}

impl<K> Noop<K> {
    pub fn new() -> Self {
        Noop {
            _phantom: PhantomData,
        }
    }
}

impl<K> Default for Noop<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Callbacks for Noop<K> {
    type Key = K;
}

/// An AVL tree of keys.
///
/// Equal keys are allowed; a duplicate is always placed to the right of the
/// keys it equals.
pub struct AvlTree<K, C = Noop<K>> {
    root: NodePtr<K>,
    len: usize,
    callbacks: C,
}
