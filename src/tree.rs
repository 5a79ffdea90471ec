use std::{borrow::Borrow, cmp::Ordering::*, fmt};

use crate::{AvlTree, Callbacks, Event, Node, NodePtr, Noop, balance_factor, height};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Imbalance {
    LeftLeft,
    RightRight,
    LeftRight,
    RightLeft,
}

impl<K> AvlTree<K, Noop<K>> {
    pub fn new() -> Self {
        Self::with_callbacks(Noop::new())
    }
}

impl<K, C: Callbacks<Key = K> + Default> Default for AvlTree<K, C> {
    fn default() -> Self {
        Self::with_callbacks(C::default())
    }
}

impl<K, C: Callbacks<Key = K>> AvlTree<K, C> {
    pub fn with_callbacks(callbacks: C) -> Self {
        AvlTree {
            root: None,
            len: 0,
            callbacks,
        }
    }

    /// Inserts `key`, rebalancing every ancestor of the new node on the way
    /// back up.
    ///
    /// Duplicates are kept: an equal key goes to the right.
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let root = self.root.take();
        self.root = Some(insert(root, key, &mut self.callbacks));
        self.len += 1;
        self.callbacks.structure_changed();
    }

    /// Removes one occurrence of `key`. Returns whether a node was removed;
    /// a missing key leaves the tree untouched.
    ///
    /// A node with two children takes the key of its in-order successor,
    /// which is then removed from the right subtree.
    ///
    /// Unlike [`Self::search`] this takes `&K` rather than a borrowed form:
    /// a miss is reported to the callbacks as [`Event::NotFound`], which
    /// carries the key itself.
    pub fn delete(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let root = self.root.take();
        let (root, removed) = delete(root, key, &mut self.callbacks);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        self.callbacks.structure_changed();
        removed
    }
}

impl<K, C> AvlTree<K, C> {
    /// Whether `key` is in the tree. O(height), never mutates.
    pub fn search<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_deref();
        while let Some(candidate) = node {
            match key.cmp(candidate.key.borrow()) {
                Equal => return true,
                Less => node = candidate.left(),
                Greater => node = candidate.right(),
            }
        }
        false
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.search(key)
    }

    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// Height of the whole tree; 0 when empty.
    pub fn height(&self) -> usize {
        height(self.root())
    }

    pub fn first(&self) -> Option<&K> {
        self.root().map(|root| root.minimum().key())
    }

    pub fn last(&self) -> Option<&K> {
        self.root().map(|root| root.maximum().key())
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn len(&self) -> usize {
        self.len
    }
}

impl<K: fmt::Debug, C> fmt::Debug for AvlTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

fn insert<K, C>(node: NodePtr<K>, key: K, callbacks: &mut C) -> Box<Node<K>>
where
    K: Ord,
    C: Callbacks<Key = K>,
{
    let Some(mut node) = node else {
        return Box::new(Node::new(key));
    };

    let goes_left = key < node.key;
    let child = if goes_left { node.left() } else { node.right() };
    // Where the key lands below the child tells a single rotation from a
    // double one. A child that rotates itself leaves this node balanced, so
    // looking before descending is the same as looking after.
    let goes_left_of_child = child.is_some_and(|child| key < child.key);

    if goes_left {
        node.left = Some(insert(node.left.take(), key, callbacks));
    } else {
        node.right = Some(insert(node.right.take(), key, callbacks));
    }
    node.update_height();

    let balance = node.balance_factor();
    if balance > 1 {
        let case = if goes_left_of_child {
            Imbalance::LeftLeft
        } else {
            Imbalance::LeftRight
        };
        rebalance(node, case, callbacks)
    } else if balance < -1 {
        let case = if goes_left_of_child {
            Imbalance::RightLeft
        } else {
            Imbalance::RightRight
        };
        rebalance(node, case, callbacks)
    } else {
        node
    }
}

fn delete<K, C>(node: NodePtr<K>, key: &K, callbacks: &mut C) -> (NodePtr<K>, bool)
where
    K: Ord,
    C: Callbacks<Key = K>,
{
    let Some(mut node) = node else {
        callbacks.event(Event::NotFound(key));
        return (None, false);
    };

    let removed = match key.cmp(&node.key) {
        Less => {
            let (left, removed) = delete(node.left.take(), key, callbacks);
            node.left = left;
            removed
        }
        Greater => {
            let (right, removed) = delete(node.right.take(), key, callbacks);
            node.right = right;
            removed
        }
        Equal if node.is_leaf() => return (None, true),
        Equal => match (node.left.take(), node.right.take()) {
            (Some(left), Some(right)) => {
                let (right, successor) = remove_minimum(right, callbacks);
                node.key = successor;
                node.left = Some(left);
                node.right = right;
                true
            }
            // Splice out the node in favor of its only child.
            (left, right) => return (left.or(right), true),
        },
    };

    (Some(rebalance_after_removal(node, callbacks)), removed)
}

/// Unlinks the leftmost node of `node`'s subtree and returns what's left,
/// rebalanced, along with the unlinked key.
fn remove_minimum<K, C>(mut node: Box<Node<K>>, callbacks: &mut C) -> (NodePtr<K>, K)
where
    C: Callbacks<Key = K>,
{
    match node.left.take() {
        None => {
            let right = node.right.take();
            (right, node.key)
        }
        Some(left) => {
            let (left, minimum) = remove_minimum(left, callbacks);
            node.left = left;
            (Some(rebalance_after_removal(node, callbacks)), minimum)
        }
    }
}

// After a removal no key points at the imbalance, so the taller child's own
// balance picks the case.
fn rebalance_after_removal<K, C>(mut node: Box<Node<K>>, callbacks: &mut C) -> Box<Node<K>>
where
    C: Callbacks<Key = K>,
{
    node.update_height();

    let balance = node.balance_factor();
    if balance > 1 {
        let case = if balance_factor(node.left()) >= 0 {
            Imbalance::LeftLeft
        } else {
            Imbalance::LeftRight
        };
        rebalance(node, case, callbacks)
    } else if balance < -1 {
        let case = if balance_factor(node.right()) <= 0 {
            Imbalance::RightRight
        } else {
            Imbalance::RightLeft
        };
        rebalance(node, case, callbacks)
    } else {
        node
    }
}

fn rebalance<K, C>(mut node: Box<Node<K>>, case: Imbalance, callbacks: &mut C) -> Box<Node<K>>
where
    C: Callbacks<Key = K>,
{
    match case {
        Imbalance::LeftLeft => {
            callbacks.event(Event::RotateRight(&node.key));
            node = node.rotate_right();
        }
        Imbalance::RightRight => {
            callbacks.event(Event::RotateLeft(&node.key));
            node = node.rotate_left();
        }
        Imbalance::LeftRight => {
            callbacks.event(Event::RotateLeftRight(&node.key));
            node.left = node.left.take().map(Node::rotate_left);
            callbacks.structure_changed();
            node = node.rotate_right();
        }
        Imbalance::RightLeft => {
            callbacks.event(Event::RotateRightLeft(&node.key));
            node.right = node.right.take().map(Node::rotate_right);
            callbacks.structure_changed();
            node = node.rotate_left();
        }
    }
    callbacks.structure_changed();
    node
}
