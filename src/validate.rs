use thiserror::Error;

use crate::{AvlTree, Node};

/// The first broken invariant found by [`AvlTree::validate`].
///
/// Depths count from 0 at the root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("keys out of order at in-order position {position}")]
    Unordered { position: usize },

    #[error("node at depth {depth} caches height {cached}, expected {expected}")]
    StaleHeight {
        depth: usize,
        cached: usize,
        expected: usize,
    },

    #[error("node at depth {depth} is unbalanced (balance factor {balance})")]
    Unbalanced { depth: usize, balance: isize },

    #[error("tree reports {len} keys but holds {counted}")]
    LengthMismatch { len: usize, counted: usize },
}

impl<K: Ord, C> AvlTree<K, C> {
    /// Walks the whole tree and checks the AVL invariants.
    ///
    /// Rotations may move a key below an equal one on either side, so order
    /// is checked as a non-decreasing in-order sequence.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let (_, counted) = check(self.root(), 0)?;
        if counted != self.len() {
            return Err(InvariantError::LengthMismatch {
                len: self.len(),
                counted,
            });
        }

        let mut keys = self.iter();
        let Some(mut previous) = keys.next() else {
            return Ok(());
        };
        for (position, key) in keys.enumerate() {
            if key < previous {
                return Err(InvariantError::Unordered {
                    position: position + 1,
                });
            }
            previous = key;
        }
        Ok(())
    }
}

/// Returns the recomputed height and node count of `node`'s subtree.
fn check<K>(node: Option<&Node<K>>, depth: usize) -> Result<(usize, usize), InvariantError> {
    let Some(node) = node else {
        return Ok((0, 0));
    };
    let (left, left_count) = check(node.left(), depth + 1)?;
    let (right, right_count) = check(node.right(), depth + 1)?;

    let expected = 1 + left.max(right);
    if node.height() != expected {
        return Err(InvariantError::StaleHeight {
            depth,
            cached: node.height(),
            expected,
        });
    }
    let balance = left as isize - right as isize;
    if balance.abs() > 1 {
        return Err(InvariantError::Unbalanced { depth, balance });
    }
    Ok((expected, left_count + right_count + 1))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_tree_is_valid() {
        assert_eq!(Ok(()), AvlTree::<usize>::new().validate());
    }

    #[test]
    fn detects_stale_height() {
        let mut tree: AvlTree<usize> = (0..3).collect();
        if let Some(root) = tree.root.as_mut() {
            root.height = 5;
        }
        assert_eq!(
            Err(InvariantError::StaleHeight {
                depth: 0,
                cached: 5,
                expected: 2
            }),
            tree.validate()
        );
    }

    #[test]
    fn detects_imbalance() {
        let mut tree = AvlTree::<usize>::new();
        let mut root = Box::new(Node::new(1));
        let mut right = Box::new(Node::new(2));
        right.right = Some(Box::new(Node::new(3)));
        right.update_height();
        root.right = Some(right);
        root.update_height();
        tree.root = Some(root);
        tree.len = 3;

        assert_eq!(
            Err(InvariantError::Unbalanced {
                depth: 0,
                balance: -2
            }),
            tree.validate()
        );
    }

    #[test]
    fn detects_disorder() {
        let mut tree: AvlTree<usize> = (0..3).collect();
        if let Some(root) = tree.root.as_mut() {
            root.key = 10;
        }
        assert_eq!(
            Err(InvariantError::Unordered { position: 2 }),
            tree.validate()
        );
    }

    #[test]
    fn detects_wrong_length() {
        let mut tree: AvlTree<usize> = (0..3).collect();
        tree.len = 4;
        assert_eq!(
            Err(InvariantError::LengthMismatch { len: 4, counted: 3 }),
            tree.validate()
        );
    }

    #[test]
    fn error_messages() {
        let err = InvariantError::Unbalanced {
            depth: 2,
            balance: 2,
        };
        assert_eq!(
            "node at depth 2 is unbalanced (balance factor 2)",
            err.to_string()
        );
    }
}
