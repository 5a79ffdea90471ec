use std::fmt::Debug;

use super::Node;

/// Height of a possibly absent node: the cached height, or 0.
#[inline(always)]
pub fn height<K>(node: Option<&Node<K>>) -> usize {
    node.map_or(0, |n| n.height)
}

/// Left height minus right height; 0 for an absent node.
#[inline(always)]
pub fn balance_factor<K>(node: Option<&Node<K>>) -> isize {
    node.map_or(0, Node::balance_factor)
}

// Public API.
impl<K> Node<K> {
    pub fn new(key: K) -> Self {
        Node {
            key,
            left: None,
            right: None,
            height: 1,
        }
    }

    #[inline(always)]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline(always)]
    pub fn left(&self) -> Option<&Node<K>> {
        self.left.as_deref()
    }

    #[inline(always)]
    pub fn right(&self) -> Option<&Node<K>> {
        self.right.as_deref()
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn balance_factor(&self) -> isize {
        height(self.left()) as isize - height(self.right()) as isize
    }

    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// The leftmost node of this subtree.
    pub fn minimum(&self) -> &Node<K> {
        let mut node = self;
        while let Some(left) = node.left() {
            node = left;
        }
        node
    }

    /// The rightmost node of this subtree.
    pub fn maximum(&self) -> &Node<K> {
        let mut node = self;
        while let Some(right) = node.right() {
            node = right;
        }
        node
    }

    /// Rotates this subtree to the left and returns its new root.
    ///
    /// ```text
    ///     x                y
    ///    / \              / \
    ///   a   y    -->     x   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    ///
    /// Without a right child there is nothing to rotate and `self` comes back
    /// untouched.
    pub fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let Some(mut y) = self.right.take() else {
            return self;
        };
        self.right = y.left.take();
        // x is now below y: fix it first.
        self.update_height();
        y.left = Some(self);
        y.update_height();
        y
    }

    /// Rotates this subtree to the right and returns its new root.
    ///
    /// ```text
    ///       x            y
    ///      / \          / \
    ///     y   c  -->   a   x
    ///    / \              / \
    ///   a   b            b   c
    /// ```
    pub fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let Some(mut y) = self.left.take() else {
            return self;
        };
        self.left = y.right.take();
        self.update_height();
        y.right = Some(self);
        y.update_height();
        y
    }
}

// Crate API.
impl<K> Node<K> {
    #[inline(always)]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(self.left()).max(height(self.right()));
    }
}

impl<K> Debug for Node<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}({})", self.key, self.height))
    }
}
