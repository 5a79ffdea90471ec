use std::iter::FusedIterator;

use crate::{AvlTree, Callbacks, Node};

/// An iterator over the keys of an [`AvlTree`], in order.
pub struct Iter<'a, K> {
    // Ancestors whose key and right subtree are still to be visited.
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: Option<&'a Node<K>>, len: usize) -> Self {
        let mut iter = Iter {
            stack: Vec::with_capacity(crate::height(root)),
            remaining: len,
        };
        iter.descend(root);
        iter
    }

    fn descend(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

impl<K, C> AvlTree<K, C> {
    /// Gets an iterator over the keys of the tree, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibre::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    /// tree.insert(2);
    ///
    /// let keys: Vec<_> = tree.iter().cloned().collect();
    /// assert_eq!(keys, [1, 2, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root(), self.len())
    }
}

impl<'a, K, C> IntoIterator for &'a AvlTree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, C: Callbacks<Key = K> + Default> FromIterator<K> for AvlTree<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> AvlTree<K, C> {
        let mut tree = AvlTree::with_callbacks(Default::default());
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, C: Callbacks<Key = K>> Extend<K> for AvlTree<K, C> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

#[cfg(test)]
mod test {
    use crate::AvlTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_iter() {
        let tree = AvlTree::<usize>::new();
        assert_eq!(None, tree.iter().next());
        assert_eq!(0, tree.iter().len());
    }

    #[test]
    fn iter_is_sorted_and_exact() {
        let tree: AvlTree<i32> = [5, -3, 12, 0, 7, 7, 1].into_iter().collect();
        let mut iter = tree.iter();
        assert_eq!(7, iter.len());
        iter.next();
        assert_eq!(6, iter.len());
        assert_eq!(vec![0, 1, 5, 7, 7, 12], iter.copied().collect::<Vec<_>>());
    }

    #[test]
    fn iter_is_fused() {
        let tree: AvlTree<u8> = [1].into_iter().collect();
        let mut iter = tree.iter();
        assert_eq!(Some(&1), iter.next());
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next());
    }

    #[test]
    fn for_loop_over_reference() {
        let tree: AvlTree<usize> = (0..50).rev().collect();
        let mut expected = 0;
        for key in &tree {
            assert_eq!(expected, *key);
            expected += 1;
        }
        assert_eq!(50, expected);
    }

    #[test]
    fn extend_inserts_everything() {
        let mut tree: AvlTree<usize> = (0..10).collect();
        tree.extend(5..15);
        assert_eq!(20, tree.len());
        assert_eq!(Ok(()), tree.validate());
        assert_eq!(Some(&14), tree.last());
    }
}
