use std::iter::Iterator;

use super::TreeNode;
use sylva::Float;

/// Depth-first iterator of nodes in a decision tree
///
/// A node is visited before its children and the left subtree before the right one.
pub struct NodeIter<'a, F, T> {
    stack: Vec<&'a TreeNode<F, T>>,
}

impl<'a, F, T> NodeIter<'a, F, T> {
    pub fn new(stack: Vec<&'a TreeNode<F, T>>) -> Self {
        NodeIter { stack }
    }
}

impl<'a, F: Float, T> Iterator for NodeIter<'a, F, T> {
    type Item = &'a TreeNode<F, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|node| {
            if let Some((left, right)) = node.children() {
                self.stack.push(right);
                self.stack.push(left);
            }

            node
        })
    }
}
