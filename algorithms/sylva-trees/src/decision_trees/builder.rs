use std::marker::PhantomData;

use log::trace;
use sylva::{
    error::{Error, Result},
    Float,
};

use super::criteria::LeafValue;
use super::split::{SplitCandidate, SplitPolicy};
use super::{NodeSamples, TreeNode};

/// Outcome of growing a single node
enum Grown<'a, F, T> {
    Leaf(TreeNode<F, T>),
    Split(SplitCandidate<F>, NodeSamples<'a, F, T>, NodeSamples<'a, F, T>),
}

/// Work items of [`TreeBuilder::build`]
enum Task<'a, F, T> {
    /// Grow the node holding these observations at this depth
    Grow(NodeSamples<'a, F, T>, usize),
    /// Join the two subtrees grown last under a split node
    Join(SplitCandidate<F>, usize, usize),
}

/// Grows a tree by recursively partitioning observations
///
/// A node becomes a leaf when, checked in this order,
///
/// * the maximal depth is reached,
/// * it holds fewer than `min_samples_split` observations,
/// * all of its targets are identical,
/// * the split policy proposes no split, or
/// * the proposed split would leave one child without observations.
///
/// Otherwise both children are grown one level deeper. Leaves are summarized with `S`.
pub struct TreeBuilder<P, S> {
    policy: P,
    max_depth: Option<usize>,
    min_samples_split: usize,
    summary: PhantomData<S>,
}

impl<P, S> TreeBuilder<P, S> {
    pub fn new(policy: P, max_depth: Option<usize>, min_samples_split: usize) -> Self {
        TreeBuilder {
            policy,
            max_depth,
            min_samples_split,
            summary: PhantomData,
        }
    }

    /// Builds the tree for all observations in `samples`, starting at depth zero
    ///
    /// Nodes are grown depth first, left child before right child, from an explicit work stack,
    /// so the depth of the tree is not bounded by the call stack. Fails only if `samples` is empty.
    pub fn build<'a, F, T>(&mut self, samples: &NodeSamples<'a, F, T>) -> Result<TreeNode<F, T>>
    where
        F: Float,
        T: PartialEq,
        P: SplitPolicy<F, T>,
        S: LeafValue<T>,
    {
        let mut pending = Vec::new();
        let mut grown = Vec::new();

        let root = self.grow(samples, 0)?;
        Self::schedule(root, 0, &mut pending, &mut grown);

        while let Some(task) = pending.pop() {
            match task {
                Task::Grow(samples, depth) => {
                    let node = self.grow(&samples, depth)?;
                    Self::schedule(node, depth, &mut pending, &mut grown);
                }
                Task::Join(split, n_samples, depth) => {
                    // the right subtree was finished last
                    let (right, left) = match (grown.pop(), grown.pop()) {
                        (Some(right), Some(left)) => (right, left),
                        _ => unreachable!("both children are grown before their parent"),
                    };

                    grown.push(TreeNode::Split {
                        feature_idx: split.feature_idx,
                        threshold: split.threshold,
                        left: Box::new(left),
                        right: Box::new(right),
                        n_samples,
                        depth,
                    });
                }
            }
        }

        grown
            .pop()
            .ok_or_else(|| Error::MalformedInput("cannot grow a tree without a root".into()))
    }

    /// Stores a leaf or queues the children of a split, left child on top
    fn schedule<'a, F, T>(
        node: Grown<'a, F, T>,
        depth: usize,
        pending: &mut Vec<Task<'a, F, T>>,
        grown: &mut Vec<TreeNode<F, T>>,
    ) where
        F: Float,
    {
        match node {
            Grown::Leaf(leaf) => grown.push(leaf),
            Grown::Split(split, left, right) => {
                pending.push(Task::Join(split, left.len() + right.len(), depth));
                pending.push(Task::Grow(right, depth + 1));
                pending.push(Task::Grow(left, depth + 1));
            }
        }
    }

    /// Turns a node into a leaf or splits its observations in two
    fn grow<'a, F, T>(
        &mut self,
        samples: &NodeSamples<'a, F, T>,
        depth: usize,
    ) -> Result<Grown<'a, F, T>>
    where
        F: Float,
        T: PartialEq,
        P: SplitPolicy<F, T>,
        S: LeafValue<T>,
    {
        let depth_reached = self
            .max_depth
            .map(|max_depth| depth >= max_depth)
            .unwrap_or(false);

        if depth_reached || samples.len() < self.min_samples_split || samples.is_pure() {
            return Self::leaf(samples, depth).map(Grown::Leaf);
        }

        let split = match self.policy.find_split(samples) {
            Some(split) => split,
            None => return Self::leaf(samples, depth).map(Grown::Leaf),
        };

        let (left, right) = samples.partition(split.feature_idx, split.threshold);
        if left.is_empty() || right.is_empty() {
            trace!(
                "depth {}: split on feature {} at {} leaves a side empty",
                depth,
                split.feature_idx,
                split.threshold
            );
            return Self::leaf(samples, depth).map(Grown::Leaf);
        }

        trace!(
            "depth {}: splitting {} samples on feature {} at {} into {} and {}",
            depth,
            samples.len(),
            split.feature_idx,
            split.threshold,
            left.len(),
            right.len()
        );

        Ok(Grown::Split(split, left, right))
    }

    fn leaf<F, T>(samples: &NodeSamples<F, T>, depth: usize) -> Result<TreeNode<F, T>>
    where
        F: Float,
        S: LeafValue<T>,
    {
        let value = S::leaf_value(samples.targets()).ok_or_else(|| {
            Error::MalformedInput("cannot grow a tree node without samples".into())
        })?;

        Ok(TreeNode::Leaf {
            value,
            n_samples: samples.len(),
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision_trees::criteria::{MajorityLabel, MeanValue};
    use crate::decision_trees::split::{BestSplit, RandomSplit, SplitCandidate};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array, Array1, Array2};
    use ndarray_rand::{rand_distr::Uniform, RandomExt};
    use rand::{rngs::SmallRng, SeedableRng};

    /// Always proposes the same split, regardless of the observations
    struct FixedSplit(usize, f64);

    impl<T> SplitPolicy<f64, T> for FixedSplit {
        fn find_split(&mut self, _: &NodeSamples<f64, T>) -> Option<SplitCandidate<f64>> {
            Some(SplitCandidate {
                feature_idx: self.0,
                threshold: self.1,
                gain: None,
            })
        }
    }

    /// Walks the tree and checks that every split partitions its observations
    fn check_structure<T>(node: &TreeNode<f64, T>) {
        assert!(node.n_samples() > 0);
        if let TreeNode::Split {
            left,
            right,
            n_samples,
            depth,
            ..
        } = node
        {
            assert_eq!(left.n_samples() + right.n_samples(), *n_samples);
            assert_eq!(left.depth(), depth + 1);
            assert_eq!(right.depth(), depth + 1);
            check_structure(left);
            check_structure(right);
        }
    }

    #[test]
    fn pure_targets_give_a_single_leaf() -> Result<()> {
        let records = array![[0.0, 3.0], [1.0, 2.0], [2.0, 1.0], [3.0, 0.0]];
        let targets = array![1usize, 1, 1, 1];
        let samples = NodeSamples::all(records.view(), targets.view());

        let root = TreeBuilder::<_, MajorityLabel>::new(BestSplit, None, 2).build(&samples)?;
        assert_eq!(
            root,
            TreeNode::Leaf {
                value: 1,
                n_samples: 4,
                depth: 0
            }
        );

        Ok(())
    }

    #[test]
    fn stopping_rules_force_a_root_leaf() -> Result<()> {
        let records = array![[0.0], [1.0], [2.0], [3.0]];
        let targets = array![0usize, 1, 0, 1];
        let samples = NodeSamples::all(records.view(), targets.view());

        // zero depth
        let root = TreeBuilder::<_, MajorityLabel>::new(BestSplit, Some(0), 2).build(&samples)?;
        assert!(root.is_leaf());

        // more samples required than available
        let root = TreeBuilder::<_, MajorityLabel>::new(BestSplit, None, 5).build(&samples)?;
        assert!(root.is_leaf());
        assert_eq!(root.n_samples(), 4);

        Ok(())
    }

    #[test]
    fn empty_partitions_become_leaves() -> Result<()> {
        let records = array![[0.0], [1.0], [2.0]];
        let targets = array![1.0, 2.0, 6.0];
        let samples = NodeSamples::all(records.view(), targets.view());

        // everything is routed to the left
        let root = TreeBuilder::<_, MeanValue>::new(FixedSplit(0, 10.0), None, 2).build(&samples)?;
        assert!(root.is_leaf());
        assert_abs_diff_eq!(*root.prediction().unwrap(), 3.0);

        Ok(())
    }

    #[test]
    fn leaf_mode_breaks_ties_by_row_order() -> Result<()> {
        let records = array![[0.0], [0.0], [0.0], [0.0]];
        let targets = array!["b", "a", "a", "b"];
        let samples = NodeSamples::all(records.view(), targets.view());

        let root = TreeBuilder::<_, MajorityLabel>::new(BestSplit, None, 2).build(&samples)?;
        assert_eq!(root.prediction(), Some(&"b"));

        Ok(())
    }

    #[test]
    fn separable_labels_are_split_once() -> Result<()> {
        let records = array![[0.0], [1.0], [2.0], [3.0]];
        let targets = array![0usize, 0, 1, 1];
        let samples = NodeSamples::all(records.view(), targets.view());

        let root = TreeBuilder::<_, MajorityLabel>::new(BestSplit, None, 2).build(&samples)?;
        assert_eq!(root.split(), Some((0, 1.0)));

        let (left, right) = root.children().unwrap();
        assert_eq!(left.prediction(), Some(&0));
        assert_eq!(right.prediction(), Some(&1));

        Ok(())
    }

    #[test]
    fn random_trees_partition_their_samples() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(42);
        let records: Array2<f64> = Array::random_using((200, 3), Uniform::new(-1., 1.), &mut rng);
        let targets: Array1<f64> = Array::random_using(200, Uniform::new(0., 10.), &mut rng);
        let samples = NodeSamples::all(records.view(), targets.view());

        let policy = RandomSplit::new(SmallRng::seed_from_u64(1));
        let root = TreeBuilder::<_, MeanValue>::new(policy, None, 2).build(&samples)?;

        assert_eq!(root.n_samples(), 200);
        check_structure(&root);

        Ok(())
    }

    /// Splits off the observations holding the smallest value of the first feature
    struct PeelSmallest;

    impl<T> SplitPolicy<f64, T> for PeelSmallest {
        fn find_split(&mut self, samples: &NodeSamples<f64, T>) -> Option<SplitCandidate<f64>> {
            let (min, _) = samples.feature_range(0)?;
            Some(SplitCandidate {
                feature_idx: 0,
                threshold: min,
                gain: None,
            })
        }
    }

    #[test]
    fn unbounded_depth_does_not_exhaust_the_stack() -> Result<()> {
        let nsamples = 5000;
        let records = Array::from_shape_fn((nsamples, 1), |(i, _)| i as f64);
        let targets = Array::from_shape_fn(nsamples, |i| i as f64);
        let samples = NodeSamples::all(records.view(), targets.view());

        let root = TreeBuilder::<_, MeanValue>::new(PeelSmallest, None, 2).build(&samples)?;

        // every split peels a single leaf off the left, the chain continues on the right
        let mut node = &root;
        let mut depth = 0;
        while let Some((left, right)) = node.children() {
            assert_eq!(left.prediction(), Some(&(depth as f64)));
            assert_eq!(right.n_samples(), nsamples - depth - 1);
            node = right;
            depth += 1;
        }
        assert_eq!(depth, nsamples - 1);
        assert_eq!(node.prediction(), Some(&((nsamples - 1) as f64)));

        Ok(())
    }

    #[test]
    fn empty_root_is_rejected() {
        let records = Array2::<f64>::zeros((0, 2));
        let targets = Array1::<f64>::zeros(0);
        let samples = NodeSamples::all(records.view(), targets.view());

        let result = TreeBuilder::<_, MeanValue>::new(FixedSplit(0, 0.0), None, 2).build(&samples);
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }
}
