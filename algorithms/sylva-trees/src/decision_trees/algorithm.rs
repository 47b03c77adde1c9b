//! Binary decision trees
//!
use std::collections::BTreeSet;

use log::debug;
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};
use rand::Rng;

use super::criteria::{MajorityLabel, MeanValue};
use super::split::{BestSplit, RandomSplit};
use super::{DecisionTreeValidParams, ExtraTreeValidParams, NodeIter, NodeSamples, TreeBuilder};
use sylva::{
    dataset::Records,
    error::{Error, Result},
    traits::*,
    DatasetBase, Float, Label,
};

/// A node in the decision tree
///
/// Every node remembers the number of training observations which reached it and its depth, the
/// root having depth zero. Children are owned by their parent.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode<F, T> {
    /// Terminal node predicting `value` for every observation routed to it
    Leaf {
        value: T,
        n_samples: usize,
        depth: usize,
    },
    /// Internal node, observations with `x[feature_idx] <= threshold` are routed to `left`
    Split {
        feature_idx: usize,
        threshold: F,
        left: Box<TreeNode<F, T>>,
        right: Box<TreeNode<F, T>>,
        n_samples: usize,
        depth: usize,
    },
}

impl<F: Float, T> TreeNode<F, T> {
    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Returns the depth of the node in the decision tree
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { depth, .. } | TreeNode::Split { depth, .. } => *depth,
        }
    }

    /// Returns the number of training observations which reached the node
    pub fn n_samples(&self) -> usize {
        match self {
            TreeNode::Leaf { n_samples, .. } | TreeNode::Split { n_samples, .. } => *n_samples,
        }
    }

    /// Returns `Some(prediction)` for leaf nodes and `None` for internal nodes.
    pub fn prediction(&self) -> Option<&T> {
        match self {
            TreeNode::Leaf { value, .. } => Some(value),
            TreeNode::Split { .. } => None,
        }
    }

    /// Returns the split (feature index, threshold) of internal nodes
    pub fn split(&self) -> Option<(usize, F)> {
        match self {
            TreeNode::Split {
                feature_idx,
                threshold,
                ..
            } => Some((*feature_idx, *threshold)),
            TreeNode::Leaf { .. } => None,
        }
    }

    /// Returns both children of internal nodes, first left then right
    pub fn children(&self) -> Option<(&TreeNode<F, T>, &TreeNode<F, T>)> {
        match self {
            TreeNode::Split { left, right, .. } => Some((&**left, &**right)),
            TreeNode::Leaf { .. } => None,
        }
    }

    /// Routes `x` from this node down to a leaf and returns the prediction of the leaf
    pub fn route<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix1>) -> &T {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return value,
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if x[*feature_idx] <= *threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }
}

/// A fitted decision tree
///
/// The same structure serves classification, where `T` is a [`Label`] and leaves predict the most
/// frequent label of their observations, and regression, where `T = F` and leaves predict the mean
/// target of their observations (see [`ExtraTree`]).
///
/// ### Structure
/// A decision tree structure is a binary tree where:
/// * Each internal node specifies a decision, represented by a choice of a feature and a
///   threshold such that all observations for which `feature <= threshold` is true fall in the
///   left subtree, while the others fall in the right subtree.
/// * Leaf nodes make predictions.
///
/// ### Algorithm
///
/// Starting with a single root node, decision trees are trained recursively by applying the
/// following rule to every node considered:
///
/// * Stop if the maximal depth is reached, the node has fewer than `min_samples_split`
///   observations or all of its targets are equal.
/// * Otherwise ask the split policy for a feature and a threshold. The classifier picks the split
///   with the largest information gain, the extremely randomized regressor draws both at random.
/// * If the split leaves one side empty the node becomes a leaf, otherwise both sides are trained
///   one level deeper.
///
/// ### Predictions
///
/// To predict the target of a sample, the tree is traversed from the root to a leaf, choosing
/// between left and right children according to the values of the features of the sample. The
/// final prediction for the sample is the prediction of the reached leaf.
///
/// ### Example
///
/// ```rust
/// use sylva_trees::DecisionTree;
/// use sylva::prelude::*;
/// use ndarray::array;
///
/// let records = array![[1., 2., 3.], [1., 2., 4.], [1., 3., 3.5]];
/// let dataset = Dataset::new(records.clone(), array![0, 0, 1]);
///
/// let tree = DecisionTree::params().fit(&dataset).unwrap();
///
/// assert_eq!(tree.predict(&records), array![0, 0, 1]);
/// assert_eq!(tree.num_leaves(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree<F, T> {
    root_node: TreeNode<F, T>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    num_features: usize,
}

/// An extremely randomized regression tree
pub type ExtraTree<F> = DecisionTree<F, F>;

impl<F: Float, T> DecisionTree<F, T> {
    /// Create a node iterator in depth-first order, visiting left subtrees first
    pub fn iter_nodes(&self) -> NodeIter<F, T> {
        NodeIter::new(vec![&self.root_node])
    }

    /// Return root node of the tree
    pub fn root_node(&self) -> &TreeNode<F, T> {
        &self.root_node
    }

    /// Return the indices of the features used by at least one split, in ascending order
    pub fn features(&self) -> Vec<usize> {
        self.iter_nodes()
            .filter_map(|node| node.split())
            .map(|(feature_idx, _)| feature_idx)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Return the depth of the deepest node
    pub fn depth(&self) -> usize {
        self.iter_nodes()
            .fold(0, |max, node| usize::max(max, node.depth()))
    }

    /// Return the number of leaves in this tree
    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }

    /// Return the number of nodes in this tree
    pub fn num_nodes(&self) -> usize {
        self.iter_nodes().count()
    }

    /// Return the number of features the tree was fitted on
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Return the depth limit the tree was grown with
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Return the minimum number of samples a node needed to be split
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Predict the target of a single observation
    ///
    /// ### Panics
    ///
    /// If the observation has fewer features than a split of the tree requires
    pub fn predict_row<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix1>) -> &T {
        self.root_node.route(x)
    }

    fn from_root(
        root_node: TreeNode<F, T>,
        max_depth: Option<usize>,
        min_samples_split: usize,
        num_features: usize,
    ) -> Self {
        DecisionTree {
            root_node,
            max_depth,
            min_samples_split,
            num_features,
        }
    }
}

impl<F: Float, T> FeatureCount for DecisionTree<F, T> {
    fn nfeatures(&self) -> usize {
        self.num_features
    }
}

impl<F: Float, T: Clone + Default, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<T>>
    for DecisionTree<F, T>
{
    /// Make predictions for each row of a matrix of features `x`.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<T>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = self.predict_row(&row).clone();
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<T> {
        Array1::default(x.nrows())
    }
}

impl<F, L, D, S> Fit<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>, Error> for DecisionTreeValidParams<F, L>
where
    F: Float,
    L: Label,
    D: Data<Elem = F>,
    S: Data<Elem = L>,
{
    type Object = DecisionTree<F, L>;

    /// Fit a decision tree classifier, choosing every split by its information gain
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>) -> Result<Self::Object> {
        dataset.check_shape()?;
        debug!(
            "fitting decision tree on {} samples with {} features",
            dataset.nsamples(),
            dataset.nfeatures()
        );

        let samples = NodeSamples::all(dataset.records().view(), dataset.targets().view());
        let root_node = TreeBuilder::<_, MajorityLabel>::new(
            BestSplit,
            self.max_depth(),
            self.min_samples_split(),
        )
        .build(&samples)?;

        let tree = DecisionTree::from_root(
            root_node,
            self.max_depth(),
            self.min_samples_split(),
            dataset.nfeatures(),
        );
        debug!(
            "fitted decision tree with {} nodes and depth {}",
            tree.num_nodes(),
            tree.depth()
        );

        Ok(tree)
    }
}

impl<F, R, D, S> Fit<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>, Error> for ExtraTreeValidParams<F, R>
where
    F: Float,
    R: Rng + Clone,
    D: Data<Elem = F>,
    S: Data<Elem = F>,
{
    type Object = ExtraTree<F>;

    /// Fit an extremely randomized regression tree with splits drawn from a clone of the
    /// configured generator
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>) -> Result<Self::Object> {
        dataset.check_shape()?;
        debug!(
            "fitting extra tree on {} samples with {} features",
            dataset.nsamples(),
            dataset.nfeatures()
        );

        let samples = NodeSamples::all(dataset.records().view(), dataset.targets().view());
        let root_node = TreeBuilder::<_, MeanValue>::new(
            RandomSplit::new(self.rng().clone()),
            self.max_depth(),
            self.min_samples_split(),
        )
        .build(&samples)?;

        let tree = DecisionTree::from_root(
            root_node,
            self.max_depth(),
            self.min_samples_split(),
            dataset.nfeatures(),
        );
        debug!(
            "fitted extra tree with {} nodes and depth {}",
            tree.num_nodes(),
            tree.depth()
        );

        Ok(tree)
    }
}
