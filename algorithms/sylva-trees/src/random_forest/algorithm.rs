use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use rand::Rng;
use sylva::{
    dataset::Records,
    error::{Error, Result},
    traits::*,
    DatasetBase, Float, Label, ParamGuard,
};

use super::RandomForestValidParams;
use crate::decision_trees::criteria::majority_vote;
use crate::DecisionTree;

/// A fitted random forest
///
/// ### Algorithm
///
/// Each of the `tree_count` trees draws `floor(sample_fraction * nsamples)` observations
/// uniformly and with replacement from the training set (at least one) and is fitted on them
/// as a [decision tree classifier](struct.DecisionTree.html). Trees do not share any state.
///
/// ### Predictions
///
/// Every tree predicts every observation and the forest returns the label predicted by the
/// most trees. Ties go to the label which was predicted first, in tree order.
///
/// ### Example
///
/// ```rust
/// use sylva_trees::RandomForestParams;
/// use sylva::prelude::*;
/// use ndarray::array;
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let records = array![[0.0, 0.0], [0.1, 0.2], [5.0, 5.0], [5.1, 4.9]];
/// let dataset = Dataset::new(records.clone(), array!["low", "low", "high", "high"]);
///
/// let forest = RandomForestParams::new_fixed_rng(SmallRng::seed_from_u64(42))
///     .tree_count(5)
///     .sample_fraction(1.0)
///     .fit(&dataset)
///     .unwrap();
///
/// assert_eq!(forest.ntrees(), 5);
/// assert_eq!(forest.predict(&records).len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestClassifier<F, L> {
    trees: Vec<DecisionTree<F, L>>,
    num_features: usize,
}

impl<F: Float, L: Label> RandomForestClassifier<F, L> {
    /// Return the trees of the forest in the order they were fitted
    pub fn trees(&self) -> &[DecisionTree<F, L>] {
        &self.trees
    }

    /// Return the number of trees in the forest
    pub fn ntrees(&self) -> usize {
        self.trees.len()
    }

    /// Return the number of features the forest was fitted on
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Predictions of the individual trees
    ///
    /// Row `i` of the returned `(ntrees, nsamples)` matrix holds the predictions of the `i`-th
    /// tree for every observation of `x`.
    pub fn predict_per_tree<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Array2<L> {
        Array2::from_shape_fn((self.trees.len(), x.nrows()), |(tree, row)| {
            self.trees[tree].predict_row(&x.row(row)).clone()
        })
    }
}

impl<F: Float, L> FeatureCount for RandomForestClassifier<F, L> {
    fn nfeatures(&self) -> usize {
        self.num_features
    }
}

impl<F: Float, L: Label + Default, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<L>>
    for RandomForestClassifier<F, L>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        let votes = self.predict_per_tree(x);
        for (column, target) in votes.columns().into_iter().zip(y.iter_mut()) {
            if let Some(label) = majority_vote(column.iter()) {
                *target = label;
            }
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<L> {
        Array1::default(x.nrows())
    }
}

impl<F, L, R, D, S> Fit<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>, Error>
    for RandomForestValidParams<F, L, R>
where
    F: Float,
    L: Label,
    R: Rng + Clone,
    D: Data<Elem = F>,
    S: Data<Elem = L>,
{
    type Object = RandomForestClassifier<F, L>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>) -> Result<Self::Object> {
        dataset.check_shape()?;
        let tree_params = self.tree_params().check_ref()?;

        let mut rng = self.rng().clone();
        let subset_size = bootstrap_size(dataset.nsamples(), self.sample_fraction());
        debug!(
            "fitting random forest of {} trees on {} samples with {} features, {} samples per tree",
            self.tree_count(),
            dataset.nsamples(),
            dataset.nfeatures(),
            subset_size
        );

        let trees = dataset
            .bootstrap_samples(subset_size, &mut rng)
            .take(self.tree_count())
            .enumerate()
            .map(|(i, subset)| -> Result<DecisionTree<F, L>> {
                let tree = tree_params.fit(&subset)?;
                trace!(
                    "tree {} has {} nodes and depth {}",
                    i,
                    tree.num_nodes(),
                    tree.depth()
                );
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RandomForestClassifier {
            trees,
            num_features: dataset.nfeatures(),
        })
    }
}

/// Number of observations drawn for every tree, never less than one
fn bootstrap_size(nsamples: usize, sample_fraction: f64) -> usize {
    ((nsamples as f64 * sample_fraction).floor() as usize).max(1)
}
