use std::marker::PhantomData;

use rand::rngs::ThreadRng;
use rand::Rng;
use sylva::{
    error::{Error, Result},
    Float, Label, ParamGuard,
};

use crate::DecisionTree;

/// The set of hyperparameters that can be specified for fitting a
/// [decision tree classifier](struct.DecisionTree.html).
///
/// ### Example
///
/// ```rust
/// use sylva_trees::DecisionTree;
/// use sylva::prelude::*;
/// use ndarray::array;
///
/// // Initialize the default set of parameters and limit the depth
/// let params = DecisionTree::params().max_depth(Some(2)).min_samples_split(2);
///
/// let records = array![[0.0, 1.0], [1.0, 0.5], [2.0, 0.0], [3.0, 0.5]];
/// let dataset = Dataset::new(records.clone(), array![0, 0, 1, 1]);
///
/// let tree = params.fit(&dataset).unwrap();
/// assert_eq!(tree.predict(&records), array![0, 0, 1, 1]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeValidParams<F, L> {
    max_depth: Option<usize>,
    min_samples_split: usize,

    marker: PhantomData<(F, L)>,
}

impl<F: Float, L> DecisionTreeValidParams<F, L> {
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeParams<F, L>(DecisionTreeValidParams<F, L>);

impl<F: Float, L: Label> DecisionTreeParams<F, L> {
    pub fn new() -> Self {
        Self(DecisionTreeValidParams {
            max_depth: None,
            min_samples_split: 2,
            marker: PhantomData,
        })
    }

    /// Sets the optional limit to the depth of the decision tree
    ///
    /// With `Some(0)` the tree consists of a single leaf.
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of samples required to split a node
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.min_samples_split = min_samples_split;
        self
    }
}

impl<F: Float, L: Label> Default for DecisionTreeParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: Label> DecisionTree<F, L> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `max_depth = None`
    /// * `min_samples_split = 2`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeParams<F, L> {
        DecisionTreeParams::new()
    }
}

impl<F: Float, L> ParamGuard for DecisionTreeParams<F, L> {
    type Checked = DecisionTreeValidParams<F, L>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        check_min_samples_split(self.0.min_samples_split)?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// The set of hyperparameters of an [extremely randomized regression tree](type.ExtraTree.html)
///
/// Split features and thresholds are drawn from `rng`. The generator is cloned whenever a tree is
/// fitted, so fitting the same parameters twice gives the same tree.
///
/// ### Example
///
/// ```rust
/// use sylva_trees::ExtraTreeParams;
/// use sylva::prelude::*;
/// use ndarray::array;
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let records = array![[0.0], [1.0], [2.0], [3.0]];
/// let dataset = Dataset::new(records.clone(), array![1.0, 1.0, 5.0, 5.0]);
///
/// let tree = ExtraTreeParams::new_fixed_rng(SmallRng::seed_from_u64(42))
///     .max_depth(Some(4))
///     .fit(&dataset)
///     .unwrap();
///
/// let predictions = tree.predict(&records);
/// assert_eq!(predictions.len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ExtraTreeValidParams<F, R> {
    max_depth: Option<usize>,
    min_samples_split: usize,
    rng: R,

    marker: PhantomData<F>,
}

impl<F: Float, R: Rng + Clone> ExtraTreeValidParams<F, R> {
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExtraTreeParams<F, R>(ExtraTreeValidParams<F, R>);

impl<F: Float> ExtraTreeParams<F, ThreadRng> {
    /// Parameters drawing their splits from the thread-local generator
    pub fn new() -> Self {
        Self::new_fixed_rng(rand::thread_rng())
    }
}

impl<F: Float> Default for ExtraTreeParams<F, ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, R: Rng + Clone> ExtraTreeParams<F, R> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `max_depth = Some(10)`
    /// * `min_samples_split = 2`
    pub fn new_fixed_rng(rng: R) -> Self {
        Self(ExtraTreeValidParams {
            max_depth: Some(10),
            min_samples_split: 2,
            rng,
            marker: PhantomData,
        })
    }

    /// Sets the optional limit to the depth of the tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of samples required to split a node
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.min_samples_split = min_samples_split;
        self
    }

    /// Replaces the generator the splits are drawn from
    pub fn with_rng<R2: Rng + Clone>(self, rng: R2) -> ExtraTreeParams<F, R2> {
        ExtraTreeParams(ExtraTreeValidParams {
            max_depth: self.0.max_depth,
            min_samples_split: self.0.min_samples_split,
            rng,
            marker: PhantomData,
        })
    }
}

impl<F: Float, R> ParamGuard for ExtraTreeParams<F, R> {
    type Checked = ExtraTreeValidParams<F, R>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        check_min_samples_split(self.0.min_samples_split)?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

fn check_min_samples_split(min_samples_split: usize) -> Result<()> {
    if min_samples_split < 2 {
        Err(Error::Parameters(format!(
            "Minimum number of samples to split a node should be at least two, but was {}",
            min_samples_split
        )))
    } else {
        Ok(())
    }
}
