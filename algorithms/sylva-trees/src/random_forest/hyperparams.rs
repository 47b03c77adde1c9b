use rand::rngs::ThreadRng;
use rand::Rng;
use sylva::{
    error::{Error, Result},
    Float, Label, ParamGuard,
};

use super::RandomForestClassifier;
use crate::{DecisionTree, DecisionTreeParams};

/// The set of hyperparameters of a [random forest](struct.RandomForestClassifier.html)
///
/// Every tree of the forest is a decision tree classifier fitted with `tree_params` on its own
/// bootstrap sample of `floor(sample_fraction * nsamples)` observations, at least one. The
/// bootstrap samples are drawn from a clone of `rng`, so fitting the same parameters twice
/// gives the same forest.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomForestValidParams<F, L, R> {
    tree_count: usize,
    sample_fraction: f64,
    tree_params: DecisionTreeParams<F, L>,
    rng: R,
}

impl<F: Float, L: Label, R: Rng + Clone> RandomForestValidParams<F, L, R> {
    /// The number of trees in the forest
    pub fn tree_count(&self) -> usize {
        self.tree_count
    }

    /// The share of the training set drawn for every tree
    pub fn sample_fraction(&self) -> f64 {
        self.sample_fraction
    }

    /// The parameters every tree of the forest is fitted with
    pub fn tree_params(&self) -> &DecisionTreeParams<F, L> {
        &self.tree_params
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RandomForestParams<F, L, R>(RandomForestValidParams<F, L, R>);

impl<F: Float, L: Label> RandomForestParams<F, L, ThreadRng> {
    pub fn new() -> Self {
        Self::new_fixed_rng(rand::thread_rng())
    }
}

impl<F: Float, L: Label> Default for RandomForestParams<F, L, ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: Label, R: Rng + Clone> RandomForestParams<F, L, R> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `tree_count = 10`
    /// * `sample_fraction = 0.8`
    /// * `max_depth = None`
    /// * `min_samples_split = 2`
    pub fn new_fixed_rng(rng: R) -> Self {
        Self(RandomForestValidParams {
            tree_count: 10,
            sample_fraction: 0.8,
            tree_params: DecisionTree::params(),
            rng,
        })
    }

    /// Sets the number of trees in the forest
    pub fn tree_count(mut self, tree_count: usize) -> Self {
        self.0.tree_count = tree_count;
        self
    }

    /// Sets the share of the training set drawn, with replacement, for every tree
    pub fn sample_fraction(mut self, sample_fraction: f64) -> Self {
        self.0.sample_fraction = sample_fraction;
        self
    }

    /// Sets the optional limit to the depth of every tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.tree_params = self.0.tree_params.max_depth(max_depth);
        self
    }

    /// Sets the minimum number of samples required to split a node of any tree
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.tree_params = self.0.tree_params.min_samples_split(min_samples_split);
        self
    }

    /// Replaces the parameters every tree is fitted with
    pub fn tree_params(mut self, tree_params: DecisionTreeParams<F, L>) -> Self {
        self.0.tree_params = tree_params;
        self
    }
}

impl<F: Float, L: Label> RandomForestClassifier<F, L> {
    /// Parameters drawing bootstrap samples from the thread-local generator, see
    /// [`RandomForestParams::new_fixed_rng`] for the defaults
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RandomForestParams<F, L, ThreadRng> {
        RandomForestParams::new()
    }
}

impl<F: Float, L, R> ParamGuard for RandomForestParams<F, L, R> {
    type Checked = RandomForestValidParams<F, L, R>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if !(self.0.sample_fraction > 0.0 && self.0.sample_fraction <= 1.0) {
            Err(Error::Parameters(format!(
                "Sample fraction should be greater than zero and less than or equal to one, but was {}",
                self.0.sample_fraction
            )))
        } else if self.0.tree_count < 1 {
            Err(Error::Parameters(format!(
                "Tree count should be at least one, but was {}",
                self.0.tree_count
            )))
        } else {
            self.0.tree_params.check_ref()?;
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn defaults() {
        let params = RandomForestClassifier::<f64, usize>::params().check_unwrap();

        assert_eq!(params.tree_count(), 10);
        assert_eq!(params.sample_fraction(), 0.8);
        assert_eq!(params.tree_params().check_ref().unwrap().max_depth(), None);
        assert_eq!(params.tree_params().check_ref().unwrap().min_samples_split(), 2);
    }

    #[test]
    fn tree_settings_are_forwarded() {
        let params = RandomForestParams::<f32, bool, _>::new_fixed_rng(SmallRng::seed_from_u64(42))
            .max_depth(Some(3))
            .min_samples_split(4)
            .check_unwrap();

        let tree_params = params.tree_params().check_ref().unwrap();
        assert_eq!(tree_params.max_depth(), Some(3));
        assert_eq!(tree_params.min_samples_split(), 4);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let params = RandomForestClassifier::<f64, usize>::params;

        assert!(matches!(params().tree_count(0).check(), Err(Error::Parameters(_))));
        for fraction in &[0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                params().sample_fraction(*fraction).check(),
                Err(Error::Parameters(_))
            ));
        }
        assert!(matches!(
            params().min_samples_split(1).check(),
            Err(Error::Parameters(_))
        ));

        assert!(params().sample_fraction(1.0).tree_count(1).check().is_ok());
    }
}
