//!
//! # Tree learning
//! `sylva-trees` provides pure Rust implementations of two tree learners:
//!
//! * an [extremely randomized regression tree](ExtraTree), which draws the feature and the
//!   threshold of every split at random and predicts the mean target of a leaf, and
//! * a [random forest](RandomForestClassifier) of [decision tree classifiers](DecisionTree), each
//!   fitted on a bootstrap sample and choosing its splits by information gain, which predicts the
//!   label most of its trees agree on.
//!
//! # The big picture
//!
//! Hyperparameters are validated through [`ParamGuard`](sylva::ParamGuard) and turned into
//! fitted models with [`Fit`](sylva::traits::Fit). Fitted models are immutable and predict with
//! [`Predict`](sylva::traits::Predict).
//!
//! Callers which want a single object with a `fit` and a `predict` call use the estimators
//! [`ExtraTreeRegressor`], [`DecisionTreeClassifier`] and [`RandomForest`] instead. They report
//! [`Error::NotFitted`](sylva::error::Error::NotFitted) when predicting before fitting and
//! [`Error::MalformedInput`](sylva::error::Error::MalformedInput) for inputs with a wrong shape.
//!
//! ```rust
//! use sylva_trees::{RandomForest, RandomForestParams};
//! use sylva::{error::Error, Estimator};
//! use ndarray::array;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let records = array![[0.0, 0.0], [0.2, 0.1], [4.0, 4.0], [4.1, 3.9]];
//! let labels = array![0, 0, 1, 1];
//!
//! let mut forest: RandomForest<f64, i32, _> =
//!     Estimator::new(RandomForestParams::new_fixed_rng(SmallRng::seed_from_u64(42)));
//! assert!(matches!(forest.predict(&records), Err(Error::NotFitted)));
//!
//! forest.fit(records.clone(), labels).unwrap();
//! assert_eq!(forest.predict(&array![[0.1, 0.0]]).unwrap().len(), 1);
//! ```

mod decision_trees;
mod random_forest;

pub use decision_trees::*;
pub use random_forest::*;

pub use sylva::error::Result;

use sylva::Estimator;

/// An extremely randomized regression tree with a `fit`/`predict` pair of calls
pub type ExtraTreeRegressor<F, R> = Estimator<ExtraTreeParams<F, R>, ExtraTree<F>>;

/// A decision tree classifier with a `fit`/`predict` pair of calls
pub type DecisionTreeClassifier<F, L> = Estimator<DecisionTreeParams<F, L>, DecisionTree<F, L>>;

/// A random forest classifier with a `fit`/`predict` pair of calls
pub type RandomForest<F, L, R> =
    Estimator<RandomForestParams<F, L, R>, RandomForestClassifier<F, L>>;
