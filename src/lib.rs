//! `sylva` provides the shared foundation of the sylva tree learners.
//!
//! The algorithms themselves live in their own crates (see `sylva-trees`), while this crate
//! defines what they have in common:
//!
//! * [`Dataset`]: records stored as an `Array2` together with one target per record
//! * the [`Float`] and [`Label`] bounds for features and class labels
//! * the [`Fit`](traits::Fit) and [`Predict`](traits::Predict) traits which turn
//!   hyperparameters into models and models into predictions
//! * [`ParamGuard`], which validates hyperparameters before fitting
//! * [`Estimator`], a stateful wrapper with a `fit`/`predict` pair of calls
//! * a single [`Error`](error::Error) type
//!
//! Hyperparameters are checked, fitted and then used read-only:
//!
//! ```ignore
//! use sylva::prelude::*;
//!
//! let model = params.fit(&dataset)?;
//! let predictions = model.predict(dataset.records());
//! ```

pub mod benchmarks;
pub mod dataset;
pub mod error;
pub mod estimator;
pub mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float, Label};
pub use estimator::Estimator;
pub use param_guard::ParamGuard;
