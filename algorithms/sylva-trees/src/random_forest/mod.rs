//! Random forest classifier
//!
//! An ensemble of decision trees, each fitted on its own bootstrap sample of the training set.
//! The forest predicts the label most of its trees agree on.
mod algorithm;
mod hyperparams;

pub use algorithm::*;
pub use hyperparams::*;
