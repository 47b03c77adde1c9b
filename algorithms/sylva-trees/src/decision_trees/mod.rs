mod algorithm;
mod builder;
pub mod criteria;
mod hyperparams;
mod iter;
mod samples;
pub mod split;

pub use algorithm::*;
pub use builder::TreeBuilder;
pub use hyperparams::*;
pub use iter::*;
pub use samples::NodeSamples;
