//! Error types in sylva
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("malformed input {0}")]
    MalformedInput(String),
    #[error("model is not fitted, call `fit` before `predict`")]
    NotFitted,
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
