//! Stateful estimators
//!
//! Hyperparameters in sylva are turned into models by [`Fit`], so a model which was never fitted
//! cannot be used for prediction. Callers which prefer a single object with a `fit` and a
//! `predict` call use an [`Estimator`] instead. It owns the hyperparameters together with the
//! model fitted last, and reports [`Error::NotFitted`] when `predict` runs before `fit`.

use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};

use crate::dataset::DatasetBase;
use crate::error::{Error, Result};
use crate::traits::{FeatureCount, Fit, Predict, PredictInplace};

/// Hyperparameters paired with an optional fitted model
///
/// ### Example
///
/// ```ignore
/// let mut estimator = Estimator::new(DecisionTree::params().max_depth(Some(3)));
/// assert!(matches!(estimator.predict(&records), Err(Error::NotFitted)));
///
/// estimator.fit(records.clone(), labels)?;
/// let predictions = estimator.predict(&records)?;
/// ```
#[derive(Debug, Clone)]
pub struct Estimator<P, M> {
    params: P,
    model: Option<M>,
}

impl<P, M> Estimator<P, M> {
    /// Creates an unfitted estimator
    pub fn new(params: P) -> Self {
        Estimator {
            params,
            model: None,
        }
    }

    /// Returns the hyperparameters of the estimator
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Returns the fitted model, `None` before the first successful `fit`
    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Fits the model on `records` and `targets`, replacing any previously fitted model
    ///
    /// On failure the estimator is left unfitted.
    pub fn fit<F, T>(&mut self, records: Array2<F>, targets: Array1<T>) -> Result<()>
    where
        P: Fit<Array2<F>, Array1<T>, Error, Object = M>,
    {
        self.model = None;

        let dataset = DatasetBase::new(records, targets);
        dataset.check_shape()?;

        self.model = Some(self.params.fit(&dataset)?);
        Ok(())
    }

    /// Predicts one target per row of `x`, in row order
    ///
    /// Fails with [`Error::NotFitted`] before `fit` and with [`Error::MalformedInput`] when `x`
    /// has no rows or a different number of columns than the training records.
    pub fn predict<F, T, D>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array1<T>>
    where
        D: Data<Elem = F>,
        M: PredictInplace<ArrayBase<D, Ix2>, Array1<T>> + FeatureCount,
    {
        let model = self.model.as_ref().ok_or(Error::NotFitted)?;

        if x.nrows() == 0 {
            return Err(Error::MalformedInput(
                "prediction input must contain at least one sample".into(),
            ));
        }
        if x.ncols() != model.nfeatures() {
            return Err(Error::MalformedInput(format!(
                "expected {} features, got {}",
                model.nfeatures(),
                x.ncols()
            )));
        }

        Ok(model.predict(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Records;
    use crate::param_guard::ParamGuard;
    use ndarray::{array, Array1, Array2};

    /// Predicts the mean target seen during fitting, shifted by `offset`
    struct MeanValidParams {
        offset: f64,
    }

    struct MeanParams(MeanValidParams);

    struct MeanModel {
        mean: f64,
        nfeatures: usize,
    }

    impl MeanParams {
        fn new(offset: f64) -> Self {
            MeanParams(MeanValidParams { offset })
        }
    }

    impl ParamGuard for MeanParams {
        type Checked = MeanValidParams;
        type Error = Error;

        fn check_ref(&self) -> Result<&Self::Checked> {
            if self.0.offset.is_finite() {
                Ok(&self.0)
            } else {
                Err(Error::Parameters("offset must be finite".into()))
            }
        }

        fn check(self) -> Result<Self::Checked> {
            self.check_ref()?;
            Ok(self.0)
        }
    }

    impl Fit<Array2<f64>, Array1<f64>, Error> for MeanValidParams {
        type Object = MeanModel;

        fn fit(&self, dataset: &DatasetBase<Array2<f64>, Array1<f64>>) -> Result<MeanModel> {
            let mean = dataset.targets().mean().unwrap_or(0.0) + self.offset;
            Ok(MeanModel {
                mean,
                nfeatures: dataset.nfeatures(),
            })
        }
    }

    impl FeatureCount for MeanModel {
        fn nfeatures(&self) -> usize {
            self.nfeatures
        }
    }

    impl<D: Data<Elem = f64>> PredictInplace<ArrayBase<D, Ix2>, Array1<f64>> for MeanModel {
        fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<f64>) {
            assert_eq!(x.nrows(), y.len());
            y.fill(self.mean);
        }

        fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<f64> {
            Array1::zeros(x.nrows())
        }
    }

    #[test]
    fn predict_before_fit_fails() {
        let estimator: Estimator<MeanParams, MeanModel> = Estimator::new(MeanParams::new(0.0));

        assert!(!estimator.is_fitted());
        assert!(estimator.model().is_none());
        assert_eq!(estimator.params().0.offset, 0.0);
        let result: Result<Array1<f64>> = estimator.predict(&array![[1.0, 2.0]]);
        assert!(matches!(result, Err(Error::NotFitted)));
    }

    #[test]
    fn fit_then_predict() -> Result<()> {
        let mut estimator = Estimator::new(MeanParams::new(1.0));
        estimator.fit(array![[0.0, 1.0], [2.0, 3.0]], array![1.0, 3.0])?;

        assert!(estimator.is_fitted());
        assert_eq!(estimator.predict(&array![[5.0, 5.0]])?, array![3.0]);

        let model = estimator.model().unwrap();
        assert_eq!(model.mean, 3.0);
        assert_eq!(model.nfeatures, 2);
        assert_eq!(estimator.params().0.offset, 1.0);

        Ok(())
    }

    #[test]
    fn malformed_inputs_are_rejected() -> Result<()> {
        let mut estimator = Estimator::new(MeanParams::new(0.0));

        let empty = estimator.fit(Array2::<f64>::zeros((0, 2)), Array1::<f64>::zeros(0));
        assert!(matches!(empty, Err(Error::MalformedInput(_))));

        let mismatch = estimator.fit(array![[0.0], [1.0]], array![1.0]);
        assert!(matches!(mismatch, Err(Error::MalformedInput(_))));
        assert!(!estimator.is_fitted());

        estimator.fit(array![[0.0, 1.0], [2.0, 3.0]], array![1.0, 3.0])?;
        let wrong_columns: Result<Array1<f64>> = estimator.predict(&array![[1.0, 2.0, 3.0]]);
        assert!(matches!(wrong_columns, Err(Error::MalformedInput(_))));

        let no_rows: Result<Array1<f64>> = estimator.predict(&Array2::<f64>::zeros((0, 2)));
        assert!(matches!(no_rows, Err(Error::MalformedInput(_))));

        Ok(())
    }

    #[test]
    fn invalid_parameters_surface_from_fit() {
        let mut estimator = Estimator::new(MeanParams::new(f64::INFINITY));

        let result = estimator.fit(array![[0.0]], array![1.0]);
        assert!(matches!(result, Err(Error::Parameters(_))));
        assert!(!estimator.is_fitted());
    }
}
