use super::{Dataset, DatasetBase, DatasetView, Records};
use crate::error::{Error, Result};
use ndarray::{ArrayBase, Axis, Data, Ix1, Ix2};
use rand::Rng;

/// Implementation without constraints on records and targets
///
/// This implementation block provides methods for the creation and accession of datasets.
impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dataset = Dataset::new(records, targets);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase { records, targets }
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Updates the targets of a dataset
    pub fn with_targets<U>(self, targets: U) -> DatasetBase<R, U> {
        DatasetBase {
            records: self.records,
            targets,
        }
    }
}

impl<F, L, D, S> DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>
where
    D: Data<Elem = F>,
    S: Data<Elem = L>,
{
    /// Checks that the dataset can be used for training
    ///
    /// A trainable dataset has at least one sample, at least one feature and exactly one
    /// target per sample.
    pub fn check_shape(&self) -> Result<()> {
        let (nsamples, nfeatures) = self.records.dim();

        if nsamples == 0 {
            return Err(Error::MalformedInput(
                "dataset must contain at least one sample".into(),
            ));
        }
        if nfeatures == 0 {
            return Err(Error::MalformedInput(
                "dataset must contain at least one feature".into(),
            ));
        }
        if self.targets.len() != nsamples {
            return Err(Error::MalformedInput(format!(
                "number of targets ({}) does not match number of samples ({})",
                self.targets.len(),
                nsamples
            )));
        }

        Ok(())
    }

    /// Creates a view of the dataset
    pub fn view(&self) -> DatasetView<'_, F, L> {
        DatasetBase::new(self.records.view(), self.targets.view())
    }
}

impl<F: Clone, L: Clone, D, S> DatasetBase<ArrayBase<D, Ix2>, ArrayBase<S, Ix1>>
where
    D: Data<Elem = F>,
    S: Data<Elem = L>,
{
    /// Collects the samples at `indices` into a new owned dataset
    ///
    /// Indices may repeat, in which case the sample is copied several times.
    pub fn select(&self, indices: &[usize]) -> Dataset<F, L> {
        DatasetBase::new(
            self.records.select(Axis(0), indices),
            self.targets.select(Axis(0), indices),
        )
    }

    /// Draws bootstrap samples from the dataset
    ///
    /// Every item of the returned iterator is a dataset of `num_samples` samples drawn
    /// uniformly and with replacement from this dataset. The iterator is infinite.
    ///
    /// ### Parameters
    ///
    /// * `num_samples`: the number of samples per bootstrap dataset
    /// * `rng`: the random number generator used to draw the sample indices
    pub fn bootstrap_samples<'b, R: Rng>(
        &'b self,
        num_samples: usize,
        rng: &'b mut R,
    ) -> impl Iterator<Item = Dataset<F, L>> + 'b {
        std::iter::repeat(()).map(move |_| {
            let indices = bootstrap_indices(self.nsamples(), num_samples, rng);
            self.select(&indices)
        })
    }
}

/// Draws `num_samples` row indices from `0..nrows` uniformly and with replacement
///
/// Returns an empty vector when there are no rows to draw from.
pub fn bootstrap_indices<R: Rng>(nrows: usize, num_samples: usize, rng: &mut R) -> Vec<usize> {
    if nrows == 0 {
        return Vec::new();
    }

    (0..num_samples).map(|_| rng.gen_range(0..nrows)).collect()
}
