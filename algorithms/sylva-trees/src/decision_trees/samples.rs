use std::cmp::Ordering;

use ndarray::{ArrayView1, ArrayView2};
use sylva::Float;

/// The observations which reach a node of the tree
///
/// The decision tree algorithm splits observations at a certain split value for a specific
/// feature. The left and right children can then only use a subset of the observations. Instead
/// of copying records at every level, a node keeps the indices of its observations into the
/// training records and targets, in the order in which they appear in the training set.
#[derive(Debug, Clone)]
pub struct NodeSamples<'a, F, T> {
    records: ArrayView2<'a, F>,
    targets: ArrayView1<'a, T>,
    rows: Vec<usize>,
}

impl<'a, F: Float, T> NodeSamples<'a, F, T> {
    /// Creates the sample set of the root node, containing every observation
    ///
    /// ### Panics
    ///
    /// If the number of records and targets differ
    pub fn all(records: ArrayView2<'a, F>, targets: ArrayView1<'a, T>) -> Self {
        assert_eq!(
            records.nrows(),
            targets.len(),
            "The number of records must match the number of targets."
        );

        let rows = (0..records.nrows()).collect();
        NodeSamples {
            records,
            targets,
            rows,
        }
    }

    fn with_rows(&self, rows: Vec<usize>) -> Self {
        NodeSamples {
            records: self.records,
            targets: self.targets,
            rows,
        }
    }

    /// Number of observations in the node
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of features of every observation
    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }

    /// Indices of the observations into the training set
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Values of feature `feature_idx` for every observation in the node
    pub fn feature_values(
        &self,
        feature_idx: usize,
    ) -> impl Iterator<Item = F> + use<'_, 'a, F, T> {
        self.rows
            .iter()
            .map(move |&row| self.records[(row, feature_idx)])
    }

    /// Targets of every observation in the node
    pub fn targets(&self) -> impl Iterator<Item = &T> + use<'_, 'a, F, T> {
        self.rows.iter().map(move |&row| &self.targets[row])
    }

    /// Smallest and largest value of feature `feature_idx`, `None` for an empty node
    pub fn feature_range(&self, feature_idx: usize) -> Option<(F, F)> {
        self.feature_values(feature_idx).fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
    }

    /// Pairs of (training set index, feature value), sorted by the value of `feature_idx`
    ///
    /// The sort is stable, so observations with equal values keep their training set order.
    pub fn sorted_by_feature(&self, feature_idx: usize) -> Vec<(usize, F)> {
        let mut pairs: Vec<(usize, F)> = self
            .rows
            .iter()
            .map(|&row| (row, self.records[(row, feature_idx)]))
            .collect();
        pairs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        pairs
    }

    /// Target of the observation with training set index `row`
    pub fn target_of(&self, row: usize) -> &T {
        &self.targets[row]
    }

    /// Returns true if all observations share the same target
    pub fn is_pure(&self) -> bool
    where
        T: PartialEq,
    {
        let mut targets = self.targets();
        match targets.next() {
            Some(first) => targets.all(|target| target == first),
            None => true,
        }
    }

    /// Splits the observations with the routing rule of the tree
    ///
    /// Observations with `x[feature_idx] <= threshold` go to the left node, all others go to the
    /// right node. Either side may be empty.
    pub fn partition(&self, feature_idx: usize, threshold: F) -> (Self, Self) {
        let (left, right): (Vec<usize>, Vec<usize>) = self
            .rows
            .iter()
            .partition(|&&row| self.records[(row, feature_idx)] <= threshold);

        (self.with_rows(left), self.with_rows(right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn partition_is_disjoint_and_complete() {
        let records = array![[1.0, 5.0], [3.0, 2.0], [2.0, 2.0], [4.0, 1.0]];
        let targets = array![0usize, 1, 0, 1];
        let samples = NodeSamples::all(records.view(), targets.view());

        let (left, right) = samples.partition(0, 2.0);
        assert_eq!(left.rows(), &[0, 2]);
        assert_eq!(right.rows(), &[1, 3]);
        assert_eq!(left.len() + right.len(), samples.len());

        // the threshold itself routes left
        let (left, right) = samples.partition(1, 2.0);
        assert_eq!(left.rows(), &[1, 2, 3]);
        assert_eq!(right.rows(), &[0]);
    }

    #[test]
    fn purity_and_ranges() {
        let records = array![[1.0], [7.0], [-2.0]];
        let pure = array![3usize, 3, 3];
        let mixed = array![3usize, 3, 4];

        let samples = NodeSamples::all(records.view(), pure.view());
        assert!(samples.is_pure());
        assert_eq!(samples.feature_range(0), Some((-2.0, 7.0)));

        let samples = NodeSamples::all(records.view(), mixed.view());
        assert!(!samples.is_pure());

        let (empty, _) = samples.partition(0, -10.0);
        assert!(empty.is_empty());
        assert!(empty.is_pure());
        assert_eq!(empty.feature_range(0), None);
    }

    #[test]
    fn sorted_by_feature_is_stable() {
        let records = array![[2.0], [1.0], [2.0], [0.5]];
        let targets = array![0usize, 1, 2, 3];
        let samples = NodeSamples::all(records.view(), targets.view());

        let sorted = samples.sorted_by_feature(0);
        assert_eq!(sorted, vec![(3, 0.5), (1, 1.0), (0, 2.0), (2, 2.0)]);
    }
}
