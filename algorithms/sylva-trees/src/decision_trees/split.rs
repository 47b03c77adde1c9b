//! Split selection policies
//!
//! A policy looks at the observations of a node and proposes a `(feature, threshold)` pair, the
//! [`TreeBuilder`](super::TreeBuilder) then decides whether the proposal is applied.
use std::collections::HashMap;

use rand::Rng;
use sylva::{Float, Label};

use super::criteria::information_gain;
use super::NodeSamples;

/// A proposed split of a node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitCandidate<F> {
    /// Index of the feature the node is split on
    pub feature_idx: usize,
    /// Observations with `x[feature_idx] <= threshold` go to the left child
    pub threshold: F,
    /// Information gain of the split, `None` for policies which do not score their proposals
    pub gain: Option<F>,
}

/// Proposes the split of a node
pub trait SplitPolicy<F, T> {
    /// Returns the proposed split or `None` if the policy cannot propose any
    fn find_split(&mut self, samples: &NodeSamples<F, T>) -> Option<SplitCandidate<F>>;
}

/// Extremely randomized splits
///
/// The feature is chosen uniformly among all features and the threshold uniformly between the
/// smallest and the largest value of that feature in the node, both ends included. The proposal
/// is never scored, so a split may route every observation to one side. No split is proposed
/// when the range of the chosen feature is not finite, as for features holding infinite or NaN
/// values only.
#[derive(Clone, Debug)]
pub struct RandomSplit<R> {
    rng: R,
}

impl<R: Rng> RandomSplit<R> {
    pub fn new(rng: R) -> Self {
        RandomSplit { rng }
    }
}

impl<F: Float, T, R: Rng> SplitPolicy<F, T> for RandomSplit<R> {
    fn find_split(&mut self, samples: &NodeSamples<F, T>) -> Option<SplitCandidate<F>> {
        if samples.nfeatures() == 0 {
            return None;
        }

        let feature_idx = self.rng.gen_range(0..samples.nfeatures());
        let (min, max) = samples.feature_range(feature_idx)?;
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        // interpolate instead of sampling `min..=max` directly, whose width may overflow
        let u = self.rng.gen_range(F::zero()..=F::one());
        let mut threshold = min + u * (max - min);
        if !threshold.is_finite() {
            threshold = min * (F::one() - u) + max * u;
        }
        let threshold = threshold.max(min).min(max);

        Some(SplitCandidate {
            feature_idx,
            threshold,
            gain: None,
        })
    }
}

/// Splits which maximize the information gain
///
/// Every distinct value of every feature is a threshold candidate. Features are visited in index
/// order and thresholds in ascending order, a candidate replaces the best one only if its gain is
/// strictly larger. The largest value of a feature routes everything to the left child and
/// therefore has a gain of exactly zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestSplit;

impl<F: Float, L: Label> SplitPolicy<F, L> for BestSplit {
    fn find_split(&mut self, samples: &NodeSamples<F, L>) -> Option<SplitCandidate<F>> {
        // number the classes of this node in order of their first occurrence
        let mut classes: HashMap<&L, usize> = HashMap::new();
        let mut parent_counts = Vec::new();
        for label in samples.targets() {
            let class = *classes.entry(label).or_insert_with(|| {
                parent_counts.push(0);
                parent_counts.len() - 1
            });
            parent_counts[class] += 1;
        }

        let mut best: Option<SplitCandidate<F>> = None;
        let mut best_gain = F::neg_infinity();

        for feature_idx in 0..samples.nfeatures() {
            let sorted = samples.sorted_by_feature(feature_idx);

            // Start with every observation on the right and move them to the left, one distinct
            // value at a time, so that equal values always end up on the same side.
            let mut left_counts = vec![0; parent_counts.len()];
            let mut right_counts = parent_counts.clone();

            let mut start = 0;
            while start < sorted.len() {
                let threshold = sorted[start].1;
                let mut end = start + 1;
                while end < sorted.len() && sorted[end].1 == threshold {
                    end += 1;
                }

                for &(row, _) in &sorted[start..end] {
                    let class = classes[samples.target_of(row)];
                    left_counts[class] += 1;
                    right_counts[class] -= 1;
                }

                let gain = information_gain(&parent_counts, &left_counts, &right_counts);
                if gain > best_gain {
                    best_gain = gain;
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold,
                        gain: Some(gain),
                    });
                }

                start = end;
            }
        }

        best
    }
}
