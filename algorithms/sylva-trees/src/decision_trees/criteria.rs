//! Impurity measures and the summaries stored in leaves
//!
use std::collections::HashMap;

use sylva::{Float, Label};

/// Given the class counts of a subset calculates its entropy in bits.
///
/// Classes with a count of zero do not contribute (`0 * log2(0) = 0`) and the entropy of an
/// empty subset is zero.
pub fn entropy<F: Float>(class_counts: &[usize]) -> F {
    let n_samples: usize = class_counts.iter().sum();
    if n_samples == 0 {
        return F::zero();
    }
    let n_samples = F::cast(n_samples);

    class_counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| F::cast(count) / n_samples)
        .map(|p| -p * p.log2())
        .sum()
}

/// Information gain of splitting `parent` into `left` and `right`
///
/// All three arguments are class counts indexed by the same classes. The gain is the entropy of
/// the parent minus the entropies of both children, weighted by their share of the parent.
pub fn information_gain<F: Float>(parent: &[usize], left: &[usize], right: &[usize]) -> F {
    let n_parent: usize = parent.iter().sum();
    if n_parent == 0 {
        return F::zero();
    }

    let n_parent = F::cast(n_parent);
    let w_left = F::cast(left.iter().sum::<usize>()) / n_parent;
    let w_right = F::cast(right.iter().sum::<usize>()) / n_parent;

    entropy::<F>(parent) - w_left * entropy::<F>(left) - w_right * entropy::<F>(right)
}

/// Counts how often every label occurs
///
/// Labels are numbered in the order of their first occurrence, the returned vector holds the
/// count of the i-th label found.
pub fn class_counts<'a, L: Label + 'a, I: IntoIterator<Item = &'a L>>(labels: I) -> Vec<usize> {
    let mut classes: HashMap<&L, usize> = HashMap::new();
    let mut counts = Vec::new();

    for label in labels {
        let class = *classes.entry(label).or_insert_with(|| {
            counts.push(0);
            counts.len() - 1
        });
        counts[class] += 1;
    }

    counts
}

/// Finds the most frequent label. If two labels occur equally often then the label seen first
/// is returned, `None` if there are no labels at all.
pub fn majority_vote<'a, L: Label + 'a, I: IntoIterator<Item = &'a L>>(labels: I) -> Option<L> {
    let mut classes: HashMap<&L, usize> = HashMap::new();
    let mut votes: Vec<(&L, usize)> = Vec::new();

    for label in labels {
        let class = *classes.entry(label).or_insert_with(|| {
            votes.push((label, 0));
            votes.len() - 1
        });
        votes[class].1 += 1;
    }

    votes
        .into_iter()
        .fold(None, |best: Option<(&L, usize)>, (label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label.clone())
}

/// Arithmetic mean of the values, `None` if there are none
pub fn mean<'a, F: Float, I: IntoIterator<Item = &'a F>>(values: I) -> Option<F> {
    let (sum, count) = values
        .into_iter()
        .fold((F::zero(), 0usize), |(sum, count), &value| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / F::cast(count))
    }
}

/// Turns the targets which reach a leaf into the prediction of the leaf
pub trait LeafValue<T> {
    /// Summarizes the targets, `None` when there are no targets
    fn leaf_value<'a, I>(targets: I) -> Option<T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a;
}

/// Leaves predict the mean of their targets (regression)
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanValue;

/// Leaves predict the most frequent of their labels (classification)
#[derive(Clone, Copy, Debug, Default)]
pub struct MajorityLabel;

impl<F: Float> LeafValue<F> for MeanValue {
    fn leaf_value<'a, I>(targets: I) -> Option<F>
    where
        I: IntoIterator<Item = &'a F>,
        F: 'a,
    {
        mean(targets)
    }
}

impl<L: Label> LeafValue<L> for MajorityLabel {
    fn leaf_value<'a, I>(targets: I) -> Option<L>
    where
        I: IntoIterator<Item = &'a L>,
        L: 'a,
    {
        majority_vote(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn entropy_example() {
        // Class 0 occurs 75% of the time
        // Class 1 occurs 25% of the time
        // Class 2 occurs 0% of the time
        // Entropy is -0.75*log2(0.75) - 0.25*log2(0.25) - 0*log2(0) = 0.81127812
        assert_abs_diff_eq!(entropy::<f64>(&[6, 2, 0]), 0.81127, epsilon = 1e-5);

        // A fair coin carries one bit
        assert_abs_diff_eq!(entropy::<f64>(&[4, 4]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn entropy_of_single_class_is_zero() {
        assert_eq!(entropy::<f64>(&[8]), 0.0);
        assert_eq!(entropy::<f32>(&[8, 0, 0]), 0.0);
        assert_eq!(entropy::<f64>(&[]), 0.0);
    }

    #[test]
    fn information_gain_of_perfect_split() {
        let gain: f64 = information_gain(&[2, 2], &[2, 0], &[0, 2]);
        assert_abs_diff_eq!(gain, 1.0, epsilon = 1e-12);

        // a split on a pure parent never gains anything
        let gain: f64 = information_gain(&[4], &[1], &[3]);
        assert!(gain <= 0.0);

        // moving everything to one side keeps the parent entropy exactly
        let gain: f64 = information_gain(&[3, 5], &[3, 5], &[0, 0]);
        assert_eq!(gain, 0.0);
    }

    #[test]
    fn class_counts_follow_first_occurrence() {
        let labels = ["b", "a", "b", "c", "b"];
        assert_eq!(class_counts(labels.iter()), vec![3, 1, 1]);
    }

    #[test]
    fn majority_vote_breaks_ties_by_first_label() {
        assert_eq!(majority_vote(&[0usize, 0, 0, 0, 0, 0, 1, 1]), Some(0));
        assert_eq!(majority_vote(&["a", "a", "b"]), Some("a"));
        assert_eq!(majority_vote(&[2usize, 1, 1, 2]), Some(2));
        assert_eq!(majority_vote(&[1usize, 2, 2, 1]), Some(1));
        assert_eq!(majority_vote::<usize, _>(&[]), None);
    }

    #[test]
    fn mean_and_leaf_values() {
        assert_abs_diff_eq!(mean(&[1.0, 2.0, 6.0]).unwrap(), 3.0);
        assert_eq!(mean::<f64, _>(&[]), None);

        assert_abs_diff_eq!(MeanValue::leaf_value(&[2.0f32, 4.0]).unwrap(), 3.0);
        assert_eq!(MajorityLabel::leaf_value(&[true, false, false]), Some(false));
    }
}
