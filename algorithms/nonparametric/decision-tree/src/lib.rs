//! Binary decision tree classifier grown by maximising information gain.
//!
//! Every internal node tests a single feature against a threshold: values strictly
//! below the threshold go left, everything else goes right. Induction is greedy and
//! unpruned; it stops at a node once no candidate split has positive gain (or the
//! optional depth limit is reached) and emits a majority-label leaf.
//!
//! Evaluating a node costs `O(features * distinct values * partition size)`, which
//! keeps this tree suited to small and moderate data sets.

use learnkit_helpers::{DataPoint, Float, Model, feature_count, majority_label};
use ndarray::ArrayView1;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Errors that can occur while growing or querying a decision tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("training data cannot be empty")]
    EmptyTrainingSet,
    #[error("expected {expected} features, found {found}")]
    MismatchedDimensions { expected: usize, found: usize },
    #[error("feature {feature} of sample {sample} is NaN")]
    NanFeature { sample: usize, feature: usize },
    #[error("the tree has not been trained")]
    NotFitted,
}

/// A node of a trained tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Node<L, F> {
    Leaf {
        label: L,
    },
    Decision {
        feature: usize,
        threshold: F,
        left: Box<Node<L, F>>,
        right: Box<Node<L, F>>,
    },
}

impl<L, F: Float> Node<L, F> {
    /// Walks from this node down to a leaf and returns its label.
    ///
    /// `features` must be long enough for every feature index on the path.
    pub fn predict(&self, features: ArrayView1<F>) -> &L {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { label } => return label,
                Node::Decision {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] < *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Number of decision levels below this node; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Decision { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Decision { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

/// Shannon entropy (base 2) of the label distribution; 0 for an empty input.
pub fn entropy<'a, L, F, I>(labels: I) -> F
where
    L: Eq + Hash + 'a,
    F: Float,
    I: IntoIterator<Item = &'a L>,
{
    // Counts are kept in first-seen order so the sum is reproducible.
    let mut slots: HashMap<&L, usize> = HashMap::new();
    let mut counts: Vec<usize> = Vec::new();
    for label in labels {
        let slot = *slots.entry(label).or_insert_with(|| {
            counts.push(0);
            counts.len() - 1
        });
        counts[slot] += 1;
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        return F::zero();
    }
    let total = F::from_count(total);
    counts.iter().fold(F::zero(), |acc, &count| {
        let p = F::from_count(count) / total;
        acc - p * p.log2()
    })
}

/// A candidate split evaluated during induction.
#[derive(Debug, Clone, Copy)]
struct Split<F> {
    feature: usize,
    threshold: F,
    gain: F,
}

/// A binary decision tree classifier.
#[derive(Debug, Clone)]
pub struct DecisionTree<L, F>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    root: Option<Node<L, F>>,
    n_features: usize,
    max_depth: Option<usize>,
}

impl<L, F> Default for DecisionTree<L, F>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<L, F> DecisionTree<L, F>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    /// Creates an untrained tree with unlimited depth.
    pub fn new() -> Self {
        Self {
            root: None,
            n_features: 0,
            max_depth: None,
        }
    }

    /// Turns every node at `depth` into a leaf. A limit of 0 yields a single leaf.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn root(&self) -> Option<&Node<L, F>> {
        self.root.as_ref()
    }

    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(Node::depth)
    }

    pub fn n_leaves(&self) -> Option<usize> {
        self.root.as_ref().map(Node::n_leaves)
    }

    /// Predicts the label of a single feature vector.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::NotFitted` before the first successful `train`, and
    /// `TreeError::MismatchedDimensions` if `features` does not match the training width.
    pub fn predict(&self, features: ArrayView1<F>) -> Result<L, TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        if features.len() != self.n_features {
            return Err(TreeError::MismatchedDimensions {
                expected: self.n_features,
                found: features.len(),
            });
        }
        Ok(root.predict(features).clone())
    }

    fn build(
        &self,
        data: &[DataPoint<L, F>],
        indices: &[usize],
        n_features: usize,
        depth: usize,
    ) -> Result<Node<L, F>, TreeError> {
        let at_limit = self.max_depth.is_some_and(|limit| depth >= limit);
        let split = if at_limit {
            None
        } else {
            best_split(data, indices, n_features)
        };

        match split {
            Some(split) if split.gain > F::zero() => {
                let (left, right): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| data[i].features[split.feature] < split.threshold);
                trace!(
                    depth,
                    feature = split.feature,
                    threshold = ?split.threshold,
                    gain = ?split.gain,
                    left = left.len(),
                    right = right.len(),
                    "split node"
                );
                Ok(Node::Decision {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: Box::new(self.build(data, &left, n_features, depth + 1)?),
                    right: Box::new(self.build(data, &right, n_features, depth + 1)?),
                })
            }
            _ => {
                let label = majority_label(indices.iter().map(|&i| &data[i].label))
                    .ok_or(TreeError::EmptyTrainingSet)?;
                Ok(Node::Leaf { label })
            }
        }
    }
}

/// Scans every feature and every midpoint between adjacent distinct values, keeping
/// the first candidate with strictly the highest gain.
fn best_split<L, F>(data: &[DataPoint<L, F>], indices: &[usize], n_features: usize) -> Option<Split<F>>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    let labels: Vec<&L> = indices.iter().map(|&i| &data[i].label).collect();
    let parent: F = entropy(labels.iter().copied());
    let two = F::constant(2.0);

    let mut best: Option<Split<F>> = None;
    for feature in 0..n_features {
        let mut values: Vec<F> = indices.iter().map(|&i| data[i].features[feature]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / two;
            let gain = information_gain(data, indices, &labels, parent, feature, threshold);
            if best.is_none_or(|b| gain > b.gain) {
                best = Some(Split {
                    feature,
                    threshold,
                    gain,
                });
            }
        }
    }
    best
}

fn information_gain<L, F>(
    data: &[DataPoint<L, F>],
    indices: &[usize],
    labels: &[&L],
    parent: F,
    feature: usize,
    threshold: F,
) -> F
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    let mut left: Vec<&L> = Vec::new();
    let mut right: Vec<&L> = Vec::new();
    for (&i, &label) in indices.iter().zip(labels) {
        if data[i].features[feature] < threshold {
            left.push(label);
        } else {
            right.push(label);
        }
    }

    let total = F::from_count(labels.len());
    let left_weight = F::from_count(left.len()) / total;
    let right_weight = F::from_count(right.len()) / total;
    let left_entropy: F = entropy(left.iter().copied());
    let right_entropy: F = entropy(right.iter().copied());
    parent - (left_weight * left_entropy + right_weight * right_entropy)
}

impl<L, F> Model<L, F> for DecisionTree<L, F>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    type Error = TreeError;

    fn train(&mut self, data: &[DataPoint<L, F>]) -> Result<(), TreeError> {
        if data.is_empty() {
            return Err(TreeError::EmptyTrainingSet);
        }
        let n_features = feature_count(data)
            .map_err(|(expected, found)| TreeError::MismatchedDimensions { expected, found })?;
        for (sample, dp) in data.iter().enumerate() {
            if let Some(feature) = dp.features.iter().position(|v| v.is_nan()) {
                return Err(TreeError::NanFeature { sample, feature });
            }
        }

        let indices: Vec<usize> = (0..data.len()).collect();
        let root = self.build(data, &indices, n_features, 0)?;
        debug!(
            samples = data.len(),
            depth = root.depth(),
            leaves = root.n_leaves(),
            "grew decision tree"
        );
        self.root = Some(root);
        self.n_features = n_features;
        Ok(())
    }

    fn test(&self, data: &[DataPoint<L, F>]) -> Result<Vec<L>, TreeError> {
        if self.root.is_none() {
            return Err(TreeError::NotFitted);
        }
        data.iter().map(|dp| self.predict(dp.features.view())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn one_feature(points: &[(f64, i32)]) -> Vec<DataPoint<i32, f64>> {
        points
            .iter()
            .map(|&(x, label)| DataPoint::new(array![x], label))
            .collect()
    }

    fn trained(data: &[DataPoint<i32, f64>]) -> DecisionTree<i32, f64> {
        let mut tree = DecisionTree::new();
        tree.train(data).unwrap();
        tree
    }

    #[test]
    fn test_entropy_single_label_is_zero() {
        assert_eq!(entropy::<_, f64, _>(&[1, 1, 1]), 0.0);
    }

    #[test]
    fn test_entropy_even_binary_split_is_one() {
        assert_abs_diff_eq!(entropy::<_, f64, _>(&[0, 1, 0, 1, 1, 0]), 1.0);
    }

    #[test]
    fn test_entropy_empty_is_zero() {
        let empty: [i32; 0] = [];
        assert_eq!(entropy::<_, f64, _>(&empty), 0.0);
    }

    #[test]
    fn test_entropy_four_even_classes() {
        assert_abs_diff_eq!(entropy::<_, f64, _>(&["a", "b", "c", "d"]), 2.0);
    }

    #[test]
    fn test_separable_single_feature_gives_depth_one() {
        let data: Vec<_> = (0..=10)
            .map(|x| DataPoint::new(array![x as f64], if x >= 5 { 1 } else { 0 }))
            .collect();
        let tree = trained(&data);

        assert_eq!(tree.depth(), Some(1));
        assert_eq!(tree.n_leaves(), Some(2));
        match tree.root() {
            Some(Node::Decision { feature, threshold, .. }) => {
                assert_eq!(*feature, 0);
                assert_abs_diff_eq!(*threshold, 4.5);
            }
            other => panic!("expected a decision root, got {:?}", other),
        }

        let predictions = tree.test(&data).unwrap();
        let expected: Vec<i32> = data.iter().map(|dp| dp.label).collect();
        assert_eq!(predictions, expected);
    }

    #[test]
    fn test_threshold_routes_equal_values_right() {
        let tree = trained(&one_feature(&[(0.0, 0), (1.0, 1)]));
        assert_eq!(tree.predict(array![0.5].view()).unwrap(), 1);
        assert_eq!(tree.predict(array![0.4999].view()).unwrap(), 0);
    }

    #[test]
    fn test_pure_labels_give_single_leaf() {
        let tree = trained(&one_feature(&[(0.0, 1), (3.0, 1), (7.0, 1)]));
        assert_eq!(tree.root(), Some(&Node::Leaf { label: 1 }));
        assert_eq!(tree.depth(), Some(0));
    }

    #[test]
    fn test_indistinguishable_points_use_majority() {
        let tree = trained(&one_feature(&[(2.0, 0), (2.0, 1), (2.0, 1)]));
        assert_eq!(tree.root(), Some(&Node::Leaf { label: 1 }));

        // A tie falls back to the label seen first.
        let tree = trained(&one_feature(&[(2.0, 1), (2.0, 0)]));
        assert_eq!(tree.root(), Some(&Node::Leaf { label: 1 }));
    }

    #[test]
    fn test_equal_gain_prefers_lowest_feature() {
        let data = vec![
            DataPoint::new(array![0.0, 0.0], 0),
            DataPoint::new(array![1.0, 1.0], 0),
            DataPoint::new(array![2.0, 2.0], 1),
            DataPoint::new(array![3.0, 3.0], 1),
        ];
        let tree = trained(&data);
        assert!(matches!(
            tree.root(),
            Some(Node::Decision { feature: 0, .. })
        ));
    }

    #[test]
    fn test_equal_gain_prefers_lowest_threshold() {
        // Splitting at 0.5 and at 2.5 both isolate one pure label 0.
        let tree = trained(&one_feature(&[(0.0, 0), (1.0, 1), (2.0, 1), (3.0, 0)]));
        assert!(matches!(
            tree.root(),
            Some(Node::Decision { feature: 0, threshold, .. }) if *threshold == 0.5
        ));
    }

    #[test]
    fn test_nested_intervals_fit_training_set() {
        let data: Vec<_> = (0..10)
            .map(|x| DataPoint::new(array![x as f64], if (3..6).contains(&x) { 1 } else { 0 }))
            .collect();
        let tree = trained(&data);
        assert_eq!(tree.depth(), Some(2));
        let expected: Vec<i32> = data.iter().map(|dp| dp.label).collect();
        assert_eq!(tree.test(&data).unwrap(), expected);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let data: Vec<_> = (0..10)
            .map(|x| DataPoint::new(array![x as f64], if (3..6).contains(&x) { 1 } else { 0 }))
            .collect();

        let mut stump = DecisionTree::new().with_max_depth(1);
        stump.train(&data).unwrap();
        assert_eq!(stump.depth(), Some(1));

        let mut leaf = DecisionTree::new().with_max_depth(0);
        leaf.train(&data).unwrap();
        assert_eq!(leaf.root(), Some(&Node::Leaf { label: 0 }));
    }

    #[test]
    fn test_errors() {
        let tree: DecisionTree<i32, f64> = DecisionTree::new();
        assert_eq!(tree.predict(array![1.0].view()), Err(TreeError::NotFitted));
        assert_eq!(tree.test(&one_feature(&[(1.0, 0)])), Err(TreeError::NotFitted));
        assert_eq!(tree.test(&one_feature(&[])), Err(TreeError::NotFitted));

        let mut tree = DecisionTree::new();
        assert_eq!(tree.train(&one_feature(&[])), Err(TreeError::EmptyTrainingSet));

        let ragged = vec![
            DataPoint::new(array![1.0, 2.0], 0),
            DataPoint::new(array![1.0], 1),
        ];
        assert_eq!(
            tree.train(&ragged),
            Err(TreeError::MismatchedDimensions { expected: 2, found: 1 })
        );

        let nan = one_feature(&[(1.0, 0), (f64::NAN, 1)]);
        assert_eq!(tree.train(&nan), Err(TreeError::NanFeature { sample: 1, feature: 0 }));
    }

    #[test]
    fn test_predict_checks_width() {
        let tree = trained(&one_feature(&[(0.0, 0), (1.0, 1)]));
        assert_eq!(
            tree.predict(array![0.0, 1.0].view()),
            Err(TreeError::MismatchedDimensions { expected: 1, found: 2 })
        );
    }

    #[test]
    fn test_failed_retrain_keeps_previous_tree() {
        let mut tree = trained(&one_feature(&[(0.0, 0), (1.0, 1)]));
        assert!(tree.train(&one_feature(&[])).is_err());
        assert_eq!(tree.predict(array![2.0].view()).unwrap(), 1);
    }

    #[test]
    fn test_retrain_replaces_tree() {
        let mut tree = trained(&one_feature(&[(0.0, 0), (1.0, 1)]));
        tree.train(&one_feature(&[(0.0, 1), (1.0, 1)])).unwrap();
        assert_eq!(tree.depth(), Some(0));
        assert_eq!(tree.predict(array![0.0].view()).unwrap(), 1);
    }
}
