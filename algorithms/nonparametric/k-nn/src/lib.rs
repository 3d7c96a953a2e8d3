use learnkit_helpers::{DataPoint, Distance, DistanceError, Float, Model, majority_label};
use ndarray::ArrayView1;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when using the k-NN classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnnError {
    /// k cannot be zero for a k-NN classifier
    #[error("k must be greater than 0")]
    InvalidK,
    /// Cannot train on, or predict with, an empty training set
    #[error("training data cannot be empty")]
    EmptyTrainingSet,
    /// `test` was called without any examples
    #[error("test examples cannot be empty")]
    EmptyTestSet,
    /// The query point has no features
    #[error("features cannot be empty")]
    EmptyFeatures,
    /// Invalid distance comparison (likely due to NaN values in data)
    #[error("invalid distance comparison (likely due to NaN values in data)")]
    InvalidDistance,
    #[error(transparent)]
    Distance(#[from] DistanceError),
}

/// A k-Nearest Neighbors (k-NN) classifier.
///
/// This classifier predicts the label of a new data point by finding the `k`
/// most similar points in its training set and taking a majority vote among their labels.
///
/// # Type Parameters
///
/// * `L`: The type of the label (e.g., `i32`, `String`, or a custom `enum`).
/// * `F`: The float type for the features (e.g., `f32`, `f64`).
/// * `D`: The distance metric, which must implement the `learnkit_helpers::Distance` trait.
#[derive(Debug, Clone)]
pub struct KnnClassifier<L, F, D>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    k: usize,
    training_data: Vec<DataPoint<L, F>>,
    distance: D,
}

impl<L, F, D> KnnClassifier<L, F, D>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    /// Creates a new, untrained k-NN classifier.
    ///
    /// # Arguments
    ///
    /// * `k`: The number of neighbors to consider for classification. Must be greater than 0.
    /// * `distance`: An instance of a struct that implements the `Distance` trait (e.g., `L2Dist`).
    ///
    /// # Errors
    ///
    /// Returns `KnnError::InvalidK` if `k` is 0, as this is not a valid configuration.
    pub fn new(k: usize, distance: D) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK);
        }
        Ok(Self {
            k,
            training_data: Vec::new(),
            distance,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn training_data(&self) -> &[DataPoint<L, F>] {
        &self.training_data
    }

    /// Predicts the label for a new, unseen data point.
    ///
    /// # Arguments
    ///
    /// * `features`: An `ArrayView1` containing the features of the point to classify.
    ///
    /// # Returns
    ///
    /// Returns the predicted label `L` on success. When several labels share the highest
    /// vote count, the one whose nearest neighbor is closest wins.
    ///
    /// # Errors
    ///
    /// Returns `KnnError::EmptyTrainingSet` if the classifier has not been trained.
    /// Returns `KnnError::EmptyFeatures` if `features` is empty.
    /// Returns `KnnError::InvalidDistance` if distance comparison fails (e.g., due to NaN values).
    /// Returns `KnnError::Distance` if the metric rejects the pair of vectors.
    pub fn predict(&self, features: ArrayView1<F>) -> Result<L, KnnError> {
        if self.training_data.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        if features.is_empty() {
            return Err(KnnError::EmptyFeatures);
        }

        // 1. Calculate the distance from the new point to every point in the training set.
        let mut distances: Vec<(F, &L)> = Vec::with_capacity(self.training_data.len());
        for dp in &self.training_data {
            let dist = self.distance.distance(features, dp.features.view())?;
            if dist.is_nan() {
                return Err(KnnError::InvalidDistance);
            }
            distances.push((dist, &dp.label));
        }

        // 2. Sort the training points by their distance to the new point (ascending).
        //    The sort is stable: equally distant points keep their training-set order.
        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        // 3. Take the top `k` neighbors.
        //    We use `min` to handle cases where k is larger than the training set size.
        let num_neighbors = self.k.min(distances.len());
        let neighbors = &distances[..num_neighbors];

        // 4. Majority vote, nearest-first so ties favour the closest label.
        majority_label(neighbors.iter().map(|(_, label)| *label)).ok_or(KnnError::EmptyTrainingSet)
    }
}

impl<L, F, D> Model<L, F> for KnnClassifier<L, F, D>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    type Error = KnnError;

    /// Stores a copy of the training set; k-NN defers all work to prediction.
    fn train(&mut self, data: &[DataPoint<L, F>]) -> Result<(), KnnError> {
        if data.is_empty() {
            return Err(KnnError::EmptyTrainingSet);
        }
        self.training_data = data.to_vec();
        debug!(samples = data.len(), k = self.k, "stored k-NN training set");
        Ok(())
    }

    fn test(&self, data: &[DataPoint<L, F>]) -> Result<Vec<L>, KnnError> {
        if data.is_empty() {
            return Err(KnnError::EmptyTestSet);
        }
        data.iter().map(|dp| self.predict(dp.features.view())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnkit_helpers::{DiabetesDist, L1Dist, L2Dist};
    use ndarray::{Array1, array};

    fn trained<D: Distance<f64>>(
        k: usize,
        data: Vec<DataPoint<&'static str, f64>>,
        distance: D,
    ) -> KnnClassifier<&'static str, f64, D> {
        let mut classifier = KnnClassifier::new(k, distance).unwrap();
        classifier.train(&data).unwrap();
        classifier
    }

    #[test]
    fn test_knn_classification_simple() {
        // Define training data
        let training_data = vec![
            DataPoint::new(array![1.0, 1.0], "A"),
            DataPoint::new(array![2.0, 2.0], "A"),
            DataPoint::new(array![1.0, 2.0], "A"),
            DataPoint::new(array![8.0, 8.0], "B"),
            DataPoint::new(array![9.0, 8.0], "B"),
            DataPoint::new(array![8.0, 9.0], "B"),
        ];

        // Create a classifier with k=3 and L2 (Euclidean) distance
        let classifier = trained(3, training_data, L2Dist);

        // Point close to class "A"
        let point_a = array![2.5, 2.5];
        assert_eq!(classifier.predict(point_a.view()).unwrap(), "A");

        // Point close to class "B"
        let point_b = array![7.5, 8.5];
        assert_eq!(classifier.predict(point_b.view()).unwrap(), "B");
    }

    #[test]
    fn test_knn_k_larger_than_dataset() {
        let training_data = vec![
            DataPoint::new(array![1.0], "A"),
            DataPoint::new(array![2.0], "A"),
            DataPoint::new(array![10.0], "B"),
        ];

        // k=5 is larger than the dataset size of 3, but this should work fine.
        // The two 'A's will outvote the one 'B'.
        let classifier = trained(5, training_data, L2Dist);
        let point = array![3.0];
        assert_eq!(classifier.predict(point.view()).unwrap(), "A");
    }

    #[test]
    fn test_exact_match_with_k_one() {
        let training_data = vec![
            DataPoint::new(array![0.0, 0.0], "A"),
            DataPoint::new(array![5.0, 5.0], "B"),
            DataPoint::new(array![5.1, 5.1], "A"),
        ];
        let classifier = trained(1, training_data, L2Dist);
        assert_eq!(classifier.predict(array![5.0, 5.0].view()).unwrap(), "B");
    }

    #[test]
    fn test_vote_tie_goes_to_nearest_label() {
        let training_data = vec![
            DataPoint::new(array![10.0], "far"),
            DataPoint::new(array![1.0], "near"),
        ];
        let classifier = trained(2, training_data, L1Dist);
        assert_eq!(classifier.predict(array![0.0].view()).unwrap(), "near");
    }

    #[test]
    fn test_distance_tie_keeps_training_order() {
        // Both neighbours sit at distance 1; with k=1 the stable sort keeps the first.
        let training_data = vec![
            DataPoint::new(array![1.0], "left"),
            DataPoint::new(array![-1.0], "right"),
        ];
        let classifier = trained(1, training_data, L2Dist);
        assert_eq!(classifier.predict(array![0.0].view()).unwrap(), "left");
    }

    #[test]
    fn test_test_preserves_input_order() {
        let training_data = vec![
            DataPoint::new(array![0.0], "A"),
            DataPoint::new(array![10.0], "B"),
        ];
        let classifier = trained(1, training_data, L2Dist);
        let queries = vec![
            DataPoint::new(array![9.0], "?"),
            DataPoint::new(array![1.0], "?"),
            DataPoint::new(array![8.0], "?"),
        ];
        assert_eq!(classifier.test(&queries).unwrap(), vec!["B", "A", "B"]);
    }

    #[test]
    fn test_with_diabetes_distance() {
        let training_data = vec![
            DataPoint::new(array![1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0], 0),
            DataPoint::new(array![8.0, 183.0, 64.0, 30.0, 0.0, 23.3, 0.672, 32.0], 1),
            DataPoint::new(array![1.0, 89.0, 66.0, 23.0, 94.0, 28.1, 0.167, 21.0], 0),
        ];
        let metric = DiabetesDist::from_data(&training_data).unwrap();
        let mut classifier = KnnClassifier::new(1, metric).unwrap();
        classifier.train(&training_data).unwrap();

        let query = array![7.0, 180.0, 0.0, 0.0, 0.0, 24.0, 0.6, 35.0];
        assert_eq!(classifier.predict(query.view()).unwrap(), 1);
    }

    #[test]
    fn test_error_on_k_zero() {
        let result = KnnClassifier::<&str, f64, _>::new(0, L2Dist);
        assert!(matches!(result, Err(KnnError::InvalidK)));
    }

    #[test]
    fn test_error_on_empty_training_set() {
        let mut classifier = KnnClassifier::<&str, f64, _>::new(3, L2Dist).unwrap();
        // Not trained yet.
        let result = classifier.predict(array![1.0, 1.0].view());
        assert!(matches!(result, Err(KnnError::EmptyTrainingSet)));

        let empty: Vec<DataPoint<&str, f64>> = vec![];
        assert_eq!(classifier.train(&empty), Err(KnnError::EmptyTrainingSet));
    }

    #[test]
    fn test_error_on_empty_test_set_and_features() {
        let classifier = trained(1, vec![DataPoint::new(array![1.0], "A")], L2Dist);
        assert_eq!(classifier.test(&[]), Err(KnnError::EmptyTestSet));
        let empty = Array1::<f64>::zeros(0);
        assert_eq!(classifier.predict(empty.view()), Err(KnnError::EmptyFeatures));
    }

    #[test]
    fn test_metric_errors_propagate() {
        let classifier = trained(1, vec![DataPoint::new(array![1.0, 2.0], "A")], L2Dist);
        assert_eq!(
            classifier.predict(array![1.0].view()),
            Err(KnnError::Distance(DistanceError::DimensionMismatch { left: 1, right: 2 }))
        );
    }

    #[test]
    fn test_nan_distance_is_rejected() {
        let classifier = trained(1, vec![DataPoint::new(array![1.0], "A")], L2Dist);
        assert_eq!(
            classifier.predict(array![f64::NAN].view()),
            Err(KnnError::InvalidDistance)
        );
    }

    #[test]
    fn test_retraining_replaces_data() {
        let mut classifier = trained(1, vec![DataPoint::new(array![0.0], "old")], L2Dist);
        classifier.train(&[DataPoint::new(array![0.0], "new")]).unwrap();
        assert_eq!(classifier.training_data().len(), 1);
        assert_eq!(classifier.predict(array![0.0].view()).unwrap(), "new");
    }
}
