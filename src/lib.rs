//! Supervised classification on fixed-width numeric feature vectors.
//!
//! The shared vocabulary (data points, distances, evaluation measures and the
//! [`Model`] contract) lives in `learnkit_helpers`; each classifier is its own crate
//! and is re-exported here.
//!
//! ```
//! use learnkit::{Accuracy, DataPoint, EvaluationMeasure, KnnClassifier, L2Dist, Model};
//! use ndarray::array;
//!
//! let train = vec![
//!     DataPoint::new(array![0.0, 0.0], 0),
//!     DataPoint::new(array![0.0, 1.0], 0),
//!     DataPoint::new(array![5.0, 5.0], 1),
//!     DataPoint::new(array![5.0, 6.0], 1),
//! ];
//! let mut knn = KnnClassifier::new(1, L2Dist).unwrap();
//! knn.train(&train).unwrap();
//! let predictions = knn.test(&train).unwrap();
//! assert_eq!(Accuracy.evaluate(&train, &predictions).unwrap(), 1.0);
//! ```

pub use decision_tree::{DecisionTree, Node, TreeError, entropy};
pub use k_nn::{KnnClassifier, KnnError};
pub use learnkit_helpers::{
    Accuracy, DIABETES_FEATURES, DataPoint, DiabetesDist, Distance, DistanceError,
    EvaluationError, EvaluationMeasure, F1Score, Float, L1Dist, L2Dist, Model, Precision, Recall,
    as_percentage, feature_count, majority_label,
};
pub use logistic_regression::{InferenceScaling, LogRegError, LogisticRegression, sigmoid};
