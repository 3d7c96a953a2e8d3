use ndarray::Array1;
use crate::Float;
use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Represents a single labeled example: a feature vector and its label.
///
/// L: The type of the label (e.g., i32, String, enum).
/// F: The float type for the features (e.g., f32, f64).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct DataPoint<L, F>
where
    L: Clone + Eq + std::hash::Hash + Debug,
    F: Float,
{
    pub features: Array1<F>,
    pub label: L,
}

impl<L, F> DataPoint<L, F>
where
    L: Clone + Eq + std::hash::Hash + Debug,
    F: Float,
{
    pub fn new(features: Array1<F>, label: L) -> Self {
        DataPoint { features, label }
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}

/// Returns the feature length shared by every point in `data` (0 for an empty slice).
///
/// On disagreement the error holds `(expected, found)`, where `expected` is the length
/// of the first point.
pub fn feature_count<L, F>(data: &[DataPoint<L, F>]) -> Result<usize, (usize, usize)>
where
    L: Clone + Eq + std::hash::Hash + Debug,
    F: Float,
{
    let Some(first) = data.first() else {
        return Ok(0);
    };
    let expected = first.n_features();
    match data.iter().find(|dp| dp.n_features() != expected) {
        Some(dp) => Err((expected, dp.n_features())),
        None => Ok(expected),
    }
}
