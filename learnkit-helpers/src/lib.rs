use ndarray::{NdFloat, ScalarOperand};

use num_traits::{FromPrimitive, Signed};

use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

// Include submodules
mod common;
mod distance;
mod evaluation;
mod model;
mod vote;

// Re-export types from submodules
pub use common::{DataPoint, feature_count};
pub use distance::{DIABETES_FEATURES, DiabetesDist, Distance, DistanceError, L1Dist, L2Dist};
pub use evaluation::{
    Accuracy, EvaluationError, EvaluationMeasure, F1Score, Precision, Recall, as_percentage,
};
pub use model::Model;
pub use vote::majority_label;

/// Scalar type of a feature vector.
pub trait Float:
    NdFloat
    + FromPrimitive
    + Default
    + Signed
    + Sum
    + for<'a> AddAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + ScalarOperand
    + std::marker::Unpin
{
    /// Converts an element count into the float domain.
    fn from_count(n: usize) -> Self;

    /// Converts an `f64` literal into the float domain, rounding if needed.
    fn constant(x: f64) -> Self;
}

impl Float for f32 {
    fn from_count(n: usize) -> Self {
        n as f32
    }

    fn constant(x: f64) -> Self {
        x as f32
    }
}

impl Float for f64 {
    fn from_count(n: usize) -> Self {
        n as f64
    }

    fn constant(x: f64) -> Self {
        x
    }
}
