use crate::{DataPoint, Float};
use ndarray::{Array1, Array2, ArrayView1, Zip};
use ndarray_stats::QuantileExt;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Errors raised while computing or calibrating a distance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    #[error("feature vectors differ in length: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("metric expects feature vectors of length {expected}, got {found}")]
    UnsupportedDimension { expected: usize, found: usize },
    #[error("calibration bounds must have length {expected}, got {found}")]
    CalibrationLength { expected: usize, found: usize },
    #[error("cannot calibrate a metric from an empty data set")]
    EmptyCalibration,
    #[error("calibration data contains values without a total order (NaN)")]
    UndefinedOrder,
}

/// A dissimilarity measure between two feature vectors.
///
/// Implementations must return a non-negative value.
pub trait Distance<F: Float>: Clone + Send + Sync + Unpin {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> Result<F, DistanceError>;
}

fn check_lengths<F: Float>(a: &ArrayView1<F>, b: &ArrayView1<F>) -> Result<(), DistanceError> {
    if a.len() != b.len() {
        return Err(DistanceError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Manhattan distance, `sum |a_i - b_i|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L1Dist;

impl<F: Float> Distance<F> for L1Dist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> Result<F, DistanceError> {
        check_lengths(&a, &b)?;
        Ok(Zip::from(&a)
            .and(&b)
            .fold(F::zero(), |acc, &x, &y| acc + (x - y).abs()))
    }
}

/// Euclidean distance, `sqrt(sum (a_i - b_i)^2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2Dist;

impl<F: Float> Distance<F> for L2Dist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> Result<F, DistanceError> {
        check_lengths(&a, &b)?;
        let squared = Zip::from(&a).and(&b).fold(F::zero(), |acc, &x, &y| {
            let diff = x - y;
            acc + diff * diff
        });
        Ok(squared.sqrt())
    }
}

/// Column names of the diabetes data set, in feature order.
pub const DIABETES_FEATURES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

const DIABETES_WEIGHTS: [f64; 8] = [0.5, 1.0, 0.8, 0.7, 0.6, 1.0, 0.9, 0.7];

/// Weighted, min-max normalized Euclidean distance over the 8 diabetes features.
///
/// A feature only contributes when its value is plausible on both sides; a
/// zero glucose or BMI reading is a missing measurement, not a measurement of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DiabetesDist<F: Float> {
    min: Array1<F>,
    max: Array1<F>,
    weights: Array1<F>,
}

impl<F: Float> DiabetesDist<F> {
    /// Creates the metric from per-feature calibration bounds.
    ///
    /// # Errors
    ///
    /// Returns `DistanceError::CalibrationLength` unless both bounds hold exactly 8 values.
    pub fn new(min: Array1<F>, max: Array1<F>) -> Result<Self, DistanceError> {
        for bounds in [&min, &max] {
            if bounds.len() != DIABETES_FEATURES.len() {
                return Err(DistanceError::CalibrationLength {
                    expected: DIABETES_FEATURES.len(),
                    found: bounds.len(),
                });
            }
        }
        let weights = DIABETES_WEIGHTS.iter().map(|&w| F::constant(w)).collect();
        Ok(Self { min, max, weights })
    }

    /// Calibrates the bounds to the per-feature minimum and maximum observed in `data`.
    pub fn from_data<L>(data: &[DataPoint<L, F>]) -> Result<Self, DistanceError>
    where
        L: Clone + Eq + Hash + Debug,
    {
        if data.is_empty() {
            return Err(DistanceError::EmptyCalibration);
        }
        let width = DIABETES_FEATURES.len();
        if let Some(dp) = data.iter().find(|dp| dp.n_features() != width) {
            return Err(DistanceError::UnsupportedDimension {
                expected: width,
                found: dp.n_features(),
            });
        }

        let matrix = Array2::from_shape_fn((data.len(), width), |(i, j)| data[i].features[j]);
        let mut min = Array1::zeros(width);
        let mut max = Array1::zeros(width);
        for (j, column) in matrix.columns().into_iter().enumerate() {
            min[j] = *column.min().map_err(|_| DistanceError::UndefinedOrder)?;
            max[j] = *column.max().map_err(|_| DistanceError::UndefinedOrder)?;
        }
        tracing::debug!(?min, ?max, "calibrated diabetes distance bounds");
        Self::new(min, max)
    }

    pub fn min(&self) -> ArrayView1<'_, F> {
        self.min.view()
    }

    pub fn max(&self) -> ArrayView1<'_, F> {
        self.max.view()
    }

    /// Whether `value` is a plausible reading for the feature at `index`.
    pub fn is_valid(index: usize, value: F) -> bool {
        match index {
            // Pregnancies and Insulin can legitimately be 0
            0 | 4 => true,
            // Glucose, BloodPressure, SkinThickness, BMI, Age
            1 | 2 | 3 | 5 | 7 => value > F::zero(),
            // DiabetesPedigreeFunction
            6 => value >= F::zero(),
            _ => false,
        }
    }

    fn normalize(&self, index: usize, value: F) -> F {
        let span = self.max[index] - self.min[index];
        let span = if span == F::zero() { F::one() } else { span };
        (value - self.min[index]) / span
    }
}

impl<F: Float> Distance<F> for DiabetesDist<F> {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> Result<F, DistanceError> {
        let width = DIABETES_FEATURES.len();
        for found in [a.len(), b.len()] {
            if found != width {
                return Err(DistanceError::UnsupportedDimension {
                    expected: width,
                    found,
                });
            }
        }

        let mut sum = F::zero();
        for i in 0..width {
            if Self::is_valid(i, a[i]) && Self::is_valid(i, b[i]) {
                let diff = self.normalize(i, a[i]) - self.normalize(i, b[i]);
                sum += self.weights[i] * diff * diff;
            }
        }
        Ok(sum.sqrt())
    }
}
