//! Binary logistic regression fitted by per-example stochastic gradient descent.
//!
//! Feature columns are z-score standardized before training and the examples are
//! visited in input order on every epoch, so a given input always yields the same
//! weights.
//!
//! By default inference applies the learned weights to the *raw* feature values.
//! [`InferenceScaling::Standardized`] instead reuses the training statistics.

use learnkit_helpers::{DataPoint, Float, Model, feature_count};
use ndarray::{Array1, Array2, ArrayView1, Axis, s};
use num_traits::{NumCast, One, ToPrimitive, Zero};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Errors that can occur when configuring, training or querying the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogRegError {
    #[error("learning rate must be finite and non-negative")]
    InvalidLearningRate,
    #[error("number of epochs must be greater than 0")]
    InvalidEpochs,
    #[error("training data cannot be empty")]
    EmptyTrainingSet,
    #[error("expected {expected} features, found {found}")]
    MismatchedDimensions { expected: usize, found: usize },
    #[error("label of sample {index} cannot be represented as a number")]
    NonNumericLabel { index: usize },
    #[error("the model has not been trained")]
    NotFitted,
}

/// How feature vectors are presented to the trained weights at inference time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum InferenceScaling {
    /// Weights are applied to the raw, unstandardized features.
    #[default]
    Raw,
    /// Features are standardized with the training mean and deviation first.
    Standardized,
}

/// The logistic function `1 / (1 + e^-z)`.
pub fn sigmoid<F: Float>(z: F) -> F {
    F::one() / (F::one() + (-z).exp())
}

/// `weights[0] + sum(weights[j + 1] * features[j])`, accumulated left to right.
fn linear<F: Float>(weights: &Array1<F>, features: ArrayView1<F>) -> F {
    weights
        .slice(s![1..])
        .iter()
        .zip(features.iter())
        .fold(weights[0], |acc, (&w, &x)| acc + w * x)
}

#[derive(Debug, Clone)]
struct Fitted<F> {
    /// Index 0 is the bias.
    weights: Array1<F>,
    mean: Array1<F>,
    scale: Array1<F>,
}

/// A binary logistic regression classifier predicting labels 0 and 1.
#[derive(Debug, Clone)]
pub struct LogisticRegression<F: Float> {
    learning_rate: F,
    epochs: usize,
    scaling: InferenceScaling,
    fitted: Option<Fitted<F>>,
}

impl<F: Float> LogisticRegression<F> {
    /// Creates an untrained model.
    ///
    /// # Errors
    ///
    /// Returns `LogRegError::InvalidLearningRate` for a negative or non-finite rate and
    /// `LogRegError::InvalidEpochs` when `epochs` is 0.
    pub fn new(learning_rate: F, epochs: usize) -> Result<Self, LogRegError> {
        if !learning_rate.is_finite() || learning_rate < F::zero() {
            return Err(LogRegError::InvalidLearningRate);
        }
        if epochs == 0 {
            return Err(LogRegError::InvalidEpochs);
        }
        Ok(Self {
            learning_rate,
            epochs,
            scaling: InferenceScaling::default(),
            fitted: None,
        })
    }

    pub fn with_inference_scaling(mut self, scaling: InferenceScaling) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn learning_rate(&self) -> F {
        self.learning_rate
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn inference_scaling(&self) -> InferenceScaling {
        self.scaling
    }

    /// The trained weights, bias first, or `None` before training.
    pub fn weights(&self) -> Option<ArrayView1<'_, F>> {
        self.fitted.as_ref().map(|fitted| fitted.weights.view())
    }

    /// Probability that `features` belongs to the positive class.
    pub fn predict_proba(&self, features: ArrayView1<F>) -> Result<F, LogRegError> {
        let fitted = self.fitted.as_ref().ok_or(LogRegError::NotFitted)?;
        let expected = fitted.weights.len() - 1;
        if features.len() != expected {
            return Err(LogRegError::MismatchedDimensions {
                expected,
                found: features.len(),
            });
        }
        let z = match self.scaling {
            InferenceScaling::Raw => linear(&fitted.weights, features),
            InferenceScaling::Standardized => {
                let standardized = (&features - &fitted.mean) / &fitted.scale;
                linear(&fitted.weights, standardized.view())
            }
        };
        Ok(sigmoid(z))
    }

    /// Predicts 1 when the positive-class probability is at least 0.5, else 0.
    pub fn predict<L: Zero + One>(&self, features: ArrayView1<F>) -> Result<L, LogRegError> {
        let probability = self.predict_proba(features)?;
        Ok(if probability >= F::constant(0.5) {
            L::one()
        } else {
            L::zero()
        })
    }
}

impl<L, F> Model<L, F> for LogisticRegression<F>
where
    L: Clone + Eq + Hash + Debug + Zero + One + ToPrimitive,
    F: Float,
{
    type Error = LogRegError;

    fn train(&mut self, data: &[DataPoint<L, F>]) -> Result<(), LogRegError> {
        if data.is_empty() {
            return Err(LogRegError::EmptyTrainingSet);
        }
        let n_features = feature_count(data)
            .map_err(|(expected, found)| LogRegError::MismatchedDimensions { expected, found })?;
        let targets = data
            .iter()
            .enumerate()
            .map(|(index, dp)| {
                <F as NumCast>::from(dp.label.clone()).ok_or(LogRegError::NonNumericLabel { index })
            })
            .collect::<Result<Array1<F>, _>>()?;

        // Column-wise z-scores; a constant column is divided by 1.
        let raw = Array2::from_shape_fn((data.len(), n_features), |(i, j)| data[i].features[j]);
        let mean = raw
            .mean_axis(Axis(0))
            .ok_or(LogRegError::EmptyTrainingSet)?;
        let scale = raw
            .std_axis(Axis(0), F::zero())
            .mapv(|std| if std == F::zero() { F::one() } else { std });
        let standardized = (&raw - &mean) / &scale;

        let mut weights = Array1::<F>::zeros(n_features + 1);
        for epoch in 0..self.epochs {
            for (row, &target) in standardized.rows().into_iter().zip(targets.iter()) {
                let error = target - sigmoid(linear(&weights, row));
                let step = self.learning_rate * error;
                weights[0] += step;
                weights.slice_mut(s![1..]).scaled_add(step, &row);
            }
            trace!(epoch, bias = ?weights[0], "finished epoch");
        }

        debug!(
            samples = data.len(),
            features = n_features,
            epochs = self.epochs,
            "fitted logistic regression"
        );
        self.fitted = Some(Fitted {
            weights,
            mean,
            scale,
        });
        Ok(())
    }

    fn test(&self, data: &[DataPoint<L, F>]) -> Result<Vec<L>, LogRegError> {
        if self.fitted.is_none() {
            return Err(LogRegError::NotFitted);
        }
        data.iter().map(|dp| self.predict(dp.features.view())).collect()
    }
}
