//! Scores computed from predictions against the ground truth of labeled examples.
//!
//! Precision, recall and F1 treat label `1` as the positive class.

use crate::{DataPoint, Float};
use num_traits::{One, Zero};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Errors that can occur while scoring predictions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("number of examples ({examples}) and predictions ({predictions}) must match")]
    LengthMismatch { examples: usize, predictions: usize },
    #[error("cannot evaluate an empty set of predictions")]
    EmptyInput,
    #[error("label at index {index} is not binary (expected 0 or 1)")]
    NonBinaryLabel { index: usize },
}

/// A scalar score in `[0, 1]` computed from examples and their predicted labels.
pub trait EvaluationMeasure<L, F>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    fn evaluate(&self, data: &[DataPoint<L, F>], predictions: &[L]) -> Result<f64, EvaluationError>;

    /// Human readable name of the measure.
    fn name(&self) -> &'static str;
}

fn check_lengths<L, F>(data: &[DataPoint<L, F>], predictions: &[L]) -> Result<(), EvaluationError>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    if data.len() != predictions.len() {
        return Err(EvaluationError::LengthMismatch {
            examples: data.len(),
            predictions: predictions.len(),
        });
    }
    Ok(())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Formats a score as a percentage with two decimals, e.g. `"87.50%"`.
pub fn as_percentage(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

/// Fraction of predictions equal to the ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy;

impl<L, F> EvaluationMeasure<L, F> for Accuracy
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    fn evaluate(&self, data: &[DataPoint<L, F>], predictions: &[L]) -> Result<f64, EvaluationError> {
        check_lengths(data, predictions)?;
        if data.is_empty() {
            return Err(EvaluationError::EmptyInput);
        }
        let correct = data
            .iter()
            .zip(predictions)
            .filter(|(dp, predicted)| dp.label == **predicted)
            .count();
        Ok(ratio(correct, data.len()))
    }

    fn name(&self) -> &'static str {
        "Accuracy"
    }
}

/// Fraction of positive predictions whose ground truth is also positive.
///
/// Scores 0 when nothing was predicted positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Precision;

impl<L, F> EvaluationMeasure<L, F> for Precision
where
    L: Clone + Eq + Hash + Debug + Zero + One,
    F: Float,
{
    fn evaluate(&self, data: &[DataPoint<L, F>], predictions: &[L]) -> Result<f64, EvaluationError> {
        check_lengths(data, predictions)?;
        let positive = L::one();
        let mut true_positives = 0;
        let mut false_positives = 0;
        for (dp, predicted) in data.iter().zip(predictions) {
            if *predicted == positive {
                if dp.label == positive {
                    true_positives += 1;
                } else {
                    false_positives += 1;
                }
            }
        }
        Ok(ratio(true_positives, true_positives + false_positives))
    }

    fn name(&self) -> &'static str {
        "Precision"
    }
}

/// Fraction of positive ground-truth cases that were predicted positive.
///
/// Every label on both sides must be 0 or 1. Scores 0 when the ground truth has no
/// positive case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recall;

impl<L, F> EvaluationMeasure<L, F> for Recall
where
    L: Clone + Eq + Hash + Debug + Zero + One,
    F: Float,
{
    fn evaluate(&self, data: &[DataPoint<L, F>], predictions: &[L]) -> Result<f64, EvaluationError> {
        check_lengths(data, predictions)?;
        if data.is_empty() {
            return Err(EvaluationError::EmptyInput);
        }
        let (negative, positive) = (L::zero(), L::one());
        let mut true_positives = 0;
        let mut false_negatives = 0;
        for (index, (dp, predicted)) in data.iter().zip(predictions).enumerate() {
            for label in [predicted, &dp.label] {
                if *label != negative && *label != positive {
                    return Err(EvaluationError::NonBinaryLabel { index });
                }
            }
            if dp.label == positive {
                if *predicted == positive {
                    true_positives += 1;
                } else {
                    false_negatives += 1;
                }
            }
        }
        Ok(ratio(true_positives, true_positives + false_negatives))
    }

    fn name(&self) -> &'static str {
        "Recall"
    }
}

/// Harmonic mean of precision and recall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct F1Score;

impl F1Score {
    /// Combines precomputed precision and recall; 0 when both are 0.
    pub fn from_scores(precision: f64, recall: f64) -> f64 {
        if precision + recall == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / (precision + recall)
    }
}

impl<L, F> EvaluationMeasure<L, F> for F1Score
where
    L: Clone + Eq + Hash + Debug + Zero + One,
    F: Float,
{
    fn evaluate(&self, data: &[DataPoint<L, F>], predictions: &[L]) -> Result<f64, EvaluationError> {
        let precision = Precision.evaluate(data, predictions)?;
        let recall = Recall.evaluate(data, predictions)?;
        Ok(Self::from_scores(precision, recall))
    }

    fn name(&self) -> &'static str {
        "F1"
    }
}
