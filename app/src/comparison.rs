use crate::classifier::Classifier;
use anyhow::{Context, anyhow};
use learnkit_helpers::{
    Accuracy, DataPoint, EvaluationMeasure, F1Score, Precision, Recall, as_percentage,
};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

/// Scores of one trained classifier on the test set.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub name: String,
    pub scores: Vec<(&'static str, f64)>,
    /// Wall time spent in `train` and `test`.
    pub elapsed: Duration,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for (measure, score) in &self.scores {
            writeln!(f, "{measure}: {}", as_percentage(*score))?;
        }
        write!(f, "Execution time: {} ms", self.elapsed.as_millis())
    }
}

fn measures() -> [Box<dyn EvaluationMeasure<i32, f64>>; 4] {
    [
        Box::new(Accuracy),
        Box::new(Precision),
        Box::new(Recall),
        Box::new(F1Score),
    ]
}

/// Trains `classifier` on `train`, predicts `test` and scores the predictions.
pub fn evaluate(
    classifier: &mut dyn Classifier,
    train: &[DataPoint<i32, f64>],
    test: &[DataPoint<i32, f64>],
) -> anyhow::Result<Report> {
    let name = classifier.name();
    let start = Instant::now();
    classifier
        .train(train)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("training {name} failed"))?;
    let predictions = classifier
        .test(test)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("testing {name} failed"))?;
    let elapsed = start.elapsed();

    let mut scores = Vec::new();
    for measure in measures() {
        let score = measure
            .evaluate(test, &predictions)
            .with_context(|| format!("computing {} for {name}", measure.name()))?;
        scores.push((measure.name(), score));
    }
    info!(classifier = %name, elapsed_ms = elapsed.as_millis() as u64, "evaluated");

    Ok(Report {
        name,
        scores,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ModelConfig, ModelKind};
    use ndarray::array;

    fn split() -> (Vec<DataPoint<i32, f64>>, Vec<DataPoint<i32, f64>>) {
        let point = |x: f64, label| DataPoint::new(array![x], label);
        let train = vec![point(1.0, 0), point(2.0, 0), point(8.0, 1), point(9.0, 1)];
        let test = vec![point(1.5, 0), point(8.5, 1), point(3.0, 0), point(7.0, 1)];
        (train, test)
    }

    #[test]
    fn test_report_for_perfect_tree() {
        let (train, test) = split();
        let mut tree = ModelKind::DecisionTree
            .build(&ModelConfig::default(), &train)
            .unwrap();
        let report = evaluate(tree.as_mut(), &train, &test).unwrap();

        let names: Vec<&str> = report.scores.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["Accuracy", "Precision", "Recall", "F1"]);
        assert!(report.scores.iter().all(|&(_, score)| score == 1.0));

        let rendered = report.to_string();
        assert!(rendered.starts_with("Decision tree\n"));
        assert!(rendered.contains("Accuracy: 100.00%\n"));
        assert!(rendered.contains("F1: 100.00%\n"));
        assert!(rendered.ends_with(" ms"));
    }

    #[test]
    fn test_empty_test_set_is_an_error() {
        let (train, _) = split();
        let config = ModelConfig {
            distance: crate::classifier::DistanceKind::Euclidean,
            ..ModelConfig::default()
        };
        let mut knn = ModelKind::Knn.build(&config, &train).unwrap();
        let err = evaluate(knn.as_mut(), &train, &[]).unwrap_err();
        assert!(err.to_string().starts_with("testing k-NN"));
    }
}
