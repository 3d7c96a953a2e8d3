use clap::ValueEnum;
use decision_tree::DecisionTree;
use k_nn::KnnClassifier;
use learnkit_helpers::{DataPoint, DiabetesDist, Distance, L1Dist, L2Dist, Model};
use logistic_regression::{InferenceScaling, LogisticRegression};
use std::error::Error;

pub type BoxError = Box<dyn Error + Send + Sync>;

/// A trait that defines the common interface for every classifier the driver compares.
pub trait Classifier {
    /// Name shown in the report, including the relevant hyperparameters.
    fn name(&self) -> String;

    fn train(&mut self, data: &[DataPoint<i32, f64>]) -> Result<(), BoxError>;

    fn test(&self, data: &[DataPoint<i32, f64>]) -> Result<Vec<i32>, BoxError>;
}

/// Wraps any [`Model`] so the driver can hold different models behind one trait object.
struct ModelAdapter<M> {
    name: String,
    model: M,
}

impl<M> Classifier for ModelAdapter<M>
where
    M: Model<i32, f64>,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn train(&mut self, data: &[DataPoint<i32, f64>]) -> Result<(), BoxError> {
        self.model.train(data).map_err(Into::into)
    }

    fn test(&self, data: &[DataPoint<i32, f64>]) -> Result<Vec<i32>, BoxError> {
        self.model.test(data).map_err(Into::into)
    }
}

fn adapt<M>(name: String, model: M) -> Box<dyn Classifier>
where
    M: Model<i32, f64> + 'static,
{
    Box::new(ModelAdapter { name, model })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    Knn,
    DecisionTree,
    LogisticRegression,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::Knn,
        ModelKind::DecisionTree,
        ModelKind::LogisticRegression,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ModelKind::Knn => "K-Nearest Neighbors Classifier",
            ModelKind::DecisionTree => "Decision Tree Classifier",
            ModelKind::LogisticRegression => "Logistic Regression Classifier",
        }
    }

    /// Builds an untrained classifier. The domain-weighted metric is calibrated on `train`.
    pub fn build(
        self,
        config: &ModelConfig,
        train: &[DataPoint<i32, f64>],
    ) -> Result<Box<dyn Classifier>, BoxError> {
        let classifier = match self {
            ModelKind::Knn => match config.distance {
                DistanceKind::Euclidean => knn(config.k, L2Dist, "Euclidean")?,
                DistanceKind::Manhattan => knn(config.k, L1Dist, "Manhattan")?,
                DistanceKind::Diabetes => {
                    knn(config.k, DiabetesDist::from_data(train)?, "diabetes-weighted")?
                }
            },
            ModelKind::DecisionTree => {
                let mut tree = DecisionTree::new();
                let name = match config.max_depth {
                    Some(depth) => {
                        tree = tree.with_max_depth(depth);
                        format!("Decision tree (max depth {depth})")
                    }
                    None => "Decision tree".to_string(),
                };
                adapt(name, tree)
            }
            ModelKind::LogisticRegression => {
                let model = LogisticRegression::new(config.learning_rate, config.epochs)?
                    .with_inference_scaling(config.scaling);
                adapt(
                    format!(
                        "Logistic regression (lr = {}, {} epochs, {:?} inference)",
                        config.learning_rate, config.epochs, config.scaling
                    ),
                    model,
                )
            }
        };
        Ok(classifier)
    }
}

fn knn<D>(k: usize, distance: D, metric: &str) -> Result<Box<dyn Classifier>, BoxError>
where
    D: Distance<f64> + 'static,
{
    let model = KnnClassifier::new(k, distance)?;
    Ok(adapt(format!("k-NN (k = {k}, {metric})"), model))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistanceKind {
    Euclidean,
    Manhattan,
    Diabetes,
}

/// Hyperparameters for every model kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub k: usize,
    pub distance: DistanceKind,
    pub max_depth: Option<usize>,
    pub learning_rate: f64,
    pub epochs: usize,
    pub scaling: InferenceScaling,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            k: 5,
            distance: DistanceKind::Diabetes,
            max_depth: None,
            learning_rate: 0.01,
            epochs: 100,
            scaling: InferenceScaling::Raw,
        }
    }
}
