mod classifier;
mod comparison;
mod dataset;

use anyhow::{Context, ensure};
use clap::Parser;
use classifier::{DistanceKind, ModelConfig, ModelKind};
use logistic_regression::InferenceScaling;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::PathBuf;
use tracing::{error, info};

/// Train several classifiers on a labelled CSV dataset and compare their scores.
#[derive(Debug, Parser)]
#[command(name = "classifier-comparison", version, about)]
struct Cli {
    /// CSV file with 8 numeric features and an integer 0/1 label per line
    data: PathBuf,

    /// Skip the first line of the file
    #[arg(long)]
    has_header: bool,

    /// Fraction of the shuffled examples used for training
    #[arg(long, default_value_t = 0.8)]
    train_ratio: f64,

    /// Shuffle seed; a random one is drawn and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Classifiers to compare
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = ModelKind::ALL)]
    models: Vec<ModelKind>,

    /// Number of neighbors for k-NN
    #[arg(short, long, default_value_t = 5)]
    k: usize,

    /// Distance metric for k-NN
    #[arg(long, value_enum, default_value_t = DistanceKind::Diabetes)]
    distance: DistanceKind,

    /// Maximum decision tree depth (unlimited when omitted)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Logistic regression learning rate
    #[arg(long, default_value_t = 0.01)]
    learning_rate: f64,

    /// Logistic regression training epochs
    #[arg(long, default_value_t = 100)]
    epochs: usize,

    /// Standardize features at logistic regression inference time
    #[arg(long)]
    standardize: bool,
}

impl Cli {
    fn model_config(&self) -> ModelConfig {
        ModelConfig {
            k: self.k,
            distance: self.distance,
            max_depth: self.max_depth,
            learning_rate: self.learning_rate,
            epochs: self.epochs,
            scaling: if self.standardize {
                InferenceScaling::Standardized
            } else {
                InferenceScaling::Raw
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classifier_comparison=info".into()),
        )
        .init();

    let cli = Cli::parse();
    ensure!(
        cli.train_ratio > 0.0 && cli.train_ratio < 1.0,
        "train ratio must lie strictly between 0 and 1, got {}",
        cli.train_ratio
    );

    let data = dataset::load_dataset(&cli.data, cli.has_header)
        .with_context(|| format!("failed to load {}", cli.data.display()))?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(examples = data.len(), seed, "loaded dataset");

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let (train, test) = dataset::split_train_test(data, cli.train_ratio, &mut rng);
    ensure!(
        !train.is_empty() && !test.is_empty(),
        "dataset too small to split: {} training and {} test examples",
        train.len(),
        test.len()
    );
    dataset::verify_integrity(&train, "Training")?;
    dataset::verify_integrity(&test, "Testing")?;

    let config = cli.model_config();
    let mut failures = 0;
    println!("Testing classifiers on {}...", cli.data.display());
    for (index, kind) in cli.models.iter().enumerate() {
        println!("\n{}. {}", index + 1, kind.title());
        let outcome = kind
            .build(&config, &train)
            .map_err(|e| anyhow::anyhow!(e))
            .and_then(|mut classifier| comparison::evaluate(classifier.as_mut(), &train, &test));
        match outcome {
            Ok(report) => println!("{report}"),
            Err(e) => {
                error!(model = ?kind, "{e:#}");
                failures += 1;
            }
        }
    }

    ensure!(failures == 0, "{failures} classifier(s) failed");
    Ok(())
}
