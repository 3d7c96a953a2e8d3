//! Loading the labelled CSV dataset and splitting it into train and test sets.

use csv::{ReaderBuilder, Trim};
use learnkit_helpers::{DIABETES_FEATURES, DataPoint};
use ndarray::Array1;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Eight feature columns followed by the integer label.
pub const FIELDS: usize = DIABETES_FEATURES.len() + 1;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not open dataset")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV input")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected {} fields, found {found}", FIELDS)]
    FieldCount { line: u64, found: usize },
    #[error("line {line}: column {column} is not a valid number: {value:?}")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },
    #[error("{dataset} example {index} has no features")]
    EmptyFeatures { dataset: String, index: usize },
}

/// Parses every record of `reader`. A single malformed line fails the whole load.
pub fn read_dataset<R: Read>(
    reader: R,
    has_header: bool,
) -> Result<Vec<DataPoint<i32, f64>>, DatasetError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut data = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |pos| pos.line());
        if record.len() != FIELDS {
            return Err(DatasetError::FieldCount {
                line,
                found: record.len(),
            });
        }

        let mut features = Array1::zeros(FIELDS - 1);
        let mut label = 0;
        for (index, field) in record.iter().enumerate() {
            let invalid = || DatasetError::InvalidNumber {
                line,
                column: index + 1,
                value: field.to_string(),
            };
            if index < FIELDS - 1 {
                features[index] = field.parse::<f64>().map_err(|_| invalid())?;
            } else {
                label = field.parse::<i32>().map_err(|_| invalid())?;
            }
        }
        data.push(DataPoint::new(features, label));
    }

    debug!(records = data.len(), "parsed dataset");
    Ok(data)
}

pub fn load_dataset(path: &Path, has_header: bool) -> Result<Vec<DataPoint<i32, f64>>, DatasetError> {
    let file = File::open(path)?;
    read_dataset(file, has_header)
}

/// Shuffles `data` and puts the first `floor(train_ratio * n)` examples in the training set.
pub fn split_train_test<R: Rng + ?Sized>(
    mut data: Vec<DataPoint<i32, f64>>,
    train_ratio: f64,
    rng: &mut R,
) -> (Vec<DataPoint<i32, f64>>, Vec<DataPoint<i32, f64>>) {
    data.shuffle(rng);
    let train_size = ((train_ratio * data.len() as f64) as usize).min(data.len());
    let test = data.split_off(train_size);
    (data, test)
}

/// Logs the size of `data` and fails on examples without features.
pub fn verify_integrity(data: &[DataPoint<i32, f64>], dataset: &str) -> Result<(), DatasetError> {
    info!(dataset, size = data.len(), "verifying data integrity");
    if let Some(index) = data.iter().position(|dp| dp.features.is_empty()) {
        return Err(DatasetError::EmptyFeatures {
            dataset: dataset.to_string(),
            index,
        });
    }
    info!(dataset, "data integrity check passed");
    Ok(())
}
