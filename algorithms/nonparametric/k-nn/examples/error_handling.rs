//! Example demonstrating error handling with the k-NN classifier.
//!
//! Every failure mode of the classifier is reported through `KnnError`; nothing panics.

use k_nn::{KnnClassifier, KnnError};
use learnkit_helpers::{DataPoint, L2Dist, Model};
use ndarray::array;

fn main() {
    println!("k-NN Classifier Error Handling Examples");
    println!("=======================================");

    // Example 1: Handle invalid k value
    println!("\n1. Handling invalid k value (k=0):");
    match KnnClassifier::<&str, f64, _>::new(0, L2Dist) {
        Ok(_) => println!("   Classifier created successfully"),
        Err(e) => println!("   Caught expected error: {}", e),
    }

    // Example 2: Predicting before training
    println!("\n2. Predicting before training:");
    let untrained = KnnClassifier::<&str, f64, _>::new(3, L2Dist);
    if let Ok(classifier) = untrained {
        match classifier.predict(array![1.0, 1.0].view()) {
            Ok(label) => println!("   Predicted label: {}", label),
            Err(KnnError::EmptyTrainingSet) => {
                println!("   Caught expected error: {}", KnnError::EmptyTrainingSet)
            }
            Err(e) => println!("   Unexpected error: {}", e),
        }
    }

    // Example 3: Successful train/test cycle
    println!("\n3. Successful train/test cycle:");
    let training_data = vec![
        DataPoint::new(array![1.0, 1.0], "Class A"),
        DataPoint::new(array![2.0, 2.0], "Class A"),
        DataPoint::new(array![1.0, 2.0], "Class A"),
        DataPoint::new(array![8.0, 8.0], "Class B"),
        DataPoint::new(array![9.0, 8.0], "Class B"),
        DataPoint::new(array![8.0, 9.0], "Class B"),
    ];
    let queries = vec![
        DataPoint::new(array![2.5, 2.5], "Class A"),
        DataPoint::new(array![7.5, 8.5], "Class B"),
    ];

    let outcome = KnnClassifier::new(3, L2Dist).and_then(|mut classifier| {
        classifier.train(&training_data)?;
        classifier.test(&queries)
    });
    match outcome {
        Ok(predictions) => {
            for (query, predicted) in queries.iter().zip(predictions) {
                println!("   predicted {} (expected {})", predicted, query.label);
            }
        }
        Err(e) => println!("   Classification failed: {}", e),
    }

    // Example 4: Mismatched feature lengths surface as distance errors
    println!("\n4. Mismatched feature lengths:");

    fn classify_short_query() -> Result<String, KnnError> {
        let mut classifier = KnnClassifier::new(1, L2Dist)?;
        classifier.train(&[
            DataPoint::new(array![1.0, 0.0], "positive"),
            DataPoint::new(array![-1.0, 0.0], "negative"),
        ])?;
        let result = classifier.predict(array![0.5].view())?;
        Ok(result.to_string())
    }

    match classify_short_query() {
        Ok(result) => println!("   Classification result: {}", result),
        Err(e) => println!("   Classification failed: {}", e),
    }
}
