use crate::{DataPoint, Float};
use std::fmt::Debug;
use std::hash::Hash;

/// The train/test contract shared by every classifier.
///
/// `train` fits fresh state from scratch, replacing whatever an earlier call fitted.
/// When it fails the previous state is left untouched. `test` returns one predicted
/// label per example, in input order.
pub trait Model<L, F>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    type Error: std::error::Error + Send + Sync + 'static;

    fn train(&mut self, data: &[DataPoint<L, F>]) -> Result<(), Self::Error>;

    fn test(&self, data: &[DataPoint<L, F>]) -> Result<Vec<L>, Self::Error>;
}
