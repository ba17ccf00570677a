//! Live data provider for real-time port monitoring.

use crate::collector::traits::FileSystem;
use crate::collector::Collector;
use crate::model::Snapshot;

use super::{ProviderError, SnapshotProvider};

/// Provider for real-time port data collection.
///
/// Collects snapshots from sysfs using the `Collector`.
pub struct LiveProvider<F: FileSystem> {
    collector: Collector<F>,
}

impl<F: FileSystem> LiveProvider<F> {
    /// Creates a new live provider.
    ///
    /// # Arguments
    /// * `collector` - The collector to use for gathering port metrics
    pub fn new(collector: Collector<F>) -> Self {
        Self { collector }
    }
}

impl<F: FileSystem> SnapshotProvider for LiveProvider<F> {
    fn advance(&mut self) -> Result<Snapshot, ProviderError> {
        Ok(self.collector.collect_snapshot()?)
    }
}
