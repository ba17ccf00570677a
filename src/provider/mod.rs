//! Provider abstraction for snapshot data sources.
//!
//! This module defines the `SnapshotProvider` trait that lets the sampler
//! pull snapshots without knowing where they come from. The live provider
//! reads sysfs; tests substitute scripted providers.

mod live;

pub use live::LiveProvider;

use thiserror::Error;

use crate::collector::CollectError;
use crate::model::Snapshot;

/// Error types that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Error during data collection.
    #[error("collection error: {0}")]
    Collection(#[from] CollectError),
}

/// Abstraction for snapshot data sources.
///
/// The trait is object-safe and designed to be used with `Box<dyn SnapshotProvider>`.
pub trait SnapshotProvider {
    /// Produces the next snapshot.
    ///
    /// Collects a fresh snapshot from the system. An empty
    /// snapshot is a valid result; only a collection failure is an error.
    fn advance(&mut self) -> Result<Snapshot, ProviderError>;
}
