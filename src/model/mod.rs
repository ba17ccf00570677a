//! Data model shared by the collector, the sampler and the dashboard.

mod port;
mod snapshot;

pub use port::{Counter, LINK_LAYER_INFINIBAND, PortCounters, PortRecord};
pub use snapshot::Snapshot;
