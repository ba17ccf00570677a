//! InfiniBand port metrics collector.
//!
//! This module provides infrastructure for collecting port state and counters
//! from the Linux `/sys/class/infiniband` tree, with support for mocking so
//! tests run on hosts without RDMA hardware.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    Collector                    │
//! │  - link layer filter                            │
//! │  - capacity bound, duplicate names              │
//! │          ┌──────────────────────────┐           │
//! │          │      PortCollector       │           │
//! │          │  - <dev>/ports/<n>/*     │           │
//! │          │  - <dev>/ports/<n>/      │           │
//! │          │        counters/*        │           │
//! │          └────────────┬─────────────┘           │
//! │                ┌──────▼──────┐                  │
//! │                │  FileSystem │ (trait)          │
//! │                └──────┬──────┘                  │
//! └───────────────────────┼─────────────────────────┘
//!          ┌──────────────┼──────────────┐
//!   ┌──────▼──────┐ ┌─────▼──────┐ ┌─────▼──────┐
//!   │   RealFs    │ │   MockFs   │ │ Scenarios  │
//!   │  (Linux)    │ │ (Testing)  │ │ (Fixtures) │
//!   └─────────────┘ └────────────┘ └────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use ibtop::collector::{Collector, MockFs};
//!
//! let fs = MockFs::infiniband_host();
//! let mut collector = Collector::new(fs, "/sys");
//! let snapshot = collector.collect_snapshot().unwrap();
//! assert_eq!(snapshot.len(), 2);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
pub mod sysfs;
pub mod traits;

pub use collector::{Collector, CollectorStats};
pub use mock::{MockFs, PortAttribute, PortFixture};
pub use sysfs::{CollectError, SkipReason};
pub use traits::{FileSystem, RealFs};
