//! Collectors for the Linux InfiniBand sysfs class.
//!
//! Layout read by this module:
//!
//! ```text
//! /sys/class/infiniband/<device>/ports/<port>/
//!     link_layer  state  phys_state  rate  lid
//!     counters/<counter>
//! ```

pub mod parser;
pub mod port;

pub use parser::{ParseError, ReadError};
pub use port::{CollectError, INFINIBAND_CLASS_PATH, PortCollector, SkipReason};
