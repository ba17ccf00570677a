//! ibtop - live InfiniBand/RoCE port counter dashboard.
//!
//! This library provides the pieces the `ibtop` binary wires together:
//! - `collector` - discovers ports under `/sys/class/infiniband`
//! - `sampler` - poll/render/wait loop with per-second rates
//! - `tui` - ratatui dashboard and terminal input

pub mod collector;
pub mod fmt;
pub mod model;
pub mod provider;
pub mod rates;
pub mod sampler;
pub mod tui;
pub mod util;
pub mod view;
