//! Per-second rate computation between two snapshots.
//!
//! Ports are matched by interface name, never by position. A port present
//! only in the current snapshot has no rates yet.

use std::collections::HashMap;
use std::time::Duration;

use crate::model::{Counter, PortRecord, Snapshot};

/// Bytes carried by one data lane unit of `port_xmit_data` / `port_rcv_data`.
pub const LANE_BYTES: f64 = 4.0;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// ---------------------------------------------------------------------------
// Delta helpers
// ---------------------------------------------------------------------------

/// Compute u64 delta, returning `None` on counter regression (device reset).
pub fn du64(curr: u64, prev: u64) -> Option<u64> {
    curr.checked_sub(prev)
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Per-second traffic rates of one port.
///
/// Each field is `None` when the counter went backwards between samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortRates {
    pub interface_name: String,
    pub rx_packets: Option<f64>,
    pub rx_mb: Option<f64>,
    pub tx_packets: Option<f64>,
    pub tx_mb: Option<f64>,
    pub uc_rx_packets: Option<f64>,
    pub uc_tx_packets: Option<f64>,
    pub mc_rx_packets: Option<f64>,
    pub mc_tx_packets: Option<f64>,
}

impl PortRates {
    /// Computes rates for one port pair over `secs` seconds.
    pub fn between(current: &PortRecord, previous: &PortRecord, secs: f64) -> Self {
        let rate = |counter: Counter| -> Option<f64> {
            let delta =
                du64(current.counters.get(counter), previous.counters.get(counter))? as f64;
            if counter.is_lane_counter() {
                Some(delta * LANE_BYTES / BYTES_PER_MB / secs)
            } else {
                Some(delta / secs)
            }
        };

        Self {
            interface_name: current.interface_name.clone(),
            rx_packets: rate(Counter::PortRcvPackets),
            rx_mb: rate(Counter::PortRcvData),
            tx_packets: rate(Counter::PortXmitPackets),
            tx_mb: rate(Counter::PortXmitData),
            uc_rx_packets: rate(Counter::UnicastRcvPackets),
            uc_tx_packets: rate(Counter::UnicastXmitPackets),
            mc_rx_packets: rate(Counter::MulticastRcvPackets),
            mc_tx_packets: rate(Counter::MulticastXmitPackets),
        }
    }
}

/// Computes rates for every port present in both snapshots.
///
/// The result follows the order of `current`. `elapsed` is the nominal
/// refresh interval; a zero interval yields no rates.
pub fn compute_rates(current: &Snapshot, previous: &Snapshot, elapsed: Duration) -> Vec<PortRates> {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return Vec::new();
    }

    let previous_by_name: HashMap<&str, &PortRecord> = previous.index_by_name();
    current
        .ports
        .iter()
        .filter_map(|port| {
            previous_by_name
                .get(port.interface_name.as_str())
                .map(|prev| PortRates::between(port, prev, secs))
        })
        .collect()
}
