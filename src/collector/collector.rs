//! Main collector that turns the InfiniBand sysfs class into snapshots.
//!
//! The `Collector` struct walks every device and port, applies the
//! link-layer filter and the capacity bound, and returns a `Snapshot`.

use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::collector::sysfs::{CollectError, PortCollector};
use crate::collector::traits::FileSystem;
use crate::model::Snapshot;

/// Statistics of the last `collect_snapshot` call.
///
/// Used for logging and debugging.
#[derive(Debug, Clone, Default)]
pub struct CollectorStats {
    /// Total snapshot collection time.
    pub total: Duration,
    /// Number of devices found under the class directory.
    pub devices: usize,
    /// Number of ports kept in the snapshot.
    pub ports: usize,
    /// Number of ports left out (filtered, unreadable or duplicate).
    pub skipped: usize,
    /// Whether discovery stopped at the capacity bound.
    pub truncated: bool,
}

/// Main collector that gathers port metrics.
pub struct Collector<F: FileSystem> {
    ports: PortCollector<F>,
    include_ethernet: bool,
    max_ports: usize,
    /// Statistics from the last collect_snapshot call.
    last_stats: Option<CollectorStats>,
}

impl<F: FileSystem> Collector<F> {
    /// Default number of ports kept per snapshot.
    pub const DEFAULT_MAX_PORTS: usize = 32;

    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `sysfs_path` - Base path to the sysfs mount (usually "/sys")
    ///
    /// Only InfiniBand link-layer ports are collected until
    /// `with_ethernet(true)` is applied.
    pub fn new(fs: F, sysfs_path: impl AsRef<Path>) -> Self {
        Self {
            ports: PortCollector::new(fs, sysfs_path),
            include_ethernet: false,
            max_ports: Self::DEFAULT_MAX_PORTS,
            last_stats: None,
        }
    }

    /// Includes Ethernet (RoCE) link-layer ports.
    pub fn with_ethernet(mut self, include_ethernet: bool) -> Self {
        self.include_ethernet = include_ethernet;
        self
    }

    /// Sets the maximum number of ports per snapshot. Values below 1 are raised to 1.
    pub fn with_max_ports(mut self, max_ports: usize) -> Self {
        self.max_ports = max_ports.max(1);
        self
    }

    pub fn include_ethernet(&self) -> bool {
        self.include_ethernet
    }

    pub fn max_ports(&self) -> usize {
        self.max_ports
    }

    /// Returns statistics from the last collect_snapshot call.
    pub fn last_stats(&self) -> Option<&CollectorStats> {
        self.last_stats.as_ref()
    }

    /// Collects a complete snapshot of all matching ports.
    ///
    /// Fails only when the device root cannot be listed. An empty snapshot
    /// means no port matched and is returned as `Ok`.
    pub fn collect_snapshot(&mut self) -> Result<Snapshot, CollectError> {
        let start = Instant::now();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let devices = self.ports.list_devices()?;
        let mut stats = CollectorStats {
            devices: devices.len(),
            ..CollectorStats::default()
        };

        let mut records = Vec::new();
        let mut seen = HashSet::new();

        'devices: for device in &devices {
            let Some(ports) = self.ports.list_ports(device) else {
                debug!(device = %device, "skipping device without readable ports directory");
                continue;
            };

            for port in &ports {
                if records.len() >= self.max_ports {
                    stats.truncated = true;
                    break 'devices;
                }

                let record = match self.ports.collect_port(device, port, self.include_ethernet) {
                    Ok(record) => record,
                    Err(reason) => {
                        debug!(device = %device, port = %port, reason = %reason, "skipping port");
                        stats.skipped += 1;
                        continue;
                    }
                };

                if !seen.insert(record.interface_name.clone()) {
                    debug!(interface = %record.interface_name, "skipping duplicate interface name");
                    stats.skipped += 1;
                    continue;
                }
                records.push(record);
            }
        }

        if stats.truncated {
            warn!(
                max_ports = self.max_ports,
                "port capacity reached, remaining ports are not displayed"
            );
        }

        stats.ports = records.len();
        stats.total = start.elapsed();
        debug!(
            devices = stats.devices,
            ports = stats.ports,
            skipped = stats.skipped,
            elapsed_us = stats.total.as_micros() as u64,
            "collected snapshot"
        );
        self.last_stats = Some(stats);

        Ok(Snapshot::new(timestamp, records))
    }
}
