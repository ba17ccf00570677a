//! Port discovery and per-port reads under `/sys/class/infiniband`.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::collector::sysfs::parser::{ReadError, read_counter, read_integer, read_line};
use crate::collector::traits::FileSystem;
use crate::model::{Counter, LINK_LAYER_INFINIBAND, PortCounters, PortRecord};

/// Location of the InfiniBand class relative to the sysfs mount point.
pub const INFINIBAND_CLASS_PATH: &str = "class/infiniband";

/// Error type for collection failures.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The device root could not be listed. Nothing can be collected.
    #[error("unable to open {}: {source}", path.display())]
    DeviceRootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single port was left out of a snapshot.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("link layer unreadable: {0}")]
    LinkLayerUnreadable(#[source] ReadError),
    #[error("link layer {0} filtered out")]
    FilteredLinkLayer(String),
    #[error("no counters directory")]
    NoCounters,
    #[error("port metadata unreadable: {0}")]
    MetadataUnreadable(#[source] ReadError),
}

/// Reads devices, ports and port attributes from the InfiniBand sysfs class.
pub struct PortCollector<F: FileSystem> {
    fs: F,
    class_path: PathBuf,
}

impl<F: FileSystem> PortCollector<F> {
    /// Creates a new port collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `sysfs_path` - Base path to the sysfs mount (usually "/sys")
    pub fn new(fs: F, sysfs_path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            class_path: sysfs_path.as_ref().join(INFINIBAND_CLASS_PATH),
        }
    }

    /// Lists device names, sorted.
    pub fn list_devices(&self) -> Result<Vec<String>, CollectError> {
        let entries = self.fs.read_dir(&self.class_path).map_err(|source| {
            CollectError::DeviceRootUnavailable {
                path: self.class_path.clone(),
                source,
            }
        })?;
        Ok(sorted_names(entries))
    }

    /// Lists port numbers of a device, sorted.
    ///
    /// Returns `None` when the device has no readable `ports` directory.
    pub fn list_ports(&self, device: &str) -> Option<Vec<String>> {
        let ports_path = self.class_path.join(device).join("ports");
        self.fs.read_dir(&ports_path).ok().map(sorted_names)
    }

    /// Reads one port into a fully populated record.
    ///
    /// Identifying attributes must be readable; counters fall back to zero.
    pub fn collect_port(
        &self,
        device: &str,
        port: &str,
        include_ethernet: bool,
    ) -> Result<PortRecord, SkipReason> {
        let port_path = self.class_path.join(device).join("ports").join(port);

        let link_layer = read_line(&self.fs, &port_path.join("link_layer"))
            .map_err(SkipReason::LinkLayerUnreadable)?;
        if !include_ethernet && link_layer != LINK_LAYER_INFINIBAND {
            return Err(SkipReason::FilteredLinkLayer(link_layer));
        }

        // Soft-RoCE devices (rxe) have no standard counters directory.
        let counters_path = port_path.join("counters");
        if !self.fs.is_dir(&counters_path) {
            return Err(SkipReason::NoCounters);
        }

        let state = read_line(&self.fs, &port_path.join("state"))
            .map_err(SkipReason::MetadataUnreadable)?;
        let phys_state = read_line(&self.fs, &port_path.join("phys_state"))
            .map_err(SkipReason::MetadataUnreadable)?;
        let rate = read_line(&self.fs, &port_path.join("rate"))
            .map_err(SkipReason::MetadataUnreadable)?;
        let lid = read_integer(&self.fs, &port_path.join("lid"))
            .map_err(SkipReason::MetadataUnreadable)?;

        Ok(PortRecord {
            interface_name: PortRecord::interface_name(device, port),
            link_layer,
            state,
            phys_state,
            rate,
            lid,
            counters: self.collect_counters(&counters_path),
        })
    }

    /// Reads every counter independently. Unreadable counters stay at zero.
    pub fn collect_counters(&self, counters_path: &Path) -> PortCounters {
        let mut counters = PortCounters::default();
        for counter in Counter::ALL {
            *counters.slot_mut(counter) =
                read_counter(&self.fs, &counters_path.join(counter.file_name())).unwrap_or(0);
        }
        counters
    }
}

fn sorted_names(entries: Vec<PathBuf>) -> Vec<String> {
    let mut names: Vec<String> = entries
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
