//! Point-in-time collection of port records.

use std::collections::HashMap;

use super::port::PortRecord;

/// One poll of every discovered port.
///
/// Ports keep the order the collector produced them in. Consumers that compare
/// two snapshots must match ports by `interface_name`, never by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Unix timestamp (seconds) when the snapshot was collected.
    pub timestamp: i64,
    pub ports: Vec<PortRecord>,
}

impl Snapshot {
    pub fn new(timestamp: i64, ports: Vec<PortRecord>) -> Self {
        Self { timestamp, ports }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Finds a port by its `"<device>:<port>"` name.
    pub fn port(&self, interface_name: &str) -> Option<&PortRecord> {
        self.ports
            .iter()
            .find(|p| p.interface_name == interface_name)
    }

    /// Builds a name-keyed index for matching against another snapshot.
    pub fn index_by_name(&self) -> HashMap<&str, &PortRecord> {
        self.ports
            .iter()
            .map(|p| (p.interface_name.as_str(), p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str) -> PortRecord {
        PortRecord {
            interface_name: name.to_string(),
            link_layer: "InfiniBand".to_string(),
            ..PortRecord::default()
        }
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = Snapshot::new(100, vec![port("mlx5_0:1"), port("mlx5_1:1")]);
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
        assert!(snapshot.port("mlx5_1:1").is_some());
        assert!(snapshot.port("mlx5_2:1").is_none());

        let index = snapshot.index_by_name();
        assert_eq!(index.len(), 2);
        assert_eq!(index["mlx5_0:1"].interface_name, "mlx5_0:1");
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.index_by_name().is_empty());
    }
}
