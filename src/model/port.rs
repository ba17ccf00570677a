//! Per-port record and counter definitions.

/// Link layer name the kernel reports for native InfiniBand ports.
pub const LINK_LAYER_INFINIBAND: &str = "InfiniBand";

/// A cumulative port counter exposed under `ports/<n>/counters/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    SymbolError,
    PortRcvErrors,
    PortRcvRemotePhysicalErrors,
    PortRcvSwitchRelayErrors,
    LinkErrorRecovery,
    PortXmitConstraintErrors,
    PortRcvConstraintErrors,
    LocalLinkIntegrityErrors,
    ExcessiveBufferOverrunErrors,
    PortXmitData,
    PortRcvData,
    PortXmitPackets,
    PortRcvPackets,
    UnicastRcvPackets,
    UnicastXmitPackets,
    MulticastRcvPackets,
    MulticastXmitPackets,
    LinkDowned,
    PortXmitDiscards,
    Vl15Dropped,
}

impl Counter {
    /// Every counter, in the order they are read from sysfs.
    pub const ALL: [Counter; 20] = [
        Counter::SymbolError,
        Counter::PortRcvErrors,
        Counter::PortRcvRemotePhysicalErrors,
        Counter::PortRcvSwitchRelayErrors,
        Counter::LinkErrorRecovery,
        Counter::PortXmitConstraintErrors,
        Counter::PortRcvConstraintErrors,
        Counter::LocalLinkIntegrityErrors,
        Counter::ExcessiveBufferOverrunErrors,
        Counter::PortXmitData,
        Counter::PortRcvData,
        Counter::PortXmitPackets,
        Counter::PortRcvPackets,
        Counter::UnicastRcvPackets,
        Counter::UnicastXmitPackets,
        Counter::MulticastRcvPackets,
        Counter::MulticastXmitPackets,
        Counter::LinkDowned,
        Counter::PortXmitDiscards,
        Counter::Vl15Dropped,
    ];

    /// File name of the counter inside the `counters` directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Counter::SymbolError => "symbol_error",
            Counter::PortRcvErrors => "port_rcv_errors",
            Counter::PortRcvRemotePhysicalErrors => "port_rcv_remote_physical_errors",
            Counter::PortRcvSwitchRelayErrors => "port_rcv_switch_relay_errors",
            Counter::LinkErrorRecovery => "link_error_recovery",
            Counter::PortXmitConstraintErrors => "port_xmit_constraint_errors",
            Counter::PortRcvConstraintErrors => "port_rcv_constraint_errors",
            Counter::LocalLinkIntegrityErrors => "local_link_integrity_errors",
            Counter::ExcessiveBufferOverrunErrors => "excessive_buffer_overrun_errors",
            Counter::PortXmitData => "port_xmit_data",
            Counter::PortRcvData => "port_rcv_data",
            Counter::PortXmitPackets => "port_xmit_packets",
            Counter::PortRcvPackets => "port_rcv_packets",
            Counter::UnicastRcvPackets => "unicast_rcv_packets",
            Counter::UnicastXmitPackets => "unicast_xmit_packets",
            Counter::MulticastRcvPackets => "multicast_rcv_packets",
            Counter::MulticastXmitPackets => "multicast_xmit_packets",
            Counter::LinkDowned => "link_downed",
            Counter::PortXmitDiscards => "port_xmit_discards",
            Counter::Vl15Dropped => "VL15_dropped",
        }
    }

    /// Whether the counter counts 4-byte lanes rather than packets or events.
    pub fn is_lane_counter(self) -> bool {
        matches!(self, Counter::PortXmitData | Counter::PortRcvData)
    }

    /// Whether the counter tracks an error condition rather than traffic.
    pub fn is_error(self) -> bool {
        !matches!(
            self,
            Counter::PortXmitData
                | Counter::PortRcvData
                | Counter::PortXmitPackets
                | Counter::PortRcvPackets
                | Counter::UnicastRcvPackets
                | Counter::UnicastXmitPackets
                | Counter::MulticastRcvPackets
                | Counter::MulticastXmitPackets
        )
    }
}

/// Cumulative counters of a single port.
///
/// Values only grow until the device or driver is reset. A counter whose file
/// could not be read stays at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortCounters {
    pub symbol_error: u64,
    pub port_rcv_errors: u64,
    pub port_rcv_remote_physical_errors: u64,
    pub port_rcv_switch_relay_errors: u64,
    pub link_error_recovery: u64,
    pub port_xmit_constraint_errors: u64,
    pub port_rcv_constraint_errors: u64,
    pub local_link_integrity_errors: u64,
    pub excessive_buffer_overrun_errors: u64,
    /// Transmitted data in 4-byte lanes.
    pub port_xmit_data: u64,
    /// Received data in 4-byte lanes.
    pub port_rcv_data: u64,
    pub port_xmit_packets: u64,
    pub port_rcv_packets: u64,
    pub unicast_rcv_packets: u64,
    pub unicast_xmit_packets: u64,
    pub multicast_rcv_packets: u64,
    pub multicast_xmit_packets: u64,
    pub link_downed: u64,
    pub port_xmit_discards: u64,
    pub vl15_dropped: u64,
}

impl PortCounters {
    /// Returns the value of `counter`.
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::SymbolError => self.symbol_error,
            Counter::PortRcvErrors => self.port_rcv_errors,
            Counter::PortRcvRemotePhysicalErrors => self.port_rcv_remote_physical_errors,
            Counter::PortRcvSwitchRelayErrors => self.port_rcv_switch_relay_errors,
            Counter::LinkErrorRecovery => self.link_error_recovery,
            Counter::PortXmitConstraintErrors => self.port_xmit_constraint_errors,
            Counter::PortRcvConstraintErrors => self.port_rcv_constraint_errors,
            Counter::LocalLinkIntegrityErrors => self.local_link_integrity_errors,
            Counter::ExcessiveBufferOverrunErrors => self.excessive_buffer_overrun_errors,
            Counter::PortXmitData => self.port_xmit_data,
            Counter::PortRcvData => self.port_rcv_data,
            Counter::PortXmitPackets => self.port_xmit_packets,
            Counter::PortRcvPackets => self.port_rcv_packets,
            Counter::UnicastRcvPackets => self.unicast_rcv_packets,
            Counter::UnicastXmitPackets => self.unicast_xmit_packets,
            Counter::MulticastRcvPackets => self.multicast_rcv_packets,
            Counter::MulticastXmitPackets => self.multicast_xmit_packets,
            Counter::LinkDowned => self.link_downed,
            Counter::PortXmitDiscards => self.port_xmit_discards,
            Counter::Vl15Dropped => self.vl15_dropped,
        }
    }

    /// Returns a mutable reference to the slot backing `counter`.
    pub fn slot_mut(&mut self, counter: Counter) -> &mut u64 {
        match counter {
            Counter::SymbolError => &mut self.symbol_error,
            Counter::PortRcvErrors => &mut self.port_rcv_errors,
            Counter::PortRcvRemotePhysicalErrors => &mut self.port_rcv_remote_physical_errors,
            Counter::PortRcvSwitchRelayErrors => &mut self.port_rcv_switch_relay_errors,
            Counter::LinkErrorRecovery => &mut self.link_error_recovery,
            Counter::PortXmitConstraintErrors => &mut self.port_xmit_constraint_errors,
            Counter::PortRcvConstraintErrors => &mut self.port_rcv_constraint_errors,
            Counter::LocalLinkIntegrityErrors => &mut self.local_link_integrity_errors,
            Counter::ExcessiveBufferOverrunErrors => &mut self.excessive_buffer_overrun_errors,
            Counter::PortXmitData => &mut self.port_xmit_data,
            Counter::PortRcvData => &mut self.port_rcv_data,
            Counter::PortXmitPackets => &mut self.port_xmit_packets,
            Counter::PortRcvPackets => &mut self.port_rcv_packets,
            Counter::UnicastRcvPackets => &mut self.unicast_rcv_packets,
            Counter::UnicastXmitPackets => &mut self.unicast_xmit_packets,
            Counter::MulticastRcvPackets => &mut self.multicast_rcv_packets,
            Counter::MulticastXmitPackets => &mut self.multicast_xmit_packets,
            Counter::LinkDowned => &mut self.link_downed,
            Counter::PortXmitDiscards => &mut self.port_xmit_discards,
            Counter::Vl15Dropped => &mut self.vl15_dropped,
        }
    }
}

/// One discovered InfiniBand-capable port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortRecord {
    /// `"<device>:<port>"`, e.g. `"mlx5_0:1"`.
    pub interface_name: String,
    /// Kernel link layer name (`"InfiniBand"` or `"Ethernet"`).
    pub link_layer: String,
    /// Logical port state, e.g. `"4: ACTIVE"`.
    pub state: String,
    /// Physical port state, e.g. `"5: LinkUp"`.
    pub phys_state: String,
    /// Link rate, e.g. `"100 Gb/sec (4X EDR)"`.
    pub rate: String,
    /// Local identifier. Only meaningful on the InfiniBand link layer.
    pub lid: i64,
    pub counters: PortCounters,
}

impl PortRecord {
    /// Builds the composite interface name used to match ports across snapshots.
    pub fn interface_name(device: &str, port: &str) -> String {
        format!("{}:{}", device, port)
    }

    pub fn is_infiniband(&self) -> bool {
        self.link_layer == LINK_LAYER_INFINIBAND
    }

    /// Whether the logical state reports the port as ACTIVE.
    pub fn is_active(&self) -> bool {
        self.state.to_ascii_uppercase().contains("ACTIVE")
    }

    /// Sum of all error counters shown in the error panels.
    pub fn total_errors(&self) -> u64 {
        Counter::ALL
            .iter()
            .filter(|c| c.is_error())
            .map(|c| self.counters.get(*c))
            .fold(0u64, u64::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_counter_file_names_are_unique() {
        let names: HashSet<_> = Counter::ALL.iter().map(|c| c.file_name()).collect();
        assert_eq!(names.len(), Counter::ALL.len());
    }

    #[test]
    fn test_slot_mut_matches_get() {
        let mut counters = PortCounters::default();
        for (i, counter) in Counter::ALL.iter().enumerate() {
            *counters.slot_mut(*counter) = i as u64 + 1;
        }
        for (i, counter) in Counter::ALL.iter().enumerate() {
            assert_eq!(counters.get(*counter), i as u64 + 1, "{:?}", counter);
        }
    }

    #[test]
    fn test_error_and_lane_classification() {
        assert!(Counter::SymbolError.is_error());
        assert!(Counter::Vl15Dropped.is_error());
        assert!(!Counter::PortRcvPackets.is_error());
        assert!(Counter::PortRcvData.is_lane_counter());
        assert!(!Counter::PortRcvPackets.is_lane_counter());
        assert_eq!(Counter::ALL.iter().filter(|c| c.is_error()).count(), 12);
    }

    #[test]
    fn test_port_record_helpers() {
        let mut port = PortRecord {
            interface_name: PortRecord::interface_name("mlx5_0", "1"),
            link_layer: "InfiniBand".to_string(),
            state: "4: ACTIVE".to_string(),
            ..PortRecord::default()
        };
        assert_eq!(port.interface_name, "mlx5_0:1");
        assert!(port.is_infiniband());
        assert!(port.is_active());
        assert_eq!(port.total_errors(), 0);

        port.counters.symbol_error = 3;
        port.counters.link_downed = 2;
        port.counters.port_rcv_packets = 1000;
        assert_eq!(port.total_errors(), 5);

        port.state = "1: DOWN".to_string();
        assert!(!port.is_active());
    }
}
