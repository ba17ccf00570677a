//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/sys/class/infiniband` trees
//! for testing discovery and filtering rules.

use std::collections::BTreeMap;

use super::filesystem::MockFs;
use crate::collector::sysfs::INFINIBAND_CLASS_PATH;
use crate::model::Counter;

/// Identifying attribute file of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortAttribute {
    LinkLayer,
    State,
    PhysState,
    Rate,
    Lid,
}

/// Attribute files of one mock port.
///
/// `None` leaves the corresponding file out of the tree.
#[derive(Debug, Clone)]
pub struct PortFixture {
    pub link_layer: Option<String>,
    pub state: Option<String>,
    pub phys_state: Option<String>,
    pub rate: Option<String>,
    pub lid: Option<String>,
    /// Counter file contents; `None` means no `counters` directory at all.
    pub counters: Option<BTreeMap<&'static str, String>>,
}

impl PortFixture {
    /// An active EDR InfiniBand port with every counter at zero.
    pub fn infiniband() -> Self {
        let counters = Counter::ALL
            .iter()
            .map(|c| (c.file_name(), "0\n".to_string()))
            .collect();
        Self {
            link_layer: Some("InfiniBand\n".to_string()),
            state: Some("4: ACTIVE\n".to_string()),
            phys_state: Some("5: LinkUp\n".to_string()),
            rate: Some("100 Gb/sec (4X EDR)\n".to_string()),
            lid: Some("0x1\n".to_string()),
            counters: Some(counters),
        }
    }

    /// A RoCE port: Ethernet link layer, LID 0.
    pub fn ethernet() -> Self {
        Self {
            link_layer: Some("Ethernet\n".to_string()),
            rate: Some("25 Gb/sec (1X EDR)\n".to_string()),
            lid: Some("0x0\n".to_string()),
            ..Self::infiniband()
        }
    }

    pub fn with_state(mut self, state: &str, phys_state: &str) -> Self {
        self.state = Some(format!("{}\n", state));
        self.phys_state = Some(format!("{}\n", phys_state));
        self
    }

    pub fn with_lid(mut self, lid: &str) -> Self {
        self.lid = Some(format!("{}\n", lid));
        self
    }

    pub fn with_counter(self, counter: Counter, value: u64) -> Self {
        self.with_raw_counter(counter, &value.to_string())
    }

    pub fn with_raw_counter(mut self, counter: Counter, raw: &str) -> Self {
        if let Some(counters) = self.counters.as_mut() {
            counters.insert(counter.file_name(), format!("{}\n", raw));
        }
        self
    }

    pub fn without_counter(mut self, counter: Counter) -> Self {
        if let Some(counters) = self.counters.as_mut() {
            counters.remove(counter.file_name());
        }
        self
    }

    pub fn without_counters(mut self) -> Self {
        self.counters = None;
        self
    }

    /// Drops one of the port attribute files.
    pub fn without(mut self, attribute: PortAttribute) -> Self {
        match attribute {
            PortAttribute::LinkLayer => self.link_layer = None,
            PortAttribute::State => self.state = None,
            PortAttribute::PhysState => self.phys_state = None,
            PortAttribute::Rate => self.rate = None,
            PortAttribute::Lid => self.lid = None,
        }
        self
    }
}

impl MockFs {
    /// Adds one port under `/sys/class/infiniband/<device>/ports/<port>`.
    pub fn add_ib_port(&mut self, device: &str, port: u32, fixture: &PortFixture) {
        let base = format!("/sys/{}/{}/ports/{}", INFINIBAND_CLASS_PATH, device, port);
        self.add_dir(&base);

        let attributes = [
            ("link_layer", &fixture.link_layer),
            ("state", &fixture.state),
            ("phys_state", &fixture.phys_state),
            ("rate", &fixture.rate),
            ("lid", &fixture.lid),
        ];
        for (name, content) in attributes {
            if let Some(content) = content {
                self.add_file(format!("{}/{}", base, name), content.as_str());
            }
        }

        if let Some(counters) = &fixture.counters {
            let counters_dir = format!("{}/counters", base);
            self.add_dir(&counters_dir);
            for (name, content) in counters {
                self.add_file(format!("{}/{}", counters_dir, name), content.as_str());
            }
        }
    }

    /// Creates a typical RDMA host.
    ///
    /// Includes: two ConnectX InfiniBand ports (`mlx5_0:1` active,
    /// `mlx5_1:1` down), one RoCE port (`mlx5_2:1`) and a soft-RoCE
    /// device (`rxe0:1`) without counters.
    pub fn infiniband_host() -> Self {
        let mut fs = Self::new();
        fs.add_file("/proc/sys/kernel/ostype", "Linux\n");

        fs.add_ib_port(
            "mlx5_0",
            1,
            &PortFixture::infiniband()
                .with_lid("0x1a")
                .with_counter(Counter::PortRcvPackets, 1_000)
                .with_counter(Counter::PortXmitPackets, 2_000)
                .with_counter(Counter::PortRcvData, 262_144)
                .with_counter(Counter::PortXmitData, 524_288)
                .with_counter(Counter::SymbolError, 3),
        );
        fs.add_ib_port(
            "mlx5_1",
            1,
            &PortFixture::infiniband()
                .with_state("1: DOWN", "3: Disabled")
                .with_lid("0xffff"),
        );
        fs.add_ib_port("mlx5_2", 1, &PortFixture::ethernet());
        fs.add_ib_port("rxe0", 1, &PortFixture::ethernet().without_counters());
        fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::traits::FileSystem;
    use std::path::Path;

    #[test]
    fn test_add_ib_port_layout() {
        let mut fs = MockFs::new();
        fs.add_ib_port("mlx5_0", 1, &PortFixture::infiniband());

        let port = Path::new("/sys/class/infiniband/mlx5_0/ports/1");
        assert!(fs.is_dir(port));
        assert!(fs.is_dir(&port.join("counters")));
        assert!(fs.exists(&port.join("link_layer")));
        assert!(fs.exists(&port.join("counters/VL15_dropped")));
        assert_eq!(
            fs.read_dir(&port.join("counters")).unwrap().len(),
            Counter::ALL.len()
        );
    }

    #[test]
    fn test_infiniband_host_devices() {
        let fs = MockFs::infiniband_host();
        let devices = fs.read_dir(Path::new("/sys/class/infiniband")).unwrap();
        assert_eq!(devices.len(), 4);
        assert!(!fs.is_dir(Path::new("/sys/class/infiniband/rxe0/ports/1/counters")));
    }
}
