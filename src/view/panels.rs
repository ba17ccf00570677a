//! Dashboard panel view models.
//!
//! Four fixed panels: port status, per-second I/O, cumulative errors and
//! cumulative link errors. Rows are keyed by interface name.

use std::time::Duration;

use crate::fmt::{
    format_count, format_interval, format_mb_rate, format_packet_rate, format_timestamp, truncate,
};
use crate::model::{Counter, PortRecord, Snapshot};
use crate::rates::PortRates;
use crate::view::common::{RowStyleClass, TableViewModel, ViewCell, ViewRow};

/// Widest interface name shown before truncation.
const NAME_WIDTH: u16 = 16;

const STATUS_TITLE: &str = " Interface Status ";
const STATUS_HEADERS: &[&str] = &[
    "Interface Name",
    "LID",
    "Link Layer",
    "State",
    "Physical State",
    "Rate",
];
const STATUS_WIDTHS: &[u16] = &[NAME_WIDTH, 7, 12, 15, 16, 22];

const IO_TITLE: &str = " Interface I/O (per second) ";
const IO_HEADERS: &[&str] = &[
    "Interface Name",
    "RX Packet",
    "RX MB",
    "TX Packet",
    "TX MB",
    "UC RX Packet",
    "UC TX Packet",
    "MC RX Packet",
    "MC TX Packet",
];
const IO_WIDTHS: &[u16] = &[NAME_WIDTH, 12, 10, 12, 10, 14, 14, 14, 14];

/// Shown in the I/O panel until a previous snapshot exists.
pub const WAITING_FOR_SAMPLE: &str = "waiting for second sample";

const ERROR_TITLE: &str = " Interface Error (cumulative) ";
const ERROR_HEADERS: &[&str] = &[
    "Interface Name",
    "Symbol",
    "RX",
    "RX Remote PHY",
    "RX Switch Relay",
    "RX Const.",
    "TX Const.",
    "Buffer Overrun",
    "TX Discard",
    "VL15 Dropped",
];
const ERROR_WIDTHS: &[u16] = &[NAME_WIDTH, 8, 8, 14, 16, 10, 10, 15, 11, 12];
const ERROR_COUNTERS: &[Counter] = &[
    Counter::SymbolError,
    Counter::PortRcvErrors,
    Counter::PortRcvRemotePhysicalErrors,
    Counter::PortRcvSwitchRelayErrors,
    Counter::PortRcvConstraintErrors,
    Counter::PortXmitConstraintErrors,
    Counter::ExcessiveBufferOverrunErrors,
    Counter::PortXmitDiscards,
    Counter::Vl15Dropped,
];

const LINK_ERROR_TITLE: &str = " Interface Link Error (cumulative) ";
const LINK_ERROR_HEADERS: &[&str] = &[
    "Interface Name",
    "Link Error Recovery",
    "Local Link Integrity",
    "Link Downed",
];
const LINK_ERROR_WIDTHS: &[u16] = &[NAME_WIDTH, 20, 21, 12];
const LINK_ERROR_COUNTERS: &[Counter] = &[
    Counter::LinkErrorRecovery,
    Counter::LocalLinkIntegrityErrors,
    Counter::LinkDowned,
];

/// Header line contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderViewModel {
    pub time: String,
    pub refresh: String,
    pub link_layers: String,
    pub ports: String,
}

/// Footer text.
pub const FOOTER: &str = "press 'Q' to exit";

pub fn build_header(snapshot: &Snapshot, refresh: Duration, include_ethernet: bool) -> HeaderViewModel {
    HeaderViewModel {
        time: format_timestamp(snapshot.timestamp),
        refresh: format!("refresh {}", format_interval(refresh.as_secs())),
        link_layers: if include_ethernet {
            "InfiniBand + Ethernet".to_string()
        } else {
            "InfiniBand only".to_string()
        },
        ports: match snapshot.len() {
            1 => "1 port".to_string(),
            n => format!("{} ports", n),
        },
    }
}

fn table(title: &str, headers: &[&str], widths: &[u16]) -> TableViewModel<String> {
    TableViewModel {
        title: title.to_string(),
        headers: headers.iter().map(|h| h.to_string()).collect(),
        widths: widths.to_vec(),
        rows: Vec::new(),
        placeholder: None,
    }
}

fn name_cell(name: &str) -> ViewCell {
    ViewCell::plain(truncate(name, NAME_WIDTH as usize))
}

fn counter_cells(port: &PortRecord, counters: &[Counter]) -> Vec<ViewCell> {
    counters
        .iter()
        .map(|c| {
            let value = port.counters.get(*c);
            if value > 0 {
                ViewCell::styled(format_count(value), RowStyleClass::Critical)
            } else {
                ViewCell::plain(format_count(value))
            }
        })
        .collect()
}

/// Builds the status panel. Ports that are not ACTIVE get the warning style.
pub fn build_status_view(snapshot: &Snapshot) -> TableViewModel<String> {
    let mut vm = table(STATUS_TITLE, STATUS_HEADERS, STATUS_WIDTHS);
    vm.rows = snapshot
        .ports
        .iter()
        .map(|p| ViewRow {
            id: p.interface_name.clone(),
            cells: vec![
                name_cell(&p.interface_name),
                ViewCell::plain(p.lid.to_string()),
                ViewCell::plain(p.link_layer.clone()),
                ViewCell::plain(p.state.clone()),
                ViewCell::plain(p.phys_state.clone()),
                ViewCell::plain(p.rate.clone()),
            ],
            style: if p.is_active() {
                RowStyleClass::Normal
            } else {
                RowStyleClass::Warning
            },
        })
        .collect();
    vm
}

/// Builds the I/O panel from computed rates.
///
/// `None` means no previous snapshot yet; the panel then shows a placeholder.
pub fn build_io_view(rates: Option<&[PortRates]>) -> TableViewModel<String> {
    let mut vm = table(IO_TITLE, IO_HEADERS, IO_WIDTHS);
    let Some(rates) = rates else {
        vm.placeholder = Some(WAITING_FOR_SAMPLE.to_string());
        return vm;
    };

    let packets = |v: Option<f64>| match v {
        Some(_) => ViewCell::plain(format_packet_rate(v)),
        None => ViewCell::styled(format_packet_rate(v), RowStyleClass::Dimmed),
    };
    let mb = |v: Option<f64>| match v {
        Some(_) => ViewCell::plain(format_mb_rate(v)),
        None => ViewCell::styled(format_mb_rate(v), RowStyleClass::Dimmed),
    };

    vm.rows = rates
        .iter()
        .map(|r| ViewRow {
            id: r.interface_name.clone(),
            cells: vec![
                name_cell(&r.interface_name),
                packets(r.rx_packets),
                mb(r.rx_mb),
                packets(r.tx_packets),
                mb(r.tx_mb),
                packets(r.uc_rx_packets),
                packets(r.uc_tx_packets),
                packets(r.mc_rx_packets),
                packets(r.mc_tx_packets),
            ],
            style: RowStyleClass::Normal,
        })
        .collect();
    vm
}

fn build_counter_view(
    snapshot: &Snapshot,
    title: &str,
    headers: &[&str],
    widths: &[u16],
    counters: &[Counter],
) -> TableViewModel<String> {
    let mut vm = table(title, headers, widths);
    vm.rows = snapshot
        .ports
        .iter()
        .map(|p| {
            let mut cells = vec![name_cell(&p.interface_name)];
            cells.extend(counter_cells(p, counters));
            ViewRow {
                id: p.interface_name.clone(),
                cells,
                style: RowStyleClass::Normal,
            }
        })
        .collect();
    vm
}

/// Builds the cumulative error panel. Non-zero counters are highlighted.
pub fn build_error_view(snapshot: &Snapshot) -> TableViewModel<String> {
    build_counter_view(
        snapshot,
        ERROR_TITLE,
        ERROR_HEADERS,
        ERROR_WIDTHS,
        ERROR_COUNTERS,
    )
}

/// Builds the cumulative link error panel. Non-zero counters are highlighted.
pub fn build_link_error_view(snapshot: &Snapshot) -> TableViewModel<String> {
    build_counter_view(
        snapshot,
        LINK_ERROR_TITLE,
        LINK_ERROR_HEADERS,
        LINK_ERROR_WIDTHS,
        LINK_ERROR_COUNTERS,
    )
}
