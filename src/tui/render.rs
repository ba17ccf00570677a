//! Main rendering logic for TUI.

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::sampler::DashboardView;
use crate::view::common::TableViewModel;
use crate::view::panels::{
    HeaderViewModel, build_error_view, build_header, build_io_view, build_link_error_view,
    build_status_view,
};

use super::widgets::{panel_height, render_footer, render_header, render_panel};

/// Everything drawn in one frame.
pub struct Screen {
    pub header: HeaderViewModel,
    pub status: TableViewModel<String>,
    pub io: TableViewModel<String>,
    pub errors: TableViewModel<String>,
    pub link_errors: TableViewModel<String>,
}

impl Screen {
    /// Builds the frame contents from one sampler cycle.
    pub fn build(view: &DashboardView<'_>, refresh: Duration, include_ethernet: bool) -> Self {
        Self {
            header: build_header(view.snapshot, refresh, include_ethernet),
            status: build_status_view(view.snapshot),
            io: build_io_view(view.rates.as_deref()),
            errors: build_error_view(view.snapshot),
            link_errors: build_link_error_view(view.snapshot),
        }
    }
}

/// Main render function.
pub fn render(frame: &mut Frame, screen: &Screen) {
    let area = frame.area();

    // Panel heights follow the live port count
    let chunks = Layout::vertical([
        Constraint::Length(1),                                 // Header
        Constraint::Length(panel_height(&screen.status)),      // Interface Status
        Constraint::Length(panel_height(&screen.io)),          // Interface I/O
        Constraint::Length(panel_height(&screen.errors)),      // Interface Error
        Constraint::Length(panel_height(&screen.link_errors)), // Interface Link Error
        Constraint::Min(0),                                    // Spare rows
        Constraint::Length(1),                                 // Footer
    ])
    .split(area);

    render_header(frame, chunks[0], &screen.header);
    render_panel(frame, chunks[1], &screen.status);
    render_panel(frame, chunks[2], &screen.io);
    render_panel(frame, chunks[3], &screen.errors);
    render_panel(frame, chunks[4], &screen.link_errors);
    render_footer(frame, chunks[6]);
}
