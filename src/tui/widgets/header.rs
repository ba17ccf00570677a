//! Header and footer lines.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::style::Styles;
use crate::view::panels::{FOOTER, HeaderViewModel};

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, header: &HeaderViewModel) {
    let chunks = Layout::horizontal([
        Constraint::Length(22), // Time
        Constraint::Length(14), // Refresh
        Constraint::Length(24), // Link layers
        Constraint::Min(10),    // Ports
    ])
    .split(area);

    let cells = [
        &header.time,
        &header.refresh,
        &header.link_layers,
        &header.ports,
    ];
    for (text, chunk) in cells.into_iter().zip(chunks.iter()) {
        frame.render_widget(
            Paragraph::new(format!(" {}", text)).style(Styles::header()),
            *chunk,
        );
    }
}

/// Renders the footer with the exit hint.
pub fn render_footer(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(FOOTER, Styles::help_key()),
    ]);
    frame.render_widget(Paragraph::new(line).style(Styles::help()), area);
}
