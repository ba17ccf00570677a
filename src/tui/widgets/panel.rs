//! Bordered table panel.
//! Thin TUI wrapper over the table view models in [`crate::view::panels`].

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::tui::style::Styles;
use crate::view::common::TableViewModel;

/// Borders plus the column header line.
const PANEL_CHROME: u16 = 3;

/// Total height a panel needs for its content.
pub fn panel_height<Id>(vm: &TableViewModel<Id>) -> u16 {
    vm.body_height().saturating_add(PANEL_CHROME)
}

/// Renders one table panel.
pub fn render_panel<Id>(frame: &mut Frame, area: Rect, vm: &TableViewModel<Id>) {
    let block = Block::default()
        .title(Span::styled(vm.title.clone(), Styles::panel_title()))
        .borders(Borders::ALL)
        .style(Styles::default());

    let header = Row::new(
        vm.headers
            .iter()
            .map(|h| Span::styled(h.clone(), Styles::table_header())),
    )
    .height(1);

    let mut constraints: Vec<Constraint> =
        vm.widths.iter().map(|&w| Constraint::Length(w)).collect();
    constraints.push(Constraint::Fill(1));

    let placeholder = vm.placeholder.as_deref().filter(|_| vm.rows.is_empty());
    if let Some(placeholder) = placeholder {
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let table = Table::new(Vec::<Row>::new(), constraints)
            .header(header)
            .column_spacing(1);
        frame.render_widget(table, inner);

        if inner.height > 1 {
            let line_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
            let line = Line::from(Span::styled(placeholder.to_string(), Styles::dim()));
            frame.render_widget(Paragraph::new(line), line_area);
        }
        return;
    }

    let rows: Vec<Row> = vm
        .rows
        .iter()
        .map(|vr| {
            let cells = vr.cells.iter().map(|c| match c.style {
                Some(s) => Span::styled(c.text.clone(), Styles::from_class(s)),
                None => Span::raw(c.text.clone()),
            });
            Row::new(cells).style(Styles::from_class(vr.style)).height(1)
        })
        .collect();

    let table = Table::new(rows, constraints)
        .header(header)
        .block(block)
        .column_spacing(1);
    frame.render_widget(table, area);
}
