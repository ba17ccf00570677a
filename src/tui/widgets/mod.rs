//! Dashboard widgets.

mod header;
mod panel;

pub use header::{render_footer, render_header};
pub use panel::{panel_height, render_panel};
