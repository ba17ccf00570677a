//! UI-agnostic view model types.
//!
//! These types represent presentation data without any dependency on a specific
//! rendering framework. The TUI maps them to ratatui Styles.

/// Row-level style classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowStyleClass {
    #[default]
    Normal,
    /// Warning level (TUI: yellow). E.g. a port that is not ACTIVE.
    Warning,
    /// Critical level (TUI: red). E.g. a non-zero error counter.
    Critical,
    /// Dimmed (TUI: dark gray). E.g. a rate that could not be computed.
    Dimmed,
}

/// A single table cell with optional per-cell style override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCell {
    pub text: String,
    /// `None` = inherit row style.
    pub style: Option<RowStyleClass>,
}

impl ViewCell {
    pub fn plain(text: String) -> Self {
        Self { text, style: None }
    }

    pub fn styled(text: String, style: RowStyleClass) -> Self {
        Self {
            text,
            style: Some(style),
        }
    }
}

/// One table row, parameterized by entity ID type.
#[derive(Debug, Clone)]
pub struct ViewRow<Id> {
    pub id: Id,
    pub cells: Vec<ViewCell>,
    pub style: RowStyleClass,
}

/// Complete table ready to be rendered by any frontend.
#[derive(Debug, Clone)]
pub struct TableViewModel<Id> {
    pub title: String,
    pub headers: Vec<String>,
    pub widths: Vec<u16>,
    pub rows: Vec<ViewRow<Id>>,
    /// Shown instead of rows when there is nothing to display yet.
    pub placeholder: Option<String>,
}

impl<Id> TableViewModel<Id> {
    /// Number of body lines the table needs (rows or the placeholder line).
    pub fn body_height(&self) -> u16 {
        if self.rows.is_empty() && self.placeholder.is_some() {
            1
        } else {
            self.rows.len().min(u16::MAX as usize) as u16
        }
    }
}
