//! UI-agnostic view models for the dashboard panels.
//!
//! Builders here turn snapshots and rates into tables of formatted cells.
//! The TUI only maps them to ratatui widgets.

pub mod common;
pub mod panels;
