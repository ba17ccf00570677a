//! Terminal User Interface for the ibtop dashboard.
//!
//! This module draws the port panels with ratatui and feeds terminal input
//! and interrupt notifications to the sampler's wait.

mod app;
mod event;
mod input;
mod render;
mod style;
mod widgets;

pub use app::{App, TerminalDashboard};
pub use event::{Event, EventHandler};
pub use input::{KeyAction, handle_key};
