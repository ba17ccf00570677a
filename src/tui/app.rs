//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::{debug, warn};

use crate::provider::SnapshotProvider;
use crate::sampler::{Dashboard, DashboardView, Sampler, Termination};

use super::event::EventHandler;
use super::render::{Screen, render};

/// Draws sampler cycles onto a ratatui terminal.
pub struct TerminalDashboard<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    refresh: Duration,
    include_ethernet: bool,
}

impl<'a, B: Backend> TerminalDashboard<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, refresh: Duration, include_ethernet: bool) -> Self {
        Self {
            terminal,
            refresh,
            include_ethernet,
        }
    }
}

impl<B: Backend> Dashboard for TerminalDashboard<'_, B> {
    fn draw(&mut self, view: &DashboardView<'_>) -> io::Result<()> {
        let screen = Screen::build(view, self.refresh, self.include_ethernet);
        self.terminal.draw(|frame| render(frame, &screen))?;
        Ok(())
    }
}

/// Main TUI application.
pub struct App {
    include_ethernet: bool,
}

impl App {
    /// Creates a new App. `include_ethernet` is only shown in the header.
    pub fn new(include_ethernet: bool) -> Self {
        Self { include_ethernet }
    }

    /// Runs the dashboard until quit, interrupt or a fatal sampler error.
    ///
    /// The terminal is restored before returning, whatever the outcome.
    /// `Err` means the terminal itself could not be set up or restored.
    pub fn run<P: SnapshotProvider>(self, sampler: &mut Sampler<P>) -> io::Result<Termination> {
        let mut events = EventHandler::new();
        if let Err(e) = events.install_interrupt_handler() {
            warn!(error = %e, "failed to install interrupt handler");
        }

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = restore_terminal(&mut io::stdout());
                return Err(e);
            }
        };
        debug!("terminal initialized");

        events.spawn_input_thread();

        let termination = {
            let mut dashboard =
                TerminalDashboard::new(&mut terminal, sampler.refresh(), self.include_ethernet);
            sampler.run(&mut dashboard, &mut events)
        };

        // Restore terminal
        restore_terminal(terminal.backend_mut())?;
        debug!("terminal restored");

        Ok(termination)
    }
}

fn restore_terminal<W: io::Write>(out: &mut W) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen, Show)?;
    Ok(())
}
