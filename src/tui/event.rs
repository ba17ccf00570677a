//! Event handling for TUI.
//!
//! Terminal input and interrupt notifications are funneled into one channel.
//! The sampler waits on that channel with a deadline, so an interrupt that
//! arrives while it is polling or drawing stays queued for the next wait.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use tracing::{debug, info, warn};

use super::input::{KeyAction, handle_key};
use crate::sampler::{WaitOutcome, Waiter};

/// How long the input thread blocks in one poll before rechecking the channel.
const INPUT_POLL: Duration = Duration::from_millis(250);

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// SIGINT or SIGTERM delivered to the process.
    Interrupt,
}

/// Event handler that reads terminal events in a separate thread.
pub struct EventHandler {
    rx: Receiver<Event>,
    /// Kept alive to prevent channel closure.
    tx: Sender<Event>,
    interrupted: Arc<AtomicBool>,
}

impl EventHandler {
    /// Creates a handler without any event source attached.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            tx,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether an interrupt has been delivered.
    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Starts the terminal input thread.
    pub fn spawn_input_thread(&self) {
        let event_tx = self.tx.clone();

        thread::spawn(move || {
            loop {
                // Poll for events with timeout
                match event::poll(INPUT_POLL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        warn!(error = %e, "terminal input unavailable");
                        break;
                    }
                }
                if let Ok(CrosstermEvent::Key(key)) = event::read() {
                    if event_tx.send(Event::Key(key)).is_err() {
                        break;
                    }
                }
            }
        });
    }

    /// Installs the SIGINT/SIGTERM handler.
    ///
    /// The handler only stores the flag and wakes the waiter.
    pub fn install_interrupt_handler(&self) -> Result<(), ctrlc::Error> {
        let flag = Arc::clone(&self.interrupted);
        let event_tx = self.tx.clone();

        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            let _ = event_tx.send(Event::Interrupt);
        })
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Waiter for EventHandler {
    fn wait(&mut self, timeout: Duration) -> WaitOutcome {
        // No deadline when the interval does not fit in an Instant.
        let deadline = Instant::now().checked_add(timeout);

        loop {
            if self.interrupted() {
                info!("received interrupt signal");
                return WaitOutcome::Interrupted;
            }

            let received = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return WaitOutcome::Elapsed;
                    }
                    self.rx.recv_timeout(remaining)
                }
                None => self
                    .rx
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(Event::Key(key)) => match handle_key(key) {
                    KeyAction::Quit => {
                        debug!("quit key pressed");
                        return WaitOutcome::Quit;
                    }
                    KeyAction::Interrupt => {
                        info!("received Ctrl-C from terminal");
                        return WaitOutcome::Interrupted;
                    }
                    KeyAction::None => continue,
                },
                // The flag is checked at the top of the loop.
                Ok(Event::Interrupt) => continue,
                Err(RecvTimeoutError::Timeout) => return WaitOutcome::Elapsed,
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("event channel closed");
                    return WaitOutcome::Interrupted;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn wait_times_out_without_events() {
        let mut handler = EventHandler::new();
        let start = Instant::now();
        assert_eq!(
            handler.wait(Duration::from_millis(20)),
            WaitOutcome::Elapsed
        );
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn huge_timeout_does_not_overflow() {
        let huge = Duration::from_secs(i64::MAX as u64);

        let mut handler = EventHandler::new();
        handler.interrupted.store(true, Ordering::SeqCst);
        assert_eq!(handler.wait(huge), WaitOutcome::Interrupted);

        let mut handler = EventHandler::new();
        handler.tx.send(key(KeyCode::Char('q'))).unwrap();
        assert_eq!(handler.wait(huge), WaitOutcome::Quit);
    }

    #[test]
    fn quit_key_ends_wait() {
        let mut handler = EventHandler::new();
        handler.tx.send(key(KeyCode::Char('q'))).unwrap();
        assert_eq!(handler.wait(Duration::from_secs(10)), WaitOutcome::Quit);
    }

    #[test]
    fn other_keys_keep_waiting_until_deadline() {
        let mut handler = EventHandler::new();
        let tx = handler.tx.clone();
        tx.send(key(KeyCode::Char('x'))).unwrap();
        tx.send(key(KeyCode::Enter)).unwrap();

        assert_eq!(
            handler.wait(Duration::from_millis(20)),
            WaitOutcome::Elapsed
        );
    }

    #[test]
    fn quit_after_ignored_keys() {
        let mut handler = EventHandler::new();
        let tx = handler.tx.clone();
        tx.send(key(KeyCode::Char('x'))).unwrap();
        tx.send(key(KeyCode::Char('Q'))).unwrap();
        assert_eq!(handler.wait(Duration::from_secs(10)), WaitOutcome::Quit);
    }

    #[test]
    fn ctrl_c_key_interrupts() {
        let mut handler = EventHandler::new();
        handler
            .tx
            .send(Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                kind: KeyEventKind::Press,
                state: KeyEventState::NONE,
            }))
            .unwrap();
        assert_eq!(
            handler.wait(Duration::from_secs(10)),
            WaitOutcome::Interrupted
        );
    }

    #[test]
    fn interrupt_before_wait_is_not_lost() {
        let mut handler = EventHandler::new();
        // Signal path: flag first, then wake-up.
        handler.interrupted.store(true, Ordering::SeqCst);
        handler.tx.send(Event::Interrupt).unwrap();

        assert_eq!(
            handler.wait(Duration::from_secs(10)),
            WaitOutcome::Interrupted
        );
        // Stays interrupted on later waits too.
        assert_eq!(
            handler.wait(Duration::from_secs(10)),
            WaitOutcome::Interrupted
        );
    }

    #[test]
    fn interrupt_during_wait_wakes_waiter() {
        let mut handler = EventHandler::new();
        let flag = Arc::clone(&handler.interrupted);
        let tx = handler.tx.clone();
        let signal = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            flag.store(true, Ordering::SeqCst);
            tx.send(Event::Interrupt).unwrap();
        });

        let start = Instant::now();
        assert_eq!(
            handler.wait(Duration::from_secs(30)),
            WaitOutcome::Interrupted
        );
        assert!(start.elapsed() < Duration::from_secs(30));
        signal.join().unwrap();
    }
}
