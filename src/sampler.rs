//! Poll, render and wait loop.
//!
//! The sampler owns the current and previous snapshot. Each cycle it polls
//! the provider, hands the dashboard a view with per-second rates, then
//! waits for the refresh interval, a quit key or an interrupt.
//!
//! ```text
//!   Polling ──► Rendering ──► Waiting ──► Polling
//!      │            │            │
//!      └────────────┴────────────┴──────► Termination
//! ```

use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::model::Snapshot;
use crate::provider::{ProviderError, SnapshotProvider};
use crate::rates::{PortRates, compute_rates};

/// Fatal conditions that end the loop with a non-zero exit.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("unable to retrieve InfiniBand metrics")]
    Collection(#[source] ProviderError),
    #[error("no InfiniBand device found")]
    NoDevices,
    #[error("unable to draw dashboard: {0}")]
    Render(#[source] io::Error),
}

/// Loop phase. Leaving the loop yields a [`Termination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Polling,
    Rendering,
    Waiting,
}

/// Result of one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The refresh interval passed.
    Elapsed,
    /// The quit key was pressed.
    Quit,
    /// SIGINT/SIGTERM or Ctrl-C.
    Interrupted,
}

/// Why the loop ended.
#[derive(Debug)]
pub enum Termination {
    Quit,
    Interrupted,
    Fatal(SamplerError),
}

/// Data handed to the dashboard every cycle.
#[derive(Debug)]
pub struct DashboardView<'a> {
    pub snapshot: &'a Snapshot,
    /// `None` on the first cycle, before a previous snapshot exists.
    pub rates: Option<Vec<PortRates>>,
}

/// Something that can draw a dashboard view.
pub trait Dashboard {
    fn draw(&mut self, view: &DashboardView<'_>) -> io::Result<()>;
}

/// Blocks until the refresh deadline, a quit key or an interrupt.
///
/// Implementations must not lose an interrupt that arrived while the sampler
/// was polling or rendering.
pub trait Waiter {
    fn wait(&mut self, timeout: Duration) -> WaitOutcome;
}

/// Drives the poll/render/wait cycle.
pub struct Sampler<P: SnapshotProvider> {
    provider: P,
    refresh: Duration,
    current: Option<Snapshot>,
    previous: Option<Snapshot>,
    cycles: u64,
}

impl<P: SnapshotProvider> Sampler<P> {
    /// Creates a sampler. `refresh` is also the nominal elapsed time used for rates.
    pub fn new(provider: P, refresh: Duration) -> Self {
        Self {
            provider,
            refresh,
            current: None,
            previous: None,
            cycles: 0,
        }
    }

    pub fn refresh(&self) -> Duration {
        self.refresh
    }

    /// Number of completed polls.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Runs until quit, interrupt or a fatal error.
    pub fn run(&mut self, dashboard: &mut dyn Dashboard, waiter: &mut dyn Waiter) -> Termination {
        let mut phase = Phase::Polling;

        let termination = loop {
            phase = match phase {
                Phase::Polling => match self.poll() {
                    Ok(()) => Phase::Rendering,
                    Err(e) => break Termination::Fatal(e),
                },
                Phase::Rendering => match self.render(dashboard) {
                    Ok(()) => Phase::Waiting,
                    Err(e) => break Termination::Fatal(e),
                },
                Phase::Waiting => match waiter.wait(self.refresh) {
                    WaitOutcome::Elapsed => {
                        self.previous = self.current.take();
                        Phase::Polling
                    }
                    WaitOutcome::Quit => break Termination::Quit,
                    WaitOutcome::Interrupted => break Termination::Interrupted,
                },
            };
        };

        match &termination {
            Termination::Fatal(e) => error!(error = %e, cycles = self.cycles, "sampler stopped"),
            other => info!(reason = ?other, cycles = self.cycles, "sampler stopped"),
        }
        termination
    }

    fn poll(&mut self) -> Result<(), SamplerError> {
        let snapshot = self.provider.advance().map_err(|e| {
            error!(error = %e, "collection failed");
            SamplerError::Collection(e)
        })?;
        if snapshot.is_empty() {
            return Err(SamplerError::NoDevices);
        }

        self.cycles += 1;
        debug!(cycle = self.cycles, ports = snapshot.len(), "polled");
        self.current = Some(snapshot);
        Ok(())
    }

    fn render(&self, dashboard: &mut dyn Dashboard) -> Result<(), SamplerError> {
        let Some(snapshot) = self.current.as_ref() else {
            return Err(SamplerError::NoDevices);
        };
        let rates = self
            .previous
            .as_ref()
            .map(|previous| compute_rates(snapshot, previous, self.refresh));

        dashboard
            .draw(&DashboardView { snapshot, rates })
            .map_err(SamplerError::Render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectError;
    use crate::model::PortRecord;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct ScriptedProvider {
        script: VecDeque<Result<Snapshot, ProviderError>>,
        calls: Rc<Cell<usize>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<Snapshot, ProviderError>>) -> Self {
            Self {
                script: script.into(),
                calls: Rc::new(Cell::new(0)),
            }
        }
    }

    impl SnapshotProvider for ScriptedProvider {
        fn advance(&mut self) -> Result<Snapshot, ProviderError> {
            self.calls.set(self.calls.get() + 1);
            self.script
                .pop_front()
                .unwrap_or_else(|| Ok(Snapshot::default()))
        }
    }

    #[derive(Default)]
    struct RecordingDashboard {
        frames: Vec<(Vec<String>, Option<Vec<PortRates>>)>,
        fail: bool,
    }

    impl Dashboard for RecordingDashboard {
        fn draw(&mut self, view: &DashboardView<'_>) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::other("terminal gone"));
            }
            let names = view
                .snapshot
                .ports
                .iter()
                .map(|p| p.interface_name.clone())
                .collect();
            self.frames.push((names, view.rates.clone()));
            Ok(())
        }
    }

    struct ScriptedWaiter {
        script: VecDeque<WaitOutcome>,
        timeouts: Vec<Duration>,
    }

    impl ScriptedWaiter {
        fn new(script: Vec<WaitOutcome>) -> Self {
            Self {
                script: script.into(),
                timeouts: Vec::new(),
            }
        }
    }

    impl Waiter for ScriptedWaiter {
        fn wait(&mut self, timeout: Duration) -> WaitOutcome {
            self.timeouts.push(timeout);
            self.script.pop_front().unwrap_or(WaitOutcome::Quit)
        }
    }

    fn port(name: &str, rcv_packets: u64) -> PortRecord {
        let mut port = PortRecord {
            interface_name: name.to_string(),
            link_layer: "InfiniBand".to_string(),
            state: "4: ACTIVE".to_string(),
            ..PortRecord::default()
        };
        port.counters.port_rcv_packets = rcv_packets;
        port
    }

    fn snapshot(ports: Vec<PortRecord>) -> Result<Snapshot, ProviderError> {
        Ok(Snapshot::new(0, ports))
    }

    fn collection_error() -> ProviderError {
        ProviderError::Collection(CollectError::DeviceRootUnavailable {
            path: PathBuf::from("/sys/class/infiniband"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        })
    }

    #[test]
    fn quit_during_wait_stops_polling() {
        let provider = ScriptedProvider::new(vec![snapshot(vec![port("mlx5_0:1", 1)])]);
        let calls = Rc::clone(&provider.calls);
        let mut sampler = Sampler::new(provider, Duration::from_secs(5));
        let mut dashboard = RecordingDashboard::default();
        let mut waiter = ScriptedWaiter::new(vec![WaitOutcome::Quit]);

        let termination = sampler.run(&mut dashboard, &mut waiter);
        assert!(matches!(termination, Termination::Quit));
        assert_eq!(calls.get(), 1);
        assert_eq!(sampler.cycles(), 1);
        assert_eq!(dashboard.frames.len(), 1);
        assert_eq!(waiter.timeouts, vec![Duration::from_secs(5)]);
    }

    #[test]
    fn interrupt_is_clean_termination() {
        let provider = ScriptedProvider::new(vec![
            snapshot(vec![port("mlx5_0:1", 1)]),
            snapshot(vec![port("mlx5_0:1", 2)]),
        ]);
        let mut sampler = Sampler::new(provider, Duration::from_secs(1));
        let mut dashboard = RecordingDashboard::default();
        let mut waiter = ScriptedWaiter::new(vec![WaitOutcome::Elapsed, WaitOutcome::Interrupted]);

        let termination = sampler.run(&mut dashboard, &mut waiter);
        assert!(matches!(termination, Termination::Interrupted));
        assert_eq!(sampler.cycles(), 2);
    }

    #[test]
    fn first_frame_has_no_rates_second_has_rates() {
        let provider = ScriptedProvider::new(vec![
            snapshot(vec![port("mlx5_0:1", 1000)]),
            snapshot(vec![port("mlx5_0:1", 2000)]),
        ]);
        let mut sampler = Sampler::new(provider, Duration::from_secs(5));
        let mut dashboard = RecordingDashboard::default();
        let mut waiter = ScriptedWaiter::new(vec![WaitOutcome::Elapsed, WaitOutcome::Quit]);

        sampler.run(&mut dashboard, &mut waiter);
        assert_eq!(dashboard.frames.len(), 2);
        assert!(dashboard.frames[0].1.is_none());

        let rates = dashboard.frames[1].1.as_ref().unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].rx_packets, Some(200.0));
    }

    #[test]
    fn new_port_has_no_rate_row() {
        let provider = ScriptedProvider::new(vec![
            snapshot(vec![port("mlx5_0:1", 1000)]),
            snapshot(vec![port("mlx5_0:1", 2000), port("mlx5_1:1", 50)]),
        ]);
        let mut sampler = Sampler::new(provider, Duration::from_secs(5));
        let mut dashboard = RecordingDashboard::default();
        let mut waiter = ScriptedWaiter::new(vec![WaitOutcome::Elapsed, WaitOutcome::Quit]);

        sampler.run(&mut dashboard, &mut waiter);
        let (names, rates) = &dashboard.frames[1];
        assert_eq!(names, &vec!["mlx5_0:1".to_string(), "mlx5_1:1".to_string()]);
        let rates = rates.as_ref().unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].interface_name, "mlx5_0:1");
    }

    #[test]
    fn reordered_ports_still_match_by_name() {
        let provider = ScriptedProvider::new(vec![
            snapshot(vec![port("mlx5_0:1", 0), port("mlx5_1:1", 100)]),
            snapshot(vec![port("mlx5_1:1", 600), port("mlx5_0:1", 50)]),
        ]);
        let mut sampler = Sampler::new(provider, Duration::from_secs(5));
        let mut dashboard = RecordingDashboard::default();
        let mut waiter = ScriptedWaiter::new(vec![WaitOutcome::Elapsed, WaitOutcome::Quit]);

        sampler.run(&mut dashboard, &mut waiter);
        let rates = dashboard.frames[1].1.as_ref().unwrap();
        let find = |name: &str| rates.iter().find(|r| r.interface_name == name).unwrap();
        assert_eq!(find("mlx5_0:1").rx_packets, Some(10.0));
        assert_eq!(find("mlx5_1:1").rx_packets, Some(100.0));
    }

    #[test]
    fn collection_error_is_fatal() {
        let provider = ScriptedProvider::new(vec![Err(collection_error())]);
        let mut sampler = Sampler::new(provider, Duration::from_secs(5));
        let mut dashboard = RecordingDashboard::default();
        let mut waiter = ScriptedWaiter::new(vec![]);

        let termination = sampler.run(&mut dashboard, &mut waiter);
        match termination {
            Termination::Fatal(e) => {
                assert!(matches!(e, SamplerError::Collection(_)));
                assert_eq!(e.to_string(), "unable to retrieve InfiniBand metrics");
            }
            other => panic!("unexpected termination {:?}", other),
        }
        assert!(dashboard.frames.is_empty());
        assert!(waiter.timeouts.is_empty());
    }

    #[test]
    fn empty_snapshot_is_fatal_with_distinct_message() {
        let provider = ScriptedProvider::new(vec![
            snapshot(vec![port("mlx5_0:1", 1)]),
            snapshot(vec![]),
        ]);
        let mut sampler = Sampler::new(provider, Duration::from_secs(5));
        let mut dashboard = RecordingDashboard::default();
        let mut waiter = ScriptedWaiter::new(vec![WaitOutcome::Elapsed]);

        let termination = sampler.run(&mut dashboard, &mut waiter);
        match termination {
            Termination::Fatal(e) => {
                assert!(matches!(e, SamplerError::NoDevices));
                assert_eq!(e.to_string(), "no InfiniBand device found");
            }
            other => panic!("unexpected termination {:?}", other),
        }
        assert_eq!(dashboard.frames.len(), 1);
    }

    #[test]
    fn draw_failure_is_fatal() {
        let provider = ScriptedProvider::new(vec![snapshot(vec![port("mlx5_0:1", 1)])]);
        let mut sampler = Sampler::new(provider, Duration::from_secs(5));
        let mut dashboard = RecordingDashboard {
            fail: true,
            ..RecordingDashboard::default()
        };
        let mut waiter = ScriptedWaiter::new(vec![]);

        let termination = sampler.run(&mut dashboard, &mut waiter);
        assert!(matches!(
            termination,
            Termination::Fatal(SamplerError::Render(_))
        ));
    }

    #[test]
    fn previous_snapshot_is_the_last_one_only() {
        let provider = ScriptedProvider::new(vec![
            snapshot(vec![port("mlx5_0:1", 0)]),
            snapshot(vec![port("mlx5_0:1", 500)]),
            snapshot(vec![port("mlx5_0:1", 600)]),
        ]);
        let mut sampler = Sampler::new(provider, Duration::from_secs(1));
        let mut dashboard = RecordingDashboard::default();
        let mut waiter = ScriptedWaiter::new(vec![
            WaitOutcome::Elapsed,
            WaitOutcome::Elapsed,
            WaitOutcome::Quit,
        ]);

        sampler.run(&mut dashboard, &mut waiter);
        let rates = dashboard.frames[2].1.as_ref().unwrap();
        assert_eq!(rates[0].rx_packets, Some(100.0));
    }
}
