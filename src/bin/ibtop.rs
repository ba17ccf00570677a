//! ibtop - live dashboard for InfiniBand/RoCE port counters.
//!
//! Usage:
//!   ibtop                 # InfiniBand ports, 5 second refresh
//!   ibtop -r 1            # refresh every second
//!   ibtop -e              # include Ethernet (RoCE) ports
//!   ibtop --log-file /tmp/ibtop.log -v

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use thiserror::Error;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use ibtop::collector::{Collector, RealFs};
use ibtop::provider::LiveProvider;
use ibtop::sampler::{Sampler, SamplerError, Termination};
use ibtop::tui::App;
use ibtop::util::{PlatformError, ensure_linux};

/// Live dashboard for InfiniBand/RoCE port counters.
#[derive(Parser, Debug)]
#[command(name = "ibtop", about = "InfiniBand traffic monitor", version)]
struct Args {
    /// Refresh interval in seconds (positive integer).
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value = "5",
        value_parser = parse_positive,
        allow_hyphen_values = true
    )]
    refresh: u64,

    /// Include Ethernet (RoCE) link-layer ports.
    #[arg(short, long)]
    ethernet: bool,

    /// Path to sysfs (for testing/mocking).
    #[arg(long, value_name = "PATH", default_value = "/sys")]
    sysfs_path: PathBuf,

    /// Path to /proc filesystem (used for the platform check).
    #[arg(long, value_name = "PATH", default_value = "/proc")]
    proc_path: PathBuf,

    /// Maximum number of ports shown.
    #[arg(long, value_name = "N", default_value = "32", value_parser = parse_positive)]
    max_ports: u64,

    /// Write logs to this file. Logs are discarded otherwise.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parses a strictly positive integer.
fn parse_positive(s: &str) -> Result<u64, String> {
    let value: i64 = s
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not an integer: {}", s, e))?;
    if value <= 0 {
        return Err(format!("must be an integer greater than 0, got {}", value));
    }
    Ok(value as u64)
}

/// Renders an argument error followed by the usage line.
fn usage_error_text(err: &clap::Error) -> String {
    let message = err.render().to_string();
    let message = message.trim_end();
    if message.contains("Usage:") {
        return format!("{}\n", message);
    }
    format!("{}\n\n{}\n", message, Args::command().render_usage())
}

/// Fatal errors reported as `ERROR: <message>` after the terminal is restored.
#[derive(Debug, Error)]
enum AppError {
    #[error("unable to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("unable to initialize terminal: {0}")]
    Terminal(#[source] io::Error),
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}

/// Initializes the tracing subscriber.
///
/// The dashboard owns the terminal, so logs only go to `log_file`.
/// `RUST_LOG` takes precedence over the verbosity flag.
fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<(), AppError> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn run(args: &Args) -> Result<(), AppError> {
    let fs = RealFs::new();
    ensure_linux(&fs, &args.proc_path)?;

    let max_ports = usize::try_from(args.max_ports).unwrap_or(usize::MAX);
    let collector = Collector::new(fs, &args.sysfs_path)
        .with_ethernet(args.ethernet)
        .with_max_ports(max_ports);
    let provider = LiveProvider::new(collector);
    let mut sampler = Sampler::new(provider, Duration::from_secs(args.refresh));

    info!(
        refresh = args.refresh,
        ethernet = args.ethernet,
        max_ports,
        sysfs = %args.sysfs_path.display(),
        "starting dashboard"
    );

    let termination = App::new(args.ethernet)
        .run(&mut sampler)
        .map_err(AppError::Terminal)?;

    match termination {
        Termination::Quit | Termination::Interrupted => {
            info!(cycles = sampler.cycles(), "exiting");
            Ok(())
        }
        Termination::Fatal(e) => Err(e.into()),
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version go to stdout with exit 0
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprint!("{}", usage_error_text(&e));
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    let result = init_logging(args.verbose, args.log_file.as_ref()).and_then(|()| run(&args));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "fatal error");
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("ibtop").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.refresh, 5);
        assert!(!args.ethernet);
        assert_eq!(args.sysfs_path, PathBuf::from("/sys"));
        assert_eq!(args.proc_path, PathBuf::from("/proc"));
        assert_eq!(args.max_ports, 32);
        assert!(args.log_file.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn short_and_long_flags() {
        let args = parse(&["-r", "2", "-e", "-vv"]).unwrap();
        assert_eq!(args.refresh, 2);
        assert!(args.ethernet);
        assert_eq!(args.verbose, 2);

        let args = parse(&["--refresh", "10", "--ethernet", "--max-ports", "4"]).unwrap();
        assert_eq!(args.refresh, 10);
        assert!(args.ethernet);
        assert_eq!(args.max_ports, 4);
    }

    #[test]
    fn refresh_must_be_positive_integer() {
        for bad in ["0", "-3", "abc", "1.5"] {
            let err = parse(&["--refresh", bad]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{bad:?}");
        }
        assert!(parse(&["-r", "-3"]).is_err());
    }

    #[test]
    fn invalid_refresh_prints_usage() {
        for bad in ["0", "abc"] {
            let err = parse(&["--refresh", bad]).unwrap_err();
            let text = usage_error_text(&err);
            assert!(text.contains("--refresh"), "{text}");
            assert_eq!(text.matches("Usage:").count(), 1, "{text}");
        }

        let err = parse(&["--refresh", "0"]).unwrap_err();
        assert!(usage_error_text(&err).contains("must be an integer greater than 0"));
    }

    #[test]
    fn unknown_option_prints_usage_once() {
        let err = parse(&["--bogus"]).unwrap_err();
        assert_eq!(usage_error_text(&err).matches("Usage:").count(), 1);
    }

    #[test]
    fn max_ports_must_be_positive() {
        assert!(parse(&["--max-ports", "0"]).is_err());
    }

    #[test]
    fn unknown_option_is_usage_error() {
        let err = parse(&["--bogus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn help_and_version_exit_zero() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);

        let err = parse(&["-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn sampler_errors_keep_their_message() {
        let err: AppError = SamplerError::NoDevices.into();
        assert_eq!(err.to_string(), "no InfiniBand device found");
    }

    #[test]
    fn parse_positive_values() {
        assert_eq!(parse_positive("1"), Ok(1));
        assert_eq!(parse_positive(" 7 "), Ok(7));
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-1").is_err());
        assert!(parse_positive("x").is_err());
    }
}
