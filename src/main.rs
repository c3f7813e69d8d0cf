// SPDX-License-Identifier: MIT
//
// tty-dayday — count the days since or until an event, in big digits.
//
// This binary wires the two crates together:
//
//   dayday-term → raw terminal, rendering, key input, event loop
//   dayday-core → day arithmetic, glyphs, layout, the countdown controller
//
// Startup is strict: every flag is validated into `Settings` before the
// terminal is touched, and any problem is printed to stderr with exit code 1.
//
//   ┌──────────────────────────────┐
//   │ event name                   │  ← row 0
//   │ YEAR       MONTH      DAY    │
//   │ ▇▇▇▇ ▇▇▇▇ / ▇▇▇▇ / ▇▇▇▇      │  ← rows 1-7, digit panel
//   │                              │
//   │ q: quit  t: color  ...       │  ← row 9, help bar
//   └──────────────────────────────┘

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dayday_core::clock::SystemClock;
use dayday_core::controller::{Controller, DisplayConfig, Event};
use dayday_core::date::CalendarDate;
use dayday_core::delta::Direction;
use dayday_core::error::{ConfigError, DayDayError};
use dayday_core::palette::{Palette, is_cycle_slot};
use dayday_term::color::AnsiColor;
use dayday_term::event_loop::{EventLoop, LoopConfig};

/// Environment variable holding the log filter, e.g. `DAYDAY_LOG=debug`.
const LOG_ENV: &str = "DAYDAY_LOG";

/// Accepted `--refresh` range, in seconds.
const REFRESH_MIN: u64 = 1;
const REFRESH_MAX: u64 = 3600;

// ─── Command line ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tty-dayday")]
#[command(about = "Count the days since or until an event", long_about = None)]
#[command(version)]
struct Cli {
    /// Name of the event, shown above the digits
    #[arg(short, long)]
    event: String,

    /// Date of the event, MM/DD/YYYY or YYYY-MM-DD
    #[arg(short, long)]
    date: String,

    /// Count the days since the event (default)
    #[arg(short, long, conflicts_with = "until")]
    since: bool,

    /// Count the days until the event
    #[arg(short, long)]
    until: bool,

    /// Digit color: a name (red, green, ...) or 1-7
    #[arg(short, long, default_value = "green")]
    color: String,

    /// Background color: a name or 0-7
    #[arg(short, long, default_value = "black")]
    background: String,

    /// Seconds between refreshes when no key is pressed
    #[arg(short, long, default_value_t = 60)]
    refresh: u64,

    /// Write logs to this file (filter with DAYDAY_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Validated startup settings.
#[derive(Debug)]
struct Settings {
    event: Event,
    palette: Palette,
    refresh: Duration,
    log_file: Option<PathBuf>,
}

impl TryFrom<Cli> for Settings {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let target: CalendarDate = cli.date.parse()?;
        let direction = if cli.until {
            Direction::Until
        } else {
            Direction::Since
        };
        let event = Event::new(cli.event, target, direction)?;

        let color: AnsiColor = cli.color.parse()?;
        if !is_cycle_slot(color.index()) {
            return Err(ConfigError::ReservedColor(cli.color));
        }
        let background: AnsiColor = cli.background.parse()?;

        if !(REFRESH_MIN..=REFRESH_MAX).contains(&cli.refresh) {
            return Err(ConfigError::InvalidRefresh {
                got: cli.refresh,
                min: REFRESH_MIN,
                max: REFRESH_MAX,
            });
        }

        Ok(Self {
            event,
            palette: Palette::new(color, background),
            refresh: Duration::from_secs(cli.refresh),
            log_file: cli.log_file,
        })
    }
}

// ─── Logging ─────────────────────────────────────────────────────────────────

/// Send logs to `path`. The terminal belongs to the display, so without a
/// log file nothing is installed and the `tracing` macros are no-ops.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn run(settings: Settings) -> Result<(), DayDayError> {
    let mut event_loop = EventLoop::with_config(LoopConfig::with_poll_timeout(settings.refresh));
    let mut controller = Controller::new(
        settings.event,
        DisplayConfig::with_palette(settings.palette),
        SystemClock,
        event_loop.size(),
    )?;
    event_loop.run(&mut controller)?;
    Ok(())
}

fn main() {
    let settings = Settings::try_from(Cli::parse()).unwrap_or_else(|e| {
        eprintln!("tty-dayday: {e}");
        process::exit(1);
    });

    if let Some(path) = &settings.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("tty-dayday: cannot open log file {}: {e}", path.display());
            process::exit(1);
        }
    }

    if let Err(e) = run(settings) {
        eprintln!("tty-dayday: {e}");
        process::exit(1);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings(args: &[&str]) -> Result<Settings, ConfigError> {
        let argv = ["tty-dayday"].iter().chain(args);
        Settings::try_from(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn defaults() {
        let s = settings(&["-e", "Launch", "-d", "01/01/2000"]).unwrap();
        assert_eq!(s.event.name(), "Launch");
        assert_eq!(s.event.target(), CalendarDate::new(2000, 1, 1).unwrap());
        assert_eq!(s.event.direction(), Direction::Since);
        assert_eq!(s.palette, Palette::DEFAULT);
        assert_eq!(s.refresh, Duration::from_secs(60));
        assert_eq!(s.log_file, None);
    }

    #[test]
    fn long_flags() {
        let s = settings(&[
            "--event",
            "Moon landing",
            "--date",
            "1969-07-20",
            "--until",
            "--color",
            "cyan",
            "--background",
            "4",
            "--refresh",
            "5",
            "--log-file",
            "/tmp/dayday.log",
        ])
        .unwrap();
        assert_eq!(s.event.direction(), Direction::Until);
        assert_eq!(s.palette, Palette::new(AnsiColor::Cyan, AnsiColor::Blue));
        assert_eq!(s.refresh, Duration::from_secs(5));
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/dayday.log")));
    }

    #[test]
    fn since_and_until_conflict() {
        let err = Cli::try_parse_from(["tty-dayday", "-e", "x", "-d", "01/01/2000", "-s", "-u"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn event_and_date_are_required() {
        assert!(Cli::try_parse_from(["tty-dayday", "-d", "01/01/2000"]).is_err());
        assert!(Cli::try_parse_from(["tty-dayday", "-e", "x"]).is_err());
    }

    #[test]
    fn bad_input_is_a_config_error() {
        let base = |extra: &[&'static str]| {
            let mut args = vec!["-e", "Launch", "-d", "01/01/2000"];
            args.extend_from_slice(extra);
            settings(&args).unwrap_err()
        };

        assert!(matches!(base(&["-c", "teal"]), ConfigError::InvalidColor(_)));
        assert!(matches!(base(&["-b", "8"]), ConfigError::InvalidColor(_)));
        assert_eq!(base(&["-c", "black"]), ConfigError::ReservedColor("black".into()));
        assert_eq!(
            base(&["-r", "0"]),
            ConfigError::InvalidRefresh {
                got: 0,
                min: 1,
                max: 3600
            }
        );

        let err = settings(&["-e", " ", "-d", "01/01/2000"]).unwrap_err();
        assert_eq!(err, ConfigError::MissingEventName);

        let err = settings(&["-e", "x", "-d", "02/30/2001"]).unwrap_err();
        assert!(matches!(err, ConfigError::DateOutOfRange { .. }));

        let err = settings(&["-e", "x", "-d", "tomorrow"]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidDate("tomorrow".into()));
    }
}
