// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// The display loop.
//
// One iteration:
//
//   1. `App::on_tick` refreshes time-based state.
//   2. A pending SIGWINCH resizes the frame and forces a full redraw.
//   3. If anything changed, the frame is cleared, painted by the app and
//      presented through the diff renderer.
//   4. The loop waits for input on the reader channel, up to the poll
//      timeout, and hands every decoded key to `App::on_key`.
//
// The first frame is therefore on screen before the first wait. With a
// long poll timeout a lone ESC would sit in the parser for the whole
// interval, so while bytes are pending the wait shrinks to a short escape
// timeout before the parser is flushed.
//
// The wait itself is cut into slices of at most `RESIZE_SLICE`. Between
// slices the SIGWINCH flag is checked, so a resize is redrawn within one
// slice even when the poll timeout is a minute long.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{KeyEvent, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static RESIZED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn on_sigwinch(_sig: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

#[cfg(unix)]
fn watch_resize() {
    // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_sigwinch as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(not(unix))]
const fn watch_resize() {}

/// Longest stretch the loop waits without looking at the SIGWINCH flag.
const RESIZE_SLICE: Duration = Duration::from_millis(50);

/// Why a wait for input ended.
enum Wake {
    Input(Vec<u8>),
    Timeout,
    Resized,
    Closed,
}

/// The loop's own outcome, unless it succeeded and teardown failed.
fn first_error(outcome: io::Result<()>, teardown: io::Result<()>) -> io::Result<()> {
    outcome.and(teardown)
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// An application driven by [`EventLoop`].
pub trait App {
    /// Handle one key press. Return [`Action::Quit`] to stop the loop.
    fn on_key(&mut self, _key: &KeyEvent) -> Action {
        Action::Continue
    }

    /// The terminal changed size. The frame has already been resized.
    fn on_resize(&mut self, _size: Size) {}

    /// Called once per iteration. Return `true` when a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Draw the current state into a freshly cleared frame.
    fn paint(&mut self, buf: &mut FrameBuffer);
}

// ─── LoopConfig ──────────────────────────────────────────────────────────────

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Longest wait for input between refreshes.
    pub poll_timeout: Duration,
    /// Wait used while an escape sequence is incomplete.
    pub escape_timeout: Duration,
}

impl LoopConfig {
    pub const DEFAULT_POLL: Duration = Duration::from_secs(60);
    pub const DEFAULT_ESCAPE: Duration = Duration::from_millis(25);

    #[must_use]
    pub const fn with_poll_timeout(poll_timeout: Duration) -> Self {
        Self {
            poll_timeout,
            escape_timeout: Self::DEFAULT_ESCAPE,
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::with_poll_timeout(Self::DEFAULT_POLL)
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal session, key parser and renderer.
///
/// ```no_run
/// use dayday_term::buffer::FrameBuffer;
/// use dayday_term::event_loop::{Action, App, EventLoop};
/// use dayday_term::input::{KeyCode, KeyEvent};
///
/// struct Hello;
///
/// impl App for Hello {
///     fn on_key(&mut self, key: &KeyEvent) -> Action {
///         if key.code == KeyCode::Char('q') { Action::Quit } else { Action::Continue }
///     }
///     fn paint(&mut self, buf: &mut FrameBuffer) {
///         buf.paint_text(0, 0, "hello", Default::default(), None);
///     }
/// }
///
/// EventLoop::new().run(&mut Hello)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
    size: Size,
    headless: bool,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    /// A loop sized to the current terminal.
    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        let terminal = Terminal::new();
        let size = terminal.size();
        Self {
            terminal,
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
            size,
            headless: false,
        }
    }

    /// A loop with a fixed size that never queries the terminal.
    ///
    /// Meant for [`drive`](Self::drive) against an in-memory sink.
    #[must_use]
    pub fn headless(config: LoopConfig, size: Size) -> Self {
        Self {
            size,
            headless: true,
            ..Self::with_config(config)
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> LoopConfig {
        self.config
    }

    /// Take over the terminal and run `app` until it quits or stdin closes.
    ///
    /// The terminal is restored even when the loop fails.
    ///
    /// # Errors
    ///
    /// Returns terminal setup, output or teardown failures.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        watch_resize();

        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let stdout = io::stdout();
            let outcome = self.drive(app, &rx, &mut stdout.lock());
            reader.stop();
            outcome
        });

        let teardown = self.terminal.leave();
        first_error(result, teardown)
    }

    /// Run `app` on input from `rx`, presenting frames to `out`.
    ///
    /// Returns when the app quits or the channel disconnects.
    ///
    /// # Errors
    ///
    /// Returns the first failed write to `out`.
    pub fn drive<A, W>(&mut self, app: &mut A, rx: &Receiver<Vec<u8>>, out: &mut W) -> io::Result<()>
    where
        A: App + ?Sized,
        W: Write,
    {
        let mut frame = FrameBuffer::new(self.size.cols, self.size.rows);
        let mut dirty = true;

        loop {
            if app.on_tick() {
                dirty = true;
            }

            if self.resize_pending() {
                self.size = self.terminal.refresh_size();
                frame.resize(self.size.cols, self.size.rows);
                self.renderer.force_redraw();
                app.on_resize(self.size);
                dirty = true;
            }

            if dirty {
                frame.clear();
                app.paint(&mut frame);
                self.renderer.render(&frame);
                self.renderer.flush_to(out)?;
                dirty = false;
            }

            let wait = if self.parser.has_pending() {
                self.config.escape_timeout
            } else {
                self.config.poll_timeout
            };

            let (keys, closed) = match self.wait_for_input(rx, wait) {
                Wake::Input(bytes) => (self.parser.advance(&bytes), false),
                Wake::Timeout => (self.parser.flush(), false),
                Wake::Resized => continue,
                Wake::Closed => (self.parser.flush(), true),
            };

            for key in &keys {
                dirty = true;
                if app.on_key(key) == Action::Quit {
                    return Ok(());
                }
            }
            if closed {
                return Ok(());
            }
        }
    }

    /// Take the SIGWINCH flag. Always `false` for a headless loop.
    fn resize_pending(&self) -> bool {
        !self.headless && RESIZED.swap(false, Ordering::Relaxed)
    }

    /// Wait up to `wait` for bytes on `rx`, in slices short enough to notice
    /// a resize. The flag is left set for the caller to take.
    fn wait_for_input(&self, rx: &Receiver<Vec<u8>>, wait: Duration) -> Wake {
        let deadline = Instant::now() + wait;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Wake::Timeout;
            }
            match rx.recv_timeout(remaining.min(RESIZE_SLICE)) {
                Ok(bytes) => return Wake::Input(bytes),
                Err(RecvTimeoutError::Disconnected) => return Wake::Closed,
                Err(RecvTimeoutError::Timeout) => {
                    if !self.headless && RESIZED.load(Ordering::Relaxed) {
                        return Wake::Resized;
                    }
                }
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
