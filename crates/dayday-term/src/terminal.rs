// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal session control: raw mode, alternate screen, restore on exit.
//
// Entering the session saves the caller's termios, switches stdin to raw
// mode, moves to the alternate screen and hides the cursor. Leaving undoes
// each step. A process-wide panic hook writes a fixed restore sequence
// straight to fd 1 and puts termios back, so a panic mid-frame still hands
// the shell back in a usable state.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ────────────────────────────────────────────────────────────────────

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Whether a `cols` by `rows` area fits.
    #[inline]
    #[must_use]
    pub const fn fits(self, cols: u16, rows: u16) -> bool {
        cols <= self.cols && rows <= self.rows
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Used when the size can't be queried (pipes, CI).
pub const FALLBACK_SIZE: Size = Size::new(80, 24);

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Current size of the terminal on stdout, `None` if it isn't one.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    // SAFETY: an all-zero winsize is valid; ioctl only writes into it.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then(|| Size::new(ws.ws_col, ws.ws_row))
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    // SAFETY: isatty has no preconditions.
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic Restore ───────────────────────────────────────────────────────────

/// The termios to put back if we panic in raw mode.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

static HOOK: Once = Once::new();

/// End sync, reset SGR, show cursor, leave the alternate screen.
const RESTORE_SEQUENCE: &[u8] = b"\x1b[?2026l\x1b[0m\x1b[?25h\x1b[?1049l";

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            write_restore_sequence();
            #[cfg(unix)]
            restore_saved_termios();
            previous(info);
        }));
    });
}

/// Write straight to fd 1; the stdout lock may be held by the panicking frame.
fn write_restore_sequence() {
    #[cfg(unix)]
    // SAFETY: the pointer and length describe a live static slice.
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            RESTORE_SEQUENCE.as_ptr().cast::<libc::c_void>(),
            RESTORE_SEQUENCE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(RESTORE_SEQUENCE);
        let _ = out.flush();
    }
}

#[cfg(unix)]
fn restore_saved_termios() {
    let Ok(guard) = SAVED_TERMIOS.lock() else {
        return;
    };
    if let Some(original) = guard.as_ref() {
        // SAFETY: `original` came from a successful tcgetattr.
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
        }
    }
}

// ─── Terminal ────────────────────────────────────────────────────────────────

/// The display session. Restores the terminal on drop.
///
/// ```no_run
/// use dayday_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // draw frames...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    #[cfg(unix)]
    original: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// A handle sized to the current terminal. Does not touch its modes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            original: None,
            size: get_size().unwrap_or(FALLBACK_SIZE),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size, e.g. after SIGWINCH.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start the session: raw mode, alternate screen, hidden cursor.
    ///
    /// # Errors
    ///
    /// Returns the termios or write failure.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw_mode_on()?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        out.flush()?;

        self.active = true;
        Ok(())
    }

    /// End the session and give the screen back.
    ///
    /// # Errors
    ///
    /// Returns the termios or write failure.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            ansi::end_sync(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }

        self.raw_mode_off()?;
        self.active = false;
        Ok(())
    }

    #[cfg(unix)]
    fn raw_mode_on(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }
        let fd = libc::STDIN_FILENO;

        // SAFETY: an all-zero termios is a valid out-parameter.
        let mut tio: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: `tio` is a valid, writable termios.
        if unsafe { libc::tcgetattr(fd, &raw mut tio) } != 0 {
            return Err(io::Error::last_os_error());
        }
        self.original = Some(tio);
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(tio);
        }

        tio.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        tio.c_oflag &= !libc::OPOST;
        // ISIG off: Ctrl-C reaches us as a byte instead of killing the process.
        tio.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        tio.c_cflag &= !(libc::CSIZE | libc::PARENB);
        tio.c_cflag |= libc::CS8;
        tio.c_cc[libc::VMIN] = 1;
        tio.c_cc[libc::VTIME] = 0;

        // SAFETY: `tio` is a fully initialized termios.
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const tio) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(unix)]
    fn raw_mode_off(&mut self) -> io::Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        // SAFETY: `original` came from a successful tcgetattr.
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) }
            != 0
        {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps)]
    const fn raw_mode_on(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps)]
    const fn raw_mode_off(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
