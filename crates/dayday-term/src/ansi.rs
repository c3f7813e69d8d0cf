// SPDX-License-Identifier: MIT
//
// ANSI escape sequence encoding.
//
// Stateless writers for every escape sequence the display emits. Deciding
// *when* to emit them is the `CellWriter`'s job; this module only knows the
// bytes. Coordinates are 0-indexed here and converted to the 1-indexed form
// the terminal expects.

use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::CellColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the whole screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset every SGR attribute and color (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Set the foreground color.
///
/// Standard colors use SGR 30–37, bright ones 90–97, the rest `38;5;N`.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[39m"),
        CellColor::Indexed(idx @ 0..=7) => write!(w, "\x1b[{}m", 30 + u16::from(idx)),
        CellColor::Indexed(idx @ 8..=15) => write!(w, "\x1b[{}m", 82 + u16::from(idx)),
        CellColor::Indexed(idx) => write!(w, "\x1b[38;5;{idx}m"),
    }
}

/// Set the background color (SGR 40–47, 100–107, `48;5;N`).
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[49m"),
        CellColor::Indexed(idx @ 0..=7) => write!(w, "\x1b[{}m", 40 + u16::from(idx)),
        CellColor::Indexed(idx @ 8..=15) => write!(w, "\x1b[{}m", 92 + u16::from(idx)),
        CellColor::Indexed(idx) => write!(w, "\x1b[48;5;{idx}m"),
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Emit all set attributes as one CSI sequence, e.g. `\x1b[1;7m`.
///
/// Writes nothing for an empty set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    const CODES: [(Attr, &[u8]); 4] = [
        (Attr::BOLD, b"1"),
        (Attr::DIM, b"2"),
        (Attr::UNDERLINE, b"4"),
        (Attr::INVERSE, b"7"),
    ];

    if attr.is_empty() {
        return Ok(());
    }

    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in CODES {
        if attr.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            w.write_all(code)?;
            first = false;
        }
    }
    w.write_all(b"m")
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC 2026): the terminal holds the frame.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output: the terminal shows the held frame at once.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Alternate Screen ────────────────────────────────────────────────────────

/// Switch to the alternate screen (DEC 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Leave the alternate screen, restoring the shell's content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
