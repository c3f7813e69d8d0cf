// SPDX-License-Identifier: MIT
//
// Frame output: byte batching and SGR state tracking.
//
// `OutputBuffer` collects one frame's worth of escape sequences and text and
// hands it to the terminal in a single write. `CellWriter` remembers what the
// terminal was last told (cursor, colors, attributes) so a run of identically
// styled digit pixels costs one SGR sequence and a row of spaces.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// In-memory sink for a frame's bytes.
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

/// A full 80x24 repaint of the countdown fits without growing.
const INITIAL_CAPACITY: usize = 8192;

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes queued so far.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Append a codepoint as UTF-8, or `?` if it isn't a valid `char`.
    pub fn push_codepoint(&mut self, cp: u32) {
        match char::from_u32(cp).filter(|&c| c != '\0') {
            Some(ch) => {
                let mut enc = [0u8; 4];
                self.bytes
                    .extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
            }
            None => self.bytes.push(b'?'),
        }
    }

    /// Drop queued bytes, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Send queued bytes to stdout.
    ///
    /// # Errors
    ///
    /// Propagates the write or flush failure.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Send queued bytes to `w` and empty the buffer.
    ///
    /// # Errors
    ///
    /// Propagates the write or flush failure; the bytes stay queued.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.bytes.is_empty() {
            return Ok(());
        }
        w.write_all(&self.bytes)?;
        w.flush()?;
        self.bytes.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    /// No-op: bytes leave through `flush_to` / `flush_stdout`.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Where the terminal cursor and pen are believed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pen {
    /// Column just written, `None` when unknown.
    col: Option<u16>,
    row: Option<u16>,
    fg: Option<CellColor>,
    bg: Option<CellColor>,
    attrs: Attr,
}

impl Pen {
    const UNKNOWN: Self = Self {
        col: None,
        row: None,
        fg: None,
        bg: None,
        attrs: Attr::empty(),
    };

    /// Whether writing at `(x, y)` continues straight after the last cell.
    fn follows(self, x: u16, y: u16) -> bool {
        self.row == Some(y) && self.col.and_then(|c| c.checked_add(1)) == Some(x)
    }
}

/// Emits cells while skipping escape sequences that would change nothing.
///
/// - Cursor moves are skipped for the cell right after the previous one.
/// - An attribute change resets SGR first when attributes were set, which
///   also forgets the tracked colors.
/// - The second column of a wide character is skipped when its first column
///   was just written.
pub struct CellWriter {
    pen: Pen,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pen: Pen::UNKNOWN }
    }

    /// Forget all tracked state, e.g. after a screen clear.
    pub const fn reset_state(&mut self) {
        self.pen = Pen::UNKNOWN;
    }

    /// Queue `cell` at `(x, y)`.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) {
        let adjacent = self.pen.follows(x, y);

        if cell.is_continuation() && adjacent {
            self.pen.col = Some(x);
            return;
        }

        // Writes to an in-memory buffer cannot fail.
        if !adjacent {
            let _ = ansi::cursor_to(out, x, y);
        }
        self.apply_style(out, cell);

        if cell.is_continuation() {
            out.bytes.push(b' ');
        } else {
            out.push_codepoint(cell.ch);
        }
        self.pen.col = Some(x);
        self.pen.row = Some(y);
    }

    fn apply_style(&mut self, out: &mut OutputBuffer, cell: &Cell) {
        if cell.attrs != self.pen.attrs {
            if !self.pen.attrs.is_empty() {
                let _ = ansi::reset(out);
                self.pen.fg = None;
                self.pen.bg = None;
            }
            let _ = ansi::attrs(out, cell.attrs);
            self.pen.attrs = cell.attrs;
        }

        if self.pen.fg != Some(cell.fg) {
            let _ = ansi::fg(out, cell.fg);
            self.pen.fg = Some(cell.fg);
        }
        if self.pen.bg != Some(cell.bg) {
            let _ = ansi::bg(out, cell.bg);
            self.pen.bg = Some(cell.bg);
        }
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: CellColor = CellColor::Indexed(2);
    const BLACK: CellColor = CellColor::Indexed(0);

    fn render(cells: &[(u16, u16, Cell)]) -> String {
        let mut out = OutputBuffer::new();
        let mut writer = CellWriter::new();
        for (x, y, cell) in cells {
            writer.render_cell(&mut out, *x, *y, cell);
        }
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    // ── OutputBuffer ────────────────────────────────────────────────────

    #[test]
    fn buffer_collects_writes() {
        let mut buf = OutputBuffer::new();
        assert!(buf.is_empty());
        write!(buf, "day {}", 10).unwrap();
        assert_eq!(buf.as_bytes(), b"day 10");
        assert_eq!(buf.len(), 6);
    }

    #[test]
    fn push_codepoint_encodes_utf8() {
        let mut buf = OutputBuffer::new();
        buf.push_codepoint(u32::from('Y'));
        buf.push_codepoint(u32::from('年'));
        assert_eq!(buf.as_bytes(), "Y年".as_bytes());
    }

    #[test]
    fn push_codepoint_replaces_invalid() {
        let mut buf = OutputBuffer::new();
        buf.push_codepoint(0);
        buf.push_codepoint(0xD800);
        assert_eq!(buf.as_bytes(), b"??");
    }

    #[test]
    fn flush_to_drains_buffer() {
        let mut buf = OutputBuffer::new();
        write!(buf, "frame").unwrap();
        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();
        assert_eq!(dest, b"frame");
        assert!(buf.is_empty());
    }

    #[test]
    fn flush_to_with_nothing_queued_writes_nothing() {
        let mut dest = Vec::new();
        OutputBuffer::new().flush_to(&mut dest).unwrap();
        assert!(dest.is_empty());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = OutputBuffer::new();
        write!(buf, "xyz").unwrap();
        let cap = buf.bytes.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.bytes.capacity(), cap);
    }

    // ── CellWriter ──────────────────────────────────────────────────────

    #[test]
    fn first_cell_positions_cursor() {
        let s = render(&[(5, 3, Cell::new('A'))]);
        assert!(s.starts_with("\x1b[4;6H"));
        assert!(s.ends_with('A'));
    }

    #[test]
    fn a_run_of_pixels_costs_one_style() {
        let s = render(&[
            (0, 1, Cell::block(GREEN)),
            (1, 1, Cell::block(GREEN)),
            (2, 1, Cell::block(GREEN)),
        ]);
        assert_eq!(s.matches('H').count(), 1);
        assert_eq!(s.matches("\x1b[42m").count(), 1);
        assert!(s.ends_with("   "));
    }

    #[test]
    fn gaps_and_new_rows_move_the_cursor() {
        let s = render(&[
            (0, 0, Cell::new('a')),
            (4, 0, Cell::new('b')),
            (5, 1, Cell::new('c')),
        ]);
        assert_eq!(s.matches('H').count(), 3);
    }

    #[test]
    fn color_change_is_emitted() {
        let s = render(&[(0, 0, Cell::block(GREEN)), (1, 0, Cell::block(BLACK))]);
        assert!(s.contains("\x1b[42m"));
        assert!(s.contains("\x1b[40m"));
    }

    #[test]
    fn default_colors_emitted_on_first_cell() {
        let s = render(&[(0, 0, Cell::new('x'))]);
        assert!(s.contains("\x1b[39m"));
        assert!(s.contains("\x1b[49m"));
    }

    #[test]
    fn dropping_attrs_resets_and_re_emits_colors() {
        let bold = Cell::styled('a', GREEN, BLACK, Attr::BOLD);
        let plain = Cell::styled('b', GREEN, BLACK, Attr::empty());
        let s = render(&[(0, 0, bold), (1, 0, plain)]);
        assert!(s.contains("\x1b[1m"));
        assert!(s.contains("\x1b[0m"));
        assert_eq!(s.matches("\x1b[32m").count(), 2);
    }

    #[test]
    fn adding_attrs_skips_reset() {
        let plain = Cell::styled('a', GREEN, BLACK, Attr::empty());
        let bold = Cell::styled('b', GREEN, BLACK, Attr::BOLD);
        let s = render(&[(0, 0, plain), (1, 0, bold)]);
        assert!(!s.contains("\x1b[0m"));
        assert_eq!(s.matches("\x1b[32m").count(), 1);
    }

    #[test]
    fn continuation_after_wide_char_is_silent() {
        let wide = Cell::styled('年', GREEN, BLACK, Attr::empty());
        let cont = Cell::continuation(GREEN, BLACK, Attr::empty());
        let s = render(&[(3, 0, wide), (4, 0, cont)]);
        assert!(s.ends_with('年'));
    }

    #[test]
    fn orphan_continuation_paints_a_space() {
        let cont = Cell::continuation(GREEN, BLACK, Attr::empty());
        let s = render(&[(4, 0, cont)]);
        assert!(s.starts_with("\x1b[1;5H"));
        assert!(s.ends_with(' '));
    }

    #[test]
    fn reset_state_forces_full_emit() {
        let mut out = OutputBuffer::new();
        let mut writer = CellWriter::new();
        writer.render_cell(&mut out, 0, 0, &Cell::block(GREEN));
        writer.reset_state();
        out.clear();
        writer.render_cell(&mut out, 1, 0, &Cell::block(GREEN));
        let s = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        assert!(s.starts_with("\x1b[1;2H"));
        assert!(s.contains("\x1b[42m"));
    }
}
