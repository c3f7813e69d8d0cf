// SPDX-License-Identifier: MIT
//
// Present a frame: diff it against the last one and emit only what changed.
//
// The countdown repaints once a minute or on a key press, and most of the
// screen (banner, labels, unlit pixels) stays the same between paints. The
// renderer keeps the previously presented frame, skips identical rows with a
// slice compare, and routes changed cells through a `CellWriter`. The frame
// is wrapped in synchronized-output markers so it lands in one go.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::output::{CellWriter, OutputBuffer};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
    /// Whether the pass cleared the screen and redrew everything.
    pub full_redraw: bool,
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Turns frames into minimal terminal output.
///
/// ```no_run
/// use dayday_term::buffer::FrameBuffer;
/// use dayday_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(80, 24);
/// renderer.render(&frame);
/// renderer.flush().unwrap();
/// ```
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// A renderer whose first pass redraws the whole screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            previous: None,
        }
    }

    /// Queue the output needed to turn the last frame into `current`.
    ///
    /// Nothing reaches the terminal until [`flush`](Self::flush).
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let mut stats = RenderStats::default();
        if current.width() == 0 || current.height() == 0 {
            self.remember(current);
            return stats;
        }

        let previous = self
            .previous
            .take()
            .filter(|p| p.width() == current.width() && p.height() == current.height());
        stats.full_redraw = previous.is_none();

        // In-memory writes cannot fail.
        let _ = ansi::begin_sync(&mut self.output);
        if stats.full_redraw {
            let _ = ansi::clear_screen(&mut self.output);
        }

        let width = usize::from(current.width());
        for y in 0..current.height() {
            let row = current.row(y).unwrap_or_default();
            let old = previous.as_ref().and_then(|p| p.row(y));

            if old == Some(row) {
                stats.cells_skipped += width;
                continue;
            }

            for (x, cell) in (0..current.width()).zip(row) {
                if old.and_then(|o| o.get(usize::from(x))) == Some(cell) {
                    stats.cells_skipped += 1;
                } else {
                    self.writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        let _ = ansi::reset(&mut self.output);
        let _ = ansi::end_sync(&mut self.output);
        stats.bytes_written = self.output.len();

        self.previous = previous;
        self.remember(current);
        stats
    }

    /// Bytes queued by the last render.
    #[cfg(test)]
    fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write queued bytes to stdout.
    ///
    /// # Errors
    ///
    /// Propagates the stdout write failure.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write queued bytes to `w`.
    ///
    /// # Errors
    ///
    /// Propagates the write failure.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Make the next render redraw everything, e.g. after a resize.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn remember(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) => prev.copy_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
