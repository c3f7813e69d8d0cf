// SPDX-License-Identifier: MIT
//
// Panels: fixed rectangles of the screen with their own color pair.
//
// Every visible element of the countdown (the event banner, the digit grid,
// the help bar) lives in a panel. A panel knows where it sits and which two
// colors it paints with: "on" for text and lit pixels, "off" for the
// background and unlit pixels. Coordinates passed to a panel are relative to
// its top-left corner, and nothing it writes can land outside its area.
//
// Panels don't own cells. They write into the frame the event loop hands to
// `App::paint`, so presenting a panel is just presenting the frame.

use crate::buffer::{ClipRect, FrameBuffer};
use crate::cell::{Attr, Cell};
use crate::color::CellColor;
use crate::terminal::Size;

/// Why a panel couldn't be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("panel at row {row}, column {col} has no area ({cols}x{rows})")]
    Empty { row: u16, col: u16, cols: u16, rows: u16 },

    #[error(
        "panel {cols}x{rows} at row {row}, column {col} does not fit a {screen} terminal"
    )]
    OffScreen {
        row: u16,
        col: u16,
        cols: u16,
        rows: u16,
        screen: Size,
    },
}

/// A screen rectangle with an on/off color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    area: ClipRect,
    on: CellColor,
    off: CellColor,
}

impl Panel {
    /// Create a panel covering `area`, which must lie inside `screen`.
    ///
    /// Starts out painting in the terminal's default colors.
    ///
    /// # Errors
    ///
    /// [`PanelError::Empty`] for a zero-sized area,
    /// [`PanelError::OffScreen`] when any part is outside the screen.
    pub fn create(area: ClipRect, screen: Size) -> Result<Self, PanelError> {
        if area.is_empty() {
            return Err(PanelError::Empty {
                row: area.y,
                col: area.x,
                cols: area.width,
                rows: area.height,
            });
        }
        let bounds = ClipRect::new(0, 0, screen.cols, screen.rows);
        if !bounds.encloses(area) {
            return Err(PanelError::OffScreen {
                row: area.y,
                col: area.x,
                cols: area.width,
                rows: area.height,
                screen,
            });
        }
        Ok(Self {
            area,
            on: CellColor::Default,
            off: CellColor::Default,
        })
    }

    #[inline]
    #[must_use]
    pub const fn area(&self) -> ClipRect {
        self.area
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.area.height
    }

    #[inline]
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.area.width
    }

    #[inline]
    #[must_use]
    pub const fn on(&self) -> CellColor {
        self.on
    }

    #[inline]
    #[must_use]
    pub const fn off(&self) -> CellColor {
        self.off
    }

    /// Change the color pair used by later writes.
    pub const fn set_colors(&mut self, on: CellColor, off: CellColor) {
        self.on = on;
        self.off = off;
    }

    /// Screen position of panel cell `(row, col)`, if it's inside.
    fn to_screen(&self, row: u16, col: u16) -> Option<(u16, u16)> {
        if row >= self.area.height || col >= self.area.width {
            return None;
        }
        Some((self.area.x + col, self.area.y + row))
    }

    /// Write `text` in the on color over the off color, starting at
    /// `(row, col)`. Clipped at the panel's right edge.
    ///
    /// Returns the number of columns written.
    pub fn write_text(&self, buf: &mut FrameBuffer, row: u16, col: u16, text: &str) -> u16 {
        let Some((x, y)) = self.to_screen(row, col) else {
            return 0;
        };
        let style = Cell::styled(' ', self.on, self.off, Attr::empty());
        let clip = self.area.intersect(buf.bounds());
        match clip {
            Some(clip) => buf
                .paint_text(x, y, text, style, Some(&clip))
                .min(self.area.width - col),
            None => 0,
        }
    }

    /// Fill the cell at `(row, col)` with a solid block of the on color
    /// (`use_on`) or the off color. Returns `false` outside the panel.
    pub fn write_cell(&self, buf: &mut FrameBuffer, row: u16, col: u16, use_on: bool) -> bool {
        let Some((x, y)) = self.to_screen(row, col) else {
            return false;
        };
        let color = if use_on { self.on } else { self.off };
        buf.paint_cell(x, y, Cell::block(color), None)
    }

    /// Paint the whole panel in the off color.
    pub fn clear(&self, buf: &mut FrameBuffer) {
        buf.fill_rect(self.area, self.off);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
