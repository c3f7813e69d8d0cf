// SPDX-License-Identifier: MIT
//
// FrameBuffer — the cell grid every panel paints into.
//
// The buffer is a flat row-major `Vec<Cell>`. Panels write text and solid
// "pixel" blocks into it through a `ClipRect` that keeps each panel inside
// its own region, and the diff renderer then compares it against the
// previous frame to decide which cells actually reach the terminal.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── ClipRect ────────────────────────────────────────────────────────────────

/// A rectangle in screen coordinates, used for clipping and panel areas.
///
/// ```
/// use dayday_term::buffer::ClipRect;
///
/// let clip = ClipRect::new(10, 5, 60, 7);
/// assert!(clip.contains(10, 5));
/// assert!(clip.contains(69, 11));
/// assert!(!clip.contains(70, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    /// Left edge (column).
    pub x: u16,
    /// Top edge (row).
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl ClipRect {
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive), widened so it never overflows.
    #[inline]
    #[must_use]
    pub const fn right(self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Bottom edge (exclusive), widened so it never overflows.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> u32 {
        self.y as u32 + self.height as u32
    }

    /// Whether the rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the point `(px, py)` lies inside.
    #[inline]
    #[must_use]
    pub const fn contains(self, px: u16, py: u16) -> bool {
        px >= self.x && (px as u32) < self.right() && py >= self.y && (py as u32) < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[inline]
    #[must_use]
    pub const fn encloses(self, other: Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlap of two rectangles, or `None` when they don't touch.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        // x2/y2 are bounded by one of the inputs' u16 edges plus a u16 size,
        // and the differences by the inputs' widths and heights.
        if x2 > u32::from(x1) && y2 > u32::from(y1) {
            Some(Self {
                x: x1,
                y: y1,
                width: (x2 - u32::from(x1)) as u16,
                height: (y2 - u32::from(y1)) as u16,
            })
        } else {
            None
        }
    }
}

// ─── FrameBuffer ─────────────────────────────────────────────────────────────

/// A 2D grid of cells, indexed `y * width + x`.
///
/// ```
/// use dayday_term::buffer::FrameBuffer;
/// use dayday_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).unwrap().character(), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A buffer of blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_bg(width, height, CellColor::Default)
    }

    /// A buffer of blank cells over `bg`.
    #[must_use]
    pub fn with_bg(width: u16, height: u16, bg: CellColor) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY.with_bg(bg); size],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// All cells, row-major.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row `y` as a slice, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            self.cells.get(start..start + usize::from(self.width))
        } else {
            None
        }
    }

    /// Iterate cells with their coordinates.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let w = usize::from(self.width).max(1);
        // x < width and y < height, both u16.
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % w) as u16, (i / w) as u16, cell))
    }

    /// Text content of row `y` with continuation cells dropped.
    ///
    /// Handy for asserting what a panel wrote.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.character())
            .collect()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize, discarding all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Copy `other` into this buffer without reallocating.
    ///
    /// Falls back to a clone when the sizes differ.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    // ─── Writing ─────────────────────────────────────────────────────────

    /// Bounds-checked raw write. Returns `false` out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Turn any wide character touching `(x, y)` back into blanks, so a
    /// write there never leaves half a glyph on screen.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);

        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            self.cells[prev].ch = u32::from(b' ');
        }

        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::EMPTY.with_bg(self.cells[next].bg);
            }
        }
    }

    /// Write one styled cell, honoring `clip`. Returns `true` if written.
    pub fn paint_cell(&mut self, x: u16, y: u16, cell: Cell, clip: Option<&ClipRect>) -> bool {
        if !self.in_bounds(x, y) || clip.is_some_and(|c| !c.contains(x, y)) {
            return false;
        }
        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Fill a rectangle with solid `bg` blocks, clipped to the buffer.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fill_rect(&mut self, rect: ClipRect, bg: CellColor) {
        let Some(area) = rect.intersect(self.bounds()) else {
            return;
        };

        // The intersection lies inside the buffer, so its edges fit in u16.
        let x2 = area.right() as u16;
        for y in area.y..area.bottom() as u16 {
            let start = self.index(area.x, y);
            let end = self.index(x2, y);
            self.cells[start..end].fill(Cell::block(bg));
        }
    }

    /// Paint `text` left to right from `(x, y)`, clipped to `clip`.
    ///
    /// Wide characters take two columns; one that would straddle the right
    /// edge is replaced by a space. Zero-width characters are skipped.
    /// Returns the number of columns consumed.
    pub fn paint_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: Cell,
        clip: Option<&ClipRect>,
    ) -> u16 {
        if y >= self.height {
            return 0;
        }

        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let w = char_width(ch);
            if w == 0 {
                continue;
            }

            let glyph = Cell { ch: u32::from(ch), ..style };
            if w == 2 && col + 1 >= self.width {
                self.paint_cell(col, y, Cell { ch: u32::from(b' '), ..style }, clip);
                col += 1;
                break;
            }

            if self.paint_cell(col, y, glyph, clip) && w == 2 {
                let cont = Cell::continuation(style.fg, style.bg, style.attrs);
                self.paint_cell(col + 1, y, cont, clip);
            }

            #[allow(clippy::cast_possible_truncation)]
            let w = w as u16;
            col = col.saturating_add(w);
        }

        col.saturating_sub(x)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ──────────────────────────────────────────────────────────────

/// Display width of a character: 0, 1 or 2 columns.
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Display width of a string in columns.
///
/// ```
/// use dayday_term::buffer::string_width;
///
/// assert_eq!(string_width("hello"), 5);
/// assert_eq!(string_width("新年"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// A plain text style: `fg` on `bg`, no attributes.
#[inline]
#[must_use]
pub const fn text_style(fg: CellColor, bg: CellColor) -> Cell {
    Cell::styled(' ', fg, bg, Attr::empty())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
