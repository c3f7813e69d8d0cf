// SPDX-License-Identifier: MIT
//
// Cell — one character position on the screen.
//
// A cell holds a codepoint, foreground and background colors and a small set
// of text attributes. The countdown's big digits are made of cells whose
// character is a space and whose background carries the "pixel" color, so
// the whole display is just a grid of these.
//
// Wide characters (an event name in CJK, say) occupy two columns: the first
// cell holds the codepoint, the second is a continuation cell with `ch = 0`
// that only carries colors.

use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes, mapped one-to-one onto SGR parameters.
    ///
    /// ```
    /// use dayday_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1 — increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 2 — decreased intensity.
        const DIM       = 1 << 1;
        /// SGR 4 — single underline.
        const UNDERLINE = 1 << 2;
        /// SGR 7 — swap foreground and background.
        const INVERSE   = 1 << 3;
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode codepoint. `0` marks a continuation cell, `' '` is blank.
    pub ch: u32,
    /// Foreground (text) color.
    pub fg: CellColor,
    /// Background color.
    pub bg: CellColor,
    /// Text attributes.
    pub attrs: Attr,
}

const CONTINUATION: u32 = 0;
const SPACE: u32 = b' ' as u32;

impl Cell {
    /// A blank cell: space, default colors, no attributes.
    pub const EMPTY: Self = Self {
        ch: SPACE,
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    /// A cell showing `ch` in the terminal's default colors.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch: ch as u32,
            fg: CellColor::Default,
            bg: CellColor::Default,
            attrs: Attr::empty(),
        }
    }

    /// A fully styled cell.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: ch as u32,
            fg,
            bg,
            attrs,
        }
    }

    /// A solid block of `color`: a space whose background is the color.
    ///
    /// This is what one lit (or unlit) pixel of a digit glyph looks like.
    #[inline]
    #[must_use]
    pub const fn block(color: CellColor) -> Self {
        Self {
            ch: SPACE,
            fg: color,
            bg: color,
            attrs: Attr::empty(),
        }
    }

    /// The second column of a wide character.
    #[inline]
    #[must_use]
    pub const fn continuation(fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: CONTINUATION,
            fg,
            bg,
            attrs,
        }
    }

    /// Whether this is a continuation cell.
    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    /// Whether this cell is blank with default colors and no attributes.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// The codepoint as a `char`. `None` for continuation cells.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.ch == CONTINUATION {
            return None;
        }
        char::from_u32(self.ch)
    }

    /// Builder: replace the background color.
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: CellColor) -> Self {
        self.bg = bg;
        self
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
