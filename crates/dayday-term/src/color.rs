// SPDX-License-Identifier: MIT
//
// Colors for terminal cells.
//
// The display only ever paints with the eight standard ANSI colors, the same
// palette curses exposes as COLOR_BLACK..COLOR_WHITE. Those eight slots are
// addressed by index (0..=7) so the countdown can cycle through them, and by
// name so the command line can accept `--color cyan`.
//
// A cell stores a `CellColor`: either one of the indexed palette entries or
// the terminal's own default. Keeping it a tiny `Copy` enum keeps cell
// comparison in the diff renderer a plain byte compare.

use std::fmt;
use std::str::FromStr;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// Color stored in a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// An ANSI palette index. `0..=7` are the standard colors, `8..=15`
    /// their bright variants, anything above uses the 256-color form.
    Indexed(u8),

    /// Terminal default color (inherits from the user's terminal theme).
    #[default]
    Default,
}

impl From<AnsiColor> for CellColor {
    fn from(color: AnsiColor) -> Self {
        Self::Indexed(color.index())
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed(idx) => write!(f, "ansi({idx})"),
            Self::Default => f.write_str("default"),
        }
    }
}

// ─── AnsiColor ───────────────────────────────────────────────────────────────

/// The eight standard ANSI colors, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AnsiColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

impl AnsiColor {
    /// All eight colors in palette order.
    pub const ALL: [Self; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// Palette index, `0..=7`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Look up a color by palette index. `None` above 7.
    #[must_use]
    pub const fn from_index(idx: u8) -> Option<Self> {
        if idx < 8 {
            Some(Self::ALL[idx as usize])
        } else {
            None
        }
    }

    /// Lowercase color name as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }
}

impl fmt::Display for AnsiColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no ANSI color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color '{0}' (expected a name like 'green' or an index 0-7)")]
pub struct UnknownColor(pub String);

impl FromStr for AnsiColor {
    type Err = UnknownColor;

    /// Accepts a case-insensitive color name or a palette index `0..=7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(idx) = trimmed.parse::<u8>() {
            return Self::from_index(idx).ok_or_else(|| UnknownColor(s.to_owned()));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
