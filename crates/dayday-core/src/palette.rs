// SPDX-License-Identifier: MIT
//
// The color pair everything is painted with.
//
// Text and lit pixels use the foreground color; the background and unlit
// pixels use the background color. Pressing `t` steps the foreground
// through palette slots 1..=7, passing over the background's slot so the
// digits never vanish. Slot 0 (black) can be a background but is never
// reached by cycling.

use dayday_term::color::{AnsiColor, CellColor};

/// Number of slots the foreground cycles through.
pub const CYCLE_LEN: u8 = 7;

/// The slot after `index`: 1 → 2 → … → 7 → 1. Slot 0 also steps to 1.
#[must_use]
pub const fn next_slot(index: u8) -> u8 {
    index % CYCLE_LEN + 1
}

/// Whether `index` is one of the cycled foreground slots.
#[must_use]
pub const fn is_cycle_slot(index: u8) -> bool {
    index >= 1 && index <= CYCLE_LEN
}

/// Foreground and background palette slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub color_index: u8,
    pub background_index: u8,
}

impl Palette {
    /// Green on black.
    pub const DEFAULT: Self = Self {
        color_index: AnsiColor::Green.index(),
        background_index: AnsiColor::Black.index(),
    };

    #[must_use]
    pub const fn new(color: AnsiColor, background: AnsiColor) -> Self {
        Self {
            color_index: color.index(),
            background_index: background.index(),
        }
    }

    /// The on color: text, banner and lit pixels.
    #[must_use]
    pub const fn on(self) -> CellColor {
        CellColor::Indexed(self.color_index)
    }

    /// The off color: background and unlit pixels.
    #[must_use]
    pub const fn off(self) -> CellColor {
        CellColor::Indexed(self.background_index)
    }

    /// Step the foreground to the next slot that differs from the
    /// background.
    pub const fn cycle(&mut self) {
        let mut next = next_slot(self.color_index);
        if next == self.background_index {
            next = next_slot(next);
        }
        self.color_index = next;
    }

    /// Name of the current foreground, for logs.
    #[must_use]
    pub fn color_name(self) -> &'static str {
        AnsiColor::from_index(self.color_index).map_or("?", AnsiColor::name)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::DEFAULT
    }
}
