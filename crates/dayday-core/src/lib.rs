// SPDX-License-Identifier: MIT
//
// dayday-core — the countdown engine behind tty-dayday.
//
// Day arithmetic (`date`, `delta`, `breakdown`) is pure and knows nothing
// about the screen. `glyph` and `layout` turn numbers into panel pixels, and
// `controller` ties them to a `Clock` and the keys as a dayday-term `App`.

pub mod breakdown;
pub mod clock;
pub mod controller;
pub mod date;
pub mod delta;
pub mod error;
pub mod glyph;
pub mod layout;
pub mod palette;
