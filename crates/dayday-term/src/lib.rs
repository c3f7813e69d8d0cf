// SPDX-License-Identifier: MIT
//
// dayday-term — terminal backend for tty-dayday.
//
// Raw termios, hand-written ANSI and a diffing renderer, with no TUI
// framework underneath. The countdown paints panels into a `FrameBuffer`,
// the `DiffRenderer` sends only changed cells, and the `EventLoop` ties
// frames to key presses and a poll timeout.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod panel;
pub mod reader;
pub mod terminal;
