// SPDX-License-Identifier: MIT
//
// Keyboard input decoding.
//
// Raw mode hands us bytes, not keys. The countdown only cares about a few
// letters, but terminals still send arrows, function keys and UTF-8 text,
// and those must be consumed whole so a stray `A` from `ESC [ A` never reads
// as a command. The parser keeps an internal buffer since a sequence can be
// split across reads:
//
// - ASCII and UTF-8 characters become `KeyCode::Char`
// - Control bytes become `Char` with `CTRL` (Ctrl-C arrives as `'c'`)
// - `ESC x` is Alt+x
// - CSI / SS3 sequences map to arrows and navigation keys, or are dropped
//
// A lone ESC stays pending until `flush` is called after an idle timeout.

// ─── Key Types ───────────────────────────────────────────────────────────────

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// The character, if this is a character key.
    #[must_use]
    pub const fn char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }

    /// Whether Ctrl was held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    /// Function key F1..=F12.
    F(u8),
}

bitflags::bitflags! {
    /// Modifier keys, in xterm's `1 + bitmask` order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

const ESC: u8 = 0x1B;

/// Incremental byte-to-key decoder.
///
/// ```
/// use dayday_term::input::{KeyCode, Parser};
///
/// let mut parser = Parser::new();
/// let keys = parser.advance(b"q");
/// assert_eq!(keys[0].code, KeyCode::Char('q'));
/// ```
pub struct Parser {
    pending: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(16),
        }
    }

    /// Feed bytes and return every key they complete.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.pending.extend_from_slice(data);

        let mut keys = Vec::new();
        let mut pos = 0;
        while pos < self.pending.len() {
            match decode(&self.pending[pos..]) {
                Step::Key(key, used) => {
                    keys.push(key);
                    pos += used;
                }
                Step::Skip(used) => pos += used,
                Step::NeedMore => break,
            }
        }
        self.pending.drain(..pos);
        keys
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Resolve leftovers after an idle timeout.
    ///
    /// A lone ESC becomes Escape. Any other fragment is dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let keys = if self.pending == [ESC] {
            vec![KeyEvent::plain(KeyCode::Escape)]
        } else {
            Vec::new()
        };
        self.pending.clear();
        keys
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// Outcome of decoding from the front of the buffer.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Key(KeyEvent, usize),
    Skip(usize),
    NeedMore,
}

fn decode(buf: &[u8]) -> Step {
    let Some(&first) = buf.first() else {
        return Step::NeedMore;
    };
    match first {
        ESC => decode_escape(buf),
        _ => decode_plain(buf).map_or(Step::Skip(1), |(key, used)| match key {
            Some(key) => Step::Key(key, used),
            None => Step::NeedMore,
        }),
    }
}

/// Decode one non-ESC key. `Ok(None)` means a truncated UTF-8 sequence,
/// `Err` an invalid byte.
fn decode_plain(buf: &[u8]) -> Result<(Option<KeyEvent>, usize), ()> {
    let first = buf[0];
    let key = match first {
        b'\r' | b'\n' => KeyEvent::plain(KeyCode::Enter),
        b'\t' => KeyEvent::plain(KeyCode::Tab),
        0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
        0x00 => KeyEvent::new(KeyCode::Char(' '), Modifiers::CTRL),
        0x01..=0x1A => KeyEvent::new(KeyCode::Char(char::from(first - 1 + b'a')), Modifiers::CTRL),
        0x1C..=0x1F => return Err(()),
        0x20..=0x7E => KeyEvent::plain(KeyCode::Char(char::from(first))),
        _ => return decode_utf8(buf),
    };
    Ok((Some(key), 1))
}

fn decode_utf8(buf: &[u8]) -> Result<(Option<KeyEvent>, usize), ()> {
    let len = match buf[0] {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Err(()),
    };
    if buf.len() < len {
        return if buf[1..].iter().all(|b| b & 0xC0 == 0x80) {
            Ok((None, 0))
        } else {
            Err(())
        };
    }
    let ch = std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .ok_or(())?;
    Ok((Some(KeyEvent::plain(KeyCode::Char(ch))), len))
}

fn decode_escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return Step::NeedMore;
    };
    match next {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        ESC => Step::Key(KeyEvent::new(KeyCode::Escape, Modifiers::ALT), 2),
        _ => match decode_plain(&buf[1..]) {
            Ok((Some(mut key), used)) => {
                key.modifiers |= Modifiers::ALT;
                Step::Key(key, used + 1)
            }
            Ok((None, _)) => Step::NeedMore,
            Err(()) => Step::Key(KeyEvent::plain(KeyCode::Escape), 1),
        },
    }
}

/// `ESC [ params final`. Parameter bytes are 0x30..=0x3F, intermediates
/// 0x20..=0x2F and the final byte 0x40..=0x7E.
fn decode_csi(buf: &[u8]) -> Step {
    let body = &buf[2..];
    let Some(end) = body.iter().position(|b| !(0x20..=0x3F).contains(b)) else {
        return Step::NeedMore;
    };
    let used = end + 3;
    let final_byte = body[end];
    if !(0x40..=0x7E).contains(&final_byte) {
        return Step::Skip(used);
    }

    let params = parse_params(&body[..end]);
    let modifiers = params.get(1).copied().map_or(Modifiers::empty(), decode_modifiers);

    let code = match (final_byte, params.first().copied().unwrap_or(0)) {
        (b'A', _) => KeyCode::Up,
        (b'B', _) => KeyCode::Down,
        (b'C', _) => KeyCode::Right,
        (b'D', _) => KeyCode::Left,
        (b'H', _) | (b'~', 1 | 7) => KeyCode::Home,
        (b'F', _) | (b'~', 4 | 8) => KeyCode::End,
        (b'~', 2) => KeyCode::Insert,
        (b'~', 3) => KeyCode::Delete,
        (b'~', 5) => KeyCode::PageUp,
        (b'~', 6) => KeyCode::PageDown,
        (b'~', n @ 11..=15) => function_key(n - 10),
        (b'~', n @ 17..=21) => function_key(n - 11),
        (b'~', n @ 23..=24) => function_key(n - 12),
        (b'P', _) => KeyCode::F(1),
        (b'Q', _) => KeyCode::F(2),
        (b'R', _) => KeyCode::F(3),
        (b'S', _) => KeyCode::F(4),
        (b'Z', _) => return Step::Key(KeyEvent::new(KeyCode::Tab, Modifiers::SHIFT), used),
        _ => return Step::Skip(used),
    };
    Step::Key(KeyEvent::new(code, modifiers), used)
}

/// `ESC O x`: arrows and F1..F4 in application cursor mode.
fn decode_ss3(buf: &[u8]) -> Step {
    let Some(&b) = buf.get(2) else {
        return Step::NeedMore;
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Step::Skip(3),
    };
    Step::Key(KeyEvent::plain(code), 3)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

#[allow(clippy::cast_possible_truncation)]
const fn function_key(n: u16) -> KeyCode {
    // Callers pass 1..=12.
    KeyCode::F(n as u8)
}

/// Semicolon-separated numeric parameters. Sub-parameters after `:` and
/// private markers like `?` are ignored.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// xterm encodes modifiers as `1 + bitmask`.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
