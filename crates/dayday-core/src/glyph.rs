// SPDX-License-Identifier: MIT
//
// Big digits.
//
// Each digit is a 3x5 bitmap drawn at double width, so on screen it covers
// 6 columns by 5 rows: terminal cells are about twice as tall as they are
// wide, and doubling the columns keeps the pixels roughly square. A lit
// pixel is a block of the panel's on color, an unlit one a block of its off
// color.
//
// Numbers are drawn into a fixed number of slots, most significant first.
// Leading zeros are left blank, but the last slot is always drawn so zero
// still shows as "0".

use dayday_term::buffer::FrameBuffer;
use dayday_term::panel::Panel;

/// Columns a digit covers on screen.
pub const GLYPH_WIDTH: u16 = 6;
/// Rows a digit covers on screen.
pub const GLYPH_HEIGHT: u16 = 5;
/// Distance between the left edges of neighboring slots.
pub const SLOT_WIDTH: u16 = GLYPH_WIDTH + 1;

/// Bitmap rows per digit, three bits each, most significant bit leftmost.
#[rustfmt::skip]
const GLYPHS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

/// Whether screen pixel `(row, col)` of `digit` is lit.
///
/// `row` is `0..5` and `col` is `0..6`. Anything out of range is unlit.
#[must_use]
pub fn is_lit(digit: u8, row: u16, col: u16) -> bool {
    if col >= GLYPH_WIDTH {
        return false;
    }
    let Some(bits) = GLYPHS
        .get(usize::from(digit))
        .and_then(|rows| rows.get(usize::from(row)))
    else {
        return false;
    };
    let logical = col / 2;
    bits & (0b100 >> logical) != 0
}

/// Paint `digit` with its top-left corner at panel cell `(row, col)`.
pub fn draw_digit(panel: &Panel, buf: &mut FrameBuffer, digit: u8, row: u16, col: u16) {
    for r in 0..GLYPH_HEIGHT {
        for c in 0..GLYPH_WIDTH {
            panel.write_cell(buf, row + r, col + c, is_lit(digit, r, c));
        }
    }
}

/// Blank one slot in the off color.
fn blank_slot(panel: &Panel, buf: &mut FrameBuffer, row: u16, col: u16) {
    for r in 0..GLYPH_HEIGHT {
        for c in 0..GLYPH_WIDTH {
            panel.write_cell(buf, row + r, col + c, false);
        }
    }
}

/// The last `slots` decimal digits of `value`, most significant first.
#[must_use]
pub fn slot_digits(value: u32, slots: usize) -> Vec<u8> {
    let mut digits = vec![0u8; slots];
    let mut rest = value;
    for slot in digits.iter_mut().rev() {
        // rest % 10 is a single digit.
        #[allow(clippy::cast_possible_truncation)]
        let digit = (rest % 10) as u8;
        *slot = digit;
        rest /= 10;
    }
    digits
}

/// Draw `value` into `slots` slots starting at panel cell `(row, col)`.
///
/// A slot is left blank while every digit up to and including it is zero;
/// the final slot is always drawn. Values wider than `slots` show their low
/// digits. Returns how many glyphs were drawn.
pub fn draw_number(
    panel: &Panel,
    buf: &mut FrameBuffer,
    value: u32,
    slots: usize,
    row: u16,
    col: u16,
) -> usize {
    let digits = slot_digits(value, slots);
    let last = digits.len().saturating_sub(1);
    let mut seen_nonzero = false;
    let mut drawn = 0;
    let mut x = col;

    for (i, &digit) in digits.iter().enumerate() {
        seen_nonzero |= digit != 0;
        if seen_nonzero || i == last {
            draw_digit(panel, buf, digit, row, x);
            drawn += 1;
        } else {
            blank_slot(panel, buf, row, x);
        }
        x = x.saturating_add(SLOT_WIDTH);
    }
    drawn
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dayday_term::buffer::ClipRect;
    use dayday_term::cell::Cell;
    use dayday_term::color::CellColor;
    use dayday_term::terminal::Size;
    use pretty_assertions::assert_eq;

    const ON: CellColor = CellColor::Indexed(2);
    const OFF: CellColor = CellColor::Indexed(0);

    fn setup(cols: u16) -> (Panel, FrameBuffer) {
        let mut panel = Panel::create(ClipRect::new(0, 0, cols, GLYPH_HEIGHT), Size::new(80, 24)).unwrap();
        panel.set_colors(ON, OFF);
        (panel, FrameBuffer::new(80, 24))
    }

    /// The panel rendered as `#` (on) and `.` (off).
    fn picture(buf: &FrameBuffer, cols: u16) -> Vec<String> {
        (0..GLYPH_HEIGHT)
            .map(|y| {
                (0..cols)
                    .map(|x| match buf.get(x, y) {
                        Some(c) if *c == Cell::block(ON) => '#',
                        Some(c) if *c == Cell::block(OFF) => '.',
                        _ => ' ',
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn every_digit_is_distinct() {
        for a in 0..10 {
            for b in (a + 1)..10 {
                assert_ne!(GLYPHS[a], GLYPHS[b], "{a} and {b} look alike");
            }
        }
    }

    #[test]
    fn pixels_are_doubled_horizontally() {
        for digit in 0..10 {
            for row in 0..GLYPH_HEIGHT {
                for pair in 0..3 {
                    assert_eq!(is_lit(digit, row, pair * 2), is_lit(digit, row, pair * 2 + 1));
                }
            }
        }
    }

    #[test]
    fn out_of_range_is_unlit() {
        assert!(!is_lit(10, 0, 0));
        assert!(!is_lit(8, 5, 0));
        assert!(!is_lit(8, 0, 6));
    }

    #[test]
    fn draw_digit_paints_six_by_five() {
        let (panel, mut buf) = setup(6);
        draw_digit(&panel, &mut buf, 7, 0, 0);
        assert_eq!(
            picture(&buf, 6),
            vec!["######", "....##", "....##", "....##", "....##"]
        );
    }

    #[test]
    fn seven_draws_one_glyph() {
        let (panel, mut buf) = setup(SLOT_WIDTH * 3);
        assert_eq!(draw_number(&panel, &mut buf, 7, 3, 0, 0), 1);
        // Leading slots are blank.
        assert!(picture(&buf, 13)[0].chars().all(|c| c == '.' || c == ' '));
    }

    #[test]
    fn one_hundred_seven_draws_three_glyphs() {
        let (panel, mut buf) = setup(SLOT_WIDTH * 4);
        assert_eq!(draw_number(&panel, &mut buf, 107, 4, 0, 0), 3);
    }

    #[test]
    fn zero_draws_one_glyph() {
        let (panel, mut buf) = setup(SLOT_WIDTH * 4);
        assert_eq!(draw_number(&panel, &mut buf, 0, 4, 0, 0), 1);
        let last = 3 * SLOT_WIDTH;
        assert_eq!(*buf.get(last, 0).unwrap(), Cell::block(ON));
        assert_eq!(*buf.get(last + 2, 1).unwrap(), Cell::block(OFF));
    }

    #[test]
    fn inner_zeros_are_drawn() {
        let (panel, mut buf) = setup(SLOT_WIDTH * 4);
        assert_eq!(draw_number(&panel, &mut buf, 2005, 4, 0, 0), 4);
    }

    #[test]
    fn slot_digits_pad_and_truncate() {
        assert_eq!(slot_digits(42, 4), vec![0, 0, 4, 2]);
        assert_eq!(slot_digits(12345, 3), vec![3, 4, 5]);
        assert_eq!(slot_digits(9, 1), vec![9]);
        assert!(slot_digits(9, 0).is_empty());
    }

    #[test]
    fn gap_between_slots_is_untouched() {
        let (panel, mut buf) = setup(SLOT_WIDTH * 2);
        draw_number(&panel, &mut buf, 88, 2, 0, 0);
        assert!(buf.get(GLYPH_WIDTH, 0).unwrap().is_empty());
    }
}
