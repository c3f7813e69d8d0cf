// SPDX-License-Identifier: MIT
//
// Screen layout.
//
//   row 0      event name banner, as wide as the name
//   rows 1-7   digit panel, 60x7: labels on its row 0, glyphs on rows 2-6
//   row 9      help bar
//
// The digit panel shows one of two faces. The year/month/day face has
// slots for YYYY / MM / DD with text separators; the total face has seven
// slots for the raw day count. Both cover the same panel, which is cleared
// before either is drawn, so switching never leaves stray pixels behind.

use dayday_term::buffer::{ClipRect, FrameBuffer, string_width};
use dayday_term::panel::{Panel, PanelError};
use dayday_term::terminal::Size;

use crate::breakdown::CountdownResult;
use crate::glyph::{GLYPH_HEIGHT, draw_number};
use crate::palette::Palette;

pub const DIGIT_PANEL_ROW: u16 = 1;
pub const DIGIT_PANEL_COLS: u16 = 60;
pub const DIGIT_PANEL_ROWS: u16 = GLYPH_ROW + GLYPH_HEIGHT;
pub const HELP_ROW: u16 = DIGIT_PANEL_ROW + DIGIT_PANEL_ROWS + 1;

/// Smallest terminal the layout fits in.
pub const MIN_SIZE: Size = Size::new(DIGIT_PANEL_COLS, HELP_ROW + 1);

/// Panel row of the top of every glyph.
const GLYPH_ROW: u16 = 2;
/// Panel row of the `/` separators, level with the glyph middle.
const SEPARATOR_ROW: u16 = GLYPH_ROW + GLYPH_HEIGHT / 2;

/// A group of slots on the digit panel: label, label column, first slot
/// column, slot count.
struct Group {
    label: &'static str,
    label_col: u16,
    col: u16,
    slots: usize,
}

const YEAR: Group = Group {
    label: "YEAR",
    label_col: 8,
    col: 1,
    slots: 4,
};
const MONTH: Group = Group {
    label: "MONTH",
    label_col: 31,
    col: 31,
    slots: 2,
};
const DAY: Group = Group {
    label: "DAY",
    label_col: 47,
    col: 47,
    slots: 2,
};
const TOTAL: Group = Group {
    label: "DAYS",
    label_col: 28,
    col: 6,
    slots: 7,
};

/// Separator columns between year/month and month/day.
const SEPARATOR_COLS: [u16; 2] = [29, 45];

pub const HELP_TEXT: &str = "q: quit   t: color   h: help   f: format";

/// The three panels and the drawing that goes into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    banner: Panel,
    digits: Panel,
    help: Panel,
}

impl Layout {
    /// Place the panels for an event called `name` on a `screen`.
    ///
    /// # Errors
    ///
    /// A [`PanelError`] when a panel doesn't fit, i.e. the terminal is
    /// smaller than [`MIN_SIZE`] or the name is wider than the screen.
    pub fn new(name: &str, screen: Size, palette: Palette) -> Result<Self, PanelError> {
        let name_width = u16::try_from(string_width(name)).unwrap_or(u16::MAX);
        let mut layout = Self {
            banner: Panel::create(ClipRect::new(0, 0, name_width, 1), screen)?,
            digits: Panel::create(
                ClipRect::new(0, DIGIT_PANEL_ROW, DIGIT_PANEL_COLS, DIGIT_PANEL_ROWS),
                screen,
            )?,
            help: Panel::create(ClipRect::new(0, HELP_ROW, DIGIT_PANEL_COLS, 1), screen)?,
        };
        layout.set_palette(palette);
        Ok(layout)
    }

    /// Re-derive every panel's color pair.
    pub const fn set_palette(&mut self, palette: Palette) {
        self.banner.set_colors(palette.on(), palette.off());
        self.digits.set_colors(palette.on(), palette.off());
        self.help.set_colors(palette.on(), palette.off());
    }

    #[must_use]
    pub const fn digit_panel(&self) -> &Panel {
        &self.digits
    }

    pub fn draw_banner(&self, buf: &mut FrameBuffer, name: &str) {
        self.banner.clear(buf);
        self.banner.write_text(buf, 0, 0, name);
    }

    /// Year/month/day face. Returns the number of glyphs drawn.
    pub fn draw_ymd(&self, buf: &mut FrameBuffer, result: &CountdownResult) -> usize {
        self.digits.clear(buf);
        let mut drawn = 0;
        for (group, value) in [(&YEAR, result.years), (&MONTH, result.months), (&DAY, result.days)] {
            drawn += self.draw_group(buf, group, value);
        }
        for col in SEPARATOR_COLS {
            self.digits.write_text(buf, SEPARATOR_ROW, col, "/");
        }
        drawn
    }

    /// Total-days face. Returns the number of glyphs drawn.
    pub fn draw_total(&self, buf: &mut FrameBuffer, result: &CountdownResult) -> usize {
        self.digits.clear(buf);
        self.draw_group(buf, &TOTAL, result.total_days)
    }

    /// The key list, or a blank bar.
    pub fn draw_help(&self, buf: &mut FrameBuffer, visible: bool) {
        self.help.clear(buf);
        if visible {
            self.help.write_text(buf, 0, 0, HELP_TEXT);
        }
    }

    fn draw_group(&self, buf: &mut FrameBuffer, group: &Group, value: u32) -> usize {
        self.digits.write_text(buf, 0, group.label_col, group.label);
        draw_number(&self.digits, buf, value, group.slots, GLYPH_ROW, group.col)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::SLOT_WIDTH;
    use dayday_term::cell::Cell;
    use pretty_assertions::assert_eq;

    const SCREEN: Size = Size::new(80, 24);

    fn layout() -> Layout {
        Layout::new("Launch", SCREEN, Palette::default()).unwrap()
    }

    fn result(total: u32) -> CountdownResult {
        CountdownResult::from_days(total)
    }

    #[test]
    fn groups_fit_the_digit_panel() {
        for group in [&YEAR, &MONTH, &DAY, &TOTAL] {
            let slots = u16::try_from(group.slots).unwrap();
            let end = group.col + slots * SLOT_WIDTH - 1;
            assert!(end <= DIGIT_PANEL_COLS, "{} ends at {end}", group.label);
            assert!(group.label_col + 5 <= DIGIT_PANEL_COLS);
        }
        assert_eq!(DAY.col + 2 * SLOT_WIDTH - 1, DIGIT_PANEL_COLS);
    }

    #[test]
    fn separators_sit_between_groups() {
        assert!(YEAR.col + 4 * SLOT_WIDTH - 1 < SEPARATOR_COLS[0]);
        assert!(SEPARATOR_COLS[0] < MONTH.col);
        assert!(MONTH.col + 2 * SLOT_WIDTH - 1 < SEPARATOR_COLS[1]);
        assert!(SEPARATOR_COLS[1] < DAY.col);
    }

    #[test]
    fn minimum_size_is_sixty_by_ten() {
        assert_eq!(MIN_SIZE, Size::new(60, 10));
        assert!(Layout::new("x", MIN_SIZE, Palette::default()).is_ok());
        assert!(Layout::new("x", Size::new(59, 10), Palette::default()).is_err());
        assert!(Layout::new("x", Size::new(60, 9), Palette::default()).is_err());
    }

    #[test]
    fn name_wider_than_screen_is_an_error() {
        let long = "n".repeat(81);
        let err = Layout::new(&long, SCREEN, Palette::default()).unwrap_err();
        assert!(matches!(err, PanelError::OffScreen { .. }));
    }

    #[test]
    fn banner_is_on_top_in_the_palette() {
        let mut buf = FrameBuffer::new(80, 24);
        layout().draw_banner(&mut buf, "Launch");
        assert!(buf.row_text(0).starts_with("Launch"));
        assert_eq!(buf.get(0, 0).unwrap().fg, Palette::default().on());
        assert!(buf.get(6, 0).unwrap().is_empty());
    }

    #[test]
    fn ymd_face_draws_labels_and_separators() {
        let mut buf = FrameBuffer::new(80, 24);
        let drawn = layout().draw_ymd(&mut buf, &result(10));
        // 0 years, 0 months, 10 days: one zero glyph each for year and
        // month, two glyphs for the day.
        assert_eq!(drawn, 4);

        let labels = buf.row_text(DIGIT_PANEL_ROW);
        assert_eq!(&labels[8..12], "YEAR");
        assert_eq!(&labels[31..36], "MONTH");
        assert_eq!(&labels[47..50], "DAY");

        let sep_row = buf.row_text(DIGIT_PANEL_ROW + SEPARATOR_ROW);
        assert_eq!(&sep_row[29..30], "/");
        assert_eq!(&sep_row[45..46], "/");
    }

    #[test]
    fn total_face_draws_the_day_count() {
        let mut buf = FrameBuffer::new(80, 24);
        assert_eq!(layout().draw_total(&mut buf, &result(4321)), 4);
        assert_eq!(&buf.row_text(DIGIT_PANEL_ROW)[28..32], "DAYS");
    }

    #[test]
    fn faces_repaint_the_whole_panel() {
        let l = layout();
        let mut ymd_first = FrameBuffer::new(80, 24);
        l.draw_ymd(&mut ymd_first, &result(1234));
        l.draw_total(&mut ymd_first, &result(1234));

        let mut total_only = FrameBuffer::new(80, 24);
        l.draw_total(&mut total_only, &result(1234));

        assert_eq!(ymd_first, total_only);
    }

    #[test]
    fn help_bar_shows_keys_or_nothing() {
        let l = layout();
        let mut buf = FrameBuffer::new(80, 24);
        l.draw_help(&mut buf, true);
        assert!(buf.row_text(HELP_ROW).starts_with(HELP_TEXT));

        l.draw_help(&mut buf, false);
        let off = Cell::block(Palette::default().off());
        assert!((0..DIGIT_PANEL_COLS).all(|x| *buf.get(x, HELP_ROW).unwrap() == off));
    }

    #[test]
    fn set_palette_recolors_panels() {
        let mut l = layout();
        let mut p = Palette::default();
        p.cycle();
        l.set_palette(p);
        assert_eq!(l.digit_panel().on(), p.on());
    }
}
