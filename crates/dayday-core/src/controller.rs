// SPDX-License-Identifier: MIT
//
// The countdown controller: owns the event, the display state and the clock,
// and plugs into dayday-term's event loop as its `App`.
//
//   on_tick  → sample the clock, recompute the countdown
//   paint    → banner, digit panel (YMD or total), help bar
//   on_key   → q quits, t cycles the color, h toggles help, f toggles format
//
// Keys are matched case-insensitively and regardless of Alt. Ctrl
// combinations are ignored; the terminal is in raw mode, so Ctrl-C arrives
// here as a key rather than a signal and does nothing.

use dayday_term::buffer::FrameBuffer;
use dayday_term::event_loop::{Action, App};
use dayday_term::input::{KeyCode, KeyEvent};
use dayday_term::terminal::Size;
use tracing::{debug, info, trace, warn};

use crate::breakdown::CountdownResult;
use crate::clock::Clock;
use crate::date::CalendarDate;
use crate::delta::Direction;
use crate::error::{ConfigError, DayDayError};
use crate::layout::Layout;
use crate::palette::Palette;

// ─── Event ───────────────────────────────────────────────────────────────────

/// What is being counted. Fixed for the life of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
    target: CalendarDate,
    direction: Direction,
}

impl Event {
    /// # Errors
    ///
    /// [`ConfigError::MissingEventName`] when `name` is empty or blank.
    pub fn new(
        name: impl Into<String>,
        target: CalendarDate,
        direction: Direction,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::MissingEventName);
        }
        Ok(Self {
            name,
            target,
            direction,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn target(&self) -> CalendarDate {
        self.target
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

// ─── Display state ───────────────────────────────────────────────────────────

/// Everything the keys can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub palette: Palette,
    /// Show the key list under the digits.
    pub show_help: bool,
    /// Years/months/days rather than a single day count.
    pub use_ymd_format: bool,
}

impl DisplayConfig {
    #[must_use]
    pub const fn with_palette(palette: Palette) -> Self {
        Self {
            palette,
            show_help: true,
            use_ymd_format: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::with_palette(Palette::DEFAULT)
    }
}

/// Lifecycle. `Stopped` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

// ─── Controller ──────────────────────────────────────────────────────────────

pub struct Controller<C: Clock> {
    event: Event,
    display: DisplayConfig,
    state: State,
    clock: C,
    layout: Layout,
    result: CountdownResult,
}

impl<C: Clock> Controller<C> {
    /// Lay the display out for `screen` and take a first reading of `clock`.
    ///
    /// # Errors
    ///
    /// [`DayDayError::DisplaySurface`] when the panels don't fit `screen`.
    pub fn new(event: Event, display: DisplayConfig, clock: C, screen: Size) -> Result<Self, DayDayError> {
        let layout = Layout::new(event.name(), screen, display.palette)?;
        let result = CountdownResult::compute(event.target(), clock.today(), event.direction());
        info!(
            event = event.name(),
            target = %event.target(),
            direction = %event.direction(),
            total_days = result.total_days,
            %screen,
            "countdown started"
        );
        Ok(Self {
            event,
            display,
            state: State::Running,
            clock,
            layout,
            result,
        })
    }

    #[must_use]
    pub const fn event(&self) -> &Event {
        &self.event
    }

    #[must_use]
    pub const fn display(&self) -> DisplayConfig {
        self.display
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// The countdown as of the last tick.
    #[must_use]
    pub const fn result(&self) -> CountdownResult {
        self.result
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Recompute from the clock. Returns `true` when the numbers changed.
    pub fn refresh(&mut self) -> bool {
        let now = self.clock.today();
        let result = CountdownResult::compute(self.event.target(), now, self.event.direction());
        trace!(%now, total_days = result.total_days, "tick");
        let changed = result != self.result;
        self.result = result;
        changed
    }

    fn quit(&mut self) -> Action {
        self.state = State::Stopped;
        info!(total_days = self.result.total_days, "countdown stopped");
        Action::Quit
    }

    fn cycle_color(&mut self) {
        self.display.palette.cycle();
        self.layout.set_palette(self.display.palette);
        debug!(
            color = self.display.palette.color_name(),
            index = self.display.palette.color_index,
            "color changed"
        );
    }
}

impl<C: Clock> App for Controller<C> {
    fn on_key(&mut self, key: &KeyEvent) -> Action {
        if self.state == State::Stopped {
            return Action::Quit;
        }
        let KeyCode::Char(ch) = key.code else {
            return Action::Continue;
        };
        if key.ctrl() {
            return Action::Continue;
        }

        debug!(key = %ch, "key");
        match ch.to_ascii_lowercase() {
            'q' => return self.quit(),
            't' => self.cycle_color(),
            'h' => self.display.show_help = !self.display.show_help,
            'f' => self.display.use_ymd_format = !self.display.use_ymd_format,
            _ => {}
        }
        Action::Continue
    }

    fn on_resize(&mut self, size: Size) {
        match Layout::new(self.event.name(), size, self.display.palette) {
            Ok(layout) => {
                debug!(%size, "layout rebuilt");
                self.layout = layout;
            }
            // The old panels are kept and clipped to the new frame.
            Err(e) => warn!(%size, error = %e, "terminal too small"),
        }
    }

    fn on_tick(&mut self) -> bool {
        self.state == State::Running && self.refresh()
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        self.layout.draw_banner(buf, self.event.name());
        if self.display.use_ymd_format {
            self.layout.draw_ymd(buf, &self.result);
        } else {
            self.layout.draw_total(buf, &self.result);
        }
        self.layout.draw_help(buf, self.display.show_help);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use dayday_term::input::Modifiers;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    fn controller(direction: Direction) -> Controller<FixedClock> {
        let event = Event::new("Launch", date(2000, 1, 1), direction).unwrap();
        Controller::new(
            event,
            DisplayConfig::default(),
            FixedClock::new(date(2000, 1, 11)),
            Size::new(80, 24),
        )
        .unwrap()
    }

    fn key(ch: char) -> KeyEvent {
        KeyEvent::plain(KeyCode::Char(ch))
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = Event::new("  ", date(2000, 1, 1), Direction::Since).unwrap_err();
        assert_eq!(err, ConfigError::MissingEventName);
    }

    #[test]
    fn first_reading_is_taken_at_construction() {
        let c = controller(Direction::Since);
        assert_eq!(c.result(), CountdownResult::from_days(10));
        assert_eq!(controller(Direction::Until).result().total_days, 0);
    }

    #[test]
    fn tick_reports_changes_only() {
        let mut c = controller(Direction::Since);
        assert!(!c.on_tick());
        c.clock().set(date(2000, 1, 12));
        assert!(c.on_tick());
        assert_eq!(c.result().total_days, 11);
        assert!(!c.on_tick());
    }

    #[test]
    fn quit_is_case_insensitive() {
        for ch in ['q', 'Q'] {
            let mut c = controller(Direction::Since);
            assert_eq!(c.on_key(&key(ch)), Action::Quit);
            assert_eq!(c.state(), State::Stopped);
        }
    }

    #[test]
    fn stopped_controller_no_longer_ticks() {
        let mut c = controller(Direction::Since);
        c.on_key(&key('q'));
        c.clock().set(date(2001, 1, 1));
        assert!(!c.on_tick());
    }

    #[test]
    fn toggles() {
        let mut c = controller(Direction::Since);
        assert!(c.display().show_help);
        assert!(c.display().use_ymd_format);

        c.on_key(&key('h'));
        c.on_key(&key('F'));
        assert!(!c.display().show_help);
        assert!(!c.display().use_ymd_format);

        c.on_key(&key('H'));
        c.on_key(&key('f'));
        assert_eq!(c.display(), DisplayConfig::default());
    }

    #[test]
    fn color_cycles_from_green() {
        let mut c = controller(Direction::Since);
        c.on_key(&key('t'));
        assert_eq!(c.display().palette.color_index, 3);
        c.on_key(&key('T'));
        assert_eq!(c.display().palette.color_index, 4);
        assert_eq!(c.display().palette.background_index, 0);
    }

    #[test]
    fn other_keys_do_nothing() {
        let mut c = controller(Direction::Since);
        let before = c.display();
        for k in [
            key('x'),
            key(' '),
            KeyEvent::plain(KeyCode::Escape),
            KeyEvent::plain(KeyCode::Up),
            KeyEvent::new(KeyCode::Char('c'), Modifiers::CTRL),
            KeyEvent::new(KeyCode::Char('q'), Modifiers::CTRL),
        ] {
            assert_eq!(c.on_key(&k), Action::Continue);
        }
        assert_eq!(c.display(), before);
        assert_eq!(c.state(), State::Running);
    }

    #[test]
    fn alt_does_not_hide_a_key() {
        let mut c = controller(Direction::Since);
        c.on_key(&KeyEvent::new(KeyCode::Char('h'), Modifiers::ALT));
        assert!(!c.display().show_help);
    }

    #[test]
    fn resize_too_small_keeps_running() {
        let mut c = controller(Direction::Since);
        c.on_resize(Size::new(20, 5));
        let mut buf = FrameBuffer::new(20, 5);
        c.paint(&mut buf);
        assert!(buf.row_text(0).starts_with("Launch"));

        c.on_resize(Size::new(100, 30));
        let mut buf = FrameBuffer::new(100, 30);
        c.paint(&mut buf);
        assert!(buf.row_text(0).starts_with("Launch"));
    }

    #[test]
    fn too_small_at_start_is_an_error() {
        let event = Event::new("Launch", date(2000, 1, 1), Direction::Since).unwrap();
        let err = Controller::new(
            event,
            DisplayConfig::default(),
            FixedClock::new(date(2000, 1, 1)),
            Size::new(40, 8),
        )
        .err()
        .unwrap();
        assert!(matches!(err, DayDayError::DisplaySurface(_)));
    }
}
