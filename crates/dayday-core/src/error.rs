// SPDX-License-Identifier: MIT
//
// Startup errors. Every variant is fatal: the binary prints it and exits
// before (or instead of) entering the display loop.

use std::io;

use dayday_term::color::UnknownColor;
use dayday_term::panel::PanelError;

/// Bad command-line input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("an event name is required (use -e/--event)")]
    MissingEventName,

    #[error("invalid date '{0}' (expected MM/DD/YYYY or YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("date {month:02}/{day:02}/{year:04} does not exist")]
    DateOutOfRange { year: i32, month: u8, day: u8 },

    #[error(transparent)]
    InvalidColor(#[from] UnknownColor),

    #[error("color '{0}' cannot be the foreground (pick one of red..white or 1-7)")]
    ReservedColor(String),

    #[error("refresh interval must be {min}..={max} seconds, got {got}")]
    InvalidRefresh { got: u64, min: u64, max: u64 },
}

/// Anything that stops tty-dayday from running.
#[derive(Debug, thiserror::Error)]
pub enum DayDayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot lay out the display: {0}")]
    DisplaySurface(#[from] PanelError),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayday_term::buffer::ClipRect;
    use dayday_term::terminal::Size;

    #[test]
    fn config_messages_name_the_problem() {
        let err = ConfigError::InvalidDate("31/31/31".into());
        assert!(err.to_string().contains("'31/31/31'"));

        let err = ConfigError::DateOutOfRange {
            year: 2023,
            month: 2,
            day: 29,
        };
        assert_eq!(err.to_string(), "date 02/29/2023 does not exist");
    }

    #[test]
    fn unknown_color_converts() {
        let err: ConfigError = UnknownColor("teal".into()).into();
        assert!(err.to_string().contains("teal"));
    }

    #[test]
    fn panel_error_becomes_display_surface() {
        let panel_err = dayday_term::panel::Panel::create(ClipRect::new(0, 0, 60, 7), Size::new(40, 10))
            .unwrap_err();
        let err = DayDayError::from(panel_err);
        assert!(matches!(err, DayDayError::DisplaySurface(_)));
        assert!(err.to_string().starts_with("cannot lay out the display"));
    }
}
