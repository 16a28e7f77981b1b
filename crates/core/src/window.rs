//! Sleep window parsing and evaluation.
//!
//! Times of day are accepted in three textual forms and normalized to a minute of
//! the day in `0..1440`:
//! - `HH:MM` (`19:30`, with `24:00` as the only valid 24-hour value)
//! - decimal hours (`19.5`, `0.0..=24.0`, rounded to the nearest minute)
//! - total minutes (`1170`, `0..=1440`)
//!
//! A window may wrap past midnight (`19:30` to `04:30`). A window whose start equals
//! its end is always open.

use crate::config::AutoSleepConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minutes in one in-game day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Reasons a single time value fails to parse.
///
/// The messages are shown to players verbatim, so they name the offending field and
/// the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeParseError {
    /// Blank input.
    #[error("Value is empty. Use HH:MM (e.g., 19:30) or total minutes (0-1440).")]
    Empty,
    /// More or fewer than two `:`-separated parts.
    #[error("Use HH:MM (e.g., 19:30).")]
    MalformedClock,
    /// Hours part is not an integer.
    #[error("Hours must be an integer between 0 and 24.")]
    HoursNotInteger,
    /// Minutes part is not an integer.
    #[error("Minutes must be an integer between 0 and 59.")]
    MinutesNotInteger,
    /// Hours outside `0..=24`.
    #[error("Hours must be between 0 and 24.")]
    HoursOutOfRange,
    /// Minutes outside `0..=59`.
    #[error("Minutes must be between 0 and 59.")]
    MinutesOutOfRange,
    /// `24:xx` with non-zero minutes.
    #[error("24:00 is the only valid 24:xx value.")]
    PastMidnight,
    /// Decimal form that is not a number.
    #[error("Decimal hours must be a number like 19.5.")]
    DecimalNotNumber,
    /// Decimal hours outside `0.0..=24.0` (or not finite).
    #[error("Decimal hours must be between 0.0 and 24.0.")]
    DecimalOutOfRange,
    /// Neither a clock value, a decimal, nor an integer.
    #[error("Use HH:MM (e.g., 19:30) or total minutes (0-1440).")]
    Unrecognized,
    /// Total minutes outside `0..=1440`.
    #[error("Total minutes must be between 0 and 1440.")]
    TotalMinutesOutOfRange,
}

/// Parse a time of day into a minute of the day (`0..1440`).
pub fn parse_time(value: &str) -> Result<u16, TimeParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }

    if trimmed.contains(':') {
        parse_clock(trimmed)
    } else if trimmed.contains('.') {
        parse_decimal_hours(trimmed)
    } else {
        parse_total_minutes(trimmed)
    }
}

fn parse_clock(text: &str) -> Result<u16, TimeParseError> {
    let mut parts = text.split(':');
    let (Some(hours), Some(minutes), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(TimeParseError::MalformedClock);
    };

    let hours = hours
        .trim()
        .parse::<i32>()
        .map_err(|_| TimeParseError::HoursNotInteger)?;
    let minutes = minutes
        .trim()
        .parse::<i32>()
        .map_err(|_| TimeParseError::MinutesNotInteger)?;

    if !(0..=24).contains(&hours) {
        return Err(TimeParseError::HoursOutOfRange);
    }
    if !(0..=59).contains(&minutes) {
        return Err(TimeParseError::MinutesOutOfRange);
    }
    if hours == 24 && minutes != 0 {
        return Err(TimeParseError::PastMidnight);
    }

    Ok(((hours % 24) * 60 + minutes) as u16)
}

fn parse_decimal_hours(text: &str) -> Result<u16, TimeParseError> {
    let hours = text
        .parse::<f64>()
        .map_err(|_| TimeParseError::DecimalNotNumber)?;
    if !(0.0..=24.0).contains(&hours) {
        return Err(TimeParseError::DecimalOutOfRange);
    }

    // f64::round rounds half away from zero.
    let minutes = (hours * 60.0).round() as u16;
    Ok(minutes % MINUTES_PER_DAY)
}

fn parse_total_minutes(text: &str) -> Result<u16, TimeParseError> {
    let minutes = text
        .parse::<i32>()
        .map_err(|_| TimeParseError::Unrecognized)?;
    if !(0..=i32::from(MINUTES_PER_DAY)).contains(&minutes) {
        return Err(TimeParseError::TotalMinutesOutOfRange);
    }
    Ok(minutes as u16 % MINUTES_PER_DAY)
}

/// Returns true when `hour` (fractional hours, `0.0..24.0`) falls inside the window
/// spanning `start_minute..end_minute`.
pub fn is_within_window(start_minute: u16, end_minute: u16, hour: f64) -> bool {
    let start = f64::from(start_minute) / 60.0;
    let end = f64::from(end_minute) / 60.0;

    if start == end {
        return true;
    }

    if start < end {
        return hour >= start && hour < end;
    }

    hour >= start || hour < end
}

/// Which end of the window a [`WindowError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowField {
    /// `sleep_start_time`
    Start,
    /// `sleep_end_time`
    End,
}

impl fmt::Display for WindowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowField::Start => f.write_str("start"),
            WindowField::End => f.write_str("end"),
        }
    }
}

/// A configured window bound failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} time \"{value}\". {source}")]
pub struct WindowError {
    /// Offending bound.
    pub field: WindowField,
    /// Raw configured text.
    pub value: String,
    /// Parse failure for that bound.
    #[source]
    pub source: TimeParseError,
}

/// Parsed sleep window, in minutes of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// First minute inside the window.
    pub start_minute: u16,
    /// First minute after the window.
    pub end_minute: u16,
}

impl TimeWindow {
    /// Create a window from already normalized minutes.
    pub fn new(start_minute: u16, end_minute: u16) -> Self {
        debug_assert!(start_minute < MINUTES_PER_DAY && end_minute < MINUTES_PER_DAY);
        Self {
            start_minute,
            end_minute,
        }
    }

    /// Parse both bounds; the start is validated first.
    pub fn parse(start: &str, end: &str) -> Result<Self, WindowError> {
        let start_minute = parse_time(start).map_err(|source| WindowError {
            field: WindowField::Start,
            value: start.to_string(),
            source,
        })?;
        let end_minute = parse_time(end).map_err(|source| WindowError {
            field: WindowField::End,
            value: end.to_string(),
            source,
        })?;
        Ok(Self::new(start_minute, end_minute))
    }

    /// Parse the window configured in `config`.
    pub fn from_config(config: &AutoSleepConfig) -> Result<Self, WindowError> {
        Self::parse(&config.sleep_start_time, &config.sleep_end_time)
    }

    /// Returns true when `hour` falls inside this window.
    pub fn contains(&self, hour: f64) -> bool {
        is_within_window(self.start_minute, self.end_minute, hour)
    }

    /// Returns true when the window never closes.
    pub fn is_always_open(&self) -> bool {
        self.start_minute == self.end_minute
    }

    /// Returns true when the window crosses midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.start_minute > self.end_minute
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_values() {
        assert_eq!(parse_time("19:30"), Ok(1170));
        assert_eq!(parse_time("04:30"), Ok(270));
        assert_eq!(parse_time("24:00"), Ok(0));
        assert_eq!(parse_time("00:00"), Ok(0));
        assert_eq!(parse_time("  7:05 "), Ok(425));
    }

    #[test]
    fn rejects_bad_clock_values() {
        assert_eq!(parse_time("24:01"), Err(TimeParseError::PastMidnight));
        assert_eq!(parse_time("25:00"), Err(TimeParseError::HoursOutOfRange));
        assert_eq!(parse_time("-1:00"), Err(TimeParseError::HoursOutOfRange));
        assert_eq!(parse_time("12:60"), Err(TimeParseError::MinutesOutOfRange));
        assert_eq!(parse_time("12:30:00"), Err(TimeParseError::MalformedClock));
        assert_eq!(parse_time("ab:30"), Err(TimeParseError::HoursNotInteger));
        assert_eq!(parse_time("12:xx"), Err(TimeParseError::MinutesNotInteger));
        assert_eq!(parse_time(":"), Err(TimeParseError::HoursNotInteger));
    }

    #[test]
    fn parses_decimal_hours() {
        assert_eq!(parse_time("19.5"), Ok(1170));
        assert_eq!(parse_time("24.0"), Ok(0));
        assert_eq!(parse_time("0.0"), Ok(0));
        // 0.0125 h = 0.75 min, rounds up.
        assert_eq!(parse_time("0.0125"), Ok(1));
        assert_eq!(parse_time("25.0"), Err(TimeParseError::DecimalOutOfRange));
        assert_eq!(parse_time("-0.5"), Err(TimeParseError::DecimalOutOfRange));
        assert_eq!(parse_time("1.2.3"), Err(TimeParseError::DecimalNotNumber));
    }

    #[test]
    fn parses_total_minutes() {
        assert_eq!(parse_time("1170"), Ok(1170));
        assert_eq!(parse_time("1440"), Ok(0));
        assert_eq!(parse_time("0"), Ok(0));
        assert_eq!(
            parse_time("1441"),
            Err(TimeParseError::TotalMinutesOutOfRange)
        );
        assert_eq!(parse_time("-5"), Err(TimeParseError::TotalMinutesOutOfRange));
        assert_eq!(parse_time("late"), Err(TimeParseError::Unrecognized));
    }

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(parse_time(""), Err(TimeParseError::Empty));
        assert_eq!(parse_time("   "), Err(TimeParseError::Empty));
    }

    #[test]
    fn overnight_window_membership() {
        for hour in [20.0, 23.99, 0.0, 4.0] {
            assert!(is_within_window(1170, 270, hour), "hour {hour} should be inside");
        }
        for hour in [5.0, 19.0] {
            assert!(!is_within_window(1170, 270, hour), "hour {hour} should be outside");
        }
    }

    #[test]
    fn daytime_window_is_half_open() {
        let window = TimeWindow::new(9 * 60, 17 * 60);
        assert!(window.contains(9.0));
        assert!(window.contains(16.99));
        assert!(!window.contains(17.0));
        assert!(!window.contains(8.99));
        assert!(!window.wraps_midnight());
    }

    #[test]
    fn equal_bounds_are_always_open() {
        let window = TimeWindow::new(600, 600);
        assert!(window.is_always_open());
        for hour in [0.0, 6.0, 10.0, 12.5, 23.9] {
            assert!(window.contains(hour));
        }
    }

    #[test]
    fn window_error_names_the_field() {
        let err = TimeWindow::parse("19:30", "4:75").unwrap_err();
        assert_eq!(err.field, WindowField::End);
        assert_eq!(
            err.to_string(),
            "invalid end time \"4:75\". Minutes must be between 0 and 59."
        );

        // Start is reported first when both bounds are bad.
        let err = TimeWindow::parse("", "nope").unwrap_err();
        assert_eq!(err.field, WindowField::Start);
        assert!(err.to_string().starts_with("invalid start time \"\"."));
    }

    #[test]
    fn default_config_window() {
        let window = TimeWindow::from_config(&AutoSleepConfig::default()).expect("defaults parse");
        assert_eq!(window, TimeWindow::new(1170, 270));
        assert!(window.wraps_midnight());
        assert_eq!(window.to_string(), "19:30-04:30");
    }
}
