//! Date values and date coercion.
//!
//! Every date the picker works with passes through [`coerce`]: raw input is
//! either formatted text (parsed strictly against the locale's chrono format
//! pattern) or an already-built [`DateValue`]. Absent input is never an
//! error; it flows through the pipeline as `None` and means "no constraint"
//! or "no value".
//!
//! Unparsable text is rejected at this boundary instead of becoming a value
//! that silently compares false against everything. Callers that want to
//! inspect the outcome without failing can use [`classify`], which returns
//! the tagged [`Coerced`] form.

use std::cmp::Ordering;
use std::fmt;

use chrono::format::{Fixed, Item, Numeric, StrftimeItems};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RangeError, Result};

// ── Granularity ─────────────────────────────────────────────────────────────

/// The precision at which two [`DateValue`]s are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Full precision, down to the nanosecond.
    #[default]
    Exact,
    /// Seconds and below are ignored.
    Minute,
    /// Only the calendar date is compared.
    Day,
}

impl Granularity {
    /// Minute precision when time selection is enabled, day precision otherwise.
    pub fn for_time_picker(time_picker: bool) -> Self {
        if time_picker {
            Granularity::Minute
        } else {
            Granularity::Day
        }
    }
}

// ── DateValue ───────────────────────────────────────────────────────────────

/// A point in (local, zone-less) time.
///
/// `DateValue` is `Copy`: every bound, selection, and range endpoint is an
/// independently owned value, so adjusting one result can never leak into
/// another or into the bounds it was clamped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DateValue(NaiveDateTime);

impl DateValue {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Midnight at the start of `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::default()))
    }

    /// Parse `text` strictly against a chrono format pattern.
    ///
    /// Date-only patterns (e.g. `"%Y-%m-%d"`) yield midnight of that day.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidDate`] if `text` does not match `format`.
    ///
    /// # Examples
    ///
    /// ```
    /// use range_engine::date::DateValue;
    ///
    /// let d = DateValue::parse("02/15/2024", "%m/%d/%Y").unwrap();
    /// assert_eq!(d.to_string(), "2024-02-15 00:00:00");
    /// ```
    pub fn parse(text: &str, format: &str) -> Result<Self> {
        parse_text(text, format).map(Self).map_err(|e| {
            RangeError::InvalidDate(format!("'{text}' does not match format '{format}': {e}"))
        })
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Compare two values after truncating both to `granularity`.
    pub fn compare(&self, other: &DateValue, granularity: Granularity) -> Ordering {
        self.key(granularity).cmp(&other.key(granularity))
    }

    pub fn is_before(&self, other: &DateValue, granularity: Granularity) -> bool {
        self.compare(other, granularity) == Ordering::Less
    }

    pub fn is_after(&self, other: &DateValue, granularity: Granularity) -> bool {
        self.compare(other, granularity) == Ordering::Greater
    }

    pub fn is_same(&self, other: &DateValue, granularity: Granularity) -> bool {
        self.compare(other, granularity) == Ordering::Equal
    }

    /// Whether the value sits exactly on midnight, as bare dates do.
    pub fn is_midnight(&self) -> bool {
        self.0.time() == NaiveTime::default()
    }

    /// 00:00:00.000 on the same day.
    pub fn start_of_day(&self) -> DateValue {
        DateValue::from_date(self.0.date())
    }

    /// 23:59:59.999 on the same day.
    pub fn end_of_day(&self) -> DateValue {
        let end = self.0.date().and_hms_milli_opt(23, 59, 59, 999).unwrap_or(self.0);
        DateValue(end)
    }

    /// First day of the month this value falls in.
    pub fn start_of_month(&self) -> NaiveDate {
        self.0.date().with_day(1).unwrap_or(self.0.date())
    }

    /// Render with a chrono format pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidDate`] if `pattern` contains an unknown specifier.
    pub fn format(&self, pattern: &str) -> Result<String> {
        use std::fmt::Write;

        let mut out = String::new();
        write!(out, "{}", self.0.format(pattern))
            .map_err(|_| RangeError::InvalidDate(format!("invalid format pattern '{pattern}'")))?;
        Ok(out)
    }

    fn key(&self, granularity: Granularity) -> (NaiveDate, u32, u32, u32, u32) {
        let dt = self.0;
        match granularity {
            Granularity::Day => (dt.date(), 0, 0, 0, 0),
            Granularity::Minute => (dt.date(), dt.hour(), dt.minute(), 0, 0),
            Granularity::Exact => (
                dt.date(),
                dt.hour(),
                dt.minute(),
                dt.second(),
                dt.nanosecond(),
            ),
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

// ── Raw input ───────────────────────────────────────────────────────────────

/// A raw date as supplied by configuration: formatted text or a built value.
///
/// Deserializes from a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DateInput {
    Text(String),
    Value(DateValue),
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<DateValue> for DateInput {
    fn from(value: DateValue) -> Self {
        DateInput::Value(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(datetime: NaiveDateTime) -> Self {
        DateInput::Value(DateValue(datetime))
    }
}

// ── Coercion ────────────────────────────────────────────────────────────────

/// Outcome of coercing a raw date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    /// No input was given.
    Absent,
    Valid(DateValue),
    /// Text that does not match the format.
    Invalid { input: String, reason: String },
}

impl Coerced {
    pub fn value(&self) -> Option<DateValue> {
        match self {
            Coerced::Valid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Coerced::Absent)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Coerced::Invalid { .. })
    }

    /// Collapse into the fail-fast form used by the rest of the crate.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidDate`] for [`Coerced::Invalid`].
    pub fn into_result(self) -> Result<Option<DateValue>> {
        match self {
            Coerced::Absent => Ok(None),
            Coerced::Valid(v) => Ok(Some(v)),
            Coerced::Invalid { input, reason } => {
                warn!(input = %input, reason = %reason, "unparsable date");
                Err(RangeError::InvalidDate(format!("'{input}': {reason}")))
            }
        }
    }
}

/// Coerce a raw date into its tagged form without failing.
///
/// Empty text counts as absent. An existing [`DateValue`] is copied as is.
pub fn classify(input: Option<&DateInput>, format: &str) -> Coerced {
    match input {
        None => Coerced::Absent,
        Some(DateInput::Text(text)) if text.is_empty() => Coerced::Absent,
        Some(DateInput::Text(text)) => match parse_text(text, format) {
            Ok(dt) => Coerced::Valid(DateValue(dt)),
            Err(e) => Coerced::Invalid {
                input: text.clone(),
                reason: format!("does not match format '{format}' ({e})"),
            },
        },
        Some(DateInput::Value(value)) => Coerced::Valid(*value),
    }
}

/// Coerce a raw date, returning `None` for absent input.
///
/// # Errors
///
/// Returns [`RangeError::InvalidDate`] if the input is text that does not
/// match `format`. The failure is also logged at `warn` level.
///
/// # Examples
///
/// ```
/// use range_engine::date::{coerce, DateInput};
///
/// assert_eq!(coerce(None, "%Y-%m-%d").unwrap(), None);
///
/// let input = DateInput::from("2024-06-01");
/// let value = coerce(Some(&input), "%Y-%m-%d").unwrap().unwrap();
/// assert_eq!(value.to_string(), "2024-06-01 00:00:00");
///
/// assert!(coerce(Some(&DateInput::from("June 1st")), "%Y-%m-%d").is_err());
/// ```
pub fn coerce(input: Option<&DateInput>, format: &str) -> Result<Option<DateValue>> {
    classify(input, format).into_result()
}

/// Try the pattern as a full datetime first, then as a date at midnight.
///
/// The date-only fallback is taken only for patterns without time fields;
/// otherwise a partially specified time would be dropped silently.
fn parse_text(text: &str, format: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    match NaiveDateTime::parse_from_str(text, format) {
        Ok(dt) => Ok(dt),
        Err(datetime_err) if has_time_fields(format) => Err(datetime_err),
        Err(datetime_err) => NaiveDate::parse_from_str(text, format)
            .map(|d| d.and_time(NaiveTime::default()))
            .map_err(|_| datetime_err),
    }
}

/// Whether a chrono pattern mentions any time-of-day field.
fn has_time_fields(format: &str) -> bool {
    StrftimeItems::new(format).any(|item| {
        matches!(
            item,
            Item::Numeric(
                Numeric::Hour
                    | Numeric::Hour12
                    | Numeric::Minute
                    | Numeric::Second
                    | Numeric::Nanosecond
                    | Numeric::Timestamp,
                _
            ) | Item::Fixed(Fixed::UpperAmPm | Fixed::LowerAmPm | Fixed::Nanosecond)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISO: &str = "%Y-%m-%d";

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateValue {
        DateValue::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap(),
        )
    }

    // ── coercion ────────────────────────────────────────────────────────

    #[test]
    fn test_coerce_absent_input() {
        assert_eq!(coerce(None, ISO).unwrap(), None);
        assert_eq!(coerce(None, "%m/%d/%Y").unwrap(), None);
        assert_eq!(coerce(None, "").unwrap(), None);
    }

    #[test]
    fn test_coerce_empty_text_is_absent() {
        let input = DateInput::from("");
        assert!(classify(Some(&input), ISO).is_absent());
        assert_eq!(coerce(Some(&input), ISO).unwrap(), None);
    }

    #[test]
    fn test_coerce_date_only_format() {
        let input = DateInput::from("2024-01-05");
        let value = coerce(Some(&input), ISO).unwrap().unwrap();
        assert_eq!(value, dt(2024, 1, 5, 0, 0, 0));
    }

    #[test]
    fn test_coerce_datetime_format() {
        let input = DateInput::from("01/05/2024 14:30");
        let value = coerce(Some(&input), "%m/%d/%Y %H:%M").unwrap().unwrap();
        assert_eq!(value, dt(2024, 1, 5, 14, 30, 0));
    }

    #[test]
    fn test_coerce_existing_value_round_trips() {
        let original = dt(2024, 3, 9, 8, 15, 42);
        let input = DateInput::from(original);
        assert_eq!(coerce(Some(&input), ISO).unwrap(), Some(original));
        assert_eq!(coerce(Some(&input), "%m/%d/%Y").unwrap(), Some(original));
    }

    #[test]
    fn test_coerce_formatted_value_round_trips() {
        let original = dt(2024, 3, 9, 0, 0, 0);
        let text = original.format("%m/%d/%Y").unwrap();
        let back = coerce(Some(&DateInput::from(text)), "%m/%d/%Y").unwrap();
        assert_eq!(back, Some(original));
    }

    #[test]
    fn test_coerce_rejects_unparsable_text() {
        let input = DateInput::from("not-a-date");
        let err = coerce(Some(&input), ISO).unwrap_err();
        assert!(matches!(err, RangeError::InvalidDate(_)));
        assert!(err.to_string().contains("not-a-date"), "got: {err}");
    }

    #[test]
    fn test_coerce_rejects_format_mismatch() {
        // Valid date, wrong layout for the configured format.
        let input = DateInput::from("2024-01-05");
        assert!(coerce(Some(&input), "%m/%d/%Y").is_err());
    }

    #[test]
    fn test_coerce_rejects_partial_time() {
        // Hour without minutes: chrono cannot build a time, and the date-only
        // reading would silently yield midnight.
        let err = coerce(Some(&DateInput::from("2024-02-01 15")), "%Y-%m-%d %H").unwrap_err();
        assert!(matches!(err, RangeError::InvalidDate(_)), "got: {err:?}");

        let err = coerce(Some(&DateInput::from("2024-02-01 03 PM")), "%Y-%m-%d %I %p").unwrap_err();
        assert!(matches!(err, RangeError::InvalidDate(_)), "got: {err:?}");
    }

    #[test]
    fn test_coerce_twelve_hour_format_keeps_time() {
        let input = DateInput::from("02/01/2024 03:15 PM");
        let value = coerce(Some(&input), "%m/%d/%Y %I:%M %p").unwrap().unwrap();
        assert_eq!(value, dt(2024, 2, 1, 15, 15, 0));
        assert!(!value.is_midnight());
    }

    #[test]
    fn test_time_field_detection() {
        assert!(has_time_fields("%Y-%m-%d %H"));
        assert!(has_time_fields("%m/%d/%Y %I %p"));
        assert!(has_time_fields("%F %T"));
        assert!(has_time_fields("%R"));
        assert!(!has_time_fields("%Y-%m-%d"));
        assert!(!has_time_fields("%d %b %Y"));
    }

    #[test]
    fn test_classify_reports_invalid_instead_of_sentinel() {
        let input = DateInput::from("13/45/2024");
        match classify(Some(&input), "%m/%d/%Y") {
            Coerced::Invalid { input, reason } => {
                assert_eq!(input, "13/45/2024");
                assert!(reason.contains("%m/%d/%Y"), "got: {reason}");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_valid_value_accessor() {
        let input = DateInput::from("2024-02-29");
        let coerced = classify(Some(&input), ISO);
        assert!(!coerced.is_invalid());
        assert_eq!(coerced.value(), Some(dt(2024, 2, 29, 0, 0, 0)));
    }

    // ── comparisons ─────────────────────────────────────────────────────

    #[test]
    fn test_compare_day_granularity_ignores_time() {
        let morning = dt(2024, 2, 1, 8, 0, 0);
        let evening = dt(2024, 2, 1, 20, 0, 0);
        assert!(morning.is_before(&evening, Granularity::Exact));
        assert!(!morning.is_before(&evening, Granularity::Day));
        assert!(morning.is_same(&evening, Granularity::Day));
    }

    #[test]
    fn test_compare_minute_granularity_ignores_seconds() {
        let a = dt(2024, 2, 1, 8, 30, 5);
        let b = dt(2024, 2, 1, 8, 30, 59);
        assert!(a.is_same(&b, Granularity::Minute));
        assert!(a.is_before(&b, Granularity::Exact));
        let c = dt(2024, 2, 1, 8, 31, 0);
        assert!(c.is_after(&a, Granularity::Minute));
    }

    #[test]
    fn test_granularity_for_time_picker() {
        assert_eq!(Granularity::for_time_picker(true), Granularity::Minute);
        assert_eq!(Granularity::for_time_picker(false), Granularity::Day);
    }

    // ── day boundaries ──────────────────────────────────────────────────

    #[test]
    fn test_start_and_end_of_day() {
        let v = dt(2024, 5, 17, 13, 45, 10);
        assert_eq!(v.start_of_day(), dt(2024, 5, 17, 0, 0, 0));
        let end = v.end_of_day();
        assert_eq!(end.to_string(), "2024-05-17 23:59:59.999");
        // The receiver is untouched.
        assert_eq!(v, dt(2024, 5, 17, 13, 45, 10));
    }

    #[test]
    fn test_start_of_month() {
        let v = dt(2024, 5, 17, 13, 45, 10);
        assert_eq!(v.start_of_month(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_format_invalid_pattern_is_error() {
        let v = dt(2024, 5, 17, 0, 0, 0);
        assert!(v.format("%Q").is_err());
        assert_eq!(v.format("%d.%m.%Y").unwrap(), "17.05.2024");
    }

    #[test]
    fn test_deserialize_input_from_string() {
        let input: DateInput = serde_json::from_str("\"2024-01-01\"").unwrap();
        assert_eq!(input, DateInput::Text("2024-01-01".to_string()));
    }
}
