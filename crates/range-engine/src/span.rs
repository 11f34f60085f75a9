//! Calendar spans used for the picker's maximum selectable span.
//!
//! A [`Span`] is non-negative and calendar-aware: months and years are added
//! as calendar months (clamping to the end of shorter months), days as
//! calendar days, and hours/minutes/seconds as elapsed time.

use std::fmt;

use chrono::{Days, Duration, Months};
use serde::{Deserialize, Serialize};

use crate::date::DateValue;
use crate::error::{RangeError, Result};

/// A non-negative calendar span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SpanRepr")]
pub struct Span {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

/// Accepted JSON forms: `"30d"` or `{"days": 30}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SpanRepr {
    Text(String),
    Parts {
        #[serde(default)]
        years: u32,
        #[serde(default)]
        months: u32,
        #[serde(default)]
        weeks: u32,
        #[serde(default)]
        days: u32,
        #[serde(default)]
        hours: u32,
        #[serde(default)]
        minutes: u32,
        #[serde(default)]
        seconds: u32,
    },
}

impl TryFrom<SpanRepr> for Span {
    type Error = RangeError;

    fn try_from(repr: SpanRepr) -> Result<Self> {
        match repr {
            SpanRepr::Text(s) => Span::parse(&s),
            SpanRepr::Parts {
                years,
                months,
                weeks,
                days,
                hours,
                minutes,
                seconds,
            } => Ok(Span {
                years,
                months,
                weeks,
                days,
                hours,
                minutes,
                seconds,
            }),
        }
    }
}

impl Span {
    pub fn days(days: u32) -> Self {
        Span {
            days,
            ..Default::default()
        }
    }

    pub fn months(months: u32) -> Self {
        Span {
            months,
            ..Default::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Span::default()
    }

    /// Parse a compact span string such as `"30d"`, `"1y6M"` or `"+2w3d"`.
    ///
    /// Units: `y` years, `M` months, `w` weeks, `d` days, `h` hours,
    /// `m` minutes, `s` seconds. A leading `+` is accepted; spans cannot be
    /// negative.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidSpan`] for empty input, a leading `-`,
    /// unknown units, or a number without a unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use range_engine::span::Span;
    ///
    /// let span = Span::parse("1M15d").unwrap();
    /// assert_eq!(span.months, 1);
    /// assert_eq!(span.days, 15);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RangeError::InvalidSpan("empty span".to_string()));
        }

        let rest = match s.as_bytes().first() {
            Some(b'+') => &s[1..],
            Some(b'-') => {
                return Err(RangeError::InvalidSpan(format!(
                    "span cannot be negative: '{s}'"
                )));
            }
            _ => s,
        };

        if rest.is_empty() {
            return Err(RangeError::InvalidSpan(format!(
                "span has no components: '{s}'"
            )));
        }

        let mut span = Span::default();
        let mut num_buf = String::new();

        for ch in rest.chars() {
            if ch.is_ascii_digit() {
                num_buf.push(ch);
                continue;
            }
            if num_buf.is_empty() {
                return Err(RangeError::InvalidSpan(format!(
                    "expected number before '{ch}' in '{s}'"
                )));
            }
            let n: u32 = num_buf
                .parse()
                .map_err(|_| RangeError::InvalidSpan(format!("invalid number in '{s}'")))?;
            num_buf.clear();

            let slot = match ch {
                'y' | 'Y' => &mut span.years,
                'M' => &mut span.months,
                'w' | 'W' => &mut span.weeks,
                'd' | 'D' => &mut span.days,
                'h' | 'H' => &mut span.hours,
                'm' => &mut span.minutes,
                's' | 'S' => &mut span.seconds,
                _ => {
                    return Err(RangeError::InvalidSpan(format!(
                        "unknown unit '{ch}' in '{s}'"
                    )));
                }
            };
            *slot = slot
                .checked_add(n)
                .ok_or_else(|| RangeError::InvalidSpan(format!("component too large in '{s}'")))?;
        }

        if !num_buf.is_empty() {
            return Err(RangeError::InvalidSpan(format!(
                "number without unit at end of '{s}'"
            )));
        }

        Ok(span)
    }

    fn total_months(&self) -> u32 {
        self.years.saturating_mul(12).saturating_add(self.months)
    }

    fn total_days(&self) -> u64 {
        u64::from(self.weeks) * 7 + u64::from(self.days)
    }

    fn total_seconds(&self) -> i64 {
        i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds)
    }
}

impl fmt::Display for Span {
    /// Compact normalized form, e.g. `"1y2M3d"`; a zero span prints as `"0d"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0d");
        }
        let parts = [
            (self.years, "y"),
            (self.months, "M"),
            (self.weeks, "w"),
            (self.days, "d"),
            (self.hours, "h"),
            (self.minutes, "m"),
            (self.seconds, "s"),
        ];
        for (n, unit) in parts {
            if n != 0 {
                write!(f, "{n}{unit}")?;
            }
        }
        Ok(())
    }
}

impl DateValue {
    /// Add a span, returning a new value.
    ///
    /// Elapsed time is applied first, then calendar days, then calendar
    /// months.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::DateOverflow`] if the result leaves chrono's
    /// representable range.
    pub fn add(&self, span: &Span) -> Result<DateValue> {
        let overflow = || RangeError::DateOverflow(format!("{self} + {span}"));

        let dt = self
            .datetime()
            .checked_add_signed(Duration::seconds(span.total_seconds()))
            .ok_or_else(overflow)?;
        let dt = dt
            .checked_add_days(Days::new(span.total_days()))
            .ok_or_else(overflow)?;
        let dt = dt
            .checked_add_months(Months::new(span.total_months()))
            .ok_or_else(overflow)?;

        Ok(DateValue::new(dt))
    }
}
