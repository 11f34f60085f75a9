//! Predefined ranges and the range normalizer.
//!
//! [`normalize`] turns the user-supplied list of named ranges into the list
//! the picker actually displays: every range is clipped to the permitted
//! `[min, max]` window, and ranges that fall entirely outside it are
//! dropped. Output order matches input order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::{coerce, DateInput, DateValue, Granularity};
use crate::error::{RangeError, Result};

// ── Types ───────────────────────────────────────────────────────────────────

/// A raw, possibly unparsed pair of dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Dates {
    #[serde(default)]
    pub start: Option<DateInput>,
    #[serde(default)]
    pub end: Option<DateInput>,
}

/// A named predefined range. The label doubles as its identity key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Range {
    pub label: String,
    #[serde(flatten)]
    pub dates: Dates,
}

impl Range {
    pub fn new(
        label: impl Into<String>,
        start: Option<DateInput>,
        end: Option<DateInput>,
    ) -> Self {
        Range {
            label: label.into(),
            dates: Dates { start, end },
        }
    }
}

/// A coerced and clipped range, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRange {
    pub label: String,
    pub start: Option<DateValue>,
    pub end: Option<DateValue>,
}

// ── normalize ───────────────────────────────────────────────────────────────

/// Clip predefined ranges to `[min_date, max_date]` and drop the ones that
/// end before `min_date` or start after `max_date`.
///
/// Clipping compares at full precision; the drop test compares at minute
/// precision when `time_picker` is set and at day precision otherwise.
/// With neither bound set every range passes through unchanged.
///
/// # Errors
///
/// Returns [`RangeError::InvalidDate`] if a range date does not match
/// `format`, or [`RangeError::MissingRangeStart`] if `max_date` is set and a
/// range has no start (its position relative to the window is undefined).
///
/// # Examples
///
/// ```
/// use range_engine::date::DateValue;
/// use range_engine::ranges::{normalize, Range};
///
/// let fmt = "%Y-%m-%d";
/// let ranges = vec![Range::new("C", Some("2024-01-01".into()), Some("2024-02-15".into()))];
/// let min = DateValue::parse("2024-02-01", fmt).unwrap();
/// let max = DateValue::parse("2024-02-28", fmt).unwrap();
///
/// let out = normalize(&ranges, fmt, Some(&min), Some(&max), false).unwrap();
/// assert_eq!(out[0].start, Some(min));
/// assert_eq!(out[0].end, Some(DateValue::parse("2024-02-15", fmt).unwrap()));
/// ```
pub fn normalize(
    ranges: &[Range],
    format: &str,
    min_date: Option<&DateValue>,
    max_date: Option<&DateValue>,
    time_picker: bool,
) -> Result<Vec<NormalizedRange>> {
    let granularity = Granularity::for_time_picker(time_picker);

    let clipped = ranges
        .iter()
        .map(|range| clip(range, format, min_date, max_date))
        .collect::<Result<Vec<_>>>()?;

    let mut kept = Vec::with_capacity(clipped.len());
    for range in clipped {
        if is_outside(&range, min_date, max_date, granularity)? {
            debug!(label = %range.label, "range outside permitted window, dropped");
            continue;
        }
        kept.push(range);
    }
    Ok(kept)
}

/// Coerce a range's dates and pull them inside the window.
fn clip(
    range: &Range,
    format: &str,
    min_date: Option<&DateValue>,
    max_date: Option<&DateValue>,
) -> Result<NormalizedRange> {
    let mut start = coerce(range.dates.start.as_ref(), format)?;
    let mut end = coerce(range.dates.end.as_ref(), format)?;

    if let (Some(min), Some(s)) = (min_date, start) {
        if s.is_before(min, Granularity::Exact) {
            start = Some(*min);
        }
    }
    if let (Some(max), Some(e)) = (max_date, end) {
        if e.is_after(max, Granularity::Exact) {
            end = Some(*max);
        }
    }

    Ok(NormalizedRange {
        label: range.label.clone(),
        start,
        end,
    })
}

/// Whether a clipped range lies wholly outside the window.
fn is_outside(
    range: &NormalizedRange,
    min_date: Option<&DateValue>,
    max_date: Option<&DateValue>,
    granularity: Granularity,
) -> Result<bool> {
    if let (Some(min), Some(end)) = (min_date, range.end) {
        if end.is_before(min, granularity) {
            return Ok(true);
        }
    }
    if let Some(max) = max_date {
        let start = range
            .start
            .ok_or_else(|| RangeError::MissingRangeStart(range.label.clone()))?;
        if start.is_after(max, granularity) {
            return Ok(true);
        }
    }
    Ok(false)
}

// ── Labels and selection ────────────────────────────────────────────────────

/// Reject range lists where two entries share a label.
///
/// # Errors
///
/// Returns [`RangeError::DuplicateLabel`] naming the first repeated label.
pub fn ensure_unique_labels(ranges: &[Range]) -> Result<()> {
    let mut seen = HashSet::with_capacity(ranges.len());
    for range in ranges {
        if !seen.insert(range.label.as_str()) {
            return Err(RangeError::DuplicateLabel(range.label.clone()));
        }
    }
    Ok(())
}

/// Pick the label to highlight for the current selection.
///
/// A selection carrying a label matches the displayed range with that
/// label. Otherwise the first displayed range whose start and end equal the
/// selection at `granularity` wins. A range end that is a bare date
/// (midnight) is compared by day, so it still matches a selection whose end
/// was raised to the end of that day. When nothing matches, the
/// custom-range label is returned if one is offered.
pub fn chosen_label(
    ranges: &[NormalizedRange],
    label: Option<&str>,
    start: Option<&DateValue>,
    end: Option<&DateValue>,
    granularity: Granularity,
    custom_label: Option<&str>,
) -> Option<String> {
    let same = |a: Option<DateValue>, b: Option<&DateValue>, g: Granularity| match (a, b) {
        (Some(a), Some(b)) => a.is_same(b, g),
        (None, None) => true,
        _ => false,
    };
    let end_granularity = |end: Option<DateValue>| match end {
        Some(e) if e.is_midnight() => Granularity::Day,
        _ => granularity,
    };

    let matched = match label {
        Some(label) => ranges.iter().find(|r| r.label == label),
        None => ranges
            .iter()
            .find(|r| same(r.start, start, granularity) && same(r.end, end, end_granularity(r.end))),
    };

    matched
        .map(|r| r.label.clone())
        .or_else(|| custom_label.map(str::to_string))
}
