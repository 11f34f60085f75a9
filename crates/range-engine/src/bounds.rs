//! Bound widening and selection clamping.
//!
//! - [`widen_max`] — raise the maximum date so every predefined range can
//!   extend by the maximum span
//! - [`clamp_value`] — pull the current selection inside `[min, max]`

use serde::Serialize;
use tracing::debug;

use crate::date::{coerce, DateValue, Granularity};
use crate::error::Result;
use crate::ranges::Range;
use crate::span::Span;

/// The selectable window. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub min: Option<DateValue>,
    pub max: Option<DateValue>,
}

/// Widen `max_date` so that `range.start + max_span` fits for every range.
///
/// Nothing happens unless both `max_span` and `max_date` are set. Ranges
/// without a start are skipped. Each candidate is compared against the
/// bound as widened so far, so the result is the largest of the original
/// bound and every `start + max_span`; it never shrinks.
///
/// # Errors
///
/// Returns [`RangeError::InvalidDate`](crate::RangeError::InvalidDate) if a
/// range start does not match `format`, or
/// [`RangeError::DateOverflow`](crate::RangeError::DateOverflow) if adding
/// the span overflows.
///
/// # Examples
///
/// ```
/// use range_engine::bounds::widen_max;
/// use range_engine::date::DateValue;
/// use range_engine::ranges::Range;
/// use range_engine::span::Span;
///
/// let fmt = "%Y-%m-%d";
/// let ranges = vec![Range::new("Q", Some("2024-06-01".into()), None)];
/// let max = DateValue::parse("2024-06-15", fmt).unwrap();
///
/// let widened = widen_max(&ranges, fmt, Some(&Span::days(30)), Some(max)).unwrap();
/// assert_eq!(widened, Some(DateValue::parse("2024-07-01", fmt).unwrap()));
/// ```
pub fn widen_max(
    ranges: &[Range],
    format: &str,
    max_span: Option<&Span>,
    max_date: Option<DateValue>,
) -> Result<Option<DateValue>> {
    let (Some(span), Some(mut max)) = (max_span, max_date) else {
        return Ok(max_date);
    };

    for range in ranges {
        let Some(start) = coerce(range.dates.start.as_ref(), format)? else {
            continue;
        };
        let reach = start.add(span)?;
        if reach.is_after(&max, Granularity::Exact) {
            debug!(label = %range.label, from = %max, to = %reach, "widening max date");
            max = reach;
        }
    }

    Ok(Some(max))
}

/// Clamp the selected start and end into `[min_date, max_date]`.
///
/// With `time_picker` set, the start is first floored to the start of its
/// day and the end ceiled to the end of its day. Each side is clamped on
/// its own: an end before the start is left as is.
pub fn clamp_value(
    start: Option<DateValue>,
    end: Option<DateValue>,
    min_date: Option<&DateValue>,
    max_date: Option<&DateValue>,
    time_picker: bool,
) -> (Option<DateValue>, Option<DateValue>) {
    let mut start = start;
    let mut end = end;

    if time_picker {
        start = start.map(|s| s.start_of_day());
        end = end.map(|e| e.end_of_day());
    }

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

    (start, end)
}
