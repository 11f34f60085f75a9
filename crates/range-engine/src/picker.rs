//! Picker configuration and its per-render resolution.
//!
//! [`PickerOptions`] mirrors every configuration property of the picker
//! with its default. [`resolve`] runs the pipeline once:
//!
//! 1. validate the locale and reject duplicate range labels
//! 2. coerce the value, `min` and `max`
//! 3. widen `max` by `max_span` over the predefined ranges
//! 4. normalize the ranges against `[min, max]`
//! 5. clamp the selection into `[min, max]`
//!
//! No clock is read here: the caller passes `now`, which supplies the
//! default selection and the default year window.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bounds::{clamp_value, widen_max, Bounds};
use crate::date::{coerce, DateInput, DateValue, Granularity};
use crate::error::{RangeError, Result};
use crate::locale::Locale;
use crate::ranges::{chosen_label, ensure_unique_labels, normalize, Dates, NormalizedRange, Range};
use crate::span::Span;

/// Horizontal alignment relative to the attached input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Opens {
    Left,
    #[default]
    Right,
    Center,
}

/// Vertical placement relative to the attached input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Drops {
    #[default]
    Down,
    Up,
}

/// The current selection: a predefined range (with label) or bare dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PickerValue {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub dates: Dates,
}

impl PickerValue {
    pub fn dates(start: Option<DateInput>, end: Option<DateInput>) -> Self {
        PickerValue {
            label: None,
            dates: Dates { start, end },
        }
    }
}

/// Every configuration property of the picker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerOptions {
    /// Current selection; `None` selects `now` for both ends.
    pub value: Option<PickerValue>,
    /// Earliest selectable date.
    pub min: Option<DateInput>,
    /// Latest selectable date.
    pub max: Option<DateInput>,
    /// Longest allowed distance between start and end.
    pub max_span: Option<Span>,
    pub auto_apply: bool,
    pub single_date_picker: bool,
    pub show_dropdowns: bool,
    /// Defaults to 100 years before `now`.
    pub min_year: Option<i32>,
    /// Defaults to 100 years after `now`.
    pub max_year: Option<i32>,
    pub show_week_numbers: bool,
    #[serde(rename = "showISOWeekNumbers")]
    pub show_iso_week_numbers: bool,
    pub show_custom_range_label: bool,
    pub time_picker: bool,
    #[serde(rename = "timePicker24Hour")]
    pub time_picker_24_hour: bool,
    pub time_picker_increment: u32,
    pub time_picker_seconds: bool,
    pub linked_calendars: bool,
    pub auto_update_input: bool,
    pub always_show_calendars: bool,
    pub ranges: Vec<Range>,
    pub opens: Opens,
    pub drops: Drops,
    pub locale: Locale,
    pub button_classes: String,
    pub apply_button_classes: String,
    pub cancel_button_classes: String,
    pub disabled: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        PickerOptions {
            value: None,
            min: None,
            max: None,
            max_span: None,
            auto_apply: false,
            single_date_picker: false,
            show_dropdowns: false,
            min_year: None,
            max_year: None,
            show_week_numbers: false,
            show_iso_week_numbers: false,
            show_custom_range_label: true,
            time_picker: false,
            time_picker_24_hour: true,
            time_picker_increment: 1,
            time_picker_seconds: false,
            linked_calendars: true,
            auto_update_input: true,
            always_show_calendars: false,
            ranges: Vec::new(),
            opens: Opens::Right,
            drops: Drops::Down,
            locale: Locale::default(),
            button_classes: "btn btn-sm".to_string(),
            apply_button_classes: "btn-primary".to_string(),
            cancel_button_classes: "btn-default".to_string(),
            disabled: false,
        }
    }
}

impl PickerOptions {
    /// Parse options from JSON (camelCase keys, every key optional).
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidConfig`] if the JSON is malformed or a
    /// field has the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use range_engine::picker::PickerOptions;
    ///
    /// let options = PickerOptions::from_json(r#"{"timePicker": true, "locale": {"firstDay": 1}}"#).unwrap();
    /// assert!(options.time_picker);
    /// assert_eq!(options.locale.first_day, 1);
    /// assert!(options.show_custom_range_label);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RangeError::InvalidConfig(e.to_string()))
    }
}

/// The picker state derived from one set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPicker {
    pub start_date: Option<DateValue>,
    pub end_date: Option<DateValue>,
    /// `max` is the widened bound.
    pub bounds: Bounds,
    /// Predefined ranges after clipping and filtering, in input order.
    pub ranges: Vec<NormalizedRange>,
    /// Precision used to compare selections against ranges.
    pub granularity: Granularity,
    /// Label of the range that matches the selection, if any.
    pub chosen_label: Option<String>,
    pub min_year: i32,
    pub max_year: i32,
}

/// Resolve `options` into the picker state for one render.
///
/// In single-date mode the end of the selection is set to its start.
///
/// # Errors
///
/// Propagates [`RangeError::InvalidLocale`], [`RangeError::DuplicateLabel`],
/// [`RangeError::InvalidDate`], [`RangeError::DateOverflow`] and
/// [`RangeError::MissingRangeStart`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use range_engine::picker::{resolve, PickerOptions};
///
/// let options = PickerOptions::from_json(r#"{
///     "min": "02/01/2024",
///     "max": "02/28/2024",
///     "ranges": [
///         {"label": "January", "start": "01/01/2024", "end": "01/31/2024"},
///         {"label": "Early Feb", "start": "01/25/2024", "end": "02/07/2024"}
///     ]
/// }"#).unwrap();
/// let now = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
///
/// let resolved = resolve(&options, now).unwrap();
/// assert_eq!(resolved.ranges.len(), 1);
/// assert_eq!(resolved.ranges[0].label, "Early Feb");
/// ```
pub fn resolve(options: &PickerOptions, now: NaiveDateTime) -> Result<ResolvedPicker> {
    let locale = &options.locale;
    locale.validate()?;
    ensure_unique_labels(&options.ranges)?;

    let format = locale.format.as_str();
    let now = DateValue::new(now);

    let (label, start, end) = match &options.value {
        Some(value) => (
            value.label.as_deref(),
            coerce(value.dates.start.as_ref(), format)?,
            coerce(value.dates.end.as_ref(), format)?,
        ),
        None => (None, Some(now), Some(now)),
    };

    let min_date = coerce(options.min.as_ref(), format)?;
    let max_date = coerce(options.max.as_ref(), format)?;
    let max_date = widen_max(&options.ranges, format, options.max_span.as_ref(), max_date)?;

    let ranges = normalize(
        &options.ranges,
        format,
        min_date.as_ref(),
        max_date.as_ref(),
        options.time_picker,
    )?;

    let (start_date, mut end_date) = clamp_value(
        start,
        end,
        min_date.as_ref(),
        max_date.as_ref(),
        options.time_picker,
    );
    if options.single_date_picker {
        end_date = start_date;
    }

    let granularity = Granularity::for_time_picker(options.time_picker);
    let custom_label = options
        .show_custom_range_label
        .then_some(locale.custom_range_label.as_str());
    let chosen_label = chosen_label(
        &ranges,
        label,
        start_date.as_ref(),
        end_date.as_ref(),
        granularity,
        custom_label,
    );

    let year = now.date().year();
    let min_year = options.min_year.unwrap_or(year - 100);
    let max_year = options.max_year.unwrap_or(year + 100);

    debug!(
        ranges_in = options.ranges.len(),
        ranges_out = ranges.len(),
        chosen = ?chosen_label,
        "picker resolved"
    );

    Ok(ResolvedPicker {
        start_date,
        end_date,
        bounds: Bounds {
            min: min_date,
            max: max_date,
        },
        ranges,
        granularity,
        chosen_label,
        min_year,
        max_year,
    })
}
