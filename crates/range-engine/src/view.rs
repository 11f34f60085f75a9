//! Display assembly: the render model handed to the calendar renderer.
//!
//! Nothing here draws. [`assemble`] decides which pieces a renderer should
//! show (range list, calendar panels, time selector, buttons) and with
//! which CSS classes and labels, from the options and the resolved state.

use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::date::DateValue;
use crate::error::Result;
use crate::locale::Direction;
use crate::picker::{resolve, Drops, Opens, PickerOptions, ResolvedPicker};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerView {
    /// Classes for the picker container.
    pub classes: Vec<String>,
    /// Predefined range entries, plus the trailing custom-range entry.
    /// Empty when no predefined range survived normalization.
    pub ranges: Vec<RangeItem>,
    pub calendars: Vec<CalendarPanel>,
    pub header: CalendarHeader,
    /// Present only when time selection is enabled.
    pub time: Option<TimeOptions>,
    /// `None` when auto-apply hides the buttons.
    pub buttons: Option<Buttons>,
    /// The selection as text, e.g. `"02/01/2024 - 02/15/2024"`.
    pub selected: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeItem {
    /// Identity key; equal to the label.
    pub key: String,
    pub label: String,
    pub active: bool,
    /// The trailing "Custom Range" entry.
    pub custom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarPanel {
    pub side: PanelSide,
    pub classes: Vec<String>,
    /// First day of the month this panel shows.
    pub month: Option<NaiveDate>,
    pub show_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarHeader {
    pub direction: Direction,
    /// Day names in column order.
    pub days_of_week: Vec<String>,
    pub month_names: Vec<String>,
    /// Column label for week numbers, when they are shown.
    pub week_label: Option<String>,
    pub iso_weeks: bool,
    /// Inclusive year window for the dropdowns, when they are shown.
    pub year_range: Option<(i32, i32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeOptions {
    pub hour24: bool,
    pub increment: u32,
    pub seconds: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub classes: Vec<String>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Buttons {
    pub cancel: Button,
    pub apply: Button,
}

/// Resolve the options and assemble the view in one step.
///
/// # Errors
///
/// Propagates any error from [`resolve`] or [`assemble`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use range_engine::picker::PickerOptions;
/// use range_engine::view::render;
///
/// let now = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let view = render(&PickerOptions::default(), now).unwrap();
/// assert!(view.classes.contains(&"show-calendar".to_string()));
/// assert_eq!(view.selected, "02/10/2024 - 02/10/2024");
/// ```
pub fn render(options: &PickerOptions, now: NaiveDateTime) -> Result<PickerView> {
    let resolved = resolve(options, now)?;
    assemble(options, &resolved)
}

/// Build the render model from options and their resolved state.
///
/// # Errors
///
/// Returns [`RangeError::InvalidDate`](crate::RangeError::InvalidDate) if the
/// locale format cannot render the selection.
pub fn assemble(options: &PickerOptions, resolved: &ResolvedPicker) -> Result<PickerView> {
    let locale = &options.locale;
    let has_ranges = !resolved.ranges.is_empty();
    let auto_apply = options.auto_apply && !options.time_picker;

    Ok(PickerView {
        classes: container_classes(options, has_ranges, auto_apply),
        ranges: range_items(options, resolved),
        calendars: calendar_panels(options, resolved),
        header: CalendarHeader {
            direction: locale.direction,
            days_of_week: locale.ordered_days(),
            month_names: locale.month_names.clone(),
            week_label: (options.show_week_numbers || options.show_iso_week_numbers)
                .then(|| locale.week_label.clone()),
            iso_weeks: options.show_iso_week_numbers,
            year_range: options
                .show_dropdowns
                .then_some((resolved.min_year, resolved.max_year)),
        },
        time: options.time_picker.then_some(TimeOptions {
            hour24: options.time_picker_24_hour,
            increment: options.time_picker_increment.max(1),
            seconds: options.time_picker_seconds,
        }),
        buttons: (!auto_apply).then(|| buttons(options)),
        selected: selected_text(options, resolved)?,
    })
}

fn container_classes(options: &PickerOptions, has_ranges: bool, auto_apply: bool) -> Vec<String> {
    let opens = match options.opens {
        Opens::Left => "opensleft",
        Opens::Right => "opensright",
        Opens::Center => "openscenter",
    };

    let mut classes = vec![
        "daterangepicker".to_string(),
        options.locale.direction.as_class().to_string(),
        opens.to_string(),
    ];

    let flags = [
        (options.drops == Drops::Up, "drop-up"),
        (auto_apply, "auto-apply"),
        (has_ranges, "show-ranges"),
        (options.single_date_picker, "single"),
        (
            (!has_ranges && !options.single_date_picker) || options.always_show_calendars,
            "show-calendar",
        ),
        (
            options.show_week_numbers || options.show_iso_week_numbers,
            "show-week-numbers",
        ),
    ];
    classes.extend(
        flags
            .into_iter()
            .filter(|(on, _)| *on)
            .map(|(_, class)| class.to_string()),
    );
    classes
}

fn range_items(options: &PickerOptions, resolved: &ResolvedPicker) -> Vec<RangeItem> {
    if resolved.ranges.is_empty() {
        return Vec::new();
    }

    let chosen = resolved.chosen_label.as_deref();
    let mut items: Vec<RangeItem> = resolved
        .ranges
        .iter()
        .map(|r| RangeItem {
            key: r.label.clone(),
            label: r.label.clone(),
            active: chosen == Some(r.label.as_str()),
            custom: false,
        })
        .collect();

    if options.show_custom_range_label {
        let label = &options.locale.custom_range_label;
        let taken = items.iter().any(|item| item.active);
        items.push(RangeItem {
            key: label.clone(),
            label: label.clone(),
            active: !taken && chosen == Some(label.as_str()),
            custom: true,
        });
    }
    items
}

fn calendar_panels(options: &PickerOptions, resolved: &ResolvedPicker) -> Vec<CalendarPanel> {
    let left_month = resolved.start_date.map(|d| d.start_of_month());

    if options.single_date_picker {
        return vec![CalendarPanel {
            side: PanelSide::Left,
            classes: classes(&["drp-calendar", "left", "single"]),
            month: left_month,
            show_time: options.time_picker,
        }];
    }

    let next_month = left_month.and_then(|m| m.checked_add_months(Months::new(1)));
    let right_month = if options.linked_calendars {
        next_month
    } else {
        match resolved.end_date.map(|d| d.start_of_month()) {
            Some(end) if Some(end) != left_month => Some(end),
            _ => next_month,
        }
    };

    vec![
        CalendarPanel {
            side: PanelSide::Left,
            classes: classes(&["drp-calendar", "left"]),
            month: left_month,
            show_time: options.time_picker,
        },
        CalendarPanel {
            side: PanelSide::Right,
            classes: classes(&["drp-calendar", "right"]),
            month: right_month,
            show_time: options.time_picker,
        },
    ]
}

fn buttons(options: &PickerOptions) -> Buttons {
    let build = |base: &str, specific: &str, label: &str, disabled: bool| {
        let mut classes = vec![base.to_string()];
        classes.extend(options.button_classes.split_whitespace().map(String::from));
        classes.extend(specific.split_whitespace().map(String::from));
        Button {
            label: label.to_string(),
            classes,
            disabled,
        }
    };

    Buttons {
        cancel: build(
            "cancelBtn",
            &options.cancel_button_classes,
            &options.locale.cancel_label,
            false,
        ),
        apply: build(
            "applyBtn",
            &options.apply_button_classes,
            &options.locale.apply_label,
            options.disabled,
        ),
    }
}

fn selected_text(options: &PickerOptions, resolved: &ResolvedPicker) -> Result<String> {
    let format = options.locale.format.as_str();
    let render = |d: Option<DateValue>| d.map(|d| d.format(format)).transpose();

    let start = render(resolved.start_date)?;
    if options.single_date_picker {
        return Ok(start.unwrap_or_default());
    }
    let end = render(resolved.end_date)?;

    Ok(match (start, end) {
        (Some(s), Some(e)) => format!("{s}{}{e}", options.locale.separator),
        (Some(s), None) => s,
        (None, Some(e)) => e,
        (None, None) => String::new(),
    })
}

fn classes(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
