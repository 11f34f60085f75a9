//! Locale configuration for labels, formats and week layout.
//!
//! A [`Locale`] is always fully populated. When deserialized, missing fields
//! fall back to the English defaults one by one, so a configuration can
//! override just `format` or `firstDay`.

use serde::{Deserialize, Serialize};

use crate::error::{RangeError, Result};

/// Text direction of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_class(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Locale {
    pub direction: Direction,
    /// chrono pattern used to parse and display every date.
    pub format: String,
    /// Placed between start and end in the selected-range text.
    pub separator: String,
    pub apply_label: String,
    pub cancel_label: String,
    pub week_label: String,
    pub custom_range_label: String,
    /// Short day names, Sunday first.
    pub days_of_week: Vec<String>,
    /// Short month names, January first.
    pub month_names: Vec<String>,
    /// Index into `days_of_week` of the first column (0 = Sunday).
    pub first_day: usize,
}

impl Default for Locale {
    fn default() -> Self {
        Locale {
            direction: Direction::Ltr,
            format: "%m/%d/%Y".to_string(),
            separator: " - ".to_string(),
            apply_label: "Apply".to_string(),
            cancel_label: "Cancel".to_string(),
            week_label: "W".to_string(),
            custom_range_label: "Custom Range".to_string(),
            days_of_week: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
                .map(String::from)
                .to_vec(),
            month_names: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]
            .map(String::from)
            .to_vec(),
            first_day: 0,
        }
    }
}

impl Locale {
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidLocale`] unless there are exactly 7 day
    /// names and 12 month names and the format is non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.days_of_week.len() != 7 {
            return Err(RangeError::InvalidLocale(format!(
                "daysOfWeek needs 7 entries, got {}",
                self.days_of_week.len()
            )));
        }
        if self.month_names.len() != 12 {
            return Err(RangeError::InvalidLocale(format!(
                "monthNames needs 12 entries, got {}",
                self.month_names.len()
            )));
        }
        if self.format.is_empty() {
            return Err(RangeError::InvalidLocale("format is empty".to_string()));
        }
        Ok(())
    }

    /// Day names in column order, starting at `first_day`.
    pub fn ordered_days(&self) -> Vec<String> {
        rotate_days(&self.days_of_week, self.first_day)
    }
}

/// Rotate `days` left by `first_day` positions.
///
/// Returns a new sequence; the input is left untouched. `first_day` wraps
/// around the length of `days`.
///
/// # Examples
///
/// ```
/// use range_engine::locale::rotate_days;
///
/// let days: Vec<String> = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"].map(String::from).to_vec();
/// assert_eq!(rotate_days(&days, 1)[0], "Mo");
/// assert_eq!(rotate_days(&days, 1)[6], "Su");
/// ```
pub fn rotate_days(days: &[String], first_day: usize) -> Vec<String> {
    if days.is_empty() {
        return Vec::new();
    }
    let shift = first_day % days.len();
    days[shift..].iter().chain(&days[..shift]).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_valid() {
        let locale = Locale::default();
        assert!(locale.validate().is_ok());
        assert_eq!(locale.ordered_days()[0], "Su");
    }

    #[test]
    fn test_rotate_monday_first() {
        let locale = Locale {
            first_day: 1,
            ..Default::default()
        };
        assert_eq!(
            locale.ordered_days(),
            vec!["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
        );
        // The locale's own list is not reordered.
        assert_eq!(locale.days_of_week[0], "Su");
    }

    #[test]
    fn test_rotate_wraps_around() {
        let days = Locale::default().days_of_week;
        assert_eq!(rotate_days(&days, 7), days);
        assert_eq!(rotate_days(&days, 8), rotate_days(&days, 1));
        assert!(rotate_days(&[], 3).is_empty());
    }

    #[test]
    fn test_validate_rejects_short_lists() {
        let locale = Locale {
            days_of_week: vec!["Mo".to_string()],
            ..Default::default()
        };
        let err = locale.validate().unwrap_err().to_string();
        assert!(err.contains("daysOfWeek"), "got: {err}");

        let locale = Locale {
            month_names: Vec::new(),
            ..Default::default()
        };
        assert!(locale.validate().is_err());
    }

    #[test]
    fn test_partial_locale_merges_over_defaults() {
        let locale: Locale =
            serde_json::from_str(r#"{"format": "%d.%m.%Y", "firstDay": 1, "direction": "rtl"}"#)
                .unwrap();
        assert_eq!(locale.format, "%d.%m.%Y");
        assert_eq!(locale.first_day, 1);
        assert_eq!(locale.direction, Direction::Rtl);
        assert_eq!(locale.apply_label, "Apply");
        assert_eq!(locale.custom_range_label, "Custom Range");
    }
}
