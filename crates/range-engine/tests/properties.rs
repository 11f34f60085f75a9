//! Property tests for coercion, widening, clamping and normalization.

use chrono::NaiveDate;
use proptest::prelude::*;
use range_engine::{
    clamp_value, coerce, normalize, rotate_days, widen_max, DateInput, DateValue, Range, Span,
};

const ISO: &str = "%Y-%m-%d";

/// Days since 2000-01-01, kept within a few decades.
fn day_offset() -> impl Strategy<Value = i64> {
    0i64..15_000
}

fn to_day(offset: i64) -> DateValue {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    DateValue::from_date(base + chrono::Duration::days(offset))
}

fn to_text(offset: i64) -> String {
    to_day(offset).format(ISO).unwrap()
}

fn ranges_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((day_offset(), 0i64..400), 0..12)
}

fn build_ranges(pairs: &[(i64, i64)]) -> Vec<Range> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (start, len))| {
            Range::new(
                format!("range-{i}"),
                Some(DateInput::from(to_text(*start))),
                Some(DateInput::from(to_text(start + len))),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_coerce_absent_for_any_format(format in "[%a-zA-Z/ .:-]{0,12}") {
        prop_assert_eq!(coerce(None, &format).unwrap(), None);
    }

    #[test]
    fn prop_coerce_value_round_trips(offset in day_offset(), minutes in 0u32..1440) {
        let value = DateValue::new(
            to_day(offset).date().and_hms_opt(minutes / 60, minutes % 60, 0).unwrap(),
        );
        let input = DateInput::from(value);
        prop_assert_eq!(coerce(Some(&input), ISO).unwrap(), Some(value));
    }

    #[test]
    fn prop_widen_max_never_shrinks(
        pairs in ranges_strategy(),
        span_days in 0u32..400,
        max in day_offset(),
    ) {
        let ranges = build_ranges(&pairs);
        let max = to_day(max);
        let widened = widen_max(&ranges, ISO, Some(&Span::days(span_days)), Some(max))
            .unwrap()
            .unwrap();
        prop_assert!(widened >= max);

        let furthest = pairs
            .iter()
            .map(|(start, _)| to_day(*start).add(&Span::days(span_days)).unwrap())
            .fold(max, |acc, reach| acc.max(reach));
        prop_assert_eq!(widened, furthest);
    }

    #[test]
    fn prop_clamp_in_bounds_is_noop(
        min in day_offset(),
        a in 0i64..500,
        b in 0i64..500,
        c in 0i64..500,
    ) {
        let start = to_day(min + a);
        let end = to_day(min + a + b);
        let min_date = to_day(min);
        let max_date = to_day(min + a + b + c);
        let (s, e) = clamp_value(Some(start), Some(end), Some(&min_date), Some(&max_date), false);
        prop_assert_eq!(s, Some(start));
        prop_assert_eq!(e, Some(end));
    }

    #[test]
    fn prop_normalize_without_bounds_is_identity(pairs in ranges_strategy()) {
        let ranges = build_ranges(&pairs);
        let out = normalize(&ranges, ISO, None, None, false).unwrap();
        prop_assert_eq!(out.len(), ranges.len());
        for (normalized, (start, len)) in out.iter().zip(&pairs) {
            prop_assert_eq!(normalized.start, Some(to_day(*start)));
            prop_assert_eq!(normalized.end, Some(to_day(start + len)));
        }
    }

    #[test]
    fn prop_normalize_output_stays_in_window(
        pairs in ranges_strategy(),
        min in day_offset(),
        width in 0i64..2_000,
        time_picker in any::<bool>(),
    ) {
        let ranges = build_ranges(&pairs);
        let min_date = to_day(min);
        let max_date = to_day(min + width);
        let out = normalize(&ranges, ISO, Some(&min_date), Some(&max_date), time_picker).unwrap();

        let mut labels = ranges.iter().map(|r| r.label.as_str());
        for range in &out {
            let start = range.start.unwrap();
            let end = range.end.unwrap();
            prop_assert!(start >= min_date && start <= max_date);
            prop_assert!(end >= min_date && end <= max_date);
            // Survivors keep their relative order.
            prop_assert!(labels.any(|l| l == range.label));
        }
    }

    #[test]
    fn prop_rotate_days_is_permutation(first_day in 0usize..30) {
        let days: Vec<String> = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"].map(String::from).to_vec();
        let rotated = rotate_days(&days, first_day);
        prop_assert_eq!(rotated.len(), 7);
        prop_assert_eq!(&rotated[0], &days[first_day % 7]);
        let mut sorted = rotated.clone();
        sorted.sort();
        let mut expected = days.clone();
        expected.sort();
        prop_assert_eq!(sorted, expected);
    }
}
