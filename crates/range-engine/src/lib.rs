//! # range-engine
//!
//! Deterministic state computation for a date-range picker.
//!
//! The engine takes a picker configuration (bounds, maximum span, current
//! selection, predefined ranges, locale) and computes what the picker shows:
//! the clamped selection, the widened upper bound, the predefined ranges
//! clipped to the permitted window, and a render model for an external
//! calendar renderer. Everything is a pure function of its inputs; the
//! caller supplies "now".
//!
//! ## Modules
//!
//! - [`date`] — DateValue, comparison granularity, raw-input coercion
//! - [`span`] — Calendar spans and date arithmetic
//! - [`bounds`] — Max-date widening and selection clamping
//! - [`ranges`] — Range normalization (clip + filter) and selection matching
//! - [`locale`] — Locale configuration and day-name ordering
//! - [`picker`] — Picker options and per-render resolution
//! - [`view`] — Render model assembly
//! - [`error`] — Error types

pub mod bounds;
pub mod date;
pub mod error;
pub mod locale;
pub mod picker;
pub mod ranges;
pub mod span;
pub mod view;

pub use bounds::{clamp_value, widen_max, Bounds};
pub use date::{classify, coerce, Coerced, DateInput, DateValue, Granularity};
pub use error::RangeError;
pub use locale::{rotate_days, Direction, Locale};
pub use picker::{resolve, Drops, Opens, PickerOptions, PickerValue, ResolvedPicker};
pub use ranges::{chosen_label, ensure_unique_labels, normalize, Dates, NormalizedRange, Range};
pub use span::Span;
pub use view::{assemble, render, PickerView};
