//! # timelex
//!
//! Textual date/time interpretation and formatting.
//!
//! Converts loosely structured time expressions (such as "now",
//! "yesterday", "+5min", "5min ago", "2012-09-22 16:34:22", or "Mon 16:34")
//! into absolute microsecond-resolution [`Timestamp`]s, and renders
//! timestamps back into ISO 8601-style strings under a small flag set.
//!
//! # Design Principle
//!
//! Every entry point is a pure function of its inputs: the reference
//! instant ("now") is an explicit argument everywhere, never an implicit
//! clock read, so every call is deterministic and testable. Calendar
//! arithmetic is delegated to a single normalization primitive rather than
//! reimplemented in the parsers.
//!
//! # Modules
//!
//! - [`duration`] — duration expressions ("5min", "1.5h") to microsecond spans
//! - [`resolve`] — timestamp expressions to absolute instants
//! - [`calendar`] — broken-down time, decomposition, normalization
//! - [`format`] — ISO 8601-style and compact rendering
//! - [`instant`] — the microsecond timestamp type
//! - [`error`] — error types

pub mod calendar;
pub mod duration;
pub mod error;
pub mod format;
pub mod instant;
pub mod resolve;

pub use calendar::{decompose, normalize, BrokenDownTime, Zone};
pub use duration::parse_duration;
pub use error::TimelexError;
pub use format::{
    format_iso, format_short, format_short_in, is_this_year, is_today, write_iso, IsoFlags,
    ShortFlags,
};
pub use instant::Timestamp;
pub use resolve::{parse_timestamp, parse_timestamp_in};
