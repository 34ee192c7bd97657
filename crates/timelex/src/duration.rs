//! Duration expressions: "5min", "1.5h", "3 days 4 hours".
//!
//! A duration expression is a sequence of `<number>[.<fraction>]<unit>`
//! terms, optionally separated by whitespace, summed into a single
//! microsecond-resolution [`Duration`]. There is no sign: a duration is a
//! magnitude, and the caller decides which direction it points (see
//! [`crate::resolve::parse_timestamp`]).

use std::time::Duration;

use crate::error::{Result, TimelexError};

pub const USEC_PER_SEC: u64 = 1_000_000;
pub const USEC_PER_MSEC: u64 = 1_000;
pub const USEC_PER_MINUTE: u64 = 60 * USEC_PER_SEC;
pub const USEC_PER_HOUR: u64 = 60 * USEC_PER_MINUTE;
pub const USEC_PER_DAY: u64 = 24 * USEC_PER_HOUR;
pub const USEC_PER_WEEK: u64 = 7 * USEC_PER_DAY;
/// Mean Gregorian month: 30.4375 days.
pub const USEC_PER_MONTH: u64 = 2_629_800 * USEC_PER_SEC;
/// Julian year: 365.25 days.
pub const USEC_PER_YEAR: u64 = 31_557_600 * USEC_PER_SEC;

/// Recognized unit suffixes, in match priority order.
///
/// Matching is a literal prefix test tried top to bottom, so an entry that
/// is a textual prefix of another must come after the longer forms it would
/// shadow: "s" after "sec"/"seconds", "m" after "min"/"ms"/"months". The
/// empty suffix maps a bare number to seconds and must stay last.
const UNIT_TABLE: &[(&str, u64)] = &[
    ("seconds", USEC_PER_SEC),
    ("second", USEC_PER_SEC),
    ("sec", USEC_PER_SEC),
    ("s", USEC_PER_SEC),
    ("minutes", USEC_PER_MINUTE),
    ("minute", USEC_PER_MINUTE),
    ("min", USEC_PER_MINUTE),
    ("months", USEC_PER_MONTH),
    ("month", USEC_PER_MONTH),
    ("msec", USEC_PER_MSEC),
    ("ms", USEC_PER_MSEC),
    ("m", USEC_PER_MINUTE),
    ("hours", USEC_PER_HOUR),
    ("hour", USEC_PER_HOUR),
    ("hr", USEC_PER_HOUR),
    ("h", USEC_PER_HOUR),
    ("days", USEC_PER_DAY),
    ("day", USEC_PER_DAY),
    ("d", USEC_PER_DAY),
    ("weeks", USEC_PER_WEEK),
    ("week", USEC_PER_WEEK),
    ("w", USEC_PER_WEEK),
    ("years", USEC_PER_YEAR),
    ("year", USEC_PER_YEAR),
    ("y", USEC_PER_YEAR),
    ("usec", 1),
    ("us", 1),
    ("", USEC_PER_SEC),
];

/// Parse a duration expression into a microsecond-resolution [`Duration`].
///
/// # Grammar
///
/// One or more `<number>[.<fraction>]<unit>` terms, each optionally
/// preceded by whitespace; the terms are summed. A bare number counts as
/// seconds. Whitespace between a number and its unit is allowed
/// (`"3 days"`).
///
/// # Errors
///
/// - [`TimelexError::InvalidSyntax`] — empty input, a missing number, or a
///   `.` with no fractional digits.
/// - [`TimelexError::OutOfRange`] — a leading `-`, or any value that
///   overflows the microsecond accumulator.
/// - [`TimelexError::UnknownUnit`] — a suffix not in the unit table.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use timelex::parse_duration;
///
/// assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("1m 30s").unwrap(), Duration::from_secs(90));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration> {
    let mut rest = text;
    let mut total: u64 = 0;
    let mut seen_term = false;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            if !seen_term {
                return Err(TimelexError::InvalidSyntax(format!(
                    "no duration terms in '{text}'"
                )));
            }
            break;
        }

        let (whole, _, after) = take_number(rest)?;
        let (frac, frac_digits, after) = match after.strip_prefix('.') {
            Some(tail) => {
                let (frac, digits, tail) = take_number(tail)?;
                (frac, digits, tail)
            }
            None => (0, 0, after),
        };

        let after = after.trim_start();

        let matched = UNIT_TABLE.iter().find(|&&(suffix, _)| {
            if suffix.is_empty() {
                // Bare number: seconds. Only stands when the next thing is
                // another term or the end, so an unknown suffix still fails.
                after.is_empty() || after.starts_with(|c: char| c.is_ascii_digit())
            } else {
                after.starts_with(suffix)
            }
        });
        let Some(&(suffix, unit)) = matched else {
            return Err(TimelexError::UnknownUnit(format!("'{after}'")));
        };

        let overflow = || TimelexError::OutOfRange(format!("duration overflows: '{text}'"));

        // The fractional digit count is the divisor: 1.5h = 1h + 5h/10.
        let mut frac_usec = frac.checked_mul(unit).ok_or_else(overflow)?;
        for _ in 0..frac_digits {
            frac_usec /= 10;
        }

        let term = whole
            .checked_mul(unit)
            .and_then(|t| t.checked_add(frac_usec))
            .ok_or_else(overflow)?;
        total = total.checked_add(term).ok_or_else(overflow)?;

        rest = &after[suffix.len()..];
        seen_term = true;
    }

    Ok(Duration::from_micros(total))
}

/// Consume a run of ASCII digits, returning the value, the digit count, and
/// the remaining text.
fn take_number(s: &str) -> Result<(u64, usize, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        if s.starts_with('-') && s[1..].starts_with(|c: char| c.is_ascii_digit()) {
            return Err(TimelexError::OutOfRange(format!(
                "negative value in duration: '{s}'"
            )));
        }
        return Err(TimelexError::InvalidSyntax(format!(
            "expected a number: '{s}'"
        )));
    }

    let mut value: u64 = 0;
    for b in s[..end].bytes() {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or_else(|| TimelexError::OutOfRange(format!("number too large: '{s}'")))?;
    }
    Ok((value, end, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usec(text: &str) -> u64 {
        parse_duration(text).unwrap().as_micros() as u64
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(usec("1.5h"), 5_400_000_000);
    }

    #[test]
    fn test_plain_seconds() {
        assert_eq!(usec("90s"), 90_000_000);
    }

    #[test]
    fn test_terms_are_summed() {
        assert_eq!(usec("1m 30s"), 90_000_000);
        assert_eq!(usec("3 days 4 hours"), (3 * 86_400 + 4 * 3_600) * 1_000_000);
    }

    #[test]
    fn test_bare_number_is_seconds() {
        assert_eq!(usec("5"), 5_000_000);
    }

    #[test]
    fn test_sub_second_units() {
        assert_eq!(usec("250ms"), 250_000);
        assert_eq!(usec("10us"), 10);
        assert_eq!(usec("10usec"), 10);
    }

    #[test]
    fn test_long_span_units() {
        assert_eq!(usec("1w"), 7 * 86_400 * 1_000_000);
        assert_eq!(usec("1month"), 2_629_800 * 1_000_000);
        assert_eq!(usec("2years"), 2 * 31_557_600 * 1_000_000);
    }

    #[test]
    fn test_minute_vs_month_vs_msec_priority() {
        // "m" alone is minutes; the longer forms take their own meanings.
        assert_eq!(usec("1m"), 60_000_000);
        assert_eq!(usec("1ms"), 1_000);
        assert_eq!(usec("1months"), 2_629_800 * 1_000_000);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        assert!(matches!(
            parse_duration(""),
            Err(TimelexError::InvalidSyntax(_))
        ));
        assert!(matches!(
            parse_duration("   "),
            Err(TimelexError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_leading_minus_is_out_of_range() {
        assert!(matches!(
            parse_duration("-5s"),
            Err(TimelexError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_leading_plus_is_invalid() {
        assert!(matches!(
            parse_duration("+5s"),
            Err(TimelexError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_dot_without_digits_is_invalid() {
        assert!(matches!(
            parse_duration("1.s"),
            Err(TimelexError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_fraction_without_leading_number_is_invalid() {
        assert!(matches!(
            parse_duration(".5s"),
            Err(TimelexError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_unknown_suffix_is_rejected() {
        assert!(matches!(
            parse_duration("5xyz"),
            Err(TimelexError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_overflow_is_detected_not_wrapped() {
        // More digits than u64 can hold.
        assert!(matches!(
            parse_duration("99999999999999999999s"),
            Err(TimelexError::OutOfRange(_))
        ));
        // Fits as an integer but overflows when scaled to microseconds.
        assert!(matches!(
            parse_duration("1000000000000000y"),
            Err(TimelexError::OutOfRange(_))
        ));
    }
}
