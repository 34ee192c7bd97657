//! Timestamp expression resolution.
//!
//! Converts expressions like "now", "yesterday", "+5min", "5min ago",
//! "2012-09-22 16:34:22", or "Mon 16:34" into absolute [`Timestamp`]s.
//! The reference instant is always an explicit argument; nothing here reads
//! the system clock, so every call is a pure function of `(text, now, zone)`.

use std::time::Duration;

use chrono::Weekday;

use crate::calendar::{decompose, normalize, BrokenDownTime, Zone};
use crate::duration::parse_duration;
use crate::error::{Result, TimelexError};
use crate::instant::Timestamp;

// ── Tables and grammars ─────────────────────────────────────────────────────

/// Weekday names recognized as a leading qualifier.
///
/// Scanned in order with a case-insensitive prefix test, so each full name
/// must precede the abbreviation it starts with.
const WEEKDAYS: &[(&str, Weekday)] = &[
    ("Sunday", Weekday::Sun),
    ("Sun", Weekday::Sun),
    ("Monday", Weekday::Mon),
    ("Mon", Weekday::Mon),
    ("Tuesday", Weekday::Tue),
    ("Tue", Weekday::Tue),
    ("Wednesday", Weekday::Wed),
    ("Wed", Weekday::Wed),
    ("Thursday", Weekday::Thu),
    ("Thu", Weekday::Thu),
    ("Friday", Weekday::Fri),
    ("Fri", Weekday::Fri),
    ("Saturday", Weekday::Sat),
    ("Sat", Weekday::Sat),
];

/// One absolute-date pattern. Each variant describes which calendar fields
/// it sets; everything else stays at the seed.
#[derive(Debug, Clone, Copy)]
enum Grammar {
    /// `[yy]yy-mm-dd HH:MM[:SS]`
    DateTime { four_digit_year: bool, with_seconds: bool },
    /// `[yy]yy-mm-dd`, clock reset to midnight
    Date { four_digit_year: bool },
    /// `HH:MM[:SS]` on the seed's date
    Time { with_seconds: bool },
    /// `yyyymmddHHMMSS`; the seconds digits are validated but the result is
    /// minute resolution
    Compact,
}

/// Match priority: two-digit years before four-digit, datetime before
/// date-only before time-only, the compact form last.
const GRAMMARS: &[Grammar] = &[
    Grammar::DateTime { four_digit_year: false, with_seconds: true },
    Grammar::DateTime { four_digit_year: true, with_seconds: true },
    Grammar::DateTime { four_digit_year: false, with_seconds: false },
    Grammar::DateTime { four_digit_year: true, with_seconds: false },
    Grammar::Date { four_digit_year: false },
    Grammar::Date { four_digit_year: true },
    Grammar::Time { with_seconds: true },
    Grammar::Time { with_seconds: false },
    Grammar::Compact,
];

// ── parse_timestamp ─────────────────────────────────────────────────────────

/// Resolve a timestamp expression against `now` in the local timezone.
///
/// # Supported Expressions
///
/// - `2012-09-22 16:34:22` (also with a two-digit year)
/// - `2012-09-22 16:34` — seconds set to 0
/// - `2012-09-22` — time set to 00:00:00
/// - `16:34:22` / `16:34` — date taken from `now`
/// - `20120922163422` — compact form, minute resolution
/// - `now`, `today`, `yesterday`, `tomorrow`
/// - `+5min`, `-2days`, `30min ago`
/// - any absolute form prefixed by a weekday name and a space
///   (`Mon 16:34`), which must agree with the resolved date
///
/// # Errors
///
/// Relative forms propagate [`parse_duration`] errors. An expression no
/// grammar accepts is [`TimelexError::UnknownFormat`]; a date the calendar
/// rejects is [`TimelexError::Calendar`]; a weekday qualifier that
/// disagrees with the resolved date is [`TimelexError::WeekdayMismatch`].
pub fn parse_timestamp(text: &str, now: Timestamp) -> Result<Timestamp> {
    parse_timestamp_in(text, now, Zone::Local)
}

/// Resolve a timestamp expression with an explicit zone.
///
/// Same contract as [`parse_timestamp`]; passing [`Zone::Utc`] keeps the
/// result independent of the process environment, which is what tests want.
pub fn parse_timestamp_in(text: &str, now: Timestamp, zone: Zone) -> Result<Timestamp> {
    let seed = decompose(now, zone)?;

    match text {
        "now" => return finish(&seed, zone, None, Duration::ZERO, Duration::ZERO),
        "today" => {
            let mut bd = seed;
            bd.clear_time();
            return finish(&bd, zone, None, Duration::ZERO, Duration::ZERO);
        }
        "yesterday" => {
            let mut bd = seed;
            bd.day -= 1;
            bd.clear_time();
            return finish(&bd, zone, None, Duration::ZERO, Duration::ZERO);
        }
        "tomorrow" => {
            let mut bd = seed;
            bd.day += 1;
            bd.clear_time();
            return finish(&bd, zone, None, Duration::ZERO, Duration::ZERO);
        }
        _ => {}
    }

    if let Some(rest) = text.strip_prefix('+') {
        let plus = parse_duration(rest)?;
        return finish(&seed, zone, None, plus, Duration::ZERO);
    }
    if let Some(rest) = text.strip_prefix('-') {
        let minus = parse_duration(rest)?;
        return finish(&seed, zone, None, Duration::ZERO, minus);
    }
    if let Some(rest) = text.strip_suffix(" ago") {
        let minus = parse_duration(rest)?;
        return finish(&seed, zone, None, Duration::ZERO, minus);
    }

    let (weekday, rest) = split_weekday_prefix(text);

    for &grammar in GRAMMARS {
        if let Some(bd) = try_grammar(rest, &seed, grammar) {
            return finish(&bd, zone, weekday, Duration::ZERO, Duration::ZERO);
        }
    }

    Err(TimelexError::UnknownFormat(format!("'{text}'")))
}

/// Normalize, check the weekday expectation, then apply the offsets.
fn finish(
    bd: &BrokenDownTime,
    zone: Zone,
    expected_weekday: Option<Weekday>,
    plus: Duration,
    minus: Duration,
) -> Result<Timestamp> {
    let ts = normalize(bd, zone)?;

    if let Some(expected) = expected_weekday {
        let actual = decompose(ts, zone)?.weekday;
        if actual != expected {
            return Err(TimelexError::WeekdayMismatch { expected, actual });
        }
    }

    let ts = ts.checked_add(plus).ok_or_else(|| {
        TimelexError::OutOfRange("offset overflows the timestamp range".into())
    })?;
    Ok(ts.saturating_sub(minus))
}

/// Match a leading weekday qualifier ("Mon ", "saturday ").
///
/// Returns the expected weekday and the text after the name and its
/// following space; without a match, the input comes back untouched.
fn split_weekday_prefix(text: &str) -> (Option<Weekday>, &str) {
    for &(name, weekday) in WEEKDAYS {
        let Some((head, tail)) = text.split_at_checked(name.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(name) {
            continue;
        }
        if let Some(rest) = tail.strip_prefix(' ') {
            return (Some(weekday), rest);
        }
    }
    (None, text)
}

// ── Grammar scanning ────────────────────────────────────────────────────────

/// Try one grammar against `text`, starting fresh from the seed. `None`
/// unless the pattern consumes the entire input.
fn try_grammar(text: &str, seed: &BrokenDownTime, grammar: Grammar) -> Option<BrokenDownTime> {
    let mut cur = Cursor::new(text);
    let mut bd = seed.clone();

    match grammar {
        Grammar::DateTime { four_digit_year, with_seconds } => {
            scan_date(&mut cur, &mut bd, four_digit_year)?;
            cur.literal(' ')?;
            scan_time(&mut cur, &mut bd, with_seconds)?;
        }
        Grammar::Date { four_digit_year } => {
            scan_date(&mut cur, &mut bd, four_digit_year)?;
            bd.clear_time();
        }
        Grammar::Time { with_seconds } => {
            scan_time(&mut cur, &mut bd, with_seconds)?;
        }
        Grammar::Compact => {
            bd.year = cur.exact(4, 0, 9999)? as i32;
            bd.month = cur.exact(2, 1, 12)?;
            bd.day = i64::from(cur.exact(2, 1, 31)?);
            bd.hour = cur.exact(2, 0, 23)?;
            bd.minute = cur.exact(2, 0, 59)?;
            cur.exact(2, 0, 60)?;
            bd.second = 0;
        }
    }

    if cur.at_end() {
        Some(bd)
    } else {
        None
    }
}

fn scan_date(cur: &mut Cursor<'_>, bd: &mut BrokenDownTime, four_digit_year: bool) -> Option<()> {
    bd.year = if four_digit_year {
        cur.field(4, 0, 9999)? as i32
    } else {
        resolve_two_digit_year(cur.field(2, 0, 99)?)
    };
    cur.literal('-')?;
    bd.month = cur.field(2, 1, 12)?;
    cur.literal('-')?;
    bd.day = i64::from(cur.field(2, 1, 31)?);
    Some(())
}

fn scan_time(cur: &mut Cursor<'_>, bd: &mut BrokenDownTime, with_seconds: bool) -> Option<()> {
    bd.hour = cur.field(2, 0, 23)?;
    cur.literal(':')?;
    bd.minute = cur.field(2, 0, 59)?;
    bd.second = if with_seconds {
        cur.literal(':')?;
        cur.field(2, 0, 60)?
    } else {
        0
    };
    Some(())
}

/// POSIX two-digit years: 69-99 are the 1900s, 00-68 the 2000s.
fn resolve_two_digit_year(y: u32) -> i32 {
    if y >= 69 {
        1900 + y as i32
    } else {
        2000 + y as i32
    }
}

/// Minimal scanner for the fixed date grammars.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor { rest: text }
    }

    /// Consume 1 to `max` digits and range-check the value.
    fn field(&mut self, max: usize, lo: u32, hi: u32) -> Option<u32> {
        self.digits(self.leading_digits(max), lo, hi)
    }

    /// Consume exactly `width` digits and range-check the value.
    fn exact(&mut self, width: usize, lo: u32, hi: u32) -> Option<u32> {
        if self.leading_digits(width) != width {
            return None;
        }
        self.digits(width, lo, hi)
    }

    fn leading_digits(&self, max: usize) -> usize {
        self.rest.bytes().take(max).take_while(u8::is_ascii_digit).count()
    }

    fn digits(&mut self, count: usize, lo: u32, hi: u32) -> Option<u32> {
        if count == 0 {
            return None;
        }
        let value: u32 = self.rest[..count].parse().ok()?;
        if value < lo || value > hi {
            return None;
        }
        self.rest = &self.rest[count..];
        Some(value)
    }

    fn literal(&mut self, c: char) -> Option<()> {
        self.rest = self.rest.strip_prefix(c)?;
        Some(())
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
