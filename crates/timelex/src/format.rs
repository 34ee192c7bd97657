//! Rendering instants as ISO 8601-style and compact strings.

use std::fmt::{self, Write};

use crate::calendar::{decompose, BrokenDownTime, Zone};
use crate::duration::USEC_PER_DAY;
use crate::error::{Result, TimelexError};
use crate::instant::Timestamp;

/// Output selection for [`write_iso`] / [`format_iso`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsoFlags {
    /// Include the calendar date.
    pub date: bool,
    /// Include the clock time.
    pub time: bool,
    /// Append the microsecond fraction with a `.` separator.
    pub dot_usec: bool,
    /// Append the microsecond fraction with a `,` separator.
    pub comma_usec: bool,
    /// Append the numeric UTC offset.
    pub timezone: bool,
    /// Separate date and time with a space instead of `T`.
    pub space_separator: bool,
    /// Decompose in UTC instead of local time.
    pub utc: bool,
}

/// Render broken-down fields plus a microsecond fraction into `w`.
///
/// A sink that refuses a write surfaces as
/// [`TimelexError::BufferTooSmall`]; whatever the sink already accepted is
/// not meaningful output.
pub fn write_iso<W: Write>(
    w: &mut W,
    bd: &BrokenDownTime,
    usec: u32,
    flags: &IsoFlags,
) -> Result<()> {
    iso_parts(w, bd, usec, flags).map_err(|_| TimelexError::BufferTooSmall)
}

fn iso_parts<W: Write>(w: &mut W, bd: &BrokenDownTime, usec: u32, flags: &IsoFlags) -> fmt::Result {
    if flags.date {
        write!(w, "{:04}-{:02}-{:02}", bd.year, bd.month, bd.day)?;
    }
    if flags.date && flags.time {
        w.write_char(if flags.space_separator { ' ' } else { 'T' })?;
    }
    if flags.time {
        write!(w, "{:02}:{:02}:{:02}", bd.hour, bd.minute, bd.second)?;
    }
    if flags.dot_usec {
        write!(w, ".{usec:06}")?;
    } else if flags.comma_usec {
        write!(w, ",{usec:06}")?;
    }
    if flags.timezone {
        let sign = if bd.utc_offset_secs < 0 { '-' } else { '+' };
        let abs = bd.utc_offset_secs.unsigned_abs();
        write!(w, "{sign}{:02}{:02}", abs / 3_600, (abs % 3_600) / 60)?;
    }
    Ok(())
}

/// Decompose an instant and render it in one step.
pub fn format_iso(ts: Timestamp, flags: &IsoFlags) -> Result<String> {
    let zone = if flags.utc { Zone::Utc } else { Zone::Local };
    let bd = decompose(ts, zone)?;
    let mut out = String::new();
    write_iso(&mut out, &bd, ts.subsec_micros(), flags)?;
    Ok(out)
}

/// Whether `t` falls in the same epoch day bucket as `now`.
///
/// Buckets are whole 86 400-second days counted from the epoch, not local
/// calendar days.
pub fn is_today(t: Timestamp, now: Timestamp) -> bool {
    t.as_micros() / USEC_PER_DAY == now.as_micros() / USEC_PER_DAY
}

/// Whether `t` falls in the same 365-day epoch bucket as `now`.
pub fn is_this_year(t: Timestamp, now: Timestamp) -> bool {
    const BUCKET: u64 = 365 * USEC_PER_DAY;
    t.as_micros() / BUCKET == now.as_micros() / BUCKET
}

/// Options for [`format_short`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortFlags {
    /// Keep the clock time on same-year dates ("Sep22/16:34").
    pub this_year_hhmm: bool,
}

const MONTH_ABBREV: &[&str; 12] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Compact human-oriented rendering in local time: clock time for today,
/// month and day within the current year, year-month-day otherwise.
pub fn format_short(ts: Timestamp, now: Timestamp, flags: &ShortFlags) -> Result<String> {
    format_short_in(ts, now, flags, Zone::Local)
}

/// [`format_short`] with an explicit zone.
pub fn format_short_in(
    ts: Timestamp,
    now: Timestamp,
    flags: &ShortFlags,
    zone: Zone,
) -> Result<String> {
    let bd = decompose(ts, zone)?;
    let month = MONTH_ABBREV[(bd.month - 1) as usize];
    let s = if is_today(ts, now) {
        format!("{:02}:{:02}", bd.hour, bd.minute)
    } else if is_this_year(ts, now) {
        if flags.this_year_hhmm {
            format!("{month}{:02}/{:02}:{:02}", bd.day, bd.hour, bd.minute)
        } else {
            format!("{month}{:02}", bd.day)
        }
    } else {
        format!("{:04}-{month}{:02}", bd.year, bd.day)
    };
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc, Weekday};
    use std::time::Duration;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Timestamp {
        let secs = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().timestamp();
        Timestamp::from_secs(secs as u64)
    }

    fn sample() -> Timestamp {
        ts(2012, 9, 22, 16, 34, 22)
            .checked_add(Duration::from_micros(120_000))
            .unwrap()
    }

    fn utc(flags: IsoFlags) -> IsoFlags {
        IsoFlags { utc: true, ..flags }
    }

    #[test]
    fn test_date_only() {
        let flags = utc(IsoFlags { date: true, ..IsoFlags::default() });
        assert_eq!(format_iso(sample(), &flags).unwrap(), "2012-09-22");
    }

    #[test]
    fn test_time_only() {
        let flags = utc(IsoFlags { time: true, ..IsoFlags::default() });
        assert_eq!(format_iso(sample(), &flags).unwrap(), "16:34:22");
    }

    #[test]
    fn test_date_and_time_use_t_separator_by_default() {
        let flags = utc(IsoFlags { date: true, time: true, ..IsoFlags::default() });
        assert_eq!(format_iso(sample(), &flags).unwrap(), "2012-09-22T16:34:22");
    }

    #[test]
    fn test_space_separator_replaces_t() {
        let flags = utc(IsoFlags {
            date: true,
            time: true,
            space_separator: true,
            ..IsoFlags::default()
        });
        assert_eq!(format_iso(sample(), &flags).unwrap(), "2012-09-22 16:34:22");
    }

    #[test]
    fn test_fraction_separators() {
        let dot = utc(IsoFlags { time: true, dot_usec: true, ..IsoFlags::default() });
        assert_eq!(format_iso(sample(), &dot).unwrap(), "16:34:22.120000");

        let comma = utc(IsoFlags { time: true, comma_usec: true, ..IsoFlags::default() });
        assert_eq!(format_iso(sample(), &comma).unwrap(), "16:34:22,120000");
    }

    #[test]
    fn test_utc_zone_renders_as_plus_zero() {
        let flags = utc(IsoFlags {
            date: true,
            time: true,
            timezone: true,
            ..IsoFlags::default()
        });
        assert_eq!(
            format_iso(sample(), &flags).unwrap(),
            "2012-09-22T16:34:22+0000"
        );
    }

    #[test]
    fn test_negative_offset_renders_with_minus() {
        let bd = BrokenDownTime {
            year: 2012,
            month: 9,
            day: 22,
            hour: 11,
            minute: 34,
            second: 22,
            weekday: Weekday::Sat,
            utc_offset_secs: -5 * 3_600,
        };
        let mut out = String::new();
        let flags = IsoFlags { time: true, timezone: true, ..IsoFlags::default() };
        write_iso(&mut out, &bd, 0, &flags).unwrap();
        assert_eq!(out, "11:34:22-0500");
    }

    /// A sink with fixed capacity, for exercising the write failure path.
    struct Bounded {
        left: usize,
    }

    impl Write for Bounded {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if s.len() > self.left {
                return Err(fmt::Error);
            }
            self.left -= s.len();
            Ok(())
        }
    }

    #[test]
    fn test_exhausted_sink_is_buffer_too_small() {
        let bd = decompose(sample(), Zone::Utc).unwrap();
        let flags = IsoFlags { date: true, time: true, ..IsoFlags::default() };
        let mut sink = Bounded { left: 5 };
        assert!(matches!(
            write_iso(&mut sink, &bd, 0, &flags),
            Err(TimelexError::BufferTooSmall)
        ));
    }

    #[test]
    fn test_day_buckets() {
        let t = sample();
        assert!(is_today(t, t));
        assert!(!is_today(t, ts(2012, 9, 24, 16, 34, 22)));
        assert!(is_this_year(t, ts(2012, 10, 22, 0, 0, 0)));
        assert!(!is_this_year(t, ts(2014, 9, 22, 0, 0, 0)));
    }

    #[test]
    fn test_short_format_for_today_is_clock_time() {
        let now = sample();
        let out = format_short_in(now, now, &ShortFlags::default(), Zone::Utc).unwrap();
        assert_eq!(out, "16:34");
    }

    #[test]
    fn test_short_format_within_the_year_is_month_day() {
        let now = ts(2012, 11, 1, 9, 0, 0);
        let out = format_short_in(sample(), now, &ShortFlags::default(), Zone::Utc).unwrap();
        assert_eq!(out, "Sep22");

        let with_time = ShortFlags { this_year_hhmm: true };
        let out = format_short_in(sample(), now, &with_time, Zone::Utc).unwrap();
        assert_eq!(out, "Sep22/16:34");
    }

    #[test]
    fn test_short_format_outside_the_year_includes_it() {
        let now = ts(2015, 3, 1, 0, 0, 0);
        let out = format_short_in(sample(), now, &ShortFlags::default(), Zone::Utc).unwrap();
        assert_eq!(out, "2012-Sep22");
    }
}
