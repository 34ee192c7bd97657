//! Broken-down calendar time: decomposition and normalization.
//!
//! This is the calendar primitive the resolver delegates to. Anything that
//! needs actual calendar arithmetic (month lengths, leap years, local
//! offsets) goes through [`decompose`] and [`normalize`]; the parsing
//! layers above only move integer fields around.

use chrono::{
    DateTime, Datelike, Duration as ChronoDuration, Local, NaiveDate, Offset, TimeZone, Timelike,
    Utc, Weekday,
};
use serde::Serialize;

use crate::duration::USEC_PER_SEC;
use crate::error::{Result, TimelexError};
use crate::instant::Timestamp;

/// Which wall clock calendar fields are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Zone {
    /// The process's local timezone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

/// Calendar-field decomposition of an instant, at second resolution.
///
/// `day` is signed and deliberately wider than a calendar day number:
/// adjustments such as "yesterday" may step outside 1..=31, and
/// [`normalize`] resolves the overflow against the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenDownTime {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub day: i64,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Day of week of the decomposed instant. Ignored by [`normalize`],
    /// which rederives it from the resolved date.
    pub weekday: Weekday,
    /// Offset from UTC in seconds at the decomposed instant.
    pub utc_offset_secs: i32,
}

impl BrokenDownTime {
    /// Reset the clock fields to midnight, keeping the date.
    pub fn clear_time(&mut self) {
        self.hour = 0;
        self.minute = 0;
        self.second = 0;
    }
}

/// Decompose an instant into calendar fields in the given zone.
///
/// Sub-second microseconds are discarded; callers that need them keep the
/// fraction themselves (see [`crate::format::format_iso`]).
///
/// # Errors
///
/// [`TimelexError::Calendar`] when the instant lies beyond the supported
/// calendar range.
pub fn decompose(ts: Timestamp, zone: Zone) -> Result<BrokenDownTime> {
    let secs = (ts.as_micros() / USEC_PER_SEC) as i64;
    let out_of_range =
        || TimelexError::Calendar(format!("instant {}us is outside the calendar range", ts.as_micros()));
    match zone {
        Zone::Utc => {
            let dt = Utc.timestamp_opt(secs, 0).single().ok_or_else(out_of_range)?;
            Ok(fields(&dt))
        }
        Zone::Local => {
            let dt = Local.timestamp_opt(secs, 0).single().ok_or_else(out_of_range)?;
            Ok(fields(&dt))
        }
    }
}

fn fields<Tz: TimeZone>(dt: &DateTime<Tz>) -> BrokenDownTime {
    BrokenDownTime {
        year: dt.year(),
        month: dt.month(),
        day: i64::from(dt.day()),
        hour: dt.hour(),
        minute: dt.minute(),
        second: dt.second(),
        weekday: dt.weekday(),
        utc_offset_secs: dt.offset().fix().local_minus_utc(),
    }
}

/// Normalize calendar fields back to an absolute instant.
///
/// Out-of-range `day` and clock values roll over into the neighboring
/// periods: day 32 becomes the start of the next month, second 60 the next
/// minute, day 0 the last day of the previous month. An ambiguous local
/// time (clocks rolled back) resolves to its earliest mapping.
///
/// # Errors
///
/// [`TimelexError::Calendar`] for a nonexistent local time (clocks rolled
/// forward), a pre-epoch result, or a date outside the supported range.
pub fn normalize(bd: &BrokenDownTime, zone: Zone) -> Result<Timestamp> {
    let reject = || {
        TimelexError::Calendar(format!(
            "cannot resolve {:04}-{:02} day {} {:02}:{:02}:{:02}",
            bd.year, bd.month, bd.day, bd.hour, bd.minute, bd.second
        ))
    };

    let date = bd
        .day
        .checked_sub(1)
        .and_then(ChronoDuration::try_days)
        .and_then(|off| NaiveDate::from_ymd_opt(bd.year, bd.month, 1)?.checked_add_signed(off))
        .ok_or_else(reject)?;
    let clock_secs =
        i64::from(bd.hour) * 3_600 + i64::from(bd.minute) * 60 + i64::from(bd.second);
    let naive = date
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.checked_add_signed(ChronoDuration::seconds(clock_secs)))
        .ok_or_else(reject)?;

    let secs = match zone {
        Zone::Utc => naive.and_utc().timestamp(),
        Zone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(reject)?
            .timestamp(),
    };

    let secs = u64::try_from(secs).map_err(|_| {
        TimelexError::Calendar(format!(
            "{:04}-{:02} day {} is before the epoch",
            bd.year, bd.month, bd.day
        ))
    })?;
    secs.checked_mul(USEC_PER_SEC)
        .map(Timestamp::from_micros)
        .ok_or_else(reject)
}
