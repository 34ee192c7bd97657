//! Smoke-test harness for the timelex library.
//!
//! This binary is the only place the system clock is read; the library
//! itself takes the reference instant as an explicit argument.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use timelex::{format_iso, parse_timestamp_in, IsoFlags, Timestamp, Zone};

#[derive(Parser)]
#[command(name = "timelex", about = "Parse and format textual timestamps", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a time expression against the current clock
    Resolve {
        /// Expression such as "now", "+5min", or "2012-09-22 16:34"
        expr: String,
        /// Interpret calendar fields in UTC instead of local time
        #[arg(long)]
        utc: bool,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render an epoch timestamp in the ISO 8601 variants
    Iso {
        /// Seconds since the Unix epoch
        secs: u64,
        /// Additional microseconds
        #[arg(default_value_t = 0)]
        usec: u32,
        /// Render in UTC instead of local time
        #[arg(long)]
        utc: bool,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Resolve { expr, utc, json } => resolve(&expr, utc, json),
        Command::Iso { secs, usec, utc } => iso(secs, usec, utc),
    }
}

fn clock_now() -> Timestamp {
    Timestamp::from_micros(chrono::Utc::now().timestamp_micros().max(0) as u64)
}

fn resolve(expr: &str, utc: bool, json: bool) -> Result<()> {
    let zone = if utc { Zone::Utc } else { Zone::Local };
    let ts = parse_timestamp_in(expr, clock_now(), zone)
        .with_context(|| format!("cannot resolve '{expr}'"))?;
    let flags = IsoFlags {
        date: true,
        time: true,
        dot_usec: true,
        timezone: true,
        space_separator: true,
        utc,
        ..IsoFlags::default()
    };
    let rendered = format_iso(ts, &flags)?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "usec": ts.as_micros(), "iso": rendered })
        );
    } else {
        println!("{} {}", ts.as_micros(), rendered);
    }
    Ok(())
}

fn iso(secs: u64, usec: u32, utc: bool) -> Result<()> {
    let ts = Timestamp::from_micros(
        secs.saturating_mul(1_000_000).saturating_add(u64::from(usec)),
    );
    let base = IsoFlags { utc, ..IsoFlags::default() };

    println!("Date: '{}'", format_iso(ts, &IsoFlags { date: true, ..base })?);
    println!("Time: '{}'", format_iso(ts, &IsoFlags { time: true, ..base })?);
    println!(
        "Full: '{}'",
        format_iso(ts, &IsoFlags { date: true, time: true, comma_usec: true, ..base })?
    );
    println!(
        "Zone: '{}'",
        format_iso(
            ts,
            &IsoFlags {
                date: true,
                time: true,
                dot_usec: true,
                timezone: true,
                space_separator: true,
                ..base
            }
        )?
    );
    Ok(())
}
