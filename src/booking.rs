//! Bookable time slots for a service plan on a given day.
//!
//! Slots are laid out back to back from the start of the working day for as
//! long as a whole slot still fits before its end.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Start of the working day.
pub const WORK_DAY_START: (u32, u32) = (8, 0);
/// End of the working day; no slot ends after it.
pub const WORK_DAY_END: (u32, u32) = (18, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// A reservation already starts at this time
    pub busy: bool,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Parse a plan duration given as "HH:MM" or "HH:MM:SS" into whole minutes.
pub fn parse_duration(raw: &str) -> Result<u32> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        anyhow::bail!("Invalid duration format: {:?}", raw);
    }
    let hours: u32 = parts[0]
        .parse()
        .with_context(|| format!("Invalid hours in duration: {:?}", raw))?;
    let minutes: u32 = parts[1]
        .parse()
        .with_context(|| format!("Invalid minutes in duration: {:?}", raw))?;
    if minutes >= 60 {
        anyhow::bail!("Invalid minutes in duration: {:?}", raw);
    }
    let total = hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .with_context(|| format!("Duration is too long: {:?}", raw))?;
    if total == 0 {
        anyhow::bail!("Duration must be greater than zero");
    }
    Ok(total)
}

/// Parse a reservation time ("HH:MM" or "HH:MM:SS"), ignoring seconds.
fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
        .and_then(|t| t.with_second(0))
}

fn minutes_of(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

fn time_from_minutes(total: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(total / 60, total % 60, 0)
}

/// Slots of `duration_minutes` within working hours, marking those whose start
/// matches a reservation start as busy.
pub fn compute_slots<S: AsRef<str>>(duration_minutes: u32, reserved_starts: &[S]) -> Result<Vec<Slot>> {
    if duration_minutes == 0 {
        anyhow::bail!("Duration must be greater than zero");
    }
    let busy: Vec<NaiveTime> = reserved_starts
        .iter()
        .filter_map(|s| parse_clock(s.as_ref()))
        .collect();

    let day_start = WORK_DAY_START.0 * 60 + WORK_DAY_START.1;
    let day_end = WORK_DAY_END.0 * 60 + WORK_DAY_END.1;

    let mut slots = Vec::new();
    let mut start = day_start;
    while let Some(end) = start
        .checked_add(duration_minutes)
        .filter(|end| *end <= day_end)
    {
        let (Some(s), Some(e)) = (time_from_minutes(start), time_from_minutes(end)) else {
            break;
        };
        slots.push(Slot {
            start: s,
            end: e,
            busy: busy.iter().any(|b| minutes_of(*b) == start),
        });
        start = end;
    }
    Ok(slots)
}

/// Drop slots that already started when `date` is today.
pub fn upcoming(slots: Vec<Slot>, date: NaiveDate, now: NaiveDateTime) -> Vec<Slot> {
    if date != now.date() {
        return slots;
    }
    let now_minutes = minutes_of(now.time());
    slots
        .into_iter()
        .filter(|slot| minutes_of(slot.start) > now_minutes)
        .collect()
}
