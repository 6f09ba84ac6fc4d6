//! Weekly availability: per-weekday lists of opening time ranges.
//!
//! Ranges are plain `"HH:MM"` strings exactly as the user picked them. A range
//! with either end empty is kept while editing but counts as incomplete: it is
//! ignored by the summary and stripped before submission. Ordering and overlap
//! between ranges are not checked.

use crate::utils::null_as_empty;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Summary text for a day without any complete range.
pub const CLOSED_LABEL: &str = "CERRADO";

/// Hours offered by the editor when cycling a range end.
pub const HOUR_CHOICES: [&str; 14] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
    "18:00", "19:00", "20:00", "21:00",
];

/// Day of the week, keyed by the Spanish names the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Lunes,
    Martes,
    Miercoles,
    Jueves,
    Viernes,
    Sabado,
    Domingo,
}

impl Weekday {
    /// All days in week order, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Lunes,
        Weekday::Martes,
        Weekday::Miercoles,
        Weekday::Jueves,
        Weekday::Viernes,
        Weekday::Sabado,
        Weekday::Domingo,
    ];

    /// Wire key used in the availability JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Weekday::Lunes => "lunes",
            Weekday::Martes => "martes",
            Weekday::Miercoles => "miércoles",
            Weekday::Jueves => "jueves",
            Weekday::Viernes => "viernes",
            Weekday::Sabado => "sábado",
            Weekday::Domingo => "domingo",
        }
    }

    /// Capitalized name for display.
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Lunes => "Lunes",
            Weekday::Martes => "Martes",
            Weekday::Miercoles => "Miércoles",
            Weekday::Jueves => "Jueves",
            Weekday::Viernes => "Viernes",
            Weekday::Sabado => "Sábado",
            Weekday::Domingo => "Domingo",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Weekday> {
        Self::ALL.get(index).copied()
    }

    /// Parse a wire key. Unaccented spellings are accepted too.
    pub fn from_key(key: &str) -> Option<Weekday> {
        match key.trim().to_lowercase().as_str() {
            "lunes" => Some(Weekday::Lunes),
            "martes" => Some(Weekday::Martes),
            "miércoles" | "miercoles" => Some(Weekday::Miercoles),
            "jueves" => Some(Weekday::Jueves),
            "viernes" => Some(Weekday::Viernes),
            "sábado" | "sabado" => Some(Weekday::Sabado),
            "domingo" => Some(Weekday::Domingo),
            _ => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which end of a range is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Start,
    End,
}

/// One opening range. Field names match the backend JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inicio: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fin: String,
}

impl TimeRange {
    pub fn new(inicio: impl Into<String>, fin: impl Into<String>) -> Self {
        Self {
            inicio: inicio.into(),
            fin: fin.into(),
        }
    }

    /// Both ends are set.
    pub fn is_complete(&self) -> bool {
        !self.inicio.is_empty() && !self.fin.is_empty()
    }

    pub fn get(&self, field: RangeField) -> &str {
        match field {
            RangeField::Start => &self.inicio,
            RangeField::End => &self.fin,
        }
    }
}

/// Availability for the seven weekdays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityMap {
    days: [Vec<TimeRange>; 7],
}

impl AvailabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `disponibilidad` JSON string stored by the backend.
    ///
    /// Malformed input is logged and yields an empty map. Unknown day keys are ignored.
    pub fn from_backend_json(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::new();
        }
        match serde_json::from_str::<AvailabilityMap>(raw) {
            Ok(map) => map,
            Err(e) => {
                warn!("Malformed availability JSON, starting empty: {}", e);
                Self::new()
            }
        }
    }

    /// Ranges configured for a day, including incomplete ones.
    pub fn ranges(&self, day: Weekday) -> &[TimeRange] {
        &self.days[day.index()]
    }

    /// Append an empty range to a day.
    pub fn add_range(&mut self, day: Weekday) {
        self.days[day.index()].push(TimeRange::default());
    }

    /// Replace one end of a range. Out-of-range indices are ignored.
    pub fn update_range(&mut self, day: Weekday, index: usize, field: RangeField, value: &str) {
        if let Some(range) = self.days[day.index()].get_mut(index) {
            match field {
                RangeField::Start => range.inicio = value.to_string(),
                RangeField::End => range.fin = value.to_string(),
            }
        }
    }

    /// Remove a range, shifting the following ones down. Out-of-range indices are ignored.
    pub fn remove_range(&mut self, day: Weekday, index: usize) {
        let ranges = &mut self.days[day.index()];
        if index < ranges.len() {
            ranges.remove(index);
        }
    }

    /// Complete ranges of a day, in order.
    pub fn valid_ranges(&self, day: Weekday) -> impl Iterator<Item = &TimeRange> {
        self.days[day.index()].iter().filter(|r| r.is_complete())
    }

    /// A day is open when it has at least one complete range.
    pub fn is_open(&self, day: Weekday) -> bool {
        self.valid_ranges(day).next().is_some()
    }

    /// Display text for a day: `"09:00–10:00, 15:00–18:00"` or [`CLOSED_LABEL`].
    pub fn summary(&self, day: Weekday) -> String {
        let parts: Vec<String> = self
            .valid_ranges(day)
            .map(|r| format!("{}–{}", r.inicio, r.fin))
            .collect();
        if parts.is_empty() {
            CLOSED_LABEL.to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Copy without incomplete ranges, as sent to the backend.
    pub fn filtered(&self) -> Self {
        let mut out = Self::new();
        for day in Weekday::ALL {
            out.days[day.index()] = self.valid_ranges(day).cloned().collect();
        }
        out
    }

    /// Ensure every day has at least one row to edit.
    pub fn with_placeholder_rows(mut self) -> Self {
        for ranges in &mut self.days {
            if ranges.is_empty() {
                ranges.push(TimeRange::default());
            }
        }
        self
    }

    pub fn open_days(&self) -> usize {
        Weekday::ALL.iter().filter(|d| self.is_open(**d)).count()
    }
}

impl Serialize for AvailabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Weekday::ALL.len()))?;
        for day in Weekday::ALL {
            map.serialize_entry(day.key(), self.ranges(day))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AvailabilityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Option<Vec<TimeRange>>>::deserialize(deserializer)?;
        let mut out = AvailabilityMap::new();
        for (key, ranges) in raw {
            if let Some(day) = Weekday::from_key(&key) {
                out.days[day.index()] = ranges.unwrap_or_default();
            }
        }
        Ok(out)
    }
}

/// Step an hour choice forward or backward through [`HOUR_CHOICES`].
///
/// An empty or unknown value starts at the first (forward) or last (backward) choice.
pub fn cycle_hour(current: &str, forward: bool) -> &'static str {
    let last = HOUR_CHOICES.len() - 1;
    match HOUR_CHOICES.iter().position(|h| *h == current) {
        Some(i) if forward => HOUR_CHOICES[(i + 1) % HOUR_CHOICES.len()],
        Some(0) => HOUR_CHOICES[last],
        Some(i) => HOUR_CHOICES[i - 1],
        None if forward => HOUR_CHOICES[0],
        None => HOUR_CHOICES[last],
    }
}
