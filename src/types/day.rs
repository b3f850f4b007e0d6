use serde::{Deserialize, Serialize};
use std::fmt;

/// Working days of the timetable week, Monday through Saturday.
///
/// Persisted as the ordinal (0-5); the ordinal also fixes the order in
/// which the search engine walks days.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum DayOfWeek {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
}

/// Fixed day order used for cell enumeration and output sorting.
pub const DAY_ORDER: [DayOfWeek; 6] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
    DayOfWeek::Saturday,
];

impl DayOfWeek {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        DAY_ORDER.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }

    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    /// Parse "mon", "Monday", etc. Case-insensitive, prefix match on 3 letters.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_ascii_lowercase();
        DAY_ORDER
            .iter()
            .copied()
            .find(|d| lower == d.name().to_ascii_lowercase() || lower == d.short_name().to_ascii_lowercase())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A (day, period) pair eligible to hold assignments.
///
/// Periods are 1-based throughout storage and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub day: DayOfWeek,
    pub period: u8,
}

impl Cell {
    pub fn new(day: DayOfWeek, period: u8) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} P{}", self.day.short_name(), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_round_trip() {
        for day in DAY_ORDER {
            assert_eq!(DayOfWeek::from_ordinal(day.ordinal()), Some(day));
        }
        assert_eq!(DayOfWeek::from_ordinal(6), None);
    }

    #[test]
    fn test_day_order_is_monday_first() {
        assert_eq!(DAY_ORDER[0], DayOfWeek::Monday);
        assert_eq!(DAY_ORDER[5], DayOfWeek::Saturday);
        assert!(DayOfWeek::Monday < DayOfWeek::Saturday);
    }

    #[test]
    fn test_parse_accepts_short_and_long_names() {
        assert_eq!(DayOfWeek::parse("mon"), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::parse("Wednesday"), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::parse("SAT"), Some(DayOfWeek::Saturday));
        assert_eq!(DayOfWeek::parse("sun"), None);
    }
}
