use super::{DayOfWeek, TeacherId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A cell blocked for a teacher.
///
/// Permanent entries always apply; dated entries apply while the reference
/// date falls inside the window (an open end date never expires).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherUnavailability {
    pub teacher_id: TeacherId,
    pub day_of_week: DayOfWeek,
    pub period_number: u8,
    pub reason: String,
    pub is_permanent: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TeacherUnavailability {
    /// Whether this entry blocks the teacher on `reference_date`.
    pub fn blocks_on(&self, reference_date: NaiveDate) -> bool {
        if self.is_permanent {
            return true;
        }
        match self.end_date {
            None => true,
            Some(end) => reference_date <= end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(is_permanent: bool, end_date: Option<NaiveDate>) -> TeacherUnavailability {
        TeacherUnavailability {
            teacher_id: TeacherId(1),
            day_of_week: DayOfWeek::Monday,
            period_number: 1,
            reason: "medical leave".to_string(),
            is_permanent,
            start_date: None,
            end_date,
        }
    }

    #[test]
    fn test_permanent_entries_always_block() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert!(entry(true, Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())).blocks_on(date));
    }

    #[test]
    fn test_dated_entries_expire_after_end_date() {
        let active = entry(false, Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()));
        assert!(active.blocks_on(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()));
        assert!(!active.blocks_on(NaiveDate::from_ymd_opt(2025, 8, 2).unwrap()));
    }

    #[test]
    fn test_open_ended_entries_never_expire() {
        assert!(entry(false, None).blocks_on(NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()));
    }
}
