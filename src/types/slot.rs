use super::{CourseType, DayOfWeek, GroupId, RoomId, RoomType, SubjectId, TeacherId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Odd (Jul-Dec) or even (Jan-Jun) semester half of an academic year.
///
/// Together with the academic year this keys a timetable partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SemesterType {
    Odd,
    Even,
}

impl SemesterType {
    pub fn as_str(self) -> &'static str {
        match self {
            SemesterType::Odd => "odd",
            SemesterType::Even => "even",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "odd" => Some(SemesterType::Odd),
            "even" => Some(SemesterType::Even),
            _ => None,
        }
    }
}

impl fmt::Display for SemesterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Teacher reference embedded in a slot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRef {
    pub id: TeacherId,
    pub code: String,
    pub name: String,
}

/// Subject reference embedded in a slot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
    pub id: SubjectId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub course_type: CourseType,
}

/// Group reference embedded in a slot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: GroupId,
    pub code: String,
    pub name: String,
}

/// Room reference embedded in a slot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    pub id: RoomId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
}

/// One timetable cell hydrated with entity codes and names.
///
/// This is the wire shape solutions and timetable reads are reported in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub day: DayOfWeek,
    pub period: u8,
    pub teacher: TeacherRef,
    pub subject: SubjectRef,
    pub group: GroupRef,
    pub room: RoomRef,
}

impl SlotRecord {
    /// Sort key fixing the canonical output order.
    pub fn sort_key(&self) -> (u8, u8, String) {
        (self.day.ordinal(), self.period, self.group.code.clone())
    }
}
