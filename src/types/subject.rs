use super::SubjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a subject is delivered, which decides the kind of room it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum CourseType {
    Theory,
    Practical,
    Lab,
}

impl CourseType {
    /// Lab and practical sessions must be hosted in lab rooms.
    pub fn needs_lab_room(self) -> bool {
        matches!(self, CourseType::Lab | CourseType::Practical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CourseType::Theory => "theory",
            CourseType::Practical => "practical",
            CourseType::Lab => "lab",
        }
    }
}

impl fmt::Display for CourseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A subject offering in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subject {
    pub id: SubjectId,
    /// Natural key, unique across the catalog (e.g. "CS301").
    pub code: String,
    pub name: String,
    /// Weekly hour demand per group studying this subject (1-10).
    pub hours_per_week: u8,
    pub course_type: CourseType,
    pub department: String,
    /// Semester the subject belongs to (1-8).
    pub semester: u8,
    /// Whether same-day placements must occupy contiguous periods.
    pub requires_consecutive_periods: bool,
    /// Upper bound on placements per (group, day) (1-4).
    pub max_periods_per_day: u8,
    pub is_active: bool,
}

/// Fields for inserting a new subject.
#[derive(Debug, Clone)]
pub struct NewSubject {
    pub code: String,
    pub name: String,
    pub hours_per_week: u8,
    pub course_type: CourseType,
    pub department: String,
    pub semester: u8,
    pub requires_consecutive_periods: bool,
    pub max_periods_per_day: u8,
}
