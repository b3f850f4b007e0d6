use super::{CourseType, RoomId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of physical room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RoomType {
    Classroom,
    Lab,
    Auditorium,
    SeminarHall,
}

impl RoomType {
    /// Room-kind compatibility: lab/practical subjects require lab rooms,
    /// theory subjects require any non-lab teaching room.
    pub fn suits(self, course_type: CourseType) -> bool {
        if course_type.needs_lab_room() {
            self == RoomType::Lab
        } else {
            self != RoomType::Lab
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Classroom => "classroom",
            RoomType::Lab => "lab",
            RoomType::Auditorium => "auditorium",
            RoomType::SeminarHall => "seminar_hall",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical room in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    pub id: RoomId,
    /// Natural key, unique across the catalog (e.g. "B2-104").
    pub code: String,
    pub name: String,
    pub capacity: u32,
    pub room_type: RoomType,
    pub floor: Option<i32>,
    pub building: Option<String>,
    pub has_projector: bool,
    pub has_computer: bool,
    pub is_active: bool,
}

/// Fields for inserting a new room.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub code: String,
    pub name: String,
    pub capacity: u32,
    pub room_type: RoomType,
    pub floor: Option<i32>,
    pub building: Option<String>,
    pub has_projector: bool,
    pub has_computer: bool,
}

impl NewRoom {
    /// Plain classroom with just a code, name and capacity.
    pub fn classroom(code: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            capacity,
            room_type: RoomType::Classroom,
            floor: None,
            building: None,
            has_projector: false,
            has_computer: false,
        }
    }

    /// Lab room with just a code, name and capacity.
    pub fn lab(code: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            capacity,
            room_type: RoomType::Lab,
            floor: None,
            building: None,
            has_projector: false,
            has_computer: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lab_subjects_only_fit_lab_rooms() {
        assert!(RoomType::Lab.suits(CourseType::Lab));
        assert!(RoomType::Lab.suits(CourseType::Practical));
        assert!(!RoomType::Classroom.suits(CourseType::Lab));
        assert!(!RoomType::Auditorium.suits(CourseType::Practical));
    }

    #[test]
    fn test_theory_fits_any_non_lab_room() {
        assert!(RoomType::Classroom.suits(CourseType::Theory));
        assert!(RoomType::Auditorium.suits(CourseType::Theory));
        assert!(RoomType::SeminarHall.suits(CourseType::Theory));
        assert!(!RoomType::Lab.suits(CourseType::Theory));
    }
}
