use super::ElectiveId;
use serde::{Deserialize, Serialize};

/// An elective subject with a fixed seat capacity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Elective {
    pub id: ElectiveId,
    pub name: String,
    pub capacity: u32,
}

/// A student's ordered elective preferences plus their CGPA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentChoice {
    /// Roll number or registration id; the tie-break after CGPA.
    pub student_id: String,
    pub student_name: String,
    pub cgpa: f64,
    /// Elective names, most preferred first.
    pub preferences: Vec<String>,
}

/// Seat granted to a student by the allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedSeat {
    pub elective_id: ElectiveId,
    pub elective_name: String,
    /// 1-based rank of the matched preference.
    pub preference_rank: u32,
}

/// Per-student allocation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub student_id: String,
    pub student_name: String,
    pub cgpa: f64,
    /// `None` means no listed elective had a seat left.
    pub seat: Option<AllocatedSeat>,
}

impl AllocationOutcome {
    pub fn is_allocated(&self) -> bool {
        self.seat.is_some()
    }
}
