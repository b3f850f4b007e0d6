use super::GroupId;
use serde::{Deserialize, Serialize};

/// A student group (class section) that attends lectures together.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentGroup {
    pub id: GroupId,
    /// Natural key, unique across the catalog (e.g. "CS-3A").
    pub code: String,
    pub name: String,
    /// Head count, used against room capacity.
    pub strength: u32,
    pub department: String,
    pub semester: u8,
    /// Academic year the group belongs to, "YYYY-YY".
    pub academic_year: String,
    pub is_active: bool,
}

/// Fields for inserting a new student group.
#[derive(Debug, Clone)]
pub struct NewStudentGroup {
    pub code: String,
    pub name: String,
    pub strength: u32,
    pub department: String,
    pub semester: u8,
    pub academic_year: String,
}
