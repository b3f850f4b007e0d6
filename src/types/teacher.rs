use super::TeacherId;
use serde::{Deserialize, Serialize};

/// A teacher in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Teacher {
    pub id: TeacherId,
    /// Natural key, unique across the catalog (e.g. "CS-RAO").
    pub code: String,
    pub name: String,
    pub department: String,
    pub is_active: bool,
}

/// Fields for inserting a new teacher.
#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub code: String,
    pub name: String,
    pub department: String,
}
