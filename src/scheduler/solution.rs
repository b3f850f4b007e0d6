use crate::types::{SemesterType, SlotRecord};
use serde::{Deserialize, Serialize};

/// Counters describing one search run.
///
/// Reported on success and carried inside `Unsatisfiable`/`Exhausted`
/// failures so callers can see how far the search got.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u64,
    /// Hours placed when the search stopped.
    pub total_placed: u32,
    /// Hours demanded across all (group, subject) pairs.
    pub total_demand: u32,
    /// (group, subject) pairs whose full weekly demand was placed.
    pub subjects_fully_scheduled: u32,
    pub completion_percentage: f64,
}

impl SearchStats {
    pub(crate) fn new(
        iterations: u64,
        total_placed: u32,
        total_demand: u32,
        subjects_fully_scheduled: u32,
    ) -> Self {
        let completion_percentage = if total_demand == 0 {
            100.0
        } else {
            f64::from(total_placed) / f64::from(total_demand) * 100.0
        };
        Self {
            iterations,
            total_placed,
            total_demand,
            subjects_fully_scheduled,
            completion_percentage,
        }
    }
}

/// A feasible timetable produced by one `generate` run.
///
/// Deliberately carries no wall-clock metadata: identical snapshot and
/// request produce an identical solution, byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub academic_year: String,
    pub semester_type: SemesterType,
    /// Slots sorted by (day, period, group code).
    pub slots: Vec<SlotRecord>,
    pub stats: SearchStats,
    /// Non-fatal notes, e.g. preference downgrades decided at preflight.
    pub warnings: Vec<String>,
}
