use crate::types::{Cell, DayOfWeek, Preferences, Room, SemesterType, StudentGroup, Subject, Teacher};
use serde::{Deserialize, Serialize};

/// Dense bitset over small ordinal ranges (cells, entity ordinals).
///
/// The inner conflict checks of the search engine run on these instead of
/// hash sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    pub fn insert(&mut self, index: usize) {
        self.words[index / 64] |= 1 << (index % 64);
    }

    pub fn remove(&mut self, index: usize) {
        self.words[index / 64] &= !(1 << (index % 64));
    }

    pub fn contains(&self, index: usize) -> bool {
        self.words[index / 64] & (1 << (index % 64)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }
}

/// How strictly contiguous placement is enforced for one demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsecutiveMode {
    /// Placements must extend a same-day block or start one with room to grow.
    Hard,
    /// Requested but structurally unsatisfiable; not enforced.
    BestEffort,
    /// Not requested for this demand.
    Off,
}

/// Weekly hour demand for one (group, subject) pair, with its precompiled
/// candidate teachers and rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demand {
    /// Ordinal into `ProblemInstance::groups`.
    pub group: usize,
    /// Ordinal into `ProblemInstance::subjects`.
    pub subject: usize,
    pub hours: u32,
    pub per_day_cap: u32,
    pub consecutive: ConsecutiveMode,
    /// Teacher ordinals, ascending priority then code.
    pub teachers: Vec<usize>,
    /// Room ordinals, ascending capacity then code (tightest fit first).
    pub rooms: Vec<usize>,
}

/// A self-contained problem instance.
///
/// Compiled once from a catalog snapshot; the search never goes back to
/// the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemInstance {
    pub academic_year: String,
    pub semester_type: SemesterType,
    /// Requested days in walk order.
    pub days: Vec<DayOfWeek>,
    pub periods_per_day: u8,
    pub lunch_break_period: Option<u8>,
    /// Fillable (day, period) pairs, lexicographic over (day index, period),
    /// lunch excluded.
    pub cells: Vec<Cell>,
    /// Ordinal-indexed entity tables.
    pub teachers: Vec<Teacher>,
    pub rooms: Vec<Room>,
    pub groups: Vec<StudentGroup>,
    pub subjects: Vec<Subject>,
    /// Demands ordered by (group code, subject code).
    pub demands: Vec<Demand>,
    /// Per teacher ordinal: blocked cell ordinals.
    pub forbidden: Vec<BitSet>,
    pub preferences: Preferences,
    /// Preference downgrades and other non-fatal notes, reported on the
    /// solution verbatim.
    pub warnings: Vec<String>,
}

impl ProblemInstance {
    /// Position of a day in the walk order.
    pub fn day_index(&self, day: DayOfWeek) -> usize {
        self.days
            .iter()
            .position(|d| *d == day)
            .expect("cell day always comes from the instance day list")
    }

    /// Total weekly hours demanded across all (group, subject) pairs.
    pub fn total_demand(&self) -> u32 {
        self.demands.iter().map(|d| d.hours).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_insert_remove_contains() {
        let mut set = BitSet::new(130);
        assert!(!set.contains(0));
        set.insert(0);
        set.insert(63);
        set.insert(64);
        set.insert(129);
        assert!(set.contains(0) && set.contains(63) && set.contains(64) && set.contains(129));
        assert!(!set.contains(1) && !set.contains(128));
        set.remove(64);
        assert!(!set.contains(64));
        assert!(set.contains(129));
    }

    #[test]
    fn test_bitset_is_empty() {
        let mut set = BitSet::new(10);
        assert!(set.is_empty());
        set.insert(9);
        assert!(!set.is_empty());
        set.remove(9);
        assert!(set.is_empty());
    }
}
