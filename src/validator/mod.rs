//! Invariant checks for accepted timetables.
//!
//! The search engine enforces these constraints by construction; the
//! validator re-derives them from the finished slot list so tests and
//! callers can audit any solution against its problem instance.

use crate::compiler::{Demand, ProblemInstance};
use crate::types::SlotRecord;
use std::collections::{HashMap, HashSet};

/// A constraint violation found in a solution.
#[derive(Debug, Clone)]
pub struct Violation {
    pub constraint: &'static str,
    pub message: String,
}

/// Check every invariant of a solution against its instance.
pub fn validate_solution(slots: &[SlotRecord], instance: &ProblemInstance) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(check_exclusivity(slots));
    violations.extend(check_room_suitability(slots, instance));
    violations.extend(check_eligibility(slots, instance));
    violations.extend(check_demand_counts(slots, instance));
    violations.extend(check_unavailability(slots, instance));
    violations.extend(check_lunch_period(slots, instance));
    violations.extend(check_per_day_caps(slots, instance));
    violations
}

/// Teacher, group and room exclusivity per cell.
pub fn check_exclusivity(slots: &[SlotRecord]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut teacher_cells = HashSet::new();
    let mut group_cells = HashSet::new();
    let mut room_cells = HashSet::new();

    for slot in slots {
        let cell = (slot.day, slot.period);
        if !teacher_cells.insert((cell, slot.teacher.id)) {
            violations.push(Violation {
                constraint: "TeacherExclusivity",
                message: format!(
                    "teacher {} double-booked at {} P{}",
                    slot.teacher.code, slot.day, slot.period
                ),
            });
        }
        if !group_cells.insert((cell, slot.group.id)) {
            violations.push(Violation {
                constraint: "GroupExclusivity",
                message: format!(
                    "group {} double-booked at {} P{}",
                    slot.group.code, slot.day, slot.period
                ),
            });
        }
        if !room_cells.insert((cell, slot.room.id)) {
            violations.push(Violation {
                constraint: "RoomExclusivity",
                message: format!(
                    "room {} double-booked at {} P{}",
                    slot.room.code, slot.day, slot.period
                ),
            });
        }
    }
    violations
}

/// Room capacity and room-kind compatibility.
pub fn check_room_suitability(
    slots: &[SlotRecord],
    instance: &ProblemInstance,
) -> Vec<Violation> {
    let strengths: HashMap<_, _> = instance.groups.iter().map(|g| (g.id, g.strength)).collect();
    let capacities: HashMap<_, _> = instance.rooms.iter().map(|r| (r.id, r.capacity)).collect();

    let mut violations = Vec::new();
    for slot in slots {
        let strength = strengths.get(&slot.group.id).copied().unwrap_or(0);
        let capacity = capacities.get(&slot.room.id).copied().unwrap_or(0);
        if capacity < strength {
            violations.push(Violation {
                constraint: "RoomCapacity",
                message: format!(
                    "room {} (capacity {}) cannot seat group {} (strength {})",
                    slot.room.code, capacity, slot.group.code, strength
                ),
            });
        }
        if !slot.room.room_type.suits(slot.subject.course_type) {
            violations.push(Violation {
                constraint: "RoomKind",
                message: format!(
                    "{} room {} cannot host {} subject {}",
                    slot.room.room_type, slot.room.code, slot.subject.course_type, slot.subject.code
                ),
            });
        }
    }
    violations
}

/// Every slot's (teacher, subject) and (subject, group) pairings must be
/// declared in the instance.
pub fn check_eligibility(slots: &[SlotRecord], instance: &ProblemInstance) -> Vec<Violation> {
    let mut allowed_teachers = HashSet::new();
    let mut demanded_pairs = HashSet::new();
    for demand in &instance.demands {
        let subject = &instance.subjects[demand.subject];
        let group = &instance.groups[demand.group];
        demanded_pairs.insert((subject.id, group.id));
        for &t in &demand.teachers {
            allowed_teachers.insert((instance.teachers[t].id, subject.id));
        }
    }

    let mut violations = Vec::new();
    for slot in slots {
        if !allowed_teachers.contains(&(slot.teacher.id, slot.subject.id)) {
            violations.push(Violation {
                constraint: "TeacherEligibility",
                message: format!(
                    "teacher {} is not eligible for subject {}",
                    slot.teacher.code, slot.subject.code
                ),
            });
        }
        if !demanded_pairs.contains(&(slot.subject.id, slot.group.id)) {
            violations.push(Violation {
                constraint: "GroupEligibility",
                message: format!(
                    "group {} does not study subject {}",
                    slot.group.code, slot.subject.code
                ),
            });
        }
    }
    violations
}

/// Slot counts must equal the weekly demand for every (group, subject).
pub fn check_demand_counts(slots: &[SlotRecord], instance: &ProblemInstance) -> Vec<Violation> {
    let mut counts: HashMap<_, u32> = HashMap::new();
    for slot in slots {
        *counts.entry((slot.group.id, slot.subject.id)).or_default() += 1;
    }

    let mut violations = Vec::new();
    for demand in &instance.demands {
        let subject = &instance.subjects[demand.subject];
        let group = &instance.groups[demand.group];
        let placed = counts.get(&(group.id, subject.id)).copied().unwrap_or(0);
        if placed != demand.hours {
            violations.push(Violation {
                constraint: "WeeklyDemand",
                message: format!(
                    "group {} has {} hours of {} scheduled, needs {}",
                    group.code, placed, subject.code, demand.hours
                ),
            });
        }
    }
    violations
}

/// No slot may sit in a cell its teacher is blocked for.
pub fn check_unavailability(slots: &[SlotRecord], instance: &ProblemInstance) -> Vec<Violation> {
    let teacher_ord: HashMap<_, _> = instance
        .teachers
        .iter()
        .enumerate()
        .map(|(ord, t)| (t.id, ord))
        .collect();
    let cell_ord: HashMap<_, _> = instance
        .cells
        .iter()
        .enumerate()
        .map(|(ord, c)| ((c.day, c.period), ord))
        .collect();

    let mut violations = Vec::new();
    for slot in slots {
        let (Some(&t), Some(&cell)) = (
            teacher_ord.get(&slot.teacher.id),
            cell_ord.get(&(slot.day, slot.period)),
        ) else {
            continue;
        };
        if instance.forbidden[t].contains(cell) {
            violations.push(Violation {
                constraint: "TeacherUnavailability",
                message: format!(
                    "teacher {} is unavailable at {} P{}",
                    slot.teacher.code, slot.day, slot.period
                ),
            });
        }
    }
    violations
}

/// The lunch period must stay empty.
pub fn check_lunch_period(slots: &[SlotRecord], instance: &ProblemInstance) -> Vec<Violation> {
    let Some(lunch) = instance.lunch_break_period else {
        return Vec::new();
    };
    slots
        .iter()
        .filter(|slot| slot.period == lunch)
        .map(|slot| Violation {
            constraint: "LunchPeriod",
            message: format!(
                "group {} scheduled during lunch at {} P{}",
                slot.group.code, slot.day, slot.period
            ),
        })
        .collect()
}

/// Per-day placement caps for every (group, subject, day).
pub fn check_per_day_caps(slots: &[SlotRecord], instance: &ProblemInstance) -> Vec<Violation> {
    let demand_of: HashMap<_, &Demand> = instance
        .demands
        .iter()
        .map(|d| {
            (
                (instance.groups[d.group].id, instance.subjects[d.subject].id),
                d,
            )
        })
        .collect();

    let mut counts: HashMap<_, u32> = HashMap::new();
    for slot in slots {
        *counts
            .entry((slot.group.id, slot.subject.id, slot.day))
            .or_default() += 1;
    }

    let mut violations = Vec::new();
    for ((group_id, subject_id, day), count) in counts {
        let Some(demand) = demand_of.get(&(group_id, subject_id)) else {
            continue;
        };
        if count > demand.per_day_cap {
            violations.push(Violation {
                constraint: "PerDayCap",
                message: format!(
                    "group {group_id} has {count} hours of subject {subject_id} on {day}, cap is {}",
                    demand.per_day_cap
                ),
            });
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{BitSet, ConsecutiveMode};
    use crate::types::{
        Cell, CourseType, DayOfWeek, GroupId, GroupRef, Preferences, Room, RoomId, RoomRef,
        RoomType, SemesterType, StudentGroup, Subject, SubjectId, SubjectRef, Teacher, TeacherId,
        TeacherRef,
    };

    fn tiny_instance() -> ProblemInstance {
        let cells = vec![
            Cell::new(DayOfWeek::Monday, 1),
            Cell::new(DayOfWeek::Monday, 3),
            Cell::new(DayOfWeek::Monday, 4),
        ];
        ProblemInstance {
            academic_year: "2025-26".to_string(),
            semester_type: SemesterType::Odd,
            days: vec![DayOfWeek::Monday],
            periods_per_day: 4,
            lunch_break_period: Some(2),
            cells,
            teachers: vec![Teacher {
                id: TeacherId(1),
                code: "T-01".to_string(),
                name: "Teacher 1".to_string(),
                department: "CSE".to_string(),
                is_active: true,
            }],
            rooms: vec![Room {
                id: RoomId(1),
                code: "R-01".to_string(),
                name: "Room 1".to_string(),
                capacity: 40,
                room_type: RoomType::Classroom,
                floor: None,
                building: None,
                has_projector: false,
                has_computer: false,
                is_active: true,
            }],
            groups: vec![StudentGroup {
                id: GroupId(1),
                code: "G-01".to_string(),
                name: "Group 1".to_string(),
                strength: 30,
                department: "CSE".to_string(),
                semester: 3,
                academic_year: "2025-26".to_string(),
                is_active: true,
            }],
            subjects: vec![Subject {
                id: SubjectId(1),
                code: "S-01".to_string(),
                name: "Subject 1".to_string(),
                hours_per_week: 2,
                course_type: CourseType::Theory,
                department: "CSE".to_string(),
                semester: 3,
                requires_consecutive_periods: false,
                max_periods_per_day: 2,
                is_active: true,
            }],
            demands: vec![Demand {
                group: 0,
                subject: 0,
                hours: 2,
                per_day_cap: 2,
                consecutive: ConsecutiveMode::Off,
                teachers: vec![0],
                rooms: vec![0],
            }],
            forbidden: vec![BitSet::new(3)],
            preferences: Preferences::default(),
            warnings: Vec::new(),
        }
    }

    fn slot(period: u8) -> SlotRecord {
        SlotRecord {
            day: DayOfWeek::Monday,
            period,
            teacher: TeacherRef {
                id: TeacherId(1),
                code: "T-01".to_string(),
                name: "Teacher 1".to_string(),
            },
            subject: SubjectRef {
                id: SubjectId(1),
                code: "S-01".to_string(),
                name: "Subject 1".to_string(),
                course_type: CourseType::Theory,
            },
            group: GroupRef {
                id: GroupId(1),
                code: "G-01".to_string(),
                name: "Group 1".to_string(),
            },
            room: RoomRef {
                id: RoomId(1),
                code: "R-01".to_string(),
                name: "Room 1".to_string(),
                room_type: RoomType::Classroom,
            },
        }
    }

    #[test]
    fn test_clean_solution_passes() {
        let instance = tiny_instance();
        let slots = vec![slot(1), slot(3)];
        assert!(validate_solution(&slots, &instance).is_empty());
    }

    #[test]
    fn test_detects_group_double_booking() {
        let violations = check_exclusivity(&[slot(1), slot(1)]);
        assert!(violations
            .iter()
            .any(|v| v.constraint == "GroupExclusivity"));
    }

    #[test]
    fn test_detects_lunch_violation() {
        let instance = tiny_instance();
        let violations = check_lunch_period(&[slot(2)], &instance);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint, "LunchPeriod");
    }

    #[test]
    fn test_detects_demand_shortfall() {
        let instance = tiny_instance();
        let violations = check_demand_counts(&[slot(1)], &instance);
        assert!(violations.iter().any(|v| v.constraint == "WeeklyDemand"));
    }

    #[test]
    fn test_detects_forbidden_cell() {
        let mut instance = tiny_instance();
        instance.forbidden[0].insert(0);
        let violations = check_unavailability(&[slot(1)], &instance);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint, "TeacherUnavailability");
    }

    #[test]
    fn test_detects_room_kind_mismatch() {
        let mut instance = tiny_instance();
        instance.subjects[0].course_type = CourseType::Lab;
        let mut bad = slot(1);
        bad.subject.course_type = CourseType::Lab;
        let violations = check_room_suitability(&[bad], &instance);
        assert!(violations.iter().any(|v| v.constraint == "RoomKind"));
    }

    #[test]
    fn test_detects_per_day_cap_breach() {
        let mut instance = tiny_instance();
        instance.demands[0].per_day_cap = 1;
        let violations = check_per_day_caps(&[slot(1), slot(3)], &instance);
        assert!(violations.iter().any(|v| v.constraint == "PerDayCap"));
    }
}
