//! Solution reporting: the JSON wire format and human-readable views.

use crate::scheduler::Solution;
use crate::types::SlotRecord;
use itertools::Itertools;
use std::fmt::Write;

/// Serialize slots in the wire format: a JSON array of
/// `{day, period, teacher, subject, group, room}` objects.
pub fn to_wire_json(slots: &[SlotRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(slots)
}

/// Per-group timetable listing, one line per slot.
pub fn render_timetable(slots: &[SlotRecord]) -> String {
    let mut out = String::new();
    let by_group = slots
        .iter()
        .into_group_map_by(|slot| slot.group.code.clone());

    for group_code in by_group.keys().sorted() {
        let group_slots = &by_group[group_code];
        let group = &group_slots[0].group;
        let _ = writeln!(out, "Timetable for {} ({})", group.code, group.name);

        for slot in group_slots
            .iter()
            .sorted_by_key(|s| (s.day.ordinal(), s.period))
        {
            let _ = writeln!(
                out,
                "  {:<9} P{}  {} {} -> {} @ {}",
                slot.day.name(),
                slot.period,
                slot.subject.code,
                slot.subject.name,
                slot.teacher.name,
                slot.room.code
            );
        }
        out.push('\n');
    }
    out
}

/// One-paragraph summary of a generation run.
pub fn render_summary(solution: &Solution) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Generated {} slots for {} ({} semester)",
        solution.slots.len(),
        solution.academic_year,
        solution.semester_type
    );
    let _ = writeln!(
        out,
        "  {} of {} weekly hours placed ({:.1}%), {} demands fully scheduled",
        solution.stats.total_placed,
        solution.stats.total_demand,
        solution.stats.completion_percentage,
        solution.stats.subjects_fully_scheduled
    );
    let _ = writeln!(out, "  search iterations: {}", solution.stats.iterations);
    for warning in &solution.warnings {
        let _ = writeln!(out, "  warning: {warning}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CourseType, DayOfWeek, GroupId, GroupRef, RoomId, RoomRef, RoomType, SlotRecord,
        SubjectId, SubjectRef, TeacherId, TeacherRef,
    };

    fn slot(day: DayOfWeek, period: u8, group_code: &str) -> SlotRecord {
        SlotRecord {
            day,
            period,
            teacher: TeacherRef {
                id: TeacherId(1),
                code: "CS-RAO".to_string(),
                name: "Dr. Rao".to_string(),
            },
            subject: SubjectRef {
                id: SubjectId(1),
                code: "CS301".to_string(),
                name: "Operating Systems".to_string(),
                course_type: CourseType::Theory,
            },
            group: GroupRef {
                id: GroupId(1),
                code: group_code.to_string(),
                name: format!("Group {group_code}"),
            },
            room: RoomRef {
                id: RoomId(1),
                code: "B2-104".to_string(),
                name: "Block 2 Room 104".to_string(),
                room_type: RoomType::Classroom,
            },
        }
    }

    #[test]
    fn test_wire_json_is_an_array_of_slot_objects() {
        let json = to_wire_json(&[slot(DayOfWeek::Monday, 1, "CS-3A")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["teacher"]["code"], "CS-RAO");
        assert_eq!(value[0]["subject"]["type"], "theory");
    }

    #[test]
    fn test_render_groups_sorted_by_code() {
        let rendered = render_timetable(&[
            slot(DayOfWeek::Monday, 1, "CS-3B"),
            slot(DayOfWeek::Monday, 1, "CS-3A"),
        ]);
        let a = rendered.find("CS-3A").unwrap();
        let b = rendered.find("CS-3B").unwrap();
        assert!(a < b);
    }
}
