//! Elective allocator: CGPA-priority greedy matching of students to
//! elective seats.
//!
//! Students are ranked by descending CGPA (ties broken by ascending
//! student id); each student in turn receives the first listed elective
//! with a seat remaining. The stored allocation table is replaced in one
//! transaction.

use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::types::{AllocatedSeat, AllocationOutcome, Elective, StudentChoice};
use std::collections::HashMap;

/// Run the matching on an in-memory snapshot.
///
/// Pure and deterministic; outcomes are returned in allocation (priority)
/// order.
pub fn run_allocation(
    electives: &[Elective],
    students: &[StudentChoice],
) -> Vec<AllocationOutcome> {
    let mut remaining: Vec<u32> = electives.iter().map(|e| e.capacity).collect();
    let by_name: HashMap<&str, usize> = electives
        .iter()
        .enumerate()
        .map(|(idx, e)| (e.name.as_str(), idx))
        .collect();

    let mut order: Vec<&StudentChoice> = students.iter().collect();
    order.sort_by(|a, b| {
        b.cgpa
            .total_cmp(&a.cgpa)
            .then_with(|| a.student_id.cmp(&b.student_id))
    });

    let mut outcomes = Vec::with_capacity(order.len());
    for student in order {
        let seat = student.preferences.iter().enumerate().find_map(|(rank, name)| {
            let &idx = by_name.get(name.as_str())?;
            if remaining[idx] == 0 {
                return None;
            }
            remaining[idx] -= 1;
            Some(AllocatedSeat {
                elective_id: electives[idx].id,
                elective_name: electives[idx].name.clone(),
                preference_rank: rank as u32 + 1,
            })
        });
        outcomes.push(AllocationOutcome {
            student_id: student.student_id.clone(),
            student_name: student.student_name.clone(),
            cgpa: student.cgpa,
            seat,
        });
    }
    outcomes
}

/// Allocate elective seats from the catalog's choice tables and replace
/// the stored allocations atomically.
pub async fn allocate_electives(store: &CatalogStore) -> Result<Vec<AllocationOutcome>> {
    let electives = store.list_electives().await?;
    let students = store.list_student_choices().await?;
    let outcomes = run_allocation(&electives, &students);

    let allocations: Vec<_> = outcomes
        .iter()
        .filter_map(|o| {
            o.seat
                .as_ref()
                .map(|s| (o.student_id.clone(), s.elective_id, s.preference_rank))
        })
        .collect();
    store.replace_allocations(&allocations).await?;

    tracing::info!(
        students = outcomes.len(),
        allocated = allocations.len(),
        "elective allocation completed"
    );
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElectiveId;

    fn elective(id: i64, name: &str, capacity: u32) -> Elective {
        Elective {
            id: ElectiveId(id),
            name: name.to_string(),
            capacity,
        }
    }

    fn student(id: &str, cgpa: f64, preferences: &[&str]) -> StudentChoice {
        StudentChoice {
            student_id: id.to_string(),
            student_name: format!("Student {id}"),
            cgpa,
            preferences: preferences.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_higher_cgpa_wins_contested_seat() {
        let electives = vec![elective(1, "ML", 1), elective(2, "Cloud", 1)];
        let students = vec![
            student("21CS090", 8.0, &["ML", "Cloud"]),
            student("21CS042", 9.5, &["ML", "Cloud"]),
        ];
        let outcomes = run_allocation(&electives, &students);

        assert_eq!(outcomes[0].student_id, "21CS042");
        assert_eq!(outcomes[0].seat.as_ref().unwrap().elective_name, "ML");
        assert_eq!(outcomes[1].seat.as_ref().unwrap().elective_name, "Cloud");
        assert_eq!(outcomes[1].seat.as_ref().unwrap().preference_rank, 2);
    }

    #[test]
    fn test_no_seat_when_every_preference_is_full() {
        let electives = vec![elective(1, "ML", 1)];
        let students = vec![
            student("21CS001", 9.9, &["ML"]),
            student("21CS002", 9.0, &["ML"]),
        ];
        let outcomes = run_allocation(&electives, &students);
        assert!(outcomes[0].is_allocated());
        assert!(!outcomes[1].is_allocated());
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let electives = vec![elective(1, "ML", 2), elective(2, "Cloud", 1)];
        let students: Vec<_> = (0..6)
            .map(|i| student(&format!("21CS{i:03}"), 9.0 - i as f64 * 0.1, &["ML", "Cloud"]))
            .collect();
        let outcomes = run_allocation(&electives, &students);

        for e in &electives {
            let filled = outcomes
                .iter()
                .filter(|o| {
                    o.seat.as_ref().map(|s| s.elective_id) == Some(e.id)
                })
                .count();
            assert!(filled as u32 <= e.capacity);
        }
        assert_eq!(outcomes.iter().filter(|o| o.is_allocated()).count(), 3);
    }

    #[test]
    fn test_cgpa_ties_break_on_student_id() {
        let electives = vec![elective(1, "ML", 1)];
        let students = vec![
            student("21CS090", 9.0, &["ML"]),
            student("21CS042", 9.0, &["ML"]),
        ];
        let outcomes = run_allocation(&electives, &students);
        assert_eq!(outcomes[0].student_id, "21CS042");
        assert!(outcomes[0].is_allocated());
        assert!(!outcomes[1].is_allocated());
    }

    #[test]
    fn test_unknown_preference_names_are_skipped() {
        let electives = vec![elective(1, "ML", 1)];
        let students = vec![student("21CS001", 8.5, &["Quantum Computing", "ML"])];
        let outcomes = run_allocation(&electives, &students);
        let seat = outcomes[0].seat.as_ref().unwrap();
        assert_eq!(seat.elective_name, "ML");
        assert_eq!(seat.preference_rank, 2);
    }

    #[tokio::test]
    async fn test_allocation_round_trips_through_catalog() {
        let store = CatalogStore::open_in_memory().await.unwrap();
        let ml = store.create_elective("ML", 1).await.unwrap();
        store.create_elective("Cloud", 1).await.unwrap();
        store
            .record_student_choices(&student("21CS042", 9.5, &["ML"]))
            .await
            .unwrap();
        store
            .record_student_choices(&student("21CS090", 8.0, &["ML"]))
            .await
            .unwrap();

        let outcomes = allocate_electives(&store).await.unwrap();
        assert_eq!(outcomes.iter().filter(|o| o.is_allocated()).count(), 1);

        let stored = store.list_allocations().await.unwrap();
        assert_eq!(stored, vec![("21CS042".to_string(), ml, 1)]);
    }
}
