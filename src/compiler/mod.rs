//! Constraint compiler: resolves a generation request against a catalog
//! snapshot into a self-contained [`ProblemInstance`].
//!
//! All eligibility, demand and unavailability data is materialized here,
//! once; the search engine never queries the catalog.

mod instance;

pub use instance::*;

use crate::catalog::CatalogStore;
use crate::error::{Result, TimetableError};
use crate::types::{Cell, EngineConfig, GenerationRequest, Room, Subject, Teacher};
use chrono::NaiveDate;
use itertools::Itertools;
use std::collections::HashMap;

/// Compile `request` into a problem instance, running all preflight checks.
///
/// Returns `InfeasiblePreflight` with every collected reason if any check
/// fails; the search engine is never invoked on an instance that did not
/// pass preflight.
pub async fn compile(
    store: &CatalogStore,
    request: &GenerationRequest,
    config: &EngineConfig,
    reference_date: NaiveDate,
) -> Result<ProblemInstance> {
    let mut reasons: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // Request shape first; these fail before any catalog read.
    if request.groups.is_empty() {
        reasons.push("at least one group is required".to_string());
    }
    if !(4..=8).contains(&request.periods_per_day) {
        reasons.push(format!(
            "periods_per_day must be between 4 and 8, got {}",
            request.periods_per_day
        ));
    }
    let days: Vec<_> = config
        .day_order
        .iter()
        .copied()
        .filter(|d| request.days.contains(d))
        .collect();
    if days.is_empty() {
        reasons.push("at least one working day is required".to_string());
    }
    if let Some(lunch) = request.lunch_break_period {
        if lunch == 0 || lunch > request.periods_per_day {
            reasons.push(format!(
                "lunch_break_period {} is outside 1..={}",
                lunch, request.periods_per_day
            ));
        }
    }
    if !reasons.is_empty() {
        return Err(TimetableError::InfeasiblePreflight { reasons });
    }

    // Fillable cells, lexicographic over (day index, period), lunch excluded.
    let mut cells = Vec::new();
    for &day in &days {
        for period in 1..=request.periods_per_day {
            if request.lunch_break_period == Some(period) {
                continue;
            }
            cells.push(Cell::new(day, period));
        }
    }
    let cell_index: HashMap<(u8, u8), usize> = cells
        .iter()
        .enumerate()
        .map(|(i, c)| ((c.day.ordinal(), c.period), i))
        .collect();

    // Groups: every requested id must resolve to an active group.
    let requested_ids: Vec<_> = request.groups.iter().copied().unique().collect();
    let groups = store.list_groups(&requested_ids).await?;
    for &id in &requested_ids {
        if !groups.iter().any(|g| g.id == id) {
            reasons.push(format!("group {id} not found or inactive"));
        }
    }

    // Ordinal tables, deduplicated across demands.
    let mut teachers: Vec<Teacher> = Vec::new();
    let mut teacher_ord: HashMap<i64, usize> = HashMap::new();
    let mut rooms: Vec<Room> = Vec::new();
    let mut room_ord: HashMap<i64, usize> = HashMap::new();
    let mut subjects: Vec<Subject> = Vec::new();
    let mut subject_ord: HashMap<i64, usize> = HashMap::new();
    let mut teachers_of: HashMap<usize, Vec<usize>> = HashMap::new();

    let mut demands: Vec<Demand> = Vec::new();

    for (g_ord, group) in groups.iter().enumerate() {
        let group_subjects = store.subjects_of_group(group.id).await?;
        let mut week_hours: u32 = 0;

        for subject in group_subjects {
            let s_ord = match subject_ord.get(&subject.id.0).copied() {
                Some(ord) => ord,
                None => {
                    let ord = subjects.len();
                    subject_ord.insert(subject.id.0, ord);
                    subjects.push(subject.clone());

                    // Eligible teachers are per subject; resolve them once.
                    let eligible = store.teachers_of_subject(subject.id).await?;
                    if eligible.is_empty() {
                        reasons.push(format!(
                            "subject {} has no eligible teachers",
                            subject.code
                        ));
                    }
                    let mut ordinals = Vec::with_capacity(eligible.len());
                    for (teacher, _priority) in eligible {
                        let t_ord = *teacher_ord.entry(teacher.id.0).or_insert_with(|| {
                            teachers.push(teacher.clone());
                            teachers.len() - 1
                        });
                        ordinals.push(t_ord);
                    }
                    teachers_of.insert(ord, ordinals);
                    ord
                }
            };

            // Eligible rooms depend on both subject kind and group strength.
            let eligible_rooms = store
                .rooms_satisfying(subject.course_type, group.strength)
                .await?;
            if eligible_rooms.is_empty() {
                reasons.push(format!(
                    "no active {} room with capacity >= {} for subject {} / group {}",
                    if subject.course_type.needs_lab_room() {
                        "lab"
                    } else {
                        "non-lab"
                    },
                    group.strength,
                    subject.code,
                    group.code
                ));
            }
            let mut room_ordinals = Vec::with_capacity(eligible_rooms.len());
            for room in eligible_rooms {
                let r_ord = *room_ord.entry(room.id.0).or_insert_with(|| {
                    rooms.push(room.clone());
                    rooms.len() - 1
                });
                room_ordinals.push(r_ord);
            }

            week_hours += u32::from(subject.hours_per_week);
            demands.push(Demand {
                group: g_ord,
                subject: s_ord,
                hours: u32::from(subjects[s_ord].hours_per_week),
                per_day_cap: u32::from(subjects[s_ord].max_periods_per_day),
                consecutive: ConsecutiveMode::Off,
                teachers: teachers_of[&s_ord].clone(),
                rooms: room_ordinals,
            });
        }

        if week_hours as usize > cells.len() {
            reasons.push(format!(
                "group {} demands {} hours but only {} cells are available",
                group.code,
                week_hours,
                cells.len()
            ));
        }
    }

    // Overall capacity: more demanded hours than cells times groups can
    // never fit.
    let total_demand: u32 = demands.iter().map(|d| d.hours).sum();
    if !groups.is_empty() && total_demand as usize > cells.len() * groups.len() {
        reasons.push(format!(
            "total demand of {} hours exceeds capacity of {} cells x {} groups",
            total_demand,
            cells.len(),
            groups.len()
        ));
    }

    // Contiguity: decide hard vs best-effort per demand before search.
    let max_run = max_contiguous_run(&cells);
    if request.preferences.consecutive_labs {
        for demand in &mut demands {
            if !subjects[demand.subject].requires_consecutive_periods {
                continue;
            }
            let needed = demand.hours.min(demand.per_day_cap);
            if needed as usize > max_run {
                demand.consecutive = ConsecutiveMode::BestEffort;
                warnings.push(format!(
                    "consecutive periods for {} relaxed to best effort: no day has {} contiguous periods",
                    subjects[demand.subject].code, needed
                ));
            } else {
                demand.consecutive = ConsecutiveMode::Hard;
            }
        }
    }

    // Teacher unavailability as per-teacher bitsets over cell ordinals.
    let mut forbidden = vec![BitSet::new(cells.len()); teachers.len()];
    for (t_ord, teacher) in teachers.iter().enumerate() {
        for blocked in store.unavailability_of(teacher.id, reference_date).await? {
            if let Some(&cell) = cell_index.get(&(blocked.day.ordinal(), blocked.period)) {
                forbidden[t_ord].insert(cell);
            }
        }
    }

    if !reasons.is_empty() {
        return Err(TimetableError::InfeasiblePreflight { reasons });
    }

    // Fixed demand order: by (group code, subject code).
    demands.sort_by(|a, b| {
        (&groups[a.group].code, &subjects[a.subject].code)
            .cmp(&(&groups[b.group].code, &subjects[b.subject].code))
    });

    tracing::debug!(
        cells = cells.len(),
        demands = demands.len(),
        teachers = teachers.len(),
        rooms = rooms.len(),
        total_demand,
        "problem instance compiled"
    );

    Ok(ProblemInstance {
        academic_year: request.academic_year.clone(),
        semester_type: request.semester_type,
        days,
        periods_per_day: request.periods_per_day,
        lunch_break_period: request.lunch_break_period,
        cells,
        teachers,
        rooms,
        groups,
        subjects,
        demands,
        forbidden,
        preferences: request.preferences,
        warnings,
    })
}

/// Longest run of consecutive periods within a single day of `cells`.
fn max_contiguous_run(cells: &[Cell]) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<Cell> = None;
    for &cell in cells {
        run = match prev {
            Some(p) if p.day == cell.day && p.period + 1 == cell.period => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(cell);
    }
    best
}
