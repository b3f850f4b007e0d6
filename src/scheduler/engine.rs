//! Backtracking search over (cell, demand) placements.
//!
//! The engine walks cells in (day, period) order. At every step it either
//! adds one more (teacher, room) assignment to the current cell (demands
//! in fixed order, teachers by priority, rooms tightest-fit first) or,
//! once no further placement fits, moves to the next cell leaving the rest
//! of the cell empty. Gaps are legal; meeting every demand is the only
//! completion criterion. All conflict checks run on dense bitsets compiled
//! into the problem instance.

use super::{CancelFlag, SearchStats, Solution};
use crate::compiler::{BitSet, ConsecutiveMode, ProblemInstance};
use crate::error::{Result, TimetableError};
use crate::types::{GroupRef, RoomRef, SlotRecord, SubjectRef, TeacherRef};

/// One committed assignment inside a cell.
#[derive(Debug, Clone, Copy)]
struct Placement {
    demand: usize,
    teacher: usize,
    room: usize,
}

/// Why the search stopped before finishing.
enum Interrupt {
    Exhausted,
    Cancelled,
}

/// Check the cancellation flag roughly this often.
const CANCEL_CHECK_INTERVAL: u64 = 1000;

pub(super) fn run(
    instance: &ProblemInstance,
    max_iterations: u64,
    cancel: &CancelFlag,
) -> Result<Solution> {
    let mut engine = Engine::new(instance, max_iterations, cancel);
    match engine.solve(0, 0) {
        Ok(true) => {
            let stats = engine.stats();
            tracing::debug!(
                iterations = stats.iterations,
                placed = stats.total_placed,
                "search found a feasible timetable"
            );
            Ok(Solution {
                academic_year: instance.academic_year.clone(),
                semester_type: instance.semester_type,
                slots: engine.collect_slots(),
                stats,
                warnings: instance.warnings.clone(),
            })
        }
        Ok(false) => Err(TimetableError::Unsatisfiable {
            stats: engine.stats(),
        }),
        Err(Interrupt::Exhausted) => Err(TimetableError::Exhausted {
            iterations: engine.iterations,
            stats: engine.stats(),
        }),
        Err(Interrupt::Cancelled) => Err(TimetableError::Cancelled),
    }
}

struct Engine<'a> {
    instance: &'a ProblemInstance,
    max_iterations: u64,
    cancel: &'a CancelFlag,
    /// Day index per cell, precomputed from the instance day list.
    cell_day: Vec<usize>,
    /// Previous cell in the same day iff its period is directly adjacent.
    prev_in_day: Vec<Option<usize>>,
    /// Length of the contiguous same-day period run starting at each cell.
    run_len: Vec<u32>,
    placements: Vec<Vec<Placement>>,
    teacher_busy: Vec<BitSet>,
    group_busy: Vec<BitSet>,
    room_busy: Vec<BitSet>,
    scheduled: Vec<u32>,
    /// Indexed by demand * day count + day index.
    day_count: Vec<u32>,
    iterations: u64,
}

impl<'a> Engine<'a> {
    fn new(instance: &'a ProblemInstance, max_iterations: u64, cancel: &'a CancelFlag) -> Self {
        let num_cells = instance.cells.len();
        let num_days = instance.days.len();

        let cell_day: Vec<usize> = instance
            .cells
            .iter()
            .map(|c| instance.day_index(c.day))
            .collect();

        let mut prev_in_day = vec![None; num_cells];
        for i in 1..num_cells {
            let (prev, cur) = (instance.cells[i - 1], instance.cells[i]);
            if prev.day == cur.day && prev.period + 1 == cur.period {
                prev_in_day[i] = Some(i - 1);
            }
        }

        let mut run_len = vec![1u32; num_cells];
        for i in (0..num_cells.saturating_sub(1)).rev() {
            let (cur, next) = (instance.cells[i], instance.cells[i + 1]);
            if cur.day == next.day && cur.period + 1 == next.period {
                run_len[i] = run_len[i + 1] + 1;
            }
        }

        Self {
            instance,
            max_iterations,
            cancel,
            cell_day,
            prev_in_day,
            run_len,
            placements: vec![Vec::new(); num_cells],
            teacher_busy: vec![BitSet::new(instance.teachers.len()); num_cells],
            group_busy: vec![BitSet::new(instance.groups.len()); num_cells],
            room_busy: vec![BitSet::new(instance.rooms.len()); num_cells],
            scheduled: vec![0; instance.demands.len()],
            day_count: vec![0; instance.demands.len() * num_days],
            iterations: 0,
        }
    }

    /// Try to extend the partial timetable from `cell`, considering demands
    /// from index `from` for this cell.
    fn solve(&mut self, cell: usize, from: usize) -> std::result::Result<bool, Interrupt> {
        self.iterations += 1;
        if self.iterations > self.max_iterations {
            return Err(Interrupt::Exhausted);
        }
        if (from == 0 || self.iterations % CANCEL_CHECK_INTERVAL == 0)
            && self.cancel.is_cancelled()
        {
            return Err(Interrupt::Cancelled);
        }

        let instance = self.instance;
        if cell == instance.cells.len() {
            return Ok(self.demand_met());
        }

        let day = self.cell_day[cell];
        for d_idx in from..instance.demands.len() {
            let demand = &instance.demands[d_idx];
            if self.scheduled[d_idx] >= demand.hours {
                continue;
            }
            if self.group_busy[cell].contains(demand.group) {
                continue;
            }
            if self.day_count[self.day_slot(d_idx, day)] >= demand.per_day_cap {
                continue;
            }
            if demand.consecutive == ConsecutiveMode::Hard && !self.consecutive_ok(cell, d_idx) {
                continue;
            }
            for &teacher in &demand.teachers {
                if self.teacher_busy[cell].contains(teacher) {
                    continue;
                }
                if instance.forbidden[teacher].contains(cell) {
                    continue;
                }
                for &room in &demand.rooms {
                    if self.room_busy[cell].contains(room) {
                        continue;
                    }
                    self.place(cell, d_idx, teacher, room);
                    if self.solve(cell, d_idx + 1)? {
                        return Ok(true);
                    }
                    self.unplace(cell, d_idx, teacher, room);
                }
            }
        }

        // Nothing (more) fits here, or every filled subtree failed: move on
        // with the cell as it stands.
        self.solve(cell + 1, 0)
    }

    fn place(&mut self, cell: usize, d_idx: usize, teacher: usize, room: usize) {
        let demand = &self.instance.demands[d_idx];
        self.placements[cell].push(Placement {
            demand: d_idx,
            teacher,
            room,
        });
        self.teacher_busy[cell].insert(teacher);
        self.group_busy[cell].insert(demand.group);
        self.room_busy[cell].insert(room);
        self.scheduled[d_idx] += 1;
        let slot = self.day_slot(d_idx, self.cell_day[cell]);
        self.day_count[slot] += 1;
    }

    fn unplace(&mut self, cell: usize, d_idx: usize, teacher: usize, room: usize) {
        let popped = self.placements[cell].pop();
        debug_assert!(matches!(popped, Some(p) if p.demand == d_idx));
        let demand = &self.instance.demands[d_idx];
        self.teacher_busy[cell].remove(teacher);
        self.group_busy[cell].remove(demand.group);
        self.room_busy[cell].remove(room);
        self.scheduled[d_idx] -= 1;
        let slot = self.day_slot(d_idx, self.cell_day[cell]);
        self.day_count[slot] -= 1;
    }

    /// Contiguity gate: a hard-consecutive placement must extend the block
    /// in the directly preceding period, or start a block with enough
    /// contiguous periods left in the day.
    fn consecutive_ok(&self, cell: usize, d_idx: usize) -> bool {
        if let Some(prev) = self.prev_in_day[cell] {
            if self.placements[prev].iter().any(|p| p.demand == d_idx) {
                return true;
            }
        }
        let demand = &self.instance.demands[d_idx];
        let remaining = demand.hours - self.scheduled[d_idx];
        let day = self.cell_day[cell];
        let cap_left = demand.per_day_cap - self.day_count[self.day_slot(d_idx, day)];
        let needed = remaining.min(cap_left);
        self.run_len[cell] >= needed
    }

    fn day_slot(&self, d_idx: usize, day: usize) -> usize {
        d_idx * self.instance.days.len() + day
    }

    fn demand_met(&self) -> bool {
        self.instance
            .demands
            .iter()
            .zip(&self.scheduled)
            .all(|(d, &placed)| placed == d.hours)
    }

    fn stats(&self) -> SearchStats {
        let total_placed: u32 = self.scheduled.iter().sum();
        let fully = self
            .instance
            .demands
            .iter()
            .zip(&self.scheduled)
            .filter(|(d, &placed)| placed == d.hours)
            .count() as u32;
        SearchStats::new(
            self.iterations,
            total_placed,
            self.instance.total_demand(),
            fully,
        )
    }

    /// Materialize the committed placements as sorted slot records.
    fn collect_slots(&self) -> Vec<SlotRecord> {
        let instance = self.instance;
        let mut slots = Vec::new();
        for (cell_idx, cell) in instance.cells.iter().enumerate() {
            for placement in &self.placements[cell_idx] {
                let demand = &instance.demands[placement.demand];
                let teacher = &instance.teachers[placement.teacher];
                let subject = &instance.subjects[demand.subject];
                let group = &instance.groups[demand.group];
                let room = &instance.rooms[placement.room];
                slots.push(SlotRecord {
                    day: cell.day,
                    period: cell.period,
                    teacher: TeacherRef {
                        id: teacher.id,
                        code: teacher.code.clone(),
                        name: teacher.name.clone(),
                    },
                    subject: SubjectRef {
                        id: subject.id,
                        code: subject.code.clone(),
                        name: subject.name.clone(),
                        course_type: subject.course_type,
                    },
                    group: GroupRef {
                        id: group.id,
                        code: group.code.clone(),
                        name: group.name.clone(),
                    },
                    room: RoomRef {
                        id: room.id,
                        code: room.code.clone(),
                        name: room.name.clone(),
                        room_type: room.room_type,
                    },
                });
            }
        }
        slots.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        slots
    }
}
