use campus_timetabler::compiler::{BitSet, ConsecutiveMode, Demand, ProblemInstance};
use campus_timetabler::scheduler::{solve, CancelFlag};
use campus_timetabler::types::{
    Cell, CourseType, DayOfWeek, EngineConfig, GroupId, Preferences, Room, RoomId, RoomType,
    SemesterType, StudentGroup, Subject, SubjectId, Teacher, TeacherId, DAY_ORDER,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// Two parallel groups, five subjects each, a full five-day week.
fn departmental_instance() -> ProblemInstance {
    let days: Vec<DayOfWeek> = DAY_ORDER[..5].to_vec();
    let periods_per_day = 6u8;
    let lunch = Some(4u8);

    let mut cells = Vec::new();
    for &day in &days {
        for period in 1..=periods_per_day {
            if lunch == Some(period) {
                continue;
            }
            cells.push(Cell::new(day, period));
        }
    }

    let teachers: Vec<Teacher> = (0..4)
        .map(|i| Teacher {
            id: TeacherId(i + 1),
            code: format!("T-{i:02}"),
            name: format!("Teacher {i}"),
            department: "CSE".to_string(),
            is_active: true,
        })
        .collect();
    let rooms: Vec<Room> = (0..3)
        .map(|i| Room {
            id: RoomId(i + 1),
            code: format!("R-{i:02}"),
            name: format!("Room {i}"),
            capacity: 60,
            room_type: RoomType::Classroom,
            floor: None,
            building: None,
            has_projector: false,
            has_computer: false,
            is_active: true,
        })
        .collect();
    let groups: Vec<StudentGroup> = (0..2)
        .map(|i| StudentGroup {
            id: GroupId(i + 1),
            code: format!("G-{i:02}"),
            name: format!("Group {i}"),
            strength: 55,
            department: "CSE".to_string(),
            semester: 3,
            academic_year: "2025-26".to_string(),
            is_active: true,
        })
        .collect();
    let subjects: Vec<Subject> = (0..5)
        .map(|i| Subject {
            id: SubjectId(i + 1),
            code: format!("S-{i:02}"),
            name: format!("Subject {i}"),
            hours_per_week: 3,
            course_type: CourseType::Theory,
            department: "CSE".to_string(),
            semester: 3,
            requires_consecutive_periods: false,
            max_periods_per_day: 2,
            is_active: true,
        })
        .collect();

    let mut demands = Vec::new();
    for g in 0..groups.len() {
        for s in 0..subjects.len() {
            demands.push(Demand {
                group: g,
                subject: s,
                hours: 3,
                per_day_cap: 2,
                consecutive: ConsecutiveMode::Off,
                teachers: (0..teachers.len()).collect(),
                rooms: (0..rooms.len()).collect(),
            });
        }
    }

    let forbidden = vec![BitSet::new(cells.len()); teachers.len()];
    ProblemInstance {
        academic_year: "2025-26".to_string(),
        semester_type: SemesterType::Odd,
        days,
        periods_per_day,
        lunch_break_period: lunch,
        cells,
        teachers,
        rooms,
        groups,
        subjects,
        demands,
        forbidden,
        preferences: Preferences::default(),
        warnings: Vec::new(),
    }
}

fn bench_search(c: &mut Criterion) {
    let instance = departmental_instance();
    let config = EngineConfig::default();
    let cancel = CancelFlag::new();

    c.bench_function("solve_departmental_week", |b| {
        b.iter(|| solve(black_box(&instance), &config, &cancel).unwrap())
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
