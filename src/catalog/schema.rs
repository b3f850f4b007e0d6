use crate::error::Result;
use sqlx::SqlitePool;

/// Catalog schema, created on first open.
///
/// `timetable_slots` is keyed by (year, semester, day, period, group) so
/// group exclusivity is enforced by the storage layer itself.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS teachers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT    NOT NULL UNIQUE,
    name        TEXT    NOT NULL,
    department  TEXT    NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS subjects (
    id                           INTEGER PRIMARY KEY AUTOINCREMENT,
    code                         TEXT    NOT NULL UNIQUE,
    name                         TEXT    NOT NULL,
    hours_per_week               INTEGER NOT NULL,
    course_type                  TEXT    NOT NULL,
    department                   TEXT    NOT NULL,
    semester                     INTEGER NOT NULL,
    requires_consecutive_periods INTEGER NOT NULL DEFAULT 0,
    max_periods_per_day          INTEGER NOT NULL DEFAULT 2,
    is_active                    INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS rooms (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    code          TEXT    NOT NULL UNIQUE,
    name          TEXT    NOT NULL,
    capacity      INTEGER NOT NULL,
    room_type     TEXT    NOT NULL,
    floor         INTEGER,
    building      TEXT,
    has_projector INTEGER NOT NULL DEFAULT 0,
    has_computer  INTEGER NOT NULL DEFAULT 0,
    is_active     INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS student_groups (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    code          TEXT    NOT NULL UNIQUE,
    name          TEXT    NOT NULL,
    strength      INTEGER NOT NULL,
    department    TEXT    NOT NULL,
    semester      INTEGER NOT NULL,
    academic_year TEXT    NOT NULL,
    is_active     INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS teacher_subject_assignments (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id INTEGER NOT NULL REFERENCES teachers(id),
    subject_id INTEGER NOT NULL REFERENCES subjects(id),
    priority   INTEGER NOT NULL DEFAULT 1,
    UNIQUE (teacher_id, subject_id)
);

CREATE TABLE IF NOT EXISTS subject_class_assignments (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id INTEGER NOT NULL REFERENCES subjects(id),
    group_id   INTEGER NOT NULL REFERENCES student_groups(id),
    UNIQUE (subject_id, group_id)
);

CREATE TABLE IF NOT EXISTS teacher_unavailability (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id    INTEGER NOT NULL REFERENCES teachers(id),
    day_of_week   INTEGER NOT NULL,
    period_number INTEGER NOT NULL,
    reason        TEXT    NOT NULL DEFAULT '',
    is_permanent  INTEGER NOT NULL DEFAULT 0,
    start_date    TEXT,
    end_date      TEXT
);

CREATE TABLE IF NOT EXISTS timetable_slots (
    academic_year TEXT    NOT NULL,
    semester_type TEXT    NOT NULL,
    day_of_week   INTEGER NOT NULL,
    period_number INTEGER NOT NULL,
    teacher_id    INTEGER NOT NULL REFERENCES teachers(id),
    subject_id    INTEGER NOT NULL REFERENCES subjects(id),
    group_id      INTEGER NOT NULL REFERENCES student_groups(id),
    room_id       INTEGER NOT NULL REFERENCES rooms(id),
    PRIMARY KEY (academic_year, semester_type, day_of_week, period_number, group_id)
);

CREATE TABLE IF NOT EXISTS electives (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT    NOT NULL UNIQUE,
    capacity INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS student_choices (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id   TEXT    NOT NULL UNIQUE,
    student_name TEXT    NOT NULL,
    cgpa         REAL    NOT NULL
);

CREATE TABLE IF NOT EXISTS student_choice_preferences (
    choice_id     INTEGER NOT NULL REFERENCES student_choices(id) ON DELETE CASCADE,
    rank          INTEGER NOT NULL,
    elective_name TEXT    NOT NULL,
    PRIMARY KEY (choice_id, rank)
);

CREATE TABLE IF NOT EXISTS allocated_electives (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id      TEXT    NOT NULL UNIQUE,
    elective_id     INTEGER NOT NULL REFERENCES electives(id),
    preference_rank INTEGER NOT NULL
);
"#;

pub(super) async fn init(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
