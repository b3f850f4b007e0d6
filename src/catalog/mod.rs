//! Catalog store: typed persistence for teachers, subjects, rooms, groups,
//! the assignment relations, and the elective tables.
//!
//! Every read copies rows out of the database, so an in-flight generation
//! works on an immutable snapshot and never observes later writes.

mod schema;
mod writer;

use crate::error::{Result, TimetableError};
use crate::types::{
    Cell, CourseType, DayOfWeek, Elective, ElectiveId, GroupId, NewRoom, NewStudentGroup,
    NewSubject, NewTeacher, Room, RoomId, StudentChoice, StudentGroup, Subject, SubjectId,
    Teacher, TeacherId, TeacherUnavailability,
};
use chrono::NaiveDate;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Handle to the catalog database.
///
/// Cheap to clone; clones share the connection pool and the per-partition
/// writer locks.
#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
    partition_locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl CatalogStore {
    /// Open (creating if missing) a catalog database on disk.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Open an in-memory catalog, used by tests and the demo command.
    ///
    /// The pool is pinned to a single never-expiring connection; an
    /// in-memory database vanishes with its connection.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        schema::init(&pool).await?;
        Ok(Self {
            pool,
            partition_locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// One async mutex per (academic_year, semester_type); only one writer
    /// may commit for a given partition at a time.
    pub(crate) fn partition_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.partition_locks.lock().expect("lock registry poisoned");
        locks.entry(key.to_string()).or_default().clone()
    }

    // ---- entity writes ----------------------------------------------------

    pub async fn create_teacher(&self, new: &NewTeacher) -> Result<TeacherId> {
        let result = sqlx::query(
            "INSERT INTO teachers (code, name, department, is_active) VALUES (?1, ?2, ?3, 1)",
        )
        .bind(&new.code)
        .bind(&new.name)
        .bind(&new.department)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, &new.code))?;
        Ok(TeacherId(result.last_insert_rowid()))
    }

    pub async fn create_subject(&self, new: &NewSubject) -> Result<SubjectId> {
        let result = sqlx::query(
            "INSERT INTO subjects \
             (code, name, hours_per_week, course_type, department, semester, \
              requires_consecutive_periods, max_periods_per_day, is_active) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
        )
        .bind(&new.code)
        .bind(&new.name)
        .bind(new.hours_per_week)
        .bind(new.course_type)
        .bind(&new.department)
        .bind(new.semester)
        .bind(new.requires_consecutive_periods)
        .bind(new.max_periods_per_day)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, &new.code))?;
        Ok(SubjectId(result.last_insert_rowid()))
    }

    pub async fn create_room(&self, new: &NewRoom) -> Result<RoomId> {
        let result = sqlx::query(
            "INSERT INTO rooms \
             (code, name, capacity, room_type, floor, building, has_projector, has_computer, is_active) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
        )
        .bind(&new.code)
        .bind(&new.name)
        .bind(new.capacity)
        .bind(new.room_type)
        .bind(new.floor)
        .bind(&new.building)
        .bind(new.has_projector)
        .bind(new.has_computer)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, &new.code))?;
        Ok(RoomId(result.last_insert_rowid()))
    }

    pub async fn create_group(&self, new: &NewStudentGroup) -> Result<GroupId> {
        let result = sqlx::query(
            "INSERT INTO student_groups \
             (code, name, strength, department, semester, academic_year, is_active) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
        )
        .bind(&new.code)
        .bind(&new.name)
        .bind(new.strength)
        .bind(&new.department)
        .bind(new.semester)
        .bind(&new.academic_year)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, &new.code))?;
        Ok(GroupId(result.last_insert_rowid()))
    }

    // ---- relation writes --------------------------------------------------

    /// Declare a teacher eligible to teach a subject. Lower priority wins.
    pub async fn assign_teacher_subject(
        &self,
        teacher_id: TeacherId,
        subject_id: SubjectId,
        priority: u8,
    ) -> Result<()> {
        self.get_teacher(teacher_id).await?;
        self.get_subject(subject_id).await?;
        sqlx::query(
            "INSERT INTO teacher_subject_assignments (teacher_id, subject_id, priority) \
             VALUES (?1, ?2, ?3)",
        )
        .bind(teacher_id)
        .bind(subject_id)
        .bind(priority)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, &format!("{teacher_id}:{subject_id}")))?;
        Ok(())
    }

    /// Declare that a group studies a subject this term.
    pub async fn assign_subject_group(
        &self,
        subject_id: SubjectId,
        group_id: GroupId,
    ) -> Result<()> {
        self.get_subject(subject_id).await?;
        self.get_group(group_id).await?;
        sqlx::query(
            "INSERT INTO subject_class_assignments (subject_id, group_id) VALUES (?1, ?2)",
        )
        .bind(subject_id)
        .bind(group_id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, &format!("{subject_id}:{group_id}")))?;
        Ok(())
    }

    pub async fn add_unavailability(&self, entry: &TeacherUnavailability) -> Result<()> {
        self.get_teacher(entry.teacher_id).await?;
        sqlx::query(
            "INSERT INTO teacher_unavailability \
             (teacher_id, day_of_week, period_number, reason, is_permanent, start_date, end_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(entry.teacher_id)
        .bind(entry.day_of_week)
        .bind(entry.period_number)
        .bind(&entry.reason)
        .bind(entry.is_permanent)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ---- soft deletion ----------------------------------------------------

    pub async fn deactivate_teacher(&self, id: TeacherId) -> Result<()> {
        self.deactivate("teachers", "teacher", id.0).await
    }

    pub async fn deactivate_subject(&self, id: SubjectId) -> Result<()> {
        self.deactivate("subjects", "subject", id.0).await
    }

    pub async fn deactivate_room(&self, id: RoomId) -> Result<()> {
        self.deactivate("rooms", "room", id.0).await
    }

    pub async fn deactivate_group(&self, id: GroupId) -> Result<()> {
        self.deactivate("student_groups", "group", id.0).await
    }

    async fn deactivate(&self, table: &str, entity: &'static str, id: i64) -> Result<()> {
        let sql = format!("UPDATE {table} SET is_active = 0 WHERE id = ?1");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(TimetableError::NotFound {
                entity,
                key: id.to_string(),
            });
        }
        Ok(())
    }

    // ---- point reads ------------------------------------------------------

    pub async fn get_teacher(&self, id: TeacherId) -> Result<Teacher> {
        sqlx::query_as::<_, Teacher>(
            "SELECT id, code, name, department, is_active FROM teachers \
             WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TimetableError::NotFound {
            entity: "teacher",
            key: id.to_string(),
        })
    }

    pub async fn get_subject(&self, id: SubjectId) -> Result<Subject> {
        sqlx::query_as::<_, Subject>(
            "SELECT id, code, name, hours_per_week, course_type, department, semester, \
                    requires_consecutive_periods, max_periods_per_day, is_active \
             FROM subjects WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TimetableError::NotFound {
            entity: "subject",
            key: id.to_string(),
        })
    }

    pub async fn get_room(&self, id: RoomId) -> Result<Room> {
        sqlx::query_as::<_, Room>(
            "SELECT id, code, name, capacity, room_type, floor, building, \
                    has_projector, has_computer, is_active \
             FROM rooms WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TimetableError::NotFound {
            entity: "room",
            key: id.to_string(),
        })
    }

    pub async fn get_group(&self, id: GroupId) -> Result<StudentGroup> {
        sqlx::query_as::<_, StudentGroup>(
            "SELECT id, code, name, strength, department, semester, academic_year, is_active \
             FROM student_groups WHERE id = ?1 AND is_active = 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TimetableError::NotFound {
            entity: "group",
            key: id.to_string(),
        })
    }

    // ---- scheduler reads --------------------------------------------------

    /// Fetch the active groups among `ids`, in the order given.
    ///
    /// Missing or inactive ids are simply absent from the result; preflight
    /// turns the gap into an `InfeasiblePreflight` reason.
    pub async fn list_groups(&self, ids: &[GroupId]) -> Result<Vec<StudentGroup>> {
        let mut groups = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.get_group(id).await {
                Ok(group) => groups.push(group),
                Err(TimetableError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(groups)
    }

    /// Active subjects a group must study this term, in code order.
    pub async fn subjects_of_group(&self, group_id: GroupId) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT s.id, s.code, s.name, s.hours_per_week, s.course_type, s.department, \
                    s.semester, s.requires_consecutive_periods, s.max_periods_per_day, s.is_active \
             FROM subjects s \
             JOIN subject_class_assignments a ON a.subject_id = s.id \
             WHERE a.group_id = ?1 AND s.is_active = 1 \
             ORDER BY s.code",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(subjects)
    }

    /// Active teachers eligible for a subject, ordered by priority then code.
    pub async fn teachers_of_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<(Teacher, u8)>> {
        let rows = sqlx::query(
            "SELECT t.id, t.code, t.name, t.department, t.is_active, a.priority \
             FROM teachers t \
             JOIN teacher_subject_assignments a ON a.teacher_id = t.id \
             WHERE a.subject_id = ?1 AND t.is_active = 1 \
             ORDER BY a.priority, t.code",
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let teacher = Teacher {
                    id: row.try_get("id")?,
                    code: row.try_get("code")?,
                    name: row.try_get("name")?,
                    department: row.try_get("department")?,
                    is_active: row.try_get("is_active")?,
                };
                let priority: u8 = row.try_get("priority")?;
                Ok((teacher, priority))
            })
            .collect::<std::result::Result<_, sqlx::Error>>()
            .map_err(TimetableError::from)
    }

    /// Active rooms able to host `course_type` with at least `min_capacity`
    /// seats, tightest fit first.
    pub async fn rooms_satisfying(
        &self,
        course_type: CourseType,
        min_capacity: u32,
    ) -> Result<Vec<Room>> {
        let kind_clause = if course_type.needs_lab_room() {
            "room_type = 'lab'"
        } else {
            "room_type <> 'lab'"
        };
        let sql = format!(
            "SELECT id, code, name, capacity, room_type, floor, building, \
                    has_projector, has_computer, is_active \
             FROM rooms \
             WHERE is_active = 1 AND capacity >= ?1 AND {kind_clause} \
             ORDER BY capacity, code"
        );
        let rooms = sqlx::query_as::<_, Room>(&sql)
            .bind(min_capacity)
            .fetch_all(&self.pool)
            .await?;
        Ok(rooms)
    }

    /// Cells blocked for a teacher on `reference_date`.
    pub async fn unavailability_of(
        &self,
        teacher_id: TeacherId,
        reference_date: NaiveDate,
    ) -> Result<Vec<Cell>> {
        let rows = sqlx::query(
            "SELECT day_of_week, period_number, reason, is_permanent, start_date, end_date \
             FROM teacher_unavailability WHERE teacher_id = ?1",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        let mut cells = Vec::new();
        for row in rows {
            let day: DayOfWeek = row.try_get("day_of_week")?;
            let entry = TeacherUnavailability {
                teacher_id,
                day_of_week: day,
                period_number: row.try_get("period_number")?,
                reason: row.try_get("reason")?,
                is_permanent: row.try_get("is_permanent")?,
                start_date: row.try_get("start_date")?,
                end_date: row.try_get("end_date")?,
            };
            if entry.blocks_on(reference_date) {
                cells.push(Cell::new(entry.day_of_week, entry.period_number));
            }
        }
        Ok(cells)
    }

    // ---- listing reads ----------------------------------------------------

    pub async fn list_teachers(&self) -> Result<Vec<Teacher>> {
        let teachers = sqlx::query_as::<_, Teacher>(
            "SELECT id, code, name, department, is_active FROM teachers \
             WHERE is_active = 1 ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(teachers)
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, code, name, hours_per_week, course_type, department, semester, \
                    requires_consecutive_periods, max_periods_per_day, is_active \
             FROM subjects WHERE is_active = 1 ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(subjects)
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT id, code, name, capacity, room_type, floor, building, \
                    has_projector, has_computer, is_active \
             FROM rooms WHERE is_active = 1 ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    pub async fn list_all_groups(&self) -> Result<Vec<StudentGroup>> {
        let groups = sqlx::query_as::<_, StudentGroup>(
            "SELECT id, code, name, strength, department, semester, academic_year, is_active \
             FROM student_groups WHERE is_active = 1 ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(groups)
    }

    // ---- elective tables --------------------------------------------------

    pub async fn create_elective(&self, name: &str, capacity: u32) -> Result<ElectiveId> {
        let result = sqlx::query("INSERT INTO electives (name, capacity) VALUES (?1, ?2)")
            .bind(name)
            .bind(capacity)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or_storage(e, name))?;
        Ok(ElectiveId(result.last_insert_rowid()))
    }

    pub async fn list_electives(&self) -> Result<Vec<Elective>> {
        let electives = sqlx::query_as::<_, Elective>(
            "SELECT id, name, capacity FROM electives ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(electives)
    }

    /// Record a student's ordered elective preferences.
    pub async fn record_student_choices(&self, choice: &StudentChoice) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT INTO student_choices (student_id, student_name, cgpa) VALUES (?1, ?2, ?3)",
        )
        .bind(&choice.student_id)
        .bind(&choice.student_name)
        .bind(choice.cgpa)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_or_storage(e, &choice.student_id))?;
        let choice_id = result.last_insert_rowid();

        for (rank, elective_name) in choice.preferences.iter().enumerate() {
            sqlx::query(
                "INSERT INTO student_choice_preferences (choice_id, rank, elective_name) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(choice_id)
            .bind(rank as i64 + 1)
            .bind(elective_name)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// All recorded student choices, preferences in rank order.
    pub async fn list_student_choices(&self) -> Result<Vec<StudentChoice>> {
        let rows = sqlx::query(
            "SELECT c.id, c.student_id, c.student_name, c.cgpa, p.elective_name \
             FROM student_choices c \
             LEFT JOIN student_choice_preferences p ON p.choice_id = c.id \
             ORDER BY c.student_id, p.rank",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut choices: Vec<StudentChoice> = Vec::new();
        for row in rows {
            let student_id: String = row.try_get("student_id")?;
            if choices.last().map(|c| c.student_id.as_str()) != Some(student_id.as_str()) {
                choices.push(StudentChoice {
                    student_id: student_id.clone(),
                    student_name: row.try_get("student_name")?,
                    cgpa: row.try_get("cgpa")?,
                    preferences: Vec::new(),
                });
            }
            let preference: Option<String> = row.try_get("elective_name")?;
            if let Some(name) = preference {
                choices
                    .last_mut()
                    .expect("choice row pushed above")
                    .preferences
                    .push(name);
            }
        }
        Ok(choices)
    }

    /// Atomically replace all stored allocations.
    pub async fn replace_allocations(
        &self,
        allocations: &[(String, ElectiveId, u32)],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM allocated_electives")
            .execute(&mut *tx)
            .await?;
        for (student_id, elective_id, rank) in allocations {
            sqlx::query(
                "INSERT INTO allocated_electives (student_id, elective_id, preference_rank) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(student_id)
            .bind(elective_id)
            .bind(rank)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        tracing::info!(allocations = allocations.len(), "elective allocations replaced");
        Ok(())
    }

    /// Stored allocations as (student_id, elective_id, preference_rank).
    pub async fn list_allocations(&self) -> Result<Vec<(String, ElectiveId, u32)>> {
        let rows = sqlx::query(
            "SELECT student_id, elective_id, preference_rank FROM allocated_electives \
             ORDER BY student_id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| {
                Ok((
                    row.try_get("student_id")?,
                    row.try_get("elective_id")?,
                    row.try_get("preference_rank")?,
                ))
            })
            .collect::<std::result::Result<_, sqlx::Error>>()
            .map_err(TimetableError::from)
    }
}

/// Map a unique-constraint violation to `Conflict`, everything else to
/// `Storage`.
fn conflict_or_storage(err: sqlx::Error, key: &str) -> TimetableError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => TimetableError::Conflict {
            key: key.to_string(),
        },
        _ => TimetableError::Storage(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewRoom, NewTeacher};

    async fn store() -> CatalogStore {
        CatalogStore::open_in_memory().await.expect("open catalog")
    }

    fn teacher(code: &str) -> NewTeacher {
        NewTeacher {
            code: code.to_string(),
            name: format!("Prof. {code}"),
            department: "CSE".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_teacher_code_is_conflict() {
        let store = store().await;
        store.create_teacher(&teacher("CS-RAO")).await.unwrap();
        let err = store.create_teacher(&teacher("CS-RAO")).await.unwrap_err();
        assert!(matches!(err, TimetableError::Conflict { key } if key == "CS-RAO"));
    }

    #[tokio::test]
    async fn test_rooms_satisfying_orders_tightest_fit_first() {
        let store = store().await;
        store
            .create_room(&NewRoom::classroom("R-BIG", "Big Hall", 120))
            .await
            .unwrap();
        store
            .create_room(&NewRoom::classroom("R-SMALL", "Small Room", 45))
            .await
            .unwrap();
        store
            .create_room(&NewRoom::lab("L-1", "CS Lab", 60))
            .await
            .unwrap();

        let rooms = store
            .rooms_satisfying(CourseType::Theory, 40)
            .await
            .unwrap();
        let codes: Vec<_> = rooms.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["R-SMALL", "R-BIG"]);

        let labs = store.rooms_satisfying(CourseType::Lab, 40).await.unwrap();
        let codes: Vec<_> = labs.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["L-1"]);
    }

    #[tokio::test]
    async fn test_rooms_satisfying_filters_capacity() {
        let store = store().await;
        store
            .create_room(&NewRoom::classroom("R-1", "Room 1", 40))
            .await
            .unwrap();
        let rooms = store
            .rooms_satisfying(CourseType::Theory, 55)
            .await
            .unwrap();
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_unavailability_date_window() {
        let store = store().await;
        let id = store.create_teacher(&teacher("CS-RAO")).await.unwrap();

        store
            .add_unavailability(&TeacherUnavailability {
                teacher_id: id,
                day_of_week: DayOfWeek::Monday,
                period_number: 1,
                reason: "department meeting".to_string(),
                is_permanent: true,
                start_date: None,
                end_date: None,
            })
            .await
            .unwrap();
        store
            .add_unavailability(&TeacherUnavailability {
                teacher_id: id,
                day_of_week: DayOfWeek::Tuesday,
                period_number: 2,
                reason: "conference".to_string(),
                is_permanent: false,
                start_date: NaiveDate::from_ymd_opt(2025, 7, 1),
                end_date: NaiveDate::from_ymd_opt(2025, 7, 10),
            })
            .await
            .unwrap();

        let during = store
            .unavailability_of(id, NaiveDate::from_ymd_opt(2025, 7, 5).unwrap())
            .await
            .unwrap();
        assert_eq!(during.len(), 2);

        let after = store
            .unavailability_of(id, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(after, vec![Cell::new(DayOfWeek::Monday, 1)]);
    }

    #[tokio::test]
    async fn test_deactivated_teacher_is_not_found() {
        let store = store().await;
        let id = store.create_teacher(&teacher("CS-RAO")).await.unwrap();
        store.deactivate_teacher(id).await.unwrap();
        let err = store.get_teacher(id).await.unwrap_err();
        assert!(matches!(err, TimetableError::NotFound { entity: "teacher", .. }));
    }

    #[tokio::test]
    async fn test_deactivated_group_disappears_from_scheduler_reads() {
        let store = store().await;
        let id = store
            .create_group(&crate::types::NewStudentGroup {
                code: "CS-3A".to_string(),
                name: "CSE Third Year A".to_string(),
                strength: 30,
                department: "CSE".to_string(),
                semester: 3,
                academic_year: "2025-26".to_string(),
            })
            .await
            .unwrap();
        store.deactivate_group(id).await.unwrap();
        assert!(store.list_groups(&[id]).await.unwrap().is_empty());
        assert!(store.list_all_groups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relation_writes_verify_references() {
        let store = store().await;
        let err = store
            .assign_teacher_subject(TeacherId(99), SubjectId(1), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, TimetableError::NotFound { entity: "teacher", .. }));
    }

    #[tokio::test]
    async fn test_student_choices_round_trip() {
        let store = store().await;
        store
            .record_student_choices(&StudentChoice {
                student_id: "21CS042".to_string(),
                student_name: "Asha Verma".to_string(),
                cgpa: 9.1,
                preferences: vec!["Machine Learning".to_string(), "Cloud Computing".to_string()],
            })
            .await
            .unwrap();

        let choices = store.list_student_choices().await.unwrap();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].preferences.len(), 2);
        assert_eq!(choices[0].preferences[0], "Machine Learning");
    }
}
