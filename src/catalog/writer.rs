//! Timetable writer: atomic replacement of a published timetable
//! partition.
//!
//! A publish deletes the partition's rows and inserts the accepted
//! solution inside one transaction, serialized per partition by a named
//! lock. Failure rolls back and leaves the previous timetable intact.

use super::CatalogStore;
use crate::error::Result;
use crate::scheduler::Solution;
use crate::types::{
    DayOfWeek, GroupId, GroupRef, RoomRef, SemesterType, SlotRecord, SubjectRef, TeacherRef,
};
use sqlx::Row;

fn partition_key(academic_year: &str, semester_type: SemesterType) -> String {
    format!("{academic_year}/{semester_type}")
}

impl CatalogStore {
    /// Atomically replace the stored timetable for the given partition with
    /// `solution`.
    pub async fn publish(
        &self,
        solution: &Solution,
        academic_year: &str,
        semester_type: SemesterType,
    ) -> Result<()> {
        let key = partition_key(academic_year, semester_type);
        let lock = self.partition_lock(&key);
        let _guard = lock.lock().await;

        let mut tx = self.pool().begin().await?;
        sqlx::query(
            "DELETE FROM timetable_slots WHERE academic_year = ?1 AND semester_type = ?2",
        )
        .bind(academic_year)
        .bind(semester_type)
        .execute(&mut *tx)
        .await?;

        for slot in &solution.slots {
            sqlx::query(
                "INSERT INTO timetable_slots \
                 (academic_year, semester_type, day_of_week, period_number, \
                  teacher_id, subject_id, group_id, room_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(academic_year)
            .bind(semester_type)
            .bind(slot.day)
            .bind(slot.period)
            .bind(slot.teacher.id)
            .bind(slot.subject.id)
            .bind(slot.group.id)
            .bind(slot.room.id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!(
            partition = %key,
            slots = solution.slots.len(),
            "timetable published"
        );
        Ok(())
    }

    /// Read the published timetable for a partition, hydrated with entity
    /// codes and names, in (day, period, group code) order.
    pub async fn read_timetable(
        &self,
        academic_year: &str,
        semester_type: SemesterType,
        group_filter: Option<GroupId>,
    ) -> Result<Vec<SlotRecord>> {
        let mut sql = String::from(
            "SELECT s.day_of_week, s.period_number, \
                    t.id AS teacher_id, t.code AS teacher_code, t.name AS teacher_name, \
                    sub.id AS subject_id, sub.code AS subject_code, sub.name AS subject_name, \
                    sub.course_type, \
                    g.id AS group_id, g.code AS group_code, g.name AS group_name, \
                    r.id AS room_id, r.code AS room_code, r.name AS room_name, r.room_type \
             FROM timetable_slots s \
             JOIN teachers t ON t.id = s.teacher_id \
             JOIN subjects sub ON sub.id = s.subject_id \
             JOIN student_groups g ON g.id = s.group_id \
             JOIN rooms r ON r.id = s.room_id \
             WHERE s.academic_year = ?1 AND s.semester_type = ?2",
        );
        if group_filter.is_some() {
            sql.push_str(" AND s.group_id = ?3");
        }
        sql.push_str(" ORDER BY s.day_of_week, s.period_number, g.code");

        let mut query = sqlx::query(&sql).bind(academic_year).bind(semester_type);
        if let Some(group_id) = group_filter {
            query = query.bind(group_id);
        }
        let rows = query.fetch_all(self.pool()).await?;

        rows.into_iter()
            .map(|row| {
                let day: DayOfWeek = row.try_get("day_of_week")?;
                Ok(SlotRecord {
                    day,
                    period: row.try_get("period_number")?,
                    teacher: TeacherRef {
                        id: row.try_get("teacher_id")?,
                        code: row.try_get("teacher_code")?,
                        name: row.try_get("teacher_name")?,
                    },
                    subject: SubjectRef {
                        id: row.try_get("subject_id")?,
                        code: row.try_get("subject_code")?,
                        name: row.try_get("subject_name")?,
                        course_type: row.try_get("course_type")?,
                    },
                    group: GroupRef {
                        id: row.try_get("group_id")?,
                        code: row.try_get("group_code")?,
                        name: row.try_get("group_name")?,
                    },
                    room: RoomRef {
                        id: row.try_get("room_id")?,
                        code: row.try_get("room_code")?,
                        name: row.try_get("room_name")?,
                        room_type: row.try_get("room_type")?,
                    },
                })
            })
            .collect::<std::result::Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }

    /// Delete the published timetable for a partition; returns the number
    /// of removed slots.
    pub async fn clear_timetable(
        &self,
        academic_year: &str,
        semester_type: SemesterType,
    ) -> Result<u64> {
        let key = partition_key(academic_year, semester_type);
        let lock = self.partition_lock(&key);
        let _guard = lock.lock().await;

        let result = sqlx::query(
            "DELETE FROM timetable_slots WHERE academic_year = ?1 AND semester_type = ?2",
        )
        .bind(academic_year)
        .bind(semester_type)
        .execute(self.pool())
        .await?;

        tracing::info!(partition = %key, removed = result.rows_affected(), "timetable cleared");
        Ok(result.rows_affected())
    }
}
