use crate::models::{CompletedExercise, WorkoutRecord};
use async_trait::async_trait;
use sqlx::SqlitePool;

use super::RepositoryResult;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait WorkoutRecordRepository: Send + Sync {
    /// Stores the record with its snapshots and stamps the source routine's
    /// `last_completed` with the record date, all in one transaction.
    async fn create(
        &self,
        record: &WorkoutRecord,
        completed: Vec<CompletedExercise>,
    ) -> RepositoryResult<()>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<WorkoutRecord>>;
    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<WorkoutRecord>>;
    async fn list_completed(&self, record_id: &str) -> RepositoryResult<Vec<CompletedExercise>>;
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
}

pub struct SqliteWorkoutRecordRepository {
    pool: SqlitePool,
}

impl SqliteWorkoutRecordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const RECORD_COLUMNS: &str = "id, user_id, routine_id, routine_name, date, duration, created_at";

#[async_trait]
impl WorkoutRecordRepository for SqliteWorkoutRecordRepository {
    async fn create(
        &self,
        record: &WorkoutRecord,
        completed: Vec<CompletedExercise>,
    ) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO workout_records (id, user_id, routine_id, routine_name, date, duration, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.routine_id)
        .bind(&record.routine_name)
        .bind(record.date)
        .bind(record.duration)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        for snapshot in &completed {
            sqlx::query(
                r#"
                INSERT INTO completed_exercises
                    (id, workout_record_id, exercise_id, position, name, sets, reps, weight)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&snapshot.id)
            .bind(&snapshot.workout_record_id)
            .bind(&snapshot.exercise_id)
            .bind(snapshot.position)
            .bind(&snapshot.name)
            .bind(snapshot.sets)
            .bind(snapshot.reps)
            .bind(snapshot.weight)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(routine_id) = &record.routine_id {
            sqlx::query("UPDATE routines SET last_completed = ?, updated_at = ? WHERE id = ?")
                .bind(record.date)
                .bind(record.created_at)
                .bind(routine_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<WorkoutRecord>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(&format!(
            "SELECT {} FROM workout_records WHERE id = ?",
            RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<WorkoutRecord>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(&format!(
            "SELECT {} FROM workout_records WHERE user_id = ? ORDER BY date DESC, rowid DESC",
            RECORD_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_completed(&self, record_id: &str) -> RepositoryResult<Vec<CompletedExercise>> {
        let completed = sqlx::query_as::<_, CompletedExercise>(
            r#"
            SELECT id, workout_record_id, exercise_id, position, name, sets, reps, weight
            FROM completed_exercises
            WHERE workout_record_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(completed)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM workout_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
