use crate::models::{CreateExerciseRequest, Exercise};
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{new_id, RepositoryError, RepositoryResult};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ExerciseRepository: Send + Sync {
    async fn list_by_routine(&self, routine_id: &str) -> RepositoryResult<Vec<Exercise>>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Exercise>>;
    /// Adds an exercise after the routine's current last one.
    async fn append(
        &self,
        routine_id: &str,
        exercise: CreateExerciseRequest,
    ) -> RepositoryResult<Exercise>;
    async fn update(&self, exercise: &Exercise) -> RepositoryResult<()>;
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
}

pub struct SqliteExerciseRepository {
    pool: SqlitePool,
}

impl SqliteExerciseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(crate) const EXERCISE_COLUMNS: &str =
    "id, routine_id, position, name, sets, reps, weight, notes";

/// Inserts `exercises` under `routine_id`, numbering positions from `first_position`.
pub(crate) async fn insert_exercises(
    tx: &mut Transaction<'_, Sqlite>,
    routine_id: &str,
    first_position: i64,
    exercises: Vec<CreateExerciseRequest>,
) -> Result<Vec<Exercise>, sqlx::Error> {
    let mut inserted = Vec::with_capacity(exercises.len());

    for (offset, request) in exercises.into_iter().enumerate() {
        let exercise = Exercise {
            id: new_id(),
            routine_id: routine_id.to_string(),
            position: first_position + offset as i64,
            name: request.name.trim().to_string(),
            sets: request.sets,
            reps: request.reps,
            weight: request.weight,
            notes: request.notes,
        };

        sqlx::query(
            r#"
            INSERT INTO exercises (id, routine_id, position, name, sets, reps, weight, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&exercise.id)
        .bind(&exercise.routine_id)
        .bind(exercise.position)
        .bind(&exercise.name)
        .bind(exercise.sets)
        .bind(exercise.reps)
        .bind(exercise.weight)
        .bind(&exercise.notes)
        .execute(&mut **tx)
        .await?;

        inserted.push(exercise);
    }

    Ok(inserted)
}

#[async_trait]
impl ExerciseRepository for SqliteExerciseRepository {
    async fn list_by_routine(&self, routine_id: &str) -> RepositoryResult<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {} FROM exercises WHERE routine_id = ? ORDER BY position ASC",
            EXERCISE_COLUMNS
        ))
        .bind(routine_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {} FROM exercises WHERE id = ?",
            EXERCISE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exercise)
    }

    async fn append(
        &self,
        routine_id: &str,
        exercise: CreateExerciseRequest,
    ) -> RepositoryResult<Exercise> {
        let mut tx = self.pool.begin().await?;

        let next_position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM exercises WHERE routine_id = ?",
        )
        .bind(routine_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut inserted =
            insert_exercises(&mut tx, routine_id, next_position, vec![exercise]).await?;
        tx.commit().await?;

        inserted.pop().ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, exercise: &Exercise) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE exercises
            SET name = ?, sets = ?, reps = ?, weight = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(&exercise.name)
        .bind(exercise.sets)
        .bind(exercise.reps)
        .bind(exercise.weight)
        .bind(&exercise.notes)
        .bind(&exercise.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
