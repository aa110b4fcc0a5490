use crate::models::{CreateExerciseRequest, Routine};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::exercise_repository::insert_exercises;
use super::{new_id, RepositoryError, RepositoryResult};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RoutineRepository: Send + Sync {
    /// Creates the routine and its exercises in one transaction.
    async fn create(
        &self,
        user_id: &str,
        name: &str,
        exercises: Vec<CreateExerciseRequest>,
    ) -> RepositoryResult<Routine>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Routine>>;
    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Routine>>;
    /// Renames and/or replaces the exercise list in one transaction.
    async fn update(
        &self,
        id: &str,
        name: Option<String>,
        exercises: Option<Vec<CreateExerciseRequest>>,
    ) -> RepositoryResult<Routine>;
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
}

pub struct SqliteRoutineRepository {
    pool: SqlitePool,
}

impl SqliteRoutineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const ROUTINE_COLUMNS: &str = "id, user_id, name, last_completed, created_at, updated_at";

#[async_trait]
impl RoutineRepository for SqliteRoutineRepository {
    async fn create(
        &self,
        user_id: &str,
        name: &str,
        exercises: Vec<CreateExerciseRequest>,
    ) -> RepositoryResult<Routine> {
        let now = Utc::now();
        let routine = Routine {
            id: new_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            last_completed: None,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO routines (id, user_id, name, last_completed, created_at, updated_at)
            VALUES (?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&routine.id)
        .bind(&routine.user_id)
        .bind(&routine.name)
        .bind(routine.created_at)
        .bind(routine.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_exercises(&mut tx, &routine.id, 0, exercises).await?;

        tx.commit().await?;

        Ok(routine)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Routine>> {
        let routine = sqlx::query_as::<_, Routine>(&format!(
            "SELECT {} FROM routines WHERE id = ?",
            ROUTINE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(routine)
    }

    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Routine>> {
        let routines = sqlx::query_as::<_, Routine>(&format!(
            "SELECT {} FROM routines WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            ROUTINE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(routines)
    }

    async fn update(
        &self,
        id: &str,
        name: Option<String>,
        exercises: Option<Vec<CreateExerciseRequest>>,
    ) -> RepositoryResult<Routine> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE routines SET name = COALESCE(?, name), updated_at = ? WHERE id = ?",
        )
        .bind(&name)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        if let Some(exercises) = exercises {
            sqlx::query("DELETE FROM exercises WHERE routine_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_exercises(&mut tx, id, 0, exercises).await?;
        }

        let routine = sqlx::query_as::<_, Routine>(&format!(
            "SELECT {} FROM routines WHERE id = ?",
            ROUTINE_COLUMNS
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(routine)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM routines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{ExerciseRepository, SqliteExerciseRepository};
    use crate::test_utils::{create_test_pool, create_test_user};

    fn exercise(name: &str) -> CreateExerciseRequest {
        CreateExerciseRequest {
            name: name.to_string(),
            sets: 4,
            reps: 8,
            weight: Some(60.0),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_routine_crud() {
        let pool = create_test_pool().await;
        let user_id = create_test_user(&pool, "a@x.com").await.unwrap();
        let repo = SqliteRoutineRepository::new(pool.clone());

        let routine = repo
            .create(&user_id, "Upper", vec![exercise("Row")])
            .await
            .unwrap();
        assert_eq!(routine.name, "Upper");
        assert!(routine.last_completed.is_none());

        let listed = repo.list_by_user(&user_id).await.unwrap();
        assert_eq!(listed.len(), 1);

        let renamed = repo
            .update(&routine.id, Some("Upper A".to_string()), None)
            .await
            .unwrap();
        assert_eq!(renamed.name, "Upper A");

        assert!(repo.delete(&routine.id).await.unwrap());
        assert!(repo.find_by_id(&routine.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_exercises() {
        let pool = create_test_pool().await;
        let user_id = create_test_user(&pool, "a@x.com").await.unwrap();
        let repo = SqliteRoutineRepository::new(pool.clone());
        let exercises = SqliteExerciseRepository::new(pool);

        let routine = repo
            .create(&user_id, "Pull", vec![exercise("Row"), exercise("Curl")])
            .await
            .unwrap();

        repo.update(&routine.id, None, Some(vec![exercise("Chin-up")]))
            .await
            .unwrap();

        let stored = exercises.list_by_routine(&routine.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Chin-up");
        assert_eq!(stored[0].position, 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_exercises() {
        let pool = create_test_pool().await;
        let user_id = create_test_user(&pool, "a@x.com").await.unwrap();
        let repo = SqliteRoutineRepository::new(pool.clone());
        let exercises = SqliteExerciseRepository::new(pool.clone());

        let routine = repo
            .create(&user_id, "Legs", vec![exercise("Squat"), exercise("Lunge")])
            .await
            .unwrap();
        repo.delete(&routine.id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(exercises.list_by_routine(&routine.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_routine() {
        let pool = create_test_pool().await;
        let repo = SqliteRoutineRepository::new(pool);
        let result = repo.update("missing", Some("x".to_string()), None).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
