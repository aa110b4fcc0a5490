use crate::error::{AppError, Result};
use crate::models::{CreateRoutineRequest, Routine, RoutineDetail, UpdateRoutineRequest};
use crate::repositories::{ExerciseRepository, RoutineRepository};
use crate::services::exercise_service::validate_exercise;
use crate::services::{ensure_owner, required_text};
use std::sync::Arc;

const MAX_ROUTINE_NAME_CHARS: usize = 100;

pub struct RoutineService {
    routines: Arc<dyn RoutineRepository>,
    exercises: Arc<dyn ExerciseRepository>,
}

impl RoutineService {
    pub fn new(
        routines: Arc<dyn RoutineRepository>,
        exercises: Arc<dyn ExerciseRepository>,
    ) -> Self {
        Self {
            routines,
            exercises,
        }
    }

    async fn owned_routine(&self, id: &str, user_id: &str) -> Result<Routine> {
        let routine = self
            .routines
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Routine not found".to_string()))?;
        ensure_owner(&routine.user_id, user_id, "routine")?;
        Ok(routine)
    }

    async fn with_exercises(&self, routine: Routine) -> Result<RoutineDetail> {
        let exercises = self.exercises.list_by_routine(&routine.id).await?;
        Ok(RoutineDetail { routine, exercises })
    }

    pub async fn list_routines(&self, user_id: &str) -> Result<Vec<RoutineDetail>> {
        let routines = self.routines.list_by_user(user_id).await?;
        let mut details = Vec::with_capacity(routines.len());
        for routine in routines {
            details.push(self.with_exercises(routine).await?);
        }
        Ok(details)
    }

    pub async fn get_routine(&self, id: &str, user_id: &str) -> Result<RoutineDetail> {
        let routine = self.owned_routine(id, user_id).await?;
        self.with_exercises(routine).await
    }

    pub async fn create_routine(
        &self,
        user_id: &str,
        request: CreateRoutineRequest,
    ) -> Result<RoutineDetail> {
        let name = required_text(&request.name, "Routine name", MAX_ROUTINE_NAME_CHARS)?;
        let exercises = request
            .exercises
            .into_iter()
            .map(validate_exercise)
            .collect::<Result<Vec<_>>>()?;

        let routine = self.routines.create(user_id, &name, exercises).await?;
        tracing::info!("User {} created routine {}", user_id, routine.id);
        self.with_exercises(routine).await
    }

    /// Renames the routine; a present `exercises` list replaces the current one wholesale.
    pub async fn update_routine(
        &self,
        id: &str,
        user_id: &str,
        request: UpdateRoutineRequest,
    ) -> Result<RoutineDetail> {
        self.owned_routine(id, user_id).await?;

        let name = request
            .name
            .map(|n| required_text(&n, "Routine name", MAX_ROUTINE_NAME_CHARS))
            .transpose()?;
        let exercises = request
            .exercises
            .map(|list| {
                list.into_iter()
                    .map(validate_exercise)
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let routine = self.routines.update(id, name, exercises).await?;
        self.with_exercises(routine).await
    }

    pub async fn delete_routine(&self, id: &str, user_id: &str) -> Result<()> {
        self.owned_routine(id, user_id).await?;
        if !self.routines.delete(id).await? {
            return Err(AppError::NotFound("Routine not found".to_string()));
        }
        tracing::info!("User {} deleted routine {}", user_id, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateExerciseRequest, Exercise};
    use crate::repositories::exercise_repository::MockExerciseRepository;
    use crate::repositories::routine_repository::MockRoutineRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn routine(owner: &str) -> Routine {
        Routine {
            id: "r1".to_string(),
            user_id: owner.to_string(),
            name: "Push".to_string(),
            last_completed: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn exercise_request(name: &str, sets: i64) -> CreateExerciseRequest {
        CreateExerciseRequest {
            name: name.to_string(),
            sets,
            reps: 10,
            weight: None,
            notes: None,
        }
    }

    fn no_exercises() -> MockExerciseRepository {
        let mut exercises = MockExerciseRepository::new();
        exercises
            .expect_list_by_routine()
            .returning(|_| Box::pin(async { Ok(Vec::<Exercise>::new()) }));
        exercises
    }

    #[tokio::test]
    async fn test_create_routine_trims_name() {
        let mut routines = MockRoutineRepository::new();
        routines
            .expect_create()
            .withf(|user_id: &str, name: &str, exercises: &Vec<CreateExerciseRequest>| {
                user_id == "owner" && name == "Leg day" && exercises.len() == 1
            })
            .times(1)
            .returning(|user_id, name, _| {
                let mut routine = routine(user_id);
                routine.name = name.to_string();
                Box::pin(async move { Ok(routine) })
            });

        let service = RoutineService::new(Arc::new(routines), Arc::new(no_exercises()));

        let detail = service
            .create_routine(
                "owner",
                CreateRoutineRequest {
                    name: "  Leg day ".to_string(),
                    exercises: vec![exercise_request("Squat", 5)],
                },
            )
            .await
            .expect("Expected Ok result");
        assert_eq!(detail.routine.name, "Leg day");
    }

    #[tokio::test]
    async fn test_create_routine_rejects_invalid_exercise() {
        let mut routines = MockRoutineRepository::new();
        routines.expect_create().never();

        let service = RoutineService::new(Arc::new(routines), Arc::new(no_exercises()));

        let result = service
            .create_routine(
                "owner",
                CreateRoutineRequest {
                    name: "Leg day".to_string(),
                    exercises: vec![exercise_request("Squat", 0)],
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_foreign_routine_is_forbidden() {
        let mut routines = MockRoutineRepository::new();
        routines.expect_find_by_id().returning(|_| {
            let routine = routine("owner");
            Box::pin(async move { Ok(Some(routine)) })
        });

        let service = RoutineService::new(Arc::new(routines), Arc::new(no_exercises()));

        let result = service.get_routine("r1", "intruder").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_missing_routine() {
        let mut routines = MockRoutineRepository::new();
        routines
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let service = RoutineService::new(Arc::new(routines), Arc::new(no_exercises()));

        let result = service.get_routine("missing", "owner").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_without_exercises_keeps_them() {
        let mut routines = MockRoutineRepository::new();
        routines.expect_find_by_id().returning(|_| {
            let routine = routine("owner");
            Box::pin(async move { Ok(Some(routine)) })
        });
        routines
            .expect_update()
            .with(eq("r1"), eq(Some("Pull".to_string())), eq(None))
            .times(1)
            .returning(|_, _, _| {
                let mut routine = routine("owner");
                routine.name = "Pull".to_string();
                Box::pin(async move { Ok(routine) })
            });

        let service = RoutineService::new(Arc::new(routines), Arc::new(no_exercises()));

        let detail = service
            .update_routine(
                "r1",
                "owner",
                UpdateRoutineRequest {
                    name: Some("Pull".to_string()),
                    exercises: None,
                },
            )
            .await
            .expect("Expected Ok result");
        assert_eq!(detail.routine.name, "Pull");
    }

    #[tokio::test]
    async fn test_delete_foreign_routine_is_forbidden() {
        let mut routines = MockRoutineRepository::new();
        routines.expect_find_by_id().returning(|_| {
            let routine = routine("owner");
            Box::pin(async move { Ok(Some(routine)) })
        });
        routines.expect_delete().never();

        let service = RoutineService::new(Arc::new(routines), Arc::new(no_exercises()));

        let result = service.delete_routine("r1", "intruder").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
