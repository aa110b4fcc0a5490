use crate::error::{AppError, Result};
use crate::models::exercise::clean_notes;
use crate::models::{CreateExerciseRequest, Exercise, Routine, UpdateExerciseRequest};
use crate::repositories::{ExerciseRepository, RoutineRepository};
use crate::services::{ensure_owner, required_text};
use std::sync::Arc;

pub(crate) const MAX_EXERCISE_NAME_CHARS: usize = 100;

/// Checks sets/reps/weight bounds and returns the request with its name trimmed.
pub(crate) fn validate_exercise(request: CreateExerciseRequest) -> Result<CreateExerciseRequest> {
    let name = required_text(&request.name, "Exercise name", MAX_EXERCISE_NAME_CHARS)?;
    check_numbers(request.sets, request.reps, request.weight)?;

    Ok(CreateExerciseRequest {
        name,
        notes: clean_notes(request.notes),
        ..request
    })
}

fn check_numbers(sets: i64, reps: i64, weight: Option<f64>) -> Result<()> {
    if sets < 1 {
        return Err(AppError::Validation("Sets must be at least 1".to_string()));
    }
    if reps < 1 {
        return Err(AppError::Validation("Reps must be at least 1".to_string()));
    }
    if let Some(weight) = weight {
        if !weight.is_finite() || weight < 0.0 {
            return Err(AppError::Validation(
                "Weight must be zero or more".to_string(),
            ));
        }
    }
    Ok(())
}

pub struct ExerciseService {
    exercises: Arc<dyn ExerciseRepository>,
    routines: Arc<dyn RoutineRepository>,
}

impl ExerciseService {
    pub fn new(
        exercises: Arc<dyn ExerciseRepository>,
        routines: Arc<dyn RoutineRepository>,
    ) -> Self {
        Self {
            exercises,
            routines,
        }
    }

    async fn owned_routine(&self, routine_id: &str, user_id: &str) -> Result<Routine> {
        let routine = self
            .routines
            .find_by_id(routine_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Routine not found".to_string()))?;
        ensure_owner(&routine.user_id, user_id, "routine")?;
        Ok(routine)
    }

    async fn owned_exercise(&self, id: &str, user_id: &str) -> Result<Exercise> {
        let exercise = self
            .exercises
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;
        // Exercises carry no owner; the parent routine does.
        self.owned_routine(&exercise.routine_id, user_id)
            .await
            .map_err(|e| match e {
                AppError::Forbidden(_) => {
                    AppError::Forbidden("You do not have access to this exercise".to_string())
                }
                other => other,
            })?;
        Ok(exercise)
    }

    pub async fn list_for_routine(&self, routine_id: &str, user_id: &str) -> Result<Vec<Exercise>> {
        self.owned_routine(routine_id, user_id).await?;
        Ok(self.exercises.list_by_routine(routine_id).await?)
    }

    pub async fn add_exercise(
        &self,
        routine_id: &str,
        user_id: &str,
        request: CreateExerciseRequest,
    ) -> Result<Exercise> {
        self.owned_routine(routine_id, user_id).await?;
        let request = validate_exercise(request)?;
        Ok(self.exercises.append(routine_id, request).await?)
    }

    pub async fn get_exercise(&self, id: &str, user_id: &str) -> Result<Exercise> {
        self.owned_exercise(id, user_id).await
    }

    pub async fn update_exercise(
        &self,
        id: &str,
        user_id: &str,
        request: UpdateExerciseRequest,
    ) -> Result<Exercise> {
        let mut exercise = self.owned_exercise(id, user_id).await?;

        exercise.apply(request);
        exercise.name = required_text(&exercise.name, "Exercise name", MAX_EXERCISE_NAME_CHARS)?;
        check_numbers(exercise.sets, exercise.reps, exercise.weight)?;

        self.exercises.update(&exercise).await?;
        Ok(exercise)
    }

    pub async fn delete_exercise(&self, id: &str, user_id: &str) -> Result<()> {
        self.owned_exercise(id, user_id).await?;
        if !self.exercises.delete(id).await? {
            return Err(AppError::NotFound("Exercise not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn exercise() -> Exercise {
        Exercise {
            id: "e1".to_string(),
            routine_id: "r1".to_string(),
            position: 0,
            name: "Bench".to_string(),
            sets: 3,
            reps: 8,
            weight: Some(60.0),
            notes: None,
        }
    }

    fn request(name: &str, sets: i64, reps: i64, weight: Option<f64>) -> CreateExerciseRequest {
        CreateExerciseRequest {
            name: name.to_string(),
            sets,
            reps,
            weight,
            notes: None,
        }
    }

    fn routines_owned_by(owner: &'static str) -> MockRoutineRepository {
        let mut routines = MockRoutineRepository::new();
        routines.expect_find_by_id().returning(move |_| {
            let routine = routine(owner);
            Box::pin(async move { Ok(Some(routine)) })
        });
        routines
    }

    #[test]
    fn test_validate_exercise_bounds() {
        assert!(validate_exercise(request("Squat", 5, 5, Some(0.0))).is_ok());
        assert!(validate_exercise(request("", 5, 5, None)).is_err());
        assert!(validate_exercise(request("Squat", 0, 5, None)).is_err());
        assert!(validate_exercise(request("Squat", 5, 0, None)).is_err());
        assert!(validate_exercise(request("Squat", 5, 5, Some(-1.0))).is_err());
        assert!(validate_exercise(request(&"x".repeat(101), 5, 5, None)).is_err());
    }

    #[tokio::test]
    async fn test_add_exercise_to_foreign_routine_is_forbidden() {
        let mut exercises = MockExerciseRepository::new();
        exercises.expect_append().never();

        let service = ExerciseService::new(
            Arc::new(exercises),
            Arc::new(routines_owned_by("owner")),
        );

        let result = service
            .add_exercise("r1", "intruder", request("Squat", 5, 5, None))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_add_exercise_to_missing_routine() {
        let mut routines = MockRoutineRepository::new();
        routines
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let service =
            ExerciseService::new(Arc::new(MockExerciseRepository::new()), Arc::new(routines));

        let result = service
            .add_exercise("missing", "owner", request("Squat", 5, 5, None))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_exercise_applies_and_validates() {
        let mut exercises = MockExerciseRepository::new();
        exercises.expect_find_by_id().returning(|_| {
            let exercise = exercise();
            Box::pin(async move { Ok(Some(exercise)) })
        });
        exercises
            .expect_update()
            .withf(|e: &Exercise| e.reps == 5 && e.sets == 3)
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let service = ExerciseService::new(
            Arc::new(exercises),
            Arc::new(routines_owned_by("owner")),
        );

        let updated = service
            .update_exercise(
                "e1",
                "owner",
                UpdateExerciseRequest {
                    reps: Some(5),
                    ..Default::default()
                },
            )
            .await
            .expect("Expected Ok result");
        assert_eq!(updated.reps, 5);

        let invalid = service
            .update_exercise(
                "e1",
                "owner",
                UpdateExerciseRequest {
                    sets: Some(0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(invalid, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_foreign_exercise_is_forbidden() {
        let mut exercises = MockExerciseRepository::new();
        exercises.expect_find_by_id().returning(|_| {
            let exercise = exercise();
            Box::pin(async move { Ok(Some(exercise)) })
        });
        exercises.expect_delete().never();

        let service = ExerciseService::new(
            Arc::new(exercises),
            Arc::new(routines_owned_by("owner")),
        );

        let result = service.delete_exercise("e1", "intruder").await;
        assert!(matches!(result, Err(AppError::Forbidden(msg)) if msg.contains("exercise")));
    }

    #[tokio::test]
    async fn test_delete_exercise() {
        let mut exercises = MockExerciseRepository::new();
        exercises.expect_find_by_id().returning(|_| {
            let exercise = exercise();
            Box::pin(async move { Ok(Some(exercise)) })
        });
        exercises
            .expect_delete()
            .with(eq("e1"))
            .times(1)
            .returning(|_| Box::pin(async { Ok(true) }));

        let service = ExerciseService::new(
            Arc::new(exercises),
            Arc::new(routines_owned_by("owner")),
        );
        assert!(service.delete_exercise("e1", "owner").await.is_ok());
    }
}
