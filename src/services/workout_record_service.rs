use crate::error::{AppError, Result};
use crate::models::{
    CompletedExercise, CreateWorkoutRecordRequest, WorkoutRecord, WorkoutRecordDetail,
};
use crate::repositories::{new_id, ExerciseRepository, RoutineRepository, WorkoutRecordRepository};
use crate::services::ensure_owner;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

pub struct WorkoutRecordService {
    records: Arc<dyn WorkoutRecordRepository>,
    routines: Arc<dyn RoutineRepository>,
    exercises: Arc<dyn ExerciseRepository>,
}

impl WorkoutRecordService {
    pub fn new(
        records: Arc<dyn WorkoutRecordRepository>,
        routines: Arc<dyn RoutineRepository>,
        exercises: Arc<dyn ExerciseRepository>,
    ) -> Self {
        Self {
            records,
            routines,
            exercises,
        }
    }

    async fn owned_record(&self, id: &str, user_id: &str) -> Result<WorkoutRecord> {
        let record = self
            .records
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Workout record not found".to_string()))?;
        ensure_owner(&record.user_id, user_id, "workout record")?;
        Ok(record)
    }

    async fn with_completed(&self, record: WorkoutRecord) -> Result<WorkoutRecordDetail> {
        let completed_exercises = self.records.list_completed(&record.id).await?;
        Ok(WorkoutRecordDetail {
            record,
            completed_exercises,
        })
    }

    /// Logs a session of one of the caller's routines. Each completed exercise is
    /// stored as a copy of the routine's exercise at this moment, so later edits to
    /// the routine leave history untouched.
    pub async fn create_record(
        &self,
        user_id: &str,
        request: CreateWorkoutRecordRequest,
    ) -> Result<WorkoutRecordDetail> {
        if request.duration < 0 {
            return Err(AppError::Validation(
                "Duration must be zero or more".to_string(),
            ));
        }

        let routine = self
            .routines
            .find_by_id(&request.routine_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Routine not found".to_string()))?;
        ensure_owner(&routine.user_id, user_id, "routine")?;

        let available = self.exercises.list_by_routine(&routine.id).await?;
        let record_id = new_id();

        let mut seen = HashSet::new();
        let mut completed = Vec::with_capacity(request.completed_exercises.len());
        for exercise_id in &request.completed_exercises {
            if !seen.insert(exercise_id.as_str()) {
                continue;
            }
            let source = available
                .iter()
                .find(|e| &e.id == exercise_id)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "Exercise {} does not belong to this routine",
                        exercise_id
                    ))
                })?;
            completed.push(CompletedExercise {
                id: new_id(),
                workout_record_id: record_id.clone(),
                exercise_id: source.id.clone(),
                position: completed.len() as i64,
                name: source.name.clone(),
                sets: source.sets,
                reps: source.reps,
                weight: source.weight,
            });
        }

        if let Some(ref sent) = request.routine_name {
            if sent.trim() != routine.name {
                tracing::debug!(
                    "Ignoring client routine name {:?}; stored name is {:?}",
                    sent,
                    routine.name
                );
            }
        }

        let record = WorkoutRecord {
            id: record_id,
            user_id: user_id.to_string(),
            routine_id: Some(routine.id.clone()),
            routine_name: routine.name.clone(),
            date: request.date,
            duration: request.duration,
            created_at: Utc::now(),
        };

        self.records.create(&record, completed.clone()).await?;
        tracing::info!(
            "User {} logged workout {} for routine {}",
            user_id,
            record.id,
            routine.id
        );

        Ok(WorkoutRecordDetail {
            record,
            completed_exercises: completed,
        })
    }

    pub async fn list_records(&self, user_id: &str) -> Result<Vec<WorkoutRecordDetail>> {
        let records = self.records.list_by_user(user_id).await?;
        let mut details = Vec::with_capacity(records.len());
        for record in records {
            details.push(self.with_completed(record).await?);
        }
        Ok(details)
    }

    pub async fn get_record(&self, id: &str, user_id: &str) -> Result<WorkoutRecordDetail> {
        let record = self.owned_record(id, user_id).await?;
        self.with_completed(record).await
    }

    pub async fn delete_record(&self, id: &str, user_id: &str) -> Result<()> {
        self.owned_record(id, user_id).await?;
        if !self.records.delete(id).await? {
            return Err(AppError::NotFound("Workout record not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Exercise, Routine};
    use crate::repositories::exercise_repository::MockExerciseRepository;
    use crate::repositories::routine_repository::MockRoutineRepository;
    use crate::repositories::workout_record_repository::MockWorkoutRecordRepository;

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

    fn exercises() -> Vec<Exercise> {
        vec![
            Exercise {
                id: "e1".to_string(),
                routine_id: "r1".to_string(),
                position: 0,
                name: "Bench".to_string(),
                sets: 3,
                reps: 8,
                weight: Some(60.0),
                notes: None,
            },
            Exercise {
                id: "e2".to_string(),
                routine_id: "r1".to_string(),
                position: 1,
                name: "Dips".to_string(),
                sets: 4,
                reps: 12,
                weight: None,
                notes: None,
            },
        ]
    }

    fn request(completed: &[&str], duration: i64) -> CreateWorkoutRecordRequest {
        CreateWorkoutRecordRequest {
            routine_id: "r1".to_string(),
            routine_name: Some("Whatever the client says".to_string()),
            date: Utc::now(),
            duration,
            completed_exercises: completed.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn service(
        records: MockWorkoutRecordRepository,
        owner: &'static str,
    ) -> WorkoutRecordService {
        let mut routines = MockRoutineRepository::new();
        routines.expect_find_by_id().returning(move |_| {
            let routine = routine(owner);
            Box::pin(async move { Ok(Some(routine)) })
        });
        let mut exercise_repo = MockExerciseRepository::new();
        exercise_repo.expect_list_by_routine().returning(|_| {
            let list = exercises();
            Box::pin(async move { Ok(list) })
        });
        WorkoutRecordService::new(Arc::new(records), Arc::new(routines), Arc::new(exercise_repo))
    }

    #[tokio::test]
    async fn test_create_copies_exercise_values() {
        let mut records = MockWorkoutRecordRepository::new();
        records
            .expect_create()
            .withf(|record: &WorkoutRecord, completed: &Vec<CompletedExercise>| {
                record.routine_name == "Push"
                    && completed.len() == 2
                    && completed[0].exercise_id == "e2"
                    && completed[0].sets == 4
                    && completed[0].reps == 12
                    && completed[1].weight == Some(60.0)
            })
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let detail = service(records, "owner")
            .create_record("owner", request(&["e2", "e1", "e2"], 1800))
            .await
            .expect("Expected Ok result");

        assert_eq!(detail.record.routine_name, "Push");
        assert_eq!(detail.completed_exercises.len(), 2);
        assert_eq!(detail.completed_exercises[0].name, "Dips");
        assert_eq!(detail.completed_exercises[1].position, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_foreign_exercise() {
        let mut records = MockWorkoutRecordRepository::new();
        records.expect_create().never();

        let result = service(records, "owner")
            .create_record("owner", request(&["e1", "not-in-routine"], 60))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_duration() {
        let mut records = MockWorkoutRecordRepository::new();
        records.expect_create().never();

        let result = service(records, "owner")
            .create_record("owner", request(&[], -1))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_for_foreign_routine_is_forbidden() {
        let mut records = MockWorkoutRecordRepository::new();
        records.expect_create().never();

        let result = service(records, "owner")
            .create_record("intruder", request(&["e1"], 60))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_foreign_record_is_forbidden() {
        let mut records = MockWorkoutRecordRepository::new();
        records.expect_find_by_id().returning(|_| {
            let record = WorkoutRecord {
                id: "w1".to_string(),
                user_id: "owner".to_string(),
                routine_id: Some("r1".to_string()),
                routine_name: "Push".to_string(),
                date: Utc::now(),
                duration: 60,
                created_at: Utc::now(),
            };
            Box::pin(async move { Ok(Some(record)) })
        });
        records.expect_list_completed().never();

        let result = service(records, "owner").get_record("w1", "intruder").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
