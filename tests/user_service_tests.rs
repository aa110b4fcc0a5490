use liftlink::{
    models::UpdateProfileRequest,
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{UserService, UserServiceError},
    test_utils::test_helpers,
};
use std::sync::Arc;

#[tokio::test]
async fn test_find_or_create_reuses_account() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    let first = service
        .find_or_create_by_email("  Lifter@Example.com ")
        .await
        .unwrap();
    assert_eq!(first.email, "lifter@example.com");
    assert!(first.name.is_none());

    let second = service
        .find_or_create_by_email("lifter@example.com")
        .await
        .unwrap();
    assert_eq!(first.id, second.id);

    let users = service.list_users(10, 0).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_find_or_create_rejects_bad_email() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

    for bad in ["", "no-at-sign", "two@@x.com", "spaces in@x.com", "a@nodot"] {
        let result = service.find_or_create_by_email(bad).await;
        assert!(
            matches!(result, Err(UserServiceError::InvalidEmail)),
            "{:?} should be rejected",
            bad
        );
    }
}

#[tokio::test]
async fn test_concurrent_first_logins_share_one_account() {
    // File-backed so the pool really hands out several connections.
    let (pool, _file) = test_helpers::create_test_db_file().await.unwrap();
    let service = Arc::new(UserService::new(Arc::new(SqliteUserRepository::new(pool))));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.find_or_create_by_email("race@x.com").await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);
}

#[tokio::test]
async fn test_update_profile_name() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));
    let user = service.find_or_create_by_email("a@x.com").await.unwrap();

    let updated = service
        .update_profile(
            &user.id,
            UpdateProfileRequest {
                name: Some("  Sam  ".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Sam"));

    let too_long = service
        .update_profile(
            &user.id,
            UpdateProfileRequest {
                name: Some("x".repeat(51)),
            },
        )
        .await;
    assert!(matches!(too_long, Err(UserServiceError::NameTooLong)));

    let cleared = service
        .update_profile(
            &user.id,
            UpdateProfileRequest {
                name: Some("   ".to_string()),
            },
        )
        .await
        .unwrap();
    assert!(cleared.name.is_none());

    let missing = service
        .update_profile("no-such-user", UpdateProfileRequest { name: None })
        .await;
    assert!(matches!(missing, Err(UserServiceError::UserNotFound)));
}

#[tokio::test]
async fn test_delete_user_removes_owned_routines() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = UserService::new(Arc::new(SqliteUserRepository::new(pool.clone())));

    let user_id = test_helpers::insert_test_user(&pool, "gone@x.com")
        .await
        .unwrap();
    test_helpers::insert_test_routine(&pool, &user_id, "Full body", 3)
        .await
        .unwrap();

    service.delete_user(&user_id).await.unwrap();

    let routines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routines")
        .fetch_one(&pool)
        .await
        .unwrap();
    let exercises: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(routines, 0);
    assert_eq!(exercises, 0);

    assert!(matches!(
        service.delete_user(&user_id).await,
        Err(UserServiceError::UserNotFound)
    ));
    assert!(service
        .find_user_by_email("gone@x.com")
        .await
        .unwrap()
        .is_none());
}
