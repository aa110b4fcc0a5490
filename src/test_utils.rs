pub mod test_helpers {
    use chrono::Utc;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        // A single connection that never recycles, so the in-memory database lives
        // as long as the pool does.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when a test needs more than one connection
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = crate::db::connect(&database_url).await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a test user and return its id
    pub async fn insert_test_user(pool: &SqlitePool, email: &str) -> Result<String, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, name, created_at, updated_at) VALUES (?, ?, NULL, ?, ?)",
        )
        .bind(&id)
        .bind(email)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(id)
    }

    /// Create a test routine with `exercise_count` numbered exercises
    pub async fn insert_test_routine(
        pool: &SqlitePool,
        user_id: &str,
        name: &str,
        exercise_count: usize,
    ) -> Result<String, sqlx::Error> {
        let routine_id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO routines (id, user_id, name, last_completed, created_at, updated_at)
            VALUES (?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&routine_id)
        .bind(user_id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        for position in 0..exercise_count {
            sqlx::query(
                r#"
                INSERT INTO exercises (id, routine_id, position, name, sets, reps, weight, notes)
                VALUES (?, ?, ?, ?, 3, 10, NULL, NULL)
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&routine_id)
            .bind(position as i64)
            .bind(format!("Exercise {}", position + 1))
            .execute(pool)
            .await?;
        }

        Ok(routine_id)
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}

#[cfg(test)]
pub async fn create_test_user(pool: &sqlx::SqlitePool, email: &str) -> Result<String, sqlx::Error> {
    test_helpers::insert_test_user(pool, email).await
}
