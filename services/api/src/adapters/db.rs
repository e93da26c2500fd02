//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `AttemptStore` port from the `core` crate. It keeps the attempt history
//! in a SQLite table using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_tutor_core::domain::{Attempt, AttemptStatus, Learner, NewAttempt};
use quiz_tutor_core::ports::{AttemptStore, PortError, PortResult};
use sqlx::{migrate::MigrateError, FromRow, SqlitePool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `AttemptStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

// Every column except `created_at` is nullable, matching rows written before
// the service enforced defaults.
#[derive(FromRow)]
struct AttemptRecord {
    id: i64,
    name: Option<String>,
    phone: Option<String>,
    topic: Option<String>,
    status: Option<String>,
    feedback: Option<String>,
    created_at: DateTime<Utc>,
}
impl AttemptRecord {
    fn to_domain(self) -> Attempt {
        Attempt {
            id: self.id,
            learner: Learner::new(self.name, self.phone),
            topic: self.topic.unwrap_or_default(),
            status: AttemptStatus::from_stored(self.status.as_deref().unwrap_or_default()),
            feedback: self.feedback.unwrap_or_default(),
            recorded_at: self.created_at,
        }
    }
}

//=========================================================================================
// `AttemptStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AttemptStore for DbAdapter {
    async fn insert(&self, attempt: NewAttempt) -> PortResult<Attempt> {
        let recorded_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO student_data (name, phone, topic, status, feedback, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&attempt.learner.name)
        .bind(&attempt.learner.phone)
        .bind(&attempt.topic)
        .bind(attempt.status.as_str())
        .bind(&attempt.feedback)
        .bind(recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(Attempt {
            id: result.last_insert_rowid(),
            learner: attempt.learner,
            topic: attempt.topic,
            status: attempt.status,
            feedback: attempt.feedback,
            recorded_at,
        })
    }

    async fn list(&self) -> PortResult<Vec<Attempt>> {
        let records = sqlx::query_as::<_, AttemptRecord>(
            "SELECT id, name, phone, topic, status, feedback, created_at FROM student_data ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let attempts = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        // A single long-lived connection, since every in-memory connection is its own database.
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn memory_store() -> DbAdapter {
        let store = DbAdapter::new(memory_pool().await);
        store.run_migrations().await.unwrap();
        store
    }

    #[tokio::test]
    async fn migrations_can_run_again_on_startup() {
        let store = memory_store().await;
        store.run_migrations().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn migration_failure_surfaces_as_migrate_error() {
        let pool = memory_pool().await;
        pool.close().await;

        let err: ApiError = DbAdapter::new(pool).run_migrations().await.unwrap_err().into();
        assert!(matches!(err, ApiError::Migrate(_)));
    }

    fn attempt(name: &str, topic: &str, status: AttemptStatus, feedback: &str) -> NewAttempt {
        NewAttempt {
            learner: Learner::new(Some(name.to_string()), None),
            topic: topic.to_string(),
            status,
            feedback: feedback.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = memory_store().await;
        let first = store
            .insert(attempt("Asha", "cells", AttemptStatus::Correct, "Good job"))
            .await
            .unwrap();
        let second = store
            .insert(attempt("Ravi", "atoms", AttemptStatus::NeedsReview, "Check protons"))
            .await
            .unwrap();
        assert!(second.id > first.id);
        assert_eq!(first.learner.phone, "Unknown");
    }

    #[tokio::test]
    async fn list_returns_most_recent_first() {
        let store = memory_store().await;
        store
            .insert(attempt("Asha", "cells", AttemptStatus::Correct, "Good job"))
            .await
            .unwrap();
        store
            .insert(attempt("Ravi", "atoms", AttemptStatus::NeedsReview, "Check protons"))
            .await
            .unwrap();

        let attempts = store.list().await.unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].learner.name, "Ravi");
        assert_eq!(attempts[0].status, AttemptStatus::NeedsReview);
        assert_eq!(attempts[0].feedback, "Check protons");
        assert_eq!(attempts[1].topic, "cells");
        assert_eq!(attempts[1].status, AttemptStatus::Correct);
    }

    #[tokio::test]
    async fn legacy_rows_with_nulls_are_readable() {
        let store = memory_store().await;
        sqlx::query(
            "INSERT INTO student_data (name, phone, topic, status, feedback, created_at) VALUES (NULL, NULL, 'ions', 'Needs Review', NULL, ?)",
        )
        .bind(Utc::now())
        .execute(&store.pool)
        .await
        .unwrap();

        let attempts = store.list().await.unwrap();
        assert_eq!(attempts[0].learner, Learner::default());
        assert_eq!(attempts[0].status, AttemptStatus::NeedsReview);
        assert_eq!(attempts[0].feedback, "");
    }
}
