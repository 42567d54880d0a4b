//! Registration repository implementation

use sqlx::{FromRow, PgPool};

use crate::error::DatabaseError;

/// Database row for the registrations table
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
}

/// Repository for registration records
///
/// The `(user_id, event_id)` unique constraint is the source of truth for
/// duplicate registrations; concurrent inserts of the same pair leave
/// exactly one row.
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a registration
    ///
    /// # Errors
    ///
    /// * `DatabaseError::DuplicateEntry` - the pair already exists
    /// * `DatabaseError::ForeignKeyViolation` - the user or event does not exist
    pub async fn insert(&self, user_id: i64, event_id: i64) -> Result<RegistrationRow, DatabaseError> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            INSERT INTO registrations (user_id, event_id)
            VALUES ($1, $2)
            RETURNING id, user_id, event_id
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Deletes a registration
    ///
    /// # Returns
    ///
    /// Whether a row was deleted
    pub async fn delete(&self, user_id: i64, event_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM registrations WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
