//! Event repository implementation
//!
//! Registrations reference events with `ON DELETE CASCADE`, so deleting an
//! event here also removes its registrations in the same statement.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::error::DatabaseError;

/// Database row for the events table
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub date_time: DateTime<Utc>,
    pub user_id: i64,
}

/// Column values for inserting or updating an event
#[derive(Debug, Clone)]
pub struct NewEvent<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub date_time: DateTime<Utc>,
}

/// Repository for event records
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all events ordered by id
    pub async fn list(&self) -> Result<Vec<EventRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, description, location, date_time, user_id
            FROM events
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves an event by id
    pub async fn get_by_id(&self, id: i64) -> Result<Option<EventRow>, DatabaseError> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, description, location, date_time, user_id
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts an event owned by `user_id`
    ///
    /// # Errors
    ///
    /// `DatabaseError::ForeignKeyViolation` when the owner does not exist
    pub async fn insert(&self, user_id: i64, event: NewEvent<'_>) -> Result<EventRow, DatabaseError> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (name, description, location, date_time, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, location, date_time, user_id
            "#,
        )
        .bind(event.name)
        .bind(event.description)
        .bind(event.location)
        .bind(event.date_time)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Replaces the mutable columns of an event
    ///
    /// # Returns
    ///
    /// The updated row, or `None` if no event has this id
    pub async fn update(&self, id: i64, event: NewEvent<'_>) -> Result<Option<EventRow>, DatabaseError> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET name = $1, description = $2, location = $3, date_time = $4
            WHERE id = $5
            RETURNING id, name, description, location, date_time, user_id
            "#,
        )
        .bind(event.name)
        .bind(event.description)
        .bind(event.location)
        .bind(event.date_time)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Deletes an event and, by cascade, its registrations
    ///
    /// # Returns
    ///
    /// Whether a row was deleted
    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Events a user is registered for, in registration order
    pub async fn registered_for_user(&self, user_id: i64) -> Result<Vec<EventRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT e.id, e.name, e.description, e.location, e.date_time, e.user_id
            FROM events e
            JOIN registrations r ON r.event_id = e.id
            WHERE r.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
