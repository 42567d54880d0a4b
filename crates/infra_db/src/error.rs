//! Database errors and their port translation

use thiserror::Error;

use core_kernel::PortError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

/// Failure of a database call
///
/// Constraint variants correspond to the schema's unique emails, unique
/// registrations, owner and event references, and non-empty text checks.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Row not found")]
    RowNotFound,

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// No connection became free within the acquire timeout
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    pub fn is_connection_error(&self) -> bool {
        matches!(self, DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted)
    }
}

impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::RowNotFound,
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some(UNIQUE_VIOLATION) => DatabaseError::DuplicateEntry(message),
                    Some(FOREIGN_KEY_VIOLATION) => DatabaseError::ForeignKeyViolation(message),
                    Some(CHECK_VIOLATION) => DatabaseError::CheckViolation(message),
                    _ => DatabaseError::QueryFailed(message),
                }
            }
            other => DatabaseError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

/// Default translation into the port taxonomy
///
/// Adapters that know which reference failed map foreign key violations
/// themselves before falling back to this.
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::RowNotFound => PortError::not_found("Record", "requested"),
            DatabaseError::DuplicateEntry(msg) => PortError::conflict(msg),
            DatabaseError::CheckViolation(msg) => PortError::validation(msg),
            DatabaseError::ConnectionFailed(msg) => PortError::connection(msg),
            DatabaseError::PoolExhausted => PortError::connection("connection pool exhausted"),
            other => PortError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_translation() {
        assert!(PortError::from(DatabaseError::DuplicateEntry("users_email_key".into())).is_conflict());
        assert!(PortError::from(DatabaseError::PoolExhausted).is_transient());
        assert!(PortError::from(DatabaseError::ConnectionFailed("refused".into())).is_transient());
        assert!(PortError::from(DatabaseError::RowNotFound).is_not_found());
        assert!(matches!(
            PortError::from(DatabaseError::QueryFailed("syntax".into())),
            PortError::Internal { .. }
        ));
    }

    #[test]
    fn test_pool_errors_are_connection_errors() {
        assert!(DatabaseError::from(&sqlx::Error::PoolTimedOut).is_connection_error());
        assert!(DatabaseError::from(sqlx::Error::PoolClosed).is_connection_error());
        assert!(!DatabaseError::from(sqlx::Error::RowNotFound).is_connection_error());
    }
}
