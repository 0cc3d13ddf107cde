pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    #[error("Value of {field} already exists")]
    Conflict { field: String },

    #[error("Invalid order by field: {0}")]
    InvalidOrderByField(String),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Error::StoreUnavailable(e)
            }
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Error::Conflict {
                field: unique_field(db.message()),
            },
            other => Error::DatabaseError(other),
        }
    }
}

// SQLite reports e.g. "UNIQUE constraint failed: book.isbn"
fn unique_field(message: &str) -> String {
    message
        .rsplit_once(':')
        .map(|(_, columns)| columns.trim())
        .and_then(|columns| columns.split(',').next())
        .map(|column| column.rsplit('.').next().unwrap_or(column).trim().to_string())
        .filter(|column| !column.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_field() {
        assert_eq!(unique_field("UNIQUE constraint failed: book.isbn"), "isbn");
        assert_eq!(
            unique_field("UNIQUE constraint failed: book.title, book.author"),
            "title"
        );
        assert_eq!(unique_field("constraint failed"), "unknown");
    }
}
