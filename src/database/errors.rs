use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),
    #[error("Query error: {0}")]
    QueryError(String),
    #[error("User not found")]
    UserNotFound,
}

impl From<tokio_postgres::Error> for DatabaseError {
    fn from(e: tokio_postgres::Error) -> Self {
        if e.is_closed() {
            DatabaseError::ConnectionError(e.to_string())
        } else {
            DatabaseError::QueryError(e.to_string())
        }
    }
}
