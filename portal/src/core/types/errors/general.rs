use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneralError {
    #[error("Database connection failed")]
    DbConnectionError,

    #[error("Database query failed: {0}")]
    DbQueryError(#[from] diesel::result::Error),

    #[error("Request state {0} is not configured")]
    MissingState(&'static str),
}
