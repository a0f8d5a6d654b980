use thiserror::Error;

use crate::calendar::CalendarError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Error {operation}: {source}")]
    Calendar {
        operation: String,
        #[source]
        source: CalendarError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth<S: Into<String>>(msg: S) -> Self {
        Self::Auth(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn calendar<S: Into<String>>(operation: S, source: CalendarError) -> Self {
        Self::Calendar {
            operation: operation.into(),
            source,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
