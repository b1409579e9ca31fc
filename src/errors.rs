use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing required field or duplicate unique value.
    #[error("{0}")]
    Validation(String),

    /// Caller is anonymous or does not own the resource.
    #[error("Access unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Maps SQLite constraint violations to `Validation`, leaving other errors as-is.
    pub fn from_constraint(err: sqlx::Error, message: impl Into<String>) -> AppError {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation() =>
            {
                AppError::Validation(message.into())
            }
            _ => AppError::Database(err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
            return HttpResponse::build(status).body("Something went wrong");
        }
        HttpResponse::build(status).body(self.to_string())
    }
}
