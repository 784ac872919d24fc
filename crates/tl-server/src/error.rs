use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;
use tl_remote::ErrorBody;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("No commit exists for ledger: {0}")]
    LedgerMissing(String),

    #[error("ledger already exists")]
    LedgerExists(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::LedgerMissing(_) => StatusCode::NOT_FOUND,
            Self::LedgerExists(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::LedgerMissing(_) => "db/ledger-missing",
            Self::LedgerExists(_) => "db/ledger-exists",
            Self::BadRequest(_) => "db/invalid-request",
            Self::Io(_) | Self::Internal(_) => "db/internal",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: Some(self.code().to_string()),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
