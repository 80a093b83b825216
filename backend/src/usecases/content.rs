use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("not allowed to {0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ContentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ContentError::NotFound(_) => StatusCode::NOT_FOUND,
            ContentError::Validation(_) => StatusCode::BAD_REQUEST,
            ContentError::Forbidden(_) => StatusCode::FORBIDDEN,
            ContentError::Conflict(_) => StatusCode::CONFLICT,
            ContentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ContentError {
    fn from(errors: ValidationErrors) -> Self {
        ContentError::Validation(errors.to_string())
    }
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;

/// Who is acting, as far as ownership checks care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub is_admin: bool,
}

impl Caller {
    pub fn may_modify(&self, owner_id: i64) -> bool {
        self.is_admin || self.user_id == owner_id
    }
}
