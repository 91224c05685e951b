use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    Conflict(String),
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ModelError::Unauthorized => write!(f, "Unauthorized"),
            ModelError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ModelError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ModelError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

// Storage and serialization failures surface as internal errors
impl From<anyhow::Error> for ModelError {
    fn from(err: anyhow::Error) -> Self {
        ModelError::InternalError(err.to_string())
    }
}

impl ModelError {
    pub fn user_not_found(user_id: &str) -> Self {
        ModelError::NotFound(format!("User not found: {}", user_id))
    }
}
