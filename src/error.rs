use thiserror::Error;

/// Failures surfaced by the alert engine.
///
/// `Validation` and `NotFound` are caller mistakes; `Store` means the backing
/// store failed and is reported as a server error.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl AlertError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AlertError::Validation(msg.into())
    }

    pub fn alert_not_found(id: impl ToString) -> Self {
        AlertError::NotFound {
            entity: "Alert",
            id: id.to_string(),
        }
    }
}
