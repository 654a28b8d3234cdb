use thiserror::Error;

/// The only two genuine failure modes of the core. Everything else a solve
/// can report (infeasibility, a time limit, a cancellation) is carried as a
/// `SolveResult::status`, not as an `Err` — a time-limited solve is not a
/// failure of the library contract.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    #[error("internal solver error: {0}")]
    InternalError(String),
}

impl CoreError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::InternalError(reason.into())
    }
}
