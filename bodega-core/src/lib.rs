pub mod validation;

/// Shared error taxonomy for the stores and the reconciliation engine.
///
/// `NotFound` on a referenced entity is recoverable (reconciliation treats the
/// order as not yet satisfiable); `Validation` is raised at the input boundary
/// before any store is touched; `Persistence` propagates to the caller and
/// aborts the operation in flight.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {}", entity, id))
    }
}
