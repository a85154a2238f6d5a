use crate::shared::core::identity::EntityType;
use thiserror::Error;
use uuid::Uuid;

/// Failures raised by the domain core.
///
/// `InvalidState`, `InconsistentState`, `TypeMismatch` and `Cycle` signal a programming error
/// and are never recovered from inside the core. `ReferenceResolution` is raised when a file
/// the application saved itself no longer links up.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("inconsistent state on {owner}: {detail}")]
    InconsistentState { owner: String, detail: String },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: EntityType,
        found: EntityType,
    },

    #[error("cycle detected: {0}")]
    Cycle(String),

    #[error("unresolved {target} reference on {owner}")]
    ReferenceResolution {
        owner: String,
        target: EntityType,
        unique_value: Option<Uuid>,
    },

    #[error("{entity_type} {unique_value} not found")]
    NotFound {
        entity_type: EntityType,
        unique_value: Uuid,
    },

    #[error("job {id} already exists for company {company}")]
    DuplicateJob { company: String, id: String },
}
