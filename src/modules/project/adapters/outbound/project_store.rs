// Persistence port for whole projects.
//
// Purpose
// - Let the load and save use cases work against any backing store.
//
// Notes
// - A store deals in documents, never in live projects. Re-linking happens in the core.
// - `save` either writes the complete document or fails; there is no partial save.

use crate::modules::project::serialization::records::ProjectDocument;
use crate::shared::infrastructure::json_archive::ArchiveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectStoreError {
    #[error("no project stored at {0}")]
    NotFound(String),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

pub trait ProjectStore: Send + Sync {
    fn load(&self) -> Result<ProjectDocument, ProjectStoreError>;
    fn save(&self, document: &ProjectDocument) -> Result<(), ProjectStoreError>;
}
