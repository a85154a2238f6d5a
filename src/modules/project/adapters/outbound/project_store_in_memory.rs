// In memory implementation of the ProjectStore port.
//
// Purpose
// - Support use case tests without touching the file system.
//
// Responsibilities
// - Keep the last saved document.
// - Simulate an unavailable backend with `toggle_offline`.

use crate::modules::project::adapters::outbound::project_store::{
    ProjectStore, ProjectStoreError,
};
use crate::modules::project::serialization::records::ProjectDocument;
use std::sync::RwLock;

pub struct InMemoryProjectStore {
    inner: RwLock<Option<ProjectDocument>>,
    offline: bool,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
            offline: false,
        }
    }

    pub fn with_document(document: ProjectDocument) -> Self {
        Self {
            inner: RwLock::new(Some(document)),
            offline: false,
        }
    }

    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    fn check_online(&self) -> Result<(), ProjectStoreError> {
        if self.offline {
            return Err(ProjectStoreError::Backend("Project store offline".into()));
        }
        Ok(())
    }

    fn poisoned() -> ProjectStoreError {
        ProjectStoreError::Backend("Project store lock poisoned".into())
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn load(&self) -> Result<ProjectDocument, ProjectStoreError> {
        self.check_online()?;
        let guard = self.inner.read().map_err(|_| Self::poisoned())?;
        guard
            .clone()
            .ok_or_else(|| ProjectStoreError::NotFound("memory".into()))
    }

    fn save(&self, document: &ProjectDocument) -> Result<(), ProjectStoreError> {
        self.check_online()?;
        let mut guard = self.inner.write().map_err(|_| Self::poisoned())?;
        *guard = Some(document.clone());
        Ok(())
    }
}
