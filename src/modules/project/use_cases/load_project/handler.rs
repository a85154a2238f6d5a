use crate::modules::project::adapters::outbound::project_store::ProjectStore;
use crate::modules::project::core::project::Project;
use crate::modules::project::use_cases::errors::ApplicationError;
use std::sync::Arc;
use tracing::instrument;

/// Opens a project saved by this application. Every relation must link up exactly.
pub struct LoadProjectHandler<TStore>
where
    TStore: ProjectStore + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> LoadProjectHandler<TStore>
where
    TStore: ProjectStore + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub fn handle(&self) -> Result<Project, ApplicationError> {
        let document = self.store.load()?;
        Ok(Project::load(document)?)
    }
}
