use crate::modules::project::adapters::inbound::json_import::{ImportKind, read_import_file};
use crate::modules::project::adapters::outbound::project_store::ProjectStore;
use crate::modules::project::core::config::ProjectConfig;
use crate::modules::project::core::project::Project;
use crate::modules::project::use_cases::errors::ApplicationError;
use crate::modules::project::use_cases::import_entities::command::ImportBatch;
use crate::modules::project::use_cases::import_entities::handler::{
    ImportEntitiesHandler, ImportReport,
};
use crate::modules::project::use_cases::load_project::handler::LoadProjectHandler;
use crate::modules::project::use_cases::save_project::handler::SaveProjectHandler;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One open project bound to the store it is saved to.
pub struct ProjectSession<TStore>
where
    TStore: ProjectStore + 'static,
{
    project: Project,
    load_handler: LoadProjectHandler<TStore>,
    save_handler: SaveProjectHandler<TStore>,
    import_handler: ImportEntitiesHandler,
}

impl<TStore> ProjectSession<TStore>
where
    TStore: ProjectStore + 'static,
{
    fn with_project(project: Project, store: Arc<TStore>) -> Self {
        Self {
            project,
            load_handler: LoadProjectHandler::new(store.clone()),
            save_handler: SaveProjectHandler::new(store),
            import_handler: ImportEntitiesHandler::new(),
        }
    }

    /// Starts an empty project. Nothing is written until `save`.
    pub fn create(
        identifier: impl Into<String>,
        config: ProjectConfig,
        store: Arc<TStore>,
    ) -> Self {
        Self::with_project(Project::new(identifier, config), store)
    }

    pub fn open(store: Arc<TStore>) -> Result<Self, ApplicationError> {
        let project = LoadProjectHandler::new(store.clone()).handle()?;
        info!(project = %project.identifier, "project opened");
        Ok(Self::with_project(project, store))
    }

    /// Drops unsaved changes and reads the stored project again.
    pub fn reload(&mut self) -> Result<(), ApplicationError> {
        self.project = self.load_handler.handle()?;
        Ok(())
    }

    pub fn save(&self) -> Result<(), ApplicationError> {
        self.save_handler.handle(&self.project)
    }

    pub fn import(&mut self, batch: ImportBatch) -> Result<ImportReport, ApplicationError> {
        self.import_handler.handle(&mut self.project, batch)
    }

    pub fn import_file(
        &mut self,
        kind: ImportKind,
        path: &Path,
    ) -> Result<ImportReport, ApplicationError> {
        let batch = read_import_file(kind, path)?;
        self.import(batch)
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }
}
