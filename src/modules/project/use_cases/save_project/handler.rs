use crate::modules::project::adapters::outbound::project_store::ProjectStore;
use crate::modules::project::core::project::Project;
use crate::modules::project::use_cases::errors::ApplicationError;
use std::sync::Arc;
use tracing::instrument;

pub struct SaveProjectHandler<TStore>
where
    TStore: ProjectStore + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> SaveProjectHandler<TStore>
where
    TStore: ProjectStore + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    #[instrument(skip_all, fields(project = %project.identifier))]
    pub fn handle(&self, project: &Project) -> Result<(), ApplicationError> {
        let document = project.to_document()?;
        self.store.save(&document)?;
        Ok(())
    }
}

#[cfg(test)]
mod save_project_handler_tests {
    use super::*;
    use crate::modules::project::adapters::outbound::project_store::ProjectStoreError;
    use crate::modules::project::adapters::outbound::project_store_in_memory::InMemoryProjectStore;
    use crate::modules::project::core::entities::company::Company;
    use crate::shared::core::errors::DomainError;
    use crate::shared::core::link::{Key, Link, RefDescriptor};
    use crate::tests::fixtures::{Site, site};
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn it_should_store_the_document(site: Site) {
        let store = Arc::new(InMemoryProjectStore::new());
        SaveProjectHandler::new(store.clone())
            .handle(&site.project)
            .expect("save failed");

        let document = store.load().unwrap();
        assert_eq!(document.project.identifier, site.project.identifier);
        assert_eq!(document.jobs.len(), 1);
    }

    #[rstest]
    fn it_should_refuse_an_inconsistent_project(site: Site) {
        let mut project = site.project;
        project.jobs.require_mut(site.job).unwrap().company = Link::corrupt(
            Key::<Company>::new(Uuid::now_v7()),
            RefDescriptor::default(),
        );
        let store = Arc::new(InMemoryProjectStore::new());

        let result = SaveProjectHandler::new(store.clone()).handle(&project);
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::InconsistentState { .. }))
        ));
        assert!(matches!(store.load(), Err(ProjectStoreError::NotFound(_))));
    }

    #[rstest]
    fn it_should_fail_if_the_store_is_offline(site: Site) {
        let mut store = InMemoryProjectStore::new();
        store.toggle_offline();

        let result = SaveProjectHandler::new(Arc::new(store)).handle(&site.project);
        assert_eq!(
            result.unwrap_err().to_string(),
            ApplicationError::Store(ProjectStoreError::Backend("Project store offline".into()))
                .to_string()
        );
    }
}
