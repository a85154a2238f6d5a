use crate::modules::project::adapters::inbound::json_import::JsonImportError;
use crate::modules::project::adapters::outbound::project_store::ProjectStoreError;
use crate::shared::core::errors::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Store(#[from] ProjectStoreError),

    #[error(transparent)]
    Import(#[from] JsonImportError),

    #[error("domain rejected: {0}")]
    Domain(#[from] DomainError),
}
