// Reads single-collection JSON files exported from another project.
//
// Notes
// - A file holds a JSON array of one record kind (companies, trades or cost groups).
// - Every record must carry the type tag of that kind.

use crate::modules::project::serialization::records::{
    CompanyRecord, CostGroupRecord, TradeRecord,
};
use crate::modules::project::use_cases::import_entities::command::ImportBatch;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::{EntityType, Meta};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportKind {
    Companies,
    Trades,
    CostGroups,
}

impl ImportKind {
    fn entity_type(self) -> EntityType {
        match self {
            ImportKind::Companies => EntityType::Company,
            ImportKind::Trades => EntityType::Trade,
            ImportKind::CostGroups => EntityType::CostGroup,
        }
    }
}

#[derive(Debug, Error)]
pub enum JsonImportError {
    #[error("malformed import file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn parse_import(kind: ImportKind, json: &str) -> Result<ImportBatch, JsonImportError> {
    let batch = match kind {
        ImportKind::Companies => {
            ImportBatch::Companies(parse_records(kind, json, |r: &CompanyRecord| &r.meta)?)
        }
        ImportKind::Trades => {
            ImportBatch::Trades(parse_records(kind, json, |r: &TradeRecord| &r.meta)?)
        }
        ImportKind::CostGroups => {
            ImportBatch::CostGroups(parse_records(kind, json, |r: &CostGroupRecord| &r.meta)?)
        }
    };
    Ok(batch)
}

#[instrument(skip_all, fields(?kind, path = %path.display()))]
pub fn read_import_file(kind: ImportKind, path: &Path) -> Result<ImportBatch, JsonImportError> {
    let json = std::fs::read_to_string(path)?;
    parse_import(kind, &json)
}

fn parse_records<R: DeserializeOwned>(
    kind: ImportKind,
    json: &str,
    meta: impl Fn(&R) -> &Meta,
) -> Result<Vec<R>, JsonImportError> {
    let records: Vec<R> = serde_json::from_str(json)?;
    let expected = kind.entity_type();
    if let Some(found) = records
        .iter()
        .map(|record| meta(record).identity.entity_type)
        .find(|found| *found != expected)
    {
        return Err(DomainError::TypeMismatch { expected, found }.into());
    }
    debug!(records = records.len(), entity_type = %expected, "import file parsed");
    Ok(records)
}
