use crate::modules::project::serialization::records::{
    CompanyRecord, CostGroupRecord, ProjectDocument, TradeRecord,
};

/// Foreign records to merge into an open project.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportBatch {
    Companies(Vec<CompanyRecord>),
    Trades(Vec<TradeRecord>),
    CostGroups(Vec<CostGroupRecord>),
    /// A whole project, as produced by the spreadsheet importer. The project record itself
    /// is ignored; only its collections are merged.
    Document(Box<ProjectDocument>),
}
