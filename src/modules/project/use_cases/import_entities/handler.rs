// Merges foreign records into an open project.
//
// Responsibilities
// - Give every imported record a fresh unique value. Its timestamps are kept.
// - Skip records whose business key already exists: people by name, companies and trades by
//   name, cost groups by id, jobs by (company name, id). Deleted records are skipped too.
// - Re-link the merged project in fuzzy mode and report what could not be placed.
//
// Notes
// - The merge runs on a copy. The open project only changes when the whole batch went in.

use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::cost_calculation::ProjectCostCalculation;
use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::entities::job::Job;
use crate::modules::project::core::entities::person::Person;
use crate::modules::project::core::entities::trade::Trade;
use crate::modules::project::core::project::Project;
use crate::modules::project::resolution::engine::ResolutionOutcome;
use crate::modules::project::serialization::records::{
    CompanyRecord, CostGroupRecord, JobRecord, ProjectDocument, TradeRecord,
};
use crate::modules::project::use_cases::errors::ApplicationError;
use crate::modules::project::use_cases::import_entities::command::ImportBatch;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::{Entity, EntityType};
use crate::shared::core::link::Attribute;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Duplicate,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub entity_type: EntityType,
    pub key: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<SkippedRecord>,
    pub resolution: ResolutionOutcome,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportEntitiesHandler;

impl ImportEntitiesHandler {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(project = %project.identifier))]
    pub fn handle(
        &self,
        project: &mut Project,
        batch: ImportBatch,
    ) -> Result<ImportReport, ApplicationError> {
        let mut staged = project.clone();
        let mut merge = Merge {
            project: &mut staged,
            report: ImportReport::default(),
        };
        match batch {
            ImportBatch::Companies(records) => merge.companies(records)?,
            ImportBatch::Trades(records) => merge.trades(records)?,
            ImportBatch::CostGroups(records) => merge.cost_groups(records)?,
            ImportBatch::Document(document) => merge.document(*document)?,
        }
        let mut report = merge.report;
        report.resolution = staged.restore_after_import()?;
        *project = staged;

        info!(
            imported = report.imported,
            skipped = report.skipped.len(),
            unresolved = report.resolution.unresolved.len(),
            "import merged"
        );
        Ok(report)
    }
}

struct Merge<'a> {
    project: &'a mut Project,
    report: ImportReport,
}

impl Merge<'_> {
    fn document(&mut self, document: ProjectDocument) -> Result<(), DomainError> {
        self.people(document.people)?;
        self.cost_groups(document.cost_groups)?;
        self.companies(document.companies)?;
        self.trades(document.trades)?;
        self.jobs(document.jobs)?;
        for record in document.invoices {
            if let Some(invoice) = self.admit(Invoice::from(record), |_, _| None)? {
                self.project.invoices.insert(invoice)?;
            }
        }
        for record in document.project_cost_calculations {
            let calculation = ProjectCostCalculation::try_from(record)?;
            if let Some(mut calculation) = self.admit(calculation, |_, _| None)? {
                for item in calculation.inventory.iter_mut() {
                    item.meta.identity = item.meta.identity.reissue();
                }
                self.project.cost_calculations.insert(calculation)?;
            }
        }
        Ok(())
    }

    fn people(&mut self, records: Vec<Person>) -> Result<(), DomainError> {
        for record in records {
            let duplicate = |project: &Project, person: &Person| {
                project
                    .find_person_by_name(&person.first_name, &person.last_name)
                    .map(|_| person.full_name())
            };
            if let Some(person) = self.admit(record, duplicate)? {
                self.project.people.insert(person)?;
            }
        }
        Ok(())
    }

    fn companies(&mut self, records: Vec<CompanyRecord>) -> Result<(), DomainError> {
        for record in records {
            let duplicate = |project: &Project, company: &Company| {
                project
                    .find_company_by_name(&company.name)
                    .map(|_| company.name.clone())
            };
            if let Some(company) = self.admit(Company::from(record), duplicate)? {
                self.project.companies.insert(company)?;
            }
        }
        Ok(())
    }

    fn trades(&mut self, records: Vec<TradeRecord>) -> Result<(), DomainError> {
        for record in records {
            let duplicate = |project: &Project, trade: &Trade| {
                project.find_trade_by_name(&trade.name).map(|_| trade.name.clone())
            };
            if let Some(trade) = self.admit(Trade::from(record), duplicate)? {
                self.project.trades.insert(trade)?;
            }
        }
        Ok(())
    }

    fn cost_groups(&mut self, records: Vec<CostGroupRecord>) -> Result<(), DomainError> {
        for record in records {
            let duplicate = |project: &Project, group: &CostGroup| {
                project.find_cost_group_by_id(&group.id).map(|_| group.id.clone())
            };
            if let Some(group) = self.admit(CostGroup::from(record), duplicate)? {
                self.project.cost_groups.insert(group)?;
            }
        }
        Ok(())
    }

    fn jobs(&mut self, records: Vec<JobRecord>) -> Result<(), DomainError> {
        for record in records {
            let duplicate = |project: &Project, job: &Job| {
                let name = job.company.descriptor()?.attribute(Attribute::Name)?;
                let company = project.find_company_by_name(name)?;
                project
                    .job_exists(company.key(), &job.id)
                    .then(|| format!("{name} {}", job.id))
            };
            if let Some(job) = self.admit(Job::from(record), duplicate)? {
                self.project.jobs.insert(job)?;
            }
        }
        Ok(())
    }

    /// Checks the type tag, skips deleted and duplicate records and hands back the entity
    /// under a fresh unique value. Timestamps are kept, the invoice ledger orders by them.
    fn admit<T, F>(&mut self, mut entity: T, duplicate: F) -> Result<Option<T>, DomainError>
    where
        T: Entity,
        F: Fn(&Project, &T) -> Option<String>,
    {
        let found = entity.identity().entity_type;
        if found != T::ENTITY_TYPE {
            return Err(DomainError::TypeMismatch {
                expected: T::ENTITY_TYPE,
                found,
            });
        }
        if entity.is_deleted() {
            let key = entity.identity().unique_value.to_string();
            self.skip(T::ENTITY_TYPE, key, SkipReason::Deleted);
            return Ok(None);
        }
        if let Some(key) = duplicate(&*self.project, &entity) {
            warn!(entity_type = %T::ENTITY_TYPE, key = %key, "skipping duplicate on import");
            self.skip(T::ENTITY_TYPE, key, SkipReason::Duplicate);
            return Ok(None);
        }
        let identity = entity.identity().reissue();
        entity.meta_mut().identity = identity;
        self.report.imported += 1;
        Ok(Some(entity))
    }

    fn skip(&mut self, entity_type: EntityType, key: String, reason: SkipReason) {
        self.report.skipped.push(SkippedRecord {
            entity_type,
            key,
            reason,
        });
    }
}

#[cfg(test)]
mod import_entities_handler_tests {
    use super::*;
    use crate::modules::project::adapters::inbound::json_import::{ImportKind, parse_import};
    use crate::shared::core::identity::Meta;
    use crate::shared::core::link::RefDescriptor;
    use crate::tests::fixtures::{COMPANIES_JSON, Site, site};
    use rstest::rstest;

    fn group(id: &str, parent: Option<&str>) -> CostGroupRecord {
        CostGroupRecord {
            meta: Meta::new(EntityType::CostGroup),
            id: id.into(),
            name: format!("KG {id}"),
            description: None,
            budget: 0.0,
            parent: parent.map(|id| RefDescriptor::default().with(Attribute::Id, id)),
        }
    }

    #[rstest]
    fn it_should_import_companies_under_fresh_identities(site: Site) {
        let mut project = site.project;
        let batch = parse_import(ImportKind::Companies, COMPANIES_JSON).unwrap();
        let ImportBatch::Companies(records) = &batch else {
            panic!("expected companies");
        };
        let foreign = records[0].meta.identity.clone();

        let report = ImportEntitiesHandler::new().handle(&mut project, batch).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::Duplicate);
        assert!(report.resolution.is_complete());

        let imported = project.find_company_by_name("Elektro Schulz").unwrap();
        assert_ne!(imported.identity(), &foreign);
        assert_eq!(imported.identity().created_at, foreign.created_at);
        assert_eq!(imported.identity().entity_type, EntityType::Company);
        assert!(imported.contact_person.points_to(site.person));
        assert_eq!(project.companies().len(), 2);
    }

    #[rstest]
    fn it_should_link_imported_cost_groups_by_id(site: Site) {
        let mut project = site.project;
        let batch = ImportBatch::CostGroups(vec![
            group("400", None),
            group("410", Some("400")),
            group("330", Some("300")),
            group("900", Some("999")),
        ]);

        let report = ImportEntitiesHandler::new().handle(&mut project, batch).unwrap();

        assert_eq!(report.imported, 3);
        assert_eq!(report.skipped[0].key, "330");
        assert_eq!(report.resolution.unresolved.len(), 1);
        assert_eq!(
            report.resolution.unresolved[0].descriptor.attribute(Attribute::Id),
            Some("999")
        );

        let technik = project.find_cost_group_by_id("400").unwrap().key();
        let child = project.find_cost_group_by_id("410").unwrap();
        assert!(child.parent.points_to(technik));
        assert!(project.find_cost_group_by_id("900").unwrap().is_main_group());
    }

    #[rstest]
    fn it_should_leave_the_project_untouched_on_a_type_mismatch(site: Site) {
        let mut project = site.project;
        let mut stranger = group("500", None);
        stranger.meta = Meta::new(EntityType::Trade);
        let batch = ImportBatch::CostGroups(vec![group("400", None), stranger]);

        let result = ImportEntitiesHandler::new().handle(&mut project, batch);

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::TypeMismatch { .. }))
        ));
        assert!(project.find_cost_group_by_id("400").is_none());
    }

    #[rstest]
    fn it_should_skip_deleted_records(site: Site) {
        let mut project = site.project;
        let mut gone = group("400", None);
        gone.meta.deleted = true;

        let report = ImportEntitiesHandler::new()
            .handle(&mut project, ImportBatch::CostGroups(vec![gone]))
            .unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped[0].reason, SkipReason::Deleted);
    }
}
