// Records -> project.
//
// Notes
// - Decoding leaves every relation pending as a descriptor. `Project::restore` (exact) or
//   `Project::restore_after_import` (fuzzy) turns them into keys afterwards.
// - Each record's type tag is checked against the collection it was found in.

use crate::modules::project::core::arena::Arena;
use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::cost_calculation::{
    InventoryItem, ProjectCostCalculation,
};
use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::entities::job::{ConstructionDetails, Job, JobKind};
use crate::modules::project::core::entities::trade::Trade;
use crate::modules::project::core::project::Project;
use crate::modules::project::serialization::records::{
    CompanyRecord, ConstructionRecord, CostCalculationRecord, CostGroupRecord,
    InventoryItemRecord, InvoiceRecord, JobRecord, ProjectDocument, TradeRecord,
};
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::{self, Entity, EntityType, Identity, Meta};
use crate::shared::core::link::{Link, LinkList, RefDescriptor};
use tracing::{debug, instrument};

impl Project {
    /// Rebuild a project from its records without resolving any relation.
    pub fn from_document(document: ProjectDocument) -> Result<Project, DomainError> {
        let ProjectDocument {
            project: record,
            people,
            companies,
            trades,
            cost_groups,
            jobs,
            invoices,
            project_cost_calculations,
        } = document;
        expect_type(&record.meta, EntityType::Project)?;

        let calculations = project_cost_calculations
            .into_iter()
            .map(ProjectCostCalculation::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let project = Project {
            meta: record.meta,
            identifier: record.identifier,
            config: record.config,
            dates: record.dates,
            address: record.address,
            client: pending(record.client),
            people: Arena::from_items(people)?,
            companies: Arena::from_items(companies.into_iter().map(Company::from).collect())?,
            trades: Arena::from_items(trades.into_iter().map(Trade::from).collect())?,
            cost_groups: Arena::from_items(cost_groups.into_iter().map(CostGroup::from).collect())?,
            jobs: Arena::from_items(jobs.into_iter().map(Job::from).collect())?,
            invoices: Arena::from_items(invoices.into_iter().map(Invoice::from).collect())?,
            cost_calculations: Arena::from_items(calculations)?,
        };
        project.advance_clock();
        Ok(project)
    }

    /// Keeps identities minted from now on after every timestamp in the loaded records,
    /// even when the file was written on a machine whose clock ran ahead.
    fn advance_clock(&self) {
        let latest = self
            .people
            .iter()
            .map(|e| e.identity())
            .chain(self.companies.iter().map(|e| e.identity()))
            .chain(self.trades.iter().map(|e| e.identity()))
            .chain(self.cost_groups.iter().map(|e| e.identity()))
            .chain(self.jobs.iter().map(|e| e.identity()))
            .chain(self.invoices.iter().map(|e| e.identity()))
            .chain(self.cost_calculations.iter().map(|e| e.identity()))
            .chain(
                self.cost_calculations
                    .iter()
                    .flat_map(|calculation| calculation.inventory.iter())
                    .map(|item| item.identity()),
            )
            .chain(std::iter::once(&self.meta.identity))
            .map(Identity::last_change)
            .max();
        if let Some(latest) = latest {
            identity::observe(latest);
        }
    }

    /// Rebuild a project and re-link it exactly, as after opening a saved file.
    #[instrument(skip(document), fields(project = %document.project.identifier))]
    pub fn load(document: ProjectDocument) -> Result<Project, DomainError> {
        let mut project = Project::from_document(document)?;
        project.restore()?;
        debug!(
            invoices = project.invoices.len(),
            jobs = project.jobs.len(),
            "project decoded"
        );
        Ok(project)
    }
}

fn pending<T>(descriptor: Option<RefDescriptor>) -> Link<T> {
    descriptor.map(Link::unresolved).unwrap_or_default()
}

fn expect_type(meta: &Meta, expected: EntityType) -> Result<(), DomainError> {
    let found = meta.identity.entity_type;
    if found != expected {
        return Err(DomainError::TypeMismatch { expected, found });
    }
    Ok(())
}

impl From<CompanyRecord> for Company {
    fn from(record: CompanyRecord) -> Self {
        Self {
            meta: record.meta,
            name: record.name,
            service: record.service,
            service_type: record.service_type,
            budget: record.budget,
            contact_person: pending(record.contact_person),
        }
    }
}

impl From<TradeRecord> for Trade {
    fn from(record: TradeRecord) -> Self {
        Self {
            meta: record.meta,
            name: record.name,
            budget: record.budget,
            comment: record.comment,
            cost_group: pending(record.cost_group),
        }
    }
}

impl From<CostGroupRecord> for CostGroup {
    fn from(record: CostGroupRecord) -> Self {
        Self {
            meta: record.meta,
            id: record.id,
            name: record.name,
            description: record.description,
            budget: record.budget,
            parent: pending(record.parent),
        }
    }
}

impl From<JobRecord> for Job {
    fn from(record: JobRecord) -> Self {
        let kind = match record.construction {
            None => JobKind::General,
            Some(ConstructionRecord {
                trade,
                job_additions,
                paid_safety_deposits,
            }) => JobKind::Construction(ConstructionDetails {
                trade: pending(trade),
                job_additions,
                paid_safety_deposits,
            }),
        };
        Self {
            meta: record.meta,
            id: record.id,
            job_sum: record.job_sum,
            comment: record.comment,
            company: pending(record.company),
            kind,
        }
    }
}

impl From<InvoiceRecord> for Invoice {
    fn from(record: InvoiceRecord) -> Self {
        Self {
            meta: record.meta,
            id: record.id,
            invoice_date: record.invoice_date,
            date_received: record.date_received,
            due_date: record.due_date,
            amount: record.amount,
            verified_amount: record.verified_amount,
            rebate: record.rebate,
            reduction_insurance: record.reduction_insurance,
            reduction_usage: record.reduction_usage,
            vat: record.vat,
            safety_deposit: record.safety_deposit,
            safety_deposit_override: record.safety_deposit_amount,
            discount: record.discount,
            cumulative: record.cumulative,
            company: pending(record.company),
            job: pending(record.job),
            prev_invoices: LinkList::unresolved(record.prev_invoices),
            prev_invoices_amount: 0.0,
        }
    }
}

impl TryFrom<InventoryItemRecord> for InventoryItem {
    type Error = DomainError;

    fn try_from(record: InventoryItemRecord) -> Result<Self, Self::Error> {
        expect_type(&record.meta, EntityType::InventoryItem)?;
        Ok(Self {
            meta: record.meta,
            name: record.name,
            description: record.description,
            unit_price: record.unit_price,
            units: record.units,
            unit: record.unit,
            is_active: record.is_active,
            cost_group: pending(record.cost_group),
            trade: pending(record.trade),
        })
    }
}

impl TryFrom<CostCalculationRecord> for ProjectCostCalculation {
    type Error = DomainError;

    fn try_from(record: CostCalculationRecord) -> Result<Self, Self::Error> {
        let inventory = record
            .inventory
            .into_iter()
            .map(InventoryItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            meta: record.meta,
            name: record.name,
            calculation_type: record.calculation_type,
            date: record.date,
            inventory,
        })
    }
}
