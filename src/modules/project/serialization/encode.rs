// Project -> records.
//
// Notes
// - Links are checked first; a link holding both a key and a descriptor aborts encoding.
// - A live key is written as the target's full descriptor (identity plus business keys).
// - A still-pending descriptor is written back unchanged.

use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::cost_calculation::{
    InventoryItem, ProjectCostCalculation,
};
use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::entities::job::{Job, JobKind};
use crate::modules::project::core::entities::trade::Trade;
use crate::modules::project::core::project::Project;
use crate::modules::project::resolution::registry::Referable;
use crate::modules::project::serialization::records::{
    CompanyRecord, ConstructionRecord, CostCalculationRecord, CostGroupRecord,
    InventoryItemRecord, InvoiceRecord, JobRecord, ProjectDocument, ProjectRecord, TradeRecord,
};
use crate::shared::core::errors::DomainError;
use crate::shared::core::link::{Link, LinkList, RefDescriptor};
use tracing::debug;

impl Project {
    pub fn to_document(&self) -> Result<ProjectDocument, DomainError> {
        self.check_links()?;

        let document = ProjectDocument {
            project: ProjectRecord {
                meta: self.meta.clone(),
                identifier: self.identifier.clone(),
                config: self.config.clone(),
                dates: self.dates.clone(),
                address: self.address.clone(),
                client: self.describe(&self.client),
            },
            people: self.people.iter().cloned().collect(),
            companies: self.companies.iter().map(|c| self.company_record(c)).collect(),
            trades: self.trades.iter().map(|t| self.trade_record(t)).collect(),
            cost_groups: self
                .cost_groups
                .iter()
                .map(|g| self.cost_group_record(g))
                .collect(),
            jobs: self.jobs.iter().map(|j| self.job_record(j)).collect(),
            invoices: self.invoices.iter().map(|i| self.invoice_record(i)).collect(),
            project_cost_calculations: self
                .cost_calculations
                .iter()
                .map(|c| self.calculation_record(c))
                .collect(),
        };
        debug!(project = %self.identifier, "project encoded");
        Ok(document)
    }

    fn describe<T: Referable>(&self, link: &Link<T>) -> Option<RefDescriptor> {
        match (link.key(), link.descriptor()) {
            (Some(key), _) => T::arena(self).get(key).map(|target| target.descriptor(self)),
            (None, descriptor) => descriptor.cloned(),
        }
    }

    fn describe_all<T: Referable>(&self, list: &LinkList<T>) -> Vec<RefDescriptor> {
        let arena = T::arena(self);
        list.keys()
            .iter()
            .filter_map(|key| arena.get(*key))
            .map(|target| target.descriptor(self))
            .chain(list.descriptors().iter().cloned())
            .collect()
    }

    fn company_record(&self, company: &Company) -> CompanyRecord {
        CompanyRecord {
            meta: company.meta.clone(),
            name: company.name.clone(),
            service: company.service.clone(),
            service_type: company.service_type.clone(),
            budget: company.budget,
            contact_person: self.describe(&company.contact_person),
        }
    }

    fn trade_record(&self, trade: &Trade) -> TradeRecord {
        TradeRecord {
            meta: trade.meta.clone(),
            name: trade.name.clone(),
            budget: trade.budget,
            comment: trade.comment.clone(),
            cost_group: self.describe(&trade.cost_group),
        }
    }

    fn cost_group_record(&self, group: &CostGroup) -> CostGroupRecord {
        CostGroupRecord {
            meta: group.meta.clone(),
            id: group.id.clone(),
            name: group.name.clone(),
            description: group.description.clone(),
            budget: group.budget,
            parent: self.describe(&group.parent),
        }
    }

    fn job_record(&self, job: &Job) -> JobRecord {
        let construction = match &job.kind {
            JobKind::General => None,
            JobKind::Construction(details) => Some(ConstructionRecord {
                trade: self.describe(&details.trade),
                job_additions: details.job_additions.clone(),
                paid_safety_deposits: details.paid_safety_deposits.clone(),
            }),
        };
        JobRecord {
            meta: job.meta.clone(),
            id: job.id.clone(),
            job_sum: job.job_sum,
            comment: job.comment.clone(),
            company: self.describe(&job.company),
            construction,
        }
    }

    fn invoice_record(&self, invoice: &Invoice) -> InvoiceRecord {
        InvoiceRecord {
            meta: invoice.meta.clone(),
            id: invoice.id.clone(),
            invoice_date: invoice.invoice_date,
            date_received: invoice.date_received,
            due_date: invoice.due_date,
            amount: invoice.amount,
            verified_amount: invoice.verified_amount,
            rebate: invoice.rebate,
            reduction_insurance: invoice.reduction_insurance,
            reduction_usage: invoice.reduction_usage,
            vat: invoice.vat,
            safety_deposit: invoice.safety_deposit,
            safety_deposit_amount: invoice.safety_deposit_override,
            discount: invoice.discount,
            cumulative: invoice.cumulative,
            company: self.describe(&invoice.company),
            job: self.describe(&invoice.job),
            prev_invoices: self.describe_all(&invoice.prev_invoices),
        }
    }

    fn calculation_record(&self, calculation: &ProjectCostCalculation) -> CostCalculationRecord {
        CostCalculationRecord {
            meta: calculation.meta.clone(),
            name: calculation.name.clone(),
            calculation_type: calculation.calculation_type,
            date: calculation.date,
            inventory: calculation
                .inventory
                .iter()
                .map(|item| self.item_record(item))
                .collect(),
        }
    }

    fn item_record(&self, item: &InventoryItem) -> InventoryItemRecord {
        InventoryItemRecord {
            meta: item.meta.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            unit_price: item.unit_price,
            units: item.units,
            unit: item.unit.clone(),
            is_active: item.is_active,
            cost_group: self.describe(&item.cost_group),
            trade: self.describe(&item.trade),
        }
    }
}
