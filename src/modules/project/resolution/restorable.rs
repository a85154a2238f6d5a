use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::cost_calculation::ProjectCostCalculation;
use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::entities::job::Job;
use crate::modules::project::core::entities::trade::Trade;
use crate::modules::project::resolution::engine::{
    Mode, ResolutionOutcome, resolve_link, resolve_list,
};
use crate::modules::project::resolution::registry::Registry;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;

/// An entity whose relations can be re-linked from descriptors.
pub trait Restorable: Entity {
    fn resolve_links(
        &mut self,
        mode: Mode,
        registry: &Registry,
        outcome: &mut ResolutionOutcome,
    ) -> Result<(), DomainError>;

    fn restore(&mut self, registry: &Registry) -> Result<(), DomainError> {
        self.resolve_links(Mode::Exact, registry, &mut ResolutionOutcome::default())
    }

    fn restore_after_import(
        &mut self,
        registry: &Registry,
    ) -> Result<ResolutionOutcome, DomainError> {
        let mut outcome = ResolutionOutcome::default();
        self.resolve_links(Mode::Fuzzy, registry, &mut outcome)?;
        Ok(outcome)
    }
}

impl Restorable for Company {
    fn resolve_links(
        &mut self,
        mode: Mode,
        registry: &Registry,
        outcome: &mut ResolutionOutcome,
    ) -> Result<(), DomainError> {
        let owner = self.identity().clone();
        resolve_link(&owner, &mut self.contact_person, mode, registry, outcome)
    }
}

impl Restorable for Trade {
    fn resolve_links(
        &mut self,
        mode: Mode,
        registry: &Registry,
        outcome: &mut ResolutionOutcome,
    ) -> Result<(), DomainError> {
        let owner = self.identity().clone();
        resolve_link(&owner, &mut self.cost_group, mode, registry, outcome)
    }
}

impl Restorable for CostGroup {
    fn resolve_links(
        &mut self,
        mode: Mode,
        registry: &Registry,
        outcome: &mut ResolutionOutcome,
    ) -> Result<(), DomainError> {
        let owner = self.identity().clone();
        resolve_link(&owner, &mut self.parent, mode, registry, outcome)
    }
}

impl Restorable for Job {
    fn resolve_links(
        &mut self,
        mode: Mode,
        registry: &Registry,
        outcome: &mut ResolutionOutcome,
    ) -> Result<(), DomainError> {
        let owner = self.identity().clone();
        resolve_link(&owner, &mut self.company, mode, registry, outcome)?;
        if let Some(details) = self.construction_mut() {
            resolve_link(&owner, &mut details.trade, mode, registry, outcome)?;
        }
        Ok(())
    }
}

impl Restorable for Invoice {
    fn resolve_links(
        &mut self,
        mode: Mode,
        registry: &Registry,
        outcome: &mut ResolutionOutcome,
    ) -> Result<(), DomainError> {
        let owner = self.identity().clone();
        resolve_link(&owner, &mut self.company, mode, registry, outcome)?;
        resolve_link(&owner, &mut self.job, mode, registry, outcome)?;
        resolve_list(&owner, &mut self.prev_invoices, mode, registry, outcome)
    }
}

impl Restorable for ProjectCostCalculation {
    fn resolve_links(
        &mut self,
        mode: Mode,
        registry: &Registry,
        outcome: &mut ResolutionOutcome,
    ) -> Result<(), DomainError> {
        for item in self.inventory.iter_mut() {
            let owner = item.identity().clone();
            resolve_link(&owner, &mut item.cost_group, mode, registry, outcome)?;
            resolve_link(&owner, &mut item.trade, mode, registry, outcome)?;
        }
        Ok(())
    }
}
