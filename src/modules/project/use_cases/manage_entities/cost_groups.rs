// Cost group mutators.
//
// Notes
// - A parent must exist. On update it may be neither the group itself nor one of its
//   descendants, so the tree stays acyclic.

use crate::modules::project::core::entities::cost_group::{CostGroup, CostGroupInput};
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use tracing::{info, instrument};

impl Project {
    #[instrument(skip(self, input), fields(project = %self.identifier, cost_group = %input.id))]
    pub fn input_new_cost_group(
        &mut self,
        input: CostGroupInput,
    ) -> Result<Key<CostGroup>, DomainError> {
        if let Some(parent) = input.parent {
            self.cost_groups.require(parent)?;
        }
        let key = self.cost_groups.insert(CostGroup::new(input))?;
        info!("cost group added");
        Ok(key)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, cost_group = %input.id))]
    pub fn update_cost_group(
        &mut self,
        key: Key<CostGroup>,
        input: CostGroupInput,
    ) -> Result<(), DomainError> {
        self.cost_groups.require(key)?;
        if let Some(parent) = input.parent {
            let candidate = self.cost_groups.require(parent)?;
            if parent == key || candidate.is_sub_group_of(key, &self.cost_groups) {
                return Err(DomainError::Cycle(format!(
                    "cost group {} cannot be placed below {}",
                    input.id, candidate.id
                )));
            }
        }
        self.cost_groups.require_mut(key)?.update(input);
        info!("cost group updated");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn delete_cost_group(&mut self, key: Key<CostGroup>) -> Result<(), DomainError> {
        self.cost_groups.require_mut(key)?.delete()?;
        info!(cost_group = %key.value(), "cost group deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn undelete_cost_group(&mut self, key: Key<CostGroup>) -> Result<(), DomainError> {
        self.cost_groups.require_mut(key)?.undelete()?;
        info!(cost_group = %key.value(), "cost group restored");
        Ok(())
    }
}
