use crate::modules::project::core::entities::cost_calculation::{
    CostCalculationInput, InventoryItem, InventoryItemInput, ProjectCostCalculation,
};
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::{Entity, EntityType};
use crate::shared::core::link::Key;
use tracing::{info, instrument};

impl Project {
    #[instrument(skip(self, input), fields(project = %self.identifier, calculation = %input.name))]
    pub fn input_new_project_cost_calculation(
        &mut self,
        input: CostCalculationInput,
    ) -> Result<Key<ProjectCostCalculation>, DomainError> {
        let key = self
            .cost_calculations
            .insert(ProjectCostCalculation::new(input))?;
        info!("cost calculation added");
        Ok(key)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, calculation = %input.name))]
    pub fn update_project_cost_calculation(
        &mut self,
        key: Key<ProjectCostCalculation>,
        input: CostCalculationInput,
    ) -> Result<(), DomainError> {
        self.cost_calculations.require_mut(key)?.update(input);
        info!("cost calculation updated");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn delete_project_cost_calculation(
        &mut self,
        key: Key<ProjectCostCalculation>,
    ) -> Result<(), DomainError> {
        self.cost_calculations.require_mut(key)?.delete()?;
        info!(calculation = %key.value(), "cost calculation deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn undelete_project_cost_calculation(
        &mut self,
        key: Key<ProjectCostCalculation>,
    ) -> Result<(), DomainError> {
        self.cost_calculations.require_mut(key)?.undelete()?;
        info!(calculation = %key.value(), "cost calculation restored");
        Ok(())
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, item = %input.name))]
    pub fn add_inventory_item(
        &mut self,
        calculation: Key<ProjectCostCalculation>,
        input: InventoryItemInput,
    ) -> Result<Key<InventoryItem>, DomainError> {
        self.check_inventory_item(&input)?;
        let key = self
            .cost_calculations
            .require_mut(calculation)?
            .add_inventory_item(input);
        info!("inventory item added");
        Ok(key)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, item = %input.name))]
    pub fn update_inventory_item(
        &mut self,
        calculation: Key<ProjectCostCalculation>,
        item: Key<InventoryItem>,
        input: InventoryItemInput,
    ) -> Result<(), DomainError> {
        self.check_inventory_item(&input)?;
        let calculation = self.cost_calculations.require_mut(calculation)?;
        calculation
            .item_mut(item)
            .ok_or_else(|| item_not_found(item))?
            .update(input);
        calculation.touch();
        info!("inventory item updated");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn delete_inventory_item(
        &mut self,
        calculation: Key<ProjectCostCalculation>,
        item: Key<InventoryItem>,
    ) -> Result<(), DomainError> {
        let calculation = self.cost_calculations.require_mut(calculation)?;
        calculation
            .item_mut(item)
            .ok_or_else(|| item_not_found(item))?
            .delete()?;
        calculation.touch();
        info!(item = %item.value(), "inventory item deleted");
        Ok(())
    }

    fn check_inventory_item(&self, input: &InventoryItemInput) -> Result<(), DomainError> {
        if let Some(group) = input.cost_group {
            self.cost_groups.require(group)?;
        }
        if let Some(trade) = input.trade {
            self.trades.require(trade)?;
        }
        Ok(())
    }
}

fn item_not_found(item: Key<InventoryItem>) -> DomainError {
    DomainError::NotFound {
        entity_type: EntityType::InventoryItem,
        unique_value: item.value(),
    }
}
