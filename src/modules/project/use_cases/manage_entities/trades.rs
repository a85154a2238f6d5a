use crate::modules::project::core::entities::trade::{Trade, TradeInput};
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use tracing::{info, instrument};

impl Project {
    #[instrument(skip(self, input), fields(project = %self.identifier, trade = %input.name))]
    pub fn input_new_trade(&mut self, input: TradeInput) -> Result<Key<Trade>, DomainError> {
        if let Some(group) = input.cost_group {
            self.cost_groups.require(group)?;
        }
        let key = self.trades.insert(Trade::new(input))?;
        info!("trade added");
        Ok(key)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, trade = %input.name))]
    pub fn update_trade(&mut self, key: Key<Trade>, input: TradeInput) -> Result<(), DomainError> {
        if let Some(group) = input.cost_group {
            self.cost_groups.require(group)?;
        }
        self.trades.require_mut(key)?.update(input);
        info!("trade updated");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn delete_trade(&mut self, key: Key<Trade>) -> Result<(), DomainError> {
        self.trades.require_mut(key)?.delete()?;
        info!(trade = %key.value(), "trade deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn undelete_trade(&mut self, key: Key<Trade>) -> Result<(), DomainError> {
        self.trades.require_mut(key)?.undelete()?;
        info!(trade = %key.value(), "trade restored");
        Ok(())
    }
}
