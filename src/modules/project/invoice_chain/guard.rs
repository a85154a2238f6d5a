// Previous-invoice links never point at the invoice itself and never close a loop.
//
// Notes
// - Reachability follows live keys and the identities of pending descriptors, so the check
//   also holds for a graph that has not been restored yet.

use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::EntityType;
use crate::shared::core::link::Key;
use std::collections::HashSet;

impl Project {
    /// Append `prev` to the previous-invoice list of `invoice`.
    pub fn link_prev_invoice(
        &mut self,
        invoice: Key<Invoice>,
        prev: Key<Invoice>,
    ) -> Result<(), DomainError> {
        self.check_prev_invoice(invoice, prev)?;
        self.invoices.require_mut(invoice)?.prev_invoices.push(prev);
        Ok(())
    }

    /// Replace the previous-invoice list of `invoice`. Nothing changes when any entry is refused.
    pub fn set_prev_invoices(
        &mut self,
        invoice: Key<Invoice>,
        prevs: Vec<Key<Invoice>>,
    ) -> Result<(), DomainError> {
        for prev in &prevs {
            self.check_prev_invoice(invoice, *prev)?;
        }
        self.invoices
            .require_mut(invoice)?
            .prev_invoices
            .resolve_all(prevs);
        Ok(())
    }

    fn check_prev_invoice(
        &self,
        invoice: Key<Invoice>,
        prev: Key<Invoice>,
    ) -> Result<(), DomainError> {
        let owner = self.invoices.require(invoice)?;
        self.invoices.require(prev)?;
        if invoice == prev {
            return Err(DomainError::Cycle(format!(
                "invoice {} cannot be its own previous invoice",
                owner.id
            )));
        }
        if self.reaches(prev, invoice) {
            return Err(DomainError::Cycle(format!(
                "invoice {} is already a predecessor of the invoice it would follow",
                owner.id
            )));
        }
        Ok(())
    }

    /// True when `target` is reachable from `from` over previous-invoice relations.
    fn reaches(&self, from: Key<Invoice>, target: Key<Invoice>) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![from];
        while let Some(key) = pending.pop() {
            if !visited.insert(key) {
                continue;
            }
            let Some(invoice) = self.invoices.get(key) else {
                continue;
            };
            let live = invoice.prev_invoices.keys().iter().copied();
            let described = invoice
                .prev_invoices
                .descriptors()
                .iter()
                .filter_map(|descriptor| descriptor.identity.as_ref())
                .filter(|identity| identity.entity_type == EntityType::Invoice)
                .map(|identity| Key::new(identity.unique_value));
            for next in live.chain(described) {
                if next == target {
                    return true;
                }
                pending.push(next);
            }
        }
        false
    }
}
