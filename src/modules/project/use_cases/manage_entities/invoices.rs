// Invoice mutators. Every one of them ends with a full ledger recompute.

use crate::modules::project::core::entities::invoice::{Invoice, InvoiceInput};
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use tracing::{info, instrument};

impl Project {
    #[instrument(skip(self, input), fields(project = %self.identifier, invoice = %input.id))]
    pub fn input_new_invoice(&mut self, input: InvoiceInput) -> Result<Key<Invoice>, DomainError> {
        self.check_invoice_input(&input)?;
        let key = self.invoices.insert(Invoice::new(input))?;
        self.update_all_prev_invoices()?;
        info!("invoice added");
        Ok(key)
    }

    #[instrument(skip(self, input), fields(project = %self.identifier, invoice = %input.id))]
    pub fn update_invoice(
        &mut self,
        key: Key<Invoice>,
        input: InvoiceInput,
    ) -> Result<(), DomainError> {
        self.invoices.require(key)?;
        self.check_invoice_input(&input)?;
        self.invoices.require_mut(key)?.update(input);
        self.update_all_prev_invoices()?;
        info!("invoice updated");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn delete_invoice(&mut self, key: Key<Invoice>) -> Result<(), DomainError> {
        self.invoices.require_mut(key)?.delete()?;
        self.update_all_prev_invoices()?;
        info!(invoice = %key.value(), "invoice deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn undelete_invoice(&mut self, key: Key<Invoice>) -> Result<(), DomainError> {
        self.invoices.require_mut(key)?.undelete()?;
        self.update_all_prev_invoices()?;
        info!(invoice = %key.value(), "invoice restored");
        Ok(())
    }

    /// The job must be billed by the invoice's company.
    fn check_invoice_input(&self, input: &InvoiceInput) -> Result<(), DomainError> {
        let company = self.companies.require(input.company)?;
        let job = self.jobs.require(input.job)?;
        match job.company.key() {
            Some(owner) if owner != input.company => Err(DomainError::InvalidState(format!(
                "job {} is not billed by {}",
                job.id, company.name
            ))),
            _ => Ok(()),
        }
    }
}
