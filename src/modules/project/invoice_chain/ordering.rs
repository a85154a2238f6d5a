// Invoice ledger per (company, job).
//
// Purpose
// - Keep the invoice collection newest first.
// - Derive, for every live cumulative invoice, the invoices before it and the verified amount
//   carried forward from the newest of them.
//
// Notes
// - "Before" means an earlier invoice date, or the same date and an earlier creation time.
// - The whole ledger is recomputed after every invoice mutation.

use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::entities::job::Job;
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use tracing::{debug, instrument, warn};

/// Newest invoice date first, then newest creation time first.
pub fn newest_first(a: &Invoice, b: &Invoice) -> Ordering {
    b.invoice_date
        .cmp(&a.invoice_date)
        .then_with(|| b.identity().created_at.cmp(&a.identity().created_at))
}

struct LedgerPlan {
    invoice: Key<Invoice>,
    predecessors: Vec<Key<Invoice>>,
    carried_forward: f64,
}

impl Project {
    pub fn sort_invoices(&mut self) {
        self.invoices.sort_by(newest_first);
    }

    /// Live cumulative invoices of the (company, job) ledger that precede the given point in
    /// time, newest first.
    pub fn predecessors_of(
        &self,
        company: Key<Company>,
        job: Key<Job>,
        invoice_date: NaiveDate,
        created_at: DateTime<Utc>,
        exclude: Option<Key<Invoice>>,
    ) -> Vec<&Invoice> {
        let mut predecessors: Vec<_> = self
            .invoices
            .live()
            .filter(|candidate| candidate.cumulative)
            .filter(|candidate| Some(candidate.key()) != exclude)
            .filter(|candidate| {
                candidate.company.points_to(company) && candidate.job.points_to(job)
            })
            .filter(|candidate| {
                (candidate.invoice_date, candidate.identity().created_at)
                    < (invoice_date, created_at)
            })
            .collect();
        predecessors.sort_by(|a, b| newest_first(a, b));
        predecessors
    }

    /// Invoices before `invoice` in its ledger, newest first. Empty for non-cumulative
    /// invoices and invoices without a live company or job.
    pub fn get_prev_invoices(&self, invoice: Key<Invoice>) -> Result<Vec<&Invoice>, DomainError> {
        let invoice = self.invoices.require(invoice)?;
        Ok(self.ledger_predecessors(invoice))
    }

    /// Verified amount of the newest predecessor, zero when there is none.
    pub fn carried_forward_amount(&self, invoice: Key<Invoice>) -> Result<f64, DomainError> {
        let invoice = self.invoices.require(invoice)?;
        Ok(carried_forward(invoice, &self.ledger_predecessors(invoice)))
    }

    fn ledger_predecessors(&self, invoice: &Invoice) -> Vec<&Invoice> {
        if !invoice.cumulative {
            return Vec::new();
        }
        match (invoice.company.key(), invoice.job.key()) {
            (Some(company), Some(job)) => self.predecessors_of(
                company,
                job,
                invoice.invoice_date,
                invoice.identity().created_at,
                Some(invoice.key()),
            ),
            _ => Vec::new(),
        }
    }

    /// Re-sort the invoices and rebuild every live invoice's previous-invoice list and
    /// carried-forward amount.
    #[instrument(skip(self), fields(project = %self.identifier))]
    pub fn update_all_prev_invoices(&mut self) -> Result<(), DomainError> {
        self.sort_invoices();

        let plans: Vec<LedgerPlan> = self
            .invoices
            .live()
            .map(|invoice| {
                let predecessors = self.ledger_predecessors(invoice);
                LedgerPlan {
                    invoice: invoice.key(),
                    carried_forward: carried_forward(invoice, &predecessors),
                    predecessors: predecessors.iter().map(|p| p.key()).collect(),
                }
            })
            .collect();

        for plan in &plans {
            self.invoices.require_mut(plan.invoice)?.prev_invoices.clear();
        }
        for plan in plans {
            for predecessor in &plan.predecessors {
                self.link_prev_invoice(plan.invoice, *predecessor)?;
            }
            self.invoices.require_mut(plan.invoice)?.prev_invoices_amount = plan.carried_forward;
        }
        debug!(invoices = self.invoices.len(), "invoice ledger recomputed");
        Ok(())
    }
}

fn carried_forward(invoice: &Invoice, predecessors: &[&Invoice]) -> f64 {
    let Some(newest) = predecessors.first() else {
        return 0.0;
    };
    let tied = predecessors
        .get(1)
        .filter(|runner_up| newest_first(newest, runner_up) == Ordering::Equal);
    if let Some(runner_up) = tied {
        warn!(
            invoice = %invoice.identity(),
            first = %newest.identity(),
            second = %runner_up.identity(),
            "two predecessors share date and creation time, using the first"
        );
    }
    newest.verified_amount
}
