// Invoice entity.
//
// Notes
// - `prev_invoices` and `prev_invoices_amount` are derived by the invoice chain and are
//   overwritten by `Project::update_all_prev_invoices`.
// - Rebate, reductions, VAT, safety deposit and discount are fractions (0.05 for 5 %).

use crate::modules::project::core::config::ProjectConfig;
use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::job::Job;
use crate::shared::core::identity::{Entity, EntityType, Meta};
use crate::shared::core::link::{Key, Link, LinkList};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceInput {
    pub id: String,
    pub company: Key<Company>,
    pub job: Key<Job>,
    pub invoice_date: NaiveDate,
    pub date_received: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub amount: f64,
    pub verified_amount: f64,
    pub rebate: f64,
    pub reduction_insurance: f64,
    pub reduction_usage: f64,
    pub vat: f64,
    pub safety_deposit: f64,
    pub safety_deposit_override: Option<f64>,
    pub discount: f64,
    pub cumulative: bool,
}

impl InvoiceInput {
    /// Input with VAT, safety deposit and the cumulative flag taken from the project config.
    pub fn new(
        id: impl Into<String>,
        company: Key<Company>,
        job: Key<Job>,
        invoice_date: NaiveDate,
        config: &ProjectConfig,
    ) -> Self {
        Self {
            id: id.into(),
            company,
            job,
            invoice_date,
            date_received: None,
            due_date: None,
            amount: 0.0,
            verified_amount: 0.0,
            rebate: 0.0,
            reduction_insurance: 0.0,
            reduction_usage: 0.0,
            vat: config.vat,
            safety_deposit: config.safety_deposit,
            safety_deposit_override: None,
            discount: 0.0,
            cumulative: config.cumulative_invoices,
        }
    }

    pub fn amounts(mut self, amount: f64, verified_amount: f64) -> Self {
        self.amount = amount;
        self.verified_amount = verified_amount;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub meta: Meta,
    pub id: String,
    pub invoice_date: NaiveDate,
    pub date_received: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub amount: f64,
    pub verified_amount: f64,
    pub rebate: f64,
    pub reduction_insurance: f64,
    pub reduction_usage: f64,
    pub vat: f64,
    pub safety_deposit: f64,
    /// Absolute safety deposit that replaces the computed fraction when set.
    pub safety_deposit_override: Option<f64>,
    pub discount: f64,
    pub cumulative: bool,
    pub company: Link<Company>,
    pub job: Link<Job>,
    pub prev_invoices: LinkList<Invoice>,
    pub prev_invoices_amount: f64,
}

impl Invoice {
    pub fn new(input: InvoiceInput) -> Self {
        let mut invoice = Self {
            meta: Meta::new(EntityType::Invoice),
            id: String::new(),
            invoice_date: input.invoice_date,
            date_received: None,
            due_date: None,
            amount: 0.0,
            verified_amount: 0.0,
            rebate: 0.0,
            reduction_insurance: 0.0,
            reduction_usage: 0.0,
            vat: 0.0,
            safety_deposit: 0.0,
            safety_deposit_override: None,
            discount: 0.0,
            cumulative: false,
            company: Link::empty(),
            job: Link::empty(),
            prev_invoices: LinkList::new(),
            prev_invoices_amount: 0.0,
        };
        invoice.assign(input);
        invoice
    }

    pub fn update(&mut self, input: InvoiceInput) {
        self.assign(input);
        self.touch();
    }

    fn assign(&mut self, input: InvoiceInput) {
        self.id = input.id;
        self.company.set(Some(input.company));
        self.job.set(Some(input.job));
        self.invoice_date = input.invoice_date;
        self.date_received = input.date_received;
        self.due_date = input.due_date;
        self.amount = input.amount;
        self.verified_amount = input.verified_amount;
        self.rebate = input.rebate;
        self.reduction_insurance = input.reduction_insurance;
        self.reduction_usage = input.reduction_usage;
        self.vat = input.vat;
        self.safety_deposit = input.safety_deposit;
        self.safety_deposit_override = input.safety_deposit_override;
        self.discount = input.discount;
        self.cumulative = input.cumulative;
    }
}

impl Entity for Invoice {
    const ENTITY_TYPE: EntityType = EntityType::Invoice;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
