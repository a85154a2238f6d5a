// On-disk shape of a project.
//
// Purpose
// - One record type per entity collection, with reference descriptors in place of live keys.
//
// Notes
// - Every record carries its identity block (with the entity type tag) and `deleted`.
// - Dates are ISO strings, timestamps RFC 3339, percentages fractions.
// - `prev_invoices_amount` is derived and not stored; previous invoices are stored as
//   descriptors.

use crate::modules::project::core::config::ProjectConfig;
use crate::modules::project::core::entities::address::Address;
use crate::modules::project::core::entities::cost_calculation::CalculationType;
use crate::modules::project::core::entities::job::DatedAmount;
use crate::modules::project::core::entities::person::Person;
use crate::modules::project::core::project::ProjectDates;
use crate::shared::core::identity::Meta;
use crate::shared::core::link::RefDescriptor;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Archive entry names.
pub mod entries {
    pub const PROJECT: &str = "project.json";
    pub const PEOPLE: &str = "people.json";
    pub const COMPANIES: &str = "companies.json";
    pub const TRADES: &str = "trades.json";
    pub const COST_GROUPS: &str = "cost_groups.json";
    pub const JOBS: &str = "jobs.json";
    pub const INVOICES: &str = "invoices.json";
    pub const PROJECT_COST_CALCULATIONS: &str = "project_cost_calculations.json";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(flatten)]
    pub meta: Meta,
    pub identifier: String,
    #[serde(default)]
    pub config: ProjectConfig,
    #[serde(default)]
    pub dates: ProjectDates,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<RefDescriptor>,
}

/// People carry no relations, the entity is its own record.
pub type PersonRecord = Person;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<RefDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_group: Option<RefDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostGroupRecord {
    #[serde(flatten)]
    pub meta: Meta,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<RefDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<RefDescriptor>,
    #[serde(default)]
    pub job_additions: Vec<DatedAmount>,
    #[serde(default)]
    pub paid_safety_deposits: Vec<DatedAmount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(flatten)]
    pub meta: Meta,
    pub id: String,
    #[serde(default)]
    pub job_sum: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<RefDescriptor>,
    /// Present for construction jobs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<ConstructionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(flatten)]
    pub meta: Meta,
    pub id: String,
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub date_received: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub verified_amount: f64,
    #[serde(default)]
    pub rebate: f64,
    #[serde(default)]
    pub reduction_insurance: f64,
    #[serde(default)]
    pub reduction_usage: f64,
    #[serde(default)]
    pub vat: f64,
    #[serde(default)]
    pub safety_deposit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_deposit_amount: Option<f64>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub cumulative: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<RefDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<RefDescriptor>,
    #[serde(default)]
    pub prev_invoices: Vec<RefDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItemRecord {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub units: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_group: Option<RefDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<RefDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCalculationRecord {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    #[serde(default)]
    pub calculation_type: CalculationType,
    pub date: NaiveDate,
    #[serde(default)]
    pub inventory: Vec<InventoryItemRecord>,
}

/// A whole project in record form. Also the shape a spreadsheet importer hands over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub project: ProjectRecord,
    #[serde(default)]
    pub people: Vec<PersonRecord>,
    #[serde(default)]
    pub companies: Vec<CompanyRecord>,
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
    #[serde(default)]
    pub cost_groups: Vec<CostGroupRecord>,
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
    #[serde(default)]
    pub invoices: Vec<InvoiceRecord>,
    #[serde(default)]
    pub project_cost_calculations: Vec<CostCalculationRecord>,
}
