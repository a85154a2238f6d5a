// Shared test fixtures.
//
// - `site()` is a small, fully linked project built through the public mutators.
// - `InvoiceInputBuilder` produces invoices against the default project config.

use crate::modules::project::core::config::ProjectConfig;
use crate::modules::project::core::entities::company::{Company, CompanyInput};
use crate::modules::project::core::entities::cost_group::{CostGroup, CostGroupInput};
use crate::modules::project::core::entities::invoice::InvoiceInput;
use crate::modules::project::core::entities::job::{ConstructionInput, Job, JobInput};
use crate::modules::project::core::entities::person::{Person, PersonInput};
use crate::modules::project::core::entities::trade::{Trade, TradeInput};
use crate::modules::project::core::project::Project;
use crate::shared::core::link::Key;
use chrono::NaiveDate;
use rstest::fixture;

/// Export of two companies from another project. The second one duplicates the site company.
pub const COMPANIES_JSON: &str = include_str!("json/companies.json");

pub fn on(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub struct ProjectBuilder {
    identifier: String,
    config: ProjectConfig,
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            identifier: "P-2024-01".into(),
            config: ProjectConfig::default(),
        }
    }

    pub fn identifier(mut self, v: impl Into<String>) -> Self {
        self.identifier = v.into();
        self
    }

    pub fn config(mut self, v: ProjectConfig) -> Self {
        self.config = v;
        self
    }

    pub fn build(self) -> Project {
        Project::new(self.identifier, self.config)
    }
}

/// A project with one of everything, linked up.
pub struct Site {
    pub project: Project,
    pub person: Key<Person>,
    pub company: Key<Company>,
    pub main_group: Key<CostGroup>,
    pub sub_group: Key<CostGroup>,
    pub trade: Key<Trade>,
    pub job: Key<Job>,
}

#[fixture]
pub fn site() -> Site {
    let mut project = ProjectBuilder::new().build();
    let main_group = project
        .input_new_cost_group(CostGroupInput {
            id: "300".into(),
            name: "Bauwerk - Baukonstruktionen".into(),
            ..CostGroupInput::default()
        })
        .unwrap();
    let sub_group = project
        .input_new_cost_group(CostGroupInput {
            id: "330".into(),
            name: "Außenwände".into(),
            parent: Some(main_group),
            ..CostGroupInput::default()
        })
        .unwrap();
    let trade = project
        .input_new_trade(TradeInput {
            name: "Rohbau".into(),
            budget: 50_000.0,
            cost_group: Some(sub_group),
            ..TradeInput::default()
        })
        .unwrap();
    let person = project
        .input_new_person(PersonInput {
            first_name: "Erika".into(),
            last_name: "Mustermann".into(),
            email: Some("erika@musterbau.de".into()),
            ..PersonInput::default()
        })
        .unwrap();
    let company = project
        .input_new_company(CompanyInput {
            name: "Muster Bau GmbH".into(),
            service: Some("Rohbau".into()),
            contact_person: Some(person),
            ..CompanyInput::default()
        })
        .unwrap();
    let job = project
        .input_new_job(JobInput {
            id: "A-01".into(),
            company,
            job_sum: 40_000.0,
            comment: None,
            construction: Some(ConstructionInput {
                trade: Some(trade),
                ..ConstructionInput::default()
            }),
        })
        .unwrap();

    Site {
        project,
        person,
        company,
        main_group,
        sub_group,
        trade,
        job,
    }
}

pub struct InvoiceInputBuilder {
    inner: InvoiceInput,
}

#[allow(dead_code)]
impl InvoiceInputBuilder {
    pub fn new(company: Key<Company>, job: Key<Job>) -> Self {
        Self {
            inner: InvoiceInput::new(
                "R-1",
                company,
                job,
                on(2024, 1, 1),
                &ProjectConfig::default(),
            ),
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn date(mut self, v: NaiveDate) -> Self {
        self.inner.invoice_date = v;
        self
    }

    /// Sets both the invoiced and the verified amount.
    pub fn verified(mut self, v: f64) -> Self {
        self.inner.amount = v;
        self.inner.verified_amount = v;
        self
    }

    pub fn cumulative(mut self, v: bool) -> Self {
        self.inner.cumulative = v;
        self
    }

    pub fn rebate(mut self, v: f64) -> Self {
        self.inner.rebate = v;
        self
    }

    pub fn build(self) -> InvoiceInput {
        self.inner
    }
}
