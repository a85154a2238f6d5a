use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::trade::Trade;
use crate::shared::core::identity::{Entity, EntityType, Meta};
use crate::shared::core::link::{Key, Link};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dated amount with a free-text comment. Used for job additions and paid safety deposits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedAmount {
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

pub type JobAddition = DatedAmount;
pub type PaidSafetyDeposit = DatedAmount;

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionDetails {
    pub trade: Link<Trade>,
    pub job_additions: Vec<JobAddition>,
    pub paid_safety_deposits: Vec<PaidSafetyDeposit>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    General,
    Construction(ConstructionDetails),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructionInput {
    pub trade: Option<Key<Trade>>,
    pub job_additions: Vec<JobAddition>,
    pub paid_safety_deposits: Vec<PaidSafetyDeposit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobInput {
    pub id: String,
    pub company: Key<Company>,
    pub job_sum: f64,
    pub comment: Option<String>,
    pub construction: Option<ConstructionInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub meta: Meta,
    pub id: String,
    pub job_sum: f64,
    pub comment: Option<String>,
    pub company: Link<Company>,
    pub kind: JobKind,
}

impl Job {
    pub fn new(input: JobInput) -> Self {
        Self {
            meta: Meta::new(EntityType::Job),
            id: input.id,
            job_sum: input.job_sum,
            comment: input.comment,
            company: Link::to(input.company),
            kind: kind_from(input.construction),
        }
    }

    pub fn update(&mut self, input: JobInput) {
        self.id = input.id;
        self.job_sum = input.job_sum;
        self.comment = input.comment;
        self.company.set(Some(input.company));
        self.kind = kind_from(input.construction);
        self.touch();
    }

    pub fn construction(&self) -> Option<&ConstructionDetails> {
        match &self.kind {
            JobKind::Construction(details) => Some(details),
            JobKind::General => None,
        }
    }

    pub fn construction_mut(&mut self) -> Option<&mut ConstructionDetails> {
        match &mut self.kind {
            JobKind::Construction(details) => Some(details),
            JobKind::General => None,
        }
    }

    pub fn trade(&self) -> Option<Key<Trade>> {
        self.construction().and_then(|details| details.trade.key())
    }

    pub fn additions_sum(&self) -> f64 {
        self.construction()
            .map(|details| details.job_additions.iter().map(|a| a.amount).sum())
            .unwrap_or(0.0)
    }

    pub fn job_sum_w_additions(&self) -> f64 {
        self.job_sum + self.additions_sum()
    }

    pub fn job_sum_w_additions_w_vat(&self, vat: f64) -> f64 {
        self.job_sum_w_additions() * (1.0 + vat)
    }

    pub fn paid_safety_deposits_sum(&self) -> f64 {
        self.construction()
            .map(|details| details.paid_safety_deposits.iter().map(|d| d.amount).sum())
            .unwrap_or(0.0)
    }
}

fn kind_from(construction: Option<ConstructionInput>) -> JobKind {
    match construction {
        Some(input) => JobKind::Construction(ConstructionDetails {
            trade: Link::from_option(input.trade),
            job_additions: input.job_additions,
            paid_safety_deposits: input.paid_safety_deposits,
        }),
        None => JobKind::General,
    }
}

impl Entity for Job {
    const ENTITY_TYPE: EntityType = EntityType::Job;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
