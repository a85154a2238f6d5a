// Identity and audit metadata carried by every project entity.
//
// Purpose
// - Give each entity an identity that survives the save/load boundary.
// - Track creation and edit timestamps and the soft-delete flag.
//
// Notes
// - Identities compare by (entity_type, unique_value). Timestamps are metadata.
// - Timestamps come from `now()`, which never hands out the same instant twice in a process.

use crate::shared::core::errors::DomainError;
use crate::shared::core::link::Key;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Address,
    Person,
    Company,
    Trade,
    CostGroup,
    Job,
    Invoice,
    ProjectCostCalculation,
    InventoryItem,
    Project,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityType::Address => "address",
            EntityType::Person => "person",
            EntityType::Company => "company",
            EntityType::Trade => "trade",
            EntityType::CostGroup => "cost_group",
            EntityType::Job => "job",
            EntityType::Invoice => "invoice",
            EntityType::ProjectCostCalculation => "project_cost_calculation",
            EntityType::InventoryItem => "inventory_item",
            EntityType::Project => "project",
        };
        f.write_str(name)
    }
}

static LAST_TICK: AtomicI64 = AtomicI64::new(i64::MIN);

/// Wall clock time, strictly increasing across calls.
pub fn now() -> DateTime<Utc> {
    let wall = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
    let mut last = LAST_TICK.load(Ordering::Relaxed);
    loop {
        let next = wall.max(last.saturating_add(1));
        match LAST_TICK.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return DateTime::from_timestamp_nanos(next),
            Err(current) => last = current,
        }
    }
}

/// Moves the clock past `at`, so identities minted afterwards sort after it.
pub fn observe(at: DateTime<Utc>) {
    if let Some(nanos) = at.timestamp_nanos_opt() {
        LAST_TICK.fetch_max(nanos, Ordering::AcqRel);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub entity_type: EntityType,
    pub unique_value: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            unique_value: Uuid::now_v7(),
            created_at: now(),
            edited_at: None,
        }
    }

    /// Copy of this identity with a fresh `edited_at`.
    pub fn mark_edited(&self) -> Self {
        Self {
            edited_at: Some(now()),
            ..self.clone()
        }
    }

    /// Same type and timestamps under a new `unique_value`.
    pub fn reissue(&self) -> Self {
        Self {
            unique_value: Uuid::now_v7(),
            ..self.clone()
        }
    }

    pub fn last_change(&self) -> DateTime<Utc> {
        self.edited_at.unwrap_or(self.created_at)
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.entity_type == other.entity_type && self.unique_value == other.unique_value
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity_type.hash(state);
        self.unique_value.hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.entity_type, self.unique_value)
    }
}

/// Identity plus the soft-delete flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub identity: Identity,
    #[serde(default)]
    pub deleted: bool,
}

impl Meta {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            identity: Identity::new(entity_type),
            deleted: false,
        }
    }
}

pub trait Entity {
    const ENTITY_TYPE: EntityType;

    fn meta(&self) -> &Meta;
    fn meta_mut(&mut self) -> &mut Meta;

    fn identity(&self) -> &Identity {
        &self.meta().identity
    }

    fn key(&self) -> Key<Self>
    where
        Self: Sized,
    {
        Key::new(self.identity().unique_value)
    }

    fn is_deleted(&self) -> bool {
        self.meta().deleted
    }

    fn touch(&mut self) {
        let meta = self.meta_mut();
        meta.identity = meta.identity.mark_edited();
    }

    fn delete(&mut self) -> Result<(), DomainError> {
        if self.is_deleted() {
            return Err(DomainError::InvalidState(format!(
                "{} is already deleted",
                self.identity()
            )));
        }
        self.meta_mut().deleted = true;
        self.touch();
        Ok(())
    }

    fn undelete(&mut self) -> Result<(), DomainError> {
        if !self.is_deleted() {
            return Err(DomainError::InvalidState(format!(
                "{} is not deleted",
                self.identity()
            )));
        }
        self.meta_mut().deleted = false;
        self.touch();
        Ok(())
    }
}
