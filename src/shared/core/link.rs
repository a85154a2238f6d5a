// Relations between entities.
//
// Purpose
// - `Key<T>` addresses an entity of type T inside the project arena.
// - `RefDescriptor` is the serializable stand-in for a relation (identity and/or business keys).
// - `Link<T>` and `LinkList<T>` hold either live keys or descriptors, never both.
//
// Boundaries
// - Only the resolution engine turns descriptors into keys (`resolve`, `abandon`).

use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

pub struct Key<T> {
    value: Uuid,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub fn new(value: Uuid) -> Self {
        Self {
            value,
            _entity: PhantomData,
        }
    }

    pub fn value(&self) -> Uuid {
        self.value
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Key<T> {}

impl<T> Hash for Key<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.value)
    }
}

/// Business attributes a descriptor can carry for fuzzy matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Id,
    Name,
    FirstName,
    LastName,
    CompanyName,
}

pub type Attributes = BTreeMap<Attribute, String>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

impl RefDescriptor {
    pub fn new(identity: Identity, attributes: Attributes) -> Self {
        Self {
            identity: Some(identity),
            attributes,
        }
    }

    pub fn from_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            attributes: Attributes::new(),
        }
    }

    pub fn from_attributes(attributes: Attributes) -> Self {
        Self {
            identity: None,
            attributes,
        }
    }

    pub fn with(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        self.attributes.insert(attribute, value.into());
        self
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        self.attributes.get(&attribute).map(String::as_str)
    }

    /// True when every attribute in `on` is present here and equal (trimmed, case-insensitive)
    /// to the candidate's value.
    pub fn matches(&self, candidate: &Attributes, on: &[Attribute]) -> bool {
        !on.is_empty()
            && on.iter().all(|attribute| {
                match (self.attributes.get(attribute), candidate.get(attribute)) {
                    (Some(wanted), Some(actual)) => normalize(wanted) == normalize(actual),
                    _ => false,
                }
            })
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

pub struct Link<T> {
    target: Option<Key<T>>,
    descriptor: Option<RefDescriptor>,
}

impl<T> Link<T> {
    pub fn empty() -> Self {
        Self {
            target: None,
            descriptor: None,
        }
    }

    pub fn to(key: Key<T>) -> Self {
        Self {
            target: Some(key),
            descriptor: None,
        }
    }

    pub fn unresolved(descriptor: RefDescriptor) -> Self {
        Self {
            target: None,
            descriptor: Some(descriptor),
        }
    }

    pub fn from_option(key: Option<Key<T>>) -> Self {
        Self {
            target: key,
            descriptor: None,
        }
    }

    pub fn key(&self) -> Option<Key<T>> {
        self.target
    }

    pub fn descriptor(&self) -> Option<&RefDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.descriptor.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.descriptor.is_none()
    }

    pub fn points_to(&self, key: Key<T>) -> bool {
        self.target == Some(key)
    }

    /// Replace the relation with a live key (or nothing), dropping any descriptor.
    pub fn set(&mut self, key: Option<Key<T>>) {
        self.target = key;
        self.descriptor = None;
    }

    pub fn check(&self, owner: &Identity) -> Result<(), DomainError> {
        if self.target.is_some() && self.descriptor.is_some() {
            return Err(DomainError::InconsistentState {
                owner: owner.to_string(),
                detail: "reference holds both a live key and a descriptor".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn resolve(&mut self, key: Key<T>) {
        self.target = Some(key);
        self.descriptor = None;
    }

    pub(crate) fn abandon(&mut self) {
        self.target = None;
        self.descriptor = None;
    }

    #[cfg(test)]
    pub(crate) fn corrupt(key: Key<T>, descriptor: RefDescriptor) -> Self {
        Self {
            target: Some(key),
            descriptor: Some(descriptor),
        }
    }
}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.descriptor == other.descriptor
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("target", &self.target)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// Ordered to-many relation.
pub struct LinkList<T> {
    targets: Vec<Key<T>>,
    descriptors: Vec<RefDescriptor>,
}

impl<T> LinkList<T> {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            descriptors: Vec::new(),
        }
    }

    pub fn unresolved(descriptors: Vec<RefDescriptor>) -> Self {
        Self {
            targets: Vec::new(),
            descriptors,
        }
    }

    pub fn keys(&self) -> &[Key<T>] {
        &self.targets
    }

    pub fn descriptors(&self) -> &[RefDescriptor] {
        &self.descriptors
    }

    pub fn is_pending(&self) -> bool {
        !self.descriptors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.descriptors.is_empty()
    }

    pub fn contains(&self, key: Key<T>) -> bool {
        self.targets.contains(&key)
    }

    pub fn push(&mut self, key: Key<T>) {
        if !self.targets.contains(&key) {
            self.targets.push(key);
        }
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.descriptors.clear();
    }

    pub fn check(&self, owner: &Identity) -> Result<(), DomainError> {
        if !self.targets.is_empty() && !self.descriptors.is_empty() {
            return Err(DomainError::InconsistentState {
                owner: owner.to_string(),
                detail: "reference list holds both live keys and descriptors".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn resolve_all(&mut self, keys: Vec<Key<T>>) {
        self.descriptors.clear();
        self.targets.clear();
        for key in keys {
            self.push(key);
        }
    }
}

impl<T> Default for LinkList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for LinkList<T> {
    fn clone(&self) -> Self {
        Self {
            targets: self.targets.clone(),
            descriptors: self.descriptors.clone(),
        }
    }
}

impl<T> PartialEq for LinkList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.targets == other.targets && self.descriptors == other.descriptors
    }
}

impl<T> fmt::Debug for LinkList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkList")
            .field("targets", &self.targets)
            .field("descriptors", &self.descriptors)
            .finish()
    }
}
