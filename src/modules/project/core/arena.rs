// Backing storage for one entity collection of a project.
//
// Notes
// - Entities are never removed; soft-deleted ones stay addressable by key.
// - The index maps unique values to positions and is rebuilt after every reorder.

use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::Entity;
use crate::shared::core::link::Key;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<T>,
    index: HashMap<Uuid, usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Entity> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<T>) -> Result<Self, DomainError> {
        let mut arena = Self::new();
        for item in items {
            arena.insert(item)?;
        }
        Ok(arena)
    }

    pub fn insert(&mut self, item: T) -> Result<Key<T>, DomainError> {
        if item.identity().entity_type != T::ENTITY_TYPE {
            return Err(DomainError::TypeMismatch {
                expected: T::ENTITY_TYPE,
                found: item.identity().entity_type,
            });
        }
        let key = item.key();
        if self.index.contains_key(&key.value()) {
            return Err(DomainError::InconsistentState {
                owner: item.identity().to_string(),
                detail: "identity is already present in the project".into(),
            });
        }
        self.index.insert(key.value(), self.items.len());
        self.items.push(item);
        Ok(key)
    }

    pub fn get(&self, key: Key<T>) -> Option<&T> {
        self.index.get(&key.value()).map(|&position| &self.items[position])
    }

    pub fn get_mut(&mut self, key: Key<T>) -> Option<&mut T> {
        let position = *self.index.get(&key.value())?;
        self.items.get_mut(position)
    }

    pub fn require(&self, key: Key<T>) -> Result<&T, DomainError> {
        self.get(key).ok_or_else(|| not_found::<T>(key))
    }

    pub fn require_mut(&mut self, key: Key<T>) -> Result<&mut T, DomainError> {
        self.get_mut(key).ok_or_else(|| not_found::<T>(key))
    }

    pub fn contains(&self, key: Key<T>) -> bool {
        self.index.contains_key(&key.value())
    }

    /// All entities in storage order, deleted ones included.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Entities that are not soft-deleted, in storage order.
    pub fn live(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| !item.is_deleted())
    }

    pub fn keys(&self) -> Vec<Key<T>> {
        self.items.iter().map(Entity::key).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.identity().unique_value, position))
            .collect();
    }
}

fn not_found<T: Entity>(key: Key<T>) -> DomainError {
    DomainError::NotFound {
        entity_type: T::ENTITY_TYPE,
        unique_value: key.value(),
    }
}
