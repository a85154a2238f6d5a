// Cost groups form a tree keyed by a hierarchical business id ("300", "310", ...).
//
// Notes
// - A group without a parent is a main group.
// - The ancestor walk tracks visited groups so a corrupt parent chain ends instead of looping.

use crate::modules::project::core::arena::Arena;
use crate::shared::core::identity::{Entity, EntityType, Meta};
use crate::shared::core::link::{Key, Link};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostGroupInput {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub budget: f64,
    pub parent: Option<Key<CostGroup>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostGroup {
    pub meta: Meta,
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub budget: f64,
    pub parent: Link<CostGroup>,
}

impl CostGroup {
    pub fn new(input: CostGroupInput) -> Self {
        Self {
            meta: Meta::new(EntityType::CostGroup),
            id: input.id,
            name: input.name,
            description: input.description,
            budget: input.budget,
            parent: Link::from_option(input.parent),
        }
    }

    pub fn update(&mut self, input: CostGroupInput) {
        self.id = input.id;
        self.name = input.name;
        self.description = input.description;
        self.budget = input.budget;
        self.parent.set(input.parent);
        self.touch();
    }

    pub fn is_main_group(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn ancestors<'a>(&self, groups: &'a Arena<CostGroup>) -> Ancestors<'a> {
        let mut visited = HashSet::new();
        visited.insert(self.key());
        Ancestors {
            groups,
            next: self.parent.key(),
            visited,
            reentry: None,
        }
    }

    /// Transitive: true when `ancestor` appears anywhere on this group's parent chain.
    pub fn is_sub_group_of(&self, ancestor: Key<CostGroup>, groups: &Arena<CostGroup>) -> bool {
        self.ancestors(groups).any(|group| group.key() == ancestor)
    }

    /// True when the parent chain runs back into a group already seen.
    pub fn has_cyclic_ancestry(&self, groups: &Arena<CostGroup>) -> bool {
        self.reentry(groups).is_some()
    }

    /// True when the parent chain comes back to this very group.
    pub fn lies_on_cycle(&self, groups: &Arena<CostGroup>) -> bool {
        self.reentry(groups) == Some(self.key())
    }

    fn reentry(&self, groups: &Arena<CostGroup>) -> Option<Key<CostGroup>> {
        let mut ancestors = self.ancestors(groups);
        while ancestors.next().is_some() {}
        ancestors.reentry
    }

    pub fn depth(&self, groups: &Arena<CostGroup>) -> usize {
        self.ancestors(groups).count()
    }
}

impl Entity for CostGroup {
    const ENTITY_TYPE: EntityType = EntityType::CostGroup;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

pub struct Ancestors<'a> {
    groups: &'a Arena<CostGroup>,
    next: Option<Key<CostGroup>>,
    visited: HashSet<Key<CostGroup>>,
    reentry: Option<Key<CostGroup>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a CostGroup;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next.take()?;
        if !self.visited.insert(key) {
            self.reentry = Some(key);
            return None;
        }
        let group = self.groups.get(key)?;
        self.next = group.parent.key();
        Some(group)
    }
}
