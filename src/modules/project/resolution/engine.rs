// Turns reference descriptors into live keys.
//
// Notes
// - Exact mode fails on the first miss. Fuzzy mode records the miss, clears the relation and
//   carries on with the next one.
// - A relation holding both a key and a descriptor is fatal in both modes.

use crate::modules::project::resolution::registry::{Referable, Registry};
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::{EntityType, Identity};
use crate::shared::core::link::{Link, LinkList, RefDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Identity match, used after loading a file this application saved.
    Exact,
    /// Business-key match, used after importing foreign data.
    Fuzzy,
}

/// A reference fuzzy mode could not place.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedReference {
    pub owner: Identity,
    pub target: EntityType,
    pub descriptor: RefDescriptor,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionOutcome {
    pub resolved: usize,
    pub unresolved: Vec<UnresolvedReference>,
}

impl ResolutionOutcome {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

pub fn resolve_link<T: Referable>(
    owner: &Identity,
    link: &mut Link<T>,
    mode: Mode,
    registry: &Registry,
    outcome: &mut ResolutionOutcome,
) -> Result<(), DomainError> {
    link.check(owner)?;
    let Some(descriptor) = link.descriptor() else {
        return Ok(());
    };
    match mode {
        Mode::Exact => {
            let key = registry.find_exact::<T>(owner, descriptor)?;
            link.resolve(key);
            outcome.resolved += 1;
        }
        Mode::Fuzzy => match registry.find_fuzzy::<T>(owner, descriptor)? {
            Some(key) => {
                link.resolve(key);
                outcome.resolved += 1;
            }
            None => {
                outcome.unresolved.push(UnresolvedReference {
                    owner: owner.clone(),
                    target: T::ENTITY_TYPE,
                    descriptor: descriptor.clone(),
                });
                link.abandon();
            }
        },
    }
    Ok(())
}

/// Resolves every descriptor of the list, keeping their order. Fuzzy misses are dropped.
pub fn resolve_list<T: Referable>(
    owner: &Identity,
    list: &mut LinkList<T>,
    mode: Mode,
    registry: &Registry,
    outcome: &mut ResolutionOutcome,
) -> Result<(), DomainError> {
    list.check(owner)?;
    if !list.is_pending() {
        return Ok(());
    }
    let mut keys = Vec::with_capacity(list.descriptors().len());
    for descriptor in list.descriptors() {
        let found = match mode {
            Mode::Exact => Some(registry.find_exact::<T>(owner, descriptor)?),
            Mode::Fuzzy => registry.find_fuzzy::<T>(owner, descriptor)?,
        };
        match found {
            Some(key) => keys.push(key),
            None => outcome.unresolved.push(UnresolvedReference {
                owner: owner.clone(),
                target: T::ENTITY_TYPE,
                descriptor: descriptor.clone(),
            }),
        }
    }
    outcome.resolved += keys.len();
    list.resolve_all(keys);
    Ok(())
}
