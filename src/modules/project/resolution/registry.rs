// Candidate registry used while re-linking references.
//
// Purpose
// - Snapshot every entity of a project as (identity, deleted flag, business attributes) so
//   descriptors can be matched without borrowing the project.
//
// Notes
// - Candidates keep storage order per entity type; fuzzy matching relies on it.
// - Snapshots go stale as soon as links are resolved. Take a fresh one per phase.

use crate::modules::project::core::arena::Arena;
use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::entities::job::Job;
use crate::modules::project::core::entities::person::Person;
use crate::modules::project::core::entities::trade::Trade;
use crate::modules::project::core::project::Project;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::{Entity, EntityType, Identity};
use crate::shared::core::link::{Attribute, Attributes, Key, Link, RefDescriptor};
use std::collections::HashMap;
use tracing::warn;

/// An entity that other entities can point at.
pub trait Referable: Entity + Sized {
    /// Attributes compared in fuzzy mode.
    const MATCH_ON: &'static [Attribute];

    fn attributes(&self, project: &Project) -> Attributes;

    fn arena(project: &Project) -> &Arena<Self>;

    /// Descriptor that identifies this entity both exactly and by business keys.
    fn descriptor(&self, project: &Project) -> RefDescriptor {
        RefDescriptor::new(self.identity().clone(), self.attributes(project))
    }
}

impl Referable for Person {
    const MATCH_ON: &'static [Attribute] = &[Attribute::FirstName, Attribute::LastName];

    fn attributes(&self, _project: &Project) -> Attributes {
        Attributes::from([
            (Attribute::FirstName, self.first_name.clone()),
            (Attribute::LastName, self.last_name.clone()),
        ])
    }

    fn arena(project: &Project) -> &Arena<Self> {
        &project.people
    }
}

impl Referable for Company {
    const MATCH_ON: &'static [Attribute] = &[Attribute::Name];

    fn attributes(&self, _project: &Project) -> Attributes {
        Attributes::from([(Attribute::Name, self.name.clone())])
    }

    fn arena(project: &Project) -> &Arena<Self> {
        &project.companies
    }
}

impl Referable for Trade {
    const MATCH_ON: &'static [Attribute] = &[Attribute::Name];

    fn attributes(&self, _project: &Project) -> Attributes {
        Attributes::from([(Attribute::Name, self.name.clone())])
    }

    fn arena(project: &Project) -> &Arena<Self> {
        &project.trades
    }
}

impl Referable for CostGroup {
    const MATCH_ON: &'static [Attribute] = &[Attribute::Id];

    fn attributes(&self, _project: &Project) -> Attributes {
        Attributes::from([
            (Attribute::Id, self.id.clone()),
            (Attribute::Name, self.name.clone()),
        ])
    }

    fn arena(project: &Project) -> &Arena<Self> {
        &project.cost_groups
    }
}

impl Referable for Job {
    const MATCH_ON: &'static [Attribute] = &[Attribute::Id, Attribute::CompanyName];

    fn attributes(&self, project: &Project) -> Attributes {
        let company_name = project
            .company_name_of_job(self)
            .or_else(|| pending_name(&self.company));
        with_company_name(Attributes::from([(Attribute::Id, self.id.clone())]), company_name)
    }

    fn arena(project: &Project) -> &Arena<Self> {
        &project.jobs
    }
}

impl Referable for Invoice {
    const MATCH_ON: &'static [Attribute] = &[Attribute::Id, Attribute::CompanyName];

    fn attributes(&self, project: &Project) -> Attributes {
        let company_name = self
            .company
            .key()
            .and_then(|key| project.company(key))
            .map(|company| company.name.as_str())
            .or_else(|| pending_name(&self.company));
        with_company_name(Attributes::from([(Attribute::Id, self.id.clone())]), company_name)
    }

    fn arena(project: &Project) -> &Arena<Self> {
        &project.invoices
    }
}

/// Company name carried by a relation that is not linked yet.
fn pending_name(company: &Link<Company>) -> Option<&str> {
    company.descriptor()?.attribute(Attribute::Name)
}

fn with_company_name(mut attributes: Attributes, company_name: Option<&str>) -> Attributes {
    if let Some(name) = company_name {
        attributes.insert(Attribute::CompanyName, name.to_string());
    }
    attributes
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub identity: Identity,
    pub deleted: bool,
    pub attributes: Attributes,
}

#[derive(Debug, Default)]
pub struct Registry {
    candidates: HashMap<EntityType, Vec<Candidate>>,
}

impl Registry {
    pub fn snapshot(project: &Project) -> Self {
        let mut registry = Self::default();
        registry.register::<Person>(project);
        registry.register::<Company>(project);
        registry.register::<Trade>(project);
        registry.register::<CostGroup>(project);
        registry.register::<Job>(project);
        registry.register::<Invoice>(project);
        registry
    }

    fn register<T: Referable>(&mut self, project: &Project) {
        let candidates = T::arena(project)
            .iter()
            .map(|entity| Candidate {
                identity: entity.identity().clone(),
                deleted: entity.is_deleted(),
                attributes: entity.attributes(project),
            })
            .collect();
        self.candidates.insert(T::ENTITY_TYPE, candidates);
    }

    pub fn candidates(&self, entity_type: EntityType) -> &[Candidate] {
        self.candidates
            .get(&entity_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Identity match over all candidates, deleted ones included.
    pub fn find_exact<T: Referable>(
        &self,
        owner: &Identity,
        descriptor: &RefDescriptor,
    ) -> Result<Key<T>, DomainError> {
        let identity = descriptor
            .identity
            .as_ref()
            .ok_or_else(|| unresolved::<T>(owner, None))?;
        check_type::<T>(identity)?;
        self.candidates(T::ENTITY_TYPE)
            .iter()
            .find(|candidate| candidate.identity == *identity)
            .map(|candidate| Key::new(candidate.identity.unique_value))
            .ok_or_else(|| unresolved::<T>(owner, Some(identity)))
    }

    /// Business-key match over live candidates. The first match in storage order wins.
    pub fn find_fuzzy<T: Referable>(
        &self,
        owner: &Identity,
        descriptor: &RefDescriptor,
    ) -> Result<Option<Key<T>>, DomainError> {
        if let Some(identity) = &descriptor.identity {
            check_type::<T>(identity)?;
        }
        let mut matches = self
            .candidates(T::ENTITY_TYPE)
            .iter()
            .filter(|candidate| !candidate.deleted)
            .filter(|candidate| descriptor.matches(&candidate.attributes, T::MATCH_ON));

        let Some(first) = matches.next() else {
            warn!(
                owner = %owner,
                target = %T::ENTITY_TYPE,
                attributes = ?descriptor.attributes,
                "no match for reference, leaving it unresolved"
            );
            return Ok(None);
        };
        let others = matches.count();
        if others > 0 {
            warn!(
                owner = %owner,
                target = %T::ENTITY_TYPE,
                attributes = ?descriptor.attributes,
                chosen = %first.identity,
                ambiguous = others + 1,
                "ambiguous reference, taking the first match"
            );
        }
        Ok(Some(Key::new(first.identity.unique_value)))
    }
}

fn check_type<T: Entity>(identity: &Identity) -> Result<(), DomainError> {
    if identity.entity_type != T::ENTITY_TYPE {
        return Err(DomainError::TypeMismatch {
            expected: T::ENTITY_TYPE,
            found: identity.entity_type,
        });
    }
    Ok(())
}

fn unresolved<T: Entity>(owner: &Identity, identity: Option<&Identity>) -> DomainError {
    DomainError::ReferenceResolution {
        owner: owner.to_string(),
        target: T::ENTITY_TYPE,
        unique_value: identity.map(|identity| identity.unique_value),
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;
    use crate::modules::project::core::config::ProjectConfig;
    use crate::modules::project::core::entities::company::CompanyInput;
    use crate::modules::project::core::entities::cost_group::CostGroupInput;
    use rstest::{fixture, rstest};

    fn group(id: &str, name: &str) -> CostGroup {
        CostGroup::new(CostGroupInput {
            id: id.into(),
            name: name.into(),
            ..CostGroupInput::default()
        })
    }

    #[fixture]
    fn project() -> Project {
        let mut project = Project::new("P-1", ProjectConfig::default());
        project.cost_groups.insert(group("300", "Bauwerk")).unwrap();
        project.cost_groups.insert(group("300", "Bauwerk (alt)")).unwrap();
        project.cost_groups.insert(group("400", "Technik")).unwrap();
        project
            .companies
            .insert(Company::new(CompanyInput {
                name: "Muster Bau GmbH".into(),
                ..CompanyInput::default()
            }))
            .unwrap();
        project
    }

    #[fixture]
    fn owner() -> Identity {
        Identity::new(EntityType::Trade)
    }

    #[rstest]
    fn it_should_match_exactly_on_identity(project: Project, owner: Identity) {
        let target = project.find_cost_group_by_id("400").unwrap();
        let descriptor = RefDescriptor::from_identity(target.identity().clone());
        let registry = Registry::snapshot(&project);

        let key = registry.find_exact::<CostGroup>(&owner, &descriptor).unwrap();
        assert_eq!(key, target.key());
    }

    #[rstest]
    fn it_should_fail_an_exact_miss(project: Project, owner: Identity) {
        let descriptor = RefDescriptor::from_identity(Identity::new(EntityType::CostGroup));
        let registry = Registry::snapshot(&project);

        assert!(matches!(
            registry.find_exact::<CostGroup>(&owner, &descriptor),
            Err(DomainError::ReferenceResolution { target: EntityType::CostGroup, .. })
        ));
    }

    #[rstest]
    fn it_should_reject_an_identity_of_another_type(project: Project, owner: Identity) {
        let descriptor = RefDescriptor::from_identity(Identity::new(EntityType::Company));
        let registry = Registry::snapshot(&project);

        assert!(matches!(
            registry.find_exact::<CostGroup>(&owner, &descriptor),
            Err(DomainError::TypeMismatch {
                expected: EntityType::CostGroup,
                found: EntityType::Company
            })
        ));
    }

    #[rstest]
    fn it_should_take_the_first_of_several_fuzzy_matches(project: Project, owner: Identity) {
        let descriptor = RefDescriptor::default().with(Attribute::Id, " 300 ");
        let registry = Registry::snapshot(&project);

        let key = registry
            .find_fuzzy::<CostGroup>(&owner, &descriptor)
            .unwrap()
            .unwrap();
        assert_eq!(project.cost_group(key).unwrap().name, "Bauwerk");
    }

    #[rstest]
    fn it_should_skip_deleted_candidates_in_fuzzy_mode(mut project: Project, owner: Identity) {
        let first = project.cost_groups.keys()[0];
        project.cost_groups.require_mut(first).unwrap().delete().unwrap();
        let descriptor = RefDescriptor::default().with(Attribute::Id, "300");
        let registry = Registry::snapshot(&project);

        let key = registry
            .find_fuzzy::<CostGroup>(&owner, &descriptor)
            .unwrap()
            .unwrap();
        assert_eq!(project.cost_group(key).unwrap().name, "Bauwerk (alt)");
    }

    #[rstest]
    fn it_should_tolerate_a_fuzzy_miss(project: Project, owner: Identity) {
        let descriptor = RefDescriptor::default().with(Attribute::Name, "Unbekannt GmbH");
        let registry = Registry::snapshot(&project);

        assert_eq!(registry.find_fuzzy::<Company>(&owner, &descriptor).unwrap(), None);
    }

    #[rstest]
    fn it_should_match_companies_case_insensitively(project: Project, owner: Identity) {
        let descriptor = RefDescriptor::default().with(Attribute::Name, "MUSTER BAU GMBH");
        let registry = Registry::snapshot(&project);

        assert!(registry.find_fuzzy::<Company>(&owner, &descriptor).unwrap().is_some());
    }
}
