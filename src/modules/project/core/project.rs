// Project aggregate root.
//
// Purpose
// - Own every entity collection of one construction project.
// - Expose read views that hide soft-deleted entities.
//
// Responsibilities
// - Keyed lookups into the collections, deleted entities included.
// - Business-key lookups used by the import path (company name, trade name, cost group id).
// - Whole-graph link check.
//
// Notes
// - Mutators live next to their use case (`use_cases::manage_entities`), resolution in
//   `resolution::restore` and the invoice ledger in `invoice_chain`.
// - The invoice collection is kept newest first by `update_all_prev_invoices`.

use crate::modules::project::core::arena::Arena;
use crate::modules::project::core::config::ProjectConfig;
use crate::modules::project::core::entities::address::{Address, AddressInput};
use crate::modules::project::core::entities::company::Company;
use crate::modules::project::core::entities::cost_calculation::ProjectCostCalculation;
use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::entities::invoice::Invoice;
use crate::modules::project::core::entities::job::Job;
use crate::modules::project::core::entities::person::Person;
use crate::modules::project::core::entities::trade::Trade;
use crate::shared::core::errors::DomainError;
use crate::shared::core::identity::{Entity, EntityType, Identity, Meta};
use crate::shared::core::link::{Key, Link, LinkList};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Milestones of the project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDates {
    pub planning_start: Option<NaiveDate>,
    pub construction_start: Option<NaiveDate>,
    pub completion: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub meta: Meta,
    pub identifier: String,
    pub config: ProjectConfig,
    pub dates: ProjectDates,
    pub address: Option<Address>,
    pub client: Link<Person>,
    pub(crate) people: Arena<Person>,
    pub(crate) companies: Arena<Company>,
    pub(crate) trades: Arena<Trade>,
    pub(crate) cost_groups: Arena<CostGroup>,
    pub(crate) jobs: Arena<Job>,
    pub(crate) invoices: Arena<Invoice>,
    pub(crate) cost_calculations: Arena<ProjectCostCalculation>,
}

impl Project {
    pub fn new(identifier: impl Into<String>, config: ProjectConfig) -> Self {
        Self {
            meta: Meta::new(EntityType::Project),
            identifier: identifier.into(),
            config,
            dates: ProjectDates::default(),
            address: None,
            client: Link::empty(),
            people: Arena::new(),
            companies: Arena::new(),
            trades: Arena::new(),
            cost_groups: Arena::new(),
            jobs: Arena::new(),
            invoices: Arena::new(),
            cost_calculations: Arena::new(),
        }
    }

    pub fn set_address(&mut self, input: Option<AddressInput>) {
        self.address = match (self.address.take(), input) {
            (Some(mut address), Some(input)) => {
                address.update(input);
                Some(address)
            }
            (None, Some(input)) => Some(Address::new(input)),
            (_, None) => None,
        };
        self.touch();
    }

    pub fn set_client(&mut self, client: Option<Key<Person>>) -> Result<(), DomainError> {
        if let Some(key) = client {
            self.people.require(key)?;
        }
        self.client.set(client);
        self.touch();
        Ok(())
    }

    pub fn client(&self) -> Option<&Person> {
        self.client.key().and_then(|key| self.people.get(key))
    }

    pub fn people(&self) -> Vec<&Person> {
        self.people.live().collect()
    }

    pub fn people_including_deleted(&self) -> Vec<&Person> {
        self.people.iter().collect()
    }

    pub fn companies(&self) -> Vec<&Company> {
        self.companies.live().collect()
    }

    pub fn companies_including_deleted(&self) -> Vec<&Company> {
        self.companies.iter().collect()
    }

    pub fn trades(&self) -> Vec<&Trade> {
        self.trades.live().collect()
    }

    pub fn trades_including_deleted(&self) -> Vec<&Trade> {
        self.trades.iter().collect()
    }

    /// Live cost groups sorted by business id.
    pub fn cost_groups(&self) -> Vec<&CostGroup> {
        let mut groups: Vec<_> = self.cost_groups.live().collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        groups
    }

    pub fn cost_groups_including_deleted(&self) -> Vec<&CostGroup> {
        let mut groups: Vec<_> = self.cost_groups.iter().collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        groups
    }

    pub fn main_cost_groups(&self) -> Vec<&CostGroup> {
        self.cost_groups()
            .into_iter()
            .filter(|group| group.is_main_group())
            .collect()
    }

    /// Direct children of `parent`, sorted by business id.
    pub fn sub_groups(&self, parent: Key<CostGroup>) -> Vec<&CostGroup> {
        self.cost_groups()
            .into_iter()
            .filter(|group| group.parent.points_to(parent))
            .collect()
    }

    pub fn jobs(&self) -> Vec<&Job> {
        self.jobs.live().collect()
    }

    pub fn jobs_including_deleted(&self) -> Vec<&Job> {
        self.jobs.iter().collect()
    }

    /// Live invoices, newest first.
    pub fn invoices(&self) -> Vec<&Invoice> {
        self.invoices.live().collect()
    }

    pub fn invoices_including_deleted(&self) -> Vec<&Invoice> {
        self.invoices.iter().collect()
    }

    pub fn project_cost_calculations(&self) -> Vec<&ProjectCostCalculation> {
        self.cost_calculations.live().collect()
    }

    pub fn project_cost_calculations_including_deleted(&self) -> Vec<&ProjectCostCalculation> {
        self.cost_calculations.iter().collect()
    }

    pub fn person(&self, key: Key<Person>) -> Option<&Person> {
        self.people.get(key)
    }

    pub fn company(&self, key: Key<Company>) -> Option<&Company> {
        self.companies.get(key)
    }

    pub fn trade(&self, key: Key<Trade>) -> Option<&Trade> {
        self.trades.get(key)
    }

    pub fn cost_group(&self, key: Key<CostGroup>) -> Option<&CostGroup> {
        self.cost_groups.get(key)
    }

    pub fn job(&self, key: Key<Job>) -> Option<&Job> {
        self.jobs.get(key)
    }

    pub fn invoice(&self, key: Key<Invoice>) -> Option<&Invoice> {
        self.invoices.get(key)
    }

    pub fn project_cost_calculation(
        &self,
        key: Key<ProjectCostCalculation>,
    ) -> Option<&ProjectCostCalculation> {
        self.cost_calculations.get(key)
    }

    /// First live company whose contact person is `person`.
    pub fn company_of_person(&self, person: Key<Person>) -> Option<&Company> {
        self.companies
            .live()
            .find(|company| company.contact_person.points_to(person))
    }

    pub fn find_company_by_name(&self, name: &str) -> Option<&Company> {
        self.companies.live().find(|company| same_key(&company.name, name))
    }

    pub fn find_trade_by_name(&self, name: &str) -> Option<&Trade> {
        self.trades.live().find(|trade| same_key(&trade.name, name))
    }

    pub fn find_cost_group_by_id(&self, id: &str) -> Option<&CostGroup> {
        self.cost_groups.live().find(|group| same_key(&group.id, id))
    }

    pub fn find_person_by_name(&self, first_name: &str, last_name: &str) -> Option<&Person> {
        self.people.live().find(|person| {
            same_key(&person.first_name, first_name) && same_key(&person.last_name, last_name)
        })
    }

    /// Name of the company a job is billed by, if that link is live.
    pub fn company_name_of_job(&self, job: &Job) -> Option<&str> {
        job.company
            .key()
            .and_then(|key| self.companies.get(key))
            .map(|company| company.name.as_str())
    }

    /// Verify that no relation holds both a key and a descriptor and that every live key
    /// points at an entity of this project.
    pub fn check_links(&self) -> Result<(), DomainError> {
        let owner = self.identity();
        check_link(owner, &self.client, &self.people)?;
        for company in self.companies.iter() {
            check_link(company.identity(), &company.contact_person, &self.people)?;
        }
        for trade in self.trades.iter() {
            check_link(trade.identity(), &trade.cost_group, &self.cost_groups)?;
        }
        for group in self.cost_groups.iter() {
            check_link(group.identity(), &group.parent, &self.cost_groups)?;
        }
        for job in self.jobs.iter() {
            check_link(job.identity(), &job.company, &self.companies)?;
            if let Some(details) = job.construction() {
                check_link(job.identity(), &details.trade, &self.trades)?;
            }
        }
        for invoice in self.invoices.iter() {
            check_link(invoice.identity(), &invoice.company, &self.companies)?;
            check_link(invoice.identity(), &invoice.job, &self.jobs)?;
            check_list(invoice.identity(), &invoice.prev_invoices, &self.invoices)?;
        }
        for calculation in self.cost_calculations.iter() {
            for item in calculation.inventory.iter() {
                check_link(item.identity(), &item.cost_group, &self.cost_groups)?;
                check_link(item.identity(), &item.trade, &self.trades)?;
            }
        }
        Ok(())
    }
}

impl Entity for Project {
    const ENTITY_TYPE: EntityType = EntityType::Project;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

fn same_key(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

fn check_link<T: Entity>(
    owner: &Identity,
    link: &Link<T>,
    arena: &Arena<T>,
) -> Result<(), DomainError> {
    link.check(owner)?;
    match link.key() {
        Some(key) if !arena.contains(key) => Err(dangling(owner, T::ENTITY_TYPE)),
        _ => Ok(()),
    }
}

fn check_list<T: Entity>(
    owner: &Identity,
    list: &LinkList<T>,
    arena: &Arena<T>,
) -> Result<(), DomainError> {
    list.check(owner)?;
    if list.keys().iter().any(|key| !arena.contains(*key)) {
        return Err(dangling(owner, T::ENTITY_TYPE));
    }
    Ok(())
}

fn dangling(owner: &Identity, target: EntityType) -> DomainError {
    DomainError::InconsistentState {
        owner: owner.to_string(),
        detail: format!("{target} reference points outside the project"),
    }
}

#[cfg(test)]
mod project_tests {
    use super::*;
    use crate::modules::project::core::entities::company::CompanyInput;
    use crate::modules::project::core::entities::cost_group::CostGroupInput;
    use crate::modules::project::core::entities::person::PersonInput;
    use crate::shared::core::link::RefDescriptor;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn project() -> Project {
        let mut project = Project::new("P-2024-01", ProjectConfig::default());
        for (id, name) in [("400", "Technik"), ("300", "Bauwerk"), ("330", "Außenwände")] {
            project
                .cost_groups
                .insert(CostGroup::new(CostGroupInput {
                    id: id.into(),
                    name: name.into(),
                    ..CostGroupInput::default()
                }))
                .unwrap();
        }
        project
    }

    #[rstest]
    fn it_should_list_cost_groups_by_business_id(project: Project) {
        let ids: Vec<_> = project.cost_groups().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["300", "330", "400"]);
    }

    #[rstest]
    fn it_should_hide_deleted_entities_from_default_views(mut project: Project) {
        let key = project.find_cost_group_by_id("330").unwrap().key();
        project.cost_groups.require_mut(key).unwrap().delete().unwrap();

        assert_eq!(project.cost_groups().len(), 2);
        assert_eq!(project.cost_groups_including_deleted().len(), 3);
        assert!(project.cost_group(key).is_some());
        assert!(project.find_cost_group_by_id("330").is_none());
    }

    #[rstest]
    fn it_should_find_the_company_of_a_contact_person(mut project: Project) {
        let person = project
            .people
            .insert(Person::new(PersonInput {
                first_name: "Erika".into(),
                last_name: "Mustermann".into(),
                ..PersonInput::default()
            }))
            .unwrap();
        project
            .companies
            .insert(Company::new(CompanyInput {
                name: "Muster Bau GmbH".into(),
                contact_person: Some(person),
                ..CompanyInput::default()
            }))
            .unwrap();

        assert_eq!(
            project.company_of_person(person).map(|c| c.name.as_str()),
            Some("Muster Bau GmbH")
        );
        assert!(project.find_company_by_name("  muster bau gmbh ").is_some());
        assert!(project.find_person_by_name("erika", "MUSTERMANN").is_some());
    }

    #[rstest]
    fn it_should_flag_a_dangling_key(mut project: Project) {
        project.client.set(Some(Key::new(Uuid::now_v7())));
        assert!(matches!(
            project.check_links(),
            Err(DomainError::InconsistentState { .. })
        ));
    }

    #[rstest]
    fn it_should_flag_a_link_holding_key_and_descriptor(mut project: Project) {
        let key = project.find_cost_group_by_id("330").unwrap().key();
        let parent = project.find_cost_group_by_id("300").unwrap().key();
        project.cost_groups.require_mut(key).unwrap().parent =
            Link::corrupt(parent, RefDescriptor::default());
        assert!(matches!(
            project.check_links(),
            Err(DomainError::InconsistentState { .. })
        ));
    }
}
