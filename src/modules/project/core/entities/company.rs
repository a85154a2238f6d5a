use crate::modules::project::core::entities::person::Person;
use crate::shared::core::identity::{Entity, EntityType, Meta};
use crate::shared::core::link::{Key, Link};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyInput {
    pub name: String,
    pub service: Option<String>,
    pub service_type: Option<String>,
    pub budget: f64,
    pub contact_person: Option<Key<Person>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub meta: Meta,
    pub name: String,
    pub service: Option<String>,
    pub service_type: Option<String>,
    pub budget: f64,
    pub contact_person: Link<Person>,
}

impl Company {
    pub fn new(input: CompanyInput) -> Self {
        Self {
            meta: Meta::new(EntityType::Company),
            name: input.name,
            service: input.service,
            service_type: input.service_type,
            budget: input.budget,
            contact_person: Link::from_option(input.contact_person),
        }
    }

    pub fn update(&mut self, input: CompanyInput) {
        self.name = input.name;
        self.service = input.service;
        self.service_type = input.service_type;
        self.budget = input.budget;
        self.contact_person.set(input.contact_person);
        self.touch();
    }
}

impl Entity for Company {
    const ENTITY_TYPE: EntityType = EntityType::Company;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
