use crate::modules::project::core::entities::address::{Address, AddressInput};
use crate::shared::core::identity::{Entity, EntityType, Meta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonInput {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub tel: Option<String>,
    pub fax: Option<String>,
    pub address: Option<AddressInput>,
}

/// Contact person. The company a person works for is looked up through
/// `Project::company_of_person`, the person holds no link back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(flatten)]
    pub meta: Meta,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

impl Person {
    pub fn new(input: PersonInput) -> Self {
        Self {
            meta: Meta::new(EntityType::Person),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            mobile: input.mobile,
            tel: input.tel,
            fax: input.fax,
            address: input.address.map(Address::new),
        }
    }

    pub fn update(&mut self, input: PersonInput) {
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.email = input.email;
        self.mobile = input.mobile;
        self.tel = input.tel;
        self.fax = input.fax;
        self.address = match (self.address.take(), input.address) {
            (Some(mut address), Some(input)) => {
                address.update(input);
                Some(address)
            }
            (None, Some(input)) => Some(Address::new(input)),
            (_, None) => None,
        };
        self.touch();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl Entity for Person {
    const ENTITY_TYPE: EntityType = EntityType::Person;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
