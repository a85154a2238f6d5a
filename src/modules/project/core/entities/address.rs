use crate::shared::core::identity::{Entity, EntityType, Meta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    pub street: String,
    pub house_number: String,
    pub zip_code: String,
    pub city: String,
}

/// Postal address, embedded by value in its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(flatten)]
    pub meta: Meta,
    pub street: String,
    pub house_number: String,
    pub zip_code: String,
    pub city: String,
}

impl Address {
    pub fn new(input: AddressInput) -> Self {
        Self {
            meta: Meta::new(EntityType::Address),
            street: input.street,
            house_number: input.house_number,
            zip_code: input.zip_code,
            city: input.city,
        }
    }

    pub fn update(&mut self, input: AddressInput) {
        self.street = input.street;
        self.house_number = input.house_number;
        self.zip_code = input.zip_code;
        self.city = input.city;
        self.touch();
    }
}

impl Entity for Address {
    const ENTITY_TYPE: EntityType = EntityType::Address;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
