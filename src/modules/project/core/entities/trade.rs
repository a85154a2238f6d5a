use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::shared::core::identity::{Entity, EntityType, Meta};
use crate::shared::core::link::{Key, Link};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeInput {
    pub name: String,
    pub budget: f64,
    pub comment: Option<String>,
    pub cost_group: Option<Key<CostGroup>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub meta: Meta,
    pub name: String,
    pub budget: f64,
    pub comment: Option<String>,
    pub cost_group: Link<CostGroup>,
}

impl Trade {
    pub fn new(input: TradeInput) -> Self {
        Self {
            meta: Meta::new(EntityType::Trade),
            name: input.name,
            budget: input.budget,
            comment: input.comment,
            cost_group: Link::from_option(input.cost_group),
        }
    }

    pub fn update(&mut self, input: TradeInput) {
        self.name = input.name;
        self.budget = input.budget;
        self.comment = input.comment;
        self.cost_group.set(input.cost_group);
        self.touch();
    }
}

impl Entity for Trade {
    const ENTITY_TYPE: EntityType = EntityType::Trade;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
