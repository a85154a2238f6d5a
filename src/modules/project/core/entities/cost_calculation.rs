// Cost-calculation forecasts and their inventory items.
//
// Notes
// - Items are owned by their calculation; they are not a project collection.
// - Inactive items stay in the calculation but do not count towards totals.

use crate::modules::project::core::entities::cost_group::CostGroup;
use crate::modules::project::core::entities::trade::Trade;
use crate::shared::core::identity::{Entity, EntityType, Meta};
use crate::shared::core::link::{Key, Link};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Planning stage the forecast belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    #[default]
    CostEstimate,
    CostCalculation,
    CostStop,
    CostAssessment,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryItemInput {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: f64,
    pub units: f64,
    pub unit: Option<String>,
    pub is_active: bool,
    pub cost_group: Option<Key<CostGroup>>,
    pub trade: Option<Key<Trade>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub meta: Meta,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: f64,
    pub units: f64,
    pub unit: Option<String>,
    pub is_active: bool,
    pub cost_group: Link<CostGroup>,
    pub trade: Link<Trade>,
}

impl InventoryItem {
    pub fn new(input: InventoryItemInput) -> Self {
        Self {
            meta: Meta::new(EntityType::InventoryItem),
            name: input.name,
            description: input.description,
            unit_price: input.unit_price,
            units: input.units,
            unit: input.unit,
            is_active: input.is_active,
            cost_group: Link::from_option(input.cost_group),
            trade: Link::from_option(input.trade),
        }
    }

    pub fn update(&mut self, input: InventoryItemInput) {
        self.name = input.name;
        self.description = input.description;
        self.unit_price = input.unit_price;
        self.units = input.units;
        self.unit = input.unit;
        self.is_active = input.is_active;
        self.cost_group.set(input.cost_group);
        self.trade.set(input.trade);
        self.touch();
    }

    pub fn total(&self) -> f64 {
        self.unit_price * self.units
    }
}

impl Entity for InventoryItem {
    const ENTITY_TYPE: EntityType = EntityType::InventoryItem;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostCalculationInput {
    pub name: String,
    pub calculation_type: CalculationType,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCostCalculation {
    pub meta: Meta,
    pub name: String,
    pub calculation_type: CalculationType,
    pub date: NaiveDate,
    pub inventory: Vec<InventoryItem>,
}

impl ProjectCostCalculation {
    pub fn new(input: CostCalculationInput) -> Self {
        Self {
            meta: Meta::new(EntityType::ProjectCostCalculation),
            name: input.name,
            calculation_type: input.calculation_type,
            date: input.date,
            inventory: Vec::new(),
        }
    }

    pub fn update(&mut self, input: CostCalculationInput) {
        self.name = input.name;
        self.calculation_type = input.calculation_type;
        self.date = input.date;
        self.touch();
    }

    pub fn add_inventory_item(&mut self, input: InventoryItemInput) -> Key<InventoryItem> {
        let item = InventoryItem::new(input);
        let key = item.key();
        self.inventory.push(item);
        self.touch();
        key
    }

    /// Live items, deleted ones excluded.
    pub fn items(&self) -> impl Iterator<Item = &InventoryItem> {
        self.inventory.iter().filter(|item| !item.is_deleted())
    }

    pub fn item_mut(&mut self, key: Key<InventoryItem>) -> Option<&mut InventoryItem> {
        self.inventory.iter_mut().find(|item| item.key() == key)
    }

    /// Sum over live, active items.
    pub fn total(&self) -> f64 {
        self.items()
            .filter(|item| item.is_active)
            .map(InventoryItem::total)
            .sum()
    }

    pub fn total_for_cost_group(&self, cost_group: Key<CostGroup>) -> f64 {
        self.items()
            .filter(|item| item.is_active && item.cost_group.points_to(cost_group))
            .map(InventoryItem::total)
            .sum()
    }
}

impl Entity for ProjectCostCalculation {
    const ENTITY_TYPE: EntityType = EntityType::ProjectCostCalculation;

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}
