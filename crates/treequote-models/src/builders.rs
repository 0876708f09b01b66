//! Builder patterns for complex records.

use crate::equipment::{Equipment, EquipmentInput, Financing};
use crate::ids::EquipmentId;

/// Builder for creating Equipment records with a fluent API.
#[derive(Debug, Clone)]
pub struct EquipmentBuilder {
    id: Option<EquipmentId>,
    name: String,
    input: EquipmentInput,
    production: Option<(f64, String)>,
}

impl EquipmentBuilder {
    /// Creates a new EquipmentBuilder with the ownership inputs.
    pub fn new(name: impl Into<String>, purchase_price: f64, useful_life_hours: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            input: EquipmentInput {
                purchase_price,
                useful_life_hours,
                ..Default::default()
            },
            production: None,
        }
    }

    /// Sets an explicit id (defaults to a fresh one).
    pub fn id(mut self, id: impl Into<EquipmentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the salvage value.
    pub fn salvage(mut self, salvage_value: f64) -> Self {
        self.input.salvage_value = salvage_value;
        self
    }

    /// Sets the financing cost.
    pub fn financing(mut self, financing: Financing) -> Self {
        self.input.financing = Some(financing);
        self
    }

    /// Sets fuel burn rate and fuel price.
    pub fn fuel(mut self, burn_rate: f64, price: f64) -> Self {
        self.input.fuel_burn_rate = burn_rate;
        self.input.fuel_price = price;
        self
    }

    /// Sets maintenance cost per hour.
    pub fn maintenance(mut self, cost_per_hour: f64) -> Self {
        self.input.maintenance_cost_per_hour = cost_per_hour;
        self
    }

    /// Sets consumables cost per hour.
    pub fn consumables(mut self, cost_per_hour: f64) -> Self {
        self.input.consumables_cost_per_hour = cost_per_hour;
        self
    }

    /// Sets the production rate and unit.
    pub fn production(mut self, rate: f64, unit: impl Into<String>) -> Self {
        self.production = Some((rate, unit.into()));
        self
    }

    /// Builds the Equipment record.
    pub fn build(self) -> Equipment {
        let mut equipment = Equipment::new(self.name, self.input);
        if let Some(id) = self.id {
            equipment.id = id;
        }
        if let Some((rate, unit)) = self.production {
            equipment = equipment.with_production(rate, unit);
        }
        equipment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let eq = EquipmentBuilder::new("Mulcher", 100_000.0, 10_000.0).build();

        assert_eq!(eq.name, "Mulcher");
        assert_eq!(eq.input.purchase_price, 100_000.0);
        assert_eq!(eq.input.useful_life_hours, 10_000.0);
        assert_eq!(eq.input.salvage_value, 0.0);
        assert!(eq.production_rate.is_none());
    }

    #[test]
    fn test_builder_full() {
        let eq = EquipmentBuilder::new("Mulcher", 100_000.0, 10_000.0)
            .id("eq-mulcher")
            .salvage(20_000.0)
            .fuel(5.0, 3.75)
            .maintenance(5.0)
            .consumables(2.0)
            .financing(Financing::PerHour { cost_per_hour: 1.25 })
            .production(2.0, "acres")
            .build();

        assert_eq!(eq.id.as_str(), "eq-mulcher");
        assert_eq!(eq.input.salvage_value, 20_000.0);
        assert_eq!(eq.input.fuel_burn_rate, 5.0);
        assert_eq!(eq.input.fuel_price, 3.75);
        assert_eq!(eq.input.maintenance_cost_per_hour, 5.0);
        assert_eq!(eq.input.consumables_cost_per_hour, 2.0);
        assert!(eq.input.financing.is_some());
        assert_eq!(eq.production_rate, Some(2.0));
        assert_eq!(eq.production_unit.as_deref(), Some("acres"));
    }
}
