//! Equipment records.
//!
//! An equipment record holds the raw ownership and operating inputs of one
//! machine. Hourly costs are always derived from those inputs; the optional
//! cached figure exists only so stored records can be checked for drift.

use serde::{Deserialize, Serialize};

use crate::ids::EquipmentId;

/// Financing cost attached to a machine's ownership cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Financing {
    /// Financing already expressed per operating hour.
    PerHour {
        /// Cost per hour.
        cost_per_hour: f64,
    },
    /// Annual financing cost spread over the machine's annual operating hours.
    Annual {
        /// Total financing cost per year.
        annual_cost: f64,
        /// Hours the machine operates per year.
        annual_hours: f64,
    },
}

/// Numeric inputs of the equipment cost model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EquipmentInput {
    /// Purchase price of the machine.
    pub purchase_price: f64,

    /// Expected resale value at the end of its useful life.
    #[serde(default)]
    pub salvage_value: f64,

    /// Hours of use expected over the machine's life.
    pub useful_life_hours: f64,

    /// Optional financing cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<Financing>,

    /// Fuel burned per operating hour (gallons or litres).
    #[serde(default)]
    pub fuel_burn_rate: f64,

    /// Price per unit of fuel.
    #[serde(default)]
    pub fuel_price: f64,

    /// Maintenance cost per operating hour.
    #[serde(default)]
    pub maintenance_cost_per_hour: f64,

    /// Consumables (teeth, chains, oil) per operating hour.
    #[serde(default)]
    pub consumables_cost_per_hour: f64,
}

/// Hourly cost breakdown of one machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCost {
    /// Depreciation share per hour, excluding financing.
    pub depreciation_per_hour: f64,
    /// Financing share per hour (0 when none supplied).
    pub financing_per_hour: f64,
    /// Depreciation plus financing.
    pub ownership_cost_per_hour: f64,
    /// Fuel share per hour.
    pub fuel_cost_per_hour: f64,
    /// Fuel, maintenance and consumables.
    pub operating_cost_per_hour: f64,
    /// Ownership plus operating.
    pub total_cost_per_hour: f64,
}

/// A machine in the equipment library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique identifier.
    pub id: EquipmentId,

    /// Display name (e.g., "Forestry mulcher").
    pub name: String,

    /// Cost model inputs.
    #[serde(flatten)]
    pub input: EquipmentInput,

    /// Output per hour when the machine is compared on its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_rate: Option<f64>,

    /// Unit of the production rate (e.g., "acres").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_unit: Option<String>,

    /// Total cost per hour as last written by the storage layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_total_cost_per_hour: Option<f64>,
}

impl Equipment {
    /// Creates a new equipment record with the given name and inputs.
    pub fn new(name: impl Into<String>, input: EquipmentInput) -> Self {
        Self {
            id: EquipmentId::new(),
            name: name.into(),
            input,
            production_rate: None,
            production_unit: None,
            cached_total_cost_per_hour: None,
        }
    }

    /// Sets the production rate and its unit.
    pub fn with_production(mut self, rate: f64, unit: impl Into<String>) -> Self {
        self.production_rate = Some(rate);
        self.production_unit = Some(unit.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_creation() {
        let eq = Equipment::new("Mulcher", EquipmentInput::default());

        assert!(eq.id.as_str().starts_with("eq-"));
        assert_eq!(eq.name, "Mulcher");
        assert!(eq.production_rate.is_none());
        assert!(eq.cached_total_cost_per_hour.is_none());
    }

    #[test]
    fn test_with_production() {
        let eq = Equipment::new("Mulcher", EquipmentInput::default()).with_production(2.0, "acres");

        assert_eq!(eq.production_rate, Some(2.0));
        assert_eq!(eq.production_unit.as_deref(), Some("acres"));
    }

    #[test]
    fn test_financing_serialization() {
        let json = serde_json::to_string(&Financing::PerHour { cost_per_hour: 1.5 }).unwrap();
        assert_eq!(json, r#"{"kind":"per_hour","cost_per_hour":1.5}"#);

        let annual: Financing =
            serde_json::from_str(r#"{"kind":"annual","annual_cost":6000,"annual_hours":1200}"#)
                .unwrap();
        assert_eq!(
            annual,
            Financing::Annual {
                annual_cost: 6000.0,
                annual_hours: 1200.0
            }
        );
    }

    #[test]
    fn test_equipment_flattened_inputs() {
        let json = r#"{
            "id": "eq-skid",
            "name": "Skid steer",
            "purchase_price": 100000,
            "salvage_value": 20000,
            "useful_life_hours": 10000,
            "fuel_burn_rate": 5,
            "fuel_price": 3.75
        }"#;

        let eq: Equipment = serde_json::from_str(json).unwrap();
        assert_eq!(eq.id.as_str(), "eq-skid");
        assert_eq!(eq.input.purchase_price, 100000.0);
        assert_eq!(eq.input.maintenance_cost_per_hour, 0.0);
        assert!(eq.input.financing.is_none());
    }
}
