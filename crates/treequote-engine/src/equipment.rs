//! Equipment cost model.
//!
//! ```text
//! ownership = (purchase_price - salvage_value) / useful_life_hours + financing_per_hour
//! operating = fuel_burn_rate * fuel_price + maintenance + consumables
//! total     = ownership + operating
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use treequote_models::{Equipment, EquipmentCost, EquipmentInput, Financing};

use crate::error::{PricingError, Result};
use crate::validate::{non_negative, positive};

/// Relative tolerance when comparing a cached cost with a recomputation.
const CACHE_TOLERANCE: f64 = 1e-9;

/// Computes the hourly cost breakdown of one machine.
///
/// # Errors
/// Returns a validation error when useful life is not positive, any cost or
/// price is negative or non-finite, or salvage exceeds the purchase price.
pub fn compute_equipment_cost(input: &EquipmentInput) -> Result<EquipmentCost> {
    let purchase_price = non_negative("purchase_price", input.purchase_price)?;
    let salvage_value = non_negative("salvage_value", input.salvage_value)?;
    if salvage_value > purchase_price {
        return Err(PricingError::validation(
            "salvage_value",
            format!(
                "{} exceeds purchase price {}",
                salvage_value, purchase_price
            ),
        ));
    }
    let useful_life_hours = positive("useful_life_hours", input.useful_life_hours)?;
    let financing_per_hour = financing_per_hour(input.financing)?;

    let fuel_burn_rate = non_negative("fuel_burn_rate", input.fuel_burn_rate)?;
    let fuel_price = non_negative("fuel_price", input.fuel_price)?;
    let maintenance = non_negative("maintenance_cost_per_hour", input.maintenance_cost_per_hour)?;
    let consumables = non_negative("consumables_cost_per_hour", input.consumables_cost_per_hour)?;

    let depreciation_per_hour = (purchase_price - salvage_value) / useful_life_hours;
    let ownership_cost_per_hour = depreciation_per_hour + financing_per_hour;

    let fuel_cost_per_hour = fuel_burn_rate * fuel_price;
    let operating_cost_per_hour = fuel_cost_per_hour + maintenance + consumables;

    let total_cost_per_hour = ownership_cost_per_hour + operating_cost_per_hour;

    debug!(
        ownership_cost_per_hour,
        operating_cost_per_hour,
        total_cost_per_hour,
        "Computed equipment cost"
    );

    Ok(EquipmentCost {
        depreciation_per_hour,
        financing_per_hour,
        ownership_cost_per_hour,
        fuel_cost_per_hour,
        operating_cost_per_hour,
        total_cost_per_hour,
    })
}

fn financing_per_hour(financing: Option<Financing>) -> Result<f64> {
    match financing {
        None => Ok(0.0),
        Some(Financing::PerHour { cost_per_hour }) => {
            non_negative("financing.cost_per_hour", cost_per_hour)
        }
        Some(Financing::Annual {
            annual_cost,
            annual_hours,
        }) => {
            let annual_cost = non_negative("financing.annual_cost", annual_cost)?;
            let annual_hours = positive("financing.annual_hours", annual_hours)?;
            Ok(annual_cost / annual_hours)
        }
    }
}

/// Outcome of checking a stored cost against a fresh computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedCostCheck {
    /// Freshly computed total cost per hour.
    pub computed: f64,
    /// Stored figure, if any.
    pub cached: Option<f64>,
    /// True when there is no stored figure or it matches the computation.
    pub in_sync: bool,
}

/// Recomputes a machine's cost and compares it with the stored figure.
pub fn verify_cached_cost(equipment: &Equipment) -> Result<CachedCostCheck> {
    let computed = compute_equipment_cost(&equipment.input)?.total_cost_per_hour;
    let in_sync = match equipment.cached_total_cost_per_hour {
        None => true,
        Some(cached) => (cached - computed).abs() <= CACHE_TOLERANCE * computed.abs().max(1.0),
    };

    if !in_sync {
        debug!(
            equipment_id = %equipment.id,
            computed,
            cached = ?equipment.cached_total_cost_per_hour,
            "Cached equipment cost is stale"
        );
    }

    Ok(CachedCostCheck {
        computed,
        cached: equipment.cached_total_cost_per_hour,
        in_sync,
    })
}
