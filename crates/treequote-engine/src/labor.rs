//! Labor cost model.

use tracing::debug;
use treequote_models::{LaborCost, LaborInput};

use crate::error::{PricingError, Result};
use crate::validate::{finite, positive};

/// Computes the true hourly cost of one crew member: `wage * burden`.
///
/// # Errors
/// Returns a validation error when the wage is not positive or the burden
/// multiplier is below 1.0.
pub fn compute_labor_cost(input: &LaborInput) -> Result<LaborCost> {
    let base_wage = positive("base_wage", input.base_wage)?;
    let burden = finite("burden_multiplier", input.burden_multiplier)?;
    if burden < 1.0 {
        return Err(PricingError::validation(
            "burden_multiplier",
            format!("must be at least 1.0, got {}", burden),
        ));
    }

    let true_cost_per_hour = base_wage * burden;
    debug!(base_wage, burden, true_cost_per_hour, "Computed labor cost");

    Ok(LaborCost {
        base_wage,
        burden_cost_per_hour: true_cost_per_hour - base_wage,
        true_cost_per_hour,
    })
}
