//! Margin conversion.
//!
//! A margin is profit as a share of price, so the billing rate is found by
//! dividing cost by `1 - margin / 100`. The divisor reaches zero at 100%, which
//! is why the accepted range is half-open.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PricingError, Result};
use crate::validate::{finite, non_negative, positive};

/// Billing rate derived from a cost and a target margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginConversion {
    /// Hourly cost that was converted.
    pub cost_per_hour: f64,
    /// Target margin percentage.
    pub margin_percent: f64,
    /// `1 - margin / 100`.
    pub divisor: f64,
    /// `cost / divisor`.
    pub billing_rate_per_hour: f64,
}

/// Converts an hourly cost into a billing rate for the target margin.
///
/// # Errors
/// Returns `InvalidMargin` when the margin is outside `[0, 100)`, and a
/// validation error when the cost is negative or non-finite or the resulting
/// rate overflows.
pub fn convert_margin(cost: f64, margin_percent: f64) -> Result<MarginConversion> {
    if !(0.0..100.0).contains(&margin_percent) {
        return Err(PricingError::InvalidMargin(margin_percent));
    }
    let cost = non_negative("cost", cost)?;

    let divisor = 1.0 - margin_percent / 100.0;
    let billing_rate_per_hour = finite("billing_rate_per_hour", cost / divisor)?;

    debug!(cost, margin_percent, divisor, billing_rate_per_hour, "Converted margin");

    Ok(MarginConversion {
        cost_per_hour: cost,
        margin_percent,
        divisor,
        billing_rate_per_hour,
    })
}

/// Returns the margin percentage a billing rate realises over a cost.
///
/// A rate below cost yields a negative margin.
pub fn margin_for_rate(cost: f64, billing_rate: f64) -> Result<f64> {
    let cost = non_negative("cost", cost)?;
    let billing_rate = positive("billing_rate", billing_rate)?;
    Ok((1.0 - cost / billing_rate) * 100.0)
}
