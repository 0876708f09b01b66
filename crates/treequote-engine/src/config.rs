//! Pricing defaults.

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::presentation::MAX_CURRENCY_DECIMALS;
use crate::validate::non_negative;

/// Defaults applied when a quote request leaves a value unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingDefaults {
    /// Contingency as a fraction of work plus transport (0.10 = 10%).
    #[serde(default = "default_buffer_fraction")]
    pub buffer_fraction: f64,

    /// Target profit margin percentage.
    #[serde(default = "default_margin_percent")]
    pub margin_percent: f64,

    /// Decimal places used when presenting currency.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,
}

fn default_buffer_fraction() -> f64 {
    0.10
}

fn default_margin_percent() -> f64 {
    50.0
}

fn default_currency_decimals() -> u32 {
    2
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            buffer_fraction: default_buffer_fraction(),
            margin_percent: default_margin_percent(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

impl PricingDefaults {
    /// Creates defaults with standard values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer fraction.
    pub fn with_buffer_fraction(mut self, buffer_fraction: f64) -> Self {
        self.buffer_fraction = buffer_fraction;
        self
    }

    /// Sets the margin percentage.
    pub fn with_margin_percent(mut self, margin_percent: f64) -> Self {
        self.margin_percent = margin_percent;
        self
    }

    /// Sets the currency decimal places.
    pub fn with_currency_decimals(mut self, decimals: u32) -> Self {
        self.currency_decimals = decimals;
        self
    }

    /// Checks that the buffer and currency decimals are usable. The margin is
    /// checked when it is converted, so an out-of-range default surfaces as
    /// `InvalidMargin`.
    pub fn validate(&self) -> Result<()> {
        non_negative("buffer_fraction", self.buffer_fraction)?;
        if self.currency_decimals > u32::from(MAX_CURRENCY_DECIMALS) {
            return Err(PricingError::validation(
                "currency_decimals",
                format!(
                    "must be at most {}, got {}",
                    MAX_CURRENCY_DECIMALS, self.currency_decimals
                ),
            ));
        }
        Ok(())
    }
}
