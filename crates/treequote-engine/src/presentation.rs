//! Presentation rounding.
//!
//! The engine computes at full precision. These helpers round only at the
//! edge, when a figure is shown to a person.

use serde::{Deserialize, Serialize};
use treequote_models::ProjectPricing;

use crate::config::PricingDefaults;

/// Decimal places used for hours and percentages.
const HOURS_DECIMALS: u32 = 2;

/// Most decimal places a figure is rounded or formatted to.
pub const MAX_CURRENCY_DECIMALS: u8 = 10;

fn places(decimals: u32) -> u8 {
    u8::try_from(decimals)
        .unwrap_or(u8::MAX)
        .min(MAX_CURRENCY_DECIMALS)
}

/// Rounds a value half away from zero to the given decimal places, capped at
/// [`MAX_CURRENCY_DECIMALS`].
pub fn round_currency(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(i32::from(places(decimals)));
    (value * factor).round() / factor
}

/// Formats a value with thousands separators, e.g. `12,345.60`.
pub fn format_currency(value: f64, decimals: u32) -> String {
    let rounded = round_currency(value, decimals);
    let text = format!("{:.*}", usize::from(places(decimals)), rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// A pricing breakdown rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresentedPricing {
    pub work_hours: f64,
    pub transport_hours: f64,
    pub buffer_hours: f64,
    pub total_hours: f64,
    pub loadout_cost_per_hour: f64,
    pub billing_rate_per_hour: f64,
    pub total_cost: f64,
    pub total_price: f64,
    pub total_profit: f64,
    pub effective_margin_percent: f64,
    pub cost_per_unit: f64,
}

/// Rounds every figure of a breakdown for display.
pub fn present_pricing(pricing: &ProjectPricing, defaults: &PricingDefaults) -> PresentedPricing {
    let money = |v: f64| round_currency(v, defaults.currency_decimals);
    let hours = |v: f64| round_currency(v, HOURS_DECIMALS);

    PresentedPricing {
        work_hours: hours(pricing.work_hours),
        transport_hours: hours(pricing.transport_hours),
        buffer_hours: hours(pricing.buffer_hours),
        total_hours: hours(pricing.total_hours),
        loadout_cost_per_hour: money(pricing.loadout_cost_per_hour),
        billing_rate_per_hour: money(pricing.billing_rate_per_hour),
        total_cost: money(pricing.total_cost),
        total_price: money(pricing.total_price),
        total_profit: money(pricing.total_profit),
        effective_margin_percent: hours(pricing.effective_margin_percent),
        cost_per_unit: money(pricing.cost_per_unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(572.3249, 2), 572.32);
        assert_eq!(round_currency(0.125, 2), 0.13);
        assert_eq!(round_currency(-3.456, 2), -3.46);
        assert_eq!(round_currency(1888.8, 0), 1889.0);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(format_currency(572.32, 2), "572.32");
        assert_eq!(format_currency(999.999, 2), "1,000.00");
        assert_eq!(format_currency(-1_500.0, 2), "-1,500.00");
        assert_eq!(format_currency(123_456.0, 0), "123,456");
        assert_eq!(format_currency(0.0, 2), "0.00");
    }

    #[test]
    fn test_excess_decimals_capped() {
        assert_eq!(round_currency(1541.16, u32::MAX), 1541.16);
        assert_eq!(round_currency(1541.16, 400), 1541.16);
        assert_eq!(format_currency(1541.1, 400), "1,541.1000000000");
    }

    #[test]
    fn test_present_pricing_rounds_only_copy() {
        let pricing = ProjectPricing {
            work_hours: 5.0,
            transport_hours: 1.0,
            buffer_hours: 0.6000000000000001,
            total_hours: 6.6000000000000005,
            loadout_cost_per_hour: 286.16,
            billing_rate_per_hour: 572.32,
            total_cost: 1888.6560000000002,
            total_price: 3777.3120000000004,
            total_profit: 1888.6560000000002,
            effective_margin_percent: 50.0,
            cost_per_unit: 188.86560000000003,
        };

        let presented = present_pricing(&pricing, &PricingDefaults::default());

        assert_eq!(presented.buffer_hours, 0.6);
        assert_eq!(presented.total_hours, 6.6);
        assert_eq!(presented.total_cost, 1888.66);
        assert_eq!(presented.total_price, 3777.31);
        assert_eq!(presented.cost_per_unit, 188.87);
        assert_eq!(pricing.total_hours, 6.6000000000000005);
    }
}
