//! Shared numeric guards.

use crate::error::{PricingError, Result};

pub(crate) fn finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::validation(
            field,
            format!("must be a finite number, got {}", value),
        ))
    }
}

pub(crate) fn non_negative(field: &str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(PricingError::validation(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(value)
}

pub(crate) fn positive(field: &str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if value <= 0.0 {
        return Err(PricingError::validation(
            field,
            format!("must be greater than 0, got {}", value),
        ));
    }
    Ok(value)
}

/// Units are compared case-insensitively after trimming.
pub(crate) fn same_unit(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_rejects_nan_and_infinity() {
        assert!(finite("x", f64::NAN).is_err());
        assert!(finite("x", f64::INFINITY).is_err());
        assert!(finite("x", f64::NEG_INFINITY).is_err());
        assert_eq!(finite("x", 1.5), Ok(1.5));
    }

    #[test]
    fn test_non_negative_accepts_zero() {
        assert_eq!(non_negative("x", 0.0), Ok(0.0));
        assert!(non_negative("x", -0.01).is_err());
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert!(positive("x", 0.0).is_err());
        assert_eq!(positive("x", 0.5), Ok(0.5));
    }

    #[test]
    fn test_error_names_field() {
        let err = positive("production_rate", -1.0).unwrap_err();
        assert!(matches!(err, PricingError::Validation { ref field, .. } if field == "production_rate"));
    }

    #[test]
    fn test_same_unit() {
        assert!(same_unit("Acres", " acres "));
        assert!(!same_unit("acres", "trees"));
    }
}
