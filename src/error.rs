//! Typed failures raised by the calculators
//!
//! Every failure is local to one calculation call. The caller decides whether to
//! surface a validation message or keep showing the previous valid result.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid range for {field}: {reason}")]
    InvalidRange { field: &'static str, reason: String },

    #[error("Invalid percentage for {field}: {reason}")]
    InvalidPercentage { field: &'static str, reason: String },

    #[error("Unknown {kind}: {value}")]
    UnknownSelector { kind: &'static str, value: String },
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Longest horizon, in years, any projector will run
pub const MAX_HORIZON_YEARS: u32 = 200;

/// Reject horizons past `MAX_HORIZON_YEARS`
pub(crate) fn bounded_horizon(field: &'static str, years: u32) -> CalcResult<u32> {
    if years > MAX_HORIZON_YEARS {
        return Err(CalcError::InvalidRange {
            field,
            reason: format!(
                "{} years exceeds the {}-year maximum horizon",
                years, MAX_HORIZON_YEARS
            ),
        });
    }
    Ok(years)
}

/// Fail the projection once a compounded balance leaves the finite range
pub(crate) fn finite_balance(field: &'static str, period: u32, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::InvalidRange {
            field,
            reason: format!("balance is no longer finite at period {}", period),
        });
    }
    Ok(value)
}

/// Floor a monetary input at zero, rejecting NaN and infinities
pub(crate) fn non_negative_amount(field: &'static str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::InvalidRange {
            field,
            reason: format!("{} is not a finite amount", value),
        });
    }
    if value < 0.0 {
        log::warn!("{} was negative ({}), clamping to 0", field, value);
        return Ok(0.0);
    }
    Ok(value)
}

/// Validate a rate expressed either in percent or as a decimal
pub(crate) fn non_negative_rate(field: &'static str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::InvalidPercentage {
            field,
            reason: format!("{} must be a finite, non-negative rate", value),
        });
    }
    Ok(value)
}
