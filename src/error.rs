//! Error taxonomy for the emission arithmetic.
//!
//! Only caller mistakes are errors. An unreachable routing provider or an
//! exhausted distance lookup are ordinary outcomes and are modelled as enums
//! in [`crate::traits`] and [`crate::resolver`] instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalcError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A numeric argument was NaN, infinite or negative.
    #[error("invalid input for `{field}`: {value} (expected a finite number >= 0)")]
    InvalidInput { field: &'static str, value: f64 },

    /// No emission factor could be resolved for the requested mode.
    #[error("invalid transport mode: {0}")]
    InvalidMode(String),
}

impl CalcError {
    pub(crate) fn invalid_input(field: &'static str, value: f64) -> Self {
        CalcError::InvalidInput { field, value }
    }
}

/// Accepts finite, non-negative values.
pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value))
    }
}

/// Accepts any finite value, including negatives.
pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid_input(field, value))
    }
}

/// Rejects `input` when a computation on it left the finite range.
pub(crate) fn finite_result(field: &'static str, input: f64, output: f64) -> Result<f64> {
    if output.is_finite() {
        Ok(output)
    } else {
        Err(CalcError::invalid_input(field, input))
    }
}
