use std::time::Duration;

use crate::HfError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HfError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero (periods, time constants).
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, HfError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(HfError::NonPositive { what, value: v })
    }
}

/// Positive and short enough to sleep on as a [`Duration`] (loop periods).
pub fn ensure_period(v: Real, what: &'static str) -> Result<Real, HfError> {
    let v = ensure_positive(v, what)?;
    match Duration::try_from_secs_f64(v) {
        Ok(_) => Ok(v),
        Err(_) => Err(HfError::TooLong { what, value: v }),
    }
}
