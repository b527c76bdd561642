//! Sample period for the fixed-rate control loop.
//!
//! The period is validated once; every consumer downstream can divide by
//! `dt` without re-checking it.

use hf_core::units::{self, Time};
use hf_core::{Real, ensure_period};

use crate::error::ControlResult;

/// Sample configuration for the controller and plant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    dt: Real,
}

impl SampleConfig {
    /// Create a new sample configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not a positive number of seconds that
    /// fits a wall-clock [`std::time::Duration`].
    pub fn new(dt: Real) -> ControlResult<Self> {
        let dt = ensure_period(dt, "sample period dt")?;
        Ok(Self { dt })
    }

    /// Sample period in seconds.
    pub fn dt(&self) -> Real {
        self.dt
    }

    /// Sample period as a typed quantity.
    pub fn period(&self) -> Time {
        units::s(self.dt)
    }

    /// Tick rate in Hz.
    pub fn frequency(&self) -> Real {
        1.0 / self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_creation() {
        let config = SampleConfig::new(0.1).unwrap();
        assert_eq!(config.dt(), 0.1);
        assert!((config.frequency() - 10.0).abs() < 1e-10);
        assert!((units::as_seconds(config.period()) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn zero_and_negative_periods_rejected() {
        assert!(SampleConfig::new(0.0).is_err());
        assert!(SampleConfig::new(-0.1).is_err());
        assert!(SampleConfig::new(f64::NAN).is_err());
        assert!(SampleConfig::new(1e20).is_err());
    }
}
