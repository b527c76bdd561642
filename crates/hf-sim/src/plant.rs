//! First-order tank level plant.
//!
//! Dynamics: `dlevel/dt = k_u * u - k_d * level`, integrated with explicit
//! Euler and floored at zero (the tank cannot hold a negative volume; it
//! may rise without bound).

use hf_controls::SampleConfig;
use hf_core::ensure_finite;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Tank level state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    /// Liquid level (cm), never negative.
    pub level: f64,
}

impl PlantState {
    /// Create a state, rejecting negative or non-finite levels.
    pub fn new(level: f64) -> SimResult<Self> {
        if ensure_finite(level, "initial level")? < 0.0 {
            return Err(SimError::NonPhysical {
                what: "initial level must be non-negative",
            });
        }
        Ok(Self { level })
    }
}

impl Default for PlantState {
    fn default() -> Self {
        Self { level: 0.0 }
    }
}

/// First-order tank with actuator gain and natural discharge.
///
/// # Example
///
/// ```
/// use hf_controls::SampleConfig;
/// use hf_sim::{PlantState, TankPlant};
///
/// let tank = TankPlant::from_time_constant(4.0, 0.8).unwrap();
/// let dt = SampleConfig::new(0.1).unwrap();
/// let next = tank.advance(&PlantState { level: 5.0 }, 10.0, dt);
///
/// assert!((next.level - 5.675).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TankPlant {
    /// Actuator gain (cm/s per unit of control).
    pub k_u: f64,
    /// Natural discharge rate (1/s).
    pub k_d: f64,
}

impl TankPlant {
    /// Create a plant from actuator gain and discharge rate.
    ///
    /// # Errors
    ///
    /// Returns error if either constant is non-finite or `k_d` is negative.
    pub fn new(k_u: f64, k_d: f64) -> SimResult<Self> {
        ensure_finite(k_u, "k_u")?;
        if ensure_finite(k_d, "k_d")? < 0.0 {
            return Err(SimError::InvalidArg {
                what: "k_d must be non-negative",
            });
        }
        Ok(Self { k_u, k_d })
    }

    /// Create a plant from the time-constant form
    /// `dlevel/dt = -level / tau + k * u`.
    pub fn from_time_constant(tau: f64, k: f64) -> SimResult<Self> {
        if ensure_finite(tau, "tau")? <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "tau must be positive",
            });
        }
        Self::new(k, 1.0 / tau)
    }

    /// Level derivative for the current level and control input.
    pub fn dldt(&self, level: f64, control: f64) -> f64 {
        self.k_u * control - self.k_d * level
    }

    /// Advance the level by one sample period.
    pub fn advance(&self, state: &PlantState, control: f64, sample: SampleConfig) -> PlantState {
        let level = state.level + self.dldt(state.level, control) * sample.dt();
        PlantState {
            level: level.max(0.0),
        }
    }

    /// Level at which a constant control input holds the tank still.
    ///
    /// `None` for a tank with no discharge.
    pub fn steady_state_level(&self, control: f64) -> Option<f64> {
        if self.k_d > 0.0 {
            Some((self.k_u * control / self.k_d).max(0.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt() -> SampleConfig {
        SampleConfig::new(0.1).unwrap()
    }

    #[test]
    fn time_constant_form_step() {
        let tank = TankPlant::from_time_constant(4.0, 0.8).unwrap();
        let next = tank.advance(&PlantState { level: 5.0 }, 10.0, dt());
        assert!((next.level - 5.675).abs() < 1e-12);
    }

    #[test]
    fn discharge_form_step() {
        let tank = TankPlant::new(0.8, 0.15).unwrap();
        let next = tank.advance(&PlantState { level: 5.0 }, 2.0, dt());
        // (1.6 - 0.75) * 0.1
        assert!((next.level - 5.085).abs() < 1e-12);
    }

    #[test]
    fn level_floors_at_zero() {
        let tank = TankPlant::new(0.8, 0.15).unwrap();
        let next = tank.advance(&PlantState { level: 0.2 }, -10.0, dt());
        assert_eq!(next.level, 0.0);
    }

    #[test]
    fn open_loop_converges_to_steady_state() {
        let tank = TankPlant::new(0.8, 0.15).unwrap();
        let target = tank.steady_state_level(1.0).unwrap();
        let mut state = PlantState::default();
        for _ in 0..2_000 {
            state = tank.advance(&state, 1.0, dt());
        }
        assert!((state.level - target).abs() < 1e-6);
    }

    #[test]
    fn invalid_parameters() {
        assert!(TankPlant::new(0.8, -0.1).is_err());
        assert!(TankPlant::new(f64::NAN, 0.1).is_err());
        assert!(TankPlant::from_time_constant(0.0, 0.8).is_err());
        assert!(TankPlant::from_time_constant(-4.0, 0.8).is_err());
        assert!(PlantState::new(-1.0).is_err());
        assert!(PlantState::new(f64::INFINITY).is_err());
        assert_eq!(TankPlant::new(0.8, 0.0).unwrap().steady_state_level(1.0), None);
    }
}
