//! Compilation of a [`LoopConfig`] into a runnable loop.

use hf_config::{LinkDef, LoopConfig, PlantDef};
use hf_controls::{PidController, PidGains, SampleConfig};
use hf_sim::{History, LoopCommand, LoopDriver, PlantState, TankLoop, TankPlant};

use crate::error::AppResult;

/// Everything a front end needs to run one configured loop.
#[derive(Debug, Clone)]
pub struct LoopRuntime {
    pub name: String,
    pub driver: LoopDriver,
    /// Band used for the "at setpoint" status.
    pub setpoint_tolerance: f64,
    pub link: LinkDef,
}

impl LoopRuntime {
    pub fn sample(&self) -> SampleConfig {
        self.driver.sample()
    }
}

pub fn build_controller(config: &LoopConfig) -> AppResult<PidController> {
    let c = &config.controller;
    let controller = PidController::new(PidGains::new(c.kp, c.ki, c.kd), c.out_min, c.out_max)?
        .with_schedule(c.schedule)?;
    Ok(controller)
}

pub fn build_plant(plant: &PlantDef) -> AppResult<TankPlant> {
    let plant = match *plant {
        PlantDef::Discharge { k_u, k_d } => TankPlant::new(k_u, k_d)?,
        PlantDef::TimeConstant { tau, k } => TankPlant::from_time_constant(tau, k)?,
    };
    Ok(plant)
}

/// Validate `config` and build the driver it describes.
pub fn compile_loop(config: &LoopConfig) -> AppResult<LoopRuntime> {
    hf_config::validate_config(config)?;

    let sample = SampleConfig::new(config.dt)?;
    let tank_loop = TankLoop::new(build_controller(config)?, build_plant(&config.plant)?, sample);
    let initial = PlantState::new(config.initial.level)?;
    let command = LoopCommand::new(config.initial.setpoint, config.initial.mode);

    let mut driver = LoopDriver::new(tank_loop, initial, command)
        .with_setpoint_range(config.display.setpoint_range);
    if let Some(capacity) = config.history_capacity {
        driver = driver.with_history(History::bounded(capacity)?);
    }

    tracing::debug!(
        name = %config.name,
        dt = config.dt,
        setpoint = command.setpoint,
        mode = %command.mode,
        "loop compiled"
    );

    Ok(LoopRuntime {
        name: config.name.clone(),
        driver,
        setpoint_tolerance: config.display.setpoint_tolerance,
        link: config.link.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_config::Preset;

    use crate::error::AppError;

    #[test]
    fn presets_compile() {
        let display = compile_loop(&Preset::Display.config()).unwrap();
        assert_eq!(display.driver.history().and_then(History::capacity), Some(200));
        assert_eq!(display.driver.level(), 5.0);
        assert_eq!(display.driver.command().setpoint, 5.0);

        let network = compile_loop(&Preset::Network.config()).unwrap();
        assert!(network.driver.history().is_none());
        assert_eq!(network.driver.command().setpoint, 10.0);
        assert_eq!(network.sample().dt(), 0.1);
    }

    #[test]
    fn time_constant_plant_maps_to_discharge_form() {
        let plant = build_plant(&PlantDef::TimeConstant { tau: 4.0, k: 0.8 }).unwrap();
        assert_eq!(plant.k_u, 0.8);
        assert_eq!(plant.k_d, 0.25);
    }

    #[test]
    fn invalid_config_fails_before_building() {
        let mut config = Preset::Network.config();
        config.dt = 0.0;
        assert!(compile_loop(&config).is_err());
    }

    #[test]
    fn period_too_long_to_sleep_on_rejected() {
        let mut config = Preset::Display.config();
        config.dt = 1e20;
        assert!(matches!(
            compile_loop(&config),
            Err(AppError::Config(message)) if message.contains("dt")
        ));
    }
}
