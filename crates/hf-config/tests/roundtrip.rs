use hf_controls::{GainSchedule, Mode};
use hf_config::{
    ConfigError, LoopConfig, PlantDef, Preset, load, load_json, load_yaml, save_json, save_yaml,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("hf_config_{}_{name}", std::process::id()))
}

#[test]
fn roundtrip_yaml_presets() {
    for preset in Preset::ALL {
        let config = preset.config();
        let path = temp_path(&format!("{preset}.yaml"));

        save_yaml(&path, &config).unwrap();
        let loaded = load_yaml(&path).unwrap();

        assert_eq!(config, loaded);
        let _ = std::fs::remove_file(&path);
    }
}

#[test]
fn roundtrip_json_with_proportional_schedule() {
    let mut config = Preset::Network.config();
    config.controller.schedule = GainSchedule::Proportional { kp: 1.5 };
    config.initial.mode = Mode::GainScheduled;

    let path = temp_path("proportional.json");
    save_json(&path, &config).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(config, loaded);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn minimal_yaml_fills_defaults() {
    let yaml = r#"
version: 1
name: Minimal
dt: 0.1
initial:
  level: 5.0
  setpoint: 10.0
controller:
  kp: 2.0
  ki: 0.4
  kd: 0.2
plant:
  type: time_constant
  tau: 4.0
  k: 0.8
"#;
    let config: LoopConfig = serde_yaml::from_str(yaml).unwrap();
    hf_config::validate_config(&config).unwrap();

    assert_eq!(config.initial.mode, Mode::Pid);
    assert_eq!(config.controller.out_min, -10.0);
    assert_eq!(config.controller.out_max, 10.0);
    assert_eq!(config.controller.schedule, GainSchedule::default());
    assert_eq!(config.plant, PlantDef::TimeConstant { tau: 4.0, k: 0.8 });
    assert_eq!(config.history_capacity, None);
    assert_eq!(config.display.setpoint_tolerance, 0.5);
    assert_eq!(config.link.bind, "127.0.0.1:5006");
    assert_eq!(config.link.peer, "127.0.0.1:5005");
}

#[test]
fn mode_accepts_wire_labels() {
    let yaml = "level: 1.0\nsetpoint: 2.0\nmode: MPC\n";
    let initial: hf_config::InitialDef = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(initial.mode, Mode::GainScheduled);
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let mut config = Preset::Display.config();
    let path = temp_path("zero_dt.yaml");
    config.dt = 0.0;
    std::fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();

    assert!(matches!(load_yaml(&path), Err(ConfigError::Validation(_))));
    assert!(save_yaml(&path, &config).is_err());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_io_error() {
    let path = temp_path("does_not_exist.json");
    assert!(matches!(load_json(&path), Err(ConfigError::Io(_))));
}
