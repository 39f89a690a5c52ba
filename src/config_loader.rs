use crate::config::{Config, ENV_RANDOMIZE, ENV_VERIFY};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Switch on the toggles whose environment variables are set.
///
/// Presence alone enables a toggle; the variable's value is ignored. Toggles
/// are never switched off from the environment.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_with(config, |key| std::env::var_os(key).is_some());
}

fn apply_overrides_with(config: &mut Config, is_set: impl Fn(&str) -> bool) {
    if is_set(ENV_RANDOMIZE) {
        info!("{} set: enabling address randomization", ENV_RANDOMIZE);
        config.randomize = true;
    }
    if is_set(ENV_VERIFY) {
        info!("{} set: enabling verification pass", ENV_VERIFY);
        config.verify = true;
    }
}

/// Resolve the startup configuration: file (if any), then environment.
pub fn resolve_config(config_path: Option<&Path>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}
