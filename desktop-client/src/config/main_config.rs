use serde::{Deserialize, Serialize};
use snake_engine::config::Validate;
use snake_engine::games::snake::SnakeSettings;

use super::{ClientConfigManager, ConfigManager, TouchControlsMode, WindowConfig};

const DEFAULT_CONFIG_FILE_NAME: &str = "snake_overlay_config.yaml";

fn get_config_path() -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(DEFAULT_CONFIG_FILE_NAME).to_string_lossy().into_owned();
    }
    DEFAULT_CONFIG_FILE_NAME.to_string()
}

/// `path` overrides the default location next to the executable.
pub fn get_config_manager(path: Option<&str>) -> ClientConfigManager {
    match path {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(get_config_path()),
    }
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub game: SnakeSettings,
    pub window: WindowConfig,
    #[serde(default)]
    pub touch_controls: TouchControlsMode,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        self.window.validate()?;
        Ok(())
    }
}
