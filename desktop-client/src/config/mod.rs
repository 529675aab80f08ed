mod main_config;
mod window_config;

pub(crate) use snake_engine::config::{ConfigManager, FileContentConfigProvider, YamlConfigSerializer};

pub use main_config::{get_config_manager, Config};
pub use window_config::{TouchControlsMode, WindowConfig};

pub(crate) type ClientConfigManager = ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer>;
