use serde::{Deserialize, Serialize};
use snake_engine::config::Validate;

/// Viewport width below which `Auto` shows the on-screen direction pad.
const NARROW_VIEWPORT_PX: f32 = 768.0;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub cell_size_px: f32,
}

impl Validate for WindowConfig {
    fn validate(&self) -> Result<(), String> {
        if self.width < 200.0 || self.height < 200.0 {
            return Err(format!(
                "Window must be at least 200x200, got {}x{}",
                self.width, self.height
            ));
        }
        if !(4.0..=64.0).contains(&self.cell_size_px) {
            return Err(format!(
                "Cell size must be between 4 and 64 px, got {}",
                self.cell_size_px
            ));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 720.0,
            cell_size_px: 20.0,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
pub enum TouchControlsMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl TouchControlsMode {
    pub fn show_for_width(&self, viewport_width: f32) -> bool {
        match self {
            TouchControlsMode::Auto => viewport_width < NARROW_VIEWPORT_PX,
            TouchControlsMode::Always => true,
            TouchControlsMode::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_controls_follow_viewport_in_auto_mode() {
        assert!(TouchControlsMode::Auto.show_for_width(400.0));
        assert!(!TouchControlsMode::Auto.show_for_width(1024.0));
        assert!(TouchControlsMode::Always.show_for_width(1024.0));
        assert!(!TouchControlsMode::Never.show_for_width(400.0));
    }

    #[test]
    fn test_window_config_rejects_tiny_cells() {
        let config = WindowConfig {
            cell_size_px: 1.0,
            ..WindowConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(WindowConfig::default().validate().is_ok());
    }
}
