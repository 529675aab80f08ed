use eframe::egui;
use snake_engine::config::Validate;
use snake_engine::games::snake::{PickupRevealChances, SnakeSettings};

fn parse_u32_input(input: &str, field_name: &str) -> Result<u32, String> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("{} must be a number", field_name))
}

fn parse_f64_input(input: &str, field_name: &str) -> Result<f64, String> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{} must be a number", field_name))
}

/// Text inputs for every `SnakeSettings` field. Values are only parsed when
/// the user presses Apply.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    min_speed: String,
    max_speed: String,
    initial_speed: String,
    joint_speed: String,
    tick_unit_ms: String,
    grace_period_ms: String,
    input_queue_capacity: String,
    event_flash_ms: String,
    pill_effect_ms: String,
    bottle_chance: String,
    pill_chance: String,
    joint_chance: String,
    min_grid_width: String,
    min_grid_height: String,
}

impl SettingsForm {
    pub fn from_settings(settings: &SnakeSettings) -> Self {
        Self {
            min_speed: settings.min_speed.to_string(),
            max_speed: settings.max_speed.to_string(),
            initial_speed: settings.initial_speed.to_string(),
            joint_speed: settings.joint_speed.to_string(),
            tick_unit_ms: settings.tick_unit_ms.to_string(),
            grace_period_ms: settings.grace_period_ms.to_string(),
            input_queue_capacity: settings.input_queue_capacity.to_string(),
            event_flash_ms: settings.event_flash_ms.to_string(),
            pill_effect_ms: settings.pill_effect_ms.to_string(),
            bottle_chance: settings.pickup_reveal.bottle.to_string(),
            pill_chance: settings.pickup_reveal.pill.to_string(),
            joint_chance: settings.pickup_reveal.joint.to_string(),
            min_grid_width: settings.min_grid_width.to_string(),
            min_grid_height: settings.min_grid_height.to_string(),
        }
    }

    pub fn to_settings(&self) -> Result<SnakeSettings, String> {
        let settings = SnakeSettings {
            min_speed: parse_u32_input(&self.min_speed, "Min speed")?,
            max_speed: parse_u32_input(&self.max_speed, "Max speed")?,
            initial_speed: parse_u32_input(&self.initial_speed, "Initial speed")?,
            joint_speed: parse_u32_input(&self.joint_speed, "Joint speed")?,
            tick_unit_ms: parse_u32_input(&self.tick_unit_ms, "Tick unit")?,
            grace_period_ms: parse_u32_input(&self.grace_period_ms, "Grace period")?,
            input_queue_capacity: parse_u32_input(&self.input_queue_capacity, "Input queue")? as usize,
            event_flash_ms: parse_u32_input(&self.event_flash_ms, "Event flash")?,
            pill_effect_ms: parse_u32_input(&self.pill_effect_ms, "Pill effect")?,
            pickup_reveal: PickupRevealChances {
                bottle: parse_f64_input(&self.bottle_chance, "Bottle chance")?,
                pill: parse_f64_input(&self.pill_chance, "Pill chance")?,
                joint: parse_f64_input(&self.joint_chance, "Joint chance")?,
            },
            min_grid_width: parse_u32_input(&self.min_grid_width, "Min grid width")?,
            min_grid_height: parse_u32_input(&self.min_grid_height, "Min grid height")?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("snake_settings_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                let rows: [(&str, &mut String); 14] = [
                    ("Min speed", &mut self.min_speed),
                    ("Max speed", &mut self.max_speed),
                    ("Initial speed", &mut self.initial_speed),
                    ("Joint speed", &mut self.joint_speed),
                    ("Tick unit (ms)", &mut self.tick_unit_ms),
                    ("Grace period (ms)", &mut self.grace_period_ms),
                    ("Input queue", &mut self.input_queue_capacity),
                    ("Event flash (ms)", &mut self.event_flash_ms),
                    ("Pill effect (ms)", &mut self.pill_effect_ms),
                    ("Bottle chance", &mut self.bottle_chance),
                    ("Pill chance", &mut self.pill_chance),
                    ("Joint chance", &mut self.joint_chance),
                    ("Min grid width", &mut self.min_grid_width),
                    ("Min grid height", &mut self.min_grid_height),
                ];
                for (label, value) in rows {
                    ui.label(label);
                    ui.add(egui::TextEdit::singleline(value).desired_width(80.0));
                    ui.end_row();
                }
            });
    }
}
