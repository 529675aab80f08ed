use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::grid::GridSize;
use super::input_queue::DEFAULT_INPUT_QUEUE_CAPACITY;
use super::types::PickupKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupRevealChances {
    pub bottle: f64,
    pub pill: f64,
    pub joint: f64,
}

impl PickupRevealChances {
    pub fn for_kind(&self, kind: PickupKind) -> f64 {
        match kind {
            PickupKind::Bottle => self.bottle,
            PickupKind::Pill => self.pill,
            PickupKind::Joint => self.joint,
        }
    }
}

impl Default for PickupRevealChances {
    fn default() -> Self {
        Self {
            bottle: 0.55,
            pill: 0.5,
            joint: 0.62,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSettings {
    pub min_speed: u32,
    pub max_speed: u32,
    pub initial_speed: u32,
    /// Speed a Joint resets to.
    pub joint_speed: u32,
    pub tick_unit_ms: u32,
    pub grace_period_ms: u32,
    pub input_queue_capacity: usize,
    pub event_flash_ms: u32,
    pub pill_effect_ms: u32,
    pub pickup_reveal: PickupRevealChances,
    pub min_grid_width: u32,
    pub min_grid_height: u32,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self {
            min_speed: 1,
            max_speed: 20,
            initial_speed: 10,
            joint_speed: 10,
            tick_unit_ms: 10,
            grace_period_ms: 150,
            input_queue_capacity: DEFAULT_INPUT_QUEUE_CAPACITY,
            event_flash_ms: 1000,
            pill_effect_ms: 3000,
            pickup_reveal: PickupRevealChances::default(),
            min_grid_width: 5,
            min_grid_height: 5,
        }
    }
}

impl SnakeSettings {
    pub fn clamp_speed(&self, speed: u32) -> u32 {
        speed.max(self.min_speed).min(self.max_speed)
    }

    /// `(max_speed - speed + 1) * tick_unit`: a higher speed ticks sooner.
    pub fn tick_interval(&self, speed: u32) -> Duration {
        let steps = self.max_speed.saturating_sub(self.clamp_speed(speed)) + 1;
        Duration::from_millis((steps as u64 * self.tick_unit_ms as u64).max(1))
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms as u64)
    }

    pub fn event_flash(&self) -> Duration {
        Duration::from_millis(self.event_flash_ms as u64)
    }

    pub fn pill_effect(&self) -> Duration {
        Duration::from_millis(self.pill_effect_ms as u64)
    }

    pub fn min_grid(&self) -> GridSize {
        GridSize::new(self.min_grid_width, self.min_grid_height)
    }
}

impl Validate for SnakeSettings {
    fn validate(&self) -> Result<(), String> {
        if self.min_speed == 0 {
            return Err("min_speed must be at least 1".to_string());
        }
        if self.min_speed > self.max_speed {
            return Err("min_speed must not exceed max_speed".to_string());
        }
        if self.max_speed > 100 {
            return Err("max_speed must not exceed 100".to_string());
        }
        if !(self.min_speed..=self.max_speed).contains(&self.initial_speed) {
            return Err("initial_speed must be between min_speed and max_speed".to_string());
        }
        if !(self.min_speed..=self.max_speed).contains(&self.joint_speed) {
            return Err("joint_speed must be between min_speed and max_speed".to_string());
        }
        if self.tick_unit_ms == 0 || self.tick_unit_ms > 1000 {
            return Err("tick_unit_ms must be between 1 and 1000".to_string());
        }
        if self.grace_period_ms == 0 || self.grace_period_ms > 2000 {
            return Err("grace_period_ms must be between 1 and 2000".to_string());
        }
        if self.input_queue_capacity == 0 || self.input_queue_capacity > 8 {
            return Err("input_queue_capacity must be between 1 and 8".to_string());
        }
        if self.event_flash_ms == 0 || self.pill_effect_ms == 0 {
            return Err("effect durations must be greater than 0".to_string());
        }
        for (name, chance) in [
            ("bottle", self.pickup_reveal.bottle),
            ("pill", self.pickup_reveal.pill),
            ("joint", self.pickup_reveal.joint),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(format!("{} reveal chance must be between 0.0 and 1.0", name));
            }
        }
        if self.min_grid_width < 5 || self.min_grid_height < 5 {
            return Err("minimum grid must be at least 5x5".to_string());
        }
        Ok(())
    }
}
