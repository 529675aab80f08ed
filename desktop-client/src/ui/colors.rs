use eframe::egui;
use snake_engine::games::snake::{PickupKind, Rgb};

pub const BOARD_BACKGROUND: egui::Color32 = egui::Color32::BLACK;
pub const FOOD_COLOR: egui::Color32 = egui::Color32::WHITE;
pub const GLOW_COLOR: egui::Color32 = egui::Color32::from_rgb(0x9a, 0xff, 0x6b);

pub fn to_color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

pub fn pickup_color(kind: PickupKind) -> egui::Color32 {
    match kind {
        PickupKind::Bottle => egui::Color32::from_rgb(0xc8, 0x8a, 0x2e),
        PickupKind::Pill => egui::Color32::from_rgb(0xe0, 0x4f, 0xd8),
        PickupKind::Joint => egui::Color32::from_rgb(0x4c, 0xb0, 0x50),
    }
}

pub fn pickup_label(kind: PickupKind) -> &'static str {
    match kind {
        PickupKind::Bottle => "B",
        PickupKind::Pill => "P",
        PickupKind::Joint => "J",
    }
}
