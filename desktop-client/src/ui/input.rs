use eframe::egui;
use snake_engine::games::snake::{Direction, InputEvent};

pub fn key_to_input(key: egui::Key) -> Option<InputEvent> {
    match key {
        egui::Key::ArrowUp | egui::Key::W => Some(InputEvent::Direction(Direction::Up)),
        egui::Key::ArrowDown | egui::Key::S => Some(InputEvent::Direction(Direction::Down)),
        egui::Key::ArrowLeft | egui::Key::A => Some(InputEvent::Direction(Direction::Left)),
        egui::Key::ArrowRight | egui::Key::D => Some(InputEvent::Direction(Direction::Right)),
        egui::Key::Enter => Some(InputEvent::Confirm),
        egui::Key::Escape => Some(InputEvent::Cancel),
        _ => None,
    }
}

/// Key presses of this frame in the order they happened. Auto-repeat is
/// ignored so holding a key does not flood the queue.
pub fn collect_input_events(ctx: &egui::Context) -> Vec<InputEvent> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    ..
                } => key_to_input(*key),
                _ => None,
            })
            .collect()
    })
}
