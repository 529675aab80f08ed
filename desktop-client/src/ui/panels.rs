use eframe::egui;
use snake_engine::games::snake::{Direction, GameOverReason, GameStatus, SnakeSnapshot};

/// What the user asked for through one of the panels this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Turn(Direction),
    Restart,
    OpenSettings,
    CloseOverlay,
}

fn status_hint(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Ready => "Press an arrow key or WASD to start",
        GameStatus::Running => "Arrows / WASD to steer, Escape to close",
        GameStatus::GameOver => "Enter to restart, Escape to close",
        GameStatus::Settings => "Settings open, game paused",
    }
}

pub fn game_over_text(reason: Option<GameOverReason>) -> &'static str {
    match reason {
        Some(GameOverReason::WallCollision) => "You hit the wall",
        Some(GameOverReason::SelfCollision) => "You ran into yourself",
        None => "Game over",
    }
}

pub fn render_hud(ui: &mut egui::Ui, snapshot: &SnakeSnapshot) -> Option<PanelAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(format!("Score: {}", snapshot.score));
        ui.separator();
        ui.label(format!(
            "Speed {} ({} ms/tick)",
            snapshot.speed,
            snapshot.tick_interval.as_millis()
        ));
        ui.separator();
        ui.label(format!("Length {}", snapshot.snake.len()));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✖ Close").clicked() {
                action = Some(PanelAction::CloseOverlay);
            }
            let settings_enabled = snapshot.status != GameStatus::Settings;
            if ui
                .add_enabled(settings_enabled, egui::Button::new("⚙ Settings"))
                .clicked()
            {
                action = Some(PanelAction::OpenSettings);
            }
        });
    });
    ui.label(status_hint(snapshot.status));

    action
}

pub fn render_touch_controls(ui: &mut egui::Ui) -> Option<PanelAction> {
    let mut action = None;
    let button_size = egui::vec2(64.0, 48.0);

    ui.vertical_centered(|ui| {
        if ui.add_sized(button_size, egui::Button::new("▲")).clicked() {
            action = Some(PanelAction::Turn(Direction::Up));
        }
        ui.horizontal(|ui| {
            ui.add_space((ui.available_width() - button_size.x * 3.0 - 16.0).max(0.0) / 2.0);
            if ui.add_sized(button_size, egui::Button::new("◀")).clicked() {
                action = Some(PanelAction::Turn(Direction::Left));
            }
            if ui.add_sized(button_size, egui::Button::new("▼")).clicked() {
                action = Some(PanelAction::Turn(Direction::Down));
            }
            if ui.add_sized(button_size, egui::Button::new("▶")).clicked() {
                action = Some(PanelAction::Turn(Direction::Right));
            }
        });
    });

    action
}

pub fn render_game_over(ctx: &egui::Context, snapshot: &SnakeSnapshot) -> Option<PanelAction> {
    let mut action = None;

    egui::Window::new("Game Over!")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(game_over_text(snapshot.game_over_reason));
            ui.heading(format!("Final score: {}", snapshot.score));
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("🔄 Restart").clicked() {
                    action = Some(PanelAction::Restart);
                }
                if ui.button("✖ Close").clicked() {
                    action = Some(PanelAction::CloseOverlay);
                }
            });
        });

    action
}
