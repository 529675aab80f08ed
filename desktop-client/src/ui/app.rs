use eframe::egui;
use snake_engine::games::snake::{
    GameStatus, GridSize, InputEvent, SnakeCommand, SnakeSettings, SnakeSnapshot,
};
use snake_engine::log;
use tokio::sync::{mpsc, oneshot};

use crate::config::{ClientConfigManager, Config};
use crate::state::{HostCommand, SharedState};

use super::board::render_board;
use super::input::collect_input_events;
use super::panels::{PanelAction, render_game_over, render_hud, render_touch_controls};
use super::settings_form::SettingsForm;

pub struct OverlayApp {
    shared_state: SharedState,
    host_tx: mpsc::UnboundedSender<HostCommand>,
    config_manager: ClientConfigManager,
    config: Config,
    open_requested: bool,
    settings_form: Option<SettingsForm>,
    pending_apply: Option<(SnakeSettings, oneshot::Receiver<Result<(), String>>)>,
    settings_message: Option<String>,
    last_requested_grid: Option<GridSize>,
}

impl OverlayApp {
    pub fn new(
        shared_state: SharedState,
        host_tx: mpsc::UnboundedSender<HostCommand>,
        config_manager: ClientConfigManager,
        open_on_start: bool,
    ) -> Self {
        let config = match config_manager.get_config() {
            Ok(config) => config,
            Err(e) => {
                shared_state.set_error(format!("Failed to load config: {}", e));
                Config::default()
            }
        };

        Self {
            shared_state,
            host_tx,
            config_manager,
            config,
            open_requested: open_on_start,
            settings_form: None,
            pending_apply: None,
            settings_message: None,
            last_requested_grid: None,
        }
    }

    fn grid_for(&self, available: egui::Vec2) -> GridSize {
        GridSize::from_viewport(
            available.x,
            available.y,
            self.config.window.cell_size_px,
            self.config.game.min_grid(),
        )
    }

    fn open_overlay(&mut self, available: egui::Vec2) {
        let grid = self.grid_for(available);
        self.last_requested_grid = Some(grid);
        self.settings_form = None;
        self.settings_message = None;
        let settings = self.config.game.clone();
        if self.host_tx.send(HostCommand::OpenOverlay { grid, settings }).is_err() {
            self.shared_state
                .set_error("Game runtime is not running".to_string());
        }
    }

    fn send(&self, command: SnakeCommand) {
        if !self.shared_state.send_to_session(command) {
            log!("No snake session to receive the command");
        }
    }

    fn handle_action(&mut self, action: PanelAction, snapshot: &SnakeSnapshot) {
        match action {
            PanelAction::Turn(direction) => self.send(SnakeCommand::Input(InputEvent::Direction(direction))),
            PanelAction::Restart => self.send(SnakeCommand::Restart),
            PanelAction::OpenSettings => {
                self.settings_form = Some(SettingsForm::from_settings(&snapshot.settings));
                self.settings_message = None;
                self.send(SnakeCommand::OpenSettings);
            }
            PanelAction::CloseOverlay => self.send(SnakeCommand::Close),
        }
    }

    fn poll_pending_apply(&mut self) {
        let Some((settings, mut reply_rx)) = self.pending_apply.take() else {
            return;
        };

        match reply_rx.try_recv() {
            Ok(Ok(())) => {
                self.config.game = settings;
                match self.config_manager.set_config(&self.config) {
                    Ok(()) => self.settings_message = Some("Settings saved".to_string()),
                    Err(e) => self.settings_message = Some(format!("Applied, but not saved: {}", e)),
                }
            }
            Ok(Err(e)) => self.settings_message = Some(e),
            Err(oneshot::error::TryRecvError::Empty) => {
                self.pending_apply = Some((settings, reply_rx));
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                self.settings_message = Some("Session ended before settings were applied".to_string());
            }
        }
    }

    fn render_settings(&mut self, ctx: &egui::Context) {
        let mut apply = false;
        let mut back = false;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                if let Some(form) = self.settings_form.as_mut() {
                    form.render(ui);
                }
                if let Some(message) = &self.settings_message {
                    ui.add_space(5.0);
                    ui.label(message);
                }
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    apply = ui
                        .add_enabled(self.pending_apply.is_none(), egui::Button::new("Apply"))
                        .clicked();
                    back = ui.button("Back").clicked();
                });
            });

        if apply && let Some(form) = &self.settings_form {
            match form.to_settings() {
                Ok(settings) => {
                    let (reply_tx, reply_rx) = oneshot::channel();
                    self.send(SnakeCommand::ApplySettings {
                        settings: settings.clone(),
                        reply: reply_tx,
                    });
                    self.pending_apply = Some((settings, reply_rx));
                }
                Err(e) => self.settings_message = Some(e),
            }
        }
        if back {
            self.settings_form = None;
            self.send(SnakeCommand::CloseSettings);
        }
    }

    fn render_landing(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            ui.vertical_centered(|ui| {
                ui.add_space(available.y / 3.0);
                ui.heading("🐍 Snake");
                ui.add_space(10.0);
                let play = ui.add_sized([160.0, 40.0], egui::Button::new("▶ Play Snake")).clicked();
                if play || self.open_requested {
                    self.open_requested = false;
                    self.open_overlay(available);
                }
            });
        });
    }

    fn render_overlay(&mut self, ctx: &egui::Context, snapshot: SnakeSnapshot) {
        for event in collect_input_events(ctx) {
            if snapshot.status == GameStatus::Settings && event != InputEvent::Cancel {
                continue;
            }
            if event == InputEvent::Cancel && snapshot.status == GameStatus::Settings {
                self.settings_form = None;
            }
            self.send(SnakeCommand::Input(event));
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("snake_hud").show(ctx, |ui| {
            actions.extend(render_hud(ui, &snapshot));
        });

        let viewport_width = ctx.input(|i| i.viewport().inner_rect.map(|r| r.width()));
        let show_touch = viewport_width
            .is_some_and(|width| self.config.touch_controls.show_for_width(width));
        if show_touch {
            egui::TopBottomPanel::bottom("snake_touch_controls").show(ctx, |ui| {
                actions.extend(render_touch_controls(ui));
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let grid = self.grid_for(ui.available_size());
            if grid != snapshot.grid && self.last_requested_grid != Some(grid) {
                self.last_requested_grid = Some(grid);
                self.send(SnakeCommand::Resize(grid));
            }
            render_board(ui, &snapshot);
        });

        match snapshot.status {
            GameStatus::GameOver => actions.extend(render_game_over(ctx, &snapshot)),
            GameStatus::Settings => {
                if self.settings_form.is_none() {
                    self.settings_form = Some(SettingsForm::from_settings(&snapshot.settings));
                }
                self.render_settings(ctx);
            }
            GameStatus::Ready | GameStatus::Running => {}
        }

        for action in actions {
            self.handle_action(action, &snapshot);
        }
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending_apply();

        if let Some(error) = self.shared_state.get_error() {
            egui::Window::new("Error")
                .collapsible(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.shared_state.clear_error();
                    }
                });
        }

        let snapshot = self
            .shared_state
            .get_snapshot()
            .filter(|snapshot| snapshot.open && self.shared_state.is_overlay_open());

        match snapshot {
            Some(snapshot) => self.render_overlay(ctx, snapshot),
            None => self.render_landing(ctx),
        }

        if self.pending_apply.is_some() {
            ctx.request_repaint();
        }
    }
}
