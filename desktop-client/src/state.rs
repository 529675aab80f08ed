use eframe::egui;
use snake_engine::games::snake::{GridSize, SnakeCommand, SnakeSettings, SnakeSnapshot};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum HostCommand {
    /// Mount the overlay and start a fresh game on a board of this size.
    OpenOverlay { grid: GridSize, settings: SnakeSettings },
}

/// State shared between the egui thread and the tokio runtime thread.
pub struct SharedState {
    snapshot: Arc<Mutex<Option<SnakeSnapshot>>>,
    overlay_open: Arc<Mutex<bool>>,
    session_tx: Arc<Mutex<Option<mpsc::UnboundedSender<SnakeCommand>>>>,
    error: Arc<Mutex<Option<String>>>,
    egui_ctx: Arc<Mutex<Option<egui::Context>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(None)),
            overlay_open: Arc::new(Mutex::new(false)),
            session_tx: Arc::new(Mutex::new(None)),
            error: Arc::new(Mutex::new(None)),
            egui_ctx: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_snapshot(&self, snapshot: SnakeSnapshot) {
        *self.snapshot.lock().unwrap() = Some(snapshot);
        self.request_repaint();
    }

    pub fn get_snapshot(&self) -> Option<SnakeSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn set_overlay_open(&self, open: bool) {
        *self.overlay_open.lock().unwrap() = open;
        if !open {
            self.clear_session_tx();
        }
        self.request_repaint();
    }

    pub fn is_overlay_open(&self) -> bool {
        *self.overlay_open.lock().unwrap()
    }

    pub fn set_session_tx(&self, tx: mpsc::UnboundedSender<SnakeCommand>) {
        *self.session_tx.lock().unwrap() = Some(tx);
    }

    pub fn clear_session_tx(&self) {
        *self.session_tx.lock().unwrap() = None;
    }

    /// Forwards `command` to the running session. Returns `false` when no
    /// session is listening.
    pub fn send_to_session(&self, command: SnakeCommand) -> bool {
        match self.session_tx.lock().unwrap().as_ref() {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        }
    }

    pub fn set_error(&self, error: String) {
        *self.error.lock().unwrap() = Some(error);
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.lock().unwrap().clone()
    }

    pub fn clear_error(&self) {
        *self.error.lock().unwrap() = None;
    }

    pub fn set_egui_ctx(&self, ctx: egui::Context) {
        *self.egui_ctx.lock().unwrap() = Some(ctx);
    }

    fn request_repaint(&self) {
        if let Some(ctx) = self.egui_ctx.lock().unwrap().as_ref() {
            ctx.request_repaint();
        }
    }
}

impl Clone for SharedState {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            overlay_open: Arc::clone(&self.overlay_open),
            session_tx: Arc::clone(&self.session_tx),
            error: Arc::clone(&self.error),
            egui_ctx: Arc::clone(&self.egui_ctx),
        }
    }
}
