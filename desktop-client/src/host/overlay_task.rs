use snake_engine::games::SessionRng;
use snake_engine::games::snake::{OverlayHandle, SnakeCommand, SnakeGameState, SnakeSession};
use snake_engine::log;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::state::{HostCommand, SharedState};

use super::LocalBroadcaster;

/// Owns the game sessions. Each `OpenOverlay` starts a fresh session; one
/// that is still running gets closed first.
pub async fn overlay_host_task(
    shared_state: SharedState,
    mut command_rx: mpsc::UnboundedReceiver<HostCommand>,
) {
    let mut running: Option<(mpsc::UnboundedSender<SnakeCommand>, JoinHandle<()>)> = None;

    while let Some(command) = command_rx.recv().await {
        match command {
            HostCommand::OpenOverlay { grid, settings } => {
                if let Some((tx, handle)) = running.take() {
                    let _ = tx.send(SnakeCommand::Close);
                    let _ = handle.await;
                }

                let rng = SessionRng::from_random();
                log!("Opening snake overlay on {}x{} grid, seed {}", grid.width, grid.height, rng.seed());

                let on_close_state = shared_state.clone();
                let overlay = OverlayHandle::new(move || on_close_state.set_overlay_open(false));
                let game = SnakeGameState::new(settings, grid, rng, overlay);

                let (session_tx, session_rx) = mpsc::unbounded_channel();
                shared_state.set_session_tx(session_tx.clone());
                shared_state.set_overlay_open(true);

                let broadcaster = LocalBroadcaster::new(shared_state.clone());
                let handle = tokio::spawn(async move {
                    let final_snapshot = SnakeSession::run(game, session_rx, broadcaster).await;
                    log!("Snake session finished with score {}", final_snapshot.score);
                });
                running = Some((session_tx, handle));
            }
        }
    }

    if let Some((tx, handle)) = running.take() {
        let _ = tx.send(SnakeCommand::Close);
        let _ = handle.await;
    }
}
