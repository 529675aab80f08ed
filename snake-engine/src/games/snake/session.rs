use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};

use crate::games::{RandomSource, SnapshotBroadcaster};
use crate::log;
use super::game_state::{SnakeGameState, SnakeSnapshot};
use super::grid::GridSize;
use super::settings::SnakeSettings;
use super::types::InputEvent;

pub enum SnakeCommand {
    Input(InputEvent),
    Resize(GridSize),
    OpenSettings,
    CloseSettings,
    ApplySettings {
        settings: SnakeSettings,
        reply: oneshot::Sender<Result<(), String>>,
    },
    Restart,
    Close,
}

pub struct SnakeSession;

impl SnakeSession {
    /// Drives `game` on the tokio clock until the overlay closes or every
    /// command sender is dropped. A snapshot goes out after each step; the
    /// final one is both broadcast as closed and returned.
    pub async fn run<R: RandomSource + Send>(
        mut game: SnakeGameState<R>,
        mut commands: mpsc::UnboundedReceiver<SnakeCommand>,
        broadcaster: impl SnapshotBroadcaster,
    ) -> SnakeSnapshot {
        let started = Instant::now();
        broadcaster.broadcast_snapshot(game.snapshot()).await;

        while game.is_open() {
            let deadline = game.next_deadline().map(|at| started + at);

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => handle_command(&mut game, command, started.elapsed()),
                    None => {
                        log!("Command channel closed, shutting the session down");
                        game.close();
                    }
                },
                _ = sleep_until_deadline(deadline) => {
                    game.advance(started.elapsed());
                }
            }

            if game.is_open() {
                broadcaster.broadcast_snapshot(game.snapshot()).await;
            }
        }

        let final_snapshot = game.snapshot();
        broadcaster.broadcast_closed(final_snapshot.clone()).await;
        final_snapshot
    }
}

fn handle_command<R: RandomSource>(game: &mut SnakeGameState<R>, command: SnakeCommand, now: Duration) {
    match command {
        SnakeCommand::Input(event) => game.handle_input(event, now),
        SnakeCommand::Resize(grid) => game.resize(grid, now),
        SnakeCommand::OpenSettings => game.open_settings(now),
        SnakeCommand::CloseSettings => game.close_settings(now),
        SnakeCommand::ApplySettings { settings, reply } => {
            let result = game.apply_settings(settings);
            if let Err(e) = &result {
                log!("Rejected settings: {}", e);
            }
            let _ = reply.send(result);
        }
        SnakeCommand::Restart => game.restart(now),
        SnakeCommand::Close => game.close(),
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
