use snake_engine::games::SnapshotBroadcaster;
use snake_engine::games::snake::SnakeSnapshot;
use crate::state::SharedState;

/// Hands snapshots from the session task straight to the UI thread.
#[derive(Clone)]
pub struct LocalBroadcaster {
    shared_state: SharedState,
}

impl LocalBroadcaster {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl SnapshotBroadcaster for LocalBroadcaster {
    async fn broadcast_snapshot(&self, snapshot: SnakeSnapshot) {
        self.shared_state.set_snapshot(snapshot);
    }

    async fn broadcast_closed(&self, final_snapshot: SnakeSnapshot) {
        self.shared_state.set_snapshot(final_snapshot);
        self.shared_state.set_overlay_open(false);
    }
}
