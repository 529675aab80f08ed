use std::future::Future;

use super::snake::SnakeSnapshot;

pub trait SnapshotBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_snapshot(&self, snapshot: SnakeSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_closed(&self, final_snapshot: SnakeSnapshot) -> impl Future<Output = ()> + Send;
}
