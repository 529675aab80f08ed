mod broadcaster;
mod overlay_task;

pub use broadcaster::LocalBroadcaster;
pub use overlay_task::overlay_host_task;
