mod body;
mod effects;
mod game_state;
mod grid;
mod input_queue;
mod overlay;
mod pickups;
pub mod session;
mod settings;
mod types;

pub use body::Snake;
pub use effects::{
    COLOR_CYCLE_PALETTE, COLOR_CYCLE_STEP, DEFAULT_BODY_COLOR, DEFAULT_HEAD_COLOR, FeedbackEffects,
    Rgb, SnakeVisuals, color_cycle,
};
pub use game_state::{SnakeGameState, SnakeSnapshot};
pub use grid::{GridSize, random_position};
pub use input_queue::{DEFAULT_INPUT_QUEUE_CAPACITY, InputQueue};
pub use overlay::OverlayHandle;
pub use pickups::{Pickup, Pickups};
pub use session::{SnakeCommand, SnakeSession};
pub use settings::{PickupRevealChances, SnakeSettings};
pub use types::{
    Consumable, Direction, GameOverReason, GameStatus, InputEvent, PickupKind, Position,
};
