use serde::{Deserialize, Serialize};

/// A board cell. Signed so a candidate head one step past a wall is still
/// representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn shifted(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }

    /// Screen coordinates: y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ready,
    Running,
    GameOver,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    WallCollision,
    SelfCollision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Bottle,
    Pill,
    Joint,
}

impl PickupKind {
    pub const ALL: [PickupKind; 3] = [PickupKind::Bottle, PickupKind::Pill, PickupKind::Joint];
}

/// Anything the snake can eat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Consumable {
    Food,
    Pickup(PickupKind),
}

impl Consumable {
    pub fn points(&self) -> u32 {
        match self {
            Consumable::Food => 1,
            Consumable::Pickup(PickupKind::Bottle) => 50,
            Consumable::Pickup(PickupKind::Pill) => 30,
            Consumable::Pickup(PickupKind::Joint) => 7,
        }
    }
}

/// Host input after key/touch mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Direction(Direction),
    /// Enter: restart after game over.
    Confirm,
    /// Escape: leave settings, otherwise close the overlay.
    Cancel,
}
