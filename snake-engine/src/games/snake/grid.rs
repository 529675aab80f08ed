use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::games::RandomSource;
use super::types::Position;

const RANDOM_ATTEMPTS: usize = 100;

/// Board size in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Cells that fit into a viewport. Degenerate measurements (zero, negative
    /// or NaN) fall back to `min`.
    pub fn from_viewport(width_px: f32, height_px: f32, cell_px: f32, min: GridSize) -> Self {
        let cells = |px: f32| -> u32 {
            if !px.is_finite() || !cell_px.is_finite() || px <= 0.0 || cell_px <= 0.0 {
                return 0;
            }
            (px / cell_px).floor().min(u32::MAX as f32) as u32
        };
        Self::new(cells(width_px), cells(height_px)).at_least(min)
    }

    pub fn at_least(self, min: GridSize) -> Self {
        Self::new(self.width.max(min.width).max(1), self.height.max(min.height).max(1))
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as i64) < self.width as i64
            && (position.y as i64) < self.height as i64
    }

    /// Starting cell of a fresh snake.
    pub fn origin(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32).flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }
}

/// Uniformly sampled free cell. A handful of blind draws first, then a pick
/// among the enumerated free cells so a crowded board still terminates.
/// `None` only when every cell is blocked.
pub fn random_position<R: RandomSource>(
    blocked: &HashSet<Position>,
    grid: GridSize,
    rng: &mut R,
) -> Option<Position> {
    if grid.width == 0 || grid.height == 0 {
        return None;
    }

    for _ in 0..RANDOM_ATTEMPTS {
        let x = rng.index(grid.width as usize) as i32;
        let y = rng.index(grid.height as usize) as i32;
        let position = Position::new(x, y);
        if !blocked.contains(&position) {
            return Some(position);
        }
    }

    let free: Vec<Position> = grid.cells().filter(|p| !blocked.contains(p)).collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.index(free.len())])
}
