use std::collections::{HashSet, VecDeque};

use super::grid::GridSize;
use super::types::{Direction, Position};

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Position>,
    body_set: HashSet<Position>,
    pub direction: Direction,
}

impl Snake {
    pub fn new(start_pos: Position, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(start_pos);
        let mut body_set = HashSet::new();
        body_set.insert(start_pos);

        Self {
            body,
            body_set,
            direction,
        }
    }

    pub fn head(&self) -> Position {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Position {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.body_set.contains(position)
    }

    /// Self collision against the pre-move body. The tail cell is vacated by
    /// the same move, so it does not count.
    pub fn collides_with_body(&self, candidate: Position) -> bool {
        self.body_set.contains(&candidate) && candidate != self.tail()
    }

    pub fn next_head(&self) -> Position {
        self.head().shifted(self.direction)
    }

    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        self.body_set.insert(new_head);

        if !grow
            && let Some(tail) = self.body.pop_back()
            && !self.body.contains(&tail)
        {
            self.body_set.remove(&tail);
        }
    }

    /// Moves the snake inside `grid` after a resize: shift it by the smallest
    /// offset that brings it in bounds, then cut the body at the first segment
    /// that still does not fit. Returns whether anything changed.
    pub fn fit_into(&mut self, grid: GridSize) -> bool {
        if self.body.iter().all(|p| grid.contains(*p)) {
            return false;
        }

        let min_x = self.body.iter().map(|p| p.x).min().unwrap_or(0);
        let max_x = self.body.iter().map(|p| p.x).max().unwrap_or(0);
        let min_y = self.body.iter().map(|p| p.y).min().unwrap_or(0);
        let max_y = self.body.iter().map(|p| p.y).max().unwrap_or(0);

        let dx = axis_shift(min_x, max_x, grid.width as i32);
        let dy = axis_shift(min_y, max_y, grid.height as i32);

        let shifted: Vec<Position> = self
            .body
            .iter()
            .map(|p| Position::new(p.x + dx, p.y + dy))
            .collect();

        let head = shifted[0];
        let kept: Vec<Position> = if grid.contains(head) {
            shifted.into_iter().take_while(|p| grid.contains(*p)).collect()
        } else {
            vec![Position::new(
                head.x.clamp(0, grid.width as i32 - 1),
                head.y.clamp(0, grid.height as i32 - 1),
            )]
        };

        self.body = kept.into_iter().collect();
        self.body_set = self.body.iter().copied().collect();
        true
    }

    #[cfg(test)]
    pub(crate) fn from_segments(segments: &[Position], direction: Direction) -> Self {
        Self {
            body: segments.iter().copied().collect(),
            body_set: segments.iter().copied().collect(),
            direction,
        }
    }
}

fn axis_shift(min: i32, max: i32, size: i32) -> i32 {
    if max >= size {
        (size - 1 - max).max(-min)
    } else if min < 0 {
        -min
    } else {
        0
    }
}
