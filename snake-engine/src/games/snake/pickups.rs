use std::collections::HashSet;

use crate::games::RandomSource;
use super::grid::{GridSize, random_position};
use super::settings::PickupRevealChances;
use super::types::{PickupKind, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub position: Position,
    pub visible: bool,
}

/// One slot per pickup kind. Each slot always has a pending position, even
/// while hidden, so a reveal is instant.
#[derive(Clone, Debug)]
pub struct Pickups {
    slots: [Pickup; 3],
}

impl Pickups {
    pub fn spawn_hidden<R: RandomSource>(blocked: &HashSet<Position>, grid: GridSize, rng: &mut R) -> Self {
        let mut taken = blocked.clone();
        let slots = PickupKind::ALL.map(|kind| {
            let position = random_position(&taken, grid, rng).unwrap_or(Position::new(0, 0));
            taken.insert(position);
            Pickup {
                kind,
                position,
                visible: false,
            }
        });
        Self { slots }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.slots.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Pickup> {
        self.slots.iter().filter(|p| p.visible)
    }

    pub fn get(&self, kind: PickupKind) -> &Pickup {
        &self.slots[slot_index(kind)]
    }

    /// Rolls a reveal for every hidden kind. A pending cell that became
    /// occupied is swapped for a fresh one first; a kind with no free cell
    /// stays hidden. Returns the kinds that became visible.
    pub fn roll_reveals<R: RandomSource>(
        &mut self,
        chances: &PickupRevealChances,
        blocked: &HashSet<Position>,
        grid: GridSize,
        rng: &mut R,
    ) -> Vec<PickupKind> {
        let mut revealed = Vec::new();

        for index in 0..self.slots.len() {
            let pickup = self.slots[index];
            if pickup.visible || !rng.chance(chances.for_kind(pickup.kind)) {
                continue;
            }

            let others = self.positions_except(pickup.kind);
            let pending_ok = grid.contains(pickup.position)
                && !blocked.contains(&pickup.position)
                && !others.contains(&pickup.position);

            let position = if pending_ok {
                Some(pickup.position)
            } else {
                let mut taken = blocked.clone();
                taken.extend(others);
                random_position(&taken, grid, rng)
            };

            if let Some(position) = position {
                self.slots[index].position = position;
                self.slots[index].visible = true;
                revealed.push(pickup.kind);
            }
        }

        revealed
    }

    /// Hides and returns the visible pickup on `position`, if any.
    pub fn take_visible_at(&mut self, position: Position) -> Option<PickupKind> {
        let pickup = self
            .slots
            .iter_mut()
            .find(|p| p.visible && p.position == position)?;
        pickup.visible = false;
        Some(pickup.kind)
    }

    /// Gives `kind` a new hidden position. `blocked` should hold the snake and
    /// food; the other pickups are added here.
    pub fn respawn_hidden<R: RandomSource>(
        &mut self,
        kind: PickupKind,
        blocked: &HashSet<Position>,
        grid: GridSize,
        rng: &mut R,
    ) {
        let mut taken = blocked.clone();
        taken.extend(self.positions_except(kind));
        let slot = &mut self.slots[slot_index(kind)];
        slot.visible = false;
        if let Some(position) = random_position(&taken, grid, rng) {
            slot.position = position;
        }
    }

    /// Moves pickups that ended up out of bounds or on a blocked cell,
    /// keeping their visibility. Hidden ones with no free cell left are
    /// parked; visible ones with no free cell are hidden.
    pub fn relocate_invalid<R: RandomSource>(
        &mut self,
        blocked: &HashSet<Position>,
        grid: GridSize,
        rng: &mut R,
    ) -> usize {
        let mut moved = 0;
        for index in 0..self.slots.len() {
            let pickup = self.slots[index];
            if grid.contains(pickup.position) && !blocked.contains(&pickup.position) {
                continue;
            }
            let mut taken = blocked.clone();
            taken.extend(self.positions_except(pickup.kind));
            match random_position(&taken, grid, rng) {
                Some(position) => self.slots[index].position = position,
                None => {
                    self.slots[index].position = Position::new(0, 0);
                    self.slots[index].visible = false;
                }
            }
            moved += 1;
        }
        moved
    }

    fn positions_except(&self, kind: PickupKind) -> HashSet<Position> {
        self.slots
            .iter()
            .filter(|p| p.kind != kind)
            .map(|p| p.position)
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, kind: PickupKind, position: Position, visible: bool) {
        let slot = &mut self.slots[slot_index(kind)];
        slot.position = position;
        slot.visible = visible;
    }
}

fn slot_index(kind: PickupKind) -> usize {
    match kind {
        PickupKind::Bottle => 0,
        PickupKind::Pill => 1,
        PickupKind::Joint => 2,
    }
}
