//! # Grid
//!
//! The manor board: a rectangle of cells, each optionally holding a placed
//! room and up to four doors stored in per-direction slots.
//!
//! Doors do not exist until something touches the boundary they sit on.
//! The first touch samples a lock tier from the session PRNG and writes an
//! identical closed door on both adjacent cells, so the pair can never
//! disagree. Boundaries that face out of the grid get a sealed door on the
//! inner side only.

use log::debug;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::game::doors::{tier_for_row, Door, LockTier};
use crate::game::inventory::Inventory;
use crate::game::rooms::{RoomShape, RoomTemplate};
use crate::game::{Direction, Position, RoomId};
use crate::{ManseError, ManseResult};

/// A room written onto the board.
///
/// The grid keeps only the template id and the shape; the catalog owns the
/// template instance with its one-shot reward flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub template: RoomId,
    pub shape: RoomShape,
}

/// One cell of the manor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub room: Option<PlacedRoom>,
    /// Door slots indexed by `Direction::index()`.
    pub doors: [Option<Door>; 4],
}

/// Result of a single movement attempt.
///
/// A failed attempt leaves the player and (almost always) the inventory
/// unchanged. The exception is a door unlocked in the same attempt: keys
/// spent on the lock stay spent and opening is never rolled back, even
/// when the cell behind the door turns out to be a wall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The player changed cells.
    pub moved: bool,
    /// The door opened onto an empty cell; the caller should offer a draft.
    pub needs_draw: bool,
    pub steps_spent: u32,
    pub keys_spent: u32,
    /// Tier of a door unlocked by this attempt, if one was.
    pub opened: Option<LockTier>,
    pub message: Option<String>,
}

impl MoveOutcome {
    fn blocked(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// The manor board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty board of the given dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        let count = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); count],
        }
    }

    /// Whether the position lies on the board.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn slot(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// The cell at `pos`, if it is on the board.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.slot(pos).map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at `pos`.
    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.slot(pos).map(move |i| &mut self.cells[i])
    }

    /// The room placed at `pos`, if any.
    pub fn room_at(&self, pos: Position) -> Option<PlacedRoom> {
        self.cell(pos).and_then(|cell| cell.room)
    }

    /// The door on the `direction` side of `pos`, if it has materialized.
    pub fn door(&self, pos: Position, direction: Direction) -> Option<Door> {
        self.cell(pos).and_then(|cell| cell.doors[direction.index()])
    }

    fn set_door(&mut self, pos: Position, direction: Direction, door: Door) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.doors[direction.index()] = Some(door);
        }
    }

    /// Returns the door on the `direction` side of `pos`, materializing it
    /// on first touch.
    ///
    /// A new interior door samples its lock tier from the row rule and is
    /// written closed on both sides of the boundary. A boundary facing out
    /// of the grid gets a sealed door on the inner side only.
    pub fn ensure_door(&mut self, pos: Position, direction: Direction, rng: &mut StdRng) -> Door {
        if let Some(door) = self.door(pos, direction) {
            return door;
        }
        if !self.in_bounds(pos) {
            return Door::sealed();
        }
        let neighbor = pos.offset(direction);
        if !self.in_bounds(neighbor) {
            let door = Door::sealed();
            self.set_door(pos, direction, door);
            return door;
        }
        let row = pos.y.min(neighbor.y);
        let door = Door::new(tier_for_row(row, self.height, rng));
        debug!("door at {:?} facing {}: {}", pos, direction, door.tier);
        self.set_door(pos, direction, door);
        self.set_door(neighbor, direction.opposite(), door);
        door
    }

    /// Like [`Grid::ensure_door`] but with a caller-chosen tier instead of
    /// a sampled one. Existing doors are returned unchanged.
    pub fn ensure_door_with_tier(
        &mut self,
        pos: Position,
        direction: Direction,
        tier: LockTier,
    ) -> Door {
        if let Some(door) = self.door(pos, direction) {
            return door;
        }
        if !self.in_bounds(pos) {
            return Door::sealed();
        }
        let neighbor = pos.offset(direction);
        if !self.in_bounds(neighbor) {
            let door = Door::sealed();
            self.set_door(pos, direction, door);
            return door;
        }
        let door = Door::new(tier);
        self.set_door(pos, direction, door);
        self.set_door(neighbor, direction.opposite(), door);
        door
    }

    /// Opens the door on both sides of the boundary, keeping its tier.
    /// Does nothing where no door has materialized. Opening is monotonic.
    pub fn open_door(&mut self, pos: Position, direction: Direction) {
        if let Some(cell) = self.cell_mut(pos) {
            if let Some(door) = cell.doors[direction.index()].as_mut() {
                door.open = true;
            }
        }
        let neighbor = pos.offset(direction);
        if let Some(cell) = self.cell_mut(neighbor) {
            if let Some(door) = cell.doors[direction.opposite().index()].as_mut() {
                door.open = true;
            }
        }
    }

    /// Writes an open, unlocked door on both sides of the boundary,
    /// creating it if absent and discarding any previously sampled tier.
    pub fn force_open_door(&mut self, pos: Position, direction: Direction) {
        if !self.in_bounds(pos) {
            return;
        }
        let opened = Door {
            tier: LockTier::None,
            open: true,
        };
        self.set_door(pos, direction, opened);
        let neighbor = pos.offset(direction);
        if self.in_bounds(neighbor) {
            self.set_door(neighbor, direction.opposite(), opened);
        }
    }

    /// Writes a drafted room into an empty cell and materializes its doors.
    ///
    /// Every exit of the shape gets a door. Where the neighboring cell
    /// already holds a room with a matching exit, the shared door is forced
    /// open and unlocked so the connection is traversable from both sides
    /// at once. Doors onto empty cells keep their sampled lock until the
    /// player walks through them.
    pub fn place_room(
        &mut self,
        pos: Position,
        template: &mut RoomTemplate,
        rng: &mut StdRng,
    ) -> ManseResult<()> {
        if !self.in_bounds(pos) {
            return Err(ManseError::InvalidState(format!(
                "cannot place a room off the board at ({}, {})",
                pos.x, pos.y
            )));
        }
        if self.room_at(pos).is_some() {
            return Err(ManseError::InvalidState(format!(
                "cell ({}, {}) already holds a room",
                pos.x, pos.y
            )));
        }

        template.placed = true;
        let placed = PlacedRoom {
            template: template.id,
            shape: template.shape,
        };
        if let Some(cell) = self.cell_mut(pos) {
            cell.room = Some(placed);
        }

        for direction in Direction::all() {
            if !template.shape.has_exit(direction) {
                continue;
            }
            self.ensure_door(pos, direction, rng);
            let neighbor = pos.offset(direction);
            let connects = self
                .room_at(neighbor)
                .map_or(false, |room| room.shape.has_exit(direction.opposite()));
            if connects {
                self.force_open_door(pos, direction);
            }
        }
        Ok(())
    }

    /// Attempts to move the player one cell toward `direction`.
    ///
    /// The checks run in a fixed order: the current room must have an exit
    /// that way, the target must be on the board, the shared door must be
    /// open or unlockable with what the inventory holds. An open door onto
    /// an empty cell reports `needs_draw` instead of moving; an open door
    /// onto a room without a matching exit is a wall. Only a completed
    /// move costs a step.
    pub fn move_player(
        &mut self,
        player: &mut Position,
        inventory: &mut Inventory,
        direction: Direction,
        rng: &mut StdRng,
    ) -> MoveOutcome {
        if let Some(room) = self.room_at(*player) {
            if !room.shape.has_exit(direction) {
                return MoveOutcome::blocked("no door leads that way");
            }
        }

        let target = player.offset(direction);
        if !self.in_bounds(target) {
            return MoveOutcome::blocked("you cannot go that way");
        }

        let door = self.ensure_door(*player, direction, rng);
        let mut keys_spent = 0;
        let mut opened = None;
        if !door.open {
            match inventory.open_door(door.tier) {
                Some(spent) => {
                    self.open_door(*player, direction);
                    keys_spent = spent;
                    opened = Some(door.tier);
                }
                None => {
                    return MoveOutcome::blocked(format!("a {} bars the way", door.tier));
                }
            }
        }

        let target_room = match self.room_at(target) {
            Some(room) => room,
            None => {
                return MoveOutcome {
                    needs_draw: true,
                    keys_spent,
                    opened,
                    ..MoveOutcome::default()
                };
            }
        };

        if !target_room.shape.has_exit(direction.opposite()) {
            return MoveOutcome {
                keys_spent,
                opened,
                message: Some("no door leads that way".to_string()),
                ..MoveOutcome::default()
            };
        }

        *player = target;
        inventory.spend_steps(1);
        MoveOutcome {
            moved: true,
            steps_spent: 1,
            keys_spent,
            opened,
            ..MoveOutcome::default()
        }
    }
}
