//! # Rooms
//!
//! Room shapes, colors, and the catalog template type.
//!
//! A `RoomTemplate` is a single draftable instance: the catalog owns one per
//! orientation of every room, and the grid refers back to it by id. All
//! behavior hangs off typed effect fields assigned when the catalog is
//! built; nothing dispatches on room names.

use crate::game::grid::Grid;
use crate::game::items::{ShopKind, SpecialKind};
use crate::game::{new_room_id, Direction, Position, RoomId};
use serde::{Deserialize, Serialize};

/// Exit layout of a room, one variant per orientation.
///
/// Square and Cross share the full exit set and differ only in presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomShape {
    CorridorNS,
    CorridorEW,
    DeadEndN,
    DeadEndS,
    DeadEndE,
    DeadEndW,
    CornerNE,
    CornerES,
    CornerSW,
    CornerWN,
    TeeNES,
    TeeESW,
    TeeSWN,
    TeeWNE,
    Cross,
    Square,
}

impl RoomShape {
    /// The four corner orientations, in catalog order.
    pub const CORNERS: [RoomShape; 4] = [
        RoomShape::CornerSW,
        RoomShape::CornerES,
        RoomShape::CornerNE,
        RoomShape::CornerWN,
    ];

    /// The four dead-end orientations, in catalog order.
    pub const DEAD_ENDS: [RoomShape; 4] = [
        RoomShape::DeadEndS,
        RoomShape::DeadEndN,
        RoomShape::DeadEndE,
        RoomShape::DeadEndW,
    ];

    /// The four tee orientations, in catalog order.
    pub const TEES: [RoomShape; 4] = [
        RoomShape::TeeNES,
        RoomShape::TeeESW,
        RoomShape::TeeSWN,
        RoomShape::TeeWNE,
    ];

    /// The two corridor orientations.
    pub const CORRIDORS: [RoomShape; 2] = [RoomShape::CorridorNS, RoomShape::CorridorEW];

    /// Sides of the cell this shape has doors on.
    pub fn exits(self) -> &'static [Direction] {
        use Direction::*;
        match self {
            RoomShape::CorridorNS => &[North, South],
            RoomShape::CorridorEW => &[East, West],
            RoomShape::DeadEndN => &[North],
            RoomShape::DeadEndS => &[South],
            RoomShape::DeadEndE => &[East],
            RoomShape::DeadEndW => &[West],
            RoomShape::CornerNE => &[North, East],
            RoomShape::CornerES => &[East, South],
            RoomShape::CornerSW => &[South, West],
            RoomShape::CornerWN => &[West, North],
            RoomShape::TeeNES => &[North, East, South],
            RoomShape::TeeESW => &[East, South, West],
            RoomShape::TeeSWN => &[South, West, North],
            RoomShape::TeeWNE => &[West, North, East],
            RoomShape::Cross | RoomShape::Square => &[North, South, East, West],
        }
    }

    /// Whether this shape has a door on `direction`.
    ///
    /// # Examples
    ///
    /// ```
    /// use manse::{Direction, RoomShape};
    ///
    /// assert!(RoomShape::CornerNE.has_exit(Direction::North));
    /// assert!(!RoomShape::CornerNE.has_exit(Direction::South));
    /// ```
    pub fn has_exit(self, direction: Direction) -> bool {
        self.exits().contains(&direction)
    }

    /// Compact exit listing for overlays, e.g. "N E S".
    pub fn exit_letters(self) -> String {
        let letters: Vec<&str> = self
            .exits()
            .iter()
            .map(|d| match d {
                Direction::North => "N",
                Direction::South => "S",
                Direction::East => "E",
                Direction::West => "W",
            })
            .collect();
        letters.join(" ")
    }

    /// Whether this shape can be drafted into `cell`, entered through the
    /// door on its `entry_side`.
    ///
    /// The shape needs an exit on the entry side, every exit must point at
    /// a cell on the board, and every neighboring room with an exit facing
    /// `cell` must get a matching exit back. The reverse mismatch is
    /// allowed: an exit may face a neighbor without one, leaving a door
    /// onto a wall.
    pub fn can_be_placed(self, grid: &Grid, cell: Position, entry_side: Direction) -> bool {
        if !self.has_exit(entry_side) {
            return false;
        }
        for exit in self.exits() {
            if !grid.in_bounds(cell.offset(*exit)) {
                return false;
            }
        }
        for direction in Direction::all() {
            if let Some(neighbor) = grid.room_at(cell.offset(direction)) {
                if neighbor.shape.has_exit(direction.opposite()) && !self.has_exit(direction) {
                    return false;
                }
            }
        }
        true
    }
}

/// Catalog color category of a room.
///
/// Yellow is the shop category: entering any yellow room opens its shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomColor {
    Yellow,
    Green,
    Purple,
    Orange,
    Red,
    Blue,
}

/// One-shot reward applied the first time a room is entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnterEffect {
    /// Restores a fixed number of steps.
    RestoreSteps(u32),
    /// Grants a gem plus probabilistic finds, see the session rules.
    GardenBounty,
}

/// Immediate deltas applied when the room is drafted onto the board.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawnEffect {
    /// Step change, negative values drain with the floor at zero.
    pub steps_delta: i32,
    pub gems_gained: u32,
    /// Additive draft-weight bonus for one color.
    pub color_bonus: Option<(RoomColor, f64)>,
    pub key_chance_bonus: f64,
    pub gold_chance_bonus: f64,
    pub item_chance_bonus: f64,
}

/// Catalog mutation fired when the room is drafted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CatalogEffect {
    /// Adds templates by symbolic name, skipping names already present.
    Inject(&'static [&'static str]),
}

/// A draftable room instance owned by the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct RoomTemplate {
    pub id: RoomId,
    pub name: String,
    pub color: RoomColor,
    pub shape: RoomShape,
    pub gem_cost: u32,
    /// 0 common through 3 rare.
    pub rarity: u8,
    /// Gold granted alongside the one-shot entry reward.
    pub embedded_gold: u32,
    pub enter_effect: Option<EnterEffect>,
    pub drawn_effect: Option<DrawnEffect>,
    pub catalog_effect: Option<CatalogEffect>,
    pub special: Option<SpecialKind>,
    pub shop: Option<ShopKind>,
    /// Gold deposited into each occupied neighbor when drafted.
    pub disperses_gold: u32,
    /// Set when drafted onto the board; placed templates never re-enter
    /// the draw pool.
    pub placed: bool,
    /// Guards the one-shot entry reward.
    pub reward_taken: bool,
    /// Guards the special interaction.
    pub special_opened: bool,
}

impl RoomTemplate {
    /// Creates a template with no effects attached.
    pub fn new(name: &str, color: RoomColor, shape: RoomShape, gem_cost: u32, rarity: u8) -> Self {
        Self {
            id: new_room_id(),
            name: name.to_string(),
            color,
            shape,
            gem_cost,
            rarity,
            embedded_gold: 0,
            enter_effect: None,
            drawn_effect: None,
            catalog_effect: None,
            special: None,
            shop: None,
            disperses_gold: 0,
            placed: false,
            reward_taken: false,
            special_opened: false,
        }
    }

    pub fn with_embedded_gold(mut self, gold: u32) -> Self {
        self.embedded_gold = gold;
        self
    }

    pub fn with_enter(mut self, effect: EnterEffect) -> Self {
        self.enter_effect = Some(effect);
        self
    }

    pub fn with_drawn(mut self, effect: DrawnEffect) -> Self {
        self.drawn_effect = Some(effect);
        self
    }

    pub fn with_catalog(mut self, effect: CatalogEffect) -> Self {
        self.catalog_effect = Some(effect);
        self
    }

    pub fn with_special(mut self, kind: SpecialKind) -> Self {
        self.special = Some(kind);
        self
    }

    pub fn with_shop(mut self, kind: ShopKind) -> Self {
        self.shop = Some(kind);
        self
    }

    pub fn with_dispersion(mut self, gold: u32) -> Self {
        self.disperses_gold = gold;
        self
    }

    /// Draft weight before color bonuses.
    pub fn base_weight(&self) -> f64 {
        let idx = (self.rarity as usize).min(crate::config::RARITY_WEIGHTS.len() - 1);
        crate::config::RARITY_WEIGHTS[idx]
    }

    /// The shop this room opens, if it is a shop room.
    ///
    /// Every yellow room opens a shop; rooms without an explicit kind fall
    /// back to general goods.
    pub fn shop_kind(&self) -> Option<ShopKind> {
        self.shop
            .or_else(|| (self.color == RoomColor::Yellow).then_some(ShopKind::Commissary))
    }
}
