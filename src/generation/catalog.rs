//! # Room Catalog
//!
//! The draftable room pool and the weighted three-candidate draw.
//!
//! The catalog owns every template for the life of a session; the grid and
//! the session refer back into it by id. Templates sit in insertion order
//! and draws sample them by rarity weight, so a seeded PRNG pins down every
//! hand. A few rooms inject new templates when drafted; the symbolic names
//! they use are resolved here.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::game::grid::Grid;
use crate::game::items::{ShopKind, SpecialKind};
use crate::game::rooms::{
    CatalogEffect, DrawnEffect, EnterEffect, RoomColor, RoomShape, RoomTemplate,
};
use crate::game::{Direction, Position, RoomId};
use crate::generation::utils::weighted_pick;

/// The pool of room templates a session drafts from.
#[derive(Debug, Clone, Serialize)]
pub struct RoomCatalog {
    templates: Vec<RoomTemplate>,
    #[serde(skip)]
    index: HashMap<RoomId, usize>,
    #[serde(skip)]
    entrance: RoomId,
}

impl RoomCatalog {
    /// Builds the standard catalog, one template per room orientation.
    pub fn standard() -> Self {
        let mut catalog = Self {
            templates: Vec::new(),
            index: HashMap::new(),
            entrance: RoomId::nil(),
        };

        // Purple: bedchambers that restore steps on first entry.
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Bedroom", RoomColor::Purple, shape, 0, 0)
                .with_enter(EnterEffect::RestoreSteps(4))
        });
        catalog.push_shapes(&RoomShape::DEAD_ENDS, |shape| {
            RoomTemplate::new("Master Bedroom", RoomColor::Purple, shape, 1, 3)
                .with_enter(EnterEffect::RestoreSteps(8))
        });
        catalog.push_shapes(&RoomShape::DEAD_ENDS, |shape| {
            RoomTemplate::new("Nursery", RoomColor::Purple, shape, 0, 0)
                .with_enter(EnterEffect::RestoreSteps(2))
        });

        // Blue: utility rooms.
        catalog.push_shapes(&RoomShape::CORRIDORS, |shape| {
            RoomTemplate::new("Locker Room", RoomColor::Blue, shape, 0, 0)
                .with_special(SpecialKind::Locker)
        });
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Pantry", RoomColor::Blue, shape, 0, 0)
                .with_special(SpecialKind::Chest)
        });
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Parlor", RoomColor::Blue, shape, 0, 1)
        });
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Office", RoomColor::Blue, shape, 0, 1).with_embedded_gold(3)
        });
        catalog.push_shapes(&RoomShape::TEES, |shape| {
            RoomTemplate::new("Security", RoomColor::Blue, shape, 1, 2).with_drawn(DrawnEffect {
                key_chance_bonus: 0.10,
                ..DrawnEffect::default()
            })
        });
        catalog.push_shapes(&RoomShape::DEAD_ENDS, |shape| {
            RoomTemplate::new("Vault", RoomColor::Blue, shape, 2, 3).with_embedded_gold(40)
        });
        catalog.push_shapes(&RoomShape::DEAD_ENDS, |shape| {
            RoomTemplate::new("Chamber of Mirrors", RoomColor::Blue, shape, 2, 2)
                .with_catalog(CatalogEffect::Inject(&["treasure_room"]))
        });
        catalog.push_shapes(&RoomShape::TEES, |shape| {
            RoomTemplate::new("Pool", RoomColor::Blue, shape, 1, 1)
                .with_catalog(CatalogEffect::Inject(&["room"]))
        });
        catalog.push_shapes(&RoomShape::CORRIDORS, |shape| {
            RoomTemplate::new("Gallery", RoomColor::Blue, shape, 0, 1).with_drawn(DrawnEffect {
                gems_gained: 1,
                ..DrawnEffect::default()
            })
        });
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Rotunda", RoomColor::Blue, shape, 2, 2)
                .with_catalog(CatalogEffect::Inject(&["cross"]))
        });
        catalog.push_shapes(&RoomShape::TEES, |shape| {
            RoomTemplate::new("Den", RoomColor::Blue, shape, 0, 1).with_drawn(DrawnEffect {
                color_bonus: Some((RoomColor::Blue, 0.3)),
                ..DrawnEffect::default()
            })
        });

        // Green: grounds, all with a garden bounty on first entry.
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Patio", RoomColor::Green, shape, 0, 0)
                .with_enter(EnterEffect::GardenBounty)
                .with_special(SpecialKind::DigSite)
        });
        catalog.push_shapes(&RoomShape::DEAD_ENDS, |shape| {
            RoomTemplate::new("Greenhouse", RoomColor::Green, shape, 1, 0)
                .with_enter(EnterEffect::GardenBounty)
        });
        catalog.push_shapes(
            &[
                RoomShape::CorridorNS,
                RoomShape::CorridorNS,
                RoomShape::CorridorEW,
                RoomShape::CorridorEW,
            ],
            |shape| {
                RoomTemplate::new("Veranda", RoomColor::Green, shape, 0, 2)
                    .with_enter(EnterEffect::GardenBounty)
                    .with_drawn(DrawnEffect {
                        color_bonus: Some((RoomColor::Green, 0.3)),
                        ..DrawnEffect::default()
                    })
            },
        );
        catalog.push_shapes(&RoomShape::TEES, |shape| {
            RoomTemplate::new("Garden", RoomColor::Green, shape, 0, 1)
                .with_enter(EnterEffect::GardenBounty)
                .with_special(SpecialKind::DigSite)
        });

        // Red: service rooms with a sting or a payout.
        catalog.push_shapes(&RoomShape::DEAD_ENDS, |shape| {
            RoomTemplate::new("Furnace", RoomColor::Red, shape, 0, 3).with_drawn(DrawnEffect {
                steps_delta: -3,
                ..DrawnEffect::default()
            })
        });
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Maid's Chamber", RoomColor::Red, shape, 0, 1).with_drawn(
                DrawnEffect {
                    gold_chance_bonus: 0.10,
                    ..DrawnEffect::default()
                },
            )
        });
        catalog.push_shapes(&RoomShape::TEES, |shape| {
            RoomTemplate::new("Chapel", RoomColor::Red, shape, 0, 2).with_dispersion(1)
        });

        // Orange: plain passages.
        catalog.push_shapes(&RoomShape::TEES, |shape| {
            RoomTemplate::new("Hallway", RoomColor::Orange, shape, 0, 0)
        });
        catalog.push(
            RoomTemplate::new("Passageway", RoomColor::Orange, RoomShape::Cross, 0, 1)
                .with_catalog(CatalogEffect::Inject(&["corridor_ns", "corridor_ew"])),
        );
        catalog.push_shapes(&RoomShape::CORRIDORS, |shape| {
            RoomTemplate::new("Corridor", RoomColor::Orange, shape, 0, 0)
        });

        // Yellow: shops.
        catalog.push_shapes(&RoomShape::DEAD_ENDS, |shape| {
            RoomTemplate::new("Locksmith", RoomColor::Yellow, shape, 0, 1)
                .with_shop(ShopKind::Locksmith)
        });
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Commissary", RoomColor::Yellow, shape, 0, 1)
                .with_shop(ShopKind::Commissary)
        });
        catalog.push_shapes(&RoomShape::CORNERS, |shape| {
            RoomTemplate::new("Kitchen", RoomColor::Yellow, shape, 0, 1)
                .with_shop(ShopKind::Kitchen)
        });

        // The entrance hall exists pre-placed and never enters a draw.
        let mut entrance =
            RoomTemplate::new("Entrance Hall", RoomColor::Blue, RoomShape::CornerNE, 0, 0);
        entrance.placed = true;
        catalog.entrance = entrance.id;
        catalog.push(entrance);

        catalog
    }

    fn push(&mut self, template: RoomTemplate) {
        self.index.insert(template.id, self.templates.len());
        self.templates.push(template);
    }

    fn push_shapes(&mut self, shapes: &[RoomShape], build: impl Fn(RoomShape) -> RoomTemplate) {
        for shape in shapes {
            self.push(build(*shape));
        }
    }

    /// The pre-placed entrance hall template.
    pub fn entrance(&self) -> RoomId {
        self.entrance
    }

    /// Looks a template up by id.
    pub fn get(&self, id: RoomId) -> Option<&RoomTemplate> {
        self.index.get(&id).map(|&i| &self.templates[i])
    }

    /// Mutable template lookup, for flipping one-shot flags.
    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut RoomTemplate> {
        self.index.get(&id).map(|&i| &mut self.templates[i])
    }

    /// First template with the given display name, if any.
    pub fn find_by_name(&self, name: &str) -> Option<&RoomTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Every template, in insertion order.
    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Adds a template by symbolic name, resolving a few aliases.
    ///
    /// Idempotent by name: if either the raw name or the resolved display
    /// name already exists in the catalog, nothing is added. Unrecognized
    /// names become plain blue squares so an injection can never fail.
    pub fn add_template(&mut self, name: &str) {
        if self.contains_name(name) {
            return;
        }
        let template = match name.to_lowercase().as_str() {
            "couloir_ns" | "couloir-ns" | "corridor_ns" | "ns" => RoomTemplate::new(
                "Dynamic Corridor NS",
                RoomColor::Orange,
                RoomShape::CorridorNS,
                0,
                0,
            ),
            "couloir_eo" | "couloir-eo" | "corridor_ew" | "eo" | "ew" | "couloir" | "corridor" => {
                RoomTemplate::new(
                    "Dynamic Corridor EW",
                    RoomColor::Orange,
                    RoomShape::CorridorEW,
                    0,
                    0,
                )
            }
            "carre" | "square" | "room" => {
                RoomTemplate::new("Dynamic Room", RoomColor::Blue, RoomShape::Square, 0, 0)
            }
            "croix" | "cross" | "plus" => {
                RoomTemplate::new("Dynamic Cross", RoomColor::Blue, RoomShape::Cross, 0, 0)
            }
            "treasure_room" | "salle_tresor" => {
                RoomTemplate::new("Treasure Room", RoomColor::Blue, RoomShape::Cross, 2, 3)
                    .with_embedded_gold(25)
            }
            _ => RoomTemplate::new(name, RoomColor::Blue, RoomShape::Square, 0, 0),
        };
        if self.contains_name(&template.name) {
            return;
        }
        self.push(template);
    }

    fn contains_name(&self, name: &str) -> bool {
        self.templates.iter().any(|t| t.name == name)
    }

    /// Draws up to three distinct candidates for the given cell.
    ///
    /// Candidates are unplaced templates whose shape fits the cell, sampled
    /// by rarity weight scaled with the accumulated color bonuses. Two
    /// guarantees patch the hand afterwards: at least one zero-cost
    /// candidate whenever the pool has one, and on the bottom row at least
    /// one candidate with a north exit so the manor always opens inward.
    /// An empty result means nothing in the catalog fits.
    pub fn draw_three(
        &self,
        grid: &Grid,
        cell: Position,
        entry_side: Direction,
        color_bonus: &HashMap<RoomColor, f64>,
        rng: &mut StdRng,
    ) -> Vec<RoomId> {
        let pool: Vec<&RoomTemplate> = self
            .templates
            .iter()
            .filter(|t| !t.placed && t.shape.can_be_placed(grid, cell, entry_side))
            .collect();
        if pool.is_empty() {
            return Vec::new();
        }

        let mut working: Vec<usize> = (0..pool.len()).collect();
        let mut working_weights: Vec<f64> = pool
            .iter()
            .map(|t| {
                let bonus = color_bonus.get(&t.color).copied().unwrap_or(0.0);
                t.base_weight() * (1.0 + bonus)
            })
            .collect();

        let mut hand: Vec<usize> = Vec::new();
        while hand.len() < crate::config::DRAW_HAND_SIZE && !working.is_empty() {
            let Some(pick) = weighted_pick(&working_weights, rng) else {
                break;
            };
            hand.push(working.remove(pick));
            working_weights.remove(pick);
        }
        if hand.is_empty() {
            return Vec::new();
        }

        if !hand.iter().any(|&i| pool[i].gem_cost == 0) {
            let free: Vec<usize> = (0..pool.len()).filter(|&i| pool[i].gem_cost == 0).collect();
            if !free.is_empty() {
                hand[0] = free[rng.gen_range(0..free.len())];
            }
        }

        if cell.y == grid.height - 1
            && !hand
                .iter()
                .any(|&i| pool[i].shape.has_exit(Direction::North))
        {
            let north: Vec<usize> = (0..pool.len())
                .filter(|&i| pool[i].shape.has_exit(Direction::North))
                .collect();
            if !north.is_empty() {
                let last = hand.len() - 1;
                hand[last] = north[rng.gen_range(0..north.len())];
            }
        }

        hand.into_iter().map(|i| pool[i].id).collect()
    }
}
