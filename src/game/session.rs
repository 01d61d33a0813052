//! # Game Session Module
//!
//! The session state machine coordinating every other game system.
//!
//! A [`GameSession`] owns the grid, the room catalog, the inventory, and the
//! seeded PRNG, and advances through player intents. `apply` resolves one
//! intent into a list of [`GameEvent`]s; statistics are derived from those
//! events and the scene layer forwards `Message` events to the display log.
//! The same seed with the same intent stream replays the same game.

use std::collections::HashMap;

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::doors::LockTier;
use crate::game::grid::Grid;
use crate::game::inventory::Inventory;
use crate::game::items::{
    chest_loot, describe_loot, dig_loot, locker_loot, shop_offers, Consumable, OfferEffect,
    PermanentItem, Price, ShopKind, ShopOffer, SpecialKind,
};
use crate::game::rooms::{CatalogEffect, DrawnEffect, EnterEffect, RoomColor};
use crate::game::{Direction, Position, RoomId};
use crate::generation::catalog::RoomCatalog;
use crate::generation::utils;
use crate::generation::ManorConfig;
use crate::{config, ManseError, ManseResult};

/// Which part of the turn loop the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Walking the manor, opening doors and specials.
    Exploring,
    /// Choosing one of up to three offered blueprints.
    Drawing,
    /// Browsing a shop's offer list.
    Shopping,
    /// The run ended at the exit cell.
    Victory,
    /// Out of steps or out of moves; the end menu is up.
    GameOver,
}

/// How prominently a message should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageImportance {
    Low,
    Normal,
    High,
    Critical,
}

/// A countable resource named in gain/spend events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Steps,
    Gold,
    Gems,
    Keys,
    Dice,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Steps => "steps",
            ResourceKind::Gold => "gold",
            ResourceKind::Gems => "gems",
            ResourceKind::Keys => "keys",
            ResourceKind::Dice => "dice",
        };
        write!(f, "{}", name)
    }
}

/// Events emitted by the session as intents resolve.
///
/// Events are the only channel between rule resolution and everything
/// downstream: statistics accumulate from them and the scene layer picks
/// `Message` events out for the on-screen log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player walked from one cell to another.
    PlayerMoved { from: Position, to: Position },
    /// A closed door was opened (by key, lockpick, or freely).
    DoorOpened {
        cell: Position,
        direction: Direction,
        tier: LockTier,
    },
    /// A draft hand was offered at a frontier cell.
    DraftOffered { cell: Position, count: usize },
    /// The current draft hand was replaced by spending a die.
    DraftRerolled { cell: Position },
    /// A room was built into the grid.
    RoomPlaced { cell: Position, room: RoomId },
    /// The inventory gained a counted resource.
    ResourceGained { resource: ResourceKind, amount: u32 },
    /// The inventory spent a counted resource.
    ResourceSpent { resource: ResourceKind, amount: u32 },
    /// A consumable was eaten, restoring steps.
    ConsumableEaten { item: Consumable, steps: u32 },
    /// A permanent tool joined the inventory.
    PermanentAcquired { item: PermanentItem },
    /// A chest, locker, or dig site was resolved.
    SpecialOpened { kind: SpecialKind, cell: Position },
    /// A shop offer was paid for and applied.
    PurchaseCompleted { label: String },
    /// The session moved between phases.
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Text for the player.
    Message {
        text: String,
        importance: MessageImportance,
    },
}

/// Session statistics tracking the run so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Cells walked into.
    pub steps_taken: u64,
    /// Intents that produced events.
    pub turns_played: u64,
    /// Rooms built into the grid.
    pub rooms_placed: u32,
    /// Locked doors opened (tier above none).
    pub doors_unlocked: u32,
    /// Draft hands offered.
    pub draws_offered: u32,
    /// Draft hands rerolled.
    pub rerolls: u32,
    /// Keys spent on doors and specials.
    pub keys_spent: u32,
    /// Gems spent on blueprints and purchases.
    pub gems_spent: u32,
    /// Gold spent in shops.
    pub gold_spent: u32,
    /// Gold picked up.
    pub gold_collected: u32,
    /// Completed shop purchases.
    pub purchases: u32,
    /// Chests, lockers, and dig sites resolved.
    pub specials_opened: u32,
    /// Consumables eaten.
    pub consumables_eaten: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self {
            steps_taken: 0,
            turns_played: 0,
            rooms_placed: 0,
            doors_unlocked: 0,
            draws_offered: 0,
            rerolls: 0,
            keys_spent: 0,
            gems_spent: 0,
            gold_spent: 0,
            gold_collected: 0,
            purchases: 0,
            specials_opened: 0,
            consumables_eaten: 0,
        }
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerMoved { .. } => {
                self.steps_taken += 1;
            }
            GameEvent::DoorOpened { tier, .. } => {
                if *tier != LockTier::None {
                    self.doors_unlocked += 1;
                }
            }
            GameEvent::DraftOffered { .. } => {
                self.draws_offered += 1;
            }
            GameEvent::DraftRerolled { .. } => {
                self.rerolls += 1;
            }
            GameEvent::RoomPlaced { .. } => {
                self.rooms_placed += 1;
            }
            GameEvent::ResourceGained { resource, amount } => {
                if *resource == ResourceKind::Gold {
                    self.gold_collected += amount;
                }
            }
            GameEvent::ResourceSpent { resource, amount } => match resource {
                ResourceKind::Keys => self.keys_spent += amount,
                ResourceKind::Gems => self.gems_spent += amount,
                ResourceKind::Gold => self.gold_spent += amount,
                _ => {}
            },
            GameEvent::PurchaseCompleted { .. } => {
                self.purchases += 1;
            }
            GameEvent::SpecialOpened { .. } => {
                self.specials_opened += 1;
            }
            GameEvent::ConsumableEaten { .. } => {
                self.consumables_eaten += 1;
            }
            _ => {}
        }
    }
}

impl Default for GameStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// An offered draft hand awaiting a decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawContext {
    /// The empty cell the blueprints would fill.
    pub cell: Position,
    /// The side of that cell holding the opened door.
    pub entry: Direction,
    /// Offered template ids, at most three.
    pub candidates: Vec<RoomId>,
    /// Index of the highlighted candidate.
    pub selected: usize,
}

/// An open shop's offer list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopContext {
    pub kind: ShopKind,
    pub offers: Vec<ShopOffer>,
    pub selected: usize,
}

/// An unopened special in the player's current room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialContext {
    pub kind: SpecialKind,
    pub cell: Position,
    pub template: RoomId,
}

/// Resources waiting in a cell for the next entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropBundle {
    pub gold: u32,
    pub gems: u32,
    pub keys: u32,
}

/// The end-menu choice on the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndChoice {
    Replay,
    Quit,
}

/// The closed vocabulary of things a player can ask the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerIntent {
    Move(Direction),
    Confirm,
    Cancel,
    Reroll,
    OpenSpecial,
    Dig,
    ShopNavigate(i32),
    Quit,
}

/// A full game in progress.
///
/// # Examples
///
/// ```
/// use manse::{GamePhase, GameSession, ManorConfig};
///
/// let session = GameSession::new(&ManorConfig::new(7)).expect("valid config");
/// assert_eq!(session.phase, GamePhase::Exploring);
/// assert_eq!(session.turn, 0);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    /// The manor grid.
    pub grid: Grid,
    /// The blueprint pool.
    pub catalog: RoomCatalog,
    /// The player's resources and tools.
    pub inventory: Inventory,
    /// The player's cell.
    pub player: Position,
    /// Current phase of the turn loop.
    pub phase: GamePhase,
    /// The offered draft hand, while drawing.
    pub draw: Option<DrawContext>,
    /// The open shop, while shopping.
    pub shop: Option<ShopContext>,
    /// The unopened special in the player's room, if any.
    pub pending_special: Option<SpecialContext>,
    /// Resources deposited into cells, granted on next entry.
    deferred_drops: HashMap<Position, DropBundle>,
    /// Accumulated draw-weight bonuses per room color.
    color_bonus: HashMap<RoomColor, f64>,
    /// Intents applied so far (only those that produced events).
    pub turn: u64,
    /// Statistics for the run.
    pub statistics: GameStatistics,
    /// The seed this session was built from.
    pub rng_seed: u64,
    /// The session PRNG; every roll in the game goes through it.
    rng: StdRng,
    /// Highlighted choice on the end menu.
    pub end_selection: EndChoice,
    /// Set when the player asked to leave the program.
    pub quit_requested: bool,
    /// The configuration used to build (and rebuild) the session.
    config: ManorConfig,
}

impl GameSession {
    /// Builds a fresh session: empty grid, standard catalog, the entrance
    /// hall placed at the bottom with its north door forced open.
    pub fn new(config: &ManorConfig) -> ManseResult<Self> {
        config.validate()?;
        let mut rng = utils::create_rng(config);
        let mut grid = Grid::new(config.width, config.height);
        let mut catalog = RoomCatalog::standard();

        let entrance_cell = config.entrance_cell();
        let entrance_id = catalog.entrance();
        let entrance = catalog
            .get_mut(entrance_id)
            .ok_or_else(|| ManseError::InvalidState("entrance template missing".to_string()))?;
        grid.place_room(entrance_cell, entrance, &mut rng)?;
        grid.force_open_door(entrance_cell, Direction::North);

        debug!(
            "session start: seed {} entrance {:?}",
            config.seed, entrance_cell
        );

        Ok(Self {
            grid,
            catalog,
            inventory: Inventory::new(config.starting_steps, config.starting_gems),
            player: entrance_cell,
            phase: GamePhase::Exploring,
            draw: None,
            shop: None,
            pending_special: None,
            deferred_drops: HashMap::new(),
            color_bonus: HashMap::new(),
            turn: 0,
            statistics: GameStatistics::new(),
            rng_seed: config.seed,
            rng,
            end_selection: EndChoice::Replay,
            quit_requested: false,
            config: config.clone(),
        })
    }

    /// The cell the player must reach to win.
    pub fn exit_cell(&self) -> Position {
        self.config.exit_cell()
    }

    /// The configuration this session was built from.
    pub fn config(&self) -> &ManorConfig {
        &self.config
    }

    /// Whether the session reached a terminal phase.
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, GamePhase::Victory | GamePhase::GameOver)
    }

    /// Resolves one intent into the events it caused.
    ///
    /// Intents not meaningful in the current phase resolve to an empty
    /// event list and leave the session untouched. The turn counter
    /// advances only for intents that produced events, and never for the
    /// end-menu.
    pub fn apply(&mut self, intent: PlayerIntent) -> Vec<GameEvent> {
        if intent == PlayerIntent::Quit {
            self.quit_requested = true;
            return Vec::new();
        }

        let was_terminal = self.is_ended();
        let events = match self.phase {
            GamePhase::Exploring => self.apply_exploring(intent),
            GamePhase::Drawing => self.apply_drawing(intent),
            GamePhase::Shopping => self.apply_shopping(intent),
            GamePhase::GameOver => self.apply_game_over(intent),
            GamePhase::Victory => Vec::new(),
        };

        for event in &events {
            self.statistics.update_from_event(event);
        }
        if !events.is_empty() && !was_terminal {
            self.turn += 1;
            self.statistics.turns_played = self.turn;
        }
        events
    }

    fn apply_exploring(&mut self, intent: PlayerIntent) -> Vec<GameEvent> {
        match intent {
            PlayerIntent::Move(direction) => self.resolve_move(direction),
            PlayerIntent::OpenSpecial => self.resolve_special(false),
            PlayerIntent::Dig => self.resolve_special(true),
            _ => Vec::new(),
        }
    }

    /// Resolves a move attempt, which may open doors, trigger a draft, or
    /// walk the player into the next room.
    fn resolve_move(&mut self, direction: Direction) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let from = self.player;
        let outcome =
            self.grid
                .move_player(&mut self.player, &mut self.inventory, direction, &mut self.rng);

        if let Some(tier) = outcome.opened {
            events.push(GameEvent::DoorOpened {
                cell: from,
                direction,
                tier,
            });
        }
        if outcome.keys_spent > 0 {
            events.push(GameEvent::ResourceSpent {
                resource: ResourceKind::Keys,
                amount: outcome.keys_spent,
            });
        }
        if let Some(text) = outcome.message {
            events.push(GameEvent::Message {
                text,
                importance: MessageImportance::Normal,
            });
        }

        if outcome.needs_draw {
            let target = from.offset(direction);
            let entry = direction.opposite();
            let hand =
                self.catalog
                    .draw_three(&self.grid, target, entry, &self.color_bonus, &mut self.rng);
            debug!("draft at {:?}: {} candidates", target, hand.len());
            if hand.is_empty() {
                events.push(GameEvent::Message {
                    text: "none of the remaining blueprints fit here".to_string(),
                    importance: MessageImportance::High,
                });
            } else {
                events.push(GameEvent::DraftOffered {
                    cell: target,
                    count: hand.len(),
                });
                self.draw = Some(DrawContext {
                    cell: target,
                    entry,
                    candidates: hand,
                    selected: 0,
                });
                events.push(self.set_phase(GamePhase::Drawing));
            }
            return events;
        }

        if outcome.moved {
            self.pending_special = None;
            events.push(GameEvent::PlayerMoved {
                from,
                to: self.player,
            });
            events.push(GameEvent::ResourceSpent {
                resource: ResourceKind::Steps,
                amount: outcome.steps_spent,
            });
            self.on_enter(&mut events);
            self.evaluate_end(&mut events);
        }
        events
    }

    /// Room-entry resolution: deferred drops, then the shop redirect or the
    /// one-shot reward, then special arming.
    fn on_enter(&mut self, events: &mut Vec<GameEvent>) {
        let cell = self.player;

        if let Some(bundle) = self.deferred_drops.remove(&cell) {
            let mut parts = Vec::new();
            if bundle.gold > 0 {
                self.inventory.gain_gold(bundle.gold);
                events.push(GameEvent::ResourceGained {
                    resource: ResourceKind::Gold,
                    amount: bundle.gold,
                });
                parts.push(format!("{} gold", bundle.gold));
            }
            if bundle.gems > 0 {
                self.inventory.gain_gems(bundle.gems);
                events.push(GameEvent::ResourceGained {
                    resource: ResourceKind::Gems,
                    amount: bundle.gems,
                });
                parts.push(format!("{} gems", bundle.gems));
            }
            if bundle.keys > 0 {
                self.inventory.gain_keys(bundle.keys);
                events.push(GameEvent::ResourceGained {
                    resource: ResourceKind::Keys,
                    amount: bundle.keys,
                });
                parts.push(format!("{} keys", bundle.keys));
            }
            if !parts.is_empty() {
                events.push(GameEvent::Message {
                    text: format!("left here earlier: {}", parts.join(", ")),
                    importance: MessageImportance::Normal,
                });
            }
        }

        let Some(room) = self.grid.room_at(cell) else {
            return;
        };
        let (color, shop_kind, special, reward_taken, special_opened, embedded_gold, enter_effect) = {
            let Some(template) = self.catalog.get(room.template) else {
                error!("placed room {:?} missing from catalog", room.template);
                return;
            };
            (
                template.color,
                template.shop_kind(),
                template.special,
                template.reward_taken,
                template.special_opened,
                template.embedded_gold,
                template.enter_effect,
            )
        };

        if color == RoomColor::Yellow {
            if let Some(kind) = shop_kind {
                self.open_shop(kind, events);
            }
            return;
        }

        if !reward_taken {
            if let Some(template) = self.catalog.get_mut(room.template) {
                template.reward_taken = true;
            }
            if embedded_gold > 0 {
                self.inventory.gain_gold(embedded_gold);
                events.push(GameEvent::ResourceGained {
                    resource: ResourceKind::Gold,
                    amount: embedded_gold,
                });
                events.push(GameEvent::Message {
                    text: format!("you find {} gold", embedded_gold),
                    importance: MessageImportance::Normal,
                });
            }
            match enter_effect {
                Some(EnterEffect::RestoreSteps(amount)) => {
                    self.inventory.gain_steps(amount);
                    events.push(GameEvent::ResourceGained {
                        resource: ResourceKind::Steps,
                        amount,
                    });
                    events.push(GameEvent::Message {
                        text: format!("you rest and recover {} steps", amount),
                        importance: MessageImportance::Normal,
                    });
                }
                Some(EnterEffect::GardenBounty) => self.garden_bounty(events),
                None => {}
            }
            if utils::roll(self.inventory.key_chance, &mut self.rng) {
                self.inventory.gain_keys(1);
                events.push(GameEvent::ResourceGained {
                    resource: ResourceKind::Keys,
                    amount: 1,
                });
                events.push(GameEvent::Message {
                    text: "you spot a spare key".to_string(),
                    importance: MessageImportance::Normal,
                });
            }
            if utils::roll(self.inventory.gold_chance, &mut self.rng) {
                let (lo, hi) = config::FOUND_GOLD;
                let amount = self.rng.gen_range(lo..=hi);
                self.inventory.gain_gold(amount);
                events.push(GameEvent::ResourceGained {
                    resource: ResourceKind::Gold,
                    amount,
                });
                events.push(GameEvent::Message {
                    text: format!("you find {} gold tucked away", amount),
                    importance: MessageImportance::Normal,
                });
            }
        }

        if let Some(kind) = special {
            if !special_opened {
                self.pending_special = Some(SpecialContext {
                    kind,
                    cell,
                    template: room.template,
                });
                events.push(GameEvent::Message {
                    text: format!("there is a {} here", kind.name()),
                    importance: MessageImportance::Low,
                });
            }
        }
    }

    /// The garden payout: a gem, and rolls for a snack and a tool.
    fn garden_bounty(&mut self, events: &mut Vec<GameEvent>) {
        self.inventory.gain_gems(1);
        events.push(GameEvent::ResourceGained {
            resource: ResourceKind::Gems,
            amount: 1,
        });
        events.push(GameEvent::Message {
            text: "a gem glitters among the leaves".to_string(),
            importance: MessageImportance::Normal,
        });

        let item_chance = self.inventory.item_chance;
        if utils::roll(config::GARDEN_CONSUMABLE_CHANCE + item_chance, &mut self.rng) {
            let item = Consumable::ALL[self.rng.gen_range(0..Consumable::ALL.len())];
            let steps = self.inventory.eat(item);
            events.push(GameEvent::ConsumableEaten { item, steps });
            events.push(GameEvent::Message {
                text: format!("you pick a {} and eat it", item.name()),
                importance: MessageImportance::Normal,
            });
        }
        if utils::roll(config::GARDEN_PERMANENT_CHANCE + item_chance, &mut self.rng) {
            let unowned: Vec<PermanentItem> = PermanentItem::ALL
                .iter()
                .copied()
                .filter(|item| !self.inventory.has_permanent(*item))
                .collect();
            if !unowned.is_empty() {
                let item = unowned[self.rng.gen_range(0..unowned.len())];
                self.inventory.add_permanent(item);
                events.push(GameEvent::PermanentAcquired { item });
                events.push(GameEvent::Message {
                    text: format!("you unearth a {}", item.name()),
                    importance: MessageImportance::High,
                });
            }
        }
    }

    fn open_shop(&mut self, kind: ShopKind, events: &mut Vec<GameEvent>) {
        let offers = shop_offers(kind, &self.inventory);
        events.push(GameEvent::Message {
            text: format!("welcome to the {}", kind.name()),
            importance: MessageImportance::Normal,
        });
        self.shop = Some(ShopContext {
            kind,
            offers,
            selected: 0,
        });
        events.push(self.set_phase(GamePhase::Shopping));
    }

    fn apply_drawing(&mut self, intent: PlayerIntent) -> Vec<GameEvent> {
        match intent {
            PlayerIntent::Move(Direction::East) => self.cycle_draw_selection(1),
            PlayerIntent::Move(Direction::West) => self.cycle_draw_selection(-1),
            PlayerIntent::ShopNavigate(delta) => self.cycle_draw_selection(delta),
            PlayerIntent::Confirm => self.confirm_draw(),
            PlayerIntent::Reroll => self.reroll_draw(),
            PlayerIntent::Cancel => self.cancel_draw(),
            _ => Vec::new(),
        }
    }

    fn cycle_draw_selection(&mut self, delta: i32) -> Vec<GameEvent> {
        if let Some(draw) = self.draw.as_mut() {
            let len = draw.candidates.len() as i32;
            if len > 0 {
                draw.selected = (draw.selected as i32 + delta).rem_euclid(len) as usize;
            }
        }
        Vec::new()
    }

    /// Pays for and places the selected blueprint, firing its placement
    /// effects, then returns to exploring.
    fn confirm_draw(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(draw) = self.draw.clone() else {
            error!("confirm with no draft in progress");
            events.push(self.set_phase(GamePhase::Exploring));
            return events;
        };
        let Some(&id) = draw.candidates.get(draw.selected) else {
            error!("draft selection out of range");
            self.draw = None;
            events.push(self.set_phase(GamePhase::Exploring));
            return events;
        };
        let (gem_cost, name) = {
            let Some(template) = self.catalog.get(id) else {
                error!("drafted template {:?} missing from catalog", id);
                self.draw = None;
                events.push(self.set_phase(GamePhase::Exploring));
                return events;
            };
            (template.gem_cost, template.name.clone())
        };

        if !self.inventory.spend_gems(gem_cost) {
            events.push(GameEvent::Message {
                text: format!("the {} costs {}", name, Price::Gems(gem_cost)),
                importance: MessageImportance::High,
            });
            return events;
        }
        if gem_cost > 0 {
            events.push(GameEvent::ResourceSpent {
                resource: ResourceKind::Gems,
                amount: gem_cost,
            });
        }

        let placed = match self.catalog.get_mut(id) {
            Some(template) => self.grid.place_room(draw.cell, template, &mut self.rng),
            None => Err(ManseError::InvalidState("template vanished".to_string())),
        };
        if let Err(err) = placed {
            error!("placement rejected: {}", err);
            events.push(GameEvent::Message {
                text: "the blueprint cannot be built here".to_string(),
                importance: MessageImportance::Critical,
            });
            self.draw = None;
            events.push(self.set_phase(GamePhase::Exploring));
            return events;
        }

        events.push(GameEvent::RoomPlaced {
            cell: draw.cell,
            room: id,
        });
        events.push(GameEvent::Message {
            text: format!("the {} is added to the manor", name),
            importance: MessageImportance::Normal,
        });

        let (drawn_effect, catalog_effect, disperses_gold) = {
            let template = self.catalog.get(id).map(|t| (t.drawn_effect, t.catalog_effect, t.disperses_gold));
            match template {
                Some(parts) => parts,
                None => (None, None, 0),
            }
        };
        if let Some(effect) = drawn_effect {
            self.apply_drawn_effect(effect, &mut events);
        }
        if let Some(CatalogEffect::Inject(names)) = catalog_effect {
            for symbolic in names {
                self.catalog.add_template(symbolic);
            }
            events.push(GameEvent::Message {
                text: "new blueprints join the pool".to_string(),
                importance: MessageImportance::Low,
            });
        }
        if disperses_gold > 0 {
            self.disperse_gold(draw.cell, disperses_gold);
            events.push(GameEvent::Message {
                text: "coins scatter into the neighboring rooms".to_string(),
                importance: MessageImportance::Low,
            });
        }

        self.draw = None;
        events.push(self.set_phase(GamePhase::Exploring));
        self.evaluate_end(&mut events);
        events
    }

    fn apply_drawn_effect(&mut self, effect: DrawnEffect, events: &mut Vec<GameEvent>) {
        if effect.steps_delta > 0 {
            let amount = effect.steps_delta as u32;
            self.inventory.gain_steps(amount);
            events.push(GameEvent::ResourceGained {
                resource: ResourceKind::Steps,
                amount,
            });
        } else if effect.steps_delta < 0 {
            let asked = effect.steps_delta.unsigned_abs();
            let spent = asked.min(self.inventory.steps);
            self.inventory.spend_steps(asked);
            events.push(GameEvent::ResourceSpent {
                resource: ResourceKind::Steps,
                amount: spent,
            });
            events.push(GameEvent::Message {
                text: format!("the work drains {} steps", spent),
                importance: MessageImportance::Normal,
            });
        }
        if effect.gems_gained > 0 {
            self.inventory.gain_gems(effect.gems_gained);
            events.push(GameEvent::ResourceGained {
                resource: ResourceKind::Gems,
                amount: effect.gems_gained,
            });
            events.push(GameEvent::Message {
                text: "a gem comes with this room".to_string(),
                importance: MessageImportance::Normal,
            });
        }
        if let Some((color, bonus)) = effect.color_bonus {
            *self.color_bonus.entry(color).or_insert(0.0) += bonus;
            events.push(GameEvent::Message {
                text: "similar rooms will turn up more often".to_string(),
                importance: MessageImportance::Low,
            });
        }
        if effect.key_chance_bonus > 0.0 {
            self.inventory.key_chance += effect.key_chance_bonus;
            events.push(GameEvent::Message {
                text: "keys will turn up more often".to_string(),
                importance: MessageImportance::Low,
            });
        }
        if effect.gold_chance_bonus > 0.0 {
            self.inventory.gold_chance += effect.gold_chance_bonus;
            events.push(GameEvent::Message {
                text: "gold will turn up more often".to_string(),
                importance: MessageImportance::Low,
            });
        }
        if effect.item_chance_bonus > 0.0 {
            self.inventory.item_chance += effect.item_chance_bonus;
            events.push(GameEvent::Message {
                text: "items will turn up more often".to_string(),
                importance: MessageImportance::Low,
            });
        }
    }

    /// Deposits gold into every occupied neighbor's pending pickup bundle.
    fn disperse_gold(&mut self, cell: Position, amount: u32) {
        for neighbor in cell.cardinal_adjacent_positions() {
            if self.grid.in_bounds(neighbor) && self.grid.room_at(neighbor).is_some() {
                self.deferred_drops.entry(neighbor).or_default().gold += amount;
            }
        }
    }

    fn reroll_draw(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(draw) = self.draw.as_ref() else {
            error!("reroll with no draft in progress");
            events.push(self.set_phase(GamePhase::Exploring));
            return events;
        };
        let (cell, entry) = (draw.cell, draw.entry);

        if !self.inventory.spend_die() {
            events.push(GameEvent::Message {
                text: "you have no dice left".to_string(),
                importance: MessageImportance::High,
            });
            return events;
        }
        events.push(GameEvent::ResourceSpent {
            resource: ResourceKind::Dice,
            amount: 1,
        });

        let hand =
            self.catalog
                .draw_three(&self.grid, cell, entry, &self.color_bonus, &mut self.rng);
        if hand.is_empty() {
            self.draw = None;
            events.push(GameEvent::Message {
                text: "none of the remaining blueprints fit here".to_string(),
                importance: MessageImportance::High,
            });
            events.push(self.set_phase(GamePhase::Exploring));
        } else {
            self.draw = Some(DrawContext {
                cell,
                entry,
                candidates: hand,
                selected: 0,
            });
            events.push(GameEvent::DraftRerolled { cell });
        }
        events
    }

    fn cancel_draw(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.draw.take().is_some() {
            events.push(GameEvent::Message {
                text: "you set the blueprints aside".to_string(),
                importance: MessageImportance::Low,
            });
        } else {
            error!("cancel with no draft in progress");
        }
        events.push(self.set_phase(GamePhase::Exploring));
        events
    }

    fn apply_shopping(&mut self, intent: PlayerIntent) -> Vec<GameEvent> {
        match intent {
            PlayerIntent::ShopNavigate(delta) => self.cycle_shop_selection(delta),
            PlayerIntent::Move(Direction::East) => self.cycle_shop_selection(1),
            PlayerIntent::Move(Direction::West) => self.cycle_shop_selection(-1),
            PlayerIntent::Confirm => self.confirm_purchase(),
            PlayerIntent::Cancel => {
                let mut events = Vec::new();
                if self.shop.take().is_some() {
                    events.push(GameEvent::Message {
                        text: "you leave the shop".to_string(),
                        importance: MessageImportance::Low,
                    });
                }
                events.push(self.set_phase(GamePhase::Exploring));
                events
            }
            _ => Vec::new(),
        }
    }

    fn cycle_shop_selection(&mut self, delta: i32) -> Vec<GameEvent> {
        if let Some(shop) = self.shop.as_mut() {
            let len = shop.offers.len() as i32;
            if len > 0 {
                shop.selected = (shop.selected as i32 + delta).rem_euclid(len) as usize;
            }
        }
        Vec::new()
    }

    fn confirm_purchase(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(shop) = self.shop.as_ref() else {
            error!("purchase with no shop open");
            events.push(self.set_phase(GamePhase::Exploring));
            return events;
        };
        let Some(offer) = shop.offers.get(shop.selected).copied() else {
            return events;
        };

        let paid = match offer.price {
            Price::Gold(amount) => self.inventory.spend_gold(amount),
            Price::Gems(amount) => self.inventory.spend_gems(amount),
        };
        if !paid {
            events.push(GameEvent::Message {
                text: format!("you cannot afford the {}", offer.label),
                importance: MessageImportance::High,
            });
            return events;
        }
        match offer.price {
            Price::Gold(amount) => events.push(GameEvent::ResourceSpent {
                resource: ResourceKind::Gold,
                amount,
            }),
            Price::Gems(amount) => {
                if amount > 0 {
                    events.push(GameEvent::ResourceSpent {
                        resource: ResourceKind::Gems,
                        amount,
                    });
                }
            }
        }

        match offer.effect {
            OfferEffect::GrantKeys(amount) => {
                self.inventory.gain_keys(amount);
                events.push(GameEvent::ResourceGained {
                    resource: ResourceKind::Keys,
                    amount,
                });
            }
            OfferEffect::GrantDice(amount) => {
                self.inventory.gain_dice(amount);
                events.push(GameEvent::ResourceGained {
                    resource: ResourceKind::Dice,
                    amount,
                });
            }
            OfferEffect::GrantConsumable(item) => {
                let steps = self.inventory.eat(item);
                events.push(GameEvent::ConsumableEaten { item, steps });
            }
            OfferEffect::GrantPermanent(item) => {
                self.inventory.add_permanent(item);
                events.push(GameEvent::PermanentAcquired { item });
            }
        }
        events.push(GameEvent::PurchaseCompleted {
            label: offer.label.to_string(),
        });
        events.push(GameEvent::Message {
            text: format!("purchased {}", offer.label),
            importance: MessageImportance::Normal,
        });

        self.shop = None;
        events.push(self.set_phase(GamePhase::Exploring));
        self.evaluate_end(&mut events);
        events
    }

    /// Resolves the pending special. `dig_intent` distinguishes the dig
    /// action from the open action; the wrong one only reports a message.
    fn resolve_special(&mut self, dig_intent: bool) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(context) = self.pending_special else {
            let text = if dig_intent {
                "there is nothing to dig here"
            } else {
                "there is nothing to open here"
            };
            events.push(GameEvent::Message {
                text: text.to_string(),
                importance: MessageImportance::Low,
            });
            return events;
        };

        let wants_dig = context.kind == SpecialKind::DigSite;
        if dig_intent != wants_dig {
            let text = if wants_dig {
                "you need to dig here".to_string()
            } else {
                "there is nothing to dig here".to_string()
            };
            events.push(GameEvent::Message {
                text,
                importance: MessageImportance::Low,
            });
            return events;
        }

        let opened: Option<u32> = match context.kind {
            SpecialKind::Chest => self.inventory.open_chest(),
            SpecialKind::Locker => self.inventory.open_locker(),
            SpecialKind::DigSite => {
                if self.inventory.can_dig() {
                    Some(0)
                } else {
                    None
                }
            }
        };
        let Some(keys_spent) = opened else {
            let text = match context.kind {
                SpecialKind::Chest => "the chest is locked. you need a key or the hammer",
                SpecialKind::Locker => "the locker is locked. you need a key",
                SpecialKind::DigSite => "you need the shovel to dig here",
            };
            events.push(GameEvent::Message {
                text: text.to_string(),
                importance: MessageImportance::High,
            });
            return events;
        };
        if keys_spent > 0 {
            events.push(GameEvent::ResourceSpent {
                resource: ResourceKind::Keys,
                amount: keys_spent,
            });
        }

        let loot = match context.kind {
            SpecialKind::Chest => chest_loot(&mut self.rng),
            SpecialKind::Locker => locker_loot(&mut self.rng),
            SpecialKind::DigSite => dig_loot(&mut self.rng),
        };
        for item in &loot {
            let steps = self.inventory.eat(*item);
            events.push(GameEvent::ConsumableEaten { item: *item, steps });
        }

        if let Some(template) = self.catalog.get_mut(context.template) {
            template.special_opened = true;
        }
        self.pending_special = None;
        events.push(GameEvent::SpecialOpened {
            kind: context.kind,
            cell: context.cell,
        });

        let found = describe_loot(&loot);
        let text = match (context.kind, found.is_empty()) {
            (SpecialKind::DigSite, true) => "nothing but dirt".to_string(),
            (SpecialKind::DigSite, false) => format!("dug up: {}", found),
            (kind, true) => format!("the {} is empty", kind.name()),
            (kind, false) => format!("inside the {}: {}", kind.name(), found),
        };
        events.push(GameEvent::Message {
            text,
            importance: MessageImportance::Normal,
        });

        self.evaluate_end(&mut events);
        events
    }

    fn apply_game_over(&mut self, intent: PlayerIntent) -> Vec<GameEvent> {
        match intent {
            PlayerIntent::Move(Direction::East)
            | PlayerIntent::Move(Direction::West)
            | PlayerIntent::ShopNavigate(_) => {
                self.end_selection = match self.end_selection {
                    EndChoice::Replay => EndChoice::Quit,
                    EndChoice::Quit => EndChoice::Replay,
                };
                Vec::new()
            }
            PlayerIntent::Confirm => match self.end_selection {
                EndChoice::Replay => self.restart(),
                EndChoice::Quit => {
                    self.quit_requested = true;
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    /// Rebuilds the whole session with a fresh seed drawn from the session
    /// PRNG, keeping the rest of the configuration.
    fn restart(&mut self) -> Vec<GameEvent> {
        let seed = self.rng.gen::<u64>();
        let mut config = self.config.clone();
        config.seed = seed;
        match GameSession::new(&config) {
            Ok(fresh) => {
                info!("restarting with seed {}", seed);
                let from = self.phase;
                *self = fresh;
                vec![
                    GameEvent::PhaseChanged {
                        from,
                        to: GamePhase::Exploring,
                    },
                    GameEvent::Message {
                        text: "the manor rearranges itself".to_string(),
                        importance: MessageImportance::Normal,
                    },
                ]
            }
            Err(err) => {
                error!("failed to restart: {}", err);
                vec![GameEvent::Message {
                    text: "the manor refuses to rebuild itself".to_string(),
                    importance: MessageImportance::Critical,
                }]
            }
        }
    }

    /// End-condition check, run after moves, placements, purchases, and
    /// specials. Victory takes precedence over game over.
    fn evaluate_end(&mut self, events: &mut Vec<GameEvent>) {
        if self.is_ended() {
            return;
        }
        if self.player == self.config.exit_cell() {
            events.push(GameEvent::Message {
                text: "you push open the last door and step into daylight".to_string(),
                importance: MessageImportance::Critical,
            });
            events.push(self.set_phase(GamePhase::Victory));
            return;
        }
        if self.inventory.steps == 0 {
            events.push(GameEvent::Message {
                text: "you are out of steps".to_string(),
                importance: MessageImportance::Critical,
            });
            self.shop = None;
            self.pending_special = None;
            events.push(self.set_phase(GamePhase::GameOver));
            return;
        }
        if !self.any_legal_move() {
            events.push(GameEvent::Message {
                text: "every way forward is sealed".to_string(),
                importance: MessageImportance::Critical,
            });
            self.shop = None;
            self.pending_special = None;
            events.push(self.set_phase(GamePhase::GameOver));
        }
    }

    /// Whether any cardinal direction still yields a door the player can
    /// open or a cell the player can walk into. An unmaterialized door
    /// counts as potentially openable; an open door into an occupied cell
    /// only counts when the far room has a facing exit.
    fn any_legal_move(&self) -> bool {
        let Some(room) = self.grid.room_at(self.player) else {
            return false;
        };
        for direction in Direction::all() {
            if !room.shape.has_exit(direction) {
                continue;
            }
            let target = self.player.offset(direction);
            if !self.grid.in_bounds(target) {
                continue;
            }
            match self.grid.door(self.player, direction) {
                None => return true,
                Some(door) if !door.open => {
                    if self.inventory.can_open_door(door.tier) {
                        return true;
                    }
                }
                Some(_) => match self.grid.room_at(target) {
                    None => return true,
                    Some(neighbor) => {
                        if neighbor.shape.has_exit(direction.opposite()) {
                            return true;
                        }
                    }
                },
            }
        }
        false
    }

    fn set_phase(&mut self, to: GamePhase) -> GameEvent {
        let from = self.phase;
        self.phase = to;
        debug!("phase {:?} -> {:?}", from, to);
        GameEvent::PhaseChanged { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rooms::RoomShape;

    fn session() -> GameSession {
        GameSession::new(&ManorConfig::new(5)).expect("config is valid")
    }

    /// Places the first unplaced template with the given name and shape at
    /// `cell`, wiring doors to matching neighbors, and returns its id.
    fn place_by_name(
        session: &mut GameSession,
        name: &str,
        shape: RoomShape,
        cell: Position,
    ) -> RoomId {
        let id = session
            .catalog
            .templates()
            .iter()
            .find(|t| t.name == name && t.shape == shape && !t.placed)
            .map(|t| t.id)
            .expect("template exists in the standard catalog");
        let template = session.catalog.get_mut(id).expect("id resolves");
        session
            .grid
            .place_room(cell, template, &mut session.rng)
            .expect("cell is free");
        id
    }

    fn free_candidate_index(session: &GameSession) -> usize {
        let draw = session.draw.as_ref().expect("a draft is up");
        draw.candidates
            .iter()
            .position(|id| session.catalog.get(*id).map(|t| t.gem_cost) == Some(0))
            .expect("every hand carries a free blueprint")
    }

    #[test]
    fn test_new_session_start_state() {
        let session = session();
        assert_eq!(session.player, Position::new(2, 8));
        assert_eq!(session.phase, GamePhase::Exploring);
        assert_eq!(session.turn, 0);
        assert_eq!(session.inventory.steps, 70);
        assert_eq!(session.inventory.gems, 2);
        assert_eq!(session.inventory.gold, 0);
        assert_eq!(session.exit_cell(), Position::new(2, 0));

        let entrance = session
            .grid
            .room_at(Position::new(2, 8))
            .expect("entrance placed");
        assert_eq!(entrance.shape, RoomShape::CornerNE);
        let north = session
            .grid
            .door(Position::new(2, 8), Direction::North)
            .expect("north door exists");
        assert!(north.open);
    }

    #[test]
    fn test_move_north_from_entrance_offers_draft() {
        let mut session = session();
        let events = session.apply(PlayerIntent::Move(Direction::North));

        assert_eq!(session.phase, GamePhase::Drawing);
        let draw = session.draw.as_ref().expect("draft context set");
        assert_eq!(draw.cell, Position::new(2, 7));
        assert_eq!(draw.entry, Direction::South);
        assert!(!draw.candidates.is_empty() && draw.candidates.len() <= 3);
        assert_eq!(draw.selected, 0);

        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::DraftOffered { cell, .. } if *cell == Position::new(2, 7))));
        // The player has not moved and paid nothing.
        assert_eq!(session.player, Position::new(2, 8));
        assert_eq!(session.inventory.steps, 70);
        assert_eq!(session.statistics.draws_offered, 1);
    }

    #[test]
    fn test_move_without_exit_is_refused() {
        let mut session = session();
        let events = session.apply(PlayerIntent::Move(Direction::West));

        assert_eq!(session.phase, GamePhase::Exploring);
        assert_eq!(session.player, Position::new(2, 8));
        assert_eq!(session.inventory.steps, 70);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text.contains("no door"))));
    }

    #[test]
    fn test_confirm_places_room_and_returns_to_exploring() {
        let mut session = session();
        session.apply(PlayerIntent::Move(Direction::North));
        let index = free_candidate_index(&session);
        for _ in 0..index {
            session.apply(PlayerIntent::ShopNavigate(1));
        }
        let chosen = session.draw.as_ref().expect("draft up").candidates[index];
        let events = session.apply(PlayerIntent::Confirm);

        assert_eq!(session.phase, GamePhase::Exploring);
        assert!(session.draw.is_none());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::RoomPlaced { room, .. } if *room == chosen)));

        let placed = session
            .grid
            .room_at(Position::new(2, 7))
            .expect("room built");
        assert_eq!(placed.template, chosen);
        assert!(session.catalog.get(chosen).expect("id resolves").placed);

        // The connecting door is open from both sides.
        let south_side = session
            .grid
            .door(Position::new(2, 7), Direction::South)
            .expect("door exists");
        assert!(south_side.open);
        assert_eq!(session.statistics.rooms_placed, 1);
    }

    #[test]
    fn test_stepping_into_placed_room_costs_one_step() {
        let mut session = session();
        session.apply(PlayerIntent::Move(Direction::North));
        let index = free_candidate_index(&session);
        for _ in 0..index {
            session.apply(PlayerIntent::ShopNavigate(1));
        }
        session.apply(PlayerIntent::Confirm);
        let steps_before = session.inventory.steps;

        let events = session.apply(PlayerIntent::Move(Direction::North));
        assert_eq!(session.player, Position::new(2, 7));
        assert_eq!(session.inventory.steps, steps_before - 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerMoved { .. })));
        assert_eq!(session.statistics.steps_taken, 1);
    }

    #[test]
    fn test_cancel_keeps_cell_empty_and_door_open() {
        let mut session = session();
        session.apply(PlayerIntent::Move(Direction::North));
        session.apply(PlayerIntent::Cancel);

        assert_eq!(session.phase, GamePhase::Exploring);
        assert!(session.draw.is_none());
        assert!(session.grid.room_at(Position::new(2, 7)).is_none());

        // The door survived, so trying again re-offers a draft.
        session.apply(PlayerIntent::Move(Direction::North));
        assert_eq!(session.phase, GamePhase::Drawing);
    }

    #[test]
    fn test_reroll_without_dice_fails() {
        let mut session = session();
        session.apply(PlayerIntent::Move(Direction::North));
        let before = session.draw.clone();

        let events = session.apply(PlayerIntent::Reroll);
        assert_eq!(session.phase, GamePhase::Drawing);
        assert_eq!(session.draw, before);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text.contains("dice"))));
    }

    #[test]
    fn test_reroll_spends_a_die_and_redraws() {
        let mut session = session();
        session.apply(PlayerIntent::Move(Direction::North));
        session.inventory.dice = 1;
        session.apply(PlayerIntent::ShopNavigate(1));

        let events = session.apply(PlayerIntent::Reroll);
        assert_eq!(session.inventory.dice, 0);
        assert_eq!(session.phase, GamePhase::Drawing);
        let draw = session.draw.as_ref().expect("draft still up");
        assert_eq!(draw.selected, 0);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::DraftRerolled { .. })));
        assert_eq!(session.statistics.rerolls, 1);
    }

    #[test]
    fn test_confirm_without_gems_stays_drawing() {
        let mut session = session();
        session.apply(PlayerIntent::Move(Direction::North));
        let selected = {
            let draw = session.draw.as_ref().expect("draft up");
            draw.candidates[draw.selected]
        };
        session
            .catalog
            .get_mut(selected)
            .expect("id resolves")
            .gem_cost = 5;

        let events = session.apply(PlayerIntent::Confirm);
        assert_eq!(session.phase, GamePhase::Drawing);
        assert!(session.draw.is_some());
        assert_eq!(session.inventory.gems, 2);
        assert!(session.grid.room_at(Position::new(2, 7)).is_none());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text.contains("costs"))));
    }

    #[test]
    fn test_shop_entry_and_purchase() {
        let mut session = session();
        place_by_name(&mut session, "Kitchen", RoomShape::CornerWN, Position::new(3, 8));

        session.apply(PlayerIntent::Move(Direction::East));
        assert_eq!(session.phase, GamePhase::Shopping);
        let shop = session.shop.as_ref().expect("shop open");
        assert_eq!(shop.kind, ShopKind::Kitchen);
        assert_eq!(shop.offers.len(), 5);

        // Broke: the first offer is an apple for 2 gold.
        let events = session.apply(PlayerIntent::Confirm);
        assert_eq!(session.phase, GamePhase::Shopping);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text.contains("afford"))));

        session.inventory.gain_gold(5);
        let steps_before = session.inventory.steps;
        let events = session.apply(PlayerIntent::Confirm);
        assert_eq!(session.phase, GamePhase::Exploring);
        assert!(session.shop.is_none());
        assert_eq!(session.inventory.gold, 3);
        assert_eq!(session.inventory.steps, steps_before + 2);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::PurchaseCompleted { .. })));
        assert_eq!(session.statistics.purchases, 1);
        assert_eq!(session.statistics.gold_spent, 2);
    }

    #[test]
    fn test_shop_reopens_on_reentry() {
        let mut session = session();
        place_by_name(&mut session, "Kitchen", RoomShape::CornerWN, Position::new(3, 8));

        session.apply(PlayerIntent::Move(Direction::East));
        session.apply(PlayerIntent::Cancel);
        assert_eq!(session.phase, GamePhase::Exploring);

        session.apply(PlayerIntent::Move(Direction::West));
        session.apply(PlayerIntent::Move(Direction::East));
        assert_eq!(session.phase, GamePhase::Shopping);
    }

    #[test]
    fn test_chest_needs_key_or_hammer() {
        let mut session = session();
        let pantry = place_by_name(&mut session, "Pantry", RoomShape::CornerWN, Position::new(3, 8));

        session.apply(PlayerIntent::Move(Direction::East));
        assert!(session.pending_special.is_some());

        let events = session.apply(PlayerIntent::OpenSpecial);
        assert!(session.pending_special.is_some());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text.contains("locked"))));

        session.inventory.keys = 1;
        let steps_before = session.inventory.steps;
        let events = session.apply(PlayerIntent::OpenSpecial);
        assert!(session.pending_special.is_none());
        assert_eq!(session.inventory.keys, 0);
        assert!(session.inventory.steps > steps_before);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::SpecialOpened { kind, .. } if *kind == SpecialKind::Chest)));
        assert!(session.catalog.get(pantry).expect("id resolves").special_opened);
        assert_eq!(session.statistics.specials_opened, 1);
        assert_eq!(session.statistics.keys_spent, 1);

        // Opened specials never re-arm.
        session.apply(PlayerIntent::Move(Direction::West));
        session.apply(PlayerIntent::Move(Direction::East));
        assert!(session.pending_special.is_none());
    }

    #[test]
    fn test_dig_requires_shovel_and_right_intent() {
        let mut session = session();
        place_by_name(&mut session, "Patio", RoomShape::CornerWN, Position::new(3, 8));

        session.apply(PlayerIntent::Move(Direction::East));
        let context = session.pending_special.expect("dig site armed");
        assert_eq!(context.kind, SpecialKind::DigSite);
        // The garden roll on entry may have handed over a shovel.
        session
            .inventory
            .permanents
            .retain(|item| *item != PermanentItem::Shovel);

        // Opening instead of digging changes nothing.
        session.apply(PlayerIntent::OpenSpecial);
        assert!(session.pending_special.is_some());

        let events = session.apply(PlayerIntent::Dig);
        assert!(session.pending_special.is_some());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text.contains("shovel"))));

        session.inventory.add_permanent(PermanentItem::Shovel);
        let events = session.apply(PlayerIntent::Dig);
        assert!(session.pending_special.is_none());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::SpecialOpened { kind, .. } if *kind == SpecialKind::DigSite)));
    }

    #[test]
    fn test_garden_bounty_always_grants_a_gem() {
        let mut session = session();
        place_by_name(&mut session, "Patio", RoomShape::CornerWN, Position::new(3, 8));

        let events = session.apply(PlayerIntent::Move(Direction::East));
        assert_eq!(session.inventory.gems, 3);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ResourceGained { resource: ResourceKind::Gems, amount: 1 }
        )));
    }

    #[test]
    fn test_first_entry_reward_fires_once() {
        let mut session = session();
        place_by_name(&mut session, "Office", RoomShape::CornerWN, Position::new(3, 8));

        session.apply(PlayerIntent::Move(Direction::East));
        assert_eq!(session.inventory.gold, 3);

        session.apply(PlayerIntent::Move(Direction::West));
        session.apply(PlayerIntent::Move(Direction::East));
        assert_eq!(session.inventory.gold, 3);
    }

    #[test]
    fn test_deferred_drops_collected_on_entry() {
        let mut session = session();
        place_by_name(&mut session, "Parlor", RoomShape::CornerWN, Position::new(3, 8));
        session
            .deferred_drops
            .insert(Position::new(3, 8), DropBundle { gold: 5, gems: 0, keys: 0 });

        let events = session.apply(PlayerIntent::Move(Direction::East));
        assert_eq!(session.inventory.gold, 5);
        assert!(session.deferred_drops.is_empty());
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ResourceGained { resource: ResourceKind::Gold, amount: 5 }
        )));
    }

    #[test]
    fn test_disperse_gold_reaches_only_occupied_neighbors() {
        let mut session = session();
        place_by_name(&mut session, "Parlor", RoomShape::CornerWN, Position::new(3, 8));

        session.disperse_gold(Position::new(3, 8), 2);
        // West neighbor (the entrance) is occupied; north (3,7) is empty and
        // south (3,9) is off the board.
        assert_eq!(
            session.deferred_drops.get(&Position::new(2, 8)),
            Some(&DropBundle { gold: 2, gems: 0, keys: 0 })
        );
        assert!(!session.deferred_drops.contains_key(&Position::new(3, 7)));
        assert_eq!(session.deferred_drops.len(), 1);
    }

    #[test]
    fn test_victory_at_exit_cell() {
        let config = ManorConfig::for_testing(11);
        let mut session = GameSession::new(&config).expect("config is valid");
        place_by_name(&mut session, "Corridor", RoomShape::CorridorNS, Position::new(1, 1));
        place_by_name(&mut session, "Nursery", RoomShape::DeadEndS, Position::new(1, 0));

        session.apply(PlayerIntent::Move(Direction::North));
        assert_eq!(session.player, Position::new(1, 1));
        assert_eq!(session.phase, GamePhase::Exploring);

        let events = session.apply(PlayerIntent::Move(Direction::North));
        assert_eq!(session.player, Position::new(1, 0));
        assert_eq!(session.phase, GamePhase::Victory);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::PhaseChanged { to: GamePhase::Victory, .. }
        )));

        // Victory is terminal: further moves are ignored.
        let events = session.apply(PlayerIntent::Move(Direction::South));
        assert!(events.is_empty());
        assert_eq!(session.player, Position::new(1, 0));
    }

    #[test]
    fn test_game_over_when_steps_run_out() {
        let config = ManorConfig::for_testing(11);
        let mut session = GameSession::new(&config).expect("config is valid");
        place_by_name(&mut session, "Corridor", RoomShape::CorridorNS, Position::new(1, 1));
        session.inventory.steps = 1;

        let events = session.apply(PlayerIntent::Move(Direction::North));
        assert_eq!(session.inventory.steps, 0);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::PhaseChanged { to: GamePhase::GameOver, .. }
        )));
    }

    #[test]
    fn test_game_over_menu_replay_restarts() {
        let config = ManorConfig::for_testing(11);
        let mut session = GameSession::new(&config).expect("config is valid");
        place_by_name(&mut session, "Corridor", RoomShape::CorridorNS, Position::new(1, 1));
        session.inventory.steps = 1;
        session.apply(PlayerIntent::Move(Direction::North));
        assert_eq!(session.phase, GamePhase::GameOver);

        // Toggle to quit and back to replay.
        session.apply(PlayerIntent::Move(Direction::East));
        assert_eq!(session.end_selection, EndChoice::Quit);
        session.apply(PlayerIntent::Move(Direction::West));
        assert_eq!(session.end_selection, EndChoice::Replay);

        session.apply(PlayerIntent::Confirm);
        assert_eq!(session.phase, GamePhase::Exploring);
        assert_eq!(session.turn, 0);
        assert_eq!(session.player, config.entrance_cell());
        assert_eq!(session.inventory.steps, config.starting_steps);
        assert!(!session.quit_requested);
    }

    #[test]
    fn test_game_over_menu_quit_raises_flag() {
        let config = ManorConfig::for_testing(11);
        let mut session = GameSession::new(&config).expect("config is valid");
        place_by_name(&mut session, "Corridor", RoomShape::CorridorNS, Position::new(1, 1));
        session.inventory.steps = 1;
        session.apply(PlayerIntent::Move(Direction::North));

        session.apply(PlayerIntent::Move(Direction::East));
        session.apply(PlayerIntent::Confirm);
        assert!(session.quit_requested);
    }

    #[test]
    fn test_quit_sets_flag_in_any_phase() {
        let mut session = session();
        session.apply(PlayerIntent::Quit);
        assert!(session.quit_requested);
    }

    #[test]
    fn test_irrelevant_intents_are_ignored() {
        let mut session = session();
        for intent in [
            PlayerIntent::Confirm,
            PlayerIntent::Cancel,
            PlayerIntent::Reroll,
            PlayerIntent::ShopNavigate(1),
        ] {
            let events = session.apply(intent);
            assert!(events.is_empty());
        }
        assert_eq!(session.turn, 0);
        assert_eq!(session.phase, GamePhase::Exploring);
    }

    #[test]
    fn test_statistics_update() {
        let mut stats = GameStatistics::new();
        assert_eq!(stats.steps_taken, 0);

        stats.update_from_event(&GameEvent::PlayerMoved {
            from: Position::new(0, 0),
            to: Position::new(0, 1),
        });
        assert_eq!(stats.steps_taken, 1);

        stats.update_from_event(&GameEvent::DoorOpened {
            cell: Position::new(0, 0),
            direction: Direction::North,
            tier: LockTier::Basic,
        });
        assert_eq!(stats.doors_unlocked, 1);

        stats.update_from_event(&GameEvent::DoorOpened {
            cell: Position::new(0, 0),
            direction: Direction::East,
            tier: LockTier::None,
        });
        assert_eq!(stats.doors_unlocked, 1);

        stats.update_from_event(&GameEvent::ResourceSpent {
            resource: ResourceKind::Keys,
            amount: 2,
        });
        assert_eq!(stats.keys_spent, 2);

        stats.update_from_event(&GameEvent::ResourceGained {
            resource: ResourceKind::Gold,
            amount: 7,
        });
        assert_eq!(stats.gold_collected, 7);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let intents = [
            PlayerIntent::Move(Direction::North),
            PlayerIntent::Confirm,
            PlayerIntent::Move(Direction::North),
            PlayerIntent::Move(Direction::East),
            PlayerIntent::Confirm,
            PlayerIntent::Move(Direction::East),
        ];
        let mut a = GameSession::new(&ManorConfig::new(99)).expect("valid");
        let mut b = GameSession::new(&ManorConfig::new(99)).expect("valid");
        for intent in intents {
            a.apply(intent);
            b.apply(intent);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.inventory, b.inventory);
        assert_eq!(a.statistics, b.statistics);
        assert_eq!(a.turn, b.turn);
    }
}
