//! Player inventory and the resource economy.
//!
//! Tracks the consumable counters (steps, gold, gems, keys and dice), the
//! find-chance bonuses, and the permanent tools collected during a run.
//! All spending rules live here so that door, chest, shop and draft logic
//! share a single authority on what the player can afford.

use serde::{Deserialize, Serialize};

use crate::game::doors::LockTier;
use crate::game::items::{Consumable, PermanentItem};

/// Everything the player carries during a single expedition.
///
/// Counters never go negative: `spend_*` methods report failure instead of
/// underflowing. Steps are the exception, clamping to zero so the caller
/// can decide whether the run is over.
///
/// # Examples
///
/// ```
/// use manse::Inventory;
///
/// let mut inventory = Inventory::new(70, 2);
/// assert!(inventory.spend_gems(2));
/// assert!(!inventory.spend_gems(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Remaining movement budget. Each room-to-room move costs one step.
    pub steps: u32,
    /// Gold coins, spent in shops.
    pub gold: u32,
    /// Gems, spent to claim costly blueprints during a draft.
    pub gems: u32,
    /// Keys, spent on locked doors, chests and lockers.
    pub keys: u32,
    /// Dice, spent to reroll a draft hand.
    pub dice: u32,
    /// Chance of finding a key when first entering a room.
    pub key_chance: f64,
    /// Chance of finding loose gold when first entering a room.
    pub gold_chance: f64,
    /// Bonus added to item finds such as garden bounties.
    pub item_chance: f64,
    /// Permanent tools, each held at most once.
    pub permanents: Vec<PermanentItem>,
    /// Consumables eaten this run, in order.
    pub consumed: Vec<Consumable>,
}

impl Inventory {
    /// Creates an inventory for the start of a run.
    ///
    /// Gold, keys, dice and all chance bonuses start at zero.
    pub fn new(starting_steps: u32, starting_gems: u32) -> Self {
        Self {
            steps: starting_steps,
            gold: 0,
            gems: starting_gems,
            keys: 0,
            dice: 0,
            key_chance: 0.0,
            gold_chance: 0.0,
            item_chance: 0.0,
            permanents: Vec::new(),
            consumed: Vec::new(),
        }
    }

    /// Adds steps to the movement budget.
    pub fn gain_steps(&mut self, n: u32) {
        self.steps = self.steps.saturating_add(n);
    }

    /// Removes up to `n` steps, clamping at zero. Never fails.
    pub fn spend_steps(&mut self, n: u32) {
        self.steps = self.steps.saturating_sub(n);
    }

    /// Adds gold coins.
    pub fn gain_gold(&mut self, n: u32) {
        self.gold = self.gold.saturating_add(n);
    }

    /// Spends gold. Zero-gold purchases are rejected; every gold price in
    /// the game is positive.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if amount == 0 || self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }

    /// Adds gems.
    pub fn gain_gems(&mut self, n: u32) {
        self.gems = self.gems.saturating_add(n);
    }

    /// Spends gems. Spending zero always succeeds, so free blueprints can
    /// share the costly-blueprint code path.
    pub fn spend_gems(&mut self, amount: u32) -> bool {
        if self.gems < amount {
            return false;
        }
        self.gems -= amount;
        true
    }

    /// Adds keys.
    pub fn gain_keys(&mut self, n: u32) {
        self.keys = self.keys.saturating_add(n);
    }

    /// Spends keys, all or nothing.
    pub fn spend_keys(&mut self, n: u32) -> bool {
        if self.keys < n {
            return false;
        }
        self.keys -= n;
        true
    }

    /// Adds reroll dice.
    pub fn gain_dice(&mut self, n: u32) {
        self.dice = self.dice.saturating_add(n);
    }

    /// Spends a single reroll die.
    pub fn spend_die(&mut self) -> bool {
        if self.dice == 0 {
            return false;
        }
        self.dice -= 1;
        true
    }

    /// Whether [`Inventory::open_door`] would succeed for `tier`, without
    /// spending anything.
    pub fn can_open_door(&self, tier: LockTier) -> bool {
        match tier {
            LockTier::None => true,
            LockTier::Basic => self.keys > 0 || self.has_permanent(PermanentItem::LockpickKit),
            LockTier::Heavy => self.keys > 0,
        }
    }

    /// Attempts to open a door of the given tier.
    ///
    /// Unlocked doors always open. Basic locks consume a key, falling back
    /// to the lockpick kit at no cost. Heavy locks accept only a key.
    /// Returns the number of keys spent, or `None` if the door stays shut.
    pub fn open_door(&mut self, tier: LockTier) -> Option<u32> {
        match tier {
            LockTier::None => Some(0),
            LockTier::Basic => {
                if self.spend_keys(1) {
                    Some(1)
                } else if self.has_permanent(PermanentItem::LockpickKit) {
                    Some(0)
                } else {
                    None
                }
            }
            LockTier::Heavy => {
                if self.spend_keys(1) {
                    Some(1)
                } else {
                    None
                }
            }
        }
    }

    /// Whether a chest could be opened right now.
    pub fn can_open_chest(&self) -> bool {
        self.has_permanent(PermanentItem::Hammer) || self.keys > 0
    }

    /// Opens a chest: free with the hammer, otherwise one key.
    /// Returns the number of keys spent, or `None` on failure.
    pub fn open_chest(&mut self) -> Option<u32> {
        if self.has_permanent(PermanentItem::Hammer) {
            Some(0)
        } else if self.spend_keys(1) {
            Some(1)
        } else {
            None
        }
    }

    /// Whether a locker could be opened right now.
    pub fn can_open_locker(&self) -> bool {
        self.keys > 0
    }

    /// Opens a locker for one key. No tool substitutes for it.
    pub fn open_locker(&mut self) -> Option<u32> {
        if self.spend_keys(1) {
            Some(1)
        } else {
            None
        }
    }

    /// Digging needs the shovel and costs nothing.
    pub fn can_dig(&self) -> bool {
        self.has_permanent(PermanentItem::Shovel)
    }

    /// Whether the player already owns the given tool.
    pub fn has_permanent(&self, item: PermanentItem) -> bool {
        self.permanents.contains(&item)
    }

    /// Adds a permanent tool, applying its one-time passive bonus.
    ///
    /// Duplicates are ignored so the bonus can never stack. Returns `true`
    /// when the tool was newly acquired.
    pub fn add_permanent(&mut self, item: PermanentItem) -> bool {
        if self.has_permanent(item) {
            return false;
        }
        self.permanents.push(item);
        match item {
            PermanentItem::MetalDetector => {
                self.key_chance += 0.10;
                self.gold_chance += 0.10;
            }
            PermanentItem::RabbitsFoot => {
                self.item_chance += 0.10;
            }
            _ => {}
        }
        true
    }

    /// Eats a consumable, restoring its step value immediately.
    /// Returns the steps gained.
    pub fn eat(&mut self, item: Consumable) -> u32 {
        let steps = item.steps_restored();
        self.gain_steps(steps);
        self.consumed.push(item);
        steps
    }
}
