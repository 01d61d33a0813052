//! # Items
//!
//! Consumables, permanent items, special-interaction loot pools, and shop
//! offer tables.
//!
//! Consumables apply their step bonus the moment they are acquired; there
//! is no separate "use item" action. Permanent items are owned once and
//! their passive bonuses apply at acquisition.

use crate::game::inventory::Inventory;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Single-use food that restores steps on acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Consumable {
    Apple,
    Banana,
    Cake,
    Sandwich,
    Meal,
}

impl Consumable {
    /// Every consumable, in loot-pool order.
    pub const ALL: [Consumable; 5] = [
        Consumable::Apple,
        Consumable::Banana,
        Consumable::Cake,
        Consumable::Sandwich,
        Consumable::Meal,
    ];

    /// Steps restored when acquired.
    ///
    /// # Examples
    ///
    /// ```
    /// use manse::Consumable;
    ///
    /// assert_eq!(Consumable::Apple.steps_restored(), 2);
    /// assert_eq!(Consumable::Meal.steps_restored(), 25);
    /// ```
    pub fn steps_restored(self) -> u32 {
        match self {
            Consumable::Apple => 2,
            Consumable::Banana => 3,
            Consumable::Cake => 10,
            Consumable::Sandwich => 15,
            Consumable::Meal => 25,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Consumable::Apple => "apple",
            Consumable::Banana => "banana",
            Consumable::Cake => "cake",
            Consumable::Sandwich => "sandwich",
            Consumable::Meal => "meal",
        }
    }
}

/// Permanently owned tool with a passive effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermanentItem {
    /// Lets the player dig at dig sites.
    Shovel,
    /// Opens chests without spending a key.
    Hammer,
    /// Opens basic locks without spending a key.
    LockpickKit,
    /// Raises the key and gold find chances.
    MetalDetector,
    /// Raises the item find chance.
    RabbitsFoot,
}

impl PermanentItem {
    pub const ALL: [PermanentItem; 5] = [
        PermanentItem::Shovel,
        PermanentItem::Hammer,
        PermanentItem::LockpickKit,
        PermanentItem::MetalDetector,
        PermanentItem::RabbitsFoot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PermanentItem::Shovel => "shovel",
            PermanentItem::Hammer => "hammer",
            PermanentItem::LockpickKit => "lockpick kit",
            PermanentItem::MetalDetector => "metal detector",
            PermanentItem::RabbitsFoot => "rabbit's foot",
        }
    }
}

/// Kind of special interaction a room can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    Chest,
    Locker,
    DigSite,
}

impl SpecialKind {
    pub fn name(self) -> &'static str {
        match self {
            SpecialKind::Chest => "chest",
            SpecialKind::Locker => "locker",
            SpecialKind::DigSite => "dig site",
        }
    }
}

/// Which shop a yellow room opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopKind {
    Kitchen,
    Commissary,
    Locksmith,
}

impl ShopKind {
    pub fn name(self) -> &'static str {
        match self {
            ShopKind::Kitchen => "Kitchen",
            ShopKind::Commissary => "Commissary",
            ShopKind::Locksmith => "Locksmith",
        }
    }
}

/// Price of a shop offer, in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Price {
    Gold(u32),
    Gems(u32),
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Gold(n) => write!(f, "{} gold", n),
            Price::Gems(1) => write!(f, "1 gem"),
            Price::Gems(n) => write!(f, "{} gems", n),
        }
    }
}

/// What a purchased offer grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferEffect {
    GrantKeys(u32),
    GrantDice(u32),
    GrantConsumable(Consumable),
    GrantPermanent(PermanentItem),
}

/// A single line in a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopOffer {
    pub label: &'static str,
    pub price: Price,
    pub effect: OfferEffect,
}

impl ShopOffer {
    const fn new(label: &'static str, price: Price, effect: OfferEffect) -> Self {
        Self {
            label,
            price,
            effect,
        }
    }
}

/// Builds the offer table for a shop, leaving out permanents the player
/// already owns.
pub fn shop_offers(kind: ShopKind, inventory: &Inventory) -> Vec<ShopOffer> {
    let table: &[ShopOffer] = match kind {
        ShopKind::Kitchen => &[
            ShopOffer::new(
                "Apple",
                Price::Gold(2),
                OfferEffect::GrantConsumable(Consumable::Apple),
            ),
            ShopOffer::new(
                "Banana",
                Price::Gold(3),
                OfferEffect::GrantConsumable(Consumable::Banana),
            ),
            ShopOffer::new(
                "Cake",
                Price::Gold(8),
                OfferEffect::GrantConsumable(Consumable::Cake),
            ),
            ShopOffer::new(
                "Sandwich",
                Price::Gold(10),
                OfferEffect::GrantConsumable(Consumable::Sandwich),
            ),
            ShopOffer::new(
                "Meal",
                Price::Gems(1),
                OfferEffect::GrantConsumable(Consumable::Meal),
            ),
        ],
        ShopKind::Commissary => &[
            ShopOffer::new("Key", Price::Gold(4), OfferEffect::GrantKeys(1)),
            ShopOffer::new("Die", Price::Gold(5), OfferEffect::GrantDice(1)),
            ShopOffer::new(
                "Shovel",
                Price::Gold(8),
                OfferEffect::GrantPermanent(PermanentItem::Shovel),
            ),
            ShopOffer::new(
                "Metal Detector",
                Price::Gold(12),
                OfferEffect::GrantPermanent(PermanentItem::MetalDetector),
            ),
            ShopOffer::new(
                "Rabbit's Foot",
                Price::Gems(2),
                OfferEffect::GrantPermanent(PermanentItem::RabbitsFoot),
            ),
        ],
        ShopKind::Locksmith => &[
            ShopOffer::new("Key", Price::Gold(3), OfferEffect::GrantKeys(1)),
            ShopOffer::new(
                "Hammer",
                Price::Gold(6),
                OfferEffect::GrantPermanent(PermanentItem::Hammer),
            ),
            ShopOffer::new(
                "Lockpick Kit",
                Price::Gold(15),
                OfferEffect::GrantPermanent(PermanentItem::LockpickKit),
            ),
            ShopOffer::new("Key Ring", Price::Gems(1), OfferEffect::GrantKeys(3)),
        ],
    };
    table
        .iter()
        .filter(|offer| match offer.effect {
            OfferEffect::GrantPermanent(item) => !inventory.has_permanent(item),
            _ => true,
        })
        .copied()
        .collect()
}

/// Rolls the contents of a chest: 1 to 3 foods, duplicates allowed.
pub fn chest_loot(rng: &mut StdRng) -> Vec<Consumable> {
    let count = rng.gen_range(1..=3);
    (0..count)
        .map(|_| Consumable::ALL[rng.gen_range(0..Consumable::ALL.len())])
        .collect()
}

/// Rolls the contents of a locker: 1 to 2 slots, each possibly empty.
pub fn locker_loot(rng: &mut StdRng) -> Vec<Consumable> {
    const POOL: [Option<Consumable>; 6] = [
        None,
        Some(Consumable::Apple),
        Some(Consumable::Cake),
        Some(Consumable::Meal),
        Some(Consumable::Sandwich),
        Some(Consumable::Banana),
    ];
    let count = rng.gen_range(1..=2);
    (0..count)
        .filter_map(|_| POOL[rng.gen_range(0..POOL.len())])
        .collect()
}

/// Rolls the contents of a dig site: 1 to 2 slots, mostly dirt.
pub fn dig_loot(rng: &mut StdRng) -> Vec<Consumable> {
    const POOL: [Option<Consumable>; 3] = [None, Some(Consumable::Apple), Some(Consumable::Banana)];
    let count = rng.gen_range(1..=2);
    (0..count)
        .filter_map(|_| POOL[rng.gen_range(0..POOL.len())])
        .collect()
}

/// Comma-joined item names for found-loot messages.
pub fn describe_loot(items: &[Consumable]) -> String {
    let names: Vec<&str> = items.iter().map(|c| c.name()).collect();
    names.join(", ")
}
