//! # Doors
//!
//! Door state and the row-based lock tier distribution.
//!
//! Doors are created lazily the first time a cell boundary is touched and
//! mirrored on both sides. The lock tier is sampled once at creation from
//! the session PRNG: the top row of the manor always yields the heaviest
//! lock, the bottom row none, and interior rows blend between the two.

use crate::generation::utils::weighted_pick;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Lock tier of a door.
///
/// `None` opens freely, `Basic` wants a key or the Lockpick Kit, `Heavy`
/// opens for a key only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockTier {
    None,
    Basic,
    Heavy,
}

impl LockTier {
    /// Numeric tier, 0 through 2.
    pub fn level(self) -> u8 {
        match self {
            LockTier::None => 0,
            LockTier::Basic => 1,
            LockTier::Heavy => 2,
        }
    }
}

impl std::fmt::Display for LockTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LockTier::None => "no lock",
            LockTier::Basic => "basic lock",
            LockTier::Heavy => "heavy lock",
        };
        write!(f, "{}", name)
    }
}

/// A door on one side of a cell boundary.
///
/// Interior doors exist as identical copies on both adjacent cells and the
/// copies always agree. Opening is monotonic: nothing ever closes a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub tier: LockTier,
    pub open: bool,
}

impl Door {
    /// Creates a closed door with the given tier.
    pub fn new(tier: LockTier) -> Self {
        Self { tier, open: false }
    }

    /// Creates the permanently closed door stored on boundaries that face
    /// out of the grid. It is never mirrored and never opens.
    pub fn sealed() -> Self {
        Self::new(LockTier::None)
    }
}

/// Samples a lock tier for a boundary whose lower row index is `row`.
///
/// With `t = 1 - row/(height-1)` the tier weights are
/// `[(1-t)^2, 2t(1-t), t^2]`, so row 0 always locks Heavy and the bottom
/// row never locks at all.
pub fn tier_for_row(row: i32, height: i32, rng: &mut StdRng) -> LockTier {
    if height < 2 {
        return LockTier::None;
    }
    let row = row.clamp(0, height - 1);
    let t = 1.0 - row as f64 / (height - 1) as f64;
    let weights = [(1.0 - t) * (1.0 - t), 2.0 * t * (1.0 - t), t * t];
    match weighted_pick(&weights, rng) {
        Some(1) => LockTier::Basic,
        Some(2) => LockTier::Heavy,
        _ => LockTier::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_top_row_is_always_heavy() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(tier_for_row(0, 9, &mut rng), LockTier::Heavy);
        }
    }

    #[test]
    fn test_bottom_row_is_never_locked() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(tier_for_row(8, 9, &mut rng), LockTier::None);
        }
    }

    #[test]
    fn test_interior_rows_blend() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(tier_for_row(4, 9, &mut rng));
        }
        // The middle row has all three tiers in reach.
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_degenerate_height() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(tier_for_row(0, 1, &mut rng), LockTier::None);
    }

    #[test]
    fn test_out_of_range_rows_clamp() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(tier_for_row(50, 9, &mut rng), LockTier::None);
        assert_eq!(tier_for_row(-5, 9, &mut rng), LockTier::Heavy);
    }

    #[test]
    fn test_new_door_is_closed() {
        let door = Door::new(LockTier::Basic);
        assert!(!door.open);
        assert_eq!(door.tier, LockTier::Basic);
        assert_eq!(Door::sealed().tier, LockTier::None);
    }

    #[test]
    fn test_tier_levels() {
        assert_eq!(LockTier::None.level(), 0);
        assert_eq!(LockTier::Basic.level(), 1);
        assert_eq!(LockTier::Heavy.level(), 2);
    }
}
