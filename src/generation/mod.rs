//! # Generation Module
//!
//! Run configuration and the room catalog.
//!
//! Everything random in a session flows through one `StdRng` built by
//! [`utils::create_rng`], so a config pins down door tiers, draft hands,
//! and loot rolls for the whole run.

pub mod catalog;

pub use catalog::*;

use serde::{Deserialize, Serialize};

use crate::game::Position;
use crate::{ManseError, ManseResult};

/// Configuration for a single manor run.
///
/// # Examples
///
/// ```
/// use manse::ManorConfig;
///
/// let config = ManorConfig::new(12345);
/// assert_eq!(config.width, 5);
/// assert_eq!(config.height, 9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManorConfig {
    /// Seed for deterministic generation.
    pub seed: u64,
    /// Board width in cells.
    pub width: i32,
    /// Board height in cells.
    pub height: i32,
    /// Steps the player starts with.
    pub starting_steps: u32,
    /// Gems the player starts with.
    pub starting_gems: u32,
}

impl ManorConfig {
    /// Creates a configuration with the standard board and economy.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: crate::config::DEFAULT_GRID_WIDTH,
            height: crate::config::DEFAULT_GRID_HEIGHT,
            starting_steps: crate::config::DEFAULT_STARTING_STEPS,
            starting_gems: crate::config::DEFAULT_STARTING_GEMS,
        }
    }

    /// A cramped board with a tight budget, for fast tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 3,
            height: 3,
            starting_steps: 10,
            starting_gems: 1,
        }
    }

    /// Checks that the board can hold a run at all.
    ///
    /// The entrance sits on the bottom row and the exit on the top row, so
    /// the board needs at least one column and two rows.
    pub fn validate(&self) -> ManseResult<()> {
        if self.width < 1 || self.height < 2 {
            return Err(ManseError::GenerationFailed(format!(
                "a {}x{} board cannot hold both an entrance and an exit",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Where the player starts: the middle of the bottom row.
    pub fn entrance_cell(&self) -> Position {
        Position::new(self.width / 2, self.height - 1)
    }

    /// The cell that ends the run in victory: the middle of the top row.
    pub fn exit_cell(&self) -> Position {
        Position::new(self.width / 2, 0)
    }
}

impl Default for ManorConfig {
    /// Creates a default configuration with seed 42.
    fn default() -> Self {
        Self::new(42)
    }
}

/// Helpers for seeded randomness.
pub mod utils {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::ManorConfig;

    /// Builds the session PRNG from the configured seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use manse::generation::utils::create_rng;
    /// use manse::ManorConfig;
    /// use rand::Rng;
    ///
    /// let config = ManorConfig::new(7);
    /// let mut a = create_rng(&config);
    /// let mut b = create_rng(&config);
    /// assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    /// ```
    pub fn create_rng(config: &ManorConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Rolls a probability in `[0, 1]`.
    ///
    /// Out-of-range chances clamp: stacked bonuses past 1.0 always hit and
    /// nonpositive chances never do, without drawing from the PRNG.
    pub fn roll(chance: f64, rng: &mut StdRng) -> bool {
        if chance <= 0.0 {
            return false;
        }
        if chance >= 1.0 {
            return true;
        }
        rng.gen::<f64>() < chance
    }

    /// Picks an index with probability proportional to its weight.
    ///
    /// Zero and negative weights are never picked. Returns `None` when no
    /// weight is positive.
    pub fn weighted_pick(weights: &[f64], rng: &mut StdRng) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut point = rng.gen::<f64>() * total;
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            point -= weight;
            if point < 0.0 {
                return Some(index);
            }
        }
        // Rounding can leave a sliver past the last bucket.
        weights.iter().rposition(|w| *w > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_config_creation() {
        let config = ManorConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.width, 5);
        assert_eq!(config.height, 9);
        assert_eq!(config.starting_steps, 70);
        assert_eq!(config.starting_gems, 2);
    }

    #[test]
    fn test_default_config_seed() {
        assert_eq!(ManorConfig::default().seed, 42);
    }

    #[test]
    fn test_testing_config_is_small() {
        let config = ManorConfig::for_testing(1);
        assert_eq!((config.width, config.height), (3, 3));
        assert_eq!(config.starting_steps, 10);
        assert_eq!(config.starting_gems, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_boards() {
        let mut config = ManorConfig::new(1);
        config.width = 0;
        assert!(config.validate().is_err());

        let mut config = ManorConfig::new(1);
        config.height = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_entrance_and_exit_cells() {
        let config = ManorConfig::new(1);
        assert_eq!(config.entrance_cell(), Position::new(2, 8));
        assert_eq!(config.exit_cell(), Position::new(2, 0));

        let small = ManorConfig::for_testing(1);
        assert_eq!(small.entrance_cell(), Position::new(1, 2));
        assert_eq!(small.exit_cell(), Position::new(1, 0));
    }

    #[test]
    fn test_create_rng_is_deterministic() {
        let config = ManorConfig::new(99);
        let mut a = create_rng(&config);
        let mut b = create_rng(&config);
        for _ in 0..16 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }

    #[test]
    fn test_roll_clamps() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(roll(1.5, &mut rng));
            assert!(!roll(0.0, &mut rng));
            assert!(!roll(-0.2, &mut rng));
        }
    }

    #[test]
    fn test_weighted_pick_needs_positive_weight() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(weighted_pick(&[], &mut rng), None);
        assert_eq!(weighted_pick(&[0.0, 0.0], &mut rng), None);
        assert_eq!(weighted_pick(&[0.0, 5.0], &mut rng), Some(1));
    }

    #[test]
    fn test_weighted_pick_skips_zero_weights() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let pick = weighted_pick(&[1.0, 0.0, 2.0], &mut rng);
            assert!(matches!(pick, Some(0) | Some(2)));
        }
    }

    #[test]
    fn test_weighted_pick_roughly_follows_weights() {
        let mut rng = StdRng::seed_from_u64(6);
        let weights = [27.0, 9.0, 3.0, 1.0];
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            if let Some(i) = weighted_pick(&weights, &mut rng) {
                counts[i] += 1;
            }
        }
        assert!(counts[0] > counts[1]);
        assert!(counts[1] > counts[2]);
        assert!(counts[2] > counts[3]);
        assert!(counts[3] > 0);
    }
}
