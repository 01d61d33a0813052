//! # Manse
//!
//! A seeded manor-drafting exploration game: the player walks a 5x9 grid of
//! cells, opening doors into empty cells and drafting rooms into them from a
//! weighted catalog until the far side of the manor is reached or the steps
//! run out.
//!
//! ## Architecture Overview
//!
//! Manse is designed around a single-writer session and one shared PRNG:
//!
//! - **Game Session**: Centralized state machine over exploring, drafting,
//!   shopping, and the two terminal phases
//! - **Grid System**: Lazily materialized, mirrored doors between cells
//! - **Catalog System**: Weighted room drafting with placement guarantees
//! - **Economy System**: Steps, gold, gems, keys, and dice with hard floors
//! - **Rendering System**: Immediate-mode board and overlay drawing using
//!   macroquad
//!
//! ## Determinism
//!
//! Every random decision (door tiers, draft hands, loot) flows through one
//! `StdRng` seeded from the session seed, so a seed plus an intent stream
//! replays the same game.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod scenes;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;

// Explicit re-exports for commonly used types
pub use game::{
    // From doors
    Door,
    // From mod
    Direction,
    // From session
    DrawContext,
    EndChoice,
    GameEvent,
    GamePhase,
    GameSession,
    GameStatistics,
    // From grid
    Grid,
    // From inventory
    Inventory,
    LockTier,
    MessageImportance,
    MoveOutcome,
    PlacedRoom,
    PlayerIntent,
    Position,
    // From rooms
    RoomColor,
    RoomId,
    RoomShape,
    RoomTemplate,
    ShopContext,
    SpecialKind,
};

pub use generation::{ManorConfig, RoomCatalog};

pub use input::{InputHandler, PlayerInput};

pub use rendering::MacroquadDisplay;

pub use scenes::{SceneManager, SceneType};

/// Core error type for the Manse game engine.
#[derive(thiserror::Error, Debug)]
pub enum ManseError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Manse codebase.
pub type ManseResult<T> = Result<T, ManseError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default manor width in cells
    pub const DEFAULT_GRID_WIDTH: i32 = 5;

    /// Default manor height in cells
    pub const DEFAULT_GRID_HEIGHT: i32 = 9;

    /// Steps the player starts with
    pub const DEFAULT_STARTING_STEPS: u32 = 70;

    /// Gems the player starts with
    pub const DEFAULT_STARTING_GEMS: u32 = 2;

    /// Maximum number of candidates offered per draft
    pub const DRAW_HAND_SIZE: usize = 3;

    /// Draft weight per rarity tier 0..=3
    pub const RARITY_WEIGHTS: [f64; 4] = [27.0, 9.0, 3.0, 1.0];

    /// Base chance that a garden grants a consumable
    pub const GARDEN_CONSUMABLE_CHANCE: f64 = 0.5;

    /// Base chance that a garden grants an unowned permanent item
    pub const GARDEN_PERMANENT_CHANCE: f64 = 0.15;

    /// Gold found on a successful gold-chance roll, inclusive bounds
    pub const FOUND_GOLD: (u32, u32) = (1, 3);
}
