//! Integration test to ensure a fresh session can start up without errors.

use manse::{
    Direction, GamePhase, GameSession, LockTier, ManorConfig, ManseResult, Position, RoomCatalog,
};

#[test]
fn test_basic_startup() -> ManseResult<()> {
    let config = ManorConfig::new(12345);
    let session = GameSession::new(&config)?;

    // The player starts in the middle of the bottom row, facing a run
    // toward the middle of the top row
    assert_eq!(session.player, Position::new(2, 8));
    assert_eq!(session.exit_cell(), Position::new(2, 0));
    assert_eq!(session.phase, GamePhase::Exploring);
    assert_eq!(session.turn, 0);
    assert!(!session.quit_requested);

    // Starting economy
    assert_eq!(session.inventory.steps, 70);
    assert_eq!(session.inventory.gems, 2);
    assert_eq!(session.inventory.gold, 0);
    assert_eq!(session.inventory.keys, 0);
    assert_eq!(session.inventory.dice, 0);

    // The entrance hall is already built
    let entrance = session
        .grid
        .room_at(Position::new(2, 8))
        .expect("Failed to find the entrance hall on the board");
    let template = session
        .catalog
        .get(entrance.template)
        .expect("Failed to resolve the entrance template");
    assert_eq!(template.name, "Entrance Hall");
    assert!(template.placed);

    // Its north door is forced open so the first move always works
    let north = session
        .grid
        .door(Position::new(2, 8), Direction::North)
        .expect("Failed to find the entrance's north door");
    assert!(north.open);
    assert_eq!(north.tier, LockTier::None);

    // The same door reads identically from the far side of the boundary
    assert_eq!(
        session.grid.door(Position::new(2, 7), Direction::South),
        Some(north)
    );

    Ok(())
}

#[test]
fn test_standard_catalog_census() {
    let catalog = RoomCatalog::standard();
    assert_eq!(catalog.len(), 100);
    assert!(!catalog.is_empty());

    let entrance = catalog
        .get(catalog.entrance())
        .expect("Failed to find the entrance template");
    assert_eq!(entrance.name, "Entrance Hall");
    assert_eq!(entrance.gem_cost, 0);

    // The free pool is large enough to sustain a run without gems
    let free = catalog
        .templates()
        .iter()
        .filter(|t| t.gem_cost == 0)
        .count();
    assert!(free >= 20, "Only {} free blueprints in the catalog", free);
}

#[test]
fn test_catalog_serializes_to_json() -> ManseResult<()> {
    let catalog = RoomCatalog::standard();
    let json = serde_json::to_string_pretty(&catalog)?;
    assert!(json.contains("Entrance Hall"));

    // The dump is valid JSON end to end
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert!(value.is_object());

    Ok(())
}

#[test]
fn test_cramped_test_board() -> ManseResult<()> {
    let config = ManorConfig::for_testing(7);
    let session = GameSession::new(&config)?;

    assert_eq!(session.player, Position::new(1, 2));
    assert_eq!(session.exit_cell(), Position::new(1, 0));
    assert_eq!(session.inventory.steps, 10);
    assert_eq!(session.inventory.gems, 1);

    Ok(())
}

#[test]
fn test_degenerate_board_is_rejected() {
    let mut config = ManorConfig::new(1);
    config.height = 1;
    assert!(config.validate().is_err());
    assert!(GameSession::new(&config).is_err());
}
