//! Performance tests for session construction and intent resolution.

use std::time::Instant;

use manse::{
    Direction, GamePhase, GameSession, ManorConfig, ManseResult, PlayerIntent, RoomCatalog,
};

#[test]
fn test_session_build_performance() -> ManseResult<()> {
    // Warm one session up first so allocator effects don't dominate
    let _ = GameSession::new(&ManorConfig::new(0))?;

    let start = Instant::now();
    let iterations = 100;

    for seed in 0..iterations {
        let session = GameSession::new(&ManorConfig::new(seed as u64))?;
        assert_eq!(session.phase, GamePhase::Exploring);
    }

    let elapsed = start.elapsed();
    let avg_build_time = elapsed / iterations;

    println!("Average session build time: {:?}", avg_build_time);

    // Building a session allocates the full catalog, so keep the bound
    // loose enough for debug builds
    assert!(
        avg_build_time.as_millis() < 20,
        "Session construction too slow: {:?}",
        avg_build_time
    );

    Ok(())
}

#[test]
fn test_intent_resolution_performance() -> ManseResult<()> {
    let mut session = GameSession::new(&ManorConfig::new(12345))?;
    let directions = [
        Direction::North,
        Direction::East,
        Direction::West,
        Direction::South,
    ];

    let start = Instant::now();
    let iterations = 1000;

    for step in 0..iterations {
        if session.is_ended() {
            session = GameSession::new(&ManorConfig::new(step as u64 + 1))?;
        }
        let intent = match session.phase {
            GamePhase::Exploring => PlayerIntent::Move(directions[step as usize % 4]),
            // Alternate so an unaffordable hand cannot wedge the loop
            GamePhase::Drawing if step % 2 == 0 => PlayerIntent::Confirm,
            GamePhase::Drawing => PlayerIntent::Cancel,
            GamePhase::Shopping => PlayerIntent::Cancel,
            GamePhase::Victory | GamePhase::GameOver => PlayerIntent::Confirm,
        };
        let _ = session.apply(intent);
    }

    let elapsed = start.elapsed();
    let avg_intent_time = elapsed / iterations;

    println!("Average intent resolution time: {:?}", avg_intent_time);

    // Each draft redraws from a 100-template pool; still comfortably
    // inside a frame budget
    assert!(
        avg_intent_time.as_micros() < 2000,
        "Intent resolution too slow: {:?}",
        avg_intent_time
    );

    Ok(())
}

#[test]
fn test_catalog_serialization_performance() -> ManseResult<()> {
    let catalog = RoomCatalog::standard();

    let start = Instant::now();
    let iterations = 200;
    let mut bytes = 0usize;

    for _ in 0..iterations {
        let json = serde_json::to_string(&catalog)?;
        bytes += json.len();
    }

    let elapsed = start.elapsed();
    let avg_dump_time = elapsed / iterations;

    println!(
        "Average catalog serialization time: {:?} ({} bytes per dump)",
        avg_dump_time,
        bytes / iterations as usize
    );

    assert!(
        avg_dump_time.as_millis() < 10,
        "Catalog serialization too slow: {:?}",
        avg_dump_time
    );

    Ok(())
}
