use std::time::Duration;

use boxoffice_domain::Venue;
use boxoffice_engine::{AllocationEngine, EngineConfig, HoldError};
use tokio::time::sleep;

const EMAIL: &str = "user@yahoo.com";

fn quick_config() -> EngineConfig {
    EngineConfig {
        hold_timeout_ms: 150,
        sweep_interval_ms: 50,
    }
}

#[tokio::test]
async fn test_new_venue_has_all_seats_available() {
    let venue = Venue::new(7, 5).unwrap();
    let engine = AllocationEngine::start(venue, EngineConfig::default());

    assert_eq!(engine.available_seats(), 35);
    engine.shutdown().await;
}

#[tokio::test]
async fn test_hold_takes_front_row_seats() {
    let venue = Venue::new(7, 5).unwrap();
    let engine = AllocationEngine::start(venue, EngineConfig::default());

    let hold = engine.find_and_hold(2, EMAIL).unwrap();
    assert_eq!(hold.row, 0);
    assert_eq!(hold.seats.len(), 2);
    assert!(hold.id >= 1);
    assert_eq!(engine.available_seats(), 33);

    engine.shutdown().await;
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let venue = Venue::new(7, 5).unwrap();
    let engine = AllocationEngine::start(venue, EngineConfig::default());

    assert!(matches!(
        engine.find_and_hold(0, EMAIL),
        Err(HoldError::InvalidRequest(_))
    ));
    assert!(matches!(
        engine.find_and_hold(5, "bad-email"),
        Err(HoldError::InvalidRequest(_))
    ));
    assert_eq!(engine.available_seats(), 35);

    engine.shutdown().await;
}

#[tokio::test]
async fn test_no_capacity_across_fragmented_rows() {
    let venue = Venue::new(2, 8).unwrap();
    let engine = AllocationEngine::start(venue, EngineConfig::default());

    // fragment both rows down to blocks of at most 2 seats
    for _ in 0..4 {
        engine.find_and_hold(3, EMAIL).unwrap();
    }
    assert_eq!(engine.available_seats(), 4);

    assert!(matches!(
        engine.find_and_hold(6, EMAIL),
        Err(HoldError::NoCapacity { requested: 6 })
    ));
    assert_eq!(engine.available_seats(), 4);

    engine.shutdown().await;
}

#[tokio::test]
async fn test_reserve_then_lookup_then_reserve_again() {
    let venue = Venue::new(7, 5).unwrap();
    let engine = AllocationEngine::start(venue, EngineConfig::default());

    let hold = engine.find_and_hold(3, EMAIL).unwrap();
    let held_ids: Vec<u32> = hold.seats.iter().map(|seat| seat.id).collect();

    let code = engine.reserve(hold.id, EMAIL).unwrap();
    assert!(!code.is_empty());

    let reserved = engine.reserved_seats(&code).unwrap();
    let reserved_ids: Vec<u32> = reserved.iter().map(|seat| seat.id).collect();
    assert_eq!(reserved_ids, held_ids);

    assert!(matches!(
        engine.reserve(hold.id, EMAIL),
        Err(HoldError::NotFound(_))
    ));

    engine.shutdown().await;
}

#[tokio::test]
async fn test_unreserved_hold_expires_and_seats_return() {
    let venue = Venue::new(7, 5).unwrap();
    let engine = AllocationEngine::start(venue, quick_config());
    let before = engine.available_seats();

    let hold = engine.find_and_hold(3, EMAIL).unwrap();
    assert_eq!(engine.available_seats(), before - 3);

    // wait past the hold timeout plus one sweep interval
    sleep(Duration::from_millis(400)).await;

    assert!(matches!(
        engine.reserve(hold.id, EMAIL),
        Err(HoldError::NotFound(_))
    ));
    assert_eq!(engine.available_seats(), before);

    engine.shutdown().await;
}

#[tokio::test]
async fn test_reserved_seats_never_expire() {
    let venue = Venue::new(7, 5).unwrap();
    let engine = AllocationEngine::start(venue, quick_config());

    let hold = engine.find_and_hold(2, EMAIL).unwrap();
    let code = engine.reserve(hold.id, EMAIL).unwrap();

    sleep(Duration::from_millis(400)).await;

    assert_eq!(engine.reserved_seats(&code).unwrap().len(), 2);
    assert_eq!(engine.available_seats(), 33);

    engine.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let venue = Venue::new(2, 2).unwrap();
    let engine = AllocationEngine::start(venue, quick_config());

    engine.shutdown().await;
    engine.shutdown().await;

    // with the sweep gone, expired holds stay outstanding
    let hold = engine.find_and_hold(1, EMAIL).unwrap();
    sleep(Duration::from_millis(400)).await;
    assert!(engine.reserve(hold.id, EMAIL).is_ok());
}

#[tokio::test]
async fn test_expired_seats_can_be_held_again() {
    let venue = Venue::new(1, 5).unwrap();
    let engine = AllocationEngine::start(venue, quick_config());

    engine.find_and_hold(5, EMAIL).unwrap();
    assert!(matches!(
        engine.find_and_hold(5, EMAIL),
        Err(HoldError::NoCapacity { .. })
    ));

    sleep(Duration::from_millis(400)).await;

    // the full row merged back into one block
    let hold = engine.find_and_hold(5, EMAIL).unwrap();
    assert_eq!(hold.seats.len(), 5);

    engine.shutdown().await;
}
