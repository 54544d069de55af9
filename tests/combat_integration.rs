//! Player combat through a running session

use std::sync::Arc;
use std::time::Duration;

use conquest_core::core::config::GameConfig;
use conquest_core::core::types::{Army, CountryId, CountryStatus, Faction};
use conquest_core::state::{Country, Player};
use conquest_core::{GameSession, Rejection};

fn session(player_army: Army, defender: Army) -> Arc<GameSession> {
    let mut config = GameConfig::default();
    config.player.army = player_army;
    config.generator.min_interval = Duration::from_secs(3_600);
    config.generator.max_interval = Duration::from_secs(3_601);
    let session = GameSession::new(config).unwrap();
    session.seed_countries([Country::new("C1", "C1").with_army(defender)]);
    session.choose_faction(Faction::Alliance);
    session.select_country("C1");
    Arc::new(session)
}

#[tokio::test(start_paused = true)]
async fn test_infantry_against_infantry() {
    let s = session(Army::new(50, 0, 0, 0), Army::new(100, 0, 0, 0));
    s.start().unwrap();

    let report = s.attack_selected().await.unwrap();
    assert_eq!(report.force, Army::new(50, 0, 0, 0));
    assert_eq!(s.country("C1").unwrap().army, Army::new(50, 0, 0, 0));
    assert_eq!(s.player().army, Army::default());

    // nothing left to send
    assert_eq!(s.attack_selected().await, Err(Rejection::NoForce));
    s.stop();
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_attack_on_same_country_is_rejected() {
    let s = session(Player::default().army, Army::new(3_000, 100, 20, 20));
    s.start().unwrap();

    let first = {
        let s = Arc::clone(&s);
        tokio::spawn(async move { s.attack_selected().await })
    };
    tokio::time::sleep(Duration::from_millis(500)).await;

    let c1 = CountryId::from("C1");
    assert!(s.is_attacking(&c1));
    assert_eq!(s.country("C1").unwrap().status, CountryStatus::UnderAttack);
    assert_eq!(s.attack_selected().await, Err(Rejection::AttackInProgress));

    first.await.unwrap().unwrap();
    assert!(!s.is_attacking(&c1));
    assert_eq!(s.country("C1").unwrap().status, CountryStatus::Idle);
    // exactly one force was spent
    assert_eq!(s.player().army, Army::new(4_900, 190, 28, 28));
    s.stop();
}

#[tokio::test(start_paused = true)]
async fn test_repeated_attacks_never_go_negative() {
    let s = session(Army::new(5_000, 200, 30, 30), Army::new(150, 5, 1, 1));
    s.start().unwrap();

    for _ in 0..5 {
        s.attack_selected().await.unwrap();
    }
    assert_eq!(s.country("C1").unwrap().army, Army::default());
    assert_eq!(s.player().army, Army::new(4_500, 150, 20, 20));
    s.stop();
}

#[tokio::test(start_paused = true)]
async fn test_attack_lands_when_caller_stops_waiting() {
    let s = session(Army::new(50, 0, 0, 0), Army::new(100, 0, 0, 0));
    s.start().unwrap();

    let waited = tokio::time::timeout(Duration::from_secs(1), s.attack_selected()).await;
    assert!(waited.is_err());
    assert_eq!(s.player().army, Army::default());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(s.country("C1").unwrap().army, Army::new(50, 0, 0, 0));
    assert_eq!(s.country("C1").unwrap().status, CountryStatus::Idle);
    assert!(!s.is_attacking(&CountryId::from("C1")));
    s.stop();
}
