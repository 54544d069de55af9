//! Seeding a session from GeoJSON

use std::io::Write;

use conquest_core::core::config::{GameConfig, SeedingConfig};
use conquest_core::core::types::{CountryStatus, Owner};
use conquest_core::world::{load_countries, load_countries_or_fallback};
use conquest_core::GameSession;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const WORLD: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "name": "North" },
          "geometry": { "type": "Polygon",
                        "coordinates": [[[0, 10], [4, 10], [4, 20], [0, 10]]] } },
        { "type": "Feature", "properties": { "name": "South" },
          "geometry": { "type": "Polygon",
                        "coordinates": [[[0, -10], [4, -10], [4, -20], [0, -10]]] } },
        { "type": "Feature", "properties": { "name": "East" }, "geometry": null }
    ]
}"#;

fn write_world(contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir()
        .join(format!("conquest-world-{}.geojson", uuid::Uuid::new_v4()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_from_file_seeds_a_session() {
    let path = write_world(WORLD);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let countries = load_countries(&path, &SeedingConfig::default(), &mut rng).unwrap();
    std::fs::remove_file(&path).unwrap();

    let session = GameSession::new(GameConfig::default()).unwrap();
    session.seed_countries(countries);

    let all = session.countries();
    assert_eq!(all.len(), 3);
    for c in &all {
        assert_eq!(c.owner, Owner::Neutral);
        assert_eq!(c.status, CountryStatus::Idle);
    }
    assert_eq!(session.player().owned_countries, 0);
    assert!(session.country("East").unwrap().center.is_none());
    let north = session.country("North").unwrap();
    assert_eq!(north.center.map(|c| c.lat), Some(15.0));
}

#[test]
fn test_same_seed_same_world() {
    let path = write_world(WORLD);
    let cfg = SeedingConfig::default();
    let a = load_countries(&path, &cfg, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();
    let b = load_countries(&path, &cfg, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_empty_collection_falls_back() {
    let path = write_world(r#"{"type": "FeatureCollection", "features": []}"#);
    let countries = load_countries_or_fallback(
        &path,
        &SeedingConfig::default(),
        &mut ChaCha8Rng::seed_from_u64(1),
    );
    std::fs::remove_file(&path).unwrap();

    let names: Vec<String> = countries.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "Charlie", "Delta"]);
}
