//! Seed countries from GeoJSON
//!
//! Each named feature of a FeatureCollection becomes one Neutral country
//! with randomized population and income. When no dataset is available the
//! four built-in countries are used instead.

use std::collections::BTreeSet;
use std::path::Path;

use geo::BoundingRect;
use geo_types::{Coord, LineString};
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::config::SeedingConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{Army, GeoPoint, Owner};
use crate::state::Country;

type Position = Vec<f64>;
type Ring = Vec<Position>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Other,
}

impl Geometry {
    /// Outer ring of the polygon, or of the first polygon
    fn first_ring(&self) -> Option<&Ring> {
        match self {
            Geometry::Polygon { coordinates } => coordinates.first(),
            Geometry::MultiPolygon { coordinates } => coordinates.first()?.first(),
            Geometry::Other => None,
        }
    }
}

/// Bounding-box center of a ring
fn ring_center(ring: &Ring) -> Option<GeoPoint> {
    let coords: Vec<Coord<f64>> = ring
        .iter()
        .filter_map(|p| match p.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect();
    let center = LineString::new(coords).bounding_rect()?.center();
    Some(GeoPoint::new(center.x, center.y))
}

/// Parse a FeatureCollection into freshly seeded countries.
///
/// Unnamed features are skipped; a repeated name keeps its first feature.
pub fn countries_from_geojson<R: Rng>(
    json: &str,
    config: &SeedingConfig,
    rng: &mut R,
) -> Result<Vec<Country>> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    if collection.kind != "FeatureCollection" {
        return Err(GameError::InvalidGeoData(format!(
            "expected a FeatureCollection, got {}",
            collection.kind
        )));
    }

    let mut seen = BTreeSet::new();
    let mut countries = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let Some(name) = feature.properties.and_then(|p| p.name) else {
            debug!("skipping unnamed feature");
            continue;
        };
        if !seen.insert(name.clone()) {
            debug!(%name, "skipping duplicate feature");
            continue;
        }

        let mut country = Country::new(name.clone(), name)
            .with_population(rng.gen_range(config.min_population..config.max_population))
            .with_income(rng.gen_range(config.min_income..config.max_income))
            .with_loyalty(config.initial_loyalty)
            .with_army(config.initial_army);
        let center = feature
            .geometry
            .as_ref()
            .and_then(Geometry::first_ring)
            .and_then(ring_center);
        if let Some(center) = center {
            country = country.with_center(center);
        }
        countries.push(country);
    }

    Ok(countries)
}

/// Read and parse a GeoJSON file
pub fn load_countries<R: Rng>(
    path: &Path,
    config: &SeedingConfig,
    rng: &mut R,
) -> Result<Vec<Country>> {
    let content = std::fs::read_to_string(path)?;
    countries_from_geojson(&content, config, rng)
}

/// Like [`load_countries`], but falls back to the built-in countries when
/// the file is missing, unreadable or holds no usable features.
pub fn load_countries_or_fallback<R: Rng>(
    path: &Path,
    config: &SeedingConfig,
    rng: &mut R,
) -> Vec<Country> {
    match load_countries(path, config, rng) {
        Ok(countries) if !countries.is_empty() => countries,
        Ok(_) => {
            warn!(
                path = %path.display(),
                "dataset has no named features, using built-in countries"
            );
            fallback_countries()
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "failed to load countries, using built-in countries"
            );
            fallback_countries()
        }
    }
}

/// Built-in world used when no dataset can be loaded
pub fn fallback_countries() -> Vec<Country> {
    let seed = |name: &str, owner, population, loyalty, income| {
        Country::new(name, name)
            .with_owner(owner)
            .with_population(population)
            .with_loyalty(loyalty)
            .with_income(income)
            .with_army(Army::new(3_000, 100, 20, 20))
    };

    vec![
        seed("Alpha", Owner::Player, 1_000_000, 80, 500),
        seed("Bravo", Owner::Other, 800_000, 60, 400),
        seed("Charlie", Owner::Neutral, 600_000, 50, 300),
        seed("Delta", Owner::Other, 1_200_000, 70, 600),
    ]
}
