//! World data sources

pub mod loader;

pub use loader::{
    countries_from_geojson, fallback_countries, load_countries, load_countries_or_fallback,
};
