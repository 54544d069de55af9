//! Core type definitions used throughout the codebase

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a game session (used in log spans)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stable, human-readable country key (the geographic name in practice)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryId(pub String);

impl CountryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CountryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for CountryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Who controls a country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Neutral,
    #[serde(rename = "You")]
    Player,
    Other,
}

/// Per-country status. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CountryStatus {
    #[default]
    Idle,
    UnderAttack,
    Rebelling,
    Propaganda,
    Recovering,
}

impl fmt::Display for CountryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CountryStatus::Idle => "Idle",
            CountryStatus::UnderAttack => "UnderAttack",
            CountryStatus::Rebelling => "Rebelling",
            CountryStatus::Propaganda => "Propaganda",
            CountryStatus::Recovering => "Recovering",
        };
        f.write_str(label)
    }
}

/// Player faction, chosen at game start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Alliance,
    Empire,
}

/// The four unit types every army is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Infantry,
    Tank,
    Warship,
    Fighter,
}

impl UnitType {
    pub const ALL: [UnitType; 4] = [
        UnitType::Infantry,
        UnitType::Tank,
        UnitType::Warship,
        UnitType::Fighter,
    ];
}

/// Unit counts per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Army {
    pub infantry: u32,
    pub tank: u32,
    pub warship: u32,
    pub fighter: u32,
}

impl Army {
    pub const fn new(infantry: u32, tank: u32, warship: u32, fighter: u32) -> Self {
        Self {
            infantry,
            tank,
            warship,
            fighter,
        }
    }

    pub fn get(&self, unit: UnitType) -> u32 {
        match unit {
            UnitType::Infantry => self.infantry,
            UnitType::Tank => self.tank,
            UnitType::Warship => self.warship,
            UnitType::Fighter => self.fighter,
        }
    }

    pub fn get_mut(&mut self, unit: UnitType) -> &mut u32 {
        match unit {
            UnitType::Infantry => &mut self.infantry,
            UnitType::Tank => &mut self.tank,
            UnitType::Warship => &mut self.warship,
            UnitType::Fighter => &mut self.fighter,
        }
    }

    /// Total number of units across all types
    pub fn total(&self) -> u64 {
        UnitType::ALL.iter().map(|&u| u64::from(self.get(u))).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Per-type minimum of this army and `caps`
    pub fn capped(&self, caps: &Army) -> Army {
        let mut out = Army::default();
        for unit in UnitType::ALL {
            *out.get_mut(unit) = self.get(unit).min(caps.get(unit));
        }
        out
    }

    /// Per-type subtraction clamped at zero
    pub fn saturating_sub(&self, other: &Army) -> Army {
        let mut out = *self;
        for unit in UnitType::ALL {
            *out.get_mut(unit) = self.get(unit).saturating_sub(other.get(unit));
        }
        out
    }
}

/// Fungible player counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    pub money: u64,
    pub soldiers: u64,
    pub crystals: u64,
    pub power: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            attack: 100,
            defense: 100,
            speed: 100,
        }
    }
}

/// A bounded current/max counter (health, energy, experience)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    pub current: u64,
    pub max: u64,
}

impl Meter {
    pub fn new(current: u64, max: u64) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn full(max: u64) -> Self {
        Self { current: max, max }
    }
}

/// Geographic point (longitude/latitude degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}
