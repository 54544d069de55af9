//! Game configuration with documented constants
//!
//! Every tunable number of the simulation lives here. Defaults reproduce the
//! standard game pacing; any field can be overridden from a TOML file, where
//! durations are written as integer milliseconds.

use std::ops::Range;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{Army, Meter, Resources, Stats};

/// Top-level configuration for one game session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub clock: ClockConfig,
    pub economy: EconomyConfig,
    pub combat: CombatConfig,
    pub generator: GeneratorConfig,
    pub status: StatusConfig,
    pub seeding: SeedingConfig,
    pub player: PlayerConfig,
    pub events: EventConfig,
}

// === CLOCK ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Real time per game day. Income is collected once per day.
    #[serde(with = "duration_ms")]
    pub day_duration: Duration,

    /// Day shown when a session starts
    pub start_day: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            day_duration: Duration::from_secs(30),
            start_day: 1,
        }
    }
}

// === ECONOMY ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Money spent per propaganda campaign
    pub propaganda_cost: u64,

    /// Loyalty raised per propaganda campaign (capped at 100)
    pub propaganda_loyalty_gain: u32,

    /// Loyalty lost per tax collection (floored at 0)
    pub tax_loyalty_cost: u32,

    /// Taxing requires at least this much loyalty
    pub min_tax_loyalty: u32,

    /// Loyalty a country starts with right after occupation
    pub occupy_loyalty: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            propaganda_cost: 100,
            propaganda_loyalty_gain: 10,
            tax_loyalty_cost: 10,
            min_tax_loyalty: 10,
            occupy_loyalty: 50,
        }
    }
}

// === COMBAT ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Most units of each type committed by a single attack
    pub attack_caps: Army,

    /// Defender infantry lost per attacking tank
    pub tank_vs_infantry: u32,

    /// Defender tanks lost per attacking warship
    pub warship_vs_tank: u32,

    /// Defender warships lost per attacking fighter
    pub fighter_vs_warship: u32,

    /// Defender fighters lost per attacking infantry (floored)
    pub infantry_vs_fighter: f64,

    /// Delay between attack submission and committed result
    #[serde(with = "duration_ms")]
    pub settle_delay: Duration,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_caps: Army::new(100, 10, 2, 2),
            tank_vs_infantry: 20,
            warship_vs_tank: 4,
            fighter_vs_warship: 4,
            infantry_vs_fighter: 1.5,
            settle_delay: Duration::from_secs(2),
        }
    }
}

// === WORLD EVENT GENERATOR ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Attackers per firing, inclusive bounds (capped at country count)
    pub min_attackers: usize,
    pub max_attackers: usize,

    /// Targets per attacker, inclusive bounds (capped at candidate count)
    pub min_targets: usize,
    pub max_targets: usize,

    /// Delay before each firing is drawn uniformly from [min, max)
    #[serde(with = "duration_ms")]
    pub min_interval: Duration,
    #[serde(with = "duration_ms")]
    pub max_interval: Duration,

    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_attackers: 5,
            max_attackers: 10,
            min_targets: 1,
            max_targets: 10,
            min_interval: Duration::from_millis(2_000),
            max_interval: Duration::from_millis(17_000),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn interval_range(&self) -> Range<Duration> {
        self.min_interval..self.max_interval
    }
}

// === STATUS REVERTS ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// UnderAttack -> Recovering after occupation
    #[serde(with = "duration_ms")]
    pub occupy_revert: Duration,

    /// Rebelling -> Idle after taxing
    #[serde(with = "duration_ms")]
    pub tax_revert: Duration,

    /// Propaganda -> Idle
    #[serde(with = "duration_ms")]
    pub propaganda_revert: Duration,

    /// UnderAttack -> Idle after an AI attack lands
    #[serde(with = "duration_ms")]
    pub ai_attack_revert: Duration,

    /// UnderAttack -> Idle after a player direct attack
    #[serde(with = "duration_ms")]
    pub player_attack_revert: Duration,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            occupy_revert: Duration::from_secs(3),
            tax_revert: Duration::from_secs(2),
            propaganda_revert: Duration::from_secs(2),
            ai_attack_revert: Duration::from_secs(3),
            player_attack_revert: Duration::from_secs(2),
        }
    }
}

// === COUNTRY SEEDING ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    /// Population drawn uniformly from [min, max)
    pub min_population: u64,
    pub max_population: u64,

    /// Daily income drawn uniformly from [min, max)
    pub min_income: u64,
    pub max_income: u64,

    pub initial_loyalty: u32,
    pub initial_army: Army,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            min_population: 1_000_000,
            max_population: 101_000_000,
            min_income: 100,
            max_income: 1_100,
            initial_loyalty: 50,
            initial_army: Army::new(3_000, 100, 20, 20),
        }
    }
}

// === PLAYER ===

/// Avatar shown for the starting player profile
pub const DEFAULT_AVATAR: &str =
    "https://img.tapimg.net/market/images/baa6298b562087e18e936f47f4def1ab.png/appicon?t=1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub resources: Resources,
    pub army: Army,
    pub stats: Stats,
    pub health: Meter,
    pub energy: Meter,
    pub experience: Meter,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "mumu".into(),
            avatar: DEFAULT_AVATAR.to_string(),
            level: 10,
            resources: Resources {
                money: 1_000_000,
                soldiers: 1_000_000,
                crystals: 1_000_000,
                power: 1_000_000,
            },
            army: Army::new(5_000, 200, 30, 30),
            stats: Stats::default(),
            health: Meter::full(100),
            energy: Meter::full(100),
            experience: Meter::new(0, 1_000_000),
        }
    }
}

// === EVENTS ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Recent events kept by the event feed
    pub feed_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { feed_capacity: 30 }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.clock.day_duration.is_zero() {
            return Err(invalid("clock.day_duration must be positive"));
        }

        let g = &self.generator;
        if g.min_attackers == 0 || g.min_attackers > g.max_attackers {
            return Err(invalid(format!(
                "generator attacker range [{}, {}] is empty or starts at zero",
                g.min_attackers, g.max_attackers
            )));
        }
        if g.min_targets == 0 || g.min_targets > g.max_targets {
            return Err(invalid(format!(
                "generator target range [{}, {}] is empty or starts at zero",
                g.min_targets, g.max_targets
            )));
        }
        if g.min_interval.is_zero() || g.min_interval >= g.max_interval {
            return Err(invalid(format!(
                "generator interval [{:?}, {:?}) is empty or starts at zero",
                g.min_interval, g.max_interval
            )));
        }

        let s = &self.seeding;
        if s.min_population >= s.max_population {
            return Err(invalid("seeding population range is empty"));
        }
        if s.min_income >= s.max_income {
            return Err(invalid("seeding income range is empty"));
        }
        if s.initial_loyalty > 100 || self.economy.occupy_loyalty > 100 {
            return Err(invalid("loyalty values must be within [0, 100]"));
        }

        if self.combat.infantry_vs_fighter < 0.0 || !self.combat.infantry_vs_fighter.is_finite() {
            return Err(invalid(
                "combat.infantry_vs_fighter must be a finite non-negative number",
            ));
        }
        if self.events.feed_capacity == 0 {
            return Err(invalid("events.feed_capacity must be positive"));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> GameError {
    GameError::InvalidConfig(msg.into())
}

/// Serialize `Duration` as integer milliseconds
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clock.day_duration, Duration::from_secs(30));
        assert_eq!(config.economy.propaganda_cost, 100);
        assert_eq!(config.combat.attack_caps, Army::new(100, 10, 2, 2));
    }

    #[test]
    fn test_default_player_profile() {
        let player = PlayerConfig::default();
        assert_eq!(player.name, "mumu");
        assert_eq!(player.avatar, DEFAULT_AVATAR);
        assert!(player.avatar.starts_with("https://"));
        assert_eq!(player.level, 10);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [clock]
            day_duration = 1000

            [economy]
            propaganda_cost = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.clock.day_duration, Duration::from_secs(1));
        assert_eq!(config.clock.start_day, 1);
        assert_eq!(config.economy.propaganda_cost, 250);
        assert_eq!(config.economy.tax_loyalty_cost, 10);
        assert_eq!(config.status, StatusConfig::default());
    }

    #[test]
    fn test_army_fields_parse_from_toml() {
        let config = GameConfig::from_toml_str(
            r#"
            [combat.attack_caps]
            infantry = 50
            tank = 5
            warship = 1
            fighter = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.combat.attack_caps, Army::new(50, 5, 1, 1));
    }

    #[test]
    fn test_validate_rejects_empty_attacker_range() {
        let mut config = GameConfig::default();
        config.generator.min_attackers = 11;
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_day() {
        let mut config = GameConfig::default();
        config.clock.day_duration = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = GameConfig::from_toml_str("[clock\nday_duration = ").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse(_)));
    }
}
