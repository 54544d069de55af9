use std::fmt;

use thiserror::Error;

/// Failures that are real errors (configuration, data loading, lifecycle).
///
/// Game actions never produce these; they report an [`ActionOutcome`].
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid geographic data: {0}")]
    InvalidGeoData(String),

    #[error("Game session already started")]
    AlreadyStarted,

    #[error("No tokio runtime to run the game loop on")]
    NoRuntime,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Why a game action did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// No country with the given id exists
    UnknownCountry,
    /// Occupy on a country the player already owns
    AlreadyOwned,
    /// Tax or propaganda on a country the player does not own
    NotOwned,
    /// Tax with loyalty below the minimum
    InsufficientLoyalty,
    /// Propaganda without enough money
    InsufficientFunds,
    /// Combat with no selected country
    NoSelection,
    /// Combat before the player picked a faction
    PlayerNotReady,
    /// Combat with nothing left to commit
    NoForce,
    /// Combat against a country whose previous attack has not settled
    AttackInProgress,
    /// The runtime shut down before the attack settled
    Interrupted,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::UnknownCountry => "unknown country",
            Rejection::AlreadyOwned => "country already owned",
            Rejection::NotOwned => "country not owned by player",
            Rejection::InsufficientLoyalty => "loyalty too low",
            Rejection::InsufficientFunds => "not enough money",
            Rejection::NoSelection => "no country selected",
            Rejection::PlayerNotReady => "player has not chosen a faction",
            Rejection::NoForce => "no army available",
            Rejection::AttackInProgress => "attack already in progress",
            Rejection::Interrupted => "attack interrupted before it settled",
        };
        f.write_str(reason)
    }
}

/// Result of a game action. Rejected actions leave all state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionOutcome {
    Applied,
    Rejected(Rejection),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            ActionOutcome::Applied => None,
            ActionOutcome::Rejected(r) => Some(*r),
        }
    }
}

impl From<Rejection> for ActionOutcome {
    fn from(rejection: Rejection) -> Self {
        ActionOutcome::Rejected(rejection)
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Applied => f.write_str("applied"),
            ActionOutcome::Rejected(r) => write!(f, "rejected: {}", r),
        }
    }
}
