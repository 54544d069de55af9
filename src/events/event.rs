//! World events

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::CountryId;

/// A transient world event. Never persisted; each live subscriber sees it once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorldEvent {
    /// AI country attacks another AI country
    Attack {
        #[serde(rename = "fromCountryId")]
        from: CountryId,
        #[serde(rename = "toCountryId")]
        to: CountryId,
    },
    /// The player attacks a country with no intervening attacker
    PlayerDirectAttack {
        #[serde(rename = "toCountryId")]
        to: CountryId,
    },
    Rebel {
        #[serde(rename = "countryId")]
        country: CountryId,
    },
    Recover {
        #[serde(rename = "countryId")]
        country: CountryId,
    },
    Propaganda {
        #[serde(rename = "countryId")]
        country: CountryId,
    },
}

impl WorldEvent {
    pub fn attack(from: impl Into<CountryId>, to: impl Into<CountryId>) -> Self {
        WorldEvent::Attack {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn player_direct_attack(to: impl Into<CountryId>) -> Self {
        WorldEvent::PlayerDirectAttack { to: to.into() }
    }

    /// The country whose status the event affects
    pub fn target(&self) -> &CountryId {
        match self {
            WorldEvent::Attack { to, .. } | WorldEvent::PlayerDirectAttack { to } => to,
            WorldEvent::Rebel { country }
            | WorldEvent::Recover { country }
            | WorldEvent::Propaganda { country } => country,
        }
    }

    /// The attacking country, for AI-vs-AI attacks
    pub fn source(&self) -> Option<&CountryId> {
        match self {
            WorldEvent::Attack { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WorldEvent::Attack { .. } => "attack",
            WorldEvent::PlayerDirectAttack { .. } => "playerDirectAttack",
            WorldEvent::Rebel { .. } => "rebel",
            WorldEvent::Recover { .. } => "recover",
            WorldEvent::Propaganda { .. } => "propaganda",
        }
    }
}

impl fmt::Display for WorldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldEvent::Attack { from, to } => write!(f, "{} launches a missile at {}", from, to),
            WorldEvent::PlayerDirectAttack { to } => write!(f, "You strike {}", to),
            WorldEvent::Rebel { country } => write!(f, "{} rises in rebellion", country),
            WorldEvent::Recover { country } => write!(f, "{} begins to recover", country),
            WorldEvent::Propaganda { country } => write!(f, "Propaganda floods {}", country),
        }
    }
}
