//! Product categories and their category-specific attributes.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The three toy categories the store sells.
///
/// Serialized exactly as the backend spells them: `Electronic`, `Plush`,
/// `BoardGame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Electronic,
    Plush,
    BoardGame,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Electronic, Self::Plush, Self::BoardGame];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronic => "Electronic",
            Self::Plush => "Plush",
            Self::BoardGame => "BoardGame",
        }
    }

    /// Attribute keys that make sense for this category.
    #[must_use]
    pub const fn attribute_keys(self) -> [&'static str; 2] {
        match self {
            Self::Electronic => ["batteryType", "voltage"],
            Self::Plush => ["material", "size"],
            Self::BoardGame => ["ageRange", "numberOfPlayers"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Case-insensitive; also accepts `board-game` and `board_game`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match squashed.as_str() {
            "electronic" | "electronics" => Ok(Self::Electronic),
            "plush" => Ok(Self::Plush),
            "boardgame" | "boardgames" => Ok(Self::BoardGame),
            _ => Err(format!(
                "invalid category: {s} (expected Electronic, Plush or BoardGame)"
            )),
        }
    }
}

/// Category-specific product attributes.
///
/// Known keys are typed; anything else the backend sends is kept in
/// `extra` so an edit round-trips without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_players: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CategoryAttributes {
    /// Set a known attribute by its wire key. Unknown keys land in `extra`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "batteryType" => self.battery_type = Some(value),
            "voltage" => self.voltage = Some(value),
            "material" => self.material = Some(value),
            "size" => self.size = Some(value),
            "ageRange" => self.age_range = Some(value),
            "numberOfPlayers" => self.number_of_players = Some(value),
            other => {
                self.extra
                    .insert(other.to_owned(), serde_json::Value::String(value));
            }
        }
    }

    /// Known attributes that are set, as `(wire key, value)` pairs.
    #[must_use]
    pub fn known(&self) -> Vec<(&'static str, &str)> {
        [
            ("batteryType", &self.battery_type),
            ("voltage", &self.voltage),
            ("material", &self.material),
            ("size", &self.size),
            ("ageRange", &self.age_range),
            ("numberOfPlayers", &self.number_of_players),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known().is_empty() && self.extra.is_empty()
    }
}
