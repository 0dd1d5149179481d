//! Payload schemas, the rarity enumeration, and the catalog error taxonomy.

use crate::store::StoreError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

/// Collection holding character documents.
pub const CHARACTER_COLLECTION: &str = "character";
/// Collection holding item documents.
pub const ITEM_COLLECTION: &str = "item";

/// Errors produced while validating and persisting catalog payloads.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Rarity value is outside the fixed enumeration.
    #[error("Invalid rarity '{0}': expected one of Common, Rare, Epic, Legendary, Champion")]
    InvalidRarity(String),
    /// Document store interaction failed.
    #[error("Document store request failed: {0}")]
    Store(#[from] StoreError),
}

/// Closed set of rarity tiers shared by characters and items.
///
/// External input arrives as text and is checked through [`FromStr`] at the
/// validation boundary; stored records are never re-validated on read.
///
/// [`FromStr`]: std::str::FromStr
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rarity {
    /// Baseline tier.
    Common,
    /// Uncommon drops.
    Rare,
    /// High-value drops.
    Epic,
    /// Top conventional tier.
    Legendary,
    /// Event-exclusive tier.
    Champion,
}

impl Rarity {
    /// Canonical labels accepted on input, in ascending tier order.
    pub const LABELS: [&'static str; 5] = ["Common", "Rare", "Epic", "Legendary", "Champion"];

    /// Canonical text label for the tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Champion => "Champion",
        }
    }
}

impl std::str::FromStr for Rarity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Common" => Ok(Self::Common),
            "Rare" => Ok(Self::Rare),
            "Epic" => Ok(Self::Epic),
            "Legendary" => Ok(Self::Legendary),
            "Champion" => Ok(Self::Champion),
            _ => Err(()),
        }
    }
}

/// Validate a rarity label taken from external input.
pub(crate) fn validate_rarity(value: &str) -> Result<Rarity, CatalogError> {
    value
        .parse()
        .map_err(|()| CatalogError::InvalidRarity(value.to_string()))
}

/// Payload accepted when creating a character.
///
/// Shape checking (required fields, URL well-formedness, field types) happens
/// during deserialization; the rarity text is validated separately so an
/// out-of-set value is reported as an enumeration error rather than a shape
/// error.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Character")]
pub struct NewCharacter {
    /// Display name.
    pub name: String,
    /// One of Common, Rare, Epic, Legendary, Champion.
    pub rarity: String,
    /// Optional ISO-style nation code (e.g. CAN, USA).
    #[serde(default)]
    pub nation_code: Option<String>,
    /// Optional role descriptor.
    #[serde(default)]
    pub role: Option<String>,
    /// Optional free-form biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Optional artwork URL.
    #[serde(default)]
    pub image_url: Option<Url>,
    /// Optional named color swatches.
    #[serde(default)]
    pub palette: Option<BTreeMap<String, String>>,
    /// Optional integer stat block.
    #[serde(default)]
    pub stats: Option<BTreeMap<String, i64>>,
    /// Free-form tags, preserved in order.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload accepted when creating an item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Item")]
pub struct NewItem {
    /// Display name.
    pub name: String,
    /// Item category (e.g. Weapon).
    #[serde(rename = "type")]
    pub kind: String,
    /// One of Common, Rare, Epic, Legendary, Champion.
    pub rarity: String,
    /// Optional effect description.
    #[serde(default)]
    pub effect: Option<String>,
    /// Optional artwork URL.
    #[serde(default)]
    pub image_url: Option<Url>,
    /// Free-form tags, preserved in order.
    #[serde(default)]
    pub tags: Vec<String>,
}
