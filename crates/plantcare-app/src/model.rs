// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ids::PlantId;

/// Category value that selects every plant.
pub const ALL_CATEGORIES: &str = "all";

/// Priority given to care levels that are not recognized. Sorts after every
/// known level.
pub const UNKNOWN_CARE_PRIORITY: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Succulent,
    Fern,
    Flowering,
    Foliage,
    Herb,
    Tropical,
    Bonsai,
    Cactus,
    Vine,
}

impl Category {
    pub const ALL: [Self; 9] = [
        Self::Succulent,
        Self::Fern,
        Self::Flowering,
        Self::Foliage,
        Self::Herb,
        Self::Tropical,
        Self::Bonsai,
        Self::Cactus,
        Self::Vine,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succulent => "succulent",
            Self::Fern => "fern",
            Self::Flowering => "flowering",
            Self::Foliage => "foliage",
            Self::Herb => "herb",
            Self::Tropical => "tropical",
            Self::Bonsai => "bonsai",
            Self::Cactus => "cactus",
            Self::Vine => "vine",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Succulent => "Succulent",
            Self::Fern => "Fern",
            Self::Flowering => "Flowering",
            Self::Foliage => "Foliage",
            Self::Herb => "Herb",
            Self::Tropical => "Tropical",
            Self::Bonsai => "Bonsai",
            Self::Cactus => "Cactus",
            Self::Vine => "Vine",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "succulent" => Some(Self::Succulent),
            "fern" => Some(Self::Fern),
            "flowering" => Some(Self::Flowering),
            "foliage" => Some(Self::Foliage),
            "herb" => Some(Self::Herb),
            "tropical" => Some(Self::Tropical),
            "bonsai" => Some(Self::Bonsai),
            "cactus" => Some(Self::Cactus),
            "vine" => Some(Self::Vine),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareLevel {
    Easy,
    Moderate,
    Difficult,
}

impl CareLevel {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Moderate, Self::Difficult];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Difficult => "difficult",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Moderate => "Moderate",
            Self::Difficult => "Difficult",
        }
    }

    /// Accepts any capitalisation plus the `medium`/`hard` spellings found in
    /// older records.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "moderate" | "medium" => Some(Self::Moderate),
            "difficult" | "hard" => Some(Self::Difficult),
            _ => None,
        }
    }

    pub const fn priority(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Moderate => 2,
            Self::Difficult => 3,
        }
    }
}

/// Sort priority for a raw care-level string. Total over all inputs.
pub fn care_priority(raw: &str) -> u8 {
    CareLevel::parse(raw).map_or(UNKNOWN_CARE_PRIORITY, CareLevel::priority)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Excellent,
    Healthy,
    Good,
    Fair,
    Wilting,
    Recovering,
    NeedsAttention,
    Poor,
}

impl HealthStatus {
    pub const ALL: [Self; 8] = [
        Self::Excellent,
        Self::Healthy,
        Self::Good,
        Self::Fair,
        Self::Wilting,
        Self::Recovering,
        Self::NeedsAttention,
        Self::Poor,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Healthy => "Healthy",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Wilting => "Wilting",
            Self::Recovering => "Recovering",
            Self::NeedsAttention => "Needs Attention",
            Self::Poor => "Poor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "excellent" => Some(Self::Excellent),
            "healthy" => Some(Self::Healthy),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "wilting" => Some(Self::Wilting),
            "recovering" => Some(Self::Recovering),
            "needs attention" => Some(Self::NeedsAttention),
            "poor" => Some(Self::Poor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Default,
    NextWatering,
    CareLevel,
    CareLevelReverse,
}

impl SortKey {
    pub const ALL: [Self; 4] = [
        Self::Default,
        Self::NextWatering,
        Self::CareLevel,
        Self::CareLevelReverse,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::NextWatering => "nextWatering",
            Self::CareLevel => "careLevel",
            Self::CareLevelReverse => "careLevelReverse",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default Order",
            Self::NextWatering => "Next Watering Date",
            Self::CareLevel => "Care Level (Easy → Hard)",
            Self::CareLevelReverse => "Care Level (Hard → Easy)",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "default" => Some(Self::Default),
            "nextWatering" | "next_watering" | "next-watering" => Some(Self::NextWatering),
            "careLevel" | "care_level" | "care-level" => Some(Self::CareLevel),
            "careLevelReverse" | "care_level_reverse" | "care-level-reverse" => {
                Some(Self::CareLevelReverse)
            }
            _ => None,
        }
    }
}

/// Category selection applied before sorting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(category) => category,
        }
    }

    pub fn matches(&self, record: &PlantRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => record.category == *category,
        }
    }
}

/// One tracked plant as stored by the plant API.
///
/// Enumerated fields stay as the raw strings the server holds so values this
/// client does not know about survive a read/modify/write cycle. Use the
/// typed accessors for ordering and display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlantRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<PlantId>,
    #[serde(deserialize_with = "null_as_empty")]
    pub image: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub plant_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub care_level: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub watering_frequency: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_watered_date: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub next_watering_date: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub health_status: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub user_email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub user_name: String,
}

impl PlantRecord {
    pub fn category_kind(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    pub fn care_level_kind(&self) -> Option<CareLevel> {
        CareLevel::parse(&self.care_level)
    }

    pub fn care_priority(&self) -> u8 {
        care_priority(&self.care_level)
    }

    /// Care level as shown to the user; aliases collapse onto one label.
    pub fn care_level_label(&self) -> &str {
        match self.care_level_kind() {
            Some(level) => level.label(),
            None => &self.care_level,
        }
    }

    pub fn health(&self) -> Option<HealthStatus> {
        HealthStatus::parse(&self.health_status)
    }

    pub fn next_watering(&self) -> Option<Date> {
        parse_calendar_date(&self.next_watering_date)
    }

    pub fn last_watered(&self) -> Option<Date> {
        parse_calendar_date(&self.last_watered_date)
    }

    /// True once the fields required for submission are present.
    pub fn is_complete(&self) -> bool {
        !self.plant_name.trim().is_empty() && !self.category.trim().is_empty()
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        !email.is_empty() && (self.user_email == email || self.user_name == email)
    }
}

/// Older documents carry explicit `null` for fields that were never filled.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
pub fn parse_calendar_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(date);
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .map(OffsetDateTime::date)
}
