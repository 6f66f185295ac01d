use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod catalog;
pub mod filters;
pub mod media;
pub mod theme;
pub mod user_lists;

pub use filters::{Filters, GenreDirection, QuickGenrePolicy};
pub use media::{CastMember, MediaDetail, PersonDetail, SearchHit, SearchHitKind, TitleRef, Trailer};
pub use theme::{Accent, AccentPalette, DisplayPreferences};
pub use user_lists::{ListEntry, ListKind, UserList};

/// Catalog id of a movie or show
pub type MediaId = u64;
/// Catalog genre id, scoped per media type
pub type GenreId = u64;
/// Catalog watch-provider (platform) id
pub type ProviderId = u64;

/// Query parameters for a catalog call. Ordered so that derivations are
/// deterministic and comparable.
pub type QueryParams = BTreeMap<String, String>;

/// Which endpoint family is queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Show,
}

impl MediaType {
    /// Path segment used by the catalog API
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "tv",
        }
    }
}

impl FromStr for MediaType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Show),
            other => Err(AppError::InvalidInput(format!(
                "Unknown media type '{}', expected 'movie' or 'tv'",
                other
            ))),
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

/// ISO 3166-1 alpha-2 country code gating catalog and provider queries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Region(code.to_ascii_uppercase()))
        } else {
            Err(AppError::InvalidInput(format!(
                "'{}' is not a two-letter country code",
                s
            )))
        }
    }
}

impl TryFrom<String> for Region {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Countries with strong streaming coverage, surfaced first in region pickers
pub const FEATURED_REGIONS: &[&str] = &[
    "US", "GB", "CA", "AU", "DE", "FR", "ES", "IT", "JP", "KR", "BR", "MX", "IN", "NL", "SE",
    "AR", "AT", "BE", "CH", "CL", "CO", "CZ", "DK", "FI", "HK", "HU", "ID", "IE", "IL", "MY",
    "NZ", "NO", "PE", "PH", "PL", "PT", "RO", "RU", "SA", "SG", "TH", "TR", "AE", "ZA", "TW",
    "EG", "GR", "NG",
];

/// A selectable country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub code: String,
    pub name: String,
    pub featured: bool,
}

/// A catalog genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// A streaming platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub logo: Option<String>,
}

/// Joins a relative catalog image path onto the image base URL.
/// Missing or empty paths yield `None`.
pub fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", base.trim_end_matches('/'), p))
}

/// First four characters of a catalog date ("2010-07-16" -> "2010")
pub fn year_of(date: Option<&str>) -> Option<String> {
    date.and_then(|d| d.get(..4)).map(str::to_string)
}
