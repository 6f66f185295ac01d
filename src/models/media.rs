use serde::{Deserialize, Serialize};

use super::{MediaId, MediaType, Provider};

/// At most this many cast members are kept on a detail
pub const MAX_CAST: usize = 10;
/// At most this many similar titles are kept on a detail
pub const MAX_SIMILAR: usize = 12;
/// At most this many credits are listed on a person
pub const MAX_KNOWN_FOR: usize = 12;

/// Display-ready record for one recommended or looked-up title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetail {
    pub id: MediaId,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<String>,
    pub poster: Option<String>,
    /// Average vote rounded to one decimal
    pub rating: f64,
    pub overview: String,
    pub subscription_providers: Vec<Provider>,
    pub rent_buy_providers: Vec<Provider>,
    /// Provider landing page for the region, when the catalog has one
    pub watch_link: Option<String>,
    pub cast: Vec<CastMember>,
    pub similar: Vec<TitleRef>,
    pub trailer: Option<Trailer>,
    pub runtime_minutes: Option<u32>,
    pub certification: Option<String>,
    pub director: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile: Option<String>,
}

/// Reference to another title, e.g. a similar title or a person's credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRef {
    pub id: MediaId,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<String>,
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub name: String,
    pub site: String,
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchHitKind {
    Movie,
    Tv,
    Person,
}

impl SearchHitKind {
    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            SearchHitKind::Movie => Some(MediaType::Movie),
            SearchHitKind::Tv => Some(MediaType::Show),
            SearchHitKind::Person => None,
        }
    }
}

/// One row of a multi-type text search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub kind: SearchHitKind,
    pub id: u64,
    pub title: String,
    pub year: Option<String>,
    /// Poster for titles, profile picture for people
    pub poster: Option<String>,
}

/// A cast member's page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDetail {
    pub id: u64,
    pub name: String,
    pub biography: String,
    pub profile: Option<String>,
    pub known_for_department: Option<String>,
    pub known_for: Vec<TitleRef>,
}
