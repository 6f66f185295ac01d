//! Wire types for the TMDB v3 responses the picker consumes.
//!
//! Everything optional on the wire is `#[serde(default)]` so that a sparse
//! record still decodes; normalization decides what to drop.

use serde::Deserialize;
use std::collections::HashMap;

use super::{
    image_url, year_of, Genre, GenreId, MediaId, MediaType, Provider, ProviderId, RegionInfo,
    SearchHit, SearchHitKind, TitleRef, FEATURED_REGIONS,
};

// ============================================================================
// Vocabularies
// ============================================================================

/// Entry of `configuration/countries`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountry {
    pub iso_3166_1: String,
    pub english_name: String,
}

impl From<ApiCountry> for RegionInfo {
    fn from(country: ApiCountry) -> Self {
        let featured = FEATURED_REGIONS.contains(&country.iso_3166_1.as_str());
        RegionInfo {
            code: country.iso_3166_1,
            name: country.english_name,
            featured,
        }
    }
}

/// Response of `genre/{media}/list`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenreList {
    #[serde(default)]
    pub genres: Vec<ApiGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenre {
    pub id: GenreId,
    pub name: String,
}

impl From<ApiGenre> for Genre {
    fn from(genre: ApiGenre) -> Self {
        Genre {
            id: genre.id,
            name: genre.name,
        }
    }
}

/// Response of `watch/providers/{media}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProviderList {
    #[serde(default)]
    pub results: Vec<ApiProvider>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiProvider {
    pub provider_id: ProviderId,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: Option<i64>,
}

impl ApiProvider {
    pub fn into_provider(self, image_base: &str) -> Provider {
        Provider {
            id: self.provider_id,
            logo: image_url(image_base, self.logo_path.as_deref()),
            name: self.provider_name,
        }
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// One page of a `discover/{media}` or `similar` listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// A discovery result row
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMediaItem {
    pub id: MediaId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub overview: String,
    /// Only present on multi-typed listings (search, person credits)
    #[serde(default)]
    pub media_type: Option<String>,
}

impl ApiMediaItem {
    /// Movies carry `title`, shows carry `name`
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }

    pub fn year(&self) -> Option<String> {
        year_of(
            self.release_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .or(self.first_air_date.as_deref()),
        )
    }

    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn into_title_ref(self, media_type: MediaType, image_base: &str) -> TitleRef {
        TitleRef {
            id: self.id,
            media_type,
            title: self.display_title(),
            year: self.year(),
            poster: image_url(image_base, self.poster_path.as_deref()),
        }
    }
}

// ============================================================================
// Details
// ============================================================================

/// Response of `{media}/{id}` with appended credits, videos, similar titles,
/// providers and certifications
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMediaDetails {
    pub id: MediaId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub created_by: Vec<ApiCreator>,
    #[serde(default)]
    pub credits: Option<ApiCredits>,
    #[serde(default)]
    pub similar: Option<ApiPage<ApiMediaItem>>,
    #[serde(default)]
    pub videos: Option<ApiResults<Vec<ApiVideo>>>,
    #[serde(default, rename = "watch/providers")]
    pub watch_providers: Option<ApiResults<HashMap<String, ApiRegionProviders>>>,
    #[serde(default)]
    pub release_dates: Option<ApiResults<Vec<ApiCountryReleases>>>,
    #[serde(default)]
    pub content_ratings: Option<ApiResults<Vec<ApiContentRating>>>,
}

/// The `{ "results": ... }` envelope used by appended payloads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResults<T> {
    pub results: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCreator {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCredits {
    #[serde(default)]
    pub cast: Vec<ApiCastMember>,
    #[serde(default)]
    pub crew: Vec<ApiCrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiVideo {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(default, rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
}

/// Providers for one region
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiRegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<ApiProvider>,
    #[serde(default)]
    pub rent: Vec<ApiProvider>,
    #[serde(default)]
    pub buy: Vec<ApiProvider>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountryReleases {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<ApiReleaseDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiReleaseDate {
    #[serde(default)]
    pub certification: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiContentRating {
    pub iso_3166_1: String,
    #[serde(default)]
    pub rating: String,
}

// ============================================================================
// Search & people
// ============================================================================

/// A `search/multi` row; titles and people share the listing
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSearchItem {
    pub id: u64,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl ApiSearchItem {
    /// `None` for row types the picker does not show (e.g. collections)
    pub fn into_hit(self, image_base: &str) -> Option<SearchHit> {
        let kind = match self.media_type.as_str() {
            "movie" => SearchHitKind::Movie,
            "tv" => SearchHitKind::Tv,
            "person" => SearchHitKind::Person,
            _ => return None,
        };

        let picture = match kind {
            SearchHitKind::Person => self.profile_path.as_deref(),
            _ => self.poster_path.as_deref(),
        };

        Some(SearchHit {
            kind,
            id: self.id,
            poster: image_url(image_base, picture),
            year: year_of(
                self.release_date
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .or(self.first_air_date.as_deref()),
            ),
            title: self.title.or(self.name).unwrap_or_default(),
        })
    }
}

/// Response of `person/{id}` with appended combined credits
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPerson {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub combined_credits: Option<ApiCombinedCredits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCombinedCredits {
    #[serde(default)]
    pub cast: Vec<ApiMediaItem>,
}
