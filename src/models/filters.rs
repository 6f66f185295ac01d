use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{GenreId, ProviderId, QueryParams, Region};

/// Current layout of persisted filters
pub const FILTERS_VERSION: u32 = 1;

/// Minimum vote count for regular discovery
pub const DEFAULT_MIN_VOTES: u32 = 100;
/// Minimum vote count when the indie toggle is on
pub const INDIE_MIN_VOTES: u32 = 10;

/// How a quick genre interacts with the advanced include/exclude sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickGenrePolicy {
    /// Quick genre and advanced sets coexist; the quick genre is OR-ed into
    /// the include list
    #[default]
    Independent,
    /// Quick genre and advanced sets are mutually exclusive
    ClearsAdvanced,
}

/// Which advanced genre set a toggle targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenreDirection {
    Include,
    Exclude,
}

/// The user's active discovery constraints.
///
/// Fields are only reachable through accessors; every change goes through
/// the toggle methods below, which keep one invariant: a genre id is never
/// both required and forbidden (the quick genre counts as required).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FiltersRecord")]
pub struct Filters {
    version: u32,
    quick_genre: Option<GenreId>,
    include_genres: BTreeSet<GenreId>,
    exclude_genres: BTreeSet<GenreId>,
    platforms: BTreeSet<ProviderId>,
    indie: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            version: FILTERS_VERSION,
            quick_genre: None,
            include_genres: BTreeSet::new(),
            exclude_genres: BTreeSet::new(),
            platforms: BTreeSet::new(),
            indie: false,
        }
    }
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn quick_genre(&self) -> Option<GenreId> {
        self.quick_genre
    }

    pub fn include_genres(&self) -> &BTreeSet<GenreId> {
        &self.include_genres
    }

    pub fn exclude_genres(&self) -> &BTreeSet<GenreId> {
        &self.exclude_genres
    }

    pub fn platforms(&self) -> &BTreeSet<ProviderId> {
        &self.platforms
    }

    pub fn indie(&self) -> bool {
        self.indie
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Selects `id` as the quick genre, or clears it if it already is
    pub fn toggle_quick_genre(&mut self, id: GenreId, policy: QuickGenrePolicy) {
        if self.quick_genre == Some(id) {
            self.quick_genre = None;
            return;
        }

        self.quick_genre = Some(id);
        match policy {
            QuickGenrePolicy::Independent => {
                self.exclude_genres.remove(&id);
            }
            QuickGenrePolicy::ClearsAdvanced => {
                self.include_genres.clear();
                self.exclude_genres.clear();
            }
        }
    }

    /// Flips membership of `id` in the include or exclude set. Adding to one
    /// set removes it from the other.
    pub fn toggle_genre(&mut self, id: GenreId, direction: GenreDirection, policy: QuickGenrePolicy) {
        let (target, other) = match direction {
            GenreDirection::Include => (&mut self.include_genres, &mut self.exclude_genres),
            GenreDirection::Exclude => (&mut self.exclude_genres, &mut self.include_genres),
        };

        if !target.remove(&id) {
            other.remove(&id);
            target.insert(id);
        }

        let excludes_quick = direction == GenreDirection::Exclude
            && self.quick_genre == Some(id)
            && self.exclude_genres.contains(&id);
        if excludes_quick || policy == QuickGenrePolicy::ClearsAdvanced {
            self.quick_genre = None;
        }
    }

    pub fn toggle_platform(&mut self, id: ProviderId) {
        if !self.platforms.remove(&id) {
            self.platforms.insert(id);
        }
    }

    pub fn toggle_indie(&mut self) {
        self.indie = !self.indie;
    }

    /// Resets to the all-empty default
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Every genre the query must match: the quick genre unioned with the
    /// include set
    pub fn required_genres(&self) -> BTreeSet<GenreId> {
        let mut genres = self.include_genres.clone();
        genres.extend(self.quick_genre);
        genres
    }

    /// Derives discovery query parameters from the current filters on top of
    /// `base`. Pure: the same filters and base always give the same output.
    pub fn to_query_parameters(&self, mut base: QueryParams) -> QueryParams {
        let required = self.required_genres();
        if !required.is_empty() {
            base.insert("with_genres".to_string(), join(&required, ","));
        }
        if !self.exclude_genres.is_empty() {
            base.insert("without_genres".to_string(), join(&self.exclude_genres, ","));
        }
        if !self.platforms.is_empty() {
            base.insert("with_watch_providers".to_string(), join(&self.platforms, "|"));
        }

        let min_votes = if self.indie {
            INDIE_MIN_VOTES
        } else {
            DEFAULT_MIN_VOTES
        };
        base.insert("vote_count.gte".to_string(), min_votes.to_string());

        base
    }
}

/// Parameters every discovery query carries regardless of filters
pub fn base_discover_params(region: &Region) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("watch_region".to_string(), region.to_string());
    params.insert(
        "with_watch_monetization_types".to_string(),
        "flatrate".to_string(),
    );
    params.insert("sort_by".to_string(), "popularity.desc".to_string());
    params.insert("include_adult".to_string(), "false".to_string());
    params
}

fn join(ids: &BTreeSet<u64>, separator: &str) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// On-disk shape of [`Filters`]. Decoding goes through here so that values
/// edited by hand cannot bring back a genre that is both included and
/// excluded.
#[derive(Deserialize)]
struct FiltersRecord {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    quick_genre: Option<GenreId>,
    #[serde(default)]
    include_genres: BTreeSet<GenreId>,
    #[serde(default)]
    exclude_genres: BTreeSet<GenreId>,
    #[serde(default)]
    platforms: BTreeSet<ProviderId>,
    #[serde(default)]
    indie: bool,
}

impl From<FiltersRecord> for Filters {
    fn from(record: FiltersRecord) -> Self {
        if let Some(found) = record.version.filter(|v| *v != FILTERS_VERSION) {
            tracing::warn!(
                found,
                current = FILTERS_VERSION,
                "Stored filters migrated to current version"
            );
        }

        let mut exclude_genres = record.exclude_genres;
        for id in record.include_genres.iter().chain(record.quick_genre.iter()) {
            exclude_genres.remove(id);
        }

        Self {
            version: FILTERS_VERSION,
            quick_genre: record.quick_genre,
            include_genres: record.include_genres,
            exclude_genres,
            platforms: record.platforms,
            indie: record.indie,
        }
    }
}
