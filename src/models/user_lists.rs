use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{MediaId, MediaType};
use crate::error::AppError;

/// The two user-curated lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Titles already seen; excluded from discovery
    Watched,
    /// Titles saved for later
    Watchlist,
}

impl std::str::FromStr for ListKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watched" => Ok(ListKind::Watched),
            "watchlist" => Ok(ListKind::Watchlist),
            other => Err(AppError::NotFound(format!("list '{}'", other))),
        }
    }
}

/// Lightweight record kept for a listed title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: MediaId,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<String>,
    pub poster: Option<String>,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

/// Media id to entry. The id is the unique key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserList {
    entries: BTreeMap<MediaId, ListEntry>,
}

impl UserList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the entry if absent, removes it otherwise. Returns whether the
    /// id is now present.
    pub fn toggle(&mut self, entry: ListEntry) -> bool {
        if self.entries.remove(&entry.id).is_some() {
            false
        } else {
            self.entries.insert(entry.id, entry);
            true
        }
    }

    pub fn contains(&self, id: MediaId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> HashSet<MediaId> {
        self.entries.keys().copied().collect()
    }

    /// Entries, most recently added first
    pub fn entries(&self) -> Vec<&ListEntry> {
        let mut entries: Vec<&ListEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        entries
    }
}
