use serde::Serialize;
use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{
        DisplayPreferences, Filters, ListEntry, ListKind, MediaId, QuickGenrePolicy, Region,
        UserList,
    },
    store::{PreferenceKey, PreferenceStore},
};

/// Everything the picker remembers about its single local user.
///
/// Reads go straight to the store; every mutation is persisted before it
/// returns. Mutators take `&mut self` so that shared access goes through a
/// write lock.
pub struct UserProfile {
    store: PreferenceStore,
    policy: QuickGenrePolicy,
}

/// Preferences returned in one piece to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSnapshot {
    pub region: Option<Region>,
    pub theme: DisplayPreferences,
    pub filters: Filters,
    pub quick_genre_policy: QuickGenrePolicy,
}

impl UserProfile {
    pub fn new(store: PreferenceStore, policy: QuickGenrePolicy) -> Self {
        Self { store, policy }
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            region: self.region(),
            theme: self.theme(),
            filters: self.filters(),
            quick_genre_policy: self.policy,
        }
    }

    pub fn region(&self) -> Option<Region> {
        self.store.get(PreferenceKey::Region, None)
    }

    pub fn set_region(&mut self, region: Region) -> AppResult<()> {
        tracing::info!(region = %region, "Region selected");
        self.store.set(PreferenceKey::Region, &Some(region))
    }

    /// The explicit "change region" action: forget the current choice
    pub fn clear_region(&mut self) -> AppResult<()> {
        tracing::info!("Region cleared");
        self.store.set::<Option<Region>>(PreferenceKey::Region, &None)
    }

    pub fn theme(&self) -> DisplayPreferences {
        self.store
            .get(PreferenceKey::Theme, DisplayPreferences::default())
    }

    pub fn set_theme(&mut self, theme: DisplayPreferences) -> AppResult<()> {
        self.store.set(PreferenceKey::Theme, &theme)
    }

    pub fn filters(&self) -> Filters {
        self.store.get(PreferenceKey::Filters, Filters::default())
    }

    /// Applies one filter mutation and persists the result
    pub fn update_filters<F>(&mut self, mutate: F) -> AppResult<Filters>
    where
        F: FnOnce(&mut Filters, QuickGenrePolicy),
    {
        let mut filters = self.filters();
        mutate(&mut filters, self.policy);
        self.store.set(PreferenceKey::Filters, &filters)?;
        Ok(filters)
    }

    pub fn clear_filters(&mut self) -> AppResult<Filters> {
        self.update_filters(|filters, _| filters.clear())
    }

    pub fn list(&self, kind: ListKind) -> UserList {
        self.store.get(list_key(kind), UserList::new())
    }

    /// Adds or removes `entry`; returns whether it is now on the list
    pub fn toggle_list_entry(&mut self, kind: ListKind, entry: ListEntry) -> AppResult<bool> {
        let mut list = self.list(kind);
        let id = entry.id;
        let present = list.toggle(entry);
        self.store.set(list_key(kind), &list)?;

        tracing::info!(list = ?kind, id, present, "List updated");
        Ok(present)
    }

    /// Ids excluded from discovery
    pub fn watched_ids(&self) -> HashSet<MediaId> {
        self.list(ListKind::Watched).ids()
    }
}

fn list_key(kind: ListKind) -> PreferenceKey {
    match kind {
        ListKind::Watched => PreferenceKey::Watched,
        ListKind::Watchlist => PreferenceKey::Watchlist,
    }
}
