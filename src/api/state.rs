use std::io;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::task::JoinError;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::QuickGenrePolicy,
    services::{
        catalog::{Catalog, CatalogApi, TmdbClient},
        discovery::{DiscoveryEngine, RandomSource, SeededRandom, ThreadRandom},
        profile::UserProfile,
    },
    store::{FileStorage, PreferenceStore, Storage},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<RwLock<AppStateInner>>,
    pub catalog: Catalog,
    pub discovery: Arc<DiscoveryEngine>,
    discovery_slot: Arc<Mutex<()>>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    profile: UserProfile,
}

impl AppState {
    /// Assembles state from its parts
    pub fn new(
        api: Arc<dyn CatalogApi>,
        image_base: impl Into<String>,
        storage: Arc<dyn Storage>,
        policy: QuickGenrePolicy,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let catalog = Catalog::new(api, image_base);
        let profile = UserProfile::new(PreferenceStore::new(storage), policy);

        Self {
            inner: Arc::new(RwLock::new(AppStateInner { profile })),
            discovery: Arc::new(DiscoveryEngine::new(catalog.clone(), random)),
            catalog,
            discovery_slot: Arc::new(Mutex::new(())),
        }
    }

    /// Production state: TMDB over HTTP, preferences under the data dir
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = TmdbClient::from_config(config)?;
        let storage = FileStorage::open(&config.data_dir)?;

        let random: Arc<dyn RandomSource> = match config.discovery_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded discovery");
                Arc::new(SeededRandom::new(seed))
            }
            None => Arc::new(ThreadRandom),
        };

        Ok(Self::new(
            Arc::new(client),
            config.tmdb_image_url.clone(),
            Arc::new(storage),
            config.quick_genre_policy,
            random,
        ))
    }

    /// Runs `f` against the profile on the blocking pool, under the read lock.
    /// Profile reads and writes are file I/O.
    pub async fn read_profile<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&UserProfile) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.inner.clone().read_owned().await;
        tokio::task::spawn_blocking(move || f(&inner.profile))
            .await
            .map_err(join_failed)?
    }

    /// Runs `f` against the profile on the blocking pool, under the write
    /// lock so that mutations never interleave
    pub async fn update_profile<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut UserProfile) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut inner = self.inner.clone().write_owned().await;
        tokio::task::spawn_blocking(move || f(&mut inner.profile))
            .await
            .map_err(join_failed)?
    }

    /// Claims the single discovery slot, or fails with [`AppError::Busy`]
    /// while another discovery runs
    pub fn claim_discovery(&self) -> AppResult<MutexGuard<'_, ()>> {
        self.discovery_slot.try_lock().map_err(|_| AppError::Busy)
    }
}

fn join_failed(err: JoinError) -> AppError {
    tracing::error!(error = %err, "Profile task failed");
    AppError::Storage(io::Error::new(io::ErrorKind::Other, err))
}
