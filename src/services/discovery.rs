//! Random recommendation under the user's filters.
//!
//! One discovery is a strict sequence of catalog calls: a first-page request to
//! learn the page count, one random page, then the detail of one random
//! eligible item from that page. Any failure ends the request; a page with no
//! eligible item ends it with [`AppError::NoResults`] rather than trying
//! another page.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tracing::Instrument;

use crate::{
    error::{AppError, AppResult},
    models::{
        catalog::ApiMediaItem, filters::base_discover_params, Filters, MediaDetail, MediaId,
        MediaType, QueryParams, Region,
    },
    services::{catalog::Catalog, details::fetch_media_detail},
};

/// The catalog refuses to page deeper than this
pub const MAX_DISCOVER_PAGES: u32 = 200;

/// Source of uniform random indices
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..upper`. `upper` is always at least 1.
    fn pick(&self, upper: usize) -> usize;
}

/// Thread-local entropy; the production source
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper.max(1))
    }
}

/// Deterministic source for reproducible sessions
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&self, upper: usize) -> usize {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0..upper.max(1))
    }
}

/// Phase of the current (or last) discovery request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryPhase {
    Idle,
    Probing,
    PageFetching,
    Selecting,
    DetailFetching,
    Done,
    Failed,
}

/// Coarse status the presentation layer keys its controls off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    Idle,
    Busy,
    Done,
    Failed,
}

impl DiscoveryPhase {
    pub fn status(&self) -> DiscoveryStatus {
        match self {
            DiscoveryPhase::Idle => DiscoveryStatus::Idle,
            DiscoveryPhase::Probing
            | DiscoveryPhase::PageFetching
            | DiscoveryPhase::Selecting
            | DiscoveryPhase::DetailFetching => DiscoveryStatus::Busy,
            DiscoveryPhase::Done => DiscoveryStatus::Done,
            DiscoveryPhase::Failed => DiscoveryStatus::Failed,
        }
    }

    /// Whether `next` is a legal successor of this phase
    pub fn can_advance_to(&self, next: DiscoveryPhase) -> bool {
        use DiscoveryPhase::*;
        matches!(
            (self, next),
            (Idle | Done | Failed, Idle)
                | (Idle, Probing)
                | (Probing, PageFetching)
                | (PageFetching, Selecting)
                | (Selecting, DetailFetching)
                | (DetailFetching, Done)
                | (Probing | PageFetching | Selecting | DetailFetching, Failed)
        )
    }
}

/// Inputs of one discovery
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    pub media_type: MediaType,
    pub region: Region,
    pub filters: Filters,
    /// Ids never to recommend (the Watched list)
    pub excluded_ids: HashSet<MediaId>,
}

pub struct DiscoveryEngine {
    catalog: Catalog,
    random: Arc<dyn RandomSource>,
    phase: RwLock<DiscoveryPhase>,
}

impl DiscoveryEngine {
    pub fn new(catalog: Catalog, random: Arc<dyn RandomSource>) -> Self {
        Self {
            catalog,
            random,
            phase: RwLock::new(DiscoveryPhase::Idle),
        }
    }

    pub async fn phase(&self) -> DiscoveryPhase {
        *self.phase.read().await
    }

    pub async fn status(&self) -> DiscoveryStatus {
        self.phase().await.status()
    }

    /// Picks one random eligible title and returns its normalized detail.
    ///
    /// Overlapping calls are not rejected here; callers check
    /// [`status`](Self::status) first.
    pub async fn discover(&self, request: &DiscoveryRequest) -> AppResult<MediaDetail> {
        let span = tracing::info_span!(
            "discovery",
            media_type = %request.media_type,
            region = %request.region,
        );

        async {
            self.enter(DiscoveryPhase::Idle).await;
            self.enter(DiscoveryPhase::Probing).await;

            match self.run(request).await {
                Ok(detail) => {
                    self.enter(DiscoveryPhase::Done).await;
                    tracing::info!(id = detail.id, title = %detail.title, "Discovery completed");
                    Ok(detail)
                }
                Err(e) => {
                    self.enter(DiscoveryPhase::Failed).await;
                    tracing::warn!(error = %e, kind = e.kind(), "Discovery failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: &DiscoveryRequest) -> AppResult<MediaDetail> {
        let params = request
            .filters
            .to_query_parameters(base_discover_params(&request.region));

        let first_page = self
            .catalog
            .discover(request.media_type, &with_page(&params, 1))
            .await?;
        if first_page.total_results == 0 || first_page.total_pages == 0 {
            return Err(AppError::NoResults);
        }

        let page_count = first_page.total_pages.min(MAX_DISCOVER_PAGES);
        let page = self.pick(page_count as usize) as u32 + 1;
        tracing::debug!(
            total_pages = first_page.total_pages,
            usable_pages = page_count,
            page,
            "Probed discovery"
        );

        self.enter(DiscoveryPhase::PageFetching).await;
        let listing = self
            .catalog
            .discover(request.media_type, &with_page(&params, page))
            .await?;

        self.enter(DiscoveryPhase::Selecting).await;
        let fetched = listing.results.len();
        let candidates = eligible_candidates(listing.results, &request.excluded_ids);
        tracing::debug!(fetched, eligible = candidates.len(), "Filtered page");
        if candidates.is_empty() {
            return Err(AppError::NoResults);
        }
        let chosen = &candidates[self.pick(candidates.len())];

        self.enter(DiscoveryPhase::DetailFetching).await;
        fetch_media_detail(&self.catalog, request.media_type, chosen.id, &request.region).await
    }

    fn pick(&self, upper: usize) -> usize {
        self.random.pick(upper).min(upper.saturating_sub(1))
    }

    async fn enter(&self, next: DiscoveryPhase) {
        let mut phase = self.phase.write().await;
        if !phase.can_advance_to(next) {
            tracing::debug!(from = ?*phase, to = ?next, "Overlapping discovery transition");
        }
        tracing::debug!(phase = ?next, "Discovery phase");
        *phase = next;
    }
}

/// Items that may be recommended: with a poster and not excluded
pub fn eligible_candidates(
    items: Vec<ApiMediaItem>,
    excluded_ids: &HashSet<MediaId>,
) -> Vec<ApiMediaItem> {
    items
        .into_iter()
        .filter(|item| item.has_poster() && !excluded_ids.contains(&item.id))
        .collect()
}

fn with_page(params: &QueryParams, page: u32) -> QueryParams {
    let mut params = params.clone();
    params.insert("page".to_string(), page.to_string());
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MockCatalogApi;
    use serde_json::{json, Value};
    use std::collections::VecDeque;

    /// Replays a fixed list of picks
    struct ScriptedRandom {
        picks: Mutex<VecDeque<usize>>,
    }

    impl ScriptedRandom {
        fn new(picks: &[usize]) -> Arc<Self> {
            Arc::new(Self {
                picks: Mutex::new(picks.iter().copied().collect()),
            })
        }
    }

    impl RandomSource for ScriptedRandom {
        fn pick(&self, _upper: usize) -> usize {
            self.picks.lock().unwrap().pop_front().unwrap_or(0)
        }
    }

    fn request(excluded: &[MediaId]) -> DiscoveryRequest {
        DiscoveryRequest {
            media_type: MediaType::Movie,
            region: "US".parse().unwrap(),
            filters: Filters::default(),
            excluded_ids: excluded.iter().copied().collect(),
        }
    }

    fn engine(mock: MockCatalogApi, random: Arc<dyn RandomSource>) -> DiscoveryEngine {
        DiscoveryEngine::new(Catalog::new(Arc::new(mock), "https://img.test"), random)
    }

    fn page_param(params: &QueryParams) -> Option<&str> {
        params.get("page").map(String::as_str)
    }

    fn detail_json(id: MediaId) -> Value {
        json!({
            "id": id,
            "title": format!("Movie {}", id),
            "poster_path": "/x.jpg",
            "release_date": "2001-01-01",
            "vote_average": 7.0
        })
    }

    #[tokio::test]
    async fn test_selects_poster_item_from_random_page() {
        let mut mock = MockCatalogApi::new();
        mock.expect_call()
            .withf(|path: &str, params: &QueryParams| {
                path == "discover/movie" && page_param(params) == Some("1")
            })
            .times(1)
            .returning(|_, _| Ok(json!({ "page": 1, "results": [], "total_pages": 3, "total_results": 60 })));
        mock.expect_call()
            .withf(|path: &str, params: &QueryParams| {
                path == "discover/movie"
                    && page_param(params) == Some("2")
                    && params.get("watch_region").map(String::as_str) == Some("US")
            })
            .times(1)
            .returning(|_, _| {
                Ok(json!({ "page": 2, "results": [
                    { "id": 1, "title": "Has Poster", "poster_path": "x" },
                    { "id": 2, "title": "No Poster", "poster_path": null }
                ], "total_pages": 3, "total_results": 60 }))
            });
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path == "movie/1")
            .times(1)
            .returning(|_, _| Ok(detail_json(1)));

        // Page index 1 -> page 2; candidate index 0
        let engine = engine(mock, ScriptedRandom::new(&[1, 0]));
        let detail = engine.discover(&request(&[])).await.unwrap();

        assert_eq!(detail.id, 1);
        assert_eq!(detail.title, "Movie 1");
        assert_eq!(engine.phase().await, DiscoveryPhase::Done);
        assert_eq!(engine.status().await, DiscoveryStatus::Done);
    }

    #[tokio::test]
    async fn test_zero_results_fails_without_page_request() {
        let mut mock = MockCatalogApi::new();
        mock.expect_call()
            .times(1)
            .returning(|_, _| Ok(json!({ "page": 1, "results": [], "total_pages": 0, "total_results": 0 })));

        let engine = engine(mock, ScriptedRandom::new(&[]));
        let err = engine.discover(&request(&[])).await.unwrap_err();

        assert!(matches!(err, AppError::NoResults));
        assert_eq!(engine.status().await, DiscoveryStatus::Failed);
    }

    #[tokio::test]
    async fn test_all_ineligible_fails_without_detail_request() {
        let mut mock = MockCatalogApi::new();
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path == "discover/movie")
            .times(2)
            .returning(|_, _| {
                Ok(json!({ "page": 1, "results": [
                    { "id": 42, "title": "Seen", "poster_path": "x" },
                    { "id": 7, "title": "Posterless", "poster_path": "" }
                ], "total_pages": 1, "total_results": 2 }))
            });
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path.starts_with("movie/"))
            .times(0);

        let engine = engine(mock, ScriptedRandom::new(&[0]));
        let err = engine.discover(&request(&[42])).await.unwrap_err();
        assert!(matches!(err, AppError::NoResults));
    }

    #[tokio::test]
    async fn test_single_watched_item_yields_no_results() {
        let mut mock = MockCatalogApi::new();
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path == "discover/movie")
            .times(2)
            .returning(|_, _| {
                Ok(json!({ "page": 1, "results": [ { "id": 42, "title": "Answer", "poster_path": "x" } ],
                           "total_pages": 1, "total_results": 1 }))
            });

        let engine = engine(mock, Arc::new(ThreadRandom));
        let err = engine.discover(&request(&[42])).await.unwrap_err();
        assert!(matches!(err, AppError::NoResults));
    }

    #[tokio::test]
    async fn test_page_count_is_capped() {
        let mut mock = MockCatalogApi::new();
        mock.expect_call()
            .withf(|_: &str, params: &QueryParams| page_param(params) == Some("1"))
            .times(1)
            .returning(|_, _| Ok(json!({ "results": [], "total_pages": 5000, "total_results": 100000 })));
        mock.expect_call()
            .withf(|_: &str, params: &QueryParams| page_param(params) == Some("200"))
            .times(1)
            .returning(|_, _| Ok(json!({ "results": [ { "id": 9, "poster_path": "/p.jpg" } ] })));
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path == "movie/9")
            .times(1)
            .returning(|_, _| Ok(detail_json(9)));

        // An out-of-range pick clamps to the last usable page
        let engine = engine(mock, ScriptedRandom::new(&[10_000, 0]));
        let detail = engine.discover(&request(&[])).await.unwrap();
        assert_eq!(detail.id, 9);
    }

    #[tokio::test]
    async fn test_filters_flow_into_query() {
        let mut mock = MockCatalogApi::new();
        mock.expect_call()
            .withf(|path: &str, params: &QueryParams| {
                path == "discover/tv"
                    && params.get("with_genres").map(String::as_str) == Some("18")
                    && params.get("with_watch_providers").map(String::as_str) == Some("8")
                    && params.get("vote_count.gte").map(String::as_str) == Some("10")
            })
            .times(1)
            .returning(|_, _| Ok(json!({ "results": [], "total_pages": 0, "total_results": 0 })));

        let mut filters = Filters::default();
        filters.toggle_quick_genre(18, crate::models::QuickGenrePolicy::Independent);
        filters.toggle_platform(8);
        filters.toggle_indie();

        let engine = engine(mock, Arc::new(ThreadRandom));
        let result = engine
            .discover(&DiscoveryRequest {
                media_type: MediaType::Show,
                filters,
                ..request(&[])
            })
            .await;
        assert!(matches!(result, Err(AppError::NoResults)));
    }

    #[tokio::test]
    async fn test_detail_failure_aborts_with_remote_error() {
        let mut mock = MockCatalogApi::new();
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path == "discover/movie")
            .times(2)
            .returning(|_, _| {
                Ok(json!({ "results": [ { "id": 5, "poster_path": "/p.jpg" } ],
                           "total_pages": 1, "total_results": 1 }))
            });
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path == "movie/5")
            .times(1)
            .returning(|_, _| Err(AppError::remote("The resource you requested could not be found.")));

        let engine = engine(mock, ScriptedRandom::new(&[0, 0]));
        let err = engine.discover(&request(&[])).await.unwrap_err();

        assert_eq!(err.to_string(), "The resource you requested could not be found.");
        assert_eq!(engine.phase().await, DiscoveryPhase::Failed);
    }

    #[tokio::test]
    async fn test_watched_result_is_never_returned_again() {
        let mut mock = MockCatalogApi::new();
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path == "discover/movie")
            .returning(|_, _| {
                Ok(json!({ "results": [
                    { "id": 1, "poster_path": "/1.jpg" },
                    { "id": 2, "poster_path": "/2.jpg" },
                    { "id": 3, "poster_path": "/3.jpg" }
                ], "total_pages": 1, "total_results": 3 }))
            });
        mock.expect_call()
            .withf(|path: &str, _: &QueryParams| path.starts_with("movie/"))
            .returning(|path: &str, _: &QueryParams| {
                let id: MediaId = path.trim_start_matches("movie/").parse().unwrap();
                Ok(detail_json(id))
            });

        let engine = engine(mock, Arc::new(SeededRandom::new(7)));
        let mut watched = HashSet::new();

        for _ in 0..3 {
            let first = engine
                .discover(&DiscoveryRequest {
                    excluded_ids: watched.clone(),
                    ..request(&[])
                })
                .await
                .unwrap();
            assert!(!watched.contains(&first.id));

            for _ in 0..10 {
                let again = engine
                    .discover(&DiscoveryRequest {
                        excluded_ids: {
                            let mut ids = watched.clone();
                            ids.insert(first.id);
                            ids
                        },
                        ..request(&[])
                    })
                    .await;
                match again {
                    Ok(detail) => assert_ne!(detail.id, first.id),
                    Err(AppError::NoResults) => {}
                    Err(e) => panic!("unexpected discovery error: {}", e),
                }
            }
            watched.insert(first.id);
        }

        let exhausted = engine
            .discover(&DiscoveryRequest {
                excluded_ids: watched,
                ..request(&[])
            })
            .await;
        assert!(matches!(exhausted, Err(AppError::NoResults)));
    }

    #[test]
    fn test_phase_transitions() {
        use DiscoveryPhase::*;
        assert!(Idle.can_advance_to(Probing));
        assert!(Probing.can_advance_to(Failed));
        assert!(DetailFetching.can_advance_to(Done));
        assert!(Done.can_advance_to(Idle));
        assert!(Failed.can_advance_to(Idle));
        assert!(!Idle.can_advance_to(Done));
        assert!(!Done.can_advance_to(Failed));
        assert!(!Probing.can_advance_to(DetailFetching));
    }

    #[test]
    fn test_busy_phases_report_busy() {
        assert_eq!(DiscoveryPhase::Probing.status(), DiscoveryStatus::Busy);
        assert_eq!(DiscoveryPhase::DetailFetching.status(), DiscoveryStatus::Busy);
        assert_eq!(DiscoveryPhase::Idle.status(), DiscoveryStatus::Idle);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(99);
        let b = SeededRandom::new(99);
        let picks_a: Vec<_> = (0..20).map(|_| a.pick(200)).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.pick(200)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|p| *p < 200));
    }
}
