use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        Accent, AccentPalette, DisplayPreferences, Filters, Genre, GenreDirection, GenreId,
        ListEntry, ListKind, MediaDetail, MediaId, MediaType, PersonDetail, Provider,
        ProviderId, Region, RegionInfo, SearchHit,
    },
    services::{
        details::fetch_media_detail,
        discovery::{DiscoveryPhase, DiscoveryRequest, DiscoveryStatus},
        profile::{ProfileSnapshot, UserProfile},
        search,
    },
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SetRegionRequest {
    pub region: String,
}

#[derive(Debug, Serialize)]
pub struct ThemeOption {
    pub accent: Accent,
    pub palette: AccentPalette,
}

#[derive(Debug, Deserialize)]
pub struct ToggleGenreRequest {
    pub direction: GenreDirection,
}

#[derive(Debug, Serialize)]
pub struct ToggleListResponse {
    pub present: bool,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverRequest {
    pub media_type: MediaType,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryStatusResponse {
    pub status: DiscoveryStatus,
    pub phase: DiscoveryPhase,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

fn require_region(profile: &UserProfile) -> AppResult<Region> {
    profile
        .region()
        .ok_or_else(|| AppError::InvalidInput("Select a region first".to_string()))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Every country the catalog knows
pub async fn list_regions(State(state): State<AppState>) -> AppResult<Json<Vec<RegionInfo>>> {
    Ok(Json(state.catalog.regions().await?))
}

pub async fn get_preferences(State(state): State<AppState>) -> AppResult<Json<ProfileSnapshot>> {
    let snapshot = state
        .read_profile(|profile| Ok(profile.snapshot()))
        .await?;
    Ok(Json(snapshot))
}

pub async fn set_region(
    State(state): State<AppState>,
    Json(request): Json<SetRegionRequest>,
) -> AppResult<Json<ProfileSnapshot>> {
    let region: Region = request.region.parse()?;

    let snapshot = state
        .update_profile(move |profile| {
            profile.set_region(region)?;
            Ok(profile.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// Change-region action: discovery is refused until a region is set again
pub async fn clear_region(State(state): State<AppState>) -> AppResult<Json<ProfileSnapshot>> {
    let snapshot = state
        .update_profile(|profile| {
            profile.clear_region()?;
            Ok(profile.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

pub async fn set_theme(
    State(state): State<AppState>,
    Json(theme): Json<DisplayPreferences>,
) -> AppResult<Json<ProfileSnapshot>> {
    let snapshot = state
        .update_profile(move |profile| {
            profile.set_theme(theme)?;
            Ok(profile.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// Accent choices with their palettes
pub async fn list_themes() -> Json<Vec<ThemeOption>> {
    Json(
        Accent::ALL
            .iter()
            .map(|accent| ThemeOption {
                accent: *accent,
                palette: accent.palette(),
            })
            .collect(),
    )
}

pub async fn list_genres(
    State(state): State<AppState>,
    Path(media): Path<String>,
) -> AppResult<Json<Vec<Genre>>> {
    let media_type: MediaType = media.parse()?;
    Ok(Json(state.catalog.genres(media_type).await?))
}

/// Platforms offered in the selected region
pub async fn list_providers(
    State(state): State<AppState>,
    Path(media): Path<String>,
) -> AppResult<Json<Vec<Provider>>> {
    let media_type: MediaType = media.parse()?;
    let region = state.read_profile(require_region).await?;
    Ok(Json(state.catalog.providers(media_type, &region).await?))
}

pub async fn get_filters(State(state): State<AppState>) -> AppResult<Json<Filters>> {
    let filters = state.read_profile(|profile| Ok(profile.filters())).await?;
    Ok(Json(filters))
}

pub async fn clear_filters(State(state): State<AppState>) -> AppResult<Json<Filters>> {
    let filters = state
        .update_profile(|profile| profile.clear_filters())
        .await?;
    Ok(Json(filters))
}

pub async fn toggle_quick_genre(
    State(state): State<AppState>,
    Path(id): Path<GenreId>,
) -> AppResult<Json<Filters>> {
    let filters = state
        .update_profile(move |profile| {
            profile.update_filters(|f, policy| f.toggle_quick_genre(id, policy))
        })
        .await?;
    Ok(Json(filters))
}

pub async fn toggle_genre(
    State(state): State<AppState>,
    Path(id): Path<GenreId>,
    Json(request): Json<ToggleGenreRequest>,
) -> AppResult<Json<Filters>> {
    let direction = request.direction;
    let filters = state
        .update_profile(move |profile| {
            profile.update_filters(|f, policy| f.toggle_genre(id, direction, policy))
        })
        .await?;
    Ok(Json(filters))
}

pub async fn toggle_platform(
    State(state): State<AppState>,
    Path(id): Path<ProviderId>,
) -> AppResult<Json<Filters>> {
    let filters = state
        .update_profile(move |profile| profile.update_filters(|f, _| f.toggle_platform(id)))
        .await?;
    Ok(Json(filters))
}

pub async fn toggle_indie(State(state): State<AppState>) -> AppResult<Json<Filters>> {
    let filters = state
        .update_profile(|profile| profile.update_filters(|f, _| f.toggle_indie()))
        .await?;
    Ok(Json(filters))
}

/// Entries of one list, most recently added first
pub async fn get_list(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<Json<Vec<ListEntry>>> {
    let kind: ListKind = kind.parse()?;
    let entries: Vec<ListEntry> = state
        .read_profile(move |profile| {
            Ok(profile.list(kind).entries().into_iter().cloned().collect())
        })
        .await?;
    Ok(Json(entries))
}

pub async fn toggle_list_entry(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(entry): Json<ListEntry>,
) -> AppResult<Json<ToggleListResponse>> {
    let kind: ListKind = kind.parse()?;
    let present = state
        .update_profile(move |profile| profile.toggle_list_entry(kind, entry))
        .await?;
    Ok(Json(ToggleListResponse { present }))
}

/// Random recommendation under the current region and filters
pub async fn discover(
    State(state): State<AppState>,
    Json(request): Json<DiscoverRequest>,
) -> AppResult<Json<MediaDetail>> {
    let _slot = state.claim_discovery()?;

    // Snapshot the profile; the lock is not held across catalog calls
    let media_type = request.media_type;
    let request = state
        .read_profile(move |profile| {
            Ok(DiscoveryRequest {
                media_type,
                region: require_region(profile)?,
                filters: profile.filters(),
                excluded_ids: profile.watched_ids(),
            })
        })
        .await?;

    Ok(Json(state.discovery.discover(&request).await?))
}

pub async fn discovery_status(State(state): State<AppState>) -> Json<DiscoveryStatusResponse> {
    let phase = state.discovery.phase().await;
    Json(DiscoveryStatusResponse {
        status: phase.status(),
        phase,
    })
}

/// Detail of a title reached by navigation (similar titles, search, lists)
pub async fn title_detail(
    State(state): State<AppState>,
    Path((media, id)): Path<(String, MediaId)>,
) -> AppResult<Json<MediaDetail>> {
    let media_type: MediaType = media.parse()?;
    let region = state.read_profile(require_region).await?;
    Ok(Json(
        fetch_media_detail(&state.catalog, media_type, id, &region).await?,
    ))
}

pub async fn search_titles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchHit>>> {
    Ok(Json(search::search_titles(&state.catalog, &params.q).await?))
}

pub async fn person_detail(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<PersonDetail>> {
    Ok(Json(search::person_detail(&state.catalog, id).await?))
}
