//! Catalog access.
//!
//! [`CatalogApi`] is the raw seam: one authenticated JSON call per
//! endpoint. [`Catalog`] sits on top of it and decodes the endpoints the
//! picker uses into model types. Tests mock the seam and keep the
//! decoding real.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        catalog::{
            ApiCountry, ApiGenreList, ApiMediaDetails, ApiMediaItem, ApiPage, ApiPerson,
            ApiProviderList, ApiSearchItem,
        },
        Genre, MediaId, MediaType, Provider, QueryParams, Region, RegionInfo,
    },
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Trait for catalog backends
///
/// Implementations attach credentials, perform the request and map failures
/// into [`AppError::Configuration`] or [`AppError::Remote`]. No retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Calls `path` (relative to the API root) with `params` and returns the
    /// decoded JSON body
    async fn call(&self, path: &str, params: &QueryParams) -> AppResult<Value>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Typed view over a [`CatalogApi`]
#[derive(Clone)]
pub struct Catalog {
    api: Arc<dyn CatalogApi>,
    image_base: String,
}

impl Catalog {
    pub fn new(api: Arc<dyn CatalogApi>, image_base: impl Into<String>) -> Self {
        Self {
            api,
            image_base: image_base.into(),
        }
    }

    /// Base URL prepended to image paths
    pub fn image_base(&self) -> &str {
        &self.image_base
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &QueryParams) -> AppResult<T> {
        let value = self.api.call(path, params).await?;
        serde_json::from_value(value).map_err(|e| {
            tracing::error!(
                path = %path,
                backend = self.api.name(),
                error = %e,
                "Failed to decode catalog response"
            );
            AppError::remote(format!("Unexpected catalog response from {}: {}", path, e))
        })
    }

    /// Every country the catalog knows, sorted by English name
    pub async fn regions(&self) -> AppResult<Vec<RegionInfo>> {
        let countries: Vec<ApiCountry> = self
            .get("configuration/countries", &QueryParams::new())
            .await?;

        let mut regions: Vec<RegionInfo> = countries.into_iter().map(RegionInfo::from).collect();
        regions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(regions)
    }

    /// Genre vocabulary for a media type
    pub async fn genres(&self, media_type: MediaType) -> AppResult<Vec<Genre>> {
        let list: ApiGenreList = self
            .get(&format!("genre/{}/list", media_type.as_path()), &QueryParams::new())
            .await?;
        Ok(list.genres.into_iter().map(Genre::from).collect())
    }

    /// Platform vocabulary for a media type in a region, in the catalog's
    /// display order
    pub async fn providers(&self, media_type: MediaType, region: &Region) -> AppResult<Vec<Provider>> {
        let mut params = QueryParams::new();
        params.insert("watch_region".to_string(), region.to_string());

        let mut list: ApiProviderList = self
            .get(&format!("watch/providers/{}", media_type.as_path()), &params)
            .await?;
        list.results.sort_by(|a, b| {
            a.display_priority
                .unwrap_or(i64::MAX)
                .cmp(&b.display_priority.unwrap_or(i64::MAX))
                .then_with(|| a.provider_name.cmp(&b.provider_name))
        });

        Ok(list
            .results
            .into_iter()
            .map(|p| p.into_provider(&self.image_base))
            .collect())
    }

    /// One page of a discovery query
    pub async fn discover(
        &self,
        media_type: MediaType,
        params: &QueryParams,
    ) -> AppResult<ApiPage<ApiMediaItem>> {
        self.get(&format!("discover/{}", media_type.as_path()), params)
            .await
    }

    /// Full detail payload with every supplementary section appended
    pub async fn details(&self, media_type: MediaType, id: MediaId) -> AppResult<ApiMediaDetails> {
        let appended = match media_type {
            MediaType::Movie => "videos,credits,similar,watch/providers,release_dates",
            MediaType::Show => "videos,credits,similar,watch/providers,content_ratings",
        };
        let mut params = QueryParams::new();
        params.insert("append_to_response".to_string(), appended.to_string());

        self.get(&format!("{}/{}", media_type.as_path(), id), &params)
            .await
    }

    /// Multi-type text search (movies, shows and people)
    pub async fn search(&self, query: &str) -> AppResult<ApiPage<ApiSearchItem>> {
        let mut params = QueryParams::new();
        params.insert("query".to_string(), query.to_string());
        params.insert("include_adult".to_string(), "false".to_string());

        self.get("search/multi", &params).await
    }

    /// A person with their combined movie and TV credits
    pub async fn person(&self, id: u64) -> AppResult<ApiPerson> {
        let mut params = QueryParams::new();
        params.insert(
            "append_to_response".to_string(),
            "combined_credits".to_string(),
        );

        self.get(&format!("person/{}", id), &params).await
    }
}
