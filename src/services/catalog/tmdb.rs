//! TMDB v3 catalog backend
//!
//! Every request carries the `api_key` query parameter. Failures keep the
//! catalog's own `status_message` when the body has one.

use crate::{
    config::{is_usable_credential, Config},
    error::{AppError, AppResult},
    models::QueryParams,
    services::catalog::CatalogApi,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

/// Error body returned by TMDB on failure
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    status_message: Option<String>,
}

impl TmdbClient {
    pub fn new(api_key: Option<String>, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn credential(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| is_usable_credential(key))
            .ok_or_else(|| {
                AppError::Configuration(
                    "Missing TMDB API key. Set TMDB_API_KEY to a valid key.".to_string(),
                )
            })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Message for a failed response: the catalog's own text when present
fn remote_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("API request failed ({})", status))
}

#[async_trait::async_trait]
impl CatalogApi for TmdbClient {
    async fn call(&self, path: &str, params: &QueryParams) -> AppResult<Value> {
        let api_key = self.credential()?;
        let url = self.endpoint(path);

        tracing::debug!(path = %path, params = params.len(), "Calling catalog");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = remote_message(status, &body);
            tracing::warn!(
                path = %path,
                status = %status,
                message = %message,
                "Catalog request failed"
            );
            return Err(AppError::remote(message));
        }

        let body: Value = response.json().await?;
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
