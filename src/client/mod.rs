//! Typed client for the upstream public API.
//!
//! One method per upstream resource. Each call is a single request with the
//! client-wide timeout: no retries, no per-call overrides. Whether a failure
//! matters is the caller's decision, see [`crate::pages`].
//!
//! Build one [`ApiClient`] at startup and share it. It wraps a pooled
//! `reqwest::Client` and is cheap to clone.

mod models;

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, Error};
use crate::paging::PageQuery;

pub use models::{
    first_image_url, Album, Artist, Crate, CrateAlbum, Genre, Image, Page, PublicUser,
    SocialStats, User, ViewRecord,
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8980";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the upstream lives and how long to wait for it.
///
/// Immutable once the client is built; tests point `base_url` at a fixture
/// server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BACKEND_URL.to_owned(), timeout: DEFAULT_TIMEOUT }
    }
}

/// Client for the `/v1/public` API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        url::Url::parse(&config.base_url).map_err(|source| Error::BackendUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Users ────────────────────────────────────────────────────────────────

    pub async fn user(&self, username: &str) -> Result<User, ApiError> {
        self.get("user", &format!("/v1/public/user/{}", seg(username)), &[]).await
    }

    pub async fn social_stats(&self, username: &str) -> Result<SocialStats, ApiError> {
        self.get("social stats", &format!("/v1/public/user/{}/stats", seg(username)), &[])
            .await
    }

    // ── Crates ───────────────────────────────────────────────────────────────

    pub async fn user_crates(
        &self,
        username: &str,
        query: &PageQuery,
    ) -> Result<Page<Crate>, ApiError> {
        let path = format!("/v1/public/user/{}/crates", seg(username));
        self.get("crates", &path, &query.to_pairs(true)).await
    }

    pub async fn crate_by_handle(&self, username: &str, handle: &str) -> Result<Crate, ApiError> {
        let path = format!("/v1/public/user/{}/crate/{}", seg(username), seg(handle));
        self.get("crate", &path, &[]).await
    }

    pub async fn crate_albums(
        &self,
        username: &str,
        handle: &str,
        query: &PageQuery,
    ) -> Result<Page<CrateAlbum>, ApiError> {
        let path = format!("/v1/public/user/{}/crate/{}/albums", seg(username), seg(handle));
        self.get("albums", &path, &query.to_pairs(true)).await
    }

    /// Every public crate. Upstream has no search here; `query.search` is ignored.
    pub async fn public_crates(&self, query: &PageQuery) -> Result<Page<Crate>, ApiError> {
        self.get("public crates", "/v1/public/crates", &query.to_pairs(false)).await
    }

    /// Public crates ranked by recent views. Upstream picks the order.
    pub async fn trending_crates(&self, page: u32, size: u32) -> Result<Page<Crate>, ApiError> {
        let query = PageQuery { page, ..PageQuery::first(size) };
        self.get("trending crates", "/v1/public/crates/trending", &query.to_pairs(false))
            .await
    }

    // ── Collections ──────────────────────────────────────────────────────────

    pub async fn user_collection(
        &self,
        username: &str,
        query: &PageQuery,
    ) -> Result<Page<Crate>, ApiError> {
        let path = format!("/v1/public/user/{}/collection", seg(username));
        self.get("collection", &path, &query.to_pairs(true)).await
    }

    pub async fn collection_crate(&self, username: &str, handle: &str) -> Result<Crate, ApiError> {
        let path = format!("/v1/public/user/{}/collection/{}", seg(username), seg(handle));
        self.get("collection crate", &path, &[]).await
    }

    pub async fn collection_crate_albums(
        &self,
        username: &str,
        handle: &str,
        query: &PageQuery,
    ) -> Result<Page<CrateAlbum>, ApiError> {
        let path = format!(
            "/v1/public/user/{}/collection/{}/albums",
            seg(username),
            seg(handle)
        );
        self.get("collection albums", &path, &query.to_pairs(true)).await
    }

    // ── Views ────────────────────────────────────────────────────────────────

    /// Tells upstream someone looked at a crate. Any 2xx counts as recorded;
    /// the response body is ignored.
    pub async fn record_crate_view(&self, crate_id: i64, view: &ViewRecord) -> Result<(), ApiError> {
        let url = format!("{}/v1/public/crate/{crate_id}/view", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(view)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }
        Ok(())
    }

    // ── Transport ────────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        what: &'static str,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, ?query, "upstream request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { url, source })?;

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { what, source })
    }
}

/// Percent-encodes one path segment.
fn seg(s: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(s)
}
