//! Application state and route table.

use crate::client::ApiClient;
use crate::router::Router;
use crate::{api, health, pages};

/// State shared by every handler. One per process.
pub struct App {
    pub(crate) client: ApiClient,
}

impl App {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Builds the public route table.
///
/// Any route with a `{username}` parameter is fully classified and may be
/// blocked; `/` and `/health` are only user-agent classified.
pub fn router(app: App) -> Router<App> {
    Router::with_state(app)
        .get("/", pages::home)
        .get("/health", health::liveness)
        .get("/api/{username}/crates", api::user_crates)
        .get("/api/{username}/collection", api::user_collection)
        .get("/api/{username}/{handle}/albums", api::crate_albums)
        .get("/api/{username}/collection/{handle}/albums", api::collection_crate_albums)
        .get("/{username}", pages::profile)
        .get("/{username}/{handle}", pages::crate_page)
        .get("/{username}/collection/{handle}", pages::collection_crate_page)
}
