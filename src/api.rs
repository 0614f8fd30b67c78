//! JSON endpoints for "load more" on the pages.
//!
//! Thin passthroughs: the page query comes straight from the query string
//! (normalised) and the upstream page goes back unmodified. Any upstream
//! failure is a 500 with a short error body; unlike the pages, nothing here
//! degrades to an empty result.

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::app::App;
use crate::client::Page;
use crate::error::ApiError;
use crate::paging::PageQuery;
use crate::response::{IntoResponse, Json, Response};
use crate::Request;

/// `/api/{username}/crates`
pub async fn user_crates(app: Arc<App>, req: Request) -> Response {
    let username = req.param("username").unwrap_or_default();
    let query = PageQuery::from_request(&req);
    passthrough(app.client.user_crates(username, &query).await, "crates", username)
}

/// `/api/{username}/collection`
pub async fn user_collection(app: Arc<App>, req: Request) -> Response {
    let username = req.param("username").unwrap_or_default();
    let query = PageQuery::from_request(&req);
    passthrough(app.client.user_collection(username, &query).await, "collection", username)
}

/// `/api/{username}/{handle}/albums`
pub async fn crate_albums(app: Arc<App>, req: Request) -> Response {
    let username = req.param("username").unwrap_or_default();
    let handle = req.param("handle").unwrap_or_default();
    let query = PageQuery::from_request(&req);
    passthrough(app.client.crate_albums(username, handle, &query).await, "albums", username)
}

/// `/api/{username}/collection/{handle}/albums`
pub async fn collection_crate_albums(app: Arc<App>, req: Request) -> Response {
    let username = req.param("username").unwrap_or_default();
    let handle = req.param("handle").unwrap_or_default();
    let query = PageQuery::from_request(&req);
    let result = app.client.collection_crate_albums(username, handle, &query).await;
    passthrough(result, "albums", username)
}

fn passthrough<T: Serialize>(
    result: Result<Page<T>, ApiError>,
    what: &'static str,
    username: &str,
) -> Response {
    match result {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!(what, username, error = %e, "api passthrough failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to fetch {what}") })),
            )
                .into_response()
        }
    }
}
