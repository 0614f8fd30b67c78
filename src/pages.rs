//! Page handlers.
//!
//! Each page has one or two **required** upstream calls and any number of
//! **supplementary** ones. A required call that fails turns the whole page
//! into the uniform 404. A supplementary call that fails is logged and
//! replaced with its empty value; the page still renders.

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::App;
use crate::client::{first_image_url, ApiClient, Crate, CrateAlbum, Page, User, ViewRecord};
use crate::error::ApiError;
use crate::paging::PageQuery;
use crate::response::{Json, Response};
use crate::views::{
    CrateView, FeaturedCrate, HomeView, OpenGraph, ProfileView, SITE_CARD_IMAGE,
    SITE_DESCRIPTION, SITE_TITLE, SITE_URL,
};
use crate::Request;

const FEATURED_COUNT: u32 = 3;
const LATEST_SORT: &str = "createdAt,desc";
const PROFILE_PAGE_SIZE: u32 = 12;
const ALBUM_PAGE_SIZE: u32 = 20;

/// A page view, or the uniform 404 when a required call failed.
type PageResult<T> = Result<Json<T>, Response>;

// ── Home ─────────────────────────────────────────────────────────────────────

/// `/`. Never fails: trending, else latest public crates, else nothing.
pub async fn home(app: Arc<App>, _req: Request) -> Json<HomeView> {
    let featured = featured_crates(&app.client).await;
    Json(HomeView {
        title: SITE_TITLE.to_owned(),
        og: OpenGraph {
            title: SITE_TITLE.to_owned(),
            description: SITE_DESCRIPTION.to_owned(),
            image: SITE_CARD_IMAGE.to_owned(),
            url: SITE_URL.to_owned(),
        },
        featured_crates: featured.content.iter().map(FeaturedCrate::from).collect(),
    })
}

async fn featured_crates(client: &ApiClient) -> Page<Crate> {
    match client.trending_crates(0, FEATURED_COUNT).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "trending crates unavailable, falling back to latest");
            let latest = PageQuery::first(FEATURED_COUNT).sorted(LATEST_SORT);
            supplementary(client.public_crates(&latest).await, "public crates", "home")
        }
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

/// `/{username}`. The user is required; crates, collection and stats are not.
pub async fn profile(app: Arc<App>, req: Request) -> PageResult<ProfileView> {
    let username = req.param("username").unwrap_or_default();
    let client = &app.client;

    let user = required(client.user(username).await, "user", username)?;

    let first = PageQuery::first(PROFILE_PAGE_SIZE);
    let (crates, collection, stats) = tokio::join!(
        client.user_crates(username, &first),
        client.user_collection(username, &first),
        client.social_stats(username),
    );
    let crates = supplementary(crates, "crates", username);
    let collection = supplementary(collection, "collection", username);
    let stats = supplementary(stats, "social stats", username);

    let title = format!("{} - Crates", user.display_name);
    let og = OpenGraph {
        title: title.clone(),
        description: format!("Check out {}'s music crates", user.display_name),
        image: first_image_url(&user.images).unwrap_or_default().to_owned(),
        url: req.path_and_query().to_owned(),
    };

    Ok(Json(ProfileView {
        title,
        has_more: crates.has_next(),
        crates: crates.content,
        has_more_collection: collection.has_next(),
        collection: collection.content,
        stats,
        og,
        user,
    }))
}

// ── Crates ───────────────────────────────────────────────────────────────────

/// `/{username}/{handle}`. A successful load also reports a view upstream.
pub async fn crate_page(app: Arc<App>, req: Request) -> PageResult<CrateView> {
    let username = req.param("username").unwrap_or_default();
    let handle = req.param("handle").unwrap_or_default();
    let client = &app.client;

    let user = required(client.user(username).await, "user", username)?;
    let crate_ = required(client.crate_by_handle(username, handle).await, "crate", handle)?;
    let albums = supplementary(
        client.crate_albums(username, handle, &PageQuery::first(ALBUM_PAGE_SIZE)).await,
        "albums",
        handle,
    );

    record_view(client, crate_.id, &req);
    Ok(Json(crate_view(user, crate_, albums, &req)))
}

/// `/{username}/collection/{handle}`. Someone else's crate, seen through
/// `username`'s collection. Views are only counted on the owner's page.
pub async fn collection_crate_page(app: Arc<App>, req: Request) -> PageResult<CrateView> {
    let username = req.param("username").unwrap_or_default();
    let handle = req.param("handle").unwrap_or_default();
    let client = &app.client;

    let user = required(client.user(username).await, "user", username)?;
    let crate_ = required(
        client.collection_crate(username, handle).await,
        "collection crate",
        handle,
    )?;
    let albums = supplementary(
        client
            .collection_crate_albums(username, handle, &PageQuery::first(ALBUM_PAGE_SIZE))
            .await,
        "collection albums",
        handle,
    );

    Ok(Json(crate_view(user, crate_, albums, &req)))
}

fn crate_view(user: User, crate_: Crate, albums: Page<CrateAlbum>, req: &Request) -> CrateView {
    let title = format!("{} by {}", crate_.name, user.display_name);
    let og = OpenGraph {
        title: title.clone(),
        description: format!("A music crate with {} albums", albums.total_elements),
        image: albums
            .content
            .first()
            .and_then(|a| first_image_url(&a.album.images))
            .unwrap_or_default()
            .to_owned(),
        url: req.path_and_query().to_owned(),
    };
    CrateView {
        title,
        user,
        crate_,
        total_albums: albums.total_elements,
        has_more: albums.has_next(),
        albums: albums.content,
        og,
    }
}

/// Fire-and-forget. The page never waits on this and never sees its outcome.
fn record_view(client: &ApiClient, crate_id: i64, req: &Request) {
    let view = ViewRecord {
        ip_address: req.client_ip(),
        user_agent: req.user_agent().to_owned(),
        referrer: req.header("referer").map(str::to_owned),
    };
    let client = client.clone();
    tokio::spawn(async move {
        if let Err(e) = client.record_crate_view(crate_id, &view).await {
            warn!(crate_id, error = %e, "failed to record crate view");
        }
    });
}

// ── Degradation ──────────────────────────────────────────────────────────────

fn required<T>(result: Result<T, ApiError>, what: &'static str, subject: &str) -> Result<T, Response> {
    result.map_err(|e| {
        if e.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            info!(what, subject, "not found upstream");
        } else {
            warn!(what, subject, error = %e, "required upstream call failed");
        }
        Response::not_found()
    })
}

fn supplementary<T: Default>(result: Result<T, ApiError>, what: &'static str, subject: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(what, subject, error = %e, "supplementary upstream call failed, using empty");
        T::default()
    })
}
