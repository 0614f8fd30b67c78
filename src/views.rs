//! View models.
//!
//! What a page handler hands to the renderer. Serialised as camelCase JSON;
//! the proxy has no opinion on how they end up on screen.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::{Crate, CrateAlbum, SocialStats, User};

pub const SITE_TITLE: &str = "Crates - Organize Your Spotify Albums";
pub const SITE_DESCRIPTION: &str = "Organize your Spotify albums into custom categories, discover curated collections from other music lovers, and rediscover the joy of full albums.";
pub const SITE_URL: &str = "https://crates.page";
pub const SITE_CARD_IMAGE: &str = "https://crates.page/static/images/crates-card.png";

/// Open Graph tags for link previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub title: String,
    pub og: OpenGraph,
    pub featured_crates: Vec<FeaturedCrate>,
}

/// A crate on the home page, flattened with its owner's public name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedCrate {
    pub id: i64,
    pub name: String,
    pub handle: String,
    pub owner_name: String,
    pub owner_spotify_id: String,
    pub image_uri: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Crate> for FeaturedCrate {
    fn from(c: &Crate) -> Self {
        let (owner_name, owner_spotify_id) = match &c.user {
            Some(owner) => (owner.public_name().to_owned(), owner.spotify_id.clone()),
            None => ("Unknown".to_owned(), "unknown".to_owned()),
        };
        Self {
            id: c.id,
            name: c.name.clone(),
            handle: c.handle.clone(),
            owner_name,
            owner_spotify_id,
            image_uri: c.image_uri.clone(),
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub title: String,
    pub user: User,
    pub crates: Vec<Crate>,
    pub has_more: bool,
    pub collection: Vec<Crate>,
    pub has_more_collection: bool,
    pub stats: SocialStats,
    pub og: OpenGraph,
}

/// A crate page, either one the user owns or one in their collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrateView {
    pub title: String,
    pub user: User,
    #[serde(rename = "crate")]
    pub crate_: Crate,
    pub albums: Vec<CrateAlbum>,
    pub total_albums: u64,
    pub has_more: bool,
    pub og: OpenGraph,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PublicUser;

    fn crate_owned_by(user: Option<PublicUser>) -> Crate {
        Crate {
            id: 7,
            name: "Warehouse".into(),
            handle: "warehouse".into(),
            created_at: None,
            updated_at: None,
            state: None,
            image_uri: Some("https://i.scdn.co/image/w".into()),
            public_crate: true,
            description: None,
            user,
            follower_count: 0,
        }
    }

    #[test]
    fn featured_crate_names_owner() {
        let owner = PublicUser {
            spotify_id: "spotify-alice".into(),
            display_name: Some("Alice".into()),
            handle: Some("alice".into()),
            bio: None,
            images: vec![],
        };
        let featured = FeaturedCrate::from(&crate_owned_by(Some(owner)));
        assert_eq!(featured.owner_name, "alice");
        assert_eq!(featured.owner_spotify_id, "spotify-alice");

        let featured = FeaturedCrate::from(&crate_owned_by(None));
        assert_eq!(featured.owner_name, "Unknown");
        assert_eq!(featured.owner_spotify_id, "unknown");
    }

    #[test]
    fn crate_field_serialises_as_crate() {
        let view = CrateView {
            title: "Warehouse by Alice".into(),
            user: User {
                id: 1,
                spotify_id: "spotify-alice".into(),
                display_name: "Alice".into(),
                email: None,
                handle: None,
                bio: None,
                images: vec![],
            },
            crate_: crate_owned_by(None),
            albums: vec![],
            total_albums: 0,
            has_more: false,
            og: OpenGraph {
                title: String::new(),
                description: String::new(),
                image: String::new(),
                url: String::new(),
            },
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["crate"]["handle"], "warehouse");
        assert_eq!(json["hasMore"], false);
        assert_eq!(json["totalAlbums"], 0);
    }
}
