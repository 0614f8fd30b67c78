//! Upstream JSON shapes.
//!
//! Field names follow the backend's camelCase wire format. Anything the
//! backend may send as `null` is an `Option`; missing collections default to
//! empty. Unknown fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of a paged collection, exactly as upstream reports it.
///
/// Nothing here is recomputed. `last` is the only authority on whether a
/// next page exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub size: u32,
    /// Zero-based page index.
    pub number: u32,
    pub number_of_elements: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    /// The stand-in for a supplementary collection that failed to load.
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            total_elements: 0,
            size: 0,
            number: 0,
            number_of_elements: 0,
            first: true,
            last: true,
            empty: true,
        }
    }

    pub fn has_next(&self) -> bool {
        !self.last
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// URL of the first image, the display policy used everywhere.
pub fn first_image_url(images: &[Image]) -> Option<&str> {
    images.first().map(|image| image.url.as_str())
}

/// Full profile returned by the user lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub spotify_id: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Owner snapshot embedded in crates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub spotify_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl PublicUser {
    /// Custom handle when one is set, otherwise the Spotify id.
    pub fn public_name(&self) -> &str {
        match self.handle.as_deref() {
            Some(handle) if !handle.is_empty() => handle,
            _ => &self.spotify_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crate {
    pub id: i64,
    pub name: String,
    pub handle: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub public_crate: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user: Option<PublicUser>,
    #[serde(default)]
    pub follower_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: i64,
    #[serde(default)]
    pub spotify_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    #[serde(default)]
    pub spotify_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// An album placed in a crate, with the time it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrateAlbum {
    pub id: i64,
    pub album: Album,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Point-in-time follow counts. The zero value doubles as the fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialStats {
    pub following_count: u64,
    pub follower_count: u64,
}

/// Body of the view notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CRATES_PAGE: &str = include_str!("../../tests/fixtures/crates_page.json");

    #[test]
    fn page_is_passed_through_verbatim() {
        let page: Page<Crate> = serde_json::from_str(CRATES_PAGE).unwrap();

        assert_eq!(page.total_elements, 14);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.number, 1);
        assert_eq!(page.number_of_elements, 3);
        // upstream says last even though number < total_pages - 1; keep it
        assert!(page.last);
        assert!(!page.has_next());
        assert_eq!(
            page.content.iter().map(|c| c.handle.as_str()).collect::<Vec<_>>(),
            vec!["late-night", "sunday-morning", "warehouse"],
        );
    }

    #[test]
    fn nullable_fields_decode() {
        let page: Page<Crate> = serde_json::from_str(CRATES_PAGE).unwrap();
        let owner = page.content[0].user.as_ref().unwrap();
        assert_eq!(owner.handle, None);
        assert_eq!(owner.public_name(), "spotify-alice");
        assert_eq!(page.content[0].description, None);
        assert!(page.content[1].user.is_none());
        assert_eq!(page.content[2].follower_count, 8);
    }

    #[test]
    fn empty_page_says_last() {
        let page = Page::<CrateAlbum>::empty();
        assert!(page.content.is_empty());
        assert!(page.last && page.first && page.empty);
        assert_eq!(page, Page::default());
    }

    #[test]
    fn public_name_prefers_non_empty_handle() {
        let mut owner = PublicUser {
            spotify_id: "spotify-bob".into(),
            display_name: Some("Bob".into()),
            handle: Some(String::new()),
            bio: None,
            images: vec![],
        };
        assert_eq!(owner.public_name(), "spotify-bob");
        owner.handle = Some("bob".into());
        assert_eq!(owner.public_name(), "bob");
    }

    #[test]
    fn crate_album_decodes_timestamps() {
        let json = r#"{
            "id": 9,
            "createdAt": "2024-03-01T12:00:00Z",
            "album": {
                "id": 3,
                "spotifyId": "4aawyAB9vmqN3uQ7FjRGTy",
                "name": "Global Communication 76:14",
                "popularity": 41,
                "releaseDate": "1994-08-01T00:00:00Z",
                "artists": [{ "id": 1, "name": "Global Communication" }],
                "images": [{ "url": "https://i.scdn.co/image/a", "width": 640, "height": 640 }],
                "genres": [{ "id": 2, "name": "ambient" }]
            }
        }"#;
        let item: CrateAlbum = serde_json::from_str(json).unwrap();
        assert_eq!(item.created_at.unwrap().to_rfc3339(), "2024-03-01T12:00:00+00:00");
        assert_eq!(first_image_url(&item.album.images), Some("https://i.scdn.co/image/a"));
        assert_eq!(item.album.genres[0].name, "ambient");
    }

    #[test]
    fn view_record_serialises_camel_case() {
        let view = ViewRecord {
            ip_address: "203.0.113.7".into(),
            user_agent: "Mozilla/5.0".into(),
            referrer: None,
        };
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({ "ipAddress": "203.0.113.7", "userAgent": "Mozilla/5.0", "referrer": null }),
        );
    }
}
