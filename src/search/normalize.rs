// Maps heterogeneous raw records (movie / tv / person) into uniform,
// display-ready search results.

use serde::Deserialize;

use crate::services::tmdb::{MediaKind, RawRecord};

/// Where and at what resolution cover/backdrop URLs point.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub base_url: String,
    pub cover_size: String,
    pub backdrop_size: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            base_url: "http://image.tmdb.org/t/p".to_string(),
            cover_size: "w342".to_string(),
            backdrop_size: "w1280".to_string(),
        }
    }
}

impl ImageOptions {
    /// Build an image URL for a record path. The URL is built even when
    /// the path is empty; the image consumer treats that as "no image".
    fn url(&self, size: &str, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, size, path)
    }
}

/// The uniform representation of one search result.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Display title, e.g. `"The Matrix (Movie, 1999)"`.
    pub title: String,
    pub ident: String,
    pub kind: MediaKind,
    pub cover_url: String,
    pub backdrop_url: String,
}

/// First four characters of a date string; shorter strings pass through.
pub fn year_from_date(date: &str) -> &str {
    match date.char_indices().nth(4) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}

/// Convert one raw record into zero or one normalized record.
///
/// An explicit `media_type` wins; otherwise `implied_kind` (set for the
/// fixed movie listings) applies. Records with no resolvable kind, no
/// identifier or no title are dropped.
pub fn normalize_record(
    raw: &RawRecord,
    implied_kind: Option<MediaKind>,
    images: &ImageOptions,
) -> Option<NormalizedRecord> {
    let kind = MediaKind::from_raw(&raw.media_type).or(implied_kind)?;

    let ident = raw.ident();
    if ident.is_empty() {
        return None;
    }

    let base_name = match kind {
        MediaKind::Movie => &raw.title,
        MediaKind::Tv | MediaKind::Person => &raw.name,
    };
    if base_name.is_empty() {
        return None;
    }

    let title = match kind {
        MediaKind::Movie => format!(
            "{} (Movie, {})",
            raw.title,
            year_from_date(&raw.release_date)
        ),
        MediaKind::Tv => format!(
            "{} (Series, {})",
            raw.name,
            year_from_date(&raw.first_air_date)
        ),
        MediaKind::Person => format!("{} (Person)", raw.name),
    };

    // Persons have a profile picture where movies and series have a poster.
    let cover_path = match kind {
        MediaKind::Person => &raw.profile_path,
        _ => &raw.poster_path,
    };

    Some(NormalizedRecord {
        title,
        ident,
        kind,
        cover_url: images.url(&images.cover_size, cover_path),
        backdrop_url: images.url(&images.backdrop_size, &raw.backdrop_path),
    })
}
