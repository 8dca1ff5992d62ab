//! Types for catalog API responses and browsing filters.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Video host whose trailers are eligible for the detail view.
pub const YOUTUBE_SITE: &str = "YouTube";

/// Image size used for posters.
pub const POSTER_SIZE: &str = "w500";

/// Image size used for backdrops.
pub const BACKDROP_SIZE: &str = "original";

// ============================================================================
// Movies
// ============================================================================

/// A catalog movie, as returned by list and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Catalog movie ID.
    pub id: u32,
    /// Movie title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Plot overview.
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Poster image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// Genre IDs (list endpoints).
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
    /// Full genre objects (detail endpoint).
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    /// Popularity score.
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    /// Runtime in minutes (detail endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    /// Tagline (detail endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

impl Movie {
    /// Release date parsed as a calendar date.
    pub fn parsed_release_date(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Release year, if the release date is known.
    pub fn year(&self) -> Option<i32> {
        if let Some(date) = self.parsed_release_date() {
            return Some(date.year());
        }
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }

    /// Display names of this movie's genres.
    ///
    /// Full genre objects win when present; otherwise genre IDs are resolved
    /// through `index`, skipping unknown IDs.
    pub fn genre_names(&self, index: &GenreIndex) -> Vec<String> {
        if !self.genres.is_empty() {
            return self.genres.iter().map(|g| g.name.clone()).collect();
        }
        self.genre_ids
            .iter()
            .filter_map(|id| index.name(*id))
            .map(str::to_string)
            .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Build a full image URL from the image base, a size and an image path.
pub fn image_url(base_url: &str, size: &str, path: &str) -> String {
    format!("{}/{}{}", base_url.trim_end_matches('/'), size, path)
}

// ============================================================================
// Genres
// ============================================================================

/// A movie genre.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Genre ID to name lookup, built once per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreIndex {
    names: HashMap<u32, String>,
}

impl GenreIndex {
    pub fn new(genres: Vec<Genre>) -> Self {
        Self {
            names: genres.into_iter().map(|g| (g.id, g.name)).collect(),
        }
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All genres ordered by name, for filter pickers.
    pub fn sorted(&self) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self
            .names
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: name.clone(),
            })
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        genres
    }
}

// ============================================================================
// Videos
// ============================================================================

/// A video attached to a movie (trailer, teaser, clip...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    /// Host-specific video key.
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub official: bool,
}

impl Video {
    /// Whether this is a trailer hosted on YouTube.
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == YOUTUBE_SITE && self.kind == "Trailer"
    }

    /// Watch URL for YouTube-hosted videos.
    pub fn watch_url(&self) -> Option<String> {
        (self.site == YOUTUBE_SITE).then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Sort orders offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
    #[serde(rename = "release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "title.asc")]
    TitleAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::PopularityDesc,
        SortKey::VoteAverageDesc,
        SortKey::ReleaseDateDesc,
        SortKey::TitleAsc,
    ];

    /// Parse a wire value. Empty and unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value.trim())
    }

    /// Wire value, as sent in `sort_by`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "popularity.desc",
            SortKey::VoteAverageDesc => "vote_average.desc",
            SortKey::ReleaseDateDesc => "release_date.desc",
            SortKey::TitleAsc => "title.asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "Most Popular",
            SortKey::VoteAverageDesc => "Highest Rated",
            SortKey::ReleaseDateDesc => "Newest First",
            SortKey::TitleAsc => "Title (A-Z)",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active browse filters. All fields empty means "no filter".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
}

impl FilterState {
    /// Build filters from raw picker values; empty or invalid values are unset.
    pub fn from_inputs(genre: &str, year: &str, sort: &str) -> Self {
        Self {
            genre: genre.trim().parse().ok(),
            year: year.trim().parse().ok(),
            sort: SortKey::parse(sort),
        }
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.genre.is_none() && self.year.is_none() && self.sort.is_none()
    }
}
