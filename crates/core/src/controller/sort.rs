//! Client-side ordering of movie lists.
//!
//! Only search results and favorites are sorted here; discover and trending
//! keep the order the catalog returned.

use chrono::NaiveDate;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::{Movie, SortKey};

/// Return `movies` ordered by `key`.
///
/// The sort is stable and never touches the input. `None` keeps the input
/// order. Missing or unparsable release dates sort as the earliest possible
/// date, so they come last under `release_date.desc`.
pub fn sort_movies(movies: &[Movie], key: Option<SortKey>) -> Vec<Movie> {
    let mut sorted = movies.to_vec();

    match key {
        None => {}
        Some(SortKey::PopularityDesc) => {
            sorted.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        }
        Some(SortKey::VoteAverageDesc) => {
            sorted.sort_by(|a, b| vote(b).total_cmp(&vote(a)));
        }
        Some(SortKey::ReleaseDateDesc) => {
            sorted.sort_by_key(|m| std::cmp::Reverse(release_date(m)));
        }
        Some(SortKey::TitleAsc) => {
            sorted.sort_by_cached_key(|m| collation_key(&m.title));
        }
    }

    sorted
}

fn vote(movie: &Movie) -> f64 {
    movie.vote_average.unwrap_or(0.0)
}

fn release_date(movie: &Movie) -> NaiveDate {
    movie.parsed_release_date().unwrap_or(NaiveDate::MIN)
}

/// Case- and accent-insensitive key, so "Élan" sorts next to "elan".
fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
