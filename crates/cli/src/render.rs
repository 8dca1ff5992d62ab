//! Terminal renderer.

use std::io::Write;

use moviedeck_core::catalog::{image_url, BACKDROP_SIZE, POSTER_SIZE};
use moviedeck_core::{ListContent, ListView, MovieCard, MovieDetail, Renderer, Section};

/// Prints controller output to stdout, errors to stderr.
pub struct TerminalRenderer {
    image_base_url: String,
}

impl TerminalRenderer {
    pub fn new(image_base_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
        }
    }

    fn print(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", text);
    }
}

fn rating(vote: Option<f64>) -> String {
    match vote {
        Some(v) if v > 0.0 => format!("{:.1}", v),
        _ => "N/A".to_string(),
    }
}

/// One list line: `[id] Title (year) rating genres`, starred when favorite.
pub fn format_card(card: &MovieCard) -> String {
    let movie = &card.movie;
    let year = movie
        .year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let marker = if card.is_favorite { "*" } else { " " };
    let mut line = format!(
        "{} [{}] {}{}  {}",
        marker,
        movie.id,
        movie.title,
        year,
        rating(movie.vote_average)
    );
    if !card.genres.is_empty() {
        line.push_str("  ");
        line.push_str(&card.genres.join(", "));
    }
    line
}

pub fn format_list(view: &ListView) -> String {
    let mut out = format!("== {} ==", view.title);
    if view.has_active_filters {
        out.push_str("  (type 'clear' to reset)");
    }
    match &view.content {
        ListContent::Movies(cards) => {
            for card in cards {
                out.push('\n');
                out.push_str(&format_card(card));
            }
        }
        ListContent::Empty(message) => {
            out.push('\n');
            out.push_str(message);
        }
    }
    out
}

pub fn format_trending(cards: &[MovieCard]) -> String {
    let mut out = String::from("== Trending This Week ==");
    for (rank, card) in cards.iter().enumerate() {
        out.push_str(&format!(
            "\n#{:<2} [{}] {}  {}",
            rank + 1,
            card.movie.id,
            card.movie.title,
            rating(card.movie.vote_average)
        ));
    }
    out
}

pub fn format_detail(detail: &MovieDetail, image_base_url: &str) -> String {
    let movie = &detail.movie;
    let mut lines = vec![format!(
        "== {}{} ==",
        movie.title,
        movie
            .year()
            .map(|y| format!(" ({})", y))
            .unwrap_or_default()
    )];

    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("\"{}\"", tagline));
    }

    let mut facts = vec![format!("Rating: {}", rating(movie.vote_average))];
    if let Some(runtime) = movie.runtime.filter(|r| *r > 0) {
        facts.push(format!("Runtime: {}h {}m", runtime / 60, runtime % 60));
    }
    if let Some(date) = movie.release_date.as_deref().filter(|d| !d.is_empty()) {
        facts.push(format!("Released: {}", date));
    }
    lines.push(facts.join(" | "));

    if !detail.genres.is_empty() {
        lines.push(format!("Genres: {}", detail.genres.join(", ")));
    }
    if !movie.overview.is_empty() {
        lines.push(movie.overview.clone());
    }
    if let Some(path) = &movie.poster_path {
        lines.push(format!("Poster: {}", image_url(image_base_url, POSTER_SIZE, path)));
    }
    if let Some(path) = &movie.backdrop_path {
        lines.push(format!(
            "Backdrop: {}",
            image_url(image_base_url, BACKDROP_SIZE, path)
        ));
    }
    match detail.trailer.as_ref().and_then(|t| t.watch_url()) {
        Some(url) => lines.push(format!("Trailer: {}", url)),
        None => lines.push("No trailer available".to_string()),
    }
    lines.push(if detail.is_favorite {
        format!("In your favorites (fav {} to remove)", movie.id)
    } else {
        format!("Not in favorites (fav {} to add)", movie.id)
    });

    lines.join("\n")
}

impl Renderer for TerminalRenderer {
    fn render_trending(&self, movies: &[MovieCard]) {
        self.print(&format_trending(movies));
    }

    fn render_list(&self, view: &ListView) {
        self.print(&format_list(view));
    }

    fn render_detail(&self, detail: &MovieDetail) {
        self.print(&format_detail(detail, &self.image_base_url));
    }

    fn render_favorite(&self, movie_id: u32, is_favorite: bool) {
        if is_favorite {
            self.print(&format!("Added {} to favorites", movie_id));
        } else {
            self.print(&format!("Removed {} from favorites", movie_id));
        }
    }

    fn render_error(&self, section: Section, message: &str) {
        eprintln!("[{}] {}", section.as_str(), message);
    }

    fn render_fatal(&self, message: &str) {
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moviedeck_core::testing::fixtures;
    use moviedeck_core::ViewMode;

    fn card(id: u32, title: &str, is_favorite: bool) -> MovieCard {
        MovieCard {
            movie: fixtures::movie(id, title),
            genres: vec!["Action".to_string(), "Drama".to_string()],
            is_favorite,
        }
    }

    #[test]
    fn test_format_card() {
        assert_eq!(
            format_card(&card(1, "Heat", true)),
            "* [1] Heat (2020)  7.0  Action, Drama"
        );

        let mut unrated = card(2, "Unknown", false);
        unrated.movie.vote_average = None;
        unrated.movie.release_date = None;
        unrated.genres.clear();
        assert_eq!(format_card(&unrated), "  [2] Unknown  N/A");
    }

    #[test]
    fn test_format_list_empty_and_filtered() {
        let view = ListView {
            mode: ViewMode::Discover,
            title: "Filtered Results".to_string(),
            has_active_filters: true,
            content: ListContent::Empty("No movies found.".to_string()),
        };
        assert_eq!(
            format_list(&view),
            "== Filtered Results ==  (type 'clear' to reset)\nNo movies found."
        );
    }

    #[test]
    fn test_format_trending_ranks() {
        let text = format_trending(&[card(5, "A", false), card(6, "B", false)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("#1 "));
        assert!(lines[2].starts_with("#2 "));
    }

    #[test]
    fn test_format_detail() {
        let mut movie = fixtures::movie(949, "Heat");
        movie.runtime = Some(170);
        movie.tagline = Some("A Los Angeles crime saga".to_string());
        let detail = MovieDetail {
            movie,
            genres: vec!["Crime".to_string()],
            trailer: Some(fixtures::trailer("abc", true)),
            is_favorite: false,
        };

        let text = format_detail(&detail, "https://image.test/t/p/");
        assert!(text.contains("Runtime: 2h 50m"));
        assert!(text.contains("Poster: https://image.test/t/p/w500/poster949.jpg"));
        assert!(text.contains("Trailer: https://www.youtube.com/watch?v=abc"));
        assert!(text.contains("fav 949 to add"));
    }

    #[test]
    fn test_format_detail_without_trailer() {
        let detail = MovieDetail {
            movie: fixtures::movie(1, "Quiet"),
            genres: Vec::new(),
            trailer: None,
            is_favorite: true,
        };
        let text = format_detail(&detail, "https://image.test");
        assert!(text.contains("No trailer available"));
        assert!(text.contains("In your favorites"));
    }
}
