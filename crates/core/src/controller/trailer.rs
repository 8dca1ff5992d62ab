use crate::catalog::Video;

/// Pick the trailer to show for a movie.
///
/// An official YouTube trailer wins; otherwise the first YouTube trailer;
/// otherwise none.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.is_youtube_trailer() && v.official)
        .or_else(|| videos.iter().find(|v| v.is_youtube_trailer()))
}
