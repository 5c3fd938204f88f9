//! Closed profile normalization

use glam::DVec2;

/// Errors raised while preparing a point profile
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile has no points")]
    Empty,
}

/// Whether the first and last points are exactly equal
pub fn is_closed(points: &[DVec2]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// Close a point sequence by repeating its first point at the end
///
/// Comparison is exact. A sequence that already ends on its first point is
/// returned unchanged, including a single point.
pub fn close_profile(mut points: Vec<DVec2>) -> Result<Vec<DVec2>, ProfileError> {
    let first = *points.first().ok_or(ProfileError::Empty)?;
    if !is_closed(&points) {
        points.push(first);
    }
    Ok(points)
}

/// Number of segments a closed sequence produces
pub fn segment_count(closed: &[DVec2]) -> usize {
    closed.len().saturating_sub(1)
}
