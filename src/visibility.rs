//! Frustum clipping and crosshair target selection
use crate::{math::Vector4, satellite::DrawableSatellite};

/// Frustum test on clip coordinates, before the perspective divide.
/// Bounds are inclusive: a point lying exactly on the frustum edge (|w| = |x|)
/// is visible. Points behind the camera (w <= 0) never are: this `w > 0`
/// requirement is deliberately stricter than the bare `|w| >= |x|, |w| >= |y|` rule.
pub fn in_frustum(clip: &Vector4) -> bool {
    clip.w > 0.0 && clip.w.abs() >= clip.x.abs() && clip.w.abs() >= clip.y.abs()
}

/// Horizon test on observer-local (east, north, up) coordinates:
/// objects below the observer horizon plane are hidden by the Earth.
pub fn above_horizon(local: &Vector4) -> bool {
    local.z >= 0.0
}

/// Retains the [DrawableSatellite]s that pass the frustum test, in order.
pub fn clip(drawables: Vec<DrawableSatellite>) -> Vec<DrawableSatellite> {
    drawables
        .into_iter()
        .filter(|drawable| in_frustum(&drawable.coordinates))
        .collect()
}

/// Returns the visible [DrawableSatellite] closest to the crosshair.
/// On exact ties, the first one in list order wins.
pub fn nearest_to_center(drawables: &[DrawableSatellite]) -> Option<&DrawableSatellite> {
    drawables
        .iter()
        .filter(|drawable| in_frustum(&drawable.coordinates))
        .min_by(|a, b| {
            a.distance_from_center()
                .total_cmp(&b.distance_from_center())
        })
}
