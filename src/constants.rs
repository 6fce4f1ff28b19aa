/// Earth equatorial radius (kilometers)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.1366;

/// Below this (x, y, z) magnitude, a vector is considered null
/// and may not be normalized.
pub const DEGENERATE_MAGNITUDE: f64 = 1.0E-9;

/// Below this |w|, the perspective divide is not attempted
/// and the point collapses onto the screen center.
pub const PERSPECTIVE_EPSILON: f64 = 1.0E-12;

/// Axes renaming from ECI naming (X toward the reference meridian, Z north)
/// to phone naming (X east, Y north, Z up), column-major.
/// ECI X becomes phone Z, ECI Y becomes phone X and ECI Z becomes phone Y.
pub const TRANSFORM_AXES: [f64; 16] = [
    0.0, 0.0, 1.0, 0.0, //
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, //
];

/// Celestial pole (ECI Z) expressed in phone naming.
/// Seeds the local north axis.
pub const WORLD_UP: [f64; 4] = [0.0, 1.0, 0.0, 1.0];

/// Horizontal field of view (degrees) applied when none is configured.
pub const DEFAULT_FIELD_OF_VIEW_DEG: f64 = 45.0;

/// Debug gizmo: arrow length
pub const GIZMO_ARROW_LENGTH: f64 = 0.5;

/// Debug gizmo: distance in front of the camera
pub const GIZMO_DISTANCE: f64 = 4.0;

/// Debug gizmo: radius of the dot marking each arrow origin (pixels)
pub const GIZMO_DOT_RADIUS_PX: f64 = 10.0;

/// Stroke width of every line we draw (pixels)
pub const STROKE_WIDTH_PX: f64 = 2.0;
