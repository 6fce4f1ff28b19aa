use thiserror::Error;

/// Errors that may be reported by the transform, projection and fusion stages.
/// Most of them never escape a frame: the fusion state and the scene composer
/// log them and keep the previous state, or skip the offending satellite.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Normalizing a vector whose (x, y, z) magnitude is below
    /// [crate::constants::DEGENERATE_MAGNITUDE]. Happens when the observer
    /// sits on the celestial pole axis, or when a propagator returns a null vector.
    #[error("degenerate geometry: cannot normalize a null vector")]
    DegenerateVector,

    /// Horizontal field of view must be positive, below 270° and different from 180°.
    #[error("invalid field of view: {0}°")]
    InvalidFieldOfView(f64),

    #[error("invalid clipping planes: near={near}km far={far}km")]
    InvalidClipPlanes { near: f64, far: f64 },

    /// Render surface is empty or has a non finite aspect ratio.
    #[error("invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    #[error("invalid update interval")]
    InvalidUpdateInterval,

    #[error("unknown location update rate \"{0}\"")]
    UnknownUpdateRate(String),

    #[error("unknown screen rotation \"{0}\"")]
    UnknownScreenRotation(String),

    /// The ECI to phone transform needs at least one selected satellite,
    /// whose propagator provides the observer vector.
    #[error("no satellite selected")]
    NoSelectedSatellites,

    /// External propagator failure (decayed orbit, no roots, ..)
    #[error("propagation error: {0}")]
    Propagation(String),

    /// The fusion actor is no longer running.
    #[error("fusion actor is closed")]
    FusionClosed,
}
