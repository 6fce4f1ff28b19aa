#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod error;
mod frame;
mod fusion;
mod location;
mod math;
mod orientation;
mod position;
mod projection;
mod render;
mod satellite;
mod scene;
mod session;
mod time;
mod visibility;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::Config;
    pub use crate::error::Error;
    pub use crate::frame::ObserverFrame;
    pub use crate::fusion::{
        actor::{FusionActor, FusionEvent, FusionHandle},
        selection::SelectionFeed,
        FusionPhase, FusionState, TransformSnapshot,
    };
    pub use crate::location::{LocationListener, LocationSource, LocationUpdateRate};
    pub use crate::math::{Matrix4, Vector4};
    pub use crate::orientation::{
        OrientationGate, OrientationListener, OrientationSource, ScreenRotation, SensorAccuracy,
    };
    pub use crate::position::{GeodeticPosition, ObserverPosition};
    pub use crate::projection::{Projection, ScreenOffset};
    pub use crate::render::{Canvas, Color, RenderPass};
    pub use crate::satellite::{DrawableSatellite, Propagator, SatelliteId, SatelliteState};
    pub use crate::scene::{Frame, Scene, TargetInfo};
    pub use crate::session::Session;
    pub use crate::time::{Clock, FixedClock, SystemClock};
    // re-export
    pub use hifitime::{Duration, Epoch};
}

/// Homogeneous vector and column-major matrix kernel
pub mod kernel {
    pub use crate::constants::EARTH_EQUATORIAL_RADIUS_KM;
    pub use crate::math::{
        cross_product, dot_product, from_column_major, magnitude, multiply_matrices,
        multiply_matrix_vector, normalize, point, subtract, to_column_major,
        transform_axes_matrix, world_up,
    };
    pub use crate::projection::{
        frustum_width, ndc_to_screen, perspective, perspective_divide, project, projection_matrix,
    };
    pub use crate::visibility::{above_horizon, clip, in_frustum, nearest_to_center};
}

// pub export
pub use error::Error;
