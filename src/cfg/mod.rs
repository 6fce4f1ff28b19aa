use hifitime::Duration;
use log::error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::DEFAULT_FIELD_OF_VIEW_DEG, error::Error, location::LocationUpdateRate,
};

fn default_field_of_view() -> f64 {
    DEFAULT_FIELD_OF_VIEW_DEG
}

fn default_near_km() -> f64 {
    1.0
}

fn default_far_km() -> f64 {
    50_000.0
}

fn default_orientation_sampling() -> Duration {
    Duration::from_milliseconds(33.0)
}

fn default_horizon_clip() -> bool {
    true
}

fn default_debug_gizmo() -> bool {
    true
}

fn default_marker_radius() -> f64 {
    10.0
}

fn default_cursor_radius() -> f64 {
    20.0
}

/// Overlay [Config]uration. Created once, validated at this boundary,
/// then handed down explicitly to every stage that needs it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Horizontal field of view of the camera preview, in degrees.
    /// Must be positive, below 270° and different from 180°.
    #[cfg_attr(feature = "serde", serde(default = "default_field_of_view"))]
    pub field_of_view_deg: f64,

    /// Near clipping plane (kilometers)
    #[cfg_attr(feature = "serde", serde(default = "default_near_km"))]
    pub near_km: f64,

    /// Far clipping plane (kilometers). Geostationary orbits
    /// sit about 36 000 km away.
    #[cfg_attr(feature = "serde", serde(default = "default_far_km"))]
    pub far_km: f64,

    /// [LocationUpdateRate] requested from the location source
    #[cfg_attr(feature = "serde", serde(default))]
    pub location_rate: LocationUpdateRate,

    /// Orientation sensor sampling period
    #[cfg_attr(feature = "serde", serde(default = "default_orientation_sampling"))]
    pub orientation_sampling: Duration,

    /// Hide satellites below the observer horizon
    #[cfg_attr(feature = "serde", serde(default = "default_horizon_clip"))]
    pub horizon_clip: bool,

    /// Draw the device axes gizmo
    #[cfg_attr(feature = "serde", serde(default = "default_debug_gizmo"))]
    pub debug_gizmo: bool,

    /// Satellite marker radius (pixels)
    #[cfg_attr(feature = "serde", serde(default = "default_marker_radius"))]
    pub marker_radius_px: f64,

    /// Center cursor radius (pixels)
    #[cfg_attr(feature = "serde", serde(default = "default_cursor_radius"))]
    pub cursor_radius_px: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_of_view_deg: default_field_of_view(),
            near_km: default_near_km(),
            far_km: default_far_km(),
            location_rate: LocationUpdateRate::default(),
            orientation_sampling: default_orientation_sampling(),
            horizon_clip: default_horizon_clip(),
            debug_gizmo: default_debug_gizmo(),
            marker_radius_px: default_marker_radius(),
            cursor_radius_px: default_cursor_radius(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with updated field of view (degrees)
    pub fn with_field_of_view(&self, fov_deg: f64) -> Self {
        let mut s = self.clone();
        s.field_of_view_deg = fov_deg;
        s
    }

    /// Copies and returns [Config] with updated clipping planes (kilometers)
    pub fn with_clip_planes(&self, near_km: f64, far_km: f64) -> Self {
        let mut s = self.clone();
        s.near_km = near_km;
        s.far_km = far_km;
        s
    }

    /// Copies and returns [Config] with updated [LocationUpdateRate]
    pub fn with_location_rate(&self, rate: LocationUpdateRate) -> Self {
        let mut s = self.clone();
        s.location_rate = rate;
        s
    }

    /// Copies and returns [Config] with horizon clipping enabled or disabled
    pub fn with_horizon_clip(&self, horizon_clip: bool) -> Self {
        let mut s = self.clone();
        s.horizon_clip = horizon_clip;
        s
    }

    /// Copies and returns [Config] with the axes gizmo enabled or disabled
    pub fn with_debug_gizmo(&self, debug_gizmo: bool) -> Self {
        let mut s = self.clone();
        s.debug_gizmo = debug_gizmo;
        s
    }

    /// Verifies this [Config]. Anything rejected here would otherwise
    /// be a fatal error in the projection stage.
    pub fn validate(&self) -> Result<(), Error> {
        let fov = self.field_of_view_deg;
        if !fov.is_finite() || fov <= 0.0 || fov >= 270.0 || fov == 180.0 {
            error!("rejected field of view: {}°", fov);
            return Err(Error::InvalidFieldOfView(fov));
        }

        let (near, far) = (self.near_km, self.far_km);
        if !near.is_finite() || !far.is_finite() || near <= 0.0 || far <= near {
            error!("rejected clipping planes: near={}km far={}km", near, far);
            return Err(Error::InvalidClipPlanes { near, far });
        }

        if self.orientation_sampling <= Duration::ZERO {
            error!("rejected orientation sampling period");
            return Err(Error::InvalidUpdateInterval);
        }

        Ok(())
    }
}
