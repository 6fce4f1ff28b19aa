//! Device orientation delivery
use hifitime::Duration;
use log::trace;

use crate::{error::Error, math::Matrix4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Receives every device rotation [Matrix4]
pub type OrientationListener = Box<dyn FnMut(Matrix4) + Send>;

/// Any orientation provider (rotation vector sensor, accelerometer and
/// magnetometer fusion, replayed recording..) should implement [OrientationSource].
///
/// Delivered matrices are column-major and already corrected for the
/// display rotation (see [OrientationGate]).
pub trait OrientationSource {
    /// Registers the listener. Delivery is asynchronous, in arrival order.
    fn register_listener(&mut self, listener: OrientationListener);

    /// Stops delivery and drops the listener.
    fn unregister_listener(&mut self);

    /// Requests a new sampling period. Sources with a fixed rate may ignore it.
    fn set_sampling_period(&mut self, _period: Duration) {}
}

/// Accuracy reported by the orientation sensor
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SensorAccuracy {
    /// Readings cannot be trusted (magnetic interference, calibration needed)
    #[default]
    Unreliable,
    Low,
    Medium,
    High,
}

/// Display rotation with respect to the device natural (portrait) orientation
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScreenRotation {
    #[default]
    Rotation0,
    /// Landscape, device turned counter-clockwise
    Rotation90,
    Rotation180,
    /// Landscape, device turned clockwise
    Rotation270,
}

impl std::str::FromStr for ScreenRotation {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('°') {
            "0" => Ok(Self::Rotation0),
            "90" => Ok(Self::Rotation90),
            "180" => Ok(Self::Rotation180),
            "270" => Ok(Self::Rotation270),
            _ => Err(Error::UnknownScreenRotation(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScreenRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Rotation0 => write!(f, "0°"),
            Self::Rotation90 => write!(f, "90°"),
            Self::Rotation180 => write!(f, "180°"),
            Self::Rotation270 => write!(f, "270°"),
        }
    }
}

impl ScreenRotation {
    /// Device axes remapping, applied on the left of the raw rotation.
    /// Only landscape displays are remapped:
    /// - 90°: x' = y, y' = -x
    /// - 270°: x' = -y, y' = x
    fn axes(&self) -> Matrix4 {
        let mut m = Matrix4::identity();
        match self {
            Self::Rotation90 => {
                m[(0, 0)] = 0.0;
                m[(0, 1)] = 1.0;
                m[(1, 0)] = -1.0;
                m[(1, 1)] = 0.0;
            },
            Self::Rotation270 => {
                m[(0, 0)] = 0.0;
                m[(0, 1)] = -1.0;
                m[(1, 0)] = 1.0;
                m[(1, 1)] = 0.0;
            },
            Self::Rotation0 | Self::Rotation180 => {},
        }
        m
    }

    /// Remaps a raw rotation [Matrix4] for this display rotation
    pub fn remap(&self, rotation: &Matrix4) -> Matrix4 {
        self.axes() * rotation
    }
}

/// [OrientationGate] sits between the raw sensor and the [OrientationListener]:
/// it drops readings while the sensor is unreliable and corrects the
/// remaining ones for the current display rotation.
#[derive(Default, Debug, Clone, Copy)]
pub struct OrientationGate {
    accuracy: SensorAccuracy,
    display: ScreenRotation,
}

impl OrientationGate {
    /// New [OrientationGate]. The sensor is deemed unreliable
    /// until it reports otherwise.
    pub fn new(display: ScreenRotation) -> Self {
        Self {
            display,
            accuracy: SensorAccuracy::Unreliable,
        }
    }

    pub fn on_accuracy_changed(&mut self, accuracy: SensorAccuracy) {
        self.accuracy = accuracy;
    }

    pub fn on_display_changed(&mut self, display: ScreenRotation) {
        self.display = display;
    }

    pub fn accuracy(&self) -> SensorAccuracy {
        self.accuracy
    }

    /// Returns the corrected rotation, or None when this reading must be dropped.
    pub fn process(&self, raw: &Matrix4) -> Option<Matrix4> {
        if self.accuracy == SensorAccuracy::Unreliable {
            trace!("dropping unreliable orientation reading");
            return None;
        }
        Some(self.display.remap(raw))
    }
}
