//! Device location delivery
use hifitime::Duration;

use crate::{error::Error, position::GeodeticPosition};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Receives every location fix. `None` may be delivered
/// and means "no update this cycle".
pub type LocationListener = Box<dyn FnMut(Option<GeodeticPosition>) + Send>;

/// Any location provider (GNSS receiver, fused provider, mock..)
/// should implement [LocationSource].
pub trait LocationSource {
    /// Registers the listener. Delivery is asynchronous, in arrival order.
    fn register_listener(&mut self, listener: LocationListener);

    /// Stops delivery and drops the listener.
    fn unregister(&mut self);

    /// Requests a new update interval.
    fn set_update_interval(&mut self, interval: Duration);
}

/// Location update rate, as proposed to the user.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LocationUpdateRate {
    /// One fix every 4 seconds
    #[cfg_attr(feature = "serde", serde(alias = "slow"))]
    Slow,

    /// One fix every 2 seconds. This is our default.
    #[cfg_attr(feature = "serde", serde(alias = "normal"))]
    #[default]
    Normal,

    /// One fix every second
    #[cfg_attr(feature = "serde", serde(alias = "fast"))]
    Fast,
}

impl LocationUpdateRate {
    /// Update interval
    pub fn interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_milliseconds(4000.0),
            Self::Normal => Duration::from_milliseconds(2000.0),
            Self::Fast => Duration::from_milliseconds(1000.0),
        }
    }

    /// Identifies the [LocationUpdateRate] matching this interval
    pub fn from_interval(interval: Duration) -> Result<Self, Error> {
        [Self::Slow, Self::Normal, Self::Fast]
            .into_iter()
            .find(|rate| rate.interval() == interval)
            .ok_or(Error::InvalidUpdateInterval)
    }
}

impl std::str::FromStr for LocationUpdateRate {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            _ => Err(Error::UnknownUpdateRate(s.to_string())),
        }
    }
}

impl std::fmt::Display for LocationUpdateRate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Slow => write!(f, "Slow"),
            Self::Normal => write!(f, "Normal"),
            Self::Fast => write!(f, "Fast"),
        }
    }
}
