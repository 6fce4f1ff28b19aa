//! Geodetic coordinates
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geodetic position snapshot, as delivered by the location provider
/// or by orbital propagation (sub-satellite point).
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticPosition {
    /// Latitude in degrees
    pub latitude_deg: f64,
    /// Longitude in degrees
    pub longitude_deg: f64,
    /// Altitude above sea level in kilometers
    pub altitude_km: f64,
}

impl GeodeticPosition {
    /// Builds new [GeodeticPosition]
    /// - latitude [deg]
    /// - longitude [deg]
    /// - altitude above sea level [km]
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_km: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_km,
        }
    }

    /// Latitude in radians
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    /// Longitude in radians
    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    /// Returns a copy with longitude wrapped into [-180°, 180°].
    /// Propagators tend to return longitudes in [0, 360°[.
    pub fn wrapped(&self) -> Self {
        let lon = self.longitude_deg;
        if !lon.is_finite() || (-180.0..=180.0).contains(&lon) {
            return *self;
        }
        let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        Self {
            longitude_deg: lon,
            ..*self
        }
    }

    /// True when all coordinates are finite and latitude is physical
    pub fn is_valid(&self) -> bool {
        self.latitude_deg.is_finite()
            && self.longitude_deg.is_finite()
            && self.altitude_km.is_finite()
            && self.latitude_deg.abs() <= 90.0
    }
}

impl std::fmt::Display for GeodeticPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "lat={:.4}°, lon={:.4}°, alt={:.3}km",
            self.latitude_deg, self.longitude_deg, self.altitude_km
        )
    }
}

/// [ObserverPosition] is the ground station: the phone location at its last fix.
/// It drives both the propagation requests and the observer frame.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObserverPosition {
    geodetic: GeodeticPosition,
}

impl ObserverPosition {
    /// Builds new [ObserverPosition] from a location fix
    pub fn from_geodetic(geodetic: GeodeticPosition) -> Self {
        Self { geodetic }
    }

    /// Returns [GeodeticPosition] of this observer
    pub fn geodetic(&self) -> GeodeticPosition {
        self.geodetic
    }
}

impl From<GeodeticPosition> for ObserverPosition {
    fn from(geodetic: GeodeticPosition) -> Self {
        Self::from_geodetic(geodetic)
    }
}

impl std::fmt::Display for ObserverPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "observer {}", self.geodetic)
    }
}
