//! Tracked satellites and their propagation interface
use std::sync::Arc;

use hifitime::Epoch;

use crate::{
    error::Error,
    math::{subtract, Vector4},
    position::{GeodeticPosition, ObserverPosition},
    projection::perspective_divide,
};

/// Satellite catalog number (NORAD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SatelliteId(pub u32);

impl std::fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{:05}", self.0)
    }
}

/// Any orbital propagator (SGP4/SDP4 from a TLE, ephemeris interpolation, ..)
/// should implement the [Propagator] trait to take part in the overlay.
///
/// All vectors are ECI, in kilometers, and are tagged `w = 1.0`.
/// Within one recompute or render pass, the observer vector and the
/// satellite vector are always requested for the same [Epoch].
pub trait Propagator: Send + Sync {
    /// ECI vector from Earth center to the observer, at requested [Epoch].
    fn observer_vector_at(
        &self,
        observer: &ObserverPosition,
        epoch: Epoch,
    ) -> Result<Vector4, Error>;

    /// ECI vector from Earth center to the satellite, at requested [Epoch].
    fn position_vector_at(
        &self,
        observer: &ObserverPosition,
        epoch: Epoch,
    ) -> Result<Vector4, Error>;

    /// Sub-satellite point at requested [Epoch].
    fn geodetic_at(&self, epoch: Epoch) -> Result<GeodeticPosition, Error>;
}

/// [SatelliteState] is one selected satellite, with its orbital model.
/// States are cheap to clone: the [Propagator] is shared.
#[derive(Clone)]
pub struct SatelliteState {
    id: SatelliteId,
    name: String,
    propagator: Arc<dyn Propagator>,
}

impl std::fmt::Debug for SatelliteState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SatelliteState")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl std::fmt::Display for SatelliteState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

impl SatelliteState {
    /// Creates a new [SatelliteState]
    pub fn new(id: SatelliteId, name: &str, propagator: Arc<dyn Propagator>) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            propagator,
        }
    }

    /// Creates a new [SatelliteState] only if its [Propagator] can be evaluated
    /// at this [Epoch]. Satellites whose orbit cannot be resolved are never selected.
    pub fn try_new(
        id: SatelliteId,
        name: &str,
        propagator: Arc<dyn Propagator>,
        epoch: Epoch,
    ) -> Result<Self, Error> {
        propagator.geodetic_at(epoch)?;
        Ok(Self::new(id, name, propagator))
    }

    pub fn id(&self) -> SatelliteId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// See [Propagator::observer_vector_at]
    pub fn observer_vector_at(
        &self,
        observer: &ObserverPosition,
        epoch: Epoch,
    ) -> Result<Vector4, Error> {
        self.propagator.observer_vector_at(observer, epoch)
    }

    /// See [Propagator::position_vector_at]
    pub fn position_vector_at(
        &self,
        observer: &ObserverPosition,
        epoch: Epoch,
    ) -> Result<Vector4, Error> {
        self.propagator.position_vector_at(observer, epoch)
    }

    /// Sub-satellite point, longitude wrapped into [-180°, 180°]
    pub fn geodetic_at(&self, epoch: Epoch) -> Result<GeodeticPosition, Error> {
        Ok(self.propagator.geodetic_at(epoch)?.wrapped())
    }

    /// Observer to satellite ECI point (`w = 1.0`), both vectors being
    /// evaluated at the same [Epoch].
    pub fn relative_vector_at(
        &self,
        observer: &ObserverPosition,
        epoch: Epoch,
    ) -> Result<Vector4, Error> {
        let satellite = self.position_vector_at(observer, epoch)?;
        let station = self.observer_vector_at(observer, epoch)?;
        Ok(subtract(&satellite, &station, 1.0))
    }
}

/// [DrawableSatellite] is a visible satellite of one render frame,
/// with its clip coordinates (not divided yet).
#[derive(Debug, Clone)]
pub struct DrawableSatellite {
    pub satellite: SatelliteState,
    pub coordinates: Vector4,
}

impl PartialEq for DrawableSatellite {
    /// Same satellite and bitwise identical coordinates
    fn eq(&self, rhs: &Self) -> bool {
        self.satellite.id == rhs.satellite.id
            && self
                .coordinates
                .iter()
                .zip(rhs.coordinates.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl DrawableSatellite {
    pub fn new(satellite: SatelliteState, coordinates: Vector4) -> Self {
        Self {
            satellite,
            coordinates,
        }
    }

    /// Normalized device coordinates
    pub fn ndc(&self) -> (f64, f64) {
        perspective_divide(&self.coordinates)
    }

    /// Distance from the crosshair (NDC origin)
    pub fn distance_from_center(&self) -> f64 {
        let (x, y) = self.ndc();
        x.hypot(y)
    }
}
