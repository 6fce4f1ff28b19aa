//! Location, orientation and satellite selection fusion
use hifitime::Epoch;
use itertools::Itertools;
use log::{debug, warn};

use crate::{
    error::Error,
    frame::ObserverFrame,
    math::{Matrix4, Vector4},
    position::{GeodeticPosition, ObserverPosition},
    satellite::SatelliteState,
};

pub mod actor;
pub mod selection;

/// [FusionPhase] describes which inputs have been received so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FusionPhase {
    /// Neither location nor orientation received:
    /// the transform is the identity and nothing is drawn.
    #[default]
    Idle,
    /// Only one of the location and orientation streams delivered,
    /// or no satellite is selected.
    Partial,
    /// Location and orientation received, at least one satellite selected.
    /// The transform follows every update.
    Live,
}

impl std::fmt::Display for FusionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Partial => write!(f, "partial"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// [TransformSnapshot] is the immutable image of the fusion state,
/// as published after each update. Consumers only ever see copies.
#[derive(Debug, Clone)]
pub struct TransformSnapshot {
    /// Increases with every state change
    pub revision: u64,
    /// [Epoch] of the last transform computation
    pub epoch: Option<Epoch>,
    pub phase: FusionPhase,
    /// Latest device rotation (identity until the first reading)
    pub rotation: Matrix4,
    /// ECI to local (east, north, up) transform, before device rotation
    pub eci_to_local: Matrix4,
    /// ECI to phone transform (identity until the first computation)
    pub eci_to_phone: Matrix4,
    /// Latest observer fix
    pub observer: Option<ObserverPosition>,
    /// Selected satellites
    pub satellites: Vec<SatelliteState>,
}

impl Default for TransformSnapshot {
    fn default() -> Self {
        Self {
            revision: 0,
            epoch: None,
            phase: FusionPhase::Idle,
            rotation: Matrix4::identity(),
            eci_to_local: Matrix4::identity(),
            eci_to_phone: Matrix4::identity(),
            observer: None,
            satellites: Vec::new(),
        }
    }
}

/// [FusionState] keeps the last known value of each input stream and
/// recomputes the ECI to phone transform on every update, without debouncing.
/// Inputs captured at different instants are combined as they are.
///
/// [FusionState] has a single writer: see [actor::FusionActor] to feed it
/// from concurrent producers.
#[derive(Debug, Clone)]
pub struct FusionState {
    last_location: Option<ObserverPosition>,
    last_rotation: Option<Matrix4>,
    last_satellites: Vec<SatelliteState>,
    /// Newest selection subscription we heard of
    selection_generation: u64,
    eci_to_local: Matrix4,
    eci_to_phone: Matrix4,
    epoch: Option<Epoch>,
    revision: u64,
}

impl Default for FusionState {
    fn default() -> Self {
        Self::new()
    }
}

impl FusionState {
    pub fn new() -> Self {
        Self {
            last_location: None,
            last_rotation: None,
            last_satellites: Vec::new(),
            selection_generation: 0,
            eci_to_local: Matrix4::identity(),
            eci_to_phone: Matrix4::identity(),
            epoch: None,
            revision: 0,
        }
    }

    pub fn phase(&self) -> FusionPhase {
        match (self.last_location, self.last_rotation) {
            (None, None) => FusionPhase::Idle,
            (Some(_), Some(_)) if !self.last_satellites.is_empty() => FusionPhase::Live,
            _ => FusionPhase::Partial,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Latest device rotation, identity until the first reading
    pub fn rotation(&self) -> Matrix4 {
        self.last_rotation.unwrap_or_else(Matrix4::identity)
    }

    pub fn eci_to_phone(&self) -> Matrix4 {
        self.eci_to_phone
    }

    pub fn observer(&self) -> Option<ObserverPosition> {
        self.last_location
    }

    pub fn satellites(&self) -> &[SatelliteState] {
        &self.last_satellites
    }

    /// New location fix. `None` retains the previous fix.
    /// Returns true when the state changed.
    pub fn on_location(&mut self, location: Option<GeodeticPosition>, epoch: Epoch) -> bool {
        let Some(location) = location else {
            debug!("{} - empty location delivery", epoch);
            return false;
        };
        if !location.is_valid() {
            warn!("{} - rejected location fix {}", epoch, location);
            return false;
        }
        self.last_location = Some(ObserverPosition::from_geodetic(location));
        self.revision += 1;
        self.recompute(epoch);
        true
    }

    /// New device rotation [Matrix4]
    pub fn on_rotation(&mut self, rotation: Matrix4, epoch: Epoch) -> bool {
        if rotation.iter().any(|v| !v.is_finite()) {
            warn!("{} - rejected non finite rotation", epoch);
            return false;
        }
        self.last_rotation = Some(rotation);
        self.revision += 1;
        self.recompute(epoch);
        true
    }

    /// New satellite selection, delivered by subscription `generation`.
    /// Deliveries from a subscription older than the newest one
    /// already seen are dropped. Returns true when accepted.
    pub fn on_satellites(
        &mut self,
        generation: u64,
        satellites: Vec<SatelliteState>,
        epoch: Epoch,
    ) -> bool {
        if generation < self.selection_generation {
            debug!(
                "{} - dropped stale selection (generation {} < {})",
                epoch, generation, self.selection_generation
            );
            return false;
        }
        self.selection_generation = generation;
        debug!(
            "{} - selection #{}: [{}]",
            epoch,
            generation,
            satellites.iter().map(|sat| sat.name()).join(", ")
        );
        self.last_satellites = satellites;
        self.revision += 1;
        self.recompute(epoch);
        true
    }

    /// A new selection subscription superseded the previous ones
    pub fn on_selection_replaced(&mut self, generation: u64) {
        self.selection_generation = self.selection_generation.max(generation);
    }

    /// Recomputes the transform. Failures retain the previous transform.
    fn recompute(&mut self, epoch: Epoch) {
        match self.try_recompute(epoch) {
            Ok(()) => {},
            Err(Error::NoSelectedSatellites) => {
                debug!("{} - no satellite selected: transform retained", epoch);
            },
            Err(e) => {
                warn!("{} - transform retained: {}", epoch, e);
            },
        }
    }

    fn try_recompute(&mut self, epoch: Epoch) -> Result<(), Error> {
        if self.last_satellites.is_empty() {
            return Err(Error::NoSelectedSatellites);
        }

        let Some(observer) = self.last_location else {
            debug!("{} - awaiting first location fix", epoch);
            return Ok(());
        };

        let observer_eci = self.observer_vector_at(&observer, epoch)?;
        let frame = ObserverFrame::from_observer_vector(&observer_eci)?;

        self.eci_to_local = frame.eci_to_local();
        self.eci_to_phone = frame.eci_to_phone(&self.rotation());
        self.epoch = Some(epoch);
        Ok(())
    }

    /// Observer vector from the first selected satellite that propagates.
    /// It does not depend on the satellite, any of them may provide it.
    fn observer_vector_at(
        &self,
        observer: &ObserverPosition,
        epoch: Epoch,
    ) -> Result<Vector4, Error> {
        let mut last_error = Error::NoSelectedSatellites;
        for satellite in self.last_satellites.iter() {
            match satellite.observer_vector_at(observer, epoch) {
                Ok(vector) => return Ok(vector),
                Err(e) => {
                    debug!("{} - {}: no observer vector: {}", epoch, satellite, e);
                    last_error = e;
                },
            }
        }
        Err(last_error)
    }

    /// Fresh [TransformSnapshot] of the current state
    pub fn snapshot(&self) -> TransformSnapshot {
        TransformSnapshot {
            revision: self.revision,
            epoch: self.epoch,
            phase: self.phase(),
            rotation: self.rotation(),
            eci_to_local: self.eci_to_local,
            eci_to_phone: self.eci_to_phone,
            observer: self.last_location,
            satellites: self.last_satellites.clone(),
        }
    }
}
