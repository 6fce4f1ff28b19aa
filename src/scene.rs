//! Per-frame composition: transform, projection, clipping and target selection
use hifitime::Epoch;
use log::{debug, trace};

use crate::{
    cfg::Config,
    error::Error,
    fusion::TransformSnapshot,
    math::multiply_matrix_vector,
    position::{GeodeticPosition, ObserverPosition},
    projection::{Projection, ScreenOffset},
    satellite::{DrawableSatellite, SatelliteId, SatelliteState},
    visibility::{above_horizon, in_frustum, nearest_to_center},
};

/// Information card of the satellite closest to the crosshair
#[derive(Debug, Clone, PartialEq)]
pub struct TargetInfo {
    pub id: SatelliteId,
    pub name: String,
    /// Sub-satellite point, longitude wrapped into [-180°, 180°].
    /// None when the propagator could not resolve it for this frame.
    pub sub_point: Option<GeodeticPosition>,
    /// Normalized device coordinates
    pub ndc: (f64, f64),
}

impl std::fmt::Display for TargetInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)?;
        if let Some(sub_point) = &self.sub_point {
            write!(f, " {}", sub_point)?;
        }
        Ok(())
    }
}

/// One render [Frame]: every visible satellite with its clip coordinates,
/// and the current target. Frames are rebuilt from scratch each time.
#[derive(Debug, Clone)]
pub struct Frame {
    pub epoch: Epoch,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub projection: Projection,
    /// Visible satellites, in selection order
    pub drawables: Vec<DrawableSatellite>,
    pub target: Option<TargetInfo>,
}

impl Frame {
    /// Canvas position of this [DrawableSatellite]
    pub fn screen_offset(&self, drawable: &DrawableSatellite) -> ScreenOffset {
        self.projection.to_screen_offset(
            self.canvas_width,
            self.canvas_height,
            &drawable.coordinates,
            true,
        )
    }

    /// Canvas center (crosshair)
    pub fn center(&self) -> ScreenOffset {
        ScreenOffset::center(self.canvas_width, self.canvas_height)
    }

    /// The [DrawableSatellite] currently targeted
    pub fn target_drawable(&self) -> Option<&DrawableSatellite> {
        let target = self.target.as_ref()?;
        self.drawables
            .iter()
            .find(|drawable| drawable.satellite.id() == target.id)
    }
}

/// [Scene] turns a [TransformSnapshot] into a [Frame]
#[derive(Debug, Clone)]
pub struct Scene {
    field_of_view_deg: f64,
    near_km: f64,
    far_km: f64,
    horizon_clip: bool,
}

impl Scene {
    /// Builds a new [Scene] from a [Config], which is validated here.
    pub fn new(cfg: &Config) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self {
            field_of_view_deg: cfg.field_of_view_deg,
            near_km: cfg.near_km,
            far_km: cfg.far_km,
            horizon_clip: cfg.horizon_clip,
        })
    }

    /// [Projection] for this canvas
    pub fn projection(&self, canvas_width: f64, canvas_height: f64) -> Result<Projection, Error> {
        let aspect_ratio = canvas_width / canvas_height;
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(Error::InvalidAspectRatio(aspect_ratio));
        }
        Ok(Projection::perspective(
            self.field_of_view_deg,
            aspect_ratio,
            self.near_km,
            self.far_km,
        ))
    }

    /// Composes the [Frame] for this canvas, at this [Epoch].
    /// Satellites whose position cannot be resolved are skipped.
    /// Nothing is drawn until the first transform computation.
    pub fn compose(
        &self,
        snapshot: &TransformSnapshot,
        canvas_width: f64,
        canvas_height: f64,
        epoch: Epoch,
    ) -> Result<Frame, Error> {
        let projection = self.projection(canvas_width, canvas_height)?;

        // epoch is only set once a transform has been computed
        let drawables = match (snapshot.observer, snapshot.epoch) {
            (Some(observer), Some(_)) => snapshot
                .satellites
                .iter()
                .filter_map(|satellite| {
                    self.drawable(satellite, snapshot, &observer, &projection, epoch)
                })
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        };

        let target = nearest_to_center(&drawables).map(|drawable| {
            let satellite = &drawable.satellite;
            let sub_point = match satellite.geodetic_at(epoch) {
                Ok(sub_point) => Some(sub_point),
                Err(e) => {
                    debug!("{} - {}: no sub-satellite point: {}", epoch, satellite, e);
                    None
                },
            };
            TargetInfo {
                id: satellite.id(),
                name: satellite.name().to_string(),
                sub_point,
                ndc: drawable.ndc(),
            }
        });

        trace!(
            "{} - frame: {}/{} visible",
            epoch,
            drawables.len(),
            snapshot.satellites.len()
        );

        Ok(Frame {
            epoch,
            canvas_width,
            canvas_height,
            projection,
            drawables,
            target,
        })
    }

    fn drawable(
        &self,
        satellite: &SatelliteState,
        snapshot: &TransformSnapshot,
        observer: &ObserverPosition,
        projection: &Projection,
        epoch: Epoch,
    ) -> Option<DrawableSatellite> {
        let relative = match satellite.relative_vector_at(observer, epoch) {
            Ok(relative) => relative,
            Err(e) => {
                debug!("{} - {} skipped: {}", epoch, satellite, e);
                return None;
            },
        };

        if self.horizon_clip {
            let local = multiply_matrix_vector(&snapshot.eci_to_local, &relative);
            if !above_horizon(&local) {
                trace!("{} - {} below horizon", epoch, satellite);
                return None;
            }
        }

        let camera = multiply_matrix_vector(&snapshot.eci_to_phone, &relative);
        let coordinates = projection.project(&camera);

        if !in_frustum(&coordinates) {
            return None;
        }

        Some(DrawableSatellite::new(satellite.clone(), coordinates))
    }
}
