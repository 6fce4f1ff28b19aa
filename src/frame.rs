//! Observer frame: ECI to local (east, north, up) transform
use log::trace;

use crate::{
    error::Error,
    math::{
        cross_product, dot_product, multiply_matrices, multiply_matrix_vector, normalize,
        transform_axes_matrix, world_up, Matrix4, Vector4,
    },
};

/// [ObserverFrame] is the local tangent frame of the observer, expressed
/// in phone axes naming:
/// - X: east
/// - Y: north
/// - Z: up (zenith)
///
/// It only re-orients axes. Vectors must be made observer-relative before
/// going through it (see [crate::prelude::SatelliteState::relative_vector_at]),
/// the translation part of every matrix built here is null.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverFrame {
    x_axis: Vector4,
    y_axis: Vector4,
    z_axis: Vector4,
}

impl ObserverFrame {
    /// Builds the [ObserverFrame] from the ECI vector pointing from Earth
    /// center to the observer.
    ///
    /// The zenith is the renamed, normalized observer vector. North is obtained
    /// by Gram-Schmidt orthogonalization of the celestial pole against the zenith,
    /// east completes the right-handed frame.
    ///
    /// Returns [Error::DegenerateVector] for a null observer vector, or for an
    /// observer on the pole axis (north is undefined there).
    pub fn from_observer_vector(observer_eci: &Vector4) -> Result<Self, Error> {
        let renamed = multiply_matrix_vector(&transform_axes_matrix(), observer_eci);
        let z_axis = normalize(&renamed)?;

        let up = world_up();
        let prod = dot_product(&up, &z_axis);

        let y_axis = normalize(&Vector4::new(
            up.x - z_axis.x * prod,
            up.y - z_axis.y * prod,
            up.z - z_axis.z * prod,
            1.0,
        ))?;

        let x_axis = normalize(&cross_product(&y_axis, &z_axis))?;

        trace!(
            "observer frame: east={:?} north={:?} zenith={:?}",
            x_axis.xyz(),
            y_axis.xyz(),
            z_axis.xyz()
        );

        Ok(Self {
            x_axis,
            y_axis,
            z_axis,
        })
    }

    /// East axis
    pub fn east(&self) -> Vector4 {
        self.x_axis
    }

    /// North axis
    pub fn north(&self) -> Vector4 {
        self.y_axis
    }

    /// Zenith axis
    pub fn zenith(&self) -> Vector4 {
        self.z_axis
    }

    /// Rotation only [Matrix4] projecting phone-named coordinates onto
    /// (east, north, up). Each axis fills one row, so that `M * v` returns
    /// the components of `v` along each axis. Translation stays null.
    pub fn rotation(&self) -> Matrix4 {
        let mut m = Matrix4::identity();
        for (row, axis) in [self.x_axis, self.y_axis, self.z_axis].iter().enumerate() {
            m[(row, 0)] = axis.x;
            m[(row, 1)] = axis.y;
            m[(row, 2)] = axis.z;
        }
        m
    }

    /// ECI to local (east, north, up) [Matrix4], before device rotation:
    /// axes renaming applies first.
    pub fn eci_to_local(&self) -> Matrix4 {
        multiply_matrices(&self.rotation(), &transform_axes_matrix())
    }

    /// Final ECI to phone [Matrix4]: device attitude folded on the left
    /// of [Self::eci_to_local].
    pub fn eci_to_phone(&self, rotation: &Matrix4) -> Matrix4 {
        multiply_matrices(rotation, &self.eci_to_local())
    }
}

#[cfg(test)]
mod test {
    use super::ObserverFrame;
    use crate::{
        error::Error,
        math::{dot_product, magnitude, multiply_matrix_vector, point, Matrix4},
    };

    use rand::{rngs::SmallRng, Rng, SeedableRng};

    const TOLERANCE: f64 = 1.0E-9;

    fn assert_orthonormal(frame: &ObserverFrame) {
        let (x, y, z) = (frame.east(), frame.north(), frame.zenith());
        for (name, axis) in [("east", x), ("north", y), ("zenith", z)] {
            assert!(
                (magnitude(&axis) - 1.0).abs() < TOLERANCE,
                "{} axis is not unitary: {}",
                name,
                magnitude(&axis)
            );
        }
        assert!(dot_product(&x, &y).abs() < TOLERANCE, "east.north != 0");
        assert!(dot_product(&y, &z).abs() < TOLERANCE, "north.zenith != 0");
        assert!(dot_product(&z, &x).abs() < TOLERANCE, "zenith.east != 0");
    }

    #[test]
    fn equatorial_observer() {
        // ECI X: phone Z
        let frame = ObserverFrame::from_observer_vector(&point(6378.0, 0.0, 0.0)).unwrap();
        assert_eq!(frame.zenith().xyz(), point(0.0, 0.0, 1.0).xyz());
        assert_eq!(frame.north().xyz(), point(0.0, 1.0, 0.0).xyz());
        assert_eq!(frame.east().xyz(), point(1.0, 0.0, 0.0).xyz());

        // ECI Y is east of the observer, ECI Z is north
        let eci_to_local = frame.eci_to_local();
        let east = multiply_matrix_vector(&eci_to_local, &point(0.0, 100.0, 0.0));
        let north = multiply_matrix_vector(&eci_to_local, &point(0.0, 0.0, 100.0));
        let up = multiply_matrix_vector(&eci_to_local, &point(100.0, 0.0, 0.0));
        assert_eq!(east, point(100.0, 0.0, 0.0));
        assert_eq!(north, point(0.0, 100.0, 0.0));
        assert_eq!(up, point(0.0, 0.0, 100.0));
    }

    #[test]
    fn random_observers_are_orthonormal() {
        let mut rng = SmallRng::seed_from_u64(0x5a7e_111e);
        for _ in 0..500 {
            let lat: f64 = rng.random_range(-89.0..89.0_f64).to_radians();
            let lon: f64 = rng.random_range(-180.0..180.0_f64).to_radians();
            let r: f64 = rng.random_range(6350.0..6400.0);

            let observer = point(
                r * lat.cos() * lon.cos(),
                r * lat.cos() * lon.sin(),
                r * lat.sin(),
            );

            let frame = ObserverFrame::from_observer_vector(&observer).unwrap();
            assert_orthonormal(&frame);

            // zenith always maps to local up
            let up = multiply_matrix_vector(&frame.eci_to_local(), &observer);
            assert!((up.z - r).abs() < 1.0E-6);
            assert!(up.x.abs() < 1.0E-6 && up.y.abs() < 1.0E-6);
        }
    }

    #[test]
    fn north_points_to_pole() {
        let lat = 52.0_f64.to_radians();
        let lon = 8.0_f64.to_radians();
        let observer = point(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin());
        let frame = ObserverFrame::from_observer_vector(&observer).unwrap();

        let pole = multiply_matrix_vector(&frame.eci_to_local(), &point(0.0, 0.0, 1.0));
        assert!(pole.x.abs() < TOLERANCE, "pole has no east component");
        assert!(pole.y > 0.0, "pole is north");
        assert!((pole.y - lat.cos()).abs() < TOLERANCE);
        assert!((pole.z - lat.sin()).abs() < TOLERANCE);
    }

    #[test]
    fn degenerate_observers() {
        assert_eq!(
            ObserverFrame::from_observer_vector(&point(0.0, 0.0, 0.0)),
            Err(Error::DegenerateVector)
        );
        // on the pole axis, north is undefined
        assert_eq!(
            ObserverFrame::from_observer_vector(&point(0.0, 0.0, 6356.0)),
            Err(Error::DegenerateVector)
        );
    }

    #[test]
    fn device_rotation_applies_last() {
        let frame = ObserverFrame::from_observer_vector(&point(6378.0, 0.0, 0.0)).unwrap();
        assert_eq!(frame.eci_to_phone(&Matrix4::identity()), frame.eci_to_local());

        // device rotated 90° around up: world east seen along device -y
        let mut rotation = Matrix4::identity();
        rotation[(0, 0)] = 0.0;
        rotation[(0, 1)] = 1.0;
        rotation[(1, 0)] = -1.0;
        rotation[(1, 1)] = 0.0;

        let east = multiply_matrix_vector(&frame.eci_to_phone(&rotation), &point(0.0, 1.0, 0.0));
        assert_eq!(east, point(0.0, -1.0, 0.0));
    }
}
