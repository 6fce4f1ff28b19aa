//! Homogeneous vector and 4x4 matrix kernel.
//!
//! Matrices are stored column-major (OpenGL convention, `M[col * 4 + row]`),
//! which is also the native [nalgebra] storage order, so column-major
//! slices convert without shuffling.
use crate::{
    constants::{DEGENERATE_MAGNITUDE, TRANSFORM_AXES, WORLD_UP},
    error::Error,
};

/// Homogeneous 4x4 matrix, column-major
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Homogeneous vector: kilometers in ECI, or clip/device coordinates.
/// `w` is 1.0 for points and becomes the perspective divisor after projection.
pub type Vector4 = nalgebra::Vector4<f64>;

/// Builds a point (`w = 1.0`)
pub fn point(x: f64, y: f64, z: f64) -> Vector4 {
    Vector4::new(x, y, z, 1.0)
}

/// Builds a [Matrix4] from 16 column-major values.
/// Any other length is a programming error.
pub fn from_column_major(values: &[f64]) -> Matrix4 {
    assert_eq!(
        values.len(),
        16,
        "column-major 4x4 matrix needs 16 values, got {}",
        values.len()
    );
    Matrix4::from_column_slice(values)
}

/// Returns the 16 column-major values of this [Matrix4]
pub fn to_column_major(m: &Matrix4) -> [f64; 16] {
    let mut values = [0.0; 16];
    values.copy_from_slice(m.as_slice());
    values
}

/// Constant axes renaming matrix, see [TRANSFORM_AXES]
pub fn transform_axes_matrix() -> Matrix4 {
    from_column_major(&TRANSFORM_AXES)
}

/// Celestial pole in phone axes naming, see [WORLD_UP]
pub fn world_up() -> Vector4 {
    Vector4::from_column_slice(&WORLD_UP)
}

/// Standard matrix product `lhs * rhs`: `rhs` applies first.
pub fn multiply_matrices(lhs: &Matrix4, rhs: &Matrix4) -> Matrix4 {
    lhs * rhs
}

/// Standard matrix-vector product.
pub fn multiply_matrix_vector(m: &Matrix4, v: &Vector4) -> Vector4 {
    m * v
}

/// Magnitude of the (x, y, z) part. `w` never contributes.
pub fn magnitude(v: &Vector4) -> f64 {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}

/// Divides (x, y, z) by [magnitude], `w` is preserved.
/// Returns [Error::DegenerateVector] for near null vectors.
pub fn normalize(v: &Vector4) -> Result<Vector4, Error> {
    let norm = magnitude(v);
    if !norm.is_finite() || norm < DEGENERATE_MAGNITUDE {
        return Err(Error::DegenerateVector);
    }
    Ok(Vector4::new(v.x / norm, v.y / norm, v.z / norm, v.w))
}

/// Dot product over (x, y, z)
pub fn dot_product(lhs: &Vector4, rhs: &Vector4) -> f64 {
    lhs.x * rhs.x + lhs.y * rhs.y + lhs.z * rhs.z
}

/// Cross product over (x, y, z). The result is tagged `w = 1.0`.
pub fn cross_product(lhs: &Vector4, rhs: &Vector4) -> Vector4 {
    Vector4::new(
        lhs.y * rhs.z - lhs.z * rhs.y,
        lhs.z * rhs.x - lhs.x * rhs.z,
        lhs.x * rhs.y - lhs.y * rhs.x,
        1.0,
    )
}

/// Componentwise `lhs - rhs` over (x, y, z). `w` is not a difference:
/// the caller decides it. Distances must go through [magnitude].
pub fn subtract(lhs: &Vector4, rhs: &Vector4, w: f64) -> Vector4 {
    Vector4::new(lhs.x - rhs.x, lhs.y - rhs.y, lhs.z - rhs.z, w)
}
